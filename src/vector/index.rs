//! Predicates and copy helpers over 1-based index vectors.
//!
//! Index vectors arrive from the host as integer or real vectors; the
//! missing sentinel (integer minimum, real NaN) marks entries that must
//! propagate as NA rather than select anything.

use crate::vector::element::ElementType;
use crate::vector::Vector;

/// Insists the vector is usable as an index vector.
pub fn check_index_type(indices: &Vector) {
    let kind = indices.element_type();
    assert!(
        matches!(kind, ElementType::Int | ElementType::Real),
        "indices must be integer or real but found {kind}"
    );
}

/// Reads entry `at` of an index vector as a machine integer, `None` for
/// the missing sentinel of either index type.
pub fn index_value(indices: &Vector, at: usize) -> Option<i64> {
    match indices {
        Vector::Int(values) => {
            let value = values[at];
            (value != i32::MIN).then_some(value as i64)
        }
        Vector::Real(values) => {
            let value = values[at];
            (!value.is_nan()).then_some(value as i64)
        }
        other => panic!(
            "indices must be integer or real but found {}",
            other.element_type()
        ),
    }
}

/// Strictly increasing and NA-free.
pub fn is_monotonic(indices: &Vector) -> bool {
    match indices {
        Vector::Int(values) => {
            let mut previous = None;
            for &current in values {
                if current == i32::MIN {
                    return false;
                }
                if let Some(previous) = previous {
                    if previous >= current {
                        return false;
                    }
                }
                previous = Some(current);
            }
            true
        }
        Vector::Real(values) => {
            let mut previous = f64::NAN;
            for &current in values {
                if current.is_nan() {
                    return false;
                }
                if !previous.is_nan() && previous >= current {
                    return false;
                }
                previous = current;
            }
            true
        }
        other => panic!(
            "indices must be integer or real but found {}",
            other.element_type()
        ),
    }
}

/// Successor-stepped (`x[i+1] == x[i] + 1`) and NA-free.
pub fn is_contiguous(indices: &Vector) -> bool {
    match indices {
        Vector::Int(values) => {
            let mut previous = None;
            for &current in values {
                if current == i32::MIN {
                    return false;
                }
                if let Some(previous) = previous {
                    if current != previous + 1 {
                        return false;
                    }
                }
                previous = Some(current);
            }
            true
        }
        Vector::Real(values) => {
            let mut previous = f64::NAN;
            for &current in values {
                if current.is_nan() {
                    return false;
                }
                if !previous.is_nan() && current != previous + 1.0 {
                    return false;
                }
                previous = current;
            }
            true
        }
        other => panic!(
            "indices must be integer or real but found {}",
            other.element_type()
        ),
    }
}

/// Every entry within `[min, max]` inclusive. A missing entry counts as
/// out of range.
pub fn is_in_range(indices: &Vector, min: i64, max: i64) -> bool {
    for at in 0..indices.len() {
        match index_value(indices, at) {
            Some(value) if value >= min && value <= max => {}
            _ => return false,
        }
    }
    true
}

/// True iff any missing entry is present.
pub fn has_na(indices: &Vector) -> bool {
    (0..indices.len()).any(|at| index_value(indices, at).is_none())
}

/// Coerces the first entry to a length. Fatal on an empty or missing
/// argument.
pub fn first_as_length(indices: &Vector) -> usize {
    assert!(!indices.is_empty(), "indices cannot be empty");
    match index_value(indices, 0) {
        Some(value) if value >= 0 => value as usize,
        Some(value) => panic!("a length-valued scalar cannot be negative: {value}"),
        None => panic!("a length-valued scalar cannot be missing"),
    }
}

/// Fresh vector holding `source[start..start + size]`.
pub fn copy_range(source: &Vector, start: usize, size: usize) -> Vector {
    let mut target = Vector::alloc(source.element_type(), size);
    for offset in 0..size {
        Vector::copy_element(source, start + offset, &mut target, offset);
    }
    target
}

/// Fresh vector gathered through 1-based indices; a missing index writes
/// the element type's missing form. Out-of-range non-NA indices are
/// caller bugs and fail fast.
pub fn gather(source: &Vector, indices: &Vector) -> Vector {
    let size = indices.len();
    let mut target = Vector::alloc(source.element_type(), size);
    for at in 0..size {
        match index_value(indices, at) {
            None => target.set_na(at),
            Some(index) => {
                assert!(index >= 1, "gather index must be positive: {index}");
                Vector::copy_element(source, (index - 1) as usize, &mut target, at);
            }
        }
    }
    target
}

/// Fresh vector holding the elements selected by a logical mask. A
/// missing mask entry consumes an output slot and writes the element
/// type's missing form.
pub fn mask_copy(source: &Vector, mask: &Vector) -> Vector {
    let mask = mask.logicals();
    let size = mask.iter().filter(|m| m.is_na() || m.is_true()).count();

    let mut target = Vector::alloc(source.element_type(), size);
    let mut copied = 0;
    for (index, &current) in mask.iter().enumerate() {
        if current.is_na() {
            target.set_na(copied);
            copied += 1;
        } else if current.is_true() {
            Vector::copy_element(source, index, &mut target, copied);
            copied += 1;
        }
    }

    assert!(
        copied == size,
        "the number of copied elements differs from the size of the output vector"
    );
    target
}

/// Maps user-supplied 1-based indices against a logical length:
/// out-of-range entries and NAs become NA. The output is always a real
/// vector so the sentinel survives any index magnitude.
pub fn screen(indices: &Vector, len: usize) -> Vector {
    let mut screened = vec![f64::NAN; indices.len()];
    for (at, slot) in screened.iter_mut().enumerate() {
        if let Some(value) = index_value(indices, at) {
            if value >= 1 && value <= len as i64 {
                *slot = value as f64;
            }
        }
    }
    Vector::Real(screened)
}
