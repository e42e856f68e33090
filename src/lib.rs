//! Lazy viewports over immutable vectors.
//!
//! A viewport presents a transformed logical sequence of a shared source
//! vector without copying it: a [`Slice`] is a contiguous window, a
//! [`Mosaic`] a bitmap-selected monotone subset, and a [`Prism`] an
//! arbitrary index-vector permutation. Reads translate indices on the
//! fly; a concrete buffer only comes into existence when a consumer
//! forces [`Viewport::materialize`], and taking a further subset returns
//! the cheapest faithful representation: another viewport when the
//! selection is still structurally expressible, otherwise a gathered
//! fresh vector.

pub mod bitmap;
pub mod choice;
mod trace;
pub mod vector;
pub mod view;

pub use bitmap::Bitmap;
pub use trace::set_debug_mode;
pub use vector::element::{Complex, Element, ElementType, Handle, Logical};
pub use vector::{Scalar, Vector};
pub use view::{Materialized, Mosaic, Prism, Slice, Subset, View, Viewport, ViewportKind};

use std::rc::Rc;

use vector::index;

/// Builds a contiguous-window viewport from host arguments. `start` and
/// `size` are 1-based length-valued scalar vectors; `start` is
/// decremented on entry.
pub fn slice(source: Rc<Vector>, start: &Vector, size: &Vector) -> Slice {
    let start = index::first_as_length(start);
    let size = index::first_as_length(size);
    assert!(start >= 1, "slice start is 1-based and must be positive");
    Slice::new(source, start - 1, size)
}

/// Builds a bitmap-selected viewport from a selector: a full-length
/// NA-free logical mask, or strictly increasing 1-based indices.
pub fn mosaic(source: Rc<Vector>, selector: &Vector) -> Mosaic {
    Mosaic::from_selector(source, selector)
}

/// Builds an index-vector viewport; every entry is NA or a 1-based
/// position within the source.
pub fn prism(source: Rc<Vector>, indices: &Vector) -> Prism {
    Prism::new(source, indices.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_entry_decrements_its_start() {
        let source = Rc::new(Vector::Int(vec![10, 20, 30, 40, 50]));
        let slice = slice(source, &Vector::Int(vec![2]), &Vector::Int(vec![3]));
        assert_eq!(slice.start(), 1);
        assert_eq!(slice.len(), 3);
        assert_eq!(slice.element::<i32>(0), 20);
    }

    #[test]
    fn slice_entry_accepts_real_scalars() {
        let source = Rc::new(Vector::Int(vec![10, 20, 30]));
        let slice = slice(source, &Vector::Real(vec![1.0]), &Vector::Real(vec![2.0]));
        assert_eq!(slice.element::<i32>(1), 20);
    }

    #[test]
    #[should_panic(expected = "indices cannot be empty")]
    fn slice_entry_rejects_empty_scalars() {
        let source = Rc::new(Vector::Int(vec![1]));
        slice(source, &Vector::Int(vec![]), &Vector::Int(vec![1]));
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn slice_entry_rejects_a_zero_start() {
        let source = Rc::new(Vector::Int(vec![1]));
        slice(source, &Vector::Int(vec![0]), &Vector::Int(vec![1]));
    }

    #[test]
    fn mosaic_and_prism_entries_construct() {
        let source = Rc::new(Vector::Int(vec![1, 2, 3, 4, 5]));
        let mask = Vector::from(vec![true, false, true, false, true]);
        let mosaic = mosaic(Rc::clone(&source), &mask);
        assert_eq!(mosaic.len(), 3);

        let prism = prism(source, &Vector::Int(vec![5, 1]));
        assert_eq!(prism.element::<i32>(0), 5);
    }

    #[test]
    fn inspect_and_debug_mode_do_not_disturb_reads() {
        let source = Rc::new(Vector::Int(vec![1, 2, 3]));
        let view = View::Mosaic(Mosaic::from_selector(
            Rc::clone(&source),
            &Vector::Int(vec![1, 3]),
        ));

        set_debug_mode(true);
        view.inspect();
        assert_eq!(view.element::<i32>(1), 3);
        set_debug_mode(false);
        assert_eq!(view.element::<i32>(1), 3);
    }

    #[test]
    fn region_reads_agree_with_element_reads() {
        // region consistency across all three kinds
        let source = Rc::new(Vector::Int((1..=10).collect()));

        let views: Vec<View> = vec![
            View::Slice(Slice::new(Rc::clone(&source), 2, 5)),
            View::Mosaic(Mosaic::from_selector(
                Rc::clone(&source),
                &Vector::Int(vec![1, 4, 6, 9]),
            )),
            View::Prism(Prism::new(
                Rc::clone(&source),
                Vector::Int(vec![9, 2, 2, 7]),
            )),
        ];

        for view in &views {
            for from in 0..view.len() {
                let mut buf = vec![0i32; view.len() - from];
                assert_eq!(view.read_region(from, &mut buf), view.len() - from);
                for (offset, &value) in buf.iter().enumerate() {
                    assert_eq!(value, view.element::<i32>(from + offset));
                }
            }
        }
    }
}
