use std::rc::Rc;

use crate::bitmap::Bitmap;
use crate::trace::trace_hook;
use crate::vector::element::{Element, ElementType};
use crate::vector::{index, Vector};
use crate::view::{check_viewable, fill_region, Materialized, Slot, Subset, Viewport};

/// A monotone subset of source positions, stored compactly as a bitmap
/// spanning the source's whole index range.
///
/// Element reads resolve through rank-select; bulk reads and pointer
/// requests materialize instead, because the logical layout never
/// matches the source's.
#[derive(Debug)]
pub struct Mosaic {
    source: Rc<Vector>,
    bitmap: Rc<Bitmap>,
    size: usize,
    materialized: Slot,
}

impl Mosaic {
    /// Wraps an already-built selection bitmap.
    pub fn new(source: Rc<Vector>, bitmap: Rc<Bitmap>, size: usize) -> Self {
        check_viewable(&source);
        assert!(
            bitmap.len() == source.len(),
            "bitmap must be the same length as the source"
        );
        assert!(
            bitmap.count_ones() == size,
            "bitmap popcount disagrees with the mosaic length"
        );
        trace_hook!("mosaic.new", "size: {size}");
        Self {
            source,
            bitmap,
            size,
            materialized: Slot::default(),
        }
    }

    /// Builds the bitmap from a selector: a full-length NA-free logical
    /// mask, or strictly increasing 1-based indices within the source.
    pub fn from_selector(source: Rc<Vector>, selector: &Vector) -> Self {
        let n = source.len();
        let mut bitmap = Bitmap::new(n);
        let size = match selector {
            Vector::Logical(mask) => {
                assert!(
                    mask.len() == n,
                    "a logical selector must be the same length as the source"
                );
                let mut elements = 0;
                for (position, &current) in mask.iter().enumerate() {
                    assert!(
                        !current.is_na(),
                        "mosaics cannot be created from a logical mask containing NA"
                    );
                    if current.is_true() {
                        bitmap.set(position);
                        elements += 1;
                    }
                }
                elements
            }
            Vector::Int(_) | Vector::Real(_) => {
                let mut previous = None;
                for at in 0..selector.len() {
                    let Some(current) = index::index_value(selector, at) else {
                        panic!("mosaics cannot be created from an ordered index containing NA");
                    };
                    assert!(
                        current >= 1 && current <= n as i64,
                        "cannot use these indices with this source: out of range"
                    );
                    if let Some(previous) = previous {
                        assert!(
                            previous < current,
                            "mosaics can only be created from an ordered index list, \
                             but {previous} >= {current}"
                        );
                    }
                    bitmap.set((current - 1) as usize);
                    previous = Some(current);
                }
                selector.len()
            }
            other => panic!(
                "mosaics can be selected by logical, integer, or real vectors but found {}",
                other.element_type()
            ),
        };
        Self::new(source, Rc::new(bitmap), size)
    }

    pub fn source(&self) -> &Rc<Vector> {
        &self.source
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// One pass over the source collecting the selected elements.
    fn copy_from_source(&self) -> Vector {
        let mut data = Vector::alloc(self.element_type(), self.size);
        let mut cursor = 0;
        for position in self.bitmap.ones() {
            Vector::copy_element(&self.source, position, &mut data, cursor);
            cursor += 1;
        }
        assert!(
            cursor == self.size,
            "the number of copied elements differs from the mosaic length"
        );
        data
    }

    /// Resolves screened logical indices to absolute 1-based source
    /// positions through rank-select; NA carries.
    fn translate_by_rank(&self, screened: &Vector) -> Vector {
        let screened = screened.reals();
        let mut translated = vec![f64::NAN; screened.len()];
        for (at, &value) in screened.iter().enumerate() {
            if value.is_nan() {
                continue;
            }
            translated[at] = (self.bitmap.nth_set_bit(value as usize - 1) + 1) as f64;
        }
        Vector::Real(translated)
    }

    /// Lockstep walk of the selection bitmap and monotone in-range
    /// indices, producing the bitmap that selects exactly the requested
    /// logical positions.
    fn translate_bitmap(&self, screened: &Vector) -> Bitmap {
        let screened = screened.reals();
        let mut translated = Bitmap::new(self.source.len());
        let mut cursor = 0; // next requested entry
        let mut logical = 0; // logical position of the current set bit
        for position in self.bitmap.ones() {
            if cursor < screened.len() && logical == screened[cursor] as usize - 1 {
                translated.set(position);
                cursor += 1;
            }
            logical += 1;
        }
        assert!(
            cursor == screened.len(),
            "the translated bitmap dropped requested indices"
        );
        translated
    }
}

impl Viewport for Mosaic {
    fn len(&self) -> usize {
        self.size
    }

    fn element_type(&self) -> ElementType {
        self.source.element_type()
    }

    fn is_materialized(&self) -> bool {
        self.materialized.is_set()
    }

    fn duplicate(&self, deep: bool) -> Self {
        trace_hook!("mosaic.duplicate", "deep: {deep}");
        Self {
            source: Rc::clone(&self.source),
            bitmap: if deep {
                Rc::new((*self.bitmap).clone())
            } else {
                Rc::clone(&self.bitmap)
            },
            size: self.size,
            materialized: if deep {
                self.materialized.deep()
            } else {
                self.materialized.clone()
            },
        }
    }

    fn element<T: Element>(&self, index: usize) -> T {
        trace_hook!("mosaic.element", "index: {index}");
        if let Some(cell) = self.materialized.get() {
            let data = cell.borrow();
            return T::values(&data)[index];
        }
        let position = self.bitmap.nth_set_bit(index);
        T::values(&self.source)[position]
    }

    fn read_region<T: Element>(&self, from: usize, buf: &mut [T]) -> usize {
        trace_hook!("mosaic.read_region", "from: {from}, len: {}", buf.len());
        let cell = self.materialize();
        let data = cell.borrow();
        fill_region(T::values(&data), from, buf)
    }

    fn materialize(&self) -> Materialized {
        trace_hook!("mosaic.materialize", "already: {}", self.is_materialized());
        self.materialized.install_with(|| self.copy_from_source())
    }

    fn subset(&self, indices: &Vector) -> Subset {
        index::check_index_type(indices);
        trace_hook!("mosaic.subset", "indices: {}", indices.len());

        if indices.is_empty() {
            return Subset::Copied(Vector::alloc(self.element_type(), 0));
        }

        let screened = index::screen(indices, self.size);

        if let Some(cell) = self.materialized.get() {
            return Subset::Copied(index::gather(&cell.borrow(), &screened));
        }

        // Losing monotonicity (or picking up NA) cannot stay a mosaic.
        if !index::is_monotonic(&screened) {
            let translated = self.translate_by_rank(&screened);
            return Subset::Copied(index::gather(&self.source, &translated));
        }

        let translated = self.translate_bitmap(&screened);
        Subset::Mosaic(Mosaic::new(
            Rc::clone(&self.source),
            Rc::new(translated),
            indices.len(),
        ))
    }

    fn inspect(&self) {
        tracing::debug!(
            kind = "mosaic",
            element_type = %self.element_type(),
            size = self.size,
            materialized = self.is_materialized(),
            source_len = self.source.len(),
            "viewport"
        );
    }
}
