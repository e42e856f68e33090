use std::rc::Rc;

use crate::trace::trace_hook;
use crate::vector::element::{Element, ElementType};
use crate::vector::{index, Vector};
use crate::view::{check_viewable, fill_region, Materialized, Mosaic, Prism, Slot, Subset, Viewport};

/// A contiguous window `[start, start + size)` over a shared source.
///
/// The slice is the only viewport that may alias its source for
/// read-only access (see [`Slice::as_window`]), and the only one whose
/// element read is lenient past the logical end: consumers may probe
/// beyond the window and read the element type's missing form back.
#[derive(Debug)]
pub struct Slice {
    source: Rc<Vector>,
    start: usize,
    size: usize,
    materialized: Slot,
}

impl Slice {
    /// Builds a window over `source`. `start` is 0-based here; the host
    /// entry point decrements its 1-based argument before calling.
    pub fn new(source: Rc<Vector>, start: usize, size: usize) -> Self {
        check_viewable(&source);
        assert!(
            start + size <= source.len(),
            "viewport must fit within the length of the source"
        );
        trace_hook!("slice.new", "start: {start}, size: {size}");
        Self {
            source,
            start,
            size,
            materialized: Slot::default(),
        }
    }

    pub fn source(&self) -> &Rc<Vector> {
        &self.source
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// The window borrowed straight from the source buffer, without
    /// copying. `None` once the slice has materialized; the buffer is
    /// then authoritative and [`Viewport::materialize`] reaches it.
    pub fn as_window<T: Element>(&self) -> Option<&[T]> {
        if self.materialized.is_set() {
            return None;
        }
        Some(&T::values(&self.source)[self.start..self.start + self.size])
    }

    /// 1-based window indices to 1-based absolute source positions;
    /// out-of-window entries and NAs become NA.
    fn translate_window(&self, indices: &Vector) -> Vector {
        let mut translated = vec![f64::NAN; indices.len()];
        for (at, slot) in translated.iter_mut().enumerate() {
            if let Some(value) = index::index_value(indices, at) {
                if value >= 1 && value <= self.size as i64 {
                    *slot = (value + self.start as i64) as f64;
                }
            }
        }
        Vector::Real(translated)
    }
}

impl Viewport for Slice {
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
        trace_hook!("slice.duplicate", "deep: {deep}");
        Self {
            source: Rc::clone(&self.source),
            start: self.start,
            size: self.size,
            materialized: if deep {
                self.materialized.deep()
            } else {
                self.materialized.clone()
            },
        }
    }

    fn element<T: Element>(&self, index: usize) -> T {
        trace_hook!("slice.element", "index: {index}");
        if index >= self.size {
            // consumers may probe past the window; read missing back
            return T::NA;
        }
        if let Some(cell) = self.materialized.get() {
            let data = cell.borrow();
            return T::values(&data)[index];
        }
        T::values(&self.source)[self.start + index]
    }

    fn read_region<T: Element>(&self, from: usize, buf: &mut [T]) -> usize {
        trace_hook!("slice.read_region", "from: {from}, len: {}", buf.len());
        if let Some(cell) = self.materialized.get() {
            let data = cell.borrow();
            return fill_region(T::values(&data), from, buf);
        }
        let window = &T::values(&self.source)[self.start..self.start + self.size];
        fill_region(window, from, buf)
    }

    fn materialize(&self) -> Materialized {
        trace_hook!("slice.materialize", "already: {}", self.is_materialized());
        self.materialized
            .install_with(|| index::copy_range(&self.source, self.start, self.size))
    }

    fn subset(&self, indices: &Vector) -> Subset {
        index::check_index_type(indices);
        trace_hook!("slice.subset", "indices: {}", indices.len());

        if indices.is_empty() {
            return Subset::Copied(Vector::alloc(self.element_type(), 0));
        }

        if let Some(cell) = self.materialized.get() {
            let screened = index::screen(indices, self.size);
            return Subset::Copied(index::gather(&cell.borrow(), &screened));
        }

        // Out-of-window or missing entries cannot stay lazy.
        if !index::is_in_range(indices, 1, self.size as i64) {
            let translated = self.translate_window(indices);
            return Subset::Copied(index::gather(&self.source, &translated));
        }

        if !index::is_contiguous(indices) {
            let translated = self.translate_window(indices);
            if index::is_monotonic(indices) {
                return Subset::Mosaic(Mosaic::from_selector(
                    Rc::clone(&self.source),
                    &translated,
                ));
            }
            return Subset::Prism(Prism::new(Rc::clone(&self.source), translated));
        }

        // Contiguous and in range: the result is itself a window.
        let start = self.start + index::first_as_length(indices) - 1;
        Subset::Slice(Slice::new(Rc::clone(&self.source), start, indices.len()))
    }

    fn inspect(&self) {
        tracing::debug!(
            kind = "slice",
            element_type = %self.element_type(),
            start = self.start,
            size = self.size,
            materialized = self.is_materialized(),
            source_len = self.source.len(),
            "viewport"
        );
    }
}
