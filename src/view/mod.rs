//! The viewport protocol and its three implementations.
//!
//! A viewport is a lazy, read-through presentation of a subset or
//! permutation of a shared source vector. Reads translate indices on the
//! fly; a contiguous buffer only exists once a consumer forces
//! materialization, and from then on that buffer is authoritative.

pub mod mosaic;
pub mod prism;
pub mod slice;

pub use mosaic::Mosaic;
pub use prism::Prism;
pub use slice::Slice;

use std::cell::{OnceCell, RefCell};
use std::rc::Rc;

use crate::vector::element::{Element, ElementType};
use crate::vector::Vector;

/// The shared, installed-at-most-once materialization buffer.
pub type Materialized = Rc<RefCell<Vector>>;

/// The kind of structure backing a viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportKind {
    Slice,
    Mosaic,
    Prism,
}

/// The protocol every viewport implements for its host.
///
/// `element` and `read_region` are the read paths; `materialize` is the
/// writable-buffer path and is idempotent, returning the same cell on
/// every call after the first. `subset` is the composition engine and
/// returns either a refined viewport or a materialized copy.
pub trait Viewport {
    /// Logical length; fixed at construction, O(1).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn element_type(&self) -> ElementType;

    fn is_materialized(&self) -> bool;

    /// A new handle over the same source. Deep duplication clones the
    /// selection structure and any materialized buffer; shallow
    /// duplication shares both with the original.
    fn duplicate(&self, deep: bool) -> Self
    where
        Self: Sized;

    /// Typed element read.
    fn element<T: Element>(&self, index: usize) -> T;

    /// Bulk read into a typed buffer starting at logical position
    /// `from`; returns the number of elements filled, clamped at the
    /// viewport's logical end.
    fn read_region<T: Element>(&self, from: usize, buf: &mut [T]) -> usize;

    /// The contiguous buffer equal to the viewport's logical contents,
    /// allocated on first use and shared afterwards.
    fn materialize(&self) -> Materialized;

    /// Subset-extract: the most efficient representation of the
    /// elements selected by 1-based `indices`.
    fn subset(&self, indices: &Vector) -> Subset;

    /// Diagnostic dump of the view's cells through `tracing`.
    fn inspect(&self);
}

/// What subset-extract produced: a refined viewport when the selection
/// is still structurally expressible, or a gathered fresh vector.
#[derive(Debug)]
pub enum Subset {
    Slice(Slice),
    Mosaic(Mosaic),
    Prism(Prism),
    Copied(Vector),
}

impl Subset {
    pub fn len(&self) -> usize {
        match self {
            Subset::Slice(view) => view.len(),
            Subset::Mosaic(view) => view.len(),
            Subset::Prism(view) => view.len(),
            Subset::Copied(vector) => vector.len(),
        }
    }

    /// The viewport kind, or `None` for a materialized copy.
    pub fn kind(&self) -> Option<ViewportKind> {
        match self {
            Subset::Slice(_) => Some(ViewportKind::Slice),
            Subset::Mosaic(_) => Some(ViewportKind::Mosaic),
            Subset::Prism(_) => Some(ViewportKind::Prism),
            Subset::Copied(_) => None,
        }
    }

    pub fn element<T: Element>(&self, index: usize) -> T {
        match self {
            Subset::Slice(view) => view.element(index),
            Subset::Mosaic(view) => view.element(index),
            Subset::Prism(view) => view.element(index),
            Subset::Copied(vector) => vector.values::<T>()[index],
        }
    }
}

/// A kind-erased viewport.
#[derive(Debug)]
pub enum View {
    Slice(Slice),
    Mosaic(Mosaic),
    Prism(Prism),
}

macro_rules! with_view {
    ($self:expr, $view:ident => $body:expr) => {
        match $self {
            View::Slice($view) => $body,
            View::Mosaic($view) => $body,
            View::Prism($view) => $body,
        }
    };
}

impl View {
    pub fn kind(&self) -> ViewportKind {
        match self {
            View::Slice(_) => ViewportKind::Slice,
            View::Mosaic(_) => ViewportKind::Mosaic,
            View::Prism(_) => ViewportKind::Prism,
        }
    }
}

impl Viewport for View {
    fn len(&self) -> usize {
        with_view!(self, view => view.len())
    }

    fn element_type(&self) -> ElementType {
        with_view!(self, view => view.element_type())
    }

    fn is_materialized(&self) -> bool {
        with_view!(self, view => view.is_materialized())
    }

    fn duplicate(&self, deep: bool) -> Self {
        match self {
            View::Slice(view) => View::Slice(view.duplicate(deep)),
            View::Mosaic(view) => View::Mosaic(view.duplicate(deep)),
            View::Prism(view) => View::Prism(view.duplicate(deep)),
        }
    }

    fn element<T: Element>(&self, index: usize) -> T {
        with_view!(self, view => view.element(index))
    }

    fn read_region<T: Element>(&self, from: usize, buf: &mut [T]) -> usize {
        with_view!(self, view => view.read_region(from, buf))
    }

    fn materialize(&self) -> Materialized {
        with_view!(self, view => view.materialize())
    }

    fn subset(&self, indices: &Vector) -> Subset {
        with_view!(self, view => view.subset(indices))
    }

    fn inspect(&self) {
        with_view!(self, view => view.inspect())
    }
}

/// The materialization slot: empty until a consumer forces a contiguous
/// buffer, then holds the shared cell forever. Cloning the slot clones
/// the sharing handle (the shallow-duplicate contract); an unset slot
/// clones to an independent unset slot.
#[derive(Clone, Debug, Default)]
pub(crate) struct Slot(OnceCell<Materialized>);

impl Slot {
    pub(crate) fn get(&self) -> Option<&Materialized> {
        self.0.get()
    }

    pub(crate) fn is_set(&self) -> bool {
        self.0.get().is_some()
    }

    /// Installs the buffer on first call; every call returns the same
    /// cell.
    pub(crate) fn install_with(&self, fill: impl FnOnce() -> Vector) -> Materialized {
        self.0
            .get_or_init(|| Rc::new(RefCell::new(fill())))
            .clone()
    }

    /// An independent slot holding a copy of the buffer, if any.
    pub(crate) fn deep(&self) -> Slot {
        let slot = Slot::default();
        if let Some(cell) = self.0.get() {
            let copy = cell.borrow().clone();
            let _ = slot.0.set(Rc::new(RefCell::new(copy)));
        }
        slot
    }
}

pub(crate) fn check_viewable(source: &Vector) {
    let kind = source.element_type();
    assert!(kind.is_viewable(), "no viewport class for {kind} vectors");
}

/// Copies as much of `values[from..]` as fits into `buf`; returns the
/// count copied.
pub(crate) fn fill_region<T: Copy>(values: &[T], from: usize, buf: &mut [T]) -> usize {
    if from >= values.len() {
        return 0;
    }
    let filled = buf.len().min(values.len() - from);
    buf[..filled].copy_from_slice(&values[from..from + filled]);
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_installs_once() {
        let slot = Slot::default();
        let first = slot.install_with(|| Vector::Int(vec![1, 2]));
        let second = slot.install_with(|| Vector::Int(vec![9, 9]));
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(*first.borrow(), Vector::Int(vec![1, 2]));
    }

    #[test]
    fn slot_clone_shares_and_deep_copies() {
        let slot = Slot::default();
        let cell = slot.install_with(|| Vector::Int(vec![1]));

        let shallow = slot.clone();
        assert!(Rc::ptr_eq(shallow.get().unwrap(), &cell));

        let deep = slot.deep();
        assert!(!Rc::ptr_eq(deep.get().unwrap(), &cell));
        assert_eq!(*deep.get().unwrap().borrow(), Vector::Int(vec![1]));
    }

    #[test]
    fn unset_slot_clones_independently() {
        let slot = Slot::default();
        let other = slot.clone();
        slot.install_with(|| Vector::Int(vec![1]));
        assert!(!other.is_set());
    }

    #[test]
    fn region_fill_clamps() {
        let values = [1, 2, 3, 4, 5];
        let mut buf = [0; 3];
        assert_eq!(fill_region(&values, 3, &mut buf), 2);
        assert_eq!(&buf[..2], &[4, 5]);
        assert_eq!(fill_region(&values, 5, &mut buf), 0);
    }
}
