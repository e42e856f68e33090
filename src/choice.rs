//! Picks the cheapest viewport kind able to represent a selector
//! exactly.

use std::rc::Rc;

use crate::vector::{index, Vector};
use crate::view::{Mosaic, Prism, Slice, View, ViewportKind};

/// Classifies a 1-based selector by structural form, mirroring the
/// composition rules: contiguous runs narrow to slices, strictly
/// increasing selections pack into mosaics, and anything else (repeats,
/// disorder, or missing entries) needs an explicit index vector.
pub fn recommend(indices: &Vector) -> ViewportKind {
    index::check_index_type(indices);
    if index::has_na(indices) {
        return ViewportKind::Prism;
    }
    if index::is_contiguous(indices) {
        return ViewportKind::Slice;
    }
    if index::is_monotonic(indices) {
        return ViewportKind::Mosaic;
    }
    ViewportKind::Prism
}

/// Builds the recommended representation of `indices` over `source`.
pub fn best_view(source: Rc<Vector>, indices: &Vector) -> View {
    if indices.is_empty() {
        return View::Slice(Slice::new(source, 0, 0));
    }
    match recommend(indices) {
        ViewportKind::Slice => {
            let start = index::first_as_length(indices) - 1;
            View::Slice(Slice::new(source, start, indices.len()))
        }
        ViewportKind::Mosaic => View::Mosaic(Mosaic::from_selector(source, indices)),
        ViewportKind::Prism => View::Prism(Prism::new(source, indices.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Viewport;

    #[test]
    fn classification_by_structural_form() {
        assert_eq!(
            recommend(&Vector::Int(vec![3, 4, 5])),
            ViewportKind::Slice
        );
        assert_eq!(
            recommend(&Vector::Int(vec![1, 4, 5])),
            ViewportKind::Mosaic
        );
        assert_eq!(
            recommend(&Vector::Int(vec![5, 4, 1])),
            ViewportKind::Prism
        );
        assert_eq!(
            recommend(&Vector::Int(vec![1, 1, 2])),
            ViewportKind::Prism
        );
        // a missing entry forces the index-vector representation even
        // when the rest is ordered
        assert_eq!(
            recommend(&Vector::Int(vec![1, i32::MIN, 4])),
            ViewportKind::Prism
        );
    }

    #[test]
    fn best_view_reads_like_the_gather() {
        let source = Rc::new(Vector::Int(vec![10, 20, 30, 40, 50]));

        let slice = best_view(Rc::clone(&source), &Vector::Int(vec![2, 3, 4]));
        assert_eq!(slice.kind(), ViewportKind::Slice);
        assert_eq!(slice.element::<i32>(0), 20);

        let mosaic = best_view(Rc::clone(&source), &Vector::Int(vec![2, 5]));
        assert_eq!(mosaic.kind(), ViewportKind::Mosaic);
        assert_eq!(mosaic.element::<i32>(1), 50);

        let prism = best_view(Rc::clone(&source), &Vector::Int(vec![5, 5]));
        assert_eq!(prism.kind(), ViewportKind::Prism);
        assert_eq!(prism.element::<i32>(0), 50);
    }

    #[test]
    fn empty_selector_is_an_empty_slice() {
        let source = Rc::new(Vector::Int(vec![1, 2]));
        let view = best_view(source, &Vector::Int(vec![]));
        assert_eq!(view.kind(), ViewportKind::Slice);
        assert_eq!(view.len(), 0);
    }
}
