use std::rc::Rc;

use crate::trace::trace_hook;
use crate::vector::element::{Element, ElementType};
use crate::vector::{index, Vector};
use crate::view::{check_viewable, fill_region, Materialized, Slot, Subset, Viewport};

/// An arbitrary permutation of source positions held as an explicit
/// 1-based index vector. Repeats and any order are allowed, and missing
/// entries read back as the element type's missing form.
#[derive(Debug)]
pub struct Prism {
    source: Rc<Vector>,
    indices: Rc<Vector>,
    materialized: Slot,
}

impl Prism {
    /// Wraps an index vector. Every entry must be NA or within the
    /// source.
    pub fn new(source: Rc<Vector>, indices: Vector) -> Self {
        check_viewable(&source);
        index::check_index_type(&indices);
        let n = source.len() as i64;
        for at in 0..indices.len() {
            if let Some(value) = index::index_value(&indices, at) {
                assert!(
                    value >= 1 && value <= n,
                    "cannot use these indices with this source: out of range"
                );
            }
        }
        trace_hook!("prism.new", "indices: {}", indices.len());
        Self {
            source,
            indices: Rc::new(indices),
            materialized: Slot::default(),
        }
    }

    pub fn source(&self) -> &Rc<Vector> {
        &self.source
    }

    pub fn indices(&self) -> &Vector {
        &self.indices
    }

    /// Composes screened logical indices with this prism's own index
    /// vector; NA carries through from either side.
    fn compose(&self, screened: &Vector) -> Vector {
        let screened = screened.reals();
        let mut translated = vec![f64::NAN; screened.len()];
        for (at, &value) in screened.iter().enumerate() {
            if value.is_nan() {
                continue;
            }
            if let Some(position) = index::index_value(&self.indices, value as usize - 1) {
                translated[at] = position as f64;
            }
        }
        Vector::Real(translated)
    }
}

impl Viewport for Prism {
    fn len(&self) -> usize {
        self.indices.len()
    }

    fn element_type(&self) -> ElementType {
        self.source.element_type()
    }

    fn is_materialized(&self) -> bool {
        self.materialized.is_set()
    }

    fn duplicate(&self, deep: bool) -> Self {
        trace_hook!("prism.duplicate", "deep: {deep}");
        Self {
            source: Rc::clone(&self.source),
            indices: if deep {
                Rc::new((*self.indices).clone())
            } else {
                Rc::clone(&self.indices)
            },
            materialized: if deep {
                self.materialized.deep()
            } else {
                self.materialized.clone()
            },
        }
    }

    fn element<T: Element>(&self, index: usize) -> T {
        trace_hook!("prism.element", "index: {index}");
        if let Some(cell) = self.materialized.get() {
            let data = cell.borrow();
            return T::values(&data)[index];
        }
        match index::index_value(&self.indices, index) {
            None => T::NA,
            Some(position) => T::values(&self.source)[(position - 1) as usize],
        }
    }

    fn read_region<T: Element>(&self, from: usize, buf: &mut [T]) -> usize {
        trace_hook!("prism.read_region", "from: {from}, len: {}", buf.len());
        let cell = self.materialize();
        let data = cell.borrow();
        fill_region(T::values(&data), from, buf)
    }

    fn materialize(&self) -> Materialized {
        trace_hook!("prism.materialize", "already: {}", self.is_materialized());
        self.materialized
            .install_with(|| index::gather(&self.source, &self.indices))
    }

    fn subset(&self, indices: &Vector) -> Subset {
        index::check_index_type(indices);
        trace_hook!("prism.subset", "indices: {}", indices.len());

        if indices.is_empty() {
            return Subset::Copied(Vector::alloc(self.element_type(), 0));
        }

        let screened = index::screen(indices, self.len());

        if let Some(cell) = self.materialized.get() {
            return Subset::Copied(index::gather(&cell.borrow(), &screened));
        }

        let translated = self.compose(&screened);

        if !index::has_na(&screened) {
            return Subset::Copied(index::gather(&self.source, &translated));
        }

        // Missing entries keep the composition lazy; prisms never refine
        // to mosaics or slices, whatever shape the indices happen to
        // take.
        Subset::Prism(Prism::new(Rc::clone(&self.source), translated))
    }

    fn inspect(&self) {
        tracing::debug!(
            kind = "prism",
            element_type = %self.element_type(),
            size = self.indices.len(),
            index_type = %self.indices.element_type(),
            materialized = self.is_materialized(),
            source_len = self.source.len(),
            "viewport"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewportKind;

    fn source() -> Rc<Vector> {
        Rc::new(Vector::Int(vec![10, 20, 30, 40]))
    }

    #[test]
    fn permutation_reads_through() {
        let prism = Prism::new(source(), Vector::Int(vec![4, 1, i32::MIN, 2]));
        assert_eq!(prism.len(), 4);
        assert_eq!(prism.element::<i32>(0), 40);
        assert_eq!(prism.element::<i32>(1), 10);
        assert!(prism.element::<i32>(2).is_na());
        assert_eq!(prism.element::<i32>(3), 20);
    }

    #[test]
    fn real_indices_carry_missing() {
        let prism = Prism::new(source(), Vector::Real(vec![2.0, f64::NAN]));
        assert_eq!(prism.element::<i32>(0), 20);
        assert!(prism.element::<i32>(1).is_na());
    }

    #[test]
    fn repeats_and_disorder_are_allowed() {
        let prism = Prism::new(source(), Vector::Int(vec![3, 3, 1]));
        assert_eq!(prism.element::<i32>(0), 30);
        assert_eq!(prism.element::<i32>(1), 30);
        assert_eq!(prism.element::<i32>(2), 10);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_index_is_fatal() {
        Prism::new(source(), Vector::Int(vec![1, 5]));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn zero_index_is_fatal() {
        Prism::new(source(), Vector::Int(vec![0]));
    }

    #[test]
    fn materialization_gathers_with_missing() {
        let prism = Prism::new(source(), Vector::Int(vec![4, i32::MIN, 2]));
        let cell = prism.materialize();
        {
            let data = cell.borrow();
            assert_eq!(data.len(), 3);
            assert_eq!(data.ints()[0], 40);
            assert!(data.get(1).is_na());
            assert_eq!(data.ints()[2], 20);
        }

        let again = prism.materialize();
        assert!(Rc::ptr_eq(&cell, &again));
    }

    #[test]
    fn region_read_materializes() {
        let prism = Prism::new(source(), Vector::Int(vec![2, 4, 1]));
        let mut buf = [0; 4];
        assert_eq!(prism.read_region(1, &mut buf), 2);
        assert_eq!(&buf[..2], &[40, 10]);
        assert!(prism.is_materialized());
    }

    #[test]
    fn real_sources_read_through_the_real_accessor() {
        let source = Rc::new(Vector::Real(vec![1.5, 2.5, 3.5]));
        let prism = Prism::new(Rc::clone(&source), Vector::Int(vec![3, 1]));
        assert_eq!(prism.element::<f64>(0), 3.5);

        // the buffer keeps reading through the real accessor too
        prism.materialize();
        assert_eq!(prism.element::<f64>(0), 3.5);
        assert_eq!(prism.element::<f64>(1), 1.5);
    }

    #[test]
    fn na_free_subset_copies() {
        let source = Rc::new(Vector::Int(vec![1, 2, 3, 4, 5]));
        let prism = Prism::new(source, Vector::Int(vec![5, 5, 5]));
        let subset = prism.subset(&Vector::Int(vec![1, 2]));
        assert_eq!(subset.kind(), None);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.element::<i32>(0), 5);
        assert_eq!(subset.element::<i32>(1), 5);
    }

    #[test]
    fn missing_subset_index_composes_to_a_prism() {
        let prism = Prism::new(source(), Vector::Int(vec![4, 1, 2]));
        let subset = prism.subset(&Vector::Int(vec![3, i32::MIN, 1]));
        assert_eq!(subset.kind(), Some(ViewportKind::Prism));
        assert_eq!(subset.element::<i32>(0), 20);
        assert!(subset.element::<i32>(1).is_na());
        assert_eq!(subset.element::<i32>(2), 40);
    }

    #[test]
    fn out_of_range_subset_index_screens_then_composes() {
        let prism = Prism::new(source(), Vector::Int(vec![4, 1]));
        let subset = prism.subset(&Vector::Int(vec![9, 2]));
        assert_eq!(subset.kind(), Some(ViewportKind::Prism));
        assert!(subset.element::<i32>(0).is_na());
        assert_eq!(subset.element::<i32>(1), 10);
    }

    #[test]
    fn missing_prism_entries_carry_into_the_composition() {
        let prism = Prism::new(source(), Vector::Int(vec![i32::MIN, 3]));
        // screened is NA-free, but the composed index inherits the
        // prism's own missing entry and gathers it as missing
        let subset = prism.subset(&Vector::Int(vec![1, 2]));
        assert_eq!(subset.kind(), None);
        assert!(subset.element::<i32>(0).is_na());
        assert_eq!(subset.element::<i32>(1), 30);
    }

    #[test]
    fn materialized_subset_gathers_from_the_buffer() {
        let prism = Prism::new(source(), Vector::Int(vec![2, 3]));
        prism.materialize().borrow_mut().ints_mut()[0] = 99;

        let subset = prism.subset(&Vector::Int(vec![1, i32::MIN]));
        assert_eq!(subset.kind(), None);
        assert_eq!(subset.element::<i32>(0), 99);
        assert!(subset.element::<i32>(1).is_na());
    }

    #[test]
    fn empty_subset_is_an_empty_vector() {
        let prism = Prism::new(source(), Vector::Int(vec![1, 2]));
        let subset = prism.subset(&Vector::Int(vec![]));
        assert_eq!(subset.kind(), None);
        assert_eq!(subset.len(), 0);
    }

    #[test]
    fn deep_duplicate_owns_indices_and_buffer() {
        let prism = Prism::new(source(), Vector::Int(vec![2, 3]));
        prism.materialize();

        let deep = prism.duplicate(true);
        deep.materialize().borrow_mut().ints_mut()[0] = -1;

        assert_eq!(prism.element::<i32>(0), 20);
        assert!(!Rc::ptr_eq(&prism.indices, &deep.indices));
        assert_eq!(*prism.indices, *deep.indices);
    }

    #[test]
    fn shallow_duplicate_shares_indices_and_buffer() {
        let prism = Prism::new(source(), Vector::Int(vec![2, 3]));
        prism.materialize();

        let shallow = prism.duplicate(false);
        assert!(Rc::ptr_eq(&prism.indices, &shallow.indices));

        shallow.materialize().borrow_mut().ints_mut()[0] = -1;
        assert_eq!(prism.element::<i32>(0), -1);
    }
}
