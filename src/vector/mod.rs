pub mod element;
pub mod index;

use paste::paste;

use element::{Complex, Element, ElementType, Handle, Logical};

/// A homogeneous vector of primitive elements, tagged by element type.
///
/// This is the storage every viewport reads through and every copy
/// utility produces. Sources are shared behind `Rc` and treated as
/// immutable for the lifetime of any view over them.
#[derive(Clone, Debug, PartialEq)]
pub enum Vector {
    Int(Vec<i32>),
    Real(Vec<f64>),
    Logical(Vec<Logical>),
    Raw(Vec<u8>),
    Complex(Vec<Complex>),
    Str(Vec<Handle>),
    Obj(Vec<Handle>),
}

/// A single NA-aware element carried between vectors of the same type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    Int(i32),
    Real(f64),
    Logical(Logical),
    Raw(u8),
    Complex(Complex),
    Str(Handle),
    Obj(Handle),
}

macro_rules! with_values {
    ($self:expr, $values:ident => $body:expr) => {
        match $self {
            Vector::Int($values) => $body,
            Vector::Real($values) => $body,
            Vector::Logical($values) => $body,
            Vector::Raw($values) => $body,
            Vector::Complex($values) => $body,
            Vector::Str($values) => $body,
            Vector::Obj($values) => $body,
        }
    };
}

macro_rules! typed_accessors {
    ($($name:ident: $ty:ty => $variant:ident,)+) => { paste! { $(
        /// Borrows the typed payload.
        ///
        /// # Panics
        /// If the vector holds a different element type.
        pub fn $name(&self) -> &[$ty] {
            match self {
                Vector::$variant(values) => values,
                other => panic!(
                    "expected a {} vector but found {}",
                    ElementType::$variant,
                    other.element_type()
                ),
            }
        }

        pub fn [<$name _mut>](&mut self) -> &mut [$ty] {
            match self {
                Vector::$variant(values) => values,
                other => panic!(
                    "expected a {} vector but found {}",
                    ElementType::$variant,
                    other.element_type()
                ),
            }
        }
    )+ } };
}

impl Vector {
    /// Allocates a zero-filled vector of the given element type.
    pub fn alloc(kind: ElementType, len: usize) -> Vector {
        match kind {
            ElementType::Int => Vector::Int(vec![0; len]),
            ElementType::Real => Vector::Real(vec![0.0; len]),
            ElementType::Logical => Vector::Logical(vec![Logical::FALSE; len]),
            ElementType::Raw => Vector::Raw(vec![0; len]),
            ElementType::Complex => Vector::Complex(vec![Complex::new(0.0, 0.0); len]),
            ElementType::Str => Vector::Str(vec![Handle::NA; len]),
            ElementType::Obj => Vector::Obj(vec![Handle(0); len]),
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            Vector::Int(_) => ElementType::Int,
            Vector::Real(_) => ElementType::Real,
            Vector::Logical(_) => ElementType::Logical,
            Vector::Raw(_) => ElementType::Raw,
            Vector::Complex(_) => ElementType::Complex,
            Vector::Str(_) => ElementType::Str,
            Vector::Obj(_) => ElementType::Obj,
        }
    }

    pub fn len(&self) -> usize {
        with_values!(self, values => values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads one element. Panics if `index` is out of bounds.
    pub fn get(&self, index: usize) -> Scalar {
        match self {
            Vector::Int(values) => Scalar::Int(values[index]),
            Vector::Real(values) => Scalar::Real(values[index]),
            Vector::Logical(values) => Scalar::Logical(values[index]),
            Vector::Raw(values) => Scalar::Raw(values[index]),
            Vector::Complex(values) => Scalar::Complex(values[index]),
            Vector::Str(values) => Scalar::Str(values[index]),
            Vector::Obj(values) => Scalar::Obj(values[index]),
        }
    }

    /// Writes one element.
    ///
    /// # Panics
    /// If the scalar's type differs from the vector's, or `index` is out
    /// of bounds.
    pub fn set(&mut self, index: usize, value: Scalar) {
        match (self, value) {
            (Vector::Int(values), Scalar::Int(value)) => values[index] = value,
            (Vector::Real(values), Scalar::Real(value)) => values[index] = value,
            (Vector::Logical(values), Scalar::Logical(value)) => values[index] = value,
            (Vector::Raw(values), Scalar::Raw(value)) => values[index] = value,
            (Vector::Complex(values), Scalar::Complex(value)) => values[index] = value,
            (Vector::Str(values), Scalar::Str(value)) => values[index] = value,
            (Vector::Obj(values), Scalar::Obj(value)) => values[index] = value,
            (vector, value) => panic!(
                "cannot store a {} scalar in a {} vector",
                value.element_type(),
                vector.element_type()
            ),
        }
    }

    /// Writes the element type's missing form. Raw vectors have none and
    /// receive zero; opaque object vectors have none at all.
    pub fn set_na(&mut self, index: usize) {
        match self {
            Vector::Int(values) => values[index] = i32::MIN,
            Vector::Real(values) => values[index] = f64::NAN,
            Vector::Logical(values) => values[index] = Logical::NA,
            Vector::Raw(values) => values[index] = 0,
            Vector::Complex(values) => values[index] = Complex::NA,
            Vector::Str(values) => values[index] = Handle::NA,
            Vector::Obj(_) => panic!("object vectors have no missing form"),
        }
    }

    /// Copies one element between two vectors of the same element type.
    pub fn copy_element(
        source: &Vector,
        source_index: usize,
        target: &mut Vector,
        target_index: usize,
    ) {
        let value = source.get(source_index);
        target.set(target_index, value);
    }

    pub fn values<T: Element>(&self) -> &[T] {
        T::values(self)
    }

    pub fn values_mut<T: Element>(&mut self) -> &mut [T] {
        T::values_mut(self)
    }

    typed_accessors! {
        ints: i32 => Int,
        reals: f64 => Real,
        logicals: Logical => Logical,
        raws: u8 => Raw,
        complexes: Complex => Complex,
        strs: Handle => Str,
    }
}

impl Scalar {
    pub fn element_type(self) -> ElementType {
        match self {
            Scalar::Int(_) => ElementType::Int,
            Scalar::Real(_) => ElementType::Real,
            Scalar::Logical(_) => ElementType::Logical,
            Scalar::Raw(_) => ElementType::Raw,
            Scalar::Complex(_) => ElementType::Complex,
            Scalar::Str(_) => ElementType::Str,
            Scalar::Obj(_) => ElementType::Obj,
        }
    }

    pub fn is_na(self) -> bool {
        match self {
            Scalar::Int(value) => value.is_na(),
            Scalar::Real(value) => value.is_na(),
            Scalar::Logical(value) => value.is_na(),
            Scalar::Raw(_) => false,
            Scalar::Complex(value) => value.is_na(),
            Scalar::Str(value) => value.is_na(),
            Scalar::Obj(_) => false,
        }
    }
}

impl From<Vec<i32>> for Vector {
    fn from(values: Vec<i32>) -> Self {
        Vector::Int(values)
    }
}

impl From<Vec<f64>> for Vector {
    fn from(values: Vec<f64>) -> Self {
        Vector::Real(values)
    }
}

impl From<Vec<u8>> for Vector {
    fn from(values: Vec<u8>) -> Self {
        Vector::Raw(values)
    }
}

impl From<Vec<Complex>> for Vector {
    fn from(values: Vec<Complex>) -> Self {
        Vector::Complex(values)
    }
}

impl From<Vec<Logical>> for Vector {
    fn from(values: Vec<Logical>) -> Self {
        Vector::Logical(values)
    }
}

impl From<Vec<bool>> for Vector {
    fn from(values: Vec<bool>) -> Self {
        Vector::Logical(values.into_iter().map(Logical::from).collect())
    }
}
