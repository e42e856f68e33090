use std::fmt;

use crate::vector::Vector;

/// Tag identifying the element type of a [`Vector`].
///
/// Viewports exist for the five primitive classes; `Str` and `Obj`
/// vectors only pass through the copy utilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    Int,
    Real,
    Logical,
    Raw,
    Complex,
    Str,
    Obj,
}

impl ElementType {
    pub fn name(self) -> &'static str {
        match self {
            ElementType::Int => "integer",
            ElementType::Real => "real",
            ElementType::Logical => "logical",
            ElementType::Raw => "raw",
            ElementType::Complex => "complex",
            ElementType::Str => "string",
            ElementType::Obj => "object",
        }
    }

    /// Whether a viewport can be constructed over vectors of this type.
    pub fn is_viewable(self) -> bool {
        !matches!(self, ElementType::Str | ElementType::Obj)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Three-valued truth stored as a 32-bit integer, with the integer
/// minimum as the missing sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Logical(i32);

impl Logical {
    pub const TRUE: Logical = Logical(1);
    pub const FALSE: Logical = Logical(0);
    pub const NA: Logical = Logical(i32::MIN);

    pub fn is_na(self) -> bool {
        self.0 == i32::MIN
    }

    pub fn is_true(self) -> bool {
        !self.is_na() && self.0 != 0
    }
}

impl From<bool> for Logical {
    fn from(value: bool) -> Self {
        if value { Logical::TRUE } else { Logical::FALSE }
    }
}

/// A complex number as a pair of doubles. Missing is NaN in either part.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const NA: Complex = Complex {
        re: f64::NAN,
        im: f64::NAN,
    };

    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub fn is_na(self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }
}

/// A handle to a heap object owned by the host runtime. The engine never
/// dereferences handles; it only moves them around.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle(pub u64);

impl Handle {
    /// The missing-string handle. Opaque object vectors have no missing
    /// form; this sentinel is meaningful for `Str` vectors only.
    pub const NA: Handle = Handle(u64::MAX);

    pub fn is_na(self) -> bool {
        self == Handle::NA
    }
}

/// A primitive element a viewport can be constructed over.
///
/// The associated tag keeps dispatch keyed by element type even on the
/// generic paths: [`Element::values`] insists the vector's tag matches.
pub trait Element: Copy + PartialEq + fmt::Debug + 'static {
    const KIND: ElementType;
    const NA: Self;

    fn is_na(self) -> bool;

    /// Borrows the typed payload of a vector of this element type.
    ///
    /// # Panics
    /// If the vector holds a different element type.
    fn values(vector: &Vector) -> &[Self];

    fn values_mut(vector: &mut Vector) -> &mut [Self];
}

macro_rules! elements {
    ($($ty:ty => $variant:ident, na: $na:expr, is_na: $is_na:expr;)+) => {
        $(
            impl Element for $ty {
                const KIND: ElementType = ElementType::$variant;
                const NA: Self = $na;

                fn is_na(self) -> bool {
                    ($is_na)(self)
                }

                fn values(vector: &Vector) -> &[Self] {
                    match vector {
                        Vector::$variant(values) => values,
                        other => panic!(
                            "expected a {} vector but found {}",
                            ElementType::$variant,
                            other.element_type()
                        ),
                    }
                }

                fn values_mut(vector: &mut Vector) -> &mut [Self] {
                    match vector {
                        Vector::$variant(values) => values,
                        other => panic!(
                            "expected a {} vector but found {}",
                            ElementType::$variant,
                            other.element_type()
                        ),
                    }
                }
            }
        )+
    };
}

elements! {
    i32 => Int, na: i32::MIN, is_na: |value: i32| value == i32::MIN;
    f64 => Real, na: f64::NAN, is_na: f64::is_nan;
    Logical => Logical, na: Logical::NA, is_na: Logical::is_na;
    u8 => Raw, na: 0, is_na: |_| false;
    Complex => Complex, na: Complex::NA, is_na: Complex::is_na;
}
