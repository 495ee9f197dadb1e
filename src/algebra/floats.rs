#![allow(non_snake_case)]
use num_complex::Complex;
use num_traits::{Float, FromPrimitive, NumAssign, NumCast, One, PrimInt, Zero};
use std::fmt::{Debug, Display, LowerExp};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Host floating point types that can be written to and read from an engine.
///
/// Engine cells are always double precision.  Writing a host value casts it
/// to `f64` and reading casts back, so a host type wider than `f64` would be
/// narrowed.  Implementations are provided for `f32` and `f64`.
pub trait FloatT:
    'static + Copy + Float + NumAssign + FromPrimitive + Default + Display + LowerExp + Debug
{
    /// Convert to an engine cell value
    fn to_cell(self) -> f64;
    /// Convert from an engine cell value
    fn from_cell(v: f64) -> Self;
}

macro_rules! impl_FloatT {
    ($ty:ty) => {
        impl FloatT for $ty {
            #[inline]
            fn to_cell(self) -> f64 {
                self as f64
            }
            #[inline]
            fn from_cell(v: f64) -> Self {
                v as $ty
            }
        }
    };
}
impl_FloatT!(f32);
impl_FloatT!(f64);

/// Host integer types used for 0-based structural indices.
///
/// Values of this type are shifted by +1 on the way into the engine and by -1
/// on the way back, since engine indexing is 1-based.
pub trait IndexT: 'static + Copy + PrimInt + Debug + Display {
    /// Convert to an engine cell value, without the index shift
    fn to_cell(self) -> f64;
    /// Convert from an engine cell value, without the index shift.
    /// `None` if the cell is not an integer representable in `Self`.
    fn from_cell(v: f64) -> Option<Self>;

    /// 0-based host index to 1-based engine cell
    #[inline]
    fn to_engine_index(self) -> f64 {
        self.to_cell() + 1.0
    }

    /// 1-based engine cell to 0-based host index
    #[inline]
    fn from_engine_index(v: f64) -> Option<Self> {
        Self::from_cell(v - 1.0)
    }
}

macro_rules! impl_IndexT {
    ($ty:ty) => {
        impl IndexT for $ty {
            #[inline]
            fn to_cell(self) -> f64 {
                self as f64
            }
            #[inline]
            fn from_cell(v: f64) -> Option<Self> {
                if v.fract() != 0.0 {
                    return None;
                }
                <$ty as NumCast>::from(v)
            }
        }
    };
}
impl_IndexT!(u32);
impl_IndexT!(u64);
impl_IndexT!(usize);
impl_IndexT!(i32);
impl_IndexT!(i64);

/// Values stored in engine cells: real or complex doubles.
///
/// Used by [`CscMatrix`](crate::algebra::CscMatrix) and by the reference
/// engine's arithmetic so that real and complex data share one code path.
pub trait Scalar:
    'static
    + Copy
    + Debug
    + PartialEq
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
{
    /// build from real and imaginary parts.  Real types drop `im`.
    fn from_parts(re: f64, im: f64) -> Self;
    fn re(&self) -> f64;
    fn im(&self) -> f64;
    /// absolute value (complex modulus)
    fn modulus(&self) -> f64;
    fn is_finite(&self) -> bool;
}

impl Scalar for f64 {
    #[inline]
    fn from_parts(re: f64, _im: f64) -> Self {
        re
    }
    #[inline]
    fn re(&self) -> f64 {
        *self
    }
    #[inline]
    fn im(&self) -> f64 {
        0.0
    }
    #[inline]
    fn modulus(&self) -> f64 {
        self.abs()
    }
    #[inline]
    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }
}

impl Scalar for Complex<f64> {
    #[inline]
    fn from_parts(re: f64, im: f64) -> Self {
        Complex::new(re, im)
    }
    #[inline]
    fn re(&self) -> f64 {
        self.re
    }
    #[inline]
    fn im(&self) -> f64 {
        self.im
    }
    #[inline]
    fn modulus(&self) -> f64 {
        self.norm()
    }
    #[inline]
    fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}
