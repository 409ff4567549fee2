//! Numeric traits.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul};

/// Trait providing the additive identity.
pub trait Identities {
    fn zero() -> Self;
}

macro_rules! impl_float_identities {
    ($type:ty) => {
        impl Identities for $type {
            fn zero() -> Self {
                0.
            }
        }
    };
}

macro_rules! impl_int_identities {
    ($type:ty) => {
        impl Identities for $type {
            fn zero() -> Self {
                0
            }
        }
    };
}

impl_float_identities!(f32);
impl_float_identities!(f64);
impl_int_identities!(i32);
impl_int_identities!(i64);
impl_int_identities!(u32);
impl_int_identities!(u64);

/// Element type of a sparse matrix that can take part in a product.
///
/// Accumulation uses `+=` starting from [`Identities::zero`], so the order of
/// additions within a column is the order in which products are generated.
pub trait Element:
    Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + Add<Output = Self>
    + AddAssign
    + Mul<Output = Self>
    + Identities
    + 'static
{
}

impl<T> Element for T where
    T: Copy
        + Debug
        + PartialEq
        + Send
        + Sync
        + Add<Output = T>
        + AddAssign
        + Mul<Output = T>
        + Identities
        + 'static
{
}
