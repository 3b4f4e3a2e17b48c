//! A pared-down compile-time overlay: a reduced compile-time layer limited
//! to rank and element type, not a full type-level shape-equality/broadcast
//! system -- this engine's runtime `Shape`/`ShapeError` values already cover
//! those questions. `TypedShape<T, N>` only ever asserts a tensor's rank at
//! the type level; every other shape question (broadcast compatibility,
//! reshape validity, …) still goes through the runtime `shape` module.

use generic_array::{ArrayLength, GenericArray};
use std::marker::PhantomData;
use typenum::Unsigned;

/// A dimension sequence whose *length* (rank), but not its values, is known
/// at compile time, tagged with the element type it describes.
#[derive(Debug, Clone)]
pub struct TypedShape<T, N: ArrayLength<usize>> {
    dims: GenericArray<usize, N>,
    _dtype: PhantomData<T>,
}

impl<T, N: ArrayLength<usize>> TypedShape<T, N> {
    /// The rank, read off the type parameter rather than the value.
    pub fn rank() -> usize {
        N::to_usize()
    }

    /// Builds a `TypedShape` from a slice whose length must equal `N`.
    /// Mismatched lengths are a genuine programmer error (the whole point
    /// of `N` is to make the rank a compile-time fact), so this panics
    /// rather than returning a `ShapeError`, matching the convention static-
    /// shape constructors elsewhere in this crate's lineage use.
    pub fn from_slice(dims: &[usize]) -> Self {
        assert_eq!(
            dims.len(),
            Self::rank(),
            "TypedShape<_, N> requires exactly N dims, got {}",
            dims.len()
        );
        TypedShape {
            dims: GenericArray::clone_from_slice(dims),
            _dtype: PhantomData,
        }
    }

    /// Drops the compile-time rank tag, producing the runtime `Shape` every
    /// other module in this crate operates on.
    pub fn to_shape(&self) -> crate::shape::Shape {
        self.dims.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;
    use typenum::U3;

    #[test]
    fn rank_is_read_from_the_type_parameter() {
        assert_eq!(TypedShape::<f32, U3>::rank(), 3);
    }

    #[test]
    fn to_shape_drops_to_a_runtime_vec() {
        let typed = TypedShape::<DType, U3>::from_slice(&[2, 3, 4]);
        assert_eq!(typed.to_shape(), vec![2, 3, 4]);
    }

    #[test]
    #[should_panic(expected = "requires exactly N dims")]
    fn mismatched_length_panics() {
        TypedShape::<f32, U3>::from_slice(&[2, 3]);
    }
}
