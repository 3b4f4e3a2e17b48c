//! `dtype` contains the closed set of element types this engine knows about
//! and the promotion algebra over them. Promotion is total: there is no
//! failure mode, only a deterministic winner dtype for any pair of inputs.

use std::fmt;

/// An element type tag. This is a closed set -- adding a variant
/// is a breaking change to the promotion table below, not an extension
/// point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float16,
    Float32,
    Float64,
}

impl DType {
    /// Size in bytes of one element.
    pub fn byte_size(self) -> usize {
        use DType::*;
        match self {
            Bool | Int8 | UInt8 => 1,
            Int16 | UInt16 | Float16 => 2,
            Int32 | UInt32 | Float32 => 4,
            Int64 | UInt64 | Float64 => 8,
        }
    }

    pub fn is_signed(self) -> bool {
        use DType::*;
        matches!(self, Int8 | Int16 | Int32 | Int64 | Float16 | Float32 | Float64)
    }

    pub fn is_integral(self) -> bool {
        use DType::*;
        matches!(self, Bool | Int8 | Int16 | Int32 | Int64 | UInt8 | UInt16 | UInt32 | UInt64)
    }

    pub fn is_floating(self) -> bool {
        !self.is_integral()
    }

    /// `true` for integer types whose full value range cannot be represented
    /// exactly by `float32` (rule 3).
    fn exceeds_f32_integer_range(self) -> bool {
        use DType::*;
        matches!(self, Int32 | Int64 | UInt32 | UInt64)
    }

    /// Integer "rank" used to pick the smallest integer type that contains
    /// both operands' value ranges (rule 4). Signed and unsigned
    /// of the same width are considered the same rank; ties between a
    /// signed and unsigned type of the same rank promote to the wider
    /// signed type so negative values remain representable.
    fn integer_rank(self) -> u8 {
        use DType::*;
        match self {
            Bool => 0,
            Int8 | UInt8 => 1,
            Int16 | UInt16 => 2,
            Int32 | UInt32 => 3,
            Int64 | UInt64 => 4,
            _ => unreachable!("integer_rank called on a floating dtype"),
        }
    }

    fn float_rank(self) -> u8 {
        use DType::*;
        match self {
            Float16 => 0,
            Float32 => 1,
            Float64 => 2,
            _ => unreachable!("float_rank called on an integral dtype"),
        }
    }

    /// `to_float(t)`: the real type used by ops (like `mean`) that must
    /// return a floating-point result regardless of the input's dtype.
    pub fn to_float(self) -> DType {
        use DType::*;
        match self {
            Bool | Int8 | UInt8 | Int16 | UInt16 | Float16 | Float32 => Float32,
            Int32 | UInt32 | Int64 | UInt64 | Float64 => Float64,
        }
    }

    pub fn name(self) -> &'static str {
        use DType::*;
        match self {
            Bool => "bool",
            Int8 => "int8",
            Int16 => "int16",
            Int32 => "int32",
            Int64 => "int64",
            UInt8 => "uint8",
            UInt16 => "uint16",
            UInt32 => "uint32",
            UInt64 => "uint64",
            Float16 => "float16",
            Float32 => "float32",
            Float64 => "float64",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `promote(a, b)`: the total dtype-promotion function used by every binary
/// op Rules are applied in order; the first that matches wins.
pub fn promote(a: DType, b: DType) -> DType {
    use DType::*;

    // Rule 1: float64 dominates everything.
    if a == Float64 || b == Float64 {
        return Float64;
    }

    // Rule 2/3: one side is float32.
    if a == Float32 || b == Float32 {
        let (float, other) = if a == Float32 { (a, b) } else { (b, a) };
        if other == Float32 {
            return Float32;
        }
        if other.is_floating() {
            // float16 vs float32 -> float32.
            return float;
        }
        // other is integral.
        if other.exceeds_f32_integer_range() {
            return Float64;
        }
        return Float32;
    }

    // Rule 2 continued: float16 with a small integer/bool promotes to float32;
    // float16 with float16 stays float16.
    if a == Float16 || b == Float16 {
        if a == Float16 && b == Float16 {
            return Float16;
        }
        let other = if a == Float16 { b } else { a };
        debug_assert!(other.is_integral());
        if other.exceeds_f32_integer_range() {
            return Float64;
        }
        return Float32;
    }

    // Rule 4/5: both integral (bool counts as unsigned width-1 here).
    let ra = a.integer_rank();
    let rb = b.integer_rank();

    if ra == rb && a.is_signed() != b.is_signed() {
        // Same width, mixed signedness: neither side's range contains the
        // other's (an i32 cannot hold u32's top half and vice versa), so the
        // result widens to the next integer width up, matching NumPy's
        // promote_types(int32, uint32) -> int64. At the top rank (64-bit)
        // there is no wider integer in this closed set, so it falls back to
        // float64, again matching NumPy's promote_types(int64, uint64).
        return match ra {
            1 => Int16,
            2 => Int32,
            3 => Int64,
            4 => Float64,
            _ => unreachable!("bool vs bool never has mixed signedness"),
        };
    }

    let rank = ra.max(rb);
    let signed = if ra == rb {
        a.is_signed()
    } else if ra > rb {
        a.is_signed()
    } else {
        b.is_signed()
    };

    match (rank, signed) {
        (0, _) => Bool,
        (1, false) => UInt8,
        (1, true) => Int8,
        (2, false) => UInt16,
        (2, true) => Int16,
        (3, false) => UInt32,
        (3, true) => Int32,
        (4, false) => UInt64,
        (4, true) => Int64,
        _ => unreachable!("integer rank is bounded to [0, 4]"),
    }
}

/// `float_promote(a, b)`: promotion restricted to the two floating dtypes
/// involved, used internally when both operands are already known floating
/// (kept private; `promote` is the public total function).
#[allow(dead_code)]
fn float_promote(a: DType, b: DType) -> DType {
    use DType::*;
    match a.float_rank().max(b.float_rank()) {
        0 => Float16,
        1 => Float32,
        _ => Float64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DType::*;

    #[test]
    fn float64_dominates() {
        assert_eq!(promote(Float64, Int8), Float64);
        assert_eq!(promote(Bool, Float64), Float64);
        assert_eq!(promote(Float32, Float64), Float64);
    }

    #[test]
    fn float32_with_small_integers() {
        assert_eq!(promote(Float32, Int16), Float32);
        assert_eq!(promote(Float32, UInt8), Float32);
        assert_eq!(promote(Bool, Float32), Float32);
    }

    #[test]
    fn float32_with_wide_integers_goes_to_float64() {
        assert_eq!(promote(Float32, Int32), Float64);
        assert_eq!(promote(Float32, Int64), Float64);
        assert_eq!(promote(UInt64, Float32), Float64);
    }

    #[test]
    fn integer_promotion_widens() {
        assert_eq!(promote(Int8, Int16), Int16);
        assert_eq!(promote(UInt8, UInt16), UInt16);
        assert_eq!(promote(Int32, Int64), Int64);
    }

    #[test]
    fn bool_is_unsigned_width_one() {
        assert_eq!(promote(Bool, Bool), Bool);
        assert_eq!(promote(Bool, UInt8), UInt8);
        assert_eq!(promote(Bool, Int8), Int8);
    }

    #[test]
    fn mixed_signedness_same_rank_widens() {
        assert_eq!(promote(Int8, UInt8), Int16);
        assert_eq!(promote(UInt16, Int16), Int32);
        assert_eq!(promote(Int32, UInt32), Int64);
        assert_eq!(promote(Int64, UInt64), Float64);
    }

    #[test]
    fn to_float_mapping() {
        assert_eq!(Bool.to_float(), Float32);
        assert_eq!(UInt8.to_float(), Float32);
        assert_eq!(Int8.to_float(), Float32);
        assert_eq!(Float16.to_float(), Float32);
        assert_eq!(Float32.to_float(), Float32);
        assert_eq!(Int32.to_float(), Float64);
        assert_eq!(UInt32.to_float(), Float64);
        assert_eq!(Int64.to_float(), Float64);
        assert_eq!(UInt64.to_float(), Float64);
        assert_eq!(Float64.to_float(), Float64);
    }

    #[test]
    fn promotion_is_commutative_over_the_closed_set() {
        let all = [
            Bool, Int8, Int16, Int32, Int64, UInt8, UInt16, UInt32, UInt64, Float16, Float32,
            Float64,
        ];
        for &a in &all {
            for &b in &all {
                assert_eq!(promote(a, b), promote(b, a), "promote({:?}, {:?})", a, b);
            }
        }
    }
}
