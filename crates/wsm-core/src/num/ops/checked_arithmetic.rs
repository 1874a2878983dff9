// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! By-value checked addition and multiplication.
//!
//! Weight code is generic over the unsigned width, so the primitive
//! `checked_add`/`checked_mul` methods are lifted into traits here. Both
//! return `None` exactly when the primitive method would.

use core::ops::{Add, Mul};

/// Checked addition that consumes both operands.
///
/// # Examples
///
/// ```rust
/// # use wsm_core::num::ops::checked_arithmetic::CheckedAddVal;
/// assert_eq!(200u8.checked_add_val(55), Some(255));
/// assert_eq!(200u8.checked_add_val(56), None);
/// ```
pub trait CheckedAddVal: Sized + Add<Self, Output = Self> {
    fn checked_add_val(self, v: Self) -> Option<Self>;
}

/// Checked multiplication that consumes both operands.
///
/// # Examples
///
/// ```rust
/// # use wsm_core::num::ops::checked_arithmetic::CheckedMulVal;
/// assert_eq!(17u8.checked_mul_val(15), Some(255));
/// assert_eq!(20u8.checked_mul_val(20), None);
/// ```
pub trait CheckedMulVal: Sized + Mul<Self, Output = Self> {
    fn checked_mul_val(self, v: Self) -> Option<Self>;
}

macro_rules! impl_checked_weight_ops {
    ($($t:ty),*) => {
        $(
            impl CheckedAddVal for $t {
                #[inline(always)]
                fn checked_add_val(self, v: $t) -> Option<$t> {
                    self.checked_add(v)
                }
            }

            impl CheckedMulVal for $t {
                #[inline(always)]
                fn checked_mul_val(self, v: $t) -> Option<$t> {
                    self.checked_mul(v)
                }
            }
        )*
    };
}

impl_checked_weight_ops!(u8, u16, u32, u64, u128, usize);

#[cfg(test)]
mod tests {
    use super::*;

    fn sum_all<T: CheckedAddVal + Copy>(values: &[T], zero: T) -> Option<T> {
        values
            .iter()
            .try_fold(zero, |acc, &value| acc.checked_add_val(value))
    }

    #[test]
    fn test_generic_sum_detects_overflow() {
        assert_eq!(sum_all(&[100u8, 100, 55], 0), Some(255));
        assert_eq!(sum_all(&[100u8, 100, 56], 0), None);
        assert_eq!(sum_all(&[u64::MAX - 1, 1], 0), Some(u64::MAX));
    }

    #[test]
    fn test_multiplication_matches_primitive() {
        for x in [0u32, 1, 65_535, 65_536, u32::MAX] {
            for y in [0u32, 1, 2, 65_535, 65_537] {
                assert_eq!(x.checked_mul_val(y), x.checked_mul(y), "x={x}, y={y}");
            }
        }
        assert_eq!(usize::MAX.checked_mul_val(1), Some(usize::MAX));
    }
}
