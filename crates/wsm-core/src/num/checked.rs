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

//! Overflow-checked weight arithmetic.
//!
//! Every weight sum or product computed by the engine goes through one of the
//! helpers in this module. The `get_checked_*` variants return `None` when the
//! exact result is not representable; the `*_or_overflow` variants turn that
//! into an [`IntegerOverflow`] naming the operands.

use crate::num::ops::checked_arithmetic::{CheckedAddVal, CheckedMulVal};
use std::fmt::Display;
use thiserror::Error;

/// A weight computation whose exact result does not fit the integer type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("integer overflow evaluating {expression}")]
pub struct IntegerOverflow {
    expression: String,
}

impl IntegerOverflow {
    /// Creates an overflow error for the given expression text.
    #[inline]
    pub fn new<S>(expression: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            expression: expression.into(),
        }
    }

    /// Returns the offending expression, e.g. `"(200 + 100)"`.
    #[inline]
    pub fn expression(&self) -> &str {
        &self.expression
    }
}

/// Returns `x + y`, or `None` if the sum does not fit.
///
/// # Examples
///
/// ```rust
/// # use wsm_core::num::checked::get_checked_sum;
/// assert_eq!(get_checked_sum(250u8, 5), Some(255));
/// assert_eq!(get_checked_sum(250u8, 6), None);
/// ```
#[inline]
pub fn get_checked_sum<T>(x: T, y: T) -> Option<T>
where
    T: CheckedAddVal,
{
    x.checked_add_val(y)
}

/// Returns `x * y`, or `None` if the product does not fit.
///
/// # Examples
///
/// ```rust
/// # use wsm_core::num::checked::get_checked_product;
/// assert_eq!(get_checked_product(15u8, 17), Some(255));
/// assert_eq!(get_checked_product(16u8, 16), None);
/// ```
#[inline]
pub fn get_checked_product<T>(x: T, y: T) -> Option<T>
where
    T: CheckedMulVal,
{
    x.checked_mul_val(y)
}

/// Returns `x + y`, or an [`IntegerOverflow`] naming both operands.
#[inline]
pub fn get_sum_or_overflow<T>(x: T, y: T) -> Result<T, IntegerOverflow>
where
    T: CheckedAddVal + Copy + Display,
{
    get_checked_sum(x, y).ok_or_else(|| IntegerOverflow::new(format!("({x} + {y})")))
}

/// Returns `x * y`, or an [`IntegerOverflow`] naming both operands.
#[inline]
pub fn get_product_or_overflow<T>(x: T, y: T) -> Result<T, IntegerOverflow>
where
    T: CheckedMulVal + Copy + Display,
{
    get_checked_product(x, y).ok_or_else(|| IntegerOverflow::new(format!("({x} * {y})")))
}

/// Returns `Σ a_i * b_i` over the zipped sequences, or the first overflow hit.
///
/// # Examples
///
/// ```rust
/// # use wsm_core::num::checked::get_sum_of_products_or_overflow;
/// let total = get_sum_of_products_or_overflow([1u64, 2, 3], [4u64, 5, 6]).unwrap();
/// assert_eq!(total, 32);
/// ```
pub fn get_sum_of_products_or_overflow<T, A, B>(a: A, b: B) -> Result<T, IntegerOverflow>
where
    T: CheckedAddVal + CheckedMulVal + Copy + Display + num_traits::Zero,
    A: IntoIterator<Item = T>,
    B: IntoIterator<Item = T>,
{
    a.into_iter().zip(b).try_fold(T::zero(), |acc, (x, y)| {
        let product = get_product_or_overflow(x, y)?;
        get_sum_or_overflow(acc, product)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_sum_exhaustive_u8() {
        for x in 0..=u8::MAX {
            for y in 0..=u8::MAX {
                let exact = x as u32 + y as u32;
                let expected = if exact <= u8::MAX as u32 {
                    Some(exact as u8)
                } else {
                    None
                };
                assert_eq!(get_checked_sum(x, y), expected, "x={x}, y={y}");
            }
        }
    }

    #[test]
    fn test_checked_product_exhaustive_u8() {
        for x in 0..=u8::MAX {
            for y in 0..=u8::MAX {
                let exact = x as u32 * y as u32;
                let expected = if exact <= u8::MAX as u32 {
                    Some(exact as u8)
                } else {
                    None
                };
                assert_eq!(get_checked_product(x, y), expected, "x={x}, y={y}");
            }
        }
    }

    #[test]
    fn test_checked_sum_u16_boundary_for_every_x() {
        for x in 0..=u16::MAX {
            let room = u16::MAX - x;
            assert_eq!(get_checked_sum(x, room), Some(u16::MAX));
            if room > 0 {
                assert_eq!(get_checked_sum(x, room - 1), Some(u16::MAX - 1));
            }
            if x > 0 {
                assert_eq!(get_checked_sum(x, room + 1), None, "x={x}");
                assert_eq!(get_checked_sum(x, u16::MAX), None, "x={x}");
            }
        }
    }

    #[test]
    fn test_checked_product_u16_boundary_for_every_x() {
        for x in 1..=u16::MAX {
            let largest = u16::MAX / x;
            assert_eq!(
                get_checked_product(x, largest),
                Some(x * largest),
                "x={x}, y={largest}"
            );
            if largest < u16::MAX {
                assert_eq!(get_checked_product(x, largest + 1), None, "x={x}");
            }
            assert_eq!(get_checked_product(x, 0), Some(0));
            assert_eq!(get_checked_product(0, x), Some(0));
            assert_eq!(get_checked_product(x, 1), Some(x));
        }
    }

    #[test]
    fn test_or_overflow_variants_name_operands() {
        assert_eq!(get_sum_or_overflow(3u64, 4), Ok(7));
        assert_eq!(get_product_or_overflow(3u64, 4), Ok(12));

        let err = get_sum_or_overflow(u64::MAX, 1).unwrap_err();
        assert_eq!(err.expression(), format!("({} + 1)", u64::MAX));

        let err = get_product_or_overflow(200u8, 2).unwrap_err();
        assert_eq!(err.expression(), "(200 * 2)");
        assert_eq!(err.to_string(), "integer overflow evaluating (200 * 2)");
    }

    #[test]
    fn test_sum_of_products_reports_overflow() {
        assert_eq!(get_sum_of_products_or_overflow(Vec::<u8>::new(), vec![]), Ok(0));
        assert_eq!(get_sum_of_products_or_overflow([10u8, 10], [12u8, 13]), Ok(250));
        let err = get_sum_of_products_or_overflow([10u8, 10], [13u8, 13]).unwrap_err();
        assert_eq!(err.expression(), "(130 + 130)");
    }
}
