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

//! # WSM Core
//!
//! Foundational numerics and memory-reuse containers for the weighted
//! subgraph monomorphism engine.
//!
//! ## Modules
//!
//! - `num`: overflow-checked weight arithmetic (`get_checked_sum`,
//!   `get_checked_product` and their `*_or_overflow` counterparts returning
//!   [`IntegerOverflow`](num::checked::IntegerOverflow)), plus by-value checked
//!   and saturating arithmetic traits.
//! - `utils`: `LogicalStack<T>`, a stack whose popped slots keep their
//!   allocations, and `ReusableStorage<T>`, an object pool whose handles are
//!   consumed on release.
//!
//! ## Purpose
//!
//! No weight computed by the engine is ever silently wrapped, and the deep
//! push/pop traffic of the search tree runs without reallocating buffers.

pub mod num;
pub mod utils;
