//! The five elementwise operations, as a runtime enum and as type-level tags.
//!
//! [`ArithOp`] names an operation for capability queries, errors and reports.
//! The tag types ([`AddOp`], [`SubtractOp`], ...) implement [`Operation`] for
//! any value type with the matching operator, so the same tag drives both the
//! scalar reference loop and the packed vector loop. A tag whose operator is
//! missing for a vector type (complex products on a backend without fused
//! multiply-add) simply does not implement `Operation` for it.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Identifies one of the five elementwise operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    UnaryMinus,
}

impl ArithOp {
    /// All operations, in declaration order.
    pub const ALL: [ArithOp; 5] = [
        ArithOp::Add,
        ArithOp::Subtract,
        ArithOp::Multiply,
        ArithOp::Divide,
        ArithOp::UnaryMinus,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Subtract => "subtract",
            ArithOp::Multiply => "multiply",
            ArithOp::Divide => "divide",
            ArithOp::UnaryMinus => "unary minus",
        }
    }

    /// Multiply and divide; the operations a backend may lack for complex lanes.
    pub const fn is_product(self) -> bool {
        matches!(self, ArithOp::Multiply | ArithOp::Divide)
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An elementwise operation applied to one output location.
///
/// Binary operations write `c = a op b`. [`UnaryMinusOp`] ignores `a` and `b`
/// and negates `c` in place.
pub trait Operation<V> {
    const OP: ArithOp;

    fn apply(a: &V, b: &V, c: &mut V);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AddOp;

#[derive(Debug, Clone, Copy, Default)]
pub struct SubtractOp;

#[derive(Debug, Clone, Copy, Default)]
pub struct MultiplyOp;

#[derive(Debug, Clone, Copy, Default)]
pub struct DivideOp;

#[derive(Debug, Clone, Copy, Default)]
pub struct UnaryMinusOp;

impl<V: Copy + Add<Output = V>> Operation<V> for AddOp {
    const OP: ArithOp = ArithOp::Add;

    #[inline(always)]
    fn apply(a: &V, b: &V, c: &mut V) {
        *c = *a + *b;
    }
}

impl<V: Copy + Sub<Output = V>> Operation<V> for SubtractOp {
    const OP: ArithOp = ArithOp::Subtract;

    #[inline(always)]
    fn apply(a: &V, b: &V, c: &mut V) {
        *c = *a - *b;
    }
}

impl<V: Copy + Mul<Output = V>> Operation<V> for MultiplyOp {
    const OP: ArithOp = ArithOp::Multiply;

    #[inline(always)]
    fn apply(a: &V, b: &V, c: &mut V) {
        *c = *a * *b;
    }
}

impl<V: Copy + Div<Output = V>> Operation<V> for DivideOp {
    const OP: ArithOp = ArithOp::Divide;

    #[inline(always)]
    fn apply(a: &V, b: &V, c: &mut V) {
        *c = *a / *b;
    }
}

impl<V: Copy + Neg<Output = V>> Operation<V> for UnaryMinusOp {
    const OP: ArithOp = ArithOp::UnaryMinus;

    #[inline(always)]
    fn apply(_a: &V, _b: &V, c: &mut V) {
        *c = -*c;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_driver_names() {
        let labels: Vec<&str> = ArithOp::ALL.iter().map(|op| op.label()).collect();
        assert_eq!(labels, ["add", "subtract", "multiply", "divide", "unary minus"]);
    }

    #[test]
    fn test_only_multiply_and_divide_are_products() {
        let products: Vec<ArithOp> = ArithOp::ALL
            .into_iter()
            .filter(|op| op.is_product())
            .collect();
        assert_eq!(products, [ArithOp::Multiply, ArithOp::Divide]);
    }

    #[test]
    fn test_tags_on_scalars() {
        let (a, b) = (6.0f64, 3.0f64);
        let mut c = 0.0;

        AddOp::apply(&a, &b, &mut c);
        assert_eq!(c, 9.0);
        SubtractOp::apply(&a, &b, &mut c);
        assert_eq!(c, 3.0);
        MultiplyOp::apply(&a, &b, &mut c);
        assert_eq!(c, 18.0);
        DivideOp::apply(&a, &b, &mut c);
        assert_eq!(c, 2.0);
        UnaryMinusOp::apply(&a, &b, &mut c);
        assert_eq!(c, -2.0);
    }

    #[test]
    fn test_tag_op_constants() {
        assert_eq!(<AddOp as Operation<f64>>::OP, ArithOp::Add);
        assert_eq!(<UnaryMinusOp as Operation<f32>>::OP, ArithOp::UnaryMinus);
    }
}
