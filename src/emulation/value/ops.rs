//! Arithmetic on abstract values.
//!
//! Operations follow Dalvik/Java semantics on known operands: wrapping integer
//! arithmetic, shift distances masked to the operand width, IEEE float arithmetic and
//! saturating float-to-integer conversions. Unknown operands produce unknown results of
//! the operation's result type. Integer division or remainder by zero throws on a real
//! device; the result here is unknown.

use std::cmp::Ordering;

use crate::{
    assembly::{BinaryOp, CmpKind, NumericKind, UnaryOp},
    emulation::value::{Payload, Value},
    metadata::TypeDescriptor,
};

/// Evaluates a binary math instruction.
///
/// # Examples
///
/// ```rust
/// use smaliscope::assembly::{BinaryOp, NumericKind};
/// use smaliscope::emulation::{ops, Value};
///
/// let sum = ops::binary(BinaryOp::Add, NumericKind::Int, &Value::int(i32::MAX), &Value::int(1));
/// assert_eq!(sum, Value::int(i32::MIN));
///
/// let div = ops::binary(BinaryOp::Div, NumericKind::Int, &Value::int(1), &Value::int(0));
/// assert!(div.is_unknown());
/// ```
#[must_use]
pub fn binary(op: BinaryOp, kind: NumericKind, lhs: &Value, rhs: &Value) -> Value {
    let ty = kind.type_descriptor();
    let (Some(a), Some(b)) = (lhs.payload(), rhs.payload()) else {
        return Value::unknown(ty);
    };

    let result = match kind {
        NumericKind::Int => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => int_op(op, a as i32, b as i32).map(Value::int),
            _ => None,
        },
        NumericKind::Long => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => long_op(op, a, b).map(Value::long),
            _ => None,
        },
        NumericKind::Float => match (a.as_f32_bits(), b.as_f32_bits()) {
            (Some(a), Some(b)) => float_op(op, f64::from(a), f64::from(b)).map(|v| Value::float(v as f32)),
            _ => None,
        },
        NumericKind::Double => match (a.as_f64_bits(), b.as_f64_bits()) {
            (Some(a), Some(b)) => float_op(op, a, b).map(Value::double),
            _ => None,
        },
    };

    result.unwrap_or(Value::unknown(ty))
}

fn int_op(op: BinaryOp, a: i32, b: i32) -> Option<i32> {
    Some(match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Rsub => b.wrapping_sub(a),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div => a.checked_div(b).or_else(|| (b == -1).then_some(a.wrapping_neg()))?,
        BinaryOp::Rem => a.checked_rem(b).or_else(|| (b == -1).then_some(0))?,
        BinaryOp::And => a & b,
        BinaryOp::Or => a | b,
        BinaryOp::Xor => a ^ b,
        BinaryOp::Shl => a.wrapping_shl(b as u32 & 0x1f),
        BinaryOp::Shr => a.wrapping_shr(b as u32 & 0x1f),
        BinaryOp::Ushr => ((a as u32) >> (b as u32 & 0x1f)) as i32,
    })
}

fn long_op(op: BinaryOp, a: i64, b: i64) -> Option<i64> {
    Some(match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Rsub => b.wrapping_sub(a),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div => a.checked_div(b).or_else(|| (b == -1).then_some(a.wrapping_neg()))?,
        BinaryOp::Rem => a.checked_rem(b).or_else(|| (b == -1).then_some(0))?,
        BinaryOp::And => a & b,
        BinaryOp::Or => a | b,
        BinaryOp::Xor => a ^ b,
        BinaryOp::Shl => a.wrapping_shl(b as u32 & 0x3f),
        BinaryOp::Shr => a.wrapping_shr(b as u32 & 0x3f),
        BinaryOp::Ushr => ((a as u64) >> (b as u32 & 0x3f)) as i64,
    })
}

fn float_op(op: BinaryOp, a: f64, b: f64) -> Option<f64> {
    match op {
        BinaryOp::Add => Some(a + b),
        BinaryOp::Sub => Some(a - b),
        BinaryOp::Rsub => Some(b - a),
        BinaryOp::Mul => Some(a * b),
        BinaryOp::Div => Some(a / b),
        BinaryOp::Rem => Some(a % b),
        _ => None,
    }
}

/// Evaluates a unary math or conversion instruction.
///
/// ```rust
/// use smaliscope::assembly::UnaryOp;
/// use smaliscope::emulation::{ops, Value};
///
/// assert_eq!(ops::unary(UnaryOp::FloatToInt, &Value::float(f32::NAN)), Value::int(0));
/// assert_eq!(ops::unary(UnaryOp::DoubleToInt, &Value::double(1e20)), Value::int(i32::MAX));
/// ```
#[must_use]
pub fn unary(op: UnaryOp, src: &Value) -> Value {
    let ty = op.result_type();
    let Some(payload) = src.payload() else {
        return Value::unknown(ty);
    };

    let int = payload.as_i64();
    let long = payload.as_i64();
    let float = payload.as_f32_bits();
    let double = payload.as_f64_bits();

    let result = match op {
        UnaryOp::NegInt => int.map(|v| Payload::Int((v as i32).wrapping_neg())),
        UnaryOp::NotInt => int.map(|v| Payload::Int(!(v as i32))),
        UnaryOp::NegLong => long.map(|v| Payload::Long(v.wrapping_neg())),
        UnaryOp::NotLong => long.map(|v| Payload::Long(!v)),
        UnaryOp::NegFloat => float.map(|v| Payload::Float(-v)),
        UnaryOp::NegDouble => double.map(|v| Payload::Double(-v)),
        UnaryOp::IntToLong => int.map(|v| Payload::Long(i64::from(v as i32))),
        UnaryOp::IntToFloat => int.map(|v| Payload::Float(v as i32 as f32)),
        UnaryOp::IntToDouble => int.map(|v| Payload::Double(f64::from(v as i32))),
        UnaryOp::LongToInt => long.map(|v| Payload::Int(v as i32)),
        UnaryOp::LongToFloat => long.map(|v| Payload::Float(v as f32)),
        UnaryOp::LongToDouble => long.map(|v| Payload::Double(v as f64)),
        UnaryOp::FloatToInt => float.map(|v| Payload::Int(v as i32)),
        UnaryOp::FloatToLong => float.map(|v| Payload::Long(v as i64)),
        UnaryOp::FloatToDouble => float.map(|v| Payload::Double(f64::from(v))),
        UnaryOp::DoubleToInt => double.map(|v| Payload::Int(v as i32)),
        UnaryOp::DoubleToLong => double.map(|v| Payload::Long(v as i64)),
        UnaryOp::DoubleToFloat => double.map(|v| Payload::Float(v as f32)),
        UnaryOp::IntToByte => int.map(|v| Payload::Byte(v as i8)),
        UnaryOp::IntToChar => int.map(|v| Payload::Char(v as u16)),
        UnaryOp::IntToShort => int.map(|v| Payload::Short(v as i16)),
    };

    match result {
        Some(payload) => Value::known(ty, payload),
        None => Value::unknown(ty),
    }
}

/// Evaluates a `cmp*` instruction into an `int` of -1, 0 or 1.
///
/// The `cmpl` forms produce -1 and the `cmpg` forms 1 when either operand is NaN.
#[must_use]
pub fn compare(kind: CmpKind, lhs: &Value, rhs: &Value) -> Value {
    let (Some(a), Some(b)) = (lhs.payload(), rhs.payload()) else {
        return Value::unknown(TypeDescriptor::int());
    };

    let ordering = match kind {
        CmpKind::CmpLong => a.as_i64().zip(b.as_i64()).map(|(a, b)| Some(a.cmp(&b))),
        CmpKind::CmplFloat | CmpKind::CmpgFloat => a
            .as_f32_bits()
            .zip(b.as_f32_bits())
            .map(|(a, b)| a.partial_cmp(&b)),
        CmpKind::CmplDouble | CmpKind::CmpgDouble => a
            .as_f64_bits()
            .zip(b.as_f64_bits())
            .map(|(a, b)| a.partial_cmp(&b)),
    };

    let Some(ordering) = ordering else {
        return Value::unknown(TypeDescriptor::int());
    };

    let result = match ordering {
        Some(Ordering::Less) => -1,
        Some(Ordering::Equal) => 0,
        Some(Ordering::Greater) => 1,
        None if matches!(kind, CmpKind::CmplFloat | CmpKind::CmplDouble) => -1,
        None => 1,
    };
    Value::int(result)
}
