//! Binary math, unary math, conversions and `cmp*`.

use crate::{
    assembly::{BinaryOp, CmpKind, NumericKind, Operand, Register, UnaryOp},
    emulation::{ops, RegisterContext, Value},
    Result,
};

/// Binary math in register and literal forms.
#[derive(Clone, Debug)]
pub struct BinaryMathOp {
    pub(crate) op: BinaryOp,
    pub(crate) kind: NumericKind,
    pub(crate) dest: Register,
    pub(crate) lhs: Register,
    pub(crate) rhs: Operand,
}

impl BinaryMathOp {
    pub(crate) fn execute(&self, ctx: &mut RegisterContext) -> Result<()> {
        let lhs = ctx.read(self.lhs)?;
        let rhs = match self.rhs {
            Operand::Register(reg) => ctx.read(reg)?.clone(),
            Operand::Literal(value) => Value::int(value),
        };
        let result = ops::binary(self.op, self.kind, lhs, &rhs);
        ctx.write(self.dest, result)
    }
}

/// Negation, bitwise not and primitive conversions.
#[derive(Clone, Debug)]
pub struct UnaryMathOp {
    pub(crate) op: UnaryOp,
    pub(crate) dest: Register,
    pub(crate) src: Register,
}

impl UnaryMathOp {
    pub(crate) fn execute(&self, ctx: &mut RegisterContext) -> Result<()> {
        let result = ops::unary(self.op, ctx.read(self.src)?);
        ctx.write(self.dest, result)
    }
}

/// `cmpl-*`, `cmpg-*` and `cmp-long`.
#[derive(Clone, Debug)]
pub struct CmpOp {
    pub(crate) kind: CmpKind,
    pub(crate) dest: Register,
    pub(crate) lhs: Register,
    pub(crate) rhs: Register,
}

impl CmpOp {
    pub(crate) fn execute(&self, ctx: &mut RegisterContext) -> Result<()> {
        let result = ops::compare(self.kind, ctx.read(self.lhs)?, ctx.read(self.rhs)?);
        ctx.write(self.dest, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::TypeDescriptor;

    #[test]
    fn test_binary_literal_form() {
        let mut ctx = RegisterContext::new(2, 0);
        ctx.write(1, Value::int(10)).unwrap();
        BinaryMathOp {
            op: BinaryOp::Rsub,
            kind: NumericKind::Int,
            dest: 0,
            lhs: 1,
            rhs: Operand::Literal(3),
        }
        .execute(&mut ctx)
        .unwrap();
        assert_eq!(ctx.read(0).unwrap(), &Value::int(-7));
    }

    #[test]
    fn test_binary_unknown_operand() {
        let mut ctx = RegisterContext::new(3, 2);
        ctx.bind_parameter(0, Value::unknown(TypeDescriptor::int()))
            .unwrap();
        ctx.bind_parameter(1, Value::int(1)).unwrap();
        BinaryMathOp {
            op: BinaryOp::Add,
            kind: NumericKind::Int,
            dest: 0,
            lhs: 1,
            rhs: Operand::Register(2),
        }
        .execute(&mut ctx)
        .unwrap();
        assert_eq!(ctx.read(0).unwrap(), &Value::unknown(TypeDescriptor::int()));
    }

    #[test]
    fn test_unary_and_cmp() {
        let mut ctx = RegisterContext::new(3, 0);
        ctx.write(0, Value::int(65)).unwrap();
        UnaryMathOp {
            op: UnaryOp::IntToLong,
            dest: 1,
            src: 0,
        }
        .execute(&mut ctx)
        .unwrap();
        assert_eq!(ctx.read(1).unwrap(), &Value::long(65));

        ctx.write(2, Value::long(70)).unwrap();
        CmpOp {
            kind: CmpKind::CmpLong,
            dest: 0,
            lhs: 1,
            rhs: 2,
        }
        .execute(&mut ctx)
        .unwrap();
        assert_eq!(ctx.read(0).unwrap(), &Value::int(-1));
    }
}
