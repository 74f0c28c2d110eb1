//! Constants, moves, returns and opcodes without a model.

use crate::{
    assembly::{Literal, Register},
    emulation::{RegisterContext, Value},
    Result,
};

/// `const*`: writes a literal.
#[derive(Clone, Debug)]
pub struct ConstOp {
    pub(crate) dest: Register,
    pub(crate) value: Value,
}

impl ConstOp {
    pub(crate) fn new(dest: Register, literal: &Literal) -> Self {
        ConstOp {
            dest,
            value: Value::from_literal(literal),
        }
    }

    pub(crate) fn execute(&self, ctx: &mut RegisterContext) -> Result<()> {
        ctx.write(self.dest, self.value.clone())
    }
}

/// `move*`: copies a register.
#[derive(Clone, Debug)]
pub struct MoveOp {
    pub(crate) dest: Register,
    pub(crate) src: Register,
}

impl MoveOp {
    pub(crate) fn execute(&self, ctx: &mut RegisterContext) -> Result<()> {
        let value = ctx.read(self.src)?.clone();
        ctx.write(self.dest, value)
    }
}

/// `return*`: copies the returned register into the return slot.
#[derive(Clone, Debug)]
pub struct ReturnOp {
    pub(crate) src: Option<Register>,
}

impl ReturnOp {
    pub(crate) fn execute(&self, ctx: &mut RegisterContext) -> Result<()> {
        match self.src {
            Some(src) => {
                let value = ctx.read(src)?.clone();
                ctx.set_return(value);
            }
            None => ctx.clear_return(),
        }
        Ok(())
    }
}

/// `throw`: leaves the method; only the operand is checked.
#[derive(Clone, Debug)]
pub struct ThrowOp {
    pub(crate) src: Register,
}

impl ThrowOp {
    pub(crate) fn execute(&self, ctx: &mut RegisterContext) -> Result<()> {
        ctx.read(self.src).map(|_| ())
    }
}

/// An opcode without a model. Every register it defines becomes unknown.
#[derive(Clone, Debug)]
pub struct UnhandledOp {
    pub(crate) mnemonic: String,
    pub(crate) clobbers: Vec<Register>,
}

impl UnhandledOp {
    pub(crate) fn execute(&self, ctx: &mut RegisterContext) -> Result<()> {
        log::trace!("unhandled {}, clobbering {:?}", self.mnemonic, self.clobbers);
        for register in &self.clobbers {
            ctx.write(*register, Value::uninitialized())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_const_and_move() {
        let mut ctx = RegisterContext::new(2, 0);
        ConstOp::new(0, &Literal::String("key".into()))
            .execute(&mut ctx)
            .unwrap();
        MoveOp { dest: 1, src: 0 }.execute(&mut ctx).unwrap();
        assert_eq!(ctx.read(1).unwrap(), &Value::string("key"));
    }

    #[test]
    fn test_return() {
        let mut ctx = RegisterContext::new(1, 0);
        ctx.write(0, Value::int(4)).unwrap();
        ReturnOp { src: Some(0) }.execute(&mut ctx).unwrap();
        assert_eq!(ctx.return_value(), Some(&Value::int(4)));

        ReturnOp { src: None }.execute(&mut ctx).unwrap();
        assert!(ctx.return_value().is_none());
    }

    #[test]
    fn test_unhandled_clobbers_only_defined_registers() {
        let mut ctx = RegisterContext::new(3, 0);
        for reg in 0..3 {
            ctx.write(reg, Value::int(i32::from(reg))).unwrap();
        }
        UnhandledOp {
            mnemonic: "filled-new-array".to_string(),
            clobbers: vec![1],
        }
        .execute(&mut ctx)
        .unwrap();

        assert_eq!(ctx.read(0).unwrap(), &Value::int(0));
        assert!(ctx.read(1).unwrap().is_unknown());
        assert_eq!(ctx.read(2).unwrap(), &Value::int(2));
    }

    #[test]
    fn test_bad_register() {
        let mut ctx = RegisterContext::new(1, 0);
        assert!(MoveOp { dest: 0, src: 3 }.execute(&mut ctx).is_err());
        assert!(ThrowOp { src: 1 }.execute(&mut ctx).is_err());
    }
}
