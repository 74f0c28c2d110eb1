//! Method invocation and `move-result`.

use crate::{
    assembly::{InvokeKind, Register},
    emulation::{RegisterContext, Value, VirtualMachine},
    metadata::MethodRef,
    Result,
};

/// `invoke-*`
///
/// Delegates to [`VirtualMachine::invoke`], stages the callee's result in the return
/// slot and applies the callee's static writes to this path. Arguments whose contents
/// the callee could have changed are widened afterwards, along with the static fields
/// that may hold the same arrays.
#[derive(Clone, Debug)]
pub struct InvokeOp {
    pub(crate) kind: InvokeKind,
    pub(crate) method: MethodRef,
    pub(crate) args: Vec<Register>,
}

impl InvokeOp {
    pub(crate) fn execute(&self, ctx: &mut RegisterContext, vm: &mut VirtualMachine) -> Result<()> {
        let outcome = vm.invoke(self.kind, &self.method, ctx, &self.args)?;

        match outcome.result {
            Some(value) => ctx.set_return(value),
            None => ctx.clear_return(),
        }
        for (field, value) in outcome.static_writes {
            ctx.static_write(field, value);
        }

        for register in &self.args {
            let value = ctx.read(*register)?;
            if value.has_mutable_content() && !vm.is_immutable_class(value.ty()) {
                let ty = value.ty().clone();
                let widened = value.widen();
                ctx.write(*register, widened)?;
                vm.widen_static_arrays(ctx, &ty);
            }
        }
        Ok(())
    }
}

/// `move-result*`
#[derive(Clone, Debug)]
pub struct MoveResultOp {
    pub(crate) dest: Register,
}

impl MoveResultOp {
    pub(crate) fn execute(&self, ctx: &mut RegisterContext) -> Result<()> {
        let value = ctx
            .return_value()
            .cloned()
            .unwrap_or_else(Value::uninitialized);
        ctx.write(self.dest, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_result() {
        let mut ctx = RegisterContext::new(1, 0);
        ctx.set_return(Value::string("abc"));
        MoveResultOp { dest: 0 }.execute(&mut ctx).unwrap();
        assert_eq!(ctx.read(0).unwrap(), &Value::string("abc"));

        ctx.clear_return();
        MoveResultOp { dest: 0 }.execute(&mut ctx).unwrap();
        assert_eq!(ctx.read(0).unwrap(), &Value::uninitialized());
    }
}
