//! Static field access.
//!
//! Both directions trigger static initialization of the declaring class first. Writes
//! go to the path-local overlay of the [`RegisterContext`]; reads consult the overlay,
//! then the class's [`crate::emulation::ClassContext`].

use crate::{
    assembly::Register,
    emulation::{RegisterContext, VirtualMachine},
    metadata::FieldRef,
    Result,
};

/// `sget*`
#[derive(Clone, Debug)]
pub struct StaticGetOp {
    pub(crate) dest: Register,
    pub(crate) field: FieldRef,
}

impl StaticGetOp {
    pub(crate) fn execute(&self, ctx: &mut RegisterContext, vm: &mut VirtualMachine) -> Result<()> {
        vm.initialize_class(&self.field.class)?;
        let value = vm.static_value(ctx, &self.field);
        ctx.write(self.dest, value)
    }
}

/// `sput*`
#[derive(Clone, Debug)]
pub struct StaticPutOp {
    pub(crate) src: Register,
    pub(crate) field: FieldRef,
}

impl StaticPutOp {
    pub(crate) fn execute(&self, ctx: &mut RegisterContext, vm: &mut VirtualMachine) -> Result<()> {
        vm.initialize_class(&self.field.class)?;
        let value = ctx.read(self.src)?.clone();
        ctx.static_write(self.field.clone(), value);
        Ok(())
    }
}
