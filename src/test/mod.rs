//! Factories shared by unit tests.

use crate::{
    assembly::MethodAssembler,
    emulation::{VirtualMachine, VmConfig},
    metadata::{AccessFlags, ClassDef, MethodDef},
};

/// Assembles a static method of `registers` registers.
pub fn method(
    descriptor: &str,
    registers: u16,
    build: impl FnOnce(&mut MethodAssembler),
) -> MethodDef {
    let mut asm = MethodAssembler::new();
    build(&mut asm);
    MethodDef::new(
        descriptor,
        AccessFlags::PUBLIC | AccessFlags::STATIC,
        registers,
        asm.finish().unwrap(),
    )
    .unwrap()
}

/// Builds a virtual machine over a single class `LFoo;` holding `methods`.
pub fn single_class_vm(methods: Vec<MethodDef>) -> VirtualMachine {
    single_class_vm_with(methods, VmConfig::default())
}

/// Like [`single_class_vm`] with an explicit configuration.
pub fn single_class_vm_with(methods: Vec<MethodDef>, config: VmConfig) -> VirtualMachine {
    let class = methods
        .into_iter()
        .fold(ClassDef::new("LFoo;", AccessFlags::PUBLIC), ClassDef::with_method);
    VirtualMachine::new(vec![class], config).unwrap()
}
