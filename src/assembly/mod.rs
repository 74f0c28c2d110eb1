//! Instruction model of register-based (Dalvik/smali) bytecode.
//!
//! The engine does not decode binary or textual bytecode itself. A parser supplies
//! [`Instruction`]s; tests and tools can write them by hand with the
//! [`MethodAssembler`].
//!
//! # Key Components
//!
//! - [`Instruction`] / [`Op`] - Addressed instruction and its operation
//! - [`FlowType`] - Control flow classification used by the graph builder
//! - [`MethodAssembler`] - Label-resolving builder

mod assembler;
mod instruction;

pub use assembler::MethodAssembler;
pub use instruction::{
    BinaryOp, CmpKind, FlowType, IfKind, Instruction, InvokeKind, Literal, NumericKind, Op,
    Operand, Register, UnaryOp,
};
