//! Instruction handlers.
//!
//! Every instruction of a method is turned into one [`OpHandler`] when its execution
//! graph is built. A handler reads and writes the [`RegisterContext`] of the path that
//! reached it and returns the addresses execution may continue at.
//!
//! # Successors
//!
//! | Kind | Successors |
//! |------|------------|
//! | Sequential, invoke | next address |
//! | `goto` | target |
//! | `if-*` | the one implied by known operands, else fallthrough then target |
//! | switch | the matching case or fallthrough, else fallthrough then every distinct case target |
//! | `return*`, `throw` | none |

mod arithmetic;
mod basic;
mod branch;
mod field;
mod invoke;
mod object;

use std::{fmt, sync::Arc};

pub use branch::evaluate_predicate;

use crate::{
    assembly::{Instruction, Op},
    emulation::{AllocationSite, RegisterContext, VirtualMachine},
    metadata::FieldRef,
    Result,
};

use self::{
    arithmetic::{BinaryMathOp, CmpOp, UnaryMathOp},
    basic::{ConstOp, MoveOp, ReturnOp, ThrowOp, UnhandledOp},
    branch::{IfOp, SwitchOp},
    field::{StaticGetOp, StaticPutOp},
    invoke::{InvokeOp, MoveResultOp},
    object::{
        ArrayGetOp, ArrayLengthOp, ArrayPutOp, InstanceGetOp, InstancePutOp, NewArrayOp,
        NewInstanceOp,
    },
};

/// Handler variant selected for an instruction.
#[derive(Clone, Debug)]
enum HandlerKind {
    Nop,
    Const(ConstOp),
    Move(MoveOp),
    MoveResult(MoveResultOp),
    BinaryMath(BinaryMathOp),
    UnaryMath(UnaryMathOp),
    Compare(CmpOp),
    If(IfOp),
    Goto(u32),
    Switch(SwitchOp),
    Invoke(InvokeOp),
    Return(ReturnOp),
    Throw(ThrowOp),
    NewInstance(NewInstanceOp),
    NewArray(NewArrayOp),
    ArrayLength(ArrayLengthOp),
    ArrayGet(ArrayGetOp),
    ArrayPut(ArrayPutOp),
    InstanceGet(InstanceGetOp),
    InstancePut(InstancePutOp),
    StaticGet(StaticGetOp),
    StaticPut(StaticPutOp),
    Unhandled(UnhandledOp),
}

/// Interpreter of one instruction.
#[derive(Clone, Debug)]
pub struct OpHandler {
    address: u32,
    next_address: u32,
    description: String,
    kind: HandlerKind,
}

impl OpHandler {
    /// Selects the handler for `instruction` of `method`.
    #[must_use]
    pub fn new(method: &Arc<str>, instruction: &Instruction) -> Self {
        let kind = match instruction.op.clone() {
            Op::Nop => HandlerKind::Nop,
            Op::Const { dest, value } => HandlerKind::Const(ConstOp::new(dest, &value)),
            Op::Move { dest, src } => HandlerKind::Move(MoveOp { dest, src }),
            Op::MoveResult { dest } => HandlerKind::MoveResult(MoveResultOp { dest }),
            Op::BinaryMath {
                op,
                kind,
                dest,
                lhs,
                rhs,
            } => HandlerKind::BinaryMath(BinaryMathOp {
                op,
                kind,
                dest,
                lhs,
                rhs,
            }),
            Op::UnaryMath { op, dest, src } => {
                HandlerKind::UnaryMath(UnaryMathOp { op, dest, src })
            }
            Op::Compare {
                kind,
                dest,
                lhs,
                rhs,
            } => HandlerKind::Compare(CmpOp {
                kind,
                dest,
                lhs,
                rhs,
            }),
            Op::If {
                kind,
                lhs,
                rhs,
                target,
            } => HandlerKind::If(IfOp {
                kind,
                lhs,
                rhs,
                target,
            }),
            Op::Goto { target } => HandlerKind::Goto(target),
            Op::Switch { src, cases } => HandlerKind::Switch(SwitchOp { src, cases }),
            Op::Invoke { kind, method, args } => {
                HandlerKind::Invoke(InvokeOp { kind, method, args })
            }
            Op::Return { src } => HandlerKind::Return(ReturnOp { src }),
            Op::Throw { src } => HandlerKind::Throw(ThrowOp { src }),
            Op::NewInstance { dest, class } => HandlerKind::NewInstance(NewInstanceOp {
                dest,
                class,
                site: AllocationSite::new(Arc::clone(method), instruction.address),
            }),
            Op::NewArray { dest, size, ty } => {
                HandlerKind::NewArray(NewArrayOp { dest, size, ty })
            }
            Op::ArrayLength { dest, array } => {
                HandlerKind::ArrayLength(ArrayLengthOp { dest, array })
            }
            Op::ArrayGet { dest, array, index } => {
                HandlerKind::ArrayGet(ArrayGetOp { dest, array, index })
            }
            Op::ArrayPut { src, array, index } => {
                HandlerKind::ArrayPut(ArrayPutOp { src, array, index })
            }
            Op::InstanceGet {
                dest,
                object,
                field,
            } => HandlerKind::InstanceGet(InstanceGetOp {
                dest,
                object,
                field,
            }),
            Op::InstancePut { src, object, .. } => {
                HandlerKind::InstancePut(InstancePutOp { src, object })
            }
            Op::StaticGet { dest, field } => HandlerKind::StaticGet(StaticGetOp { dest, field }),
            Op::StaticPut { src, field } => HandlerKind::StaticPut(StaticPutOp { src, field }),
            Op::Unhandled { mnemonic, clobbers } => {
                HandlerKind::Unhandled(UnhandledOp { mnemonic, clobbers })
            }
        };

        OpHandler {
            address: instruction.address,
            next_address: instruction.next_address(),
            description: instruction.to_string(),
            kind,
        }
    }

    /// Address of the instruction.
    #[must_use]
    pub fn address(&self) -> u32 {
        self.address
    }

    /// Address of the following instruction.
    #[must_use]
    pub fn next_address(&self) -> u32 {
        self.next_address
    }

    /// Returns `false` for handlers that leave the method.
    #[must_use]
    pub fn can_continue(&self) -> bool {
        !matches!(self.kind, HandlerKind::Return(_) | HandlerKind::Throw(_))
    }

    /// Returns `true` for `return*` handlers.
    #[must_use]
    pub fn is_return(&self) -> bool {
        matches!(self.kind, HandlerKind::Return(_))
    }

    /// Returns `true` if executing the handler can change the contents of an array:
    /// `aput*` and every invocation.
    #[must_use]
    pub fn may_store_into_arrays(&self) -> bool {
        matches!(self.kind, HandlerKind::ArrayPut(_) | HandlerKind::Invoke(_))
    }

    /// Static field written by this handler, if it is an `sput`.
    #[must_use]
    pub fn static_put_field(&self) -> Option<&FieldRef> {
        match &self.kind {
            HandlerKind::StaticPut(op) => Some(&op.field),
            _ => None,
        }
    }

    /// Every address execution could continue at, regardless of register contents.
    #[must_use]
    pub fn possible_successors(&self) -> Vec<u32> {
        match &self.kind {
            HandlerKind::Goto(target) => vec![*target],
            HandlerKind::If(op) => vec![self.next_address, op.target],
            HandlerKind::Switch(op) => op.possible_successors(self.next_address),
            HandlerKind::Return(_) | HandlerKind::Throw(_) => Vec::new(),
            _ => vec![self.next_address],
        }
    }

    /// Executes the instruction against `ctx` and returns the successor addresses.
    ///
    /// # Errors
    ///
    /// Returns [`crate::emulation::ExecutionError::InvalidRegister`] for operands
    /// outside the frame, and any error raised by an invoked method.
    pub fn execute(&self, ctx: &mut RegisterContext, vm: &mut VirtualMachine) -> Result<Vec<u32>> {
        let next = self.next_address;
        match &self.kind {
            HandlerKind::Nop => {}
            HandlerKind::Const(op) => op.execute(ctx)?,
            HandlerKind::Move(op) => op.execute(ctx)?,
            HandlerKind::MoveResult(op) => op.execute(ctx)?,
            HandlerKind::BinaryMath(op) => op.execute(ctx)?,
            HandlerKind::UnaryMath(op) => op.execute(ctx)?,
            HandlerKind::Compare(op) => op.execute(ctx)?,
            HandlerKind::If(op) => return op.execute(ctx, next),
            HandlerKind::Goto(target) => return Ok(vec![*target]),
            HandlerKind::Switch(op) => return op.execute(ctx, next),
            HandlerKind::Invoke(op) => op.execute(ctx, vm)?,
            HandlerKind::Return(op) => {
                op.execute(ctx)?;
                return Ok(Vec::new());
            }
            HandlerKind::Throw(op) => {
                op.execute(ctx)?;
                return Ok(Vec::new());
            }
            HandlerKind::NewInstance(op) => op.execute(ctx)?,
            HandlerKind::NewArray(op) => op.execute(ctx, vm.config().max_array_length)?,
            HandlerKind::ArrayLength(op) => op.execute(ctx)?,
            HandlerKind::ArrayGet(op) => op.execute(ctx)?,
            HandlerKind::ArrayPut(op) => op.execute(ctx, vm)?,
            HandlerKind::InstanceGet(op) => op.execute(ctx)?,
            HandlerKind::InstancePut(op) => op.execute(ctx)?,
            HandlerKind::StaticGet(op) => op.execute(ctx, vm)?,
            HandlerKind::StaticPut(op) => op.execute(ctx, vm)?,
            HandlerKind::Unhandled(op) => op.execute(ctx)?,
        }
        Ok(vec![next])
    }
}

impl fmt::Display for OpHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::{IfKind, Literal};

    #[test]
    fn test_possible_successors() {
        let method: Arc<str> = Arc::from("LFoo;->run()V");
        let branch = Instruction::new(
            4,
            Op::If {
                kind: IfKind::Eq,
                lhs: 0,
                rhs: None,
                target: 10,
            },
        );
        let branch = OpHandler::new(&method, &branch);
        assert_eq!(branch.possible_successors(), vec![6, 10]);
        assert!(branch.can_continue());

        let ret = OpHandler::new(&method, &Instruction::new(6, Op::Return { src: None }));
        assert!(ret.possible_successors().is_empty());
        assert!(!ret.can_continue());
        assert!(ret.is_return());

        let konst = Instruction::new(
            0,
            Op::Const {
                dest: 0,
                value: Literal::Int(1),
            },
        );
        let konst = OpHandler::new(&method, &konst);
        assert_eq!(konst.possible_successors(), vec![3]);
        assert_eq!(konst.to_string(), "const v0, 1");
    }
}
