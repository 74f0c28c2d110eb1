//! Label-resolving builder for instruction streams.
//!
//! [`MethodAssembler`] lays instructions out at consecutive addresses using each
//! operation's default width and resolves branch labels when the stream is finished.
//! Labels may be referenced before they are defined.
//!
//! # Examples
//!
//! ```rust
//! use smaliscope::assembly::{IfKind, MethodAssembler};
//!
//! // if (p0 == 5) return 1; else return 2;
//! let mut asm = MethodAssembler::new();
//! asm.const_int(0, 5)
//!     .if_cmp(IfKind::Ne, 1, 0, "else")
//!     .const_int(0, 1)
//!     .return_value(0);
//! asm.label("else")?
//!     .const_int(0, 2)
//!     .return_value(0);
//!
//! let instructions = asm.finish()?;
//! assert_eq!(instructions.len(), 6);
//! # Ok::<(), smaliscope::Error>(())
//! ```

use std::collections::HashMap;

use crate::{
    assembly::{
        BinaryOp, CmpKind, IfKind, Instruction, InvokeKind, Literal, NumericKind, Op, Operand,
        Register, UnaryOp,
    },
    metadata::{FieldRef, MethodRef, TypeDescriptor},
    Error, Result,
};

/// An emitted instruction whose branch targets still name labels.
struct PendingInstruction {
    instruction: Instruction,
    /// One label per branch target, in [`Op::branch_targets`] order.
    labels: Vec<String>,
}

/// Builder for a method's instruction stream.
///
/// Emitting methods return `&mut Self` for chaining; those that parse descriptors or
/// define labels return a [`Result`].
#[derive(Default)]
pub struct MethodAssembler {
    pending: Vec<PendingInstruction>,
    labels: HashMap<String, u32>,
    address: u32,
}

impl MethodAssembler {
    /// Creates an empty assembler positioned at address 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Address the next emitted instruction will occupy.
    #[must_use]
    pub fn address(&self) -> u32 {
        self.address
    }

    /// Returns the address of a defined label.
    #[must_use]
    pub fn label_address(&self, name: &str) -> Option<u32> {
        self.labels.get(name).copied()
    }

    /// Defines `name` at the current address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateLabel`] if the label already exists.
    pub fn label(&mut self, name: &str) -> Result<&mut Self> {
        if self.labels.contains_key(name) {
            return Err(Error::DuplicateLabel(name.to_string()));
        }
        self.labels.insert(name.to_string(), self.address);
        Ok(self)
    }

    /// Emits an arbitrary operation without label references.
    pub fn emit(&mut self, op: Op) -> &mut Self {
        self.push(op, Vec::new())
    }

    /// Emits an operation with an explicit encoded width.
    pub fn emit_sized(&mut self, op: Op, code_units: u16) -> &mut Self {
        let instruction = Instruction::new(self.address, op).with_code_units(code_units);
        self.address = instruction.next_address();
        self.pending.push(PendingInstruction {
            instruction,
            labels: Vec::new(),
        });
        self
    }

    fn push(&mut self, op: Op, labels: Vec<String>) -> &mut Self {
        let instruction = Instruction::new(self.address, op);
        self.address = instruction.next_address();
        self.pending.push(PendingInstruction {
            instruction,
            labels,
        });
        self
    }

    /// `nop`
    pub fn nop(&mut self) -> &mut Self {
        self.emit(Op::Nop)
    }

    /// `const vDest, value`
    pub fn const_literal(&mut self, dest: Register, value: Literal) -> &mut Self {
        self.emit(Op::Const { dest, value })
    }

    /// `const vDest, #int`
    pub fn const_int(&mut self, dest: Register, value: i32) -> &mut Self {
        self.const_literal(dest, Literal::Int(value))
    }

    /// `const-wide vDest, #long`
    pub fn const_long(&mut self, dest: Register, value: i64) -> &mut Self {
        self.const_literal(dest, Literal::Long(value))
    }

    /// `const vDest, #float`
    pub fn const_float(&mut self, dest: Register, value: f32) -> &mut Self {
        self.const_literal(dest, Literal::Float(value))
    }

    /// `const-wide vDest, #double`
    pub fn const_double(&mut self, dest: Register, value: f64) -> &mut Self {
        self.const_literal(dest, Literal::Double(value))
    }

    /// `const-string vDest, "value"`
    pub fn const_string(&mut self, dest: Register, value: &str) -> &mut Self {
        self.const_literal(dest, Literal::String(value.to_string()))
    }

    /// `const-class vDest, Type`
    pub fn const_class(&mut self, dest: Register, class: &str) -> &mut Self {
        self.const_literal(dest, Literal::Class(TypeDescriptor::new(class)))
    }

    /// `const/4 vDest, 0` used as `null`
    pub fn const_null(&mut self, dest: Register) -> &mut Self {
        self.const_literal(dest, Literal::Null)
    }

    /// `move vDest, vSrc`
    pub fn move_reg(&mut self, dest: Register, src: Register) -> &mut Self {
        self.emit(Op::Move { dest, src })
    }

    /// `move-result vDest`
    pub fn move_result(&mut self, dest: Register) -> &mut Self {
        self.emit(Op::MoveResult { dest })
    }

    /// Three-register binary math.
    pub fn binary(
        &mut self,
        op: BinaryOp,
        kind: NumericKind,
        dest: Register,
        lhs: Register,
        rhs: Register,
    ) -> &mut Self {
        self.emit(Op::BinaryMath {
            op,
            kind,
            dest,
            lhs,
            rhs: Operand::Register(rhs),
        })
    }

    /// Binary math with a literal second operand (`/lit8`, `/lit16`).
    pub fn binary_lit(
        &mut self,
        op: BinaryOp,
        dest: Register,
        lhs: Register,
        literal: i32,
    ) -> &mut Self {
        self.emit(Op::BinaryMath {
            op,
            kind: NumericKind::Int,
            dest,
            lhs,
            rhs: Operand::Literal(literal),
        })
    }

    /// `add-int vDest, vLhs, vRhs`
    pub fn add_int(&mut self, dest: Register, lhs: Register, rhs: Register) -> &mut Self {
        self.binary(BinaryOp::Add, NumericKind::Int, dest, lhs, rhs)
    }

    /// Unary math or conversion.
    pub fn unary(&mut self, op: UnaryOp, dest: Register, src: Register) -> &mut Self {
        self.emit(Op::UnaryMath { op, dest, src })
    }

    /// `cmp*` family.
    pub fn compare(
        &mut self,
        kind: CmpKind,
        dest: Register,
        lhs: Register,
        rhs: Register,
    ) -> &mut Self {
        self.emit(Op::Compare {
            kind,
            dest,
            lhs,
            rhs,
        })
    }

    /// `if-<kind> vLhs, vRhs, :label`
    pub fn if_cmp(&mut self, kind: IfKind, lhs: Register, rhs: Register, label: &str) -> &mut Self {
        self.push(
            Op::If {
                kind,
                lhs,
                rhs: Some(rhs),
                target: 0,
            },
            vec![label.to_string()],
        )
    }

    /// `if-<kind>z vSrc, :label`
    pub fn if_zero(&mut self, kind: IfKind, src: Register, label: &str) -> &mut Self {
        self.push(
            Op::If {
                kind,
                lhs: src,
                rhs: None,
                target: 0,
            },
            vec![label.to_string()],
        )
    }

    /// `goto :label`
    pub fn goto(&mut self, label: &str) -> &mut Self {
        self.push(Op::Goto { target: 0 }, vec![label.to_string()])
    }

    /// `sparse-switch vSrc` with `(key, :label)` cases.
    pub fn switch(&mut self, src: Register, cases: &[(i32, &str)]) -> &mut Self {
        let op = Op::Switch {
            src,
            cases: cases.iter().map(|(key, _)| (*key, 0)).collect(),
        };
        let labels = cases.iter().map(|(_, label)| (*label).to_string()).collect();
        self.push(op, labels)
    }

    /// `invoke-<kind> {args}, descriptor`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDescriptor`] if `method` is not a method descriptor.
    pub fn invoke(
        &mut self,
        kind: InvokeKind,
        method: &str,
        args: &[Register],
    ) -> Result<&mut Self> {
        let method = MethodRef::parse(method)?;
        Ok(self.emit(Op::Invoke {
            kind,
            method,
            args: args.to_vec(),
        }))
    }

    /// `return vSrc`
    pub fn return_value(&mut self, src: Register) -> &mut Self {
        self.emit(Op::Return { src: Some(src) })
    }

    /// `return-void`
    pub fn return_void(&mut self) -> &mut Self {
        self.emit(Op::Return { src: None })
    }

    /// `throw vSrc`
    pub fn throw(&mut self, src: Register) -> &mut Self {
        self.emit(Op::Throw { src })
    }

    /// `new-instance vDest, Type`
    pub fn new_instance(&mut self, dest: Register, class: &str) -> &mut Self {
        self.emit(Op::NewInstance {
            dest,
            class: TypeDescriptor::new(class),
        })
    }

    /// `new-array vDest, vSize, [Type`
    pub fn new_array(&mut self, dest: Register, size: Register, ty: &str) -> &mut Self {
        self.emit(Op::NewArray {
            dest,
            size,
            ty: TypeDescriptor::new(ty),
        })
    }

    /// `array-length vDest, vArray`
    pub fn array_length(&mut self, dest: Register, array: Register) -> &mut Self {
        self.emit(Op::ArrayLength { dest, array })
    }

    /// `aget vDest, vArray, vIndex`
    pub fn aget(&mut self, dest: Register, array: Register, index: Register) -> &mut Self {
        self.emit(Op::ArrayGet { dest, array, index })
    }

    /// `aput vSrc, vArray, vIndex`
    pub fn aput(&mut self, src: Register, array: Register, index: Register) -> &mut Self {
        self.emit(Op::ArrayPut { src, array, index })
    }

    /// `iget vDest, vObject, field`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDescriptor`] if `field` is not a field descriptor.
    pub fn iget(&mut self, dest: Register, object: Register, field: &str) -> Result<&mut Self> {
        let field = FieldRef::parse(field)?;
        Ok(self.emit(Op::InstanceGet {
            dest,
            object,
            field,
        }))
    }

    /// `iput vSrc, vObject, field`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDescriptor`] if `field` is not a field descriptor.
    pub fn iput(&mut self, src: Register, object: Register, field: &str) -> Result<&mut Self> {
        let field = FieldRef::parse(field)?;
        Ok(self.emit(Op::InstancePut { src, object, field }))
    }

    /// `sget vDest, field`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDescriptor`] if `field` is not a field descriptor.
    pub fn sget(&mut self, dest: Register, field: &str) -> Result<&mut Self> {
        let field = FieldRef::parse(field)?;
        Ok(self.emit(Op::StaticGet { dest, field }))
    }

    /// `sput vSrc, field`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDescriptor`] if `field` is not a field descriptor.
    pub fn sput(&mut self, src: Register, field: &str) -> Result<&mut Self> {
        let field = FieldRef::parse(field)?;
        Ok(self.emit(Op::StaticPut { src, field }))
    }

    /// An opcode the interpreter does not model, defining `clobbers`.
    pub fn unhandled(&mut self, mnemonic: &str, clobbers: &[Register]) -> &mut Self {
        self.emit(Op::Unhandled {
            mnemonic: mnemonic.to_string(),
            clobbers: clobbers.to_vec(),
        })
    }

    /// Resolves all labels and returns the finished instruction stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndefinedLabel`] if a branch references an undefined label.
    pub fn finish(self) -> Result<Vec<Instruction>> {
        let labels = self.labels;
        self.pending
            .into_iter()
            .map(|mut pending| -> Result<Instruction> {
                let targets = pending.instruction.op.branch_targets_mut();
                for (target, label) in targets.into_iter().zip(&pending.labels) {
                    *target = labels
                        .get(label)
                        .copied()
                        .ok_or_else(|| Error::UndefinedLabel(label.clone()))?;
                }
                Ok(pending.instruction)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_and_backward_labels() {
        let mut asm = MethodAssembler::new();
        asm.label("top").unwrap();
        asm.const_int(0, 1).if_zero(IfKind::Eq, 0, "end").goto("top");
        asm.label("end").unwrap().return_void();

        let instructions = asm.finish().unwrap();
        let addresses: Vec<u32> = instructions.iter().map(|i| i.address).collect();
        assert_eq!(addresses, vec![0, 3, 5, 6]);
        assert_eq!(instructions[1].op.branch_targets(), vec![6]);
        assert_eq!(instructions[2].op.branch_targets(), vec![0]);
    }

    #[test]
    fn test_duplicate_label() {
        let mut asm = MethodAssembler::new();
        asm.label("a").unwrap();
        assert!(matches!(asm.label("a"), Err(Error::DuplicateLabel(name)) if name == "a"));
    }

    #[test]
    fn test_undefined_label() {
        let mut asm = MethodAssembler::new();
        asm.goto("nowhere");
        assert!(matches!(asm.finish(), Err(Error::UndefinedLabel(name)) if name == "nowhere"));
    }

    #[test]
    fn test_switch_labels_resolve_in_order() {
        let mut asm = MethodAssembler::new();
        asm.switch(0, &[(1, "one"), (2, "two")]);
        asm.label("one").unwrap().return_void();
        asm.label("two").unwrap().return_void();

        let instructions = asm.finish().unwrap();
        assert_eq!(instructions[0].op.branch_targets(), vec![3, 4]);
    }

    #[test]
    fn test_invalid_descriptor() {
        let mut asm = MethodAssembler::new();
        assert!(asm.invoke(InvokeKind::Static, "garbage", &[]).is_err());
        assert!(asm.sget(0, "LFoo;->x").is_err());
        assert_eq!(asm.address(), 0);
    }
}
