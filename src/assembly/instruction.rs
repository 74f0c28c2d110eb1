//! Register-based instruction representation.
//!
//! This module defines the in-memory instruction model the engine interprets. An
//! [`Instruction`] pairs a code-unit address with an [`Op`], the closed set of operation
//! kinds the interpreter distinguishes. Operand registers are plain indices into the
//! method frame; branch targets are absolute addresses.
//!
//! # Key Components
//!
//! - [`Instruction`] - Addressed instruction with its width in 16-bit code units
//! - [`Op`] - Operation kind and operands
//! - [`Literal`] - Constant operands of `const*` instructions and static initial values
//! - [`FlowType`] - Control flow classification
//!
//! # Examples
//!
//! ```rust
//! use smaliscope::assembly::{FlowType, IfKind, Instruction, Op};
//!
//! let branch = Instruction::new(4, Op::If { kind: IfKind::Eq, lhs: 0, rhs: Some(1), target: 12 });
//! assert_eq!(branch.flow_type(), FlowType::ConditionalBranch);
//! assert_eq!(branch.next_address(), 6);
//! assert_eq!(branch.to_string(), "if-eq v0, v1, #12");
//! ```

use std::{cmp::Ordering, fmt};

use strum::{Display, EnumIter};

use crate::metadata::{FieldRef, MethodRef, TypeDescriptor};

/// Index of a register in a method frame.
pub type Register = u16;

/// Constant operand.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    /// 32-bit integer, also used for `boolean`, `byte`, `short` and `char` constants
    Int(i32),
    /// 64-bit integer
    Long(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// String constant
    String(String),
    /// Class literal (`const-class`)
    Class(TypeDescriptor),
    /// The `null` reference
    Null,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(value) => write!(f, "{value}"),
            Literal::Long(value) => write!(f, "{value}L"),
            Literal::Float(value) => write!(f, "{value}f"),
            Literal::Double(value) => write!(f, "{value}d"),
            Literal::String(value) => write!(f, "{value:?}"),
            Literal::Class(ty) => write!(f, "{ty}"),
            Literal::Null => f.write_str("null"),
        }
    }
}

/// Second operand of a binary math instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// Register operand
    Register(Register),
    /// Literal operand of the `/lit8` and `/lit16` forms
    Literal(i32),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(reg) => write!(f, "v{reg}"),
            Operand::Literal(value) => write!(f, "{value}"),
        }
    }
}

/// Primitive operand width of an arithmetic instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum NumericKind {
    /// `int`
    Int,
    /// `long`
    Long,
    /// `float`
    Float,
    /// `double`
    Double,
}

impl NumericKind {
    /// Returns the type descriptor values of this kind carry.
    #[must_use]
    pub fn type_descriptor(self) -> TypeDescriptor {
        match self {
            NumericKind::Int => TypeDescriptor::int(),
            NumericKind::Long => TypeDescriptor::long(),
            NumericKind::Float => TypeDescriptor::float(),
            NumericKind::Double => TypeDescriptor::double(),
        }
    }
}

/// Binary math operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum BinaryOp {
    /// `add`
    Add,
    /// `sub`
    Sub,
    /// `mul`
    Mul,
    /// `div`
    Div,
    /// `rem`
    Rem,
    /// `and`
    And,
    /// `or`
    Or,
    /// `xor`
    Xor,
    /// `shl`
    Shl,
    /// `shr`
    Shr,
    /// `ushr`
    Ushr,
    /// Reverse subtraction `literal - register`
    Rsub,
}

/// Unary math and primitive conversion operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum UnaryOp {
    /// `neg-int`
    NegInt,
    /// `not-int`
    NotInt,
    /// `neg-long`
    NegLong,
    /// `not-long`
    NotLong,
    /// `neg-float`
    NegFloat,
    /// `neg-double`
    NegDouble,
    /// `int-to-long`
    IntToLong,
    /// `int-to-float`
    IntToFloat,
    /// `int-to-double`
    IntToDouble,
    /// `long-to-int`
    LongToInt,
    /// `long-to-float`
    LongToFloat,
    /// `long-to-double`
    LongToDouble,
    /// `float-to-int`
    FloatToInt,
    /// `float-to-long`
    FloatToLong,
    /// `float-to-double`
    FloatToDouble,
    /// `double-to-int`
    DoubleToInt,
    /// `double-to-long`
    DoubleToLong,
    /// `double-to-float`
    DoubleToFloat,
    /// `int-to-byte`
    IntToByte,
    /// `int-to-char`
    IntToChar,
    /// `int-to-short`
    IntToShort,
}

impl UnaryOp {
    /// Type of the value the operation produces.
    #[must_use]
    pub fn result_type(self) -> TypeDescriptor {
        match self {
            UnaryOp::NegInt
            | UnaryOp::NotInt
            | UnaryOp::LongToInt
            | UnaryOp::FloatToInt
            | UnaryOp::DoubleToInt => TypeDescriptor::int(),
            UnaryOp::NegLong
            | UnaryOp::NotLong
            | UnaryOp::IntToLong
            | UnaryOp::FloatToLong
            | UnaryOp::DoubleToLong => TypeDescriptor::long(),
            UnaryOp::NegFloat
            | UnaryOp::IntToFloat
            | UnaryOp::LongToFloat
            | UnaryOp::DoubleToFloat => TypeDescriptor::float(),
            UnaryOp::NegDouble
            | UnaryOp::IntToDouble
            | UnaryOp::LongToDouble
            | UnaryOp::FloatToDouble => TypeDescriptor::double(),
            UnaryOp::IntToByte => TypeDescriptor::byte(),
            UnaryOp::IntToChar => TypeDescriptor::char(),
            UnaryOp::IntToShort => TypeDescriptor::short(),
        }
    }
}

/// Three-way comparison producing `-1`, `0` or `1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum CmpKind {
    /// `cmpl-float`, NaN compares as less
    CmplFloat,
    /// `cmpg-float`, NaN compares as greater
    CmpgFloat,
    /// `cmpl-double`, NaN compares as less
    CmplDouble,
    /// `cmpg-double`, NaN compares as greater
    CmpgDouble,
    /// `cmp-long`
    CmpLong,
}

/// Predicate of a conditional branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum IfKind {
    /// Equal
    Eq,
    /// Not equal
    Ne,
    /// Less than
    Lt,
    /// Less than or equal
    Le,
    /// Greater than
    Gt,
    /// Greater than or equal
    Ge,
}

impl IfKind {
    /// Returns `true` if the predicate holds for `lhs <ordering> rhs`.
    #[must_use]
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            IfKind::Eq => ordering == Ordering::Equal,
            IfKind::Ne => ordering != Ordering::Equal,
            IfKind::Lt => ordering == Ordering::Less,
            IfKind::Le => ordering != Ordering::Greater,
            IfKind::Gt => ordering == Ordering::Greater,
            IfKind::Ge => ordering != Ordering::Less,
        }
    }
}

/// Dispatch kind of an invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum InvokeKind {
    /// `invoke-virtual`
    Virtual,
    /// `invoke-super`
    Super,
    /// `invoke-direct`
    Direct,
    /// `invoke-static`
    Static,
    /// `invoke-interface`
    Interface,
}

/// Control flow behaviour of an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowType {
    /// Execution continues at the next instruction
    Sequential,
    /// Either the next instruction or the branch target
    ConditionalBranch,
    /// Always continues at the branch target
    UnconditionalBranch,
    /// Multi-way branch
    Switch,
    /// Invocation of another method, then the next instruction
    Call,
    /// Leaves the method normally
    Return,
    /// Leaves the method by raising an exception
    Throw,
}

/// Operation kind and operands of an instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    /// `nop`
    Nop,
    /// `const*` family
    Const {
        /// Destination register
        dest: Register,
        /// Constant value
        value: Literal,
    },
    /// `move*` family, excluding `move-result`
    Move {
        /// Destination register
        dest: Register,
        /// Source register
        src: Register,
    },
    /// `move-result*`, consumes the staged result of the preceding invoke
    MoveResult {
        /// Destination register
        dest: Register,
    },
    /// `add-int`, `mul-double/2addr`, `rsub-int/lit8`, ...
    BinaryMath {
        /// Operation
        op: BinaryOp,
        /// Operand width
        kind: NumericKind,
        /// Destination register
        dest: Register,
        /// First operand
        lhs: Register,
        /// Second operand
        rhs: Operand,
    },
    /// `neg-*`, `not-*` and primitive conversions
    UnaryMath {
        /// Operation
        op: UnaryOp,
        /// Destination register
        dest: Register,
        /// Source register
        src: Register,
    },
    /// `cmpl-*`, `cmpg-*`, `cmp-long`
    Compare {
        /// Comparison kind
        kind: CmpKind,
        /// Destination register
        dest: Register,
        /// First operand
        lhs: Register,
        /// Second operand
        rhs: Register,
    },
    /// `if-*` and `if-*z`
    If {
        /// Predicate
        kind: IfKind,
        /// First operand
        lhs: Register,
        /// Second operand, `None` compares against zero
        rhs: Option<Register>,
        /// Address taken when the predicate holds
        target: u32,
    },
    /// `goto*`
    Goto {
        /// Jump target
        target: u32,
    },
    /// `packed-switch` and `sparse-switch`
    Switch {
        /// Selector register
        src: Register,
        /// Case keys and their target addresses, in declaration order
        cases: Vec<(i32, u32)>,
    },
    /// `invoke-*`
    Invoke {
        /// Dispatch kind
        kind: InvokeKind,
        /// Callee
        method: MethodRef,
        /// Argument registers, receiver first for non-static calls
        args: Vec<Register>,
    },
    /// `return*`
    Return {
        /// Returned register, `None` for `return-void`
        src: Option<Register>,
    },
    /// `throw`
    Throw {
        /// Register holding the exception
        src: Register,
    },
    /// `new-instance`
    NewInstance {
        /// Destination register
        dest: Register,
        /// Instantiated class
        class: TypeDescriptor,
    },
    /// `new-array`
    NewArray {
        /// Destination register
        dest: Register,
        /// Register holding the length
        size: Register,
        /// Array type
        ty: TypeDescriptor,
    },
    /// `array-length`
    ArrayLength {
        /// Destination register
        dest: Register,
        /// Array register
        array: Register,
    },
    /// `aget*`
    ArrayGet {
        /// Destination register
        dest: Register,
        /// Array register
        array: Register,
        /// Index register
        index: Register,
    },
    /// `aput*`
    ArrayPut {
        /// Stored register
        src: Register,
        /// Array register
        array: Register,
        /// Index register
        index: Register,
    },
    /// `iget*`
    InstanceGet {
        /// Destination register
        dest: Register,
        /// Object register
        object: Register,
        /// Accessed field
        field: FieldRef,
    },
    /// `iput*`
    InstancePut {
        /// Stored register
        src: Register,
        /// Object register
        object: Register,
        /// Accessed field
        field: FieldRef,
    },
    /// `sget*`
    StaticGet {
        /// Destination register
        dest: Register,
        /// Accessed field
        field: FieldRef,
    },
    /// `sput*`
    StaticPut {
        /// Stored register
        src: Register,
        /// Accessed field
        field: FieldRef,
    },
    /// Any opcode the interpreter does not model.
    Unhandled {
        /// Original mnemonic
        mnemonic: String,
        /// Registers the real opcode defines
        clobbers: Vec<Register>,
    },
}

impl Op {
    /// Default width in 16-bit code units of the most common encoding of this operation.
    #[must_use]
    pub fn code_units(&self) -> u16 {
        match self {
            Op::Nop
            | Op::Move { .. }
            | Op::MoveResult { .. }
            | Op::UnaryMath { .. }
            | Op::Goto { .. }
            | Op::Return { .. }
            | Op::Throw { .. }
            | Op::ArrayLength { .. }
            | Op::Unhandled { .. } => 1,
            Op::Const { value, .. } => match value {
                Literal::Null => 1,
                Literal::String(_) | Literal::Class(_) => 2,
                Literal::Int(_) | Literal::Float(_) => 3,
                Literal::Long(_) | Literal::Double(_) => 5,
            },
            Op::BinaryMath { .. }
            | Op::Compare { .. }
            | Op::If { .. }
            | Op::NewInstance { .. }
            | Op::NewArray { .. }
            | Op::ArrayGet { .. }
            | Op::ArrayPut { .. }
            | Op::InstanceGet { .. }
            | Op::InstancePut { .. }
            | Op::StaticGet { .. }
            | Op::StaticPut { .. } => 2,
            Op::Switch { .. } | Op::Invoke { .. } => 3,
        }
    }

    /// Control flow classification.
    #[must_use]
    pub fn flow_type(&self) -> FlowType {
        match self {
            Op::If { .. } => FlowType::ConditionalBranch,
            Op::Goto { .. } => FlowType::UnconditionalBranch,
            Op::Switch { .. } => FlowType::Switch,
            Op::Invoke { .. } => FlowType::Call,
            Op::Return { .. } => FlowType::Return,
            Op::Throw { .. } => FlowType::Throw,
            _ => FlowType::Sequential,
        }
    }

    /// Branch target addresses, in declaration order.
    #[must_use]
    pub fn branch_targets(&self) -> Vec<u32> {
        match self {
            Op::If { target, .. } | Op::Goto { target } => vec![*target],
            Op::Switch { cases, .. } => cases.iter().map(|(_, target)| *target).collect(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn branch_targets_mut(&mut self) -> Vec<&mut u32> {
        match self {
            Op::If { target, .. } | Op::Goto { target } => vec![target],
            Op::Switch { cases, .. } => cases.iter_mut().map(|(_, target)| target).collect(),
            _ => Vec::new(),
        }
    }

    /// Smali mnemonic.
    #[must_use]
    pub fn mnemonic(&self) -> String {
        match self {
            Op::Nop => "nop".to_string(),
            Op::Const { value, .. } => match value {
                Literal::Int(_) | Literal::Float(_) | Literal::Null => "const".to_string(),
                Literal::Long(_) | Literal::Double(_) => "const-wide".to_string(),
                Literal::String(_) => "const-string".to_string(),
                Literal::Class(_) => "const-class".to_string(),
            },
            Op::Move { .. } => "move".to_string(),
            Op::MoveResult { .. } => "move-result".to_string(),
            Op::BinaryMath { op, kind, rhs, .. } => match rhs {
                Operand::Register(_) => format!("{op}-{kind}"),
                Operand::Literal(_) => format!("{op}-{kind}/lit"),
            },
            Op::UnaryMath { op, .. } => op.to_string(),
            Op::Compare { kind, .. } => kind.to_string(),
            Op::If { kind, rhs, .. } => match rhs {
                Some(_) => format!("if-{kind}"),
                None => format!("if-{kind}z"),
            },
            Op::Goto { .. } => "goto".to_string(),
            Op::Switch { .. } => "sparse-switch".to_string(),
            Op::Invoke { kind, .. } => format!("invoke-{kind}"),
            Op::Return { src } => match src {
                Some(_) => "return".to_string(),
                None => "return-void".to_string(),
            },
            Op::Throw { .. } => "throw".to_string(),
            Op::NewInstance { .. } => "new-instance".to_string(),
            Op::NewArray { .. } => "new-array".to_string(),
            Op::ArrayLength { .. } => "array-length".to_string(),
            Op::ArrayGet { .. } => "aget".to_string(),
            Op::ArrayPut { .. } => "aput".to_string(),
            Op::InstanceGet { .. } => "iget".to_string(),
            Op::InstancePut { .. } => "iput".to_string(),
            Op::StaticGet { .. } => "sget".to_string(),
            Op::StaticPut { .. } => "sput".to_string(),
            Op::Unhandled { mnemonic, .. } => mnemonic.clone(),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.mnemonic();
        match self {
            Op::Nop => f.write_str(&mnemonic),
            Op::Const { dest, value } => write!(f, "{mnemonic} v{dest}, {value}"),
            Op::Move { dest, src } => write!(f, "{mnemonic} v{dest}, v{src}"),
            Op::MoveResult { dest } => write!(f, "{mnemonic} v{dest}"),
            Op::BinaryMath { dest, lhs, rhs, .. } => {
                write!(f, "{mnemonic} v{dest}, v{lhs}, {rhs}")
            }
            Op::UnaryMath { dest, src, .. } => write!(f, "{mnemonic} v{dest}, v{src}"),
            Op::Compare { dest, lhs, rhs, .. } => {
                write!(f, "{mnemonic} v{dest}, v{lhs}, v{rhs}")
            }
            Op::If {
                lhs, rhs, target, ..
            } => match rhs {
                Some(rhs) => write!(f, "{mnemonic} v{lhs}, v{rhs}, #{target}"),
                None => write!(f, "{mnemonic} v{lhs}, #{target}"),
            },
            Op::Goto { target } => write!(f, "{mnemonic} #{target}"),
            Op::Switch { src, cases } => {
                write!(f, "{mnemonic} v{src}")?;
                for (key, target) in cases {
                    write!(f, ", {key} -> #{target}")?;
                }
                Ok(())
            }
            Op::Invoke { method, args, .. } => {
                write!(f, "{mnemonic} {{")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "v{arg}")?;
                }
                write!(f, "}}, {method}")
            }
            Op::Return { src } => match src {
                Some(src) => write!(f, "{mnemonic} v{src}"),
                None => f.write_str(&mnemonic),
            },
            Op::Throw { src } => write!(f, "{mnemonic} v{src}"),
            Op::NewInstance { dest, class } => write!(f, "{mnemonic} v{dest}, {class}"),
            Op::NewArray { dest, size, ty } => write!(f, "{mnemonic} v{dest}, v{size}, {ty}"),
            Op::ArrayLength { dest, array } => write!(f, "{mnemonic} v{dest}, v{array}"),
            Op::ArrayGet { dest, array, index } => {
                write!(f, "{mnemonic} v{dest}, v{array}, v{index}")
            }
            Op::ArrayPut { src, array, index } => {
                write!(f, "{mnemonic} v{src}, v{array}, v{index}")
            }
            Op::InstanceGet { dest, object, field } => {
                write!(f, "{mnemonic} v{dest}, v{object}, {field}")
            }
            Op::InstancePut { src, object, field } => {
                write!(f, "{mnemonic} v{src}, v{object}, {field}")
            }
            Op::StaticGet { dest, field } => write!(f, "{mnemonic} v{dest}, {field}"),
            Op::StaticPut { src, field } => write!(f, "{mnemonic} v{src}, {field}"),
            Op::Unhandled { clobbers, .. } => {
                f.write_str(&mnemonic)?;
                for (i, reg) in clobbers.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{sep}v{reg}")?;
                }
                Ok(())
            }
        }
    }
}

/// An instruction at a fixed address of a method.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    /// Address in 16-bit code units from the start of the method
    pub address: u32,
    /// Width in 16-bit code units
    pub code_units: u16,
    /// Operation and operands
    pub op: Op,
}

impl Instruction {
    /// Creates an instruction with the default width of its operation.
    #[must_use]
    pub fn new(address: u32, op: Op) -> Self {
        Instruction {
            address,
            code_units: op.code_units(),
            op,
        }
    }

    /// Overrides the encoded width, for wider encodings such as `goto/32`.
    #[must_use]
    pub fn with_code_units(mut self, code_units: u16) -> Self {
        self.code_units = code_units;
        self
    }

    /// Address of the instruction that follows in the stream.
    #[must_use]
    pub fn next_address(&self) -> u32 {
        self.address + u32::from(self.code_units)
    }

    /// Control flow classification.
    #[must_use]
    pub fn flow_type(&self) -> FlowType {
        self.op.flow_type()
    }

    /// Returns `false` for instructions that leave the method.
    #[must_use]
    pub fn can_continue(&self) -> bool {
        !matches!(self.flow_type(), FlowType::Return | FlowType::Throw)
    }

    /// Smali mnemonic.
    #[must_use]
    pub fn mnemonic(&self) -> String {
        self.op.mnemonic()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_if_kind_holds() {
        assert!(IfKind::Eq.holds(Ordering::Equal));
        assert!(!IfKind::Eq.holds(Ordering::Less));
        assert!(IfKind::Ne.holds(Ordering::Greater));
        assert!(IfKind::Lt.holds(Ordering::Less));
        assert!(IfKind::Le.holds(Ordering::Equal));
        assert!(!IfKind::Le.holds(Ordering::Greater));
        assert!(IfKind::Gt.holds(Ordering::Greater));
        assert!(IfKind::Ge.holds(Ordering::Equal));
        assert!(!IfKind::Ge.holds(Ordering::Less));
    }

    #[test]
    fn test_flow_and_continuation() {
        let ret = Instruction::new(0, Op::Return { src: None });
        assert_eq!(ret.flow_type(), FlowType::Return);
        assert!(!ret.can_continue());

        let throw = Instruction::new(0, Op::Throw { src: 0 });
        assert!(!throw.can_continue());

        let goto = Instruction::new(0, Op::Goto { target: 0 });
        assert_eq!(goto.flow_type(), FlowType::UnconditionalBranch);
        assert!(goto.can_continue());
    }

    #[test]
    fn test_widths() {
        let wide = Instruction::new(
            10,
            Op::Const {
                dest: 0,
                value: Literal::Long(1),
            },
        );
        assert_eq!(wide.next_address(), 15);

        let goto32 = Instruction::new(2, Op::Goto { target: 0 }).with_code_units(3);
        assert_eq!(goto32.next_address(), 5);
    }

    #[test]
    fn test_mnemonics() {
        let op = Op::BinaryMath {
            op: BinaryOp::Rsub,
            kind: NumericKind::Int,
            dest: 0,
            lhs: 1,
            rhs: Operand::Literal(3),
        };
        assert_eq!(op.mnemonic(), "rsub-int/lit");
        assert_eq!(op.to_string(), "rsub-int/lit v0, v1, 3");

        let op = Op::UnaryMath {
            op: UnaryOp::IntToChar,
            dest: 0,
            src: 0,
        };
        assert_eq!(op.mnemonic(), "int-to-char");

        let op = Op::If {
            kind: IfKind::Lt,
            lhs: 2,
            rhs: None,
            target: 8,
        };
        assert_eq!(op.to_string(), "if-ltz v2, #8");
        assert_eq!(CmpKind::CmpgDouble.to_string(), "cmpg-double");
    }

    #[test]
    fn test_branch_targets() {
        let op = Op::Switch {
            src: 0,
            cases: vec![(1, 10), (2, 20)],
        };
        assert_eq!(op.branch_targets(), vec![10, 20]);
        assert!(Op::Nop.branch_targets().is_empty());
    }
}
