//! Abstract interpretation of smali methods.
//!
//! This module executes methods without running them: registers hold either a known
//! value or an unknown value of a declared type, every branch whose outcome cannot be
//! decided is followed both ways, and every path keeps its own copy of the register
//! file. Afterwards downstream passes ask the resulting [`ContextGraph`] what a
//! register held at an address, and whether all paths agree on it.
//!
//! # Architecture
//!
//! The engine is organized into several sub-modules:
//!
//! - Value lattice and arithmetic with Java semantics
//! - Register and class contexts holding per-path and per-class state
//! - Instruction handlers, one per instruction kind
//! - Execution graphs with template and clone node piles
//! - The explicit-stack method executor
//! - The virtual machine coordinating templates, static state and invocation
//!
//! # Key Components
//!
//! ## Value System
//! - [`Value`] - Known or unknown register value with its type
//! - [`Payload`] - Contents of a known value
//! - [`AllocationSite`] - Method-qualified `new-instance` of an object
//! - [`ops`] - Binary, unary and compare semantics
//!
//! ## State
//! - [`RegisterContext`] - Registers, return slot and static writes of one path
//! - [`ClassContext`] - Static fields and initialization state of one class
//!
//! ## Execution
//! - [`OpHandler`] - Interpreter of one instruction
//! - [`ContextGraph`] - Per-method graph of executed nodes
//! - [`MethodExecutor`] - Depth-first driver over a graph
//! - [`VirtualMachine`] - Entry point, templates, invocation and static initialization
//! - [`VmConfig`] - Visit and call depth ceilings
//!
//! # Usage Examples
//!
//! ```rust
//! use smaliscope::{
//!     assembly::{IfKind, MethodAssembler},
//!     emulation::{Value, VirtualMachine, VmConfig},
//!     metadata::{AccessFlags, ClassDef, MethodDef},
//! };
//!
//! // static int pick(int x) { return x == 5 ? 1 : 2; }
//! let mut asm = MethodAssembler::new();
//! asm.const_int(0, 5)
//!     .if_cmp(IfKind::Eq, 1, 0, "five")
//!     .const_int(0, 2)
//!     .return_value(0)
//!     .label("five")?
//!     .const_int(0, 1)
//!     .return_value(0);
//! let pick = MethodDef::new("LPick;->pick(I)I", AccessFlags::STATIC, 2, asm.finish()?)?;
//! let class = ClassDef::new("LPick;", AccessFlags::PUBLIC).with_method(pick);
//!
//! let mut vm = VirtualMachine::new(vec![class], VmConfig::default())?;
//! let mut ctx = vm.root_context("LPick;->pick(I)I")?;
//! ctx.bind_parameter(0, Value::int(5))?;
//!
//! let graph = vm
//!     .execute_with_context("LPick;->pick(I)I", ctx)?
//!     .expect("within limits");
//! let returns = graph.connected_return_addresses();
//! assert_eq!(returns.len(), 1);
//! assert_eq!(graph.consensus(&returns, 0)?, Value::int(1));
//! # Ok::<(), smaliscope::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! Execution is single-threaded. A [`VirtualMachine`] is `Send` but its methods take
//! `&mut self`; run independent analyses on independent machines.

mod context;
mod engine;
mod error;
mod graph;
mod handler;
mod value;
mod vm;

pub use context::{ClassContext, RegisterContext};
pub use engine::MethodExecutor;
pub use error::ExecutionError;
pub use graph::{ContextGraph, ContextNode, NodeId, NodePile};
pub use handler::{evaluate_predicate, OpHandler};
pub use value::{ops, AllocationSite, Comparison, Payload, Value};
pub use vm::{InvokeOutcome, VirtualMachine, VisitBudget, VmConfig};
