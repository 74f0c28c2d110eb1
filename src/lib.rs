// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # smaliscope
//!
//! An abstract-interpretation engine for Dalvik/smali bytecode. Given the classes of an
//! application, `smaliscope` executes methods symbolically: registers hold constants
//! where they can be determined and a typed "unknown" where they cannot, branches whose
//! outcome depends on unknown values are explored both ways, and every path keeps its
//! own register file. Simplification passes then ask the resulting execution graph
//! what a register held at an address and whether every path agrees on it.
//!
//! ## Features
//!
//! - **Value lattice** - Known constants of every primitive and reference kind, or
//!   unknown of a declared type
//! - **Path-sensitive execution** - One cloned register context per visit, shared
//!   structurally through persistent collections
//! - **Bounded analysis** - Revisit and call depth ceilings that abort one call instead
//!   of the whole analysis
//! - **Lazy static initialization** - `<clinit>` runs on first use, exactly once
//! - **Consensus queries** - Agreement of a register or return value across paths
//!
//! ## Quick Start
//!
//! ```rust
//! use smaliscope::prelude::*;
//!
//! // static int add(int a, int b) { return a + b; }
//! let mut asm = MethodAssembler::new();
//! asm.add_int(0, 1, 2).return_value(0);
//! let add = MethodDef::new("LCalc;->add(II)I", AccessFlags::STATIC, 3, asm.finish()?)?;
//! let class = ClassDef::new("LCalc;", AccessFlags::PUBLIC).with_method(add);
//!
//! let mut vm = VirtualMachine::new(vec![class], VmConfig::default())?;
//! let mut ctx = vm.root_context("LCalc;->add(II)I")?;
//! ctx.bind_parameter(0, Value::int(2))?;
//! ctx.bind_parameter(1, Value::int(40))?;
//!
//! let graph = vm
//!     .execute_with_context("LCalc;->add(II)I", ctx)?
//!     .expect("within limits");
//! let returns = graph.connected_return_addresses();
//! assert_eq!(graph.consensus(&returns, 0)?, Value::int(42));
//! # Ok::<(), smaliscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types
//! - [`metadata`] - Classes, methods, fields and type descriptors
//! - [`assembly`] - Instruction model and a label-resolving method assembler
//! - [`emulation`] - Values, contexts, handlers, execution graphs and the virtual machine
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade and never installs a
//! logger. Method entry and exit are logged at `debug`, every executed node at
//! `trace`, static initialization at `info` and aborted executions at `warn`.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust
/// use smaliscope::prelude::*;
///
/// let config = VmConfig::default().with_max_node_visits(10);
/// let vm = VirtualMachine::new(Vec::new(), config)?;
/// assert_eq!(vm.call_depth(), 0);
/// # Ok::<(), smaliscope::Error>(())
/// ```
pub mod prelude;

/// Instruction model and method assembler.
///
/// - [`assembly::Instruction`] - One instruction at an address
/// - [`assembly::Op`] - Operation and operands
/// - [`assembly::MethodAssembler`] - Builds instruction streams with label resolution
pub mod assembly;

/// Classes, methods, fields and type descriptors.
///
/// - [`metadata::ClassDef`], [`metadata::MethodDef`], [`metadata::FieldDef`] - Definitions
/// - [`metadata::MethodRef`], [`metadata::FieldRef`] - Parsed smali references
/// - [`metadata::TypeDescriptor`] - Type descriptor strings such as `I` or `Ljava/lang/String;`
pub mod metadata;

/// Abstract interpretation engine.
///
/// See [`emulation::VirtualMachine`] for the entry point.
pub mod emulation;

/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
///
/// # Examples
///
/// ```rust
/// use smaliscope::{metadata::MethodRef, Result};
///
/// fn arity(descriptor: &str) -> Result<usize> {
///     Ok(MethodRef::parse(descriptor)?.parameters.len())
/// }
/// assert_eq!(arity("LFoo;->bar(IJ)V").unwrap(), 2);
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `smaliscope` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use smaliscope::{metadata::MethodRef, Error};
///
/// match MethodRef::parse("not a descriptor") {
///     Ok(method) => println!("parsed {method}"),
///     Err(Error::InvalidDescriptor(descriptor)) => println!("bad descriptor: {descriptor}"),
///     Err(e) => println!("Error: {e}"),
/// }
/// ```
pub use error::Error;
