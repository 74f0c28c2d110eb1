//! # smaliscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types of the
//! smaliscope library. Import it to get the types needed to describe classes, assemble
//! methods and run them through the virtual machine.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all smaliscope operations
pub use crate::Error;

/// The result type used throughout smaliscope
pub use crate::Result;

// ================================================================================================
// Input Model
// ================================================================================================

/// Class, method and field definitions
pub use crate::metadata::{AccessFlags, ClassDef, FieldDef, MethodDef};

/// Parsed smali references and type descriptors
pub use crate::metadata::{FieldRef, MethodRef, TypeDescriptor};

/// Instruction model and builder
pub use crate::assembly::{Instruction, MethodAssembler, Op};

// ================================================================================================
// Execution
// ================================================================================================

/// Virtual machine and its configuration
pub use crate::emulation::{VirtualMachine, VisitBudget, VmConfig};

/// Execution graphs and register state
pub use crate::emulation::{ContextGraph, RegisterContext, Value};

/// Execution failures
pub use crate::emulation::ExecutionError;
