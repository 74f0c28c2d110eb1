//! Method execution engine.
//!
//! [`MethodExecutor`] is the single-threaded loop that interprets one method's
//! [`crate::emulation::ContextGraph`]. Nested invocations re-enter the
//! [`crate::emulation::VirtualMachine`], which starts a fresh executor for the callee.

mod executor;
mod visits;

pub use executor::MethodExecutor;
