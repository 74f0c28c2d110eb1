//! Cross-method state and configuration.
//!
//! - [`VirtualMachine`] - Templates, class contexts, call depth, invocation
//! - [`VmConfig`] - Visit, call depth and array length ceilings
//! - [`VisitBudget`] - How revisits are counted

mod config;
mod machine;

pub use config::{VisitBudget, VmConfig};
pub use machine::{InvokeOutcome, VirtualMachine};
