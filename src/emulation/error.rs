//! Execution error types.
//!
//! This module defines the failure modes of abstract interpretation. Two of them are
//! resource ceilings that the [`crate::emulation::VirtualMachine`] recovers from; the
//! rest indicate malformed input or a modelling defect and are surfaced to the caller.

use std::fmt;

/// Errors that can occur while interpreting a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// A handler addressed a register outside the declared range.
    InvalidRegister {
        /// The requested register index.
        register: u32,
        /// Number of registers available in the context.
        register_count: usize,
    },
    /// A handler produced a successor address with no instruction behind it.
    InvalidAddress {
        /// Descriptor of the method being executed.
        method: String,
        /// The address that has no instruction.
        address: u32,
    },
    /// An address was visited more often than the configured ceiling allows.
    RevisitCeilingExceeded {
        /// Descriptor of the method being executed.
        method: String,
        /// Address of the offending node.
        address: u32,
        /// Human readable description of the offending node.
        node: String,
        /// The configured ceiling.
        limit: usize,
    },
    /// Nested invocation depth exceeded the configured ceiling.
    CallDepthExceeded {
        /// Depth that was about to be entered.
        depth: usize,
        /// Maximum allowed depth.
        limit: usize,
    },
    /// No execution graph is registered for a method descriptor.
    MethodNotFound {
        /// The requested method descriptor.
        descriptor: String,
    },
}

impl ExecutionError {
    /// Returns `true` for the resource ceilings the virtual machine converts into an
    /// absent result instead of propagating.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smaliscope::emulation::ExecutionError;
    ///
    /// let err = ExecutionError::CallDepthExceeded { depth: 51, limit: 50 };
    /// assert!(err.is_recoverable());
    ///
    /// let err = ExecutionError::InvalidRegister { register: 9, register_count: 4 };
    /// assert!(!err.is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ExecutionError::RevisitCeilingExceeded { .. }
                | ExecutionError::CallDepthExceeded { .. }
        )
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::InvalidRegister {
                register,
                register_count,
            } => {
                write!(
                    f,
                    "invalid register v{register} (register count: {register_count})"
                )
            }
            ExecutionError::InvalidAddress { method, address } => {
                write!(f, "no instruction at address {address} in {method}")
            }
            ExecutionError::RevisitCeilingExceeded {
                method,
                address,
                node,
                limit,
            } => {
                write!(
                    f,
                    "exceeded {limit} visits of #{address} ({node}) in {method}"
                )
            }
            ExecutionError::CallDepthExceeded { depth, limit } => {
                write!(f, "call depth exceeded: {depth} (limit: {limit})")
            }
            ExecutionError::MethodNotFound { descriptor } => {
                write!(f, "method not found: {descriptor}")
            }
        }
    }
}

impl std::error::Error for ExecutionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let errors = vec![
            ExecutionError::InvalidRegister {
                register: 7,
                register_count: 3,
            },
            ExecutionError::InvalidAddress {
                method: "LFoo;->bar()V".to_string(),
                address: 12,
            },
            ExecutionError::CallDepthExceeded {
                depth: 11,
                limit: 10,
            },
            ExecutionError::MethodNotFound {
                descriptor: "LFoo;->bar()V".to_string(),
            },
        ];

        for err in errors {
            let display = format!("{err}");
            assert!(!display.is_empty());
        }
    }

    #[test]
    fn test_revisit_names_node() {
        let err = ExecutionError::RevisitCeilingExceeded {
            method: "LFoo;->loop(I)V".to_string(),
            address: 4,
            node: "goto #0".to_string(),
            limit: 10,
        };
        let display = format!("{err}");
        assert!(display.contains("#4"));
        assert!(display.contains("goto #0"));
        assert!(display.contains("LFoo;->loop(I)V"));
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(ExecutionError::RevisitCeilingExceeded {
            method: String::new(),
            address: 0,
            node: String::new(),
            limit: 1,
        }
        .is_recoverable());
        assert!(!ExecutionError::MethodNotFound {
            descriptor: String::new()
        }
        .is_recoverable());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExecutionError>();
    }
}
