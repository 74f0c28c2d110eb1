use thiserror::Error;

use crate::emulation::ExecutionError;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Input Model Errors
/// - [`Error::Malformed`] - Inconsistent classes, methods or instruction streams
/// - [`Error::InvalidDescriptor`] - A smali method, field or type descriptor failed to parse
///
/// ## Assembler Errors
/// - [`Error::DuplicateLabel`] - A label was defined twice
/// - [`Error::UndefinedLabel`] - A branch references a label that was never defined
///
/// ## Execution Errors
/// - [`Error::Execution`] - Failures raised while interpreting a method, see
///   [`ExecutionError`]
///
/// # Examples
///
/// ```rust
/// use smaliscope::{emulation::ExecutionError, Error};
///
/// fn describe(err: &Error) -> String {
///     match err {
///         Error::Execution(ExecutionError::InvalidRegister { register, .. }) => {
///             format!("bad register v{register}")
///         }
///         Error::Malformed { message, .. } => format!("malformed input: {message}"),
///         other => other.to_string(),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The input model is inconsistent and could not be turned into execution graphs.
    ///
    /// This error indicates structural problems such as duplicate instruction addresses,
    /// a register count too small for the declared parameters, or an invocation whose
    /// argument count does not match the callee. The error includes the source location
    /// where the malformation was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A smali descriptor could not be parsed.
    ///
    /// Raised by [`crate::metadata::MethodRef::parse`] and
    /// [`crate::metadata::FieldRef::parse`] for strings that do not follow the
    /// `Lpkg/Class;->name(Params)Ret` or `Lpkg/Class;->name:Type` shape.
    #[error("Invalid descriptor - {0}")]
    InvalidDescriptor(String),

    /// A label was defined more than once in a [`crate::assembly::MethodAssembler`].
    #[error("Duplicate label - {0}")]
    DuplicateLabel(String),

    /// A branch references a label that was never defined.
    #[error("Undefined label - {0}")]
    UndefinedLabel(String),

    /// Interpreting a method failed.
    ///
    /// Ceiling breaches are normally absorbed by the
    /// [`crate::emulation::VirtualMachine`] and only reach callers that drive a
    /// [`crate::emulation::MethodExecutor`] directly.
    #[error("{0}")]
    Execution(#[from] ExecutionError),
}
