//! Execution state: per-path registers and per-class statics.

mod class;
mod register;

pub use class::ClassContext;
pub use register::RegisterContext;
