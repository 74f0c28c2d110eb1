//! Value abstraction of the interpreter.
//!
//! - [`Value`] - `Known(type, payload)` or `Unknown(type)`
//! - [`Payload`] - Concrete contents of known values
//! - [`AllocationSite`] - Method and address of a `new-instance`
//! - [`Comparison`] - Three-way comparison with an explicit ambiguous outcome
//! - [`ops`] - Arithmetic, conversions and `cmp*` on abstract values

pub mod ops;
mod regvalue;

pub use regvalue::{AllocationSite, Comparison, Payload, Value};
