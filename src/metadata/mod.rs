//! Input model: classes, members and type descriptors.
//!
//! # Key Components
//!
//! - [`ClassDef`], [`MethodDef`], [`FieldDef`] - Declarations consumed by the virtual machine
//! - [`MethodRef`], [`FieldRef`] - Member references used by instructions
//! - [`TypeDescriptor`] - Smali type descriptor strings
//! - [`AccessFlags`] - Dalvik access flags

mod class;
mod flags;
mod typesystem;

pub use class::{
    class_of_descriptor, CatchHandler, ClassDef, FieldDef, FieldRef, MethodDef, MethodRef,
    TryBlock, STATIC_INITIALIZER,
};
pub use flags::AccessFlags;
pub use typesystem::TypeDescriptor;
