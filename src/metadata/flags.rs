//! Dalvik access flags for classes, fields and methods.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Access flags as encoded in `class_def_item`, `encoded_field` and `encoded_method`.
    pub struct AccessFlags: u32 {
        /// Visible everywhere
        const PUBLIC = 0x0001;
        /// Only visible to the defining class
        const PRIVATE = 0x0002;
        /// Visible to the package and subclasses
        const PROTECTED = 0x0004;
        /// Not bound to an instance
        const STATIC = 0x0008;
        /// Not subclassable (classes) or not reassignable after construction (fields)
        const FINAL = 0x0010;
        /// Method acquires the monitor of its receiver or class
        const SYNCHRONIZED = 0x0020;
        /// Field with special access rules for thread safety
        const VOLATILE = 0x0040;
        /// Field not saved by default serialization
        const TRANSIENT = 0x0080;
        /// Method implemented in native code
        const NATIVE = 0x0100;
        /// Class is an interface
        const INTERFACE = 0x0200;
        /// Class or method without a concrete implementation
        const ABSTRACT = 0x0400;
        /// Strict floating point rules
        const STRICT = 0x0800;
        /// Not directly defined in source code
        const SYNTHETIC = 0x1000;
        /// Class is an annotation type
        const ANNOTATION = 0x2000;
        /// Enumerated type or enum value
        const ENUM = 0x4000;
        /// Constructor or static initializer
        const CONSTRUCTOR = 0x0001_0000;
    }
}
