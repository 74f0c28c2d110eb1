//! Classes, fields and methods as supplied by the bytecode parser.
//!
//! These types form the input boundary of the engine. A parser (not part of this
//! crate) produces one [`ClassDef`] per class with its [`FieldDef`]s and
//! [`MethodDef`]s; the [`crate::emulation::VirtualMachine`] consumes them once at
//! construction. References to members of other classes appear inside instructions as
//! [`MethodRef`] and [`FieldRef`], which may point at classes that were never defined
//! (framework or library code).

use std::fmt;

use crate::{
    assembly::{Instruction, Literal},
    metadata::{flags::AccessFlags, typesystem::split_descriptors, TypeDescriptor},
    Error, Result,
};

/// Name of the static initializer method.
pub const STATIC_INITIALIZER: &str = "<clinit>";

/// Reference to a method by class, name and signature.
///
/// # Examples
///
/// ```rust
/// use smaliscope::metadata::MethodRef;
///
/// let method = MethodRef::parse("Lcom/example/Math;->add(II)I")?;
/// assert_eq!(method.name, "add");
/// assert_eq!(method.parameters.len(), 2);
/// assert_eq!(method.descriptor(), "Lcom/example/Math;->add(II)I");
/// # Ok::<(), smaliscope::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodRef {
    /// Declaring class.
    pub class: TypeDescriptor,
    /// Simple method name.
    pub name: String,
    /// Declared parameter types, excluding the receiver.
    pub parameters: Vec<TypeDescriptor>,
    /// Declared return type.
    pub return_type: TypeDescriptor,
}

impl MethodRef {
    /// Parses a smali method descriptor `Lpkg/Class;->name(Params)Ret`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDescriptor`] if the string is not a method descriptor.
    pub fn parse(descriptor: &str) -> Result<Self> {
        let invalid = || Error::InvalidDescriptor(descriptor.to_string());

        let (class, member) = descriptor.split_once("->").ok_or_else(invalid)?;
        let (name, signature) = member.split_once('(').ok_or_else(invalid)?;
        let (params, ret) = signature.split_once(')').ok_or_else(invalid)?;

        let class = split_descriptors(class).ok_or_else(invalid)?;
        let parameters = split_descriptors(params).ok_or_else(invalid)?;
        let ret = split_descriptors(ret).ok_or_else(invalid)?;

        if class.len() != 1 || ret.len() != 1 || name.is_empty() {
            return Err(invalid());
        }
        if parameters.iter().any(TypeDescriptor::is_void) {
            return Err(invalid());
        }

        Ok(MethodRef {
            class: class[0].clone(),
            name: name.to_string(),
            parameters,
            return_type: ret[0].clone(),
        })
    }

    /// Returns the globally unique descriptor string of this method.
    #[must_use]
    pub fn descriptor(&self) -> String {
        self.to_string()
    }

    /// Returns `true` if this is a class's static initializer.
    #[must_use]
    pub fn is_static_initializer(&self) -> bool {
        self.name == STATIC_INITIALIZER
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}(", self.class, self.name)?;
        for parameter in &self.parameters {
            write!(f, "{parameter}")?;
        }
        write!(f, "){}", self.return_type)
    }
}

/// Reference to a field by class, name and type.
///
/// # Examples
///
/// ```rust
/// use smaliscope::metadata::FieldRef;
///
/// let field = FieldRef::parse("Lcom/example/Config;->DEBUG:Z")?;
/// assert_eq!(field.name, "DEBUG");
/// assert!(field.ty.is_primitive());
/// # Ok::<(), smaliscope::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldRef {
    /// Declaring class.
    pub class: TypeDescriptor,
    /// Field name.
    pub name: String,
    /// Field type.
    pub ty: TypeDescriptor,
}

impl FieldRef {
    /// Parses a smali field descriptor `Lpkg/Class;->name:Type`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDescriptor`] if the string is not a field descriptor.
    pub fn parse(descriptor: &str) -> Result<Self> {
        let invalid = || Error::InvalidDescriptor(descriptor.to_string());

        let (class, member) = descriptor.split_once("->").ok_or_else(invalid)?;
        let (name, ty) = member.split_once(':').ok_or_else(invalid)?;

        let class = split_descriptors(class).ok_or_else(invalid)?;
        let ty = split_descriptors(ty).ok_or_else(invalid)?;
        if class.len() != 1 || ty.len() != 1 || ty[0].is_void() || name.is_empty() {
            return Err(invalid());
        }

        Ok(FieldRef {
            class: class[0].clone(),
            name: name.to_string(),
            ty: ty[0].clone(),
        })
    }

    /// Returns the descriptor string of this field.
    #[must_use]
    pub fn descriptor(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}:{}", self.class, self.name, self.ty)
    }
}

/// A field declared by a class.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Field type.
    pub ty: TypeDescriptor,
    /// Access flags.
    pub flags: AccessFlags,
    /// Initial value from the class's static value array, if any.
    pub initial_value: Option<Literal>,
}

impl FieldDef {
    /// Creates a field without an initial value.
    #[must_use]
    pub fn new(name: &str, ty: impl Into<TypeDescriptor>, flags: AccessFlags) -> Self {
        FieldDef {
            name: name.to_string(),
            ty: ty.into(),
            flags,
            initial_value: None,
        }
    }

    /// Sets the initial value of a static field.
    #[must_use]
    pub fn with_initial_value(mut self, value: Literal) -> Self {
        self.initial_value = Some(value);
        self
    }

    /// Returns `true` for static fields.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(AccessFlags::STATIC)
    }
}

/// Exception handler of a [`TryBlock`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatchHandler {
    /// Caught exception type, `None` for a catch-all.
    pub exception_type: Option<TypeDescriptor>,
    /// Address of the first handler instruction.
    pub handler_address: u32,
}

/// A protected range of instructions with its handlers.
///
/// Try blocks are recorded for the consumers of the execution graphs; exception
/// flow itself is not simulated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TryBlock {
    /// Address of the first covered instruction.
    pub start_address: u32,
    /// Number of code units covered.
    pub code_units: u32,
    /// Handlers in declaration order.
    pub handlers: Vec<CatchHandler>,
}

impl TryBlock {
    /// Returns `true` if the block covers `address`.
    #[must_use]
    pub fn covers(&self, address: u32) -> bool {
        address >= self.start_address && address - self.start_address < self.code_units
    }
}

/// A method declared by a class, with its implementation.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodDef {
    /// Declaring class, name and signature.
    pub reference: MethodRef,
    /// Access flags.
    pub flags: AccessFlags,
    /// Total registers of the frame: locals, receiver and parameters.
    pub register_count: u16,
    /// Instructions ordered by address.
    pub instructions: Vec<Instruction>,
    /// Try/catch regions.
    pub try_blocks: Vec<TryBlock>,
}

impl MethodDef {
    /// Creates a method from its descriptor string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDescriptor`] if `descriptor` cannot be parsed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smaliscope::{assembly::MethodAssembler, metadata::{AccessFlags, MethodDef}};
    ///
    /// let mut asm = MethodAssembler::new();
    /// asm.return_void();
    ///
    /// let method = MethodDef::new(
    ///     "Lcom/example/Empty;-><clinit>()V",
    ///     AccessFlags::STATIC | AccessFlags::CONSTRUCTOR,
    ///     0,
    ///     asm.finish()?,
    /// )?;
    /// assert!(method.is_static_initializer());
    /// # Ok::<(), smaliscope::Error>(())
    /// ```
    pub fn new(
        descriptor: &str,
        flags: AccessFlags,
        register_count: u16,
        instructions: Vec<Instruction>,
    ) -> Result<Self> {
        Ok(MethodDef {
            reference: MethodRef::parse(descriptor)?,
            flags,
            register_count,
            instructions,
            try_blocks: Vec::new(),
        })
    }

    /// Attaches try/catch regions.
    #[must_use]
    pub fn with_try_blocks(mut self, try_blocks: Vec<TryBlock>) -> Self {
        self.try_blocks = try_blocks;
        self
    }

    /// Returns the globally unique descriptor string of this method.
    #[must_use]
    pub fn descriptor(&self) -> String {
        self.reference.descriptor()
    }

    /// Returns the declaring class.
    #[must_use]
    pub fn class(&self) -> &TypeDescriptor {
        &self.reference.class
    }

    /// Returns `true` for methods without a receiver.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(AccessFlags::STATIC)
    }

    /// Returns `true` if this is the class's static initializer.
    #[must_use]
    pub fn is_static_initializer(&self) -> bool {
        self.reference.is_static_initializer()
    }

    /// Returns `true` if the method carries instructions.
    #[must_use]
    pub fn has_implementation(&self) -> bool {
        !self.instructions.is_empty()
    }

    /// Number of registers occupied by the receiver and the declared parameters.
    #[must_use]
    pub fn incoming_register_count(&self) -> usize {
        self.reference.parameters.len() + usize::from(!self.is_static())
    }
}

/// A class with its declared members.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassDef {
    /// Class type descriptor.
    pub name: TypeDescriptor,
    /// Access flags.
    pub flags: AccessFlags,
    /// Declared fields, static and instance.
    pub fields: Vec<FieldDef>,
    /// Declared methods.
    pub methods: Vec<MethodDef>,
}

impl ClassDef {
    /// Creates a class without members.
    #[must_use]
    pub fn new(name: impl Into<TypeDescriptor>, flags: AccessFlags) -> Self {
        ClassDef {
            name: name.into(),
            flags,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a method.
    #[must_use]
    pub fn with_method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    /// Returns `true` if the class cannot be subclassed.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.flags.contains(AccessFlags::FINAL)
    }

    /// Iterates the static fields.
    pub fn static_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|field| field.is_static())
    }
}

/// Returns the declaring class of a method or field descriptor.
///
/// ```rust
/// use smaliscope::metadata::class_of_descriptor;
///
/// assert_eq!(class_of_descriptor("LFoo;->bar()V").as_str(), "LFoo;");
/// ```
#[must_use]
pub fn class_of_descriptor(descriptor: &str) -> TypeDescriptor {
    let class = descriptor
        .split_once("->")
        .map_or(descriptor, |(class, _)| class);
    TypeDescriptor::new(class)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method_ref() {
        let method = MethodRef::parse("Lcom/Foo;->bar(I[JLjava/lang/String;)V").unwrap();
        assert_eq!(method.class, TypeDescriptor::new("Lcom/Foo;"));
        assert_eq!(method.name, "bar");
        assert_eq!(
            method.parameters,
            vec![
                TypeDescriptor::int(),
                TypeDescriptor::new("[J"),
                TypeDescriptor::string()
            ]
        );
        assert!(method.return_type.is_void());
        assert_eq!(method.descriptor(), "Lcom/Foo;->bar(I[JLjava/lang/String;)V");
    }

    #[test]
    fn test_parse_method_ref_rejects_garbage() {
        assert!(MethodRef::parse("Lcom/Foo;.bar()V").is_err());
        assert!(MethodRef::parse("Lcom/Foo;->bar(V)V").is_err());
        assert!(MethodRef::parse("Lcom/Foo;->bar()").is_err());
        assert!(MethodRef::parse("Lcom/Foo;->()V").is_err());
    }

    #[test]
    fn test_parse_field_ref() {
        let field = FieldRef::parse("Lcom/Foo;->count:I").unwrap();
        assert_eq!(field.name, "count");
        assert_eq!(field.ty, TypeDescriptor::int());
        assert_eq!(field.descriptor(), "Lcom/Foo;->count:I");
        assert!(FieldRef::parse("Lcom/Foo;->count:V").is_err());
        assert!(FieldRef::parse("Lcom/Foo;->count").is_err());
    }

    #[test]
    fn test_incoming_registers() {
        let instance = MethodDef::new("LFoo;->f(IJ)V", AccessFlags::PUBLIC, 4, vec![]).unwrap();
        assert_eq!(instance.incoming_register_count(), 3);
        assert!(!instance.has_implementation());

        let stat = MethodDef::new("LFoo;->g(IJ)V", AccessFlags::STATIC, 4, vec![]).unwrap();
        assert_eq!(stat.incoming_register_count(), 2);
    }

    #[test]
    fn test_try_block_covers() {
        let block = TryBlock {
            start_address: 4,
            code_units: 6,
            handlers: vec![],
        };
        assert!(!block.covers(3));
        assert!(block.covers(4));
        assert!(block.covers(9));
        assert!(!block.covers(10));
    }

    #[test]
    fn test_class_of_descriptor() {
        assert_eq!(class_of_descriptor("LFoo;->x:I"), TypeDescriptor::new("LFoo;"));
        assert_eq!(class_of_descriptor("LFoo;"), TypeDescriptor::new("LFoo;"));
    }
}
