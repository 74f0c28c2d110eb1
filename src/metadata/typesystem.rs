//! Smali type descriptors.
//!
//! Types are identified by their smali descriptor strings: single letters for
//! primitives (`I`, `J`, `Z`, ...), `Lpkg/Name;` for classes and a `[` prefix for
//! arrays. The special descriptor `?` marks a type that is not constrained at all,
//! which is what uninitialized registers carry.

use std::{fmt, sync::Arc};

/// Boxed primitive wrapper classes of `java.lang`.
const BOXED_PRIMITIVES: &[&str] = &[
    "Ljava/lang/Boolean;",
    "Ljava/lang/Byte;",
    "Ljava/lang/Character;",
    "Ljava/lang/Short;",
    "Ljava/lang/Integer;",
    "Ljava/lang/Long;",
    "Ljava/lang/Float;",
    "Ljava/lang/Double;",
];

/// A smali type descriptor such as `I`, `Ljava/lang/String;` or `[J`.
///
/// Descriptors are cheap to clone; the string is shared.
///
/// # Examples
///
/// ```rust
/// use smaliscope::metadata::TypeDescriptor;
///
/// let int = TypeDescriptor::int();
/// assert!(int.is_primitive());
///
/// let array = TypeDescriptor::new("[I");
/// assert!(array.is_array());
/// assert_eq!(array.component_type(), Some(int));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeDescriptor(Arc<str>);

impl TypeDescriptor {
    /// Creates a descriptor from its smali string form.
    #[must_use]
    pub fn new(descriptor: impl AsRef<str>) -> Self {
        TypeDescriptor(Arc::from(descriptor.as_ref()))
    }

    /// The unconstrained type carried by uninitialized registers.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new("?")
    }

    /// `V`
    #[must_use]
    pub fn void() -> Self {
        Self::new("V")
    }

    /// `Z`
    #[must_use]
    pub fn boolean() -> Self {
        Self::new("Z")
    }

    /// `B`
    #[must_use]
    pub fn byte() -> Self {
        Self::new("B")
    }

    /// `S`
    #[must_use]
    pub fn short() -> Self {
        Self::new("S")
    }

    /// `C`
    #[must_use]
    pub fn char() -> Self {
        Self::new("C")
    }

    /// `I`
    #[must_use]
    pub fn int() -> Self {
        Self::new("I")
    }

    /// `J`
    #[must_use]
    pub fn long() -> Self {
        Self::new("J")
    }

    /// `F`
    #[must_use]
    pub fn float() -> Self {
        Self::new("F")
    }

    /// `D`
    #[must_use]
    pub fn double() -> Self {
        Self::new("D")
    }

    /// `Ljava/lang/String;`
    #[must_use]
    pub fn string() -> Self {
        Self::new("Ljava/lang/String;")
    }

    /// `Ljava/lang/Class;`
    #[must_use]
    pub fn class() -> Self {
        Self::new("Ljava/lang/Class;")
    }

    /// `Ljava/lang/Object;`
    #[must_use]
    pub fn object() -> Self {
        Self::new("Ljava/lang/Object;")
    }

    /// Returns the descriptor string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the unconstrained type `?`.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.as_str() == "?"
    }

    /// Returns `true` for `V`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.as_str() == "V"
    }

    /// Returns `true` for the eight primitive value types.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self.as_str(), "Z" | "B" | "S" | "C" | "I" | "J" | "F" | "D")
    }

    /// Returns `true` for `J` and `D`, which occupy a register pair in real Dalvik code.
    #[must_use]
    pub fn is_wide(&self) -> bool {
        matches!(self.as_str(), "J" | "D")
    }

    /// Returns `true` for array types.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.as_str().starts_with('[')
    }

    /// Returns `true` for class and array types.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.is_array() || (self.as_str().starts_with('L') && self.as_str().ends_with(';'))
    }

    /// Returns `true` for `java.lang.String`.
    #[must_use]
    pub fn is_string(&self) -> bool {
        self.as_str() == "Ljava/lang/String;"
    }

    /// Returns `true` for the `java.lang` wrapper classes of primitives.
    #[must_use]
    pub fn is_boxed_primitive(&self) -> bool {
        BOXED_PRIMITIVES.contains(&self.as_str())
    }

    /// Returns the element type of an array type.
    #[must_use]
    pub fn component_type(&self) -> Option<TypeDescriptor> {
        self.as_str().strip_prefix('[').map(TypeDescriptor::new)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeDescriptor {
    fn from(value: &str) -> Self {
        TypeDescriptor::new(value)
    }
}

impl From<String> for TypeDescriptor {
    fn from(value: String) -> Self {
        TypeDescriptor(Arc::from(value))
    }
}

/// Splits a run of concatenated descriptors such as `IJ[Ljava/lang/String;Z`.
///
/// Returns `None` if the input is not a well-formed descriptor list.
pub(crate) fn split_descriptors(mut input: &str) -> Option<Vec<TypeDescriptor>> {
    let mut result = Vec::new();
    while !input.is_empty() {
        let dims = input.bytes().take_while(|b| *b == b'[').count();
        let rest = &input[dims..];
        let len = match rest.as_bytes().first()? {
            b'Z' | b'B' | b'S' | b'C' | b'I' | b'J' | b'F' | b'D' | b'V' => 1,
            b'L' => rest.find(';')? + 1,
            _ => return None,
        };
        if dims > 0 && rest.starts_with('V') {
            return None;
        }
        result.push(TypeDescriptor::new(&input[..dims + len]));
        input = &input[dims + len..];
    }
    Some(result)
}
