//! Register values of the abstract interpreter.
//!
//! A register holds either a [`Value::Known`] value, a declared type plus a concrete
//! [`Payload`], or a [`Value::Unknown`] value that carries only the type. Unknown is the
//! top of the lattice: any operation that consumes it produces an unknown result, and
//! any comparison involving it is [`Comparison::Ambiguous`].
//!
//! # Equality
//!
//! Structural equality (`==`) is what consensus queries use: two values are equal if
//! they have the same tag, the same declared type and, for known values, the same
//! payload. Float payloads compare by bit pattern so `NaN == NaN` holds structurally.
//!
//! Program-level equality, as evaluated by a conditional branch, is
//! [`Value::equals`] and [`Value::compare`].

use std::{cmp::Ordering, fmt, sync::Arc};

use crate::{assembly::Literal, metadata::TypeDescriptor};

/// Concrete contents of a known value.
#[derive(Clone, Debug)]
pub enum Payload {
    /// `boolean`
    Boolean(bool),
    /// `byte`
    Byte(i8),
    /// `short`
    Short(i16),
    /// `char`
    Char(u16),
    /// `int`
    Int(i32),
    /// `long`
    Long(i64),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// String contents
    String(Arc<str>),
    /// Class literal
    Class(TypeDescriptor),
    /// The `null` reference
    Null,
    /// An object whose fields are not tracked.
    ///
    /// `site` is the allocating `new-instance`, `None` for the receiver of the
    /// analysed method.
    Instance {
        /// Allocation site
        site: Option<AllocationSite>,
    },
    /// Array elements
    Array(imbl::Vector<Value>),
}

/// The `new-instance` an object was allocated by.
///
/// Sites are qualified with the allocating method, so objects from the same address
/// of different methods stay distinct.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AllocationSite {
    /// Descriptor of the allocating method
    pub method: Arc<str>,
    /// Address of the `new-instance`
    pub address: u32,
}

impl AllocationSite {
    /// Site of the `new-instance` at `address` in `method`.
    #[must_use]
    pub fn new(method: impl Into<Arc<str>>, address: u32) -> Self {
        AllocationSite {
            method: method.into(),
            address,
        }
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Payload::Boolean(a), Payload::Boolean(b)) => a == b,
            (Payload::Byte(a), Payload::Byte(b)) => a == b,
            (Payload::Short(a), Payload::Short(b)) => a == b,
            (Payload::Char(a), Payload::Char(b)) => a == b,
            (Payload::Int(a), Payload::Int(b)) => a == b,
            (Payload::Long(a), Payload::Long(b)) => a == b,
            (Payload::Float(a), Payload::Float(b)) => a.to_bits() == b.to_bits(),
            (Payload::Double(a), Payload::Double(b)) => a.to_bits() == b.to_bits(),
            (Payload::String(a), Payload::String(b)) => a == b,
            (Payload::Class(a), Payload::Class(b)) => a == b,
            (Payload::Null, Payload::Null) => true,
            (Payload::Instance { site: a }, Payload::Instance { site: b }) => a == b,
            (Payload::Array(a), Payload::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl Payload {
    /// Integral view of the payload, including `boolean` as 0/1 and `null` as 0.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Payload::Boolean(v) => Some(i64::from(*v)),
            Payload::Byte(v) => Some(i64::from(*v)),
            Payload::Short(v) => Some(i64::from(*v)),
            Payload::Char(v) => Some(i64::from(*v)),
            Payload::Int(v) => Some(i64::from(*v)),
            Payload::Long(v) => Some(*v),
            Payload::Null => Some(0),
            _ => None,
        }
    }

    /// Floating point view of the payload.
    ///
    /// Integral payloads convert by value; use [`Payload::as_f32_bits`] for the raw
    /// reinterpretation Dalvik applies to untyped constants.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Payload::Float(v) => Some(f64::from(*v)),
            Payload::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// `float` view, reinterpreting the bits of a 32-bit integral payload.
    #[must_use]
    pub fn as_f32_bits(&self) -> Option<f32> {
        match self {
            Payload::Float(v) => Some(*v),
            Payload::Double(v) => Some(*v as f32),
            Payload::Int(v) => Some(f32::from_bits(*v as u32)),
            _ => None,
        }
    }

    /// `double` view, reinterpreting the bits of a 64-bit integral payload.
    #[must_use]
    pub fn as_f64_bits(&self) -> Option<f64> {
        match self {
            Payload::Double(v) => Some(*v),
            Payload::Float(v) => Some(f64::from(*v)),
            Payload::Long(v) => Some(f64::from_bits(*v as u64)),
            _ => None,
        }
    }

    fn is_reference(&self) -> bool {
        matches!(
            self,
            Payload::String(_)
                | Payload::Class(_)
                | Payload::Instance { .. }
                | Payload::Array(_)
        )
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Boolean(v) => write!(f, "{v}"),
            Payload::Byte(v) => write!(f, "{v}"),
            Payload::Short(v) => write!(f, "{v}"),
            Payload::Char(v) => write!(f, "'\\u{v:04x}'"),
            Payload::Int(v) => write!(f, "{v}"),
            Payload::Long(v) => write!(f, "{v}L"),
            Payload::Float(v) => write!(f, "{v}f"),
            Payload::Double(v) => write!(f, "{v}d"),
            Payload::String(v) => write!(f, "{v:?}"),
            Payload::Class(v) => write!(f, "{v}.class"),
            Payload::Null => f.write_str("null"),
            Payload::Instance { site: None } => f.write_str("this"),
            Payload::Instance { site: Some(site) } => write!(f, "new@{}", site.address),
            Payload::Array(elements) => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Outcome of comparing two values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// `lhs < rhs`
    Less,
    /// `lhs == rhs`
    Equal,
    /// `lhs > rhs`
    Greater,
    /// The relation cannot be decided.
    Ambiguous,
}

impl Comparison {
    /// Returns the ordering, `None` if ambiguous.
    #[must_use]
    pub fn ordering(self) -> Option<Ordering> {
        match self {
            Comparison::Less => Some(Ordering::Less),
            Comparison::Equal => Some(Ordering::Equal),
            Comparison::Greater => Some(Ordering::Greater),
            Comparison::Ambiguous => None,
        }
    }
}

impl From<Ordering> for Comparison {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Comparison::Less,
            Ordering::Equal => Comparison::Equal,
            Ordering::Greater => Comparison::Greater,
        }
    }
}

/// Abstract value of a register.
///
/// # Examples
///
/// ```rust
/// use smaliscope::emulation::{Comparison, Value};
/// use smaliscope::metadata::TypeDescriptor;
///
/// let five = Value::int(5);
/// let unknown = Value::unknown(TypeDescriptor::int());
///
/// assert_eq!(five.compare(&Value::int(7)), Comparison::Less);
/// assert_eq!(five.compare(&unknown), Comparison::Ambiguous);
/// assert_eq!(five.equals(&unknown), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A concrete value of a declared type.
    Known {
        /// Declared type
        ty: TypeDescriptor,
        /// Contents
        payload: Payload,
    },
    /// Some value of a declared type.
    Unknown {
        /// Declared type
        ty: TypeDescriptor,
    },
}

impl Value {
    /// Creates a known value.
    #[must_use]
    pub fn known(ty: TypeDescriptor, payload: Payload) -> Self {
        Value::Known { ty, payload }
    }

    /// Creates an unknown value of `ty`.
    #[must_use]
    pub fn unknown(ty: TypeDescriptor) -> Self {
        Value::Unknown { ty }
    }

    /// Value of a register that was never written: unknown of the unconstrained type.
    #[must_use]
    pub fn uninitialized() -> Self {
        Value::unknown(TypeDescriptor::unknown())
    }

    /// Known `int`.
    #[must_use]
    pub fn int(value: i32) -> Self {
        Value::known(TypeDescriptor::int(), Payload::Int(value))
    }

    /// Known `long`.
    #[must_use]
    pub fn long(value: i64) -> Self {
        Value::known(TypeDescriptor::long(), Payload::Long(value))
    }

    /// Known `float`.
    #[must_use]
    pub fn float(value: f32) -> Self {
        Value::known(TypeDescriptor::float(), Payload::Float(value))
    }

    /// Known `double`.
    #[must_use]
    pub fn double(value: f64) -> Self {
        Value::known(TypeDescriptor::double(), Payload::Double(value))
    }

    /// Known `boolean`.
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Value::known(TypeDescriptor::boolean(), Payload::Boolean(value))
    }

    /// Known `java.lang.String`.
    #[must_use]
    pub fn string(value: &str) -> Self {
        Value::known(TypeDescriptor::string(), Payload::String(Arc::from(value)))
    }

    /// Known class literal.
    #[must_use]
    pub fn class_literal(class: TypeDescriptor) -> Self {
        Value::known(TypeDescriptor::class(), Payload::Class(class))
    }

    /// `null` of type `ty`.
    #[must_use]
    pub fn null(ty: TypeDescriptor) -> Self {
        Value::known(ty, Payload::Null)
    }

    /// Object of type `ty` allocated at `site`, `None` for the receiver.
    #[must_use]
    pub fn instance(ty: TypeDescriptor, site: Option<AllocationSite>) -> Self {
        Value::known(ty, Payload::Instance { site })
    }

    /// Array of type `ty` with the given elements.
    #[must_use]
    pub fn array(ty: TypeDescriptor, elements: imbl::Vector<Value>) -> Self {
        Value::known(ty, Payload::Array(elements))
    }

    /// Java default value of a field or array element of type `ty`.
    ///
    /// `void` and the unconstrained type have no default and yield an unknown value.
    #[must_use]
    pub fn default_for(ty: &TypeDescriptor) -> Self {
        let payload = match ty.as_str() {
            "Z" => Payload::Boolean(false),
            "B" => Payload::Byte(0),
            "S" => Payload::Short(0),
            "C" => Payload::Char(0),
            "I" => Payload::Int(0),
            "J" => Payload::Long(0),
            "F" => Payload::Float(0.0),
            "D" => Payload::Double(0.0),
            _ if ty.is_reference() => Payload::Null,
            _ => return Value::unknown(ty.clone()),
        };
        Value::known(ty.clone(), payload)
    }

    /// Value of a constant operand as loaded by a `const*` instruction.
    #[must_use]
    pub fn from_literal(literal: &Literal) -> Self {
        match literal {
            Literal::Int(v) => Value::int(*v),
            Literal::Long(v) => Value::long(*v),
            Literal::Float(v) => Value::float(*v),
            Literal::Double(v) => Value::double(*v),
            Literal::String(v) => Value::string(v),
            Literal::Class(ty) => Value::class_literal(ty.clone()),
            Literal::Null => Value::null(TypeDescriptor::object()),
        }
    }

    /// Value of a constant stored into a field or array of type `ty`.
    ///
    /// Integral literals narrow to the sub-word types; anything that does not fit the
    /// declared type becomes unknown.
    #[must_use]
    pub fn from_literal_typed(literal: &Literal, ty: &TypeDescriptor) -> Self {
        let payload = match (literal, ty.as_str()) {
            (Literal::Int(v), "Z") => Payload::Boolean(*v != 0),
            (Literal::Int(v), "B") => Payload::Byte(*v as i8),
            (Literal::Int(v), "S") => Payload::Short(*v as i16),
            (Literal::Int(v), "C") => Payload::Char(*v as u16),
            (Literal::Int(v), "I") => Payload::Int(*v),
            (Literal::Long(v), "J") => Payload::Long(*v),
            (Literal::Int(v), "J") => Payload::Long(i64::from(*v)),
            (Literal::Float(v), "F") => Payload::Float(*v),
            (Literal::Double(v), "D") => Payload::Double(*v),
            (Literal::Null, _) if ty.is_reference() => Payload::Null,
            (Literal::String(v), _) if ty.is_reference() => Payload::String(Arc::from(v.as_str())),
            (Literal::Class(class), _) if ty.is_reference() => Payload::Class(class.clone()),
            _ => return Value::unknown(ty.clone()),
        };
        Value::known(ty.clone(), payload)
    }

    /// Declared type.
    #[must_use]
    pub fn ty(&self) -> &TypeDescriptor {
        match self {
            Value::Known { ty, .. } | Value::Unknown { ty } => ty,
        }
    }

    /// Returns `true` for known values.
    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Value::Known { .. })
    }

    /// Returns `true` for unknown values.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        !self.is_known()
    }

    /// Contents of a known value.
    #[must_use]
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Value::Known { payload, .. } => Some(payload),
            Value::Unknown { .. } => None,
        }
    }

    /// Integral contents, `null` counting as zero.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.payload().and_then(Payload::as_i64)
    }

    /// Contents truncated to `int`.
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        self.as_i64().map(|v| v as i32)
    }

    /// Elements of a known array.
    #[must_use]
    pub fn as_array(&self) -> Option<&imbl::Vector<Value>> {
        match self.payload() {
            Some(Payload::Array(elements)) => Some(elements),
            _ => None,
        }
    }

    /// Returns `true` if the value is known and carries contents a callee could mutate.
    #[must_use]
    pub fn has_mutable_content(&self) -> bool {
        self.as_array().is_some()
    }

    /// The unknown value of the same type.
    #[must_use]
    pub fn widen(&self) -> Value {
        Value::unknown(self.ty().clone())
    }

    /// Program-level equality, `None` if it cannot be decided.
    #[must_use]
    pub fn equals(&self, other: &Value) -> Option<bool> {
        self.compare(other).ordering().map(|o| o == Ordering::Equal)
    }

    /// Three-way comparison as evaluated by conditional branches.
    ///
    /// Integral values compare numerically, floats follow `Float.compare` ordering
    /// (`NaN` above everything and equal to itself, `-0.0` below `0.0`) and strings
    /// compare by contents. `null` equals `null` and zero; a known non-null reference
    /// compares above both. References without tracked identity are ambiguous.
    #[must_use]
    pub fn compare(&self, other: &Value) -> Comparison {
        let (Some(lhs), Some(rhs)) = (self.payload(), other.payload()) else {
            return Comparison::Ambiguous;
        };

        if let (Some(a), Some(b)) = (lhs.as_f64(), rhs.as_f64()) {
            return java_float_compare(a, b).into();
        }
        if let (Some(a), Some(b)) = (lhs.as_i64(), rhs.as_i64()) {
            return a.cmp(&b).into();
        }

        match (lhs, rhs) {
            (Payload::String(a), Payload::String(b)) => a.cmp(b).into(),
            (Payload::Class(a), Payload::Class(b)) if a == b => Comparison::Equal,
            (reference, Payload::Null) if reference.is_reference() => Comparison::Greater,
            (Payload::Null, reference) if reference.is_reference() => Comparison::Less,
            (reference, other) if reference.is_reference() && other.as_i64() == Some(0) => {
                Comparison::Greater
            }
            (other, reference) if reference.is_reference() && other.as_i64() == Some(0) => {
                Comparison::Less
            }
            _ => Comparison::Ambiguous,
        }
    }
}

/// `Float.compare`/`Double.compare` ordering.
fn java_float_compare(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.total_cmp(&b),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Known { ty, payload } => write!(f, "{payload}:{ty}"),
            Value::Unknown { ty } => write!(f, "unknown:{ty}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        assert_eq!(Value::int(3), Value::int(3));
        assert_ne!(Value::int(3), Value::long(3));
        assert_ne!(Value::int(3), Value::unknown(TypeDescriptor::int()));
        assert_eq!(
            Value::unknown(TypeDescriptor::int()),
            Value::unknown(TypeDescriptor::int())
        );
        assert_eq!(Value::float(f32::NAN), Value::float(f32::NAN));
        assert_ne!(Value::double(0.0), Value::double(-0.0));
    }

    #[test]
    fn test_compare_integral() {
        assert_eq!(Value::int(1).compare(&Value::int(2)), Comparison::Less);
        assert_eq!(Value::long(9).compare(&Value::int(2)), Comparison::Greater);
        assert_eq!(Value::boolean(true).compare(&Value::int(1)), Comparison::Equal);
        assert_eq!(Value::int(0).equals(&Value::int(0)), Some(true));
    }

    #[test]
    fn test_compare_float_semantics() {
        let nan = Value::float(f32::NAN);
        assert_eq!(nan.compare(&nan), Comparison::Equal);
        assert_eq!(nan.compare(&Value::float(f32::INFINITY)), Comparison::Greater);
        assert_eq!(
            Value::double(-0.0).compare(&Value::double(0.0)),
            Comparison::Less
        );
        assert_eq!(Value::float(1.5).compare(&Value::double(1.5)), Comparison::Equal);
    }

    #[test]
    fn test_compare_references() {
        let null = Value::null(TypeDescriptor::object());
        assert_eq!(null.compare(&null), Comparison::Equal);
        assert_eq!(null.compare(&Value::int(0)), Comparison::Equal);

        let s = Value::string("abc");
        assert_eq!(s.compare(&null), Comparison::Greater);
        assert_eq!(s.compare(&Value::int(0)), Comparison::Greater);
        assert_eq!(s.compare(&Value::string("abd")), Comparison::Less);
        assert_eq!(s.equals(&Value::string("abc")), Some(true));

        let a = Value::instance(
            TypeDescriptor::object(),
            Some(AllocationSite::new("LFoo;->a()V", 2)),
        );
        let b = Value::instance(
            TypeDescriptor::object(),
            Some(AllocationSite::new("LFoo;->a()V", 6)),
        );
        assert_eq!(a.compare(&b), Comparison::Ambiguous);
        assert_eq!(a.compare(&a), Comparison::Ambiguous);
        assert_eq!(a.equals(&null), Some(false));
    }

    #[test]
    fn test_allocation_sites_are_method_qualified() {
        let ty = TypeDescriptor::new("LBar;");
        let here = Value::instance(ty.clone(), Some(AllocationSite::new("LFoo;->a()V", 2)));
        let there = Value::instance(ty.clone(), Some(AllocationSite::new("LFoo;->b()V", 2)));
        assert_ne!(here, there);
        assert_eq!(
            here,
            Value::instance(ty, Some(AllocationSite::new("LFoo;->a()V", 2)))
        );
        assert_eq!(here.to_string(), "new@2:LBar;");
    }

    #[test]
    fn test_unknown_is_ambiguous() {
        let unknown = Value::unknown(TypeDescriptor::int());
        assert_eq!(unknown.compare(&Value::int(0)), Comparison::Ambiguous);
        assert_eq!(Value::int(0).compare(&unknown), Comparison::Ambiguous);
        assert_eq!(unknown.compare(&unknown), Comparison::Ambiguous);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Value::default_for(&TypeDescriptor::int()), Value::int(0));
        assert_eq!(
            Value::default_for(&TypeDescriptor::boolean()),
            Value::boolean(false)
        );
        assert_eq!(
            Value::default_for(&TypeDescriptor::string()),
            Value::null(TypeDescriptor::string())
        );
        assert!(Value::default_for(&TypeDescriptor::unknown()).is_unknown());
    }

    #[test]
    fn test_typed_literals() {
        assert_eq!(
            Value::from_literal_typed(&Literal::Int(1), &TypeDescriptor::boolean()),
            Value::boolean(true)
        );
        assert_eq!(
            Value::from_literal_typed(&Literal::Int(0x1ff), &TypeDescriptor::byte()),
            Value::known(TypeDescriptor::byte(), Payload::Byte(-1))
        );
        assert!(Value::from_literal_typed(&Literal::String("x".into()), &TypeDescriptor::int())
            .is_unknown());
    }
}
