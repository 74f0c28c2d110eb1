//! Static state of one class.
//!
//! A [`ClassContext`] holds the values of a class's static fields as seen by every
//! execution path that has not written them itself, together with whether the class's
//! static initializer has been started.
//!
//! # Updates
//!
//! - [`ClassContext::set`] replaces a value. Used when `<clinit>` completes, since its
//!   writes happen exactly once before any other access.
//! - [`ClassContext::merge`] joins a value into the existing one. Used when any other
//!   method completes: a value that differs from the stored one widens the field to
//!   unknown.
//!
//! # Field Names
//!
//! Fields are addressed by name only; the declaring class is the context itself.

use imbl::OrdMap;

use crate::{
    emulation::Value,
    metadata::{ClassDef, TypeDescriptor},
};

/// Static fields and initialization state of a class.
///
/// # Example
///
/// ```rust
/// use smaliscope::emulation::{ClassContext, Value};
/// use smaliscope::metadata::{AccessFlags, ClassDef, FieldDef};
///
/// let class = ClassDef::new("LConfig;", AccessFlags::PUBLIC)
///     .with_field(FieldDef::new("count", "I", AccessFlags::STATIC));
///
/// let mut ctx = ClassContext::new(&class);
/// assert_eq!(ctx.get("count"), Some(&Value::int(0)));
///
/// ctx.merge("count", Value::int(3));
/// assert!(ctx.get("count").is_some_and(Value::is_unknown));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ClassContext {
    name: TypeDescriptor,
    fields: OrdMap<String, Value>,
    types: OrdMap<String, TypeDescriptor>,
    initialized: bool,
}

impl ClassContext {
    /// Creates the context of `class` with every static field bound to its initial
    /// value, or the Java default when it has none.
    #[must_use]
    pub fn new(class: &ClassDef) -> Self {
        let mut fields = OrdMap::new();
        let mut types = OrdMap::new();
        for field in class.static_fields() {
            let value = match &field.initial_value {
                Some(literal) => Value::from_literal_typed(literal, &field.ty),
                None => Value::default_for(&field.ty),
            };
            fields.insert(field.name.clone(), value);
            types.insert(field.name.clone(), field.ty.clone());
        }

        ClassContext {
            name: class.name.clone(),
            fields,
            types,
            initialized: false,
        }
    }

    /// The class this context belongs to.
    #[must_use]
    pub fn name(&self) -> &TypeDescriptor {
        &self.name
    }

    /// Value of a static field, `None` if the class does not declare it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Declared type of a static field.
    #[must_use]
    pub fn field_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    /// Replaces the value of a static field.
    pub fn set(&mut self, name: &str, value: Value) {
        self.fields.insert(name.to_string(), value);
    }

    /// Joins `value` into a static field; a differing value widens the field.
    pub fn merge(&mut self, name: &str, value: Value) {
        let merged = match self.fields.get(name) {
            Some(current) if *current == value => return,
            Some(current) => current.widen(),
            None => value.widen(),
        };
        self.fields.insert(name.to_string(), merged);
    }

    /// Widens a static field to unknown of its declared type.
    pub fn widen(&mut self, name: &str, ty: &TypeDescriptor) {
        let ty = self.types.get(name).unwrap_or(ty).clone();
        self.fields.insert(name.to_string(), Value::unknown(ty));
    }

    /// Widens every static field holding a known array.
    pub fn widen_arrays(&mut self) {
        let arrays: Vec<String> = self
            .fields
            .iter()
            .filter(|(_, value)| value.has_mutable_content())
            .map(|(name, _)| name.clone())
            .collect();
        for name in arrays {
            let ty = self.types.get(&name).cloned().unwrap_or_else(TypeDescriptor::unknown);
            self.fields.insert(name, Value::unknown(ty));
        }
    }

    /// Iterates the static fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Returns `true` once static initialization has started.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Marks static initialization as started.
    pub fn mark_initialized(&mut self) {
        self.initialized = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assembly::Literal,
        metadata::{AccessFlags, FieldDef},
    };

    fn config_class() -> ClassDef {
        ClassDef::new("LConfig;", AccessFlags::PUBLIC)
            .with_field(FieldDef::new("count", "I", AccessFlags::STATIC))
            .with_field(
                FieldDef::new("debug", "Z", AccessFlags::STATIC | AccessFlags::FINAL)
                    .with_initial_value(Literal::Int(1)),
            )
            .with_field(FieldDef::new("name", "Ljava/lang/String;", AccessFlags::STATIC))
            .with_field(FieldDef::new("instance", "I", AccessFlags::PRIVATE))
    }

    #[test]
    fn test_initial_values() {
        let ctx = ClassContext::new(&config_class());
        assert_eq!(ctx.get("count"), Some(&Value::int(0)));
        assert_eq!(ctx.get("debug"), Some(&Value::boolean(true)));
        assert_eq!(ctx.get("name"), Some(&Value::null(TypeDescriptor::string())));
        assert_eq!(ctx.get("instance"), None);
        assert!(!ctx.is_initialized());
    }

    #[test]
    fn test_set_and_merge() {
        let mut ctx = ClassContext::new(&config_class());
        ctx.set("count", Value::int(5));
        assert_eq!(ctx.get("count"), Some(&Value::int(5)));

        ctx.merge("count", Value::int(5));
        assert_eq!(ctx.get("count"), Some(&Value::int(5)));

        ctx.merge("count", Value::int(6));
        assert_eq!(ctx.get("count"), Some(&Value::unknown(TypeDescriptor::int())));
    }

    #[test]
    fn test_widen() {
        let mut ctx = ClassContext::new(&config_class());
        ctx.widen("debug", &TypeDescriptor::unknown());
        assert_eq!(ctx.get("debug"), Some(&Value::unknown(TypeDescriptor::boolean())));
    }

    #[test]
    fn test_widen_arrays() {
        let class = config_class().with_field(FieldDef::new("table", "[I", AccessFlags::STATIC));
        let mut ctx = ClassContext::new(&class);
        let ty = TypeDescriptor::new("[I");
        ctx.set("table", Value::array(ty.clone(), imbl::vector![Value::int(1)]));

        ctx.widen_arrays();
        assert_eq!(ctx.get("table"), Some(&Value::unknown(ty)));
        assert_eq!(ctx.get("count"), Some(&Value::int(0)));
        assert_eq!(ctx.get("name"), Some(&Value::null(TypeDescriptor::string())));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut ctx = ClassContext::new(&config_class());
        let snapshot = ctx.clone();
        ctx.set("count", Value::int(9));
        ctx.mark_initialized();
        assert_eq!(snapshot.get("count"), Some(&Value::int(0)));
        assert!(!snapshot.is_initialized());
    }
}
