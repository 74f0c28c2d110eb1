//! Register file of one execution path at one program point.
//!
//! A [`RegisterContext`] holds every register of a method frame, the return slot and
//! the static fields written along the path so far. Registers are laid out the way
//! Dalvik lays them out: locals first, then the receiver (for instance methods), then
//! one register per declared parameter.
//!
//! # Copy-on-Write
//!
//! Registers and the static overlay are `imbl` persistent collections, so cloning a
//! context at a branch is O(1) and clones share structure until written.

use crate::{
    emulation::{ExecutionError, Value},
    metadata::{FieldRef, TypeDescriptor},
    Result,
};

/// Register state of one execution path.
///
/// # Examples
///
/// ```rust
/// use smaliscope::emulation::{RegisterContext, Value};
///
/// // Four registers, the last two of them parameters.
/// let mut ctx = RegisterContext::new(4, 2);
/// ctx.bind_parameter(1, Value::int(7))?;
/// assert_eq!(ctx.read(3)?, &Value::int(7));
///
/// let snapshot = ctx.clone();
/// ctx.write(3, Value::int(8))?;
/// assert_eq!(snapshot.read(3)?, &Value::int(7));
///
/// assert!(ctx.read(4).is_err());
/// # Ok::<(), smaliscope::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RegisterContext {
    registers: imbl::Vector<Value>,
    parameter_count: usize,
    result: Option<Value>,
    statics: imbl::OrdMap<FieldRef, Value>,
}

impl RegisterContext {
    /// Creates a context of `register_count` uninitialized registers whose last
    /// `parameter_count` registers form the parameter window.
    ///
    /// A `parameter_count` larger than `register_count` is clamped.
    #[must_use]
    pub fn new(register_count: usize, parameter_count: usize) -> Self {
        RegisterContext {
            registers: (0..register_count).map(|_| Value::uninitialized()).collect(),
            parameter_count: parameter_count.min(register_count),
            result: None,
            statics: imbl::OrdMap::new(),
        }
    }

    /// Number of registers.
    #[must_use]
    pub fn register_count(&self) -> usize {
        self.registers.len()
    }

    /// Number of registers in the parameter window.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    /// Index of the first parameter register.
    #[must_use]
    pub fn parameter_start(&self) -> usize {
        self.registers.len() - self.parameter_count
    }

    fn invalid(&self, register: usize) -> crate::Error {
        ExecutionError::InvalidRegister {
            register: u32::try_from(register).unwrap_or(u32::MAX),
            register_count: self.registers.len(),
        }
        .into()
    }

    /// Reads register `vN`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::InvalidRegister`] if the register does not exist.
    pub fn read(&self, register: u16) -> Result<&Value> {
        let index = usize::from(register);
        self.registers.get(index).ok_or_else(|| self.invalid(index))
    }

    /// Writes register `vN`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::InvalidRegister`] if the register does not exist.
    pub fn write(&mut self, register: u16, value: Value) -> Result<()> {
        self.write_index(usize::from(register), value)
    }

    fn write_index(&mut self, index: usize, value: Value) -> Result<()> {
        if index >= self.registers.len() {
            return Err(self.invalid(index));
        }
        self.registers.set(index, value);
        Ok(())
    }

    /// Binds the `index`th declared parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::InvalidRegister`] if `index` is outside the parameter
    /// window.
    pub fn bind_parameter(&mut self, index: usize, value: Value) -> Result<()> {
        if index >= self.parameter_count {
            return Err(self.invalid(self.parameter_start() + index));
        }
        self.write_index(self.parameter_start() + index, value)
    }

    /// Binds the receiver, which occupies the register preceding the parameter window.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::InvalidRegister`] if the parameter window starts at
    /// register 0.
    pub fn bind_receiver(&mut self, value: Value) -> Result<()> {
        match self.parameter_start().checked_sub(1) {
            Some(index) => self.write_index(index, value),
            None => Err(self.invalid(self.registers.len())),
        }
    }

    /// Value of the `index`th declared parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::InvalidRegister`] if `index` is outside the parameter
    /// window.
    pub fn parameter(&self, index: usize) -> Result<&Value> {
        if index >= self.parameter_count {
            return Err(self.invalid(self.parameter_start() + index));
        }
        let register = self.parameter_start() + index;
        self.registers
            .get(register)
            .ok_or_else(|| self.invalid(register))
    }

    /// Iterates all registers in index order.
    pub fn registers(&self) -> impl Iterator<Item = &Value> {
        self.registers.iter()
    }

    /// Stores a returned or invocation result value in the return slot.
    pub fn set_return(&mut self, value: Value) {
        self.result = Some(value);
    }

    /// Empties the return slot.
    pub fn clear_return(&mut self) {
        self.result = None;
    }

    /// Contents of the return slot.
    #[must_use]
    pub fn return_value(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Records a static field write on this path.
    pub fn static_write(&mut self, field: FieldRef, value: Value) {
        self.statics.insert(field, value);
    }

    /// Value of a static field written on this path.
    #[must_use]
    pub fn static_value(&self, field: &FieldRef) -> Option<&Value> {
        self.statics.get(field)
    }

    /// Iterates the static field writes of this path in field order.
    pub fn static_writes(&self) -> impl Iterator<Item = (&FieldRef, &Value)> {
        self.statics.iter()
    }

    /// Replaces this path's static writes with those of `other`.
    pub fn inherit_statics(&mut self, other: &RegisterContext) {
        self.statics = other.statics.clone();
    }

    /// Overwrites every register except `keep` and every static write of this path
    /// that holds a known array of type `ty` with an unknown value.
    pub fn widen_arrays(&mut self, ty: &TypeDescriptor, keep: Option<u16>) {
        let keep = keep.map(usize::from);
        for (index, value) in self.registers.iter_mut().enumerate() {
            if Some(index) != keep && is_known_array(value, ty) {
                *value = value.widen();
            }
        }
        self.widen_static_arrays(ty);
    }

    /// Overwrites every static write of this path that holds a known array of type
    /// `ty` with an unknown value.
    pub fn widen_static_arrays(&mut self, ty: &TypeDescriptor) {
        let aliases: Vec<FieldRef> = self
            .statics
            .iter()
            .filter(|(_, value)| is_known_array(value, ty))
            .map(|(field, _)| field.clone())
            .collect();
        for field in aliases {
            self.statics.insert(field, Value::unknown(ty.clone()));
        }
    }
}

fn is_known_array(value: &Value, ty: &TypeDescriptor) -> bool {
    value.as_array().is_some() && value.ty() == ty
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_uninitialized() {
        let ctx = RegisterContext::new(3, 1);
        assert_eq!(ctx.register_count(), 3);
        assert_eq!(ctx.parameter_start(), 2);
        assert!(ctx.registers().all(|v| *v == Value::uninitialized()));
        assert!(ctx.return_value().is_none());
    }

    #[test]
    fn test_invalid_register() {
        let mut ctx = RegisterContext::new(2, 0);
        let err = ctx.write(2, Value::int(0)).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Execution(ExecutionError::InvalidRegister {
                register: 2,
                register_count: 2
            })
        ));
        assert!(ctx.read(5).is_err());
    }

    #[test]
    fn test_receiver_and_parameters() {
        let mut ctx = RegisterContext::new(5, 2);
        ctx.bind_receiver(Value::instance(TypeDescriptor::object(), None))
            .unwrap();
        ctx.bind_parameter(0, Value::int(1)).unwrap();
        ctx.bind_parameter(1, Value::long(2)).unwrap();

        assert!(ctx.read(2).unwrap().is_known());
        assert_eq!(ctx.read(3).unwrap(), &Value::int(1));
        assert_eq!(ctx.parameter(1).unwrap(), &Value::long(2));
        assert!(ctx.bind_parameter(2, Value::int(0)).is_err());

        let mut no_room = RegisterContext::new(1, 1);
        assert!(no_room.bind_receiver(Value::int(0)).is_err());
    }

    #[test]
    fn test_clone_is_independent() {
        let field = FieldRef::parse("LFoo;->x:I").unwrap();
        let mut ctx = RegisterContext::new(2, 0);
        ctx.write(0, Value::int(1)).unwrap();
        ctx.static_write(field.clone(), Value::int(1));

        let mut clone = ctx.clone();
        clone.write(0, Value::int(2)).unwrap();
        clone.static_write(field.clone(), Value::int(2));
        clone.set_return(Value::int(3));

        assert_eq!(ctx.read(0).unwrap(), &Value::int(1));
        assert_eq!(ctx.static_value(&field), Some(&Value::int(1)));
        assert!(ctx.return_value().is_none());
    }

    #[test]
    fn test_widen_arrays() {
        let ty = TypeDescriptor::new("[I");
        let array = Value::array(ty.clone(), imbl::vector![Value::int(0)]);
        let mut ctx = RegisterContext::new(3, 0);
        ctx.write(0, array.clone()).unwrap();
        ctx.write(1, array.clone()).unwrap();
        ctx.write(2, Value::int(4)).unwrap();

        ctx.widen_arrays(&ty, Some(0));
        assert_eq!(ctx.read(0).unwrap(), &array);
        assert_eq!(ctx.read(1).unwrap(), &Value::unknown(ty));
        assert_eq!(ctx.read(2).unwrap(), &Value::int(4));
    }

    #[test]
    fn test_widen_arrays_reaches_static_writes() {
        let ty = TypeDescriptor::new("[I");
        let ints = FieldRef::parse("LFoo;->ints:[I").unwrap();
        let bytes = FieldRef::parse("LFoo;->bytes:[B").unwrap();
        let count = FieldRef::parse("LFoo;->count:I").unwrap();
        let byte_array = Value::array(
            TypeDescriptor::new("[B"),
            imbl::vector![Value::default_for(&TypeDescriptor::byte())],
        );

        let mut ctx = RegisterContext::new(1, 0);
        ctx.static_write(ints.clone(), Value::array(ty.clone(), imbl::vector![Value::int(0)]));
        ctx.static_write(bytes.clone(), byte_array.clone());
        ctx.static_write(count.clone(), Value::int(3));

        ctx.widen_arrays(&ty, None);
        assert_eq!(ctx.static_value(&ints), Some(&Value::unknown(ty)));
        assert_eq!(ctx.static_value(&bytes), Some(&byte_array));
        assert_eq!(ctx.static_value(&count), Some(&Value::int(3)));
    }
}
