//! Allocation, array access and instance fields.
//!
//! Arrays are tracked element by element while their length stays under
//! [`crate::emulation::VmConfig::max_array_length`]. Array identity is not tracked, so
//! a store into one array widens every other known array of the same type the path can
//! reach: other registers, the path's static writes and the static fields of every
//! class context. Instance field contents are not modelled at all.

use crate::{
    assembly::{Literal, Register},
    emulation::{AllocationSite, RegisterContext, Value, VirtualMachine},
    metadata::{FieldRef, TypeDescriptor},
    Result,
};

/// `new-instance`
#[derive(Clone, Debug)]
pub struct NewInstanceOp {
    pub(crate) dest: Register,
    pub(crate) class: TypeDescriptor,
    pub(crate) site: AllocationSite,
}

impl NewInstanceOp {
    pub(crate) fn execute(&self, ctx: &mut RegisterContext) -> Result<()> {
        ctx.write(
            self.dest,
            Value::instance(self.class.clone(), Some(self.site.clone())),
        )
    }
}

/// `new-array`
#[derive(Clone, Debug)]
pub struct NewArrayOp {
    pub(crate) dest: Register,
    pub(crate) size: Register,
    pub(crate) ty: TypeDescriptor,
}

impl NewArrayOp {
    pub(crate) fn execute(&self, ctx: &mut RegisterContext, max_length: usize) -> Result<()> {
        let length = ctx
            .read(self.size)?
            .as_int()
            .and_then(|n| usize::try_from(n).ok())
            .filter(|n| *n <= max_length);

        let value = match (length, self.ty.component_type()) {
            (Some(length), Some(component)) => Value::array(
                self.ty.clone(),
                (0..length).map(|_| Value::default_for(&component)).collect(),
            ),
            _ => Value::unknown(self.ty.clone()),
        };
        ctx.write(self.dest, value)
    }
}

/// `array-length`
#[derive(Clone, Debug)]
pub struct ArrayLengthOp {
    pub(crate) dest: Register,
    pub(crate) array: Register,
}

impl ArrayLengthOp {
    pub(crate) fn execute(&self, ctx: &mut RegisterContext) -> Result<()> {
        let value = match ctx.read(self.array)?.as_array() {
            Some(elements) => i32::try_from(elements.len())
                .map_or_else(|_| Value::unknown(TypeDescriptor::int()), Value::int),
            None => Value::unknown(TypeDescriptor::int()),
        };
        ctx.write(self.dest, value)
    }
}

fn element_index(ctx: &RegisterContext, register: Register, length: usize) -> Result<Option<usize>> {
    Ok(ctx
        .read(register)?
        .as_int()
        .and_then(|i| usize::try_from(i).ok())
        .filter(|i| *i < length))
}

fn component_of(array: &Value) -> TypeDescriptor {
    array
        .ty()
        .component_type()
        .unwrap_or_else(TypeDescriptor::unknown)
}

/// `aget*`
#[derive(Clone, Debug)]
pub struct ArrayGetOp {
    pub(crate) dest: Register,
    pub(crate) array: Register,
    pub(crate) index: Register,
}

impl ArrayGetOp {
    pub(crate) fn execute(&self, ctx: &mut RegisterContext) -> Result<()> {
        let array = ctx.read(self.array)?;
        let value = match array.as_array() {
            Some(elements) => match element_index(ctx, self.index, elements.len())? {
                Some(index) => elements[index].clone(),
                None => Value::unknown(component_of(array)),
            },
            None => {
                ctx.read(self.index)?;
                Value::unknown(component_of(array))
            }
        };
        ctx.write(self.dest, value)
    }
}

/// `aput*`
#[derive(Clone, Debug)]
pub struct ArrayPutOp {
    pub(crate) src: Register,
    pub(crate) array: Register,
    pub(crate) index: Register,
}

impl ArrayPutOp {
    pub(crate) fn execute(&self, ctx: &mut RegisterContext, vm: &VirtualMachine) -> Result<()> {
        let value = ctx.read(self.src)?.clone();
        let array = ctx.read(self.array)?.clone();
        let ty = array.ty().clone();

        let updated = match array.as_array() {
            Some(elements) => match element_index(ctx, self.index, elements.len())? {
                Some(index) => {
                    let mut elements = elements.clone();
                    elements.set(index, coerce_element(value, &component_of(&array)));
                    Value::array(ty.clone(), elements)
                }
                None => array.widen(),
            },
            None => {
                ctx.read(self.index)?;
                array.widen()
            }
        };

        ctx.write(self.array, updated)?;
        ctx.widen_arrays(&ty, Some(self.array));
        vm.widen_static_arrays(ctx, &ty);
        Ok(())
    }
}

/// Narrows an integral value stored into a sub-word primitive array.
fn coerce_element(value: Value, component: &TypeDescriptor) -> Value {
    match (value.as_i64(), component.as_str()) {
        (Some(n), "Z" | "B" | "S" | "C" | "I") if value.ty() != component => {
            Value::from_literal_typed(&Literal::Int(n as i32), component)
        }
        _ => value,
    }
}

/// `iget*`: instance fields are not modelled.
#[derive(Clone, Debug)]
pub struct InstanceGetOp {
    pub(crate) dest: Register,
    pub(crate) object: Register,
    pub(crate) field: FieldRef,
}

impl InstanceGetOp {
    pub(crate) fn execute(&self, ctx: &mut RegisterContext) -> Result<()> {
        ctx.read(self.object)?;
        ctx.write(self.dest, Value::unknown(self.field.ty.clone()))
    }
}

/// `iput*`: checks its operands and changes nothing.
#[derive(Clone, Debug)]
pub struct InstancePutOp {
    pub(crate) src: Register,
    pub(crate) object: Register,
}

impl InstancePutOp {
    pub(crate) fn execute(&self, ctx: &RegisterContext) -> Result<()> {
        ctx.read(self.src)?;
        ctx.read(self.object)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{emulation::Payload, test::single_class_vm};

    fn int_array() -> TypeDescriptor {
        TypeDescriptor::new("[I")
    }

    #[test]
    fn test_new_array() {
        let mut ctx = RegisterContext::new(3, 0);
        ctx.write(1, Value::int(3)).unwrap();
        let op = NewArrayOp {
            dest: 0,
            size: 1,
            ty: int_array(),
        };
        op.execute(&mut ctx, 16).unwrap();
        assert_eq!(ctx.read(0).unwrap().as_array().map(|a| a.len()), Some(3));

        ctx.write(1, Value::int(17)).unwrap();
        op.execute(&mut ctx, 16).unwrap();
        assert_eq!(ctx.read(0).unwrap(), &Value::unknown(int_array()));

        ctx.write(1, Value::int(-1)).unwrap();
        op.execute(&mut ctx, 16).unwrap();
        assert!(ctx.read(0).unwrap().is_unknown());
    }

    #[test]
    fn test_put_get_length() {
        let vm = single_class_vm(Vec::new());
        let mut ctx = RegisterContext::new(4, 0);
        ctx.write(1, Value::int(2)).unwrap();
        NewArrayOp {
            dest: 0,
            size: 1,
            ty: int_array(),
        }
        .execute(&mut ctx, 16)
        .unwrap();

        ctx.write(2, Value::int(1)).unwrap();
        ctx.write(3, Value::int(42)).unwrap();
        ArrayPutOp {
            src: 3,
            array: 0,
            index: 2,
        }
        .execute(&mut ctx, &vm)
        .unwrap();

        ArrayGetOp {
            dest: 3,
            array: 0,
            index: 2,
        }
        .execute(&mut ctx)
        .unwrap();
        assert_eq!(ctx.read(3).unwrap(), &Value::int(42));

        ArrayLengthOp { dest: 1, array: 0 }
            .execute(&mut ctx)
            .unwrap();
        assert_eq!(ctx.read(1).unwrap(), &Value::int(2));
    }

    #[test]
    fn test_put_widens_aliases() {
        let vm = single_class_vm(Vec::new());
        let array = Value::array(int_array(), imbl::vector![Value::int(0)]);
        let mut ctx = RegisterContext::new(4, 0);
        ctx.write(0, array.clone()).unwrap();
        ctx.write(1, array).unwrap();
        ctx.write(2, Value::int(0)).unwrap();
        ctx.write(3, Value::int(7)).unwrap();

        ArrayPutOp {
            src: 3,
            array: 0,
            index: 2,
        }
        .execute(&mut ctx, &vm)
        .unwrap();

        assert_eq!(
            ctx.read(0).unwrap(),
            &Value::array(int_array(), imbl::vector![Value::int(7)])
        );
        assert_eq!(ctx.read(1).unwrap(), &Value::unknown(int_array()));
    }

    #[test]
    fn test_put_widens_static_writes_of_the_path() {
        let vm = single_class_vm(Vec::new());
        let field = FieldRef::parse("LFoo;->table:[I").unwrap();
        let array = Value::array(int_array(), imbl::vector![Value::int(0)]);
        let mut ctx = RegisterContext::new(3, 0);
        ctx.write(0, array.clone()).unwrap();
        ctx.write(1, Value::int(0)).unwrap();
        ctx.write(2, Value::int(7)).unwrap();
        ctx.static_write(field.clone(), array);

        ArrayPutOp {
            src: 2,
            array: 0,
            index: 1,
        }
        .execute(&mut ctx, &vm)
        .unwrap();

        assert_eq!(ctx.static_value(&field), Some(&Value::unknown(int_array())));
        assert_eq!(
            ctx.read(0).unwrap(),
            &Value::array(int_array(), imbl::vector![Value::int(7)])
        );
    }

    #[test]
    fn test_put_unknown_index_widens_array() {
        let vm = single_class_vm(Vec::new());
        let array = Value::array(int_array(), imbl::vector![Value::int(0)]);
        let mut ctx = RegisterContext::new(3, 0);
        ctx.write(0, array).unwrap();
        ctx.write(2, Value::int(7)).unwrap();

        ArrayPutOp {
            src: 2,
            array: 0,
            index: 1,
        }
        .execute(&mut ctx, &vm)
        .unwrap();
        assert_eq!(ctx.read(0).unwrap(), &Value::unknown(int_array()));
    }

    #[test]
    fn test_byte_array_store_narrows() {
        let vm = single_class_vm(Vec::new());
        let ty = TypeDescriptor::new("[B");
        let array = Value::array(ty.clone(), imbl::vector![Value::default_for(&TypeDescriptor::byte())]);
        let mut ctx = RegisterContext::new(3, 0);
        ctx.write(0, array).unwrap();
        ctx.write(1, Value::int(0)).unwrap();
        ctx.write(2, Value::int(0x180)).unwrap();

        ArrayPutOp {
            src: 2,
            array: 0,
            index: 1,
        }
        .execute(&mut ctx, &vm)
        .unwrap();
        assert_eq!(
            ctx.read(0).unwrap().as_array().map(|a| a[0].clone()),
            Some(Value::known(TypeDescriptor::byte(), Payload::Byte(-128)))
        );
    }

    #[test]
    fn test_instance_fields_are_unknown() {
        let field = FieldRef::parse("LFoo;->bar:J").unwrap();
        let mut ctx = RegisterContext::new(2, 0);
        ctx.write(
            1,
            Value::instance(
                TypeDescriptor::new("LFoo;"),
                Some(AllocationSite::new("LFoo;->f()V", 0)),
            ),
        )
        .unwrap();
        InstanceGetOp {
            dest: 0,
            object: 1,
            field,
        }
        .execute(&mut ctx)
        .unwrap();
        assert_eq!(ctx.read(0).unwrap(), &Value::unknown(TypeDescriptor::long()));

        let before = ctx.clone();
        InstancePutOp { src: 0, object: 1 }.execute(&ctx).unwrap();
        assert_eq!(ctx, before);
    }

    #[test]
    fn test_new_instance() {
        let mut ctx = RegisterContext::new(1, 0);
        NewInstanceOp {
            dest: 0,
            class: TypeDescriptor::new("LFoo;"),
            site: AllocationSite::new("LFoo;->make()LFoo;", 8),
        }
        .execute(&mut ctx)
        .unwrap();
        assert_eq!(
            ctx.read(0).unwrap(),
            &Value::instance(
                TypeDescriptor::new("LFoo;"),
                Some(AllocationSite::new("LFoo;->make()LFoo;", 8))
            )
        );
    }
}
