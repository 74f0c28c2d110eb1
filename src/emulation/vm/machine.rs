//! The virtual machine.
//!
//! [`VirtualMachine`] owns everything that outlives a single method execution: the
//! template [`ContextGraph`] of every implemented method, the [`ClassContext`] of
//! every defined class and the current call depth. It is the entry point for
//! analysis and the re-entry point for invocations made by handlers.
//!
//! # Ceilings
//!
//! Two ceilings from [`VmConfig`] bound the work done for a single call:
//!
//! - `max_node_visits` bounds loop unrolling inside one method
//! - `max_call_depth` bounds nested executions, static initializers included
//!
//! Breaching either aborts only the execution it occurred in. The breach is logged
//! and the caller receives `Ok(None)` instead of a graph; static fields the aborted
//! method writes are widened to unknown. A method that stores into arrays or invokes
//! others also widens every static field holding a known array.
//!
//! # Static Initialization
//!
//! A class is initialized lazily, the first time one of its methods is executed or
//! invoked, or one of its static fields is accessed. The class is marked initialized
//! before `<clinit>` runs, so re-entrant accesses see the in-progress state instead
//! of recursing.

use std::{collections::BTreeMap, sync::Arc};

use log::{debug, info, warn};
use rustc_hash::FxHashMap;

use crate::{
    assembly::{InvokeKind, Register},
    emulation::{
        ClassContext, ContextGraph, ExecutionError, MethodExecutor, RegisterContext, Value,
        VmConfig,
    },
    metadata::{
        class_of_descriptor, ClassDef, FieldRef, MethodDef, MethodRef, TryBlock,
        TypeDescriptor, STATIC_INITIALIZER,
    },
    Result,
};

/// Effect of an invocation on the calling path.
#[derive(Clone, Debug, PartialEq)]
pub struct InvokeOutcome {
    /// Value staged for `move-result`; `None` for `void` callees.
    pub result: Option<Value>,
    /// Static field values the caller's path observes after the call.
    pub static_writes: Vec<(FieldRef, Value)>,
}

/// Abstract interpreter over a set of classes.
///
/// # Examples
///
/// ```rust
/// use smaliscope::{
///     assembly::MethodAssembler,
///     emulation::{Value, VirtualMachine, VmConfig},
///     metadata::{AccessFlags, ClassDef, MethodDef, TypeDescriptor},
/// };
///
/// let mut asm = MethodAssembler::new();
/// asm.add_int(0, 1, 2).return_value(0);
/// let add = MethodDef::new("LMath;->add(II)I", AccessFlags::STATIC, 3, asm.finish()?)?;
/// let class = ClassDef::new("LMath;", AccessFlags::PUBLIC).with_method(add);
///
/// let mut vm = VirtualMachine::new(vec![class], VmConfig::default())?;
/// let graph = vm.execute("LMath;->add(II)I")?.expect("within limits");
///
/// let returns = graph.connected_return_addresses();
/// assert_eq!(graph.consensus(&returns, 0)?, Value::unknown(TypeDescriptor::int()));
/// # Ok::<(), smaliscope::Error>(())
/// ```
#[derive(Debug)]
pub struct VirtualMachine {
    config: VmConfig,
    classes: FxHashMap<TypeDescriptor, ClassDef>,
    methods: FxHashMap<String, Arc<MethodDef>>,
    templates: FxHashMap<String, ContextGraph>,
    class_contexts: FxHashMap<TypeDescriptor, ClassContext>,
    call_depth: usize,
}

impl VirtualMachine {
    /// Builds a virtual machine over `classes`, creating the template graph of every
    /// method that has instructions.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] for duplicate classes or methods, a method
    /// declared outside its class, a register count smaller than the incoming
    /// arguments, or an instruction stream a graph cannot be built from.
    pub fn new(classes: Vec<ClassDef>, config: VmConfig) -> Result<Self> {
        let mut vm = VirtualMachine {
            config,
            classes: FxHashMap::default(),
            methods: FxHashMap::default(),
            templates: FxHashMap::default(),
            class_contexts: FxHashMap::default(),
            call_depth: 0,
        };

        for class in classes {
            if vm.classes.contains_key(&class.name) {
                return Err(malformed_error!("class {} is defined twice", class.name));
            }
            for method in &class.methods {
                if method.class() != &class.name {
                    return Err(malformed_error!(
                        "{} is declared in {}",
                        method.descriptor(),
                        class.name
                    ));
                }
                let descriptor = method.descriptor();
                if vm.methods.contains_key(&descriptor) {
                    return Err(malformed_error!("{} is defined twice", descriptor));
                }
                vm.register_method(method.clone())?;
            }
            vm.class_contexts
                .insert(class.name.clone(), ClassContext::new(&class));
            vm.classes.insert(class.name.clone(), class);
        }

        debug!(
            "virtual machine ready: {} classes, {} methods, {} implemented",
            vm.classes.len(),
            vm.methods.len(),
            vm.templates.len()
        );
        Ok(vm)
    }

    fn register_method(&mut self, method: MethodDef) -> Result<()> {
        let descriptor = method.descriptor();
        if usize::from(method.register_count) < method.incoming_register_count() {
            return Err(malformed_error!(
                "{} declares {} registers but receives {} arguments",
                descriptor,
                method.register_count,
                method.incoming_register_count()
            ));
        }

        if method.has_implementation() {
            self.templates
                .insert(descriptor.clone(), ContextGraph::new(&method)?);
        } else {
            self.templates.remove(&descriptor);
        }
        self.methods.insert(descriptor, Arc::new(method));
        Ok(())
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Number of method executions currently in progress.
    #[must_use]
    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    /// Definition of a method.
    #[must_use]
    pub fn method(&self, descriptor: &str) -> Option<&MethodDef> {
        self.methods.get(descriptor).map(|method| &**method)
    }

    /// Returns `true` if the method has instructions to execute.
    #[must_use]
    pub fn is_method_defined(&self, descriptor: &str) -> bool {
        self.templates.contains_key(descriptor)
    }

    /// Unexecuted template graph of a method.
    #[must_use]
    pub fn template_graph(&self, descriptor: &str) -> Option<&ContextGraph> {
        self.templates.get(descriptor)
    }

    /// Static state of a class.
    #[must_use]
    pub fn class_context(&self, class: &str) -> Option<&ClassContext> {
        self.class_contexts.get(&TypeDescriptor::new(class))
    }

    /// Returns `true` once the class's static initialization has started.
    #[must_use]
    pub fn is_class_initialized(&self, class: &str) -> bool {
        self.class_context(class)
            .is_some_and(ClassContext::is_initialized)
    }

    /// Try/catch regions of a method.
    #[must_use]
    pub fn try_blocks(&self, descriptor: &str) -> Option<&[TryBlock]> {
        self.methods
            .get(descriptor)
            .map(|method| method.try_blocks.as_slice())
    }

    /// Try/catch regions of every method that has any, by descriptor.
    #[must_use]
    pub fn try_catch_table(&self) -> BTreeMap<&str, &[TryBlock]> {
        self.methods
            .iter()
            .filter(|(_, method)| !method.try_blocks.is_empty())
            .map(|(descriptor, method)| (descriptor.as_str(), method.try_blocks.as_slice()))
            .collect()
    }

    /// Returns `true` for types whose values no callee can modify: primitives, their
    /// boxes, strings and final classes.
    #[must_use]
    pub fn is_immutable_class(&self, ty: &TypeDescriptor) -> bool {
        if ty.is_unknown() || ty.is_array() {
            return false;
        }
        ty.is_primitive()
            || ty.is_boxed_primitive()
            || ty.is_string()
            || self.classes.get(ty).is_some_and(ClassDef::is_final)
    }

    /// Entry context of a method: every parameter unknown of its declared type and,
    /// for instance methods, an unknown-site receiver of the declaring class.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::MethodNotFound`] if no such method is defined.
    pub fn root_context(&self, descriptor: &str) -> Result<RegisterContext> {
        let Some(method) = self.methods.get(descriptor) else {
            return Err(ExecutionError::MethodNotFound {
                descriptor: descriptor.to_string(),
            }
            .into());
        };

        let parameters = &method.reference.parameters;
        let mut ctx = RegisterContext::new(usize::from(method.register_count), parameters.len());
        if !method.is_static() {
            ctx.bind_receiver(Value::instance(method.class().clone(), None))?;
        }
        for (index, ty) in parameters.iter().enumerate() {
            ctx.bind_parameter(index, Value::unknown(ty.clone()))?;
        }
        Ok(ctx)
    }

    /// Executes a method from its [root context](Self::root_context).
    ///
    /// # Errors
    ///
    /// See [`Self::execute_with_context`].
    pub fn execute(&mut self, descriptor: &str) -> Result<Option<ContextGraph>> {
        let ctx = self.root_context(descriptor)?;
        self.execute_with_context(descriptor, ctx)
    }

    /// Executes a method on a fresh clone of its template, starting from `ctx`.
    ///
    /// The declaring class is initialized first. Returns `Ok(None)` if the execution
    /// was aborted by a ceiling.
    ///
    /// # Errors
    ///
    /// - [`ExecutionError::MethodNotFound`] if the method has no instructions
    /// - [`ExecutionError::InvalidRegister`] and [`ExecutionError::InvalidAddress`]
    ///   from the method or any method it invokes
    pub fn execute_with_context(
        &mut self,
        descriptor: &str,
        ctx: RegisterContext,
    ) -> Result<Option<ContextGraph>> {
        let Some(template) = self.templates.get(descriptor) else {
            return Err(ExecutionError::MethodNotFound {
                descriptor: descriptor.to_string(),
            }
            .into());
        };
        let mut graph = template.clone();
        let is_initializer = self
            .methods
            .get(descriptor)
            .is_some_and(|method| method.is_static_initializer());

        self.initialize_class(&class_of_descriptor(descriptor))?;

        if self.call_depth >= self.config.max_call_depth {
            let err = ExecutionError::CallDepthExceeded {
                depth: self.call_depth + 1,
                limit: self.config.max_call_depth,
            };
            return Ok(self.abandon(&graph, &err));
        }

        graph.set_root_context(ctx);
        self.call_depth += 1;
        debug!("executing {} at depth {}", descriptor, self.call_depth);
        let outcome = MethodExecutor::new(self).execute(&mut graph);
        self.call_depth -= 1;

        match outcome {
            Ok(()) => {
                debug!(
                    "finished {} with {} nodes",
                    descriptor,
                    graph.node_count()
                );
                self.commit_static_writes(&graph, is_initializer);
                Ok(Some(graph))
            }
            Err(crate::Error::Execution(err)) if err.is_recoverable() => {
                Ok(self.abandon(&graph, &err))
            }
            Err(err) => Err(err),
        }
    }

    /// Logs a ceiling breach and widens the static fields the method could have
    /// changed.
    fn abandon(&mut self, graph: &ContextGraph, err: &ExecutionError) -> Option<ContextGraph> {
        warn!("abandoning {}: {}", graph.method(), err);
        for field in graph.static_puts() {
            if let Some(class) = self.class_contexts.get_mut(&field.class) {
                class.widen(&field.name, &field.ty);
            }
        }
        if graph.may_store_into_arrays() {
            for class in self.class_contexts.values_mut() {
                class.widen_arrays();
            }
        }
        None
    }

    /// Hides every class-context static field holding a known array of type `ty`
    /// behind an unknown value on the path owning `ctx`, together with the path's own
    /// writes of such arrays.
    ///
    /// Called after a store into an array of type `ty`, which may be any of them.
    pub(crate) fn widen_static_arrays(&self, ctx: &mut RegisterContext, ty: &TypeDescriptor) {
        ctx.widen_static_arrays(ty);
        for (class, context) in &self.class_contexts {
            for (name, value) in context.fields() {
                if value.as_array().is_none() || value.ty() != ty {
                    continue;
                }
                let field = FieldRef {
                    class: class.clone(),
                    name: name.clone(),
                    ty: context.field_type(name).unwrap_or(ty).clone(),
                };
                if ctx.static_value(&field).is_none() {
                    ctx.static_write(field, value.widen());
                }
            }
        }
    }

    fn commit_static_writes(&mut self, graph: &ContextGraph, strong: bool) {
        for field in graph.written_static_fields() {
            let Some(class) = self.class_contexts.get_mut(&field.class) else {
                continue;
            };
            let baseline = class
                .get(&field.name)
                .cloned()
                .unwrap_or_else(|| Value::unknown(field.ty.clone()));
            let value = graph.static_consensus(&field, &baseline);
            if strong {
                class.set(&field.name, value);
            } else {
                class.merge(&field.name, value);
            }
        }
    }

    /// Runs the static initializer of `class` unless it has already started.
    ///
    /// Classes that are not defined are ignored.
    ///
    /// # Errors
    ///
    /// Returns any non-recoverable error raised by `<clinit>`.
    pub fn initialize_class(&mut self, class: &TypeDescriptor) -> Result<()> {
        let Some(context) = self.class_contexts.get_mut(class) else {
            return Ok(());
        };
        if context.is_initialized() {
            return Ok(());
        }
        context.mark_initialized();
        info!("initializing {}", class);

        let initializer = format!("{class}->{STATIC_INITIALIZER}()V");
        if self.templates.contains_key(&initializer) {
            self.execute(&initializer)?;
        }
        Ok(())
    }

    /// Value of a static field as seen by the path owning `ctx`.
    ///
    /// The path's own writes win over the class context. Fields of undefined classes
    /// are unknown.
    #[must_use]
    pub fn static_value(&self, ctx: &RegisterContext, field: &FieldRef) -> Value {
        if let Some(value) = ctx.static_value(field) {
            return value.clone();
        }
        self.class_contexts
            .get(&field.class)
            .and_then(|class| class.get(&field.name))
            .cloned()
            .unwrap_or_else(|| Value::unknown(field.ty.clone()))
    }

    /// Invokes `method` with the values of `args` in `caller`.
    ///
    /// Methods without instructions initialize their class and return unknown.
    /// Implemented methods are executed with the caller's static writes visible; an
    /// aborted execution returns unknown and reports every static field the callee
    /// writes as unknown.
    pub(crate) fn invoke(
        &mut self,
        kind: InvokeKind,
        method: &MethodRef,
        caller: &RegisterContext,
        args: &[Register],
    ) -> Result<InvokeOutcome> {
        let is_static = kind == InvokeKind::Static;
        let expected = method.parameters.len() + usize::from(!is_static);
        if args.len() != expected {
            return Err(malformed_error!(
                "invoke-{} of {} passes {} arguments, expected {}",
                kind,
                method,
                args.len(),
                expected
            ));
        }
        let unknown_result = || {
            (!method.return_type.is_void()).then(|| Value::unknown(method.return_type.clone()))
        };

        let descriptor = method.descriptor();
        let callee = self
            .methods
            .get(&descriptor)
            .filter(|_| self.templates.contains_key(&descriptor))
            .cloned();
        let Some(callee) = callee else {
            self.initialize_class(&method.class)?;
            return Ok(InvokeOutcome {
                result: unknown_result(),
                static_writes: Vec::new(),
            });
        };
        if callee.is_static() != is_static {
            return Err(malformed_error!(
                "invoke-{} of {} which is {}static",
                kind,
                method,
                if callee.is_static() { "" } else { "not " }
            ));
        }

        let mut ctx = RegisterContext::new(usize::from(callee.register_count), method.parameters.len());
        let mut values = args.iter().map(|register| caller.read(*register).cloned());
        if !is_static {
            if let Some(receiver) = values.next() {
                ctx.bind_receiver(receiver?)?;
            }
        }
        for (index, value) in values.enumerate() {
            ctx.bind_parameter(index, value?)?;
        }
        ctx.inherit_statics(caller);

        let (static_puts, may_store_into_arrays) = self
            .templates
            .get(&descriptor)
            .map(|template| {
                let puts: Vec<FieldRef> = template.static_puts().cloned().collect();
                (puts, template.may_store_into_arrays())
            })
            .unwrap_or_default();

        let outcome = match self.execute_with_context(&descriptor, ctx)? {
            Some(graph) => {
                let result = unknown_result().map(|unknown| {
                    graph
                        .return_consensus(&graph.connected_return_addresses())
                        .unwrap_or(unknown)
                });
                let static_writes = graph
                    .written_static_fields()
                    .into_iter()
                    .map(|field| {
                        let baseline = self.static_value(caller, &field);
                        let value = graph.static_consensus(&field, &baseline);
                        (field, value)
                    })
                    .collect();
                InvokeOutcome {
                    result,
                    static_writes,
                }
            }
            None => {
                let mut static_writes: BTreeMap<FieldRef, Value> = static_puts
                    .into_iter()
                    .map(|field| {
                        let unknown = Value::unknown(field.ty.clone());
                        (field, unknown)
                    })
                    .collect();
                if may_store_into_arrays {
                    for (field, value) in caller.static_writes() {
                        if value.has_mutable_content() {
                            static_writes.insert(field.clone(), value.widen());
                        }
                    }
                }
                InvokeOutcome {
                    result: unknown_result(),
                    static_writes: static_writes.into_iter().collect(),
                }
            }
        };
        Ok(outcome)
    }

    /// Replaces a method's definition and rebuilds its template graph, for use after
    /// the method's instructions were rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the declaring class is not defined or
    /// the new instructions cannot form a graph.
    pub fn update_instruction_graph(&mut self, method: MethodDef) -> Result<()> {
        let descriptor = method.descriptor();
        let Some(class) = self.classes.get_mut(method.class()) else {
            return Err(malformed_error!(
                "{} belongs to undefined class {}",
                descriptor,
                method.class()
            ));
        };
        match class
            .methods
            .iter_mut()
            .find(|existing| existing.reference == method.reference)
        {
            Some(existing) => *existing = method.clone(),
            None => class.methods.push(method.clone()),
        }

        debug!("rebuilding graph of {}", descriptor);
        self.register_method(method)
    }

    /// Forgets all static state: every class becomes uninitialized again and its
    /// static fields return to their declared initial values.
    pub fn reset(&mut self) {
        self.class_contexts = self
            .classes
            .values()
            .map(|class| (class.name.clone(), ClassContext::new(class)))
            .collect();
        self.call_depth = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assembly::MethodAssembler,
        metadata::{AccessFlags, CatchHandler, FieldDef},
        test::{method, single_class_vm, single_class_vm_with},
    };

    #[test]
    fn test_duplicate_method_is_malformed() {
        let def = method("LFoo;->f()V", 0, |asm| {
            asm.return_void();
        });
        let class = ClassDef::new("LFoo;", AccessFlags::PUBLIC)
            .with_method(def.clone())
            .with_method(def);
        let err = VirtualMachine::new(vec![class], VmConfig::default()).unwrap_err();
        assert!(matches!(err, crate::Error::Malformed { .. }));
    }

    #[test]
    fn test_too_few_registers_is_malformed() {
        let def = method("LFoo;->f(II)V", 1, |asm| {
            asm.return_void();
        });
        let class = ClassDef::new("LFoo;", AccessFlags::PUBLIC).with_method(def);
        assert!(VirtualMachine::new(vec![class], VmConfig::default()).is_err());
    }

    #[test]
    fn test_unknown_method() {
        let mut vm = single_class_vm(Vec::new());
        let err = vm.execute("LFoo;->missing()V").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Execution(ExecutionError::MethodNotFound { .. })
        ));
    }

    #[test]
    fn test_root_context_binds_receiver_and_parameters() {
        let def = MethodDef::new("LFoo;->f(ILjava/lang/String;)V", AccessFlags::PUBLIC, 4, {
            let mut asm = MethodAssembler::new();
            asm.return_void();
            asm.finish().unwrap()
        })
        .unwrap();
        let vm = single_class_vm(vec![def]);
        let ctx = vm.root_context("LFoo;->f(ILjava/lang/String;)V").unwrap();

        assert_eq!(ctx.read(0).unwrap(), &Value::uninitialized());
        assert_eq!(
            ctx.read(1).unwrap(),
            &Value::instance(TypeDescriptor::new("LFoo;"), None)
        );
        assert_eq!(ctx.read(2).unwrap(), &Value::unknown(TypeDescriptor::int()));
        assert_eq!(ctx.read(3).unwrap(), &Value::unknown(TypeDescriptor::string()));
    }

    #[test]
    fn test_call_depth_ceiling_is_recoverable() {
        let def = method("LFoo;->f()V", 0, |asm| {
            asm.return_void();
        });
        let mut vm = single_class_vm_with(vec![def], VmConfig::default().with_max_call_depth(0));
        assert!(vm.execute("LFoo;->f()V").unwrap().is_none());
        assert_eq!(vm.call_depth(), 0);
    }

    #[test]
    fn test_invoke_argument_mismatch_is_malformed() {
        let mut vm = single_class_vm(Vec::new());
        let target = MethodRef::parse("LBar;->g(I)V").unwrap();
        let caller = RegisterContext::new(2, 0);
        let err = vm
            .invoke(InvokeKind::Static, &target, &caller, &[0, 1])
            .unwrap_err();
        assert!(matches!(err, crate::Error::Malformed { .. }));
    }

    #[test]
    fn test_invoke_undefined_returns_unknown() {
        let mut vm = single_class_vm(Vec::new());
        let target = MethodRef::parse("Ljava/lang/Math;->abs(I)I").unwrap();
        let mut caller = RegisterContext::new(1, 0);
        caller.write(0, Value::int(-3)).unwrap();
        let outcome = vm
            .invoke(InvokeKind::Static, &target, &caller, &[0])
            .unwrap();
        assert_eq!(outcome.result, Some(Value::unknown(TypeDescriptor::int())));
        assert!(outcome.static_writes.is_empty());
    }

    #[test]
    fn test_immutable_classes() {
        let vm = VirtualMachine::new(
            vec![ClassDef::new("LSealed;", AccessFlags::PUBLIC | AccessFlags::FINAL)],
            VmConfig::default(),
        )
        .unwrap();
        assert!(vm.is_immutable_class(&TypeDescriptor::int()));
        assert!(vm.is_immutable_class(&TypeDescriptor::string()));
        assert!(vm.is_immutable_class(&TypeDescriptor::new("Ljava/lang/Integer;")));
        assert!(vm.is_immutable_class(&TypeDescriptor::new("LSealed;")));
        assert!(!vm.is_immutable_class(&TypeDescriptor::new("[I")));
        assert!(!vm.is_immutable_class(&TypeDescriptor::new("LOpen;")));
        assert!(!vm.is_immutable_class(&TypeDescriptor::unknown()));
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let clinit = method("LFoo;-><clinit>()V", 1, |asm| {
            asm.const_int(0, 9).sput(0, "LFoo;->x:I").unwrap().return_void();
        });
        let class = ClassDef::new("LFoo;", AccessFlags::PUBLIC)
            .with_field(FieldDef::new("x", "I", AccessFlags::STATIC))
            .with_method(clinit);
        let mut vm = VirtualMachine::new(vec![class], VmConfig::default()).unwrap();

        vm.initialize_class(&TypeDescriptor::new("LFoo;")).unwrap();
        assert_eq!(vm.class_context("LFoo;").unwrap().get("x"), Some(&Value::int(9)));

        vm.reset();
        assert!(!vm.is_class_initialized("LFoo;"));
        assert_eq!(vm.class_context("LFoo;").unwrap().get("x"), Some(&Value::int(0)));
    }

    #[test]
    fn test_update_instruction_graph() {
        let def = method("LFoo;->f()I", 1, |asm| {
            asm.const_int(0, 1).return_value(0);
        });
        let mut vm = single_class_vm(vec![def]);

        let rewritten = method("LFoo;->f()I", 1, |asm| {
            asm.const_int(0, 2).return_value(0);
        });
        vm.update_instruction_graph(rewritten).unwrap();

        let graph = vm.execute("LFoo;->f()I").unwrap().unwrap();
        let returns = graph.connected_return_addresses();
        assert_eq!(graph.consensus(&returns, 0).unwrap(), Value::int(2));
    }

    #[test]
    fn test_try_catch_table() {
        let def = method("LFoo;->f()V", 0, |asm| {
            asm.nop().return_void();
        })
        .with_try_blocks(vec![TryBlock {
            start_address: 0,
            code_units: 1,
            handlers: vec![CatchHandler {
                exception_type: None,
                handler_address: 1,
            }],
        }]);
        let vm = single_class_vm(vec![def]);
        assert_eq!(vm.try_blocks("LFoo;->f()V").map(<[_]>::len), Some(1));
        assert_eq!(
            vm.try_catch_table().keys().copied().collect::<Vec<_>>(),
            ["LFoo;->f()V"]
        );
    }
}
