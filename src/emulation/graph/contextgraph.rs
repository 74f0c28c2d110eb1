//! Per-method execution graph.
//!
//! A [`ContextGraph`] maps every instruction address of a method to a [`NodePile`]:
//! the template node created when the graph is built, followed by one clone for every
//! time an execution path reached the address. Clones own the [`RegisterContext`] of
//! their path after the instruction executed and link to the node that produced them
//! and the nodes they produced.
//!
//! Graphs are built once per method and kept as templates by the
//! [`crate::emulation::VirtualMachine`]. Every execution runs on a clone of the
//! template, so a template never accumulates nodes. Cloning is cheap: handlers are
//! shared and a template pile holds a single context-free node.
//!
//! # Queries
//!
//! - [`ContextGraph::node_pile`] - Executed nodes at an address
//! - [`ContextGraph::is_reached`] - Whether any path reached an address
//! - [`ContextGraph::consensus`] - The value of a register all paths agree on
//! - [`ContextGraph::connected_terminating_addresses`] - Reached `return`/`throw`s

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use crate::{
    emulation::{
        graph::node::{ContextNode, NodeId, NodePile},
        ExecutionError, OpHandler, RegisterContext, Value,
    },
    metadata::{FieldRef, MethodDef, TypeDescriptor},
    Result,
};

/// Execution graph of one method.
#[derive(Clone, Debug)]
pub struct ContextGraph {
    method: Arc<str>,
    piles: BTreeMap<u32, NodePile>,
    terminating: BTreeSet<u32>,
    returns: BTreeSet<u32>,
    static_puts: BTreeSet<FieldRef>,
    stores_into_arrays: bool,
    visits: BTreeMap<u32, usize>,
}

impl ContextGraph {
    /// Builds the template graph of `method`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the method has no instructions, does not
    /// start at address 0 or has addresses that are not strictly increasing.
    pub fn new(method: &MethodDef) -> Result<Self> {
        let descriptor = method.descriptor();
        let Some(first) = method.instructions.first() else {
            return Err(malformed_error!("{} has no instructions", descriptor));
        };
        if first.address != 0 {
            return Err(malformed_error!(
                "{} starts at address {} instead of 0",
                descriptor,
                first.address
            ));
        }

        let name: Arc<str> = Arc::from(descriptor.as_str());
        let mut piles = BTreeMap::new();
        let mut terminating = BTreeSet::new();
        let mut returns = BTreeSet::new();
        let mut static_puts = BTreeSet::new();
        let mut stores_into_arrays = false;
        let mut previous: Option<u32> = None;

        for instruction in &method.instructions {
            if previous.is_some_and(|prev| instruction.address <= prev) {
                return Err(malformed_error!(
                    "{} has out of order or duplicate address {}",
                    descriptor,
                    instruction.address
                ));
            }
            previous = Some(instruction.address);

            let handler = OpHandler::new(&name, instruction);
            if !handler.can_continue() {
                terminating.insert(instruction.address);
            }
            if handler.is_return() {
                returns.insert(instruction.address);
            }
            if let Some(field) = handler.static_put_field() {
                static_puts.insert(field.clone());
            }
            stores_into_arrays |= handler.may_store_into_arrays();
            piles.insert(instruction.address, NodePile::new(handler));
        }

        Ok(ContextGraph {
            method: name,
            piles,
            terminating,
            returns,
            static_puts,
            stores_into_arrays,
            visits: BTreeMap::new(),
        })
    }

    /// Descriptor of the method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Instruction addresses in ascending order.
    pub fn addresses(&self) -> impl Iterator<Item = u32> + '_ {
        self.piles.keys().copied()
    }

    /// Handler of the instruction at `address`.
    #[must_use]
    pub fn handler(&self, address: u32) -> Option<&OpHandler> {
        self.piles.get(&address).map(NodePile::handler)
    }

    pub(crate) fn shared_handler(&self, address: u32) -> Result<Arc<OpHandler>> {
        self.piles
            .get(&address)
            .map(|pile| Arc::clone(&pile.handler))
            .ok_or_else(|| self.invalid_address(address))
    }

    fn invalid_address(&self, address: u32) -> crate::Error {
        ExecutionError::InvalidAddress {
            method: self.method.to_string(),
            address,
        }
        .into()
    }

    /// Full pile at `address`, template included.
    #[must_use]
    pub fn pile(&self, address: u32) -> Option<&NodePile> {
        self.piles.get(&address)
    }

    /// Executed nodes at `address`.
    ///
    /// The template is excluded, except at address 0 where it doubles as the live
    /// root node. Unknown addresses yield an empty slice.
    #[must_use]
    pub fn node_pile(&self, address: u32) -> &[ContextNode] {
        match self.piles.get(&address) {
            Some(pile) if address == 0 => &pile.nodes,
            Some(pile) => &pile.nodes[1..],
            None => &[],
        }
    }

    /// Node with the given id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&ContextNode> {
        self.piles.get(&id.address)?.nodes.get(id.index)
    }

    /// Returns `true` if `address` is the entry or some path reached it.
    #[must_use]
    pub fn is_reached(&self, address: u32) -> bool {
        address == 0 || self.piles.get(&address).is_some_and(|pile| pile.len() > 1)
    }

    /// Addresses of instructions that leave the method.
    #[must_use]
    pub fn terminating_addresses(&self) -> Vec<u32> {
        self.terminating.iter().copied().collect()
    }

    /// Terminating addresses some path reached.
    #[must_use]
    pub fn connected_terminating_addresses(&self) -> Vec<u32> {
        self.terminating
            .iter()
            .copied()
            .filter(|address| self.is_reached(*address))
            .collect()
    }

    /// `return*` addresses some path reached.
    #[must_use]
    pub fn connected_return_addresses(&self) -> Vec<u32> {
        self.returns
            .iter()
            .copied()
            .filter(|address| self.is_reached(*address))
            .collect()
    }

    /// Static fields the method's own `sput` instructions write.
    pub fn static_puts(&self) -> impl Iterator<Item = &FieldRef> {
        self.static_puts.iter()
    }

    /// Returns `true` if any instruction can change the contents of an array.
    #[must_use]
    pub fn may_store_into_arrays(&self) -> bool {
        self.stores_into_arrays
    }

    fn contexts<'a>(&'a self, addresses: &'a [u32]) -> impl Iterator<Item = &'a RegisterContext> {
        addresses
            .iter()
            .flat_map(|address| self.node_pile(*address))
            .filter_map(ContextNode::context)
    }

    /// Value of `register` if every executed node at `addresses` agrees on it.
    ///
    /// Disagreement yields an unknown value, typed if all values share a type. No
    /// executed node at all yields an unknown value of the unconstrained type.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::InvalidRegister`] if `register` is outside the frame.
    pub fn consensus(&self, addresses: &[u32], register: u16) -> Result<Value> {
        let values = self
            .contexts(addresses)
            .map(|ctx| ctx.read(register))
            .collect::<Result<Vec<_>>>()?;
        Ok(agree(&values).unwrap_or_else(Value::uninitialized))
    }

    /// Return slot value all executed nodes at `addresses` agree on.
    ///
    /// Returns `None` if no node at `addresses` has a value in its return slot.
    #[must_use]
    pub fn return_consensus(&self, addresses: &[u32]) -> Option<Value> {
        let values: Vec<&Value> = self
            .contexts(addresses)
            .filter_map(RegisterContext::return_value)
            .collect();
        agree(&values)
    }

    /// Static fields written on any path that reached a terminating address.
    #[must_use]
    pub fn written_static_fields(&self) -> BTreeSet<FieldRef> {
        let addresses = self.connected_terminating_addresses();
        self.contexts(&addresses)
            .flat_map(|ctx| ctx.static_writes().map(|(field, _)| field.clone()))
            .collect()
    }

    /// Value of `field` all terminating paths agree on; paths that did not write it
    /// contribute `baseline`.
    #[must_use]
    pub fn static_consensus(&self, field: &FieldRef, baseline: &Value) -> Value {
        let addresses = self.connected_terminating_addresses();
        let values: Vec<&Value> = self
            .contexts(&addresses)
            .map(|ctx| ctx.static_value(field).unwrap_or(baseline))
            .collect();
        agree(&values).unwrap_or_else(|| baseline.clone())
    }

    /// Context of the live root node.
    #[must_use]
    pub fn root_context(&self) -> Option<&RegisterContext> {
        self.node(NodeId::ROOT).and_then(ContextNode::context)
    }

    /// Installs the entry context a [`crate::emulation::MethodExecutor`] starts from.
    pub fn set_root_context(&mut self, context: RegisterContext) {
        if let Some(root) = self
            .piles
            .get_mut(&0)
            .and_then(|pile| pile.nodes.first_mut())
        {
            root.context = Some(context);
        }
    }

    pub(crate) fn context_mut(&mut self, id: NodeId) -> Option<&mut RegisterContext> {
        self.piles
            .get_mut(&id.address)?
            .nodes
            .get_mut(id.index)?
            .context
            .as_mut()
    }

    /// Appends a clone at `address` holding `context`, produced by `parent`.
    pub(crate) fn add_clone(
        &mut self,
        address: u32,
        parent: NodeId,
        context: RegisterContext,
    ) -> Result<NodeId> {
        let pile = match self.piles.get_mut(&address) {
            Some(pile) => pile,
            None => return Err(self.invalid_address(address)),
        };
        let id = NodeId {
            address,
            index: pile.nodes.len(),
        };
        pile.nodes.push(ContextNode {
            address,
            context: Some(context),
            parent: Some(parent),
            children: Vec::new(),
        });

        if let Some(node) = self
            .piles
            .get_mut(&parent.address)
            .and_then(|pile| pile.nodes.get_mut(parent.index))
        {
            node.children.push(id);
        }
        Ok(id)
    }

    pub(crate) fn record_visit(&mut self, address: u32) {
        *self.visits.entry(address).or_default() += 1;
    }

    /// Number of accepted visits of `address` in the last execution.
    #[must_use]
    pub fn visit_count(&self, address: u32) -> usize {
        self.visits.get(&address).copied().unwrap_or(0)
    }

    /// Number of nodes created by execution: every clone plus the live root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        let clones: usize = self.piles.values().map(|pile| pile.len() - 1).sum();
        clones + usize::from(self.root_context().is_some())
    }
}

/// Merges the values of several paths.
///
/// Identical values survive. Otherwise the result is unknown, typed with the shared
/// declared type if there is one. `None` if there are no values.
fn agree(values: &[&Value]) -> Option<Value> {
    let (first, rest) = values.split_first()?;
    if rest.iter().all(|v| *v == *first) {
        return Some((*first).clone());
    }
    let ty = if rest.iter().all(|v| v.ty() == first.ty()) {
        first.ty().clone()
    } else {
        TypeDescriptor::unknown()
    };
    Some(Value::unknown(ty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::method;

    fn store_method() -> MethodDef {
        method("LFoo;->store()V", 1, |asm| {
            asm.const_int(0, 1).sput(0, "LFoo;->x:I").unwrap().return_void();
        })
    }

    #[test]
    fn test_agree() {
        let (one, two) = (Value::int(1), Value::int(2));
        assert_eq!(agree(&[]), None);
        assert_eq!(agree(&[&one, &one]), Some(one.clone()));
        assert_eq!(
            agree(&[&one, &two]),
            Some(Value::unknown(TypeDescriptor::int()))
        );
        assert_eq!(
            agree(&[&one, &Value::long(1)]),
            Some(Value::unknown(TypeDescriptor::unknown()))
        );
    }

    #[test]
    fn test_template_piles() {
        let graph = ContextGraph::new(&store_method()).unwrap();
        let ret = graph.terminating_addresses()[0];

        assert_eq!(graph.node_pile(0).len(), 1);
        assert!(graph.node_pile(ret).is_empty());
        assert!(graph.node_pile(999).is_empty());
        assert!(graph.is_reached(0));
        assert!(!graph.is_reached(ret));
        assert!(graph.root_context().is_none());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(
            graph.static_puts().cloned().collect::<Vec<_>>(),
            vec![FieldRef::parse("LFoo;->x:I").unwrap()]
        );
        assert!(!graph.may_store_into_arrays());
    }

    #[test]
    fn test_clone_links_to_parent() {
        let mut graph = ContextGraph::new(&store_method()).unwrap();
        let ret = graph.terminating_addresses()[0];
        graph.set_root_context(RegisterContext::new(1, 0));

        let child = graph
            .add_clone(ret, NodeId::ROOT, RegisterContext::new(1, 0))
            .unwrap();
        assert_eq!(child, NodeId { address: ret, index: 1 });
        assert_eq!(graph.node_pile(ret).len(), 1);
        assert_eq!(graph.node(NodeId::ROOT).unwrap().children(), &[child]);
        assert_eq!(graph.node(child).unwrap().parent(), Some(NodeId::ROOT));
        assert!(graph.is_reached(ret));
        assert_eq!(graph.node_count(), 2);

        assert!(graph
            .add_clone(999, NodeId::ROOT, RegisterContext::new(1, 0))
            .is_err());
    }

    #[test]
    fn test_static_consensus_fills_in_baseline() {
        let field = FieldRef::parse("LFoo;->x:I").unwrap();
        let mut graph = ContextGraph::new(&store_method()).unwrap();
        let ret = graph.terminating_addresses()[0];
        graph.set_root_context(RegisterContext::new(1, 0));

        let mut wrote = RegisterContext::new(1, 0);
        wrote.static_write(field.clone(), Value::int(1));
        graph.add_clone(ret, NodeId::ROOT, wrote).unwrap();
        graph
            .add_clone(ret, NodeId::ROOT, RegisterContext::new(1, 0))
            .unwrap();

        assert_eq!(graph.written_static_fields(), BTreeSet::from([field.clone()]));
        assert_eq!(graph.static_consensus(&field, &Value::int(1)), Value::int(1));
        assert_eq!(
            graph.static_consensus(&field, &Value::int(0)),
            Value::unknown(TypeDescriptor::int())
        );
    }

    #[test]
    fn test_consensus_without_paths_is_unconstrained() {
        let graph = ContextGraph::new(&store_method()).unwrap();
        let ret = graph.terminating_addresses()[0];
        assert_eq!(graph.consensus(&[ret], 0).unwrap(), Value::uninitialized());
        assert_eq!(graph.return_consensus(&[ret]), None);
    }

    #[test]
    fn test_rejects_out_of_order_addresses() {
        let mut def = store_method();
        def.instructions.swap(0, 1);
        assert!(matches!(
            ContextGraph::new(&def),
            Err(crate::Error::Malformed { .. })
        ));
    }
}
