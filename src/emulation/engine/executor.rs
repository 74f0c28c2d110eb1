//! The per-method interpreter loop.
//!
//! [`MethodExecutor`] walks a [`ContextGraph`] depth first with an explicit stack,
//! starting from the root node whose context the caller prepared:
//!
//! ```text
//! stack = [root]
//! while let Some(node) = stack.pop() {
//!     count visit, abort when over the ceiling
//!     successors = handler.execute(node.context)
//!     for each successor:
//!         clone node.context into a new node at the successor address
//!         push it
//! }
//! ```
//!
//! Every visit creates a fresh clone, even at an address that was already reached, so
//! node piles keep one entry per path. Successors are pushed in the order the handler
//! returned them, which makes the resulting piles deterministic.

use log::trace;

use crate::{
    emulation::{
        engine::visits::VisitTracker, ContextGraph, ContextNode, ExecutionError, NodeId,
        VirtualMachine,
    },
    Result,
};

/// Drives one method's graph to completion.
pub struct MethodExecutor<'vm> {
    vm: &'vm mut VirtualMachine,
}

impl<'vm> MethodExecutor<'vm> {
    /// Creates an executor that resolves invocations and static state through `vm`.
    pub fn new(vm: &'vm mut VirtualMachine) -> Self {
        MethodExecutor { vm }
    }

    /// Executes `graph` from its root until every path returned, threw or was
    /// abandoned.
    ///
    /// The graph is mutated in place: nodes created before an error stay attached.
    ///
    /// # Errors
    ///
    /// - [`ExecutionError::RevisitCeilingExceeded`] if an address exceeds
    ///   [`crate::emulation::VmConfig::max_node_visits`]
    /// - [`ExecutionError::InvalidAddress`] if a handler names a successor without an
    ///   instruction
    /// - [`ExecutionError::InvalidRegister`] for out-of-frame operands
    /// - any error raised while executing an invoked method
    pub fn execute(&mut self, graph: &mut ContextGraph) -> Result<()> {
        let config = *self.vm.config();
        let mut visits = VisitTracker::new(config.visit_budget, config.max_node_visits);
        let mut stack = vec![NodeId::ROOT];

        while let Some(id) = stack.pop() {
            let handler = graph.shared_handler(id.address)?;
            let predecessor = graph
                .node(id)
                .and_then(ContextNode::parent)
                .map(|parent| parent.address);

            if !visits.accept(predecessor, id.address) {
                return Err(ExecutionError::RevisitCeilingExceeded {
                    method: graph.method().to_string(),
                    address: id.address,
                    node: handler.to_string(),
                    limit: config.max_node_visits,
                }
                .into());
            }
            graph.record_visit(id.address);
            trace!("{} {}: {}", graph.method(), id, handler);

            let Some(ctx) = graph.context_mut(id) else {
                return Err(malformed_error!(
                    "node {} of {} has no context",
                    id,
                    graph.method()
                ));
            };
            let successors = handler.execute(ctx, self.vm)?;
            let ctx = ctx.clone();

            for address in successors {
                let child = graph.add_clone(address, id, ctx.clone())?;
                stack.push(child);
            }
        }
        Ok(())
    }
}
