//! Nodes of an execution graph.

use std::{fmt, sync::Arc};

use crate::emulation::{OpHandler, RegisterContext};

/// Identifies a node by its address and its position in that address's pile.
///
/// Index 0 is the template; clones start at index 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    /// Instruction address
    pub address: u32,
    /// Position in the node pile
    pub index: usize,
}

impl NodeId {
    /// The live root node of every graph.
    pub const ROOT: NodeId = NodeId {
        address: 0,
        index: 0,
    };
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}[{}]", self.address, self.index)
    }
}

/// One visit of an instruction by one execution path.
#[derive(Clone, Debug)]
pub struct ContextNode {
    pub(crate) address: u32,
    pub(crate) context: Option<RegisterContext>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl ContextNode {
    pub(crate) fn template(address: u32) -> Self {
        ContextNode {
            address,
            context: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Instruction address.
    #[must_use]
    pub fn address(&self) -> u32 {
        self.address
    }

    /// Register state after the instruction executed on this path.
    ///
    /// Templates carry no context, except the root once execution has started.
    #[must_use]
    pub fn context(&self) -> Option<&RegisterContext> {
        self.context.as_ref()
    }

    /// Node whose execution produced this one.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Nodes this one produced, in successor order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// All nodes at one address: the template followed by one clone per visit.
#[derive(Clone, Debug)]
pub struct NodePile {
    pub(crate) handler: Arc<OpHandler>,
    pub(crate) nodes: Vec<ContextNode>,
}

impl NodePile {
    pub(crate) fn new(handler: OpHandler) -> Self {
        let address = handler.address();
        NodePile {
            handler: Arc::new(handler),
            nodes: vec![ContextNode::template(address)],
        }
    }

    /// Handler shared by every node of the pile.
    #[must_use]
    pub fn handler(&self) -> &OpHandler {
        &self.handler
    }

    /// Number of nodes including the template.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a pile holds at least its template.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
