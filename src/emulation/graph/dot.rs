//! Graphviz rendering of executed context graphs.

use std::fmt::Write;

use crate::emulation::{ContextGraph, NodeId};

/// Escapes a string for use inside a quoted DOT label.
fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('<', "\\<")
        .replace('>', "\\>")
}

fn node_name(id: NodeId) -> String {
    format!("n{}_{}", id.address, id.index)
}

impl ContextGraph {
    /// Renders every executed node and its parent edge in DOT format.
    ///
    /// Nodes are labelled with their address, pile index and instruction. Terminating
    /// nodes are drawn with a double border. Templates that were never reached are
    /// omitted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smaliscope::{
    ///     assembly::MethodAssembler,
    ///     emulation::{VirtualMachine, VmConfig},
    ///     metadata::{AccessFlags, ClassDef, MethodDef},
    /// };
    ///
    /// let mut asm = MethodAssembler::new();
    /// asm.const_int(0, 7).return_value(0);
    /// let method = MethodDef::new("LFoo;->seven()I", AccessFlags::STATIC, 1, asm.finish()?)?;
    /// let class = ClassDef::new("LFoo;", AccessFlags::PUBLIC).with_method(method);
    ///
    /// let mut vm = VirtualMachine::new(vec![class], VmConfig::default())?;
    /// let graph = vm.execute("LFoo;->seven()I")?.expect("within limits");
    /// assert!(graph.to_dot().starts_with("digraph"));
    /// # Ok::<(), smaliscope::Error>(())
    /// ```
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut dot = String::new();

        dot.push_str("digraph ContextGraph {\n");
        let _ = writeln!(dot, "    label=\"{}\";", escape_dot(self.method()));
        dot.push_str("    labelloc=t;\n");
        dot.push_str("    node [shape=box, fontname=\"Courier\", fontsize=10];\n\n");

        let mut edges = Vec::new();
        for address in self.addresses() {
            let Some(handler) = self.handler(address) else {
                continue;
            };
            for (offset, node) in self.node_pile(address).iter().enumerate() {
                if node.context().is_none() {
                    continue;
                }
                let index = if address == 0 { offset } else { offset + 1 };
                let id = NodeId { address, index };
                let peripheries = if handler.can_continue() { 1 } else { 2 };
                let _ = writeln!(
                    dot,
                    "    {} [label=\"{}: {}\", peripheries={}];",
                    node_name(id),
                    id,
                    escape_dot(&handler.to_string()),
                    peripheries
                );
                if let Some(parent) = node.parent() {
                    edges.push((parent, id));
                }
            }
        }

        if !edges.is_empty() {
            dot.push('\n');
        }
        for (from, to) in edges {
            let _ = writeln!(dot, "    {} -> {};", node_name(from), node_name(to));
        }

        dot.push_str("}\n");
        dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_dot() {
        assert_eq!(escape_dot("LFoo;->bar()V"), "LFoo;-\\>bar()V");
        assert_eq!(escape_dot("\"x\""), "\\\"x\\\"");
    }
}
