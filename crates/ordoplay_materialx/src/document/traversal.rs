// SPDX-License-Identifier: MIT OR Apache-2.0
//! Upstream traversal of node graph dataflow.

use super::NodeGraph;
use indexmap::IndexSet;

/// One dataflow edge: an input of `downstream` fed by `upstream`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Node owning the connecting input
    pub downstream: String,
    /// Name of the connecting input
    pub connecting_input: String,
    /// Position of the connecting input among the downstream node's inputs
    pub input_index: usize,
    /// Node feeding the input
    pub upstream: String,
    /// Output of the upstream node, for multi-output nodes
    pub upstream_output: Option<String>,
}

impl NodeGraph {
    /// Edges entering a node, in input order.
    ///
    /// Inputs naming a node that is not in the graph are skipped.
    pub fn upstream_edges(&self, node_name: &str) -> Vec<Edge> {
        let Some(node) = self.node(node_name) else {
            return Vec::new();
        };

        node.inputs()
            .enumerate()
            .filter_map(|(input_index, input)| {
                let upstream = input.connected_node()?;
                if self.node(upstream).is_none() {
                    tracing::debug!(
                        node = node_name,
                        input = %input.name,
                        upstream,
                        "Input names a node outside the graph"
                    );
                    return None;
                }
                Some(Edge {
                    downstream: node_name.to_string(),
                    connecting_input: input.name.clone(),
                    input_index,
                    upstream: upstream.to_string(),
                    upstream_output: input.output.clone(),
                })
            })
            .collect()
    }

    /// All edges reachable upstream of a node, depth first.
    ///
    /// Each node's inputs are expanded once, so shared ancestors and cycles
    /// do not repeat.
    pub fn traverse_upstream(&self, start: &str) -> Vec<Edge> {
        let mut visited = IndexSet::new();
        let mut edges = Vec::new();
        self.collect_upstream(start, &mut visited, &mut edges);
        edges
    }

    fn collect_upstream(&self, node_name: &str, visited: &mut IndexSet<String>, edges: &mut Vec<Edge>) {
        if !visited.insert(node_name.to_string()) {
            return;
        }
        for edge in self.upstream_edges(node_name) {
            let upstream = edge.upstream.clone();
            edges.push(edge);
            self.collect_upstream(&upstream, visited, edges);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::document::{Document, ValueElement};
    use crate::types::MtlxType;

    fn diamond() -> Document {
        // rgb feeds both mix inputs through two invert nodes
        let mut doc = Document::new();
        let graph = doc.add_node_graph("ng").unwrap();
        graph.add_node("rgb", "rgb", MtlxType::Color4).unwrap();
        for name in ["invert_a", "invert_b"] {
            let node = graph.add_node("invert", name, MtlxType::Color4).unwrap();
            let mut input = ValueElement::new("color", MtlxType::Color4);
            input.set_connected_node("rgb");
            node.add_input(input).unwrap();
        }
        let mix = graph.add_node("mix_rgb", "mix", MtlxType::Color4).unwrap();
        mix.add_input(ValueElement::new("fac", MtlxType::Float).with_value("0.5")).unwrap();
        for (input, upstream) in [("color1", "invert_a"), ("color2", "invert_b")] {
            let mut element = ValueElement::new(input, MtlxType::Color4);
            element.set_connected_node(upstream);
            mix.add_input(element).unwrap();
        }
        doc
    }

    #[test]
    fn test_upstream_edges_keep_input_index() {
        let doc = diamond();
        let edges = doc.node_graph("ng").unwrap().upstream_edges("mix");
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].input_index, 1);
        assert_eq!(edges[1].upstream, "invert_b");
        assert_eq!(edges[1].input_index, 2);
    }

    #[test]
    fn test_traverse_visits_shared_ancestor_once() {
        let doc = diamond();
        let edges = doc.node_graph("ng").unwrap().traverse_upstream("mix");
        // mix<-invert_a, invert_a<-rgb, mix<-invert_b, invert_b<-rgb
        assert_eq!(edges.len(), 4);
        assert_eq!(edges.iter().filter(|e| e.upstream == "rgb").count(), 2);
    }

    #[test]
    fn test_dangling_reference_skipped() {
        let mut doc = Document::new();
        let graph = doc.add_node_graph("ng").unwrap();
        let node = graph.add_node("invert", "invert", MtlxType::Color4).unwrap();
        let mut input = ValueElement::new("color", MtlxType::Color4);
        input.set_connected_node("missing");
        node.add_input(input).unwrap();
        assert!(graph.upstream_edges("invert").is_empty());
    }
}
