// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and connections.

use crate::connection::{Connection, ConnectionId};
use crate::node::{Node, NodeId};
use crate::socket::SocketId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A shader node graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Nodes in the graph, in creation order
    nodes: IndexMap<NodeId, Node>,
    /// Connections between nodes
    connections: IndexMap<ConnectionId, Connection>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
        }
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node together with every link touching it
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.connections.retain(|_, c| !c.involves_node(node_id));
        self.nodes.shift_remove(&node_id)
    }

    /// Remove every node and connection
    pub fn clear(&mut self) {
        self.connections.clear();
        self.nodes.clear();
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all nodes mutably
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of sockets over all nodes
    pub fn socket_count(&self) -> usize {
        self.nodes.values().map(|n| n.inputs.len() + n.outputs.len()).sum()
    }

    /// The output node the renderer uses: the first one flagged active,
    /// otherwise the first node without output sockets
    pub fn active_output(&self) -> Option<&Node> {
        self.nodes
            .values()
            .find(|n| n.is_output_node() && n.is_active_output)
            .or_else(|| self.nodes.values().find(|n| n.is_output_node()))
    }

    /// Add a connection between sockets
    pub fn connect(
        &mut self,
        from_node: NodeId,
        from_socket: SocketId,
        to_node: NodeId,
        to_socket: SocketId,
    ) -> Result<ConnectionId, ConnectionError> {
        let source_node = self.nodes.get(&from_node)
            .ok_or(ConnectionError::NodeNotFound(from_node))?;
        let target_node = self.nodes.get(&to_node)
            .ok_or(ConnectionError::NodeNotFound(to_node))?;

        // Validate sockets exist
        let source_socket = source_node.socket(&from_socket)
            .ok_or(ConnectionError::SocketNotFound(from_socket))?;
        let target_socket = target_node.socket(&to_socket)
            .ok_or(ConnectionError::SocketNotFound(to_socket))?;

        if !source_socket.can_connect(target_socket) {
            return Err(ConnectionError::IncompatibleSockets);
        }

        // An input takes a single link
        if self.connections.values().any(|c| c.feeds_input(to_socket)) {
            return Err(ConnectionError::SocketAlreadyConnected(to_socket));
        }

        if from_node == to_node {
            return Err(ConnectionError::SelfLoop);
        }

        let connection = Connection::new(from_node, from_socket, to_node, to_socket);
        let id = connection.id;
        self.connections.insert(id, connection);
        Ok(id)
    }

    /// Connect output `from_index` of one node to input `to_index` of another
    pub fn connect_by_index(
        &mut self,
        from_node: NodeId,
        from_index: usize,
        to_node: NodeId,
        to_index: usize,
    ) -> Result<ConnectionId, ConnectionError> {
        let from_socket = self.nodes.get(&from_node)
            .ok_or(ConnectionError::NodeNotFound(from_node))?
            .output(from_index)
            .ok_or(ConnectionError::SocketIndexOutOfRange(from_index))?
            .id;
        let to_socket = self.nodes.get(&to_node)
            .ok_or(ConnectionError::NodeNotFound(to_node))?
            .input(to_index)
            .ok_or(ConnectionError::SocketIndexOutOfRange(to_index))?
            .id;
        self.connect(from_node, from_socket, to_node, to_socket)
    }

    /// Get all connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when creating a connection
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Socket not found
    #[error("Socket not found: {0:?}")]
    SocketNotFound(SocketId),

    /// No socket at the given index
    #[error("Socket index out of range: {0}")]
    SocketIndexOutOfRange(usize),

    /// Incompatible socket kinds
    #[error("Incompatible socket kinds")]
    IncompatibleSockets,

    /// Input is already connected
    #[error("Socket already connected: {0:?}")]
    SocketAlreadyConnected(SocketId),

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::create_shader_registry;

    fn diffuse_setup() -> (Graph, NodeId, NodeId) {
        let registry = create_shader_registry();
        let mut graph = Graph::new("Material");
        let output = graph.add_node(registry.create_node("ShaderNodeOutputMaterial").unwrap());
        let diffuse = graph.add_node(registry.create_node("ShaderNodeBsdfDiffuse").unwrap());
        (graph, output, diffuse)
    }

    #[test]
    fn test_connect_by_index() {
        let (mut graph, output, diffuse) = diffuse_setup();
        graph.connect_by_index(diffuse, 0, output, 0).unwrap();
        assert_eq!(graph.connection_count(), 1);

        // The surface input already has a link
        assert!(matches!(
            graph.connect_by_index(diffuse, 0, output, 0),
            Err(ConnectionError::SocketAlreadyConnected(_))
        ));
        assert!(matches!(
            graph.connect_by_index(diffuse, 3, output, 0),
            Err(ConnectionError::SocketIndexOutOfRange(3))
        ));
    }

    #[test]
    fn test_active_output() {
        let (graph, output, _) = diffuse_setup();
        assert_eq!(graph.active_output().map(|n| n.id), Some(output));
    }

    #[test]
    fn test_remove_node_drops_links() {
        let (mut graph, output, diffuse) = diffuse_setup();
        graph.connect_by_index(diffuse, 0, output, 0).unwrap();
        graph.remove_node(diffuse);
        assert_eq!(graph.connection_count(), 0);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_socket_count() {
        let (graph, _, _) = diffuse_setup();
        // Output: Surface, Volume, Displacement. Diffuse: Color, Roughness, Normal, BSDF.
        assert_eq!(graph.socket_count(), 7);
    }
}
