// SPDX-License-Identifier: MIT OR Apache-2.0
//! Links between an output socket and an input socket.

use crate::node::NodeId;
use crate::socket::SocketId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random link ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// A link from an output socket to an input socket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Link ID
    pub id: ConnectionId,
    /// Upstream node
    pub from_node: NodeId,
    /// Output socket on the upstream node
    pub from_socket: SocketId,
    /// Downstream node
    pub to_node: NodeId,
    /// Input socket on the downstream node
    pub to_socket: SocketId,
    /// False when the host flags the link, e.g. a type mismatch or a cycle.
    /// Invalid links are not exported.
    #[serde(default = "default_valid")]
    pub is_valid: bool,
}

fn default_valid() -> bool {
    true
}

impl Connection {
    /// Link two sockets
    pub fn new(from_node: NodeId, from_socket: SocketId, to_node: NodeId, to_socket: SocketId) -> Self {
        Self {
            id: ConnectionId::new(),
            from_node,
            from_socket,
            to_node,
            to_socket,
            is_valid: true,
        }
    }

    /// Whether either end sits on `node_id`
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from_node == node_id || self.to_node == node_id
    }

    /// Whether this link drives the input `socket_id`
    pub fn feeds_input(&self, socket_id: SocketId) -> bool {
        self.to_socket == socket_id
    }
}
