// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the shader graph.

use crate::param::ParamValue;
use crate::renderer::RendererTag;
use crate::socket::{Socket, SocketId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Input nodes (constants, coordinates, attributes)
    Input,
    /// Output nodes (material output)
    Output,
    /// Shader closures
    Shader,
    /// Texture generators
    Texture,
    /// Color adjustments
    Color,
    /// Vector operations
    Vector,
    /// Converters and math
    Converter,
    /// Renderer-specific patterns
    Pattern,
}

/// Node type definition, used as a template when creating nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeType {
    /// Unique type identifier, e.g. `ShaderNodeBsdfDiffuse`
    pub id: String,
    /// Display label, also the default node name
    pub name: String,
    /// Category
    pub category: NodeCategory,
    /// Description
    pub description: String,
    /// Default input sockets
    pub inputs: Vec<Socket>,
    /// Default output sockets
    pub outputs: Vec<Socket>,
    /// Default parameters
    pub parameters: IndexMap<String, ParamValue>,
}

/// A node instance in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Node type ID
    pub node_type: String,
    /// Type label, e.g. `Diffuse BSDF` or `PxrDiffuse`
    pub label: String,
    /// Node name, unique within its graph
    pub name: String,
    /// Position in the graph editor
    pub position: [f32; 2],
    /// Input sockets
    pub inputs: Vec<Socket>,
    /// Output sockets
    pub outputs: Vec<Socket>,
    /// Parameters by attribute name
    #[serde(default)]
    pub parameters: IndexMap<String, ParamValue>,
    /// Render engine this node is authored for
    #[serde(default)]
    pub renderer: Option<RendererTag>,
    /// Whether this output node is the one the renderer uses
    #[serde(default)]
    pub is_active_output: bool,
}

impl Node {
    /// Create a new node from a type definition
    pub fn new(node_type: &NodeType) -> Self {
        let mut inputs = node_type.inputs.clone();
        let mut outputs = node_type.outputs.clone();
        for socket in inputs.iter_mut().chain(outputs.iter_mut()) {
            socket.regenerate_id();
        }

        Self {
            id: NodeId::new(),
            node_type: node_type.id.clone(),
            label: node_type.name.clone(),
            name: node_type.name.clone(),
            position: [0.0, 0.0],
            inputs,
            outputs,
            parameters: node_type.parameters.clone(),
            renderer: None,
            is_active_output: false,
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Set the node name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the renderer tag
    pub fn with_renderer(mut self, renderer: RendererTag) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Output nodes are terminals: they have no output sockets
    pub fn is_output_node(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Get an input socket by index
    pub fn input(&self, index: usize) -> Option<&Socket> {
        self.inputs.get(index)
    }

    /// Get an output socket by index
    pub fn output(&self, index: usize) -> Option<&Socket> {
        self.outputs.get(index)
    }

    /// Get an input socket by name
    pub fn input_by_name(&self, name: &str) -> Option<&Socket> {
        self.inputs.iter().find(|s| s.name == name)
    }

    /// Get a mutable input socket by name
    pub fn input_by_name_mut(&mut self, name: &str) -> Option<&mut Socket> {
        self.inputs.iter_mut().find(|s| s.name == name)
    }

    /// Get an output socket index by name
    pub fn output_index(&self, name: &str) -> Option<usize> {
        self.outputs.iter().position(|s| s.name == name)
    }

    /// Get a socket by ID
    pub fn socket(&self, socket_id: &SocketId) -> Option<&Socket> {
        self.inputs.iter().find(|s| s.id == *socket_id)
            .or_else(|| self.outputs.iter().find(|s| s.id == *socket_id))
    }

    /// Get a parameter by attribute name
    pub fn parameter(&self, name: &str) -> Option<&ParamValue> {
        self.parameters.get(name)
    }

    /// Get a mutable parameter by attribute name
    pub fn parameter_mut(&mut self, name: &str) -> Option<&mut ParamValue> {
        self.parameters.get_mut(name)
    }

    /// Set a parameter, replacing any previous value
    pub fn set_parameter(&mut self, name: impl Into<String>, value: ParamValue) {
        self.parameters.insert(name.into(), value);
    }

    /// Get all sockets, inputs first
    pub fn sockets(&self) -> impl Iterator<Item = &Socket> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    /// Get all sockets mutably, inputs first
    pub fn sockets_mut(&mut self) -> impl Iterator<Item = &mut Socket> {
        self.inputs.iter_mut().chain(self.outputs.iter_mut())
    }
}

/// Registry of available node types
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    /// Registered node types by ID
    types: IndexMap<String, NodeType>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            types: IndexMap::new(),
        }
    }

    /// Register a node type
    pub fn register(&mut self, node_type: NodeType) {
        self.types.insert(node_type.id.clone(), node_type);
    }

    /// Get a node type by ID
    pub fn get(&self, id: &str) -> Option<&NodeType> {
        self.types.get(id)
    }

    /// Get all registered types
    pub fn types(&self) -> impl Iterator<Item = &NodeType> {
        self.types.values()
    }

    /// Get types by category
    pub fn types_in_category(&self, category: NodeCategory) -> impl Iterator<Item = &NodeType> {
        self.types.values().filter(move |t| t.category == category)
    }

    /// Create a node from a type ID
    pub fn create_node(&self, type_id: &str) -> Option<Node> {
        self.get(type_id).map(Node::new)
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
