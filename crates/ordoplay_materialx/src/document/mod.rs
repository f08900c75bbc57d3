// SPDX-License-Identifier: MIT OR Apache-2.0
//! MaterialX document object model.
//!
//! Only the element kinds used for material exchange are modeled: materials
//! with shader references and bind inputs, node definitions, and node graphs
//! holding node instances and outputs. Children are keyed by name and keep
//! insertion order, so a written document lists elements in the order they
//! were added.

mod traversal;
mod xml;

pub use traversal::Edge;

use crate::error::{DocumentError, Result};
use crate::types::MtlxType;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::path::Path;

/// Document version written on new documents
pub const DEFAULT_VERSION: &str = "1.36";

/// Attribute holding the horizontal editor position
pub const XPOS: &str = "xpos";
/// Attribute holding the vertical editor position
pub const YPOS: &str = "ypos";

fn insert_unique<'a, T>(
    map: &'a mut IndexMap<String, T>,
    kind: &'static str,
    name: &str,
    value: T,
) -> Result<&'a mut T> {
    match map.entry(name.to_string()) {
        Entry::Occupied(_) => Err(DocumentError::Duplicate {
            kind,
            name: name.to_string(),
        }),
        Entry::Vacant(slot) => Ok(slot.insert(value)),
    }
}

fn parse_position(attributes: &IndexMap<String, String>) -> Option<[f32; 2]> {
    let x = attributes.get(XPOS)?.trim().parse().ok()?;
    let y = attributes.get(YPOS)?.trim().parse().ok()?;
    Some([x, y])
}

fn store_position(attributes: &mut IndexMap<String, String>, position: [f32; 2]) {
    attributes.insert(XPOS.to_string(), crate::codec::format_float(position[0]));
    attributes.insert(YPOS.to_string(), crate::codec::format_float(position[1]));
}

/// A MaterialX document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// `version` attribute of the root element
    pub version: String,
    node_defs: IndexMap<String, NodeDef>,
    node_graphs: IndexMap<String, NodeGraph>,
    materials: IndexMap<String, Material>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            node_defs: IndexMap::new(),
            node_graphs: IndexMap::new(),
            materials: IndexMap::new(),
        }
    }

    /// Remove every element, keeping the version
    pub fn initialize(&mut self) {
        self.node_defs.clear();
        self.node_graphs.clear();
        self.materials.clear();
    }

    /// Parse a document from XML text
    pub fn from_xml_str(text: &str) -> Result<Self> {
        xml::parse(text)
    }

    /// Serialize the document to XML text
    pub fn to_xml_string(&self) -> Result<String> {
        xml::write(self)
    }

    /// Read a document from a file
    pub fn read_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_xml_str(&text)
    }

    /// Write the document to a file
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let text = self.to_xml_string()?;
        std::fs::write(path, text).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Add a material
    pub fn add_material(&mut self, name: &str) -> Result<&mut Material> {
        insert_unique(&mut self.materials, "material", name, Material::new(name))
    }

    /// Get a material by name
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    /// Get a mutable material by name
    pub fn material_mut(&mut self, name: &str) -> Option<&mut Material> {
        self.materials.get_mut(name)
    }

    /// All materials
    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    /// Add a node definition
    pub fn add_node_def(&mut self, node_def: NodeDef) -> Result<&mut NodeDef> {
        let name = node_def.name.clone();
        insert_unique(&mut self.node_defs, "nodedef", &name, node_def)
    }

    /// Get a node definition by name
    pub fn node_def(&self, name: &str) -> Option<&NodeDef> {
        self.node_defs.get(name)
    }

    /// All node definitions
    pub fn node_defs(&self) -> impl Iterator<Item = &NodeDef> {
        self.node_defs.values()
    }

    /// Node definitions implementing a node category, e.g. `diffuse_bsdf`
    pub fn matching_node_defs(&self, category: &str) -> Vec<&NodeDef> {
        self.node_defs
            .values()
            .filter(|def| def.node == category)
            .collect()
    }

    /// Add a node graph
    pub fn add_node_graph(&mut self, name: &str) -> Result<&mut NodeGraph> {
        insert_unique(&mut self.node_graphs, "nodegraph", name, NodeGraph::new(name))
    }

    /// Get a node graph by name
    pub fn node_graph(&self, name: &str) -> Option<&NodeGraph> {
        self.node_graphs.get(name)
    }

    /// Get a mutable node graph by name
    pub fn node_graph_mut(&mut self, name: &str) -> Option<&mut NodeGraph> {
        self.node_graphs.get_mut(name)
    }

    /// All node graphs
    pub fn node_graphs(&self) -> impl Iterator<Item = &NodeGraph> {
        self.node_graphs.values()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// A `<material>` element
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material name
    pub name: String,
    shader_refs: IndexMap<String, ShaderRef>,
}

impl Material {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            shader_refs: IndexMap::new(),
        }
    }

    /// Add a shader reference to a node definition
    pub fn add_shader_ref(&mut self, name: &str, node_def: &str) -> Result<&mut ShaderRef> {
        let shader_ref = ShaderRef {
            name: name.to_string(),
            node_def: node_def.to_string(),
            attributes: IndexMap::new(),
            bind_inputs: IndexMap::new(),
        };
        insert_unique(&mut self.shader_refs, "shaderref", name, shader_ref)
    }

    /// Get a shader reference by name
    pub fn shader_ref(&self, name: &str) -> Option<&ShaderRef> {
        self.shader_refs.get(name)
    }

    /// All shader references
    pub fn shader_refs(&self) -> impl Iterator<Item = &ShaderRef> {
        self.shader_refs.values()
    }
}

/// A `<shaderref>` element binding a material to render channels
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderRef {
    /// Element name
    pub name: String,
    /// Referenced node definition (`node` attribute)
    pub node_def: String,
    /// Extra attributes such as the editor position
    pub attributes: IndexMap<String, String>,
    bind_inputs: IndexMap<String, BindInput>,
}

impl ShaderRef {
    /// Add a bind input
    pub fn add_bind_input(&mut self, name: &str, ty: MtlxType) -> Result<&mut BindInput> {
        let bind_input = BindInput {
            name: name.to_string(),
            ty,
            node_graph: None,
            output: None,
        };
        insert_unique(&mut self.bind_inputs, "bindinput", name, bind_input)
    }

    /// Get a bind input by name
    pub fn bind_input(&self, name: &str) -> Option<&BindInput> {
        self.bind_inputs.get(name)
    }

    /// All bind inputs
    pub fn bind_inputs(&self) -> impl Iterator<Item = &BindInput> {
        self.bind_inputs.values()
    }

    /// Editor position, when both coordinates are present
    pub fn position(&self) -> Option<[f32; 2]> {
        parse_position(&self.attributes)
    }

    /// Store the editor position
    pub fn set_position(&mut self, position: [f32; 2]) {
        store_position(&mut self.attributes, position);
    }
}

/// A `<bindinput>` connecting a shader reference input to a node graph output
#[derive(Debug, Clone, PartialEq)]
pub struct BindInput {
    /// Input name on the referenced node definition
    pub name: String,
    /// Data type
    pub ty: MtlxType,
    /// Source node graph (`nodegraph` attribute)
    pub node_graph: Option<String>,
    /// Source output within the node graph (`output` attribute)
    pub output: Option<String>,
}

impl BindInput {
    /// Connect to an output of a node graph
    pub fn set_connected_output(&mut self, node_graph: &str, output: &str) {
        self.node_graph = Some(node_graph.to_string());
        self.output = Some(output.to_string());
    }
}

/// A typed `<input>` or `<parameter>`
#[derive(Debug, Clone, PartialEq)]
pub struct ValueElement {
    /// Element name
    pub name: String,
    /// Data type
    pub ty: MtlxType,
    /// Literal value
    pub value: Option<String>,
    /// Interface input of the enclosing definition this element maps to
    pub interface_name: Option<String>,
    /// Upstream node within the same graph (`nodename` attribute)
    pub node_name: Option<String>,
    /// Upstream output, for multi-output upstream nodes
    pub output: Option<String>,
}

impl ValueElement {
    /// Create an element without a value
    pub fn new(name: &str, ty: MtlxType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            value: None,
            interface_name: None,
            node_name: None,
            output: None,
        }
    }

    /// Set the literal value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Connect this input to an upstream node
    pub fn set_connected_node(&mut self, node_name: &str) {
        self.node_name = Some(node_name.to_string());
    }

    /// Upstream node name, if connected
    pub fn connected_node(&self) -> Option<&str> {
        self.node_name.as_deref()
    }
}

/// An `<output>` of a node definition or node graph
#[derive(Debug, Clone, PartialEq)]
pub struct OutputElement {
    /// Element name
    pub name: String,
    /// Data type
    pub ty: MtlxType,
    /// Node within the graph feeding this output
    pub node_name: Option<String>,
    /// Output of that node, for multi-output nodes
    pub output: Option<String>,
}

impl OutputElement {
    fn new(name: &str, ty: MtlxType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            node_name: None,
            output: None,
        }
    }

    /// Connect this output to a node within the graph
    pub fn set_connected_node(&mut self, node_name: &str) {
        self.node_name = Some(node_name.to_string());
    }

    /// Connected node name
    pub fn connected_node(&self) -> Option<&str> {
        self.node_name.as_deref()
    }
}

/// A `<nodedef>`: the typed signature of a node category
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDef {
    /// Definition name
    pub name: String,
    /// Node category it defines (`node` attribute)
    pub node: String,
    /// Output type, `multioutput` for several outputs
    pub ty: MtlxType,
    /// Target renderer namespace, e.g. `cycles`
    pub target: Option<String>,
    inputs: IndexMap<String, ValueElement>,
    parameters: IndexMap<String, ValueElement>,
    outputs: IndexMap<String, OutputElement>,
}

impl NodeDef {
    /// Create an empty definition
    pub fn new(name: &str, node: &str, ty: MtlxType) -> Self {
        Self {
            name: name.to_string(),
            node: node.to_string(),
            ty,
            target: None,
            inputs: IndexMap::new(),
            parameters: IndexMap::new(),
            outputs: IndexMap::new(),
        }
    }

    /// Add an input
    pub fn add_input(&mut self, input: ValueElement) -> Result<&mut ValueElement> {
        let name = input.name.clone();
        insert_unique(&mut self.inputs, "input", &name, input)
    }

    /// Add a parameter
    pub fn add_parameter(&mut self, parameter: ValueElement) -> Result<&mut ValueElement> {
        let name = parameter.name.clone();
        insert_unique(&mut self.parameters, "parameter", &name, parameter)
    }

    /// Add an output
    pub fn add_output(&mut self, name: &str, ty: MtlxType) -> Result<&mut OutputElement> {
        insert_unique(&mut self.outputs, "output", name, OutputElement::new(name, ty))
    }

    /// Get an input by name
    pub fn input(&self, name: &str) -> Option<&ValueElement> {
        self.inputs.get(name)
    }

    /// All inputs, in declaration order
    pub fn inputs(&self) -> impl Iterator<Item = &ValueElement> {
        self.inputs.values()
    }

    /// All parameters, in declaration order
    pub fn parameters(&self) -> impl Iterator<Item = &ValueElement> {
        self.parameters.values()
    }

    /// All outputs, in declaration order
    pub fn outputs(&self) -> impl Iterator<Item = &OutputElement> {
        self.outputs.values()
    }

    /// Number of outputs
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }
}

/// A `<nodegraph>`: node instances and the outputs they feed
#[derive(Debug, Clone, PartialEq)]
pub struct NodeGraph {
    /// Graph name
    pub name: String,
    /// Node definition this graph implements
    pub node_def: Option<String>,
    nodes: IndexMap<String, Node>,
    outputs: IndexMap<String, OutputElement>,
}

impl NodeGraph {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            node_def: None,
            nodes: IndexMap::new(),
            outputs: IndexMap::new(),
        }
    }

    /// Add a node instance of a category
    pub fn add_node(&mut self, category: &str, name: &str, ty: MtlxType) -> Result<&mut Node> {
        let node = Node {
            category: category.to_string(),
            name: name.to_string(),
            ty,
            attributes: IndexMap::new(),
            inputs: IndexMap::new(),
            parameters: IndexMap::new(),
        };
        insert_unique(&mut self.nodes, "node", name, node)
    }

    /// Remove a node instance
    pub fn remove_node(&mut self, name: &str) -> Option<Node> {
        self.nodes.shift_remove(name)
    }

    /// Get a node by name
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Get a mutable node by name
    pub fn node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.get_mut(name)
    }

    /// All nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Add a graph output
    pub fn add_output(&mut self, name: &str, ty: MtlxType) -> Result<&mut OutputElement> {
        insert_unique(&mut self.outputs, "output", name, OutputElement::new(name, ty))
    }

    /// Get a graph output by name
    pub fn output(&self, name: &str) -> Option<&OutputElement> {
        self.outputs.get(name)
    }

    /// Get a mutable graph output by name
    pub fn output_mut(&mut self, name: &str) -> Option<&mut OutputElement> {
        self.outputs.get_mut(name)
    }

    /// All graph outputs
    pub fn outputs(&self) -> impl Iterator<Item = &OutputElement> {
        self.outputs.values()
    }
}

/// A node instance inside a node graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node category, the XML tag
    pub category: String,
    /// Instance name
    pub name: String,
    /// Output type
    pub ty: MtlxType,
    /// Extra attributes such as the editor position
    pub attributes: IndexMap<String, String>,
    inputs: IndexMap<String, ValueElement>,
    parameters: IndexMap<String, ValueElement>,
}

impl Node {
    /// Add an input
    pub fn add_input(&mut self, input: ValueElement) -> Result<&mut ValueElement> {
        let name = input.name.clone();
        insert_unique(&mut self.inputs, "input", &name, input)
    }

    /// Add a parameter
    pub fn add_parameter(&mut self, parameter: ValueElement) -> Result<&mut ValueElement> {
        let name = parameter.name.clone();
        insert_unique(&mut self.parameters, "parameter", &name, parameter)
    }

    /// Get an input by name
    pub fn input(&self, name: &str) -> Option<&ValueElement> {
        self.inputs.get(name)
    }

    /// Get a mutable input by name
    pub fn input_mut(&mut self, name: &str) -> Option<&mut ValueElement> {
        self.inputs.get_mut(name)
    }

    /// Get a parameter by name
    pub fn parameter(&self, name: &str) -> Option<&ValueElement> {
        self.parameters.get(name)
    }

    /// All inputs, in insertion order
    pub fn inputs(&self) -> impl Iterator<Item = &ValueElement> {
        self.inputs.values()
    }

    /// All parameters, in insertion order
    pub fn parameters(&self) -> impl Iterator<Item = &ValueElement> {
        self.parameters.values()
    }

    /// Editor position, when both coordinates are present
    pub fn position(&self) -> Option<[f32; 2]> {
        parse_position(&self.attributes)
    }

    /// Store the editor position
    pub fn set_position(&mut self, position: [f32; 2]) {
        store_position(&mut self.attributes, position);
    }
}
