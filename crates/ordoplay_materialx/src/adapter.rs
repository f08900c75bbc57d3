// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-node adapter: collects a host node's sockets and parameters, defines
//! its node type once per document and instantiates it into a node graph.
//!
//! Adapters live in the network's arena and are addressed by handle. The
//! lifecycle is `Uninitialized -> SetupComplete -> Defined -> Instantiated`;
//! defining and instantiating again are both safe.

use crate::codec;
use crate::descriptors::{AdapterKind, MtlxNodeName, NodeDescriptor, ParamSource, ShaderFamily};
use crate::document::{Document, NodeDef, NodeGraph, ValueElement};
use crate::error::DocumentError;
use crate::names;
use crate::network::{Channel, Link};
use crate::types::MtlxType;
use ordoplay_shader_graph::{Node, NodeId, RendererTag, Socket};

/// Lifecycle stage of an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AdapterState {
    /// Created, nothing collected yet
    Uninitialized,
    /// Sockets and parameters collected
    SetupComplete,
    /// Node definition present in the document
    Defined,
    /// Node instance present in the node graph
    Instantiated,
}

/// A socket as written to the document
#[derive(Debug, Clone, PartialEq)]
pub struct SocketEntry {
    /// Host socket name
    pub name: String,
    /// Document-wide unique name
    pub mtlx_name: String,
    /// MaterialX type
    pub ty: MtlxType,
    /// Encoded default value; `None` for shader sockets
    pub value: Option<String>,
}

/// A parameter as written to the document
#[derive(Debug, Clone, PartialEq)]
pub struct ParamEntry {
    /// Parameter name
    pub name: String,
    /// MaterialX type
    pub ty: MtlxType,
    /// Encoded value
    pub value: String,
}

/// Adapter record for one host node
#[derive(Debug, Clone)]
pub struct NodeAdapter {
    node_id: NodeId,
    renderer: RendererTag,
    target: &'static str,
    descriptor: &'static NodeDescriptor,
    state: AdapterState,
    defined: bool,
    instantiated: bool,
    mtlx_name: String,
    mtlx_node: String,
    node_def_name: String,
    mtlx_type: MtlxType,
    position: [f32; 2],
    inputs: Vec<SocketEntry>,
    outputs: Vec<SocketEntry>,
    params: Vec<ParamEntry>,
}

fn socket_entry(socket: &Socket) -> SocketEntry {
    let mtlx_name = if socket.mtlx_name.is_empty() {
        names::to_canonical(&socket.name)
    } else {
        socket.mtlx_name.clone()
    };
    let value = if socket.kind.has_value() {
        socket.default_value.as_ref().map(codec::encode_socket_value)
    } else {
        None
    };

    SocketEntry {
        name: socket.name.clone(),
        mtlx_name,
        ty: MtlxType::from_socket_kind(socket.kind),
        value,
    }
}

impl NodeAdapter {
    /// Create an adapter for a host node
    pub fn new(
        node_id: NodeId,
        renderer: RendererTag,
        target: &'static str,
        descriptor: &'static NodeDescriptor,
    ) -> Self {
        Self {
            node_id,
            renderer,
            target,
            descriptor,
            state: AdapterState::Uninitialized,
            defined: false,
            instantiated: false,
            mtlx_name: String::new(),
            mtlx_node: String::new(),
            node_def_name: descriptor.type_id.to_lowercase(),
            mtlx_type: MtlxType::SurfaceShader,
            position: [0.0, 0.0],
            inputs: Vec::new(),
            outputs: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Host node this adapter translates
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Renderer namespace the adapter came from
    pub fn renderer(&self) -> RendererTag {
        self.renderer
    }

    /// Table row driving this adapter
    pub fn descriptor(&self) -> &'static NodeDescriptor {
        self.descriptor
    }

    /// Current lifecycle stage
    pub fn state(&self) -> AdapterState {
        self.state
    }

    /// Whether the node definition has been registered
    pub fn is_defined(&self) -> bool {
        self.defined
    }

    /// Whether the node has been placed in a node graph
    pub fn is_instantiated(&self) -> bool {
        self.instantiated
    }

    /// Instance name within the node graph
    pub fn mtlx_name(&self) -> &str {
        &self.mtlx_name
    }

    /// MaterialX node category
    pub fn mtlx_node(&self) -> &str {
        &self.mtlx_node
    }

    /// Node definition name
    pub fn node_def_name(&self) -> &str {
        &self.node_def_name
    }

    /// Output type of the node definition and instance
    pub fn mtlx_type(&self) -> &MtlxType {
        &self.mtlx_type
    }

    /// Collected inputs
    pub fn inputs(&self) -> &[SocketEntry] {
        &self.inputs
    }

    /// Collected outputs
    pub fn outputs(&self) -> &[SocketEntry] {
        &self.outputs
    }

    /// Collected parameters
    pub fn params(&self) -> &[ParamEntry] {
        &self.params
    }

    fn is_shader(&self) -> bool {
        self.descriptor.is_shader()
    }

    /// Collect sockets and parameters of the host node and work out the
    /// output type.
    ///
    /// `mtlx_name` is the node's unique instance name in the document.
    pub fn setup(&mut self, node: &Node, mtlx_name: &str) {
        self.mtlx_name = mtlx_name.to_string();
        self.mtlx_node = match self.descriptor.mtlx_node {
            MtlxNodeName::Fixed(name) => name.to_string(),
            MtlxNodeName::FromLabel => names::camel_to_snake(&node.label),
        };
        self.position = node.position;
        self.inputs = node.inputs.iter().map(socket_entry).collect();
        self.outputs = node.outputs.iter().map(socket_entry).collect();
        self.params = self.collect_params(node);
        self.mtlx_type = self.infer_type();

        if self.state < AdapterState::SetupComplete {
            self.state = AdapterState::SetupComplete;
        }
        tracing::debug!(
            node = %self.mtlx_name,
            category = %self.mtlx_node,
            ty = %self.mtlx_type,
            "Adapter setup complete"
        );
    }

    fn collect_params(&self, node: &Node) -> Vec<ParamEntry> {
        let declared: Vec<&str> = match self.descriptor.params {
            ParamSource::Listed(names) => names.to_vec(),
            ParamSource::Declared => {
                let mut keys: Vec<&str> = node.parameters.keys().map(String::as_str).collect();
                keys.sort_unstable();
                keys
            }
        };

        let mut params = Vec::with_capacity(declared.len());
        for name in declared {
            let Some(value) = node.parameter(name) else {
                tracing::warn!(
                    node = %node.name,
                    param = name,
                    "Listed parameter absent on host node, not written"
                );
                continue;
            };
            if let Some(encoded) = codec::encode_param(name, value) {
                params.push(ParamEntry {
                    name: names::to_canonical(name),
                    ty: MtlxType::from_param(value),
                    value: encoded,
                });
            }
        }

        // Constant nodes keep their value on the output socket
        if !self.is_shader() {
            for output in self.outputs.iter().filter(|o| o.value.is_some()) {
                params.push(ParamEntry {
                    name: output.mtlx_name.clone(),
                    ty: output.ty.clone(),
                    value: output.value.clone().unwrap_or_default(),
                });
            }
        }
        params
    }

    fn infer_type(&self) -> MtlxType {
        match self.descriptor.kind {
            AdapterKind::Shader(ShaderFamily::Surface) => MtlxType::SurfaceShader,
            AdapterKind::Shader(ShaderFamily::Volume) => MtlxType::VolumeShader,
            AdapterKind::Texture => MtlxType::Color4,
            AdapterKind::Standard | AdapterKind::Curve => self
                .outputs
                .first()
                .map_or(MtlxType::SurfaceShader, |o| o.ty.clone()),
        }
    }

    fn instance_type(&self) -> MtlxType {
        if !self.is_shader() && self.outputs.len() > 1 {
            MtlxType::MultiOutput
        } else {
            self.mtlx_type.clone()
        }
    }

    /// Register this node's definition in the document, once.
    ///
    /// Returns true when a definition was added.
    pub fn create_node_def(&mut self, doc: &mut Document) -> bool {
        if self.state == AdapterState::Uninitialized {
            tracing::warn!(node_def = %self.node_def_name, "Defining an adapter before setup, skipped");
            return false;
        }
        if self.defined {
            return false;
        }
        if doc.node_def(&self.node_def_name).is_some() {
            self.mark_defined();
            return false;
        }

        let mut def = NodeDef::new(&self.node_def_name, &self.mtlx_node, self.mtlx_type.clone());
        def.target = Some(self.target.to_string());

        for input in &self.inputs {
            let mut element = ValueElement::new(&input.mtlx_name, input.ty.clone());
            element.value = input.value.clone();
            if let Err(e) = def.add_input(element) {
                tracing::warn!(node_def = %self.node_def_name, "Skipping input: {e}");
            }
        }

        // Shader nodes have a single implicit output
        if !self.is_shader() {
            if self.outputs.len() > 1 {
                def.ty = MtlxType::MultiOutput;
            }
            for output in &self.outputs {
                if let Err(e) = def.add_output(&output.mtlx_name, output.ty.clone()) {
                    tracing::warn!(node_def = %self.node_def_name, "Skipping output: {e}");
                }
            }
        }

        for param in &self.params {
            let element = ValueElement::new(&param.name, param.ty.clone()).with_value(param.value.clone());
            if let Err(e) = def.add_parameter(element) {
                tracing::warn!(node_def = %self.node_def_name, "Skipping parameter: {e}");
            }
        }

        if let Err(e) = doc.add_node_def(def) {
            tracing::warn!("Failed to add node definition: {e}");
            return false;
        }
        self.mark_defined();
        tracing::debug!(node_def = %self.node_def_name, "Node definition added");
        true
    }

    fn mark_defined(&mut self) {
        self.defined = true;
        if self.state < AdapterState::Defined {
            self.state = AdapterState::Defined;
        }
    }

    /// Place this node in the node graph, replacing a previous instance.
    ///
    /// Shader nodes also wire themselves to the graph outputs of the render
    /// channels they feed on the host's output node, named `terminal`.
    pub fn instantiate(
        &mut self,
        graph: &mut NodeGraph,
        links: &[Link],
        terminal: &str,
    ) -> Result<(), DocumentError> {
        if self.state == AdapterState::Uninitialized {
            tracing::warn!(node_def = %self.node_def_name, "Instantiating an adapter before setup, skipped");
            return Ok(());
        }

        tracing::info!(node = %self.mtlx_name, "Instantiating node");
        if graph.remove_node(&self.mtlx_name).is_some() {
            tracing::debug!(node = %self.mtlx_name, "Removed previous instance");
        }

        let instance_type = self.instance_type();
        let node = graph.add_node(&self.mtlx_node, &self.mtlx_name, instance_type)?;
        node.set_position(self.position);

        for input in &self.inputs {
            let mut element = ValueElement::new(&input.mtlx_name, input.ty.clone());
            element.value = input.value.clone();
            element.interface_name = Some(input.mtlx_name.clone());
            if let Err(e) = node.add_input(element) {
                tracing::warn!(node = %self.mtlx_name, "Skipping input: {e}");
            }
        }
        for param in &self.params {
            let element = ValueElement::new(&param.name, param.ty.clone()).with_value(param.value.clone());
            if let Err(e) = node.add_parameter(element) {
                tracing::warn!(node = %self.mtlx_name, "Skipping parameter: {e}");
            }
        }

        self.instantiated = true;
        self.state = AdapterState::Instantiated;

        if self.is_shader() {
            self.wire_channels(graph, links, terminal);
        }
        Ok(())
    }

    fn wire_channels(&self, graph: &mut NodeGraph, links: &[Link], terminal: &str) {
        let feeding = links
            .iter()
            .filter(|l| l.from_node == self.mtlx_name && l.to_node == terminal);

        for link in feeding {
            let Some(channel) = Channel::from_socket_name(&link.to_socket) else {
                continue;
            };
            match graph.output_mut(channel.graph_output()) {
                Some(output) => {
                    output.set_connected_node(&self.mtlx_name);
                    tracing::debug!(node = %self.mtlx_name, channel = channel.input_name(), "Wired render channel");
                }
                None => tracing::warn!(output = channel.graph_output(), "Node graph lacks render channel output"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::{cycles, prman};
    use ordoplay_shader_graph::{create_shader_registry, ParamValue, SocketValue};

    fn row(table: &'static [NodeDescriptor], type_id: &str) -> &'static NodeDescriptor {
        table.iter().find(|d| d.type_id == type_id).unwrap()
    }

    fn adapter_for(type_id: &str) -> (Node, NodeAdapter) {
        let catalog = create_shader_registry();
        let node = catalog.create_node(type_id).unwrap();
        let mut adapter = NodeAdapter::new(node.id, RendererTag::Cycles, cycles::TARGET, row(cycles::DESCRIPTORS, type_id));
        adapter.setup(&node, &names::to_canonical(&node.name));
        (node, adapter)
    }

    #[test]
    fn test_setup_collects_triples() {
        let (_, adapter) = adapter_for("ShaderNodeMixRGB");
        assert_eq!(adapter.state(), AdapterState::SetupComplete);
        assert_eq!(adapter.mtlx_name(), "mix");
        assert_eq!(adapter.mtlx_node(), "mix_rgb");
        assert_eq!(adapter.inputs().len(), 3);
        assert_eq!(adapter.inputs()[0].value.as_deref(), Some("0.5"));
        let names: Vec<_> = adapter.params().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["blend_type", "use_alpha", "use_clamp"]);
        assert_eq!(adapter.params()[1].ty, MtlxType::Boolean);
        assert_eq!(adapter.mtlx_type(), &MtlxType::Color4);
    }

    #[test]
    fn test_absent_listed_parameter_not_written() {
        let catalog = create_shader_registry();
        let mut node = catalog.create_node("ShaderNodeMixRGB").unwrap();
        node.parameters.shift_remove("use_alpha");
        let mut adapter = NodeAdapter::new(node.id, RendererTag::Cycles, cycles::TARGET, row(cycles::DESCRIPTORS, "ShaderNodeMixRGB"));
        adapter.setup(&node, "mix");
        let names: Vec<_> = adapter.params().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["blend_type", "use_clamp"]);
    }

    #[test]
    fn test_type_inference() {
        assert_eq!(adapter_for("ShaderNodeBsdfDiffuse").1.mtlx_type(), &MtlxType::SurfaceShader);
        assert_eq!(adapter_for("ShaderNodeVolumeScatter").1.mtlx_type(), &MtlxType::VolumeShader);
        assert_eq!(adapter_for("ShaderNodeTexChecker").1.mtlx_type(), &MtlxType::Color4);
        assert_eq!(adapter_for("ShaderNodeMath").1.mtlx_type(), &MtlxType::Float);
    }

    #[test]
    fn test_empty_image_skipped() {
        let (_, adapter) = adapter_for("ShaderNodeTexImage");
        assert!(adapter.params().iter().all(|p| p.name != "image"));
        assert!(adapter.params().iter().any(|p| p.name == "extension"));
    }

    #[test]
    fn test_image_written_as_filename() {
        let catalog = create_shader_registry();
        let mut node = catalog.create_node("ShaderNodeTexImage").unwrap();
        node.set_parameter("image", ParamValue::Image(Some("tex/brick.png".into())));
        let mut adapter = NodeAdapter::new(node.id, RendererTag::Cycles, cycles::TARGET, row(cycles::DESCRIPTORS, "ShaderNodeTexImage"));
        adapter.setup(&node, "image_texture");
        let image = adapter.params().iter().find(|p| p.name == "image").unwrap();
        assert_eq!(image.ty, MtlxType::Filename);
        assert_eq!(image.value, "tex/brick.png");
    }

    #[test]
    fn test_constant_output_value_travels_as_parameter() {
        let (node, adapter) = adapter_for("ShaderNodeRGB");
        assert_eq!(node.outputs[0].default_value, Some(SocketValue::Color([0.5, 0.5, 0.5, 1.0])));
        assert_eq!(adapter.params().len(), 1);
        assert_eq!(adapter.params()[0].value, "0.5, 0.5, 0.5, 1.0");
    }

    #[test]
    fn test_define_is_idempotent() {
        let mut doc = Document::new();
        let (_, mut first) = adapter_for("ShaderNodeBsdfDiffuse");
        let (_, mut second) = adapter_for("ShaderNodeBsdfDiffuse");

        assert!(first.create_node_def(&mut doc));
        assert!(!first.create_node_def(&mut doc));
        assert!(!second.create_node_def(&mut doc));
        assert!(second.is_defined());
        assert_eq!(doc.node_defs().count(), 1);

        let def = doc.node_def("shadernodebsdfdiffuse").unwrap();
        assert_eq!(def.target.as_deref(), Some("cycles"));
        assert_eq!(def.ty, MtlxType::SurfaceShader);
        assert_eq!(def.output_count(), 0);
    }

    #[test]
    fn test_multi_output_node_def() {
        let mut doc = Document::new();
        let (_, mut adapter) = adapter_for("ShaderNodeSeparateRGB");
        adapter.create_node_def(&mut doc);

        let def = doc.node_def("shadernodeseparatergb").unwrap();
        assert_eq!(def.ty, MtlxType::MultiOutput);
        let outputs: Vec<_> = def.outputs().map(|o| (o.name.as_str(), o.ty.clone())).collect();
        assert_eq!(
            outputs,
            [("r", MtlxType::Float), ("g", MtlxType::Float), ("b", MtlxType::Float)]
        );
    }

    #[test]
    fn test_define_before_setup_is_refused() {
        let mut doc = Document::new();
        let catalog = create_shader_registry();
        let node = catalog.create_node("ShaderNodeRGB").unwrap();
        let mut adapter = NodeAdapter::new(node.id, RendererTag::Cycles, cycles::TARGET, row(cycles::DESCRIPTORS, "ShaderNodeRGB"));
        assert!(!adapter.create_node_def(&mut doc));
        assert_eq!(adapter.state(), AdapterState::Uninitialized);
    }

    #[test]
    fn test_instantiate_twice_keeps_one_instance() {
        let mut doc = Document::new();
        let graph = doc.add_node_graph("ng_test").unwrap();
        let (_, mut adapter) = adapter_for("ShaderNodeMixRGB");

        adapter.instantiate(graph, &[], "material_output").unwrap();
        adapter.instantiate(graph, &[], "material_output").unwrap();
        assert_eq!(graph.node_count(), 1);

        let node = graph.node("mix").unwrap();
        assert_eq!(node.inputs().count(), 3);
        let fac = node.inputs().next().unwrap();
        assert_eq!(fac.interface_name.as_deref(), Some(fac.name.as_str()));
        assert_eq!(adapter.state(), AdapterState::Instantiated);
    }

    #[test]
    fn test_shader_wires_render_channel() {
        let mut doc = Document::new();
        let graph = doc.add_node_graph("ng_test").unwrap();
        graph.add_output("ng_surface_out", MtlxType::SurfaceShader).unwrap();
        let (_, mut adapter) = adapter_for("ShaderNodeBsdfDiffuse");

        let links = [Link {
            from_node: "diffuse_bsdf".into(),
            from_socket: "bsdf.004".into(),
            to_node: "material_output".into(),
            to_socket: "surface.003".into(),
        }];
        adapter.instantiate(graph, &links, "material_output").unwrap();
        assert_eq!(graph.output("ng_surface_out").unwrap().connected_node(), Some("diffuse_bsdf"));
    }

    #[test]
    fn test_labeled_category() {
        let catalog = create_shader_registry();
        let node = catalog.create_node("PxrCheckerPatternNode").unwrap();
        let mut adapter = NodeAdapter::new(node.id, RendererTag::Prman, prman::TARGET, row(prman::DESCRIPTORS, "PxrCheckerPatternNode"));
        adapter.setup(&node, "pxrchecker");
        assert_eq!(adapter.mtlx_node(), "pxr_checker");
        let names: Vec<_> = adapter.params().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["frequency", "mode"]);
        assert_eq!(adapter.mtlx_type(), &MtlxType::Color4);
        assert_eq!(adapter.instance_type(), MtlxType::MultiOutput);
    }
}
