// SPDX-License-Identifier: MIT OR Apache-2.0
//! Read path: MaterialX document to host material.

use super::{Channel, Network, NetworkState};
use crate::codec;
use crate::document::{Document, Node as MtlxNode, NodeDef, NodeGraph, ValueElement};
use crate::error::NetworkError;
use crate::names;
use crate::session::Session;
use ordoplay_shader_graph::{
    Graph, MaterialLibrary, Node, NodeId, RendererTag, Socket, TERMINAL_NODE_TYPE,
};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Prefix of the host material a read pass fills
pub const READ_MATERIAL_PREFIX: &str = "mtlx_";

/// Outcome of a read pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadReport {
    /// Host material that was rebuilt
    pub material: String,
    /// Host nodes created, the output node excluded
    pub nodes_created: usize,
    /// Host links created
    pub links_created: usize,
    /// Elements left out, as `node` or `node.element`
    pub skipped: Vec<String>,
}

/// Bound channels of one shader reference
struct ChannelBinding {
    channel: Channel,
    node_graph: String,
    output: String,
}

/// Value declarations of one node: the definition's when there is one,
/// else the instance's own
fn declared<'a>(
    def: Option<&'a NodeDef>,
    instance: &'a MtlxNode,
) -> (Vec<&'a ValueElement>, Vec<&'a ValueElement>) {
    match def {
        Some(def) => (def.inputs().collect(), def.parameters().collect()),
        None => (instance.inputs().collect(), instance.parameters().collect()),
    }
}

fn same_base(element: &ValueElement, base: &str) -> bool {
    names::strip_suffix(&element.name) == base
}

/// Instance value for a declaration, matched by position first and by
/// suffix-stripped name second
fn instance_value<'a>(elements: &[&'a ValueElement], index: usize, base: &str) -> Option<&'a str> {
    elements
        .get(index)
        .copied()
        .filter(|e| same_base(e, base))
        .or_else(|| elements.iter().copied().find(|e| same_base(e, base)))
        .and_then(|e| e.value.as_deref())
}

/// Host socket for a document socket base name, preferring the one at
/// `index`
fn host_socket_index(sockets: &[Socket], index: usize, base: &str) -> Option<usize> {
    let matches = |socket: &Socket| names::to_canonical(&socket.name) == base;
    if sockets.get(index).is_some_and(matches) {
        return Some(index);
    }
    sockets.iter().position(matches)
}

fn apply_values(node: &mut Node, def: Option<&NodeDef>, instance: &MtlxNode, skipped: &mut Vec<String>) {
    let (inputs, parameters) = declared(def, instance);
    let instance_inputs: Vec<_> = instance.inputs().collect();
    let instance_params: Vec<_> = instance.parameters().collect();

    for (index, decl) in inputs.iter().enumerate() {
        let base = names::strip_suffix(&decl.name);
        let Some(value) = instance_value(&instance_inputs, index, base).or(decl.value.as_deref()) else {
            continue;
        };
        let Some(slot) = host_socket_index(&node.inputs, index, base) else {
            tracing::warn!(node = %node.name, socket = %decl.name, "Socket absent on host node, value skipped");
            skipped.push(format!("{}.{}", node.name, decl.name));
            continue;
        };
        if let Err(e) = codec::apply_socket_value(&mut node.inputs[slot], value) {
            tracing::warn!(node = %node.name, socket = %decl.name, "Bad input value: {e}");
        }
    }

    for decl in parameters {
        let base = names::strip_suffix(&decl.name);
        let own = instance_params
            .iter()
            .find(|e| e.name == decl.name)
            .or_else(|| instance_params.iter().find(|e| same_base(e, base)))
            .and_then(|e| e.value.as_deref());
        let Some(value) = own.or(decl.value.as_deref()) else {
            continue;
        };

        let param = node
            .parameters
            .iter_mut()
            .find(|(key, _)| names::to_canonical(key) == base);
        if let Some((key, param)) = param {
            if let Err(e) = codec::apply_param_value(key, param, value) {
                tracing::warn!(node = %node.name, param = %key, "Bad parameter value: {e}");
            }
            continue;
        }

        // Constant nodes carry their output value as a parameter
        if let Some(slot) = host_socket_index(&node.outputs, usize::MAX, base) {
            if let Err(e) = codec::apply_socket_value(&mut node.outputs[slot], value) {
                tracing::warn!(node = %node.name, socket = %decl.name, "Bad output value: {e}");
            }
            continue;
        }

        tracing::warn!(node = %node.name, param = %decl.name, "Parameter absent on host node, skipped");
        skipped.push(format!("{}.{}", node.name, decl.name));
    }
}

/// Host graph builder for one read pass
struct Reader<'a> {
    session: &'a Session,
    document: &'a Document,
    graph: &'a mut Graph,
    created: HashMap<(String, String), NodeId>,
    failed: HashSet<(String, String)>,
    linked: HashSet<(NodeId, usize)>,
    report: ReadReport,
}

impl<'a> Reader<'a> {
    /// Host type for a document node: through the working document's
    /// definitions, else through the standard library by category
    fn resolve_type(&self, element: &MtlxNode) -> Option<(RendererTag, &'static str, Option<&'a NodeDef>)> {
        let registry = self.session.registry();
        for def in self.document.matching_node_defs(&element.category) {
            let hint = def
                .target
                .as_deref()
                .and_then(|target| registry.renderer_for_target(target));
            if let Some((renderer, type_id)) = registry.class_name_for(&def.name, hint) {
                return Some((renderer, type_id, Some(def)));
            }
        }

        let (renderer, type_id) = registry.class_for_category(&element.category, None)?;
        let def = self
            .session
            .stdlib()
            .matching_node_defs(&element.category)
            .into_iter()
            .next();
        tracing::debug!(
            node = %element.name,
            category = %element.category,
            found = def.is_some(),
            "Falling back to the standard library"
        );
        Some((renderer, type_id, def))
    }

    /// Host node for a document node, created on first use
    fn ensure_node(&mut self, node_graph: &NodeGraph, name: &str) -> Option<NodeId> {
        let key = (node_graph.name.clone(), name.to_string());
        if let Some(id) = self.created.get(&key) {
            return Some(*id);
        }
        if self.failed.contains(&key) {
            return None;
        }

        let node = self.build_node(node_graph, name);
        match node {
            Some(node) => {
                tracing::debug!(node = %node.name, node_type = %node.node_type, "Created host node");
                let id = self.graph.add_node(node);
                self.created.insert(key, id);
                self.report.nodes_created += 1;
                Some(id)
            }
            None => {
                self.report.skipped.push(name.to_string());
                self.failed.insert(key);
                None
            }
        }
    }

    fn build_node(&mut self, node_graph: &NodeGraph, name: &str) -> Option<Node> {
        let Some(element) = node_graph.node(name) else {
            tracing::warn!(node = name, graph = %node_graph.name, "Node not in node graph");
            return None;
        };
        let Some((renderer, type_id, def)) = self.resolve_type(element) else {
            tracing::warn!(node = name, category = %element.category, "No adapter for node category, skipped");
            return None;
        };
        let Some(mut node) = self.session.catalog().create_node(type_id) else {
            tracing::warn!(node = name, node_type = type_id, "Host catalog lacks node type, skipped");
            return None;
        };

        node.name = names::from_canonical(name);
        node.renderer = Some(renderer);
        if let Some(position) = element.position() {
            node.position = position;
        }
        apply_values(&mut node, def, element, &mut self.report.skipped);
        Some(node)
    }

    fn output_index(&self, node: NodeId, output: Option<&str>) -> usize {
        let Some(output) = output else {
            return 0;
        };
        let base = names::strip_suffix(output);
        self.graph
            .node(node)
            .and_then(|n| host_socket_index(&n.outputs, usize::MAX, base))
            .unwrap_or(0)
    }

    fn input_index(&self, node: NodeId, index: usize, input: &str) -> usize {
        let base = names::strip_suffix(input);
        self.graph
            .node(node)
            .and_then(|n| host_socket_index(&n.inputs, index, base))
            .unwrap_or(index)
    }

    fn link(&mut self, from: NodeId, from_index: usize, to: NodeId, to_index: usize) {
        if !self.linked.insert((to, to_index)) {
            return;
        }
        match self.graph.connect_by_index(from, from_index, to, to_index) {
            Ok(_) => self.report.links_created += 1,
            Err(e) => {
                let to_name = self.graph.node(to).map(|n| n.name.clone()).unwrap_or_default();
                tracing::warn!(node = %to_name, input = to_index, "Link skipped: {e}");
                self.report.skipped.push(format!("{to_name}.{to_index}"));
            }
        }
    }

    /// Build the host nodes feeding one channel
    fn read_channel(&mut self, binding: &ChannelBinding, terminal: NodeId) {
        let document = self.document;
        let Some(node_graph) = document.node_graph(&binding.node_graph) else {
            tracing::warn!(graph = %binding.node_graph, "Bound node graph not in document");
            self.report.skipped.push(binding.node_graph.clone());
            return;
        };
        let Some(output) = node_graph.output(&binding.output) else {
            tracing::warn!(graph = %node_graph.name, output = %binding.output, "Bound output not in node graph");
            return;
        };
        let Some(start) = output.connected_node() else {
            tracing::debug!(channel = binding.channel.input_name(), "Channel unbound");
            return;
        };

        let Some(start_id) = self.ensure_node(node_graph, start) else {
            return;
        };
        let from_index = self.output_index(start_id, output.output.as_deref());
        self.link(start_id, from_index, terminal, binding.channel.terminal_input());

        for edge in node_graph.traverse_upstream(start) {
            let Some(upstream) = self.ensure_node(node_graph, &edge.upstream) else {
                continue;
            };
            let Some(downstream) = self.ensure_node(node_graph, &edge.downstream) else {
                continue;
            };
            let from_index = self.output_index(upstream, edge.upstream_output.as_deref());
            let to_index = self.input_index(downstream, edge.input_index, &edge.connecting_input);
            self.link(upstream, from_index, downstream, to_index);
        }
    }
}

impl<'s> Network<'s> {
    /// Rebuild a host material from the document at a material's read
    /// path.
    ///
    /// The result goes to the material `mtlx_<source>`, created if absent
    /// and cleared down to its output node otherwise.
    pub fn read_network(&mut self, library: &mut MaterialLibrary, source: &str) -> Result<ReadReport, NetworkError> {
        let material = library
            .get(source)
            .ok_or_else(|| NetworkError::MaterialNotFound(source.to_string()))?;
        let path = material.mtlx_props.read_path.clone();
        if path.is_empty() {
            return Err(NetworkError::MissingPath {
                material: source.to_string(),
                which: "read",
            });
        }

        tracing::info!(material = source, path = %path, "Reading MaterialX document");
        let document = Document::read_from_file(Path::new(&path))?;
        let report = self.read_document(document, library, source)?;
        if let Some(target) = library.get_mut(&report.material) {
            target.mtlx_props.read_path = path;
        }
        Ok(report)
    }

    /// Rebuild a host material from an already parsed document.
    ///
    /// `source` names the document material; a document holding a single
    /// material of another name is accepted.
    pub fn read_document(
        &mut self,
        document: Document,
        library: &mut MaterialLibrary,
        source: &str,
    ) -> Result<ReadReport, NetworkError> {
        self.state = NetworkState::Reading;
        self.adapters.clear();
        self.links.clear();
        self.document = document;
        self.material_name = source.to_string();

        let doc_material = match self.document.material(source) {
            Some(material) => material,
            None => {
                let mut materials = self.document.materials();
                match (materials.next(), materials.next()) {
                    (Some(only), None) => {
                        tracing::info!(expected = source, found = %only.name, "Reading the document's only material");
                        only
                    }
                    _ => return Err(NetworkError::MaterialNotInDocument(source.to_string())),
                }
            }
        };

        // Shader reference positions and channel bindings
        let shader_refs: Vec<(Option<[f32; 2]>, Vec<ChannelBinding>)> = doc_material
            .shader_refs()
            .map(|shader_ref| {
                let bindings = Channel::ALL
                    .into_iter()
                    .filter_map(|channel| {
                        let bind = shader_ref.bind_input(channel.input_name())?;
                        Some(ChannelBinding {
                            channel,
                            node_graph: bind.node_graph.clone()?,
                            output: bind
                                .output
                                .clone()
                                .unwrap_or_else(|| channel.graph_output().to_string()),
                        })
                    })
                    .collect();
                (shader_ref.position(), bindings)
            })
            .collect();

        let target_name = format!("{READ_MATERIAL_PREFIX}{source}");
        let target = library.get_or_create(&target_name);
        if !target.reset_to_output(self.session.catalog()) {
            return Err(NetworkError::MissingTerminalType(TERMINAL_NODE_TYPE));
        }
        let terminal = target
            .graph
            .active_output()
            .map(|n| n.id)
            .ok_or_else(|| NetworkError::NoActiveOutput(target_name.clone()))?;

        let mut reader = Reader {
            session: self.session,
            document: &self.document,
            graph: &mut target.graph,
            created: HashMap::new(),
            failed: HashSet::new(),
            linked: HashSet::new(),
            report: ReadReport {
                material: target_name.clone(),
                ..ReadReport::default()
            },
        };

        for (position, bindings) in &shader_refs {
            if let Some(position) = position {
                if let Some(node) = reader.graph.node_mut(terminal) {
                    node.position = *position;
                }
            }
            for binding in bindings {
                reader.read_channel(binding, terminal);
            }
        }

        let report = reader.report;
        self.state = NetworkState::Reconstructed;
        tracing::info!(
            material = %report.material,
            nodes = report.nodes_created,
            links = report.links_created,
            skipped = report.skipped.len(),
            "Host material rebuilt"
        );
        Ok(report)
    }
}
