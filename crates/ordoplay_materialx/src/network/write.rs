// SPDX-License-Identifier: MIT OR Apache-2.0
//! Write path: host material to MaterialX document.

use super::{
    AdapterHandle, Channel, ConnectReport, Link, MissingEndpoint, Network, NetworkState,
    MATERIAL_OUTPUT_DEF, MATERIAL_OUTPUT_NODE, SHADER_REF_NAME,
};
use crate::document::{NodeDef, ValueElement};
use crate::error::{self, NetworkError};
use crate::names;
use crate::types::MtlxType;
use ordoplay_shader_graph::{Material, NodeId};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Node definition of the three render channels
fn output_node_def() -> error::Result<NodeDef> {
    let mut def = NodeDef::new(MATERIAL_OUTPUT_DEF, MATERIAL_OUTPUT_NODE, MtlxType::SurfaceShader);
    for channel in Channel::ALL {
        def.add_input(ValueElement::new(channel.input_name(), channel.mtlx_type()))?;
    }
    Ok(def)
}

/// Instance name for every host node, bumped with a numeric suffix where
/// two nodes share a name
fn unique_node_names(material: &Material) -> HashMap<NodeId, String> {
    let mut taken = HashSet::new();
    let mut assigned = HashMap::with_capacity(material.graph.node_count());
    for node in material.graph.nodes() {
        let mut name = names::to_canonical(&node.name);
        while !taken.insert(name.clone()) {
            name = names::increment(&name);
        }
        assigned.insert(node.id, name);
    }
    assigned
}

/// Give every socket a document-wide unique name.
///
/// A counter starting at the total socket count is decremented per socket,
/// visiting nodes in order and each node's inputs before its outputs.
fn assign_socket_names(material: &mut Material) {
    for node in material.graph.nodes_mut() {
        for socket in node.sockets_mut() {
            socket.mtlx_name.clear();
        }
    }

    let mut counter = material.graph.socket_count() as u64;
    for node in material.graph.nodes_mut() {
        for socket in node.sockets_mut() {
            socket.mtlx_name = format!(
                "{}{}{}",
                names::to_canonical(&socket.name),
                names::SUFFIX_SEPARATOR,
                names::pad_index(counter)
            );
            counter = counter.saturating_sub(1);
        }
    }
}

fn collect_links(material: &Material, node_names: &HashMap<NodeId, String>) -> Vec<Link> {
    let graph = &material.graph;
    let mut links = Vec::with_capacity(graph.connection_count());

    for connection in graph.connections() {
        if !connection.is_valid {
            tracing::debug!(material = %material.name, "Skipping invalid connection");
            continue;
        }
        let endpoints = graph.node(connection.from_node).zip(graph.node(connection.to_node));
        let Some((from, to)) = endpoints else {
            tracing::warn!(material = %material.name, "Connection references a missing node");
            continue;
        };
        let sockets = from.socket(&connection.from_socket).zip(to.socket(&connection.to_socket));
        let Some((from_socket, to_socket)) = sockets else {
            tracing::warn!(from = %from.name, to = %to.name, "Connection references a missing socket");
            continue;
        };
        let instance_names = node_names.get(&from.id).zip(node_names.get(&to.id));
        let Some((from_name, to_name)) = instance_names else {
            continue;
        };

        links.push(Link {
            from_node: from_name.clone(),
            from_socket: from_socket.mtlx_name.clone(),
            to_node: to_name.clone(),
            to_socket: to_socket.mtlx_name.clone(),
        });
    }
    links
}

impl<'s> Network<'s> {
    /// Rebuild the document skeleton for a material and resolve adapters.
    ///
    /// Stamps the render engine's tag on every host node and renames every
    /// socket, so the material is taken mutably.
    pub fn init_network(&mut self, material: &mut Material) -> Result<(), NetworkError> {
        tracing::info!(material = %material.name, "Initializing network");

        self.document.initialize();
        self.document.version = self.session.materialx_version().to_string();
        self.adapters.clear();
        self.links.clear();
        self.material_name = material.name.clone();
        self.state = NetworkState::Empty;

        self.stamp_renderer(material);

        let terminal = material
            .graph
            .active_output()
            .ok_or_else(|| NetworkError::NoActiveOutput(material.name.clone()))?;
        let (terminal_id, terminal_position) = (terminal.id, terminal.position);

        let node_names = unique_node_names(material);
        self.terminal_name = node_names.get(&terminal_id).cloned().unwrap_or_default();
        assign_socket_names(material);
        self.links = collect_links(material, &node_names);

        let multi_output: HashSet<&str> = material
            .graph
            .nodes()
            .filter(|n| n.outputs.len() > 1)
            .filter_map(|n| node_names.get(&n.id).map(String::as_str))
            .collect();

        self.document.add_node_def(output_node_def()?)?;

        let graph_name = self.node_graph_name();
        let graph = self.document.add_node_graph(&graph_name)?;
        graph.node_def = Some(MATERIAL_OUTPUT_DEF.to_string());
        for channel in Channel::ALL {
            graph.add_output(channel.graph_output(), channel.mtlx_type())?;
        }

        // Pre-wire the channels from the output node's own links
        for link in self.links.iter().filter(|l| l.to_node == self.terminal_name) {
            let Some(channel) = Channel::from_socket_name(&link.to_socket) else {
                continue;
            };
            if let Some(output) = graph.output_mut(channel.graph_output()) {
                output.set_connected_node(&link.from_node);
                if multi_output.contains(link.from_node.as_str()) {
                    output.output = Some(link.from_socket.clone());
                }
            }
        }

        let shader_ref = self
            .document
            .add_material(&material.name)?
            .add_shader_ref(SHADER_REF_NAME, MATERIAL_OUTPUT_DEF)?;
        shader_ref.set_position(terminal_position);
        for channel in Channel::ALL {
            shader_ref
                .add_bind_input(channel.input_name(), channel.mtlx_type())?
                .set_connected_output(&graph_name, channel.graph_output());
        }

        let registry = self.session.registry();
        for node in material.graph.nodes() {
            let Some(mut adapter) = registry.resolve(node) else {
                continue;
            };
            let Some(name) = node_names.get(&node.id) else {
                continue;
            };
            adapter.setup(node, name);
            adapter.create_node_def(&mut self.document);
            self.adapters.push(adapter);
        }

        tracing::info!(
            material = %material.name,
            adapters = self.adapters.len(),
            links = self.links.len(),
            "Network initialized"
        );
        self.state = NetworkState::Initialized;
        Ok(())
    }

    fn stamp_renderer(&self, material: &mut Material) {
        match self.renderer {
            Some(tag) => {
                for node in material.graph.nodes_mut() {
                    node.renderer = Some(tag);
                }
            }
            None => tracing::debug!(
                engine = self.session.render_engine(),
                "Render engine has no node vocabulary, keeping node tags"
            ),
        }
    }

    /// Rebuild the document and fill the node graph.
    ///
    /// Every adapter is instantiated before any link is wired.
    pub fn update_network(&mut self, material: &mut Material) -> Result<ConnectReport, NetworkError> {
        self.init_network(material)?;

        let handles: Vec<_> = self.handles().collect();
        for &handle in &handles {
            self.instantiate(handle)?;
        }
        self.state = NetworkState::Instantiated;

        let mut report = ConnectReport::default();
        for &handle in &handles {
            report.merge(self.connect_nodes(handle));
        }
        self.state = NetworkState::Connected;

        tracing::info!(
            material = %material.name,
            connected = report.connected,
            missing = report.missing.len(),
            "Network updated"
        );
        Ok(report)
    }

    /// Place one adapter's node in the node graph
    pub fn instantiate(&mut self, handle: AdapterHandle) -> Result<(), NetworkError> {
        let graph_name = self.node_graph_name();
        let graph = self
            .document
            .node_graph_mut(&graph_name)
            .ok_or(NetworkError::NotInitialized)?;
        let Some(adapter) = self.adapters.get_mut(handle.index()) else {
            tracing::warn!(handle = handle.index(), "Unknown adapter handle");
            return Ok(());
        };
        adapter.instantiate(graph, &self.links, &self.terminal_name)?;
        Ok(())
    }

    /// Wire the inputs of one adapter's node to their upstream nodes.
    ///
    /// Links whose endpoints are not in the node graph yet are reported,
    /// not wired.
    pub fn connect_nodes(&mut self, handle: AdapterHandle) -> ConnectReport {
        let mut report = ConnectReport::default();
        let graph_name = self.node_graph_name();
        let Some(adapter) = self.adapters.get(handle.index()) else {
            tracing::warn!(handle = handle.index(), "Unknown adapter handle");
            return report;
        };
        let Some(graph) = self.document.node_graph_mut(&graph_name) else {
            tracing::warn!(graph = %graph_name, "Connecting before the network is initialized");
            return report;
        };

        for link in self.links.iter().filter(|l| l.to_node == adapter.mtlx_name()) {
            let upstream_multi = match graph.node(&link.from_node) {
                Some(upstream) => upstream.ty == MtlxType::MultiOutput,
                None => {
                    report.missing.push((link.clone(), MissingEndpoint::Upstream));
                    continue;
                }
            };
            let Some(node) = graph.node_mut(&link.to_node) else {
                report.missing.push((link.clone(), MissingEndpoint::Downstream));
                continue;
            };
            let Some(input) = node.input_mut(&link.to_socket) else {
                report.missing.push((link.clone(), MissingEndpoint::Input));
                continue;
            };

            input.set_connected_node(&link.from_node);
            input.output = upstream_multi.then(|| link.from_socket.clone());
            report.connected += 1;
        }

        for (link, endpoint) in &report.missing {
            tracing::warn!(
                from = %link.from_node,
                to = %link.to_node,
                socket = %link.to_socket,
                ?endpoint,
                "Link endpoint not in node graph; instantiate every node before connecting"
            );
        }
        report
    }

    /// Write the finished document
    pub fn write_network(&mut self, path: &Path) -> Result<(), NetworkError> {
        if self.state == NetworkState::Empty {
            return Err(NetworkError::NotInitialized);
        }
        self.document.write_to_file(path)?;
        self.state = NetworkState::Written;
        tracing::info!(material = %self.material_name, path = %path.display(), "MaterialX document written");
        Ok(())
    }

    /// Run a full write pass to the material's configured write path
    pub fn export(&mut self, material: &mut Material) -> Result<ConnectReport, NetworkError> {
        if material.mtlx_props.write_path.is_empty() {
            return Err(NetworkError::MissingPath {
                material: material.name.clone(),
                which: "write",
            });
        }
        let report = self.update_network(material)?;
        let path = material.mtlx_props.write_path.clone();
        self.write_network(Path::new(&path))?;
        Ok(report)
    }
}
