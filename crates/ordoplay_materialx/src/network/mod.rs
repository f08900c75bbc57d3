// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph translator between a host material and a MaterialX document.
//!
//! A [`Network`] owns one document and the adapter arena for one material.
//! The write path is `init_network -> update_network -> write_network`; the
//! read path is `read_network`. Passes must not be interleaved on the same
//! network.

mod read;
mod write;

pub use read::{ReadReport, READ_MATERIAL_PREFIX};

use crate::adapter::NodeAdapter;
use crate::document::Document;
use crate::names;
use crate::session::Session;
use crate::types::MtlxType;
use ordoplay_shader_graph::RendererTag;

/// Node definition describing the render output contract
pub const MATERIAL_OUTPUT_DEF: &str = "material_output_def";
/// Node category of the render output contract
pub const MATERIAL_OUTPUT_NODE: &str = "material_output";
/// Shader reference binding a material to its node graph
pub const SHADER_REF_NAME: &str = "mtlx_output";
/// Prefix of the per-material node graph
pub const NODE_GRAPH_PREFIX: &str = "ng_";

/// Node graph name for a material
pub fn node_graph_name(material: &str) -> String {
    format!("{NODE_GRAPH_PREFIX}{}", names::to_canonical(material))
}

/// One host connection by document names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Upstream node name
    pub from_node: String,
    /// Upstream socket name
    pub from_socket: String,
    /// Downstream node name
    pub to_node: String,
    /// Downstream socket name
    pub to_socket: String,
}

/// Render output channel of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Surface shading
    Surface,
    /// Volume shading
    Volume,
    /// Displacement height
    Displacement,
}

impl Channel {
    /// All channels in terminal input order
    pub const ALL: [Channel; 3] = [Channel::Surface, Channel::Volume, Channel::Displacement];

    /// Input name on the output definition and bind input name
    pub fn input_name(self) -> &'static str {
        match self {
            Channel::Surface => "surface",
            Channel::Volume => "volume",
            Channel::Displacement => "displacement",
        }
    }

    /// Node graph output anchoring this channel
    pub fn graph_output(self) -> &'static str {
        match self {
            Channel::Surface => "ng_surface_out",
            Channel::Volume => "ng_volume_out",
            Channel::Displacement => "ng_disp_out",
        }
    }

    /// Type of the channel
    pub fn mtlx_type(self) -> MtlxType {
        match self {
            Channel::Surface => MtlxType::SurfaceShader,
            Channel::Volume => MtlxType::VolumeShader,
            Channel::Displacement => MtlxType::Float,
        }
    }

    /// Input index on the host output node
    pub fn terminal_input(self) -> usize {
        match self {
            Channel::Surface => 0,
            Channel::Volume => 1,
            Channel::Displacement => 2,
        }
    }

    /// Channel for a socket name of the host output node, either a display
    /// name (`Surface`) or a document name (`surface.012`)
    pub fn from_socket_name(name: &str) -> Option<Self> {
        let base = names::to_canonical(names::strip_suffix(name));
        Self::ALL.into_iter().find(|c| c.input_name() == base)
    }
}

/// Handle of an adapter in the network's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdapterHandle(usize);

impl AdapterHandle {
    /// Position in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// Pass state of a network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkState {
    /// No pass has run
    Empty,
    /// Document skeleton built and adapters resolved
    Initialized,
    /// Every adapter placed in the node graph
    Instantiated,
    /// Links wired
    Connected,
    /// Document written to disk
    Written,
    /// A read pass is rebuilding a host graph
    Reading,
    /// A read pass finished
    Reconstructed,
}

/// Why a link could not be wired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingEndpoint {
    /// The upstream node is not in the node graph
    Upstream,
    /// The downstream node is not in the node graph
    Downstream,
    /// The downstream node has no input of that name
    Input,
}

/// Outcome of wiring links
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectReport {
    /// Inputs wired to an upstream node
    pub connected: usize,
    /// Links left unwired
    pub missing: Vec<(Link, MissingEndpoint)>,
}

impl ConnectReport {
    /// Fold another report into this one
    pub fn merge(&mut self, other: ConnectReport) {
        self.connected += other.connected;
        self.missing.extend(other.missing);
    }

    /// Whether every link was wired
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Translator for one material
#[derive(Debug)]
pub struct Network<'s> {
    session: &'s Session,
    renderer: Option<RendererTag>,
    document: Document,
    adapters: Vec<NodeAdapter>,
    links: Vec<Link>,
    material_name: String,
    terminal_name: String,
    state: NetworkState,
}

impl<'s> Network<'s> {
    /// Create an empty network using the session's registries and render
    /// engine
    pub fn new(session: &'s Session) -> Self {
        Self {
            session,
            renderer: RendererTag::from_engine(session.render_engine()),
            document: Document::new(),
            adapters: Vec::new(),
            links: Vec::new(),
            material_name: String::new(),
            terminal_name: String::new(),
            state: NetworkState::Empty,
        }
    }

    /// Switch the render engine stamped on host nodes by the next write
    /// pass, e.g. `CYCLES` or `PRMAN_RENDER`
    pub fn set_render_engine(&mut self, engine: &str) {
        self.renderer = RendererTag::from_engine(engine);
    }

    /// Renderer tag stamped on host nodes, if the engine has one
    pub fn renderer(&self) -> Option<RendererTag> {
        self.renderer
    }

    /// Current pass state
    pub fn state(&self) -> NetworkState {
        self.state
    }

    /// Working document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Links collected by the last write pass
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Adapter by handle
    pub fn adapter(&self, handle: AdapterHandle) -> Option<&NodeAdapter> {
        self.adapters.get(handle.0)
    }

    /// Handles of all resolved adapters, in host node order
    pub fn handles(&self) -> impl Iterator<Item = AdapterHandle> {
        (0..self.adapters.len()).map(AdapterHandle)
    }

    /// Handle of the adapter with this instance name
    pub fn handle_for(&self, mtlx_name: &str) -> Option<AdapterHandle> {
        self.adapters
            .iter()
            .position(|a| a.mtlx_name() == mtlx_name)
            .map(AdapterHandle)
    }

    /// Name of the per-material node graph
    pub fn node_graph_name(&self) -> String {
        node_graph_name(&self.material_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_from_socket_name() {
        assert_eq!(Channel::from_socket_name("Surface"), Some(Channel::Surface));
        assert_eq!(Channel::from_socket_name("volume.002"), Some(Channel::Volume));
        assert_eq!(Channel::from_socket_name("displacement.001"), Some(Channel::Displacement));
        assert_eq!(Channel::from_socket_name("color.004"), None);
    }

    #[test]
    fn test_node_graph_name() {
        assert_eq!(node_graph_name("Brick Wall"), "ng_brick_wall");
    }

    #[test]
    fn test_report_merge() {
        let mut report = ConnectReport { connected: 1, missing: Vec::new() };
        let link = Link {
            from_node: "rgb".into(),
            from_socket: "color.001".into(),
            to_node: "diffuse_bsdf".into(),
            to_socket: "color.002".into(),
        };
        report.merge(ConnectReport {
            connected: 2,
            missing: vec![(link, MissingEndpoint::Upstream)],
        });
        assert_eq!(report.connected, 3);
        assert!(!report.is_complete());
    }
}
