// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader node graph model for `OrdoPlay` materials.
//!
//! This crate provides the host side of material authoring:
//! - Nodes with typed input/output sockets and parameters
//! - Connection validation
//! - A catalog of shader node types
//! - Materials and a serializable material library
//!
//! ## Architecture
//!
//! Nodes are created from [`NodeType`] templates held in a [`NodeRegistry`].
//! A [`Graph`] owns nodes and the connections between their sockets, and a
//! [`Material`] pairs a graph with the MaterialX file paths it is exchanged
//! through.

pub mod node;
pub mod socket;
pub mod param;
pub mod renderer;
pub mod connection;
pub mod graph;
pub mod catalog;
pub mod material;

pub use node::{Node, NodeCategory, NodeId, NodeRegistry, NodeType};
pub use socket::{Socket, SocketDirection, SocketId, SocketKind, SocketValue};
pub use param::{CurveChannel, CurveMapping, ParamValue};
pub use renderer::RendererTag;
pub use connection::{Connection, ConnectionId};
pub use graph::{ConnectionError, Graph};
pub use catalog::{create_shader_registry, TERMINAL_NODE_TYPE};
pub use material::{GraphError, Material, MaterialLibrary, MaterialPaths};
