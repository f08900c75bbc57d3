// SPDX-License-Identifier: MIT OR Apache-2.0
//! MaterialX exchange for `OrdoPlay` shader graphs.
//!
//! Translates host materials to MaterialX documents and back:
//! - A document object model with XML read/write
//! - Name and value codecs shared by both directions
//! - Per-renderer adapter tables describing how host nodes map to node
//!   definitions
//! - A [`Network`] running the write and read passes
//!
//! ## Usage
//!
//! ```no_run
//! use ordoplay_materialx::Session;
//! use ordoplay_shader_graph::{create_shader_registry, Material};
//!
//! let session = Session::new()?;
//! let mut material = Material::with_output("Brick", &create_shader_registry());
//! material.mtlx_props.write_path = "brick.mtlx".into();
//!
//! let mut network = session.network();
//! let report = network.export(&mut material)?;
//! assert!(report.is_complete());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod adapter;
pub mod codec;
pub mod descriptors;
pub mod document;
pub mod error;
pub mod names;
pub mod network;
pub mod registry;
pub mod session;
pub mod settings;
pub mod types;

pub use adapter::{AdapterState, NodeAdapter};
pub use document::Document;
pub use error::{CodecError, DocumentError, NetworkError};
pub use network::{AdapterHandle, Channel, ConnectReport, Link, Network, NetworkState, ReadReport};
pub use registry::AdapterRegistry;
pub use session::Session;
pub use settings::BridgeSettings;
pub use types::MtlxType;
