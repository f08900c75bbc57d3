// SPDX-License-Identifier: MIT OR Apache-2.0
//! Session context shared by every network of a host session.
//!
//! Holds the adapter registry, the host node catalog and the standard
//! library document, all built once and read-only afterwards.

use crate::document::Document;
use crate::error::Result;
use crate::network::Network;
use crate::registry::AdapterRegistry;
use crate::settings::BridgeSettings;
use ordoplay_shader_graph::{create_shader_registry, NodeRegistry};
use std::path::Path;

/// Bundled standard library definitions
const BUNDLED_STDLIB: &str = include_str!("../libraries/stdlib_defs.mtlx");

/// Registries and reference documents of one host session
#[derive(Debug)]
pub struct Session {
    registry: AdapterRegistry,
    catalog: NodeRegistry,
    stdlib: Document,
    render_engine: String,
    materialx_version: String,
}

impl Session {
    /// Session with default settings and the bundled standard library
    pub fn new() -> Result<Self> {
        Self::with_settings(&BridgeSettings::default())
    }

    /// Session configured from settings
    pub fn with_settings(settings: &BridgeSettings) -> Result<Self> {
        let stdlib = match &settings.stdlib_path {
            Some(path) => Self::load_stdlib(path)?,
            None => Document::from_xml_str(BUNDLED_STDLIB)?,
        };
        tracing::debug!(node_defs = stdlib.node_defs().count(), "Standard library loaded");

        Ok(Self {
            registry: AdapterRegistry::with_builtin(),
            catalog: create_shader_registry(),
            stdlib,
            render_engine: settings.render_engine.clone(),
            materialx_version: settings.materialx_version.clone(),
        })
    }

    fn load_stdlib(path: &Path) -> Result<Document> {
        tracing::info!(path = %path.display(), "Loading standard library");
        Document::read_from_file(path)
    }

    /// Adapter registry
    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Host node catalog
    pub fn catalog(&self) -> &NodeRegistry {
        &self.catalog
    }

    /// Standard library document
    pub fn stdlib(&self) -> &Document {
        &self.stdlib
    }

    /// Host render engine written passes stamp on nodes
    pub fn render_engine(&self) -> &str {
        &self.render_engine
    }

    /// Document version written by networks
    pub fn materialx_version(&self) -> &str {
        &self.materialx_version
    }

    /// New network bound to this session
    pub fn network(&self) -> Network<'_> {
        Network::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_stdlib_parses() {
        let session = Session::new().unwrap();
        assert!(session.stdlib().node_defs().count() > 0);
        assert!(!session.stdlib().matching_node_defs("diffuse_bsdf").is_empty());
        assert_eq!(session.render_engine(), "CYCLES");
    }

    #[test]
    fn test_stdlib_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stdlib.mtlx");
        std::fs::write(
            &path,
            r#"<materialx version="1.36"><nodedef name="ND_rgb" node="rgb" type="color4" /></materialx>"#,
        )
        .unwrap();

        let settings = BridgeSettings {
            stdlib_path: Some(path),
            ..BridgeSettings::default()
        };
        let session = Session::with_settings(&settings).unwrap();
        assert_eq!(session.stdlib().node_defs().count(), 1);
    }

    #[test]
    fn test_missing_stdlib_is_an_error() {
        let settings = BridgeSettings {
            stdlib_path: Some("does/not/exist.mtlx".into()),
            ..BridgeSettings::default()
        };
        assert!(Session::with_settings(&settings).is_err());
    }
}
