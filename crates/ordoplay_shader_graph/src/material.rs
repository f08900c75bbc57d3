// SPDX-License-Identifier: MIT OR Apache-2.0
//! Materials and the material library of a host scene.

use crate::catalog::TERMINAL_NODE_TYPE;
use crate::graph::Graph;
use crate::node::NodeRegistry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current scene file format version
pub const SCENE_FORMAT_VERSION: u32 = 1;

/// Errors raised by scene IO
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Reading or writing the scene file failed
    #[error("Scene IO failed: {0}")]
    Io(#[from] std::io::Error),

    /// The scene file is not valid RON
    #[error("Scene parse failed: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serializing the scene failed
    #[error("Scene serialization failed: {0}")]
    Serialize(#[from] ron::Error),

    /// The scene was written by a newer version
    #[error("Scene version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Highest supported version
        supported: u32,
    },
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// MaterialX file locations associated with a material
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialPaths {
    /// Where a write pass stores the document
    pub write_path: String,
    /// Where a read pass loads the document from
    pub read_path: String,
}

/// A host material: a name and its shader node graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Material name, unique within the library
    pub name: String,
    /// Shader node tree
    pub graph: Graph,
    /// MaterialX file locations
    #[serde(default)]
    pub mtlx_props: MaterialPaths,
}

impl Material {
    /// Create a material with an empty node tree
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            graph: Graph::new(name.clone()),
            name,
            mtlx_props: MaterialPaths::default(),
        }
    }

    /// Create a material whose tree holds only the material output node
    pub fn with_output(name: impl Into<String>, catalog: &NodeRegistry) -> Self {
        let mut material = Self::new(name);
        material.reset_to_output(catalog);
        material
    }

    /// Clear the node tree down to a single material output node.
    ///
    /// Returns false when the catalog has no output node type.
    pub fn reset_to_output(&mut self, catalog: &NodeRegistry) -> bool {
        self.graph.clear();
        match catalog.create_node(TERMINAL_NODE_TYPE) {
            Some(mut terminal) => {
                terminal.is_active_output = true;
                self.graph.add_node(terminal);
                true
            }
            None => false,
        }
    }
}

/// All materials of a host scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialLibrary {
    /// Scene format version
    pub version: u32,
    materials: IndexMap<String, Material>,
}

impl MaterialLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self {
            version: SCENE_FORMAT_VERSION,
            materials: IndexMap::new(),
        }
    }

    /// Insert a material, replacing one with the same name
    pub fn insert(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    /// Get a material by name
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    /// Get a mutable material by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Material> {
        self.materials.get_mut(name)
    }

    /// Get a material by name, creating an empty one if absent
    pub fn get_or_create(&mut self, name: &str) -> &mut Material {
        self.materials
            .entry(name.to_string())
            .or_insert_with(|| Material::new(name))
    }

    /// Check whether a material exists
    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    /// All materials, in insertion order
    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    /// Number of materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the library holds no materials
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Load a scene from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let library: MaterialLibrary = ron::from_str(&content)?;

        if library.version > SCENE_FORMAT_VERSION {
            return Err(GraphError::UnsupportedVersion {
                found: library.version,
                supported: SCENE_FORMAT_VERSION,
            });
        }

        Ok(library)
    }

    /// Save the scene to a RON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::create_shader_registry;
    use crate::socket::SocketValue;

    #[test]
    fn test_get_or_create() {
        let mut library = MaterialLibrary::new();
        library.get_or_create("Brick").mtlx_props.write_path = "brick.mtlx".to_string();
        assert_eq!(library.get_or_create("Brick").mtlx_props.write_path, "brick.mtlx");
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_reset_to_output() {
        let catalog = create_shader_registry();
        let mut material = Material::with_output("Brick", &catalog);
        material.graph.add_node(catalog.create_node("ShaderNodeRGB").unwrap());
        assert_eq!(material.graph.node_count(), 2);

        assert!(material.reset_to_output(&catalog));
        assert_eq!(material.graph.node_count(), 1);
        assert!(material.graph.active_output().unwrap().is_active_output);
    }

    #[test]
    fn test_serialization() {
        let catalog = create_shader_registry();
        let mut material = Material::with_output("Brick", &catalog);
        let rgb = material.graph.add_node(catalog.create_node("ShaderNodeRGB").unwrap());
        let diffuse = material.graph.add_node(catalog.create_node("ShaderNodeBsdfDiffuse").unwrap());
        material.graph.connect_by_index(rgb, 0, diffuse, 0).unwrap();

        let mut library = MaterialLibrary::new();
        library.insert(material);

        let ron_str = ron::ser::to_string_pretty(&library, ron::ser::PrettyConfig::default()).unwrap();
        let loaded: MaterialLibrary = ron::from_str(&ron_str).unwrap();
        let brick = loaded.get("Brick").unwrap();
        assert_eq!(brick.graph.node_count(), 3);
        assert_eq!(brick.graph.connection_count(), 1);
        assert_eq!(
            brick.graph.node(rgb).unwrap().outputs[0].default_value,
            Some(SocketValue::Color([0.5, 0.5, 0.5, 1.0]))
        );
    }
}
