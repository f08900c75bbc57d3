// SPDX-License-Identifier: MIT OR Apache-2.0
//! Adapter registry: renderer namespaces mapping host node types to
//! descriptor rows.

use crate::adapter::NodeAdapter;
use crate::descriptors::{cycles, prman, MtlxNodeName, NodeDescriptor};
use indexmap::IndexMap;
use ordoplay_shader_graph::{Node, RendererTag};

/// Adapters of one renderer
#[derive(Debug, Clone)]
pub struct Namespace {
    /// MaterialX `target` stamped on node definitions
    pub target: &'static str,
    /// Rows by host type id; `None` when the renderer is declared but has
    /// no adapters yet
    descriptors: Option<IndexMap<&'static str, &'static NodeDescriptor>>,
}

impl Namespace {
    /// Whether the renderer has adapters
    pub fn is_implemented(&self) -> bool {
        self.descriptors.is_some()
    }

    /// Rows of this namespace
    pub fn descriptors(&self) -> impl Iterator<Item = &'static NodeDescriptor> + '_ {
        self.descriptors.iter().flat_map(|rows| rows.values().copied())
    }
}

/// Registry of renderer namespaces
#[derive(Debug, Clone, Default)]
pub struct AdapterRegistry {
    namespaces: IndexMap<RendererTag, Namespace>,
}

impl AdapterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the Cycles and RenderMan tables; the remaining
    /// renderers are declared without adapters
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register_table(RendererTag::Cycles, cycles::TARGET, cycles::DESCRIPTORS);
        registry.register_table(RendererTag::Prman, prman::TARGET, prman::DESCRIPTORS);
        registry.declare(RendererTag::Arnold, "arnold");
        registry.declare(RendererTag::Vray, "vray");
        registry.declare(RendererTag::Redshift, "redshift");
        registry
    }

    /// Register a table of rows for a renderer, extending any rows
    /// already present
    pub fn register_table(
        &mut self,
        renderer: RendererTag,
        target: &'static str,
        table: &'static [NodeDescriptor],
    ) {
        let namespace = self.namespaces.entry(renderer).or_insert(Namespace {
            target,
            descriptors: None,
        });
        let rows = namespace.descriptors.get_or_insert_with(IndexMap::new);
        for row in table {
            rows.insert(row.type_id, row);
        }
    }

    /// Declare a renderer without adapters
    pub fn declare(&mut self, renderer: RendererTag, target: &'static str) {
        self.namespaces.entry(renderer).or_insert(Namespace {
            target,
            descriptors: None,
        });
    }

    /// Namespace of a renderer
    pub fn namespace(&self, renderer: RendererTag) -> Option<&Namespace> {
        self.namespaces.get(&renderer)
    }

    /// Renderer whose node definitions carry this `target`
    pub fn renderer_for_target(&self, target: &str) -> Option<RendererTag> {
        self.namespaces
            .iter()
            .find(|(_, ns)| ns.target.eq_ignore_ascii_case(target))
            .map(|(tag, _)| *tag)
    }

    /// Row for a host type in a renderer namespace
    pub fn descriptor(&self, renderer: RendererTag, type_id: &str) -> Option<&'static NodeDescriptor> {
        self.namespaces
            .get(&renderer)?
            .descriptors
            .as_ref()?
            .get(type_id)
            .copied()
    }

    /// Build an adapter for a host node.
    ///
    /// Returns `None` for output nodes, nodes without a renderer tag, nodes
    /// of a declared-only renderer and node types without a row.
    pub fn resolve(&self, node: &Node) -> Option<NodeAdapter> {
        if node.is_output_node() {
            return None;
        }
        let Some(renderer) = node.renderer else {
            tracing::debug!(node = %node.name, "Node has no renderer tag");
            return None;
        };
        let Some(namespace) = self.namespaces.get(&renderer) else {
            tracing::debug!(node = %node.name, %renderer, "Renderer is not registered");
            return None;
        };
        let Some(rows) = namespace.descriptors.as_ref() else {
            tracing::debug!(node = %node.name, %renderer, "Renderer has no adapters");
            return None;
        };
        let Some(descriptor) = rows.get(node.node_type.as_str()) else {
            tracing::debug!(node = %node.name, node_type = %node.node_type, "No adapter for node type");
            return None;
        };

        Some(NodeAdapter::new(node.id, renderer, namespace.target, descriptor))
    }

    /// Host type id for a node definition name.
    ///
    /// Node definition names are lowercased type ids. `hint` restricts the
    /// search to one renderer; without it every implemented namespace is
    /// searched in registration order.
    pub fn class_name_for(
        &self,
        node_def_name: &str,
        hint: Option<RendererTag>,
    ) -> Option<(RendererTag, &'static str)> {
        self.find(hint, |row| row.type_id.eq_ignore_ascii_case(node_def_name))
    }

    /// Host type id for a MaterialX node category.
    ///
    /// Only rows with a fixed category can match.
    pub fn class_for_category(
        &self,
        category: &str,
        hint: Option<RendererTag>,
    ) -> Option<(RendererTag, &'static str)> {
        self.find(hint, |row| matches!(row.mtlx_node, MtlxNodeName::Fixed(c) if c == category))
    }

    fn find(
        &self,
        hint: Option<RendererTag>,
        matches: impl Fn(&NodeDescriptor) -> bool,
    ) -> Option<(RendererTag, &'static str)> {
        self.namespaces
            .iter()
            .filter(|(tag, _)| hint.map_or(true, |hint| hint == **tag))
            .find_map(|(tag, ns)| {
                ns.descriptors()
                    .find(|row| matches(row))
                    .map(|row| (*tag, row.type_id))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordoplay_shader_graph::create_shader_registry;

    #[test]
    fn test_resolve_cycles_node() {
        let registry = AdapterRegistry::with_builtin();
        let catalog = create_shader_registry();
        let node = catalog
            .create_node("ShaderNodeBsdfDiffuse")
            .unwrap()
            .with_renderer(RendererTag::Cycles);

        let adapter = registry.resolve(&node).unwrap();
        assert_eq!(adapter.renderer(), RendererTag::Cycles);
        assert_eq!(adapter.node_def_name(), "shadernodebsdfdiffuse");
    }

    #[test]
    fn test_unresolvable_nodes() {
        let registry = AdapterRegistry::with_builtin();
        let catalog = create_shader_registry();

        let untagged = catalog.create_node("ShaderNodeRGB").unwrap();
        assert!(registry.resolve(&untagged).is_none());

        let arnold = catalog
            .create_node("ShaderNodeRGB")
            .unwrap()
            .with_renderer(RendererTag::Arnold);
        assert!(registry.resolve(&arnold).is_none());
        assert!(!registry.namespace(RendererTag::Arnold).unwrap().is_implemented());

        let output = catalog
            .create_node("ShaderNodeOutputMaterial")
            .unwrap()
            .with_renderer(RendererTag::Cycles);
        assert!(registry.resolve(&output).is_none());

        // A RenderMan type tagged for Cycles has no row there
        let misplaced = catalog
            .create_node("PxrDiffuseBxdfNode")
            .unwrap()
            .with_renderer(RendererTag::Cycles);
        assert!(registry.resolve(&misplaced).is_none());
    }

    #[test]
    fn test_declared_namespaces_match_nothing() {
        let registry = AdapterRegistry::with_builtin();
        let catalog = create_shader_registry();

        for tag in [RendererTag::Arnold, RendererTag::Vray, RendererTag::Redshift] {
            for node_type in catalog.types() {
                let node = catalog.create_node(&node_type.id).unwrap().with_renderer(tag);
                assert!(registry.resolve(&node).is_none(), "{tag} resolved {}", node_type.id);
                let def_name = node_type.id.to_lowercase();
                assert_eq!(registry.class_name_for(&def_name, Some(tag)), None);
            }
        }
    }

    #[test]
    fn test_class_name_lookup() {
        let registry = AdapterRegistry::with_builtin();
        assert_eq!(
            registry.class_name_for("shadernodebsdfdiffuse", None),
            Some((RendererTag::Cycles, "ShaderNodeBsdfDiffuse"))
        );
        assert_eq!(
            registry.class_name_for("pxrdiffusebxdfnode", Some(RendererTag::Prman)),
            Some((RendererTag::Prman, "PxrDiffuseBxdfNode"))
        );
        assert_eq!(registry.class_name_for("shadernodebsdfdiffuse", Some(RendererTag::Prman)), None);
        assert_eq!(registry.class_name_for("nd_image_color3", None), None);
    }

    #[test]
    fn test_category_lookup() {
        let registry = AdapterRegistry::with_builtin();
        assert_eq!(
            registry.class_for_category("diffuse_bsdf", None),
            Some((RendererTag::Cycles, "ShaderNodeBsdfDiffuse"))
        );
        assert_eq!(registry.class_for_category("pxr_diffuse", None), None);
        assert_eq!(registry.renderer_for_target("RenderMan"), Some(RendererTag::Prman));
    }
}
