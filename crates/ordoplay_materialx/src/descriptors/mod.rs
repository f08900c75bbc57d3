// SPDX-License-Identifier: MIT OR Apache-2.0
//! Declarative adapter descriptors, one row per host node type.
//!
//! A descriptor names the MaterialX node category a host node maps to, which
//! host parameters travel with it, and which adapter variant handles it.

pub mod cycles;
pub mod prman;

/// How the MaterialX node category is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtlxNodeName {
    /// A fixed category, e.g. `diffuse_bsdf`
    Fixed(&'static str),
    /// Derived from the host node's label with `camel_to_snake`
    FromLabel,
}

/// Which host parameters are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    /// An explicit list of parameter names
    Listed(&'static [&'static str]),
    /// Every parameter the host node declares, sorted by name
    Declared,
}

/// Closure family of a shader node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderFamily {
    /// Surface closures (BSDFs, emission, mixes)
    Surface,
    /// Volume closures
    Volume,
}

/// Adapter variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    /// Typed by its first output, one nodedef output per host output
    Standard,
    /// One implicit shader output; wired to the graph's render channels
    Shader(ShaderFamily),
    /// Image-producing node, typed `color4`
    Texture,
    /// Curve editor node; its mapping is written with one point per channel
    Curve,
}

/// One adapter table row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeDescriptor {
    /// Host node type identifier
    pub type_id: &'static str,
    /// MaterialX node category
    pub mtlx_node: MtlxNodeName,
    /// Parameters written alongside the sockets
    pub params: ParamSource,
    /// Adapter variant
    pub kind: AdapterKind,
}

/// Parameter name of a curve node's mapping
pub const CURVE_MAPPING_PARAM: &str = "mapping";

const NO_PARAMS: &[&str] = &[];

impl NodeDescriptor {
    /// Plain node without parameters
    pub const fn node(type_id: &'static str, mtlx_node: &'static str) -> Self {
        Self::node_with(type_id, mtlx_node, NO_PARAMS)
    }

    /// Plain node with listed parameters
    pub const fn node_with(
        type_id: &'static str,
        mtlx_node: &'static str,
        params: &'static [&'static str],
    ) -> Self {
        Self {
            type_id,
            mtlx_node: MtlxNodeName::Fixed(mtlx_node),
            params: ParamSource::Listed(params),
            kind: AdapterKind::Standard,
        }
    }

    /// Surface shader node
    pub const fn surface(
        type_id: &'static str,
        mtlx_node: &'static str,
        params: &'static [&'static str],
    ) -> Self {
        Self {
            kind: AdapterKind::Shader(ShaderFamily::Surface),
            ..Self::node_with(type_id, mtlx_node, params)
        }
    }

    /// Volume shader node
    pub const fn volume(type_id: &'static str, mtlx_node: &'static str) -> Self {
        Self {
            kind: AdapterKind::Shader(ShaderFamily::Volume),
            ..Self::node(type_id, mtlx_node)
        }
    }

    /// Image-producing texture node
    pub const fn texture(
        type_id: &'static str,
        mtlx_node: &'static str,
        params: &'static [&'static str],
    ) -> Self {
        Self {
            kind: AdapterKind::Texture,
            ..Self::node_with(type_id, mtlx_node, params)
        }
    }

    /// Curve mapping node
    pub const fn curve(type_id: &'static str, mtlx_node: &'static str) -> Self {
        Self {
            kind: AdapterKind::Curve,
            ..Self::node_with(type_id, mtlx_node, &[CURVE_MAPPING_PARAM])
        }
    }

    /// Node whose category comes from its label and whose parameters are
    /// all declared ones
    pub const fn labeled(type_id: &'static str) -> Self {
        Self {
            type_id,
            mtlx_node: MtlxNodeName::FromLabel,
            params: ParamSource::Declared,
            kind: AdapterKind::Standard,
        }
    }

    /// Whether this is a shader-family row
    pub fn is_shader(&self) -> bool {
        matches!(self.kind, AdapterKind::Shader(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tables_have_unique_type_ids() {
        for table in [cycles::DESCRIPTORS, prman::DESCRIPTORS] {
            let ids: HashSet<_> = table.iter().map(|d| d.type_id).collect();
            assert_eq!(ids.len(), table.len());
        }
    }

    #[test]
    fn test_constructors() {
        let glossy = NodeDescriptor::surface("ShaderNodeBsdfGlossy", "glossy_bsdf", &["distribution"]);
        assert!(glossy.is_shader());
        assert_eq!(glossy.params, ParamSource::Listed(&["distribution"]));

        let curve = NodeDescriptor::curve("ShaderNodeRGBCurve", "rgb_curve");
        assert_eq!(curve.kind, AdapterKind::Curve);
        assert_eq!(curve.params, ParamSource::Listed(&[CURVE_MAPPING_PARAM]));
    }
}
