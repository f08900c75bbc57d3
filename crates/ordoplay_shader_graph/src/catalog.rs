// SPDX-License-Identifier: MIT OR Apache-2.0
//! Catalog of shader node types the host offers.
//!
//! Node type identifiers, labels and socket layouts follow the host's Cycles
//! shader nodes, plus a handful of RenderMan bxdf/pattern nodes.

use crate::node::{NodeCategory, NodeRegistry, NodeType};
use crate::param::{CurveMapping, ParamValue};
use crate::socket::{Socket, SocketKind, SocketValue};
use indexmap::IndexMap;

/// Type identifier of the material output node
pub const TERMINAL_NODE_TYPE: &str = "ShaderNodeOutputMaterial";

fn float(name: &str, value: f32) -> Socket {
    Socket::input(name, SocketKind::Float).with_default(SocketValue::Float(value))
}

fn color(name: &str, rgba: [f32; 4]) -> Socket {
    Socket::input(name, SocketKind::Color4).with_default(SocketValue::Color(rgba))
}

fn vector(name: &str, xyz: [f32; 3]) -> Socket {
    Socket::input(name, SocketKind::Vector3).with_default(SocketValue::Vector(xyz))
}

fn shader(name: &str) -> Socket {
    Socket::input(name, SocketKind::Shader)
}

fn out(name: &str, kind: SocketKind) -> Socket {
    Socket::output(name, kind)
}

fn params<const N: usize>(entries: [(&str, ParamValue); N]) -> IndexMap<String, ParamValue> {
    entries
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

fn enum_param(item: &str) -> ParamValue {
    ParamValue::Enum(item.to_string())
}

struct Entry<'a> {
    id: &'a str,
    name: &'a str,
    category: NodeCategory,
    description: &'a str,
}

fn register(
    registry: &mut NodeRegistry,
    entry: Entry<'_>,
    inputs: Vec<Socket>,
    outputs: Vec<Socket>,
    parameters: IndexMap<String, ParamValue>,
) {
    registry.register(NodeType {
        id: entry.id.to_string(),
        name: entry.name.to_string(),
        category: entry.category,
        description: entry.description.to_string(),
        inputs,
        outputs,
        parameters,
    });
}

const GREY: [f32; 4] = [0.8, 0.8, 0.8, 1.0];
const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const ZERO: [f32; 3] = [0.0, 0.0, 0.0];

/// Create the shader node registry with all available node types
pub fn create_shader_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();

    // ========================================================================
    // Output
    // ========================================================================

    register(
        &mut registry,
        Entry { id: TERMINAL_NODE_TYPE, name: "Material Output", category: NodeCategory::Output, description: "Surface, volume and displacement of the material" },
        vec![shader("Surface"), shader("Volume"), float("Displacement", 0.0)],
        vec![],
        params([("target", enum_param("ALL"))]),
    );

    // ========================================================================
    // Input
    // ========================================================================

    register(
        &mut registry,
        Entry { id: "ShaderNodeRGB", name: "RGB", category: NodeCategory::Input, description: "Constant color" },
        vec![],
        vec![Socket::output("Color", SocketKind::Color4).with_default(SocketValue::Color([0.5, 0.5, 0.5, 1.0]))],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeValue", name: "Value", category: NodeCategory::Input, description: "Constant scalar" },
        vec![],
        vec![Socket::output("Value", SocketKind::Float).with_default(SocketValue::Float(0.5))],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeTexCoord", name: "Texture Coordinate", category: NodeCategory::Input, description: "Coordinate spaces of the shading point" },
        vec![],
        ["Generated", "Normal", "UV", "Object", "Camera", "Window", "Reflection"]
            .into_iter()
            .map(|name| out(name, SocketKind::Vector3))
            .collect(),
        params([("object", ParamValue::Pointer(None)), ("from_instancer", ParamValue::Bool(false))]),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeFresnel", name: "Fresnel", category: NodeCategory::Input, description: "Dielectric fresnel weight" },
        vec![float("IOR", 1.45), vector("Normal", ZERO)],
        vec![out("Fac", SocketKind::Float)],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeLayerWeight", name: "Layer Weight", category: NodeCategory::Input, description: "Weights for layering shaders" },
        vec![float("Blend", 0.5), vector("Normal", ZERO)],
        vec![out("Fresnel", SocketKind::Float), out("Facing", SocketKind::Float)],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeAttribute", name: "Attribute", category: NodeCategory::Input, description: "Named geometry attribute" },
        vec![],
        vec![out("Color", SocketKind::Color4), out("Vector", SocketKind::Vector3), out("Fac", SocketKind::Float)],
        params([("attribute_name", ParamValue::String(String::new()))]),
    );

    // ========================================================================
    // Shaders
    // ========================================================================

    register(
        &mut registry,
        Entry { id: "ShaderNodeBsdfDiffuse", name: "Diffuse BSDF", category: NodeCategory::Shader, description: "Lambertian and Oren-Nayar diffuse reflection" },
        vec![color("Color", GREY), float("Roughness", 0.0), vector("Normal", ZERO)],
        vec![out("BSDF", SocketKind::Shader)],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeBsdfGlossy", name: "Glossy BSDF", category: NodeCategory::Shader, description: "Specular reflection with microfacet distribution" },
        vec![color("Color", GREY), float("Roughness", 0.5), vector("Normal", ZERO)],
        vec![out("BSDF", SocketKind::Shader)],
        params([("distribution", enum_param("GGX"))]),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeBsdfGlass", name: "Glass BSDF", category: NodeCategory::Shader, description: "Reflection and refraction of glass-like surfaces" },
        vec![color("Color", WHITE), float("Roughness", 0.0), float("IOR", 1.45), vector("Normal", ZERO)],
        vec![out("BSDF", SocketKind::Shader)],
        params([("distribution", enum_param("BECKMANN"))]),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeBsdfPrincipled", name: "Principled BSDF", category: NodeCategory::Shader, description: "Layered physically based surface" },
        vec![
            color("Base Color", GREY),
            float("Subsurface", 0.0),
            vector("Subsurface Radius", [1.0, 0.2, 0.1]),
            color("Subsurface Color", GREY),
            float("Metallic", 0.0),
            float("Specular", 0.5),
            float("Specular Tint", 0.0),
            float("Roughness", 0.5),
            float("Anisotropic", 0.0),
            float("Anisotropic Rotation", 0.0),
            float("Sheen", 0.0),
            float("Sheen Tint", 0.5),
            float("Clearcoat", 0.0),
            float("Clearcoat Roughness", 0.03),
            float("IOR", 1.45),
            float("Transmission", 0.0),
            float("Transmission Roughness", 0.0),
            color("Emission", BLACK),
            float("Alpha", 1.0),
            vector("Normal", ZERO),
            vector("Clearcoat Normal", ZERO),
            vector("Tangent", ZERO),
        ],
        vec![out("BSDF", SocketKind::Shader)],
        params([("distribution", enum_param("GGX")), ("subsurface_method", enum_param("BURLEY"))]),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeEmission", name: "Emission", category: NodeCategory::Shader, description: "Light emission" },
        vec![color("Color", WHITE), float("Strength", 1.0)],
        vec![out("Emission", SocketKind::Shader)],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeMixShader", name: "Mix Shader", category: NodeCategory::Shader, description: "Blend two shaders by a factor" },
        vec![float("Fac", 0.5), shader("Shader"), shader("Shader")],
        vec![out("Shader", SocketKind::Shader)],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeAddShader", name: "Add Shader", category: NodeCategory::Shader, description: "Sum of two shaders" },
        vec![shader("Shader"), shader("Shader")],
        vec![out("Shader", SocketKind::Shader)],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeBsdfTransparent", name: "Transparent BSDF", category: NodeCategory::Shader, description: "Straight-through transparency" },
        vec![color("Color", WHITE)],
        vec![out("BSDF", SocketKind::Shader)],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeVolumeAbsorption", name: "Volume Absorption", category: NodeCategory::Shader, description: "Absorbing volume" },
        vec![color("Color", GREY), float("Density", 1.0)],
        vec![out("Volume", SocketKind::Shader)],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeVolumeScatter", name: "Volume Scatter", category: NodeCategory::Shader, description: "Scattering volume" },
        vec![color("Color", GREY), float("Density", 1.0), float("Anisotropy", 0.0)],
        vec![out("Volume", SocketKind::Shader)],
        IndexMap::new(),
    );

    // ========================================================================
    // Textures
    // ========================================================================

    register(
        &mut registry,
        Entry { id: "ShaderNodeTexImage", name: "Image Texture", category: NodeCategory::Texture, description: "Sample an image file" },
        vec![vector("Vector", ZERO)],
        vec![out("Color", SocketKind::Color4), out("Alpha", SocketKind::Float)],
        params([
            ("image", ParamValue::Image(None)),
            ("color_space", enum_param("COLOR")),
            ("extension", enum_param("REPEAT")),
            ("interpolation", enum_param("Linear")),
            ("projection", enum_param("FLAT")),
            ("projection_blend", ParamValue::Float(0.0)),
        ]),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeTexEnvironment", name: "Environment Texture", category: NodeCategory::Texture, description: "Sample an environment map" },
        vec![vector("Vector", ZERO)],
        vec![out("Color", SocketKind::Color4)],
        params([
            ("image", ParamValue::Image(None)),
            ("color_space", enum_param("COLOR")),
            ("interpolation", enum_param("Linear")),
            ("projection", enum_param("EQUIRECTANGULAR")),
        ]),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeTexChecker", name: "Checker Texture", category: NodeCategory::Texture, description: "Checkerboard of two colors" },
        vec![vector("Vector", ZERO), color("Color1", GREY), color("Color2", [0.2, 0.2, 0.2, 1.0]), float("Scale", 5.0)],
        vec![out("Color", SocketKind::Color4), out("Fac", SocketKind::Float)],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeTexNoise", name: "Noise Texture", category: NodeCategory::Texture, description: "Perlin noise" },
        vec![vector("Vector", ZERO), float("Scale", 5.0), float("Detail", 2.0), float("Distortion", 0.0)],
        vec![out("Color", SocketKind::Color4), out("Fac", SocketKind::Float)],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeTexGradient", name: "Gradient Texture", category: NodeCategory::Texture, description: "Interpolated gradient" },
        vec![vector("Vector", ZERO)],
        vec![out("Color", SocketKind::Color4), out("Fac", SocketKind::Float)],
        params([("gradient_type", enum_param("LINEAR"))]),
    );

    // ========================================================================
    // Color
    // ========================================================================

    register(
        &mut registry,
        Entry { id: "ShaderNodeMixRGB", name: "Mix", category: NodeCategory::Color, description: "Blend two colors" },
        vec![float("Fac", 0.5), color("Color1", [0.5, 0.5, 0.5, 1.0]), color("Color2", [0.5, 0.5, 0.5, 1.0])],
        vec![out("Color", SocketKind::Color4)],
        params([
            ("blend_type", enum_param("MIX")),
            ("use_alpha", ParamValue::Bool(false)),
            ("use_clamp", ParamValue::Bool(false)),
        ]),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeInvert", name: "Invert", category: NodeCategory::Color, description: "Invert a color" },
        vec![float("Fac", 1.0), color("Color", BLACK)],
        vec![out("Color", SocketKind::Color4)],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeGamma", name: "Gamma", category: NodeCategory::Color, description: "Apply a gamma curve" },
        vec![color("Color", WHITE), float("Gamma", 1.0)],
        vec![out("Color", SocketKind::Color4)],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeBrightContrast", name: "Bright/Contrast", category: NodeCategory::Color, description: "Brightness and contrast" },
        vec![color("Color", WHITE), float("Bright", 0.0), float("Contrast", 0.0)],
        vec![out("Color", SocketKind::Color4)],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeRGBCurve", name: "RGB Curves", category: NodeCategory::Color, description: "Per-channel color curves" },
        vec![float("Fac", 1.0), color("Color", WHITE)],
        vec![out("Color", SocketKind::Color4)],
        params([("mapping", ParamValue::Curve(CurveMapping::identity(4)))]),
    );

    // ========================================================================
    // Vector
    // ========================================================================

    register(
        &mut registry,
        Entry { id: "ShaderNodeMapping", name: "Mapping", category: NodeCategory::Vector, description: "Transform a vector" },
        vec![vector("Vector", ZERO)],
        vec![out("Vector", SocketKind::Vector3)],
        params([
            ("translation", ParamValue::Vector(ZERO)),
            ("rotation", ParamValue::Vector(ZERO)),
            ("scale", ParamValue::Vector([1.0, 1.0, 1.0])),
            ("min", ParamValue::Vector(ZERO)),
            ("max", ParamValue::Vector([1.0, 1.0, 1.0])),
            ("use_min", ParamValue::Bool(false)),
            ("use_max", ParamValue::Bool(false)),
            ("vector_type", enum_param("POINT")),
        ]),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeBump", name: "Bump", category: NodeCategory::Vector, description: "Perturb the normal from a height field" },
        vec![float("Strength", 1.0), float("Distance", 1.0), float("Height", 1.0), vector("Normal", ZERO)],
        vec![out("Normal", SocketKind::Vector3)],
        params([("invert", ParamValue::Bool(false))]),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeNormalMap", name: "Normal Map", category: NodeCategory::Vector, description: "Normal from a normal map color" },
        vec![float("Strength", 1.0), color("Color", [0.5, 0.5, 1.0, 1.0])],
        vec![out("Normal", SocketKind::Vector3)],
        params([("space", enum_param("TANGENT")), ("uv_map", ParamValue::String(String::new()))]),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeVectorCurve", name: "Vector Curves", category: NodeCategory::Vector, description: "Per-axis vector curves" },
        vec![float("Fac", 1.0), vector("Vector", ZERO)],
        vec![out("Vector", SocketKind::Vector3)],
        params([("mapping", ParamValue::Curve(CurveMapping::identity(3)))]),
    );

    // ========================================================================
    // Converters
    // ========================================================================

    register(
        &mut registry,
        Entry { id: "ShaderNodeMath", name: "Math", category: NodeCategory::Converter, description: "Scalar math operation" },
        vec![float("Value", 0.5), float("Value", 0.5)],
        vec![out("Value", SocketKind::Float)],
        params([("operation", enum_param("ADD")), ("use_clamp", ParamValue::Bool(false))]),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeVectorMath", name: "Vector Math", category: NodeCategory::Converter, description: "Vector math operation" },
        vec![vector("Vector", ZERO), vector("Vector", ZERO)],
        vec![out("Vector", SocketKind::Vector3), out("Value", SocketKind::Float)],
        params([("operation", enum_param("ADD"))]),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeSeparateRGB", name: "Separate RGB", category: NodeCategory::Converter, description: "Split a color into channels" },
        vec![color("Image", GREY)],
        vec![out("R", SocketKind::Float), out("G", SocketKind::Float), out("B", SocketKind::Float)],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeCombineRGB", name: "Combine RGB", category: NodeCategory::Converter, description: "Build a color from channels" },
        vec![float("R", 0.0), float("G", 0.0), float("B", 0.0)],
        vec![out("Image", SocketKind::Color4)],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeSeparateXYZ", name: "Separate XYZ", category: NodeCategory::Converter, description: "Split a vector into axes" },
        vec![vector("Vector", ZERO)],
        vec![out("X", SocketKind::Float), out("Y", SocketKind::Float), out("Z", SocketKind::Float)],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeCombineXYZ", name: "Combine XYZ", category: NodeCategory::Converter, description: "Build a vector from axes" },
        vec![float("X", 0.0), float("Y", 0.0), float("Z", 0.0)],
        vec![out("Vector", SocketKind::Vector3)],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeRGBToBW", name: "RGB to BW", category: NodeCategory::Converter, description: "Color to luminance" },
        vec![color("Color", [0.5, 0.5, 0.5, 1.0])],
        vec![out("Val", SocketKind::Float)],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "ShaderNodeBlackbody", name: "Blackbody", category: NodeCategory::Converter, description: "Black body emission color" },
        vec![float("Temperature", 1500.0)],
        vec![out("Color", SocketKind::Color4)],
        IndexMap::new(),
    );

    // ========================================================================
    // RenderMan
    // ========================================================================

    register(
        &mut registry,
        Entry { id: "PxrDiffuseBxdfNode", name: "PxrDiffuse", category: NodeCategory::Shader, description: "RenderMan diffuse bxdf" },
        vec![color("diffuseColor", [0.18, 0.18, 0.18, 1.0]), vector("bumpNormal", ZERO), color("presence", WHITE)],
        vec![out("Bxdf", SocketKind::Shader)],
        IndexMap::new(),
    );

    register(
        &mut registry,
        Entry { id: "PxrCheckerPatternNode", name: "PxrChecker", category: NodeCategory::Pattern, description: "RenderMan checker pattern" },
        vec![color("colorA", WHITE), color("colorB", BLACK), vector("manifold", ZERO)],
        vec![out("resultRGB", SocketKind::Color4), out("resultA", SocketKind::Float)],
        params([("mode", ParamValue::Int(0)), ("frequency", ParamValue::Float(4.0))]),
    );

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_registered() {
        let registry = create_shader_registry();
        let terminal = registry.create_node(TERMINAL_NODE_TYPE).unwrap();
        assert!(terminal.is_output_node());
        assert_eq!(terminal.inputs.len(), 3);
        assert_eq!(terminal.inputs[0].name, "Surface");
    }

    #[test]
    fn test_nodes_get_fresh_socket_ids() {
        let registry = create_shader_registry();
        let a = registry.create_node("ShaderNodeBsdfDiffuse").unwrap();
        let b = registry.create_node("ShaderNodeBsdfDiffuse").unwrap();
        assert_ne!(a.inputs[0].id, b.inputs[0].id);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_categories() {
        let registry = create_shader_registry();
        assert_eq!(registry.types_in_category(NodeCategory::Output).count(), 1);
        assert!(registry.types_in_category(NodeCategory::Shader).count() >= 10);
    }
}
