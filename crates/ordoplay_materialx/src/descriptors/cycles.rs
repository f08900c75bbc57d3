// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cycles shader nodes.

use super::NodeDescriptor as D;

/// MaterialX `target` of Cycles node definitions
pub const TARGET: &str = "cycles";

/// Adapter rows for Cycles node types
pub static DESCRIPTORS: &[D] = &[
    // Input
    D::node_with("ShaderNodeAttribute", "attribute", &["attribute_name"]),
    D::node_with("ShaderNodeTangent", "tangent", &["axis", "direction_type"]),
    D::node_with("ShaderNodeTexCoord", "texture_coordinate", &["from_instancer", "object"]),
    D::node_with("ShaderNodeUVMap", "uv_map", &["from_instancer", "uv_map"]),
    D::node_with("ShaderNodeWireframe", "wireframe", &["use_pixel_size"]),
    D::node("ShaderNodeCameraData", "camera_data"),
    D::node("ShaderNodeNewGeometry", "geometry"),
    D::node("ShaderNodeHairInfo", "hair_info"),
    D::node("ShaderNodeLayerWeight", "layer_weight"),
    D::node("ShaderNodeLightPath", "light_path"),
    D::node("ShaderNodeObjectInfo", "object_info"),
    D::node("ShaderNodeParticleInfo", "particle_info"),
    D::node("ShaderNodeFresnel", "fresnel"),
    D::node("ShaderNodeRGB", "rgb"),
    D::node("ShaderNodeValue", "value"),
    // Shader
    D::surface("ShaderNodeAddShader", "add_shader", &[]),
    D::surface("ShaderNodeAmbientOcclusion", "ambient_occlusion", &[]),
    D::surface("ShaderNodeBsdfAnisotropic", "anisotropic_bsdf", &["distribution"]),
    D::surface("ShaderNodeBsdfDiffuse", "diffuse_bsdf", &[]),
    D::surface("ShaderNodeEmission", "emission", &[]),
    D::surface("ShaderNodeBsdfGlass", "glass_bsdf", &["distribution"]),
    D::surface("ShaderNodeBsdfGlossy", "glossy_bsdf", &["distribution"]),
    D::surface("ShaderNodeBsdfHair", "hair_bsdf", &["component"]),
    D::surface("ShaderNodeHoldout", "holdout", &[]),
    D::surface("ShaderNodeMixShader", "mix_shader", &[]),
    D::surface("ShaderNodeBsdfPrincipled", "principled_bsdf", &["distribution", "subsurface_method"]),
    D::surface("ShaderNodeBsdfRefraction", "refraction_bsdf", &["distribution"]),
    D::surface("ShaderNodeSubsurfaceScattering", "sss_bssrdf", &["falloff"]),
    D::surface("ShaderNodeBsdfToon", "toon_bsdf", &["component"]),
    D::surface("ShaderNodeBsdfTranslucent", "translucent_bsdf", &[]),
    D::surface("ShaderNodeBsdfTransparent", "transparent_bsdf", &[]),
    D::surface("ShaderNodeBsdfVelvet", "velvet_bsdf", &[]),
    D::volume("ShaderNodeVolumeAbsorption", "volume_absorption"),
    D::volume("ShaderNodeVolumeScatter", "volume_scatter"),
    // Texture
    D::texture(
        "ShaderNodeTexBrick",
        "brick_texture",
        &["offset", "offset_frequency", "squash", "squash_frequency"],
    ),
    D::texture("ShaderNodeTexChecker", "checker_texture", &[]),
    D::texture(
        "ShaderNodeTexEnvironment",
        "environment_texture",
        &["image", "color_space", "interpolation", "projection"],
    ),
    D::texture("ShaderNodeTexGradient", "gradient_texture", &["gradient_type"]),
    D::texture(
        "ShaderNodeTexImage",
        "image_texture",
        &["image", "color_space", "extension", "interpolation", "projection", "projection_blend"],
    ),
    D::texture("ShaderNodeTexMagic", "magic_texture", &["turbulence_depth"]),
    D::texture("ShaderNodeTexMusgrave", "musgrave_texture", &["musgrave_type"]),
    D::texture("ShaderNodeTexNoise", "noise_texture", &[]),
    D::texture(
        "ShaderNodeTexPointDensity",
        "point_texture",
        &[
            "interpolation",
            "object",
            "particle_color_source",
            "particle_system",
            "point_source",
            "radius",
            "resolution",
            "space",
            "vertex_attribute_name",
            "vertex_color_source",
        ],
    ),
    D::texture("ShaderNodeTexSky", "sky_texture", &["ground_albedo", "sky_type", "sun_direction", "turbidity"]),
    D::texture("ShaderNodeTexVoronoi", "voronoi_texture", &["coloring"]),
    D::texture("ShaderNodeTexWave", "wave_texture", &["wave_profile", "wave_type"]),
    // Color
    D::node("ShaderNodeBrightContrast", "bright_contrast"),
    D::node("ShaderNodeGamma", "gamma"),
    D::node("ShaderNodeHueSaturation", "hue_saturation"),
    D::node("ShaderNodeInvert", "invert"),
    D::node("ShaderNodeLightFalloff", "light_falloff"),
    D::node_with("ShaderNodeMixRGB", "mix_rgb", &["blend_type", "use_alpha", "use_clamp"]),
    D::curve("ShaderNodeRGBCurve", "rgb_curve"),
    // Vector
    D::node_with(
        "ShaderNodeMapping",
        "mapping",
        &["max", "min", "rotation", "scale", "translation", "use_max", "use_min", "vector_type"],
    ),
    D::node_with("ShaderNodeBump", "bump", &["invert"]),
    D::node("ShaderNodeNormal", "normal_node"),
    D::node_with("ShaderNodeNormalMap", "normal_map", &["space", "uv_map"]),
    D::node_with(
        "ShaderNodeVectorTransform",
        "vector_transform",
        &["convert_from", "convert_to", "vector_type"],
    ),
    D::curve("ShaderNodeVectorCurve", "vector_curve"),
    // Converter
    D::node("ShaderNodeBlackbody", "blackbody"),
    // Ramp stops have no host parameter kind; `color_ramp` is reported absent
    D::node_with("ShaderNodeValToRGB", "color_ramp", &["color_ramp"]),
    D::node("ShaderNodeCombineHSV", "combine_hsv"),
    D::node("ShaderNodeCombineRGB", "combine_rgb"),
    D::node("ShaderNodeCombineXYZ", "combine_xyz"),
    D::node_with("ShaderNodeMath", "math", &["operation", "use_clamp"]),
    D::node("ShaderNodeRGBToBW", "rgb_bw"),
    D::node("ShaderNodeSeparateHSV", "separate_hsv"),
    D::node("ShaderNodeSeparateRGB", "separate_rgb"),
    D::node("ShaderNodeSeparateXYZ", "separate_xyz"),
    D::node_with("ShaderNodeVectorMath", "vector_math", &["operation"]),
    D::node("ShaderNodeWavelength", "wavelength"),
];
