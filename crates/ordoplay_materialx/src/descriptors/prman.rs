// SPDX-License-Identifier: MIT OR Apache-2.0
//! RenderMan bxdf, pattern, light and displacement nodes.
//!
//! Categories come from the node label (`PxrDiffuse` becomes `pxr_diffuse`)
//! and every declared parameter is written.

use super::NodeDescriptor as D;

/// MaterialX `target` of RenderMan node definitions
pub const TARGET: &str = "renderman";

/// Adapter rows for RenderMan node types
pub static DESCRIPTORS: &[D] = &[
    D::labeled("PxrOSLPatternNode"),
    D::labeled("PxrSeExprPatternNode"),
    D::labeled("PxrBlackBodyPatternNode"),
    D::labeled("PxrBlendPatternNode"),
    D::labeled("PxrCheckerPatternNode"),
    D::labeled("PxrClampPatternNode"),
    D::labeled("PxrColorCorrectPatternNode"),
    D::labeled("PxrExposurePatternNode"),
    D::labeled("PxrGammaPatternNode"),
    D::labeled("PxrHSLPatternNode"),
    D::labeled("PxrHairColorPatternNode"),
    D::labeled("PxrInvertPatternNode"),
    D::labeled("PxrLayeredBlendPatternNode"),
    D::labeled("PxrMixPatternNode"),
    D::labeled("PxrProjectionStackPatternNode"),
    D::labeled("PxrRampPatternNode"),
    D::labeled("PxrRemapPatternNode"),
    D::labeled("PxrThinFilmPatternNode"),
    D::labeled("PxrThresholdPatternNode"),
    D::labeled("PxrVaryPatternNode"),
    D::labeled("PxrBlackBxdfNode"),
    D::labeled("PxrConstantBxdfNode"),
    D::labeled("PxrDiffuseBxdfNode"),
    D::labeled("PxrDisneyBxdfNode"),
    D::labeled("PxrGlassBxdfNode"),
    D::labeled("PxrHairBxdfNode"),
    D::labeled("PxrLayerSurfaceBxdfNode"),
    D::labeled("PxrLightEmissionBxdfNode"),
    D::labeled("PxrMarschnerHairBxdfNode"),
    D::labeled("PxrSkinBxdfNode"),
    D::labeled("PxrSurfaceBxdfNode"),
    D::labeled("PxrVolumeBxdfNode"),
    D::labeled("PxrMeshLightLightNode"),
    D::labeled("PxrAttributePatternNode"),
    D::labeled("PxrGeometricAOVsPatternNode"),
    D::labeled("PxrMatteIDPatternNode"),
    D::labeled("PxrPrimvarPatternNode"),
    D::labeled("PxrShadedSidePatternNode"),
    D::labeled("PxrTeePatternNode"),
    D::labeled("PxrToFloatPatternNode"),
    D::labeled("PxrToFloat3PatternNode"),
    D::labeled("PxrVariablePatternNode"),
    D::labeled("PxrBumpManifold2DPatternNode"),
    D::labeled("PxrManifold2DPatternNode"),
    D::labeled("PxrManifold3DPatternNode"),
    D::labeled("PxrManifold3DNPatternNode"),
    D::labeled("PxrProjectorPatternNode"),
    D::labeled("PxrRandomTextureManifoldPatternNode"),
    D::labeled("PxrRoundCubePatternNode"),
    D::labeled("PxrTileManifoldPatternNode"),
    D::labeled("PxrBakePointCloudPatternNode"),
    D::labeled("PxrBakeTexturePatternNode"),
    D::labeled("PxrDirtPatternNode"),
    D::labeled("PxrFractalPatternNode"),
    D::labeled("PxrLayeredTexturePatternNode"),
    D::labeled("PxrFractalizePatternNode"),
    D::labeled("PxrMultiTexturePatternNode"),
    D::labeled("PxrProjectionLayerPatternNode"),
    D::labeled("PxrPtexturePatternNode"),
    D::labeled("PxrTexturePatternNode"),
    D::labeled("PxrVoronoisePatternNode"),
    D::labeled("PxrWorleyPatternNode"),
    D::labeled("PxrDisplaceDisplacementNode"),
    D::labeled("PxrAdjustNormalPatternNode"),
    D::labeled("PxrBumpPatternNode"),
    D::labeled("PxrFlakesPatternNode"),
    D::labeled("PxrNormalMapPatternNode"),
    D::labeled("aaOceanPrmanShaderPatternNode"),
    D::labeled("PxrCrossPatternNode"),
    D::labeled("PxrDotPatternNode"),
    D::labeled("PxrFacingRatioPatternNode"),
    D::labeled("PxrTangentFieldPatternNode"),
    D::labeled("PxrDispScalarLayerPatternNode"),
    D::labeled("PxrDispTransformPatternNode"),
    D::labeled("PxrDispVectorLayerPatternNode"),
    D::labeled("PxrLayerPatternNode"),
    D::labeled("PxrLayerMixerPatternNode"),
];
