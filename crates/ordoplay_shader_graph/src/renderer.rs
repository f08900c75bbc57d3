// SPDX-License-Identifier: MIT OR Apache-2.0
//! Render engine tags attached to shader nodes.

use serde::{Deserialize, Serialize};

/// Render engine a node is authored for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RendererTag {
    /// Cycles path tracer
    Cycles,
    /// Pixar RenderMan
    Prman,
    /// Arnold
    Arnold,
    /// V-Ray
    Vray,
    /// Redshift
    Redshift,
}

impl RendererTag {
    /// Map a host render engine identifier (e.g. `CYCLES`, `PRMAN_RENDER`) to a tag.
    ///
    /// Engines without a node vocabulary of their own (Eevee, Workbench) have no tag.
    pub fn from_engine(engine: &str) -> Option<Self> {
        match engine.to_ascii_uppercase().as_str() {
            "CYCLES" => Some(Self::Cycles),
            "PRMAN_RENDER" | "PRMAN" => Some(Self::Prman),
            "ARNOLD" => Some(Self::Arnold),
            "VRAY" | "VRAY_RENDER" => Some(Self::Vray),
            "REDSHIFT" | "RS" => Some(Self::Redshift),
            _ => None,
        }
    }

    /// All known tags
    pub fn all() -> &'static [RendererTag] {
        &[
            RendererTag::Cycles,
            RendererTag::Prman,
            RendererTag::Arnold,
            RendererTag::Vray,
            RendererTag::Redshift,
        ]
    }

    /// Get display name for this renderer
    pub fn display_name(&self) -> &'static str {
        match self {
            RendererTag::Cycles => "Cycles",
            RendererTag::Prman => "RenderMan",
            RendererTag::Arnold => "Arnold",
            RendererTag::Vray => "V-Ray",
            RendererTag::Redshift => "Redshift",
        }
    }
}

impl std::fmt::Display for RendererTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_mapping() {
        assert_eq!(RendererTag::from_engine("CYCLES"), Some(RendererTag::Cycles));
        assert_eq!(RendererTag::from_engine("PRMAN_RENDER"), Some(RendererTag::Prman));
        assert_eq!(RendererTag::from_engine("BLENDER_EEVEE"), None);
    }
}
