// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node parameters: the non-socket attributes a node exposes (enums, toggles,
//! image references, curve mappings).

use serde::{Deserialize, Serialize};

/// Value of a node parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    /// Scalar
    Float(f32),
    /// Integer
    Int(i32),
    /// Toggle
    Bool(bool),
    /// Enumeration item identifier, e.g. `MULTIPLY`
    Enum(String),
    /// Free text
    String(String),
    /// 3D vector (translation, rotation, scale)
    Vector([f32; 3]),
    /// RGBA color
    Color([f32; 4]),
    /// Reference to an image datablock, by file path
    Image(Option<String>),
    /// Reference to another datablock (object, UV map), by name
    Pointer(Option<String>),
    /// Nested per-channel curve points
    Curve(CurveMapping),
}

impl ParamValue {
    /// Short name of the value's kind, for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
            Self::Enum(_) => "enum",
            Self::String(_) => "string",
            Self::Vector(_) => "vector",
            Self::Color(_) => "color",
            Self::Image(_) => "image",
            Self::Pointer(_) => "pointer",
            Self::Curve(_) => "curve",
        }
    }
}

/// A curve editor mapping, one point list per channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveMapping {
    /// Channels in editor order (R, G, B, C for color curves; X, Y, Z for vector curves)
    pub channels: Vec<CurveChannel>,
}

impl CurveMapping {
    /// Create a mapping with `count` identity channels
    pub fn identity(count: usize) -> Self {
        Self {
            channels: (0..count).map(|_| CurveChannel::identity()).collect(),
        }
    }
}

/// Control points of one curve channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveChannel {
    /// Control points as `[x, y]`
    pub points: Vec<[f32; 2]>,
}

impl CurveChannel {
    /// Straight line from (0, 0) to (1, 1)
    pub fn identity() -> Self {
        Self {
            points: vec![[0.0, 0.0], [1.0, 1.0]],
        }
    }
}
