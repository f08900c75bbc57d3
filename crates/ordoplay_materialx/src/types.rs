// SPDX-License-Identifier: MIT OR Apache-2.0
//! MaterialX data types and their mapping from host socket kinds.

use ordoplay_shader_graph::{ParamValue, SocketKind};
use std::fmt;

/// A MaterialX `type` attribute value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MtlxType {
    /// `float`
    Float,
    /// `integer`
    Integer,
    /// `boolean`
    Boolean,
    /// `vector2`
    Vector2,
    /// `vector3`
    Vector3,
    /// `vector4`
    Vector4,
    /// `color3`
    Color3,
    /// `color4`
    Color4,
    /// `string`
    String,
    /// `filename`
    Filename,
    /// `surfaceshader`
    SurfaceShader,
    /// `volumeshader`
    VolumeShader,
    /// `displacementshader`
    DisplacementShader,
    /// `multioutput`
    MultiOutput,
    /// Any type name this crate does not model
    Other(String),
}

impl MtlxType {
    /// Parse a `type` attribute
    pub fn parse(name: &str) -> Self {
        match name {
            "float" => Self::Float,
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            "vector2" => Self::Vector2,
            "vector3" => Self::Vector3,
            "vector4" => Self::Vector4,
            "color3" => Self::Color3,
            "color4" => Self::Color4,
            "string" => Self::String,
            "filename" => Self::Filename,
            "surfaceshader" => Self::SurfaceShader,
            "volumeshader" => Self::VolumeShader,
            "displacementshader" => Self::DisplacementShader,
            "multioutput" => Self::MultiOutput,
            other => Self::Other(other.to_string()),
        }
    }

    /// The attribute spelling
    pub fn as_str(&self) -> &str {
        match self {
            Self::Float => "float",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Vector2 => "vector2",
            Self::Vector3 => "vector3",
            Self::Vector4 => "vector4",
            Self::Color3 => "color3",
            Self::Color4 => "color4",
            Self::String => "string",
            Self::Filename => "filename",
            Self::SurfaceShader => "surfaceshader",
            Self::VolumeShader => "volumeshader",
            Self::DisplacementShader => "displacementshader",
            Self::MultiOutput => "multioutput",
            Self::Other(name) => name,
        }
    }

    /// Type used for a host socket of the given kind.
    ///
    /// Generic shader sockets map to `surfaceshader`; volume closures are
    /// distinguished by the adapter, not by the socket.
    pub fn from_socket_kind(kind: SocketKind) -> Self {
        match kind {
            SocketKind::Float => Self::Float,
            SocketKind::Vector3 => Self::Vector3,
            SocketKind::Color4 => Self::Color4,
            SocketKind::String => Self::String,
            SocketKind::Filename => Self::Filename,
            SocketKind::Shader => Self::SurfaceShader,
            SocketKind::MultiOutput => Self::MultiOutput,
        }
    }

    /// Type used for a host parameter value.
    ///
    /// Enumerations and datablock pointers degrade to `string`.
    pub fn from_param(value: &ParamValue) -> Self {
        match value {
            ParamValue::Float(_) => Self::Float,
            ParamValue::Int(_) => Self::Integer,
            ParamValue::Bool(_) => Self::Boolean,
            ParamValue::Vector(_) => Self::Vector3,
            ParamValue::Color(_) => Self::Color4,
            ParamValue::Image(_) => Self::Filename,
            ParamValue::Enum(_) | ParamValue::String(_) | ParamValue::Pointer(_) => Self::String,
            ParamValue::Curve(mapping) => match mapping.channels.len() {
                3 => Self::Vector3,
                _ => Self::Color4,
            },
        }
    }

    /// Whether this type carries a closure rather than data
    pub fn is_shader(&self) -> bool {
        matches!(
            self,
            Self::SurfaceShader | Self::VolumeShader | Self::DisplacementShader
        )
    }
}

impl fmt::Display for MtlxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordoplay_shader_graph::CurveMapping;

    #[test]
    fn test_parse_known_and_unknown() {
        assert_eq!(MtlxType::parse("color3"), MtlxType::Color3);
        assert_eq!(MtlxType::parse("matrix44").as_str(), "matrix44");
    }

    #[test]
    fn test_param_types() {
        assert_eq!(MtlxType::from_param(&ParamValue::Enum("GGX".into())), MtlxType::String);
        assert_eq!(MtlxType::from_param(&ParamValue::Bool(true)), MtlxType::Boolean);
        assert_eq!(MtlxType::from_param(&ParamValue::Image(None)), MtlxType::Filename);
        assert_eq!(
            MtlxType::from_param(&ParamValue::Curve(CurveMapping::identity(3))),
            MtlxType::Vector3
        );
    }
}
