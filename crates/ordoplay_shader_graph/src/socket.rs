// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket definitions for node inputs/outputs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocketId(pub Uuid);

impl SocketId {
    /// Create a new random socket ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SocketId {
    fn default() -> Self {
        Self::new()
    }
}

/// Socket direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocketDirection {
    /// Input socket
    Input,
    /// Output socket
    Output,
}

/// Kind of data that flows through a socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketKind {
    /// Scalar value
    Float,
    /// 3D vector
    Vector3,
    /// RGBA color
    Color4,
    /// Text value
    String,
    /// Path to an external file
    Filename,
    /// Shader closure (BSDF, emission, volume)
    Shader,
    /// Marker for sockets standing in for several outputs
    MultiOutput,
}

impl SocketKind {
    /// Check if this kind can feed a socket of another kind
    pub fn can_connect_to(&self, other: &SocketKind) -> bool {
        if self == other {
            return true;
        }

        match (self, other) {
            // Shader closures only flow into shader sockets
            (Self::Shader, _) | (_, Self::Shader) => false,
            (Self::MultiOutput, _) | (_, Self::MultiOutput) => true,
            // Implicit numeric conversions
            (Self::Float | Self::Vector3 | Self::Color4, Self::Float | Self::Vector3 | Self::Color4) => true,
            (Self::String | Self::Filename, Self::String | Self::Filename) => true,
            _ => false,
        }
    }

    /// Whether sockets of this kind hold an editable default value
    pub fn has_value(&self) -> bool {
        !matches!(self, Self::Shader | Self::MultiOutput)
    }
}

/// A socket on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Socket {
    /// Unique socket ID
    pub id: SocketId,
    /// Display name, e.g. `Base Color`
    pub name: String,
    /// Socket direction
    pub direction: SocketDirection,
    /// Data kind
    pub kind: SocketKind,
    /// Default value (unlinked inputs, constant outputs)
    pub default_value: Option<SocketValue>,
    /// Document-wide unique MaterialX name, assigned during a write pass
    #[serde(default)]
    pub mtlx_name: String,
}

impl Socket {
    /// Create a new input socket
    pub fn input(name: impl Into<String>, kind: SocketKind) -> Self {
        Self::new(name, kind, SocketDirection::Input)
    }

    /// Create a new output socket
    pub fn output(name: impl Into<String>, kind: SocketKind) -> Self {
        Self::new(name, kind, SocketDirection::Output)
    }

    fn new(name: impl Into<String>, kind: SocketKind, direction: SocketDirection) -> Self {
        Self {
            id: SocketId::new(),
            name: name.into(),
            direction,
            kind,
            default_value: None,
            mtlx_name: String::new(),
        }
    }

    /// Set the default value
    pub fn with_default(mut self, value: SocketValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Check if a connection from this socket to another is valid
    pub fn can_connect(&self, other: &Socket) -> bool {
        if self.direction == other.direction {
            return false;
        }

        self.kind.can_connect_to(&other.kind)
    }

    /// Give this socket fresh identity, used when a node is created from a template
    pub(crate) fn regenerate_id(&mut self) {
        self.id = SocketId::new();
    }
}

/// Value stored in a socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SocketValue {
    /// Scalar
    Float(f32),
    /// 3D vector
    Vector([f32; 3]),
    /// RGBA color
    Color([f32; 4]),
    /// Text or file path
    String(String),
}

impl SocketValue {
    /// Components of a numeric value, empty for strings
    pub fn components(&self) -> &[f32] {
        match self {
            Self::Float(v) => std::slice::from_ref(v),
            Self::Vector(v) => v,
            Self::Color(v) => v,
            Self::String(_) => &[],
        }
    }

    /// Mutable access to one numeric component
    pub fn component_mut(&mut self, index: usize) -> Option<&mut f32> {
        match self {
            Self::Float(v) => (index == 0).then_some(v),
            Self::Vector(v) => v.get_mut(index),
            Self::Color(v) => v.get_mut(index),
            Self::String(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_sockets_only_accept_shaders() {
        let bsdf = Socket::output("BSDF", SocketKind::Shader);
        let surface = Socket::input("Surface", SocketKind::Shader);
        let color = Socket::input("Color", SocketKind::Color4);

        assert!(bsdf.can_connect(&surface));
        assert!(!bsdf.can_connect(&color));
    }

    #[test]
    fn test_numeric_conversion() {
        let value = Socket::output("Value", SocketKind::Float);
        let color = Socket::input("Color", SocketKind::Color4);
        assert!(value.can_connect(&color));
        assert!(!value.can_connect(&Socket::output("Other", SocketKind::Float)));
    }

    #[test]
    fn test_component_access() {
        let mut value = SocketValue::Color([0.1, 0.2, 0.3, 1.0]);
        *value.component_mut(2).unwrap() = 0.9;
        assert_eq!(value.components(), &[0.1, 0.2, 0.9, 1.0]);
        assert!(value.component_mut(4).is_none());
    }
}
