// SPDX-License-Identifier: MIT OR Apache-2.0
//! Conversion between host socket/parameter values and MaterialX value strings.
//!
//! Numbers are written locale-independently with a decimal point, vectors and
//! colors as comma-joined components, booleans as `true`/`false`. An empty
//! filename means "unset" and is never written.

use crate::error::CodecError;
use ordoplay_shader_graph::{CurveMapping, ParamValue, Socket, SocketKind, SocketValue};

/// Separator between components of a vector or color value
pub const COMPONENT_SEPARATOR: &str = ", ";

/// Format a float with a guaranteed decimal point (`1` becomes `1.0`)
pub fn format_float(value: f32) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains(['.', 'e', 'E']) {
        format!("{text}.0")
    } else {
        text
    }
}

fn join(components: &[f32]) -> String {
    components
        .iter()
        .map(|c| format_float(*c))
        .collect::<Vec<_>>()
        .join(COMPONENT_SEPARATOR)
}

/// Encode a socket value
pub fn encode_socket_value(value: &SocketValue) -> String {
    match value {
        SocketValue::Float(v) => format_float(*v),
        SocketValue::Vector(v) => join(v),
        SocketValue::Color(v) => join(v),
        SocketValue::String(s) => s.clone(),
    }
}

/// Encode a parameter value.
///
/// Returns `None` for an image parameter without a file path; the caller
/// skips the parameter.
pub fn encode_param(name: &str, value: &ParamValue) -> Option<String> {
    match value {
        ParamValue::Float(v) => Some(format_float(*v)),
        ParamValue::Int(v) => Some(v.to_string()),
        ParamValue::Bool(v) => Some(v.to_string()),
        ParamValue::Enum(s) | ParamValue::String(s) => Some(s.clone()),
        ParamValue::Vector(v) => Some(join(v)),
        ParamValue::Color(v) => Some(join(v)),
        ParamValue::Pointer(target) => Some(target.clone().unwrap_or_default()),
        ParamValue::Image(path) => match path.as_deref() {
            Some(path) if !path.is_empty() => Some(path.to_string()),
            _ => {
                tracing::warn!(param = name, "Image parameter has no file, skipping");
                None
            }
        },
        ParamValue::Curve(mapping) => Some(join(&curve_components(name, mapping))),
    }
}

/// First control point output of each curve channel.
///
/// Only one point per channel survives translation, and of that point only
/// its output value (y) is written; the input location (x) is dropped, so a
/// curve reads back as flat at its first output. Dropped points are
/// reported.
pub fn curve_components(name: &str, mapping: &CurveMapping) -> Vec<f32> {
    let dropped: usize = mapping
        .channels
        .iter()
        .map(|c| c.points.len().saturating_sub(1))
        .sum();
    if dropped > 0 {
        tracing::warn!(
            param = name,
            dropped,
            "Curve mapping keeps only the first control point of each channel"
        );
    }

    mapping
        .channels
        .iter()
        .map(|c| c.points.first().map_or(0.0, |p| p[1]))
        .collect()
}

/// Split a value string into numeric components
pub fn decode_components(text: &str) -> Result<Vec<f32>, CodecError> {
    if text.trim().is_empty() {
        return Err(CodecError::Empty);
    }

    text.split(',')
        .map(str::trim)
        .map(|c| {
            c.parse::<f32>()
                .map_err(|_| CodecError::InvalidNumber(c.to_string()))
        })
        .collect()
}

/// Decode a boolean: `true`, or any non-zero number
pub fn decode_bool(text: &str) -> bool {
    let text = text.trim();
    text.eq_ignore_ascii_case("true") || text.parse::<f64>().is_ok_and(|v| v != 0.0)
}

fn empty_value(kind: SocketKind) -> Option<SocketValue> {
    match kind {
        SocketKind::Float => Some(SocketValue::Float(0.0)),
        SocketKind::Vector3 => Some(SocketValue::Vector([0.0; 3])),
        SocketKind::Color4 => Some(SocketValue::Color([0.0, 0.0, 0.0, 1.0])),
        SocketKind::String | SocketKind::Filename => Some(SocketValue::String(String::new())),
        SocketKind::Shader | SocketKind::MultiOutput => None,
    }
}

/// Write a decoded value into a socket's default value.
///
/// Components are applied one by one; components past the end of the
/// destination are logged and dropped. Returns the number of components
/// applied.
pub fn apply_socket_value(socket: &mut Socket, text: &str) -> Result<usize, CodecError> {
    if socket.default_value.is_none() {
        socket.default_value = empty_value(socket.kind);
    }
    let Some(value) = socket.default_value.as_mut() else {
        return Ok(0);
    };

    if let SocketValue::String(s) = value {
        *s = text.to_string();
        return Ok(1);
    }

    let components = decode_components(text)?;
    Ok(apply_components(value_slots(value), &components, &socket.name))
}

fn value_slots(value: &mut SocketValue) -> Vec<&mut f32> {
    let count = value.components().len();
    let mut slots = Vec::with_capacity(count);
    match value {
        SocketValue::Float(v) => slots.push(v),
        SocketValue::Vector(v) => slots.extend(v.iter_mut()),
        SocketValue::Color(v) => slots.extend(v.iter_mut()),
        SocketValue::String(_) => {}
    }
    slots
}

fn apply_components(mut slots: Vec<&mut f32>, components: &[f32], target: &str) -> usize {
    let mut applied = 0;
    for (index, component) in components.iter().enumerate() {
        match slots.get_mut(index) {
            Some(slot) => {
                **slot = *component;
                applied += 1;
            }
            None => tracing::debug!(
                target_name = target,
                index,
                "Value component out of range, dropped"
            ),
        }
    }
    applied
}

/// Write a decoded value into a host parameter, keeping its kind.
///
/// Returns false when nothing was applied (an empty filename).
pub fn apply_param_value(name: &str, param: &mut ParamValue, text: &str) -> Result<bool, CodecError> {
    match param {
        ParamValue::Float(v) => {
            *v = first_component(text)?;
        }
        ParamValue::Int(v) => {
            *v = match text.trim().parse::<i32>() {
                Ok(parsed) => parsed,
                Err(_) => integer_component(name, text)?,
            };
        }
        ParamValue::Bool(v) => *v = decode_bool(text),
        ParamValue::Enum(s) | ParamValue::String(s) => *s = text.to_string(),
        ParamValue::Pointer(target) => {
            *target = (!text.is_empty()).then(|| text.to_string());
        }
        ParamValue::Image(path) => {
            if text.is_empty() {
                tracing::warn!(param = name, "Empty filename, image left unset");
                return Ok(false);
            }
            tracing::info!(param = name, file = text, "Restoring external image reference");
            *path = Some(text.to_string());
        }
        ParamValue::Vector(v) => {
            let components = decode_components(text)?;
            apply_components(v.iter_mut().collect(), &components, name);
        }
        ParamValue::Color(v) => {
            let components = decode_components(text)?;
            apply_components(v.iter_mut().collect(), &components, name);
        }
        ParamValue::Curve(mapping) => {
            let components = decode_components(text)?;
            let slots = mapping
                .channels
                .iter_mut()
                .filter_map(|c| c.points.first_mut().map(|p| &mut p[1]))
                .collect();
            apply_components(slots, &components, name);
        }
    }
    Ok(true)
}

fn first_component(text: &str) -> Result<f32, CodecError> {
    decode_components(text)?
        .first()
        .copied()
        .ok_or(CodecError::Empty)
}

/// Integer from a decimal string; fractions are rounded with a warning,
/// non-finite values are rejected
fn integer_component(name: &str, text: &str) -> Result<i32, CodecError> {
    let value = first_component(text)?;
    if !value.is_finite() {
        return Err(CodecError::InvalidNumber(text.trim().to_string()));
    }
    let rounded = value.round();
    if rounded != value {
        tracing::warn!(param = name, value, rounded, "Fractional value for an integer parameter, rounded");
    }
    Ok(rounded as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordoplay_shader_graph::CurveChannel;

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(0.25), "0.25");
        assert_eq!(format_float(-3.0), "-3.0");
    }

    #[test]
    fn test_encode_socket_values() {
        assert_eq!(encode_socket_value(&SocketValue::Float(0.5)), "0.5");
        assert_eq!(
            encode_socket_value(&SocketValue::Color([1.0, 0.5, 0.0, 1.0])),
            "1.0, 0.5, 0.0, 1.0"
        );
    }

    #[test]
    fn test_encode_params() {
        assert_eq!(encode_param("use_clamp", &ParamValue::Bool(true)).as_deref(), Some("true"));
        assert_eq!(encode_param("blend_type", &ParamValue::Enum("MIX".into())).as_deref(), Some("MIX"));
        assert_eq!(encode_param("image", &ParamValue::Image(None)), None);
        assert_eq!(encode_param("image", &ParamValue::Image(Some(String::new()))), None);
        assert_eq!(
            encode_param("image", &ParamValue::Image(Some("tex/brick.png".into()))).as_deref(),
            Some("tex/brick.png")
        );
    }

    #[test]
    fn test_curve_first_point_per_channel() {
        let mapping = CurveMapping {
            channels: vec![
                CurveChannel { points: vec![[0.0, 0.1], [1.0, 1.0]] },
                CurveChannel { points: vec![[0.0, 0.2]] },
                CurveChannel { points: vec![] },
            ],
        };
        assert_eq!(curve_components("mapping", &mapping), vec![0.1, 0.2, 0.0]);
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode_components("0.1, 0.2,0.3").unwrap(), vec![0.1, 0.2, 0.3]);
        assert_eq!(decode_components(""), Err(CodecError::Empty));
        assert!(matches!(decode_components("1.0, x"), Err(CodecError::InvalidNumber(_))));
        assert!(decode_bool("true"));
        assert!(decode_bool("1"));
        assert!(!decode_bool("0"));
        assert!(!decode_bool("false"));
    }

    #[test]
    fn test_apply_socket_value_drops_extra_components() {
        let mut socket = Socket::input("Normal", SocketKind::Vector3)
            .with_default(SocketValue::Vector([0.0; 3]));
        let applied = apply_socket_value(&mut socket, "1.0, 2.0, 3.0, 4.0").unwrap();
        assert_eq!(applied, 3);
        assert_eq!(socket.default_value, Some(SocketValue::Vector([1.0, 2.0, 3.0])));
    }

    #[test]
    fn test_apply_socket_value_partial_color() {
        let mut socket = Socket::input("Color", SocketKind::Color4)
            .with_default(SocketValue::Color([0.0, 0.0, 0.0, 0.5]));
        apply_socket_value(&mut socket, "0.2, 0.4, 0.6").unwrap();
        assert_eq!(socket.default_value, Some(SocketValue::Color([0.2, 0.4, 0.6, 0.5])));
    }

    #[test]
    fn test_apply_param_values() {
        let mut clamp = ParamValue::Bool(false);
        assert!(apply_param_value("use_clamp", &mut clamp, "true").unwrap());
        assert_eq!(clamp, ParamValue::Bool(true));

        let mut image = ParamValue::Image(None);
        assert!(!apply_param_value("image", &mut image, "").unwrap());
        assert_eq!(image, ParamValue::Image(None));

        let mut mode = ParamValue::Int(0);
        apply_param_value("mode", &mut mode, "2").unwrap();
        assert_eq!(mode, ParamValue::Int(2));
    }

    #[test]
    fn test_integer_parameter_from_decimal() {
        let mut mode = ParamValue::Int(0);
        apply_param_value("mode", &mut mode, "2.7").unwrap();
        assert_eq!(mode, ParamValue::Int(3));

        apply_param_value("mode", &mut mode, "4.0").unwrap();
        assert_eq!(mode, ParamValue::Int(4));

        assert!(matches!(
            apply_param_value("mode", &mut mode, "NaN"),
            Err(CodecError::InvalidNumber(_))
        ));
        assert_eq!(mode, ParamValue::Int(4));
    }
}
