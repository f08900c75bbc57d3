// SPDX-License-Identifier: MIT OR Apache-2.0
//! Name resolution between host node/socket names and MaterialX identifiers.
//!
//! All functions are pure. `to_canonical` and `from_canonical` form a lossy
//! pair: canonical names drop case, and only the tokens listed in
//! [`ACRONYMS`] and [`FAMILY_MARKERS`] regain it on the way back.

use regex::Regex;
use std::sync::OnceLock;

/// Separator between a base name and its uniqueness suffix
pub const SUFFIX_SEPARATOR: char = '.';

/// Tokens rendered fully upper-case by [`from_canonical`]
pub const ACRONYMS: &[&str] = &["ior", "rgb", "hsv", "xyz", "uv", "bw", "ao"];

/// Shader-family markers; a token containing one is upper-cased as a whole
pub const FAMILY_MARKERS: &[&str] = &["bsdf", "bssrdf", "bxdf"];

static WORD_BOUNDARY: OnceLock<Regex> = OnceLock::new();
static CASE_BOUNDARY: OnceLock<Regex> = OnceLock::new();

/// Lowercase and replace spaces with underscores.
///
/// `"Base Color"` becomes `"base_color"`.
pub fn to_canonical(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Turn a canonical name back into a display name.
///
/// Underscores become spaces and each word is title-cased, except for the
/// acronym and shader-family tables. A uniqueness suffix is kept as is.
pub fn from_canonical(name: &str) -> String {
    let (base, suffix) = split_suffix(name);
    let display = base
        .split('_')
        .filter(|token| !token.is_empty())
        .map(display_token)
        .collect::<Vec<_>>()
        .join(" ");

    match suffix {
        Some(suffix) => format!("{display}{SUFFIX_SEPARATOR}{suffix}"),
        None => display,
    }
}

fn display_token(token: &str) -> String {
    let lower = token.to_lowercase();
    if ACRONYMS.contains(&lower.as_str())
        || FAMILY_MARKERS.iter().any(|marker| lower.contains(marker))
    {
        return lower.to_uppercase();
    }

    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Append or bump the zero-padded numeric suffix.
///
/// `"rgb"` becomes `"rgb.001"`, `"rgb.009"` becomes `"rgb.010"`, and
/// suffixes grow past three digits without truncation. A suffix that is not
/// a number is replaced.
pub fn increment(name: &str) -> String {
    let (base, suffix) = split_suffix(name);
    let index = suffix.and_then(|s| s.parse::<u64>().ok()).unwrap_or(0) + 1;
    format!("{base}{SUFFIX_SEPARATOR}{}", pad_index(index))
}

/// Remove the uniqueness suffix: everything from the first separator on
pub fn strip_suffix(name: &str) -> &str {
    split_suffix(name).0
}

/// Zero-pad an index to at least three digits
pub fn pad_index(index: u64) -> String {
    format!("{index:03}")
}

/// Insert underscores at case boundaries and lowercase.
///
/// Handles both `aB` (`diffuseColor`) and `ABc` (`HTTPResponse`) boundaries.
pub fn camel_to_snake(name: &str) -> String {
    let word = WORD_BOUNDARY
        .get_or_init(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("literal pattern"));
    let case = CASE_BOUNDARY
        .get_or_init(|| Regex::new(r"([a-z0-9])([A-Z])").expect("literal pattern"));

    let first = word.replace_all(name, "${1}_${2}");
    case.replace_all(&first, "${1}_${2}").to_lowercase()
}

fn split_suffix(name: &str) -> (&str, Option<&str>) {
    match name.split_once(SUFFIX_SEPARATOR) {
        Some((base, suffix)) => (base, Some(suffix)),
        None => (name, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_canonical() {
        assert_eq!(to_canonical("Base Color"), "base_color");
        assert_eq!(to_canonical("Diffuse BSDF.001"), "diffuse_bsdf.001");
    }

    #[test]
    fn test_from_canonical_tables() {
        assert_eq!(from_canonical("base_color"), "Base Color");
        assert_eq!(from_canonical("ior"), "IOR");
        assert_eq!(from_canonical("diffuse_bsdf"), "Diffuse BSDF");
        assert_eq!(from_canonical("subsurface_bssrdf.002"), "Subsurface BSSRDF.002");
    }

    #[test]
    fn test_canonical_pair_keeps_words() {
        for name in ["Base Color", "IOR", "Diffuse BSDF", "Clearcoat Roughness", "Fac"] {
            assert_eq!(
                to_canonical(&from_canonical(&to_canonical(name))),
                to_canonical(name)
            );
        }
        assert_eq!(from_canonical(&to_canonical("Diffuse BSDF")), "Diffuse BSDF");
    }

    #[test]
    fn test_increment() {
        assert_eq!(increment("rgb"), "rgb.001");
        assert_eq!(increment("rgb.001"), "rgb.002");
        assert_eq!(increment("rgb.099"), "rgb.100");
        assert_eq!(increment("rgb.999"), "rgb.1000");
        assert_eq!(increment("rgb.abc"), "rgb.001");
    }

    #[test]
    fn test_strip_suffix_inverts_increment() {
        for name in ["rgb", "rgb.007", "diffuse_bsdf.123", "a.b.c", ""] {
            assert_eq!(strip_suffix(&increment(name)), strip_suffix(name));
        }
    }

    #[test]
    fn test_camel_to_snake() {
        assert_eq!(camel_to_snake("PxrDiffuse"), "pxr_diffuse");
        assert_eq!(camel_to_snake("diffuseColor"), "diffuse_color");
        assert_eq!(camel_to_snake("getHTTPResponseCode"), "get_http_response_code");
        assert_eq!(camel_to_snake("PxrToFloat3"), "pxr_to_float3");
    }
}
