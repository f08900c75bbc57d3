// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for MaterialX translation.

use std::path::PathBuf;

/// Errors from the MaterialX document model and its XML form
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// A child with this name already exists under the same parent
    #[error("Duplicate {kind} '{name}'")]
    Duplicate {
        /// Element kind, e.g. `nodedef`
        kind: &'static str,
        /// Offending name
        name: String,
    },

    /// Malformed XML
    #[error("XML error: {0}")]
    Xml(String),

    /// A required attribute is absent
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        /// Element tag
        element: String,
        /// Attribute name
        attribute: &'static str,
    },

    /// The document root is not `<materialx>`
    #[error("Expected <materialx> root element, found <{0}>")]
    UnexpectedRoot(String),

    /// File IO failed
    #[error("IO error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

/// Errors from decoding MaterialX value strings
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    /// A component is not a number
    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    /// The value string has no components
    #[error("Empty value string")]
    Empty,
}

/// Fatal errors of a write or read pass
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// The host graph has no output node to anchor the document
    #[error("Material '{0}' has no active output node")]
    NoActiveOutput(String),

    /// The document holds no material with this name
    #[error("Document has no material named '{0}'")]
    MaterialNotInDocument(String),

    /// The host library holds no material with this name
    #[error("No host material named '{0}'")]
    MaterialNotFound(String),

    /// The host catalog lacks the material output node type
    #[error("Node catalog has no '{0}' node type")]
    MissingTerminalType(&'static str),

    /// A write step ran before `init_network`
    #[error("Network is not initialized")]
    NotInitialized,

    /// The material has no file path configured for this pass
    #[error("Material '{material}' has no {which} path")]
    MissingPath {
        /// Material name
        material: String,
        /// `write` or `read`
        which: &'static str,
    },

    /// Document error
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;
