//! Error types for the Circuitlab engine.
//!
//! This module provides a unified error type [`LabError`] covering layout
//! parsing, workbench edits, and the CLI/WASM front ends. Incomplete or open
//! circuits are never errors; they are reported through
//! [`SimulationStatus`](crate::circuit::SimulationStatus).

use thiserror::Error;

/// Result type alias using [`LabError`].
pub type Result<T> = std::result::Result<T, LabError>;

/// Unified error type for all Circuitlab operations.
#[derive(Error, Debug)]
pub enum LabError {
    // ============ Layout Parsing Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Invalid component definition
    #[error("Invalid component '{name}' at line {line}: {message}")]
    InvalidComponent {
        name: String,
        line: usize,
        message: String,
    },

    /// Unknown component kind
    #[error("Unknown component kind '{kind}' at line {line}")]
    UnknownComponentKind { kind: String, line: usize },

    /// Unknown palette item in a challenge requirement
    #[error("Unknown palette item '{item}'")]
    UnknownPaletteItem { item: String },

    /// Duplicate component id
    #[error("Duplicate component id '{id}'")]
    DuplicateComponent { id: String },

    /// Rotation other than 0 or 90 degrees
    #[error("Invalid rotation {degrees} (only 0 and 90 degrees are supported)")]
    InvalidRotation { degrees: i64 },

    /// Invalid parameter value
    #[error("Invalid parameter '{param}' for component '{component}': {message}")]
    InvalidParameter {
        component: String,
        param: String,
        message: String,
    },

    // ============ Workbench Errors ============
    /// Component not registered on the workbench
    #[error("Component '{id}' not found on the workbench")]
    ComponentNotFound { id: String },

    /// Operation requires a different component kind
    #[error("Component '{id}' is a {actual}, expected a {expected}")]
    WrongKind {
        id: String,
        expected: String,
        actual: String,
    },

    /// Layout edits are blocked while continuous simulation runs
    #[error("Cannot {action} '{id}' while continuous simulation is running")]
    SimulationRunning { action: String, id: String },

    /// Switches can only be flipped while continuous simulation runs
    #[error("Switch '{id}' can only be toggled while continuous simulation is running")]
    SimulationStopped { id: String },

    // ============ I/O Errors ============
    /// Error reading a layout file
    #[error("Failed to read layout file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl LabError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid component error
    pub fn invalid_component(name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::InvalidComponent {
            name: name.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a component-not-found error
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        Self::ComponentNotFound { id: id.to_string() }
    }
}
