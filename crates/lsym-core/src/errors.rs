//! Structured error types shared across the lattice symmetry crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`LsError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (site counts, sectors, indices, ...).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for group construction and symmetry handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum LsError {
    /// Generators imply contradictory phases, or a phase cannot be realised at the
    /// structural order of its permutation.
    #[error("incompatible symmetries: {0}")]
    IncompatibleSymmetries(ErrorInfo),
    /// A number of sites outside `1..=512` was requested.
    #[error("invalid number of sites: {0}")]
    InvalidNumberOfSites(ErrorInfo),
    /// A permutation is not a bijection on its site indices.
    #[error("invalid permutation: {0}")]
    InvalidPermutation(ErrorInfo),
    /// A symmetry sector is outside `0..periodicity`.
    #[error("invalid sector: {0}")]
    InvalidSector(ErrorInfo),
    /// A spin configuration does not fit the number of sites.
    #[error("invalid state: {0}")]
    InvalidState(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Allocation or invariant-check failures.
    #[error("system error: {0}")]
    System(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl LsError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            LsError::IncompatibleSymmetries(info)
            | LsError::InvalidNumberOfSites(info)
            | LsError::InvalidPermutation(info)
            | LsError::InvalidSector(info)
            | LsError::InvalidState(info)
            | LsError::Serde(info)
            | LsError::System(info) => info,
        }
    }

    /// Shorthand for an [`LsError::IncompatibleSymmetries`] with the given code and message.
    pub fn incompatible(code: &str, message: impl Into<String>) -> Self {
        LsError::IncompatibleSymmetries(ErrorInfo::new(code, message))
    }
}
