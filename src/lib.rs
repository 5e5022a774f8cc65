//! Imageref - container image reference resolution
//!
//! This crate decomposes user-typed image references (`repo`, `ns/repo:tag`,
//! `host:port/ns/repo`, ...) into registry host, namespace, repository and
//! tag, and derives the names used to match them against local images.

pub mod cli;
pub mod image;
pub mod storage;

use std::fmt;
use thiserror::Error;

/// Main error type for Imageref operations
#[derive(Error, Debug)]
pub enum ImageRefError {
    #[error("Invalid image reference {reference:?}: {reason}")]
    InvalidReference {
        reference: String,
        reason: InvalidReason,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image not found: {0}")]
    ImageNotFound(String),
}

impl ImageRefError {
    pub(crate) fn invalid(reference: &str, reason: InvalidReason) -> Self {
        Self::InvalidReference {
            reference: reference.to_string(),
            reason,
        }
    }

    /// Returns true if this error means the reference string itself is malformed
    pub fn is_invalid_reference(&self) -> bool {
        matches!(self, Self::InvalidReference { .. })
    }
}

/// Why a reference string could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Nothing left after trimming
    Empty,
    /// More than `host/namespace/repository`
    TooManySegments(usize),
    /// Repository name is empty after removing the tag
    EmptyRepository,
    /// A `:` was given with nothing after it
    EmptyTag,
    /// Host or namespace segment is empty (`/repo`, `a//b`)
    EmptySegment,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty reference"),
            Self::TooManySegments(n) => write!(f, "{} path segments, at most 3 allowed", n),
            Self::EmptyRepository => write!(f, "empty repository name"),
            Self::EmptyTag => write!(f, "empty tag"),
            Self::EmptySegment => write!(f, "empty path segment"),
        }
    }
}

pub type Result<T> = std::result::Result<T, ImageRefError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "imageref";
