use std::path::PathBuf;

use msbuild_xml::{ParseError, WriteError};
use thiserror::Error;

/// Failures that abort a conversion run.
///
/// Malformed project lines and unsupported project extensions are not
/// errors: those entries are passed through verbatim.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unsupported target format '{0}'; expected one of 2005, 2008, 2010, 2012")]
    UnsupportedFormat(String),
    #[error("solution file not found: {}", .0.display())]
    SolutionNotFound(PathBuf),
    #[error("invalid project file {}: {reason}", path.display())]
    InvalidProjectFile { path: PathBuf, reason: String },
    #[error("failed to parse project file {}: {source}", path.display())]
    ProjectXml {
        path: PathBuf,
        source: ParseError,
    },
    #[error("failed to write project file {}: {source}", path.display())]
    ProjectWrite {
        path: PathBuf,
        source: WriteError,
    },
    #[error("failed to {action} {}: {source}", path.display())]
    FileSystem {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ConvertError {
    pub(crate) fn fs(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
