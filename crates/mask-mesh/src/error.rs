//! Error types for mask mesh operations.
//!
//! Each error carries a machine-readable code in the format `MASK-XXXX`:
//! - `MASK-1xxx`: I/O errors (file reading, writing)
//! - `MASK-2xxx`: Topology errors (bad edges, bad indices)
//! - `MASK-4xxx`: Format errors (malformed project files)

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mask mesh operations.
pub type MaskResult<T> = Result<T, MaskError>;

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// MASK-1001: Failed to read file
    IoRead = 1001,
    /// MASK-1002: Failed to write file
    IoWrite = 1002,
    /// MASK-2001: Operation invoked on an edge absent from the mesh
    InvalidEdge = 2001,
    /// MASK-2002: Index dereference beyond sequence bounds
    OutOfRange = 2002,
    /// MASK-4001: Project file is malformed or has the wrong marker
    MalformedFile = 4001,
}

impl ErrorCode {
    /// Returns the error code as a string in the format `MASK-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::IoRead => "MASK-1001",
            ErrorCode::IoWrite => "MASK-1002",
            ErrorCode::InvalidEdge => "MASK-2001",
            ErrorCode::OutOfRange => "MASK-2002",
            ErrorCode::MalformedFile => "MASK-4001",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur while editing, loading, or exporting a mask mesh.
#[derive(Debug, Error, Diagnostic)]
pub enum MaskError {
    /// Error reading a project file.
    #[error("failed to read {path}")]
    #[diagnostic(
        code(mask::io::read),
        help("Check that the file exists and is readable")
    )]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a project or STL file.
    #[error("failed to write {path}")]
    #[diagnostic(
        code(mask::io::write),
        help("Check that the directory exists and is writable")
    )]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Project file could not be parsed or has the wrong application marker.
    #[error("malformed project file {path}: {details}")]
    #[diagnostic(
        code(mask::format::malformed),
        help("Only files written by this editor can be loaded; check the Application marker")
    )]
    MalformedFile { path: PathBuf, details: String },

    /// A split was requested on an edge that belongs to no triangle.
    /// This indicates a caller bug, not a valid mesh state.
    #[error("edge ({a}, {b}) is not part of any triangle")]
    #[diagnostic(
        code(mask::topology::invalid_edge),
        help("Split operations require an edge taken from an existing triangle")
    )]
    InvalidEdge { a: u32, b: u32 },

    /// A vertex or face index beyond the end of its sequence was dereferenced.
    #[error("index {index} is out of range: sequence has {count} entries")]
    #[diagnostic(code(mask::topology::out_of_range))]
    OutOfRange { index: usize, count: usize },
}

impl MaskError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MaskError::IoRead { .. } => ErrorCode::IoRead,
            MaskError::IoWrite { .. } => ErrorCode::IoWrite,
            MaskError::MalformedFile { .. } => ErrorCode::MalformedFile,
            MaskError::InvalidEdge { .. } => ErrorCode::InvalidEdge,
            MaskError::OutOfRange { .. } => ErrorCode::OutOfRange,
        }
    }

    /// Create an IoRead error.
    pub fn io_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MaskError::IoRead {
            path: path.into(),
            source,
        }
    }

    /// Create an IoWrite error.
    pub fn io_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MaskError::IoWrite {
            path: path.into(),
            source,
        }
    }

    /// Create a MalformedFile error.
    pub fn malformed_file(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        MaskError::MalformedFile {
            path: path.into(),
            details: details.into(),
        }
    }

    /// Create an InvalidEdge error.
    pub fn invalid_edge(a: u32, b: u32) -> Self {
        MaskError::InvalidEdge { a, b }
    }

    /// Create an OutOfRange error.
    pub fn out_of_range(index: usize, count: usize) -> Self {
        MaskError::OutOfRange { index, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = MaskError::invalid_edge(3, 7);
        assert_eq!(err.code(), ErrorCode::InvalidEdge);
        assert_eq!(err.code().as_str(), "MASK-2001");
    }

    #[test]
    fn test_error_display() {
        let err = MaskError::out_of_range(12, 4);
        let display = format!("{}", err);
        assert!(display.contains("index 12"));
        assert!(display.contains("4 entries"));
    }
}
