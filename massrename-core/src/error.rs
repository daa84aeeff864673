use std::path::PathBuf;
use thiserror::Error;

/// Failure kinds of a rename job.
///
/// A job with no source files is not an error; see [`crate::job::JobOutcome::NothingToDeliver`].
#[derive(Error, Debug)]
pub enum RenameError {
    #[error("failed to parse mapping spreadsheet {}: {source}", path.display())]
    MappingParse {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("mapping spreadsheet {} has no sheet named '{sheet}'", path.display())]
    SheetNotFound { path: PathBuf, sheet: String },

    #[error("'{name}' would be produced by both '{first}' and '{second}'")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("failed to build archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("failed to deliver archive to {}: {source}", path.display())]
    Delivery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source path has no usable file name: {}", .0.display())]
    InvalidFileName(PathBuf),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenameError>;
