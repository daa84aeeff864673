//! massrename-core: spreadsheet-driven bulk renaming
//!
//! Reads a name/extension mapping from a spreadsheet, resolves a new name for
//! every source file and packages the renamed contents into one zip archive.

pub mod archive;
pub mod config;
pub mod error;
pub mod job;
pub mod mapping;
pub mod reader;
pub mod resolver;
pub mod template;

pub use archive::{ArchiveEntry, ArchiveJob};
pub use config::{CollisionPolicy, Compression, RenameConfig};
pub use error::RenameError;
pub use job::{ArchiveSink, DirectorySink, FileSink, JobOutcome, JobState, PlannedRename, RenameJob};
pub use mapping::{MappingEntry, MappingTable};
pub use reader::{CellValue, TabularDataset, read_dataset};
pub use resolver::{RenamePlan, SourceFile, resolve};
