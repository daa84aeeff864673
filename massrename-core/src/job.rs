//! Rename job orchestration: mapping, resolution, archive, delivery

use rayon::prelude::*;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

use crate::archive::{ArchiveEntry, ArchiveJob};
use crate::config::RenameConfig;
use crate::error::{RenameError, Result};
use crate::mapping::MappingTable;
use crate::reader::{self, TabularDataset};
use crate::resolver::{self, RenamePlan, SourceFile};

/// Lifecycle of a rename job.
///
/// `Running`, `Delivered` and `Failed` only exist inside [`RenameJob::run`],
/// which always resets to `Idle` before returning. The terminal state of the
/// most recent run is kept in [`RenameJob::last_run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobState {
    /// Nothing loaded
    Idle,
    /// A mapping or prefix is set but no files are loaded yet
    Configuring,
    /// Files are loaded; the job can run
    Ready,
    Running,
    Delivered,
    Failed,
}

/// Terminal result of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum JobOutcome {
    /// No source files were loaded, so nothing was archived
    NothingToDeliver,
    Delivered {
        /// Where the sink put the archive
        location: PathBuf,
        entries: usize,
        bytes: usize,
    },
}

/// One planned rename, as reported by [`RenameJob::plan`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedRename {
    pub source_name: String,
    pub emitted_name: String,
}

/// Receives the finished archive and decides where it goes.
pub trait ArchiveSink {
    fn deliver(&mut self, archive: Vec<u8>) -> Result<PathBuf>;
}

/// Suffixed names tried when `<stem>-<millis>.zip` is already taken
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Writes `<stem>-<unix millis>.zip` into a directory.
///
/// Existing files are never replaced; a taken name gets a `-1`, `-2`, ...
/// suffix instead.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    pub dir: PathBuf,
    pub stem: String,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
        }
    }

    pub fn file_name(&self, millis: i64, attempt: u32) -> String {
        if attempt == 0 {
            format!("{}-{}.zip", self.stem, millis)
        } else {
            format!("{}-{}-{}.zip", self.stem, millis, attempt)
        }
    }

    fn deliver_at(&self, archive: &[u8], millis: i64) -> Result<PathBuf> {
        let mut staged = stage_archive(&self.dir, archive)?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self.dir.join(self.file_name(millis, attempt));
            match staged.persist_noclobber(&path) {
                Ok(_) => return Ok(path),
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                    debug!(target: "massrename", event = "archive_name_taken", path = %path.display());
                    staged = err.file;
                }
                Err(err) => return Err(delivery_error(&path, err.error)),
            }
        }

        Err(delivery_error(
            &self.dir,
            io::Error::new(io::ErrorKind::AlreadyExists, "no free archive name"),
        ))
    }
}

impl ArchiveSink for DirectorySink {
    fn deliver(&mut self, archive: Vec<u8>) -> Result<PathBuf> {
        self.deliver_at(&archive, chrono::Utc::now().timestamp_millis())
    }
}

/// Writes the archive to one fixed path, replacing any file already there
#[derive(Debug, Clone)]
pub struct FileSink {
    pub path: PathBuf,
}

impl ArchiveSink for FileSink {
    fn deliver(&mut self, archive: Vec<u8>) -> Result<PathBuf> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let staged = stage_archive(dir, &archive)?;
        staged
            .persist(&self.path)
            .map_err(|err| delivery_error(&self.path, err.error))?;
        Ok(self.path.clone())
    }
}

/// Write the archive to a temporary file in `dir`.
///
/// The caller renames it into place, so the final path only ever holds a
/// complete archive. Dropping the result removes the temporary file.
fn stage_archive(dir: &Path, archive: &[u8]) -> Result<NamedTempFile> {
    let mut staged = NamedTempFile::new_in(dir).map_err(|err| delivery_error(dir, err))?;
    staged
        .write_all(archive)
        .and_then(|_| staged.as_file().sync_all())
        .map_err(|err| delivery_error(staged.path(), err))?;
    Ok(staged)
}

fn delivery_error(path: &Path, source: io::Error) -> RenameError {
    RenameError::Delivery {
        path: path.to_path_buf(),
        source,
    }
}

/// A single rename job.
///
/// Inputs are loaded step by step, then [`RenameJob::run`] resolves every
/// file, builds the archive and hands it to a sink. Whatever the result, the
/// job is reset to [`JobState::Idle`] afterwards, so each loaded set of
/// inputs runs at most once.
///
/// The prefix starts at `config.prefix` and goes back to it on reset.
#[derive(Debug)]
pub struct RenameJob {
    config: RenameConfig,
    prefix: String,
    mapping: Option<MappingTable>,
    files: Vec<SourceFile>,
    state: JobState,
    last_run: Option<JobState>,
}

impl RenameJob {
    pub fn new(config: RenameConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            config,
            mapping: None,
            files: Vec::new(),
            state: JobState::Idle,
            last_run: None,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// `Delivered` or `Failed` for the most recent run that had files,
    /// `None` before the first one
    pub fn last_run(&self) -> Option<JobState> {
        self.last_run
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn config(&self) -> &RenameConfig {
        &self.config
    }

    pub fn mapping(&self) -> Option<&MappingTable> {
        self.mapping.as_ref()
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
        self.advance();
    }

    /// Build the mapping table from an already parsed dataset
    pub fn load_dataset(&mut self, dataset: &TabularDataset) {
        let table = MappingTable::from_dataset(dataset);
        info!(target: "massrename", event = "mapping_loaded", entries = table.len());
        self.mapping = Some(table);
        self.advance();
    }

    /// Parse a mapping spreadsheet and build the mapping table.
    ///
    /// On failure the previously loaded mapping, if any, is left untouched.
    pub fn load_mapping_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let dataset = reader::read_dataset(path.as_ref(), self.config.sheet.as_deref())?;
        self.load_dataset(&dataset);
        Ok(())
    }

    pub fn add_file(&mut self, file: SourceFile) {
        self.files.push(file);
        self.advance();
    }

    pub fn add_files<I: IntoIterator<Item = SourceFile>>(&mut self, files: I) {
        self.files.extend(files);
        self.advance();
    }

    /// Read source files from disk, in the given order
    pub fn add_paths<I, P>(&mut self, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let files = paths
            .into_iter()
            .map(SourceFile::from_path)
            .collect::<Result<Vec<_>>>()?;
        self.add_files(files);
        Ok(())
    }

    /// Discard all loaded inputs and return to [`JobState::Idle`]
    pub fn reset(&mut self) {
        self.prefix.clone_from(&self.config.prefix);
        self.mapping = None;
        self.files.clear();
        self.state = JobState::Idle;
    }

    /// Resolve every file without building an archive.
    ///
    /// The collision policy is applied, so a plan that would fail to run
    /// fails here too.
    pub fn plan(&self) -> Result<Vec<PlannedRename>> {
        let archive_job = self.collect_entries()?;
        Ok(archive_job
            .entries()
            .iter()
            .map(|e| PlannedRename {
                source_name: e.source_name.to_string(),
                emitted_name: e.name.clone(),
            })
            .collect())
    }

    /// Run the job end to end and deliver the archive to `sink`.
    ///
    /// With no files loaded this is a no-op returning
    /// [`JobOutcome::NothingToDeliver`] and the loaded inputs are kept.
    /// Otherwise the job always ends reset to [`JobState::Idle`]; on failure
    /// nothing reaches the sink.
    pub fn run<S: ArchiveSink + ?Sized>(&mut self, sink: &mut S) -> Result<JobOutcome> {
        if self.files.is_empty() {
            debug!(target: "massrename", event = "nothing_to_deliver");
            return Ok(JobOutcome::NothingToDeliver);
        }

        self.state = JobState::Running;
        let result = self.execute(sink);

        self.state = match &result {
            Ok(_) => JobState::Delivered,
            Err(err) => {
                error!(target: "massrename", event = "job_failed", error = %err);
                JobState::Failed
            }
        };
        debug!(target: "massrename", event = "job_finished", state = ?self.state);
        self.last_run = Some(self.state);
        self.reset();

        result
    }

    fn execute<S: ArchiveSink + ?Sized>(&self, sink: &mut S) -> Result<JobOutcome> {
        let archive_job = self.collect_entries()?;
        let entries = archive_job.len();

        let archive = archive_job.assemble(self.config.compression)?;
        let bytes = archive.len();

        let location = sink.deliver(archive)?;
        info!(
            target: "massrename",
            event = "archive_delivered",
            path = %location.display(),
            entries = entries,
            bytes = bytes
        );

        Ok(JobOutcome::Delivered {
            location,
            entries,
            bytes,
        })
    }

    fn resolve_all(&self) -> Vec<RenamePlan> {
        let empty = MappingTable::default();
        let table = self.mapping.as_ref().unwrap_or(&empty);
        if self.config.parallel {
            // Indexed collect keeps input order
            self.files
                .par_iter()
                .map(|file| resolver::resolve(file, table))
                .collect()
        } else {
            self.files
                .iter()
                .map(|file| resolver::resolve(file, table))
                .collect()
        }
    }

    fn collect_entries(&self) -> Result<ArchiveJob<'_>> {
        let plans = self.resolve_all();
        let mut archive_job = ArchiveJob::new(self.config.collision);

        for (file, plan) in self.files.iter().zip(plans) {
            let name = plan.emitted_name(&self.prefix);
            debug!(
                target: "massrename",
                event = "file_resolved",
                source = %file.original_file_name,
                name = %name
            );
            archive_job.push(ArchiveEntry {
                name,
                source_name: &file.original_file_name,
                content: &file.content,
            })?;
        }

        Ok(archive_job)
    }

    fn advance(&mut self) {
        self.state = if !self.files.is_empty() {
            JobState::Ready
        } else if self.mapping.is_some() || self.prefix != self.config.prefix {
            JobState::Configuring
        } else {
            JobState::Idle
        };
    }
}
