//! Zip archive assembly for renamed files

use std::collections::HashMap;
use std::io::{Cursor, Write};
use tracing::{debug, warn};
use zip::result::ZipResult;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::{CollisionPolicy, Compression};
use crate::error::{RenameError, Result};

/// One renamed file waiting to be archived.
///
/// Source name and content are borrowed from the loaded file, so collecting
/// entries never copies file bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry<'a> {
    /// Entry name inside the archive
    pub name: String,
    /// Name of the source file the content came from
    pub source_name: &'a str,
    pub content: &'a [u8],
}

/// Entries collected for a single archive, in insertion order.
///
/// Lives only while a job runs and is consumed by [`ArchiveJob::assemble`].
#[derive(Debug, Default)]
pub struct ArchiveJob<'a> {
    entries: Vec<ArchiveEntry<'a>>,
    positions: HashMap<String, usize>,
    policy: CollisionPolicy,
}

impl<'a> ArchiveJob<'a> {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// Add an entry, applying the collision policy when its name is taken.
    pub fn push(&mut self, entry: ArchiveEntry<'a>) -> Result<()> {
        let Some(&index) = self.positions.get(&entry.name) else {
            self.positions.insert(entry.name.clone(), self.entries.len());
            self.entries.push(entry);
            return Ok(());
        };

        let existing = &mut self.entries[index];
        match self.policy {
            CollisionPolicy::Fail => Err(RenameError::NameCollision {
                name: entry.name,
                first: existing.source_name.to_string(),
                second: entry.source_name.to_string(),
            }),
            CollisionPolicy::Overwrite => {
                warn!(
                    target: "massrename",
                    event = "entry_overwritten",
                    name = %entry.name,
                    replaced = %existing.source_name,
                    by = %entry.source_name
                );
                existing.source_name = entry.source_name;
                existing.content = entry.content;
                Ok(())
            }
        }
    }

    pub fn entries(&self) -> &[ArchiveEntry<'a>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compress all entries into one zip byte stream.
    ///
    /// Either the whole archive is returned or nothing is.
    pub fn assemble(self, compression: Compression) -> Result<Vec<u8>> {
        let count = self.entries.len();
        let bytes = write_zip(&self.entries, compression)?;
        debug!(
            target: "massrename",
            event = "archive_built",
            entries = count,
            bytes = bytes.len()
        );
        Ok(bytes)
    }
}

fn write_zip(entries: &[ArchiveEntry<'_>], compression: Compression) -> ZipResult<Vec<u8>> {
    let method = match compression {
        Compression::Deflated => CompressionMethod::Deflated,
        Compression::Stored => CompressionMethod::Stored,
    };
    let options = SimpleFileOptions::default().compression_method(method);

    let mut zip_writer = ZipWriter::new(Cursor::new(Vec::new()));
    for entry in entries {
        zip_writer.start_file(entry.name.as_str(), options)?;
        zip_writer.write_all(entry.content)?;
    }

    Ok(zip_writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn entry<'a>(name: &str, source: &'a str, content: &'a [u8]) -> ArchiveEntry<'a> {
        ArchiveEntry {
            name: name.to_string(),
            source_name: source,
            content,
        }
    }

    fn read_back(bytes: Vec<u8>) -> Vec<(String, Vec<u8>)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut content = Vec::new();
                file.read_to_end(&mut content).unwrap();
                (file.name().to_string(), content)
            })
            .collect()
    }

    #[test]
    fn test_entries_keep_input_order() {
        let mut job = ArchiveJob::new(CollisionPolicy::Fail);
        job.push(entry("b.png", "a.bmp", b"one")).unwrap();
        job.push(entry("c.jpg", "c.gif", b"two")).unwrap();
        job.push(entry("a.txt", "a.txt", b"three")).unwrap();

        let bytes = job.assemble(Compression::Deflated).unwrap();
        assert_eq!(
            read_back(bytes),
            vec![
                ("b.png".to_string(), b"one".to_vec()),
                ("c.jpg".to_string(), b"two".to_vec()),
                ("a.txt".to_string(), b"three".to_vec()),
            ]
        );
    }

    #[test]
    fn test_collision_fails_by_default() {
        let mut job = ArchiveJob::new(CollisionPolicy::Fail);
        job.push(entry("x.png", "a.png", b"1")).unwrap();
        let err = job.push(entry("x.png", "b.png", b"2")).unwrap_err();

        match err {
            RenameError::NameCollision { name, first, second } => {
                assert_eq!(name, "x.png");
                assert_eq!(first, "a.png");
                assert_eq!(second, "b.png");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(job.len(), 1);
    }

    #[test]
    fn test_collision_overwrite_replaces_in_place() {
        let mut job = ArchiveJob::new(CollisionPolicy::Overwrite);
        job.push(entry("x.png", "a.png", b"first")).unwrap();
        job.push(entry("y.png", "y.png", b"middle")).unwrap();
        job.push(entry("x.png", "b.png", b"last")).unwrap();

        assert_eq!(job.len(), 2);
        assert_eq!(job.entries()[0].source_name, "b.png");

        let bytes = job.assemble(Compression::Stored).unwrap();
        assert_eq!(
            read_back(bytes),
            vec![
                ("x.png".to_string(), b"last".to_vec()),
                ("y.png".to_string(), b"middle".to_vec()),
            ]
        );
    }

    #[test]
    fn test_trailing_dot_name_is_stored_verbatim() {
        let mut job = ArchiveJob::new(CollisionPolicy::Fail);
        job.push(entry("readme.", "readme", b"hi")).unwrap();
        let bytes = job.assemble(Compression::Deflated).unwrap();
        assert_eq!(read_back(bytes)[0].0, "readme.");
    }
}
