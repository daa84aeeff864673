//! Name resolution for source files

use std::fs;
use std::path::Path;

use crate::error::{RenameError, Result};
use crate::mapping::MappingTable;

/// A file to rename, held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub original_file_name: String,
    pub content: Vec<u8>,
}

impl SourceFile {
    pub fn new(original_file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            original_file_name: original_file_name.into(),
            content,
        }
    }

    /// Load a file from disk. Only the final path component is kept as its name.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| RenameError::InvalidFileName(path.to_path_buf()))?;
        let content = fs::read(path)?;
        Ok(Self::new(name, content))
    }

    /// Split the name on its first dot into (base name, extension).
    ///
    /// Only the first dot separates: `archive.tar.gz` gives `("archive", "tar.gz")`.
    /// Everything after the first dot is one extension token, so this is not
    /// the same as taking the second dot-separated segment (which would give
    /// `tar` and drop `.gz`). A name without a dot has an empty extension.
    pub fn split_name(&self) -> (&str, &str) {
        self.original_file_name
            .split_once('.')
            .unwrap_or((self.original_file_name.as_str(), ""))
    }
}

/// Output base name and extension for one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub output_base_name: String,
    pub output_extension: String,
}

impl RenamePlan {
    /// Archive entry name: `prefix + base + "." + extension`.
    ///
    /// The dot is always written, so an empty extension leaves a trailing dot
    /// (`readme` becomes `readme.`).
    pub fn emitted_name(&self, prefix: &str) -> String {
        format!(
            "{}{}.{}",
            prefix, self.output_base_name, self.output_extension
        )
    }
}

/// Compute the rename plan for one file.
///
/// Each non-empty target field of the matching entry replaces the source's
/// own value; base name and extension are overridden independently.
pub fn resolve(file: &SourceFile, table: &MappingTable) -> RenamePlan {
    let (current_base, current_ext) = file.split_name();
    let entry = table.get(current_base);

    let pick = |target: Option<&str>, current: &str| match target {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => current.to_string(),
    };

    RenamePlan {
        output_base_name: pick(entry.map(|e| e.target_base_name.as_str()), current_base),
        output_extension: pick(entry.map(|e| e.target_extension.as_str()), current_ext),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::MappingEntry;

    fn plan(base: &str, ext: &str) -> RenamePlan {
        RenamePlan {
            output_base_name: base.to_string(),
            output_extension: ext.to_string(),
        }
    }

    #[test]
    fn test_split_name() {
        assert_eq!(SourceFile::new("report.pdf", vec![]).split_name(), ("report", "pdf"));
        assert_eq!(SourceFile::new("readme", vec![]).split_name(), ("readme", ""));
        assert_eq!(
            SourceFile::new("archive.tar.gz", vec![]).split_name(),
            ("archive", "tar.gz")
        );
        assert_eq!(SourceFile::new(".env", vec![]).split_name(), ("", "env"));
    }

    #[test]
    fn test_no_entry_keeps_name() {
        let table = MappingTable::default();
        let file = SourceFile::new("report.pdf", b"%PDF".to_vec());
        assert_eq!(resolve(&file, &table), plan("report", "pdf"));
    }

    #[test]
    fn test_partial_override() {
        let table: MappingTable = [
            MappingEntry::new("report", "invoice", ""),
            MappingEntry::new("photo", "", "png"),
        ]
        .into_iter()
        .collect();

        let report = SourceFile::new("report.pdf", vec![]);
        assert_eq!(resolve(&report, &table), plan("invoice", "pdf"));

        let photo = SourceFile::new("photo.bmp", vec![]);
        assert_eq!(resolve(&photo, &table), plan("photo", "png"));
    }

    #[test]
    fn test_full_override() {
        let table: MappingTable = [MappingEntry::new("a", "b", "png")].into_iter().collect();
        let file = SourceFile::new("a.bmp", vec![]);
        assert_eq!(resolve(&file, &table), plan("b", "png"));
    }

    #[test]
    fn test_lookup_uses_first_segment_only() {
        let table: MappingTable = [MappingEntry::new("archive", "backup", "")]
            .into_iter()
            .collect();
        let file = SourceFile::new("archive.tar.gz", vec![]);
        assert_eq!(resolve(&file, &table), plan("backup", "tar.gz"));
    }

    #[test]
    fn test_emitted_name() {
        assert_eq!(plan("invoice", "pdf").emitted_name("2024_"), "2024_invoice.pdf");
        assert_eq!(plan("invoice", "pdf").emitted_name(""), "invoice.pdf");
    }

    #[test]
    fn test_no_dot_leaves_trailing_dot() {
        let file = SourceFile::new("readme", vec![]);
        let plan = resolve(&file, &MappingTable::default());
        assert_eq!(plan.output_extension, "");
        assert_eq!(plan.emitted_name(""), "readme.");
    }

    #[test]
    fn test_from_path_keeps_file_name_only() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("scan.tiff");
        fs::write(&path, b"II*\0")?;

        let file = SourceFile::from_path(&path)?;
        assert_eq!(file.original_file_name, "scan.tiff");
        assert_eq!(file.content, b"II*\0");
        Ok(())
    }
}
