//! Revision metadata lookup.
//!
//! Author and dates come from version-control history. The lookup sits
//! behind [`MetadataProvider`] so builds can run without git and tests can
//! supply fixed answers.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::SiteError;

/// What history knows about one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revision {
    /// Author of the commit that added the file.
    pub author: Option<String>,
    /// Date the file was added.
    pub added: Option<String>,
    /// Date of the latest modification.
    pub modified: Option<String>,
}

/// Source of revision metadata.
///
/// Dates are returned in ISO 8601 form. `None` means history has no answer,
/// which is not an error.
pub trait MetadataProvider {
    /// Looks up author, added date and modified date.
    fn revision(&self, source: &Path) -> Result<Revision, SiteError>;

    /// Looks up only the modified date.
    fn modified(&self, source: &Path) -> Result<Option<String>, SiteError>;
}

/// Provider that knows nothing; every field falls back to its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl MetadataProvider for NoHistory {
    fn revision(&self, _source: &Path) -> Result<Revision, SiteError> {
        Ok(Revision::default())
    }

    fn modified(&self, _source: &Path) -> Result<Option<String>, SiteError> {
        Ok(None)
    }
}

/// Exit status of `git log` outside a work tree.
const NOT_A_REPOSITORY: i32 = 128;

/// Which commit of a file's history to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Added,
    Modified,
}

impl Change {
    fn diff_filter(self) -> &'static str {
        match self {
            Change::Added => "--diff-filter=A",
            Change::Modified => "--diff-filter=M",
        }
    }
}

/// Reads metadata from `git log`, one blocking child process per query.
#[derive(Debug, Clone)]
pub struct GitMetadataProvider {
    program: PathBuf,
}

impl GitMetadataProvider {
    /// Creates a provider using `git` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Creates a provider using a specific git executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Returns `(date, author)` of the newest commit matching `change`.
    fn last_commit(
        &self,
        source: &Path,
        change: Change,
    ) -> Result<Option<(String, String)>, SiteError> {
        let (workdir, file) = split_source(source);

        let output = Command::new(&self.program)
            .args(["--no-pager", "log", "-n", "1"])
            .arg(change.diff_filter())
            .arg("--date=iso-strict")
            .arg("--pretty=format:%ad|%an")
            .arg("--")
            .arg(&file)
            .current_dir(&workdir)
            .env("GIT_PAGER", "cat")
            .env("PAGER", "cat")
            .output()
            .map_err(|e| {
                SiteError::metadata(
                    source,
                    format!("failed to run {}: {}", self.program.display(), e),
                )
            })?;

        if output.status.code() == Some(NOT_A_REPOSITORY) {
            debug!(
                "{} is not tracked by a git repository; using defaults",
                source.display()
            );
            return Ok(None);
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SiteError::metadata(
                source,
                format!("git log exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let parsed = parse_log_line(&stdout);
        debug!(
            "git {:?} for {}: {:?}",
            change,
            source.display(),
            parsed
        );
        Ok(parsed)
    }
}

impl Default for GitMetadataProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataProvider for GitMetadataProvider {
    fn revision(&self, source: &Path) -> Result<Revision, SiteError> {
        let added = self.last_commit(source, Change::Added)?;
        let modified = self.modified(source)?;

        let (added, author) = match added {
            Some((date, author)) => (Some(date), Some(author)),
            None => (None, None),
        };

        Ok(Revision {
            author,
            added,
            modified,
        })
    }

    fn modified(&self, source: &Path) -> Result<Option<String>, SiteError> {
        Ok(self
            .last_commit(source, Change::Modified)?
            .map(|(date, _)| date))
    }
}

/// Splits a source path into the directory git runs in and the file name.
fn split_source(source: &Path) -> (PathBuf, OsString) {
    let workdir = match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file = source
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| source.as_os_str().to_os_string());
    (workdir, file)
}

/// Parses `<date>|<author>`; an empty answer means no matching commit.
fn parse_log_line(output: &str) -> Option<(String, String)> {
    let line = output.lines().next()?.trim();
    if line.is_empty() {
        return None;
    }
    let (date, author) = line.split_once('|').unwrap_or((line, ""));
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    Some((date.to_string(), author.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("", None)]
    #[case("\n", None)]
    #[case(
        "2021-03-04T10:11:12+01:00|Jane Doe",
        Some(("2021-03-04T10:11:12+01:00", "Jane Doe"))
    )]
    #[case("2021-03-04T10:11:12Z|", Some(("2021-03-04T10:11:12Z", "")))]
    #[case("2021-03-04T10:11:12Z", Some(("2021-03-04T10:11:12Z", "")))]
    fn test_parse_log_line(#[case] output: &str, #[case] expected: Option<(&str, &str)>) {
        let expected = expected.map(|(d, a)| (d.to_string(), a.to_string()));
        assert_eq!(parse_log_line(output), expected);
    }

    #[test]
    fn test_split_source() {
        let (workdir, file) = split_source(Path::new("src/pancakes.md"));
        assert_eq!(workdir, PathBuf::from("src"));
        assert_eq!(file, OsString::from("pancakes.md"));

        let (workdir, file) = split_source(Path::new("pancakes.md"));
        assert_eq!(workdir, PathBuf::from("."));
        assert_eq!(file, OsString::from("pancakes.md"));
    }

    #[test]
    fn test_no_history() {
        let provider = NoHistory;
        assert_eq!(
            provider.revision(Path::new("x.md")).unwrap(),
            Revision::default()
        );
        assert_eq!(provider.modified(Path::new("x.md")).unwrap(), None);
    }

    #[test]
    fn test_outside_repository_has_no_history() {
        if Command::new("git").arg("--version").output().is_err() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("soup.md");
        std::fs::write(&source, "# Soup\n").unwrap();

        let provider = GitMetadataProvider::new();

        assert_eq!(provider.revision(&source).unwrap(), Revision::default());
        assert_eq!(provider.modified(&source).unwrap(), None);
    }

    #[test]
    fn test_missing_git_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let provider = GitMetadataProvider::with_program(dir.path().join("no-such-git"));

        let err = provider
            .revision(&dir.path().join("soup.md"))
            .unwrap_err();

        assert!(matches!(err, SiteError::Metadata { .. }));
        assert!(err.to_string().contains("failed to run"));
    }
}
