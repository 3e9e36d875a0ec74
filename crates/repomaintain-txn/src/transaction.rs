use std::path::{Path, PathBuf};

use tracing::warn;

use crate::copy::copy_entry;
use crate::error::{RestoreFailure, TxnError};

const BACKUP_SUFFIX: &str = ".bak";

#[derive(Debug)]
struct StagedFile {
    original: PathBuf,
    backup: PathBuf,
}

/// A set of staged file backups with a single commit-or-rollback outcome.
///
/// Only one transaction may be open per repository at a time; the tool's
/// VCS dirty-check is the coarse guard against overlapping invocations.
#[derive(Debug, Default)]
pub struct FileTransaction {
    staged: Vec<StagedFile>,
    finished: bool,
}

impl FileTransaction {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Back up `path` to its sibling `<path>.bak`.
    ///
    /// A missing source is skipped when `must_exist` is false; this covers
    /// optional files such as a lock file that may not exist yet.
    pub fn stage(&mut self, path: &Path, must_exist: bool) -> Result<(), TxnError> {
        if std::fs::symlink_metadata(path).is_err() {
            if must_exist {
                return Err(TxnError::MissingSource {
                    path: path.to_path_buf(),
                });
            }
            return Ok(());
        }

        let backup = backup_path(path);
        copy_entry(path, &backup).map_err(|source| TxnError::Backup {
            path: path.to_path_buf(),
            source,
        })?;

        self.staged.push(StagedFile {
            original: path.to_path_buf(),
            backup,
        });
        Ok(())
    }

    /// The staged backup of `path`, if one exists.
    #[must_use]
    pub fn backup_of(&self, path: &Path) -> Option<&Path> {
        self.staged
            .iter()
            .find(|s| s.original == path)
            .map(|s| s.backup.as_path())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Restore every staged file from its backup and remove the backups.
    ///
    /// Each restore is independently best-effort: failures are collected and
    /// reported after all other files have been restored.
    pub fn rollback(mut self) -> Result<(), TxnError> {
        self.finished = true;
        let failures = self.restore_all();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(TxnError::RestoreFailed { failures })
        }
    }

    /// Keep the mutated files and delete every backup.
    pub fn commit(mut self) -> Result<(), TxnError> {
        self.finished = true;
        let mut failures = Vec::new();

        for staged in self.staged.drain(..) {
            if let Err(source) = std::fs::remove_file(&staged.backup) {
                failures.push(RestoreFailure {
                    path: staged.backup,
                    source,
                });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(TxnError::CleanupFailed { failures })
        }
    }

    fn restore_all(&mut self) -> Vec<RestoreFailure> {
        let mut failures = Vec::new();

        // LIFO, mirroring the order mutations were layered on.
        for staged in self.staged.drain(..).rev() {
            if std::fs::symlink_metadata(&staged.backup).is_err() {
                // A missing backup must not block the remaining restores.
                warn!(path = %staged.backup.display(), "backup missing during rollback");
                continue;
            }

            let restore = copy_entry(&staged.backup, &staged.original)
                .and_then(|()| std::fs::remove_file(&staged.backup));
            if let Err(source) = restore {
                failures.push(RestoreFailure {
                    path: staged.original,
                    source,
                });
            }
        }

        failures
    }
}

impl Drop for FileTransaction {
    fn drop(&mut self) {
        if self.finished || self.staged.is_empty() {
            return;
        }
        // No explicit outcome: an error or panic is unwinding past us.
        for failure in self.restore_all() {
            warn!(
                path = %failure.path.display(),
                error = %failure.source,
                "failed to restore file during implicit rollback"
            );
        }
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).expect("write test file");
        path
    }

    #[test]
    fn rollback_restores_every_file_byte_identical() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let a = write(dir.path(), "a.json", "{\"version\":\"1.0.0\"}\n");
        let b = write(dir.path(), "b.json", "{\"version\":\"2.0.0\"}\n");

        let mut txn = FileTransaction::new();
        txn.stage(&a, true)?;
        txn.stage(&b, true)?;

        std::fs::write(&a, "mutated")?;
        std::fs::write(&b, "mutated")?;
        txn.rollback()?;

        assert_eq!(std::fs::read_to_string(&a)?, "{\"version\":\"1.0.0\"}\n");
        assert_eq!(std::fs::read_to_string(&b)?, "{\"version\":\"2.0.0\"}\n");
        assert!(!dir.path().join("a.json.bak").exists());
        assert!(!dir.path().join("b.json.bak").exists());
        Ok(())
    }

    #[test]
    fn commit_keeps_mutations_and_removes_backups() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let a = write(dir.path(), "a.json", "original");

        let mut txn = FileTransaction::new();
        txn.stage(&a, true)?;
        std::fs::write(&a, "mutated")?;
        txn.commit()?;

        assert_eq!(std::fs::read_to_string(&a)?, "mutated");
        assert!(!dir.path().join("a.json.bak").exists());
        Ok(())
    }

    #[test]
    fn missing_optional_file_is_skipped() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("package-lock.json");

        let mut txn = FileTransaction::new();
        txn.stage(&missing, false)?;

        assert!(txn.is_empty());
        txn.commit()?;
        Ok(())
    }

    #[test]
    fn missing_mandatory_file_is_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let missing = dir.path().join("package.json");

        let mut txn = FileTransaction::new();
        let result = txn.stage(&missing, true);

        assert!(matches!(result, Err(TxnError::MissingSource { .. })));
    }

    #[test]
    fn drop_without_outcome_rolls_back() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let a = write(dir.path(), "a.json", "original");

        {
            let mut txn = FileTransaction::new();
            txn.stage(&a, true)?;
            std::fs::write(&a, "mutated")?;
            // txn dropped here without commit or rollback
        }

        assert_eq!(std::fs::read_to_string(&a)?, "original");
        assert!(!dir.path().join("a.json.bak").exists());
        Ok(())
    }

    #[test]
    fn missing_backup_does_not_block_other_restores() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let a = write(dir.path(), "a.json", "original-a");
        let b = write(dir.path(), "b.json", "original-b");

        let mut txn = FileTransaction::new();
        txn.stage(&a, true)?;
        txn.stage(&b, true)?;

        std::fs::write(&a, "mutated-a")?;
        std::fs::write(&b, "mutated-b")?;
        std::fs::remove_file(dir.path().join("a.json.bak"))?;

        txn.rollback()?;

        // a keeps its mutation (backup was gone), b is restored.
        assert_eq!(std::fs::read_to_string(&a)?, "mutated-a");
        assert_eq!(std::fs::read_to_string(&b)?, "original-b");
        Ok(())
    }

    #[test]
    fn backup_of_reports_staged_paths() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let a = write(dir.path(), "a.json", "x");

        let mut txn = FileTransaction::new();
        txn.stage(&a, true)?;

        assert_eq!(
            txn.backup_of(&a),
            Some(dir.path().join("a.json.bak").as_path())
        );
        assert!(txn.backup_of(Path::new("/nope")).is_none());
        txn.commit()?;
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn symlink_survives_rollback_as_symlink() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let target = write(dir.path(), "target.txt", "data");
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link)?;

        let mut txn = FileTransaction::new();
        txn.stage(&link, true)?;

        std::fs::remove_file(&link)?;
        std::fs::write(&link, "replaced with a regular file")?;
        txn.rollback()?;

        let meta = std::fs::symlink_metadata(&link)?;
        assert!(meta.file_type().is_symlink());
        assert_eq!(std::fs::read_link(&link)?, target);
        Ok(())
    }
}
