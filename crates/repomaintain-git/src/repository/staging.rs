use std::path::Path;

use crate::Result;

use super::Repository;

impl Repository {
    /// # Errors
    ///
    /// Returns an error if staging any of the files fails.
    pub fn stage_files(&self, paths: &[&Path]) -> Result<()> {
        let mut index = self.inner.index()?;

        for path in paths {
            let relative_path = self.to_relative_path(path);

            if path.exists() || self.root().join(&relative_path).exists() {
                index.add_path(&relative_path)?;
            } else {
                index.remove_path(&relative_path)?;
            }
        }

        index.write()?;
        Ok(())
    }

    /// Whether the index differs from the HEAD tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the diff cannot be computed.
    pub fn has_staged_changes(&self) -> Result<bool> {
        let head_tree = self.inner.head()?.peel_to_tree()?;
        let mut index = self.inner.index()?;
        let diff = self
            .inner
            .diff_tree_to_index(Some(&head_tree), Some(&index), None)?;
        let changed = diff.deltas().len() > 0;
        index.read(false)?;
        Ok(changed)
    }
}
