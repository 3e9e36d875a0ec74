use crate::{Result, TagInfo};

use super::Repository;

impl Repository {
    /// Create a lightweight tag pointing at HEAD.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag cannot be created or already exists.
    pub fn create_tag(&self, name: &str) -> Result<TagInfo> {
        let head = self.inner.head()?.peel_to_commit()?;

        self.inner.tag_lightweight(name, head.as_object(), false)?;

        Ok(TagInfo {
            name: name.to_string(),
            target_sha: head.id().to_string(),
        })
    }
}
