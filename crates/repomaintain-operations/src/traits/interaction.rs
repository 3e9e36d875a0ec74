use crate::Result;

/// Synchronous user prompts.
///
/// Every method returns `None` when the user cancelled the prompt (escape or
/// interrupt); call sites decide whether that aborts the whole operation.
pub trait InteractionProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be displayed.
    fn confirm(&self, prompt: &str, default: bool) -> Result<Option<bool>>;

    /// # Errors
    ///
    /// Returns an error if the prompt cannot be displayed.
    fn select(&self, prompt: &str, items: &[String]) -> Result<Option<usize>>;

    /// # Errors
    ///
    /// Returns an error if the prompt cannot be displayed.
    fn multi_select(&self, prompt: &str, items: &[String]) -> Result<Option<Vec<usize>>>;

    /// # Errors
    ///
    /// Returns an error if the prompt cannot be displayed.
    fn input(&self, prompt: &str) -> Result<Option<String>>;
}
