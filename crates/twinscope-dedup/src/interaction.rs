use crate::error::Result;

/// The user-facing surface a run talks through. `Ok(None)` means the user
/// cancelled the prompt.
pub trait Interaction {
    /// Ask for free text, offering `default` when given.
    fn prompt_text(&mut self, message: &str, default: Option<&str>) -> Result<Option<String>>;

    /// Ask for a menu choice.
    fn prompt_choice(&mut self, message: &str) -> Result<Option<String>>;

    fn notify(&mut self, message: &str);
}
