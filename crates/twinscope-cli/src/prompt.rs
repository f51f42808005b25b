use dialoguer::Input;
use twinscope_dedup::{DedupError, Interaction, Result};

/// Typing this at any prompt cancels it.
const CANCEL: &str = "q";

/// Terminal prompts: the message goes to stdout, the answer is read with
/// dialoguer. An empty answer with no default, or `q`, cancels.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }

    fn ask(&self, prompt: &str, default: Option<&str>) -> Result<Option<String>> {
        let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        let answer = input
            .interact_text()
            .map_err(|e| DedupError::Interaction(e.to_string()))?;

        let answer = answer.trim();
        if answer.is_empty() || answer.eq_ignore_ascii_case(CANCEL) {
            return Ok(None);
        }
        Ok(Some(answer.to_string()))
    }
}

impl Interaction for TerminalPrompt {
    fn prompt_text(&mut self, message: &str, default: Option<&str>) -> Result<Option<String>> {
        println!("\n{message}");
        self.ask(&format!("Value ({CANCEL} to cancel)"), default)
    }

    fn prompt_choice(&mut self, message: &str) -> Result<Option<String>> {
        println!("\n{message}");
        self.ask(&format!("Choice ({CANCEL} to cancel)"), None)
    }

    fn notify(&mut self, message: &str) {
        println!("{message}");
    }
}
