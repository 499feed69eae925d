//! The user-interface collaborator contract and its console implementation.
//!
//! Every prompt can be dismissed; a dismissal surfaces as `None` and the
//! calling flow turns it into a silent cancellation. Prompt reads block the
//! task, which is fine for a single-user console frontend — the contract
//! stays async so richer frontends (or test scripts) can suspend instead.

use std::io::Write as _;

use async_trait::async_trait;

use crate::remote::WebtaskSummary;

/// UI port consumed by the integration core.
#[async_trait]
pub trait Ui: Send + Sync {
    /// Present a binary choice. `None` means the prompt was dismissed.
    async fn confirm(&self, question: &str) -> Option<bool>;

    /// Ask for a line of text. Empty input counts as a dismissal.
    async fn prompt(&self, message: &str) -> Option<String>;

    /// Ask the user to pick one webtask from a list.
    async fn pick(&self, webtasks: &[WebtaskSummary]) -> Option<WebtaskSummary>;

    /// Show a one-line notification.
    fn notify(&self, message: &str);

    /// Launch a URL in the platform browser. Fire-and-forget.
    fn open_url(&self, url: &str);
}

/// stdin/stdout implementation of the UI port.
#[derive(Debug, Default)]
pub struct ConsoleUi;

impl ConsoleUi {
    pub fn new() -> Self {
        Self
    }

    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) => None, // EOF
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "stdin read failed");
                None
            }
        }
    }
}

#[async_trait]
impl Ui for ConsoleUi {
    async fn confirm(&self, question: &str) -> Option<bool> {
        print!("{question} [y/N] ");
        let _ = std::io::stdout().flush();
        let answer = self.read_line()?;
        Some(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }

    async fn prompt(&self, message: &str) -> Option<String> {
        print!("{message}: ");
        let _ = std::io::stdout().flush();
        self.read_line()
    }

    async fn pick(&self, webtasks: &[WebtaskSummary]) -> Option<WebtaskSummary> {
        if webtasks.is_empty() {
            self.notify("No webtasks found.");
            return None;
        }

        for (index, webtask) in webtasks.iter().enumerate() {
            println!("  {}. {}", index + 1, webtask.name);
        }
        print!("Select a webtask [1-{}]: ", webtasks.len());
        let _ = std::io::stdout().flush();

        let answer = self.read_line()?;
        let choice: usize = answer.parse().ok()?;
        if choice == 0 || choice > webtasks.len() {
            return None;
        }
        Some(webtasks[choice - 1].clone())
    }

    fn notify(&self, message: &str) {
        println!("{message}");
    }

    fn open_url(&self, url: &str) {
        if let Err(err) = open::that(url) {
            tracing::warn!(url, error = %err, "could not open browser");
        }
    }
}
