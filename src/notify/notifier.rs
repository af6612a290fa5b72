use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one message listing `lines`. Never called with an empty slice.
    async fn notify(&self, lines: &[String]) -> Result<()>;
    fn name(&self) -> &str;
}

/// Builds the message body: a preamble stating why these requests were
/// picked, then one line per request.
pub fn message_text(threshold_hours: f64, lines: &[String]) -> String {
    format!(
        "Please can anyone have a look at the following MRs (open for more than {}h, no comments yet):\n{}",
        threshold_hours,
        lines.join("\n")
    )
}

/// Prints the message instead of posting it.
pub struct StdoutNotifier {
    threshold_hours: f64,
}

impl StdoutNotifier {
    pub fn new(threshold_hours: f64) -> Self {
        Self { threshold_hours }
    }
}

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn notify(&self, lines: &[String]) -> Result<()> {
        println!("{}", message_text(self.threshold_hours, lines));
        Ok(())
    }

    fn name(&self) -> &str {
        "stdout"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_text_lists_lines() {
        let lines = vec![
            "[web][Ada] Add feature https://x/1".to_string(),
            "[api][Grace] Fix bug https://x/2".to_string(),
        ];
        let text = message_text(1.5, &lines);

        assert!(text.starts_with("Please can anyone have a look"));
        assert!(text.contains("more than 1.5h"));
        assert!(text.ends_with("[web][Ada] Add feature https://x/1\n[api][Grace] Fix bug https://x/2"));
    }
}
