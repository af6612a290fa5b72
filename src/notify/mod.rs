pub mod notifier;
pub mod webhook;

pub use notifier::{Notifier, StdoutNotifier};
pub use webhook::{ChatMessage, WebhookNotifier};
