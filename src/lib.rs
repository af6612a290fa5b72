pub mod config;
pub mod error;
pub mod gitlab;
pub mod models;
pub mod notify;
pub mod reminder;
pub mod runner;

pub use config::{Config, Strategy};
pub use error::{Error, ErrorKind, Result};
pub use gitlab::{GitLabClient, MergeRequestSource};
pub use notify::{Notifier, StdoutNotifier, WebhookNotifier};
pub use reminder::Aggregator;
pub use runner::{run, RunOutcome};
