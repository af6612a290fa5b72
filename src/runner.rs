use chrono::{DateTime, Utc};

use crate::config::{Config, Strategy};
use crate::error::Result;
use crate::gitlab::MergeRequestSource;
use crate::notify::Notifier;
use crate::reminder::{Aggregator, MemberScopes, ProjectScopes};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A message listing this many merge requests was delivered.
    Notified(usize),
    NothingFound,
}

pub async fn run(
    config: &Config,
    source: &dyn MergeRequestSource,
    notifier: &dyn Notifier,
) -> Result<RunOutcome> {
    run_at(config, source, notifier, Utc::now()).await
}

pub async fn run_at(
    config: &Config,
    source: &dyn MergeRequestSource,
    notifier: &dyn Notifier,
    now: DateTime<Utc>,
) -> Result<RunOutcome> {
    tracing::info!(
        "Looking for merge requests older than {}h in {} ({} strategy)",
        config.mr_age_hours,
        config.group_name,
        config.strategy
    );

    let lines = match config.strategy {
        Strategy::Member => {
            let provider = MemberScopes {
                group: config.group_name.clone(),
                min_access_level: config.min_access_level,
            };
            Aggregator::new(source, provider, config.mr_age_hours)
                .with_concurrency_limit(config.concurrency_limit)
                .collect(now)
                .await?
        }
        Strategy::Project => {
            let provider = ProjectScopes {
                group: config.group_name.clone(),
            };
            Aggregator::new(source, provider, config.mr_age_hours)
                .with_concurrency_limit(config.concurrency_limit)
                .collect(now)
                .await?
        }
    };

    if lines.is_empty() {
        tracing::info!("Nothing found, nothing to do");
        return Ok(RunOutcome::NothingFound);
    }

    tracing::info!("Sending {} reminders via {}", lines.len(), notifier.name());
    notifier.notify(&lines).await?;

    Ok(RunOutcome::Notified(lines.len()))
}
