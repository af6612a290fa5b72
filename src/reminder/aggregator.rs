use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::Result;
use crate::gitlab::MergeRequestSource;
use crate::models::MergeRequest;
use crate::reminder::filter::is_stale;
use crate::reminder::scope::ScopeProvider;

pub struct Aggregator<'a, P> {
    source: &'a dyn MergeRequestSource,
    provider: P,
    threshold_hours: f64,
    concurrency_limit: usize,
}

impl<'a, P: ScopeProvider> Aggregator<'a, P> {
    pub fn new(source: &'a dyn MergeRequestSource, provider: P, threshold_hours: f64) -> Self {
        Self {
            source,
            provider,
            threshold_hours,
            concurrency_limit: 1,
        }
    }

    /// Number of scopes fetched at once. Output order does not depend on it.
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit.max(1);
        self
    }

    /// Walks every scope and returns one summary line per stale merge request,
    /// in enumeration order. The first failing call aborts the walk.
    pub async fn collect(&self, now: DateTime<Utc>) -> Result<Vec<String>> {
        let scopes = self.provider.scopes(self.source).await?;

        let pb = ProgressBar::new(scopes.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} scopes",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );

        let per_scope: Vec<Vec<String>> = stream::iter(scopes.iter())
            .map(|scope| {
                let pb = pb.clone();
                async move {
                    tracing::info!(
                        "Checking merge requests for {}",
                        self.provider.describe(scope)
                    );
                    let mrs = self.provider.merge_requests(self.source, scope).await?;

                    let lines = mrs
                        .iter()
                        .filter(|mr| is_stale(mr, self.threshold_hours, now))
                        .map(|mr| {
                            tracing::info!("Found: {}", mr.title);
                            summary_line(&self.provider.label(scope, mr), mr)
                        })
                        .collect::<Vec<_>>();

                    pb.inc(1);
                    Ok::<_, crate::error::Error>(lines)
                }
            })
            .buffered(self.concurrency_limit)
            .try_collect()
            .await?;

        pb.finish_and_clear();

        Ok(per_scope.into_iter().flatten().collect())
    }
}

/// `[label][author] title url`
pub fn summary_line(label: &str, mr: &MergeRequest) -> String {
    format!("[{}][{}] {} {}", label, mr.author.name, mr.title, mr.web_url)
}
