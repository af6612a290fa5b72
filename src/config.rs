use crate::error::{Error, Result};
use std::env;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_MR_AGE_HOURS: f64 = 1.0;
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Which group resource is walked to find merge requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Strategy {
    /// Group members, then the open merge requests each member authored.
    #[default]
    Member,
    /// Group projects, then the open merge requests of each project.
    Project,
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "member" | "members" => Ok(Strategy::Member),
            "project" | "projects" => Ok(Strategy::Project),
            other => Err(Error::Config(format!(
                "REMINDER_STRATEGY must be 'member' or 'project', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Member => write!(f, "member"),
            Strategy::Project => write!(f, "project"),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub gitlab_domain: String,
    pub gitlab_token: String,
    pub group_name: String,
    pub min_access_level: u32,
    pub mr_age_hours: f64,
    pub webhook_url: String,
    pub channel: String,
    pub strategy: Strategy,
    pub per_page: u32,
    pub concurrency_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but `TEAMS_WEBHOOK` may be unset, since a
    /// dry run only prints the message.
    pub fn from_env_for_dry_run() -> Result<Self> {
        Self::from_lookup_for_dry_run(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source. Every required
    /// key is checked before returning so a single error names all gaps.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::load(lookup, true)
    }

    pub fn from_lookup_for_dry_run<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::load(lookup, false)
    }

    fn load<F>(lookup: F, require_webhook: bool) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();

        let gitlab_domain = var("GITLAB_DOMAIN");
        let gitlab_token = var("GITLAB_TOKEN");
        let group_name = var("GITLAB_GROUP_NAME");
        let webhook_url = var("TEAMS_WEBHOOK");

        let missing: Vec<&str> = [
            ("GITLAB_DOMAIN", &gitlab_domain),
            ("GITLAB_TOKEN", &gitlab_token),
            ("GITLAB_GROUP_NAME", &group_name),
            ("TEAMS_WEBHOOK", &webhook_url),
        ]
        .iter()
        .filter(|(key, _)| require_webhook || *key != "TEAMS_WEBHOOK")
        .filter(|(_, value)| value.is_empty())
        .map(|(key, _)| *key)
        .collect();

        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "missing configuration variables: {}",
                missing.join(", ")
            )));
        }

        let min_access_level =
            parse_or("GITLAB_GROUP_MEMBER_LEVEL", &var("GITLAB_GROUP_MEMBER_LEVEL"), 0);

        // `inf` is accepted and means nothing is ever old enough.
        let mr_age_hours =
            parse_or("GITLAB_MR_AGE", &var("GITLAB_MR_AGE"), DEFAULT_MR_AGE_HOURS);
        let mr_age_hours = if mr_age_hours.is_nan() {
            tracing::warn!("GITLAB_MR_AGE is NaN, using {}h", DEFAULT_MR_AGE_HOURS);
            DEFAULT_MR_AGE_HOURS
        } else {
            mr_age_hours
        };

        let strategy = match lookup("REMINDER_STRATEGY").filter(|v| !v.trim().is_empty()) {
            Some(value) => value.parse()?,
            None => Strategy::default(),
        };

        let per_page = var("GITLAB_PER_PAGE")
            .parse()
            .ok()
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_PER_PAGE);

        let concurrency_limit = var("CONCURRENCY_LIMIT")
            .parse()
            .ok()
            .filter(|v| *v > 0)
            .unwrap_or(1);

        Ok(Self {
            gitlab_domain,
            gitlab_token,
            group_name,
            min_access_level,
            mr_age_hours,
            webhook_url,
            channel: var("TEAMS_CHANNEL"),
            strategy,
            per_page,
            concurrency_limit,
        })
    }

    /// Root of the v4 REST API. A bare host is served over https.
    pub fn api_base_url(&self) -> String {
        let domain = self.gitlab_domain.trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            format!("{}/api/v4", domain)
        } else {
            format!("https://{}/api/v4", domain)
        }
    }
}

/// Parses `raw`, or returns `default`. A non-empty value that fails to
/// parse is reported so the fallback does not go unnoticed.
fn parse_or<T>(key: &str, raw: &str, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    if raw.is_empty() {
        return default;
    }
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!("{} has unparsable value '{}', using {}", key, raw, default);
            default
        }
    }
}

// Hand-written so the token never ends up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("gitlab_domain", &self.gitlab_domain)
            .field("gitlab_token", &"<redacted>")
            .field("group_name", &self.group_name)
            .field("min_access_level", &self.min_access_level)
            .field("mr_age_hours", &self.mr_age_hours)
            .field("webhook_url", &self.webhook_url)
            .field("channel", &self.channel)
            .field("strategy", &self.strategy)
            .field("per_page", &self.per_page)
            .field("concurrency_limit", &self.concurrency_limit)
            .finish()
    }
}
