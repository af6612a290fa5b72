use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mr_reminder::{
    run, Config, GitLabClient, Notifier, RunOutcome, StdoutNotifier, Strategy, WebhookNotifier,
};

#[derive(Parser, Debug)]
#[command(name = "mr-reminder")]
#[command(version)]
#[command(about = "Remind a chat channel about stale, uncommented GitLab merge requests")]
struct Args {
    /// Walk group members or group projects (overrides REMINDER_STRATEGY)
    #[arg(short, long, value_enum)]
    strategy: Option<Strategy>,

    /// Print the message instead of posting it; TEAMS_WEBHOOK is not required
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match execute(Args::parse()).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<mr_reminder::Error>() {
                Some(err) => tracing::error!(kind = %err.kind(), "Run aborted: {:#}", e),
                None => tracing::error!("Run aborted: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("mr_reminder=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();
    Ok(())
}

async fn execute(args: Args) -> anyhow::Result<RunOutcome> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let mut config = if args.dry_run {
        Config::from_env_for_dry_run()?
    } else {
        Config::from_env()?
    };
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    tracing::debug!("Loaded configuration: {:?}", config);

    let gitlab = GitLabClient::new(&config.gitlab_token, &config.api_base_url(), config.per_page)?;

    let notifier: Box<dyn Notifier> = if args.dry_run {
        Box::new(StdoutNotifier::new(config.mr_age_hours))
    } else {
        Box::new(WebhookNotifier::new(
            config.webhook_url.clone(),
            config.channel.clone(),
            config.mr_age_hours,
        )?)
    };

    let outcome = run(&config, &gitlab, notifier.as_ref()).await?;
    Ok(outcome)
}
