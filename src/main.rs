use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use issue_grader::command::Services;
use issue_grader::config::{AppConfig, DEFAULT_BIND, ModelArgs, ModelConfig, ServeArgs};
use issue_grader::dispatcher::Dispatcher;
use issue_grader::domain::github::GithubClient;
use issue_grader::domain::llm::{GeminiClient, ModelClient};
use issue_grader::domain::types::IssueRef;
use issue_grader::evaluate::evaluate_issue;
use issue_grader::server::{WebhookState, run_webhook_server};
use issue_grader::{inspect, telemetry};

#[derive(Parser)]
#[command(name = "issue-grader")]
#[command(about = "Issue Grader - Score GitHub issue quality with Gemini and report back on the issue")]
struct Cli {
    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Receive GitHub webhooks and evaluate issues
    Serve(ServeArgs),
    /// Log incoming deliveries without acting on them
    Inspect {
        /// Address the inspect server listens on
        #[arg(long, env = "BIND", default_value = DEFAULT_BIND)]
        bind: String,
    },
    /// Evaluate a single issue and print the report
    Evaluate {
        #[command(flatten)]
        model: ModelArgs,

        /// Issue title
        #[arg(long)]
        title: String,

        /// Issue description
        #[arg(long)]
        body: Option<String>,

        /// Issue number shown in the report heading
        #[arg(long, default_value_t = 0)]
        issue: u64,
    },
}

fn gemini_client(config: &ModelConfig) -> Result<GeminiClient> {
    let client = GeminiClient::new(&config.api_base, &config.api_key, &config.model, config.timeout)
        .context("Failed to build Gemini client")?;
    tracing::info!(
        model = client.model_name(),
        key_len = config.api_key.len(),
        "using Gemini model"
    );
    Ok(client)
}

fn build_state(config: &AppConfig) -> Result<WebhookState> {
    let model: Arc<dyn ModelClient> = Arc::new(gemini_client(&config.model)?);
    let tracker = GithubClient::new(&config.github_api_base, &config.github_token, config.model.timeout)
        .context("Failed to build GitHub client")?;
    let services = Services {
        model,
        tracker: Arc::new(tracker),
    };
    Ok(WebhookState {
        dispatcher: Arc::new(Dispatcher::new(services, config.bot_login.clone())),
        secret: config.webhook_secret.clone(),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Mode::Serve(args) => {
            let config = args.into_config().context("Invalid configuration")?;
            let state = build_state(&config)?;
            run_webhook_server(&config.bind, &config.webhook_path, state).await
        }
        Mode::Inspect { bind } => inspect::run_inspect_server(&bind).await,
        Mode::Evaluate {
            model,
            title,
            body,
            issue,
        } => {
            let config = model.into_config().context("Invalid configuration")?;
            let client = gemini_client(&config)?;
            let issue = IssueRef {
                number: issue,
                title,
                body,
            };
            let local = evaluate_issue(&client, &issue).await;
            println!("label: {}", local.label);
            println!();
            println!("{}", local.report);
            Ok(())
        }
    }
}
