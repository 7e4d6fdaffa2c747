//! CLI entrypoint for Interview Funnel
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use interview_application::{
    AccountService, BehaviorConfig, ConductInterviewUseCase, ConversationLogger,
    ConversationStore, NextTurnUseCase, NoAccountService, NoConversationLogger,
    NoReportGenerator, ReportGenerator,
};
use interview_domain::{InterviewOrchestrator, Transcript};
use interview_infrastructure::config::FileLoggingConfig;
use interview_infrastructure::{
    AuthAccountService, ConfigLoader, FileConfig, HttpReportGenerator, InMemoryConversationStore,
    JsonlConversationLogger, RestConversationStore, StoreBackend, build_gateway,
};
use interview_presentation::{
    AppState, ChatRepl, Cli, Command, ConsoleFormatter, RequestLimits, serve,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let _log_guard = init_logging(cli.verbose, &config.logging)?;
    info!("Starting Interview Funnel");

    match cli.command {
        Command::ShowConfig => show_config(&config, cli.config.as_ref()),
        Command::Replay { file, json } => replay(&config, &file, json),
        Command::Serve { bind } => {
            check_config(&config)?;
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            run_server(&config, &bind).await
        }
        Command::Chat { offline, quiet } => {
            if !offline {
                check_config(&config)?;
            }
            run_chat(&config, offline, quiet).await
        }
    }
}

/// Initialize logging based on verbosity level; `RUST_LOG` wins when set
fn init_logging(verbose: u8, logging: &FileLoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    let (file_layer, guard) = match &logging.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "interview-funnel.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}

/// Log warnings, stop on errors
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue.message);
    }
    let errors: Vec<&str> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| i.message.as_str())
        .collect();
    if !errors.is_empty() {
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(())
}

fn behavior(config: &FileConfig) -> BehaviorConfig {
    config.interview.to_behavior_config().0
}

// === Dependency Injection ===

fn build_store(config: &FileConfig) -> Result<Arc<dyn ConversationStore>> {
    match config.store.parse_backend().0 {
        StoreBackend::Memory => {
            warn!("Using the in-memory store; sessions are lost on restart");
            Ok(Arc::new(InMemoryConversationStore::new()))
        }
        StoreBackend::Rest => {
            let url = config
                .store
                .url
                .clone()
                .context("store.url is required for the rest backend")?;
            let key = config.store.resolve_api_key().with_context(|| {
                format!("No store API key: set {}", config.store.api_key_env)
            })?;
            Ok(Arc::new(RestConversationStore::new(
                url,
                config.store.table.clone(),
                key,
            )))
        }
    }
}

fn build_accounts(config: &FileConfig) -> Arc<dyn AccountService> {
    let accounts = &config.accounts;
    match (&accounts.auth_url, accounts.resolve_api_key()) {
        (Some(url), Some(key)) if accounts.enabled => {
            Arc::new(AuthAccountService::new(url.clone(), key))
        }
        _ => {
            if accounts.enabled {
                warn!(
                    "Account creation enabled but no API key found in {}",
                    accounts.api_key_env
                );
            }
            Arc::new(NoAccountService)
        }
    }
}

fn build_reports(config: &FileConfig) -> Arc<dyn ReportGenerator> {
    match &config.reports.endpoint {
        Some(endpoint) => Arc::new(HttpReportGenerator::new(
            endpoint.clone(),
            config.reports.resolve_api_key(),
        )),
        None => {
            info!("No report endpoint configured; completed interviews are not forwarded");
            Arc::new(NoReportGenerator)
        }
    }
}

fn build_logger(config: &FileConfig) -> Arc<dyn ConversationLogger> {
    config
        .logging
        .conversation_log
        .as_ref()
        .and_then(JsonlConversationLogger::open)
        .map(|logger| Arc::new(logger) as Arc<dyn ConversationLogger>)
        .unwrap_or_else(|| Arc::new(NoConversationLogger))
}

async fn run_server(config: &FileConfig, bind: &str) -> Result<()> {
    let gateway = build_gateway(&config.providers, false)?;
    let logger = build_logger(config);

    let turns = Arc::new(
        NextTurnUseCase::new(gateway, build_accounts(config), build_reports(config))
            .with_config(behavior(config))
            .with_logger(logger.clone()),
    );
    let interview = Arc::new(
        ConductInterviewUseCase::new(turns.clone(), build_store(config)?).with_logger(logger),
    );

    let state = AppState {
        interview,
        turns,
        limits: RequestLimits {
            max_content_chars: config.server.max_content_chars,
            max_history_turns: config.server.max_history_turns,
        },
    };
    serve(state, bind)
        .await
        .with_context(|| format!("HTTP server on {} failed", bind))
}

async fn run_chat(config: &FileConfig, offline: bool, quiet: bool) -> Result<()> {
    let gateway = build_gateway(&config.providers, offline)?;
    let (accounts, reports): (Arc<dyn AccountService>, Arc<dyn ReportGenerator>) = if offline {
        (Arc::new(NoAccountService), Arc::new(NoReportGenerator))
    } else {
        (build_accounts(config), build_reports(config))
    };
    let behavior = behavior(config);
    let persona = behavior.persona.clone();
    let logger = build_logger(config);

    let turns = Arc::new(
        NextTurnUseCase::new(gateway, accounts, reports)
            .with_config(behavior)
            .with_logger(logger.clone()),
    );
    let use_case = Arc::new(
        ConductInterviewUseCase::new(turns, Arc::new(InMemoryConversationStore::new()))
            .with_logger(logger),
    );

    ChatRepl::new(use_case, persona)
        .with_progress(!quiet)
        .run()
        .await?;
    Ok(())
}

fn replay(config: &FileConfig, file: &Path, json: bool) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let transcript: Transcript = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of turns", file.display()))?;

    let orchestrator = InterviewOrchestrator::new(behavior(config).termination);
    let state = orchestrator.replay(&transcript);

    if json {
        let output = serde_json::json!({
            "stage": state.stage,
            "done": state.is_done(),
            "completion": state.completion,
            "profile": state.profile,
            "turn_count": transcript.turn_count(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", ConsoleFormatter::replay(&state, transcript.turn_count()));
    }
    Ok(())
}

fn show_config(config: &FileConfig, explicit: Option<&std::path::PathBuf>) -> Result<()> {
    ConfigLoader::print_config_sources(explicit);
    println!();

    let mut shown = config.clone();
    for key in [
        &mut shown.providers.openai.api_key,
        &mut shown.providers.anthropic.api_key,
        &mut shown.store.api_key,
        &mut shown.accounts.api_key,
        &mut shown.reports.api_key,
    ] {
        if key.is_some() {
            *key = Some("<redacted>".to_string());
        }
    }
    println!("{}", toml::to_string_pretty(&shown)?);

    for issue in config.validate() {
        let label = if issue.is_error() { "error" } else { "warning" };
        println!("{}: {}", label, issue.message);
    }
    Ok(())
}
