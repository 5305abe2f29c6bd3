//! CLI entrypoint for Debate Practice
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use debate_application::{
    ConversationLogger, NoConversationLogger, ResponseGenerator, RunDebateUseCase,
    SessionConfigStore, SessionNotifier, spawn_round_timer,
};
use debate_domain::{
    DebateSession, FormatCatalog, PersonaCatalog, RandomDeltaScoring, SessionConfig,
    SessionConfigurator, SessionId, StoredSessionConfig,
};
use debate_infrastructure::{
    CannedResponseGenerator, ConfigLoader, FileConfig, FileSessionConfigStore,
    GeminiResponseGenerator, JsonlConversationLogger, expand_home,
};
use debate_presentation::{
    Cli, ConsoleFormatter, DebateRepl, OutputConfig, ReplConfig, SetupWizard, SimpleProgress,
    ThinkingReporter,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const OFFLINE_DELAY: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    info!("Starting Debate Practice");

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };
    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("config error: {}", issue);
        }
        bail!("Invalid configuration ({} issues)", issues.len());
    }

    OutputConfig {
        color: config.output.color,
    }
    .apply();

    let formats = FormatCatalog::builtin();
    let personas = PersonaCatalog::builtin();

    if cli.list {
        print!("{}", ConsoleFormatter::format_catalogs(&formats, &personas));
        return Ok(());
    }

    // === Dependency Injection ===
    let store = FileSessionConfigStore::new(store_path(&config)?);
    let Some(session_config) = configure(&cli, &store, formats, personas)? else {
        println!("Bye!");
        return Ok(());
    };
    if let Err(e) = store.save(&session_config.to_stored()) {
        warn!("Could not save session config: {}", e);
    }

    let generator = build_generator(&cli, &config)?;
    let repl_config = ReplConfig {
        show_progress: config.repl.show_progress && !cli.quiet,
        history_file: config.repl.history_path(),
    };
    let notifier: Arc<dyn SessionNotifier> = if repl_config.show_progress {
        Arc::new(ThinkingReporter::new())
    } else {
        Arc::new(SimpleProgress)
    };

    let session = match cli.seed {
        Some(seed) => DebateSession::start_with_scoring(
            session_config,
            Box::new(RandomDeltaScoring::seeded(seed)),
        ),
        None => DebateSession::start(session_config),
    };
    let conversation_logger = build_conversation_logger(&config, session.id());

    let use_case = RunDebateUseCase::new(session, generator)
        .with_notifier(notifier.clone())
        .with_conversation_logger(conversation_logger.clone())
        .with_behavior(config.behavior.to_behavior_config());

    let cancel = CancellationToken::new();
    let timer = spawn_round_timer(
        use_case.session(),
        notifier,
        conversation_logger,
        cancel.clone(),
    );

    let repl = DebateRepl::new(use_case).with_history_file(repl_config.history_file);
    let result = repl.run().await;

    cancel.cancel();
    let _ = timer.await;
    result?;

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = &cli.log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .context("--log-file needs a file name")?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Could not create log directory {}", dir.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

/// Combine flags, the saved setup and the wizard into a final config
fn configure(
    cli: &Cli,
    store: &FileSessionConfigStore,
    formats: FormatCatalog,
    personas: PersonaCatalog,
) -> Result<Option<SessionConfig>> {
    let mut stored = if cli.resume {
        store
            .load()
            .context("Could not read the saved setup")?
            .unwrap_or_else(|| {
                println!("No saved setup found; starting fresh.");
                StoredSessionConfig::default()
            })
    } else {
        StoredSessionConfig::default()
    };

    if let Some(topic) = &cli.topic {
        stored.topic = topic.clone();
    }
    if let Some(format) = &cli.format {
        stored.format_id = format.clone();
    }
    if let Some(persona) = &cli.persona {
        stored.personality_id = persona.clone();
    }

    // Unknown ids are fatal
    if !stored.format_id.is_empty() {
        formats.require(&stored.format_id)?;
    }
    if !stored.personality_id.is_empty() {
        personas.require(&stored.personality_id)?;
    }

    let configurator = SessionConfigurator::from_stored(formats, personas, &stored);
    if cli.has_full_setup() || (cli.resume && configurator.finalize().is_ok()) {
        return Ok(Some(configurator.finalize()?));
    }

    Ok(SetupWizard::new(configurator).run()?)
}

fn build_generator(cli: &Cli, config: &FileConfig) -> Result<Arc<dyn ResponseGenerator>> {
    if cli.offline {
        let generator = match cli.seed {
            Some(seed) => CannedResponseGenerator::seeded(seed),
            None => CannedResponseGenerator::new(),
        };
        return Ok(Arc::new(generator.with_delay(OFFLINE_DELAY)));
    }

    let generator = GeminiResponseGenerator::from_config(&config.generator)
        .context("Gemini is not configured; set the API key or run with --offline")?;
    info!("Using Gemini model {}", generator.model());
    Ok(Arc::new(generator))
}

fn build_conversation_logger(
    config: &FileConfig,
    session_id: SessionId,
) -> Arc<dyn ConversationLogger> {
    let Some(path) = config.logging.conversation_log.as_deref().map(expand_home) else {
        return Arc::new(NoConversationLogger);
    };
    match JsonlConversationLogger::open(&path, session_id) {
        Ok(logger) => {
            info!("Conversation log: {}", logger.path().display());
            Arc::new(logger) as Arc<dyn ConversationLogger>
        }
        Err(e) => {
            warn!("Could not open conversation log {}: {}", path.display(), e);
            Arc::new(NoConversationLogger)
        }
    }
}

fn store_path(config: &FileConfig) -> Result<PathBuf> {
    match config.session.store_path.as_deref() {
        Some(path) => Ok(expand_home(path)),
        None => FileSessionConfigStore::default_path()
            .context("No data directory available; set session.store_path"),
    }
}

