use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docwatch_core::{load_app_config, AppConfig, StatusVocabulary};
use docwatch_extract::ExtractOptions;
use docwatch_monitor::{
    run_check_cycle, run_monitor, CycleDeps, CycleSettings, FileBaselineStore,
    HttpFallbackFetcher, HttpPageSource, HttpTranslator, LogNotifier, MonitorSettings,
    NoopTranslator, Notifier, Translator, VocabHandle, VocabWatcher, WebhookNotifier,
};

#[derive(Debug, Parser)]
#[command(name = "docwatch")]
#[command(about = "Document status monitor for government application portals")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a single check cycle and print the current status.
    Check,
    /// Keep checking on the configured interval until interrupted.
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Check) {
        Commands::Check => check(&config).await,
        Commands::Watch => watch(&config).await,
    }
}

/// The HTTP-backed collaborators a cycle needs, built once from config.
struct Collaborators {
    source: HttpPageSource,
    fallback: HttpFallbackFetcher,
    translator: Box<dyn Translator>,
    notifier: Box<dyn Notifier>,
    baseline: FileBaselineStore,
}

impl Collaborators {
    fn build(config: &AppConfig) -> anyhow::Result<Self> {
        let source = HttpPageSource::new(
            &config.portal_base_url,
            config.fetch_timeout_secs,
            &config.user_agent,
            config.fetch_max_retries,
            config.fetch_backoff_base_secs,
        )?;
        let fallback = HttpFallbackFetcher::new(
            &config.portal_base_url,
            &config.fallback_status_path,
            config.fallback_timeout_secs,
            &config.user_agent,
        )?;

        // Same source and target language means translation is a no-op;
        // skip the network round-trips entirely.
        let translator: Box<dyn Translator> =
            if config.translate_source_lang == config.translate_target_lang {
                Box::new(NoopTranslator)
            } else {
                Box::new(HttpTranslator::new(
                    &config.translate_url,
                    &config.translate_source_lang,
                    &config.translate_target_lang,
                    config.translate_timeout_secs,
                )?)
            };

        let notifier: Box<dyn Notifier> = match &config.notify_webhook_url {
            Some(url) => Box::new(WebhookNotifier::new(url, config.fetch_timeout_secs)?),
            None => Box::new(LogNotifier),
        };

        Ok(Self {
            source,
            fallback,
            translator,
            notifier,
            baseline: FileBaselineStore::new(config.baseline_path.clone()),
        })
    }

    fn deps(&self) -> CycleDeps<'_> {
        CycleDeps {
            source: &self.source,
            fallback: Some(&self.fallback),
            translator: self.translator.as_ref(),
            notifier: self.notifier.as_ref(),
            baseline: &self.baseline,
        }
    }
}

fn load_vocab(config: &AppConfig) -> anyhow::Result<StatusVocabulary> {
    match &config.vocab_path {
        Some(path) => Ok(StatusVocabulary::from_yaml_file(path)?),
        None => Ok(StatusVocabulary::default()),
    }
}

fn extract_opts(config: &AppConfig) -> ExtractOptions {
    ExtractOptions {
        min_container_len: config.min_container_len,
    }
}

async fn check(config: &AppConfig) -> anyhow::Result<()> {
    let vocab = load_vocab(config)?;
    let collaborators = Collaborators::build(config)?;
    let settings = CycleSettings {
        record_code: &config.record_code,
        extract_opts: extract_opts(config),
        page_dump_dir: config.page_dump_dir.as_deref(),
    };

    let outcome = run_check_cycle(&collaborators.deps(), &settings, &vocab).await?;
    println!("{}", outcome.status);
    if outcome.changed {
        println!("(changed since last check)");
    }
    Ok(())
}

async fn watch(config: &AppConfig) -> anyhow::Result<()> {
    let collaborators = Collaborators::build(config)?;
    let vocab = VocabHandle::new(load_vocab(config)?);
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    if let Some(path) = &config.vocab_path {
        let watcher = VocabWatcher::new(path.clone(), vocab.clone());
        tokio::spawn(watcher.run(
            Duration::from_secs(config.vocab_poll_interval_secs),
            shutdown_rx.clone(),
        ));
    }

    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let settings = MonitorSettings {
        record_code: config.record_code.clone(),
        check_interval: Duration::from_secs(config.check_interval_secs),
        extract_opts: extract_opts(config),
        page_dump_dir: config.page_dump_dir.clone(),
    };

    run_monitor(&collaborators.deps(), &settings, &vocab, shutdown_rx).await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, stopping after the current cycle");
}
