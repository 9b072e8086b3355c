//! Resume Analysis Engine
//!
//! Conversational resume analysis service:
//! - document upload, text extraction, and LLM-backed structured extraction
//! - per-session chat and interview-prep flows
//! - a supervised background worker ingesting messaging-provider updates

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::signal;
use tracing::{error, info, warn};

use api::{router, AppState};
use conversation::{ConversationStateMachine, SessionStore};
use extract::DocumentTextExtractor;
use gemini_client::{GeminiClient, GeminiConfig};
use telemetry::{health, init_tracing_from_env};
use worker::{BotConfig, BotGateway, DeploymentMode, LifecycleConfig, ProcessLifecycleManager};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Start the ingestion worker before serving (cloud deployments).
    #[serde(default)]
    autostart: bool,

    #[serde(default)]
    bot: BotConfig,

    #[serde(default)]
    gemini: GeminiConfig,

    #[serde(default)]
    lifecycle: LifecycleSettings,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            autostart: false,
            bot: BotConfig::default(),
            gemini: GeminiConfig::default(),
            lifecycle: LifecycleSettings::default(),
        }
    }
}

/// Serializable lifecycle settings, converted to `LifecycleConfig`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct LifecycleSettings {
    #[serde(default)]
    mode: DeploymentMode,
    #[serde(default = "default_start_timeout_secs")]
    start_timeout_secs: u64,
    #[serde(default = "default_stop_timeout_secs")]
    stop_timeout_secs: u64,
    #[serde(default = "default_sweep_interval_secs")]
    sweep_interval_secs: u64,
    #[serde(default = "default_session_ttl_secs")]
    session_ttl_secs: u64,
}

fn default_start_timeout_secs() -> u64 {
    3
}

fn default_stop_timeout_secs() -> u64 {
    5
}

fn default_sweep_interval_secs() -> u64 {
    300
}

fn default_session_ttl_secs() -> u64 {
    3600
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            mode: DeploymentMode::default(),
            start_timeout_secs: default_start_timeout_secs(),
            stop_timeout_secs: default_stop_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

impl LifecycleSettings {
    fn to_config(&self) -> LifecycleConfig {
        LifecycleConfig {
            mode: self.mode,
            start_timeout: Duration::from_secs(self.start_timeout_secs),
            stop_timeout: Duration::from_secs(self.stop_timeout_secs),
            sweep_interval: Duration::from_secs(self.sweep_interval_secs),
            session_ttl: Duration::from_secs(self.session_ttl_secs),
            ..LifecycleConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting Resume Analysis Engine v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration; missing credentials are fatal, not recoverable.
    let config = load_config()?;
    if config.bot.token.is_empty() {
        bail!("missing messaging-provider token (set TELEGRAM_BOT_TOKEN)");
    }
    if config.gemini.api_key.is_empty() {
        bail!("missing LLM API key (set GEMINI_API_KEY)");
    }
    health().provider.set_configured(true);
    health().llm.set_configured(true);

    // Wire the pipeline: extractor + analyzer behind the state machine,
    // gateway owned by the lifecycle manager.
    let analyzer = Arc::new(
        GeminiClient::new(config.gemini.clone()).context("Failed to create Gemini client")?,
    );
    let machine = Arc::new(ConversationStateMachine::new(
        Arc::new(SessionStore::new()),
        Arc::new(DocumentTextExtractor::new()),
        analyzer,
    ));

    let gateway =
        Arc::new(BotGateway::new(config.bot.clone()).context("Failed to create bot gateway")?);
    let lifecycle = Arc::new(ProcessLifecycleManager::new(
        config.lifecycle.to_config(),
        gateway,
        machine.clone(),
    ));

    if config.autostart {
        info!("Auto-starting ingestion worker");
        match lifecycle.start().await {
            Ok(()) => health().provider.set_healthy(),
            Err(e) => {
                health().provider.set_unhealthy(e.to_string());
                warn!("Auto-start failed, continuing without worker: {}", e);
            }
        }
    }

    // Create application state
    let state = AppState::new(machine, lifecycle.clone(), true, true);

    // Create router
    let app = router(state);

    // Start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Cleanup
    info!("Shutting down...");

    if lifecycle.phase() == worker::Phase::Running {
        if let Err(e) = lifecycle.stop().await {
            error!("Failed to stop worker: {}", e);
        }
    }

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables (RESUME__BOT__TOKEN etc.)
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("RESUME")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Flat convenience overrides matching the deployment environment.
    if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
        config.bot.token = token;
    }
    if let Ok(api_key) = std::env::var("GEMINI_API_KEY") {
        config.gemini.api_key = api_key;
    }
    if let Ok(port) = std::env::var("PORT") {
        config.port = port.parse().context("Invalid PORT value")?;
    }
    if let Ok(autostart) = std::env::var("AUTOSTART_WORKER") {
        config.autostart = autostart == "1" || autostart.to_lowercase() == "true";
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
