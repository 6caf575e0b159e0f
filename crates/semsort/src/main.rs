use anyhow::Result;
use clap::{Parser, Subcommand};
use semsort_common::{logger, AppConfig, EmbeddingBackend, StoreBackend};
use semsort_embed::OllamaEmbedder;
use std::path::PathBuf;
use std::time::Duration;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env from `root`, falling back to the current directory and its parents
fn load_dotenv(root: Option<PathBuf>) -> Option<PathBuf> {
    match root.map(|root| root.join(".env")) {
        Some(env_path) if env_path.exists() => dotenv::from_path(&env_path).ok().map(|_| env_path),
        _ => dotenv::dotenv().ok(),
    }
}

#[derive(Parser)]
#[command(name = "semsort")]
#[command(about = "SemSort - text entries ranked by embedding similarity", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,

        /// Persistence backend (supabase or json)
        #[arg(long)]
        store: Option<String>,

        /// Embedding backend (huggingface or ollama)
        #[arg(long)]
        embedder: Option<String>,

        /// JSON store file
        #[arg(long)]
        data_path: Option<PathBuf>,
    },

    /// Validate configuration and print it without secrets
    Check,
}

fn apply_overrides(
    config: &mut AppConfig,
    host: Option<String>,
    port: Option<u16>,
    store: Option<String>,
    embedder: Option<String>,
    data_path: Option<PathBuf>,
) -> Result<()> {
    if let Some(host) = host {
        config.server_host = host;
    }
    if let Some(port) = port {
        config.server_port = port;
    }
    if let Some(store) = store {
        config.store_backend = store.parse::<StoreBackend>()?;
    }
    if let Some(embedder) = embedder {
        config.embedding_backend = embedder.parse::<EmbeddingBackend>()?;
    }
    if let Some(data_path) = data_path {
        config.data_path = data_path;
    }
    Ok(())
}

/// Whether the configured Ollama server answers its model listing
async fn ollama_reachable(config: &AppConfig) -> Result<bool> {
    let ollama = OllamaEmbedder::new(
        &config.ollama_base_url,
        &config.embedding_model,
        Duration::from_secs(config.http_timeout_secs),
    )?;
    Ok(ollama.test_connection().await?)
}

async fn serve(config: AppConfig) -> Result<()> {
    config.validate()?;
    config.ensure_directories()?;
    logger::setup_logging(&config)?;

    tracing::info!("SemSort starting...");
    tracing::info!("  Bind: {}", config.server_bind_address());
    tracing::info!("  Store: {:?}", config.store_backend);
    tracing::info!(
        "  Embedder: {:?} ({})",
        config.embedding_backend,
        config.active_embedding_model()
    );

    println!("Server listening on http://{}", config.server_bind_address());
    semsort_server::start_server(config).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_dotenv(find_project_root());
    let mut config = AppConfig::from_env()?;

    match cli.command {
        Some(Commands::Serve {
            host,
            port,
            store,
            embedder,
            data_path,
        }) => {
            apply_overrides(&mut config, host, port, store, embedder, data_path)?;
            serve(config).await?;
        }
        Some(Commands::Check) => {
            logger::setup_console_logging(&config.log_level)?;
            config.validate()?;

            let mut shown = config.clone();
            shown.hf_api_token = shown.hf_api_token.map(|_| "***".to_string());
            shown.supabase_key = shown.supabase_key.map(|_| "***".to_string());
            println!("{:#?}", shown);

            if config.embedding_backend == EmbeddingBackend::Ollama {
                match ollama_reachable(&config).await {
                    Ok(true) => tracing::info!("Ollama reachable at {}", config.ollama_base_url),
                    Ok(false) => tracing::warn!("Ollama at {} answered with an error", config.ollama_base_url),
                    Err(e) => tracing::warn!("{}", e),
                }
            }
            tracing::info!("Configuration OK");
        }
        None => serve(config).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let mut config = AppConfig::default();
        apply_overrides(
            &mut config,
            Some("0.0.0.0".to_string()),
            Some(9000),
            Some("json".to_string()),
            Some("ollama".to_string()),
            Some(PathBuf::from("/tmp/entries.json")),
        )
        .unwrap();

        assert_eq!(config.server_bind_address(), "0.0.0.0:9000");
        assert_eq!(config.store_backend, StoreBackend::Json);
        assert_eq!(config.embedding_backend, EmbeddingBackend::Ollama);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dotenv_loaded_from_root() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env");
        std::fs::write(&env_path, "SEMSORT_DOTENV_ROOT_MARKER=from-root\n").unwrap();

        assert_eq!(load_dotenv(Some(dir.path().to_path_buf())), Some(env_path));
        assert_eq!(
            std::env::var("SEMSORT_DOTENV_ROOT_MARKER").as_deref(),
            Ok("from-root")
        );
    }

    #[tokio::test]
    async fn test_ollama_reachable() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "models": [] })))
            .mount(&server)
            .await;

        let mut config = AppConfig::default();
        config.embedding_backend = EmbeddingBackend::Ollama;
        config.ollama_base_url = server.uri();
        assert!(ollama_reachable(&config).await.unwrap());

        config.ollama_base_url = format!("{}/missing", server.uri());
        assert!(!ollama_reachable(&config).await.unwrap());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let mut config = AppConfig::default();
        assert!(apply_overrides(&mut config, None, None, Some("redis".to_string()), None, None).is_err());
    }
}
