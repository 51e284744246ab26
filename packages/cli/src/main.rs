use std::path::PathBuf;

use api::{ApiClient, ClientConfig};
use clap::{ArgAction, Parser, Subcommand};
use store::FileStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "gallery")]
#[command(about = "Upload, browse and describe images in your gallery")]
struct Cli {
    /// Backend base URL, overriding config file and environment.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Config file (defaults to ./gallery.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory the login token is kept in.
    #[arg(long, global = true)]
    token_dir: Option<PathBuf>,
    /// Print results as JSON.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account and log in.
    Register {
        username: String,
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and remember the token.
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored token.
    Logout,
    /// Show the signed-in account.
    Whoami,
    /// List your images.
    List,
    /// Show one image.
    Show { id: String },
    /// Upload an image file.
    Upload {
        path: PathBuf,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Run AI analysis right after upload.
        #[arg(long, default_value_t = false)]
        analyze: bool,
        /// Custom analysis prompt (implies --analyze).
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Ask for an AI description of an image.
    Analyze {
        id: String,
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Delete an image.
    Delete { id: String },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Config file (explicit, or `./gallery.toml` if it exists), then environment,
/// then `--api-url`.
fn client_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let local = PathBuf::from(ClientConfig::filename());
    let config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None if local.is_file() => ClientConfig::load(&local)?,
        None => ClientConfig::default(),
    };
    let mut config = config.merge_env()?;
    if let Some(url) = &cli.api_url {
        config.base_url = url.clone();
    }
    Ok(config)
}

fn token_store(cli: &Cli) -> FileStore {
    let dir = cli
        .token_dir
        .clone()
        .or_else(FileStore::default_dir)
        .unwrap_or_else(|| PathBuf::from(".gallery"));
    FileStore::new(dir)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = client_config(&cli)?;
    tracing::debug!("Using backend {}", config.base_url);

    let client = ApiClient::new(&config, token_store(&cli))?;
    commands::run(cli.command, &client, cli.json).await
}
