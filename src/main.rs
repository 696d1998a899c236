//! Stegano Client - command-line driver for a remote steganography service.
//!
//! Selects files into slots, estimates capacity, and runs embed and extract
//! operations the way the web page does.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use stegano_client::capacity;
use stegano_client::operation::{
    Algorithm, Credential, EmbedParams, ExtractParams, HttpService, OperationController,
};
use stegano_client::presenter::{
    present, save_payload, Notice, NoticeLevel, PayloadPreview, Presentation,
};
use stegano_client::session::{JsonFileStore, SessionService, Theme};
use stegano_client::slots::{FileSlots, SelectedFile, SlotRole};
use stegano_client::ClientConfig;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stegano-client")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Client for a remote steganography service",
    long_about = "Hide a secret file inside a cover image, audio or video file, or recover it, using a Stegano service."
)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Service base URL (overrides config and STEGANO_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum AlgoArg {
    Aes,
    Rsa,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Dark,
    Light,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate how many secret bytes a cover image can hold
    Capacity {
        /// Cover file
        cover: PathBuf,
    },

    /// Hide a secret file inside a cover file
    Embed {
        /// Cover file (image, audio or video)
        #[arg(long)]
        cover: PathBuf,

        /// Secret file to hide
        #[arg(long)]
        secret: PathBuf,

        /// Encryption algorithm
        #[arg(long, value_enum, default_value = "aes")]
        algo: AlgoArg,

        /// PEM public key (required with --algo rsa)
        #[arg(long)]
        public_key: Option<PathBuf>,
    },

    /// Recover a hidden file from a stego file
    Extract {
        /// Stego file
        #[arg(long)]
        stego: PathBuf,

        /// PEM private key for RSA payloads (otherwise a password is prompted)
        #[arg(long)]
        private_key: Option<PathBuf>,

        /// Directory to save the recovered file into
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Simulated login and profile state
    Session {
        /// Session store file
        #[arg(long, default_value = "stegano-session.json")]
        store: PathBuf,

        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Log in as the demo user
    Login,
    /// Log out
    Logout,
    /// Show profile
    Show,
    /// Set the color theme
    Theme {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stegano_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Capacity { cover } => cmd_capacity(&cover).await,

        Commands::Embed {
            cover,
            secret,
            algo,
            public_key,
        } => {
            let config = load_config(cli.config.as_deref(), cli.url)?;
            cmd_embed(config, &cover, &secret, algo, public_key.as_deref()).await
        }

        Commands::Extract {
            stego,
            private_key,
            output_dir,
        } => {
            let config = load_config(cli.config.as_deref(), cli.url)?;
            cmd_extract(config, &stego, private_key.as_deref(), &output_dir).await
        }

        Commands::Session { store, action } => cmd_session(&store, action),
    }
}

fn load_config(path: Option<&Path>, url: Option<String>) -> anyhow::Result<ClientConfig> {
    let mut config = match path {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ClientConfig::default(),
    }
    .with_env_overrides();

    if let Some(url) = url {
        config.base_url = url;
    }
    Ok(config)
}

fn prompt_password(prompt: &str) -> anyhow::Result<String> {
    match rpassword::prompt_password(prompt) {
        Ok(password) => Ok(password),
        Err(_) => {
            eprint!("{}", prompt);
            io::stderr().flush()?;
            let mut password = String::new();
            io::stdin().read_line(&mut password)?;
            Ok(password.trim().to_string())
        }
    }
}

fn print_notice(notice: Option<Notice>) {
    if let Some(notice) = notice {
        eprintln!("[{}] {}", notice.level.class_name(), notice.message);
    }
}

async fn select(slots: &mut FileSlots, role: SlotRole, path: &Path) -> anyhow::Result<()> {
    let file = SelectedFile::from_path(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let desc = slots.select(role, file);
    println!(
        "{:<7} {} {} ({})",
        role.label(),
        desc.icon.glyph(),
        desc.name,
        desc.human_size
    );
    Ok(())
}

async fn cmd_capacity(cover: &Path) -> anyhow::Result<()> {
    let mut slots = FileSlots::new();
    select(&mut slots, SlotRole::Cover, cover).await?;

    let file = slots
        .current(SlotRole::Cover)
        .context("cover slot is empty")?;
    match capacity::estimate(file).await {
        Some(estimate) => println!("{}", estimate),
        None => println!("No estimate (not a decodable image)"),
    }
    Ok(())
}

async fn cmd_embed(
    config: ClientConfig,
    cover: &Path,
    secret: &Path,
    algo: AlgoArg,
    public_key: Option<&Path>,
) -> anyhow::Result<()> {
    let algorithm = match (algo, public_key) {
        (AlgoArg::Aes, _) => Algorithm::Aes {
            password: prompt_password("Password: ")?,
        },
        (AlgoArg::Rsa, Some(path)) => Algorithm::Rsa {
            public_key_pem: std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?,
        },
        (AlgoArg::Rsa, None) => bail!("--public-key is required with --algo rsa"),
    };

    let mut slots = FileSlots::new();
    select(&mut slots, SlotRole::Cover, cover).await?;
    select(&mut slots, SlotRole::Secret, secret).await?;
    if let Some(cover) = slots.current(SlotRole::Cover) {
        if let Some(estimate) = capacity::estimate(cover).await {
            println!("{}", estimate);
        }
    }

    let controller = OperationController::new(HttpService::new(config)?);
    let operation = controller.embed(&slots, EmbedParams { algorithm }).await?;
    let presentation = present(&operation);
    print_notice(presentation.notice());

    match presentation {
        Presentation::Embedded {
            download_url,
            share,
        } => {
            println!();
            println!("Download:  {}", download_url);
            println!("Email:     {}", share.email);
            println!("WhatsApp:  {}", share.whatsapp);
            println!("Telegram:  {}", share.telegram);
            Ok(())
        }
        Presentation::Failed { reason } => bail!(reason),
        _ => Ok(()),
    }
}

async fn cmd_extract(
    config: ClientConfig,
    stego: &Path,
    private_key: Option<&Path>,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let credential = match private_key {
        Some(path) => Credential::PrivateKey(
            std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?,
        ),
        None => Credential::Password(prompt_password("Password: ")?),
    };

    let mut slots = FileSlots::new();
    select(&mut slots, SlotRole::StegoCarrier, stego).await?;

    let controller = OperationController::new(HttpService::new(config)?);
    let operation = controller.extract(&slots, ExtractParams { credential }).await?;
    let presentation = present(&operation);
    print_notice(presentation.notice());

    match presentation {
        Presentation::Extracted { preview, payload } => {
            println!();
            match preview {
                PayloadPreview::Text { .. } => {
                    println!("{}", String::from_utf8_lossy(payload.content()))
                }
                PayloadPreview::FileInfo { name, size } => println!("📄 {} ({})", name, size),
            }
            let path = save_payload(&payload, output_dir).await?;
            println!();
            println!("Saved to {}", path.display());
            Ok(())
        }
        Presentation::Failed { reason } => bail!(reason),
        _ => Ok(()),
    }
}

fn cmd_session(store: &Path, action: SessionAction) -> anyhow::Result<()> {
    let mut session = SessionService::new(JsonFileStore::open(store)?);

    match action {
        SessionAction::Login => {
            let profile = session.demo_login()?;
            let first = profile.name.split_whitespace().next().unwrap_or("");
            print_notice(Some(Notice::new(
                NoticeLevel::Success,
                format!("Welcome back, {}!", first),
            )));
        }
        SessionAction::Logout => {
            session.logout()?;
            println!("Logged out successfully");
        }
        SessionAction::Show => {
            if !session.is_logged_in() {
                println!("Not logged in");
            }
            let profile = session.profile();
            println!("Name:             {} ({})", profile.name, profile.initials());
            println!("Email:            {}", profile.email);
            println!("Role:             {}", profile.role);
            println!("Files processed:  {}", profile.files_processed);
            println!("Theme:            {}", session.theme().as_str());
        }
        SessionAction::Theme { theme } => {
            let theme = match theme {
                ThemeArg::Dark => Theme::Dark,
                ThemeArg::Light => Theme::Light,
            };
            session.set_theme(theme)?;
            println!("Theme set to {}", theme.as_str());
        }
    }

    Ok(())
}
