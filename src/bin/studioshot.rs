//! CLI for studioshot - studio-style photo transformations.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use studioshot::config::env_api_key;
use studioshot::orchestrator::LOADING_MESSAGES;
use studioshot::{
    CredentialStore, GeminiModel, KeyCheck, KeyStatus, Orchestrator, SourceImage, StudioClient,
    StudioConfig, TransformState, ValidatedCredential,
};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "studioshot")]
#[command(about = "Turn everyday photos into studio-quality shots with Gemini")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Storage file for the API key
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Image model
    #[arg(long, global = true, value_enum, default_value = "flash")]
    model: ModelArg,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the stored API key
    #[command(subcommand)]
    Key(KeyCommand),

    /// List available studio styles
    Styles,

    /// Restyle a photo
    Transform(TransformArgs),
}

#[derive(Subcommand)]
enum KeyCommand {
    /// Validate a key and save it
    Set {
        /// The Gemini API key
        key: String,
    },

    /// Check the stored key
    Status,
}

#[derive(Args)]
struct TransformArgs {
    /// Photo to restyle (file path or data URI)
    input: String,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,

    /// Style id (see `studioshot styles`)
    #[arg(short, long)]
    style: Option<String>,

    /// Extra instructions for the model
    #[arg(short, long)]
    instructions: Option<String>,

    /// Print the result as a data URL
    #[arg(long)]
    data_url: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    Flash,
    Pro,
}

impl From<ModelArg> for GeminiModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Flash => GeminiModel::FlashImage,
            ModelArg::Pro => GeminiModel::ProImage,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut builder = StudioConfig::builder().model(cli.model.into());
    if let Some(store) = &cli.store {
        builder = builder.store_path(store);
    }
    let config = builder.build()?;

    match cli.command {
        Commands::Key(KeyCommand::Set { key }) => {
            set_key(&config, &key, cli.json).await?;
        }
        Commands::Key(KeyCommand::Status) => {
            key_status(&config, cli.json).await?;
        }
        Commands::Styles => {
            list_styles(&config, cli.json)?;
        }
        Commands::Transform(args) => {
            transform(&config, args, cli.json).await?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_store(config: &StudioConfig) -> anyhow::Result<(Arc<dyn StudioClient>, CredentialStore)> {
    let client: Arc<dyn StudioClient> = Arc::new(config.client()?);
    let store = CredentialStore::new(Box::new(config.storage()), client.clone());
    Ok((client, store))
}

async fn set_key(config: &StudioConfig, key: &str, json_output: bool) -> anyhow::Result<()> {
    let (_, mut store) = open_store(config)?;
    store.submit(key).await?;

    if json_output {
        let result = serde_json::json!({
            "success": true,
            "status": "validated",
            "store": config.store_path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("API key validated and saved to {}", config.store_path.display());
    }
    Ok(())
}

async fn key_status(config: &StudioConfig, json_output: bool) -> anyhow::Result<()> {
    let (_, mut store) = open_store(config)?;
    let status = store.initialize().await;

    let detail = match store.last_check() {
        Some(KeyCheck::InvalidKey) => Some("the stored key was rejected".to_string()),
        Some(KeyCheck::Unreachable(reason)) => Some(reason.clone()),
        Some(KeyCheck::Valid) | None => None,
    };

    let label = match status {
        KeyStatus::Missing => "missing",
        KeyStatus::Unvalidated => "unvalidated",
        KeyStatus::Validated => "validated",
    };

    if json_output {
        let result = serde_json::json!({
            "status": label,
            "detail": detail,
            "store": config.store_path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("API key: {label}");
        if let Some(detail) = detail {
            println!("  {detail}");
        }
        if status == KeyStatus::Missing {
            println!("  Run `studioshot key set <KEY>` to add one.");
        }
    }
    Ok(())
}

fn list_styles(config: &StudioConfig, json_output: bool) -> anyhow::Result<()> {
    let catalog = config.catalog()?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(catalog.styles())?);
    } else {
        println!("Available styles:\n");
        for (i, style) in catalog.styles().iter().enumerate() {
            let marker = if i == 0 { " (default)" } else { "" };
            println!("  {}{} - {}", style.id, marker, style.name);
            println!("    {}", style.description);
        }
    }
    Ok(())
}

async fn resolve_credential(store: &mut CredentialStore) -> anyhow::Result<ValidatedCredential> {
    if store.initialize().await == KeyStatus::Validated {
        if let Some(credential) = store.credential() {
            return Ok(credential.clone());
        }
    }
    match env_api_key() {
        Some(key) => Ok(store.submit(&key).await?),
        None => anyhow::bail!(
            "No valid API key. Run `studioshot key set <KEY>` or set GOOGLE_API_KEY."
        ),
    }
}

async fn print_progress(mut updates: watch::Receiver<usize>, quiet: bool) {
    loop {
        let index = *updates.borrow_and_update();
        if !quiet {
            eprintln!("{}", LOADING_MESSAGES[index % LOADING_MESSAGES.len()]);
        }
        if updates.changed().await.is_err() {
            break;
        }
    }
}

async fn transform(
    config: &StudioConfig,
    args: TransformArgs,
    json_output: bool,
) -> anyhow::Result<()> {
    let (client, mut store) = open_store(config)?;
    let credential = resolve_credential(&mut store).await?;

    let image = if args.input.starts_with("data:") {
        SourceImage::from_data_uri(&args.input)?
    } else {
        SourceImage::from_path(&args.input)?
    };

    let mut studio = Orchestrator::new(client, config.catalog()?)
        .with_progress_interval(config.progress_interval);
    studio.set_credential(credential)?;
    studio.set_image(image)?;
    if let Some(style) = &args.style {
        studio.select_style(style)?;
    }
    if let Some(instructions) = args.instructions {
        studio.set_instructions(instructions)?;
    }

    let request = studio.begin()?;
    let printer = studio
        .progress_updates()
        .map(|updates| tokio::spawn(print_progress(updates, json_output)));
    let outcome = studio.execute(&request).await;
    studio.finish(outcome);
    if let Some(printer) = printer {
        let _ = printer.await;
    }

    let image = match studio.state() {
        TransformState::Success(image) => image,
        TransformState::Error(message) => anyhow::bail!("{message}"),
        other => anyhow::bail!("transformation ended in unexpected state: {}", other.status()),
    };
    image.save(&args.output)?;

    if json_output {
        let result = serde_json::json!({
            "success": true,
            "output": args.output.display().to_string(),
            "size_bytes": image.size(),
            "style": studio.selected_style().id,
            "model": image.metadata.model,
            "duration_ms": image.metadata.duration_ms,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if args.data_url {
        println!("{}", image.to_data_url());
    } else {
        println!(
            "Generated image: {} ({} bytes) in style {}",
            args.output.display(),
            image.size(),
            studio.selected_style().id
        );
        if let Some(duration) = image.metadata.duration_ms {
            println!("Duration: {}ms", duration);
        }
    }

    Ok(())
}
