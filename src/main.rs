//! # HR FAQ Chat CLI (`hrchat`)
//!
//! ## Usage
//!
//! ```bash
//! hrchat --config ./config/hrchat.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `hrchat serve` | Start the HTTP API |
//! | `hrchat ask "<text>"` | Answer one question through the full pipeline |
//! | `hrchat check` | Validate settings and data files |
//! | `hrchat chat` | Terminal chat client for a running server |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use hr_faq_chat::ask::AskService;
use hr_faq_chat::{client, config, data, logging, server};

/// HR FAQ Chat: curated FAQ answers with a hosted-model fallback.
#[derive(Parser)]
#[command(
    name = "hrchat",
    about = "HR FAQ Chat: curated FAQ answers with a hosted-model fallback",
    version
)]
struct Cli {
    /// Path to the settings file (TOML).
    ///
    /// Defaults to `./config/hrchat.toml`. Data file paths inside it are
    /// resolved relative to its directory.
    #[arg(long, global = true, default_value = "./config/hrchat.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API.
    ///
    /// Embeds the FAQ questions once, then serves `/api/config`, `/api/sss`,
    /// `/api/ask`, and `/health` on `[server].bind` (or `0.0.0.0:$PORT`).
    Serve,

    /// Answer one question through the FAQ matcher and model fallback.
    Ask {
        /// The question text.
        text: String,

        /// Print the JSON response body instead of the bare answer.
        #[arg(long)]
        json: bool,
    },

    /// Load and validate the settings and data files.
    Check,

    /// Chat with a running server from the terminal.
    ///
    /// Does not read the settings file. Type `/quit` to leave.
    Chat {
        /// Server base URL.
        #[arg(long, default_value = "http://127.0.0.1:3001")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    logging::init_logging();

    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Chat { url } = &cli.command {
        return client::run_chat(url).await;
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Ask { text, json } => {
            let data = data::load_data(&cfg.data)?;
            let service = AskService::from_config(&cfg, &data)?;
            let resp = service.ask(&text).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&resp)?);
            } else {
                println!("{}", resp.answer);
                eprintln!("(source: {})", resp.source.as_str());
            }
        }
        Commands::Check => {
            let data = data::load_data(&cfg.data)?;
            println!("Config OK: {}", cli.config.display());
            println!("  brand:        {}", data.config.brand);
            println!("  FAQ entries:  {}", data.faq.len());
            println!("  facts:        {}", data.config.facts.len());
            println!("  whitelist:    {} patterns", data.config.whitelist.len());
            println!(
                "  embedding:    {} ({})",
                cfg.embedding.provider,
                cfg.embedding.model.as_deref().unwrap_or("-")
            );
            println!("  completion:   {}", cfg.completion.model);
            println!("  threshold:    {}", cfg.matcher.threshold);
        }
        Commands::Chat { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
