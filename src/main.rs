//! # Study Scout CLI (`scout`)
//!
//! The `scout` binary is the primary interface for Study Scout. It provides
//! commands for listing materials and concepts, uploading new study
//! material, printing advisory recommendations, and running the interactive
//! watch session.
//!
//! ## Usage
//!
//! ```bash
//! scout --config ./config/scout.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scout materials` | List materials and their processing status |
//! | `scout concepts <id>` | List a material's extracted concepts and matches |
//! | `scout upload` | Upload study material (notes and/or a file) |
//! | `scout advise` | Print advisory recommendations for the current state |
//! | `scout watch` | Interactive session with live selection and uploads |
//!
//! ## Examples
//!
//! ```bash
//! # List everything tracked by the pipeline
//! scout materials
//!
//! # Inspect the concepts extracted from material 501
//! scout concepts 501
//!
//! # Upload lecture notes with an attached PDF
//! scout upload --title "Linear Algebra Midterm Notes" --file notes.pdf
//!
//! # Submit a link-only material
//! scout upload --title "MIT OCW 18.06" --link
//!
//! # Machine-readable output
//! scout materials --json
//! ```

mod advise;
mod advisory;
mod api;
mod concepts;
mod config;
mod materials;
mod models;
mod normalize;
mod sample;
mod session;
mod upload;
mod watch;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Study Scout — a terminal client for a study-material concept extraction
/// and video matching pipeline.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing file falls back to built-in defaults targeting
/// `http://localhost:8000/api`; see `config/scout.example.toml`.
#[derive(Parser)]
#[command(
    name = "scout",
    about = "Study Scout — a terminal client for a study-material concept extraction and video matching pipeline",
    version,
    long_about = "Study Scout uploads study material to an external processing pipeline, watches \
    concept extraction and video matching progress, and browses the results. Read paths keep \
    working offline by substituting a built-in sample dataset."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/scout.toml`. Backend URL, bearer token, and
    /// timeout/retry settings are read from this file; the `SCOUT_API_TOKEN`
    /// environment variable overrides an absent token.
    #[arg(long, global = true, default_value = "./config/scout.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// List materials and their processing status.
    ///
    /// Fetches `GET /materials/`. When the backend is unreachable the
    /// built-in sample dataset is shown instead, with a note.
    Materials {
        /// Emit JSON (with a `source` field distinguishing live data from
        /// the sample fallback).
        #[arg(long)]
        json: bool,
    },

    /// List a material's extracted concepts and their video matches.
    ///
    /// Fetches `GET /materials/{id}/concepts/`. An empty list is normal
    /// while the material is still processing.
    Concepts {
        /// Material id.
        material_id: i64,

        /// Emit JSON.
        #[arg(long)]
        json: bool,
    },

    /// Upload study material.
    ///
    /// Posts a multipart form to `POST /upload-material/`. Upload failures
    /// are always reported; there is no offline substitution for writes.
    Upload {
        /// Title for the material (required, non-empty).
        #[arg(long)]
        title: String,

        /// Free-text notes or outline, sent as `text_content`.
        #[arg(long)]
        notes: Option<String>,

        /// File to attach as `original_file`.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Record the material as an external link instead of an upload.
        /// Ignored when --file is given.
        #[arg(long)]
        link: bool,
    },

    /// Print advisory recommendations for the current pipeline state.
    ///
    /// Evaluates the advisory rules against the selected (or first)
    /// material and its concepts. An empty result means no recommendations,
    /// not an error.
    Advise {
        /// Material to evaluate; defaults to the first in the list.
        #[arg(long)]
        material: Option<i64>,

        /// Emit JSON.
        #[arg(long)]
        json: bool,
    },

    /// Interactive session: select materials, concepts, and matches; upload
    /// and refresh without restarting.
    ///
    /// Line commands: `m <id>` select material, `c <id>` select concept,
    /// `v <id>` select match, `u <title>` upload, `r` refresh, `q` quit.
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "study_scout=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Materials { json } => {
            materials::run_materials(&cfg, json).await?;
        }
        Commands::Concepts { material_id, json } => {
            concepts::run_concepts(&cfg, material_id, json).await?;
        }
        Commands::Upload {
            title,
            notes,
            file,
            link,
        } => {
            upload::run_upload(&cfg, title, notes, file, link).await?;
        }
        Commands::Advise { material, json } => {
            advise::run_advise(&cfg, material, json).await?;
        }
        Commands::Watch => {
            watch::run_watch(&cfg).await?;
        }
    }

    Ok(())
}
