//! `voti`: command-line client for the Voti grade API.
//!
//! # Usage
//!
//! ```
//! voti --url http://localhost:3000 --user u1 add --subject Math --voto 8 --data 2025-03-10 --periodo trimestre
//! voti --config ~/.config/voti/config.toml year
//! ```

mod client;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use voti_core::grade::Period;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "voti", about = "Record and review school grades")]
struct Args {
  /// Path to a TOML config file (url, user).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the voti server (default: http://localhost:3000).
  #[arg(long, env = "VOTI_URL")]
  url: Option<String>,

  /// Owner id to read and write grades as.
  #[arg(long, env = "VOTI_USER")]
  user: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Record a new grade.
  Add {
    #[arg(long)]
    subject: String,
    #[arg(long)]
    voto:    f64,
    /// Date of the assessment, YYYY-MM-DD.
    #[arg(long)]
    data:    NaiveDate,
    /// trimestre or pentamestre.
    #[arg(long)]
    periodo: Period,
    #[arg(long)]
    note:    Option<String>,
  },
  /// List every grade, newest first.
  List {
    #[arg(long)]
    subject: Option<String>,
  },
  /// List one period's grades with its average.
  Period { period: Period },
  /// Month-by-month trend for one subject.
  Subject { name: String },
  /// Trend and averages for the whole year.
  Year,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:  String,
  #[serde(default)]
  user: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| "http://localhost:3000".to_string());
  let Some(owner_id) = args
    .user
    .or_else(|| (!file_cfg.user.is_empty()).then(|| file_cfg.user.clone()))
  else {
    bail!("no user given; pass --user, set VOTI_USER, or add `user` to the config file");
  };

  let client = ApiClient::new(ApiConfig { base_url, owner_id })?;

  match args.command {
    Command::Add {
      subject,
      voto,
      data,
      periodo,
      note,
    } => {
      client
        .add_grade(&subject, voto, data, periodo, note.as_deref())
        .await?;
      println!("Voto inserito: {subject} {voto} ({data}, {periodo})");
    }
    Command::List { subject } => {
      let grades = client.list(subject.as_deref()).await?;
      print!("{}", report::grade_lines(&grades));
    }
    Command::Period { period } => {
      let grades = client.period(period).await?;
      print!("{}", report::period_report(period, &grades));
    }
    Command::Subject { name } => {
      let entries = client.subject(&name).await?;
      print!("{}", report::subject_report(&name, &entries));
    }
    Command::Year => {
      let entries = client.year().await?;
      print!("{}", report::year_report(&entries));
    }
  }

  Ok(())
}
