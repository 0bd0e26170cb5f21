//! Report Editor Binary
//!
//! Entry point for the report regeneration CLI.

use clap::{Parser, Subcommand};
use report_editor::{commands, parse_assignment, OverlayArgs, RegenerateArgs};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "report-editor")]
#[command(version, about = "Overlay new field values onto an existing report PDF")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill template values into the report and write the result
    Regenerate {
        /// Original report PDF
        #[arg(long)]
        source: PathBuf,

        /// Extracted words (JSON array)
        #[arg(long)]
        words: PathBuf,

        /// Field template (TOML)
        #[arg(long)]
        template: PathBuf,

        /// Replacement image (PNG or JPEG)
        #[arg(long)]
        image: Option<PathBuf>,

        /// Override a field value, e.g. --set name="Jane Doe"
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,

        /// Output path (defaults to the template's output filename)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Print a JSON result envelope on stdout
        #[arg(long)]
        json: bool,
    },

    /// Print the positions of one or more labels as JSON
    Locate {
        #[arg(long)]
        words: PathBuf,

        #[arg(long = "label", required = true)]
        labels: Vec<String>,
    },

    /// Write only the overlay pages, for previewing
    Overlay {
        #[arg(long)]
        source: PathBuf,

        #[arg(long)]
        words: PathBuf,

        #[arg(long)]
        template: PathBuf,

        #[arg(long)]
        image: Option<PathBuf>,

        #[arg(short, long)]
        out: PathBuf,
    },

    /// Stamp an overlay PDF onto a source PDF, page by page
    Stamp {
        #[arg(long)]
        source: PathBuf,

        #[arg(long)]
        overlay: PathBuf,

        #[arg(short, long)]
        out: PathBuf,
    },
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    match cli.command {
        Command::Regenerate {
            source,
            words,
            template,
            image,
            set,
            out,
            json,
        } => {
            let report = commands::regenerate(&RegenerateArgs {
                source,
                words,
                template,
                image,
                set,
                out,
                json,
            })?;
            if json {
                println!("{}", report.result.to_json()?);
            }
            Ok(report.result.success)
        }
        Command::Locate { words, labels } => {
            let found = commands::locate_labels(&words, &labels)?;
            println!("{}", serde_json::to_string_pretty(&found)?);
            Ok(true)
        }
        Command::Overlay {
            source,
            words,
            template,
            image,
            out,
        } => {
            let pages = commands::overlay(&OverlayArgs {
                source,
                words,
                template,
                image,
                out,
            })?;
            tracing::info!(pages, "overlay written");
            Ok(true)
        }
        Command::Stamp {
            source,
            overlay,
            out,
        } => {
            commands::stamp(&source, &overlay, &out)?;
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries JSON output, so logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
