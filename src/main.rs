//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Build a sorted, sanitized index from markdown articles", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render all articles and write the output directory
    #[command(alias = "b")]
    Build,

    /// List articles, newest first
    List {
        /// List tags with article counts instead
        #[arg(short, long)]
        tags: bool,
    },

    /// Show a single article by slug
    Show {
        /// Article slug
        slug: String,
    },

    /// Validate all articles without writing output
    Check,

    /// Create a new article
    New {
        /// Title of the new article
        title: String,

        /// Excerpt for the listing
        #[arg(short, long)]
        excerpt: Option<String>,
    },

    /// Delete the output directory
    Clean,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let folio = folio::Folio::new(&base_dir)?;

    match cli.command {
        Commands::Build => {
            tracing::info!("Building articles from {:?}", folio.content_dir);
            let report = folio.build()?;
            println!(
                "Built {} articles ({} failed, {} warnings)",
                report.index.len(),
                report.failures.len(),
                report.warnings.len()
            );
        }

        Commands::List { tags } => {
            folio::commands::list::run(&folio, tags)?;
        }

        Commands::Show { slug } => {
            folio::commands::show::run(&folio, &slug)?;
        }

        Commands::Check => {
            folio::commands::check::run(&folio)?;
        }

        Commands::New { title, excerpt } => {
            let path = folio.new_article(&title, excerpt.as_deref())?;
            println!("Created: {:?}", path);
        }

        Commands::Clean => {
            folio.clean()?;
            println!("Cleaned successfully!");
        }
    }

    Ok(())
}
