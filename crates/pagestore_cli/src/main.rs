//! pagestore CLI
//!
//! Command-line tools for inspecting and maintaining a pagestore database.
//!
//! # Commands
//!
//! - `status` - Check connectivity and count registered records
//! - `users`, `domains` - List users or custom domains
//! - `pages`, `files` - List a tenant's pages or files
//! - `page` - Print the markdown of one page
//! - `allocate` - Draw the next key from a table counter
//! - `reset` - Wipe the isolated (test) namespace

mod commands;

use clap::{Parser, Subcommand};
use pagestore_core::{Config, PoolConfig, RecordStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// pagestore command-line database tools.
#[derive(Parser)]
#[command(name = "pagestore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address of the key-value store
    #[arg(global = true, short, long, env = "PAGESTORE_URL", default_value = "redis://127.0.0.1:6379")]
    url: String,

    /// Confine every command to the isolated (test) database
    #[arg(global = true, short, long, env = "PAGESTORE_ISOLATED")]
    isolated: bool,

    /// Directory holding uploaded file payloads
    #[arg(global = true, short, long, env = "PAGESTORE_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check connectivity and count registered records
    Status {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List every user
    Users,

    /// List every custom domain
    Domains,

    /// List the pages of a tenant
    Pages {
        /// Tenant domain
        #[arg(long)]
        domain: String,
    },

    /// List the uploaded files of a tenant
    Files {
        /// Tenant domain
        #[arg(long)]
        domain: String,
    },

    /// Print the markdown of a page
    Page {
        /// Tenant domain
        #[arg(long)]
        domain: String,

        /// Page name
        #[arg(long)]
        name: String,
    },

    /// Draw the next key from a table counter
    Allocate {
        /// Table name
        table: String,
    },

    /// Wipe the isolated namespace (requires --isolated)
    Reset,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Version = cli.command {
        println!("pagestore CLI v{}", env!("CARGO_PKG_VERSION"));
        println!("pagestore core v{}", pagestore_core::VERSION);
        return Ok(());
    }

    let pool = if cli.isolated {
        PoolConfig::isolated()
    } else {
        PoolConfig::default()
    };
    let config = Config::new()
        .url(cli.url)
        .pool(pool)
        .data_dir(cli.data_dir);
    let store = RecordStore::connect(config)?;

    match cli.command {
        Commands::Status { format } => commands::status::run(&store, &format)?,
        Commands::Users => commands::list::users(&store)?,
        Commands::Domains => commands::list::domains(&store)?,
        Commands::Pages { domain } => commands::list::pages(&store, &domain)?,
        Commands::Files { domain } => commands::list::files(&store, &domain)?,
        Commands::Page { domain, name } => commands::page::run(&store, &domain, &name)?,
        Commands::Allocate { table } => commands::allocate::run(&store, &table)?,
        Commands::Reset => commands::reset::run(&store)?,
        Commands::Version => {}
    }

    Ok(())
}
