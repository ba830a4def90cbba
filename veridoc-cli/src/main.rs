//! VERIDOC CLI
//!
//! Command-line interface for the VERIDOC metadata resolution pipeline.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use veridoc_api::{ApiConfig, ApiServer};
use veridoc_core::error::VeridocError;
use veridoc_core::types::ResolvedMetadata;
use veridoc_resolve::{
    candidates, extract_display, normalize, MetadataResolver, ResolverConfig, FIELD_SYNONYMS,
};

/// VERIDOC - credential metadata resolution
#[derive(Parser)]
#[command(name = "veridoc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a metadata pointer and display its fields
    Resolve {
        /// Pointer: bare CID, ipfs://…, ar://…, a URL, or a JSON record
        pointer: String,
        /// Trusted proxy endpoint to try first
        #[arg(long, env = "VERIDOC_PROXY_URL")]
        proxy: Option<String>,
        /// Print the raw resolved payload instead of extracted fields
        #[arg(long)]
        raw: bool,
    },

    /// Print the candidate URL list for a pointer without fetching
    Candidates {
        /// Pointer: bare CID, ipfs://…, ar://…, a URL, or a JSON record
        pointer: String,
    },

    /// Resolve a newline-delimited file of pointers
    Batch {
        /// Input file, one pointer per line
        file: PathBuf,
        /// Trusted proxy endpoint to try first
        #[arg(long, env = "VERIDOC_PROXY_URL")]
        proxy: Option<String>,
    },

    /// Run the proxy API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "veridoc=debug,info"
    } else {
        "veridoc=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Resolve {
            pointer,
            proxy,
            raw,
        } => cmd_resolve(&pointer, proxy, raw).await,
        Commands::Candidates { pointer } => cmd_candidates(&pointer),
        Commands::Batch { file, proxy } => cmd_batch(&file, proxy).await,
        Commands::Serve { port, bind } => cmd_serve(port, &bind).await,
    }
}

/// Parses a CLI pointer argument: JSON records pass through as structures,
/// anything else is treated as a plain string pointer.
fn parse_pointer(arg: &str) -> Value {
    serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.to_string()))
}

fn resolver_config(proxy: Option<String>) -> ResolverConfig {
    let mut config = ResolverConfig::default();
    if let Some(url) = proxy {
        config = config.with_proxy(url);
    }
    config
}

/// Resolve a pointer and display its fields
async fn cmd_resolve(pointer: &str, proxy: Option<String>, raw_output: bool) -> Result<()> {
    println!("{} {}", "🔍 Resolving:".cyan().bold(), pointer);

    let raw = parse_pointer(pointer);
    let resolver = MetadataResolver::with_config(resolver_config(proxy));

    match resolver.resolve(&raw).await {
        Ok(None) => {
            println!("{}", "⚠️  Nothing to resolve in this record.".yellow());
            Ok(())
        }
        Ok(Some(meta)) => {
            print_metadata(&meta, raw_output)?;
            Ok(())
        }
        Err(VeridocError::GatewaysExhausted { pointer, attempted }) => {
            println!("\n{}", "❌ All gateways exhausted.".red().bold());
            println!("   Try these mirrors manually:");
            for url in &attempted {
                println!("   {}", url.dimmed());
            }
            bail!("resolution failed for '{}'", pointer)
        }
        Err(e) => Err(e).context("Resolution failed"),
    }
}

fn print_metadata(meta: &ResolvedMetadata, raw_output: bool) -> Result<()> {
    println!("\n{}", "✅ Resolved:".green().bold());
    if let Some(url) = &meta.resolved_url {
        println!("   {} {}", "Source:".dimmed(), url);
    }

    if raw_output {
        println!("{}", serde_json::to_string_pretty(&meta.data)?);
        return Ok(());
    }

    if let Some(name) = meta.name() {
        println!("   {} {}", "Name:".dimmed(), name);
    }
    if let Some(description) = meta.description() {
        println!("   {} {}", "Description:".dimmed(), description);
    }

    for (label, _) in FIELD_SYNONYMS {
        println!(
            "   {} {}",
            format!("{}:", label).dimmed(),
            extract_display(meta, label)
        );
    }

    Ok(())
}

/// Print candidate URLs without fetching
fn cmd_candidates(pointer: &str) -> Result<()> {
    let raw = parse_pointer(pointer);

    let Some(normalized) = normalize(&raw) else {
        println!("{}", "⚠️  Nothing to resolve in this record.".yellow());
        return Ok(());
    };

    println!(
        "{} {:?} {}",
        "📍 Normalized:".cyan().bold(),
        normalized.scheme,
        normalized.value
    );

    for url in candidates(&normalized, &veridoc_resolve::default_gateways()) {
        println!("   {}", url);
    }

    Ok(())
}

/// Resolve a file of pointers
async fn cmd_batch(file: &PathBuf, proxy: Option<String>) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let pointers: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if pointers.is_empty() {
        println!("{}", "⚠️  No pointers in input file.".yellow());
        return Ok(());
    }

    println!(
        "{} {} pointer(s)",
        "📦 Batch resolving".cyan().bold(),
        pointers.len()
    );

    let resolver = MetadataResolver::with_config(resolver_config(proxy));

    let pb = ProgressBar::new(pointers.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let mut resolved = 0u64;
    let mut skipped = 0u64;
    let mut failed = 0u64;

    for pointer in &pointers {
        let raw = parse_pointer(pointer);
        match resolver.resolve(&raw).await {
            Ok(Some(_)) => resolved += 1,
            Ok(None) => skipped += 1,
            Err(_) => failed += 1,
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    println!("\n{}", "📈 Results:".green().bold());
    println!("   Resolved: {}", resolved.to_string().green());
    println!("   Skipped:  {}", skipped.to_string().yellow());
    println!("   Failed:   {}", failed.to_string().red());

    if failed > 0 {
        bail!("{} pointer(s) failed to resolve", failed);
    }
    Ok(())
}

/// Run the proxy API server
async fn cmd_serve(port: u16, bind: &str) -> Result<()> {
    println!("{}", "🚀 Starting VERIDOC proxy API...".cyan().bold());
    println!("   {} http://{}:{}", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    println!("\n   Press Ctrl+C to stop.\n");

    let config = ApiConfig::from_env();
    let server = ApiServer::new(config);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    server.run(addr).await?;

    Ok(())
}
