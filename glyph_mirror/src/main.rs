//! glyph_mirror: interactive entry point.

use anyhow::{Context, Result};
use clap::Parser;
use glyph_mirror::app::run;
use glyph_mirror::config::{Config, SourceKind};
use log::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Perception source
    #[arg(short, long, value_enum)]
    source: Option<SourceKind>,

    /// UDP address to listen on (udp source)
    #[arg(short, long)]
    bind: Option<String>,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<usize>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<usize>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Glyph Mirror — ASCII · Particles · Finger Drawing     ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut cfg = match &args.config {
        Some(path) => match Config::from_file(path) {
            Ok(cfg) => {
                info!("loaded configuration from {}", path);
                cfg
            }
            Err(e) => {
                warn!("failed to load {}: {}, using defaults", path, e);
                Config::default()
            }
        },
        None => Config::default(),
    };

    if let Some(source) = args.source { cfg.feed.source = source; }
    if let Some(bind) = args.bind     { cfg.feed.bind = bind; }
    if let Some(w) = args.width       { cfg.canvas.width = w; }
    if let Some(h) = args.height      { cfg.canvas.height = h; }

    match cfg.feed.source {
        SourceKind::Sim => println!("  Source: keyboard simulation  (--source udp for a tracker)"),
        SourceKind::Udp => println!("  Source: UDP tracker on {}", cfg.feed.bind),
    }
    println!();

    run(cfg).context("glyph mirror stopped")
}
