//! camstream-demo entry point.
//!
//! ```text
//! camstream-demo                   Interactive shell on stdin
//! camstream-demo --script <path>   Run commands from a file
//! camstream-demo --config <path>   Load a custom config TOML
//! camstream-demo --gen-config      Write default config to stdout
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use camstream_demo::config::DemoConfig;
use camstream_demo::error::DemoError;
use camstream_demo::shell::{Reply, Shell};

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "camstream-demo", about = "Camera streaming session shell")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "camstream-demo.toml")]
    config: PathBuf,

    /// Read commands from this file instead of stdin.
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // --gen-config: dump defaults and exit.
    if cli.gen_config {
        let text = toml::to_string_pretty(&DemoConfig::default()).map_err(DemoError::from)?;
        println!("{text}");
        return Ok(());
    }

    // Load config.
    let config = DemoConfig::load(&cli.config);

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("camstream-demo v{}", env!("CARGO_PKG_VERSION"));
    info!("stream: {}", config.stream.stream_name);
    info!("region: {}", config.stream.region);
    info!("source: {:?}", config.stream.source);

    let mut shell = Shell::new(&config);
    let result = match &cli.script {
        Some(path) => run_script(&mut shell, path).await,
        None => run_interactive(&mut shell).await,
    };
    shell.shutdown();

    if let Err(e) = &result {
        error!("{e}");
    }
    result.map_err(Into::into)
}

// ── Input loops ──────────────────────────────────────────────────

/// Read commands from stdin until `quit`, end of input, or Ctrl-C.
async fn run_interactive(shell: &mut Shell) -> Result<(), DemoError> {
    println!("type 'help' for commands");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !step(shell, &line)? {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received, shutting down");
                break;
            }
        }
    }
    Ok(())
}

/// Run every line of `path`, echoing each command.
async fn run_script(shell: &mut Shell, path: &Path) -> Result<(), DemoError> {
    let text = tokio::fs::read_to_string(path).await?;
    info!("running script {}", path.display());
    for line in text.lines() {
        if !line.trim().is_empty() && !line.trim_start().starts_with('#') {
            println!("> {}", line.trim());
        }
        if !step(shell, line)? {
            break;
        }
    }
    Ok(())
}

/// Handle one line. Returns `false` when the shell should exit.
fn step(shell: &mut Shell, line: &str) -> Result<bool, DemoError> {
    match shell.handle_line(line)? {
        Reply::Print(text) => println!("{text}"),
        Reply::Silent => {}
        Reply::Quit => return Ok(false),
    }
    Ok(true)
}
