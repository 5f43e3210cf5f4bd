#![forbid(unsafe_code)]

//! kvo-demo binary entry point.

use clap::Parser;
use kvo_demo::{app, cli};
use tracing_subscriber::EnvFilter;

fn init_tracing(filter: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_new(filter)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()?;
    Ok(())
}

fn main() {
    let opts = cli::Opts::parse();

    if let Err(e) = init_tracing(&opts.log) {
        eprintln!("Invalid log filter '{}': {e}", opts.log);
        std::process::exit(1);
    }

    let snapshot = match app::run_session(&opts) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Session error: {e}");
            std::process::exit(1);
        }
    };

    if opts.json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to encode labels: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print!("{snapshot}");
    }
}
