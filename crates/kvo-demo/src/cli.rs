#![forbid(unsafe_code)]

//! Command-line options for the demo session.
//!
//! Every option has a `KVO_DEMO_*` (or `KVO_LOG`) environment override.

use clap::Parser;

/// Drive a profile view through a scripted session and print its labels.
#[derive(Debug, Clone, Parser)]
#[command(name = "kvo-demo", version)]
pub struct Opts {
    /// Text typed into the input field; each value is one change.
    #[arg(long = "text", value_name = "TEXT", env = "KVO_DEMO_TEXT", value_delimiter = ',')]
    pub texts: Vec<String>,

    /// Clear the input field after typing.
    #[arg(long, env = "KVO_DEMO_CLEAR_TEXT")]
    pub clear_text: bool,

    /// Skip the name and age button taps.
    #[arg(long, env = "KVO_DEMO_NO_TAPS")]
    pub no_taps: bool,

    /// Print the final labels as JSON.
    #[arg(long, env = "KVO_DEMO_JSON")]
    pub json: bool,

    /// Log filter in `tracing-subscriber` EnvFilter syntax.
    #[arg(long, env = "KVO_LOG", default_value = "warn")]
    pub log: String,
}
