use crate::config::Config;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author, version, about = "Samples webcam frames and checks them for signs of stress")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Where operator log lines go
    #[arg(long, value_enum, default_value_t = LogBackend::Log, global = true)]
    pub log_backend: LogBackend,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run stress checks, interactively or once
    Run(RunArgs),
    /// Serve a local stand-in for the classification endpoint
    ServeFakeEndpoint {
        #[arg(long, default_value = "127.0.0.1:5000")]
        bind: String,
    },
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// JSON config file; flags below override its fields
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds, 0 waits indefinitely
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long)]
    pub frames: Option<usize>,

    #[arg(long)]
    pub interval_ms: Option<u64>,

    #[arg(long, value_enum, default_value_t = SourceKind::Fake)]
    pub source: SourceKind,

    #[arg(long, default_value_t = 0)]
    #[cfg_attr(not(feature = "webcam"), allow(dead_code))]
    pub camera_index: u32,

    #[arg(long, value_enum, default_value_t = ClassifierKind::Http)]
    pub classifier: ClassifierKind,

    /// Start a single run and exit when it finishes
    #[arg(long)]
    pub once: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    Fake,
    FakeDenied,
    Webcam,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClassifierKind {
    Http,
    Fake,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogBackend {
    Console,
    Log,
}

impl RunArgs {
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.request_timeout_secs = (timeout_secs > 0).then_some(timeout_secs);
        }
        if let Some(frames) = self.frames {
            config.frame_count = frames;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.sample_interval_ms = interval_ms;
        }
        config
    }
}
