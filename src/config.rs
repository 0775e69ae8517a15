use std::{
    net::{IpAddr, Ipv4Addr},
    path::PathBuf,
};

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    Production,
    /// Enables the document root watcher.
    Development,
}

/// Everything the server needs, built once at start-up and handed to Rocket as managed state.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub root: PathBuf,
    pub static_dir: PathBuf,
    pub address: IpAddr,
    pub port: u16,
    pub mode: RunMode,
}

impl SiteConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn is_development(&self) -> bool {
        self.mode == RunMode::Development
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("docs"),
            static_dir: PathBuf::from("static"),
            address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            mode: RunMode::Production,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about = "Browse a directory of Markdown files")]
pub struct CliArgs {
    /// Directory scanned for `.md` documents
    #[arg(long, env = "DOCS_ROOT", default_value = "docs")]
    pub root: PathBuf,

    /// Directory served under `/static`
    #[arg(long, env = "DOCS_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    #[arg(long, env = "DOCS_ADDRESS", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub address: IpAddr,

    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    #[arg(long, env = "DOCS_MODE", value_enum, default_value_t = RunMode::Production)]
    pub mode: RunMode,
}

impl From<CliArgs> for SiteConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            root: args.root,
            static_dir: args.static_dir,
            address: args.address,
            port: args.port,
            mode: args.mode,
        }
    }
}
