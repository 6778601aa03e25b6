//! Command line configuration.

use std::path::PathBuf;

use clap::Parser;
use tui_dispatch_debug::DebugCliArgs;

use crate::api::DEFAULT_API_BASE;
use crate::theme::ThemeVariant;

pub const DEFAULT_PAGE_SIZE: u32 = 21;

#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Browse Pokemon from PokeAPI in the terminal")]
pub struct Args {
    /// Open the detail screen for this Pokemon id (clamped to 1..=1025)
    #[arg(long)]
    pub id: Option<u16>,

    /// Base URL of the PokeAPI REST service
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Entries fetched per list page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub page_size: u32,

    /// Do not fetch or draw artwork (for terminals without kitty graphics)
    #[arg(long)]
    pub no_artwork: bool,

    /// Never play cries
    #[arg(long)]
    pub mute: bool,

    /// Write logs to this file; filter with POKEDEX_LOG
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ThemeVariant::Light)]
    pub theme: ThemeVariant,

    #[command(flatten)]
    pub debug: DebugCliArgs,
}

/// Settings the app needs after argument parsing.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub start_id: Option<u16>,
    pub api_base: String,
    pub page_size: u32,
    pub artwork: bool,
    pub sound: bool,
    pub log_file: Option<PathBuf>,
    pub theme: ThemeVariant,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_id: None,
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            artwork: true,
            sound: true,
            log_file: None,
            theme: ThemeVariant::default(),
        }
    }
}

impl Args {
    /// Split into app config and the debug session arguments.
    pub fn into_parts(self) -> (Config, DebugCliArgs) {
        let config = Config {
            start_id: self.id,
            api_base: self.api_base.trim_end_matches('/').to_string(),
            page_size: self.page_size,
            artwork: !self.no_artwork,
            sound: !self.mute,
            log_file: self.log_file,
            theme: self.theme,
        };
        (config, self.debug)
    }
}
