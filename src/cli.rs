use std::path::PathBuf;

use clap::Parser;

/// Terminal client for the class, document and flashcard learning platform.
///
/// Configuration is read from ./classdeck.toml, then ~/.config/classdeck/config.toml.
#[derive(Parser, Debug)]
#[command(name = "classdeck", version, about)]
pub struct Cli {
    /// Write a default configuration file (to PATH, or the default location) and exit
    #[arg(long, num_args = 0..=1, value_name = "PATH")]
    pub generate_config: Option<Option<PathBuf>>,
}
