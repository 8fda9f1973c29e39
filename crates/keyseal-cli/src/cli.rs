use clap::{Parser, Subcommand};

/// CLI surface definition. The library core exposes no CLI of its own;
/// this is a thin shell around the protection pipeline.
#[derive(Parser, Debug)]
#[command(
    name = "keyseal",
    about = "Generate an RSA key pair and store the private half encrypted at rest",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate and protect a new key pair.
    Protect {
        /// Modulus size in bits. There is no default: sizes below 2048 are
        /// cryptographically weak and only suitable for testing.
        #[arg(long)]
        bits: usize,
    },
    /// Print version and exit.
    Version,
    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Create a default config file if one does not exist.
    Init,
}
