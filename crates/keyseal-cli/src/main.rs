mod cli;
mod config;
mod vault;

use crate::cli::ConfigCommand;
use clap::Parser;
use color_eyre::Result;
use keyseal_protect::{protect_new_keypair, ProtectedKeyPair};
use keyseal_storage::file_vault::FileVault;
use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Entry point wiring the CLI to the protection pipeline.
fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = cli::Cli::parse();
    let config = config::load()?;
    match cli.command {
        cli::Command::Protect { bits } => run_protect(&config, bits)?,
        cli::Command::Version => print_version(),
        cli::Command::Config(ConfigCommand::Init) => init_config(&config)?,
    }

    Ok(())
}

fn init_tracing() {
    // Respect user-provided filters, default to info to avoid noisy stdout.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn print_version() {
    println!("keyseal {}", env!("CARGO_PKG_VERSION"));
}

fn init_config(config: &config::Config) -> Result<()> {
    let path = config::write_default_if_missing(config)?;
    println!("Config initialized at {}", path.display());
    Ok(())
}

fn run_protect(config: &config::Config, bits: usize) -> Result<()> {
    if bits < 2048 {
        warn!(bits, "modulus below 2048 bits is weak; use for testing only");
    }

    let vault = vault::vault_from_config(config)?;
    let protected = protect_vault_entry(&vault, bits)?;
    print_protected(&vault, &protected);
    Ok(())
}

fn protect_vault_entry(vault: &FileVault, bits: usize) -> Result<ProtectedKeyPair> {
    protect_new_keypair(&mut OsRng, vault, bits).map_err(|e| color_eyre::eyre::eyre!(e.to_string()))
}

/// Print the protection result. The password, nonce, and tag are the
/// caller's out-of-band custody of the encrypted file; they go to stdout
/// once and are never recorded anywhere else.
fn print_protected(vault: &FileVault, protected: &ProtectedKeyPair) {
    println!("File:     {}", vault.path_for(&protected.filename).display());
    println!(
        "Modulus:  {} ({} bits)",
        hex::encode(protected.public_key.n().to_bytes_be()),
        protected.public_key.n().bits()
    );
    println!("Exponent: {}", protected.public_key.e());
    println!("Password: {}", hex::encode(protected.password));
    println!("Nonce:    {}", hex::encode(protected.nonce));
    println!("Tag:      {}", hex::encode(protected.tag));
}
