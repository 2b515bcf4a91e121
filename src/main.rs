//! Strata - keep a tree of encrypted secret files in sync with a secret store.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use strata::cli::output::Printer;
use strata::cli::{execute, Cli};
use strata::error::{CipherError, ConfigError, Error, StoreError, SyncError};

/// A suggestion for errors with a well-known fix.
fn hint(error: &Error) -> Option<&'static str> {
    let error = match error {
        Error::Sync(SyncError::Namespace { source, .. }) => source.as_ref(),
        other => other,
    };

    match error {
        Error::Store(StoreError::TableNotFound(_)) => Some("run: strata init"),
        Error::Cipher(CipherError::NoKey(_)) => Some("run: strata init"),
        Error::Cipher(CipherError::ContextMismatch { .. }) => {
            Some("re-encrypt the value under its key: strata encrypt KEY --add FILE")
        }
        Error::Config(ConfigError::FeatureDisabled(_)) => {
            Some("rebuild with: cargo install strata --features aws")
        }
        Error::Sync(SyncError::CircularInclude { .. }) => {
            Some("remove one of the _include entries in the cycle")
        }
        _ => None,
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("STRATA_LOG").unwrap_or_else(|_| {
        if cli.global.verbose {
            EnvFilter::new("strata=debug")
        } else {
            EnvFilter::new("strata=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let printer = Printer::from_env(cli.global.no_color);

    if let Err(e) = execute(cli) {
        printer.error(&e.to_string());
        if let Some(hint) = hint(&e) {
            printer.hint(hint);
        }
        std::process::exit(1);
    }
}
