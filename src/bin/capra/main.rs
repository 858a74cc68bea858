//! Capra CLI
//!
//! Replays a cart fixture set through the cart store and prints the result.

use std::{
    io::{self, Write},
    process::ExitCode,
};

use anyhow::Result;
use tracing::{error, info};

use capra::{fixtures::Fixture, storage::FileStorage, summary::write_cart};

use crate::config::{CliConfig, OutputFormat};

mod config;
mod logging;

fn main() -> ExitCode {
    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(error) => {
            _ = error.print();

            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(error) = logging::init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for subscriber errors"
        )]
        {
            eprintln!("Logging error: {error}");
        }

        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(error = %error, "cart replay failed");

            ExitCode::FAILURE
        }
    }
}

fn run(config: &CliConfig) -> Result<()> {
    let mut fixture = Fixture::with_base_path(&config.fixtures.path);

    fixture
        .load_catalog(&config.fixtures.set)?
        .load_cart(&config.fixtures.set)?;

    let cart = fixture.cart()?;

    info!(
        set = config.fixtures.set.as_str(),
        lines = cart.len(),
        units = cart.total_quantity(),
        "replayed cart fixture"
    );

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match config.output {
        OutputFormat::Table => write_cart(&mut handle, &cart)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut handle, cart.state())?;
            writeln!(handle)?;
        }
    }

    if let Some(path) = &config.fixtures.snapshot {
        let mut storage = FileStorage::new(path);

        cart.persist(&mut storage)?;

        info!(path = %path.display(), "wrote cart snapshot");
    }

    Ok(())
}
