// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `dusklight` command-line entry point.

mod args;

use std::env;
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dusklight::config::{self, RunConfiguration};
use dusklight::daylight::{DaylightGate, OwmClient, OwmConfig};
use dusklight::driver::HttpConfig;
use dusklight::{CommandOrchestrator, Error, Outcome};

use args::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    exit_code(&runtime.block_on(run(&cli)))
}

/// Success and skipped runs exit 0; any error exits 1.
fn exit_code(result: &dusklight::Result<Outcome>) -> ExitCode {
    match result {
        Ok(Outcome::Skipped(reason)) => {
            tracing::info!("Skipped: {reason}");
            ExitCode::SUCCESS
        }
        Ok(outcome) => {
            tracing::debug!(?outcome, "Run finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: &Cli) -> dusklight::Result<Outcome> {
    let path = config::resolve_path(cli.config.clone(), env::var_os(config::CONFIG_ENV));
    let configuration = RunConfiguration::load(&path)?;
    let device = configuration.device()?;

    let light = HttpConfig::new(device.address, device.id)
        .with_local_key(device.local_key)
        .with_version(device.version)
        .connect()
        .map_err(|e| Error::Config(e.to_string()))?;

    let provider = configuration
        .owm_api_key()
        .map(|key| OwmConfig::new(key).into_client())
        .transpose()
        .map_err(Error::DaylightProviderUnavailable)?;
    let daylight = DaylightGate::<OwmClient>::new(provider, configuration.location());

    let request = cli.request().with_defaults(&configuration.default_options);
    tracing::debug!(?request, "Resolved request");

    CommandOrchestrator::new(light, daylight)
        .run(&request, &Local::now())
        .await
}
