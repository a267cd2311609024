//! bulwark-sim - run the BULWARK unlock workflow in a terminal
//!
//! usage:
//!   bulwark-sim --setup                  # provision a fresh device
//!   bulwark-sim --setup --passphrase     # ... that asks for a mnemonic passphrase
//!   bulwark-sim                          # unlock it
//!
//! device state lives in ./bulwark-device/ unless --data-dir says otherwise.
//! logs go to stderr; RUST_LOG overrides the default filter.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

mod device;
mod error;
mod keystore;
mod terminal;

use std::path::PathBuf;
use std::process::ExitCode;

use bulwark_workflow::{report_and_abort, DeviceMemory, UnlockOutcome, UnlockWorkflow};
use clap::Parser;
use tracing::{error, info, warn};

use crate::device::SimDevice;
use crate::error::SimError;
use crate::keystore::DEFAULT_MAX_ATTEMPTS;
use crate::terminal::TerminalUi;

/// Exit status after the device wiped itself.
const EXIT_DEVICE_RESET: u8 = 2;

/// bulwark-sim - terminal simulator for the BULWARK unlock workflow
#[derive(Parser)]
#[command(name = "bulwark-sim")]
#[command(about = "terminal simulator for the BULWARK unlock workflow")]
#[command(version)]
struct Args {
    /// device data directory
    #[arg(short, long, default_value = "bulwark-device")]
    data_dir: PathBuf,

    /// provision a fresh device instead of unlocking
    #[arg(long)]
    setup: bool,

    /// ask for a mnemonic passphrase on every unlock
    #[arg(long, requires = "setup")]
    passphrase: bool,

    /// failed unlock attempts before the device resets itself (setup only)
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_ATTEMPTS,
        value_parser = clap::value_parser!(u8).range(1..)
    )]
    max_attempts: u8,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bulwark_workflow=info,bulwark_sim=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = bulwark_secrets::disable_core_dumps() {
        warn!("core dumps stay enabled: {e}");
    }

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode, SimError> {
    let mut device = SimDevice::open(&args.data_dir, TerminalUi::new())?;
    info!(
        data_dir = %args.data_dir.display(),
        initialized = device.is_initialized(),
        failed_attempts = ?device.keystore().failed_attempts(),
        "device loaded"
    );

    if args.setup {
        device.setup(args.passphrase, args.max_attempts)?;
        println!("device ready; run again without --setup to unlock");
        return Ok(ExitCode::SUCCESS);
    }

    let result = UnlockWorkflow::new(&mut device).unlock();
    match result {
        Ok(UnlockOutcome::Unlocked) => {
            if let Some(fingerprint) = device.keystore().seed_fingerprint() {
                println!("unlocked, seed fingerprint {fingerprint}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Ok(UnlockOutcome::NothingToUnlock) => {
            if device.is_initialized() {
                println!("device already unlocked");
            } else {
                println!("device is not set up; run with --setup");
            }
            Ok(ExitCode::SUCCESS)
        }
        Ok(UnlockOutcome::FactoryReset) => {
            println!("device was reset; run with --setup to start over");
            Ok(ExitCode::from(EXIT_DEVICE_RESET))
        }
        // Returning drops the device and every secret it still holds.
        Err(_) if device.input_closed() => Err(SimError::InputClosed),
        Err(fatal) => report_and_abort(&fatal),
    }
}
