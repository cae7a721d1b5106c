//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`init`], [`validate`], or [`device_id`].
//! Each handler lives in its own submodule.

pub mod device_id;
pub mod init;
pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::ChainProxyError;

pub async fn dispatch(cli: Cli) -> Result<(), ChainProxyError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(args).await,
        Some(Commands::Init(ref args)) => init::execute(args),
        Some(Commands::Validate(ref args)) => validate::execute(args),
        Some(Commands::DeviceId(ref args)) => device_id::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  chain-proxy v{version} \u{2014} device-stamping forwarding proxy\n\n  \
         No command provided. To get started:\n\n    \
         chain-proxy init                  Generate config/config.yaml\n    \
         chain-proxy run                   Start the proxy on port 3000\n    \
         chain-proxy device-id             Show this device's identifier\n    \
         chain-proxy --help                See all commands and options\n"
    );
}
