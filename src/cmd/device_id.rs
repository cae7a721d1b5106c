//! `chain-proxy device-id`: print the device identifier.

use crate::cli::DeviceIdArgs;
use crate::error::ChainProxyError;
use crate::identity;

pub async fn execute(args: &DeviceIdArgs) -> Result<(), ChainProxyError> {
    let id = identity::resolve(
        args.identity.device_id.as_deref(),
        &args.identity.device_id_file,
    )
    .await?;
    println!("{id}");
    Ok(())
}
