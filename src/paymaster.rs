// src/paymaster.rs
use async_trait::async_trait;
use ethers::types::Address;
use ethers::utils::to_checksum;
use serde_json::json;
use tracing::{debug, info};

use crate::error::Result;
use crate::rpc::{decode, decode_optional, to_param, RpcTransport};
use crate::types::{SponsorUserOperationResponse, UserOperation};

/// Paymaster RPC methods (`pm_*`), available on any transport.
#[async_trait]
pub trait PaymasterClient: RpcTransport {
    /// Asks the paymaster to cover gas for an unsigned operation.
    ///
    /// Returns `None` when the paymaster declines. The returned limits replace
    /// the bundler's estimation and the operation must be signed afterwards.
    async fn pm_sponsor_user_operation(
        &self,
        user_operation: &UserOperation,
        entry_point: Address,
    ) -> Result<Option<SponsorUserOperationResponse>> {
        let params = json!([to_param(user_operation)?, to_checksum(&entry_point, None)]);
        debug!("pm_sponsorUserOperation for sender {:?}", user_operation.sender);
        let result = self.send("pm_sponsorUserOperation", params).await?;
        let sponsorship: Option<SponsorUserOperationResponse> =
            decode_optional("pm_sponsorUserOperation", result)?;

        match &sponsorship {
            Some(_) => info!("Paymaster sponsored operation for {:?}", user_operation.sender),
            None => info!("Paymaster declined operation for {:?}", user_operation.sender),
        }
        Ok(sponsorship)
    }

    async fn pm_supported_entry_points(&self) -> Result<Vec<Address>> {
        let result = self.send("pm_supportedEntryPoints", json!([])).await?;
        decode("pm_supportedEntryPoints", result)
    }
}

impl<T: RpcTransport + ?Sized> PaymasterClient for T {}
