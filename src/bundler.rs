// src/bundler.rs
use async_trait::async_trait;
use ethers::types::{Address, H256};
use ethers::utils::to_checksum;
use serde_json::json;
use tracing::debug;

use crate::error::Result;
use crate::rpc::{decode, decode_optional, to_param, RpcTransport};
use crate::types::{GasEstimation, UserOperation, UserOperationByHash, UserOperationReceipt};

/// Bundler RPC methods (`eth_*UserOperation*`), available on any transport.
#[async_trait]
pub trait BundlerClient: RpcTransport {
    /// Submits a signed operation and returns its userOpHash.
    async fn eth_send_user_operation(
        &self,
        user_operation: &UserOperation,
        entry_point: Address,
    ) -> Result<H256> {
        let params = json!([to_param(user_operation)?, to_checksum(&entry_point, None)]);
        debug!("eth_sendUserOperation for sender {:?}", user_operation.sender);
        let result = self.send("eth_sendUserOperation", params).await?;
        decode("eth_sendUserOperation", result)
    }

    async fn eth_estimate_user_operation_gas(
        &self,
        user_operation: &UserOperation,
        entry_point: Address,
    ) -> Result<GasEstimation> {
        let params = json!([to_param(user_operation)?, to_checksum(&entry_point, None)]);
        let result = self.send("eth_estimateUserOperationGas", params).await?;
        let estimation: GasEstimation = decode("eth_estimateUserOperationGas", result)?;
        debug!("Gas estimation: {:?}", estimation);
        Ok(estimation)
    }

    /// `None` while the bundler does not know the operation.
    async fn eth_get_user_operation_by_hash(
        &self,
        user_operation_hash: H256,
    ) -> Result<Option<UserOperationByHash>> {
        let result = self
            .send("eth_getUserOperationByHash", json!([user_operation_hash]))
            .await?;
        decode_optional("eth_getUserOperationByHash", result)
    }

    /// `None` until the operation has been mined.
    async fn eth_get_user_operation_receipt(
        &self,
        user_operation_hash: H256,
    ) -> Result<Option<UserOperationReceipt>> {
        let result = self
            .send("eth_getUserOperationReceipt", json!([user_operation_hash]))
            .await?;
        decode_optional("eth_getUserOperationReceipt", result)
    }

    async fn eth_supported_entry_points(&self) -> Result<Vec<Address>> {
        let result = self.send("eth_supportedEntryPoints", json!([])).await?;
        decode("eth_supportedEntryPoints", result)
    }
}

impl<T: RpcTransport + ?Sized> BundlerClient for T {}
