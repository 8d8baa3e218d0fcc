// src/account.rs
use async_trait::async_trait;
use ethers::types::{Address, Bytes, H256, U256};
use tracing::{debug, info, warn};

use crate::bundler::BundlerClient;
use crate::error::{Error, Result};
use crate::paymaster::PaymasterClient;
use crate::rpc::RpcTransport;
use crate::types::{GasFees, UserOperation};

/// A contract account that is driven through UserOperations.
///
/// Implementors provide the account-specific encoding and signing; the
/// operation pipeline (estimate, sponsor, sign, submit) is shared.
#[async_trait]
pub trait SmartAccount: Send + Sync {
    fn address(&self) -> Address;

    fn entry_point(&self) -> Address;

    fn chain_id(&self) -> u64;

    fn bundler(&self) -> &dyn RpcTransport;

    fn paymaster(&self) -> Option<&dyn RpcTransport>;

    /// Whether the account has code on chain. Once `true`, always `true`.
    async fn is_deployed(&self) -> Result<bool>;

    fn get_call_data(&self, to: Address, value: U256, data: Bytes) -> Bytes;

    /// Deployment payload, empty once the account is deployed.
    async fn get_init_code(&self) -> Result<Bytes>;

    async fn get_nonce(&self) -> Result<U256>;

    async fn get_owners(&self) -> Result<Vec<Address>>;

    /// Placeholder signature of the right shape, used for gas estimation.
    fn dummy_signature(&self) -> Bytes;

    async fn sign_user_operation(&self, user_operation: &UserOperation) -> Result<Bytes>;

    /// Checks that the bundler (and paymaster, if any) serve this account's entry point.
    async fn ensure_entry_point_supported(&self) -> Result<()> {
        let entry_point = self.entry_point();

        let supported = self.bundler().eth_supported_entry_points().await?;
        if !supported.contains(&entry_point) {
            warn!("Bundler does not support entry point {:?}", entry_point);
            return Err(Error::UnsupportedEntryPoint(entry_point));
        }

        if let Some(paymaster) = self.paymaster() {
            let supported = paymaster.pm_supported_entry_points().await?;
            if !supported.contains(&entry_point) {
                warn!("Paymaster does not support entry point {:?}", entry_point);
                return Err(Error::UnsupportedEntryPoint(entry_point));
            }
        }

        Ok(())
    }

    /// Builds an unsigned operation executing `to.call{value}(data)`.
    ///
    /// Gas limits come from the bundler, then from the paymaster when one is
    /// configured and accepts to sponsor.
    async fn prepare_user_operation(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
        fees: GasFees,
    ) -> Result<UserOperation> {
        let entry_point = self.entry_point();
        let user_operation = UserOperation::default()
            .sender(self.address())
            .nonce(self.get_nonce().await?)
            .init_code(self.get_init_code().await?)
            .call_data(self.get_call_data(to, value, data))
            .signature(self.dummy_signature())
            .with_fees(&fees);

        let estimation = self
            .bundler()
            .eth_estimate_user_operation_gas(&user_operation, entry_point)
            .await?;
        let mut user_operation = user_operation.with_gas_estimation(&estimation);

        if let Some(paymaster) = self.paymaster() {
            if let Some(sponsorship) = paymaster
                .pm_sponsor_user_operation(&user_operation, entry_point)
                .await?
            {
                user_operation = user_operation.with_sponsorship(&sponsorship);
            }
        }

        debug!("Prepared user operation: {:?}", user_operation);
        Ok(user_operation)
    }

    /// Signs `user_operation` as is and submits it.
    ///
    /// The hash returned by the bundler must match the locally computed one,
    /// otherwise [`Error::HashMismatch`] carries both.
    async fn sign_and_send(&self, user_operation: UserOperation) -> Result<H256> {
        let entry_point = self.entry_point();
        let signature = self.sign_user_operation(&user_operation).await?;
        let user_operation = user_operation.signature(signature);

        let expected = user_operation.hash(entry_point, self.chain_id());
        let hash = self
            .bundler()
            .eth_send_user_operation(&user_operation, entry_point)
            .await?;
        if hash != expected {
            warn!("Bundler returned hash {:?}, expected {:?}", hash, expected);
            return Err(Error::HashMismatch {
                expected,
                actual: hash,
            });
        }

        info!("Submitted user operation {:?} from {:?}", hash, self.address());
        Ok(hash)
    }

    async fn send_user_operation(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
        fees: GasFees,
    ) -> Result<H256> {
        let user_operation = self.prepare_user_operation(to, value, data, fees).await?;
        self.sign_and_send(user_operation).await
    }
}
