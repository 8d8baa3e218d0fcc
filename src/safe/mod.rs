// src/safe/mod.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ethers::abi::{decode, AbiEncode, ParamType, Token};
use ethers::signers::Signer;
use ethers::types::{Address, Bytes, U256};
use tracing::{debug, info};

use crate::account::SmartAccount;
use crate::error::{Error, Result};
use crate::rpc::{NodeClient, RpcTransport};
use crate::types::UserOperation;

pub mod config;
pub mod contracts;
pub mod encoding;
pub mod operation;

pub use config::SafeConfig;
pub use encoding::{build_init_code, encode_execute, predict_address, predict_safe_address, Operation};
pub use operation::{SafeOperation, MAX_VALIDITY};

use contracts::{GetNonceCall, GetOwnersCall};

/// A Safe account validated by the Safe 4337 module, with a single owner key.
#[derive(Debug)]
pub struct SafeAccount<S> {
    signer: S,
    address: Address,
    config: SafeConfig,
    chain_id: u64,
    rpc: Arc<dyn RpcTransport>,
    bundler: Arc<dyn RpcTransport>,
    paymaster: Option<Arc<dyn RpcTransport>>,
    deployed: AtomicBool,
}

impl<S: Signer> SafeAccount<S> {
    /// Account owned by `signer` with the default deployment; its address is
    /// predicted, not read from the chain.
    pub fn new(
        signer: S,
        rpc: Arc<dyn RpcTransport>,
        bundler: Arc<dyn RpcTransport>,
        chain_id: u64,
    ) -> Self {
        Self::from_config(signer, SafeConfig::default(), rpc, bundler, chain_id)
    }

    pub fn from_config(
        signer: S,
        config: SafeConfig,
        rpc: Arc<dyn RpcTransport>,
        bundler: Arc<dyn RpcTransport>,
        chain_id: u64,
    ) -> Self {
        let address = predict_safe_address(&[signer.address()], config.threshold, &config);
        debug!("Predicted Safe address {:?} for owner {:?}", address, signer.address());
        Self::at_address(address, signer, config, rpc, bundler, chain_id)
    }

    /// Account at a known address, which may already be deployed.
    pub fn at_address(
        address: Address,
        signer: S,
        config: SafeConfig,
        rpc: Arc<dyn RpcTransport>,
        bundler: Arc<dyn RpcTransport>,
        chain_id: u64,
    ) -> Self {
        Self {
            signer,
            address,
            config,
            chain_id,
            rpc,
            bundler,
            paymaster: None,
            deployed: AtomicBool::new(false),
        }
    }

    pub fn with_paymaster(mut self, paymaster: Arc<dyn RpcTransport>) -> Self {
        self.paymaster = Some(paymaster);
        self
    }

    pub fn config(&self) -> &SafeConfig {
        &self.config
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    fn safe_operation<'a>(&self, user_operation: &'a UserOperation) -> SafeOperation<'a> {
        SafeOperation::new(
            user_operation,
            self.config.entry_point,
            self.chain_id,
            self.config.safe_4337_module,
        )
        .with_validity(self.config.valid_after, self.config.valid_until)
    }
}

#[async_trait]
impl<S: Signer> SmartAccount for SafeAccount<S> {
    fn address(&self) -> Address {
        self.address
    }

    fn entry_point(&self) -> Address {
        self.config.entry_point
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn bundler(&self) -> &dyn RpcTransport {
        self.bundler.as_ref()
    }

    fn paymaster(&self) -> Option<&dyn RpcTransport> {
        self.paymaster.as_deref()
    }

    async fn is_deployed(&self) -> Result<bool> {
        if self.deployed.load(Ordering::Acquire) {
            return Ok(true);
        }

        let code = self.rpc.eth_get_code(self.address).await?;
        if code.is_empty() {
            return Ok(false);
        }

        info!("Safe {:?} is deployed", self.address);
        self.deployed.store(true, Ordering::Release);
        Ok(true)
    }

    fn get_call_data(&self, to: Address, value: U256, data: Bytes) -> Bytes {
        encode_execute(to, value, data, Operation::Call)
    }

    async fn get_init_code(&self) -> Result<Bytes> {
        if self.is_deployed().await? {
            return Ok(Bytes::default());
        }
        Ok(build_init_code(
            &[self.signer.address()],
            self.config.threshold,
            &self.config,
        ))
    }

    async fn get_nonce(&self) -> Result<U256> {
        let call = GetNonceCall {
            sender: self.address,
            key: U256::zero(),
        };
        let result = self
            .rpc
            .eth_call(self.config.entry_point, call.encode().into())
            .await?;

        decode(&[ParamType::Uint(256)], &result)
            .map_err(|e| Error::decode("getNonce", e))?
            .into_iter()
            .next()
            .and_then(Token::into_uint)
            .ok_or_else(|| Error::UnexpectedValue(format!("getNonce returned {result}")))
    }

    async fn get_owners(&self) -> Result<Vec<Address>> {
        if !self.is_deployed().await? {
            return Err(Error::AccountNotDeployed(self.address));
        }

        let result = self
            .rpc
            .eth_call(self.address, GetOwnersCall.encode().into())
            .await?;

        decode(&[ParamType::Array(Box::new(ParamType::Address))], &result)
            .map_err(|e| Error::decode("getOwners", e))?
            .into_iter()
            .next()
            .and_then(Token::into_array)
            .and_then(|owners| owners.into_iter().map(Token::into_address).collect())
            .ok_or_else(|| Error::UnexpectedValue(format!("getOwners returned {result}")))
    }

    fn dummy_signature(&self) -> Bytes {
        let mut ecdsa = [0xff; 65];
        ecdsa[64] = 0x1c;
        self.safe_operation(&UserOperation::default())
            .pack_signature(&ecdsa)
    }

    async fn sign_user_operation(&self, user_operation: &UserOperation) -> Result<Bytes> {
        self.safe_operation(user_operation).sign(&self.signer).await
    }
}
