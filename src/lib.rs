// src/lib.rs
//! Client side of ERC-4337 for Safe smart accounts.
//!
//! A [`SafeAccount`] predicts its counterfactual address, encodes calls and
//! deployment code, and signs UserOperations the way the Safe 4337 module
//! verifies them. [`BundlerClient`] and [`PaymasterClient`] speak the bundler
//! and paymaster JSON-RPC methods over any [`RpcTransport`], including an
//! `ethers` [`Provider`](ethers::providers::Provider).
//!
//! ```rust,ignore
//! let account = SafeAccount::new(wallet, rpc, bundler, chain_id).with_paymaster(paymaster);
//! let fees = GasFees { max_fee_per_gas, max_priority_fee_per_gas };
//! let hash = account.send_user_operation(to, value, data, fees).await?;
//! let receipt = account.bundler().eth_get_user_operation_receipt(hash).await?;
//! ```

pub mod account;
pub mod bundler;
pub mod error;
pub mod paymaster;
pub mod rpc;
pub mod safe;
pub mod types;

pub use account::SmartAccount;
pub use bundler::BundlerClient;
pub use error::{Error, Result};
pub use paymaster::PaymasterClient;
pub use rpc::{NodeClient, RpcTransport};
pub use safe::{Operation, SafeAccount, SafeConfig, SafeOperation};
pub use types::{
    GasEstimation, GasFees, Receipt, SponsorUserOperationResponse, UserOperation,
    UserOperationByHash, UserOperationReceipt,
};
