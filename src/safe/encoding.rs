// src/safe/encoding.rs
use ethers::abi::{encode, AbiEncode, Token};
use ethers::types::{Address, Bytes, U256};
use ethers::utils::{get_create2_address, keccak256};

use super::config::SafeConfig;
use super::contracts::{CreateProxyWithNonceCall, EnableModulesCall, ExecuteUserOpCall, SetupCall};

/// How the Safe performs the inner call of `executeUserOp`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Operation {
    #[default]
    Call = 0,
    DelegateCall = 1,
}

/// Call data for `Safe4337Module.executeUserOp(to, value, data, operation)`.
pub fn encode_execute(to: Address, value: U256, data: Bytes, operation: Operation) -> Bytes {
    ExecuteUserOpCall {
        to,
        value,
        data,
        operation: operation as u8,
    }
    .encode()
    .into()
}

/// The `Safe.setup` call the proxy factory runs on the fresh proxy.
///
/// Enables the 4337 module (through the module setup library) and installs it
/// as the fallback handler.
pub fn setup_initializer(owners: &[Address], threshold: U256, config: &SafeConfig) -> Bytes {
    let enable_modules = EnableModulesCall {
        modules: vec![config.safe_4337_module],
    };

    SetupCall {
        owners: owners.to_vec(),
        threshold,
        to: config.safe_module_setup,
        data: enable_modules.encode().into(),
        fallback_handler: config.safe_4337_module,
        payment_token: Address::zero(),
        payment: U256::zero(),
        payment_receiver: Address::zero(),
    }
    .encode()
    .into()
}

/// Counterfactual address of a proxy deployed by `createProxyWithNonce`.
///
/// `salt = keccak256(keccak256(initializer) ++ saltNonce)` and the deployed
/// code is the proxy creation code followed by the ABI-encoded singleton.
pub fn predict_address(
    factory: Address,
    singleton: Address,
    proxy_creation_code: &[u8],
    initializer: &[u8],
    salt_nonce: U256,
) -> Address {
    let salt = keccak256(encode(&[
        Token::FixedBytes(keccak256(initializer).to_vec()),
        Token::Uint(salt_nonce),
    ]));

    let mut deployment_data = proxy_creation_code.to_vec();
    deployment_data.extend(encode(&[Token::Address(singleton)]));

    get_create2_address(factory, salt, deployment_data)
}

pub fn predict_safe_address(owners: &[Address], threshold: U256, config: &SafeConfig) -> Address {
    let initializer = setup_initializer(owners, threshold, config);
    predict_address(
        config.proxy_factory,
        config.safe_singleton,
        &config.proxy_creation_code,
        &initializer,
        config.salt_nonce,
    )
}

/// `factory ++ createProxyWithNonce(singleton, initializer, saltNonce)`.
pub fn build_init_code(owners: &[Address], threshold: U256, config: &SafeConfig) -> Bytes {
    let create_proxy = CreateProxyWithNonceCall {
        singleton: config.safe_singleton,
        initializer: setup_initializer(owners, threshold, config),
        salt_nonce: config.salt_nonce,
    };

    let mut init_code = config.proxy_factory.as_bytes().to_vec();
    init_code.extend(create_proxy.encode());
    init_code.into()
}
