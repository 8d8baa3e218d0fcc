// src/safe/contracts.rs
//! Bindings for the contract functions the account encodes calls to.
#![allow(clippy::too_many_arguments)]

use ethers::contract::abigen;

abigen!(
    Safe,
    r#"[
        function setup(address[] owners, uint256 threshold, address to, bytes data, address fallbackHandler, address paymentToken, uint256 payment, address paymentReceiver) external
        function getOwners() external view returns (address[])
    ]"#
);

abigen!(
    SafeProxyFactory,
    r#"[
        function createProxyWithNonce(address singleton, bytes initializer, uint256 saltNonce) external returns (address proxy)
    ]"#
);

abigen!(
    SafeModuleSetup,
    r#"[
        function enableModules(address[] modules) external
    ]"#
);

abigen!(
    Safe4337Module,
    r#"[
        function executeUserOp(address to, uint256 value, bytes data, uint8 operation) external
    ]"#
);

abigen!(
    EntryPoint,
    r#"[
        function getNonce(address sender, uint192 key) external view returns (uint256 nonce)
    ]"#
);
