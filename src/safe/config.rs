// src/safe/config.rs
use ethers::types::{Address, Bytes, H160, U256};
use serde::{Deserialize, Serialize};

/// EntryPoint v0.6.
/// `0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789`
pub const ENTRY_POINT_V06: Address = H160([
    0x5f, 0xf1, 0x37, 0xd4, 0xb0, 0xfd, 0xcd, 0x49, 0xdc, 0xa3,
    0x0c, 0x7c, 0xf5, 0x7e, 0x57, 0x8a, 0x02, 0x6d, 0x27, 0x89,
]);

/// Safe4337Module v0.2.0, `0xa581c4a4DB7175302464fF3C06380BC3270b4037`
pub const SAFE_4337_MODULE: Address = H160([
    0xa5, 0x81, 0xc4, 0xa4, 0xdb, 0x71, 0x75, 0x30, 0x24, 0x64,
    0xff, 0x3c, 0x06, 0x38, 0x0b, 0xc3, 0x27, 0x0b, 0x40, 0x37,
]);

/// AddModulesLib, delegate-called by `setup` to enable the module.
/// `0x2dd68b007B46fBe91B9A7c3EDa5A7a1063cB5b47`
pub const SAFE_MODULE_SETUP: Address = H160([
    0x2d, 0xd6, 0x8b, 0x00, 0x7b, 0x46, 0xfb, 0xe9, 0x1b, 0x9a,
    0x7c, 0x3e, 0xda, 0x5a, 0x7a, 0x10, 0x63, 0xcb, 0x5b, 0x47,
]);

/// SafeL2 v1.4.1, `0x29fcB43b46531BcA003ddC8FCB67FFE91900C762`
pub const SAFE_SINGLETON_L2: Address = H160([
    0x29, 0xfc, 0xb4, 0x3b, 0x46, 0x53, 0x1b, 0xca, 0x00, 0x3d,
    0xdc, 0x8f, 0xcb, 0x67, 0xff, 0xe9, 0x19, 0x00, 0xc7, 0x62,
]);

/// SafeProxyFactory v1.4.1, `0x4e1DCf7AD4e460CfD30791CCC4F9c8a4f820ec67`
pub const SAFE_PROXY_FACTORY: Address = H160([
    0x4e, 0x1d, 0xcf, 0x7a, 0xd4, 0xe4, 0x60, 0xcf, 0xd3, 0x07,
    0x91, 0xcc, 0xc4, 0xf9, 0xc8, 0xa4, 0xf8, 0x20, 0xec, 0x67,
]);

/// `SafeProxyFactory.proxyCreationCode()` of v1.4.1.
pub const SAFE_PROXY_CREATION_CODE: [u8; 486] = [
    0x60, 0x80, 0x60, 0x40, 0x52, 0x34, 0x80, 0x15, 0x61, 0x00, 0x10, 0x57,
    0x60, 0x00, 0x80, 0xfd, 0x5b, 0x50, 0x60, 0x40, 0x51, 0x61, 0x01, 0xe6,
    0x38, 0x03, 0x80, 0x61, 0x01, 0xe6, 0x83, 0x39, 0x81, 0x81, 0x01, 0x60,
    0x40, 0x52, 0x60, 0x20, 0x81, 0x10, 0x15, 0x61, 0x00, 0x33, 0x57, 0x60,
    0x00, 0x80, 0xfd, 0x5b, 0x81, 0x01, 0x90, 0x80, 0x80, 0x51, 0x90, 0x60,
    0x20, 0x01, 0x90, 0x92, 0x91, 0x90, 0x50, 0x50, 0x50, 0x60, 0x00, 0x73,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x16, 0x81, 0x73, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x16, 0x14, 0x15, 0x61, 0x00,
    0xca, 0x57, 0x60, 0x40, 0x51, 0x7f, 0x08, 0xc3, 0x79, 0xa0, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x81, 0x52, 0x60, 0x04, 0x01, 0x80, 0x80, 0x60, 0x20, 0x01,
    0x82, 0x81, 0x03, 0x82, 0x52, 0x60, 0x22, 0x81, 0x52, 0x60, 0x20, 0x01,
    0x80, 0x61, 0x01, 0xc4, 0x60, 0x22, 0x91, 0x39, 0x60, 0x40, 0x01, 0x91,
    0x50, 0x50, 0x60, 0x40, 0x51, 0x80, 0x91, 0x03, 0x90, 0xfd, 0x5b, 0x80,
    0x60, 0x00, 0x80, 0x61, 0x01, 0x00, 0x0a, 0x81, 0x54, 0x81, 0x73, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x02, 0x19, 0x16, 0x90, 0x83,
    0x73, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x16, 0x02, 0x17,
    0x90, 0x55, 0x50, 0x50, 0x60, 0xab, 0x80, 0x61, 0x01, 0x19, 0x60, 0x00,
    0x39, 0x60, 0x00, 0xf3, 0xfe, 0x60, 0x80, 0x60, 0x40, 0x52, 0x73, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x60, 0x00, 0x54, 0x16, 0x7f,
    0xa6, 0x19, 0x48, 0x6e, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x60, 0x00, 0x35, 0x14,
    0x15, 0x60, 0x50, 0x57, 0x80, 0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00,
    0xf3, 0x5b, 0x36, 0x60, 0x00, 0x80, 0x37, 0x60, 0x00, 0x80, 0x36, 0x60,
    0x00, 0x84, 0x5a, 0xf4, 0x3d, 0x60, 0x00, 0x80, 0x3e, 0x60, 0x00, 0x81,
    0x14, 0x15, 0x60, 0x70, 0x57, 0x3d, 0x60, 0x00, 0xfd, 0x5b, 0x3d, 0x60,
    0x00, 0xf3, 0xfe, 0xa2, 0x64, 0x69, 0x70, 0x66, 0x73, 0x58, 0x22, 0x12,
    0x20, 0x03, 0xd1, 0x48, 0x8e, 0xe6, 0x5e, 0x08, 0xfa, 0x41, 0xe5, 0x8e,
    0x88, 0x8a, 0x98, 0x65, 0x55, 0x4c, 0x53, 0x5f, 0x2c, 0x77, 0x12, 0x6a,
    0x82, 0xcb, 0x4c, 0x0f, 0x91, 0x7f, 0x31, 0x44, 0x13, 0x64, 0x73, 0x6f,
    0x6c, 0x63, 0x43, 0x00, 0x07, 0x06, 0x00, 0x33, 0x49, 0x6e, 0x76, 0x61,
    0x6c, 0x69, 0x64, 0x20, 0x73, 0x69, 0x6e, 0x67, 0x6c, 0x65, 0x74, 0x6f,
    0x6e, 0x20, 0x61, 0x64, 0x64, 0x72, 0x65, 0x73, 0x73, 0x20, 0x70, 0x72,
    0x6f, 0x76, 0x69, 0x64, 0x65, 0x64,
];

/// Deployment parameters of a Safe 4337 account.
///
/// The defaults are the canonical deployments, identical on every chain that
/// has them, with a single-owner threshold and no validity window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafeConfig {
    pub entry_point: Address,
    pub safe_4337_module: Address,
    pub safe_module_setup: Address,
    pub safe_singleton: Address,
    pub proxy_factory: Address,
    pub proxy_creation_code: Bytes,
    pub salt_nonce: U256,
    pub threshold: U256,
    /// Lower bound (unix seconds) of the signed validity window, 0 for none.
    pub valid_after: u64,
    /// Upper bound (unix seconds) of the signed validity window, 0 for none.
    pub valid_until: u64,
}

impl Default for SafeConfig {
    fn default() -> Self {
        Self {
            entry_point: ENTRY_POINT_V06,
            safe_4337_module: SAFE_4337_MODULE,
            safe_module_setup: SAFE_MODULE_SETUP,
            safe_singleton: SAFE_SINGLETON_L2,
            proxy_factory: SAFE_PROXY_FACTORY,
            proxy_creation_code: Bytes::from(SAFE_PROXY_CREATION_CODE.to_vec()),
            salt_nonce: U256::zero(),
            threshold: U256::one(),
            valid_after: 0,
            valid_until: 0,
        }
    }
}

impl SafeConfig {
    pub fn with_salt_nonce(mut self, salt_nonce: U256) -> Self {
        self.salt_nonce = salt_nonce;
        self
    }

    pub fn with_validity(mut self, valid_after: u64, valid_until: u64) -> Self {
        self.valid_after = valid_after;
        self.valid_until = valid_until;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_match_checksummed_addresses() {
        let expected: [(&str, Address); 5] = [
            ("0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789", ENTRY_POINT_V06),
            ("0xa581c4a4DB7175302464fF3C06380BC3270b4037", SAFE_4337_MODULE),
            ("0x2dd68b007B46fBe91B9A7c3EDa5A7a1063cB5b47", SAFE_MODULE_SETUP),
            ("0x29fcB43b46531BcA003ddC8FCB67FFE91900C762", SAFE_SINGLETON_L2),
            ("0x4e1DCf7AD4e460CfD30791CCC4F9c8a4f820ec67", SAFE_PROXY_FACTORY),
        ];
        for (text, constant) in expected {
            assert_eq!(text.parse::<Address>().unwrap(), constant);
        }
    }

    #[test]
    fn test_config_deserializes_partial_overrides() {
        let config: SafeConfig = serde_json::from_value(serde_json::json!({
            "saltNonce": "0x2a",
            "validUntil": 1700000000u64,
        }))
        .unwrap();

        assert_eq!(config.salt_nonce, U256::from(42));
        assert_eq!(config.valid_until, 1_700_000_000);
        assert_eq!(config.entry_point, ENTRY_POINT_V06);
        assert_eq!(config.proxy_creation_code.len(), 486);
    }
}
