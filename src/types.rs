// src/types.rs
use ethers::abi::{encode, Token};
use ethers::types::{Address, Bloom, Bytes, Log, H256, U256, U64};
use ethers::utils::keccak256;
use serde::{Deserialize, Serialize};

/// ERC-4337 v0.6 UserOperation as it travels over the bundler and paymaster RPC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperation {
    #[serde(serialize_with = "checksum::serialize")]
    pub sender: Address,
    pub nonce: U256,
    pub init_code: Bytes,
    pub call_data: Bytes,
    pub call_gas_limit: U256,
    pub verification_gas_limit: U256,
    pub pre_verification_gas: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub paymaster_and_data: Bytes,
    pub signature: Bytes,
}

impl UserOperation {
    pub fn sender(mut self, sender: Address) -> Self {
        self.sender = sender;
        self
    }

    pub fn nonce(mut self, nonce: U256) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn init_code(mut self, init_code: Bytes) -> Self {
        self.init_code = init_code;
        self
    }

    pub fn call_data(mut self, call_data: Bytes) -> Self {
        self.call_data = call_data;
        self
    }

    pub fn call_gas_limit(mut self, call_gas_limit: U256) -> Self {
        self.call_gas_limit = call_gas_limit;
        self
    }

    pub fn verification_gas_limit(mut self, verification_gas_limit: U256) -> Self {
        self.verification_gas_limit = verification_gas_limit;
        self
    }

    pub fn pre_verification_gas(mut self, pre_verification_gas: U256) -> Self {
        self.pre_verification_gas = pre_verification_gas;
        self
    }

    pub fn max_fee_per_gas(mut self, max_fee_per_gas: U256) -> Self {
        self.max_fee_per_gas = max_fee_per_gas;
        self
    }

    pub fn max_priority_fee_per_gas(mut self, max_priority_fee_per_gas: U256) -> Self {
        self.max_priority_fee_per_gas = max_priority_fee_per_gas;
        self
    }

    pub fn paymaster_and_data(mut self, paymaster_and_data: Bytes) -> Self {
        self.paymaster_and_data = paymaster_and_data;
        self
    }

    pub fn signature(mut self, signature: Bytes) -> Self {
        self.signature = signature;
        self
    }

    /// Applies the bundler's gas estimation.
    pub fn with_gas_estimation(self, estimation: &GasEstimation) -> Self {
        self.pre_verification_gas(estimation.pre_verification_gas)
            .verification_gas_limit(estimation.verification_gas_limit)
            .call_gas_limit(estimation.call_gas_limit)
    }

    /// Applies a paymaster's sponsorship, which replaces the gas limits as well.
    pub fn with_sponsorship(self, sponsorship: &SponsorUserOperationResponse) -> Self {
        self.paymaster_and_data(sponsorship.paymaster_and_data.clone())
            .pre_verification_gas(sponsorship.pre_verification_gas)
            .verification_gas_limit(sponsorship.verification_gas_limit)
            .call_gas_limit(sponsorship.call_gas_limit)
    }

    pub fn with_fees(self, fees: &GasFees) -> Self {
        self.max_fee_per_gas(fees.max_fee_per_gas)
            .max_priority_fee_per_gas(fees.max_priority_fee_per_gas)
    }

    /// ABI encoding of every field but the signature, with the dynamic fields
    /// replaced by their hashes.
    pub fn pack_without_signature(&self) -> Bytes {
        encode(&[
            Token::Address(self.sender),
            Token::Uint(self.nonce),
            Token::FixedBytes(keccak256(&self.init_code).to_vec()),
            Token::FixedBytes(keccak256(&self.call_data).to_vec()),
            Token::Uint(self.call_gas_limit),
            Token::Uint(self.verification_gas_limit),
            Token::Uint(self.pre_verification_gas),
            Token::Uint(self.max_fee_per_gas),
            Token::Uint(self.max_priority_fee_per_gas),
            Token::FixedBytes(keccak256(&self.paymaster_and_data).to_vec()),
        ])
        .into()
    }

    /// The userOpHash the entry point and the bundlers identify this operation by.
    pub fn hash(&self, entry_point: Address, chain_id: u64) -> H256 {
        let packed_hash = keccak256(self.pack_without_signature());
        keccak256(encode(&[
            Token::FixedBytes(packed_hash.to_vec()),
            Token::Address(entry_point),
            Token::Uint(U256::from(chain_id)),
        ]))
        .into()
    }
}

/// Fee caps chosen by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasFees {
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasEstimation {
    pub pre_verification_gas: U256,
    pub verification_gas_limit: U256,
    pub call_gas_limit: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorUserOperationResponse {
    pub paymaster_and_data: Bytes,
    pub pre_verification_gas: U256,
    pub verification_gas_limit: U256,
    pub call_gas_limit: U256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationByHash {
    pub user_operation: UserOperation,
    pub entry_point: Address,
    // Pending operations have no inclusion data yet.
    pub transaction_hash: Option<H256>,
    pub block_hash: Option<H256>,
    pub block_number: Option<U64>,
}

/// Receipt of the bundle transaction that included a UserOperation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_hash: H256,
    pub transaction_index: U64,
    pub block_hash: H256,
    pub block_number: U64,
    pub from: Address,
    pub to: Option<Address>,
    pub gas_used: U256,
    pub contract_address: Option<Address>,
    pub logs: Vec<Log>,
    pub logs_bloom: Bloom,
    pub status: Option<U64>,
    pub effective_gas_price: Option<U256>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationReceipt {
    pub user_op_hash: H256,
    pub sender: Address,
    pub nonce: U256,
    pub paymaster: Option<Address>,
    pub actual_gas_used: U256,
    pub actual_gas_cost: U256,
    pub success: bool,
    pub reason: Option<String>,
    /// Logs emitted by this operation only, not the whole bundle.
    pub logs: Vec<Log>,
    pub receipt: Receipt,
}

mod checksum {
    use ethers::types::Address;
    use ethers::utils::to_checksum;
    use serde::Serializer;

    pub fn serialize<S>(address: &Address, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&to_checksum(address, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference_operation() -> UserOperation {
        UserOperation::default()
            .sender("0x2ff46f26638977ae8c88e205cca407a1a9725f0b".parse().unwrap())
            .call_data("0x7bb374280000000000000000000000000338dcd5512ae8f3c481c33eb4b6eedf632d1d2f000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000800000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000406661abd00000000000000000000000000000000000000000000000000000000".parse().unwrap())
            .pre_verification_gas(0xea60.into())
            .call_gas_limit(0x1e8480.into())
            .verification_gas_limit(0x07a120.into())
            .max_fee_per_gas(0x02ee7c55e2u64.into())
            .max_priority_fee_per_gas(0x1f2ecf7f.into())
    }

    #[test]
    fn test_user_operation_wire_format() {
        let op = reference_operation();
        let value = serde_json::to_value(&op).unwrap();

        assert_eq!(value["sender"], json!("0x2FF46F26638977AE8C88e205cCa407A1a9725F0B"));
        assert_eq!(value["nonce"], json!("0x0"));
        assert_eq!(value["preVerificationGas"], json!("0xea60"));
        assert_eq!(value["maxFeePerGas"], json!("0x2ee7c55e2"));
        assert_eq!(value["initCode"], json!("0x"));
        assert_eq!(value["paymasterAndData"], json!("0x"));
        assert_eq!(value["signature"], json!("0x"));
        assert!(value["callData"].as_str().unwrap().starts_with("0x7bb37428"));
    }

    #[test]
    fn test_user_operation_deserializes_any_hex_case() {
        let op = reference_operation();
        let value = serde_json::to_value(&op).unwrap();
        let decoded: UserOperation = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, op);
    }

    #[test]
    fn test_user_operation_hash() {
        let entry_point: Address = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789".parse().unwrap();
        let hash = reference_operation().hash(entry_point, 11155111);
        assert_eq!(
            hash,
            "0x4dd7ce944ee7bb7488e773f0cf194f49bd161648b7cd31ee8e174cdb7d3da03e"
                .parse::<H256>()
                .unwrap()
        );
    }

    #[test]
    fn test_user_operation_hash_ignores_signature() {
        let entry_point: Address = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789".parse().unwrap();
        let op = reference_operation();
        let signed = op.clone().signature(vec![1u8; 77].into());
        assert_eq!(op.hash(entry_point, 1), signed.hash(entry_point, 1));
        assert_ne!(op.hash(entry_point, 1), op.hash(entry_point, 5));
    }

    #[test]
    fn test_sponsorship_overrides_gas() {
        let sponsorship = SponsorUserOperationResponse {
            paymaster_and_data: "0xdeadbeef".parse().unwrap(),
            pre_verification_gas: 1.into(),
            verification_gas_limit: 2.into(),
            call_gas_limit: 3.into(),
        };
        let op = reference_operation().with_sponsorship(&sponsorship);

        assert_eq!(op.paymaster_and_data, "0xdeadbeef".parse::<Bytes>().unwrap());
        assert_eq!(op.pre_verification_gas, 1.into());
        assert_eq!(op.verification_gas_limit, 2.into());
        assert_eq!(op.call_gas_limit, 3.into());
    }
}
