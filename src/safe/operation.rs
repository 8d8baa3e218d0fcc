// src/safe/operation.rs
use ethers::abi::{encode, Token};
use ethers::signers::Signer;
use ethers::types::transaction::eip712::{EIP712Domain, Eip712, Eip712Error};
use ethers::types::{Address, Bytes, H256, U256};
use ethers::utils::keccak256;

use crate::error::{Error, Result};
use crate::types::UserOperation;

/// Largest value of the `uint48` validity bounds.
pub const MAX_VALIDITY: u64 = 0xffff_ffff_ffff;

const SAFE_OP_TYPE: &str = "SafeOp(address safe,uint256 nonce,bytes initCode,bytes callData,uint256 callGasLimit,uint256 verificationGasLimit,uint256 preVerificationGas,uint256 maxFeePerGas,uint256 maxPriorityFeePerGas,bytes paymasterAndData,uint48 validAfter,uint48 validUntil,address entryPoint)";

/// A UserOperation as the Safe 4337 module verifies it: an EIP-712 `SafeOp`
/// under the module's domain.
///
/// Every field of the operation except the signature is covered, so it has to
/// be signed after gas limits and paymaster data are final.
#[derive(Debug, Clone, Copy)]
pub struct SafeOperation<'a> {
    pub user_operation: &'a UserOperation,
    pub entry_point: Address,
    pub chain_id: u64,
    pub module: Address,
    pub valid_after: u64,
    pub valid_until: u64,
}

impl<'a> SafeOperation<'a> {
    pub fn new(user_operation: &'a UserOperation, entry_point: Address, chain_id: u64, module: Address) -> Self {
        Self {
            user_operation,
            entry_point,
            chain_id,
            module,
            valid_after: 0,
            valid_until: 0,
        }
    }

    pub fn with_validity(mut self, valid_after: u64, valid_until: u64) -> Self {
        self.valid_after = valid_after;
        self.valid_until = valid_until;
        self
    }

    /// The digest the owner signs.
    pub fn operation_hash(&self) -> Result<H256> {
        self.check_validity()?;
        self.encode_eip712()
            .map(H256::from)
            .map_err(|e| Error::Encoding(e.to_string()))
    }

    /// Signs the operation and returns the bytes expected in
    /// `UserOperation.signature`: `uint48 validAfter ++ uint48 validUntil ++ r ++ s ++ v`.
    pub async fn sign<S: Signer>(&self, signer: &S) -> Result<Bytes> {
        self.check_validity()?;
        let signature = signer
            .sign_typed_data(self)
            .await
            .map_err(|e| Error::Signer(e.to_string()))?;
        Ok(self.pack_signature(&signature.to_vec()))
    }

    /// Both bounds travel as `uint48` in the signature and are read back from
    /// there by the module, so wider values cannot be signed.
    fn check_validity(&self) -> Result<()> {
        for (name, value) in [("validAfter", self.valid_after), ("validUntil", self.valid_until)] {
            if value > MAX_VALIDITY {
                return Err(Error::Encoding(format!("{name} {value} does not fit in uint48")));
            }
        }
        Ok(())
    }

    pub fn pack_signature(&self, ecdsa_signature: &[u8]) -> Bytes {
        let mut packed = Vec::with_capacity(12 + ecdsa_signature.len());
        packed.extend_from_slice(&uint48(self.valid_after));
        packed.extend_from_slice(&uint48(self.valid_until));
        packed.extend_from_slice(ecdsa_signature);
        packed.into()
    }
}

fn uint48(value: u64) -> [u8; 6] {
    let mut out = [0u8; 6];
    out.copy_from_slice(&value.to_be_bytes()[2..]);
    out
}

impl Eip712 for SafeOperation<'_> {
    type Error = Eip712Error;

    fn domain(&self) -> std::result::Result<EIP712Domain, Self::Error> {
        Ok(EIP712Domain {
            name: None,
            version: None,
            chain_id: Some(U256::from(self.chain_id)),
            verifying_contract: Some(self.module),
            salt: None,
        })
    }

    fn type_hash() -> std::result::Result<[u8; 32], Self::Error> {
        Ok(keccak256(SAFE_OP_TYPE))
    }

    fn struct_hash(&self) -> std::result::Result<[u8; 32], Self::Error> {
        let op = self.user_operation;
        Ok(keccak256(encode(&[
            Token::FixedBytes(Self::type_hash()?.to_vec()),
            Token::Address(op.sender),
            Token::Uint(op.nonce),
            Token::FixedBytes(keccak256(&op.init_code).to_vec()),
            Token::FixedBytes(keccak256(&op.call_data).to_vec()),
            Token::Uint(op.call_gas_limit),
            Token::Uint(op.verification_gas_limit),
            Token::Uint(op.pre_verification_gas),
            Token::Uint(op.max_fee_per_gas),
            Token::Uint(op.max_priority_fee_per_gas),
            Token::FixedBytes(keccak256(&op.paymaster_and_data).to_vec()),
            Token::Uint(U256::from(self.valid_after)),
            Token::Uint(U256::from(self.valid_until)),
            Token::Address(self.entry_point),
        ])))
    }
}
