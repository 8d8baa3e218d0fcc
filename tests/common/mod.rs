// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use ethers::abi::{encode, Token};
use ethers::signers::LocalWallet;
use ethers::types::{Address, Bytes, U256, U64};
use serde_json::{json, Value};

use safe4337::{Error, Result, RpcTransport, UserOperation};

pub const SEPOLIA: u64 = 11155111;

/// Owner of the predicted Safe `0x2FF46F26638977AE8C88e205cCa407A1a9725F0B`.
pub fn wallet() -> LocalWallet {
    "4646464646464646464646464646464646464646464646464646464646464646"
        .parse()
        .unwrap()
}

/// In-memory node, bundler and paymaster.
///
/// Canned responses and failures take precedence over the built-in behavior,
/// which covers code lookups, `getOwners`/`getNonce` calls and submission.
#[derive(Debug, Default)]
pub struct TestTransport {
    chain_id: u64,
    nonce: U256,
    deployed: Mutex<HashSet<Address>>,
    owners: Vec<Address>,
    responses: HashMap<String, Value>,
    failures: HashMap<String, String>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl TestTransport {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            ..Default::default()
        }
    }

    pub fn with_deployed(self, address: Address) -> Self {
        self.deploy(address);
        self
    }

    /// Puts code at `address` from now on.
    pub fn deploy(&self, address: Address) {
        self.deployed.lock().unwrap().insert(address);
    }

    pub fn with_owners(mut self, owners: Vec<Address>) -> Self {
        self.owners = owners;
        self
    }

    pub fn with_nonce(mut self, nonce: U256) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn with_response(mut self, method: &str, response: Value) -> Self {
        self.responses.insert(method.to_string(), response);
        self
    }

    pub fn with_failure(mut self, method: &str, message: &str) -> Self {
        self.failures.insert(method.to_string(), message.to_string());
        self
    }

    /// Params of every call to `method`, in order.
    pub fn calls_to(&self, method: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, params)| params.clone())
            .collect()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(m, _)| m.clone())
            .collect()
    }

    fn eth_call(&self, params: &Value) -> Value {
        let data: Bytes = serde_json::from_value(params[0]["data"].clone()).unwrap();
        let output = match hex::encode(&data[..4]).as_str() {
            // getOwners()
            "a0e67e2b" => encode(&[Token::Array(
                self.owners.iter().copied().map(Token::Address).collect(),
            )]),
            // getNonce(address,uint192)
            "35567e1a" => encode(&[Token::Uint(self.nonce)]),
            selector => panic!("unexpected eth_call selector {selector}"),
        };
        json!(Bytes::from(output))
    }

    fn send_user_operation(&self, params: &Value) -> Value {
        let user_operation: UserOperation = serde_json::from_value(params[0].clone()).unwrap();
        let entry_point: Address = serde_json::from_value(params[1].clone()).unwrap();
        json!(user_operation.hash(entry_point, self.chain_id))
    }
}

#[async_trait]
impl RpcTransport for TestTransport {
    async fn send(&self, method: &str, params: Value) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params.clone()));

        if let Some(message) = self.failures.get(method) {
            return Err(Error::Transport(message.clone()));
        }
        if let Some(response) = self.responses.get(method) {
            return Ok(response.clone());
        }

        match method {
            "eth_chainId" => Ok(json!(U64::from(self.chain_id))),
            "eth_getCode" => {
                let address: Address = serde_json::from_value(params[0].clone()).unwrap();
                if self.deployed.lock().unwrap().contains(&address) {
                    Ok(json!("0x608060405273ffffffffffffffffffffffffffffffffffffffff600054167c"))
                } else {
                    Ok(json!("0x"))
                }
            }
            "eth_call" => Ok(self.eth_call(&params)),
            "eth_sendUserOperation" => Ok(self.send_user_operation(&params)),
            _ => Err(Error::Transport(format!("no response for {method}"))),
        }
    }
}
