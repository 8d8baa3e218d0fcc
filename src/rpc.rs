// src/rpc.rs
use async_trait::async_trait;
use ethers::providers::{JsonRpcClient, Provider};
use ethers::types::{Address, Bytes, U64};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Error, Result};

/// A JSON-RPC endpoint: one request in, one raw result out.
///
/// Implementations only deal with the envelope. Method-specific encoding and
/// decoding lives in the extension traits layered on top ([`NodeClient`],
/// [`crate::BundlerClient`], [`crate::PaymasterClient`]), so a transport only
/// fails with [`Error::Transport`] or [`Error::Rpc`].
#[async_trait]
pub trait RpcTransport: std::fmt::Debug + Send + Sync {
    async fn send(&self, method: &str, params: Value) -> Result<Value>;
}

#[async_trait]
impl<P> RpcTransport for Provider<P>
where
    P: JsonRpcClient + 'static,
{
    async fn send(&self, method: &str, params: Value) -> Result<Value> {
        Ok(self.request::<_, Value>(method, params).await?)
    }
}

/// Serializes one positional parameter.
pub(crate) fn to_param<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| Error::Encoding(e.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(method: &str, result: Value) -> Result<T> {
    serde_json::from_value(result).map_err(|e| Error::decode(method, e))
}

/// Like [`decode`], but a `null` result is a valid "not found".
pub(crate) fn decode_optional<T: DeserializeOwned>(method: &str, result: Value) -> Result<Option<T>> {
    if result.is_null() {
        return Ok(None);
    }
    decode(method, result).map(Some)
}

/// The handful of node methods a smart account needs.
#[async_trait]
pub trait NodeClient: RpcTransport {
    async fn eth_chain_id(&self) -> Result<u64> {
        let result = self.send("eth_chainId", json!([])).await?;
        let chain_id: U64 = decode("eth_chainId", result)?;
        Ok(chain_id.as_u64())
    }

    async fn eth_get_code(&self, address: Address) -> Result<Bytes> {
        debug!("Fetching code at {:?}", address);
        let result = self
            .send("eth_getCode", json!([to_param(&address)?, "latest"]))
            .await?;
        decode("eth_getCode", result)
    }

    async fn eth_call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let call = json!({ "to": to_param(&to)?, "data": to_param(&data)? });
        let result = self.send("eth_call", json!([call, "latest"])).await?;
        decode("eth_call", result)
    }
}

impl<T: RpcTransport + ?Sized> NodeClient for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::H256;

    #[test]
    fn test_decode_optional_null_is_absent() {
        let decoded: Option<H256> = decode_optional("eth_getUserOperationReceipt", Value::Null).unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn test_decode_mismatch_is_protocol_error() {
        let err = decode::<Vec<Address>>("eth_supportedEntryPoints", json!({ "foo": 1 })).unwrap_err();
        match err {
            Error::ProtocolDecode { method, .. } => assert_eq!(method, "eth_supportedEntryPoints"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_optional_mismatch_is_not_absent() {
        let err = decode_optional::<H256>("eth_getUserOperationByHash", json!(42)).unwrap_err();
        assert!(matches!(err, Error::ProtocolDecode { .. }));
    }
}
