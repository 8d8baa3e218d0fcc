// src/error.rs
use ethers::providers::{ProviderError, RpcError};
use ethers::types::{Address, H256};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Unexpected result for {method}: {source}")]
    ProtocolDecode {
        method: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Account {0:?} is not deployed")]
    AccountNotDeployed(Address),

    #[error("Unexpected value: {0}")]
    UnexpectedValue(String),

    /// The bundler accepted the operation under a different hash than the
    /// one computed locally. `actual` is the hash the bundler will answer to.
    #[error("Bundler returned user operation hash {actual:?}, expected {expected:?}")]
    HashMismatch { expected: H256, actual: H256 },

    #[error("Encoding failed: {0}")]
    Encoding(String),

    #[error("Signer error: {0}")]
    Signer(String),

    #[error("Entry point {0:?} is not supported")]
    UnsupportedEntryPoint(Address),
}

impl Error {
    pub(crate) fn decode(
        method: &str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ProtocolDecode {
            method: method.to_string(),
            source: source.into(),
        }
    }
}

impl From<ProviderError> for Error {
    fn from(err: ProviderError) -> Self {
        match err.as_error_response() {
            Some(response) => Self::Rpc {
                code: response.code,
                message: response.message.clone(),
            },
            None => Self::Transport(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::providers::{HttpClientError, JsonRpcError};

    #[test]
    fn test_error_response_is_rpc_error() {
        let err: Error = ProviderError::from(HttpClientError::JsonRpcError(JsonRpcError {
            code: -32602,
            message: "invalid UserOperation signature".to_string(),
            data: None,
        }))
        .into();

        match err {
            Error::Rpc { code, message } => {
                assert_eq!(code, -32602);
                assert_eq!(message, "invalid UserOperation signature");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_other_provider_errors_are_transport() {
        let err: Error = ProviderError::CustomError("connection reset".to_string()).into();
        assert!(matches!(err, Error::Transport(_)));
    }
}
