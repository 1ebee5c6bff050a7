//! Conversions between core types and Starknet SDK types.

use client_blockchain_core::{Call, Felt};
use starknet::providers::JsonRpcClient;
use starknet::providers::jsonrpc::HttpTransport;
use url::Url;

/// JSON-RPC client used by every collaborator in this crate.
pub type RpcClient = JsonRpcClient<HttpTransport>;

/// Build a JSON-RPC client for `node_url`.
pub fn rpc_client(node_url: &Url) -> RpcClient {
    JsonRpcClient::new(HttpTransport::new(node_url.clone()))
}

/// Parse a node URL.
pub fn parse_url(url: &str) -> Result<Url, String> {
    Url::parse(url).map_err(|e| format!("{url}: {e}"))
}

/// Parse a hex field element such as an address, class hash or key.
pub fn parse_felt(value: &str) -> Result<Felt, String> {
    Felt::from_hex(value.trim()).map_err(|e| format!("{value}: {e}"))
}

pub fn to_starknet_call(call: Call) -> starknet::core::types::Call {
    starknet::core::types::Call {
        to: call.to,
        selector: call.selector,
        calldata: call.calldata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_felt() {
        assert_eq!(parse_felt(" 0x1f ").unwrap(), Felt::from(0x1fu8));
        assert!(parse_felt("not-hex").is_err());
    }

    #[test]
    fn test_parse_url() {
        assert!(parse_url("http://localhost:5050").is_ok());
        assert!(parse_url("localhost without scheme").is_err());
    }
}
