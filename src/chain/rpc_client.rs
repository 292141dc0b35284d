use crate::chain::{with_timeout, ChainReader, SuiAddress};
use crate::coins::CoinSet;
use crate::core::{
    CanonicalPair, CoinObject, Config, PoolId, PoolState, SdkError, SdkResult, TokenType,
    COINS_PAGE_LIMIT, REGISTRY_KEY_TYPE,
};
use log::{debug, warn};
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Fullnode JSON-RPC reader.
pub struct JsonRpcClient {
    http: Client,
    rpc_url: String,
    pool_registry_table_id: String,
    timeout: Duration,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(config: &Config) -> SdkResult<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| SdkError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            rpc_url: config.rpc_url.clone(),
            pool_registry_table_id: config.pool_registry_table_id.clone(),
            timeout: config.request_timeout(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Issue one call and return its `result` member.
    async fn call(&self, method: &str, params: Value) -> SdkResult<Value> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        });

        let response: Value = with_timeout(self.timeout, method, async {
            let resp = self
                .http
                .post(&self.rpc_url)
                .json(&payload)
                .send()
                .await?
                .error_for_status()?;
            Ok::<Value, SdkError>(resp.json::<Value>().await?)
        })
        .await?;

        if let Some(error) = response.get("error") {
            warn!("{} returned error: {}", method, error);
            return Err(SdkError::NetworkError(format!("{}: {}", method, error)));
        }

        response
            .get("result")
            .cloned()
            .ok_or_else(|| SdkError::SerializationError(format!("{}: response has no result", method)))
    }
}

#[async_trait::async_trait]
impl ChainReader for JsonRpcClient {
    async fn fetch_owned_coins(
        &self,
        owner: &SuiAddress,
        token_type: &TokenType,
    ) -> SdkResult<CoinSet> {
        let mut coins = Vec::new();
        let mut cursor = Value::Null;

        loop {
            let page = self
                .call(
                    "suix_getCoins",
                    json!([owner.as_str(), token_type.as_str(), cursor, COINS_PAGE_LIMIT]),
                )
                .await?;

            let data = page
                .get("data")
                .and_then(Value::as_array)
                .ok_or_else(|| SdkError::SerializationError("suix_getCoins: missing data".to_string()))?;

            for entry in data {
                let id = entry
                    .get("coinObjectId")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        SdkError::SerializationError("suix_getCoins: missing coinObjectId".to_string())
                    })?
                    .parse()?;
                let balance = entry
                    .get("balance")
                    .map(parse_u64)
                    .transpose()?
                    .ok_or_else(|| {
                        SdkError::SerializationError("suix_getCoins: missing balance".to_string())
                    })?;

                coins.push(CoinObject {
                    id,
                    token_type: token_type.clone(),
                    balance,
                });
            }

            let has_next = page
                .get("hasNextPage")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            match page.get("nextCursor") {
                Some(next) if has_next && !next.is_null() => cursor = next.clone(),
                _ => break,
            }
        }

        debug!("Fetched {} {} coins for {}", coins.len(), token_type, owner);
        CoinSet::new(token_type.clone(), coins)
    }

    async fn fetch_pool_reserves(&self, pool_id: &PoolId) -> SdkResult<PoolState> {
        let result = self
            .call(
                "sui_getObject",
                json!([pool_id.as_str(), { "showContent": true }]),
            )
            .await?;

        let fields = result
            .pointer("/data/content/fields")
            .ok_or_else(|| SdkError::InvalidPoolState(format!("Pool {} has no content", pool_id)))?;

        let field = |name: &str| -> SdkResult<u64> {
            fields
                .get(name)
                .ok_or_else(|| {
                    SdkError::InvalidPoolState(format!("Pool {} is missing {}", pool_id, name))
                })
                .and_then(parse_u64)
        };

        Ok(PoolState {
            id: pool_id.clone(),
            bal_x: field("bal_x")?,
            bal_y: field("bal_y")?,
            fee_bal_x: field("fee_bal_x")?,
            fee_bal_y: field("fee_bal_y")?,
            lp_supply: field("lp_supply")?,
            fee_rate: field("fee_rate")?,
            min_liquidity: field("min_liquidity")?,
        })
    }

    async fn lookup_pool_registry(&self, pair: &CanonicalPair) -> SdkResult<Option<PoolId>> {
        let result = self
            .call(
                "suix_getDynamicFieldObject",
                json!([
                    self.pool_registry_table_id,
                    { "type": REGISTRY_KEY_TYPE, "value": pair.lp_name() }
                ]),
            )
            .await?;

        if result.get("error").is_some() {
            debug!("No registry entry for {}", pair);
            return Ok(None);
        }

        match result
            .pointer("/data/content/fields/value")
            .and_then(Value::as_str)
        {
            Some(id) => Ok(Some(id.parse()?)),
            None => Err(SdkError::SerializationError(format!(
                "Unexpected registry response for {}",
                pair
            ))),
        }
    }
}

/// Move u64 fields arrive as strings, numbers or `{ value }` / `{ fields: { value } }` wrappers.
fn parse_u64(value: &Value) -> SdkResult<u64> {
    match value {
        Value::String(s) => s
            .parse()
            .map_err(|_| SdkError::SerializationError(format!("Not a u64: {}", s))),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| SdkError::SerializationError(format!("Not a u64: {}", n))),
        Value::Object(map) => match (map.get("value"), map.get("fields")) {
            (Some(inner), _) => parse_u64(inner),
            (None, Some(inner)) => parse_u64(inner),
            _ => Err(SdkError::SerializationError(format!("Not a u64: {}", value))),
        },
        _ => Err(SdkError::SerializationError(format!("Not a u64: {}", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Network;
    use mockito::Matcher;

    const USDC: &str = "0x5c68f3d2ebfd711454da300d6abf3c7254dc9333cd138cdc68e158ebffd24483::coins::USDC";
    const POOL: &str = "0x40b7f495f9933ed2f2e493a4f95876c2f2e9453dd67b877290d5df2aa4157aaf";

    fn client(url: String, timeout_secs: u64) -> JsonRpcClient {
        let mut config = Config::for_network(Network::Testnet).unwrap();
        config.rpc_url = url;
        config.request_timeout_secs = timeout_secs;
        JsonRpcClient::new(&config).unwrap()
    }

    fn pair() -> CanonicalPair {
        CanonicalPair::new(&TokenType::from("0x2::sui::SUI"), &TokenType::from(USDC))
            .unwrap()
            .0
    }

    #[test]
    fn test_parse_u64_shapes() {
        assert_eq!(parse_u64(&json!("1000")).unwrap(), 1000);
        assert_eq!(parse_u64(&json!(30)).unwrap(), 30);
        assert_eq!(parse_u64(&json!({ "value": "7" })).unwrap(), 7);
        assert_eq!(
            parse_u64(&json!({ "type": "0x2::balance::Supply", "fields": { "value": "9" } })).unwrap(),
            9
        );
        assert!(parse_u64(&json!("-1")).is_err());
        assert!(parse_u64(&json!(1.5)).is_err());
    }

    #[tokio::test]
    async fn test_registry_lookup_found() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({ "method": "suix_getDynamicFieldObject" })))
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": { "data": { "content": { "fields": { "value": POOL } } } }
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let client = client(server.url(), 5);
        let found = client.lookup_pool_registry(&pair()).await.unwrap();
        assert_eq!(found, Some(POOL.parse().unwrap()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_registry_lookup_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": { "error": { "code": "dynamicFieldNotFound" } }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client(server.url(), 5);
        assert_eq!(client.lookup_pool_registry(&pair()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rpc_error_is_network_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "error": { "code": -32602, "message": "Invalid params" }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client(server.url(), 5);
        let err = client.lookup_pool_registry(&pair()).await.unwrap_err();
        assert!(matches!(err, SdkError::NetworkError(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_fetch_pool_reserves() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({ "method": "sui_getObject" })))
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": { "data": { "content": { "fields": {
                        "id": { "id": POOL },
                        "bal_x": "1000000",
                        "bal_y": "2000000",
                        "fee_bal_x": "10",
                        "fee_bal_y": "20",
                        "lp_supply": { "type": "0x2::balance::Supply", "fields": { "value": "1414213" } },
                        "fee_rate": "30",
                        "min_liquidity": { "value": "1000" }
                    } } } }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client(server.url(), 5);
        let state = client.fetch_pool_reserves(&POOL.parse().unwrap()).await.unwrap();
        assert_eq!(state.bal_x, 1_000_000);
        assert_eq!(state.bal_y, 2_000_000);
        assert_eq!(state.fee_bal_y, 20);
        assert_eq!(state.lp_supply, 1_414_213);
        assert_eq!(state.fee_rate, 30);
        assert_eq!(state.min_liquidity, 1_000);
    }

    #[tokio::test]
    async fn test_fetch_owned_coins_paginates() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("POST", "/")
            .match_body(Matcher::Regex(r"null,50\]".to_string()))
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": {
                        "data": [
                            { "coinType": USDC, "coinObjectId": "0xa1", "balance": "50" },
                            { "coinType": USDC, "coinObjectId": "0xa2", "balance": "0" }
                        ],
                        "nextCursor": "page-2",
                        "hasNextPage": true
                    }
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("POST", "/")
            .match_body(Matcher::Regex("page-2".to_string()))
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 2,
                    "result": {
                        "data": [{ "coinType": USDC, "coinObjectId": "0xa3", "balance": "30" }],
                        "nextCursor": null,
                        "hasNextPage": false
                    }
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let client = client(server.url(), 5);
        let set = client
            .fetch_owned_coins(&"0xabc".parse().unwrap(), &TokenType::from(USDC))
            .await
            .unwrap();

        // zero-balance coin dropped
        assert_eq!(set.len(), 2);
        assert_eq!(set.total_balance(), 80);
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_node_is_retryable() {
        // Nothing listens on the discard port
        let client = client("http://127.0.0.1:9".to_string(), 5);
        let err = client.lookup_pool_registry(&pair()).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
