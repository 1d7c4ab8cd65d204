//! JSON-RPC endpoint backed by an in-memory account map
//!
//! Answers the handful of methods the client issues and records every call
//! so tests can check what was sent and in which order.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use solana_sdk::{account::Account, hash::Hash, pubkey::Pubkey, signature::Signature};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use wiremock::{matchers::method, Mock, MockServer, Request, Respond, ResponseTemplate};

#[derive(Debug, Default)]
struct LedgerState {
    accounts: HashMap<Pubkey, Account>,
    calls: Vec<(String, Value)>,
    sent: Vec<Vec<u8>>,
    slot: u64,
    units_consumed: u64,
    simulation_error: Option<(Value, Vec<String>)>,
}

#[derive(Clone)]
pub struct RpcMock {
    state: Arc<Mutex<LedgerState>>,
    blockhash: Hash,
}

impl Default for RpcMock {
    fn default() -> Self {
        Self::new()
    }
}

impl RpcMock {
    pub fn new() -> Self {
        let state = LedgerState {
            slot: 1_000,
            units_consumed: 10_000,
            ..LedgerState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            blockhash: Hash::new_unique(),
        }
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap()
    }

    /// Serve this ledger on a fresh mock server
    pub async fn start(&self) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(self.clone())
            .mount(&server)
            .await;
        server
    }

    pub fn set_account(&self, address: Pubkey, account: Account) {
        self.state().accounts.insert(address, account);
    }

    pub fn set_slot(&self, slot: u64) {
        self.state().slot = slot;
    }

    pub fn set_units_consumed(&self, units: u64) {
        self.state().units_consumed = units;
    }

    /// Every simulation reports `err` with `logs`
    pub fn fail_simulation(&self, err: Value, logs: &[&str]) {
        let logs = logs.iter().map(|l| l.to_string()).collect();
        self.state().simulation_error = Some((err, logs));
    }

    /// Methods called so far, without version probes
    pub fn methods(&self) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .map(|(m, _)| m.clone())
            .filter(|m| m != "getVersion")
            .collect()
    }

    /// Params of every call to `method`
    pub fn params(&self, method: &str) -> Vec<Value> {
        self.state()
            .calls
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
            .collect()
    }

    /// Wire bytes of every transaction sent
    pub fn sent_transactions(&self) -> Vec<Vec<u8>> {
        self.state().sent.clone()
    }

    fn context(slot: u64, value: Value) -> Value {
        json!({ "context": { "slot": slot }, "value": value })
    }

    fn handle(&self, method: &str, params: &Value) -> Result<Value, String> {
        let mut state = self.state();
        state.calls.push((method.to_string(), params.clone()));
        let slot = state.slot;

        match method {
            "getAccountInfo" => {
                let address = params[0]
                    .as_str()
                    .and_then(|s| Pubkey::from_str(s).ok())
                    .ok_or("bad address")?;
                let value = match state.accounts.get(&address) {
                    Some(account) => json!({
                        "lamports": account.lamports,
                        "data": [STANDARD.encode(&account.data), "base64"],
                        "owner": account.owner.to_string(),
                        "executable": account.executable,
                        "rentEpoch": 0,
                        "space": account.data.len(),
                    }),
                    None => Value::Null,
                };
                Ok(Self::context(slot, value))
            }
            "getLatestBlockhash" => Ok(Self::context(
                slot,
                json!({
                    "blockhash": self.blockhash.to_string(),
                    "lastValidBlockHeight": slot + 150,
                }),
            )),
            "getSlot" => Ok(json!(slot)),
            "getVersion" => Ok(json!({ "solana-core": "2.1.0", "feature-set": 0 })),
            "isBlockhashValid" => Ok(Self::context(slot, json!(true))),
            "simulateTransaction" => {
                let (err, logs) = state
                    .simulation_error
                    .clone()
                    .unwrap_or((Value::Null, Vec::new()));
                Ok(Self::context(
                    slot,
                    json!({
                        "err": err,
                        "logs": logs,
                        "accounts": null,
                        "unitsConsumed": state.units_consumed,
                        "returnData": null,
                    }),
                ))
            }
            "sendTransaction" => {
                let wire = params[0]
                    .as_str()
                    .and_then(|s| STANDARD.decode(s).ok())
                    .ok_or("transaction is not base64")?;
                // Compact-u16 signature count, then the fee payer's signature
                let signature = wire
                    .get(1..65)
                    .and_then(|bytes| Signature::try_from(bytes).ok())
                    .ok_or("transaction too short")?;
                state.sent.push(wire);
                Ok(json!(signature.to_string()))
            }
            "getSignatureStatuses" => {
                let count = params[0].as_array().map_or(0, Vec::len);
                let statuses: Vec<Value> = (0..count)
                    .map(|_| {
                        json!({
                            "slot": slot,
                            "confirmations": null,
                            "err": null,
                            "status": { "Ok": null },
                            "confirmationStatus": "finalized",
                        })
                    })
                    .collect();
                Ok(Self::context(slot, json!(statuses)))
            }
            other => Err(format!("method {} not mocked", other)),
        }
    }
}

impl Respond for RpcMock {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(_) => return ResponseTemplate::new(400),
        };
        let id = body["id"].clone();
        let method = body["method"].as_str().unwrap_or_default().to_string();

        let reply = match self.handle(&method, &body["params"]) {
            Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
            Err(message) => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": message },
            }),
        };
        ResponseTemplate::new(200).set_body_json(reply)
    }
}

/// Whether `needle` appears contiguously in `haystack`
pub fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
