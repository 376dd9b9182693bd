use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::blockchain::{Block, Blockchain, DEFAULT_DIFFICULTY};
use crate::network::PEER_TIMEOUT_SECS;
use crate::transaction::Transaction;

/// Shared application state: the ledger aggregate behind a single lock,
/// this node's identity and the HTTP client used to talk to peers.
pub struct AppState {
    pub ledger: Mutex<Blockchain>,
    pub node_id: String,
    pub http: reqwest::Client,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            ledger: Mutex::new(Blockchain::new(DEFAULT_DIFFICULTY)),
            node_id: Uuid::new_v4().simple().to_string(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(PEER_TIMEOUT_SECS))
                .build()
                .expect("build peer http client"),
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub chain: &'a [Block],
    pub length: usize,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: &'static str,
    pub index: u64,
    pub timestamp: String,
    pub nonce: u64,
    pub transactions: Vec<Transaction>,
    pub previous_hash: String,
    pub hash: String,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

#[derive(Serialize)]
pub struct MempoolResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

/* ---------- Node API Models ---------- */

#[derive(Serialize, Deserialize)]
pub struct ConnectRequest {
    pub address: Vec<String>,
}

#[derive(Serialize)]
pub struct ConnectResponse {
    pub message: &'static str,
    pub broadcasted: bool,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct NodesResponse {
    pub nodes: Vec<String>,
    pub number_of_nodes: usize,
}

#[derive(Serialize)]
pub struct ReplaceResponse {
    pub message: &'static str,
    pub chain: Vec<Block>,
}
