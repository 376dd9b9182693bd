use serde::Deserialize;

use crate::blockchain::{Block, check_valid_chain};

/// Wire shape of a peer's `GET /get_chain` response.
#[derive(Debug, Deserialize)]
pub struct RemoteChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Fetch a peer's full chain over plain HTTP. Transport failures and
/// non-success statuses are returned to the caller, which treats the peer
/// as skippable.
pub async fn fetch_chain(
    client: &reqwest::Client,
    node: &str,
) -> Result<RemoteChain, reqwest::Error> {
    let url = format!("http://{node}/get_chain");
    let response = client.get(&url).send().await?.error_for_status()?;
    response.json::<RemoteChain>().await
}

/// Scan candidate chains in order and keep the longest valid one that is
/// strictly longer than the local chain; `None` when no candidate
/// qualifies. Only a strictly greater length displaces the running best,
/// so with candidates in registry order a tie resolves to the first peer
/// that reached the maximum. Length is the actual block count, not the
/// length a peer advertised.
pub fn longest_valid_chain(
    local_len: usize,
    candidates: Vec<Vec<Block>>,
    difficulty: u32,
) -> Option<Vec<Block>> {
    let mut best: Option<Vec<Block>> = None;
    let mut max_len = local_len;

    for chain in candidates {
        if chain.len() > max_len && check_valid_chain(&chain, difficulty) {
            max_len = chain.len();
            best = Some(chain);
        }
    }

    best
}
