use actix_web::{HttpResponse, Responder, get, web};
use log::{debug, info};

use super::models::{AppState, ChainResponse, MessageResponse, MineResponse};
use crate::blockchain::{MINING_REWARD, MINING_REWARD_RECIPIENT};
use crate::transaction::Transaction;

/// Get the full blockchain. Peers call this same endpoint during
/// consensus resolution.
#[get("/get_chain")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    let resp = ChainResponse {
        chain: &ledger.chain,
        length: ledger.chain.len(),
    };
    HttpResponse::Ok().json(resp)
}

/// Validate the whole chain.
#[get("/is_valid")]
pub async fn is_valid(state: web::Data<AppState>) -> impl Responder {
    let valid = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.is_valid_chain()
    };
    let message = if valid {
        "All good. The Blockchain is valid."
    } else {
        "Houston, we have a problem. The Blockchain is not valid."
    };
    HttpResponse::Ok().json(MessageResponse {
        message: message.to_string(),
    })
}

/// Mine a new block from the pending pool:
/// - snapshot the pool and the tip under the lock
/// - run the nonce search with the lock released
/// - commit the sealed block and drain the snapshotted transactions
///
/// A commit fails when another mine landed first; the search then restarts
/// from a fresh snapshot.
#[get("/mine_block")]
pub async fn mine_block(state: web::Data<AppState>) -> impl Responder {
    let sealed = loop {
        let reward = Transaction::new(
            state.node_id.clone(),
            MINING_REWARD_RECIPIENT.to_string(),
            MINING_REWARD,
        );
        let (mut candidate, taken, difficulty) = {
            let ledger = state.ledger.lock().expect("mutex poisoned");
            let (block, taken) = ledger.stage_block(reward);
            (block, taken, ledger.difficulty())
        };

        candidate.mine(difficulty);

        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        match ledger.commit_block(candidate, taken) {
            Ok(block) => break block.clone(),
            Err(reason) => debug!("MINER - restarting nonce search: {reason}"),
        }
    };

    info!(
        "MINER - sealed block #{} (hash={}, nonce={})",
        sealed.index, sealed.hash, sealed.nonce
    );
    HttpResponse::Ok().json(MineResponse {
        message: "Congratulations, you just mined a block!",
        index: sealed.index,
        timestamp: sealed.timestamp,
        nonce: sealed.nonce,
        transactions: sealed.transactions,
        previous_hash: sealed.previous_hash,
        hash: sealed.hash,
    })
}
