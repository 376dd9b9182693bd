use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, warn};

use super::models::{AppState, MempoolResponse, MessageResponse, NewTxRequest};
use crate::transaction::Transaction;

/// Submit a new transaction into the pending pool.
#[post("/add_transaction")]
pub async fn add_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    let sender = body.sender.trim();
    let recipient = body.recipient.trim();
    if sender.is_empty() || recipient.is_empty() {
        warn!("POST /add_transaction - rejected: empty sender or recipient");
        return HttpResponse::BadRequest().body("sender and recipient are required");
    }
    if body.amount <= 0.0 {
        warn!("POST /add_transaction - rejected: non-positive amount");
        return HttpResponse::BadRequest().body("amount must be > 0");
    }

    let tx = Transaction::new(sender.to_string(), recipient.to_string(), body.amount);
    let index = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        let index = ledger.add_transaction(tx);
        debug!(
            "POST /add_transaction - accepted; pool size now {}",
            ledger.pending.len()
        );
        index
    };

    HttpResponse::Ok().json(MessageResponse {
        message: format!("This transaction will be added to Block {index}"),
    })
}

/// List the pending pool (transactions waiting for the next mined block).
#[get("/mempool")]
pub async fn get_mempool(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(MempoolResponse {
        size: ledger.pending.len(),
        transactions: ledger.pending.clone(),
    })
}
