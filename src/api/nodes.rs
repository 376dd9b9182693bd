use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info, warn};

use super::models::{
    AppState, ConnectRequest, ConnectResponse, MessageResponse, NodesResponse, ReplaceResponse,
};
use crate::network::consensus::{fetch_chain, longest_valid_chain};
use crate::network::registry::normalize_address;

/// Register one or more peers, then forward the new addresses to the rest
/// of the network. Forwarding failures are reported, not fatal.
#[post("/connect_node")]
pub async fn connect_node(
    state: web::Data<AppState>,
    body: web::Json<ConnectRequest>,
) -> impl Responder {
    if body.address.is_empty() {
        return HttpResponse::BadRequest().json(MessageResponse {
            message: "No node".to_string(),
        });
    }

    let (peers, total_nodes, newly_added) = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        let mut newly_added = false;
        for address in &body.address {
            match ledger.nodes.add(address) {
                Ok(inserted) => newly_added |= inserted,
                Err(reason) => {
                    warn!("POST /connect_node - rejected {address}: {reason}");
                    return HttpResponse::BadRequest().body(reason);
                }
            }
        }

        let submitted: Vec<String> = body
            .address
            .iter()
            .filter_map(|a| normalize_address(a).ok())
            .collect();
        let peers: Vec<String> = ledger
            .nodes
            .to_vec()
            .into_iter()
            .filter(|node| !submitted.contains(node))
            .collect();
        (peers, ledger.nodes.to_vec(), newly_added)
    };

    // A node that learned nothing new does not forward, which terminates
    // the gossip between mutually registered peers.
    let mut broadcasted = true;
    if newly_added {
        for peer in &peers {
            let url = format!("http://{peer}/connect_node");
            match state.http.post(&url).json(&*body).send().await {
                Ok(response) if response.status().is_success() => {}
                Ok(response) => {
                    warn!("POST /connect_node - {peer} answered {}", response.status());
                    broadcasted = false;
                }
                Err(err) => {
                    warn!("POST /connect_node - broadcast to {peer} failed: {err}");
                    broadcasted = false;
                }
            }
        }
    }

    info!(
        "POST /connect_node - registry now has {} node(s)",
        total_nodes.len()
    );
    HttpResponse::Ok().json(ConnectResponse {
        message: "All good. The node has been successfully added.",
        broadcasted,
        total_nodes,
    })
}

/// List the registered peers.
#[get("/list_nodes")]
pub async fn list_nodes(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(NodesResponse {
        nodes: ledger.nodes.to_vec(),
        number_of_nodes: ledger.nodes.len(),
    })
}

/// Ask every registered peer for its chain and adopt the longest valid
/// one. Unreachable or erroring peers are skipped; an empty registry
/// trivially leaves the chain unchanged.
#[get("/replace_chain")]
pub async fn replace_chain(state: web::Data<AppState>) -> impl Responder {
    let (peers, local_len, difficulty) = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        (ledger.nodes.to_vec(), ledger.chain.len(), ledger.difficulty())
    };

    // Peers answer in registry order, so equal-length candidates resolve
    // to the lexicographically first address.
    let mut candidates = Vec::with_capacity(peers.len());
    for peer in &peers {
        match fetch_chain(&state.http, peer).await {
            Ok(remote) => {
                debug!(
                    "CONSENSUS - {peer} reports length {} ({} blocks)",
                    remote.length,
                    remote.chain.len()
                );
                candidates.push(remote.chain);
            }
            Err(err) => warn!("CONSENSUS - skipping {peer}: {err}"),
        }
    }

    let candidate = longest_valid_chain(local_len, candidates, difficulty);

    let mut ledger = state.ledger.lock().expect("mutex poisoned");
    let replaced = match candidate {
        // The local chain may have grown while peers were answering; only
        // a chain still strictly longer than the tip wins the swap.
        Some(chain) if chain.len() > ledger.chain.len() => {
            info!(
                "CONSENSUS - replacing local chain ({} -> {} blocks)",
                ledger.chain.len(),
                chain.len()
            );
            ledger.chain = chain;
            true
        }
        _ => false,
    };

    let message = if replaced {
        "The nodes had different chains so the chain was replaced by the longest one."
    } else {
        "All good. The chain is the largest one."
    };
    HttpResponse::Ok().json(ReplaceResponse {
        message,
        chain: ledger.chain.clone(),
    })
}
