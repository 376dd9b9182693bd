mod chain;
mod health;
pub mod models;
mod nodes;
mod tx;

use actix_web::web::ServiceConfig;

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(health::health_check)
        .service(chain::get_chain)
        .service(chain::is_valid)
        .service(chain::mine_block)
        .service(tx::add_transaction)
        .service(tx::get_mempool)
        .service(nodes::connect_node)
        .service(nodes::list_nodes)
        .service(nodes::replace_chain);
}
