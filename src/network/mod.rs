pub mod consensus;
pub mod registry;

pub use registry::NodeRegistry;

/// Timeout applied to every HTTP request made to a peer node.
pub const PEER_TIMEOUT_SECS: u64 = 5;
