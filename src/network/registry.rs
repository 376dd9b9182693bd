use std::collections::BTreeSet;

/// Deduplicated set of peer addresses, stored as `host:port` and iterated
/// in lexicographic order so every scan over the registry is deterministic.
#[derive(Debug, Default, Clone)]
pub struct NodeRegistry {
    nodes: BTreeSet<String>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and insert an address. Returns whether the network
    /// location was new; re-adding a known `host:port` is a no-op.
    pub fn add(&mut self, address: &str) -> Result<bool, &'static str> {
        let node = normalize_address(address)?;
        Ok(self.nodes.insert(node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All registered locations in lexicographic order.
    pub fn to_vec(&self) -> Vec<String> {
        self.nodes.iter().cloned().collect()
    }
}

/// Reduce a peer URL to its network location: scheme and path are
/// discarded, so `http://127.0.0.1:5000/` and `https://127.0.0.1:5000`
/// both normalize to `127.0.0.1:5000`.
pub fn normalize_address(address: &str) -> Result<String, &'static str> {
    let url = reqwest::Url::parse(address).map_err(|_| "invalid node address")?;
    let host = url.host_str().ok_or("node address has no host")?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
