use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::transaction::Transaction;

/// A single block in the blockchain holding a list of transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: String, // RFC 3339 (UTC)
    pub nonce: u64,        // Proof-of-Work nonce
    pub transactions: Vec<Transaction>,
    pub previous_hash: String,
    pub hash: String, // Cached hash of the block
}

/// Hashing view of a block. It structurally lacks the `hash` field, so a
/// block's digest can never include itself and linkage hashes of earlier
/// blocks are computed over the same content.
#[derive(Serialize)]
struct BlockContent<'a> {
    index: u64,
    timestamp: &'a str,
    nonce: u64,
    transactions: &'a [Transaction],
    previous_hash: &'a str,
}

impl Block {
    /// Create the genesis block (first block in the chain), mined like any
    /// other block over its own content.
    pub fn genesis(difficulty: u32) -> Self {
        let mut block = Self::new(1, String::from("0"), Vec::new());
        block.mine(difficulty);
        block
    }

    /// Create a new block (not mined yet). Call `mine()` to perform PoW.
    pub fn new(index: u64, previous_hash: String, transactions: Vec<Transaction>) -> Self {
        let mut block = Self {
            index,
            timestamp: Utc::now().to_rfc3339(),
            nonce: 0,
            transactions,
            previous_hash,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Compute the SHA-256 hash of this block's content, `hash` field
    /// excluded. The content is serialized as key-sorted JSON (serde_json
    /// object maps are ordered by key), so structurally equal blocks hash
    /// identically regardless of field declaration order.
    pub fn compute_hash(&self) -> String {
        let content = BlockContent {
            index: self.index,
            timestamp: &self.timestamp,
            nonce: self.nonce,
            transactions: &self.transactions,
            previous_hash: &self.previous_hash,
        };
        let canonical = serde_json::to_value(&content).expect("serialize block content");
        let mut hasher = Sha256::new();
        hasher.update(canonical.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Perform Proof-of-Work: probe nonces sequentially from the current
    /// value until the content hash starts with `difficulty` leading zeros
    /// (in hex), then cache that hash.
    pub fn mine(&mut self, difficulty: u32) {
        let target_prefix = "0".repeat(difficulty as usize);
        loop {
            self.hash = self.compute_hash();
            if self.hash.starts_with(&target_prefix) {
                break;
            }
            self.nonce = self.nonce.wrapping_add(1);
        }
    }

    /// Validate that the block's cached `hash` matches its content and
    /// satisfies the PoW difficulty. (Does NOT validate chain linkage.)
    pub fn is_valid(&self, difficulty: u32) -> bool {
        let expected = self.compute_hash();
        if self.hash != expected {
            return false;
        }
        self.hash
            .chars()
            .take(difficulty as usize)
            .all(|c| c == '0')
    }
}

#[cfg(test)]
mod tests {
    use super::Block;
    use crate::transaction::Transaction;

    fn sample_txs() -> Vec<Transaction> {
        vec![
            Transaction::new("alice".to_string(), "bob".to_string(), 10.0),
            Transaction::new("bob".to_string(), "carol".to_string(), 2.5),
        ]
    }

    #[test]
    fn genesis_is_mined() {
        let b = Block::genesis(2);
        assert_eq!(b.index, 1);
        assert_eq!(b.previous_hash, "0");
        assert!(b.transactions.is_empty());
        assert!(b.hash.starts_with("00"));
        assert_eq!(b.hash, b.compute_hash());
    }

    #[test]
    fn mining_produces_leading_zeros() {
        let mut b = Block::new(2, "prev".into(), sample_txs());
        b.mine(2);
        assert!(b.hash.starts_with("00"));
        assert!(b.is_valid(2));
    }

    #[test]
    fn no_smaller_nonce_satisfies_the_prefix() {
        let mut b = Block::new(2, "prev".into(), sample_txs());
        b.mine(2);
        for nonce in 0..b.nonce {
            let mut probe = b.clone();
            probe.nonce = nonce;
            assert!(!probe.compute_hash().starts_with("00"));
        }
    }

    #[test]
    fn hash_field_is_not_part_of_the_preimage() {
        let mut b = Block::new(2, "prev".into(), sample_txs());
        b.mine(2);
        let sealed = b.compute_hash();
        b.hash = "tampered".into();
        assert_eq!(b.compute_hash(), sealed);
    }

    #[test]
    fn hash_is_deterministic() {
        let b = Block::new(3, "prev".into(), sample_txs());
        assert_eq!(b.compute_hash(), b.compute_hash());
    }

    #[test]
    fn invalid_when_nonce_mutated() {
        let mut b = Block::new(2, "prev".into(), sample_txs());
        b.mine(2);
        b.nonce += 1;
        assert!(!b.is_valid(2));
    }

    #[test]
    fn invalid_when_transaction_mutated() {
        let mut b = Block::new(2, "prev".into(), sample_txs());
        b.mine(2);
        b.transactions[0].amount = 999.0;
        assert!(!b.is_valid(2));
    }
}
