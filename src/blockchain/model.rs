use super::Block;
use crate::network::NodeRegistry;
use crate::transaction::Transaction;

/// In-memory ledger aggregate: the chain, the pending transaction pool and
/// the set of known peers. One instance per process, guarded by a single
/// lock in the transport layer so mining commits and pool drains stay
/// atomic with respect to each other.
#[derive(Debug)]
pub struct Blockchain {
    pub chain: Vec<Block>,
    pub pending: Vec<Transaction>,
    pub nodes: NodeRegistry,
    difficulty: u32,
}

impl Blockchain {
    /// Initialize a new blockchain with a mined genesis block.
    pub fn new(difficulty: u32) -> Self {
        let mut bc = Self {
            chain: Vec::new(),
            pending: Vec::new(),
            nodes: NodeRegistry::new(),
            difficulty,
        };
        bc.chain.push(Block::genesis(difficulty));
        bc
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Buffer a transaction for the next mined block and return the index
    /// of the block it is expected to land in.
    pub fn add_transaction(&mut self, tx: Transaction) -> u64 {
        self.pending.push(tx);
        self.last_block().index + 1
    }

    /// Build an unmined block candidate from the current tip and pool: the
    /// reward transaction first, then every pending transaction. Returns
    /// the candidate and the number of pool entries it absorbed, so the
    /// commit can drain exactly those and nothing that arrived later.
    pub fn stage_block(&self, reward: Transaction) -> (Block, usize) {
        let mut transactions = Vec::with_capacity(1 + self.pending.len());
        transactions.push(reward);
        transactions.extend(self.pending.iter().cloned());

        let block = Block::new(
            self.last_block().index + 1,
            self.last_block().compute_hash(),
            transactions,
        );
        (block, self.pending.len())
    }

    /// Append a mined block and drain the pool entries it absorbed.
    ///
    /// Fails when the tip moved between `stage_block` and this call (the
    /// candidate links to a block that is no longer last); the caller is
    /// expected to re-stage and mine again.
    pub fn commit_block(&mut self, block: Block, taken: usize) -> Result<&Block, &'static str> {
        if block.previous_hash != self.last_block().compute_hash() {
            return Err("the chain advanced while the block was being mined");
        }
        self.pending.drain(..taken);
        self.chain.push(block);
        Ok(self.last_block())
    }

    /// Validate the entire local chain: linkage, hashes and PoW.
    pub fn is_valid_chain(&self) -> bool {
        check_valid_chain(&self.chain, self.difficulty)
    }
}

/// Determine whether a chain (local or fetched from a peer) is valid.
///
/// Genesis must be intact (index 1, `"0"` link, stored hash matching its
/// content); its own proof-of-work is trusted as-is. Every later block must
/// link to the recomputed content hash of its predecessor and carry a hash
/// that matches its content and the difficulty prefix.
pub fn check_valid_chain(chain: &[Block], difficulty: u32) -> bool {
    let Some(genesis) = chain.first() else {
        return false;
    };
    if genesis.index != 1 || genesis.previous_hash != "0" || genesis.hash != genesis.compute_hash()
    {
        return false;
    }

    for i in 1..chain.len() {
        let current = &chain[i];
        let prev = &chain[i - 1];

        // The link is the predecessor's recomputed content hash, not
        // whatever hash the predecessor claims for itself.
        if current.previous_hash != prev.compute_hash() {
            return false;
        }

        if !current.is_valid(difficulty) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::{Blockchain, check_valid_chain};
    use crate::transaction::Transaction;

    const TEST_DIFFICULTY: u32 = 2;

    fn reward() -> Transaction {
        Transaction::new("node".to_string(), "miner".to_string(), 1.0)
    }

    /// Snapshot, mine and commit exactly as the mining endpoint does.
    fn mine(bc: &mut Blockchain) {
        let (mut block, taken) = bc.stage_block(reward());
        block.mine(bc.difficulty());
        bc.commit_block(block, taken).expect("no concurrent writer");
    }

    #[test]
    fn sequential_appends_stay_valid() {
        let mut bc = Blockchain::new(TEST_DIFFICULTY);
        for _ in 0..3 {
            mine(&mut bc);
        }
        assert_eq!(bc.chain.len(), 4);
        assert!(bc.is_valid_chain());
    }

    #[test]
    fn add_transaction_reports_next_block_index() {
        let mut bc = Blockchain::new(TEST_DIFFICULTY);
        let index = bc.add_transaction(Transaction::new("alice".into(), "bob".into(), 5.0));
        assert_eq!(index, 2);

        mine(&mut bc);
        let index = bc.add_transaction(Transaction::new("bob".into(), "carol".into(), 1.0));
        assert_eq!(index, 3);
    }

    #[test]
    fn mined_block_absorbs_the_pool() {
        let mut bc = Blockchain::new(TEST_DIFFICULTY);
        bc.add_transaction(Transaction::new("alice".into(), "bob".into(), 5.0));
        mine(&mut bc);

        let block = bc.last_block();
        assert_eq!(block.index, 2);
        assert!(
            block
                .transactions
                .iter()
                .any(|t| t.sender == "alice" && t.amount == 5.0)
        );
        assert!(bc.pending.is_empty());
    }

    #[test]
    fn transactions_submitted_mid_mine_survive_the_commit() {
        let mut bc = Blockchain::new(TEST_DIFFICULTY);
        bc.add_transaction(Transaction::new("alice".into(), "bob".into(), 5.0));

        let (mut block, taken) = bc.stage_block(reward());
        block.mine(bc.difficulty());
        // Arrives while the nonce search is running.
        bc.add_transaction(Transaction::new("carol".into(), "dave".into(), 7.0));
        bc.commit_block(block, taken).expect("tip unchanged");

        assert_eq!(bc.pending.len(), 1);
        assert_eq!(bc.pending[0].sender, "carol");
        assert!(
            !bc.last_block()
                .transactions
                .iter()
                .any(|t| t.sender == "carol")
        );
    }

    #[test]
    fn commit_rejects_a_stale_snapshot() {
        let mut bc = Blockchain::new(TEST_DIFFICULTY);
        let (mut stale, taken) = bc.stage_block(reward());
        stale.mine(bc.difficulty());

        mine(&mut bc); // another mine lands first

        assert!(bc.commit_block(stale, taken).is_err());
        assert_eq!(bc.chain.len(), 2);
    }

    #[test]
    fn tampered_nonce_invalidates_the_chain() {
        let mut bc = Blockchain::new(TEST_DIFFICULTY);
        mine(&mut bc);
        bc.chain[1].nonce += 1;
        assert!(!bc.is_valid_chain());
    }

    #[test]
    fn tampered_link_invalidates_the_chain() {
        let mut bc = Blockchain::new(TEST_DIFFICULTY);
        mine(&mut bc);
        mine(&mut bc);
        bc.chain[2].previous_hash = "0".repeat(64);
        assert!(!bc.is_valid_chain());
    }

    #[test]
    fn tampered_transaction_invalidates_the_chain() {
        let mut bc = Blockchain::new(TEST_DIFFICULTY);
        bc.add_transaction(Transaction::new("alice".into(), "bob".into(), 5.0));
        mine(&mut bc);
        bc.chain[1].transactions[0].amount = 500.0;
        assert!(!bc.is_valid_chain());
    }

    #[test]
    fn tampered_genesis_is_detected() {
        let mut bc = Blockchain::new(TEST_DIFFICULTY);
        bc.chain[0].transactions.push(Transaction::new("eve".into(), "eve".into(), 1.0));
        assert!(!bc.is_valid_chain());
    }

    #[test]
    fn validation_is_idempotent() {
        let mut bc = Blockchain::new(TEST_DIFFICULTY);
        mine(&mut bc);
        assert!(bc.is_valid_chain());
        assert!(bc.is_valid_chain());
    }

    #[test]
    fn empty_chain_is_invalid() {
        assert!(!check_valid_chain(&[], TEST_DIFFICULTY));
    }
}
