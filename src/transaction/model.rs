use serde::{Deserialize, Serialize};

/// A transfer of value between two named parties.
///
/// A transaction sits in the pending pool until a block absorbs it; from
/// that point on the block owns its own copy and the record never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(sender: String, recipient: String, amount: f64) -> Self {
        Self {
            sender,
            recipient,
            amount,
        }
    }
}
