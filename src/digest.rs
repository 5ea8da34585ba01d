//! Merkle digest of a month's thread tree.
//!
//! Each entry is fingerprinted over its `(id, subject, author)` projection,
//! and a binary Merkle tree over the depth-first leaf order yields a single
//! root hash for the month. Any edit to any message's identity changes the
//! root; the per-entry hashes allow cheap sub-tree comparison.

use sha2::{Digest, Sha256};
use std::fmt::Write as _;

pub const HASH_LEN: usize = 32;

pub type Hash = [u8; HASH_LEN];

/// One archived message in a thread tree. Replies are owned; the tree has no
/// back-edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadEntry {
    pub id: String,
    pub subject: String,
    pub author: String,
    /// Root entries sit at depth 0; a reply is one deeper than its parent.
    pub depth: usize,
    pub replies: Vec<ThreadEntry>,
    pub content_hash: Hash,
}

impl ThreadEntry {
    pub fn new(id: impl Into<String>, subject: impl Into<String>, author: impl Into<String>) -> Self {
        let (id, subject, author) = (id.into(), subject.into(), author.into());
        let content_hash = content_hash(&id, &subject, &author);
        Self {
            id,
            subject,
            author,
            depth: 0,
            replies: Vec::new(),
            content_hash,
        }
    }

    pub fn with_replies(mut self, replies: Vec<ThreadEntry>) -> Self {
        self.replies = replies;
        self
    }

    fn assign_depths(&mut self, depth: usize) {
        self.depth = depth;
        for reply in &mut self.replies {
            reply.assign_depths(depth + 1);
        }
    }

    fn collect_leaves(&self, leaves: &mut Vec<Hash>) {
        leaves.push(self.content_hash);
        for reply in &self.replies {
            reply.collect_leaves(leaves);
        }
    }

    fn count(&self) -> usize {
        1 + self.replies.iter().map(ThreadEntry::count).sum::<usize>()
    }
}

/// A month's worth of threads with its Merkle root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadTree {
    pub list: String,
    pub year_month: String,
    pub roots: Vec<ThreadEntry>,
    pub merkle_root: Hash,
    pub total_messages: usize,
}

impl ThreadTree {
    /// Assemble the tree: assign depths, collect leaf hashes depth-first and
    /// build the Merkle root.
    pub fn build(list: impl Into<String>, year_month: impl Into<String>, mut roots: Vec<ThreadEntry>) -> Self {
        for root in &mut roots {
            root.assign_depths(0);
        }
        let mut leaves = Vec::new();
        for root in &roots {
            root.collect_leaves(&mut leaves);
        }
        let total_messages = roots.iter().map(ThreadEntry::count).sum();
        Self {
            list: list.into(),
            year_month: year_month.into(),
            merkle_root: merkle_root(&leaves),
            roots,
            total_messages,
        }
    }

    /// Lowercase hex form of the root, as used in logs and the UI.
    pub fn merkle_root_hex(&self) -> String {
        to_hex(&self.merkle_root)
    }
}

/// `SHA-256(id || subject || author)` over the UTF-8 bytes, no separators.
pub fn content_hash(id: &str, subject: &str, author: &str) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(id.as_bytes());
    hasher.update(subject.as_bytes());
    hasher.update(author.as_bytes());
    hasher.finalize().into()
}

/// Root of a binary Merkle tree over ordered leaves.
///
/// No leaves hashes to all zeroes; a single leaf is its own root; otherwise
/// the leaf list is split in half and the halves' roots are hashed pairwise.
pub fn merkle_root(leaves: &[Hash]) -> Hash {
    match leaves.len() {
        0 => [0u8; HASH_LEN],
        1 => leaves[0],
        n => {
            let (left, right) = leaves.split_at(n / 2);
            let mut hasher = Sha256::new();
            hasher.update(merkle_root(left));
            hasher.update(merkle_root(right));
            hasher.finalize().into()
        }
    }
}

/// Lowercase hex, two digits per byte, no separators.
pub fn to_hex(hash: &Hash) -> String {
    hash.iter().fold(String::with_capacity(HASH_LEN * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}
