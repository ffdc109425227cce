//! Core domain model shared by every component of the bridge: the swap record,
//! its status DAG, signature records, checkpoints, and the token map.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Direction of a cross-chain operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Lock on chain A, mint on chain B.
    AToB,
    /// Burn on chain B, release on chain A.
    BToA,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::AToB => write!(f, "a_to_b"),
            Direction::BToA => write!(f, "b_to_a"),
        }
    }
}

/// Status of a swap record. Transitions are a DAG: `OBSERVED -> SIGNED -> SUBMITTED ->
/// CONFIRMED`, with `FAILED` reachable from any non-terminal status. No regress is
/// otherwise permitted — see [`SwapStatus::can_transition_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapStatus {
    Observed,
    Signed,
    Submitted,
    Confirmed,
    Failed,
}

impl SwapStatus {
    /// Whether a transition from `self` to `next` is permitted by the status DAG.
    pub fn can_transition_to(self, next: SwapStatus) -> bool {
        use SwapStatus::*;
        match (self, next) {
            (Observed, Signed) | (Observed, Submitted) => true,
            (Signed, Submitted) => true,
            (Submitted, Confirmed) => true,
            (Observed, Failed) | (Signed, Failed) | (Submitted, Failed) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SwapStatus::Confirmed | SwapStatus::Failed)
    }
}

/// A token address on chain A, or the sentinel for the chain's native coin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainAToken {
    Native,
    Erc20(String),
}

/// Opaque identifier for a token on chain B (the confidential token contract address).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainBToken(pub String);

/// Unique identifier of a swap record: `{direction-prefix}:{nonce}`, e.g. `A:7` or `B:4`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapId(pub String);

impl SwapId {
    pub fn new(direction: Direction, nonce: u64) -> Self {
        let prefix = match direction {
            Direction::AToB => "A",
            Direction::BToA => "B",
        };
        SwapId(format!("{prefix}:{nonce}"))
    }
}

impl fmt::Display for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single cross-chain operation in flight.
///
/// Invariants (enforced by `bridge-store`, not by this type alone):
/// `(direction, nonce)` is unique; `status` only moves forward per
/// [`SwapStatus::can_transition_to`]; `unsigned_tx`, `amount`, `destination`, and
/// `token` are immutable once set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swap {
    pub id: SwapId,
    pub direction: Direction,
    pub nonce: u64,
    pub source_tx: String,
    pub amount: u128,
    pub destination: String,
    pub token: String,
    /// For B→A: the serialized A-side release transaction awaiting multi-signature.
    /// Empty for A→B.
    pub unsigned_tx: Vec<u8>,
    pub status: SwapStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One signer's partial signature over a swap's `unsigned_tx`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureRecord {
    pub swap_id: SwapId,
    pub signer_identity: String,
    pub signed_payload: Vec<u8>,
}

/// Per-signer, per-direction durable cursor. Must never decrease across restarts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Checkpoint {
    pub signer_identity_hash: u64,
    pub direction: Direction,
    /// Last fully-processed A block (A→B direction) or B burn nonce (B→A direction).
    pub cursor: u64,
}

/// A single token bijection entry: one chain-A token maps to one chain-B token, and
/// the reverse map is tracked disjointly (see [`TokenMap`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenMapEntry {
    pub chain_a: ChainAToken,
    pub chain_b: ChainBToken,
}

/// Process-wide immutable token bijection, loaded once at startup.
///
/// The A→B and B→A directions are modeled as two disjoint maps rather than one
/// bidirectional map, per the redesign in `SPEC_FULL.md` §9: the original source
/// conflated the two directions in places, which this type makes structurally
/// impossible.
#[derive(Debug, Clone, Default)]
pub struct TokenMap {
    /// chain-A token identifier (lowercased address, or "native") -> chain-B token.
    a_to_b: HashMap<String, ChainBToken>,
    /// chain-B token identifier -> chain-A token.
    b_to_a: HashMap<String, ChainAToken>,
}

impl TokenMap {
    pub fn new(entries: impl IntoIterator<Item = TokenMapEntry>) -> Self {
        let mut a_to_b = HashMap::new();
        let mut b_to_a = HashMap::new();
        for entry in entries {
            let a_key = match &entry.chain_a {
                ChainAToken::Native => "native".to_string(),
                ChainAToken::Erc20(addr) => addr.to_lowercase(),
            };
            b_to_a.insert(entry.chain_b.0.clone(), entry.chain_a.clone());
            a_to_b.insert(a_key, entry.chain_b);
        }
        TokenMap { a_to_b, b_to_a }
    }

    /// Resolve a chain-A token to its chain-B counterpart.
    pub fn resolve_a_to_b(&self, token: &ChainAToken) -> Option<&ChainBToken> {
        let key = match token {
            ChainAToken::Native => "native".to_string(),
            ChainAToken::Erc20(addr) => addr.to_lowercase(),
        };
        self.a_to_b.get(&key)
    }

    /// Resolve a chain-B token to its chain-A counterpart.
    pub fn resolve_b_to_a(&self, token: &ChainBToken) -> Option<&ChainAToken> {
        self.b_to_a.get(&token.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_dag_forbids_regress() {
        assert!(SwapStatus::Observed.can_transition_to(SwapStatus::Signed));
        assert!(SwapStatus::Signed.can_transition_to(SwapStatus::Submitted));
        assert!(SwapStatus::Submitted.can_transition_to(SwapStatus::Confirmed));
        assert!(!SwapStatus::Submitted.can_transition_to(SwapStatus::Observed));
        assert!(!SwapStatus::Confirmed.can_transition_to(SwapStatus::Submitted));
        assert!(!SwapStatus::Failed.can_transition_to(SwapStatus::Observed));
    }

    #[test]
    fn failed_reachable_from_any_nonterminal() {
        assert!(SwapStatus::Observed.can_transition_to(SwapStatus::Failed));
        assert!(SwapStatus::Signed.can_transition_to(SwapStatus::Failed));
        assert!(SwapStatus::Submitted.can_transition_to(SwapStatus::Failed));
    }

    #[test]
    fn token_map_directions_are_disjoint_lookups() {
        let map = TokenMap::new([
            TokenMapEntry {
                chain_a: ChainAToken::Native,
                chain_b: ChainBToken("secret1native".into()),
            },
            TokenMapEntry {
                chain_a: ChainAToken::Erc20("0xAbCd".into()),
                chain_b: ChainBToken("secret1wrapped".into()),
            },
        ]);
        assert_eq!(
            map.resolve_a_to_b(&ChainAToken::Erc20("0xabcd".into())),
            Some(&ChainBToken("secret1wrapped".into()))
        );
        assert_eq!(
            map.resolve_b_to_a(&ChainBToken("secret1native".into())),
            Some(&ChainAToken::Native)
        );
        assert_eq!(map.resolve_b_to_a(&ChainBToken("unknown".into())), None);
    }

    #[test]
    fn swap_id_formats_by_direction() {
        assert_eq!(SwapId::new(Direction::AToB, 7).to_string(), "A:7");
        assert_eq!(SwapId::new(Direction::BToA, 4).to_string(), "B:4");
    }
}
