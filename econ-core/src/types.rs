use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use tsify_next::Tsify;

// ============================================================================
// IDs - Using slotmap for generational indices
// ============================================================================

new_key_type! {
    pub struct FirmId;
    pub struct HouseholdId;
}

/// Trait for converting SlotMap keys to u64 for WASM boundary
pub trait KeyToU64 {
    fn to_u64(self) -> u64;
}

impl KeyToU64 for FirmId {
    fn to_u64(self) -> u64 {
        self.0.as_ffi()
    }
}

impl KeyToU64 for HouseholdId {
    fn to_u64(self) -> u64 {
        self.0.as_ffi()
    }
}

// ============================================================================
// Units of account
// ============================================================================

/// Monetary units. Whole units only; firm liquidity may dip below zero for the
/// job guarantee, which runs a deficit.
pub type Money = i64;

/// Units of the single consumption good.
pub type Units = i64;

// ============================================================================
// Firm kind
// ============================================================================

/// Firms and the job guarantee share one registry and one scheduling path.
/// The kind decides which decision rules run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Tsify)]
pub enum FirmKind {
    /// Profit-seeking firm that adapts wage, price and workforce.
    Market,
    /// Fixed-wage employer of last resort.
    JobGuarantee,
}
