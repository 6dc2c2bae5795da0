//! Per-network display settings for base-unit amounts.

/// How one network displays amounts of its staking denomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainConfig {
    /// Value of the transaction's `chain_id` field.
    pub chain_id: &'static str,
    /// Denomination amounts are expressed in on chain, e.g. `uatom`.
    pub base_denom: &'static str,
    /// Denomination shown to the user, e.g. `ATOM`.
    pub display_denom: &'static str,
    /// Number of decimal places between base and display units.
    pub decimals: u8,
    /// Fractional digits kept when trimming trailing zeros.
    pub min_decimals: u8,
}

/// The default network.
pub const COSMOS_HUB: ChainConfig = ChainConfig {
    chain_id: "cosmoshub-4",
    base_denom: "uatom",
    display_denom: "ATOM",
    decimals: 6,
    min_decimals: 1,
};

/// Built-in chain table.
pub static DEFAULT_CHAINS: [ChainConfig; 1] = [COSMOS_HUB];

/// Resolves a transaction's `chain_id` to its display settings.
pub trait ChainRegistry {
    /// Settings for `chain_id`, if the chain is known.
    fn lookup(&self, chain_id: &[u8]) -> Option<&ChainConfig>;
}

impl ChainRegistry for [ChainConfig] {
    fn lookup(&self, chain_id: &[u8]) -> Option<&ChainConfig> {
        self.iter().find(|c| c.chain_id.as_bytes() == chain_id)
    }
}

impl<const N: usize> ChainRegistry for [ChainConfig; N] {
    fn lookup(&self, chain_id: &[u8]) -> Option<&ChainConfig> {
        self.as_slice().lookup(chain_id)
    }
}
