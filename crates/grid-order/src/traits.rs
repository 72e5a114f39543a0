//! `MakerTraits` bit packing.
//!
//! The protocol encodes order options into a single uint256:
//!
//! ```text
//! bit 255          NO_PARTIAL_FILLS (set = partial fills forbidden)
//! bit 254          ALLOW_MULTIPLE_FILLS
//! bits 160..200    series (unused here)
//! bits 120..160    nonce (uint40)
//! bits  80..120    expiration timestamp, unix seconds (uint40, 0 = none)
//! bits   0..80     allowed sender (0 = any)
//! ```

use alloy::primitives::U256;

/// Maximum value of the protocol's 40-bit nonce/expiration fields.
pub const UINT_40_MAX: u64 = (1 << 40) - 1;

const EXPIRATION_OFFSET: usize = 80;
const NONCE_OFFSET: usize = 120;

/// Packed maker options for a limit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MakerTraits(U256);

impl MakerTraits {
    fn no_partial_fills_flag() -> U256 {
        U256::ONE << 255
    }

    fn allow_multiple_fills_flag() -> U256 {
        U256::ONE << 254
    }

    fn uint40_mask(offset: usize) -> U256 {
        U256::from(UINT_40_MAX) << offset
    }

    /// All options off: partial fills allowed, single fill, no
    /// expiration, zero nonce.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconstruct from a raw uint256 (e.g. a serialized order).
    pub fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> U256 {
        self.0
    }

    /// Set the expiration timestamp (unix seconds, truncated to 40 bits).
    #[must_use]
    pub fn with_expiration(self, unix_seconds: u64) -> Self {
        let cleared = self.0 & !Self::uint40_mask(EXPIRATION_OFFSET);
        Self(cleared | (U256::from(unix_seconds & UINT_40_MAX) << EXPIRATION_OFFSET))
    }

    /// Set the order nonce (truncated to 40 bits).
    #[must_use]
    pub fn with_nonce(self, nonce: u64) -> Self {
        let cleared = self.0 & !Self::uint40_mask(NONCE_OFFSET);
        Self(cleared | (U256::from(nonce & UINT_40_MAX) << NONCE_OFFSET))
    }

    /// Allow the order to be filled in parts across several takers.
    #[must_use]
    pub fn allow_partial_fills(self) -> Self {
        Self(self.0 & !Self::no_partial_fills_flag())
    }

    /// Allow the order to be filled more than once.
    #[must_use]
    pub fn allow_multiple_fills(self) -> Self {
        Self(self.0 | Self::allow_multiple_fills_flag())
    }

    pub fn expiration(&self) -> u64 {
        ((self.0 >> EXPIRATION_OFFSET) & U256::from(UINT_40_MAX)).to::<u64>()
    }

    pub fn nonce(&self) -> u64 {
        ((self.0 >> NONCE_OFFSET) & U256::from(UINT_40_MAX)).to::<u64>()
    }

    pub fn partial_fills_allowed(&self) -> bool {
        self.0 & Self::no_partial_fills_flag() == U256::ZERO
    }

    pub fn multiple_fills_allowed(&self) -> bool {
        self.0 & Self::allow_multiple_fills_flag() != U256::ZERO
    }
}
