//! Monetary types for price and volume representation.

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Volume represented as a Decimal for precision.
pub type Volume = Decimal;

/// Fallback taker fee per leg (0.1%) when a venue's fee schedule is
/// unavailable.
pub const DEFAULT_TAKER_FEE: Decimal = Decimal::from_parts(1, 0, 0, false, 3);
