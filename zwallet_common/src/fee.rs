//! BitcoinTrade fiat transfer fee schedule: 0,99% + R$ 4,90.

/// Proportional part of the transfer fee.
pub const TRANSFER_FEE_RATE: f64 = 0.0099;
/// Flat surcharge added to every transfer, in BRL.
pub const TRANSFER_FEE_FLAT: f64 = 4.90;

/// Transfer fee charged for moving `amount` BRL.
///
/// No domain validation: zero and negative amounts are computed as-is.
pub fn compute_fee(amount: f64) -> f64 {
    amount * TRANSFER_FEE_RATE + TRANSFER_FEE_FLAT
}
