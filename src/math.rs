// src/math.rs
//! Quote calculation: amount scaling across asset precisions and the
//! slippage-bounded minimum output. Pure functions, no I/O.

use crate::error::SwapError;

/// SOL precision (lamports per SOL).
pub const SOL_DECIMALS: u8 = 9;
/// Target token precision, fixed for the configured mint.
pub const TARGET_DECIMALS: u8 = 6;
/// Slippage tolerance applied when the CLI omits one.
pub const DEFAULT_SLIPPAGE: f64 = 0.005;

/// A single swap intent: size, direction, and slippage tolerance.
#[derive(Debug, Clone, Copy)]
pub struct SwapRequest {
    /// Whole units of the input asset (SOL when buying, tokens when selling).
    pub amount_in: f64,
    /// true = spend SOL for the target token, false = sell the target token.
    pub is_buy: bool,
    /// Fraction in [0, 1).
    pub slippage: f64,
}

impl SwapRequest {
    pub fn new(amount_in: f64, is_buy: bool, slippage: f64) -> Result<Self, SwapError> {
        if amount_in <= 0.0 {
            return Err(SwapError::InvalidAmount(amount_in));
        }
        if !(0.0..1.0).contains(&slippage) {
            return Err(SwapError::InvalidSlippage(slippage));
        }
        Ok(Self { amount_in, is_buy, slippage })
    }

    pub fn decimals_in(&self) -> u8 {
        if self.is_buy { SOL_DECIMALS } else { TARGET_DECIMALS }
    }

    pub fn decimals_out(&self) -> u8 {
        if self.is_buy { TARGET_DECIMALS } else { SOL_DECIMALS }
    }
}

/// Scaled amounts ready for instruction encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapAmounts {
    /// Input amount in smallest units of the input asset.
    pub amount_in: u64,
    /// Minimum acceptable output in smallest units of the output asset.
    /// Zero means no floor protection, which is permitted.
    pub min_amount_out: u64,
    /// Output units per input unit for this direction.
    pub effective_price: f64,
    /// Expected output in whole units of the output asset.
    pub expected_out: f64,
}

/// Computes scaled input and minimum output for a request against a fresh
/// pool price (target-token units per SOL).
pub fn compute_amounts(request: &SwapRequest, pool_price: f64) -> Result<SwapAmounts, SwapError> {
    if request.amount_in <= 0.0 {
        return Err(SwapError::InvalidAmount(request.amount_in));
    }

    let scaled = (request.amount_in * 10f64.powi(request.decimals_in() as i32)).floor();
    if scaled <= 0.0 {
        return Err(SwapError::InvalidAmount(request.amount_in));
    }

    let effective_price = if request.is_buy { pool_price } else { 1.0 / pool_price };
    let expected_out = request.amount_in * effective_price;
    let min_out_raw = (expected_out * (1.0 - request.slippage)).max(0.0);
    let min_amount_out = (min_out_raw * 10f64.powi(request.decimals_out() as i32)).floor() as u64;

    Ok(SwapAmounts {
        amount_in: scaled as u64,
        min_amount_out,
        effective_price,
        expected_out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buy(amount: f64, slippage: f64) -> SwapRequest {
        SwapRequest::new(amount, true, slippage).unwrap()
    }

    fn sell(amount: f64, slippage: f64) -> SwapRequest {
        SwapRequest::new(amount, false, slippage).unwrap()
    }

    #[test]
    fn test_buy_scaling_and_min_out() {
        // 0.01 SOL at 1000 tokens/SOL, 0.5% slippage
        let amounts = compute_amounts(&buy(0.01, 0.005), 1000.0).unwrap();
        assert_eq!(amounts.amount_in, 10_000_000);
        assert_eq!(amounts.min_amount_out, 9_950_000);
        assert!((amounts.expected_out - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_sell_scaling_and_min_out() {
        // 100 tokens at 1000 tokens/SOL, effective price 0.001 SOL/token
        let amounts = compute_amounts(&sell(100.0, 0.005), 1000.0).unwrap();
        assert_eq!(amounts.amount_in, 100_000_000);
        assert_eq!(amounts.min_amount_out, 99_500_000);
        assert!((amounts.effective_price - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        assert!(matches!(
            SwapRequest::new(0.0, true, 0.005),
            Err(SwapError::InvalidAmount(_))
        ));
        assert!(matches!(
            SwapRequest::new(-1.5, false, 0.005),
            Err(SwapError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_amount_scaling_to_zero_rejected() {
        // 1e-10 SOL scales below one lamport
        let request = buy(1e-10, 0.005);
        assert!(matches!(
            compute_amounts(&request, 1000.0),
            Err(SwapError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_slippage_out_of_range_rejected() {
        assert!(matches!(
            SwapRequest::new(1.0, true, 1.0),
            Err(SwapError::InvalidSlippage(_))
        ));
        assert!(matches!(
            SwapRequest::new(1.0, true, -0.01),
            Err(SwapError::InvalidSlippage(_))
        ));
    }

    #[test]
    fn test_min_out_monotone_in_slippage() {
        let mut previous = u64::MAX;
        for slippage in [0.0, 0.001, 0.005, 0.01, 0.05, 0.25, 0.5, 0.9, 0.999] {
            let amounts = compute_amounts(&buy(0.01, slippage), 1000.0).unwrap();
            assert!(amounts.min_amount_out <= previous, "slippage {}", slippage);
            previous = amounts.min_amount_out;
        }
    }

    #[test]
    fn test_zero_min_out_is_permitted() {
        // Expected output too small to reach one smallest unit: no floor
        // protection, but still a valid quote.
        let amounts = compute_amounts(&buy(0.01, 0.005), 0.00001).unwrap();
        assert_eq!(amounts.min_amount_out, 0);
        assert!(amounts.amount_in > 0);
    }
}
