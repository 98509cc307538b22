//! ETH and wei conversion
//!
//! Amounts arrive from agents as floating point ETH values. Multiplying the
//! float by 10^18 would carry binary rounding noise into the wei amount, so
//! the conversion works on the shortest decimal rendering of the float
//! instead: `0.1` becomes exactly `100000000000000000` wei. Digits past the
//! 18th decimal place are dropped, which truncates toward zero.

use alloy_primitives::U256;

use crate::error::{Error, Result};

/// Number of decimal places between ETH and wei
pub const ETH_DECIMALS: usize = 18;

/// Convert an ETH amount to wei, truncating anything below one wei.
///
/// Zero is accepted. Negative and non-finite amounts are rejected because
/// wei values are unsigned on chain.
pub fn eth_to_wei(eth: f64) -> Result<U256> {
    if !eth.is_finite() {
        return Err(Error::InvalidAmount(format!(
            "{} is not a finite ETH amount",
            eth
        )));
    }
    if eth < 0.0 {
        return Err(Error::InvalidAmount(format!("{} ETH is negative", eth)));
    }
    if eth == 0.0 {
        return Ok(U256::ZERO);
    }

    // f64 Display never uses exponent notation
    let rendered = eth.to_string();
    let (whole, fraction) = rendered
        .split_once('.')
        .unwrap_or((rendered.as_str(), ""));
    let kept = &fraction[..fraction.len().min(ETH_DECIMALS)];

    let mut digits = String::with_capacity(whole.len() + ETH_DECIMALS);
    digits.push_str(whole);
    digits.push_str(kept);
    digits.extend(std::iter::repeat('0').take(ETH_DECIMALS - kept.len()));

    U256::from_str_radix(&digits, 10).map_err(|e| {
        Error::InvalidAmount(format!("{} ETH does not fit in a uint256: {}", eth, e))
    })
}

/// Render a wei amount as a decimal ETH string without trailing zeros
pub fn wei_to_eth_string(wei: U256) -> String {
    let digits = wei.to_string();
    let padded = if digits.len() <= ETH_DECIMALS {
        format!("{:0>width$}", digits, width = ETH_DECIMALS + 1)
    } else {
        digits
    };

    let (whole, fraction) = padded.split_at(padded.len() - ETH_DECIMALS);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wei(s: &str) -> U256 {
        U256::from_str_radix(s, 10).unwrap()
    }

    #[test]
    fn test_common_amounts_are_exact() {
        assert_eq!(eth_to_wei(0.1).unwrap(), wei("100000000000000000"));
        assert_eq!(eth_to_wei(0.5).unwrap(), wei("500000000000000000"));
        assert_eq!(eth_to_wei(0.3).unwrap(), wei("300000000000000000"));
        assert_eq!(eth_to_wei(1.0).unwrap(), wei("1000000000000000000"));
        assert_eq!(eth_to_wei(2.25).unwrap(), wei("2250000000000000000"));
        assert_eq!(eth_to_wei(123.456789).unwrap(), wei("123456789000000000000"));
    }

    #[test]
    fn test_sub_wei_digits_truncate() {
        assert_eq!(eth_to_wei(1e-18).unwrap(), U256::from(1u64));
        assert_eq!(eth_to_wei(1e-19).unwrap(), U256::ZERO);
        assert_eq!(eth_to_wei(1.5e-18).unwrap(), U256::from(1u64));
    }

    #[test]
    fn test_zero_and_rejections() {
        assert_eq!(eth_to_wei(0.0).unwrap(), U256::ZERO);
        assert_eq!(eth_to_wei(-0.0).unwrap(), U256::ZERO);
        assert!(matches!(eth_to_wei(-0.1), Err(Error::InvalidAmount(_))));
        assert!(matches!(eth_to_wei(f64::NAN), Err(Error::InvalidAmount(_))));
        assert!(matches!(
            eth_to_wei(f64::INFINITY),
            Err(Error::InvalidAmount(_))
        ));
        assert!(matches!(eth_to_wei(1e300), Err(Error::InvalidAmount(_))));
    }

    #[test]
    fn test_wei_to_eth_string() {
        assert_eq!(wei_to_eth_string(wei("100000000000000000")), "0.1");
        assert_eq!(wei_to_eth_string(wei("1000000000000000000")), "1");
        assert_eq!(wei_to_eth_string(wei("1")), "0.000000000000000001");
        assert_eq!(wei_to_eth_string(U256::ZERO), "0");
        assert_eq!(wei_to_eth_string(wei("123456789000000000000")), "123.456789");
    }
}
