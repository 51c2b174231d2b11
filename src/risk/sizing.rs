use crate::error::BotError;

/// Calculate an order quantity from balance, risk tolerance and stop distance
///
/// `quantity = max(0, balance * risk_fraction / (stop_distance * price))`
///
/// `stop_distance` is the absolute price distance to the stop, typically
/// `price * stop_loss_fraction`. A zero or negative balance yields quantity
/// 0: no capital to risk is a valid state, not an error.
///
/// # Errors
/// `InvalidInput` if `price` or `stop_distance` is not positive.
pub fn position_size(
    balance: f64,
    risk_fraction: f64,
    price: f64,
    stop_distance: f64,
) -> crate::Result<f64> {
    if !(price > 0.0) {
        return Err(BotError::InvalidInput(format!(
            "price must be positive, got {price}"
        )));
    }
    if !(stop_distance > 0.0) {
        return Err(BotError::InvalidInput(format!(
            "stop distance must be positive, got {stop_distance}"
        )));
    }

    let risk_amount = balance * risk_fraction;
    Ok((risk_amount / (stop_distance * price)).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_sizing() {
        // balance 10000, risk 1%, price 50000, stop 10% of price
        let quantity = position_size(10_000.0, 0.01, 50_000.0, 5_000.0).unwrap();
        assert!((quantity - 4e-7).abs() < 1e-15);
    }

    #[test]
    fn test_zero_balance_yields_zero() {
        assert_eq!(position_size(0.0, 0.01, 100.0, 10.0).unwrap(), 0.0);
    }

    #[test]
    fn test_negative_balance_clamped_to_zero() {
        assert_eq!(position_size(-500.0, 0.01, 100.0, 10.0).unwrap(), 0.0);
    }

    #[test]
    fn test_monotone_in_balance() {
        let mut previous = 0.0;
        for balance in [0.0, 100.0, 1_000.0, 10_000.0, 100_000.0] {
            let quantity = position_size(balance, 0.02, 250.0, 25.0).unwrap();
            assert!(quantity >= previous);
            previous = quantity;
        }
    }

    #[test]
    fn test_never_negative() {
        for balance in [-1_000.0, 0.0, 1.0, 1e9] {
            let quantity = position_size(balance, 1.0, 0.0001, 0.0001).unwrap();
            assert!(quantity >= 0.0);
        }
    }

    #[test]
    fn test_rejects_non_positive_price() {
        assert!(position_size(1_000.0, 0.01, 0.0, 10.0).is_err());
        assert!(position_size(1_000.0, 0.01, -5.0, 10.0).is_err());
    }

    #[test]
    fn test_rejects_non_positive_stop_distance() {
        assert!(position_size(1_000.0, 0.01, 100.0, 0.0).is_err());
        assert!(position_size(1_000.0, 0.01, 100.0, -1.0).is_err());
    }
}
