//! Discount computation shared by product creation and editing.

/// Clamps an offer percentage into `0..=100`. Non-finite input counts as no offer.
pub fn clamp_offer(offer: f64) -> f64 {
    if offer.is_finite() {
        offer.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Rounds to two decimal places, the precision the shop stores prices at.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Price after applying `offer` percent, rounded to cents.
///
/// The offer is clamped first; a non-finite result collapses to `0.0`.
pub fn discounted_price(price: f64, offer: f64) -> f64 {
    let offer = clamp_offer(offer);
    let discounted = if offer > 0.0 {
        price - price * (offer / 100.0)
    } else {
        price
    };

    if discounted.is_finite() {
        round_cents(discounted)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twenty_percent_off() {
        assert_eq!(discounted_price(1000.0, 20.0), 800.0);
    }

    #[test]
    fn test_zero_offer_keeps_price() {
        assert_eq!(discounted_price(99.99, 0.0), 99.99);
        for price in [0.0, 0.01, 12.5, 1999.99] {
            assert_eq!(discounted_price(price, 0.0), price);
        }
    }

    #[test]
    fn test_offer_is_clamped() {
        assert_eq!(discounted_price(250.0, -15.0), 250.0);
        assert_eq!(discounted_price(250.0, 150.0), 0.0);
        assert_eq!(clamp_offer(f64::NAN), 0.0);
        assert_eq!(clamp_offer(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_rounds_to_cents() {
        assert_eq!(discounted_price(10.0, 33.0), 6.7);
        assert_eq!(discounted_price(19.99, 15.0), 16.99);
    }

    #[test]
    fn test_matches_formula_across_offers() {
        let price = 349.99;
        for offer in 0..=100 {
            let offer = offer as f64;
            let expected = round_cents(price - price * (offer / 100.0));
            assert!((discounted_price(price, offer) - expected).abs() < 1e-9, "offer {offer}");
        }
    }

    #[test]
    fn test_non_finite_price_becomes_zero() {
        assert_eq!(discounted_price(f64::INFINITY, 10.0), 0.0);
        assert_eq!(discounted_price(f64::NAN, 0.0), 0.0);
    }
}
