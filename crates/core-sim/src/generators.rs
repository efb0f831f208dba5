use rand::Rng;

/// Moves `price` by a uniform fraction drawn from `[-volatility, +volatility]`,
/// floors it at `min_price` and rounds to cents.
pub fn step_price<R: Rng>(rng: &mut R, price: f64, volatility: f64, min_price: f64) -> f64 {
    let bound = if volatility.is_finite() { volatility.abs() } else { 0.0 };
    let change = rng.gen_range(-bound..=bound);
    let next = price * (1.0 + change);
    round_cents(next.max(min_price)).max(min_price)
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
