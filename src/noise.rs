//! random draw helpers shared by the models
//!
//! all helpers take the caller's `Rng` so a seeded run reproduces exactly.

use rand::Rng;

/// uniform draw in `[min, max)`
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    rng.gen_range(min..max)
}

/// `value` moved by up to ±`pct` percent of itself
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, value: f64, pct: f64) -> f64 {
    let variation = value * (pct / 100.0);
    value + rng.gen_range(-1.0..1.0) * variation
}

/// `weight * current + (1 - weight) * previous`, or `current` when there is no previous
pub fn blend(current: f64, previous: Option<f64>, weight: f64) -> f64 {
    match previous {
        Some(prev) => weight * current + (1.0 - weight) * prev,
        None => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_jitter_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = jitter(&mut rng, 100.0, 10.0);
            assert!((90.0..=110.0).contains(&v));
        }
    }

    #[test]
    fn test_blend() {
        assert_eq!(blend(10.0, None, 0.8), 10.0);
        assert!((blend(10.0, Some(20.0), 0.8) - 12.0).abs() < 1e-9);
    }
}
