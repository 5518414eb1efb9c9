//! Weighted sampling without replacement.

use rand::seq::index;
use rand::Rng;

/// Number of records to draw for one weighted bucket.
///
/// `ceil(total * pct)` clamped to `[1, min(total, pool_size)]`. An empty pool
/// or a zero total draws nothing, so the lower bound of 1 never applies there.
pub fn sample_count(total: usize, pct: f64, pool_size: usize) -> usize {
    if pool_size == 0 || total == 0 {
        return 0;
    }

    let upper = total.min(pool_size);
    let raw = (total as f64 * pct).ceil();
    // NaN and negative products saturate to 0 and are lifted to the floor of 1
    let raw = if raw >= upper as f64 { upper } else { raw as usize };
    raw.clamp(1, upper)
}

/// Draw `n` distinct elements from `pool`.
///
/// Order follows the draw, not the pool. `n` is capped at the pool size.
pub fn sample<'a, T, R: Rng + ?Sized>(rng: &mut R, pool: &'a [T], n: usize) -> Vec<&'a T> {
    let amount = n.min(pool.len());
    if amount == 0 {
        return Vec::new();
    }

    index::sample(rng, pool.len(), amount)
        .into_iter()
        .map(|i| &pool[i])
        .collect()
}
