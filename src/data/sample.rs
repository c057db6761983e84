//! Deterministic row sampling for the fallback current snapshot.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::snapshot::Snapshot;
use crate::error::{Error, Result};

/// Draw `size` rows (without replacement) from `pool` using a seeded RNG.
///
/// The same pool, size and seed always produce the same rows in the same order.
/// When `size` exceeds the pool, the whole pool is returned in shuffled order.
pub fn sample_rows(pool: &Snapshot, size: usize, seed: u64) -> Result<Snapshot> {
    if pool.n_rows() == 0 {
        return Err(Error::DataUnavailable("fallback pool is empty".to_string()));
    }
    let amount = size.min(pool.n_rows());
    let mut rng = StdRng::seed_from_u64(seed);
    let indices = rand::seq::index::sample(&mut rng, pool.n_rows(), amount).into_vec();
    pool.take_rows(&indices)
}
