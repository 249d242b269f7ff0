use rand::Rng;

/// Picks an index holding the maximum of `tally`, uniformly at random among
/// all such indices.
///
/// Returns `None` when the tally is empty or every entry is zero (nobody
/// voted). An all-zero tally is deliberately not treated as every index
/// tying at zero.
pub fn random_max_index<R: Rng + ?Sized>(tally: &[u32], rng: &mut R) -> Option<usize> {
    let max = tally.iter().copied().max().filter(|&m| m > 0)?;

    // Reservoir sampling over the tied indices: the k-th tie replaces the
    // pick with probability 1/k.
    let mut pick = None;
    let mut seen = 0u32;
    for (i, &count) in tally.iter().enumerate() {
        if count == max {
            seen += 1;
            if rng.random_range(0..seen) == 0 {
                pick = Some(i);
            }
        }
    }
    pick
}
