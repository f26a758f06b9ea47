//! Next-cell selection for the reveal grid.
//!
//! Pure with respect to persisted state: the revealed set and grid size are
//! explicit inputs, and the random source is injected so tests can seed it.
//! Production callers pass an entropy-seeded RNG; selection stays uniform
//! and unseeded by default.

use rand::Rng;

use crate::error::RevealError;

/// Pick the next cell to reveal, uniformly at random among the cells of
/// `{0..total_cells-1}` not present in `revealed`.
///
/// # Errors
/// Returns [`RevealError::Exhausted`] when every cell is already revealed.
/// The lifecycle manager never requests a reveal on a full grid, so this
/// surfaces a caller bug rather than a runtime condition.
pub fn next_cell(
    revealed: &[u32],
    total_cells: u32,
    rng: &mut impl Rng,
) -> Result<u32, RevealError> {
    let revealed_set: std::collections::HashSet<u32> = revealed.iter().copied().collect();
    let unrevealed: Vec<u32> = (0..total_cells)
        .filter(|i| !revealed_set.contains(i))
        .collect();
    if unrevealed.is_empty() {
        return Err(RevealError::Exhausted { total_cells });
    }
    Ok(unrevealed[rng.gen_range(0..unrevealed.len())])
}
