//! Exhaustive enumeration of stop sets.
//!
//! With `m` candidates the first and last are always visited, leaving
//! `2^(m-2)` subsets of interior stations. Each subset is encoded as a bitmask
//! whose bit `k` selects candidate `k + 1`. The cost is exponential in `m`;
//! candidate reduction upstream is what keeps `m` small.

/// Largest number of interior candidates a `u64` mask can index.
pub const MAX_INTERIOR_CANDIDATES: usize = 63;

/// Iterator over every stop set of a candidate list.
///
/// Yields candidate indices in increasing order, always starting at `0` and
/// ending at `m - 1`. Masks are visited from `0` upwards, so the first stop
/// set is the direct hop and the last visits every candidate.
///
/// # Examples
/// ```
/// use roadfuel_solver_lp::StopCombinations;
///
/// let sets: Vec<Vec<usize>> = StopCombinations::new(4).unwrap().collect();
/// assert_eq!(
///     sets,
///     vec![vec![0, 3], vec![0, 1, 3], vec![0, 2, 3], vec![0, 1, 2, 3]]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct StopCombinations {
    candidates: usize,
    interior: u32,
    next: u64,
    end: u64,
}

impl StopCombinations {
    /// Enumerate stop sets for `candidates` stations.
    ///
    /// Fewer than two candidates yield nothing. Returns `None` when the
    /// interior exceeds [`MAX_INTERIOR_CANDIDATES`].
    #[must_use]
    pub fn new(candidates: usize) -> Option<Self> {
        let interior = candidates.saturating_sub(2);
        if interior > MAX_INTERIOR_CANDIDATES {
            return None;
        }
        let interior_bits = u32::try_from(interior).ok()?;
        let end = if candidates < 2 {
            0
        } else {
            1_u64.checked_shl(interior_bits)?
        };
        Some(Self {
            candidates,
            interior: interior_bits,
            next: 0,
            end,
        })
    }

    /// Total number of stop sets, including any already yielded.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.end
    }

    fn indices(&self, mask: u64) -> Vec<usize> {
        let mut stops = Vec::with_capacity(self.candidates);
        stops.push(0);
        stops.extend(
            (0..self.interior)
                .filter(|bit| (mask >> bit) & 1 == 1)
                .filter_map(|bit| usize::try_from(bit).ok())
                .map(|bit| bit + 1),
        );
        stops.push(self.candidates - 1);
        stops
    }
}

impl Iterator for StopCombinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let mask = self.next;
        self.next += 1;
        Some(self.indices(mask))
    }
}
