use crate::brief::Descriptor;

/// A query descriptor matched against a reference set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptorMatch {
    /// Index into the query set.
    pub query_idx: usize,
    /// Index of the best reference candidate.
    pub train_idx: usize,
    /// Hamming distance to the best candidate.
    pub distance: f32,
    /// Hamming distance to the second-best candidate.
    pub second_distance: f32,
}

/// Brute-force 2-nearest-neighbor matching from queries to references.
///
/// Every query with at least two reference candidates produces a match
/// carrying both neighbor distances, ready for the ratio test.
pub fn match_descriptors(queries: &[Descriptor], references: &[Descriptor]) -> Vec<DescriptorMatch> {
    if references.len() < 2 {
        return Vec::new();
    }

    queries
        .iter()
        .enumerate()
        .map(|(query_idx, query)| {
            let mut best_idx = 0usize;
            let mut best = u32::MAX;
            let mut second = u32::MAX;
            for (train_idx, reference) in references.iter().enumerate() {
                let d = query.distance(reference);
                if d < best {
                    second = best;
                    best = d;
                    best_idx = train_idx;
                } else if d < second {
                    second = d;
                }
            }
            DescriptorMatch {
                query_idx,
                train_idx: best_idx,
                distance: best as f32,
                second_distance: second as f32,
            }
        })
        .collect()
}

/// Lowe's ratio test: keep a match only when its best distance is
/// strictly below `ratio` times its second-best distance.
///
/// Ambiguous matches, where two reference descriptors explain the query
/// about equally well, are discarded. Ties at zero distance fail the
/// strict inequality and are dropped as well.
pub fn ratio_filter(matches: &[DescriptorMatch], ratio: f32) -> Vec<DescriptorMatch> {
    matches
        .iter()
        .filter(|m| m.distance < ratio * m.second_distance)
        .copied()
        .collect()
}
