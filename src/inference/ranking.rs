use std::cmp::Ordering;

/// Class indices ordered by descending score.
///
/// The sort is stable, so equal scores stay in ascending index order.
/// Callers must reject non-finite scores first.
pub fn rank_indices(scores: &[f32]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
    });
    indices
}

pub fn top_k_indices(scores: &[f32], k: usize) -> Vec<usize> {
    let mut ranked = rank_indices(scores);
    ranked.truncate(k);
    ranked
}

/// Index of the highest score, lowest index on ties.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    rank_indices(scores).first().copied()
}
