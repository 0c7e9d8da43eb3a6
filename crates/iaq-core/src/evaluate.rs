//! Held-out metrics. Undefined metrics are `None`, never a placeholder.

use iaq_math::average_ranks;

/// Mean absolute error; `None` for an empty partition.
pub fn mean_absolute_error(predicted: &[f64], actual: &[f64]) -> Option<f64> {
    if predicted.is_empty() || predicted.len() != actual.len() {
        return None;
    }
    let total: f64 = predicted.iter().zip(actual).map(|(p, a)| (p - a).abs()).sum();
    Some(total / predicted.len() as f64)
}

/// Area under the ROC curve via the rank-sum (Mann-Whitney U) statistic,
/// with tied scores sharing their average rank.
///
/// `None` when either class is absent.
pub fn roc_auc(scores: &[f64], labels: &[bool]) -> Option<f64> {
    if scores.len() != labels.len() {
        return None;
    }
    let n_pos = labels.iter().filter(|&&l| l).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }
    let ranks = average_ranks(scores);
    let pos_rank_sum: f64 = ranks
        .iter()
        .zip(labels)
        .filter(|(_, &l)| l)
        .map(|(r, _)| r)
        .sum();
    let (n_pos, n_neg) = (n_pos as f64, n_neg as f64);
    let u = pos_rank_sum - n_pos * (n_pos + 1.0) / 2.0;
    Some(u / (n_pos * n_neg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mae_basic() {
        assert_eq!(mean_absolute_error(&[1.0, 2.0, 4.0], &[2.0, 2.0, 1.0]), Some(4.0 / 3.0));
        assert_eq!(mean_absolute_error(&[], &[]), None);
    }

    #[test]
    fn auc_perfect_and_inverted() {
        let labels = [false, false, true, true];
        assert_eq!(roc_auc(&[0.1, 0.2, 0.8, 0.9], &labels), Some(1.0));
        assert_eq!(roc_auc(&[0.9, 0.8, 0.2, 0.1], &labels), Some(0.0));
    }

    #[test]
    fn auc_with_ties_counts_half() {
        // One positive tied with one negative, the other positive above both.
        let auc = roc_auc(&[0.5, 0.5, 0.9], &[false, true, true]).unwrap();
        assert!((auc - 0.75).abs() < 1e-12);
        assert_eq!(roc_auc(&[0.3; 4], &[false, true, false, true]), Some(0.5));
    }

    #[test]
    fn auc_undefined_for_single_class() {
        assert_eq!(roc_auc(&[0.1, 0.9], &[true, true]), None);
        assert_eq!(roc_auc(&[0.1, 0.9], &[false, false]), None);
        assert_eq!(roc_auc(&[], &[]), None);
    }

    #[test]
    fn auc_matches_pairwise_count() {
        let scores = [0.2, 0.7, 0.4, 0.4, 0.9, 0.1, 0.6];
        let labels = [false, true, false, true, true, false, false];
        let mut wins = 0.0;
        let mut pairs = 0.0;
        for (sp, _) in scores.iter().zip(&labels).filter(|(_, &l)| l) {
            for (sn, _) in scores.iter().zip(&labels).filter(|(_, &l)| !l) {
                pairs += 1.0;
                wins += if sp > sn { 1.0 } else if sp == sn { 0.5 } else { 0.0 };
            }
        }
        let auc = roc_auc(&scores, &labels).unwrap();
        assert!((auc - wins / pairs).abs() < 1e-12);
    }
}
