// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Two ways to carve a validation set out of the screened rows:
//
//   split_holdout_tail — the last `validation_fraction` of the
//                        rows, in file order. This is the default
//                        and matches a Keras-style validation_split:
//                        the held-out days never change between runs.
//
//   split_train_val    — shuffle first (Fisher-Yates via
//                        rand::seq::SliceRandom), then split.
//                        Enabled with TrainConfig::shuffle_before_split.
//
// Either way the validation rows are only reported on; they are
// never used for early stopping or model selection.
//
// Reference: rand crate documentation

use rand::seq::SliceRandom;
use rand::Rng;

/// Hold out the tail of `samples` for validation.
///
/// The training part gets `floor(len * (1 - validation_fraction))`
/// rows, so a tiny dataset may end up with no validation rows.
pub fn split_holdout_tail<T>(mut samples: Vec<T>, validation_fraction: f64) -> (Vec<T>, Vec<T>) {
    let total    = samples.len();
    let train_fraction = (1.0 - validation_fraction).clamp(0.0, 1.0);
    let split_at = ((total as f64) * train_fraction).floor() as usize;
    let split_at = split_at.min(total);

    let val = samples.split_off(split_at);
    log_split(samples.len(), val.len());
    (samples, val)
}

/// Shuffle `samples` with `rng` and split into (train, validation).
///
/// `train_fraction` is the proportion kept for training, e.g. 0.8.
pub fn split_train_val<T, R: Rng + ?Sized>(
    mut samples:    Vec<T>,
    train_fraction: f64,
    rng:            &mut R,
) -> (Vec<T>, Vec<T>) {
    samples.shuffle(rng);

    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;
    let split_at = split_at.min(total);

    let val = samples.split_off(split_at);
    log_split(samples.len(), val.len());
    (samples, val)
}

fn log_split(train: usize, val: usize) {
    let total = (train + val).max(1);
    tracing::debug!(
        "Split {} / {} rows ({}% / {}%)",
        train,
        val,
        (train * 100) / total,
        (val   * 100) / total,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Day-of-year numbers stand in for weather rows.
    fn days(n: u32) -> Vec<u32> {
        (1..=n).collect()
    }

    #[test]
    fn test_holdout_is_the_last_days_in_order() {
        let (train, val) = split_holdout_tail(days(365), 0.2);
        // floor(365 * 0.8) = 292
        assert_eq!(train.len(), 292);
        assert_eq!(val, (293..=365).collect::<Vec<_>>());
    }

    #[test]
    fn test_holdout_rounds_training_share_down() {
        let (train, val) = split_holdout_tail(days(7), 0.2);
        assert_eq!((train.len(), val.len()), (5, 2));
    }

    #[test]
    fn test_holdout_without_validation() {
        let (train, val) = split_holdout_tail(days(12), 0.0);
        assert_eq!(train, days(12));
        assert!(val.is_empty());
    }

    #[test]
    fn test_holdout_of_nothing() {
        let (train, val) = split_holdout_tail(Vec::<u32>::new(), 0.2);
        assert!(train.is_empty() && val.is_empty());
    }

    #[test]
    fn test_shuffled_split_is_seed_stable_and_lossless() {
        let (a_train, a_val) = split_train_val(days(40), 0.75, &mut StdRng::seed_from_u64(3));
        let (b_train, b_val) = split_train_val(days(40), 0.75, &mut StdRng::seed_from_u64(3));
        assert_eq!(a_train, b_train);
        assert_eq!(a_val, b_val);
        assert_eq!(a_val.len(), 10);

        let mut all = a_train;
        all.extend(a_val);
        all.sort_unstable();
        assert_eq!(all, days(40));
    }
}
