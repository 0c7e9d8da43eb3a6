//! Fixed feature ordering shared by training and inference.
//!
//! The order of [`FEATURE_NAMES`] is part of the artifact wire contract:
//! coefficient `j` of either model multiplies standardized feature `j`.
//! Changing the set or the order is a major schema change.

/// Number of model inputs.
pub const N_FEATURES: usize = 13;

/// Feature names in coefficient order.
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "iaq",
    "gasK",
    "temp",
    "hum",
    "pres",
    "iaq_d1",
    "gas_d1",
    "pres_d1",
    "iaq_mean",
    "gas_mean",
    "pres_mean",
    "iaq_std",
    "gas_std",
];

/// One row of model inputs in [`FEATURE_NAMES`] order.
pub type FeatureVector = [f64; N_FEATURES];

/// Owned copy of the feature names, as stored in artifact metadata.
pub fn feature_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect()
}

/// Check that a recorded ordering matches the one this build trains with.
pub fn matches_feature_order(names: &[String]) -> bool {
    names.len() == N_FEATURES && names.iter().zip(FEATURE_NAMES).all(|(a, b)| a == b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let mut sorted = FEATURE_NAMES.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), N_FEATURES);
    }

    #[test]
    fn order_check_rejects_permutation() {
        let mut names = feature_names();
        assert!(matches_feature_order(&names));
        names.swap(0, 1);
        assert!(!matches_feature_order(&names));
        assert!(!matches_feature_order(&names[..12]));
    }
}
