//! Shuffling for presentation variety
//!
//! Both shuffles take the random source as a parameter so a seeded
//! `StdRng` gives reproducible orders. A shuffle never outranks an explicit
//! sort: the session re-sorts on the next filter or sort change.

use crate::catalog::Tour;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How the catalog is ordered right after loading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShuffleMode {
    /// Keep catalog order
    #[default]
    None,
    /// Uniform random permutation
    Uniform,
    /// Premium quota up front, everything else shuffled behind it
    Stratified,
}

/// Which tours count as premium and how many of them lead the order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PremiumRule {
    pub min_quality: f64,
    /// When set, premium also requires `priceMax` at or above this
    pub min_price: Option<f64>,
    pub quota_min: usize,
    pub quota_max: usize,
}

impl Default for PremiumRule {
    fn default() -> Self {
        Self {
            min_quality: 90.0,
            min_price: None,
            quota_min: 3,
            quota_max: 5,
        }
    }
}

impl PremiumRule {
    pub fn is_premium(&self, tour: &Tour) -> bool {
        if tour.quality < self.min_quality {
            return false;
        }
        match self.min_price {
            Some(min_price) => tour.price_range().is_some_and(|(_, max)| max >= min_price),
            None => true,
        }
    }
}

/// Fisher–Yates over the whole slice
pub fn shuffle_uniform<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Premium tours and the rest are shuffled independently; a random quota of
/// premium tours (within the rule's range, capped by how many exist) leads,
/// followed by a shuffle of everything else.
pub fn stratified_shuffle<R: Rng + ?Sized>(
    items: &[Arc<Tour>],
    rule: &PremiumRule,
    rng: &mut R,
) -> Vec<Arc<Tour>> {
    let (mut premium, mut rest): (Vec<Arc<Tour>>, Vec<Arc<Tour>>) =
        items.iter().cloned().partition(|t| rule.is_premium(t));

    premium.shuffle(rng);
    rest.shuffle(rng);

    let quota = pick_quota(rule, premium.len(), rng);

    let mut remainder = premium.split_off(quota);
    remainder.append(&mut rest);
    remainder.shuffle(rng);

    premium.append(&mut remainder);
    premium
}

fn pick_quota<R: Rng + ?Sized>(rule: &PremiumRule, available: usize, rng: &mut R) -> usize {
    let low = rule.quota_min.min(rule.quota_max);
    let high = rule.quota_min.max(rule.quota_max);
    rng.gen_range(low..=high).min(available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tours(n: usize) -> Vec<Arc<Tour>> {
        (0..n)
            .map(|i| {
                Arc::new(
                    Tour::new(i.to_string(), format!("Tour {}", i), "maui")
                        .with_quality(if i % 4 == 0 { 95.0 } else { 70.0 }),
                )
            })
            .collect()
    }

    fn sorted_ids(view: &[Arc<Tour>]) -> Vec<String> {
        let mut ids: Vec<String> = view.iter().map(|t| t.id.clone()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_uniform_is_permutation() {
        let original = tours(20);
        let mut shuffled = original.clone();
        shuffle_uniform(&mut shuffled, &mut StdRng::seed_from_u64(7));
        assert_eq!(sorted_ids(&shuffled), sorted_ids(&original));
    }

    #[test]
    fn test_uniform_deterministic_with_seed() {
        let mut a = tours(20);
        let mut b = tours(20);
        shuffle_uniform(&mut a, &mut StdRng::seed_from_u64(42));
        shuffle_uniform(&mut b, &mut StdRng::seed_from_u64(42));
        let ids_a: Vec<&str> = a.iter().map(|t| t.id.as_str()).collect();
        let ids_b: Vec<&str> = b.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn test_stratified_premium_lead() {
        let original = tours(40); // 10 premium
        let rule = PremiumRule::default();

        for seed in 0..20 {
            let result = stratified_shuffle(&original, &rule, &mut StdRng::seed_from_u64(seed));
            assert_eq!(sorted_ids(&result), sorted_ids(&original));
            let leading = result.iter().take_while(|t| rule.is_premium(t)).count();
            assert!(leading >= 3, "seed {} led with {} premium tours", seed, leading);
        }
    }

    #[test]
    fn test_stratified_quota_capped_by_group() {
        let original = tours(5); // ids 0 and 4 are premium
        let rule = PremiumRule::default();
        let result = stratified_shuffle(&original, &rule, &mut StdRng::seed_from_u64(1));
        assert_eq!(result.len(), 5);
        assert!(rule.is_premium(&result[0]));
        assert!(rule.is_premium(&result[1]));
    }

    #[test]
    fn test_stratified_no_premium() {
        let original: Vec<Arc<Tour>> = (0..6)
            .map(|i| Arc::new(Tour::new(i.to_string(), "T", "oahu").with_quality(50.0)))
            .collect();
        let result =
            stratified_shuffle(&original, &PremiumRule::default(), &mut StdRng::seed_from_u64(3));
        assert_eq!(sorted_ids(&result), sorted_ids(&original));
    }

    #[test]
    fn test_premium_rule_with_price() {
        let rule = PremiumRule {
            min_price: Some(200.0),
            ..PremiumRule::default()
        };
        let cheap = Tour::new("1", "A", "maui").with_quality(99.0).with_price(10.0, 50.0);
        let pricey = Tour::new("2", "B", "maui").with_quality(99.0).with_price(150.0, 250.0);
        let unpriced = Tour::new("3", "C", "maui").with_quality(99.0);
        assert!(!rule.is_premium(&cheap));
        assert!(rule.is_premium(&pricey));
        assert!(!rule.is_premium(&unpriced));
    }

    #[test]
    fn test_shuffle_mode_serde() {
        let mode: ShuffleMode = serde_json::from_str("\"stratified\"").unwrap();
        assert_eq!(mode, ShuffleMode::Stratified);
        assert_eq!(ShuffleMode::default(), ShuffleMode::None);
    }
}
