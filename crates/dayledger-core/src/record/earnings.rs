//! Earnings buckets and category mapping.

use serde::{Deserialize, Serialize};

/// One of the five fixed buckets a reward is credited to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    BodyHealth,
    MentalHealth,
    SoulNourishment,
    SelfImprovement,
    SocialBonds,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::BodyHealth,
        Category::MentalHealth,
        Category::SoulNourishment,
        Category::SelfImprovement,
        Category::SocialBonds,
    ];

    /// The persisted/export key for this bucket.
    pub fn key(&self) -> &'static str {
        match self {
            Category::BodyHealth => "bodyHealth",
            Category::MentalHealth => "mentalHealth",
            Category::SoulNourishment => "soulNourishment",
            Category::SelfImprovement => "selfImprovement",
            Category::SocialBonds => "socialBonds",
        }
    }

    /// Resolve a category string to a fixed bucket.
    ///
    /// Returns `None` for user-defined custom categories; those are
    /// credited to [`Category::SelfImprovement`] by [`Category::bucket_for`].
    pub fn from_key(key: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.key() == key)
    }

    /// Bucket a task category string resolves to. Custom categories fall
    /// into the self-improvement bucket.
    pub fn bucket_for(key: &str) -> Category {
        Category::from_key(key).unwrap_or(Category::SelfImprovement)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::BodyHealth => "Body Health",
            Category::MentalHealth => "Mental Health",
            Category::SoulNourishment => "Soul Nourishment",
            Category::SelfImprovement => "Self Improvement",
            Category::SocialBonds => "Social Bonds",
        }
    }
}

/// Per-day earnings totals. `total` always equals the sum of the five
/// buckets; all mutation goes through [`Earnings::credit`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Earnings {
    #[serde(default)]
    pub body_health: f64,
    #[serde(default)]
    pub mental_health: f64,
    #[serde(default)]
    pub soul_nourishment: f64,
    #[serde(default)]
    pub self_improvement: f64,
    #[serde(default)]
    pub social_bonds: f64,
    #[serde(default)]
    pub total: f64,
}

impl Earnings {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::BodyHealth => self.body_health,
            Category::MentalHealth => self.mental_health,
            Category::SoulNourishment => self.soul_nourishment,
            Category::SelfImprovement => self.self_improvement,
            Category::SocialBonds => self.social_bonds,
        }
    }

    /// Add `amount` to a bucket and keep `total` consistent.
    pub fn credit(&mut self, category: Category, amount: f64) {
        let slot = match category {
            Category::BodyHealth => &mut self.body_health,
            Category::MentalHealth => &mut self.mental_health,
            Category::SoulNourishment => &mut self.soul_nourishment,
            Category::SelfImprovement => &mut self.self_improvement,
            Category::SocialBonds => &mut self.social_bonds,
        };
        *slot += amount;
        self.total = self.sum_buckets();
    }

    pub fn sum_buckets(&self) -> f64 {
        self.body_health
            + self.mental_health
            + self.soul_nourishment
            + self.self_improvement
            + self.social_bonds
    }

    /// Invariant check: `total == sum(buckets)` within float tolerance.
    pub fn is_consistent(&self) -> bool {
        (self.total - self.sum_buckets()).abs() < 1e-6
    }
}

/// Round a money amount to 2 decimal places. Persisted values are the
/// canonical rounded values; display never re-rounds.
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn credit_keeps_total_consistent() {
        let mut e = Earnings::default();
        e.credit(Category::BodyHealth, 1.5);
        e.credit(Category::SelfImprovement, 0.83);
        e.credit(Category::SocialBonds, 2.0);
        assert!(e.is_consistent());
        assert_eq!(e.total, 4.33);
    }

    #[test]
    fn custom_category_falls_into_self_improvement() {
        assert_eq!(Category::bucket_for("bodyHealth"), Category::BodyHealth);
        assert_eq!(
            Category::bucket_for("guitar practice"),
            Category::SelfImprovement
        );
    }

    #[test]
    fn round2_examples() {
        assert_eq!(round2(300.0 / 3600.0 * 10.0), 0.83);
        assert_eq!(round2(1500.0 / 3600.0 * 10.0), 4.17);
        assert_eq!(round2(900.0 / 3600.0 * 8.0), 2.0);
    }

    proptest! {
        #[test]
        fn total_always_equals_bucket_sum(
            credits in proptest::collection::vec((0usize..5, 0.0f64..1000.0), 0..50)
        ) {
            let mut e = Earnings::default();
            for (idx, amount) in credits {
                e.credit(Category::ALL[idx], round2(amount));
            }
            prop_assert!(e.is_consistent());
        }
    }
}
