//! Diet metrics
//!
//! Aggregate counts and best on-diet streak over a user's meal history.

use serde::Serialize;

use super::Meal;

/// Anything that can say whether it was eaten on the diet
pub trait OnDiet {
    fn is_on_diet(&self) -> bool;
}

impl OnDiet for bool {
    fn is_on_diet(&self) -> bool {
        *self
    }
}

impl OnDiet for Meal {
    fn is_on_diet(&self) -> bool {
        self.is_on_diet
    }
}

impl<T: OnDiet + ?Sized> OnDiet for &T {
    fn is_on_diet(&self) -> bool {
        (**self).is_on_diet()
    }
}

/// Diet metrics for one user
///
/// Meals must be fed in chronological order (oldest first). The streak only
/// counts meals that are adjacent in that order; one off-diet meal resets it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DietMetrics {
    pub total_meals: u64,
    pub total_meals_on_diet: u64,
    pub total_meals_off_diet: u64,
    pub best_on_diet_sequence: u64,
    /// Length of the run still open after the last meal
    #[serde(skip)]
    current_sequence: u64,
}

impl DietMetrics {
    /// Metrics for an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute metrics over an ordered meal sequence
    pub fn from_meals<I>(meals: I) -> Self
    where
        I: IntoIterator,
        I::Item: OnDiet,
    {
        meals.into_iter().fold(Self::new(), |mut metrics, meal| {
            metrics.push(meal.is_on_diet());
            metrics
        })
    }

    /// Fold the next meal in chronological order
    pub fn push(&mut self, is_on_diet: bool) {
        self.total_meals += 1;

        if is_on_diet {
            self.total_meals_on_diet += 1;
            self.current_sequence += 1;
        } else {
            self.total_meals_off_diet += 1;
            self.current_sequence = 0;
        }

        self.best_on_diet_sequence = self.best_on_diet_sequence.max(self.current_sequence);
    }

    /// Length of the on-diet run ending at the most recent meal
    pub fn current_sequence(&self) -> u64 {
        self.current_sequence
    }
}

impl<T: OnDiet> FromIterator<T> for DietMetrics {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_meals(iter)
    }
}

impl<T: OnDiet> Extend<T> for DietMetrics {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for meal in iter {
            self.push(meal.is_on_diet());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ON: bool = true;
    const OFF: bool = false;

    fn metrics(seq: &[bool]) -> DietMetrics {
        DietMetrics::from_meals(seq)
    }

    fn assert_invariants(m: &DietMetrics) {
        assert_eq!(m.total_meals, m.total_meals_on_diet + m.total_meals_off_diet);
        assert!(m.best_on_diet_sequence <= m.total_meals_on_diet);
    }

    #[test]
    fn test_empty_history_is_all_zero() {
        let m = metrics(&[]);
        assert_eq!(m.total_meals, 0);
        assert_eq!(m.total_meals_on_diet, 0);
        assert_eq!(m.total_meals_off_diet, 0);
        assert_eq!(m.best_on_diet_sequence, 0);
    }

    #[test]
    fn test_all_on_diet_streak_is_whole_history() {
        for n in 1..=12 {
            let seq = vec![ON; n];
            let m = metrics(&seq);
            assert_eq!(m.best_on_diet_sequence, n as u64);
            assert_invariants(&m);
        }
    }

    #[test]
    fn test_off_diet_meal_resets_streak() {
        let m = metrics(&[ON, ON, OFF, ON, ON, ON]);
        assert_eq!(m.total_meals, 6);
        assert_eq!(m.total_meals_on_diet, 5);
        assert_eq!(m.total_meals_off_diet, 1);
        assert_eq!(m.best_on_diet_sequence, 3);
        assert_eq!(m.current_sequence(), 3);
    }

    #[test]
    fn test_streak_does_not_resume_additively() {
        let m = metrics(&[ON, ON, ON, OFF, ON, ON]);
        assert_eq!(m.best_on_diet_sequence, 3);
        assert_eq!(m.current_sequence(), 2);
    }

    #[test]
    fn test_only_off_diet() {
        let m = metrics(&[OFF, OFF]);
        assert_eq!(m.total_meals, 2);
        assert_eq!(m.total_meals_on_diet, 0);
        assert_eq!(m.total_meals_off_diet, 2);
        assert_eq!(m.best_on_diet_sequence, 0);
    }

    #[test]
    fn test_invariants_hold_for_every_short_history() {
        for len in 0..=8u32 {
            for bits in 0..(1u32 << len) {
                let seq: Vec<bool> = (0..len).map(|i| bits & (1 << i) != 0).collect();
                assert_invariants(&metrics(&seq));
            }
        }
    }

    #[test]
    fn test_recomputing_gives_same_result() {
        let seq = [OFF, ON, ON, OFF, ON];
        assert_eq!(metrics(&seq), metrics(&seq));
    }

    #[test]
    fn test_incremental_push_matches_batch() {
        let seq = [ON, OFF, ON, ON, OFF, OFF, ON, ON, ON, ON];
        let mut streamed = DietMetrics::new();
        streamed.extend(seq.iter());

        let collected: DietMetrics = seq.iter().collect();
        assert_eq!(streamed, collected);
        assert_eq!(streamed.best_on_diet_sequence, 4);
    }

    #[test]
    fn test_serializes_with_public_keys_only() {
        let json = serde_json::to_value(metrics(&[ON, ON, OFF, ON, ON, ON])).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "totalMeals": 6,
                "totalMealsOnDiet": 5,
                "totalMealsOffDiet": 1,
                "bestOnDietSequence": 3,
            })
        );
    }
}
