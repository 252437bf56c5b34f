use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::catalog::{Achievement, EvaluationContext, ProfileMetrics, CATALOG};
use super::keywords::CategoryCounts;
use crate::config::CategoryInference;
use crate::store::{ProfileStore, StoreResult};

/// Runs the catalog against a user's metrics and records new unlocks.
pub struct AchievementEvaluator<'a> {
    catalog: &'a [Achievement],
    inference: CategoryInference,
}

impl AchievementEvaluator<'static> {
    pub fn standard(inference: CategoryInference) -> Self {
        Self { catalog: CATALOG.as_slice(), inference }
    }
}

impl<'a> AchievementEvaluator<'a> {
    pub fn with_catalog(catalog: &'a [Achievement], inference: CategoryInference) -> Self {
        Self { catalog, inference }
    }

    /// Catalog entries not in `unlocked` whose condition now holds.
    pub fn newly_met(
        &self,
        unlocked: &HashSet<String>,
        ctx: &EvaluationContext,
    ) -> Vec<&'a Achievement> {
        self.catalog
            .iter()
            .filter(|a| !unlocked.contains(a.id))
            .filter(|a| a.condition.is_met(ctx))
            .collect()
    }

    /// Fetch sub-counts for `user_id`. A failed lookup counts as zero.
    pub fn gather_context<S: ProfileStore + ?Sized>(
        &self,
        store: &S,
        user_id: &str,
        metrics: ProfileMetrics,
    ) -> EvaluationContext {
        let friend_count = or_zero(store.count_friends(user_id), "friend count");
        let cosmetics_owned = or_zero(store.count_owned_cosmetics(user_id), "owned cosmetics");
        let category_counts = match self.inference {
            CategoryInference::Keywords => store
                .list_completed_quest_names(user_id)
                .map(|names| CategoryCounts::from_names(&names)),
            CategoryInference::Stored => store
                .list_completed_quest_categories(user_id)
                .map(|categories| CategoryCounts::from_categories(&categories)),
        };
        let category_counts = or_zero(category_counts, "quest history");

        EvaluationContext { metrics, friend_count, cosmetics_owned, category_counts }
    }

    /// Evaluate and persist. Returns the ids that were unlocked and stored.
    ///
    /// Without the already-unlocked set nothing can be decided safely, so a
    /// failure there skips the pass. A failed unlock insert is left for the
    /// next pass.
    pub fn evaluate<S: ProfileStore + ?Sized>(
        &self,
        store: &S,
        user_id: &str,
        metrics: ProfileMetrics,
        now: DateTime<Utc>,
    ) -> Vec<String> {
        let unlocked = match store.get_unlocked_achievement_ids(user_id) {
            Ok(ids) => ids,
            Err(e) => {
                warn!(user_id, error = %e, "skipping achievement pass: unlocked set unavailable");
                return Vec::new();
            }
        };

        let ctx = self.gather_context(store, user_id, metrics);
        let mut newly_unlocked = Vec::new();

        for achievement in self.newly_met(&unlocked, &ctx) {
            match store.insert_unlocked_achievement(user_id, achievement.id, now) {
                Ok(()) => {
                    info!(user_id, achievement = achievement.id, "achievement unlocked");
                    newly_unlocked.push(achievement.id.to_string());
                }
                Err(e) => {
                    warn!(user_id, achievement = achievement.id, error = %e, "failed to record unlock");
                }
            }
        }

        debug!(user_id, count = newly_unlocked.len(), "achievement pass finished");
        newly_unlocked
    }
}

fn or_zero<T: Default>(result: StoreResult<T>, what: &str) -> T {
    result.unwrap_or_else(|e| {
        warn!(error = %e, "{} lookup failed, treating as zero", what);
        T::default()
    })
}
