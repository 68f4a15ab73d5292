use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};

use crate::{
    models::{Talk, UserPreferences},
    services::catalog::Catalog,
};

/// Affinity added to a liked talk's topic
pub const FAVORITE_TOPIC_WEIGHT: f64 = 2.0;
/// Affinity added to each tag of a liked talk
pub const FAVORITE_TAG_WEIGHT: f64 = 0.5;
/// Affinity added to an explicitly selected topic
pub const SELECTED_TOPIC_WEIGHT: f64 = 1.0;
/// Multiplier applied to tag affinity when scoring
pub const TAG_MATCH_MULTIPLIER: f64 = 0.3;
/// View counts (in the label's own unit) above which a talk earns a bonus
pub const POPULAR_VIEWS_THRESHOLD: f64 = 10.0;
pub const VERY_POPULAR_VIEWS_THRESHOLD: f64 = 50.0;
pub const POPULARITY_BONUS: f64 = 1.0;
/// Talks younger than this many months earn the recency bonus
pub const RECENT_MONTHS: f64 = 6.0;
pub const RECENCY_BONUS: f64 = 0.5;
/// Month length used for talk age
pub const DAYS_PER_MONTH: f64 = 30.0;
pub const DEFAULT_LIMIT: usize = 5;
/// Recommendations are offered on every multiple of this many swipes
pub const SWIPES_PER_ROUND: u64 = 10;

const MILLIS_PER_MONTH: f64 = 1000.0 * 60.0 * 60.0 * 24.0 * DAYS_PER_MONTH;

/// Interest weight per topic or tag label
pub type Affinity = HashMap<String, f64>;

/// Ranks unseen talks by affinity, popularity and recency
///
/// Stateless over a shared catalog; never fails. Preferences that mention
/// unknown ids just contribute nothing.
#[derive(Clone)]
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Builds the topic/tag interest map from likes and selected topics
    pub fn affinity(&self, prefs: &UserPreferences) -> Affinity {
        let mut scores = Affinity::new();

        for talk in prefs.favorites.iter().filter_map(|id| self.catalog.get(id)) {
            *scores.entry(talk.topic.to_string()).or_insert(0.0) += FAVORITE_TOPIC_WEIGHT;
            for tag in &talk.tags {
                *scores.entry(tag.clone()).or_insert(0.0) += FAVORITE_TAG_WEIGHT;
            }
        }

        for topic in &prefs.topics {
            *scores.entry(topic.clone()).or_insert(0.0) += SELECTED_TOPIC_WEIGHT;
        }

        scores
    }

    /// Relevance of one talk given a precomputed affinity map
    pub fn score(talk: &Talk, affinity: &Affinity, now: DateTime<Utc>) -> f64 {
        let mut score = affinity.get(talk.topic.as_str()).copied().unwrap_or(0.0);

        for tag in &talk.tags {
            score += affinity.get(tag).copied().unwrap_or(0.0) * TAG_MATCH_MULTIPLIER;
        }

        let views = talk.views_in_millions();
        if views > POPULAR_VIEWS_THRESHOLD {
            score += POPULARITY_BONUS;
        }
        if views > VERY_POPULAR_VIEWS_THRESHOLD {
            score += POPULARITY_BONUS;
        }

        if age_in_months(talk, now) < RECENT_MONTHS {
            score += RECENCY_BONUS;
        }

        score
    }

    /// Top `limit` unseen talks, best first
    pub fn recommend(
        &self,
        prefs: &UserPreferences,
        exclude: &[String],
        limit: usize,
    ) -> Vec<Talk> {
        self.recommend_at(prefs, exclude, limit, Utc::now())
    }

    /// Same as [`recommend`](Self::recommend) with an explicit clock
    pub fn recommend_at(
        &self,
        prefs: &UserPreferences,
        exclude: &[String],
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<Talk> {
        let affinity = self.affinity(prefs);

        let mut scored: Vec<(&Talk, f64)> = self
            .catalog
            .talks()
            .iter()
            .filter(|talk| !prefs.has_swiped(&talk.id) && !exclude.contains(&talk.id))
            .map(|talk| (talk, Self::score(talk, &affinity, now)))
            .collect();

        // Stable: equal scores keep catalog order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        tracing::debug!(
            candidates = scored.len(),
            limit,
            "Ranked recommendation candidates"
        );

        scored
            .into_iter()
            .take(limit)
            .map(|(talk, _)| talk.clone())
            .collect()
    }

    /// True on the 10th, 20th, 30th... swipe
    pub fn should_show_recommendations(prefs: &UserPreferences) -> bool {
        prefs.swipe_count >= SWIPES_PER_ROUND && prefs.swipe_count % SWIPES_PER_ROUND == 0
    }

    /// Headline shown above a recommendation list
    pub fn match_message(prefs: &UserPreferences) -> String {
        let favorite_count = prefs.favorites.len();

        match favorite_count {
            0 => "Based on your browsing, here are some talks you might love!".to_string(),
            1 | 2 => format!(
                "You've liked {} talk{}. Here are similar ones!",
                favorite_count,
                if favorite_count == 1 { "" } else { "s" }
            ),
            _ => format!(
                "Great taste! After {} swipes, here are your perfect TalkMatches!",
                prefs.swipe_count
            ),
        }
    }
}

/// Months between publication (midnight UTC) and `now`, using 30-day months
fn age_in_months(talk: &Talk, now: DateTime<Utc>) -> f64 {
    let published = talk.date.and_time(chrono::NaiveTime::MIN).and_utc();
    (now - published).num_milliseconds() as f64 / MILLIS_PER_MONTH
}
