use serde::{Deserialize, Serialize};

/// Locally persisted record of what the user has seen, liked and selected
///
/// The three id/topic lists behave as insertion-ordered sets. `favorites` is
/// not required to be a subset of `swiped_talks`: a talk can be liked from
/// the browse rows without ever being swiped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    /// Topics the user explicitly selected as interests
    pub topics: Vec<String>,
    /// Ids of talks the user has already acted on
    pub swiped_talks: Vec<String>,
    /// Ids of talks the user liked
    pub favorites: Vec<String>,
    /// Number of distinct talks swiped
    pub swipe_count: u64,
}

impl UserPreferences {
    /// Creates empty user preferences
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a favorite, returns false if it was already present
    pub fn add_favorite(&mut self, talk_id: &str) -> bool {
        if self.is_favorite(talk_id) {
            return false;
        }
        self.favorites.push(talk_id.to_string());
        true
    }

    /// Removes a favorite if present
    pub fn remove_favorite(&mut self, talk_id: &str) {
        self.favorites.retain(|id| id != talk_id);
    }

    /// Marks a talk as seen, counting it only the first time
    pub fn record_swipe(&mut self, talk_id: &str) -> bool {
        if self.has_swiped(talk_id) {
            return false;
        }
        self.swiped_talks.push(talk_id.to_string());
        self.swipe_count += 1;
        true
    }

    /// Selects the topic if absent, deselects it otherwise
    pub fn toggle_topic(&mut self, topic: &str) {
        if self.topics.iter().any(|t| t == topic) {
            self.topics.retain(|t| t != topic);
        } else {
            self.topics.push(topic.to_string());
        }
    }

    pub fn is_favorite(&self, talk_id: &str) -> bool {
        self.favorites.iter().any(|id| id == talk_id)
    }

    pub fn has_swiped(&self, talk_id: &str) -> bool {
        self.swiped_talks.iter().any(|id| id == talk_id)
    }
}

/// Direction of a swipe on a talk card
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// Skip
    Left,
    /// Like
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_preferences() {
        let prefs = UserPreferences::new();
        assert!(prefs.topics.is_empty());
        assert!(prefs.swiped_talks.is_empty());
        assert!(prefs.favorites.is_empty());
        assert_eq!(prefs.swipe_count, 0);
    }

    #[test]
    fn test_add_favorite_is_idempotent() {
        let mut prefs = UserPreferences::new();
        assert!(prefs.add_favorite("3"));
        assert!(!prefs.add_favorite("3")); // Duplicate should be ignored
        assert_eq!(prefs.favorites, vec!["3".to_string()]);
    }

    #[test]
    fn test_remove_favorite_missing_is_noop() {
        let mut prefs = UserPreferences::new();
        prefs.add_favorite("1");
        prefs.remove_favorite("2");
        assert_eq!(prefs.favorites, vec!["1".to_string()]);
    }

    #[test]
    fn test_record_swipe_counts_once() {
        let mut prefs = UserPreferences::new();
        assert!(prefs.record_swipe("4"));
        assert!(!prefs.record_swipe("4"));
        assert_eq!(prefs.swipe_count, 1);
        assert_eq!(prefs.swiped_talks, vec!["4".to_string()]);
    }

    #[test]
    fn test_toggle_topic() {
        let mut prefs = UserPreferences::new();
        prefs.toggle_topic("Science");
        prefs.toggle_topic("Art");
        assert_eq!(prefs.topics, vec!["Science".to_string(), "Art".to_string()]);
        prefs.toggle_topic("Science");
        assert_eq!(prefs.topics, vec!["Art".to_string()]);
    }

    #[test]
    fn test_stored_field_names() {
        let mut prefs = UserPreferences::new();
        prefs.record_swipe("2");
        let json = serde_json::to_value(&prefs).unwrap();
        assert_eq!(json["swipedTalks"][0], "2");
        assert_eq!(json["swipeCount"], 1);
        assert!(json["favorites"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_partial_record_merges_over_defaults() {
        let prefs: UserPreferences = serde_json::from_str(r#"{"favorites":["7"]}"#).unwrap();
        assert_eq!(prefs.favorites, vec!["7".to_string()]);
        assert!(prefs.swiped_talks.is_empty());
        assert_eq!(prefs.swipe_count, 0);
    }

    #[test]
    fn test_swipe_direction_serialization() {
        assert_eq!(serde_json::to_string(&SwipeDirection::Right).unwrap(), "\"right\"");
        let left: SwipeDirection = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(left, SwipeDirection::Left);
    }
}
