use std::{collections::HashMap, path::Path};

use crate::{
    error::{AppError, AppResult},
    models::{Talk, Topic},
};

/// Talks shipped with the binary
const SEED_TALKS: &str = include_str!("../../data/talks.json");

/// Default row length for the browse queries
pub const DEFAULT_ROW_LIMIT: usize = 10;

/// Immutable, ordered list of talks with an id index
#[derive(Debug, Clone)]
pub struct Catalog {
    talks: Vec<Talk>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate ids
    pub fn new(talks: Vec<Talk>) -> AppResult<Self> {
        let mut index = HashMap::with_capacity(talks.len());
        for (position, talk) in talks.iter().enumerate() {
            if index.insert(talk.id.clone(), position).is_some() {
                return Err(AppError::InvalidInput(format!(
                    "Duplicate talk id in catalog: {}",
                    talk.id
                )));
            }
        }
        Ok(Self { talks, index })
    }

    /// The built-in seed catalog
    pub fn seed() -> AppResult<Self> {
        Self::from_json(SEED_TALKS)
    }

    pub fn from_json(json: &str) -> AppResult<Self> {
        let talks: Vec<Talk> = serde_json::from_str(json)?;
        Self::new(talks)
    }

    /// Loads a catalog from a JSON file holding an array of talks
    pub async fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let json = tokio::fs::read_to_string(path.as_ref()).await?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            path = %path.as_ref().display(),
            talk_count = catalog.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    pub fn talks(&self) -> &[Talk] {
        &self.talks
    }

    pub fn len(&self) -> usize {
        self.talks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.talks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Talk> {
        self.index.get(id).map(|&position| &self.talks[position])
    }

    /// Talks whose id appears in `ids`, in catalog order; unknown ids are skipped
    pub fn resolve(&self, ids: &[String]) -> Vec<Talk> {
        self.talks
            .iter()
            .filter(|talk| ids.contains(&talk.id))
            .cloned()
            .collect()
    }

    pub fn by_topic(&self, topic: Topic, limit: usize) -> Vec<Talk> {
        self.talks
            .iter()
            .filter(|talk| talk.topic == topic)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Most viewed first
    pub fn trending(&self, limit: usize) -> Vec<Talk> {
        let mut talks = self.talks.clone();
        talks.sort_by(|a, b| b.views_in_millions().total_cmp(&a.views_in_millions()));
        talks.truncate(limit);
        talks
    }

    /// Newest first
    pub fn recent(&self, limit: usize) -> Vec<Talk> {
        let mut talks = self.talks.clone();
        talks.sort_by(|a, b| b.date.cmp(&a.date));
        talks.truncate(limit);
        talks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(talks: &[Talk]) -> Vec<&str> {
        talks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_seed_catalog() {
        let catalog = Catalog::seed().unwrap();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.get("2").unwrap().topic, Topic::Psychology);
        assert_eq!(catalog.get("2").unwrap().views, "58M");
        assert!(catalog.get("11").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let catalog = Catalog::seed().unwrap();
        let mut talks = catalog.talks().to_vec();
        talks.push(talks[0].clone());
        assert!(matches!(Catalog::new(talks), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            Catalog::from_json("{not json"),
            Err(AppError::Serialization(_))
        ));
    }

    #[test]
    fn test_by_topic_keeps_catalog_order() {
        let catalog = Catalog::seed().unwrap();
        assert_eq!(ids(&catalog.by_topic(Topic::Psychology, 10)), vec!["2", "5", "8"]);
        assert_eq!(ids(&catalog.by_topic(Topic::Business, 2)), vec!["3", "7"]);
        assert!(catalog.by_topic(Topic::Art, 10).is_empty());
    }

    #[test]
    fn test_trending_by_views() {
        let catalog = Catalog::seed().unwrap();
        assert_eq!(ids(&catalog.trending(3)), vec!["3", "2", "5"]);
    }

    #[test]
    fn test_recent_by_date() {
        let catalog = Catalog::seed().unwrap();
        assert_eq!(ids(&catalog.recent(3)), vec!["8", "4", "6"]);
    }

    #[test]
    fn test_resolve_skips_dangling_ids() {
        let catalog = Catalog::seed().unwrap();
        let wanted = vec!["9".to_string(), "missing".to_string(), "1".to_string()];
        assert_eq!(ids(&catalog.resolve(&wanted)), vec!["1", "9"]);
    }

    #[tokio::test]
    async fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talks.json");
        tokio::fs::write(&path, SEED_TALKS).await.unwrap();

        let catalog = Catalog::from_file(&path).await.unwrap();
        assert_eq!(catalog.len(), 10);
    }
}
