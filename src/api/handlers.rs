use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{SwipeDirection, Talk, Topic, UserPreferences};
use crate::services::{catalog::DEFAULT_ROW_LIMIT, RecommendationEngine};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RowQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    /// Comma-separated talk ids to leave out
    pub exclude: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub talk_id: String,
    pub direction: SwipeDirection,
}

#[derive(Debug, Serialize)]
pub struct SwipeResponse {
    pub preferences: UserPreferences,
    /// True when this swipe completed a round and recommendations are due
    pub show_recommendations: bool,
}

#[derive(Debug, Serialize)]
pub struct TalkResponse {
    #[serde(flatten)]
    pub talk: Talk,
    pub is_favorite: bool,
}

#[derive(Debug, Serialize)]
pub struct TopicResponse {
    pub name: Topic,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub message: String,
    pub talks: Vec<Talk>,
}

fn parse_exclude(raw: Option<&str>) -> Vec<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Full catalog in catalog order
pub async fn list_talks(State(state): State<AppState>) -> Json<Vec<Talk>> {
    Json(state.catalog.talks().to_vec())
}

/// Single talk with its liked flag
pub async fn get_talk(
    State(state): State<AppState>,
    Path(talk_id): Path<String>,
) -> AppResult<Json<TalkResponse>> {
    let talk = state
        .catalog
        .get(&talk_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Talk {}", talk_id)))?;
    let is_favorite = state.store.is_favorite(&talk_id).await;

    Ok(Json(TalkResponse { talk, is_favorite }))
}

pub async fn trending_talks(
    State(state): State<AppState>,
    Query(query): Query<RowQuery>,
) -> Json<Vec<Talk>> {
    Json(state.catalog.trending(query.limit.unwrap_or(DEFAULT_ROW_LIMIT)))
}

pub async fn recent_talks(
    State(state): State<AppState>,
    Query(query): Query<RowQuery>,
) -> Json<Vec<Talk>> {
    Json(state.catalog.recent(query.limit.unwrap_or(DEFAULT_ROW_LIMIT)))
}

/// All topics with the user's current selection
pub async fn list_topics(State(state): State<AppState>) -> Json<Vec<TopicResponse>> {
    let prefs = state.store.load().await;
    let topics = Topic::ALL
        .into_iter()
        .map(|topic| TopicResponse {
            name: topic,
            selected: prefs.topics.iter().any(|t| t == topic.as_str()),
        })
        .collect();
    Json(topics)
}

pub async fn talks_by_topic(
    State(state): State<AppState>,
    Path(topic): Path<String>,
    Query(query): Query<RowQuery>,
) -> AppResult<Json<Vec<Talk>>> {
    let topic: Topic = topic.parse()?;
    Ok(Json(
        state
            .catalog
            .by_topic(topic, query.limit.unwrap_or(DEFAULT_ROW_LIMIT)),
    ))
}

/// Select or deselect an interest topic
pub async fn toggle_topic(
    State(state): State<AppState>,
    Path(topic): Path<String>,
) -> AppResult<Json<UserPreferences>> {
    let topic: Topic = topic.parse()?;
    Ok(Json(state.store.toggle_topic(topic.as_str()).await))
}

/// Get user preferences
pub async fn get_preferences(State(state): State<AppState>) -> Json<UserPreferences> {
    Json(state.store.load().await)
}

/// Liked talks that still exist in the catalog
pub async fn list_favorites(State(state): State<AppState>) -> Json<Vec<Talk>> {
    let prefs = state.store.load().await;
    Json(state.catalog.resolve(&prefs.favorites))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    Path(talk_id): Path<String>,
) -> Json<UserPreferences> {
    Json(state.store.add_favorite(&talk_id).await)
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(talk_id): Path<String>,
) -> Json<UserPreferences> {
    Json(state.store.remove_favorite(&talk_id).await)
}

/// Record a swipe on a talk card
pub async fn swipe(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SwipeRequest>,
) -> Json<SwipeResponse> {
    let preferences = state.store.swipe(&request.talk_id, request.direction).await;
    let show_recommendations = RecommendationEngine::should_show_recommendations(&preferences);

    tracing::info!(
        request_id = %request_id,
        talk_id = %request.talk_id,
        direction = ?request.direction,
        swipe_count = preferences.swipe_count,
        show_recommendations,
        "Swipe processed"
    );

    Json(SwipeResponse {
        preferences,
        show_recommendations,
    })
}

/// Ranked unseen talks for the current preferences
pub async fn recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<RecommendationQuery>,
) -> Json<RecommendationsResponse> {
    let prefs = state.store.load().await;
    let exclude = parse_exclude(query.exclude.as_deref());
    let limit = query.limit.unwrap_or(state.recommendation_limit);

    let talks = state.engine.recommend(&prefs, &exclude, limit);

    tracing::info!(
        request_id = %request_id,
        favorites = prefs.favorites.len(),
        returned = talks.len(),
        "Recommendations computed"
    );

    Json(RecommendationsResponse {
        message: RecommendationEngine::match_message(&prefs),
        talks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::FileStore;
    use crate::services::Catalog;
    use std::sync::Arc;

    #[test]
    fn test_parse_exclude() {
        assert_eq!(parse_exclude(None), Vec::<String>::new());
        assert_eq!(parse_exclude(Some("")), Vec::<String>::new());
        assert_eq!(
            parse_exclude(Some("1, 2,,3 ")),
            vec!["1".to_string(), "2".to_string(), "3".to_string()]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_swipes_trigger_once_per_round() {
        for _round in 0..5 {
            let dir = tempfile::tempdir().unwrap();
            let backend = Arc::new(FileStore::open(dir.path()).await.unwrap());
            let state = AppState::new(backend, Catalog::seed().unwrap(), 5);

            let mut tasks = Vec::new();
            for i in 0..20 {
                let state = state.clone();
                tasks.push(tokio::spawn(async move {
                    let request = SwipeRequest {
                        talk_id: format!("c{}", i),
                        direction: SwipeDirection::Right,
                    };
                    swipe(
                        State(state),
                        Extension(RequestId::generate()),
                        Json(request),
                    )
                    .await
                    .0
                }));
            }

            let mut triggered = Vec::new();
            for task in tasks {
                let response = task.await.unwrap();
                if response.show_recommendations {
                    triggered.push(response.preferences.swipe_count);
                }
            }
            triggered.sort_unstable();
            assert_eq!(triggered, vec![10, 20]);

            let prefs = state.store.load().await;
            assert_eq!(prefs.swipe_count, 20);
            assert_eq!(prefs.favorites.len(), 20);
        }
    }
}
