//! Single-user talk discovery: a locally persisted preference record and a
//! heuristic recommender over a fixed catalog of talks, served to the UI
//! through a small JSON API.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
