use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

/// Category label every talk belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Topic {
    Technology,
    Science,
    Business,
    Psychology,
    Design,
    Education,
    Health,
    Environment,
    Society,
    Art,
}

impl Topic {
    /// All topics in display order
    pub const ALL: [Topic; 10] = [
        Topic::Technology,
        Topic::Science,
        Topic::Business,
        Topic::Psychology,
        Topic::Design,
        Topic::Education,
        Topic::Health,
        Topic::Environment,
        Topic::Society,
        Topic::Art,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Technology => "Technology",
            Topic::Science => "Science",
            Topic::Business => "Business",
            Topic::Psychology => "Psychology",
            Topic::Design => "Design",
            Topic::Education => "Education",
            Topic::Health => "Health",
            Topic::Environment => "Environment",
            Topic::Society => "Society",
            Topic::Art => "Art",
        }
    }
}

impl Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Topic {
    type Err = AppError;

    /// Parses a topic name, ignoring ASCII case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|topic| topic.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown topic: {}", s)))
    }
}

/// A short video in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Talk {
    /// Unique identifier within the catalog
    pub id: String,
    pub title: String,
    pub speaker: String,
    pub description: String,
    /// Running time as displayed, e.g. "18:42"
    pub duration: String,
    /// Approximate view count as displayed, e.g. "2.1M"
    pub views: String,
    /// Publication date
    pub date: NaiveDate,
    pub topic: Topic,
    pub thumbnail: String,
    /// Catalog files from the browser app spell this `videoUrl`
    #[serde(alias = "videoUrl")]
    pub video_url: String,
    pub tags: Vec<String>,
}

impl Talk {
    /// Numeric magnitude of the `views` label
    ///
    /// Every character other than an ASCII digit or `.` is dropped and the
    /// longest leading decimal number is parsed, so "2.1M" gives `2.1` and
    /// "58M" gives `58.0`. The value is not unit-normalized. Labels with no
    /// number in them give `0.0`.
    pub fn views_in_millions(&self) -> f64 {
        parse_view_count(&self.views)
    }
}

/// Sanitize-then-parse used for view labels
pub fn parse_view_count(label: &str) -> f64 {
    let sanitized: String = label
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    // Longest prefix of the form digits[.digits]
    let mut end = 0;
    let mut seen_dot = false;
    for (idx, c) in sanitized.char_indices() {
        if c == '.' {
            if seen_dot {
                break;
            }
            seen_dot = true;
        }
        end = idx + c.len_utf8();
    }

    sanitized[..end].parse::<f64>().unwrap_or(0.0)
}
