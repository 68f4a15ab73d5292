pub mod talk;
pub mod user_preferences;

pub use talk::{parse_view_count, Talk, Topic};
pub use user_preferences::{SwipeDirection, UserPreferences};
