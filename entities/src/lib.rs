pub mod cache_entry;
pub mod user_preferences;
