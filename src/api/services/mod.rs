pub mod health;
pub mod images;
pub mod media;
pub mod preferences;
pub mod watch_providers;
