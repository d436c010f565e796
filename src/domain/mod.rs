pub mod image;
pub mod mapping;
pub mod models;
