//! Movie catalogue documents and their MongoDB store.

pub mod config;
pub mod database;
pub mod errors;
pub mod models;

pub use config::MongoConfig;
pub use database::{MovieStore, connect};
pub use errors::StoreError;
pub use models::{Classification, Movie, MovieFilters, MovieUpdate, slugify};
