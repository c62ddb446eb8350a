//! Initial data for the movie catalogue database.
//!
//! Provisions, in order: the application user, the `movies` collection, five
//! sample movies and the collection's indexes. Nothing is checked for prior
//! existence, so running against an already seeded database fails at the
//! first step that collides.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seed_data::prelude::*;
//!
//! let client = movies::connect(&MongoConfig::from_env()?).await?;
//! let report = Seeder::new(client, SeedConfig::default()).seed().await?;
//! assert_eq!(report.inserted, 5);
//! ```

pub mod config;
pub mod db;
pub mod fixtures;

pub use movies::{Classification, Movie, MongoConfig};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{IndexSpec, SeedConfig, index_specs};
    pub use crate::db::{SeedError, SeedReport, SeedStep, Seeder};
    pub use crate::fixtures::{SEED_TIMESTAMP, sample_movies};
    pub use crate::{Classification, MongoConfig, Movie};
}
