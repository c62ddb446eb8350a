//! Database provisioning for the movie catalogue.
//!
//! The [`Seeder`] runs each provisioning step against MongoDB in a fixed
//! order and stops at the first failure.

mod seeder;

pub use seeder::{SeedError, SeedReport, SeedStep, Seeder};
