//! Database seeding.

use mongodb::{
    Client, Database,
    error::{Error as DriverError, ErrorKind, WriteFailure},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{IndexSpec, SeedConfig, index_specs};
use crate::fixtures::sample_movies;
use movies::{MongoConfig, Movie, StoreError};

const USER_ALREADY_EXISTS: i32 = 51003;
const NAMESPACE_EXISTS: i32 = 48;
const DUPLICATE_KEY: i32 = 11000;
const INDEX_ALREADY_EXISTS: i32 = 68;
const INDEX_OPTIONS_CONFLICT: i32 = 85;
const INDEX_KEY_SPECS_CONFLICT: i32 = 86;

/// The provisioning steps, in the order [`Seeder::seed`] runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStep {
    CreateUser,
    CreateCollection,
    InsertMovies,
    CreateIndexes,
}

/// Seeding failures. Driver-backed variants display the driver's message
/// as is; the variant only tells callers which kind of failure it was.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("{0}")]
    Connection(DriverError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("{0}")]
    CredentialExists(DriverError),
    #[error("{0}")]
    CollectionExists(DriverError),
    #[error("{0}")]
    DuplicateKey(DriverError),
    #[error("{0}")]
    IndexConflict(DriverError),
    #[error(transparent)]
    Database(#[from] DriverError),
}

/// What a failed step's server code means for that step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    CredentialExists,
    CollectionExists,
    DuplicateKey,
    IndexConflict,
    Other,
}

fn failure_for(step: SeedStep, code: Option<i32>) -> Failure {
    match (step, code) {
        (SeedStep::CreateUser, Some(USER_ALREADY_EXISTS)) => Failure::CredentialExists,
        (SeedStep::CreateCollection, Some(NAMESPACE_EXISTS)) => Failure::CollectionExists,
        (_, Some(DUPLICATE_KEY)) => Failure::DuplicateKey,
        (
            SeedStep::CreateIndexes,
            Some(INDEX_ALREADY_EXISTS | INDEX_OPTIONS_CONFLICT | INDEX_KEY_SPECS_CONFLICT),
        ) => Failure::IndexConflict,
        _ => Failure::Other,
    }
}

/// Server error code carried by a command or write failure.
fn server_code(err: &DriverError) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(e) => Some(e.code),
        ErrorKind::Write(WriteFailure::WriteError(e)) => Some(e.code),
        ErrorKind::InsertMany(e) => e
            .write_errors
            .as_ref()
            .and_then(|errors| errors.first())
            .map(|e| e.code),
        _ => None,
    }
}

fn is_connection_failure(err: &DriverError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Io(_)
            | ErrorKind::ServerSelection { .. }
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::Authentication { .. }
            | ErrorKind::ConnectionPoolCleared { .. }
    )
}

impl SeedError {
    /// Classifies a driver error raised while running `step`.
    pub fn at(step: SeedStep, err: DriverError) -> Self {
        if is_connection_failure(&err) {
            return Self::Connection(err);
        }
        match failure_for(step, server_code(&err)) {
            Failure::CredentialExists => Self::CredentialExists(err),
            Failure::CollectionExists => Self::CollectionExists(err),
            Failure::DuplicateKey => Self::DuplicateKey(err),
            Failure::IndexConflict => Self::IndexConflict(err),
            Failure::Other => Self::Database(err),
        }
    }
}

impl From<StoreError> for SeedError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Mongo(e) if matches!(e.kind.as_ref(), ErrorKind::InvalidArgument { .. }) => {
                Self::Config(e.to_string())
            }
            StoreError::Mongo(e) => Self::Connection(e),
            other => Self::Config(other.to_string()),
        }
    }
}

/// What a successful run provisioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub database: String,
    pub user: String,
    pub collection: String,
    pub inserted: usize,
    pub indexes: Vec<String>,
}

/// Provisions the catalogue database with its fixed initial data.
pub struct Seeder {
    client: Client,
    config: SeedConfig,
}

impl Seeder {
    /// Creates a seeder over an already connected client.
    pub fn new(client: Client, config: SeedConfig) -> Self {
        Self { client, config }
    }

    /// Connects using `mongo` and verifies the server answers.
    pub async fn connect(mongo: &MongoConfig, config: SeedConfig) -> Result<Self, SeedError> {
        let client = movies::connect(mongo).await?;
        Ok(Self::new(client, config))
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    /// Handle to the target database. The server creates it on first write.
    pub fn database(&self) -> Database {
        self.client.database(&self.config.database)
    }

    /// Runs every step in order: user, collection, movies, indexes.
    ///
    /// Nothing is checked beforehand and nothing is undone on failure; the
    /// first error aborts the remaining steps.
    pub async fn seed(&self) -> Result<SeedReport, SeedError> {
        info!("Seeding database {}...", self.config.database);

        self.create_user().await?;
        self.create_collection().await?;
        let inserted = self.insert_movies(&sample_movies()).await?;
        let indexes = self.create_indexes(&index_specs()).await?;

        info!("Seeded database {}", self.config.database);
        Ok(SeedReport {
            database: self.config.database.clone(),
            user: self.config.username.clone(),
            collection: self.config.collection.clone(),
            inserted,
            indexes,
        })
    }

    /// Creates the application user with read/write on the target database.
    pub async fn create_user(&self) -> Result<(), SeedError> {
        info!(
            "Creating user {} with role {}...",
            self.config.username, self.config.role
        );

        self.database()
            .run_command(self.config.create_user_command())
            .await
            .map_err(|e| SeedError::at(SeedStep::CreateUser, e))?;

        info!("Created user {}", self.config.username);
        Ok(())
    }

    pub async fn create_collection(&self) -> Result<(), SeedError> {
        info!("Creating collection {}...", self.config.collection);

        self.database()
            .create_collection(&self.config.collection)
            .await
            .map_err(|e| SeedError::at(SeedStep::CreateCollection, e))?;

        info!("Created collection {}", self.config.collection);
        Ok(())
    }

    /// Inserts `movies` in one ordered batch and returns how many landed.
    pub async fn insert_movies(&self, movies: &[Movie]) -> Result<usize, SeedError> {
        info!("Seeding {} movies...", movies.len());

        let result = self
            .database()
            .collection::<Movie>(&self.config.collection)
            .insert_many(movies)
            .await
            .map_err(|e| SeedError::at(SeedStep::InsertMovies, e))?;

        let inserted = result.inserted_ids.len();
        info!("Seeded {} movies", inserted);
        Ok(inserted)
    }

    /// Creates each index in turn, returning the names the server assigned.
    pub async fn create_indexes(&self, specs: &[IndexSpec]) -> Result<Vec<String>, SeedError> {
        info!("Creating {} indexes...", specs.len());

        let collection = self
            .database()
            .collection::<Movie>(&self.config.collection);
        let mut names = Vec::with_capacity(specs.len());

        for spec in specs {
            let result = collection
                .create_index(spec.to_model())
                .await
                .map_err(|e| SeedError::at(SeedStep::CreateIndexes, e))?;
            let expected = spec.name();
            if result.index_name != expected {
                warn!(
                    "Index on {:?} was named {} instead of {}",
                    spec.keys, result.index_name, expected
                );
            }
            info!("  Created index {}", result.index_name);
            names.push(result.index_name);
        }

        info!("Created {} indexes", names.len());
        Ok(names)
    }
}
