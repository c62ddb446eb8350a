use bson::{DateTime, doc, oid::ObjectId};
use mongodb::{
    Client, Collection, Cursor, Database,
    options::{ClientOptions, ReturnDocument},
};
use tracing::{debug, info};

use crate::config::MongoConfig;
use crate::errors::StoreError;
use crate::models::{Movie, MovieFilters, MovieUpdate};

pub const MOVIE_COLLECTION: &str = "movies";

/// Builds a client from `config` and pings the server.
///
/// The driver connects lazily, so the ping is what surfaces an unreachable
/// server or rejected credentials.
pub async fn connect(config: &MongoConfig) -> Result<Client, StoreError> {
    info!("Connecting to database at {}", config.redacted_url());

    let mut options = ClientOptions::parse(&config.url).await?;
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);

    let client = Client::with_options(options)?;
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;

    info!("Database connected");
    Ok(client)
}

/// Read and probe access to the movies collection.
#[derive(Clone)]
pub struct MovieStore {
    collection: Collection<Movie>,
}

impl MovieStore {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, MOVIE_COLLECTION)
    }

    pub fn with_collection(db: &Database, name: &str) -> Self {
        Self {
            collection: db.collection(name),
        }
    }

    /// Looks a movie up by its hex `_id`. Malformed ids find nothing.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Movie>, StoreError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let movie = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(movie)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Movie>, StoreError> {
        let movie = self.collection.find_one(doc! { "slug": slug }).await?;
        Ok(movie)
    }

    /// Full-text search over movie names. Requires the text index on `name`.
    pub async fn search(&self, text: &str) -> Result<Vec<Movie>, StoreError> {
        let cursor = self
            .collection
            .find(doc! { "$text": { "$search": text } })
            .await?;
        collect(cursor).await
    }

    pub async fn list(&self, filters: &MovieFilters) -> Result<Vec<Movie>, StoreError> {
        let cursor = self
            .collection
            .find(filters.query())
            .skip(filters.offset)
            .limit(filters.limit)
            .await?;
        collect(cursor).await
    }

    /// Number of movies matching `filters`; paging is ignored.
    pub async fn count(&self, filters: &MovieFilters) -> Result<u64, StoreError> {
        Ok(self.collection.count_documents(filters.query()).await?)
    }

    /// Applies `update` and returns the movie as stored afterwards.
    ///
    /// Sets `updated_at` to the current time and re-derives the slug when
    /// the name changes. An empty update returns the movie unchanged.
    pub async fn update(&self, id: &str, update: &MovieUpdate) -> Result<Option<Movie>, StoreError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let Some(set) = update.to_set(DateTime::now()) else {
            return self.find_by_id(id).await;
        };

        debug!("Updating movie {id}");
        let movie = self
            .collection
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(movie)
    }

    /// Removes a movie, returning whether one was deleted.
    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(false);
        };
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn insert(&self, movie: &Movie) -> Result<ObjectId, StoreError> {
        let result = self.collection.insert_one(movie).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or(StoreError::NotInserted)
    }

    pub async fn index_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.collection.list_index_names().await?)
    }
}

async fn collect(mut cursor: Cursor<Movie>) -> Result<Vec<Movie>, StoreError> {
    let mut movies = Vec::new();
    while cursor.advance().await? {
        movies.push(cursor.deserialize_current()?);
    }
    Ok(movies)
}
