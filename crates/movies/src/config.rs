//! Connection settings read from the environment.

use std::env;

use crate::errors::StoreError;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 27017;
const DEFAULT_DB: &str = "fastapi";
const DEFAULT_POOL_SIZE: u32 = 10;

/// Where and how to connect to MongoDB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoConfig {
    /// Full connection string.
    pub url: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
}

impl MongoConfig {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// `MONGODB_URL` wins when present; otherwise the URL is assembled from
    /// `MONGO_HOST`, `MONGO_PORT`, `MONGO_USER`, `MONGO_PASSWORD` and
    /// `MONGO_DB`. Credentials are only included when both are non-empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StoreError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let url = match non_empty("MONGODB_URL") {
            Some(url) => url,
            None => {
                let host = non_empty("MONGO_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
                let port = match non_empty("MONGO_PORT") {
                    Some(p) => p.parse::<u16>().map_err(|_| {
                        StoreError::InvalidConfig(format!("MONGO_PORT is not a port: {p}"))
                    })?,
                    None => DEFAULT_PORT,
                };
                let db = non_empty("MONGO_DB").unwrap_or_else(|| DEFAULT_DB.to_string());

                match (non_empty("MONGO_USER"), non_empty("MONGO_PASSWORD")) {
                    (Some(user), Some(pass)) => {
                        format!("mongodb://{user}:{pass}@{host}:{port}/{db}")
                    }
                    _ => format!("mongodb://{host}:{port}/{db}"),
                }
            }
        };

        let pool_size = |key: &str| -> Result<u32, StoreError> {
            match non_empty(key) {
                Some(v) => v
                    .parse()
                    .map_err(|_| StoreError::InvalidConfig(format!("{key} is not a number: {v}"))),
                None => Ok(DEFAULT_POOL_SIZE),
            }
        };

        let max_pool_size = pool_size("MAX_CONNECTIONS_COUNT")?;
        let min_pool_size = pool_size("MIN_CONNECTIONS_COUNT")?;
        if min_pool_size > max_pool_size {
            return Err(StoreError::InvalidConfig(format!(
                "MIN_CONNECTIONS_COUNT ({min_pool_size}) exceeds MAX_CONNECTIONS_COUNT ({max_pool_size})"
            )));
        }

        Ok(Self {
            url,
            max_pool_size,
            min_pool_size,
        })
    }

    /// The connection string with any password masked, for logging.
    pub fn redacted_url(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        match rest.split_once('@') {
            Some((userinfo, host)) => {
                let user = userinfo.split(':').next().unwrap_or_default();
                format!("{scheme}://{user}:***@{host}")
            }
            None => self.url.clone(),
        }
    }
}
