use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Inserted id is not an ObjectId")]
    NotInserted,
}
