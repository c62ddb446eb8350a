//! Configuration types for seeding.

use bson::{Document, doc};
use mongodb::{IndexModel, options::IndexOptions};

/// What the seeder provisions. Every value is fixed; [`Default`] holds them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    /// Target database, created by the server on first write.
    pub database: String,

    /// Application user created in the target database.
    pub username: String,

    pub password: String,

    /// Built-in role granted on the target database only.
    pub role: String,

    /// Collection holding the movie documents.
    pub collection: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            database: "fastapi".to_string(),
            username: "admin".to_string(),
            password: "admin123".to_string(),
            role: "readWrite".to_string(),
            collection: "movies".to_string(),
        }
    }
}

impl SeedConfig {
    /// Same values with a different target database.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// The `createUser` command for the application user.
    pub fn create_user_command(&self) -> Document {
        doc! {
            "createUser": self.username.as_str(),
            "pwd": self.password.as_str(),
            "roles": [
                { "role": self.role.as_str(), "db": self.database.as_str() },
            ],
        }
    }
}

/// One index on the movies collection.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSpec {
    pub keys: Document,
    pub unique: bool,
}

impl IndexSpec {
    fn ascending(field: &str) -> Self {
        let mut keys = Document::new();
        keys.insert(field, 1);
        Self {
            keys,
            unique: false,
        }
    }

    /// Server-assigned default name, e.g. `slug_1` or `name_text`.
    pub fn name(&self) -> String {
        self.keys
            .iter()
            .map(|(field, kind)| match kind {
                bson::Bson::String(s) => format!("{field}_{s}"),
                other => format!("{field}_{other}"),
            })
            .collect::<Vec<_>>()
            .join("_")
    }

    pub fn to_model(&self) -> IndexModel {
        let options = self
            .unique
            .then(|| IndexOptions::builder().unique(true).build());
        IndexModel::builder()
            .keys(self.keys.clone())
            .options(options)
            .build()
    }
}

/// Indexes created after the sample movies are inserted, in creation order.
pub fn index_specs() -> Vec<IndexSpec> {
    vec![
        IndexSpec {
            keys: doc! { "slug": 1 },
            unique: true,
        },
        IndexSpec {
            keys: doc! { "name": "text" },
            unique: false,
        },
        IndexSpec::ascending("year"),
        IndexSpec::ascending("genres"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_literals() {
        let config = SeedConfig::default();
        assert_eq!(config.database, "fastapi");
        assert_eq!(config.username, "admin");
        assert_eq!(config.password, "admin123");
        assert_eq!(config.collection, "movies");
    }

    #[test]
    fn test_create_user_command_scopes_role() {
        let cmd = SeedConfig::default()
            .with_database("catalogue")
            .create_user_command();

        assert_eq!(cmd.get_str("createUser").unwrap(), "admin");
        assert_eq!(cmd.get_str("pwd").unwrap(), "admin123");
        let roles = cmd.get_array("roles").unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(
            roles[0].as_document().unwrap(),
            &doc! { "role": "readWrite", "db": "catalogue" }
        );
    }

    #[test]
    fn test_index_specs() {
        let specs = index_specs();
        let names: Vec<String> = specs.iter().map(IndexSpec::name).collect();
        assert_eq!(names, ["slug_1", "name_text", "year_1", "genres_1"]);

        let unique: Vec<bool> = specs.iter().map(|s| s.unique).collect();
        assert_eq!(unique, [true, false, false, false]);
    }

    #[test]
    fn test_unique_option_on_model() {
        let specs = index_specs();
        let slug = specs[0].to_model();
        assert_eq!(slug.options.and_then(|o| o.unique), Some(true));

        let year = specs[2].to_model();
        assert!(year.options.is_none());
    }
}
