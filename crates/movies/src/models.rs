use bson::{DateTime, Document, doc, oid::ObjectId};
use deunicode::deunicode;
use serde::{Deserialize, Serialize};

/// Content rating of a movie in one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub country: String,
    pub value: String,
}

impl Classification {
    pub fn new(country: &str, value: &str) -> Self {
        Self {
            country: country.to_string(),
            value: value.to_string(),
        }
    }
}

/// A document in the `movies` collection.
///
/// Field order matches the stored document. `updated_at` is written as an
/// explicit `null` until the movie is first modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub casts: Vec<String>,
    pub genres: Vec<String>,
    pub year: i32,
    pub slug: String,
    pub classification: Vec<Classification>,
    pub created_at: DateTime,
    #[serde(default)]
    pub updated_at: Option<DateTime>,
}

impl Movie {
    pub fn new(
        name: &str,
        casts: &[&str],
        genres: &[&str],
        year: i32,
        classification: Vec<Classification>,
        created_at: DateTime,
    ) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            casts: casts.iter().map(|c| c.to_string()).collect(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            year,
            slug: slugify(name),
            classification,
            created_at,
            updated_at: None,
        }
    }
}

/// Derives the URL-safe identifier of a title.
///
/// Transliterates to ASCII, lower-cases, and collapses every run of other
/// characters (apostrophes included) into a single `-`, with none at either
/// end.
pub fn slugify(name: &str) -> String {
    let ascii = deunicode(name);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Fields of a movie that can be changed after creation.
///
/// Unset fields are left untouched. Changing `name` also changes `slug`.
#[derive(Debug, Clone, Default)]
pub struct MovieUpdate {
    pub name: Option<String>,
    pub casts: Option<Vec<String>>,
    pub genres: Option<Vec<String>>,
    pub year: Option<i32>,
}

impl MovieUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.casts.is_none() && self.genres.is_none() && self.year.is_none()
    }

    /// The `$set` document for this update, stamped with `now`.
    /// `None` when nothing would change.
    pub fn to_set(&self, now: DateTime) -> Option<Document> {
        if self.is_empty() {
            return None;
        }

        let mut set = Document::new();
        if let Some(name) = &self.name {
            let name = name.trim();
            set.insert("name", name);
            set.insert("slug", slugify(name));
        }
        if let Some(casts) = &self.casts {
            set.insert("casts", casts.clone());
        }
        if let Some(genres) = &self.genres {
            set.insert("genres", genres.clone());
        }
        if let Some(year) = self.year {
            set.insert("year", year);
        }
        set.insert("updated_at", now);
        Some(set)
    }
}

/// Listing filters plus paging.
///
/// `title` holds exact names, comma separated. `genres` matches movies
/// carrying any of the given genres; the year bounds are inclusive.
#[derive(Debug, Clone)]
pub struct MovieFilters {
    pub title: String,
    pub genres: Vec<String>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub limit: i64,
    pub offset: u64,
}

impl Default for MovieFilters {
    fn default() -> Self {
        Self {
            title: String::new(),
            genres: Vec::new(),
            year_min: None,
            year_max: None,
            limit: 20,
            offset: 0,
        }
    }
}

impl MovieFilters {
    /// Splits `title` into the individual names to match.
    pub fn titles(&self) -> Vec<String> {
        if self.title.is_empty() {
            return Vec::new();
        }
        self.title
            .replace(", ", ",")
            .split(',')
            .map(str::to_string)
            .collect()
    }

    /// Query document for these filters, ignoring paging.
    pub fn query(&self) -> Document {
        let mut query = Document::new();

        let titles = self.titles();
        if !titles.is_empty() {
            query.insert("name", doc! { "$in": titles });
        }
        if !self.genres.is_empty() {
            query.insert("genres", doc! { "$in": self.genres.clone() });
        }

        let mut year = Document::new();
        if let Some(min) = self.year_min {
            year.insert("$gte", min);
        }
        if let Some(max) = self.year_max {
            year.insert("$lte", max);
        }
        if !year.is_empty() {
            query.insert("year", year);
        }

        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_titles() {
        assert_eq!(slugify("The Dark Knight"), "the-dark-knight");
        assert_eq!(slugify("Inception"), "inception");
        assert_eq!(slugify("  Pulp   Fiction!  "), "pulp-fiction");
        assert_eq!(slugify("Se7en: Director's Cut"), "se7en-director-s-cut");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_slugify_transliterates() {
        assert_eq!(slugify("Amélie"), "amelie");
        assert_eq!(slugify("C'est déjà l'été."), "c-est-deja-l-ete");
        assert_eq!(slugify("Léon: The Professional"), "leon-the-professional");
    }

    #[test]
    fn test_new_movie_derives_slug() {
        let movie = Movie::new(
            "The Godfather",
            &["Marlon Brando"],
            &["Crime", "Drama"],
            1972,
            vec![Classification::new("US", "R")],
            DateTime::from_millis(0),
        );

        assert_eq!(movie.slug, "the-godfather");
        assert!(movie.id.is_none());
        assert!(movie.updated_at.is_none());
    }

    #[test]
    fn test_movie_document_shape() {
        let movie = Movie::new(
            "Inception",
            &["Tom Hardy"],
            &["Action"],
            2010,
            vec![Classification::new("UK", "12A")],
            DateTime::from_millis(0),
        );
        let doc = bson::to_document(&movie).unwrap();

        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "name",
                "casts",
                "genres",
                "year",
                "slug",
                "classification",
                "created_at",
                "updated_at"
            ]
        );
        assert_eq!(doc.get("updated_at"), Some(&bson::Bson::Null));
        assert_eq!(doc.get_i32("year").unwrap(), 2010);
        assert!(doc.get_datetime("created_at").is_ok());
    }

    #[test]
    fn test_update_renames_slug_and_stamps_time() {
        let now = DateTime::from_millis(1_000);
        let update = MovieUpdate {
            name: Some("  The Dark Knight Rises ".to_string()),
            year: Some(2012),
            ..Default::default()
        };
        let set = update.to_set(now).unwrap();

        assert_eq!(set.get_str("name").unwrap(), "The Dark Knight Rises");
        assert_eq!(set.get_str("slug").unwrap(), "the-dark-knight-rises");
        assert_eq!(set.get_i32("year").unwrap(), 2012);
        assert_eq!(set.get_datetime("updated_at").unwrap(), &now);
        assert!(!set.contains_key("casts"));
        assert!(!set.contains_key("genres"));
    }

    #[test]
    fn test_update_without_name_keeps_slug() {
        let update = MovieUpdate {
            genres: Some(vec!["Drama".to_string()]),
            ..Default::default()
        };
        let set = update.to_set(DateTime::from_millis(0)).unwrap();
        assert!(!set.contains_key("slug"));
        assert!(set.contains_key("updated_at"));

        assert!(MovieUpdate::default().to_set(DateTime::from_millis(0)).is_none());
    }

    #[test]
    fn test_filter_titles() {
        let filters = MovieFilters {
            title: "Inception, The Godfather,Pulp Fiction".to_string(),
            ..Default::default()
        };
        assert_eq!(
            filters.titles(),
            ["Inception", "The Godfather", "Pulp Fiction"]
        );
        assert!(MovieFilters::default().titles().is_empty());
    }

    #[test]
    fn test_filter_query() {
        assert!(MovieFilters::default().query().is_empty());

        let filters = MovieFilters {
            genres: vec!["Action".to_string()],
            year_min: Some(2000),
            year_max: Some(2009),
            ..Default::default()
        };
        assert_eq!(
            filters.query(),
            doc! {
                "genres": { "$in": ["Action"] },
                "year": { "$gte": 2000, "$lte": 2009 },
            }
        );

        let only_min = MovieFilters {
            year_min: Some(1990),
            ..Default::default()
        };
        assert_eq!(only_min.query(), doc! { "year": { "$gte": 1990 } });
    }
}
