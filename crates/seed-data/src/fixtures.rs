//! The sample movies inserted at seed time.

use bson::DateTime;
use time::{OffsetDateTime, macros::datetime};

use movies::{Classification, Movie};

/// Creation time stamped on every sample movie.
pub const SEED_TIMESTAMP: OffsetDateTime = datetime!(2024-01-01 0:00 UTC);

/// The five sample movies, in insertion order.
pub fn sample_movies() -> Vec<Movie> {
    let created_at = DateTime::from_time_0_3(SEED_TIMESTAMP);

    vec![
        Movie::new(
            "The Shawshank Redemption",
            &["Tim Robbins", "Morgan Freeman", "Bob Gunton", "William Sadler"],
            &["Drama"],
            1994,
            vec![
                Classification::new("US", "R"),
                Classification::new("UK", "15"),
                Classification::new("DE", "12"),
            ],
            created_at,
        ),
        Movie::new(
            "The Godfather",
            &["Marlon Brando", "Al Pacino", "James Caan", "Robert Duvall"],
            &["Crime", "Drama"],
            1972,
            vec![
                Classification::new("US", "R"),
                Classification::new("UK", "18"),
            ],
            created_at,
        ),
        Movie::new(
            "The Dark Knight",
            &["Christian Bale", "Heath Ledger", "Aaron Eckhart", "Michael Caine"],
            &["Action", "Crime", "Drama"],
            2008,
            vec![
                Classification::new("US", "PG-13"),
                Classification::new("UK", "12A"),
            ],
            created_at,
        ),
        Movie::new(
            "Pulp Fiction",
            &["John Travolta", "Uma Thurman", "Samuel L. Jackson", "Bruce Willis"],
            &["Crime", "Drama"],
            1994,
            vec![
                Classification::new("US", "R"),
                Classification::new("UK", "18"),
            ],
            created_at,
        ),
        Movie::new(
            "Inception",
            &["Leonardo DiCaprio", "Marion Cotillard", "Elliot Page", "Tom Hardy"],
            &["Action", "Science Fiction", "Thriller"],
            2010,
            vec![
                Classification::new("US", "PG-13"),
                Classification::new("UK", "12A"),
            ],
            created_at,
        ),
    ]
}
