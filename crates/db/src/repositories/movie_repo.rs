//! Repository for the `movies` table and the `movie_similarities` junction.

use moviehub_core::search::escape_like;
use moviehub_core::types::DbId;
use sqlx::PgPool;

use crate::models::movie::{CreateMovie, Movie, MovieFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, kp_id, title, english_title, kp_rating, imdb_rating, critics_rating, \
                       site_rating, combined_rating, sum_votes, fees_world, budget, poster_url, \
                       movie_length, description, world_premiere, year_release, age_rating, \
                       genres, countries, persons, director, created_at, updated_at";

/// Same columns qualified with the `m` alias, for joins.
const M_COLUMNS: &str = "m.id, m.kp_id, m.title, m.english_title, m.kp_rating, m.imdb_rating, \
                         m.critics_rating, m.site_rating, m.combined_rating, m.sum_votes, \
                         m.fees_world, m.budget, m.poster_url, m.movie_length, m.description, \
                         m.world_premiere, m.year_release, m.age_rating, m.genres, m.countries, \
                         m.persons, m.director, m.created_at, m.updated_at";

/// Provides catalog queries for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a new movie with an already-derived `combined_rating`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateMovie,
        combined_rating: Option<f64>,
    ) -> Result<Movie, sqlx::Error> {
        let query = format!(
            "INSERT INTO movies (kp_id, title, english_title, kp_rating, imdb_rating,
                critics_rating, site_rating, combined_rating, sum_votes, fees_world, budget,
                poster_url, movie_length, description, world_premiere, year_release, age_rating,
                genres, countries, persons, director)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                $17, $18, $19, $20, $21)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(input.kp_id)
            .bind(&input.title)
            .bind(&input.english_title)
            .bind(input.kp_rating)
            .bind(input.imdb_rating)
            .bind(input.critics_rating)
            .bind(input.site_rating)
            .bind(combined_rating)
            .bind(input.sum_votes)
            .bind(input.fees_world)
            .bind(input.budget)
            .bind(&input.poster_url)
            .bind(input.movie_length)
            .bind(&input.description)
            .bind(input.world_premiere)
            .bind(input.year_release)
            .bind(input.age_rating)
            .bind(&input.genres)
            .bind(&input.countries)
            .bind(&input.persons)
            .bind(&input.director)
            .fetch_one(pool)
            .await
    }

    /// Find a movie by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a movie by its Kinopoisk identifier.
    pub async fn find_by_kp_id(pool: &PgPool, kp_id: i64) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE kp_id = $1");
        sqlx::query_as::<_, Movie>(&query)
            .bind(kp_id)
            .fetch_optional(pool)
            .await
    }

    /// List movies matching `filter`, ordered by `filter.sort`.
    pub async fn list(
        pool: &PgPool,
        filter: &MovieFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies
             WHERE ($1::TEXT IS NULL OR $1 = ANY(genres))
               AND ($2::INT IS NULL OR year_release = $2)
               AND ($3::FLOAT8 IS NULL OR combined_rating >= $3)
               AND ($4::TEXT IS NULL OR title ILIKE '%' || $4 || '%')
             ORDER BY {}
             LIMIT $5 OFFSET $6",
            filter.sort.order_clause()
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(&filter.genre)
            .bind(filter.year)
            .bind(filter.min_rating)
            .bind(filter.title_query.as_deref().map(escape_like))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive title search (Russian or English title).
    pub async fn search(
        pool: &PgPool,
        query_text: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies
             WHERE title ILIKE '%' || $1 || '%' OR english_title ILIKE '%' || $1 || '%'
             ORDER BY combined_rating DESC NULLS LAST, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(escape_like(query_text))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Movies explicitly linked as similar to `movie_id`, best rated first.
    pub async fn list_linked_similar(
        pool: &PgPool,
        movie_id: DbId,
        limit: i64,
    ) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {M_COLUMNS} FROM movie_similarities s
             JOIN movies m ON m.id = s.similar_movie_id
             WHERE s.movie_id = $1
             ORDER BY m.combined_rating DESC NULLS LAST, m.id ASC
             LIMIT $2"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(movie_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Other movies sharing `genre` (any movie when `genre` is `None`),
    /// best rated first.
    pub async fn list_same_genre(
        pool: &PgPool,
        movie_id: DbId,
        genre: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies
             WHERE id <> $1
               AND ($2::TEXT IS NULL OR $2 = ANY(genres))
             ORDER BY combined_rating DESC NULLS LAST, id ASC
             LIMIT $3"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(movie_id)
            .bind(genre)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Record that `similar_movie_id` is similar to `movie_id`.
    ///
    /// Idempotent: linking an existing pair is a no-op.
    pub async fn link_similar(
        pool: &PgPool,
        movie_id: DbId,
        similar_movie_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO movie_similarities (movie_id, similar_movie_id)
             VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(movie_id)
        .bind(similar_movie_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
