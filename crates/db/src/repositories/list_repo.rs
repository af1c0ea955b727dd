//! Repository for the `movie_lists` table and its `list_movie_association`
//! junction.

use moviehub_core::types::DbId;
use sqlx::PgPool;

use crate::models::list::{CreateList, MovieList, MovieListSummary, UpdateList};
use crate::models::movie::Movie;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, owner_id, created_at, updated_at";

/// Unknown movie ids and existing associations are skipped.
const ADD_MOVIES: &str = "INSERT INTO list_movie_association (list_id, movie_id)
     SELECT $1, m.id FROM movies m WHERE m.id = ANY($2)
     ON CONFLICT DO NOTHING";

/// Provides CRUD operations for user movie lists.
pub struct ListRepo;

impl ListRepo {
    /// Insert a new list, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateList) -> Result<MovieList, sqlx::Error> {
        let query = format!(
            "INSERT INTO movie_lists (owner_id, title, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MovieList>(&query)
            .bind(input.owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Insert a list together with its initial movies.
    ///
    /// Runs in a transaction: a failed association insert leaves no list behind.
    pub async fn create_with_movies(
        pool: &PgPool,
        input: &CreateList,
        movie_ids: &[DbId],
    ) -> Result<MovieList, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO movie_lists (owner_id, title, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let list = sqlx::query_as::<_, MovieList>(&query)
            .bind(input.owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        if !movie_ids.is_empty() {
            sqlx::query(ADD_MOVIES)
                .bind(list.id)
                .bind(movie_ids)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(list)
    }

    /// Find a list by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MovieList>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movie_lists WHERE id = $1");
        sqlx::query_as::<_, MovieList>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists owned by a user with their movie counts, oldest first so the
    /// default lists come first.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<MovieListSummary>, sqlx::Error> {
        sqlx::query_as::<_, MovieListSummary>(
            "SELECT l.id, l.title, l.description, l.owner_id,
                    COUNT(a.movie_id) AS movie_count,
                    l.created_at, l.updated_at
             FROM movie_lists l
             LEFT JOIN list_movie_association a ON a.list_id = l.id
             WHERE l.owner_id = $1
             GROUP BY l.id
             ORDER BY l.created_at ASC, l.id ASC",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }

    /// Update a list. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateList,
    ) -> Result<Option<MovieList>, sqlx::Error> {
        let query = format!(
            "UPDATE movie_lists SET
                title = COALESCE($2, title),
                description = COALESCE($3, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MovieList>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a list and its movie associations. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movie_lists WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add existing movies to a list. Unknown ids and movies already in the
    /// list are skipped. Returns the number of newly added movies.
    pub async fn add_movies(
        pool: &PgPool,
        list_id: DbId,
        movie_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(ADD_MOVIES)
            .bind(list_id)
            .bind(movie_ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Remove movies from a list. Returns the number of removed associations.
    pub async fn remove_movies(
        pool: &PgPool,
        list_id: DbId,
        movie_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM list_movie_association WHERE list_id = $1 AND movie_id = ANY($2)",
        )
        .bind(list_id)
        .bind(movie_ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Movies in a list, in the order they were added.
    pub async fn list_movies(pool: &PgPool, list_id: DbId) -> Result<Vec<Movie>, sqlx::Error> {
        sqlx::query_as::<_, Movie>(
            "SELECT m.id, m.kp_id, m.title, m.english_title, m.kp_rating, m.imdb_rating,
                    m.critics_rating, m.site_rating, m.combined_rating, m.sum_votes,
                    m.fees_world, m.budget, m.poster_url, m.movie_length, m.description,
                    m.world_premiere, m.year_release, m.age_rating, m.genres, m.countries,
                    m.persons, m.director, m.created_at, m.updated_at
             FROM list_movie_association a
             JOIN movies m ON m.id = a.movie_id
             WHERE a.list_id = $1
             ORDER BY a.added_at ASC, m.id ASC",
        )
        .bind(list_id)
        .fetch_all(pool)
        .await
    }
}
