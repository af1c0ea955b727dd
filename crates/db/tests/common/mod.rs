//! Seeding helpers shared by the repository integration tests.

#![allow(dead_code)]

use moviehub_db::models::movie::{CreateMovie, Movie};
use moviehub_db::models::review::{CreateReview, Review};
use moviehub_db::models::user::{CreateUser, User};
use moviehub_db::repositories::{MovieRepo, ReviewRepo, UserRepo};
use sqlx::PgPool;

pub async fn seed_user(pool: &PgPool, username: &str) -> User {
    let input = CreateUser {
        email: format!("{username}@example.com"),
        username: username.to_string(),
        hashed_password: "not-a-real-hash".to_string(),
        role: None,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

pub fn new_movie(kp_id: i64, title: &str, rating: Option<f64>, genres: &[&str]) -> CreateMovie {
    CreateMovie {
        kp_id,
        title: title.to_string(),
        site_rating: rating,
        genres: genres.iter().map(|g| g.to_string()).collect(),
        ..Default::default()
    }
}

pub async fn seed_movie(pool: &PgPool, kp_id: i64, title: &str) -> Movie {
    MovieRepo::create(pool, &new_movie(kp_id, title, None, &[]), None)
        .await
        .expect("movie creation should succeed")
}

pub async fn seed_review(pool: &PgPool, author_id: i64, movie_id: i64, rating: i32) -> Review {
    let input = CreateReview {
        author_id,
        movie_id,
        rating,
        content: None,
    };
    ReviewRepo::create(pool, &input)
        .await
        .expect("review creation should succeed")
}

/// Move a row's `created_at` into the past.
pub async fn backdate(pool: &PgPool, table: &str, id: i64, interval: &str) {
    let query = format!("UPDATE {table} SET created_at = NOW() - $2::INTERVAL WHERE id = $1");
    sqlx::query(&query)
        .bind(id)
        .bind(interval)
        .execute(pool)
        .await
        .expect("backdating should succeed");
}
