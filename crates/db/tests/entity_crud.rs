//! Repository integration tests for users, movies, reviews and lists.

mod common;

use assert_matches::assert_matches;
use common::{new_movie, seed_movie, seed_review, seed_user};
use moviehub_core::search::MovieSort;
use moviehub_db::models::list::{CreateList, UpdateList};
use moviehub_db::models::movie::MovieFilter;
use moviehub_db::models::review::{CreateReview, UpdateReview};
use moviehub_db::models::user::{CreateUser, UpdateUser};
use moviehub_db::repositories::{ListRepo, MovieRepo, ReviewRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_defaults_to_user_role(pool: PgPool) {
    let user = seed_user(&pool, "alice").await;
    assert_eq!(user.role, "user");
    assert!(user.is_active);

    let found = UserRepo::find_by_email(&pool, "alice@example.com")
        .await
        .unwrap()
        .expect("user should be found by email");
    assert_eq!(found.id, user.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_violates_unique_constraint(pool: PgPool) {
    seed_user(&pool, "alice").await;
    let input = CreateUser {
        email: "alice@example.com".to_string(),
        username: "alice2".to_string(),
        hashed_password: "x".to_string(),
        role: None,
    };
    let err = UserRepo::create(&pool, &input).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(db) if db.constraint() == Some("uq_users_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_update_applies_only_given_fields(pool: PgPool) {
    let user = seed_user(&pool, "bob").await;
    let update = UpdateUser {
        role: Some("admin".to_string()),
        ..Default::default()
    };
    let updated = UserRepo::update(&pool, user.id, &update)
        .await
        .unwrap()
        .expect("user exists");
    assert_eq!(updated.role, "admin");
    assert_eq!(updated.username, "bob");

    assert!(UserRepo::update(&pool, 999_999, &update).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn activity_counts_aggregate_reviews_and_lists(pool: PgPool) {
    let user = seed_user(&pool, "carol").await;
    let m1 = seed_movie(&pool, 1, "Dune").await;
    let m2 = seed_movie(&pool, 2, "Arrival").await;
    seed_review(&pool, user.id, m1.id, 8).await;
    seed_review(&pool, user.id, m2.id, 5).await;
    ListRepo::create(
        &pool,
        &CreateList {
            owner_id: user.id,
            title: "Sci-fi".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();

    let counts = UserRepo::activity_counts(&pool, user.id).await.unwrap();
    assert_eq!(counts.reviews_count, 2);
    assert_eq!(counts.lists_count, 1);
    assert_eq!(counts.average_rating, Some(6.5));

    let empty = UserRepo::activity_counts(&pool, 999_999).await.unwrap();
    assert_eq!(empty.reviews_count, 0);
    assert_eq!(empty.average_rating, None);
}

// ---------------------------------------------------------------------------
// Movies
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn movie_list_filters_and_sorts(pool: PgPool) {
    MovieRepo::create(&pool, &new_movie(1, "Dune", Some(8.0), &["фантастика"]), Some(8.0))
        .await
        .unwrap();
    MovieRepo::create(&pool, &new_movie(2, "Arrival", Some(7.5), &["фантастика", "драма"]), Some(7.5))
        .await
        .unwrap();
    MovieRepo::create(&pool, &new_movie(3, "Amelie", Some(7.9), &["комедия"]), Some(7.9))
        .await
        .unwrap();

    let filter = MovieFilter {
        genre: Some("фантастика".to_string()),
        ..Default::default()
    };
    let movies = MovieRepo::list(&pool, &filter, 10, 0).await.unwrap();
    let titles: Vec<_> = movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Dune", "Arrival"]);

    let filter = MovieFilter {
        min_rating: Some(7.8),
        sort: MovieSort::Title,
        ..Default::default()
    };
    let movies = MovieRepo::list(&pool, &filter, 10, 0).await.unwrap();
    let titles: Vec<_> = movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Amelie", "Dune"]);

    let filter = MovieFilter {
        title_query: Some("ARR".to_string()),
        ..Default::default()
    };
    let movies = MovieRepo::list(&pool, &filter, 10, 0).await.unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].kp_id, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn movie_search_treats_wildcards_literally(pool: PgPool) {
    seed_movie(&pool, 1, "100% Wolf").await;
    seed_movie(&pool, 2, "Wolf Children").await;

    let found = MovieRepo::search(&pool, "100%", 10, 0).await.unwrap();
    assert_eq!(found.len(), 1);

    let found = MovieRepo::search(&pool, "%", 10, 0).await.unwrap();
    assert_eq!(found.len(), 1, "'%' must not match every title");

    let found = MovieRepo::search(&pool, "wolf", 10, 0).await.unwrap();
    assert_eq!(found.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn similar_movies_prefer_links_then_genre(pool: PgPool) {
    let dune = MovieRepo::create(&pool, &new_movie(1, "Dune", None, &["фантастика"]), None)
        .await
        .unwrap();
    let arrival =
        MovieRepo::create(&pool, &new_movie(2, "Arrival", None, &["фантастика"]), Some(7.5))
            .await
            .unwrap();
    let amelie = MovieRepo::create(&pool, &new_movie(3, "Amelie", None, &["комедия"]), Some(7.9))
        .await
        .unwrap();

    let linked = MovieRepo::list_linked_similar(&pool, dune.id, 10).await.unwrap();
    assert!(linked.is_empty());

    let by_genre = MovieRepo::list_same_genre(&pool, dune.id, Some("фантастика"), 10)
        .await
        .unwrap();
    assert_eq!(by_genre.len(), 1);
    assert_eq!(by_genre[0].id, arrival.id);

    MovieRepo::link_similar(&pool, dune.id, amelie.id).await.unwrap();
    MovieRepo::link_similar(&pool, dune.id, amelie.id).await.unwrap();
    let linked = MovieRepo::list_linked_similar(&pool, dune.id, 10).await.unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].id, amelie.id);
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_review_for_same_movie_is_rejected(pool: PgPool) {
    let user = seed_user(&pool, "dave").await;
    let movie = seed_movie(&pool, 1, "Dune").await;
    seed_review(&pool, user.id, movie.id, 9).await;

    let again = CreateReview {
        author_id: user.id,
        movie_id: movie.id,
        rating: 3,
        content: None,
    };
    let err = ReviewRepo::create(&pool, &again).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(db) if db.constraint() == Some("uq_reviews_author_movie"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn review_update_and_delete(pool: PgPool) {
    let user = seed_user(&pool, "erin").await;
    let movie = seed_movie(&pool, 1, "Dune").await;
    let review = seed_review(&pool, user.id, movie.id, 4).await;

    let updated = ReviewRepo::update(
        &pool,
        review.id,
        &UpdateReview {
            content: Some("Better on rewatch".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("review exists");
    assert_eq!(updated.rating, 4);
    assert_eq!(updated.content.as_deref(), Some("Better on rewatch"));

    assert_eq!(ReviewRepo::list_by_movie(&pool, movie.id, 50, 0).await.unwrap().len(), 1);
    assert!(ReviewRepo::delete(&pool, review.id).await.unwrap());
    assert!(!ReviewRepo::delete(&pool, review.id).await.unwrap());
    assert!(ReviewRepo::list_by_author(&pool, user.id, 50, 0).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_movies_add_is_idempotent_and_skips_unknown(pool: PgPool) {
    let user = seed_user(&pool, "frank").await;
    let m1 = seed_movie(&pool, 1, "Dune").await;
    let m2 = seed_movie(&pool, 2, "Arrival").await;
    let list = ListRepo::create(
        &pool,
        &CreateList {
            owner_id: user.id,
            title: "Watch later".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();

    let added = ListRepo::add_movies(&pool, list.id, &[m1.id, m2.id, 999_999]).await.unwrap();
    assert_eq!(added, 2);
    let added = ListRepo::add_movies(&pool, list.id, &[m1.id]).await.unwrap();
    assert_eq!(added, 0);

    let summaries = ListRepo::list_by_owner(&pool, user.id).await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].movie_count, 2);

    let removed = ListRepo::remove_movies(&pool, list.id, &[m1.id]).await.unwrap();
    assert_eq!(removed, 1);
    let movies = ListRepo::list_movies(&pool, list.id).await.unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].id, m2.id);

    let renamed = ListRepo::update(
        &pool,
        list.id,
        &UpdateList {
            title: Some("Queue".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("list exists");
    assert_eq!(renamed.title, "Queue");

    assert!(ListRepo::delete(&pool, list.id).await.unwrap());
    assert!(ListRepo::find_by_id(&pool, list.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_created_with_movies_is_atomic(pool: PgPool) {
    let user = seed_user(&pool, "grace").await;
    let m1 = seed_movie(&pool, 1, "Dune").await;
    let input = CreateList {
        owner_id: user.id,
        title: "Favourites".to_string(),
        description: None,
    };

    let list = ListRepo::create_with_movies(&pool, &input, &[m1.id, 999_999]).await.unwrap();
    let movies = ListRepo::list_movies(&pool, list.id).await.unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].id, m1.id);

    sqlx::query("DROP TABLE list_movie_association").execute(&pool).await.unwrap();
    let result = ListRepo::create_with_movies(&pool, &input, &[m1.id]).await;
    assert_matches!(result, Err(sqlx::Error::Database(_)));

    let owned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movie_lists WHERE owner_id = $1")
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(owned, 1);
}
