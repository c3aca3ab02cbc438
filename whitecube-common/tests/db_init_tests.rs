//! Database initialization tests

use whitecube_common::db;

#[tokio::test]
async fn init_creates_all_tables() {
    let pool = db::connect_memory().await.expect("connect failed");

    for table in [
        "exhibitions",
        "exhibition_images",
        "artists",
        "artworks",
        "news_posts",
        "videos",
        "newsletter_subscribers",
    ] {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .expect("sqlite_master query failed");
        assert_eq!(count.0, 1, "missing table: {}", table);
    }
}

#[tokio::test]
async fn file_backed_pool_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let db_path = dir.path().join("nested").join("whitecube.db");

    {
        let pool = db::init_database_pool(&db_path).await.expect("init failed");
        sqlx::query("INSERT INTO newsletter_subscribers (id, email, subscribed_at) VALUES ('s1', 'a@b.c', '2025-01-01T00:00:00Z')")
            .execute(&pool)
            .await
            .expect("insert failed");
        pool.close().await;
    }

    let pool = db::init_database_pool(&db_path).await.expect("reopen failed");
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM newsletter_subscribers")
        .fetch_one(&pool)
        .await
        .expect("count failed");
    assert_eq!(count.0, 1);
}

#[tokio::test]
async fn init_tables_is_idempotent() {
    let pool = db::connect_memory().await.expect("connect failed");
    db::init_tables(&pool).await.expect("second init failed");
}

#[tokio::test]
async fn poster_uniqueness_is_enforced_by_schema() {
    let pool = db::connect_memory().await.expect("connect failed");

    sqlx::query(
        "INSERT INTO exhibitions (id, title, artist_name, start_date, end_date, status, slug, created_at, updated_at)
         VALUES ('e1', 'Show', 'Someone', '2025-01-01', '2025-02-01', 'live', 'show', '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z')",
    )
    .execute(&pool)
    .await
    .expect("exhibition insert failed");

    sqlx::query(
        "INSERT INTO exhibition_images (id, exhibition_id, image_url, image_type, created_at)
         VALUES ('i1', 'e1', 'https://cdn/x.jpg', 'poster', '2025-01-01T00:00:00Z')",
    )
    .execute(&pool)
    .await
    .expect("first poster insert failed");

    let second = sqlx::query(
        "INSERT INTO exhibition_images (id, exhibition_id, image_url, image_type, created_at)
         VALUES ('i2', 'e1', 'https://cdn/y.jpg', 'poster', '2025-01-01T00:00:00Z')",
    )
    .execute(&pool)
    .await;

    assert!(second.is_err(), "second poster for same exhibition must be rejected");
}

#[tokio::test]
async fn referential_integrity_is_enforced() {
    let pool = db::connect_memory().await.expect("connect failed");

    let orphan = sqlx::query(
        "INSERT INTO exhibition_images (id, exhibition_id, image_url, image_type, created_at)
         VALUES ('i1', 'no-such-exhibition', 'https://cdn/x.jpg', 'artwork', '2025-01-01T00:00:00Z')",
    )
    .execute(&pool)
    .await;

    assert!(orphan.is_err(), "image without an exhibition must be rejected");
}
