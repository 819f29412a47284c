#![allow(dead_code)]

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use tablescope::{ExplorerSettings, Project};
use tempfile::TempDir;

/// A throwaway SQLite database file that lives as long as the fixture
pub struct ShopFixture {
    _dir: TempDir,
    pub path: PathBuf,
}

pub fn settings() -> ExplorerSettings {
    ExplorerSettings {
        default_page_size: 15,
        max_page_size: 100,
        statement_timeout_ms: 5_000,
        connect_timeout_ms: 2_000,
        max_connections: 2,
    }
}

pub fn sqlite_project(id: &str, path: &Path) -> Project {
    Project {
        id: id.to_string(),
        name: format!("Project {}", id),
        db_driver: "sqlite".to_string(),
        db_host: "localhost".to_string(),
        db_database: path.display().to_string(),
        db_username: "reader".to_string(),
        ..Project::default()
    }
}

/// Seed a database with `statements` and close the writer before returning
pub async fn seed(statements: &[String]) -> ShopFixture {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("tenant.db");

    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("failed to open fixture database");

    for statement in statements {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .unwrap_or_else(|e| panic!("fixture statement failed: {statement}: {e}"));
    }
    pool.close().await;

    ShopFixture { _dir: dir, path }
}

/// The shop schema used across the browsing tests
///
/// - `posts.author_id` is a declared constraint; `posts.category_id` is not
/// - `products` declares nothing, so its keys come from naming convention
/// - `logs` has no primary key, `coupons` has a text one
/// - `redemptions.coupon_code` references `coupons` without naming a column
/// - `widgets` holds 40 rows for pagination
pub async fn shop() -> ShopFixture {
    let mut statements: Vec<String> = [
        "CREATE TABLE authors (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
        "CREATE TABLE categories (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
        "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
        r#"CREATE TABLE posts (
            id INTEGER PRIMARY KEY,
            author_id INTEGER REFERENCES authors(id),
            category_id INTEGER,
            title TEXT NOT NULL
        )"#,
        r#"CREATE TABLE products (
            id INTEGER PRIMARY KEY,
            category_id INTEGER,
            person_id INTEGER,
            name TEXT NOT NULL,
            price REAL
        )"#,
        "CREATE TABLE coupons (code TEXT PRIMARY KEY, percent INTEGER NOT NULL)",
        "CREATE TABLE redemptions (id INTEGER PRIMARY KEY, coupon_code TEXT REFERENCES coupons)",
        "CREATE TABLE logs (message TEXT, level TEXT)",
        "CREATE TABLE widgets (id INTEGER PRIMARY KEY, label TEXT NOT NULL)",
        "CREATE TABLE users (id INTEGER PRIMARY KEY, email TEXT NOT NULL, created_at DATETIME)",
        "CREATE TABLE feedback (id INTEGER PRIMARY KEY, user_id INTEGER, body TEXT, created_at DATETIME)",
        "INSERT INTO authors (id, name) VALUES (1, 'Ada'), (2, 'Grace')",
        "INSERT INTO categories (id, name) VALUES (1, 'Tools'), (2, 'Toys')",
        "INSERT INTO people (id, name) VALUES (1, 'Pat')",
        "INSERT INTO posts (id, author_id, category_id, title) VALUES (1, 1, 2, 'Hello'), (2, NULL, 1, 'Anonymous')",
        "INSERT INTO products (id, category_id, person_id, name, price) VALUES (1, 2, 1, 'Kite', 12.5)",
        "INSERT INTO coupons (code, percent) VALUES ('SPRING', 10), ('FALL', 15)",
        "INSERT INTO redemptions (id, coupon_code) VALUES (1, 'SPRING')",
        "INSERT INTO logs (message, level) VALUES ('boot', 'info')",
        r#"INSERT INTO users (id, email, created_at) VALUES
            (1, 'first@example.com', '2024-01-01 09:00:00'),
            (2, 'latest@example.com', '2024-03-01 09:00:00'),
            (3, 'middle@example.com', '2024-02-01 09:00:00')"#,
        r#"INSERT INTO feedback (id, user_id, body, created_at) VALUES
            (1, 1, 'older', '2024-01-05 12:00:00'),
            (2, 2, 'newer', '2024-02-05 12:00:00')"#,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    for i in 1..=40 {
        statements.push(format!("INSERT INTO widgets (id, label) VALUES ({i}, 'widget {i}')"));
    }

    seed(&statements).await
}
