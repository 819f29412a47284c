mod common;

use common::settings;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tablescope::error::sanitize;
use tablescope::{CellValue, ForeignKeyTarget, PageRequest, Project, ProjectDatabase};
use testcontainers::{runners::AsyncRunner, GenericImage, ImageExt};

const ROOT_PASSWORD: &str = "secret";

fn mysql_project(id: &str, port: u16, password: &str) -> Project {
    Project {
        id: id.to_string(),
        name: format!("Project {}", id),
        db_driver: "mysql".to_string(),
        db_host: "127.0.0.1".to_string(),
        db_port: Some(port),
        db_database: "shop".to_string(),
        db_username: "root".to_string(),
        db_password: password.to_string(),
        ..Project::default()
    }
}

async fn connect_with_retries(url: &str) -> MySqlPool {
    let mut retries = 20;
    loop {
        match MySqlPoolOptions::new().max_connections(1).connect(url).await {
            Ok(pool) => break pool,
            Err(e) if retries > 0 => {
                retries -= 1;
                println!("MySQL not ready yet, retrying in 2s... ({} retries left): {}", retries, e);
                tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;
            }
            Err(e) => panic!("Failed to connect to MySQL: {}", e),
        }
    }
}

async fn seed(pool: &MySqlPool) {
    let mut statements: Vec<String> = [
        "CREATE TABLE authors (id INT PRIMARY KEY, name VARCHAR(64) NOT NULL) ENGINE=InnoDB",
        "CREATE TABLE categories (id INT PRIMARY KEY, name VARCHAR(64) NOT NULL) ENGINE=InnoDB",
        r#"CREATE TABLE posts (
            id INT PRIMARY KEY,
            author_id INT NULL,
            category_id INT NULL,
            title VARCHAR(128) NOT NULL,
            CONSTRAINT fk_posts_author FOREIGN KEY (author_id) REFERENCES authors (id)
        ) ENGINE=InnoDB"#,
        "CREATE TABLE products (id INT PRIMARY KEY, category_id INT, name VARCHAR(64)) ENGINE=InnoDB",
        "CREATE TABLE coupons (code VARCHAR(16) PRIMARY KEY, percent INT NOT NULL) ENGINE=InnoDB",
        "CREATE TABLE logs (message TEXT, level VARCHAR(16)) ENGINE=InnoDB",
        "CREATE TABLE widgets (id INT PRIMARY KEY, label VARCHAR(32) NOT NULL) ENGINE=InnoDB",
        r#"CREATE TABLE users (
            id INT PRIMARY KEY,
            email VARCHAR(128) NOT NULL,
            active TINYINT(1) NOT NULL,
            visits INT UNSIGNED NOT NULL,
            settings JSON,
            created_at DATETIME NOT NULL
        ) ENGINE=InnoDB"#,
        "INSERT INTO authors (id, name) VALUES (1, 'Ada'), (2, 'Grace')",
        "INSERT INTO categories (id, name) VALUES (1, 'Tools'), (2, 'Toys')",
        "INSERT INTO posts (id, author_id, category_id, title) VALUES (1, 1, 2, 'Hello'), (2, NULL, 1, 'Anonymous')",
        "INSERT INTO products (id, category_id, name) VALUES (1, 2, 'Kite')",
        "INSERT INTO coupons (code, percent) VALUES ('SPRING', 10), ('FALL', 15)",
        "INSERT INTO logs (message, level) VALUES ('boot', 'info')",
        r#"INSERT INTO users (id, email, active, visits, settings, created_at) VALUES
            (1, 'first@example.com', 1, 3, '{"theme": "dark"}', '2024-01-01 09:00:00'),
            (2, 'latest@example.com', 0, 4000000000, NULL, '2024-03-01 09:00:00')"#,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    for i in 1..=40 {
        statements.push(format!("INSERT INTO widgets (id, label) VALUES ({i}, 'widget {i}')"));
    }

    for statement in &statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .unwrap_or_else(|e| panic!("fixture statement failed: {statement}: {e}"));
    }
}

/// Full browsing pass against a real MySQL server
///
/// Needs a Docker daemon; skipped when no container can be started.
#[tokio::test]
async fn browsing_a_mysql_project() {
    let container = match GenericImage::new("mysql", "8.0")
        .with_env_var("MYSQL_ROOT_PASSWORD", ROOT_PASSWORD)
        .with_env_var("MYSQL_DATABASE", "shop")
        .start()
        .await
    {
        Ok(container) => container,
        Err(e) => {
            println!("⏭️  Skipping browsing_a_mysql_project: could not start MySQL container: {}", e);
            return;
        }
    };

    let port = container
        .get_host_port_ipv4(3306)
        .await
        .expect("Failed to get mysql port");

    let admin = connect_with_retries(&format!(
        "mysql://root:{}@127.0.0.1:{}/shop",
        ROOT_PASSWORD, port
    ))
    .await;
    seed(&admin).await;
    admin.close().await;

    let db = ProjectDatabase::new(mysql_project("shop", port, ROOT_PASSWORD), settings());

    let status = db.test_connection().await;
    assert!(status.connected, "connection test failed: {:?}", status.error);

    // catalog is scoped to the selected schema, in name order
    let tables = db.tables().await.expect("tables");
    assert_eq!(
        tables,
        ["authors", "categories", "coupons", "logs", "posts", "products", "users", "widgets"]
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
    );
    assert_eq!(
        db.table_columns("posts").await.expect("columns"),
        vec!["id", "author_id", "category_id", "title"]
    );

    // LIMIT/OFFSET window with exact total
    let page = db
        .table_page("widgets", PageRequest::new(15, 2).expect("request"))
        .await
        .expect("page");
    assert_eq!(page.total, 40);
    assert_eq!(page.last_page, 3);
    assert_eq!(page.rows.len(), 15);
    assert_eq!(page.rows[0].get("id"), Some(&CellValue::Int(16)));
    assert_eq!(page.rows[14].get("id"), Some(&CellValue::Int(30)));

    // primary keys from KEY_COLUMN_USAGE, `id` when none is declared
    assert_eq!(db.primary_key("coupons").await.expect("pk").as_deref(), Some("code"));
    assert_eq!(db.primary_key("widgets").await.expect("pk").as_deref(), Some("id"));
    assert_eq!(db.primary_key("logs").await.expect("pk").as_deref(), Some("id"));

    // a declared constraint suppresses inference for the whole table
    let fks = db.foreign_keys("posts").await.expect("foreign keys");
    assert_eq!(fks.len(), 1);
    assert_eq!(fks.get("author_id"), Some(&ForeignKeyTarget::new("authors", "id")));

    let fks = db.foreign_keys("products").await.expect("foreign keys");
    assert_eq!(
        fks.get("category_id"),
        Some(&ForeignKeyTarget::new("categories", "id"))
    );

    let view = db.record("posts", "1").await.expect("record").expect("found");
    assert_eq!(view.links.get("author_id").map(|l| l.value.as_str()), Some("1"));
    assert!(db.record("posts", "999").await.expect("record").is_none());

    // newest first, with typed cells
    let users = db
        .users_page(PageRequest::first(15).expect("request"))
        .await
        .expect("users");
    let latest = &users.rows[0];
    assert_eq!(
        latest.get("email"),
        Some(&CellValue::Text("latest@example.com".to_string()))
    );
    assert_eq!(latest.get("active"), Some(&CellValue::Bool(false)));
    assert_eq!(latest.get("visits"), Some(&CellValue::UInt(4_000_000_000)));
    assert_eq!(latest.get("settings"), Some(&CellValue::Null));
    assert!(matches!(latest.get("created_at"), Some(CellValue::DateTime(_))));
    assert!(matches!(users.rows[1].get("settings"), Some(CellValue::Json(_))));

    db.close().await;

    // bad credentials come back categorised, never echoed
    let db = ProjectDatabase::new(mysql_project("locked", port, "wrong-password"), settings());
    let status = db.test_connection().await;
    assert!(!status.connected);
    let message = status.error.expect("error message");
    assert_eq!(message, sanitize::ACCESS_DENIED);
    assert!(!message.contains("root"));
    db.close().await;
}
