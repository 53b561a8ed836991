//! Integration tests for news-report.
//!
//! Each test creates `log`, `articles` and `authors` as temporary tables on
//! its own connection, so nothing outside the session is touched.

pub mod connection_test;
pub mod reports_test;

use async_trait::async_trait;
use news_report::config::ConnectionConfig;
use news_report::db::{Connector, DatabaseClient, PostgresClient};
use news_report::error::{ReportError, Result};
use news_report::report::ReportExecutor;
use sqlx::{Connection, PgConnection};
use std::sync::Mutex;

pub const SCHEMA: &str = r#"
CREATE TEMP TABLE authors (id integer PRIMARY KEY, name text NOT NULL);
CREATE TEMP TABLE articles (
    author integer NOT NULL REFERENCES pg_temp.authors (id),
    title text NOT NULL,
    slug text UNIQUE NOT NULL
);
CREATE TEMP TABLE log (
    id serial PRIMARY KEY,
    time timestamp NOT NULL DEFAULT '2016-07-01 12:00:00',
    path text NOT NULL,
    method text NOT NULL,
    status text NOT NULL
);
"#;

/// Two articles by two authors, viewed a, a, b, plus requests that must not count.
pub const VIEWS_FIXTURE: &str = r#"
INSERT INTO authors (id, name) VALUES (1, 'Alice'), (2, 'Bob');
INSERT INTO articles (author, title, slug) VALUES (1, 'Title A', 'a'), (2, 'Title B', 'b');
INSERT INTO log (path, method, status) VALUES
    ('/article/a', 'GET', '200 OK'),
    ('/article/a', 'GET', '200 OK'),
    ('/article/b', 'GET', '200 OK');
INSERT INTO log (path, method, status)
SELECT '/article/b', 'POST', '200 OK' FROM generate_series(1, 5);
INSERT INTO log (path, method, status)
SELECT '/article/b', 'GET', '404 NOT FOUND' FROM generate_series(1, 5);
INSERT INTO log (path, method, status)
SELECT '/article/b-draft', 'GET', '200 OK' FROM generate_series(1, 5);
"#;

/// Day 1: 2 of 10 requests 404; day 2: none of 10; day 3: exactly 1 of 100.
pub const ERRORS_FIXTURE: &str = r#"
INSERT INTO log (time, path, method, status)
SELECT '2016-07-01 08:00:00'::timestamp + n * interval '1 minute', '/', 'GET',
       CASE WHEN n <= 2 THEN '404 NOT FOUND' ELSE '200 OK' END
FROM generate_series(1, 10) AS n;
INSERT INTO log (time, path, method, status)
SELECT '2016-07-02 08:00:00'::timestamp, '/', 'GET', '200 OK'
FROM generate_series(1, 10);
INSERT INTO log (time, path, method, status)
SELECT '2016-07-03 08:00:00'::timestamp, '/article/a', 'GET',
       CASE WHEN n = 1 THEN '404 NOT FOUND' ELSE '200 OK' END
FROM generate_series(1, 100) AS n;
"#;

/// Opens a connection with the schema and `fixture` loaded, or `None`
/// when DATABASE_URL is not set.
pub async fn seeded_connection(fixture: &str) -> Option<PgConnection> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let mut conn = PgConnection::connect(&url).await.ok()?;
    sqlx::raw_sql(SCHEMA).execute(&mut conn).await.unwrap();
    if !fixture.trim().is_empty() {
        sqlx::raw_sql(fixture).execute(&mut conn).await.unwrap();
    }
    Some(conn)
}

/// Hands out one pre-seeded connection, so the executor sees the temp tables.
pub struct SeededConnector {
    conn: Mutex<Option<PgConnection>>,
}

impl SeededConnector {
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
        }
    }
}

#[async_trait]
impl Connector for SeededConnector {
    async fn connect(&self, _config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
        let conn = self
            .conn
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| ReportError::connection("seeded connection already used"))?;
        Ok(Box::new(PostgresClient::from_connection(conn)))
    }
}

/// Builds an executor that runs against `conn`.
pub fn seeded_executor(conn: PgConnection) -> ReportExecutor {
    ReportExecutor::with_connector(
        ConnectionConfig::local_default(),
        Box::new(SeededConnector::new(conn)),
    )
}
