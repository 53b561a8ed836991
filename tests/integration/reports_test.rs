//! Catalog reports run end to end against seeded data.

use super::{seeded_connection, seeded_executor, ERRORS_FIXTURE, VIEWS_FIXTURE};
use news_report::db::{DatabaseClient, PostgresClient};
use news_report::report::catalog::{ERROR_DAYS, TOP_ARTICLES, TOP_AUTHORS};
use news_report::report::ReportDefinition;
use pretty_assertions::assert_eq;

async fn run_report(report: &ReportDefinition, fixture: &str) -> Option<String> {
    let conn = seeded_connection(fixture).await?;
    let mut out = Vec::new();
    seeded_executor(conn).run(report, &mut out).await.unwrap();
    Some(String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_top_articles() {
    let Some(output) = run_report(&TOP_ARTICLES, VIEWS_FIXTURE).await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    assert_eq!(output, "\nTitle A - 2\nTitle B - 1\n\n");
}

#[tokio::test]
async fn test_top_articles_limited_to_three() {
    let fixture = format!(
        "{VIEWS_FIXTURE}
        INSERT INTO articles (author, title, slug) VALUES (1, 'Title C', 'c'), (2, 'Title D', 'd');
        INSERT INTO log (path, method, status)
        SELECT '/article/c', 'GET', '200 OK' FROM generate_series(1, 7);
        INSERT INTO log (path, method, status)
        SELECT '/article/d', 'GET', '200 OK' FROM generate_series(1, 3);"
    );
    let Some(output) = run_report(&TOP_ARTICLES, &fixture).await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    assert_eq!(output, "\nTitle C - 7\nTitle D - 3\nTitle A - 2\n\n");
}

#[tokio::test]
async fn test_top_authors() {
    let Some(output) = run_report(&TOP_AUTHORS, VIEWS_FIXTURE).await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    assert_eq!(output, "\nAlice - 2\nBob - 1\n\n");
}

#[tokio::test]
async fn test_top_authors_sums_articles_and_skips_unread_authors() {
    let fixture = format!(
        "{VIEWS_FIXTURE}
        INSERT INTO authors (id, name) VALUES (3, 'Carol');
        INSERT INTO articles (author, title, slug) VALUES (2, 'Title B2', 'b2'), (3, 'Unread', 'u');
        INSERT INTO log (path, method, status)
        SELECT '/article/b2', 'GET', '200 OK' FROM generate_series(1, 4);"
    );
    let Some(output) = run_report(&TOP_AUTHORS, &fixture).await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    assert_eq!(output, "\nBob - 5\nAlice - 2\n\n");
}

#[tokio::test]
async fn test_error_days() {
    let Some(output) = run_report(&ERROR_DAYS, ERRORS_FIXTURE).await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    // Day 2 (0.00%) and day 3 (exactly 1.00%) stay below the threshold.
    assert_eq!(output, "\n2016-07-01 - 20.00\n\n");
}

#[tokio::test]
async fn test_error_days_sorted_by_day() {
    let fixture = format!(
        "{ERRORS_FIXTURE}
        INSERT INTO log (time, path, method, status)
        SELECT '2016-06-30 23:59:00'::timestamp, '/', 'GET', '404 NOT FOUND'
        FROM generate_series(1, 3);"
    );
    let Some(output) = run_report(&ERROR_DAYS, &fixture).await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    assert_eq!(output, "\n2016-06-30 - 100.00\n2016-07-01 - 20.00\n\n");
}

#[tokio::test]
async fn test_error_days_on_empty_log() {
    let Some(output) = run_report(&ERROR_DAYS, "").await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    assert_eq!(output, "\n\n");
}

#[tokio::test]
async fn test_reports_are_idempotent() {
    let Some(conn) = seeded_connection(VIEWS_FIXTURE).await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let mut client = PostgresClient::from_connection(conn);

    for report in [&TOP_ARTICLES, &TOP_AUTHORS, &ERROR_DAYS] {
        let first = client.execute_query(report.sql).await.unwrap();
        let second = client.execute_query(report.sql).await.unwrap();
        assert_eq!(first.rows, second.rows, "{}", report.name);
    }

    client.close().await.unwrap();
}
