//! Connection resolution and failure handling against a real server.

use news_report::app::App;
use news_report::config::ConnectionConfig;
use news_report::error::ReportError;
use news_report::report::{ReportExecutor, ReportKind};
use pretty_assertions::assert_eq;

fn database_config() -> Option<ConnectionConfig> {
    let url = std::env::var("DATABASE_URL").ok()?;
    ConnectionConfig::from_connection_string(&url).ok()
}

fn unreachable_config() -> ConnectionConfig {
    ConnectionConfig {
        host: Some("127.0.0.1".to_string()),
        port: Some(1),
        database: Some("news".to_string()),
        user: Some("nobody".to_string()),
        password: None,
        sslmode: Some("disable".to_string()),
    }
}

#[tokio::test]
async fn test_executor_runs_plain_select() {
    let Some(config) = database_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let executor = ReportExecutor::new(config);
    let mut out = Vec::new();

    let rows = executor
        .run_sql("SELECT 'a'::text, 1::int4 UNION ALL SELECT 'b', 2", &mut out)
        .await
        .unwrap();

    assert_eq!(rows, 2);
    assert_eq!(String::from_utf8(out).unwrap(), "\na - 1\nb - 2\n\n");
}

#[tokio::test]
async fn test_missing_table_reports_query_error() {
    let Some(config) = database_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let executor = ReportExecutor::new(config);
    let mut out = Vec::new();

    let err = executor
        .run_sql("SELECT title FROM news_report_missing_table", &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, ReportError::Query(_)), "{err:?}");
    assert_eq!(String::from_utf8(out).unwrap(), "\n");
}

#[tokio::test]
async fn test_write_statement_never_reaches_server() {
    let Some(config) = database_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let executor = ReportExecutor::new(config);
    let mut out = Vec::new();

    let err = executor
        .run_sql("CREATE TABLE news_report_should_not_exist (id int)", &mut out)
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::ReadOnly(_)), "{err:?}");

    let err = executor
        .run_sql("SELECT * FROM news_report_should_not_exist", &mut Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::Query(_)), "{err:?}");
}

#[tokio::test]
async fn test_unreachable_server_is_connection_error() {
    let executor = ReportExecutor::new(unreachable_config());
    let mut out = Vec::new();

    let err = executor
        .run(ReportKind::TopArticles.definition(), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, ReportError::Connection(_)), "{err:?}");
    assert_eq!(String::from_utf8(out).unwrap(), "\n");
}

#[tokio::test]
async fn test_menu_survives_unreachable_server() {
    let app = App::new(ReportExecutor::new(unreachable_config()));
    let mut out = Vec::new();

    app.run_interactive("1\n4\n".as_bytes(), &mut out).await.unwrap();

    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("Connection Error: "), "{output}");
    assert_eq!(output.matches("Select an option: ").count(), 2);
}
