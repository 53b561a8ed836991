//! news-report - console reports over a news site's web-server access log.

use news_report::app::App;
use news_report::cli::Cli;
use news_report::config::Config;
use news_report::error::Result;
use news_report::logging;
use news_report::report::ReportExecutor;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse_args();

    if cli.is_interactive() {
        logging::init_file_logging();
    } else {
        logging::init_stderr_logging();
    }

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        eprintln!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if cli.list {
        return App::list_reports(&mut out);
    }

    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded environment from {}", path.display());
    }

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let connection = config.resolve_connection(cli.to_connection_config()?, cli.connection_name())?;
    info!("Connection: {}", connection.display_string());

    let app = App::new(ReportExecutor::new(connection));

    match cli.report {
        Some(kind) => {
            app.run_report(kind, &mut out).await?;
        }
        None => {
            let stdin = std::io::stdin();
            app.run_interactive(stdin.lock(), &mut out).await?;
        }
    }

    Ok(())
}
