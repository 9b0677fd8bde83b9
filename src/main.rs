use anyhow::{Context, Result};
use clap::Parser;
use paperlens::{
    Lens, Presenter, TextPresenter,
    cache::{FileStore, KeyValueStore, MemoryStore},
    config::Config,
    page::Page,
};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "paperlens",
    about = "Show journal quality and citation data for a scholarly article page",
    version
)]
struct Cli {
    /// Article page URL.
    url: String,

    /// Read the page from this HTML file instead of downloading it.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Print the analysis as JSON.
    #[arg(long)]
    json: bool,

    /// Seconds to wait for the mirror lookup after the report is shown.
    #[arg(long, default_value = "10")]
    mirror_wait: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let store: Arc<dyn KeyValueStore> = match config.cache_dir() {
        Some(dir) => Arc::new(FileStore::new(dir)),
        None => Arc::new(MemoryStore::new()),
    };
    let lens = Lens::new(config, store)?;

    let url = url::Url::parse(&cli.url).with_context(|| format!("invalid url '{}'", cli.url))?;
    let html = match &cli.file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let http = paperlens::fetcher::HttpClient::new(lens.config().user_agent())?;
            http.fetch_page(url.as_str()).await?.body_utf8
        }
    };
    let page = Page::parse(url, &html);

    let Some(session) = lens.analyze(&page).await else {
        info!("nothing to show for this page");
        return Ok(());
    };

    let wait = Duration::from_secs(cli.mirror_wait);
    if cli.json {
        let mirror = session.mirror.settle(wait).await;
        let out = serde_json::json!({ "analysis": session.analysis, "mirror": mirror });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let mut presenter = TextPresenter::new(std::io::stdout().lock());
    presenter.present(&session.analysis);
    let mirror = session.mirror.settle(wait).await;
    presenter.mirror(&session.analysis, &mirror);
    Ok(())
}
