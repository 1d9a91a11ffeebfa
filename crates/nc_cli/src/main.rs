use std::sync::Arc;
use clap::Parser;
use kdam::{tqdm, BarExt};
use nc_core::{Error, Result};
use nc_inference::runner::{RunEvent, RunMode, SummaryRun};
use nc_inference::{create_model, InferenceConfig, ModelKind, Summarizer};
use nc_news::{create_source, init_logging, load_articles, Feed, Logger, NewsArgs, NewsConfig};
use tracing::{info, warn};

mod duration;

use duration::HumanDuration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch, summarize and rewrite health news", long_about = None)]
pub struct Cli {
    #[arg(long, default_value = "openai", global = true, help = "Model backend. Available models: openai (default), dummy")]
    model: String,
    /// OpenAI-compatible endpoint, overrides NC_INFERENCE_URL
    #[arg(long, global = true)]
    model_url: Option<String>,
    /// Model identifier for summaries, overrides NC_SUMMARY_MODEL
    #[arg(long, global = true)]
    summary_model: Option<String>,
    /// Model identifier for rewrites, overrides NC_REWRITE_MODEL
    #[arg(long, global = true)]
    rewrite_model: Option<String>,
    #[command(flatten)]
    news: NewsArgs,
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List the fetched articles
    Fetch,
    /// Summarize every fetched article
    Summarize {
        /// Run groups of N articles concurrently instead of one at a time
        #[arg(long)]
        batch: Option<usize>,
        /// Delay between sequential requests (e.g. 1500ms, 2s)
        #[arg(long, default_value = "1500ms")]
        delay: HumanDuration,
        /// Start offset between requests inside a group
        #[arg(long, default_value = "500ms")]
        stagger: HumanDuration,
        /// Pause between groups
        #[arg(long, default_value = "2s")]
        pause: HumanDuration,
    },
    /// Show one page of the feed
    Feed {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Friendly rewrite of one article
    Rewrite {
        /// Article id as listed by `fetch`
        id: String,
    },
    /// Serve the JSON API
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: String,
    },
}

impl Cli {
    fn inference_config(&self) -> Result<InferenceConfig> {
        let mut config = InferenceConfig::from_env();
        config.model_kind = self.model.parse::<ModelKind>()?;
        if let Some(url) = &self.model_url {
            config.base_url = url.clone();
        }
        if let Some(model) = &self.summary_model {
            config.summary_model = model.clone();
        }
        if let Some(model) = &self.rewrite_model {
            config.rewrite_model = model.clone();
        }
        Ok(config)
    }
}

fn run_mode(batch: Option<usize>, delay: HumanDuration, stagger: HumanDuration, pause: HumanDuration) -> RunMode {
    match batch {
        Some(group_size) if group_size > 0 => RunMode::Batched {
            group_size,
            stagger: stagger.0,
            pause: pause.0,
        },
        _ => RunMode::Sequential { delay: delay.0 },
    }
}

async fn summarize(summarizer: Arc<Summarizer>, feed: &Feed, mode: RunMode) -> Result<()> {
    let total = feed.len();
    let mut run = SummaryRun::start(summarizer, feed.articles().to_vec(), mode);

    let canceller = run.canceller();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("🛑 Cancelling, waiting for in-flight requests");
            canceller.cancel();
        }
    });

    let mut pb = tqdm!(total = total, desc = "Summarizing");
    while let Some(event) = run.next_event().await {
        match event {
            RunEvent::Started { index, total, id, title } => {
                article_logger(index, total, &id).debug(&format!("📰 {}", title));
            }
            RunEvent::Finished { index, total, id, summary } => {
                article_logger(index, total, &id).info("✅ Summary ready");
                pb.update(1)?;
                pb.write(format!("\n{} ({})\nTL;DR: {}", title_of(feed, &id), id, summary.tldr))?;
                for (i, takeaway) in summary.takeaways.iter().enumerate() {
                    pb.write(format!("  {}. {}", i + 1, takeaway))?;
                }
            }
            RunEvent::Cancelled => Logger::new().warn("🛑 Run cancelled, pending articles were skipped"),
            RunEvent::Done { processed } => info!("✨ {} summaries ready", processed),
        }
    }
    eprintln!();

    let results = run.join().await?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn article_logger(index: usize, total: usize, id: &str) -> Logger {
    Logger::new()
        .with_prefix(format!("[{}/{}]", index + 1, total))
        .with_prefix(format!("[{}]", id))
}

fn title_of<'a>(feed: &'a Feed, id: &str) -> &'a str {
    feed.get(id).map(|a| a.title.as_str()).unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.inference_config()?;
    let model = create_model(&config)?;
    info!("🧠 Inference model initialized (using {})", model.name());
    let summarizer = Arc::new(Summarizer::new(model, config));

    let source = create_source(&cli.news, NewsConfig::from_env())?;
    let feed = Feed::new(load_articles(source.as_ref()).await, cli.news.per_page);

    match cli.command {
        Commands::Fetch => {
            for article in feed.articles() {
                println!("{}\t{}", article.id, article.title);
            }
        }
        Commands::Summarize { batch, delay, stagger, pause } => {
            summarize(summarizer, &feed, run_mode(batch, delay, stagger, pause)).await?;
        }
        Commands::Feed { page } => {
            let page = feed.page(page);
            println!("Page {} of {}", page.number, page.total_pages);
            for article in page.items {
                println!("- {} ({})", article.title, article.id);
                if let Some(source) = &article.source {
                    println!("  {}", source);
                }
            }
        }
        Commands::Rewrite { id } => {
            let article = feed
                .get(&id)
                .ok_or_else(|| Error::NotFound(format!("article {}", id)))?;
            let rewrite = summarizer.rewrite(article, rand::random()).await;
            println!("{}", rewrite.content);
        }
        Commands::Serve { addr } => {
            let app = nc_web::create_app(nc_web::AppState::new(summarizer, feed)).await;
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("🌐 Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
