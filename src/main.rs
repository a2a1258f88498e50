use anyhow::Result;
use clap::{Arg, Command};
use std::sync::Arc;
use tracing::{info, warn};

use learnflow::catalog::{Catalog, CatalogClient};
use learnflow::config::Config;
use learnflow::llm::create_model;
use learnflow::transcript::{TimedTextClient, TranscriptRetriever};
use learnflow::{ContextAnswerer, PlanAssembler};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("learnflow=info,warn")
        .init();

    let matches = Command::new("Learnflow")
        .version("0.1.0")
        .about("Curated video lessons with transcript-grounded Q&A")
        .arg(
            Arg::new("topic")
                .short('t')
                .long("topic")
                .value_name("TOPIC")
                .help("Generate a learning plan for this topic"),
        )
        .arg(
            Arg::new("ask")
                .short('q')
                .long("ask")
                .value_name("QUESTION")
                .help("Ask a question (combine with --topic and --video-id for context)"),
        )
        .arg(
            Arg::new("video-id")
                .long("video-id")
                .value_name("ID")
                .help("Video whose transcript grounds the question"),
        )
        .arg(
            Arg::new("serve")
                .long("serve")
                .help("Start the HTTP API server")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port for the HTTP API server"),
        )
        .get_matches();

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });
    config.validate()?;

    let catalog: Option<Arc<dyn Catalog>> = match CatalogClient::new(&config.catalog) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warn!("Catalog unavailable: {}", e);
            None
        }
    };

    let model = create_model(&config.generative);
    if model.is_none() {
        warn!("Generative service not configured; running on deterministic fallbacks");
    }

    let transcripts = TranscriptRetriever::new(
        Arc::new(TimedTextClient::new(&config.transcript)?),
        config.transcript.languages.clone(),
    );

    let assembler = catalog
        .clone()
        .map(|catalog| Arc::new(PlanAssembler::new(catalog, model.clone())));
    let answerer = Arc::new(ContextAnswerer::new(transcripts, catalog.clone(), model));

    if let Some(question) = matches.get_one::<String>("ask") {
        let topic = matches.get_one::<String>("topic").map(String::as_str);
        let video_id = matches.get_one::<String>("video-id").map(String::as_str);
        let answer = answerer.answer(question, topic, video_id).await;
        println!("{}", answer);
        return Ok(());
    }

    if let Some(topic) = matches.get_one::<String>("topic") {
        let assembler = assembler.ok_or_else(|| {
            anyhow::anyhow!("catalog API key not configured (set YT_API_KEY)")
        })?;
        info!("Generating learning plan for '{}'", topic);
        let plan = assembler.generate(topic).await?;
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    if matches.get_flag("serve") {
        #[cfg(feature = "api")]
        {
            let port = matches
                .get_one::<String>("port")
                .and_then(|p| p.parse().ok())
                .unwrap_or(config.server.port);
            learnflow::api::start_http_server(assembler, answerer, catalog, port).await?;
            return Ok(());
        }
        #[cfg(not(feature = "api"))]
        anyhow::bail!("this build has no HTTP server; rebuild with --features api");
    }

    info!("Nothing to do; pass --topic, --ask, or --serve");
    Ok(())
}
