//! DocSage: document question-answering backend over a PDF knowledge base.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use docsage_core::DocSageConfig;
use docsage_server::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        match args[1].as_str() {
            "--help" | "-h" | "help" => {
                println!("DocSage: document question-answering backend");
                println!();
                println!("Usage: docsage");
                println!();
                println!("Environment:");
                println!("  PORT                          Listen port (default 3000)");
                println!("  KNOWLEDGE_BASE_PDF_PATH       Knowledge base PDF (default ./knowledge-base.pdf)");
                println!("  DISABLE_KNOWLEDGE_BASE        Set to \"true\" to skip the knowledge base");
                println!("  KNOWLEDGE_BASE_CHUNK_SIZE     Max chunk length in characters (default 1000)");
                println!("  KNOWLEDGE_BASE_CHUNK_OVERLAP  Overlap carried between chunks (default 200)");
                println!("  DOCSAGE_SEGMENTER             linguistic | naive (default linguistic)");
                println!("  RUST_LOG                      Log filter (default info)");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'docsage help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let config = DocSageConfig::from_env()?;
    let port = config.port;
    info!(
        "Knowledge base: {} (disabled: {})",
        config.knowledge_base.pdf_path.display(),
        config.knowledge_base.disabled
    );

    let state = Arc::new(AppState::new(config));

    // Warm the knowledge base; requests arriving first join the same build.
    let knowledge_base = state.knowledge_base.clone();
    tokio::spawn(async move {
        knowledge_base.ensure_initialized().await;
    });

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("DocSage server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
