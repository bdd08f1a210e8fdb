use std::sync::Arc;

use email_skill::audit::{AuditSink, EndpointCache, HttpQueueClient, MemoryEndpointCache};
use email_skill::config::SkillConfig;
use email_skill::dispatch::RequestDispatcher;
use email_skill::http::skill_routes;
use email_skill::providers::{HttpAttributeProvider, HttpProgressiveNotifier};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = SkillConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    eprintln!("📧 Email Skill v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Skill endpoint: http://{}/api/skill", config.bind_addr);
    eprintln!("   Health: http://{}/health", config.bind_addr);
    match (&config.queue.queue_url, &config.queue.queue_name) {
        (Some(url), _) => eprintln!("   Audit queue: {}", url),
        (None, Some(name)) => eprintln!("   Audit queue: {} (resolved on first use)", name),
        (None, None) => {}
    }

    let client = reqwest::Client::new();

    let attributes = Arc::new(HttpAttributeProvider::new(client.clone()));
    let notifier = Arc::new(HttpProgressiveNotifier::new(client.clone()));

    let queue = Arc::new(HttpQueueClient::new(client, &config.queue));
    let cache: Arc<dyn EndpointCache> = Arc::new(MemoryEndpointCache::new());
    let audit = Arc::new(AuditSink::new(&config.queue, queue, cache)?);

    let bind_addr = config.bind_addr.clone();
    let dispatcher = Arc::new(RequestDispatcher::new(config, attributes, notifier, audit));

    let app = skill_routes(dispatcher);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
