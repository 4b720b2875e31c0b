use anyhow::Context;

use crate::app::AppContext;
use crate::domain::BatchResponse;
use crate::scraper::Extract;
use crate::server;

pub async fn serve(
    ctx: &AppContext,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let mut config = ctx.config.server.clone();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    server::serve(ctx.app_state(), &config)
        .await
        .with_context(|| format!("HTTP server on {} failed", config.bind_addr()))
}

pub async fn extract(ctx: &AppContext, url: &str) -> anyhow::Result<()> {
    let result = ctx.extractor.extract(url).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub async fn batch(ctx: &AppContext, urls: &[String]) -> anyhow::Result<()> {
    let mut results = Vec::with_capacity(urls.len());
    for url in urls {
        results.push(ctx.extractor.extract(url).await);
    }

    let response = BatchResponse::summarize(results);
    eprintln!("{}", response.message);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
