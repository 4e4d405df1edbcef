//! Serve command - text reduction HTTP server.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::llm::{Completer, OpenAICompleter};
use crate::server::{bind, run_server, AppState};
use anyhow::Result;
use std::sync::Arc;

/// Run the HTTP API server.
pub async fn run_serve(host: Option<&str>, port: Option<u16>, settings: &Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Serve, &settings.llm) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let host = host.unwrap_or(&settings.server.host);
    let port = port.unwrap_or(settings.server.port);

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;

    let completer = OpenAICompleter::from_settings(&settings.llm)
        .map(|c| Arc::new(c) as Arc<dyn Completer>)
        .map_err(|e| e.to_string());
    if let Err(e) = &completer {
        Output::warning(&format!("LLM client unavailable, /reduce will fail: {}", e));
    }

    let state = Arc::new(AppState::new(settings.llm.clone(), completer, prompts));
    let listener = bind(host, port).await?;

    Output::header("Reduct API Server");
    println!();
    Output::success(&format!("Listening on http://{}", listener.local_addr()?));
    if let Some(model) = &settings.llm.model {
        Output::kv("Model", model);
    }
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Reduce", "POST /reduce");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    run_server(listener, state).await?;
    Ok(())
}
