//! Gateway HTTP server: health probe, Telegram webhook, and the inbound processor.

use crate::channels::{
    ChannelHandle, ChannelRegistry, InboundMessage, TelegramChannel, TelegramUpdate,
};
use crate::config::{self, Config};
use crate::dialogue::DialogueEngine;
use crate::session::SessionStore;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

const WEBHOOK_SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";
const INBOUND_QUEUE: usize = 64;

/// Shared state for the gateway (config, engine, sessions, channels).
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<Config>,
    pub engine: Arc<DialogueEngine>,
    pub sessions: SessionStore,
    pub channel_registry: ChannelRegistry,
    /// Sender for inbound channel messages (poll loop or webhook POSTs).
    /// The processor task receives.
    pub inbound_tx: mpsc::Sender<InboundMessage>,
    /// In-process channel connector tasks; awaited during graceful shutdown.
    pub channel_tasks: Arc<RwLock<Vec<JoinHandle<()>>>>,
}

/// Process one inbound message: take the conversation's session, run the engine, store the
/// new session, and send the reply through the originating channel.
pub async fn process_inbound_message(state: &GatewayState, msg: InboundMessage) {
    let conversation_id = msg.event.conversation_id.clone();
    let session = state.sessions.take(&conversation_id).await;
    let (session, reply) = state.engine.handle(session, &msg.event).await;
    log::debug!(
        "inbound: {}/{} now {:?}",
        msg.channel_id,
        conversation_id,
        reply.state
    );
    state.sessions.put(conversation_id.clone(), session).await;
    if let Err(e) = state
        .channel_registry
        .send(&msg.channel_id, &conversation_id, &reply.text)
        .await
    {
        log::warn!("inbound: send_message failed: {}", e);
    }
}

/// Run the gateway server; binds to config.gateway.bind:config.gateway.port.
/// Fails before binding when the bot token or CRM webhook is missing.
/// Blocks until shutdown (e.g. Ctrl+C).
pub async fn run_gateway(config: Config) -> Result<()> {
    let settings = config::resolve_settings(&config)?;
    let engine = DialogueEngine::from_settings(&settings);

    let (inbound_tx, mut inbound_rx) = mpsc::channel::<InboundMessage>(INBOUND_QUEUE);
    let state = GatewayState {
        config: Arc::new(config.clone()),
        engine: Arc::new(engine),
        sessions: SessionStore::new(),
        channel_registry: ChannelRegistry::new(),
        inbound_tx: inbound_tx.clone(),
        channel_tasks: Arc::new(RwLock::new(Vec::new())),
    };

    // One processor for every conversation: events are handled strictly in arrival order.
    {
        let state_inbound = state.clone();
        tokio::spawn(async move {
            while let Some(msg) = inbound_rx.recv().await {
                process_inbound_message(&state_inbound, msg).await;
            }
        });
    }

    let telegram_cfg = &config.channels.telegram;
    let telegram = Arc::new(TelegramChannel::new(
        settings.bot_token.clone(),
        telegram_cfg.api_base.clone(),
    ));
    let telegram_webhook_for_shutdown = if let Some(ref url) = telegram_cfg.webhook_url {
        let secret = telegram_cfg.webhook_secret.as_deref();
        if let Err(e) = telegram.set_webhook(url, secret).await {
            log::warn!("telegram: set_webhook failed: {}", e);
        } else {
            log::info!("telegram channel registered (webhook mode): {}", url);
        }
        Some(telegram.clone())
    } else {
        let handle = telegram.clone().start_inbound(inbound_tx);
        state.channel_tasks.write().await.push(handle);
        log::info!("telegram channel registered and getUpdates loop started");
        None
    };
    state
        .channel_registry
        .register(telegram.id().to_string(), telegram)
        .await;

    let channel_registry = state.channel_registry.clone();
    let channel_tasks = state.channel_tasks.clone();
    let app = router(state);

    let bind_addr = format!("{}:{}", config.gateway.bind.trim(), config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(
            channel_registry,
            channel_tasks,
            telegram_webhook_for_shutdown,
        ))
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(health_http))
        .route("/telegram/webhook", post(telegram_webhook))
        .with_state(state)
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
/// Stops channel connectors and removes the Telegram webhook if used,
/// then awaits in-process channel tasks.
async fn shutdown_signal(
    channel_registry: ChannelRegistry,
    channel_tasks: Arc<RwLock<Vec<JoinHandle<()>>>>,
    telegram_webhook: Option<Arc<TelegramChannel>>,
) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, stopping channels");

    channel_registry.stop_all().await;

    if let Some(t) = telegram_webhook {
        if let Err(e) = t.delete_webhook().await {
            log::debug!("telegram: delete_webhook on shutdown: {}", e);
        }
    }

    let handles = {
        let mut g = channel_tasks.write().await;
        std::mem::take(&mut *g)
    };
    for h in handles {
        let _ = h.await;
    }
    log::info!("channel tasks finished");
}

/// POST /telegram/webhook: receives Telegram update JSON, verifies the optional secret,
/// queues the message.
async fn telegram_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if let Some(ref expected) = state.config.channels.telegram.webhook_secret {
        let provided = headers
            .get(WEBHOOK_SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if provided != expected.as_str() {
            return StatusCode::FORBIDDEN;
        }
    }
    let update: TelegramUpdate = match serde_json::from_slice(&body) {
        Ok(u) => u,
        Err(_) => return StatusCode::BAD_REQUEST,
    };
    let Some(inbound) = update.into_inbound() else {
        return StatusCode::OK;
    };
    if state.inbound_tx.send(inbound).await.is_err() {
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    StatusCode::OK
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    let sessions = state.sessions.len().await;
    Json(json!({
        "runtime": "running",
        "port": state.config.gateway.port,
        "sessions": sessions,
    }))
}
