//! Webhook ingress
//!
//! One POST endpoint receives Telegram deliveries. The payload is validated
//! once at ingress; a structurally invalid body is rejected before the rest
//! of the system ever sees it. Every accepted delivery is acknowledged with
//! `{"ok":"ok"}`; turn failures are reported into the chat, not to Telegram.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::agent::ModeRouter;
use crate::telegram::{TelegramBot, Update};

/// Everything a delivery needs, constructed once at startup
pub struct AppState {
    pub bot: TelegramBot,
    pub router: ModeRouter,
}

/// Build the webhook router
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/telegram/hook", post(telegram_hook))
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "webhook listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

async fn telegram_hook(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let ok = (StatusCode::OK, Json(json!({ "ok": "ok" })));

    let update = match Update::parse(payload) {
        Ok(update) => update,
        Err(error) => {
            tracing::warn!(%error, "rejected delivery");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": error.to_string() })),
            );
        }
    };

    // edited messages are accepted structurally but not processed
    let Some(message) = update.message else {
        return ok;
    };
    let chat_id = message.chat.id;

    if let Err(error) = state.bot.send_chat_action(chat_id, "typing").await {
        tracing::warn!(chat_id, %error, "failed to send chat action");
    }

    match state.router.respond(&message).await {
        Ok(Some(text)) => {
            if let Err(error) = state.bot.send_message(chat_id, &text).await {
                tracing::error!(chat_id, %error, "failed to deliver response");
            }
        }

        Ok(None) => {}

        Err(error) => {
            tracing::error!(chat_id, %error, "turn failed");
            let report = format!("😿😿😿 ```{error}``` 😿😿😿");
            if let Err(send_error) = state.bot.send_message(chat_id, &report).await {
                tracing::error!(chat_id, %send_error, "failed to deliver error report");
            }
        }
    }

    ok
}
