//! Ping Bot Demo
//!
//! Drives a [`FeatureSet`] end to end against an in-memory session: syncs
//! the command set, feeds it a handful of interactions in the gateway's
//! wire shape, and clears the commands again.
//!
//! In a real deployment the [`Session`] implementation would wrap a
//! gateway client library and `dispatch` would be called from its
//! interaction-create callback; everything else stays the same.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package ping-bot -- --guild 290926798626357999
//! RUST_LOG=switchboard=trace cargo run --package ping-bot
//! ```

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use parking_lot::Mutex;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use switchboard::prelude::*;
use switchboard_core::{ApiResult, CommandData, CreatedCommand, ModalData};

#[derive(Parser)]
#[command(about = "Demonstrates the Switchboard interaction router")]
struct Args {
    /// Register commands in this guild instead of globally.
    #[arg(long)]
    guild: Option<String>,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(long)]
    verbose: bool,
}

// ============================================================================
// In-memory Session
// ============================================================================

/// A session that records registered commands instead of calling a REST API.
struct MemorySession {
    next_id: AtomicU64,
    commands: Mutex<Vec<CreatedCommand>>,
}

impl MemorySession {
    fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            commands: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Session for MemorySession {
    fn application_id(&self) -> &str {
        "demo-app"
    }

    async fn bulk_set_commands(
        &self,
        guild_id: Option<&str>,
        specs: &[CommandSpec],
    ) -> ApiResult<Vec<CreatedCommand>> {
        let created: Vec<CreatedCommand> = specs
            .iter()
            .map(|spec| CreatedCommand {
                id: self.next_id.fetch_add(1, Ordering::SeqCst).to_string(),
                name: spec.name.clone(),
            })
            .collect();

        info!(
            scope = guild_id.unwrap_or("global"),
            count = created.len(),
            "registered commands"
        );
        *self.commands.lock() = created.clone();
        Ok(created)
    }

    async fn delete_command(&self, _guild_id: Option<&str>, command_id: &str) -> ApiResult<()> {
        self.commands.lock().retain(|c| c.id != command_id);
        info!(command_id, "deleted command");
        Ok(())
    }

    async fn respond(
        &self,
        interaction: &Interaction,
        response: InteractionResponse,
    ) -> ApiResult<()> {
        let content = response
            .data
            .as_ref()
            .and_then(|d| d.content.as_deref())
            .unwrap_or("(no content)");
        info!(interaction_id = %interaction.id, %content, "responded");
        Ok(())
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn handle_ping(interaction: Interaction, session: BoxedSession) {
    session
        .respond(&interaction, InteractionResponse::message("pong!"))
        .await
        .ok();
}

/// Reads the `sides` option, falling back to 6 when absent or not a
/// positive integer.
fn die_sides(data: &CommandData) -> u64 {
    data.options
        .iter()
        .find(|o| o.name == "sides")
        .and_then(|o| o.value.as_u64())
        .filter(|&sides| sides > 0)
        .unwrap_or(6)
}

async fn handle_roll(interaction: Interaction, data: CommandData, session: BoxedSession) {
    let sides = die_sides(&data);

    // Deterministic stand-in for a real RNG.
    let roll = interaction.id.len() as u64 % sides + 1;
    session
        .respond(
            &interaction,
            InteractionResponse::message(format!("rolled {roll} (d{sides})")),
        )
        .await
        .ok();
}

async fn handle_confirm(interaction: Interaction, session: BoxedSession) {
    let choice = interaction.custom_id().unwrap_or("?");
    session
        .respond(
            &interaction,
            InteractionResponse::message(format!("you picked {choice}")),
        )
        .await
        .ok();
}

async fn handle_feedback(interaction: Interaction, data: ModalData, session: BoxedSession) {
    info!(submission = %data.components, "feedback received");
    session
        .respond(&interaction, InteractionResponse::message("thanks!"))
        .await
        .ok();
}

async fn handle_gateway_ping(interaction: Interaction, session: BoxedSession) {
    session
        .respond(&interaction, InteractionResponse::pong())
        .await
        .ok();
}

// ============================================================================
// Demo Driver
// ============================================================================

fn sample_interactions() -> Result<Vec<Interaction>> {
    let payloads = vec![
        json!({
            "id": "1001", "application_id": "demo-app", "type": 1, "token": "t"
        }),
        json!({
            "id": "1002", "application_id": "demo-app", "type": 2, "token": "t",
            "data": { "id": "1", "name": "ping" }
        }),
        json!({
            "id": "1003", "application_id": "demo-app", "type": 2, "token": "t",
            "data": {
                "id": "2", "name": "roll",
                "options": [{ "name": "sides", "value": 20 }]
            }
        }),
        json!({
            "id": "1004", "application_id": "demo-app", "type": 3, "token": "t",
            "data": { "custom_id": "confirm:accept", "component_type": 2 }
        }),
        json!({
            "id": "1005", "application_id": "demo-app", "type": 5, "token": "t",
            "data": { "custom_id": "feedback", "components": [] }
        }),
        // No feature matches this one; it is logged and dropped.
        json!({
            "id": "1006", "application_id": "demo-app", "type": 3, "token": "t",
            "data": { "custom_id": "unrelated", "component_type": 2 }
        }),
    ];

    payloads
        .into_iter()
        .map(|p| Ok(serde_json::from_value(p)?))
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "switchboard=debug,ping_bot=debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let features = FeatureSet::new()
        .with(on_ping().handler(handle_gateway_ping))
        .with(on_command(CommandSpec::new("ping", "Check latency")).handler(handle_ping))
        .with(
            on_command(
                CommandSpec::new("roll", "Roll a die")
                    .option(CommandOptionSpec::integer("sides", "Number of sides")),
            )
            .handler(handle_roll),
        )
        .with(on_component("confirm:*").handler(handle_confirm))
        .with(on_modal("feedback").handler(handle_feedback));

    let session: Arc<MemorySession> = Arc::new(MemorySession::new());

    let created = features
        .sync_commands(session.as_ref(), args.guild.as_deref())
        .await?;
    for command in &created {
        info!(id = %command.id, name = %command.name, "command available");
    }

    for interaction in sample_interactions()? {
        let matched = features
            .dispatch(session.clone(), interaction.clone())
            .await;
        if !matched {
            info!(id = %interaction.id, "no feature claimed interaction");
        }
    }

    features
        .clear_commands(session.as_ref(), args.guild.as_deref())
        .await?;
    info!("commands cleared");

    Ok(())
}
