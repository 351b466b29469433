use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde_json::json;
use tracing::info;

use voxchat::config::AppConfig;
use voxchat::transport::sim::{load_script, ScriptAction, ScriptStep, SimTransport};
use voxchat::tui::runner::run_tui;

#[derive(Parser)]
#[command(name = "voxchat", about = "Terminal client for live voice-agent sessions.")]
struct Cli {
    /// Path to a YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to a YAML session script for the built-in transport
    #[arg(short, long)]
    script: Option<PathBuf>,
}

/// Built-in demo session: the agent joins, streams one utterance, and
/// follows up with a chat message.
fn demo_script() -> Vec<ScriptStep> {
    vec![
        ScriptStep {
            at_ms: 800,
            action: ScriptAction::AgentState {
                state: voxchat::transport::AgentLivenessState::Listening,
            },
        },
        ScriptStep {
            at_ms: 2_000,
            action: ScriptAction::Transcription {
                id: "demo-t1".into(),
                from_local: false,
                body: json!("Hello!"),
                is_final: false,
            },
        },
        ScriptStep {
            at_ms: 2_600,
            action: ScriptAction::Transcription {
                id: "demo-t1".into(),
                from_local: false,
                body: json!("Hello! How can I help you today?"),
                is_final: true,
            },
        },
        ScriptStep {
            at_ms: 4_000,
            action: ScriptAction::Chat {
                id: "demo-c1".into(),
                from_local: false,
                body: json!("You can also **type** to me — transcripts and chat land in one timeline."),
            },
        },
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("voxchat=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load_or_default(cli.config.as_deref());

    let script = match &cli.script {
        Some(path) => load_script(path)?,
        None => demo_script(),
    };

    info!("starting session with agent '{}'", config.agent_name);

    let transport = SimTransport::new();
    transport.play(script);
    run_tui(config, transport).await
}
