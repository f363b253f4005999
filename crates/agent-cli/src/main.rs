//! Command-line interface for agent-rs

use agent_core::Context;
use agent_datasource::{DatasourceConfig, DatasourceTool};
use agent_llm::providers::LaminiFactory;
use agent_tools::{ToolRegistry, ToolRun, TracingCallbacks};
use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "agent-cli")]
#[command(about = "CLI for agent-rs tools", long_about = None)]
struct Args {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the datasource tool a question
    Ask {
        /// The question, forwarded verbatim
        question: String,

        /// Agent id sent to the engine
        #[arg(long, default_value = "agent-cli")]
        agent_id: String,

        /// Session id recorded with the call
        #[arg(long)]
        session_id: Option<String>,

        /// Model to ask
        #[arg(long)]
        model: Option<String>,

        /// Use the blocking call path
        #[arg(long)]
        blocking: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.json_logs {
        agent_utils::init_tracing_json();
    } else {
        agent_utils::init_tracing();
    }

    match args.command {
        Command::Ask {
            question,
            agent_id,
            session_id,
            model,
            blocking,
        } => {
            let mut context = Context::new().with_agent_id(agent_id);
            if let Some(session_id) = session_id {
                context = context.with_session_id(session_id);
            }

            let answer = ask(question, context, model, blocking).await?;
            println!("{answer}");
        }
    }

    Ok(())
}

async fn ask(
    question: String,
    context: Context,
    model: Option<String>,
    blocking: bool,
) -> anyhow::Result<String> {
    let factory = LaminiFactory::from_env().context("failed to configure the Lamini client")?;

    let mut config = DatasourceConfig::new();
    if let Some(model) = model {
        config = config.with_model(model);
    }

    let registry = Arc::new(ToolRegistry::new());
    registry.register(Arc::new(
        DatasourceTool::new(Arc::new(factory)).with_config(config),
    ));

    let run = ToolRun::new(context)
        .with_callbacks(Arc::new(TracingCallbacks));
    let params = json!({ "question": question });

    info!(blocking, "Running datasource tool");

    let output = if blocking {
        tokio::task::spawn_blocking(move || registry.invoke_blocking("datasource", params, &run))
            .await
            .context("blocking tool task failed")??
    } else {
        registry.invoke("datasource", params, &run).await?
    };

    Ok(match output {
        Value::String(answer) => answer,
        other => other.to_string(),
    })
}
