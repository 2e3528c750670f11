use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_session::{AgentSession, NoticeKind, TurnOutcome};
use policy_gate::PolicyGate;
use tool_dispatch::testing::StaticPage;
use tool_dispatch::ToolDispatcher;
use webpilot_core_types::ToolCall;

use webpilot_cli::config::WebPilotConfig;
use webpilot_cli::llm;
use webpilot_cli::page::PageSnapshot;

/// WebPilot - policy-gated AI copilot for the active web page
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive copilot session over a page snapshot
    Chat(ChatArgs),

    /// Evaluate a tool call against the policy engine
    Policy(PolicyArgs),

    /// Show the effective configuration
    Config,
}

#[derive(Args)]
struct ChatArgs {
    /// Page snapshot file (YAML or JSON) to serve as the active page
    #[arg(long, value_name = "FILE", conflicts_with = "page_url")]
    page_file: Option<PathBuf>,

    /// Bare page address when no snapshot is available
    #[arg(long, value_name = "URL")]
    page_url: Option<String>,

    /// Run a single prompt instead of the interactive loop
    #[arg(short, long)]
    prompt: Option<String>,
}

#[derive(Args)]
struct PolicyArgs {
    #[command(subcommand)]
    command: PolicyCommand,
}

#[derive(Subcommand)]
enum PolicyCommand {
    /// Check whether a tool call would be allowed on a page
    Check(PolicyCheckArgs),
}

#[derive(Args)]
struct PolicyCheckArgs {
    /// Tool name (read_page, click_element, type_text, scroll,
    /// get_links, google_search)
    #[arg(long)]
    tool: String,

    /// Address of the page the action targets
    #[arg(long)]
    url: String,

    /// CSS selector, for click_element and type_text
    #[arg(long)]
    selector: Option<String>,

    /// Text payload, for type_text and google_search
    #[arg(long, default_value = "")]
    text: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = WebPilotConfig::load(cli.config.as_ref()).await?;

    let result = match cli.command {
        Commands::Chat(args) => cmd_chat(args, config).await,
        Commands::Policy(args) => cmd_policy(args, config),
        Commands::Config => cmd_config(&config),
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("command failed: {e}");
            std::process::exit(1);
        }
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn cmd_chat(args: ChatArgs, config: WebPilotConfig) -> Result<()> {
    let page = match (&args.page_file, &args.page_url) {
        (Some(path), _) => PageSnapshot::load(path).await?.into_page(),
        (None, Some(url)) => StaticPage::new(url.clone()),
        (None, None) => bail!("provide --page-file or --page-url"),
    };

    let provider = llm::build_provider(&config.provider)?;
    let gate = Arc::new(PolicyGate::new(config.policy));
    let dispatcher = Arc::new(ToolDispatcher::new(gate, Arc::new(page)));
    let mut session = AgentSession::new(config.session, provider, dispatcher);

    info!(model = %config.provider.model, "session ready");

    if let Some(prompt) = args.prompt {
        return drive_turn(&mut session, prompt).await;
    }

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("webpilot chat - /clear resets history, /quit exits, Ctrl-C cancels a turn");
    loop {
        stdout.write_all(b"you> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();
        match line.as_str() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear_history();
                println!("history cleared");
                continue;
            }
            _ => drive_turn(&mut session, line).await?,
        }
    }
    Ok(())
}

/// Run one turn, racing it against Ctrl-C.
async fn drive_turn(session: &mut AgentSession, prompt: String) -> Result<()> {
    let token = session.arm_cancellation();
    let turn = session.run_turn(prompt);
    tokio::pin!(turn);

    let report = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                token.cancel();
            }
            report = &mut turn => break report,
        }
    };

    for notice in &report.notices {
        match notice.kind {
            NoticeKind::Security => println!("[security] {}", notice.text),
            NoticeKind::Error => println!("[error] {}", notice.text),
            NoticeKind::Info => info!("{}", notice.text),
        }
    }

    match report.outcome {
        TurnOutcome::Answered { text, tool_depth } => {
            if tool_depth > 0 {
                info!(tool_depth, "turn used tools");
            }
            println!("\n{text}\n");
        }
        TurnOutcome::Blocked { reason } => {
            println!("\n[blocked] {reason}\n");
        }
        TurnOutcome::Failed { reason } => {
            println!("\n[failed] {reason}\n");
        }
        TurnOutcome::Cancelled => {
            println!("\n[cancelled]\n");
        }
    }
    Ok(())
}

fn cmd_policy(args: PolicyArgs, config: WebPilotConfig) -> Result<()> {
    let PolicyCommand::Check(args) = args.command;

    let call = tool_call_from_args(&args)?;
    let gate = PolicyGate::new(config.policy);
    let verdict = gate.validate(&call, &args.url);

    if verdict.allowed {
        println!("allowed: {} on {}", call.name(), args.url);
    } else {
        println!(
            "denied: {}",
            verdict.reason.unwrap_or_else(|| "policy denial".to_string())
        );
        std::process::exit(2);
    }
    Ok(())
}

fn tool_call_from_args(args: &PolicyCheckArgs) -> Result<ToolCall> {
    let selector = || {
        args.selector
            .clone()
            .ok_or_else(|| anyhow::anyhow!("--selector is required for {}", args.tool))
    };
    Ok(match args.tool.as_str() {
        "read_page" => ToolCall::ReadPage {
            mode: Default::default(),
        },
        "click_element" => ToolCall::ClickElement {
            selector: selector()?,
        },
        "type_text" => ToolCall::TypeText {
            selector: selector()?,
            text: args.text.clone(),
        },
        "scroll" => ToolCall::Scroll {
            direction: Default::default(),
        },
        "get_links" => ToolCall::GetLinks,
        "google_search" => ToolCall::GoogleSearch {
            query: args.text.clone(),
        },
        other => bail!("unknown tool: {other}"),
    })
}

fn cmd_config(config: &WebPilotConfig) -> Result<()> {
    println!("{}", serde_yaml::to_string(config)?);
    Ok(())
}
