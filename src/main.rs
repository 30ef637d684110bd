//! colloquy CLI entry point

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "colloquy")]
#[command(about = "Conversation loop for chat-completion APIs with automatic tool calling")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a conversation from a script file or stdin
    Chat {
        /// Read prompts and directives from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Config file (defaults to ~/.colloquy/config.json when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Register the get_weather and fahrenheit_to_celsius tools
        #[arg(long)]
        demo_tools: bool,

        /// Do not echo requests and responses
        #[arg(short, long)]
        quiet: bool,

        /// Write the final conversation as JSON
        #[arg(long)]
        transcript: Option<PathBuf>,
    },

    /// Create ~/.colloquy/config.json interactively
    Onboard,

    /// Show the effective configuration
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    install_interrupt_handler();

    match cli.command {
        Commands::Chat {
            input,
            config,
            demo_tools,
            quiet,
            transcript,
        } => {
            let config = match config {
                Some(path) => colloquy::config::load_from(&path)?,
                None => colloquy::config::load_or_default()?,
            };

            if let Err(e) = run_chat(&config, input, demo_tools, quiet, transcript).await {
                colloquy::ui::print_error(&format!("{:#}", e));
                std::process::exit(1);
            }
        }

        Commands::Onboard => {
            colloquy::config::onboard()?;
        }

        Commands::Status => {
            let config = colloquy::config::load_or_default()?;
            let path = colloquy::config::config_path();
            let unset = "not set".to_string();

            println!("colloquy status\n");
            println!(
                "Config: {:?}{}",
                path,
                if path.exists() { "" } else { " (missing, using defaults)" }
            );
            println!("URI: {}", config.uri.as_ref().unwrap_or(&unset));
            println!("Model: {}", config.model.as_ref().unwrap_or(&unset));
            println!("Translator: {}", config.translator);
            println!("Timeout: {}s", config.timeout_secs);

            match config.api_key_name {
                Some(ref name) => {
                    let present = std::env::var(name).is_ok();
                    println!("API key: {} ({})", name, if present { "✓" } else { "not set" });
                }
                None => println!("API key: {}", unset),
            }
        }
    }

    Ok(())
}

/// Window in which a second Ctrl+C ends the process.
const INTERRUPT_WINDOW: Duration = Duration::from_secs(3);

fn within_window(last_press: Option<Instant>, now: Instant) -> bool {
    last_press.is_some_and(|at| now.duration_since(at) < INTERRUPT_WINDOW)
}

/// A lone Ctrl+C only warns; pressing it again inside the window exits with 130.
fn install_interrupt_handler() {
    let last_press: Mutex<Option<Instant>> = Mutex::new(None);

    let installed = ctrlc::set_handler(move || {
        let now = Instant::now();
        let mut last = match last_press.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if within_window(*last, now) {
            eprintln!("\nInterrupted, leaving the conversation.");
            std::process::exit(130);
        }

        *last = Some(now);
        eprintln!(
            "\nInterrupt again within {}s to quit.",
            INTERRUPT_WINDOW.as_secs()
        );
    });

    if let Err(e) = installed {
        tracing::warn!("Ctrl+C handler not installed: {}", e);
    }
}

async fn run_chat(
    config: &colloquy::config::Config,
    input: Option<PathBuf>,
    demo_tools: bool,
    quiet: bool,
    transcript: Option<PathBuf>,
) -> Result<()> {
    use colloquy::session::Session;
    use colloquy::source::{Source, StreamSource};
    use colloquy::tools::ToolRunner;
    use colloquy::transport::ReqwestTransport;
    use std::io::BufReader;

    let transport = ReqwestTransport::with_timeout(config.timeout());
    let tools = if demo_tools {
        ToolRunner::new_with_builtins()
    } else {
        ToolRunner::new()
    };

    let mut session = Session::new(Box::new(transport))
        .with_defaults(config.defaults())?
        .with_tools(tools)
        .with_echo(!quiet);

    if !quiet {
        let defaults = session.defaults();
        colloquy::ui::print_header(
            defaults.model.as_deref().unwrap_or("(model unset)"),
            defaults.uri.as_deref().unwrap_or("(uri unset)"),
        );

        let tool_names = session.tools().tool_names();
        if !tool_names.is_empty() {
            colloquy::ui::print_step(&format!("Tools: {}", tool_names.join(", ")));
        }
    }

    let mut source: Box<dyn Source> = match input {
        Some(ref path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open {:?}", path))?;
            Box::new(StreamSource::new(BufReader::new(file)))
        }
        None => Box::new(StreamSource::new(std::io::stdin().lock())),
    };

    let outcome = session.process_messages(source.as_mut()).await;

    if let Some(path) = transcript {
        let json = serde_json::to_string_pretty(session.conversation())?;
        std::fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))?;
        if !quiet {
            colloquy::ui::print_step(&format!("Transcript written to {:?}", path));
        }
    }

    outcome?;

    if !quiet {
        colloquy::ui::print_success(&format!(
            "Session finished after {} messages",
            session.conversation().len()
        ));
    }
    Ok(())
}
