use clap::{Parser, Subcommand};
use intake::dialogue::{DialogueEngine, InboundEvent};

const CONSOLE_CONVERSATION: &str = "console";

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Support intake bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Run the gateway (Telegram polling or webhook, plus the HTTP health probe).
    Run {
        /// Config file path (default: INTAKE_CONFIG_PATH or ~/.intake/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP port (default from config or 15151)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Talk to the dialogue engine from the terminal, without Telegram.
    Console {
        /// Config file path (default: INTAKE_CONFIG_PATH or ~/.intake/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("intake {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Run { config, port }) => {
            if let Err(e) = run_gateway(config, port).await {
                log::error!("gateway failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Console { config }) => {
            if let Err(e) = run_console(config).await {
                log::error!("console failed: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

async fn run_gateway(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let (mut config, path) = intake::config::load_config(config_path)?;
    if let Some(p) = port {
        config.gateway.port = p;
    }
    log::info!(
        "starting gateway on {}:{} (config {})",
        config.gateway.bind,
        config.gateway.port,
        path.display()
    );
    intake::gateway::run_gateway(config).await
}

async fn run_console(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    use std::io::{self, Write};

    let (config, _) = intake::config::load_config(config_path)?;
    let settings = intake::config::resolve_settings(&config)?;
    let engine = DialogueEngine::from_settings(&settings);
    let display_name = std::env::var("USER").ok();

    let start = InboundEvent::new(CONSOLE_CONVERSATION, display_name.clone(), "/start");
    let (mut session, reply) = engine.handle(None, &start).await;
    println!("< {}", reply.text.trim());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("/exit") || input.eq_ignore_ascii_case("/quit") {
            break;
        }

        let event = InboundEvent::new(CONSOLE_CONVERSATION, display_name.clone(), input);
        let (next, reply) = engine.handle(Some(session), &event).await;
        session = next;
        log::debug!("console: state {:?}", reply.state);
        println!("< {}", reply.text.trim());
    }

    Ok(())
}
