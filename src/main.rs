use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use checkin_bot::application::errors::BotError;
use checkin_bot::application::messaging::MessageDispatcher;
use checkin_bot::domain::entities::User;
use checkin_bot::domain::traits::Bot;
use checkin_bot::infrastructure::adapters::ConsoleAdapter;
use checkin_bot::infrastructure::config::Config;
use checkin_bot::plugins::install_plugins;

#[derive(Parser)]
#[command(name = "checkin-bot")]
#[command(about = "Daily check-in and keyword reply bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on the console
    Run {
        /// Sender id for console messages
        #[arg(long, default_value = "console-user")]
        user_id: String,

        /// Sender display name for console messages
        #[arg(long, default_value = "Console User")]
        user_name: String,

        /// Act as if every message came from this group
        #[arg(long)]
        group_id: Option<String>,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { user_id, user_name, group_id } => {
            let sender = User::new(user_id).with_nickname(user_name);
            if let Err(e) = run_bot(&cli.config, sender, group_id) {
                tracing::error!("Bot stopped: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("checkin-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config(&cli.config);
        }
    }
}

fn load_config(config_path: &str) -> Config {
    if std::path::Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    }
}

fn run_bot(config_path: &str, sender: User, group_id: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path);
    tracing::info!("Starting {}", config.bot.name);

    let mut dispatcher = MessageDispatcher::new(&config.bot.prefix);
    install_plugins(&mut dispatcher, &config)?;
    for plugin in dispatcher.plugins().list_plugins() {
        tracing::info!("Plugin {} ready: {}", plugin.name, plugin.commands.join(", "));
    }
    tracing::info!("{} commands registered", dispatcher.commands().len());

    let mut bot = ConsoleAdapter::new(&config.bot.name, sender);
    if let Some(group) = group_id {
        bot = bot.in_group(group);
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_console_bot(bot, dispatcher))?;
    Ok(())
}

async fn run_console_bot(bot: ConsoleAdapter, dispatcher: MessageDispatcher) -> Result<(), BotError> {
    bot.start().await?;
    println!("Type /help for commands, Ctrl-D to quit.");

    let chat_id = bot.chat_id();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        if let Some(reply) = dispatcher.process(bot.message_from_line(&line)) {
            if let Err(e) = bot.send_message(&chat_id, &reply).await {
                tracing::error!("Failed to send message: {}", e);
            }
        }
    }

    tracing::info!("Console closed, bye");
    Ok(())
}

fn init_config(path: &str) {
    if std::path::Path::new(path).exists() {
        eprintln!("{} already exists, not overwriting", path);
        return;
    }

    let yaml = match Config::default().to_yaml() {
        Ok(yaml) => yaml,
        Err(e) => {
            eprintln!("Failed to render default config: {}", e);
            return;
        }
    };

    match std::fs::write(path, yaml) {
        Ok(_) => println!("Created {}", path),
        Err(e) => eprintln!("Failed to write {}: {}", path, e),
    }
}
