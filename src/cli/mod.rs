//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments, resolves configuration and
//! dispatches to the interactive chat or one of the one-shot commands.

pub mod say;

use std::error::Error;

use clap::{ArgAction, Parser, Subcommand};

use crate::api::{Backend, Connectivity, HttpBackend, LoadOutcome};
use crate::cli::say::run_say;
use crate::core::config::{Config, MissingServerUrl};
use crate::core::controller::ControllerSettings;
use crate::core::reveal::Pacing;
use crate::ui::chat_loop::{run_chat, ChatOptions};
use crate::ui::picker::ModelPicker;
use crate::utils::logging::init_logging;

/// Exit code used when the server URL is missing or the config is unreadable.
pub const EXIT_CONFIG: i32 = 2;

#[derive(Parser)]
#[command(name = "llm-sampler")]
#[command(about = "Chat with a remote LLM sampling server from the terminal")]
#[command(
    long_about = "llm-sampler connects to a sampling server exposing /ping, /get-models, \
/load-model and /chat, lets you pick which model the server runs, and keeps a \
running conversation with it.\n\n\
Server URL (first match wins):\n\
  --server-url <URL>\n\
  LLM_SAMPLER_URL   environment variable\n\
  ngrok_url         environment variable\n\
  server-url        in the config file ('llm-sampler set server-url <URL>')\n\n\
Chat commands:\n\
  /models           List available models\n\
  /load <name|n>    Load a model by name or list number\n\
  /reset            Clear the conversation\n\
  /status           Check the connection\n\
  /quit             Leave"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the sampling server
    #[arg(long, global = true, value_name = "URL")]
    pub server_url: Option<String>,

    /// Increase diagnostic output on stderr (-v debug, -vv trace)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Show replies at once instead of word by word
    #[arg(long, global = true)]
    pub no_animation: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Check whether the server is reachable
    Ping,
    /// List the models the server offers
    Models,
    /// Ask the server to load a model
    Load {
        /// Model identifier as listed by `models`
        name: String,
    },
    /// Send a single prompt and print the reply
    Say {
        #[arg(trailing_var_arg = true, required = true)]
        prompt: Vec<String>,
    },
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

fn load_config_or_exit() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(EXIT_CONFIG);
        }
    }
}

fn server_url_or_exit(config: &Config, flag: Option<&str>) -> String {
    match config.resolve_server_url(flag, |key| std::env::var(key).ok()) {
        Ok(url) => url,
        Err(MissingServerUrl) => {
            eprintln!("❌ {MissingServerUrl}");
            std::process::exit(EXIT_CONFIG);
        }
    }
}

fn controller_settings(config: &Config, no_animation: bool) -> ControllerSettings {
    ControllerSettings {
        window: config.history_window(),
        pacing: if no_animation {
            Pacing::Instant
        } else {
            config.pacing()
        },
    }
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Set { key, value } => {
            let mut config = load_config_or_exit();
            match key {
                Some(key) if !value.is_empty() => {
                    let value = value.join(" ");
                    config.set_key(&key, &value)?;
                    config.save()?;
                    println!("✅ Set {key} to: {value}");
                }
                _ => config.print_all(),
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = load_config_or_exit();
            config.unset_key(&key)?;
            config.save()?;
            println!("✅ Unset {key}");
            Ok(())
        }
        command => {
            let config = load_config_or_exit();
            let server_url = server_url_or_exit(&config, args.server_url.as_deref());
            let settings = controller_settings(&config, args.no_animation);

            match command {
                Commands::Chat => {
                    run_chat(ChatOptions {
                        server_url,
                        settings,
                        connect_timeout: config.connect_timeout(),
                        default_model: config.default_model.clone(),
                    })
                    .await
                }
                Commands::Ping => {
                    let backend =
                        HttpBackend::with_connect_timeout(&server_url, config.connect_timeout())?;
                    print_ping(backend.ping().await);
                    Ok(())
                }
                Commands::Models => {
                    let backend =
                        HttpBackend::with_connect_timeout(&server_url, config.connect_timeout())?;
                    let catalog = backend.list_models().await?;
                    let picker = ModelPicker::new(&catalog.models, catalog.loaded_model.as_deref());
                    if picker.is_empty() {
                        println!("The server offers no models.");
                    } else {
                        println!("🤖 Available models (* = loaded)");
                        for line in picker.lines() {
                            println!("{line}");
                        }
                    }
                    Ok(())
                }
                Commands::Load { name } => {
                    let backend =
                        HttpBackend::with_connect_timeout(&server_url, config.connect_timeout())?;
                    match backend.load_model(&name).await? {
                        LoadOutcome::Loaded(message) => println!("✅ {message}"),
                        LoadOutcome::Rejected(message) => {
                            eprintln!("⚠️  {message}");
                            std::process::exit(1);
                        }
                    }
                    Ok(())
                }
                Commands::Say { prompt } => {
                    run_say(&server_url, config.connect_timeout(), settings, prompt).await
                }
                Commands::Set { .. } | Commands::Unset { .. } => Ok(()),
            }
        }
    }
}

fn print_ping(connectivity: Connectivity) {
    match connectivity {
        Connectivity::Connected => println!("✅ Connected to the server."),
        Connectivity::Unexpected(body) => {
            println!("⚠️  Server is running but returned unexpected response: {body}")
        }
        Connectivity::Unreachable(reason) => {
            eprintln!("❌ Could not connect to the server: {reason}");
            std::process::exit(1);
        }
    }
}
