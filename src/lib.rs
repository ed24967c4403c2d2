//! llm-sampler is a terminal chat client for a remote LLM sampling server.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation: messages, session state, prompt
//!   assembly, the turn state machine and the paced reply reveal.
//! - [`api`] talks to the server over HTTP and defines its payloads.
//! - [`ui`] presents the session in the terminal and runs the input loop.
//! - [`commands`] parses the slash commands typed at the prompt.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`], which
//! resolves configuration and dispatches into [`ui::chat_loop`] or one of
//! the one-shot commands.

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
