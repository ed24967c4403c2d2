//! Slash commands typed at the chat prompt.

pub mod registry;

pub use registry::{all_commands, find_command, CommandInvocation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    Models,
    Load(String),
    Reset,
    Status,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedInput {
    /// Text to send to the model.
    Prompt(String),
    Command(ChatCommand),
    /// A slash command that could not be understood, with the reason.
    Invalid(String),
}

pub fn parse_input(input: &str) -> ParsedInput {
    let trimmed = input.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return ParsedInput::Prompt(input.to_string());
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    match find_command(name) {
        Some(command) => match (command.build)(CommandInvocation {
            input: trimmed,
            args,
        }) {
            Ok(parsed) => ParsedInput::Command(parsed),
            Err(reason) => ParsedInput::Invalid(reason),
        },
        None => ParsedInput::Invalid(format!("Unknown command: /{name}. Try /help.")),
    }
}

pub fn help_text() -> String {
    let width = all_commands()
        .iter()
        .map(|command| command.usage.len())
        .max()
        .unwrap_or(0);
    let mut text = String::from("Commands:");
    for command in all_commands() {
        text.push_str(&format!("\n  {:width$}  {}", command.usage, command.help));
    }
    text.push_str("\nAnything else is sent to the model.");
    text
}
