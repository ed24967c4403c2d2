use super::ChatCommand;

pub type CommandBuilder = fn(CommandInvocation<'_>) -> Result<ChatCommand, String>;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub build: CommandBuilder,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub input: &'a str,
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

fn no_args(command: ChatCommand, invocation: CommandInvocation<'_>) -> Result<ChatCommand, String> {
    if invocation.args.is_empty() {
        Ok(command)
    } else {
        Err(format!("{} takes no arguments", invocation.input))
    }
}

fn build_help(invocation: CommandInvocation<'_>) -> Result<ChatCommand, String> {
    no_args(ChatCommand::Help, invocation)
}

fn build_models(invocation: CommandInvocation<'_>) -> Result<ChatCommand, String> {
    no_args(ChatCommand::Models, invocation)
}

fn build_load(invocation: CommandInvocation<'_>) -> Result<ChatCommand, String> {
    if invocation.args.is_empty() {
        Err("Usage: /load <model name or number from /models>".to_string())
    } else {
        Ok(ChatCommand::Load(invocation.args.to_string()))
    }
}

fn build_reset(invocation: CommandInvocation<'_>) -> Result<ChatCommand, String> {
    no_args(ChatCommand::Reset, invocation)
}

fn build_status(invocation: CommandInvocation<'_>) -> Result<ChatCommand, String> {
    no_args(ChatCommand::Status, invocation)
}

fn build_quit(invocation: CommandInvocation<'_>) -> Result<ChatCommand, String> {
    no_args(ChatCommand::Quit, invocation)
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show available commands.",
        build: build_help,
    },
    Command {
        name: "models",
        usage: "/models",
        help: "List the models the server offers.",
        build: build_models,
    },
    Command {
        name: "load",
        usage: "/load <name|number>",
        help: "Ask the server to load a model.",
        build: build_load,
    },
    Command {
        name: "reset",
        usage: "/reset",
        help: "Clear the conversation.",
        build: build_reset,
    },
    Command {
        name: "status",
        usage: "/status",
        help: "Check the connection and show the loaded model.",
        build: build_status,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Leave the chat.",
        build: build_quit,
    },
];
