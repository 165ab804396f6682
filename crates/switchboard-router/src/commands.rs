//! Built-in slash commands: instant replies, no provider call.

use switchboard_core::traits::ConfigSource;
use switchboard_providers::label;

use crate::context::ConversationStore;

/// What a command handler may look at.
pub struct CommandContext<'a> {
    pub config: &'a dyn ConfigSource,
    pub context: &'a ConversationStore,
    pub user_id: &'a str,
    pub bot_name: &'a str,
}

/// Known commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Menu,
    Status,
    History,
    Reset,
}

impl Command {
    /// Parse a command from message text. Returns `None` for unknown `/`
    /// prefixes, which go through normal routing.
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        // Strip @botname suffix ("/help@switchboard" → "/help").
        let cmd = first.split('@').next().unwrap_or(first).to_lowercase();
        match cmd.as_str() {
            "/help" => Some(Self::Help),
            "/menu" => Some(Self::Menu),
            "/status" => Some(Self::Status),
            "/history" => Some(Self::History),
            "/reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

/// Handle a command and return the reply text.
pub fn handle(cmd: Command, ctx: &CommandContext<'_>) -> String {
    match cmd {
        Command::Help => handle_help(ctx.bot_name),
        Command::Menu => handle_menu(),
        Command::Status => handle_status(ctx.config),
        Command::History => handle_history(ctx.context, ctx.user_id),
        Command::Reset => handle_reset(ctx.context, ctx.user_id),
    }
}

fn handle_help(bot_name: &str) -> String {
    format!(
        "*{bot_name}*\n\n\
         Just write what you need:\n\
         - Search for latest AI news\n\
         - Weather in New York\n\
         - Translate hello to Spanish\n\
         - Summarize https://youtu.be/VIDEO_ID\n\
         - Phone number +1234567890\n\
         - Phone specs for iPhone 15\n\n\
         Anything else is answered by chat. Send /menu for commands."
    )
}

fn handle_menu() -> String {
    "*Menu:*\n\
     /help - what I can do\n\
     /status - available services\n\
     /history - your recent requests\n\
     /reset - forget your recent requests"
        .to_string()
}

fn handle_status(config: &dyn ConfigSource) -> String {
    let enabled = config.enabled_providers();
    if enabled.is_empty() {
        return "No services are enabled.".to_string();
    }
    let mut out = String::from("*Available services:*\n");
    for (name, api) in &enabled {
        let what = if api.description.is_empty() {
            label(name)
        } else {
            api.description.as_str()
        };
        out.push_str(&format!("\n- {name}: {what}"));
    }
    out
}

fn handle_history(context: &ConversationStore, user_id: &str) -> String {
    let entries = context.history(user_id);
    if entries.is_empty() {
        return "No recent requests.".to_string();
    }
    let mut out = String::from("*Recent requests:*\n");
    for (i, entry) in entries.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. [{}] {} ({})",
            i + 1,
            entry.intent,
            entry.message,
            entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        ));
    }
    out
}

fn handle_reset(context: &ConversationStore, user_id: &str) -> String {
    match context.clear(user_id) {
        0 => "Nothing to reset.".to_string(),
        n => format!("Session has been reset ({n} requests forgotten)."),
    }
}
