//! Command surface: classifies inbound text and renders command replies.
//!
//! Text starting with the command prefix (matched case-insensitively) is a command; its first
//! token picks the sub-command (also case-insensitive) and anything unknown shows help. Other
//! text starting with `!`, `/` or `.` belongs to other bots and is ignored. Everything else is a
//! chat turn.

use dbot_core::Embed;

/// Generic apology for any failed chat turn or unexpected processing error.
pub const FAILURE_REPLY: &str =
    "Desculpe, ocorreu um erro ao processar sua mensagem. Por favor, tente novamente mais tarde.";
pub const HISTORY_CLEARED_REPLY: &str = "✅ Histórico de conversa limpo com sucesso!";

pub const HELP_COLOR: u32 = 0x0099ff;
pub const MODELS_COLOR: u32 = 0x4CAF50;

const RESERVED_MARKERS: [char; 3] = ['!', '/', '.'];

/// Sub-command tokens.
const CMD_HELP: &str = "ajuda";
const CMD_MODEL: &str = "modelo";
const CMD_CLEAR: &str = "limpar";
const CMD_MODELS: &str = "modelos";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// `modelo <alias>`; `None` when no alias was given.
    SetModel(Option<String>),
    Clear,
    ListModels,
}

/// What an inbound text is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Command(Command),
    /// Blank text or another bot's command.
    Ignored,
    /// Chat turn with surrounding whitespace trimmed.
    Chat(String),
}

/// Strips `prefix` from the start of `text`, ignoring ASCII case.
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        text.get(prefix.len()..)
    } else {
        None
    }
}

fn parse_command(rest: &str) -> Command {
    let mut args = rest.split_whitespace();
    let name = args.next().map(str::to_lowercase).unwrap_or_default();
    match name.as_str() {
        CMD_MODEL => Command::SetModel(args.next().map(str::to_string)),
        CMD_CLEAR => Command::Clear,
        CMD_MODELS => Command::ListModels,
        _ => Command::Help,
    }
}

pub fn classify(text: &str, prefix: &str) -> Inbound {
    let text = text.trim();
    if text.is_empty() {
        return Inbound::Ignored;
    }
    if let Some(rest) = strip_prefix_ignore_case(text, prefix) {
        return Inbound::Command(parse_command(rest));
    }
    if text.starts_with(RESERVED_MARKERS) {
        return Inbound::Ignored;
    }
    Inbound::Chat(text.to_string())
}

pub fn invalid_model_reply<'a>(aliases: impl IntoIterator<Item = &'a str>) -> String {
    let list: Vec<&str> = aliases.into_iter().collect();
    format!("Modelo inválido. Modelos disponíveis: {}", list.join(", "))
}

pub fn model_changed_reply(alias: &str) -> String {
    format!("✅ Modelo alterado para: {alias}")
}

pub fn help_embed(prefix: &str) -> Embed {
    Embed::new("🤖 Comandos do Miku Bot", HELP_COLOR)
        .description("Aqui estão os comandos disponíveis:")
        .field(
            format!("`{prefix} {CMD_MODEL} [modelo]`"),
            "Muda o modelo de IA (flash ou pro)",
            true,
        )
        .field(
            format!("`{prefix} {CMD_CLEAR}`"),
            "Limpa o histórico de conversa",
            true,
        )
        .field(
            format!("`{prefix} {CMD_MODELS}`"),
            "Mostra os modelos disponíveis",
            true,
        )
        .field(
            format!("`{prefix} {CMD_HELP}`"),
            "Mostra esta mensagem de ajuda",
            true,
        )
        .field("\u{200B}", "\u{200B}", false)
        .field(
            "Chat normal",
            "Apenas digite sua mensagem para conversar com a Miku!",
            false,
        )
        .footer("Miku Bot - Sua assistente virtual")
}

/// One line per alias; the caller's current alias is checked.
pub fn models_embed<'a>(
    aliases: impl IntoIterator<Item = &'a str>,
    current: &str,
    prefix: &str,
) -> Embed {
    let list = aliases
        .into_iter()
        .map(|alias| {
            let mark = if alias == current { "✅" } else { "•" };
            format!("{mark} {alias}")
        })
        .collect::<Vec<_>>()
        .join("\n");
    Embed::new("🤖 Modelos Disponíveis", MODELS_COLOR)
        .description(list)
        .footer(format!("Use {prefix} {CMD_MODEL} [modelo] para mudar"))
}
