use cardcount_core::model::ParseCardError;
use cardcount_core::model::card::CardId;
use thiserror::Error;

/// One user action on the grid, read from a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Left click.
    Record(CardId),
    /// Right click.
    Unrecord(CardId),
    /// Both buttons at once.
    Clear(CardId),
    Reset,
    AcknowledgeLimit,
    Show,
    Quit,
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Record(_) => "record",
            Gesture::Unrecord(_) => "unrecord",
            Gesture::Clear(_) => "clear",
            Gesture::Reset => "reset",
            Gesture::AcknowledgeLimit => "ok",
            Gesture::Show => "show",
            Gesture::Quit => "quit",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GestureError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("missing card after '{0}'")]
    MissingCard(&'static str),
    #[error("bad card '{token}': {source}")]
    BadCard {
        token: String,
        #[source]
        source: ParseCardError,
    },
}

/// Parses one input line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Gesture>, GestureError> {
    let line = match line.split_once('#') {
        Some((before, _)) => before,
        None => line,
    }
    .trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let head = words.next().unwrap_or_default();
    let arg = words.next();

    let gesture = match head.to_ascii_lowercase().as_str() {
        "reset" => Gesture::Reset,
        "ok" | "ack" => Gesture::AcknowledgeLimit,
        "show" => Gesture::Show,
        "quit" | "exit" => Gesture::Quit,
        "record" | "add" => Gesture::Record(card_arg("record", arg)?),
        "undo" | "remove" => Gesture::Unrecord(card_arg("undo", arg)?),
        "clear" => Gesture::Clear(card_arg("clear", arg)?),
        _ => parse_shorthand(head)?,
    };
    Ok(Some(gesture))
}

fn card_arg(command: &'static str, arg: Option<&str>) -> Result<CardId, GestureError> {
    let token = arg.ok_or(GestureError::MissingCard(command))?;
    parse_card(token)
}

fn parse_shorthand(token: &str) -> Result<Gesture, GestureError> {
    let mut chars = token.chars();
    match chars.next() {
        Some('+') => Ok(Gesture::Record(parse_card(chars.as_str())?)),
        Some('-') => Ok(Gesture::Unrecord(parse_card(chars.as_str())?)),
        Some('*') => Ok(Gesture::Clear(parse_card(chars.as_str())?)),
        Some(c) if c.is_ascii_alphanumeric() => token
            .parse::<CardId>()
            .map(Gesture::Record)
            .map_err(|_| GestureError::UnknownCommand(token.to_string())),
        _ => Err(GestureError::UnknownCommand(token.to_string())),
    }
}

fn parse_card(token: &str) -> Result<CardId, GestureError> {
    token.parse().map_err(|source| GestureError::BadCard {
        token: token.to_string(),
        source,
    })
}
