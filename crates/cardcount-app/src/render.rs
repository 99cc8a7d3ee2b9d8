use cardcount_core::ledger::{CardBadge, HistoryEntry, SessionLedger, Touch, TouchKind};
use cardcount_core::model::card::CardId;
use cardcount_core::model::rank::Rank;
use cardcount_core::model::suit::Suit;
use cardcount_core::scoring::Advice;
use serde::Serialize;
use std::fmt::Write as _;

pub const LEGEND: &str =
    "- means low cards are more likely, + means high cards are more likely. 8 and 9 are neutral.";

/// Signed score text: `+2`, `-1`, `0`.
pub fn format_score(score: i64) -> String {
    if score > 0 {
        format!("+{score}")
    } else {
        score.to_string()
    }
}

pub fn advice_for(ledger: &SessionLedger) -> Advice {
    if ledger.is_empty() {
        Advice::Idle
    } else {
        Advice::for_count(ledger.total())
    }
}

fn tendency(total: i64) -> &'static str {
    if total < 0 {
        "low"
    } else if total > 0 {
        "high"
    } else {
        "even"
    }
}

fn entry_text(entry: &HistoryEntry) -> String {
    format!(
        "{} ({})",
        format_score(i64::from(entry.score)),
        entry.card().label()
    )
}

fn cell_text(rank: Rank, badge: CardBadge, touched: bool) -> String {
    let label = rank.to_string();
    let body = match badge {
        CardBadge::Idle => label,
        CardBadge::Active => format!("[{label}]"),
        CardBadge::Stacked(n) => format!("[{label}]x{n}"),
        CardBadge::Saturated(n) => format!("<{label}>x{n}"),
    };
    if touched { format!(">{body}") } else { body }
}

fn touch_text(touch: Touch) -> String {
    let action = match touch.kind {
        TouchKind::Record => "recorded",
        TouchKind::Unrecord => "undone",
        TouchKind::Clear => "cleared",
    };
    format!("{} ({action})", touch.card.label())
}

/// Full text view: total, recent window, per-suit grid and notices.
pub fn render_text(ledger: &SessionLedger, recent: usize) -> String {
    let mut out = String::new();
    let total = ledger.total();
    let entries = ledger.len();
    let _ = writeln!(
        out,
        "Total: {} ({entries} card{}, {})",
        format_score(total),
        if entries == 1 { "" } else { "s" },
        tendency(total)
    );

    let window = ledger.recent(recent);
    if window.is_empty() {
        let _ = writeln!(
            out,
            "Recent: record a card to log it here (last {recent})"
        );
    } else {
        let items: Vec<String> = window.iter().map(entry_text).collect();
        let _ = writeln!(out, "Recent: {}", items.join(" "));
    }

    let touched = ledger.last_touched().map(|touch| touch.card);
    for suit in Suit::ALL {
        let cells: Vec<String> = Rank::ORDERED
            .iter()
            .map(|&rank| {
                let card = CardId::new(rank, suit);
                cell_text(rank, ledger.badge(card), touched == Some(card))
            })
            .collect();
        let _ = writeln!(
            out,
            "{} {:<9}{}",
            suit.symbol(),
            suit.key(),
            cells.join(" ")
        );
    }

    if let Some(touch) = ledger.last_touched() {
        let _ = writeln!(out, "Last: {}", touch_text(touch));
    }
    let _ = writeln!(out, "Advice: {}", advice_for(ledger));
    if ledger.limit_reached() {
        let _ = writeln!(
            out,
            "[!] History limit of {} reached. Reset to continue (or 'ok' to dismiss).",
            ledger.capacity()
        );
    }
    out
}

#[derive(Debug, Serialize)]
pub struct CardCount {
    pub card: String,
    pub count: u32,
}

/// One JSON status line per gesture.
#[derive(Debug, Serialize)]
pub struct Status<'a> {
    pub gesture: &'static str,
    pub note: &'a str,
    pub total: i64,
    pub entries: usize,
    pub capacity: usize,
    pub limit_reached: bool,
    pub advice: Advice,
    pub recent: &'a [HistoryEntry],
    pub counts: Vec<CardCount>,
}

impl<'a> Status<'a> {
    pub fn capture(
        ledger: &'a SessionLedger,
        gesture: &'static str,
        note: &'a str,
        recent: usize,
    ) -> Self {
        Self {
            gesture,
            note,
            total: ledger.total(),
            entries: ledger.len(),
            capacity: ledger.capacity(),
            limit_reached: ledger.limit_reached(),
            advice: advice_for(ledger),
            recent: ledger.recent(recent),
            counts: ledger
                .occurrences()
                .iter()
                .map(|(card, count)| CardCount {
                    card: card.to_string(),
                    count,
                })
                .collect(),
        }
    }
}
