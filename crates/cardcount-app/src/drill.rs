use std::io::Write;

use anyhow::Result;
use cardcount_core::model::shoe::{MAX_DECKS, Shoe};
use cardcount_core::scoring::{Advice, CountSystemKind};
use tracing::info;

use crate::render::format_score;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrillOptions {
    /// Random when absent; the chosen seed is reported so a run can be replayed.
    pub seed: Option<u64>,
    pub decks: usize,
    pub cards: usize,
    pub system: CountSystemKind,
}

impl Default for DrillOptions {
    fn default() -> Self {
        Self {
            seed: None,
            decks: 1,
            cards: 52,
            system: CountSystemKind::Weighted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrillSummary {
    pub seed: u64,
    pub dealt: usize,
    pub running_count: i64,
    pub remaining: usize,
}

/// Deals from a seeded shoe and prints the running count after each card.
pub fn run_drill<W: Write>(options: &DrillOptions, out: &mut W) -> Result<DrillSummary> {
    let seed = options.seed.unwrap_or_else(rand::random);
    let decks = options.decks.clamp(1, MAX_DECKS);
    let mut shoe = Shoe::shuffled_with_seed(decks, seed);
    let system = options.system.build();

    writeln!(
        out,
        "Drill seed {seed}: {decks} deck{}, {} count. {}",
        if decks == 1 { "" } else { "s" },
        system.name(),
        Advice::Idle
    )?;

    let mut running = 0i64;
    let mut dealt = 0usize;
    while dealt < options.cards {
        let Some(card) = shoe.deal() else {
            break;
        };
        dealt += 1;
        let score = system.score(card.rank);
        running += i64::from(score);
        writeln!(
            out,
            "{dealt:>4}. {:<4} {:>3}  running {:>4}  {}",
            card.label(),
            format_score(i64::from(score)),
            format_score(running),
            Advice::for_count(running)
        )?;
    }

    let summary = DrillSummary {
        seed,
        dealt,
        running_count: running,
        remaining: shoe.remaining(),
    };
    writeln!(
        out,
        "Dealt {dealt} card{}, running count {}, {} left in shoe",
        if dealt == 1 { "" } else { "s" },
        format_score(running),
        summary.remaining
    )?;
    info!(
        target: "cardcount_app::drill",
        seed,
        decks,
        dealt,
        running_count = running,
        "drill finished"
    );
    Ok(summary)
}
