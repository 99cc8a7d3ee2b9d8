use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use cardcount_core::AppInfo;
use cardcount_core::ledger::{RecordOutcome, SessionLedger};
use cardcount_core::model::card::CardId;
use clap::ValueEnum;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::gesture::{Gesture, parse_line};
use crate::render::{LEGEND, Status, format_score, render_text};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub flow: Flow,
    pub note: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub gestures: usize,
    pub errors: usize,
    pub total: i64,
    pub entries: usize,
}

/// Owns the ledger for one session and turns gestures into ledger calls.
pub struct SessionController {
    ledger: SessionLedger,
    recent: usize,
    format: OutputFormat,
}

impl SessionController {
    pub fn new(config: &AppConfig, format: OutputFormat) -> Self {
        Self {
            ledger: SessionLedger::new(config.ledger_settings()),
            recent: config.display.recent,
            format,
        }
    }

    pub fn ledger(&self) -> &SessionLedger {
        &self.ledger
    }

    pub fn apply(&mut self, gesture: Gesture) -> Step {
        let note = match gesture {
            Gesture::Record(card) => self.record(card),
            Gesture::Unrecord(card) => {
                let outcome = self.ledger.unrecord(card);
                if outcome.history_removed {
                    format!("undid {} ({} left)", card.label(), outcome.remaining)
                } else {
                    format!("no history entry for {}", card.label())
                }
            }
            Gesture::Clear(card) => match self.ledger.clear_identity(card) {
                Some(count) => format!("cleared {count} mark(s) of {}", card.label()),
                None => format!("{} has no marks", card.label()),
            },
            Gesture::Reset => {
                self.ledger.reset_all();
                "reset".to_string()
            }
            Gesture::AcknowledgeLimit => {
                self.ledger.acknowledge_limit();
                "limit notice dismissed".to_string()
            }
            Gesture::Show => String::new(),
            Gesture::Quit => {
                return Step {
                    flow: Flow::Quit,
                    note: "bye".to_string(),
                };
            }
        };
        Step {
            flow: Flow::Continue,
            note,
        }
    }

    fn record(&mut self, card: CardId) -> String {
        let score = format_score(i64::from(self.ledger.score_of(card)));
        match self.ledger.record(card) {
            RecordOutcome::Appended => format!("recorded {} ({score})", card.label()),
            RecordOutcome::Truncated { dropped } => format!(
                "recorded {} ({score}); dropped {dropped} oldest",
                card.label()
            ),
            RecordOutcome::LimitReached => format!(
                "history limit of {} reached; {} not recorded",
                self.ledger.capacity(),
                card.label()
            ),
        }
    }

    /// Reads gestures line by line until EOF or `quit`. Bad lines are
    /// reported and skipped.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<SessionSummary> {
        info!(
            target: "cardcount_app::session",
            system = self.ledger.system().name(),
            capacity = self.ledger.capacity(),
            policy = self.ledger.policy().as_str(),
            "session started"
        );

        let mut summary = SessionSummary::default();
        if self.format == OutputFormat::Text {
            self.write_banner(out)?;
        }

        for line in input.lines() {
            let line = line.context("reading gesture input")?;
            let gesture = match parse_line(&line) {
                Ok(Some(gesture)) => gesture,
                Ok(None) => continue,
                Err(err) => {
                    summary.errors += 1;
                    warn!(
                        target: "cardcount_app::session",
                        input = %line.trim(),
                        error = %err,
                        "bad gesture"
                    );
                    self.write_error(out, &err.to_string())?;
                    continue;
                }
            };

            summary.gestures += 1;
            let step = self.apply(gesture);
            self.write_step(out, gesture, &step)?;
            if step.flow == Flow::Quit {
                break;
            }
        }

        summary.total = self.ledger.total();
        summary.entries = self.ledger.len();
        info!(
            target: "cardcount_app::session",
            gestures = summary.gestures,
            errors = summary.errors,
            total = summary.total,
            entries = summary.entries,
            "session finished"
        );
        out.flush().context("flushing session output")?;
        Ok(summary)
    }

    fn write_banner<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(
            out,
            "{} v{} ({} count, {} at {})",
            AppInfo::tagline(),
            AppInfo::version(),
            self.ledger.system().name(),
            self.ledger.policy().as_str(),
            self.ledger.capacity()
        )?;
        writeln!(out, "{LEGEND}")?;
        write!(out, "{}", render_text(&self.ledger, self.recent))?;
        Ok(())
    }

    fn write_error<W: Write>(&self, out: &mut W, message: &str) -> Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(out, "error: {message}")?,
            OutputFormat::Json => {
                let value = serde_json::json!({ "error": message });
                writeln!(out, "{value}")?;
            }
        }
        Ok(())
    }

    fn write_step<W: Write>(&self, out: &mut W, gesture: Gesture, step: &Step) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                if !step.note.is_empty() {
                    writeln!(out, "> {}", step.note)?;
                }
                if step.flow == Flow::Continue {
                    write!(out, "{}", render_text(&self.ledger, self.recent))?;
                }
            }
            OutputFormat::Json => {
                let status = Status::capture(&self.ledger, gesture.name(), &step.note, self.recent);
                let line = serde_json::to_string(&status).context("encoding status line")?;
                writeln!(out, "{line}")?;
            }
        }
        Ok(())
    }
}
