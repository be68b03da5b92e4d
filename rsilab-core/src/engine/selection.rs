//! Candidate selection across trade sides.
//!
//! With `LongShort` both a resistance and a support line may exist. An
//! actionable interaction always wins; among several, the most recent
//! breakout wins and ties keep the long side. Without an actionable one the
//! most informative non-actionable outcome is reported.

use crate::domain::TradeSide;
use crate::trendline::{Interaction, InteractionKind, Trendline};

/// A fitted line and its interaction for one side.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub side: TradeSide,
    pub trendline: Trendline,
    pub interaction: Interaction,
}

/// Outcome of choosing among the per-side candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection<'a> {
    /// Initial breakout or retest; goes on to the gates.
    Actionable(&'a Candidate),
    /// Broken too long ago or too far from the line.
    Stale(&'a Candidate),
    /// Line found but intact.
    Intact(&'a Candidate),
    NoTrendline,
}

pub fn select(candidates: &[Candidate]) -> Selection<'_> {
    let mut actionable: Option<&Candidate> = None;
    for c in candidates.iter().filter(|c| c.interaction.kind.is_actionable()) {
        let newer = actionable.map_or(true, |best| {
            c.interaction.breakout_index > best.interaction.breakout_index
        });
        if newer {
            actionable = Some(c);
        }
    }
    if let Some(c) = actionable {
        return Selection::Actionable(c);
    }

    let stale = candidates
        .iter()
        .filter(|c| c.interaction.kind == InteractionKind::Continuation)
        .min_by_key(|c| c.interaction.bars_since_breakout);
    if let Some(c) = stale {
        return Selection::Stale(c);
    }

    match candidates.first() {
        Some(c) => Selection::Intact(c),
        None => Selection::NoTrendline,
    }
}
