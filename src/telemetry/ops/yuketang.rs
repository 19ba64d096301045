use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Yuketang;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Read, MatchChoice, MatchFillBlank, Finalize, Write }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Read => "read",
        Phase::MatchChoice => "match_choice",
        Phase::MatchFillBlank => "match_fill_blank",
        Phase::Finalize => "finalize",
        Phase::Write => "write",
    }}
    fn span(&self) -> Span { match self {
        Phase::Read => info_span!("read"),
        Phase::MatchChoice => info_span!("match_choice"),
        Phase::MatchFillBlank => info_span!("match_fill_blank"),
        Phase::Finalize => info_span!("finalize"),
        Phase::Write => info_span!("write"),
    }}
}

impl OpMarker for Yuketang {
    const NAME: &'static str = "yuketang";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("yuketang") }
}
