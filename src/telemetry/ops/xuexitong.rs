use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Xuexitong;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Read, Extract, Write }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self { Phase::Read => "read", Phase::Extract => "extract", Phase::Write => "write" } }
    fn span(&self) -> Span { match self { Phase::Read => info_span!("read"), Phase::Extract => info_span!("extract"), Phase::Write => info_span!("write") } }
}

impl OpMarker for Xuexitong {
    const NAME: &'static str = "xuexitong";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("xuexitong") }
}
