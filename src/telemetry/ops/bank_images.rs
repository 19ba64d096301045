use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct BankImages;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Walk, Convert }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self { Phase::Walk => "walk", Phase::Convert => "convert" } }
    fn span(&self) -> Span { match self { Phase::Walk => info_span!("walk"), Phase::Convert => info_span!("convert") } }
}

impl OpMarker for BankImages {
    const NAME: &'static str = "bank_images";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("bank_images") }
}
