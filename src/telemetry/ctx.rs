use anyhow::Result;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::{info, debug, error, Span};

use crate::output::types::Meta;

use super::emit;
use super::ops::{bank_images::BankImages, pta::Pta, xuexitong::Xuexitong, yuketang::Yuketang};

pub trait PhaseSpan {
    fn name(&self) -> &'static str;
    fn span(&self) -> Span;
}

pub trait OpMarker {
    const NAME: &'static str;
    type Phase: PhaseSpan;
    fn root_span() -> Span;
}

pub struct LogCtx<O: OpMarker> {
    pub(crate) json: bool,
    pub(crate) _marker: PhantomData<O>,
}

impl<O: OpMarker> LogCtx<O> {
    fn op_name(&self) -> &'static str { O::NAME }

    pub fn root_span(&self) -> Span { O::root_span() }

    pub fn root_span_kv<'a, T>(&self, fields: T) -> Span
    where
        T: IntoIterator<Item = (&'a str, String)>,
    {
        let span = self.root_span();
        let details = kv_to_string(fields);
        if details.is_empty() {
            info!(op = %self.op_name(), "start");
        } else {
            info!(op = %self.op_name(), details = %details, "start");
        }
        span
    }

    pub fn span(&self, ph: &O::Phase) -> Span { ph.span() }

    pub fn span_kv<'a, T>(&self, ph: &O::Phase, fields: T) -> Span
    where
        T: IntoIterator<Item = (&'a str, String)>,
    {
        let span = self.span(ph);
        let details = kv_to_string(fields);
        if details.is_empty() {
            debug!(op = %self.op_name(), phase = ph.name(), "span_start");
        } else {
            debug!(op = %self.op_name(), phase = ph.name(), details = %details, "span_start");
        }
        span
    }

    pub fn info(&self, msg: impl AsRef<str>) { if self.json { info!(op = %self.op_name(), "{}", msg.as_ref()); } else { info!("{}", msg.as_ref()); } }
    pub fn error(&self, msg: impl AsRef<str>) { if self.json { error!(op = %self.op_name(), "{}", msg.as_ref()); } else { error!("{}", msg.as_ref()); } }

    pub fn info_kv<'a, D>(&self, msg: &str, kv: D)
    where
        D: IntoIterator<Item = (&'a str, String)>,
    {
        let details = kv_to_string(kv);
        if self.json { info!(op = %self.op_name(), details = %details, "{}", msg); }
        else { info!("{} {}", msg, details); }
    }

    pub fn debug_kv<'a, D>(&self, msg: &str, kv: D)
    where
        D: IntoIterator<Item = (&'a str, String)>,
    {
        let details = kv_to_string(kv);
        if self.json { debug!(op = %self.op_name(), details = %details, "{}", msg); }
        else { debug!("{} {}", msg, details); }
    }

    pub fn error_kv<'a, D>(&self, msg: &str, kv: D)
    where
        D: IntoIterator<Item = (&'a str, String)>,
    {
        let details = kv_to_string(kv);
        if self.json { error!(op = %self.op_name(), details = %details, "{}", msg); }
        else { error!("{} {}", msg, details); }
    }

    pub fn plan<T: Serialize>(&self, plan: &T, meta: Option<Meta>) -> Result<()> { emit::print_plan(self.op_name(), plan, meta) }
    pub fn result<T: Serialize>(&self, result: &T, meta: Option<Meta>) -> Result<()> { emit::print_result(self.op_name(), result, meta) }
}

impl LogCtx<Pta> {
    pub fn summary(&self, kind: &str, extracted: usize, output: &str) {
        if self.json { info!(op = %self.op_name(), kind, extracted, output, "pta_summary"); }
        else { info!("✅ Extracted {} {} question(s) → {}", extracted, kind, output); }
    }
}

impl LogCtx<Xuexitong> {
    pub fn summary(&self, kind: &str, extracted: usize, output: &str) {
        if self.json { info!(op = %self.op_name(), kind, extracted, output, "xuexitong_summary"); }
        else { info!("✅ Successfully extracted {} {} question(s) to {}", extracted, kind, output); }
    }
}

impl LogCtx<Yuketang> {
    pub fn stats(&self, choice: usize, fill_blank: usize) {
        let total = choice + fill_blank;
        if self.json { info!(op = %self.op_name(), choice, fill_blank, total, "yuketang_stats"); }
        else { info!("📊 Conversion stats: choice={} fill_blank={} total={}", choice, fill_blank, total); }
    }
}

impl LogCtx<BankImages> {
    pub fn totals(&self, scanned: usize, changed: usize, failed: usize) {
        if self.json { info!(op = %self.op_name(), scanned, changed, failed, "bank_images_totals"); }
        else { info!("📊 Scanned: {} json files, changed={} failed={}", scanned, changed, failed); }
    }
}

fn kv_to_string<'a, T>(kv: T) -> String
where
    T: IntoIterator<Item = (&'a str, String)>,
{
    let mut parts: Vec<String> = Vec::new();
    for (k, v) in kv { parts.push(format!("{}={}", k, v)); }
    parts.join(" ")
}
