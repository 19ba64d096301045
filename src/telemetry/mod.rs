pub mod config;
pub mod ctx;
pub mod emit;
pub mod ops;

use std::marker::PhantomData;

use ctx::LogCtx;

pub fn pta() -> LogCtx<ops::pta::Pta> { LogCtx { json: config::logs_are_json(), _marker: PhantomData } }
pub fn xuexitong() -> LogCtx<ops::xuexitong::Xuexitong> { LogCtx { json: config::logs_are_json(), _marker: PhantomData } }
pub fn yuketang() -> LogCtx<ops::yuketang::Yuketang> { LogCtx { json: config::logs_are_json(), _marker: PhantomData } }
pub fn bank_images() -> LogCtx<ops::bank_images::BankImages> { LogCtx { json: config::logs_are_json(), _marker: PhantomData } }
