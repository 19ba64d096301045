use scraper::{ElementRef, Html};
use tracing::debug;

use crate::bank::{Question, TrueFalse};

use super::text::{selector, stripped_text, stripped_text_with};
use super::QuestionKind;

const BLANK_TOKEN: &str = "【】";

pub fn extract(html: &str, kind: QuestionKind) -> Vec<Question> {
    let doc = Html::parse_document(html);
    let Some(container_sel) = selector("div.questionLi") else { return Vec::new() };
    let Some(text_sel) = selector("span.qtContent") else { return Vec::new() };

    let mut out = Vec::new();
    for container in doc.select(&container_sel) {
        let Some(text_el) = container.select(&text_sel).next() else { continue };
        let parsed = match kind {
            QuestionKind::Choice => choice(container, text_el),
            QuestionKind::TrueOrFalse => true_false(container, text_el),
            QuestionKind::FillBlank => fill_blank(container, text_el),
        };
        if let Some(q) = parsed { out.push(q); }
    }
    out
}

fn right_answer(container: ElementRef<'_>) -> Option<String> {
    let sel = selector("span.rightAnswerContent")?;
    container.select(&sel).next().map(stripped_text)
}

fn choice(container: ElementRef<'_>, text_el: ElementRef<'_>) -> Option<Question> {
    let list_sel = selector("ul.mark_letter")?;
    let item_sel = selector("li")?;
    let choices: Vec<String> = container
        .select(&list_sel)
        .next()?
        .select(&item_sel)
        .map(stripped_text)
        .collect();
    let answer = right_answer(container)?;
    if choices.is_empty() { return None; }
    let record = Question::Choice { question: stripped_text(text_el), choices, answer };
    if let Err(e) = record.validate() {
        debug!(error = %e, "malformed choice, skipping");
        return None;
    }
    Some(record)
}

fn true_false(container: ElementRef<'_>, text_el: ElementRef<'_>) -> Option<Question> {
    let label = right_answer(container)?;
    if label != "对" && label != "错" {
        debug!(label = %label, "unrecognised true/false label, recorded as F");
    }
    let answer = if label == "对" { TrueFalse::T } else { TrueFalse::F };
    Some(Question::TrueOrFalse { question: stripped_text(text_el), answer: Some(answer) })
}

fn fill_blank(container: ElementRef<'_>, text_el: ElementRef<'_>) -> Option<Question> {
    let span_sel = selector("span")?;
    let answer_sel = selector("dd.rightAnswerContent")?;

    let blanks: Vec<(ElementRef<'_>, String)> = text_el
        .select(&span_sel)
        .filter(|span| span.value().attr("style").is_some_and(|style| style.contains("underline")))
        .map(|span| (span, BLANK_TOKEN.to_string()))
        .collect();
    let question = stripped_text_with(text_el, &blanks, "");

    // answers read "(1) xxx"; keep what follows the last ')'
    let answers: Vec<String> = container
        .select(&answer_sel)
        .map(|dd| {
            let text = stripped_text(dd);
            text.rsplit(')').next().unwrap_or_default().trim().to_string()
        })
        .collect();
    if answers.is_empty() { return None; }
    Some(Question::fill_blank(question, answers))
}
