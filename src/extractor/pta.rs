use std::collections::BTreeSet;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use crate::bank::{Question, TrueFalse};

use super::text::{preview, selector, stripped_text, stripped_text_with};
use super::QuestionKind;

const CONTAINER: &str = "div.pc-x[id]";
const QUESTION_TEXT: &str = "div.rendered-markdown p";
const RADIO_INPUT: &str = "input[type=radio]";

pub fn extract(html: &str, kind: QuestionKind) -> Vec<Question> {
    let doc = Html::parse_document(html);
    match kind {
        QuestionKind::TrueOrFalse => extract_true_false(&doc),
        QuestionKind::Choice => extract_choice(&doc),
        QuestionKind::FillBlank => extract_fill_blank(&doc),
    }
}

fn containers<'a>(doc: &'a Html, what: &str) -> Vec<ElementRef<'a>> {
    let Some(sel) = selector(CONTAINER) else { return Vec::new() };
    let found: Vec<ElementRef<'a>> = doc.select(&sel).collect();
    info!("found {} candidate {} containers", found.len(), what);
    found
}

pub fn extract_true_false(doc: &Html) -> Vec<Question> {
    let (Some(text_sel), Some(radio_sel)) = (selector(QUESTION_TEXT), selector(RADIO_INPUT)) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for container in containers(doc, "true/false") {
        let Some(text_el) = container.select(&text_sel).next() else { continue };
        let question = stripped_text(text_el);

        let mut labels: Vec<String> = Vec::new();
        let mut checked: Option<String> = None;
        for radio in container.select(&radio_sel) {
            let Some(label) = enclosing_label(radio) else { continue };
            let text = stripped_text(label);
            if radio.value().attr("checked").is_some() { checked = Some(text.clone()); }
            labels.push(text);
        }

        if !is_true_false_set(&labels) {
            debug!(labels = ?labels, "not a T/F option set, skipping");
            continue;
        }
        let answer = checked.as_deref().and_then(TrueFalse::from_label);
        info!("extracted true/false: {}...", preview(&question, 30));
        out.push(Question::TrueOrFalse { question, answer });
    }
    out
}

pub fn extract_choice(doc: &Html) -> Vec<Question> {
    let (Some(text_sel), Some(radio_sel), Some(row_sel), Some(tag_sel)) = (
        selector(QUESTION_TEXT),
        selector(RADIO_INPUT),
        selector("label.w-full"),
        selector("span:not([class])"),
    ) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for container in containers(doc, "choice") {
        let Some(text_el) = container.select(&text_sel).next() else { continue };
        let question = stripped_text(text_el).replace('\n', " ");

        let mut choices: Vec<String> = Vec::new();
        let mut answer: Option<String> = None;
        for row in container.select(&row_sel) {
            let (Some(input), Some(tag_el), Some(option_el)) = (
                row.select(&radio_sel).next(),
                row.select(&tag_sel).next(),
                row.select(&text_sel).next(),
            ) else {
                continue;
            };
            let tag = stripped_text(tag_el).replace('.', "");
            choices.push(format!("{}.{}", tag, stripped_text(option_el)));
            if input.value().attr("checked").is_some() { answer = Some(tag); }
        }

        let Some(answer) = answer.filter(|a| !a.is_empty()) else {
            debug!("no checked option, skipping: {}", preview(&question, 30));
            continue;
        };
        if choices.is_empty() { continue; }
        let record = Question::Choice { question, choices, answer };
        if let Err(e) = record.validate() {
            debug!(error = %e, "malformed choice, skipping");
            continue;
        }
        info!("extracted choice: {}...", preview(record.question(), 30));
        out.push(record);
    }
    out
}

pub fn extract_fill_blank(doc: &Html) -> Vec<Question> {
    let (Some(body_sel), Some(blank_sel), Some(input_sel), Some(score_sel)) = (
        selector("div.rendered-markdown"),
        selector(r#"span[data-blank="true"]"#),
        selector(r#"input[data-blank="true"]"#),
        selector(".pc-text-raw"),
    ) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for container in containers(doc, "fill-blank") {
        let Some(body) = container.select(&body_sel).next() else { continue };
        let blanks: Vec<ElementRef<'_>> = body.select(&blank_sel).collect();
        if blanks.is_empty() { continue; }

        let mut answers: Vec<String> = Vec::with_capacity(blanks.len());
        let mut placeholders: Vec<(ElementRef<'_>, String)> = Vec::with_capacity(blanks.len());
        for (i, blank) in blanks.into_iter().enumerate() {
            let value = blank
                .select(&input_sel)
                .next()
                .and_then(|input| input.value().attr("value"))
                .unwrap_or("");
            answers.push(value.to_string());
            placeholders.push((blank, format!("【第{}空({}分)】", i + 1, blank_score(blank, &score_sel))));
        }

        let question = stripped_text_with(body, &placeholders, "\n");
        info!("extracted fill-blank: {}...", preview(&question, 30));
        out.push(Question::fill_blank(question, answers));
    }
    out
}

fn enclosing_label<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.ancestors().filter_map(ElementRef::wrap).find(|a| a.value().name() == "label")
}

fn is_true_false_set(labels: &[String]) -> bool {
    let set: BTreeSet<&str> = labels.iter().map(String::as_str).collect();
    set.len() == 2 && set.contains("T") && set.contains("F")
}

/// Digits of the blank's "(N分)" annotation, or `x` when there is none.
fn blank_score(blank: ElementRef<'_>, score_sel: &Selector) -> String {
    blank
        .select(score_sel)
        .next()
        .map(|el| el.text().collect::<String>())
        .filter(|t| t.contains('分'))
        .map(|t| t.chars().filter(char::is_ascii_digit).collect::<String>())
        .filter(|digits| !digits.is_empty())
        .unwrap_or_else(|| "x".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> String {
        format!("<html><body>{}</body></html>", body)
    }

    #[test]
    fn choice_three_options_second_checked() {
        let html = page(r#"
        <div class="pc-x" id="q1">
          <div class="rendered-markdown"><p>进程是
             什么？</p></div>
          <label class="w-full"><input type="radio" name="q1"><span>A.</span><div class="rendered-markdown"><p>一段程序</p></div></label>
          <label class="w-full"><input type="radio" name="q1" checked><span>B.</span><div class="rendered-markdown"><p>程序的一次执行</p></div></label>
          <label class="w-full"><input type="radio" name="q1"><span>C.</span><div class="rendered-markdown"><p>一个文件</p></div></label>
        </div>"#);
        let got = extract(&html, QuestionKind::Choice);
        assert_eq!(got, vec![Question::Choice {
            question: "进程是\n             什么？".replace('\n', " "),
            choices: vec!["A.一段程序".into(), "B.程序的一次执行".into(), "C.一个文件".into()],
            answer: "B".into(),
        }]);
    }

    #[test]
    fn choice_without_checked_option_is_dropped() {
        let html = page(r#"
        <div class="pc-x" id="q1">
          <div class="rendered-markdown"><p>Q</p></div>
          <label class="w-full"><input type="radio"><span>A.</span><div class="rendered-markdown"><p>x</p></div></label>
        </div>
        <div class="pc-x" id="q2">
          <div class="rendered-markdown"><p>Q2</p></div>
          <label class="w-full"><input type="radio" checked><span>A.</span><div class="rendered-markdown"><p>y</p></div></label>
        </div>"#);
        let got = extract(&html, QuestionKind::Choice);
        assert_eq!(got.len(), 1);
        let Question::Choice { question, answer, choices } = &got[0] else { panic!("expected choice") };
        assert_eq!(question, "Q2");
        assert_eq!(answer, "A");
        assert_eq!(choices.iter().filter(|c| c.starts_with(&format!("{}.", answer))).count(), 1);
    }

    #[test]
    fn checked_row_with_empty_tag_drops_the_record() {
        let html = page(r#"
        <div class="pc-x" id="q1">
          <div class="rendered-markdown"><p>Q</p></div>
          <label class="w-full"><input type="radio" checked><span>.</span><div class="rendered-markdown"><p>x</p></div></label>
          <label class="w-full"><input type="radio"><span>B.</span><div class="rendered-markdown"><p>y</p></div></label>
        </div>"#);
        assert!(extract(&html, QuestionKind::Choice).is_empty());
    }

    #[test]
    fn duplicate_option_tags_drop_the_record() {
        let html = page(r#"
        <div class="pc-x" id="q1">
          <div class="rendered-markdown"><p>Q</p></div>
          <label class="w-full"><input type="radio" checked><span>A.</span><div class="rendered-markdown"><p>x</p></div></label>
          <label class="w-full"><input type="radio"><span>A.</span><div class="rendered-markdown"><p>y</p></div></label>
        </div>"#);
        assert!(extract(&html, QuestionKind::Choice).is_empty());
    }

    #[test]
    fn true_false_reads_checked_label() {
        let html = page(r#"
        <div class="pc-x" id="t1">
          <div class="rendered-markdown"><p>CPU 是硬件。</p></div>
          <label><input type="radio" checked> T </label>
          <label><input type="radio"> F </label>
        </div>
        <div class="pc-x" id="t2">
          <div class="rendered-markdown"><p>内存是外设。</p></div>
          <label><input type="radio"> T </label>
          <label><input type="radio"> F </label>
        </div>"#);
        let got = extract(&html, QuestionKind::TrueOrFalse);
        assert_eq!(got, vec![
            Question::TrueOrFalse { question: "CPU 是硬件。".into(), answer: Some(TrueFalse::T) },
            Question::TrueOrFalse { question: "内存是外设。".into(), answer: None },
        ]);
    }

    #[test]
    fn true_false_requires_exact_label_set() {
        let html = page(r#"
        <div class="pc-x" id="t1">
          <div class="rendered-markdown"><p>Q</p></div>
          <label><input type="radio" checked>T</label>
          <label><input type="radio">F</label>
          <label><input type="radio">N</label>
        </div>
        <div class="pc-x">
          <div class="rendered-markdown"><p>no id attribute</p></div>
          <label><input type="radio" checked>T</label>
          <label><input type="radio">F</label>
        </div>"#);
        assert!(extract(&html, QuestionKind::TrueOrFalse).is_empty());
    }

    #[test]
    fn fill_blank_numbers_placeholders_with_points() {
        let html = page(r#"
        <div class="pc-x" id="f1">
          <div class="rendered-markdown"><p>页面大小为<span data-blank="true"><input data-blank="true" value="4KB"><span class="pc-text-raw">(2分)</span></span>，页表项<span data-blank="true"><input data-blank="true" value="4B"></span>。</p></div>
        </div>"#);
        let got = extract(&html, QuestionKind::FillBlank);
        assert_eq!(got, vec![Question::FillBlank {
            question: "页面大小为\n【第1空(2分)】\n，页表项\n【第2空(x分)】\n。".into(),
            blank_num: 2,
            answer: vec!["4KB".into(), "4B".into()],
        }]);
    }

    #[test]
    fn fill_blank_skips_questions_without_blanks() {
        let html = page(r#"
        <div class="pc-x" id="f1"><div class="rendered-markdown"><p>没有空</p></div></div>
        <div class="pc-x" id="f2"><p>no body</p></div>"#);
        assert!(extract(&html, QuestionKind::FillBlank).is_empty());
    }

    #[test]
    fn blank_without_input_gets_empty_answer() {
        let html = page(r#"
        <div class="pc-x" id="f1"><div class="rendered-markdown"><p>a<span data-blank="true"><span class="pc-text-raw">3 分</span></span></p></div></div>"#);
        let got = extract(&html, QuestionKind::FillBlank);
        let Question::FillBlank { question, blank_num, answer } = &got[0] else { panic!("expected fill-blank") };
        assert_eq!(question, "a\n【第1空(3分)】");
        assert_eq!(*blank_num, answer.len());
        assert_eq!(answer, &vec![String::new()]);
    }
}
