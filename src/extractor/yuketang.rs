use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use crate::bank::Question;

use super::text::clean_text;

const RICH_TEXT_CLASS: &str = "custom_ueditor_cn_body";
const BLANK_TOKEN: &str = "______";

const CHOICE_BLOCK: &str = concat!(
    r#"(?s)<div[^>]*class\s*=\s*"[^"]*?\bsubject-item\b[^"]*?"[^>]*>\s*"#,
    r#"<div[^>]*class\s*=\s*"[^"]*?\bresult_item\b[^"]*?"[^>]*>\s*"#,
    r#"<div[^>]*class\s*=\s*"[^"]*?\bitem-type\b[^"]*?"[^>]*>\s*\d+\.单选题.*?</div>\s*"#,
    r#".*?<div[^>]*class\s*=\s*"[^"]*?\bitem-body\b[^"]*?"[^>]*>\s*"#,
    r#".*?<h4[^>]*class\s*=\s*"[^"]*?\bexam-font\b[^"]*?"[^>]*>(.*?)</h4>\s*"#,
    r#".*?<ul[^>]*class\s*=\s*"[^"]*?\blist-unstyled-radio\b[^"]*?"[^>]*>(.*?)</ul>\s*"#,
    r#".*?</div>\s*"#,
    r#".*?<div[^>]*class\s*=\s*"[^"]*?\bitem-footer\b[^"]*?"[^>]*>.*?</div>\s*"#,
    r#".*?</div>\s*"#,
    r#".*?</div>"#,
);

const FILL_BLANK_BLOCK: &str = concat!(
    r#"(?s)<div class="subject-item"><div[^>]*class="result_item"[^>]*>"#,
    r#"<div[^>]*class="item-type"[^>]*>\s*\d+\.填空题.*?</div>"#,
    r#".*?<div[^>]*class="item-body"[^>]*>(.*?)</div>"#,
    r#".*?正确答案：.*?<ul[^>]*class="list-unstyled problem-options"[^>]*>(.*?)</ul>"#,
    r#".*?</div>.*?</div>.*?</div>"#,
);

const OPTION_ROW: &str = concat!(
    r#"(?s)<label[^>]*>.*?<span[^>]*class="el-radio__label"[^>]*>"#,
    r#".*?<span[^>]*class="radioInput"[^>]*>\s*([A-D]).*?</span>"#,
    r#".*?<span[^>]*class="radioText"[^>]*>(.*?)</span>.*?</label>"#,
);

const CHECKED_ROW: &str = concat!(
    r#"(?s)<label[^>]*class="[^"]*is-checked[^"]*"[^>]*>.*?<span[^>]*class="el-radio__label"[^>]*>"#,
    r#".*?<span[^>]*class="radioInput"[^>]*>\s*([A-D]).*?</span>"#,
    r#".*?<span[^>]*class="radioText"[^>]*>.*?</span>.*?</label>"#,
);

const RICH_TEXT: &str = r#"(?s)<div[^>]*class="custom_ueditor_cn_body"[^>]*>(.*?)</div>"#;
const BLANK_SPAN: &str = r#"(?s)<span[^>]*class="blank-item-dynamic[^"]*"[^>]*>.*?</span>"#;
const BLANK_ANSWER: &str = r#"(?s)填空\d+\s*:\s*</span>\s*<span[^>]*class="exam-font"[^>]*>(.*?)</span>"#;
const TAG: &str = r"<[^>]+>";

/// Scrapes exports whose markup does not survive tree parsing: one large
/// pattern per question kind over the whole document, then small patterns
/// per matched block.
pub struct YuketangParser {
    choice_block: Regex,
    fill_blank_block: Regex,
    option_row: Regex,
    checked_row: Regex,
    rich_text: Regex,
    blank_span: Regex,
    blank_answer: Regex,
    tag: Regex,
}

fn compile(name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("compile {} pattern", name))
}

impl YuketangParser {
    pub fn new() -> Result<Self> {
        Ok(YuketangParser {
            choice_block: compile("choice block", CHOICE_BLOCK)?,
            fill_blank_block: compile("fill-blank block", FILL_BLANK_BLOCK)?,
            option_row: compile("option row", OPTION_ROW)?,
            checked_row: compile("checked row", CHECKED_ROW)?,
            rich_text: compile("rich text", RICH_TEXT)?,
            blank_span: compile("blank span", BLANK_SPAN)?,
            blank_answer: compile("blank answer", BLANK_ANSWER)?,
            tag: compile("tag", TAG)?,
        })
    }

    pub fn parse_choice(&self, html: &str) -> Vec<Question> {
        let mut out = Vec::new();
        let mut matched = 0usize;
        for caps in self.choice_block.captures_iter(html) {
            matched += 1;
            let (Some(question_html), Some(options_html)) = (caps.get(1), caps.get(2)) else { continue };
            let question = self.fragment_text(self.unwrap_rich(question_html.as_str()));
            if question.is_empty() { continue; }

            let choices = self.choices(options_html.as_str());
            let answer = self.checked_letter(options_html.as_str());
            debug!(choices = ?choices, answer = ?answer, "choice block");
            let Some(answer) = answer else { continue };
            if choices.is_empty() { continue; }
            out.push(Question::Choice { question, choices, answer });
        }
        debug!(matched, kept = out.len(), "choice blocks");
        out
    }

    pub fn parse_fill_blank(&self, html: &str) -> Vec<Question> {
        let mut out = Vec::new();
        let mut matched = 0usize;
        for caps in self.fill_blank_block.captures_iter(html) {
            matched += 1;
            let (Some(body_html), Some(answers_html)) = (caps.get(1), caps.get(2)) else { continue };
            let body = self.unwrap_rich(body_html.as_str());
            let body = self.blank_span.replace_all(body, BLANK_TOKEN);
            let question = self.fragment_text(&body);
            if question.is_empty() { continue; }

            let answers = self.blank_answers(answers_html.as_str());
            if answers.is_empty() { continue; }
            out.push(Question::fill_blank(question, answers));
        }
        debug!(matched, kept = out.len(), "fill-blank blocks");
        out
    }

    fn choices(&self, options_html: &str) -> Vec<String> {
        self.option_row
            .captures_iter(options_html)
            .filter_map(|caps| {
                let letter = caps.get(1)?.as_str();
                let text = self.fragment_text(self.unwrap_rich(caps.get(2)?.as_str()));
                Some(format!("{}.{}", letter, text))
            })
            .collect()
    }

    fn checked_letter(&self, options_html: &str) -> Option<String> {
        self.checked_row
            .captures(options_html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    fn blank_answers(&self, answers_html: &str) -> Vec<String> {
        self.blank_answer
            .captures_iter(answers_html)
            .filter_map(|caps| caps.get(1))
            .map(|m| self.fragment_text(self.unwrap_rich(m.as_str())))
            .filter(|a| !a.is_empty())
            .collect()
    }

    /// Content of the rich-text wrapper div when present, else the fragment itself.
    fn unwrap_rich<'h>(&self, fragment: &'h str) -> &'h str {
        if !fragment.contains(RICH_TEXT_CLASS) { return fragment; }
        self.rich_text
            .captures(fragment)
            .and_then(|caps| caps.get(1))
            .map_or(fragment, |m| m.as_str())
    }

    fn fragment_text(&self, fragment: &str) -> String {
        let text = self.tag.replace_all(fragment, "");
        clean_text(&text.replace("&nbsp;", " "))
    }
}
