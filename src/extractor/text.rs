use scraper::{ElementRef, Selector};

pub fn selector(s: &str) -> Option<Selector> {
    Selector::parse(s).ok()
}

/// Every text node trimmed, empty ones dropped, glued together.
pub fn stripped_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).filter(|t| !t.is_empty()).collect()
}

/// Like [`stripped_text`], but each element listed in `replacements` is
/// rendered as its replacement string (one piece) instead of its subtree.
/// Pieces are joined with `sep`.
pub fn stripped_text_with(el: ElementRef<'_>, replacements: &[(ElementRef<'_>, String)], sep: &str) -> String {
    let mut pieces: Vec<String> = Vec::new();
    collect_pieces(el, replacements, &mut pieces);
    pieces.join(sep)
}

fn collect_pieces(el: ElementRef<'_>, replacements: &[(ElementRef<'_>, String)], pieces: &mut Vec<String>) {
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            match replacements.iter().find(|(target, _)| *target == child_el) {
                Some((_, rep)) => pieces.push(rep.clone()),
                None => collect_pieces(child_el, replacements, pieces),
            }
        } else if let Some(t) = child.value().as_text() {
            let t = t.trim();
            if !t.is_empty() { pieces.push(t.to_string()); }
        }
    }
}

pub fn collapse_whitespace(s: &str) -> String {
    let mut buf = String::with_capacity(s.len());
    let mut in_ws = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !in_ws {
                if !buf.is_empty() { buf.push(' '); }
                in_ws = true;
            }
        } else {
            buf.push(ch);
            in_ws = false;
        }
    }
    buf.trim().to_string()
}

pub fn clean_text(s: &str) -> String {
    collapse_whitespace(s).replace("&nbsp;", " ")
}

/// First `n` chars, for log lines.
pub fn preview(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn stripped_text_drops_layout_whitespace() {
        let doc = Html::parse_fragment("<div>\n  <b> 进程 </b>\n  和 <i>线程</i>\n</div>");
        let div = doc.select(&selector("div").unwrap()).next().unwrap();
        assert_eq!(stripped_text(div), "进程和线程");
    }

    #[test]
    fn replacements_stand_in_for_subtrees() {
        let doc = Html::parse_fragment(r#"<p>a <span class="blank"><input value="x"> 2分</span> b</p>"#);
        let p = doc.select(&selector("p").unwrap()).next().unwrap();
        let blank = doc.select(&selector("span.blank").unwrap()).next().unwrap();
        let out = stripped_text_with(p, &[(blank, "【】".to_string())], "\n");
        assert_eq!(out, "a\n【】\nb");
    }

    #[test]
    fn clean_text_collapses_and_unescapes_nbsp() {
        assert_eq!(clean_text("  CPU \n\t 调度&nbsp;算法  "), "CPU 调度 算法");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn preview_counts_chars_not_bytes() {
        assert_eq!(preview("操作系统原理", 4), "操作系统");
    }
}
