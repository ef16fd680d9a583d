use once_cell::sync::Lazy;
use pulldown_cmark::{Options, Parser, html};
use regex::Regex;

use super::{code, math};

// Private-use codepoints keep the placeholders out of anything a model can
// realistically emit.
const PLACEHOLDER_OPEN: char = '\u{f8f0}';
const PLACEHOLDER_CLOSE: char = '\u{f8f1}';

static MATH_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\$\$.*?\$\$|\$.*?\$").expect("Valid regex pattern"));

static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("Valid regex pattern"));

static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.!?])\s*([A-Z])").expect("Valid regex pattern"));

fn placeholder(index: usize) -> String {
    format!("{}MATH{}{}", PLACEHOLDER_OPEN, index, PLACEHOLDER_CLOSE)
}

fn markdown_to_html(text: &str) -> String {
    let parser = Parser::new_ext(text, Options::ENABLE_TABLES);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Renders markdown to HTML while keeping math spans byte-for-byte intact.
///
/// Math and code delimiters are normalized first, then every `$...$` /
/// `$$...$$` span is swapped for a placeholder so the markdown engine cannot
/// reinterpret underscores and asterisks inside formulas. Placeholders are
/// restored verbatim after rendering.
pub fn format_response(text: &str) -> String {
    let text = math::normalize_math(text);
    let text = code::normalize_code_fences(&text);

    let mut math_spans: Vec<String> = Vec::new();
    let shielded = MATH_SPAN.replace_all(&text, |caps: &regex::Captures| {
        math_spans.push(caps[0].to_string());
        placeholder(math_spans.len() - 1)
    });

    let mut out = markdown_to_html(&shielded);
    for (i, span) in math_spans.iter().enumerate() {
        out = out.replace(&placeholder(i), span);
    }

    let out = out.replace("</think>", "").replace("<think>", "");
    let out = BLANK_LINES.replace_all(&out, "\n\n");
    let out = SENTENCE_BREAK.replace_all(&out, "${1}\n${2}");
    out.trim().to_string()
}
