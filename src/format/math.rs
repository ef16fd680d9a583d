use once_cell::sync::Lazy;
use regex::Regex;

static BOXED_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\boxed\{\\text\{([^}]*)\}\}").expect("Valid regex pattern"));

static BOXED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\boxed\{([^}]*)\}").expect("Valid regex pattern"));

static DISPLAY_DOLLARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\$\$(.*?)\$\$").expect("Valid regex pattern"));

static INLINE_DOLLAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(.*?)\$").expect("Valid regex pattern"));

static BRACKET_DISPLAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\\\[(.*?)\\\]").expect("Valid regex pattern"));

static PAREN_INLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\\((.*?)\\\)").expect("Valid regex pattern"));

static TEXT_COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\text\{([^}]*)\}").expect("Valid regex pattern"));

static BEGIN_END_ENV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(?:begin|end)\{(?:align|equation)\*?\}").expect("Valid regex pattern")
});

static ESCAPED_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\ ").expect("Valid regex pattern"));

/// Drops alignment/equation environment wrappers and turns escaped spaces
/// into plain spaces. Applied to the interior of display math blocks.
fn clean_math_expressions(text: &str) -> String {
    let text = BEGIN_END_ENV.replace_all(text, "");
    ESCAPED_SPACE.replace_all(&text, " ").into_owned()
}

/// Canonicalizes LaTeX-ish math delimiters: `\[...\]` becomes `$$...$$`,
/// `\(...\)` becomes `$...$`, `\boxed{...}` becomes a boxed HTML container
/// and `\text{...}` is unwrapped. Existing `$`/`$$` spans are left alone.
/// Unmatched patterns pass through untouched.
pub fn normalize_math(text: &str) -> String {
    // \boxed{\text{X}} must win over the bare \boxed{X} form.
    let text = BOXED_TEXT.replace_all(text, r#"<div class="boxed">$1</div>"#);
    let text = BOXED.replace_all(&text, r#"<div class="boxed">$1</div>"#);

    let text = DISPLAY_DOLLARS.replace_all(&text, |caps: &regex::Captures| {
        format!("$${}$$", &caps[1])
    });
    let text =
        INLINE_DOLLAR.replace_all(&text, |caps: &regex::Captures| format!("${}$", &caps[1]));

    let text = BRACKET_DISPLAY.replace_all(&text, |caps: &regex::Captures| {
        let content = clean_math_expressions(caps[1].trim());
        format!("$${}$$", content)
    });
    let text =
        PAREN_INLINE.replace_all(&text, |caps: &regex::Captures| format!("${}$", &caps[1]));

    TEXT_COMMAND.replace_all(&text, "$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_display_becomes_double_dollars() {
        assert_eq!(normalize_math(r"\[x + y\]"), "$$x + y$$");
    }

    #[test]
    fn bracket_display_interior_is_cleaned() {
        let input = "\\[ \\begin{align*}a &= b\\end{align*} \\]";
        assert_eq!(normalize_math(input), "$$a &= b$$");

        let input = r"\[\begin{equation}E = mc^2\end{equation}\]";
        assert_eq!(normalize_math(input), "$$E = mc^2$$");
    }

    #[test]
    fn escaped_space_inside_display_math() {
        assert_eq!(normalize_math(r"\[a\ b\]"), "$$a b$$");
    }

    #[test]
    fn paren_inline_becomes_single_dollars() {
        assert_eq!(normalize_math(r"before \(a_1\) after"), "before $a_1$ after");
    }

    #[test]
    fn existing_dollar_spans_are_identity() {
        assert_eq!(normalize_math("$a + b$"), "$a + b$");
        assert_eq!(normalize_math("$$a\n+ b$$"), "$$a\n+ b$$");
    }

    #[test]
    fn boxed_text_form_takes_priority() {
        assert_eq!(
            normalize_math(r"\boxed{\text{42}}"),
            r#"<div class="boxed">42</div>"#
        );
        assert_eq!(normalize_math(r"\boxed{42}"), r#"<div class="boxed">42</div>"#);
    }

    #[test]
    fn text_command_is_unwrapped_globally() {
        assert_eq!(normalize_math(r"\text{hello} world"), "hello world");
        assert_eq!(normalize_math(r"$x = \text{speed}$"), "$x = speed$");
    }

    #[test]
    fn math_commands_survive() {
        let input = r"$\frac{1}{2} \times 3$";
        assert_eq!(normalize_math(input), input);
    }

    #[test]
    fn malformed_latex_is_left_untouched() {
        let input = r"\[unclosed display and \(unclosed inline";
        assert_eq!(normalize_math(input), input);
    }

    #[test]
    fn idempotent_on_canonical_input() {
        let input = r"text \[\begin{align*}a\end{align*}\] and \(b_i\) plus \boxed{\text{c}}";
        let once = normalize_math(input);
        let twice = normalize_math(&once);
        assert_eq!(once, twice);
    }
}
