use once_cell::sync::Lazy;
use regex::Regex;

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(\w*)\n(.*?)```").expect("Valid regex pattern"));

/// Rewrites every fenced code block with an explicit language tag
/// (`plaintext` when absent) and a whitespace-trimmed body.
pub fn normalize_code_fences(text: &str) -> String {
    FENCED_BLOCK
        .replace_all(text, |caps: &regex::Captures| {
            let language = if caps[1].is_empty() {
                "plaintext"
            } else {
                &caps[1]
            };
            format!("```{}\n{}\n```", language, caps[2].trim())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_language_defaults_to_plaintext() {
        let input = "```\nlet x = 1;\n```";
        assert_eq!(normalize_code_fences(input), "```plaintext\nlet x = 1;\n```");
    }

    #[test]
    fn tagged_and_trimmed_block_is_a_noop() {
        let input = "```rust\nlet x = 1;\n```";
        assert_eq!(normalize_code_fences(input), input);
    }

    #[test]
    fn body_is_trimmed() {
        let input = "```python\n\n  print('hi')\n\n\n```";
        assert_eq!(normalize_code_fences(input), "```python\nprint('hi')\n```");
    }

    #[test]
    fn multiple_blocks_match_non_greedily() {
        let input = "```\na\n```\ntext\n```js\nb\n```";
        assert_eq!(
            normalize_code_fences(input),
            "```plaintext\na\n```\ntext\n```js\nb\n```"
        );
    }
}
