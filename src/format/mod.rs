pub mod code;
pub mod math;
pub mod render;

use rand::Rng;

pub const THINKING_GLYPH: &str = "🤔";
pub const RESPONSE_GLYPH: &str = "🤖";
pub const ERROR_GLYPH: &str = "⚠️";

const THINKING_PHRASES: [&str; 5] = [
    "Analyzing your question...",
    "Processing the information...",
    "Working out an answer...",
    "Thinking...",
    "Working on it...",
];

/// Prefixes the message with a status glyph. Errors are passed through raw
/// (partial or malformed content must not go through the renderer); normal
/// messages get the full formatting pipeline.
pub fn decorate_message(message: &str, is_error: bool) -> String {
    if is_error {
        return format!("{} {}", ERROR_GLYPH, message);
    }
    format!("{} {}", RESPONSE_GLYPH, render::format_response(message))
}

/// Picks a decorated "thinking" status line. Selection is a pure function of
/// the supplied RNG so callers can seed it.
pub fn thinking_message<R: Rng + ?Sized>(rng: &mut R) -> String {
    let phrase = THINKING_PHRASES[rng.random_range(0..THINKING_PHRASES.len())];
    format!("{} {}", THINKING_GLYPH, phrase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn error_messages_are_not_rendered() {
        let out = decorate_message("raw **markdown** stays", true);
        assert_eq!(out, format!("{} raw **markdown** stays", ERROR_GLYPH));
    }

    #[test]
    fn normal_messages_are_rendered() {
        let out = decorate_message("**bold**", false);
        assert_eq!(out, format!("{} <p><strong>bold</strong></p>", RESPONSE_GLYPH));
    }

    #[test]
    fn thinking_message_is_deterministic_for_a_seed() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        assert_eq!(thinking_message(&mut a), thinking_message(&mut b));
    }

    #[test]
    fn thinking_message_uses_a_known_phrase() {
        let mut rng = StdRng::seed_from_u64(0);
        let msg = thinking_message(&mut rng);
        let phrase = msg
            .strip_prefix(&format!("{} ", THINKING_GLYPH))
            .expect("glyph prefix");
        assert!(THINKING_PHRASES.contains(&phrase));
    }
}
