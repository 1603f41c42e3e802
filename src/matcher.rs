//! Free-text token matching for category index entries.
//!
//! Matching is deliberately simple: sanitize both sides into lower-cased
//! alphanumeric words, then require every query word to be a substring of at
//! least one candidate word. No ranking, no fuzzing.

/// Sanitize free text into search tokens.
///
/// Commas become spaces, runs of spaces collapse to one, the text is
/// lower-cased, and everything but ASCII letters, digits, and spaces is
/// stripped before splitting on single spaces. Whitespace-only input yields
/// one empty token; callers rely on that boundary staying put.
pub fn tokenize(text: &str) -> Vec<String> {
    let decommaed = text.replace(',', " ");
    let trimmed = decommaed.trim();

    let mut collapsed = String::with_capacity(trimmed.len());
    let mut last_was_space = false;
    for ch in trimmed.chars() {
        if ch == ' ' {
            if !last_was_space {
                collapsed.push(' ');
            }
            last_was_space = true;
        } else {
            collapsed.push(ch);
            last_was_space = false;
        }
    }

    collapsed
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect::<String>()
        .split(' ')
        .map(str::to_owned)
        .collect()
}

/// True when every token of `query` is a substring of at least one candidate
/// token. AND across query tokens, OR across candidate tokens; token order
/// and duplicates are irrelevant.
pub fn matches(query: &str, candidate_tokens: &[String]) -> bool {
    tokenize(query).iter().all(|word| {
        candidate_tokens
            .iter()
            .any(|token| token.contains(word.as_str()))
    })
}
