/// Verbs that say what to do, not what to find.
pub const ACTION_WORDS: &[&str] = &[
    "click", "press", "tap", "submit", "push", "hit", "enter", "type", "fill", "input", "write",
    "select", "choose", "pick", "find", "see", "look", "check", "verify", "confirm",
];

/// Element kinds from the Stage-2 priority sets.
pub const KIND_WORDS: &[&str] = &[
    "button", "a", "link", "input", "textarea", "select", "option", "dropdown", "h1", "h2", "h3",
    "h4", "h5", "h6", "p", "span", "div", "menuitem", "tab", "textbox", "searchbox", "listbox",
    "heading", "text",
];

// "in" stays: it is part of too many labels ("Sign In", "Log In").
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "on", "at", "to", "of", "for", "with", "and", "into", "onto", "from", "this",
    "that", "please", "then", "field",
];

const QUOTE_PAIRS: &[(char, char)] = &[('\'', '\''), ('"', '"'), ('‘', '’'), ('“', '”')];

/// Reduce an instruction to the words that describe the target element.
///
/// Quoted spans win outright. Otherwise action verbs, element kinds and stop
/// words are dropped. Never returns an empty string: with nothing left the
/// instruction comes back untouched.
pub fn distill(instruction: &str) -> String {
    let quoted = quoted_spans(instruction);
    let distilled = if quoted.is_empty() {
        strip_vocabulary(instruction)
    } else {
        quoted.join(" ")
    };

    if distilled.trim().is_empty() {
        instruction.to_string()
    } else {
        distilled
    }
}

/// Contents of quoted spans, in order. A quote only opens at the start of a
/// word and only closes at the end of one, so apostrophes in "don't" are
/// left alone.
pub fn quoted_spans(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let opener = QUOTE_PAIRS.iter().find(|(open, _)| *open == chars[i]);
        let at_word_start = i == 0 || !chars[i - 1].is_alphanumeric();

        if let (Some((_, close)), true) = (opener, at_word_start) {
            let closing = (i + 1..chars.len()).find(|&j| {
                chars[j] == *close && chars.get(j + 1).map_or(true, |c| !c.is_alphanumeric())
            });
            if let Some(j) = closing {
                let inner: String = chars[i + 1..j].iter().collect();
                let inner = inner.trim();
                if !inner.is_empty() {
                    spans.push(inner.to_string());
                }
                i = j + 1;
                continue;
            }
        }
        i += 1;
    }

    spans
}

fn strip_vocabulary(instruction: &str) -> String {
    instruction
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| !token.is_empty())
        .filter(|token| {
            let lower = token.to_lowercase();
            let lower = lower.as_str();
            !ACTION_WORDS.contains(&lower) && !KIND_WORDS.contains(&lower) && !STOP_WORDS.contains(&lower)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
