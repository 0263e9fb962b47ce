//! Text cleanup for TTS.
//!
//! PDF text extraction leaves artifacts that derail speech synthesis:
//! typographic ligatures, smart quotes, soft hyphens, words hyphenated
//! across line breaks, stray control characters, and ragged whitespace.

/// Extraction artifacts and their spoken-text replacements.
const PROBLEMATIC_CHARS: &[(char, &str)] = &[
    ('\u{fb00}', "ff"),  // ff ligature
    ('\u{fb01}', "fi"),  // fi ligature
    ('\u{fb02}', "fl"),  // fl ligature
    ('\u{fb03}', "ffi"), // ffi ligature
    ('\u{fb04}', "ffl"), // ffl ligature
    ('\u{2018}', "'"),   // Left single quote
    ('\u{2019}', "'"),   // Right single quote
    ('\u{201c}', "\""),  // Left double quote
    ('\u{201d}', "\""),  // Right double quote
    ('\u{2013}', "-"),   // En dash
    ('\u{2014}', "-"),   // Em dash
    ('\u{2026}', "..."), // Ellipsis
    ('\u{00a0}', " "),   // Non-breaking space
    ('\u{00ad}', ""),    // Soft hyphen
    ('\u{200b}', ""),    // Zero-width space
    ('\u{feff}', ""),    // BOM
];

/// Clean extracted chapter text for TTS.
///
/// Replaces ligatures and typographic punctuation with ASCII, rejoins
/// words hyphenated across line breaks, drops control characters, and
/// collapses whitespace (at most one blank line).
pub fn clean_for_tts(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        let replacement = PROBLEMATIC_CHARS
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|(_, r)| *r);

        if let Some(r) = replacement {
            result.push_str(r);
        } else if is_allowed_char(c) {
            result.push(c);
        }
    }

    let result = rejoin_hyphenation(&result);
    normalize_whitespace(&result)
}

fn is_allowed_char(c: char) -> bool {
    if c == '\n' || c == '\t' {
        return true;
    }
    !c.is_control()
}

/// Rejoin words split across lines: "exam-\nple" becomes "example".
///
/// Only a lowercase letter on both sides of the break counts as
/// hyphenation; "anti-\nMarxist" keeps its hyphen.
fn rejoin_hyphenation(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '-' && i > 0 && chars[i - 1].is_lowercase() {
            // Look past the line break for the continuation.
            let mut j = i + 1;
            while j < chars.len() && (chars[j] == ' ' || chars[j] == '\t') {
                j += 1;
            }
            if j < chars.len() && chars[j] == '\n' {
                j += 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_lowercase() {
                    i = j;
                    continue;
                }
            }
        }
        result.push(chars[i]);
        i += 1;
    }

    result
}

/// Collapse runs of spaces/tabs and cap consecutive newlines at two.
fn normalize_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_was_space = false;
    let mut newline_count = 0;

    for c in text.chars() {
        if c == '\n' {
            newline_count += 1;
            prev_was_space = false;
            if newline_count <= 2 {
                result.push('\n');
            }
        } else if c == ' ' || c == '\t' {
            newline_count = 0;
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            newline_count = 0;
            prev_was_space = false;
            result.push(c);
        }
    }

    result.trim().to_string()
}
