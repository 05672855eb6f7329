// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Word splitting for the snake-case naming strategies.
//!
//! # Word Boundaries
//!
//! | Rule | Example |
//! |------|---------|
//! | lowercase followed by uppercase | `userId` → `user`, `Id` |
//! | last uppercase of a run followed by lowercase | `IOUtils` → `IO`, `Utils` |
//! | digit, uppercase, lowercase | `Html5Parser` → `Html5`, `Parser` |
//! | `_`, `-` and whitespace separate | `first_name` → `first`, `name` |
//!
//! A digit never starts a word on its own, so `A2CCount` splits into `A2C`
//! and `Count`.

/// Split an identifier into words.
pub fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let starts_word = prev.is_lowercase()
                || (next_is_lower && (prev.is_uppercase() || prev.is_ascii_digit()));
            if starts_word {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// `IOUtils` → `io_utils`.
pub fn to_lower_snake_case(name: &str) -> String {
    split_words(name)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// `PwdUtils` → `PWD_UTILS`.
pub fn to_upper_snake_case(name: &str) -> String {
    split_words(name)
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Simple English pluralization of the last word.
pub fn pluralize(s: &str) -> String {
    let lower = s.to_lowercase();
    if lower.ends_with('s') || lower.ends_with("sh") || lower.ends_with("ch") || lower.ends_with('x')
    {
        format!("{}es", s)
    } else if lower.ends_with('y')
        && !lower.ends_with("ay")
        && !lower.ends_with("ey")
        && !lower.ends_with("oy")
    {
        format!("{}ies", &s[..s.len() - 1])
    } else {
        format!("{}s", s)
    }
}
