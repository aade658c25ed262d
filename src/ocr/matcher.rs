//! Cleaning up OCR output and pulling a code out of it

use regex::Regex;

/// Uppercase, drop characters outside `whitelist`, collapse whitespace.
///
/// Whitespace is kept as a single space between words so `\b` anchors in
/// user patterns still work.
pub fn normalize(raw: &str, whitelist: &str) -> String {
    raw.to_uppercase()
        .split_whitespace()
        .map(|word| word.chars().filter(|c| whitelist.contains(*c)).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compiled match pattern plus the digit rule.
///
/// With `require_digit` set, candidates made only of letters are skipped:
/// a shape like `[A-Z0-9]{5,7}` also matches ordinary words ("THANK",
/// "PLAYING") that surround the code on screen.
#[derive(Debug, Clone)]
pub struct CodeMatcher {
    regex: Regex,
    require_digit: bool,
}

impl CodeMatcher {
    pub fn new(pattern: &str, require_digit: bool) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            require_digit,
        })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// First acceptable match in `text`
    pub fn find(&self, text: &str) -> Option<String> {
        self.regex
            .find_iter(text)
            .map(|m| m.as_str())
            .find(|candidate| !self.require_digit || candidate.chars().any(|c| c.is_ascii_digit()))
            .map(str::to_string)
    }
}
