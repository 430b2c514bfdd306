use std::fmt;

/// Characters dropped from titles outright.
const REMOVED: &[char] = &['/', ':'];

/// Characters replaced with `_` (besides ASCII control characters).
const REPLACED: &[char] = &['<', '>', '"', '\\', '|', '?', '*'];

/// A collection title that is safe to use as a file name.
///
/// Only [`sanitize`] builds one, so the value never contains a path
/// separator, a reserved character or a control character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SanitizedTitle(String);

impl SanitizedTitle {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name used for both cached copies.
    pub fn file_name(&self) -> String {
        format!("{}.png", self.0)
    }
}

impl fmt::Display for SanitizedTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Map a raw title to a file-system safe name.
///
/// `/` and `:` are removed; `< > " \ | ? *` and 0x00-0x1F become `_`.
/// Distinct titles can collide after sanitizing.
pub fn sanitize(raw: &str) -> SanitizedTitle {
    let cleaned = raw
        .chars()
        .filter(|c| !REMOVED.contains(c))
        .map(|c| {
            if REPLACED.contains(&c) || is_control(c) {
                '_'
            } else {
                c
            }
        })
        .collect();
    SanitizedTitle(cleaned)
}

fn is_control(c: char) -> bool {
    (c as u32) < 0x20
}

#[cfg(test)]
#[path = "tests/sanitize_tests.rs"]
mod tests;
