//! Character-level helpers for bulletin lines.

/// Separator characters trimmed from both ends of a commodity description.
const SEPARATORS: &[char] = &[' ', ',', ';', '-'];

/// Returns `true` if the line has at least one cased character and no
/// lower-case characters. Digits and punctuation are ignored, so
/// `"RICE (25KG)"` is upper case while `"1234"` is not.
#[must_use]
pub fn is_upper_case(line: &str) -> bool {
    let mut cased = false;
    for c in line.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// Capitalizes the first letter of every run of letters and lower-cases
/// the rest. Anything that is not a letter starts a new run, so
/// `"RICE-BASED"` becomes `"Rice-Based"`.
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Joins description fragments into a single commodity name.
///
/// Runs of whitespace collapse to one space, then separator punctuation is
/// trimmed from both ends.
#[must_use]
pub fn normalize_commodity<'a>(fragments: impl IntoIterator<Item = &'a str>) -> String {
    let words: Vec<&str> = fragments
        .into_iter()
        .flat_map(str::split_whitespace)
        .collect();
    words.join(" ").trim_matches(SEPARATORS).to_owned()
}

/// Returns `true` if the line contains an ASCII digit or a parenthesis.
#[must_use]
pub fn has_digit_or_paren(line: &str) -> bool {
    line.chars()
        .any(|c| c.is_ascii_digit() || c == '(' || c == ')')
}
