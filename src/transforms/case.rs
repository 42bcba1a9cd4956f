//! Identifier casing for token names.
//!
//! Token paths are split into words on separators and on lower-to-upper case
//! boundaries, so `["neutrals", "lightGrey"]` and `["neutrals", "light-grey"]`
//! both become `neutralsLightGrey` in camel case.

/// Split path segments into lowercase words.
pub fn words<S: AsRef<str>>(segments: &[S]) -> Vec<String> {
    let mut out = Vec::new();
    for segment in segments {
        let mut current = String::new();
        let mut prev_lower = false;
        for c in segment.as_ref().chars() {
            if !c.is_alphanumeric() {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
                prev_lower = false;
                continue;
            }
            if c.is_uppercase() && prev_lower && !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
            current.extend(c.to_lowercase());
        }
        if !current.is_empty() {
            out.push(current);
        }
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn kebab<S: AsRef<str>>(segments: &[S]) -> String {
    words(segments).join("-")
}

pub fn snake<S: AsRef<str>>(segments: &[S]) -> String {
    words(segments).join("_")
}

pub fn camel<S: AsRef<str>>(segments: &[S]) -> String {
    let words = words(segments);
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(word);
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

pub fn pascal<S: AsRef<str>>(segments: &[S]) -> String {
    words(segments).iter().map(|w| capitalize(w)).collect()
}
