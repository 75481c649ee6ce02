//! Presentation names for entities.
//!
//! These transforms are for display only. Lookups and equality always use the
//! internal name.

/// Tokens rewritten after title-casing.
const ACRONYMS: [(&str, &str); 3] = [("dao", "DAO"), ("ai", "AI"), ("bio", "Bio")];

/// Human-readable name for an internal entity name.
///
/// Splits on capitalization boundaries (and on `_`, `-`, spaces), title-cases
/// each token, then applies the acronym rewrites: `vitaDao` and `VitaDAO`
/// both become `Vita DAO`.
pub fn display_name(internal: &str) -> String {
    split_words(internal)
        .iter()
        .map(|word| {
            let lower = word.to_lowercase();
            match ACRONYMS.iter().find(|(token, _)| *token == lower) {
                Some((_, rewrite)) => rewrite.to_string(),
                None => title_case(&lower),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// URL-friendly identifier: lower-cased, non-alphanumeric runs become `-`.
pub fn slug(internal: &str) -> String {
    let mut slug = String::with_capacity(internal.len());
    for c in internal.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

fn split_words(name: &str) -> Vec<String> {
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
            // camelCase boundary, or the last capital of an acronym run (DAOToken)
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower) {
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

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
