//! Component naming
//!
//! `NameLabel` is the class stem, `name-label` the file and selector stem.

use crate::chars;
use crate::error::{ExtractError, Result};

/// Capitalize `name` and check that it can serve as a class name stem
pub fn normalize_component_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    let invalid = |reason: &str| ExtractError::InvalidComponentName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let mut characters = trimmed.chars();
    let Some(first) = characters.next() else {
        return Err(invalid("name is empty"));
    };
    if !chars::is_identifier_start(first) {
        return Err(invalid("must start with a letter, '_' or '$'"));
    }
    if let Some(bad) = characters.find(|&ch| !chars::is_identifier_part(ch)) {
        return Err(invalid(&format!("unexpected character '{}'", bad)));
    }

    Ok(capitalize(trimmed))
}

pub fn capitalize(text: &str) -> String {
    let mut characters = text.chars();
    match characters.next() {
        Some(first) => first.to_uppercase().chain(characters).collect(),
        None => String::new(),
    }
}

/// Upper camel case to lower hyphen case: every upper case letter starts a
/// new word, so `HTMLView` becomes `h-t-m-l-view`.
pub fn to_kebab_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for (index, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if index > 0 {
                result.push('-');
            }
            result.push(ch.to_ascii_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
