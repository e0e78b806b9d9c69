//! Input validation shared by the action layer and the client controllers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::defaults::MAX_NOTE_CONTENT_CHARS;
use crate::error::{Error, Result};
use crate::messages;

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#[0-9a-fA-F]{6}$").expect("hex color pattern is a valid regex")
});

/// Returns true for `#RRGGBB` colors.
pub fn is_hex_color(color: &str) -> bool {
    HEX_COLOR.is_match(color)
}

/// Trim a note title, rejecting empty results.
pub fn normalize_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(messages::TITLE_REQUIRED.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Trim a category name, rejecting empty results.
pub fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(messages::NAME_REQUIRED.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Validate a `#RRGGBB` color.
pub fn validate_color(color: &str) -> Result<()> {
    if is_hex_color(color) {
        Ok(())
    } else {
        Err(Error::InvalidInput(messages::INVALID_COLOR.to_string()))
    }
}

/// Enforce the content length cap (counted in characters, not bytes).
pub fn validate_content(content: &str) -> Result<()> {
    if content.chars().count() > MAX_NOTE_CONTENT_CHARS {
        return Err(Error::InvalidInput(messages::CONTENT_TOO_LONG.to_string()));
    }
    Ok(())
}
