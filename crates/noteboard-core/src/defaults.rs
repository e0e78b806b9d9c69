//! Centralized default constants for noteboard.
//!
//! All crates reference these constants instead of defining their own magic
//! numbers.

use crate::models::BaseCategorySeed;

// =============================================================================
// NOTES
// =============================================================================

/// Title given to notes created through quick create.
pub const DEFAULT_NOTE_TITLE: &str = "Untitled Note";

/// Upper bound on stored note content, in characters.
pub const MAX_NOTE_CONTENT_CHARS: usize = 100_000;

// =============================================================================
// CATEGORIES
// =============================================================================

/// Color assigned when a category is created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#6b7280";

/// Base categories seeded at startup (visible to every user).
pub const BASE_CATEGORIES: &[BaseCategorySeed] = &[
    BaseCategorySeed {
        name: "Personal",
        color: "#3b82f6",
    },
    BaseCategorySeed {
        name: "Work",
        color: "#ef4444",
    },
    BaseCategorySeed {
        name: "Ideas",
        color: "#f59e0b",
    },
    BaseCategorySeed {
        name: "Tasks",
        color: "#10b981",
    },
];

// =============================================================================
// CLIENT
// =============================================================================

/// Quiet period before editor content reaches the detail buffer.
pub const CONTENT_DEBOUNCE_MS: u64 = 500;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::is_hex_color;

    #[test]
    fn base_category_colors_are_valid() {
        for seed in BASE_CATEGORIES {
            assert!(is_hex_color(seed.color), "{} has bad color", seed.name);
        }
    }

    #[test]
    fn default_color_is_valid() {
        assert!(is_hex_color(DEFAULT_CATEGORY_COLOR));
    }
}
