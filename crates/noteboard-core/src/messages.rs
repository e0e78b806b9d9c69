//! Stable, user-safe messages.
//!
//! Storage failures are reported to callers with these strings only; the
//! driver error is logged at the point of failure and then dropped.

// =============================================================================
// QUERY LAYER FAILURES
// =============================================================================

pub const CREATE_CATEGORY_FAILED: &str = "Failed to create category. Please try again.";
pub const GET_CATEGORY_FAILED: &str = "Failed to get category. Please try again.";
pub const GET_CATEGORIES_FAILED: &str = "Failed to get categories. Please try again.";
pub const UPDATE_CATEGORY_FAILED: &str = "Failed to update category. Please try again.";
pub const DELETE_CATEGORY_FAILED: &str = "Failed to delete category. Please try again.";
pub const SEED_CATEGORIES_FAILED: &str = "Failed to seed base categories.";

pub const CREATE_NOTE_FAILED: &str = "Failed to create note. Please try again.";
pub const GET_NOTE_FAILED: &str = "Failed to get note. Please try again.";
pub const GET_NOTES_FAILED: &str = "Failed to get notes. Please try again.";
pub const UPDATE_NOTE_FAILED: &str = "Failed to update note. Please try again.";
pub const DELETE_NOTE_FAILED: &str = "Failed to delete note. Please try again.";
pub const DELETE_NOTES_FAILED: &str = "Failed to delete notes. Please try again.";

// =============================================================================
// ACTION LAYER
// =============================================================================

pub const CATEGORY_NOT_FOUND: &str = "Category not found";
pub const NOTE_NOT_FOUND: &str = "Note not found";
pub const USER_ID_REQUIRED: &str = "User ID is required";
pub const CATEGORY_ID_REQUIRED: &str = "Category ID is required";
pub const CATEGORY_ACCESS_DENIED: &str = "You do not have access to this category";
pub const BASE_CATEGORY_READ_ONLY: &str = "Base categories cannot be modified";
pub const NOTE_ACCESS_DENIED: &str = "You do not have access to this note";
pub const DUPLICATE_CATEGORY_NAME: &str = "A category with this name already exists";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred. Please try again.";

// =============================================================================
// VALIDATION
// =============================================================================

pub const TITLE_REQUIRED: &str = "Title cannot be empty";
pub const NAME_REQUIRED: &str = "Category name cannot be empty";
pub const INVALID_COLOR: &str = "Color must be a hex value like #aabbcc";
pub const CONTENT_TOO_LONG: &str = "Note content is too long";
pub const CATEGORY_SELECTION_REQUIRED: &str = "Please select a category";
