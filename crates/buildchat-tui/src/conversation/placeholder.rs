//! Placeholder text for empty areas.

/// Shown in place of an empty conversation log.
pub const EMPTY_LOG_HINT: &str = "Type what you want to build and press Enter.";

/// Shown in the input area while it is empty.
pub const INPUT_PLACEHOLDER: &str = "Describe what you want to build...";
