/*!
 * Data Structures
 *
 * Small specialized containers used across the shim:
 * - Inline strings for short diagnostic messages (error details, variable names)
 */

mod inline_string;

pub use inline_string::InlineString;
