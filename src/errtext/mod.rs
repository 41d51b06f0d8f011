/*!
 * Error Translator
 *
 * Maps a legacy status code to its description. Never fails: anything
 * outside the known ranges reads "Unrecognized error".
 */

mod table;

pub use table::{describe, describe_with, OsErrorText, SystemErrorText, ERROR_TEXT, UNRECOGNIZED};
