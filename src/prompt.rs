//! Prompt composition
//!
//! Merges the user instruction, the flattened data block, and the fixed
//! answer-format directive into the single text that goes to the model.

/// Label introducing the flattened data block inside the prompt.
pub const DATA_SECTION_LABEL: &str = "data";

/// Fixed directive appended to every prompt. Keeps answers short and free of
/// code regardless of what the user asked for.
pub const FORMAT_DIRECTIVE: &str = "Retrieve information from the DataFrame based on the given \
query if it involves manipulation. The answer should be in three lines. Do not provide any code.";

/// Compose the final instruction string.
///
/// The instruction is passed through unvalidated; enforcing non-empty input
/// is the caller's job.
pub fn compose(instruction: &str, flattened: Option<&str>) -> String {
    match flattened {
        Some(data) => format!(
            "{}\n{}:\n{}{}",
            instruction, DATA_SECTION_LABEL, data, FORMAT_DIRECTIVE
        ),
        None => format!("{}{}", instruction, FORMAT_DIRECTIVE),
    }
}
