/// Sentinel the model may emit at the very start of a completion.
pub const START_OF_TEXT_TOKEN: &str = "<|startoftext|>";

/// Sentinel always treated as a stop sequence, whether configured or not.
pub const END_OF_TEXT_TOKEN: &str = "<|endoftext|>";

/// Separator token appended between turns by the prompt template.
pub const DEFAULT_SEP_TOKEN: &str = "</s>";

fn trim_prefix<'a>(text: &'a str, prefix: &str) -> &'a str {
    text.strip_prefix(prefix).unwrap_or(text)
}

fn trim_suffix<'a>(text: &'a str, suffix: &str) -> &'a str {
    text.strip_suffix(suffix).unwrap_or(text)
}

/// Cleans a raw completion for display. The order is load-bearing:
///
/// 1. strip a leading [`START_OF_TEXT_TOKEN`];
/// 2. strip a leading prompt echo (fallback for servers that ignore
///    `return_full_text: false`);
/// 3. strip a trailing `sep_token`, then trim trailing whitespace;
/// 4. for each stop sequence (configured list first, then
///    [`END_OF_TEXT_TOKEN`]), remove a single trailing match and trim
///    trailing whitespace again.
///
/// Step 4 is one pass in list order. If removing a later sequence exposes a
/// new trailing match for an earlier one, it stays.
pub fn clean_generated_text(raw: &str, prompt: &str, sep_token: &str, stop: &[String]) -> String {
    let mut text = trim_suffix(
        trim_prefix(trim_prefix(raw, START_OF_TEXT_TOKEN), prompt),
        sep_token,
    )
    .trim_end()
    .to_string();

    for stop in stop.iter().map(String::as_str).chain([END_OF_TEXT_TOKEN]) {
        if text.ends_with(stop) {
            text.truncate(text.len() - stop.len());
            text.truncate(text.trim_end().len());
        }
    }

    text
}
