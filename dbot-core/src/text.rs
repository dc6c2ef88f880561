//! Outbound text helpers.

/// Splits `text` into consecutive segments of at most `max_chars` characters.
///
/// Counts Unicode scalar values, so a segment never cuts a character in half. Text that fits
/// is returned as a single segment; empty text yields no segments. Concatenating the result
/// always reproduces `text`. A `max_chars` of 0 is treated as 1.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for c in text.chars() {
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(c);
        count += 1;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
