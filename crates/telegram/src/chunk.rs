//! Message splitting for the Bot API size limit.

/// Telegram rejects messages longer than this.
pub const TELEGRAM_MAX_MESSAGE_LEN: usize = 4096;

/// Split text into chunks of at most `max_len` bytes.
///
/// Splits at the last newline inside the window, falling back to the last
/// space, then to a hard cut on a char boundary. The separator at a split
/// point is dropped; everything else is kept as is.
pub fn chunk_message(text: &str, max_len: usize) -> Vec<String> {
    if max_len == 0 || text.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut remaining = text;

    while remaining.len() > max_len {
        let mut window_end = remaining.floor_char_boundary(max_len);
        if window_end == 0 {
            // A single char wider than the limit still has to go somewhere.
            window_end = remaining
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(remaining.len());
        }

        let window = &remaining[..window_end];
        match window.rfind('\n').or_else(|| window.rfind(' ')) {
            Some(at) if at > 0 => {
                chunks.push(remaining[..at].to_string());
                // Separators are one byte.
                remaining = &remaining[at + 1..];
            },
            _ => {
                chunks.push(window.to_string());
                remaining = &remaining[window_end..];
            },
        }
    }

    if !remaining.is_empty() {
        chunks.push(remaining.to_string());
    }
    chunks
}
