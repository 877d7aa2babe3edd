//! Plain-text helpers for building replies.

/// Marker appended to text that was cut short
pub const ELLIPSIS: char = '…';

/// Truncate `text` to at most `max_chars` characters, ending in [`ELLIPSIS`]
/// when anything was removed.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
  if text.chars().count() <= max_chars {
    return text.to_string();
  }
  if max_chars == 0 {
    return String::new();
  }

  let mut truncated: String = text.chars().take(max_chars - 1).collect();
  truncated.push(ELLIPSIS);
  truncated
}

/// Truncate `text` so that it fits in `max_units` UTF-16 code units.
///
/// Telegram measures message length in UTF-16 code units, so characters
/// outside the basic multilingual plane (most emoji) count twice.
pub fn truncate_utf16(text: &str, max_units: usize) -> String {
  if text.encode_utf16().count() <= max_units {
    return text.to_string();
  }
  if max_units == 0 {
    return String::new();
  }

  let budget = max_units - ELLIPSIS.len_utf16();
  let mut used = 0;
  let mut truncated = String::new();
  for ch in text.chars() {
    used += ch.len_utf16();
    if used > budget {
      break;
    }
    truncated.push(ch);
  }
  truncated.push(ELLIPSIS);
  truncated
}

/// The `YYYY-MM-DD` part of a Jira timestamp
pub fn date_part(timestamp: &str) -> &str {
  timestamp.get(..10).unwrap_or(timestamp)
}
