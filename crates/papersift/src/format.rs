//! Text helpers shared by the parser and the report.

/// Placeholder appended to shortened text.
pub const ELLIPSIS: &str = " [...]";

/// Collapses every run of whitespace into a single space and trims both ends.
///
/// ```
/// assert_eq!(papersift::format::collapse_whitespace("  a\n\t b  "), "a b");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Shortens `text` to at most `width` characters on a word boundary.
///
/// Whitespace is collapsed first. Text that still does not fit is cut after the last whole
/// word that leaves room for [`ELLIPSIS`]. If not even the first word fits, the result is the
/// bare placeholder `[...]`.
///
/// # Examples
///
/// ```
/// use papersift::format::shorten;
///
/// assert_eq!(shorten("Hello  world!", 12), "Hello world!");
/// assert_eq!(shorten("Hello world, how are you?", 20), "Hello world, [...]");
/// assert_eq!(shorten("Supercalifragilistic", 10), "[...]");
/// ```
pub fn shorten(text: &str, width: usize) -> String {
  let collapsed = collapse_whitespace(text);
  if collapsed.chars().count() <= width {
    return collapsed;
  }

  let budget = width.saturating_sub(ELLIPSIS.chars().count());
  let mut shortened = String::new();
  let mut length = 0;
  for word in collapsed.split(' ') {
    let word_length = word.chars().count();
    let needed = if shortened.is_empty() { word_length } else { length + 1 + word_length };
    if needed > budget {
      break;
    }
    if !shortened.is_empty() {
      shortened.push(' ');
    }
    shortened.push_str(word);
    length = needed;
  }

  if shortened.is_empty() {
    ELLIPSIS.trim_start().to_string()
  } else {
    shortened.push_str(ELLIPSIS);
    shortened
  }
}
