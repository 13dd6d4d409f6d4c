//! Prefix builder for block labels.
//!
//! Turns a category name such as `Staff Directory` into an acronym
//! such as `SD`.

/// Build an acronym prefix from a category name.
///
/// Characters other than ASCII letters, digits and whitespace are removed
/// first, then the first character of every remaining word is uppercased.
/// Returns an empty string when nothing survives cleaning.
pub fn build_prefix(text: &str) -> String {
	let clean: String = text
		.chars()
		.filter(|&c| c.is_ascii_alphanumeric() || is_word_separator(c))
		.collect();

	clean
		.split(is_word_separator)
		.filter_map(|word| word.chars().next())
		.map(|c| c.to_ascii_uppercase())
		.collect()
}

/// ASCII whitespace, including vertical tab.
fn is_word_separator(c: char) -> bool {
	c.is_ascii_whitespace() || c == '\x0B'
}
