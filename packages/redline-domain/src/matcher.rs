use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
	#[serde(default)]
	pub case_sensitive: bool,
	#[serde(default)]
	pub whole_word: bool,
}

/// Byte offsets into the scanned string, always on char boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
	pub start: usize,
	pub end: usize,
}

/// Literal substring scan, left to right and non-overlapping: after a match
/// at `[s, e)` scanning resumes at `e`. The query is never interpreted as a
/// pattern, so user input cannot inject metacharacters.
pub fn find_occurrences(haystack: &str, query: &str, options: &MatchOptions) -> Vec<Span> {
	if query.is_empty() {
		return Vec::new();
	}

	let folded_query: Option<Vec<char>> = (!options.case_sensitive)
		.then(|| query.chars().flat_map(char::to_lowercase).collect());
	let mut spans = Vec::new();
	let mut start = 0;

	while start < haystack.len() {
		let matched_end = match folded_query.as_deref() {
			None => haystack[start..].starts_with(query).then(|| start + query.len()),
			Some(folded) => folded_match_end(haystack, start, folded),
		};

		if let Some(end) = matched_end
			&& (!options.whole_word || is_whole_word(haystack, start, end))
		{
			spans.push(Span { start, end });

			start = end;
		} else {
			start += haystack[start..].chars().next().map(char::len_utf8).unwrap_or(1);
		}
	}

	spans
}

/// Case-insensitive comparison aligned to the original haystack so reported
/// offsets never point into a folded copy. Every folded char of a haystack
/// char must be consumed by the query; a query ending mid-expansion does not
/// match (a character is never split).
fn folded_match_end(haystack: &str, start: usize, folded_query: &[char]) -> Option<usize> {
	let mut remaining = folded_query.iter().copied();
	let mut end = start;

	for ch in haystack[start..].chars() {
		for folded in ch.to_lowercase() {
			if remaining.next() != Some(folded) {
				return None;
			}
		}

		end += ch.len_utf8();

		if remaining.len() == 0 {
			return Some(end);
		}
	}

	None
}

/// The source product defined word characters as ASCII alphanumerics plus
/// underscore; keeping that rule keeps match counts stable for existing
/// content, so this deliberately does not use Unicode segmentation.
fn is_word_char(ch: char) -> bool {
	ch.is_ascii_alphanumeric() || ch == '_'
}

fn is_whole_word(haystack: &str, start: usize, end: usize) -> bool {
	let before_ok =
		haystack[..start].chars().next_back().map(|ch| !is_word_char(ch)).unwrap_or(true);
	let after_ok = haystack[end..].chars().next().map(|ch| !is_word_char(ch)).unwrap_or(true);

	before_ok && after_ok
}
