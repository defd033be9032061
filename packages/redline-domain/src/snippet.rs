use unicode_segmentation::UnicodeSegmentation;

const ELLIPSIS: &str = "…";

/// Display-only context around a match: up to `window` grapheme clusters on
/// each side, with ellipsis markers when the field continues beyond the
/// window. Grapheme boundaries keep multi-byte characters intact.
pub fn context_window(raw: &str, start: usize, end: usize, window: usize) -> String {
	let prefix_start = graphemes_back(raw, start, window);
	let suffix_end = graphemes_forward(raw, end, window);
	let mut out = String::new();

	if prefix_start > 0 {
		out.push_str(ELLIPSIS);
	}

	out.push_str(&raw[prefix_start..suffix_end]);

	if suffix_end < raw.len() {
		out.push_str(ELLIPSIS);
	}

	out
}

fn graphemes_back(raw: &str, at: usize, window: usize) -> usize {
	let mut boundary = at;

	for (offset, _) in raw[..at].grapheme_indices(true).rev().take(window) {
		boundary = offset;
	}

	boundary
}

fn graphemes_forward(raw: &str, at: usize, window: usize) -> usize {
	let mut boundary = at;

	for (offset, grapheme) in raw[at..].grapheme_indices(true).take(window) {
		boundary = at + offset + grapheme.len();
	}

	boundary
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn short_fields_are_returned_whole() {
		assert_eq!(context_window("a cat sat", 2, 5, 40), "a cat sat");
	}

	#[test]
	fn long_fields_are_trimmed_with_ellipses() {
		let raw = "0123456789 cat 9876543210";
		let start = raw.find("cat").expect("expected cat");
		let snippet = context_window(raw, start, start + 3, 4);

		assert_eq!(snippet, "…789 cat 987…");
	}

	#[test]
	fn window_never_splits_multi_byte_characters() {
		let raw = "ééééé cat ééééé";
		let start = raw.find("cat").expect("expected cat");
		let snippet = context_window(raw, start, start + 3, 3);

		assert_eq!(snippet, "…éé cat éé…");
	}
}
