use serde::{Deserialize, Serialize};
use uuid::Uuid;

use redline_domain::{
	content::{AssetContent, ConversationContent},
	fields::{self, Field},
	matcher::{self, MatchOptions, Span},
	provenance::Provenance,
	snippet,
};

use crate::{Error, RedlineService, Result};

const MATCH_ID_HEX_CHARS: usize = 16;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchRequest {
	pub conversation_id: Uuid,
	pub find_text: String,
	#[serde(default)]
	pub options: MatchOptions,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCategory {
	Summary,
	Transcript,
	AiAsset,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Match {
	/// Deterministic function of provenance and offsets, so the same logical
	/// match keeps its id across a re-fetch and re-search.
	pub id: String,
	pub category: MatchCategory,
	pub provenance: Provenance,
	/// Offsets into the field's raw value captured at search time; stale as
	/// soon as the content changes.
	pub start: usize,
	pub end: usize,
	/// Exact matched substring, original casing preserved.
	pub matched_text: String,
	/// Display-only snippet; never used to apply a replacement.
	pub context: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssetMatches {
	pub asset_id: Uuid,
	pub asset_name: String,
	pub matches: Vec<Match>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FindReplaceResults {
	pub summary: Vec<Match>,
	pub transcript: Vec<Match>,
	pub ai_assets: Vec<AssetMatches>,
	pub total_matches: usize,
}

impl FindReplaceResults {
	pub fn iter_matches(&self) -> impl Iterator<Item = &Match> {
		self.summary
			.iter()
			.chain(self.transcript.iter())
			.chain(self.ai_assets.iter().flat_map(|bucket| bucket.matches.iter()))
	}

	pub(crate) fn recompute_total(&mut self) {
		self.total_matches = self.summary.len()
			+ self.transcript.len()
			+ self.ai_assets.iter().map(|bucket| bucket.matches.len()).sum::<usize>();
	}
}

impl RedlineService {
	pub async fn search(&self, req: SearchRequest) -> Result<FindReplaceResults> {
		let query = validate_query(&req.find_text, self.cfg.limits.max_query_chars)?;
		let content = self.fetch_content(req.conversation_id).await?;

		for asset in &content.assets {
			if let AssetContent::Structured(value) = &asset.content
				&& !value.is_object()
				&& !value.is_array()
			{
				tracing::warn!(
					asset_id = %asset.asset_id,
					"Structured asset payload is not an object; treated as one flat field."
				);
			}
		}

		let results =
			scan_content(&content, query, &req.options, self.cfg.search.context_window);

		tracing::info!(
			conversation_id = %req.conversation_id,
			summary = results.summary.len(),
			transcript = results.transcript.len(),
			asset_buckets = results.ai_assets.len(),
			total = results.total_matches,
			"Search completed."
		);

		Ok(results)
	}
}

/// The query is matched exactly as given (including surrounding whitespace);
/// validation only rejects queries with nothing searchable in them.
pub(crate) fn validate_query(find_text: &str, max_query_chars: usize) -> Result<&str> {
	if find_text.trim().is_empty() {
		return Err(Error::InvalidQuery { message: "find_text must be non-empty.".to_string() });
	}
	if find_text.chars().count() > max_query_chars {
		return Err(Error::InvalidQuery {
			message: format!("find_text must be at most {max_query_chars} characters."),
		});
	}

	Ok(find_text)
}

pub(crate) fn scan_content(
	content: &ConversationContent,
	query: &str,
	options: &MatchOptions,
	context_window: usize,
) -> FindReplaceResults {
	let mut results = FindReplaceResults::default();
	let mut asset_buckets: Vec<AssetMatches> = content
		.assets
		.iter()
		.map(|asset| AssetMatches {
			asset_id: asset.asset_id,
			asset_name: asset.name.clone(),
			matches: Vec::new(),
		})
		.collect();

	for field in fields::collect_fields(content) {
		for span in matcher::find_occurrences(&field.raw_value, query, options) {
			let found = build_match(&field, span, context_window);

			match &field.provenance {
				Provenance::Summary { .. } => results.summary.push(found),
				Provenance::Transcript { .. } => results.transcript.push(found),
				Provenance::Asset { asset_id, .. } =>
					if let Some(bucket) =
						asset_buckets.iter_mut().find(|bucket| bucket.asset_id == *asset_id)
					{
						bucket.matches.push(found);
					},
			}
		}
	}

	results.ai_assets = asset_buckets.into_iter().filter(|bucket| !bucket.matches.is_empty()).collect();

	results.recompute_total();

	results
}

fn build_match(field: &Field, span: Span, context_window: usize) -> Match {
	Match {
		id: match_id(&field.provenance, span.start, span.end),
		category: category_of(&field.provenance),
		provenance: field.provenance.clone(),
		start: span.start,
		end: span.end,
		matched_text: field.raw_value[span.start..span.end].to_string(),
		context: snippet::context_window(&field.raw_value, span.start, span.end, context_window),
	}
}

pub(crate) fn match_id(provenance: &Provenance, start: usize, end: usize) -> String {
	let raw = format!("{}:{start}:{end}", provenance.storage_key());
	let hex = blake3::hash(raw.as_bytes()).to_hex().to_string();

	hex[..MATCH_ID_HEX_CHARS].to_string()
}

pub(crate) fn category_of(provenance: &Provenance) -> MatchCategory {
	match provenance {
		Provenance::Summary { .. } => MatchCategory::Summary,
		Provenance::Transcript { .. } => MatchCategory::Transcript,
		Provenance::Asset { .. } => MatchCategory::AiAsset,
	}
}

#[cfg(test)]
mod tests {
	use redline_domain::{
		content::{SummaryContent, Transcript},
		provenance::SummaryPart,
	};

	use super::*;

	#[test]
	fn match_ids_are_deterministic_and_distinct() {
		let title = Provenance::Summary { part: SummaryPart::Title };
		let overview = Provenance::Summary { part: SummaryPart::Overview };

		assert_eq!(match_id(&title, 0, 3), match_id(&title, 0, 3));
		assert_ne!(match_id(&title, 0, 3), match_id(&title, 4, 7));
		assert_ne!(match_id(&title, 0, 3), match_id(&overview, 0, 3));
	}

	#[test]
	fn validate_query_rejects_blank_and_oversized_input() {
		assert!(matches!(validate_query("  \t", 256), Err(Error::InvalidQuery { .. })));
		assert!(matches!(validate_query("abcd", 3), Err(Error::InvalidQuery { .. })));
		assert_eq!(validate_query(" cat ", 256).expect("expected a valid query"), " cat ");
	}

	#[test]
	fn scan_buckets_matches_by_category() {
		let content = ConversationContent {
			summary: Some(SummaryContent::Plain("the cat sat".to_string())),
			transcript: Some(Transcript::Plain("a cat and a cat".to_string())),
			assets: Vec::new(),
		};
		let results = scan_content(&content, "cat", &MatchOptions::default(), 40);

		assert_eq!(results.summary.len(), 1);
		assert_eq!(results.transcript.len(), 2);
		assert!(results.ai_assets.is_empty());
		assert_eq!(results.total_matches, 3);
		assert_eq!(results.transcript[0].matched_text, "cat");
	}

	#[test]
	fn matches_within_a_field_are_in_ascending_offset_order() {
		let content = ConversationContent {
			summary: None,
			transcript: Some(Transcript::Plain("cat cat cat".to_string())),
			assets: Vec::new(),
		};
		let results = scan_content(&content, "cat", &MatchOptions::default(), 40);
		let starts: Vec<usize> = results.transcript.iter().map(|m| m.start).collect();

		assert_eq!(starts, vec![0, 4, 8]);
	}
}
