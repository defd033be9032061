use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Everything searchable in one conversation, in the shapes the surrounding
/// application stores them. Absent summary or transcript is normal for a
/// conversation that has not finished processing yet.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConversationContent {
	pub summary: Option<SummaryContent>,
	pub transcript: Option<Transcript>,
	#[serde(default)]
	pub assets: Vec<GeneratedAsset>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryContent {
	/// Legacy single-markdown-string summaries.
	Plain(String),
	Structured(StructuredSummary),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StructuredSummary {
	pub title: String,
	pub overview: String,
	#[serde(default)]
	pub key_points: Vec<KeyPoint>,
	#[serde(default)]
	pub sections: Vec<DetailSection>,
	pub decisions: Option<Vec<String>>,
	pub next_steps: Option<Vec<String>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyPoint {
	pub topic: String,
	pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetailSection {
	pub topic: String,
	pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transcript {
	Plain(String),
	Segments(Vec<TranscriptSegment>),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TranscriptSegment {
	pub start_secs: f64,
	pub speaker: String,
	pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratedAsset {
	pub asset_id: Uuid,
	pub name: String,
	pub content: AssetContent,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetContent {
	Markdown(String),
	/// Template-dependent object tree. A payload that failed to parse as an
	/// object upstream arrives here as a bare JSON string and is treated as a
	/// single flat field.
	Structured(Value),
}
