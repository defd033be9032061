use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies exactly one reserializable string location inside a
/// conversation. Two fields never share a provenance.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
	Summary { part: SummaryPart },
	/// `segment: None` means the transcript is one flat string.
	Transcript { segment: Option<usize> },
	/// An empty `path` means the asset body is one flat string.
	Asset { asset_id: Uuid, asset_name: String, path: FieldPath },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryPart {
	Body,
	Title,
	Overview,
	KeyPointTopic(usize),
	KeyPointDescription(usize),
	SectionTopic(usize),
	SectionContent(usize),
	Decision(usize),
	NextStep(usize),
}

/// Path into a structured asset body, recorded while walking the tree so the
/// exact leaf can be written back later.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldPath(Vec<PathStep>);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStep {
	Key(String),
	Index(usize),
}

/// The write-back granularity: one store write per entity, never per match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRef {
	Summary,
	Transcript,
	Asset(Uuid),
}

impl Provenance {
	/// Canonical key for deterministic match ids and entity grouping. Stable
	/// across re-fetch and re-search for unchanged content.
	pub fn storage_key(&self) -> String {
		match self {
			Self::Summary { part } => format!("summary.{part}"),
			Self::Transcript { segment: None } => "transcript".to_string(),
			Self::Transcript { segment: Some(index) } => format!("transcript.{index}"),
			Self::Asset { asset_id, path, .. } if path.is_root() => format!("asset.{asset_id}"),
			Self::Asset { asset_id, path, .. } => format!("asset.{asset_id}.{path}"),
		}
	}

	pub fn entity(&self) -> EntityRef {
		match self {
			Self::Summary { .. } => EntityRef::Summary,
			Self::Transcript { .. } => EntityRef::Transcript,
			Self::Asset { asset_id, .. } => EntityRef::Asset(*asset_id),
		}
	}
}

impl Display for SummaryPart {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Body => write!(f, "body"),
			Self::Title => write!(f, "title"),
			Self::Overview => write!(f, "overview"),
			Self::KeyPointTopic(index) => write!(f, "key_points[{index}].topic"),
			Self::KeyPointDescription(index) => write!(f, "key_points[{index}].description"),
			Self::SectionTopic(index) => write!(f, "sections[{index}].topic"),
			Self::SectionContent(index) => write!(f, "sections[{index}].content"),
			Self::Decision(index) => write!(f, "decisions[{index}]"),
			Self::NextStep(index) => write!(f, "next_steps[{index}]"),
		}
	}
}

impl FieldPath {
	pub fn root() -> Self {
		Self(Vec::new())
	}

	pub fn is_root(&self) -> bool {
		self.0.is_empty()
	}

	pub fn steps(&self) -> &[PathStep] {
		&self.0
	}

	pub fn child_key(&self, key: &str) -> Self {
		let mut steps = self.0.clone();

		steps.push(PathStep::Key(key.to_string()));

		Self(steps)
	}

	pub fn child_index(&self, index: usize) -> Self {
		let mut steps = self.0.clone();

		steps.push(PathStep::Index(index));

		Self(steps)
	}
}

impl Display for FieldPath {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let mut first = true;

		for step in &self.0 {
			match step {
				PathStep::Key(key) => {
					if !first {
						write!(f, ".")?;
					}

					write!(f, "{key}")?;
				},
				PathStep::Index(index) => write!(f, "[{index}]")?,
			}

			first = false;
		}

		Ok(())
	}
}
