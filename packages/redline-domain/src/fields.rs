use std::fmt::{Display, Formatter};

use serde_json::Value;

use crate::{
	content::{
		AssetContent, ConversationContent, GeneratedAsset, StructuredSummary, SummaryContent,
		Transcript,
	},
	provenance::{FieldPath, PathStep, Provenance, SummaryPart},
};

/// One atomic searchable string location, recomputed fresh on every request
/// and never cached across calls.
#[derive(Clone, Debug)]
pub struct Field {
	pub provenance: Provenance,
	pub raw_value: String,
}

/// A recorded location no longer resolves against the content it is being
/// written back into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathError {
	MissingKey { key: String },
	IndexOutOfBounds { index: usize },
	NotAString,
	ShapeChanged,
}

impl Display for PathError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::MissingKey { key } => write!(f, "Key {key:?} is missing."),
			Self::IndexOutOfBounds { index } => write!(f, "Index {index} is out of bounds."),
			Self::NotAString => write!(f, "The resolved value is not a string."),
			Self::ShapeChanged => write!(f, "The content shape no longer matches the field."),
		}
	}
}

impl std::error::Error for PathError {}

/// Flattens a conversation into searchable fields, in document order: summary
/// parts, transcript segments, then each asset's string leaves.
pub fn collect_fields(content: &ConversationContent) -> Vec<Field> {
	let mut fields = Vec::new();

	if let Some(summary) = content.summary.as_ref() {
		collect_summary_fields(summary, &mut fields);
	}
	if let Some(transcript) = content.transcript.as_ref() {
		collect_transcript_fields(transcript, &mut fields);
	}
	for asset in &content.assets {
		collect_asset_fields(asset, &mut fields);
	}

	fields
}

fn collect_summary_fields(summary: &SummaryContent, fields: &mut Vec<Field>) {
	let mut push = |part: SummaryPart, raw_value: &str| {
		if raw_value.is_empty() {
			return;
		}

		fields.push(Field {
			provenance: Provenance::Summary { part },
			raw_value: raw_value.to_string(),
		});
	};

	match summary {
		SummaryContent::Plain(body) => push(SummaryPart::Body, body),
		SummaryContent::Structured(structured) => {
			push(SummaryPart::Title, &structured.title);
			push(SummaryPart::Overview, &structured.overview);

			for (index, point) in structured.key_points.iter().enumerate() {
				push(SummaryPart::KeyPointTopic(index), &point.topic);
				push(SummaryPart::KeyPointDescription(index), &point.description);
			}
			for (index, section) in structured.sections.iter().enumerate() {
				push(SummaryPart::SectionTopic(index), &section.topic);
				push(SummaryPart::SectionContent(index), &section.content);
			}
			for (index, decision) in structured.decisions.iter().flatten().enumerate() {
				push(SummaryPart::Decision(index), decision);
			}
			for (index, step) in structured.next_steps.iter().flatten().enumerate() {
				push(SummaryPart::NextStep(index), step);
			}
		},
	}
}

fn collect_transcript_fields(transcript: &Transcript, fields: &mut Vec<Field>) {
	match transcript {
		Transcript::Plain(body) =>
			if !body.is_empty() {
				fields.push(Field {
					provenance: Provenance::Transcript { segment: None },
					raw_value: body.clone(),
				});
			},
		Transcript::Segments(segments) =>
			for (index, segment) in segments.iter().enumerate() {
				if segment.text.is_empty() {
					continue;
				}

				fields.push(Field {
					provenance: Provenance::Transcript { segment: Some(index) },
					raw_value: segment.text.clone(),
				});
			},
	}
}

fn collect_asset_fields(asset: &GeneratedAsset, fields: &mut Vec<Field>) {
	match &asset.content {
		AssetContent::Markdown(body) =>
			if !body.is_empty() {
				fields.push(asset_field(asset, FieldPath::root(), body));
			},
		// A degraded payload (bare string at the root) falls out of the walk
		// as a single flat field; non-string scalars have no searchable text.
		AssetContent::Structured(value) => walk_value(asset, value, FieldPath::root(), fields),
	}
}

fn walk_value(asset: &GeneratedAsset, value: &Value, path: FieldPath, fields: &mut Vec<Field>) {
	match value {
		Value::String(text) =>
			if !text.is_empty() {
				fields.push(asset_field(asset, path, text));
			},
		Value::Array(items) =>
			for (index, item) in items.iter().enumerate() {
				walk_value(asset, item, path.child_index(index), fields);
			},
		Value::Object(map) =>
			for (key, item) in map {
				walk_value(asset, item, path.child_key(key), fields);
			},
		_ => {},
	}
}

fn asset_field(asset: &GeneratedAsset, path: FieldPath, raw_value: &str) -> Field {
	Field {
		provenance: Provenance::Asset {
			asset_id: asset.asset_id,
			asset_name: asset.name.clone(),
			path,
		},
		raw_value: raw_value.to_string(),
	}
}

/// Inverse of the summary side of [`collect_fields`].
pub fn write_summary_value(
	summary: &mut SummaryContent,
	part: SummaryPart,
	new_value: &str,
) -> Result<(), PathError> {
	match (summary, part) {
		(SummaryContent::Plain(body), SummaryPart::Body) => {
			*body = new_value.to_string();

			Ok(())
		},
		(SummaryContent::Plain(_), _) => Err(PathError::ShapeChanged),
		(SummaryContent::Structured(_), SummaryPart::Body) => Err(PathError::ShapeChanged),
		(SummaryContent::Structured(structured), part) =>
			write_summary_part(structured, part, new_value),
	}
}

fn write_summary_part(
	summary: &mut StructuredSummary,
	part: SummaryPart,
	new_value: &str,
) -> Result<(), PathError> {
	match part {
		SummaryPart::Body => return Err(PathError::ShapeChanged),
		SummaryPart::Title => summary.title = new_value.to_string(),
		SummaryPart::Overview => summary.overview = new_value.to_string(),
		SummaryPart::KeyPointTopic(index) =>
			summary
				.key_points
				.get_mut(index)
				.ok_or(PathError::IndexOutOfBounds { index })?
				.topic = new_value.to_string(),
		SummaryPart::KeyPointDescription(index) =>
			summary
				.key_points
				.get_mut(index)
				.ok_or(PathError::IndexOutOfBounds { index })?
				.description = new_value.to_string(),
		SummaryPart::SectionTopic(index) =>
			summary.sections.get_mut(index).ok_or(PathError::IndexOutOfBounds { index })?.topic =
				new_value.to_string(),
		SummaryPart::SectionContent(index) =>
			summary.sections.get_mut(index).ok_or(PathError::IndexOutOfBounds { index })?.content =
				new_value.to_string(),
		SummaryPart::Decision(index) =>
			*summary
				.decisions
				.as_mut()
				.and_then(|items| items.get_mut(index))
				.ok_or(PathError::IndexOutOfBounds { index })? = new_value.to_string(),
		SummaryPart::NextStep(index) =>
			*summary
				.next_steps
				.as_mut()
				.and_then(|items| items.get_mut(index))
				.ok_or(PathError::IndexOutOfBounds { index })? = new_value.to_string(),
	}

	Ok(())
}

/// Inverse of the transcript side of [`collect_fields`].
pub fn write_transcript_value(
	transcript: &mut Transcript,
	segment: Option<usize>,
	new_value: &str,
) -> Result<(), PathError> {
	match (transcript, segment) {
		(Transcript::Plain(body), None) => {
			*body = new_value.to_string();

			Ok(())
		},
		(Transcript::Segments(segments), Some(index)) => {
			segments.get_mut(index).ok_or(PathError::IndexOutOfBounds { index })?.text =
				new_value.to_string();

			Ok(())
		},
		_ => Err(PathError::ShapeChanged),
	}
}

/// Inverse of the asset side of [`collect_fields`]. Writes one leaf and
/// leaves every sibling untouched.
pub fn write_asset_value(
	content: &mut AssetContent,
	path: &FieldPath,
	new_value: &str,
) -> Result<(), PathError> {
	match content {
		AssetContent::Markdown(body) =>
			if path.is_root() {
				*body = new_value.to_string();

				Ok(())
			} else {
				Err(PathError::ShapeChanged)
			},
		AssetContent::Structured(value) => write_string_leaf(value, path, new_value),
	}
}

pub fn write_string_leaf(
	value: &mut Value,
	path: &FieldPath,
	new_value: &str,
) -> Result<(), PathError> {
	let slot = resolve_mut(value, path.steps())?;

	match slot {
		Value::String(text) => {
			*text = new_value.to_string();

			Ok(())
		},
		_ => Err(PathError::NotAString),
	}
}

fn resolve_mut<'a>(value: &'a mut Value, steps: &[PathStep]) -> Result<&'a mut Value, PathError> {
	let mut current = value;

	for step in steps {
		current = match step {
			PathStep::Key(key) =>
				current.get_mut(key.as_str()).ok_or_else(|| PathError::MissingKey { key: key.clone() })?,
			PathStep::Index(index) =>
				current.get_mut(*index).ok_or(PathError::IndexOutOfBounds { index: *index })?,
		};
	}

	Ok(current)
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn write_string_leaf_leaves_siblings_untouched() {
		let mut value = json!({
			"headline": "Old Title",
			"sections": [{ "heading": "Intro", "paragraphs": ["Old text here"] }],
		});
		let path = FieldPath::root()
			.child_key("sections")
			.child_index(0)
			.child_key("paragraphs")
			.child_index(0);

		write_string_leaf(&mut value, &path, "New text here").expect("expected leaf write");

		assert_eq!(
			value,
			json!({
				"headline": "Old Title",
				"sections": [{ "heading": "Intro", "paragraphs": ["New text here"] }],
			})
		);
	}

	#[test]
	fn write_string_leaf_rejects_missing_path() {
		let mut value = json!({ "headline": "Old Title" });
		let path = FieldPath::root().child_key("sections").child_index(0);

		assert_eq!(
			write_string_leaf(&mut value, &path, "x"),
			Err(PathError::MissingKey { key: "sections".to_string() })
		);
	}

	#[test]
	fn write_string_leaf_rejects_non_string_slot() {
		let mut value = json!({ "count": 3 });
		let path = FieldPath::root().child_key("count");

		assert_eq!(write_string_leaf(&mut value, &path, "x"), Err(PathError::NotAString));
	}
}
