use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use redline_domain::{
	content::ConversationContent,
	fields::{self, Field},
	matcher::{self, MatchOptions, Span},
	provenance::{EntityRef, Provenance},
};

use crate::{RedlineService, Result, search};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplaceRequest {
	pub conversation_id: Uuid,
	pub find_text: String,
	pub replace_text: String,
	#[serde(default)]
	pub options: MatchOptions,
	#[serde(default)]
	pub replace_all: bool,
	/// Ignored when `replace_all` is set. Ids that no longer exist in freshly
	/// fetched content are dropped silently; concurrent edits are expected.
	#[serde(default)]
	pub match_ids: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplaceResponse {
	/// Matches actually replaced; lower than requested when ids went stale or
	/// an entity was skipped.
	pub replaced_count: usize,
	pub entities: Vec<EntityOutcome>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntityOutcome {
	pub entity: EntityRef,
	pub status: EntityStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntityStatus {
	Replaced { matches: usize },
	/// A recorded location no longer resolved; the whole entity was skipped
	/// so a structured body is never partially written.
	ReserializationFailed { message: String },
	WriteBackFailed { message: String },
}

/// One field's share of the plan: the spans to substitute and the value they
/// were found in.
struct FieldTargets {
	field: Field,
	spans: Vec<Span>,
}

struct EntityPlan {
	entity: EntityRef,
	matches: usize,
	new_values: Vec<(Provenance, String)>,
}

enum EntityError {
	Reserialization(String),
	WriteBack(String),
}

impl RedlineService {
	pub async fn replace(&self, req: ReplaceRequest) -> Result<ReplaceResponse> {
		let query = search::validate_query(&req.find_text, self.cfg.limits.max_query_chars)?;
		// never trust caller offsets: re-fetch and re-scan for the
		// authoritative match set
		let content = self.fetch_content(req.conversation_id).await?;
		let requested: Option<HashSet<&str>> = (!req.replace_all)
			.then(|| req.match_ids.iter().map(String::as_str).collect());
		let plans = build_plans(&content, query, &req.options, requested.as_ref(), &req.replace_text);

		let mut replaced_count = 0;
		let mut entities = Vec::new();

		for plan in plans {
			match self.apply_entity(req.conversation_id, &content, &plan).await {
				Ok(()) => {
					replaced_count += plan.matches;

					entities.push(EntityOutcome {
						entity: plan.entity,
						status: EntityStatus::Replaced { matches: plan.matches },
					});
				},
				Err(EntityError::Reserialization(message)) => {
					tracing::warn!(
						conversation_id = %req.conversation_id,
						entity = ?plan.entity,
						error = %message,
						"Entity reserialization failed; entity skipped."
					);

					entities.push(EntityOutcome {
						entity: plan.entity,
						status: EntityStatus::ReserializationFailed { message },
					});
				},
				Err(EntityError::WriteBack(message)) => {
					tracing::warn!(
						conversation_id = %req.conversation_id,
						entity = ?plan.entity,
						error = %message,
						"Entity write-back failed; entity not applied."
					);

					entities.push(EntityOutcome {
						entity: plan.entity,
						status: EntityStatus::WriteBackFailed { message },
					});
				},
			}
		}

		tracing::info!(
			conversation_id = %req.conversation_id,
			replaced = replaced_count,
			entities = entities.len(),
			"Replace completed."
		);

		Ok(ReplaceResponse { replaced_count, entities })
	}

	async fn apply_entity(
		&self,
		conversation_id: Uuid,
		content: &ConversationContent,
		plan: &EntityPlan,
	) -> Result<(), EntityError> {
		match plan.entity {
			EntityRef::Summary => {
				let Some(summary) = content.summary.as_ref() else {
					return Err(EntityError::Reserialization(
						"Summary is no longer present.".to_string(),
					));
				};
				let mut updated = summary.clone();

				for (provenance, new_value) in &plan.new_values {
					let Provenance::Summary { part } = provenance else {
						continue;
					};

					fields::write_summary_value(&mut updated, *part, new_value)
						.map_err(|err| EntityError::Reserialization(err.to_string()))?;
				}

				self.store
					.write_summary(conversation_id, &updated)
					.await
					.map_err(|err| EntityError::WriteBack(err.to_string()))
			},
			EntityRef::Transcript => {
				let Some(transcript) = content.transcript.as_ref() else {
					return Err(EntityError::Reserialization(
						"Transcript is no longer present.".to_string(),
					));
				};
				let mut updated = transcript.clone();

				for (provenance, new_value) in &plan.new_values {
					let Provenance::Transcript { segment } = provenance else {
						continue;
					};

					fields::write_transcript_value(&mut updated, *segment, new_value)
						.map_err(|err| EntityError::Reserialization(err.to_string()))?;
				}

				self.store
					.write_transcript(conversation_id, &updated)
					.await
					.map_err(|err| EntityError::WriteBack(err.to_string()))
			},
			EntityRef::Asset(asset_id) => {
				let Some(asset) = content.assets.iter().find(|asset| asset.asset_id == asset_id)
				else {
					return Err(EntityError::Reserialization(
						"Asset is no longer present.".to_string(),
					));
				};
				let mut updated = asset.content.clone();

				for (provenance, new_value) in &plan.new_values {
					let Provenance::Asset { path, .. } = provenance else {
						continue;
					};

					fields::write_asset_value(&mut updated, path, new_value)
						.map_err(|err| EntityError::Reserialization(err.to_string()))?;
				}

				self.store
					.write_asset(conversation_id, asset_id, &updated)
					.await
					.map_err(|err| EntityError::WriteBack(err.to_string()))
			},
		}
	}
}

/// Scans fresh content, keeps the targeted spans, and groups the resulting
/// per-field new values by entity in first-seen (document) order.
fn build_plans(
	content: &ConversationContent,
	query: &str,
	options: &MatchOptions,
	requested: Option<&HashSet<&str>>,
	replace_text: &str,
) -> Vec<EntityPlan> {
	let mut targets = Vec::new();

	for field in fields::collect_fields(content) {
		let spans: Vec<Span> = matcher::find_occurrences(&field.raw_value, query, options)
			.into_iter()
			.filter(|span| match requested {
				None => true,
				Some(ids) =>
					ids.contains(search::match_id(&field.provenance, span.start, span.end).as_str()),
			})
			.collect();

		if !spans.is_empty() {
			targets.push(FieldTargets { field, spans });
		}
	}

	let mut plans: Vec<EntityPlan> = Vec::new();

	for FieldTargets { field, spans } in targets {
		let new_value = splice_spans(&field.raw_value, &spans, replace_text);
		let entity = field.provenance.entity();
		let index = match plans.iter().position(|plan| plan.entity == entity) {
			Some(index) => index,
			None => {
				plans.push(EntityPlan { entity, matches: 0, new_values: Vec::new() });

				plans.len() - 1
			},
		};

		plans[index].matches += spans.len();
		plans[index].new_values.push((field.provenance, new_value));
	}

	plans
}

/// Substitutes every span in one pass, descending by start offset so earlier
/// splices never shift the offsets of the ones still pending.
fn splice_spans(raw: &str, spans: &[Span], replace_text: &str) -> String {
	let mut ordered: Vec<Span> = spans.to_vec();

	ordered.sort_by(|a, b| b.start.cmp(&a.start));

	let mut updated = raw.to_string();

	for span in ordered {
		updated.replace_range(span.start..span.end, replace_text);
	}

	updated
}
