//! Detailed record types and the post-parse validator
//!
//! The provider is asked to honor a response schema, but nothing stops it from
//! sending nulls, blanks or missing keys anyway. Payloads are first read into
//! loose `Raw*` shapes, then promoted into [`DetailedRecord`] only when every
//! field is present and non-blank.

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// One entry of the era timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorEvent {
    pub year: String,
    pub event: String,
    pub description: String,
}

/// Validated narrative for one era
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedRecord {
    pub introduction: String,
    pub leader: String,
    pub capital: String,
    pub dominant_philosophy: String,
    /// Provider order is kept as-is
    pub major_events: Vec<MajorEvent>,
    pub cultural_achievements: Vec<String>,
    pub decline_narrative: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    introduction: Option<String>,
    leader: Option<String>,
    capital: Option<String>,
    dominant_philosophy: Option<String>,
    major_events: Option<Vec<Option<RawEvent>>>,
    cultural_achievements: Option<Vec<Option<String>>>,
    decline_narrative: Option<String>,

    // Older payloads name these fields differently
    emperor: Option<String>,
    philosophy: Option<String>,
    downfall: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    year: Option<String>,
    event: Option<String>,
    description: Option<String>,
}

/// Parse the provider's text payload into a validated record
///
/// Accepts a bare JSON object or one wrapped in a markdown code fence.
pub fn parse_record(text: &str) -> Result<DetailedRecord, FetchError> {
    let cleaned = strip_code_fence(text);
    if cleaned.is_empty() {
        return Err(FetchError::NoContent);
    }

    let raw: RawRecord =
        serde_json::from_str(cleaned).map_err(|source| FetchError::Malformed { source })?;
    raw.validate()
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (`json`, `JSON`, `javascript`, ...) after the opening fence
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// The current field wins unless it is blank
fn current_or_legacy(current: Option<String>, legacy: Option<String>) -> Option<String> {
    if current.as_deref().is_some_and(|v| !v.trim().is_empty()) {
        current
    } else {
        legacy.or(current)
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, FetchError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(FetchError::Incomplete {
            field: field.to_string(),
        }),
    }
}

impl RawRecord {
    fn validate(self) -> Result<DetailedRecord, FetchError> {
        let major_events = self
            .major_events
            .filter(|events| !events.is_empty())
            .ok_or_else(|| FetchError::Incomplete {
                field: "majorEvents".to_string(),
            })?
            .into_iter()
            .enumerate()
            .map(|(i, event)| {
                let event = event.ok_or_else(|| FetchError::Incomplete {
                    field: format!("majorEvents[{i}]"),
                })?;
                Ok(MajorEvent {
                    year: required(event.year, &format!("majorEvents[{i}].year"))?,
                    event: required(event.event, &format!("majorEvents[{i}].event"))?,
                    description: required(
                        event.description,
                        &format!("majorEvents[{i}].description"),
                    )?,
                })
            })
            .collect::<Result<Vec<_>, FetchError>>()?;

        let cultural_achievements = self
            .cultural_achievements
            .filter(|items| !items.is_empty())
            .ok_or_else(|| FetchError::Incomplete {
                field: "culturalAchievements".to_string(),
            })?
            .into_iter()
            .enumerate()
            .map(|(i, item)| required(item, &format!("culturalAchievements[{i}]")))
            .collect::<Result<Vec<_>, FetchError>>()?;

        Ok(DetailedRecord {
            introduction: required(self.introduction, "introduction")?,
            leader: required(current_or_legacy(self.leader, self.emperor), "leader")?,
            capital: required(self.capital, "capital")?,
            dominant_philosophy: required(
                current_or_legacy(self.dominant_philosophy, self.philosophy),
                "dominantPhilosophy",
            )?,
            major_events,
            cultural_achievements,
            decline_narrative: required(
                current_or_legacy(self.decline_narrative, self.downfall),
                "declineNarrative",
            )?,
        })
    }
}
