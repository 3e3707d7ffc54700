//! Presentation helpers for finished plans
//!
//! All pure formatting except [`write_export`], which only writes a file.

use crate::history::HistoryEntry;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Canned requests offered by the UI
pub const EXAMPLE_REQUESTS: &[(&str, &str)] = &[
    ("Goa Beach Vacation", "Plan a 3-day beach vacation to Goa from Delhi"),
    ("Jaipur Heritage Tour", "Plan a 4-day heritage tour to Jaipur from Mumbai"),
    (
        "Kerala Backwaters",
        "Plan a 5-day backwaters and nature trip to Kerala from Bangalore",
    ),
];

const MAX_OBSERVATION_CHARS: usize = 500;

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Flight,
    Hotel,
    Weather,
    Itinerary,
    Budget,
    Reasoning,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Summary,
        Section::Flight,
        Section::Hotel,
        Section::Weather,
        Section::Itinerary,
        Section::Budget,
        Section::Reasoning,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Summary => "Summary",
            Section::Flight => "Flight",
            Section::Hotel => "Hotel",
            Section::Weather => "Weather",
            Section::Itinerary => "Itinerary",
            Section::Budget => "Budget",
            Section::Reasoning => "Reasoning",
        }
    }

    /// Section a line opens, if it looks like a heading for one
    fn detect(line: &str) -> Option<Self> {
        let lower = line.to_lowercase();
        let has = |needle: &str| lower.contains(needle);

        if has("flight") && (has("selected") || has("booked")) {
            Some(Section::Flight)
        } else if has("hotel") && (has("selected") || has("booked") || has("recommendation")) {
            Some(Section::Hotel)
        } else if has("weather") || has("forecast") {
            Some(Section::Weather)
        } else if has("itinerary") || has("day-wise") || has("day 1") {
            Some(Section::Itinerary)
        } else if has("budget") || has("cost") {
            Some(Section::Budget)
        } else if has("reasoning") || has("why") {
            Some(Section::Reasoning)
        } else {
            None
        }
    }
}

/// A plan split into coarse sections by keyword
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanSections {
    sections: [String; 7],
}

impl PlanSections {
    /// Lines stay in the current section until a line mentions another one.
    pub fn parse(trip_plan: &str) -> Self {
        let mut parsed = Self::default();
        let mut current = Section::Summary;
        for line in trip_plan.lines() {
            if let Some(section) = Section::detect(line) {
                current = section;
            }
            let text = &mut parsed.sections[current as usize];
            text.push_str(line);
            text.push('\n');
        }
        parsed
    }

    pub fn get(&self, section: Section) -> &str {
        &self.sections[section as usize]
    }

    /// Sections with content, in display order
    pub fn non_empty(&self) -> impl Iterator<Item = (Section, &str)> {
        Section::ALL
            .into_iter()
            .map(|s| (s, self.get(s)))
            .filter(|(_, text)| !text.trim().is_empty())
    }
}

// ============================================================================
// Intermediate steps
// ============================================================================

/// Render agent steps for the "thinking process" view
pub fn render_steps(steps: &[Value]) -> String {
    if steps.is_empty() {
        return "No intermediate steps available.".to_string();
    }

    let mut out = String::new();
    for (i, step) in steps.iter().enumerate() {
        out.push_str(&format!("Step {}:\n", i + 1));
        match split_step(step) {
            Some((action, observation)) => {
                let tool = action.get("tool").map_or_else(|| "unknown".to_string(), value_text);
                let input = action.get("tool_input").map_or_else(String::new, value_text);
                out.push_str(&format!("- Action: {tool}\n"));
                out.push_str(&format!("- Input: `{input}`\n"));
                out.push_str(&format!("- Output: {}\n", truncate(&value_text(observation))));
            }
            None => out.push_str(&format!("- {}\n", truncate(&value_text(step)))),
        }
        out.push_str("---\n");
    }
    out
}

/// Steps arrive either as `[action, observation]` pairs or as
/// `{"action": ..., "observation": ...}` objects
fn split_step(step: &Value) -> Option<(&Value, &Value)> {
    match step {
        Value::Array(pair) if pair.len() == 2 && pair[0].is_object() => Some((&pair[0], &pair[1])),
        Value::Object(map) => Some((map.get("action")?, map.get("observation")?)),
        _ => None,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_OBSERVATION_CHARS {
        let head: String = text.chars().take(MAX_OBSERVATION_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

// ============================================================================
// Export
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Json,
}

impl ExportFormat {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "txt" | "text" => Some(ExportFormat::Text),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Text => "trip_plan.txt",
            ExportFormat::Json => "trip_plan.json",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode plan: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Serialize)]
struct ExportRecord<'a> {
    request: &'a str,
    trip_plan: &'a str,
    timestamp: String,
}

/// Plain-text export is the plan verbatim
pub fn export_text(trip_plan: &str) -> String {
    trip_plan.to_string()
}

/// `{request, trip_plan, timestamp}` with 2-space indentation
pub fn export_json(
    request: &str,
    trip_plan: &str,
    timestamp: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ExportRecord {
        request,
        trip_plan,
        timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

/// Write `entry` into `dir` as `trip_plan.txt` or `trip_plan.json`
pub fn write_export(
    dir: &Path,
    format: ExportFormat,
    entry: &HistoryEntry,
) -> Result<PathBuf, ExportError> {
    let contents = match format {
        ExportFormat::Text => export_text(&entry.trip_plan),
        ExportFormat::Json => export_json(&entry.request, &entry.trip_plan, entry.created_at)?,
    };

    let path = dir.join(format.file_name());
    std::fs::write(&path, contents).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), "Exported trip plan");
    Ok(path)
}
