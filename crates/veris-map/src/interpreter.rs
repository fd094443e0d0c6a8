use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::debug;

use veris_models::filter::{FilterPatch, FilterState, Viewport};
use veris_models::property::ReraStatus;

use crate::error::CommandError;
use crate::filter_store::FilterStore;

const VIEWPORT_KEYS: [&str; 3] = ["center_lat", "center_lng", "zoom"];
const CONTENT_KEYS: [&str; 9] = [
    "locality",
    "property_type",
    "min_price",
    "max_price",
    "bedrooms",
    "min_score",
    "litigation",
    "rera_status",
    "ids",
];

/// A validated map command. Construction via [`Command::from_value`] is
/// the only path, so holding a `Command` means the payload already
/// passed every check and applying it cannot fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Reset,
    Filter(FilterPatch),
    FilterAndFly(FilterPatch),
}

impl Command {
    /// Decode a command from its wire shape
    /// `{"type": "...", "payload": {...}}`.
    pub fn from_value(value: &Value) -> Result<Command, CommandError> {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| CommandError::InvalidPayload("missing command type".to_string()))?;

        match tag {
            "RESET" => Ok(Command::Reset),
            "FILTER" => {
                let payload = payload_object(value)?;
                if VIEWPORT_KEYS.iter().any(|key| payload.contains_key(*key)) {
                    debug!("FILTER payload carries viewport keys; ignoring them");
                }
                let patch = parse_patch(payload)?;
                if !patch.has_content() {
                    return Err(CommandError::EmptyPayload);
                }
                Ok(Command::Filter(patch))
            }
            "FILTER_AND_FLY" => {
                let payload = payload_object(value)?;
                let viewport = parse_viewport(payload)?.ok_or(CommandError::MissingViewport)?;
                let mut patch = parse_patch(payload)?;
                if !patch.has_content() {
                    return Err(CommandError::EmptyPayload);
                }
                patch.viewport = Some(viewport);
                Ok(Command::FilterAndFly(patch))
            }
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }
}

/// Decode and apply a raw command value. Any rejection leaves the store
/// untouched; mutation only happens after full validation.
pub fn apply(raw: &Value, store: &mut FilterStore) -> Result<FilterState, CommandError> {
    let command = Command::from_value(raw)?;
    Ok(apply_command(command, store))
}

/// Apply an already-validated command.
pub fn apply_command(command: Command, store: &mut FilterStore) -> FilterState {
    match command {
        Command::Reset => store.reset(),
        Command::Filter(patch) | Command::FilterAndFly(patch) => store.merge(&patch),
    }
}

fn payload_object(value: &Value) -> Result<&Map<String, Value>, CommandError> {
    match value.get("payload") {
        None | Some(Value::Null) => Err(CommandError::EmptyPayload),
        Some(Value::Object(map)) if map.is_empty() => Err(CommandError::EmptyPayload),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(CommandError::InvalidPayload(format!(
            "payload must be an object, got {other}"
        ))),
    }
}

/// Build a patch from payload key *presence*: an absent key leaves the
/// field alone, an explicit `null` clears it, and any other value must
/// parse at the field's type. `{"bedrooms": 0}` sets bedrooms to zero.
fn parse_patch(payload: &Map<String, Value>) -> Result<FilterPatch, CommandError> {
    for key in payload.keys() {
        if !CONTENT_KEYS.contains(&key.as_str()) && !VIEWPORT_KEYS.contains(&key.as_str()) {
            debug!(key, "unknown filter key in payload; ignoring");
        }
    }

    Ok(FilterPatch {
        locality: string_field(payload, "locality")?,
        property_type: string_field(payload, "property_type")?,
        min_price: u64_field(payload, "min_price")?,
        max_price: u64_field(payload, "max_price")?,
        bedrooms: u32_field(payload, "bedrooms")?,
        min_score: decimal_field(payload, "min_score")?,
        litigation: u32_field(payload, "litigation")?,
        rera_status: rera_field(payload, "rera_status")?,
        ids: ids_field(payload)?,
        viewport: None,
    })
}

/// Read the viewport triple, if any. All-absent is fine (`Ok(None)`);
/// a partial or non-numeric triple is a hard error because flying to
/// half a viewport has no meaning.
fn parse_viewport(payload: &Map<String, Value>) -> Result<Option<Viewport>, CommandError> {
    let present = VIEWPORT_KEYS
        .iter()
        .filter(|key| payload.contains_key(**key))
        .count();
    if present == 0 {
        return Ok(None);
    }
    if present < VIEWPORT_KEYS.len() {
        return Err(CommandError::MissingViewport);
    }

    let number = |key: &str| -> Result<f64, CommandError> {
        payload
            .get(key)
            .and_then(Value::as_f64)
            .ok_or_else(|| CommandError::InvalidPayload(format!("{key} must be a number")))
    };

    Ok(Some(Viewport {
        center_lat: number("center_lat")?,
        center_lng: number("center_lng")?,
        zoom: number("zoom")?,
    }))
}

fn string_field(
    payload: &Map<String, Value>,
    key: &str,
) -> Result<Option<Option<String>>, CommandError> {
    match payload.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(s)) => Ok(Some(Some(s.clone()))),
        Some(other) => Err(CommandError::InvalidPayload(format!(
            "{key} must be a string, got {other}"
        ))),
    }
}

fn u64_field(
    payload: &Map<String, Value>,
    key: &str,
) -> Result<Option<Option<u64>>, CommandError> {
    match payload.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(value) => {
            let n = value.as_u64().ok_or_else(|| {
                CommandError::InvalidPayload(format!(
                    "{key} must be a non-negative integer, got {value}"
                ))
            })?;
            Ok(Some(Some(n)))
        }
    }
}

fn u32_field(
    payload: &Map<String, Value>,
    key: &str,
) -> Result<Option<Option<u32>>, CommandError> {
    match u64_field(payload, key)? {
        Some(Some(n)) => {
            let n = u32::try_from(n).map_err(|_| {
                CommandError::InvalidPayload(format!("{key} out of range: {n}"))
            })?;
            Ok(Some(Some(n)))
        }
        other => Ok(other.map(|_| None)),
    }
}

fn decimal_field(
    payload: &Map<String, Value>,
    key: &str,
) -> Result<Option<Option<Decimal>>, CommandError> {
    match payload.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(value) => {
            let n: Decimal = serde_json::from_value(value.clone()).map_err(|e| {
                CommandError::InvalidPayload(format!("{key} must be a number: {e}"))
            })?;
            Ok(Some(Some(n)))
        }
    }
}

fn rera_field(
    payload: &Map<String, Value>,
    key: &str,
) -> Result<Option<Option<ReraStatus>>, CommandError> {
    match payload.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(value) => {
            let status: ReraStatus = serde_json::from_value(value.clone()).map_err(|e| {
                CommandError::InvalidPayload(format!("{key} must be a RERA status string: {e}"))
            })?;
            Ok(Some(Some(status)))
        }
    }
}

fn ids_field(payload: &Map<String, Value>) -> Result<Option<Option<Vec<String>>>, CommandError> {
    match payload.get("ids") {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::Array(items)) => {
            let ids = items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        CommandError::InvalidPayload(format!(
                            "ids entries must be strings, got {item}"
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(Some(ids)))
        }
        Some(other) => Err(CommandError::InvalidPayload(format!(
            "ids must be an array of strings, got {other}"
        ))),
    }
}
