// ── Provider payload normalization ──
//
// Bridges the raw provider envelope into the normalized tracking record:
// per-field null fallback, derived origin label, newest-first ordering.
// A missing or malformed payload normalizes to `None` -- "no data for
// this code" -- and is never an error.

use std::cmp::Ordering;

use rastro_api::types::{RawTrackingDocument, RawTrackingEvent, TrackEnvelope};

use crate::model::{NormalizedRecord, TrackingEvent};

// ── Helpers ────────────────────────────────────────────────────────

/// The provider sends `""` where it means "unknown"; fold that into
/// absence so downstream only ever sees `null`, never an empty string.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Extract the structured tracking document from the envelope payload.
///
/// Usually the payload is a JSON string; some responses arrive already
/// structured. Anything unparsable yields `None`.
fn parse_payload(envelope: &TrackEnvelope) -> Option<RawTrackingDocument> {
    match envelope.json.as_ref()? {
        serde_json::Value::Null => None,
        serde_json::Value::String(raw) => serde_json::from_str(raw).ok(),
        structured => serde_json::from_value(structured.clone()).ok(),
    }
}

/// Compose the origin label: `"<unitType>, <city> - <uf>"` when the
/// address is complete, just the unit type otherwise, nothing without
/// a unit type.
fn compose_from_text(
    unit_type: Option<&str>,
    city: Option<&str>,
    uf: Option<&str>,
) -> Option<String> {
    let unit_type = unit_type?;
    match (city, uf) {
        (Some(city), Some(uf)) => Some(format!("{unit_type}, {city} - {uf}")),
        _ => Some(unit_type.to_owned()),
    }
}

// ── Event ──────────────────────────────────────────────────────────

fn convert_event(event: RawTrackingEvent) -> TrackingEvent {
    let date = non_empty(event.dt_hr_criado.and_then(|ts| ts.date));
    let description = non_empty(event.descricao);

    let (unit_type, city, uf) = match event.unidade {
        Some(unit) => {
            let (city, uf) = match unit.endereco {
                Some(addr) => (non_empty(addr.cidade), non_empty(addr.uf)),
                None => (None, None),
            };
            (non_empty(unit.tipo), city, uf)
        }
        None => (None, None, None),
    };

    let from_text = compose_from_text(unit_type.as_deref(), city.as_deref(), uf.as_deref());

    TrackingEvent {
        date,
        description,
        unit_type,
        city,
        uf,
        from_text,
    }
}

/// Sort newest-first by ordinal string comparison. Undated events sink
/// to the end regardless of direction; the sort is stable, so ties keep
/// their provider order.
fn sort_events_desc(events: &mut [TrackingEvent]) {
    events.sort_by(|a, b| match (a.date.as_deref(), b.date.as_deref()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => b.cmp(a),
    });
}

// ── Record ─────────────────────────────────────────────────────────

/// Normalize a provider envelope into a tracking record.
///
/// Returns `None` when the payload field is absent or unparsable; the
/// caller reports that as a successful lookup with no data.
pub fn normalize_envelope(envelope: &TrackEnvelope) -> Option<NormalizedRecord> {
    let raw = parse_payload(envelope)?;

    let mut events: Vec<TrackingEvent> = raw.eventos.into_iter().map(convert_event).collect();
    sort_events_desc(&mut events);

    let last_update = events.first().and_then(|e| e.date.clone());

    Some(NormalizedRecord {
        code: non_empty(raw.cod_objeto),
        carrier: envelope.carrier.clone(),
        last_update,
        events,
    })
}
