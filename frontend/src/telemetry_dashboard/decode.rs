// frontend/src/telemetry_dashboard/decode.rs
//
// Feed frame -> ReadingTuple.
//
// transport.data layout:  [ _, reading_count, r1, r2, r3 ]
// The reading count comes from the header; the slice is clamped to what
// actually arrived and to DEVICE_SLOTS. The unclamped header count is kept
// on the tuple as the declared device count.

use super::types::{
    DecodeError, ReadingTuple, DEVICE_SLOTS, MIN_TRANSPORT_LEN, TRANSPORT_HEADER_LEN,
};
use lorawatch_shared::TTN_DATA_TYPE;
use serde_json::Value;

pub fn parse_feed(raw: &str) -> Result<Value, DecodeError> {
    serde_json::from_str(raw).map_err(|e| DecodeError::MalformedJson(e.to_string()))
}

pub fn decode(raw: &str) -> Result<ReadingTuple, DecodeError> {
    decode_value(&parse_feed(raw)?)
}

pub fn decode_value(msg: &Value) -> Result<ReadingTuple, DecodeError> {
    let ty = msg.get("type").and_then(Value::as_str);
    if ty != Some(TTN_DATA_TYPE) {
        return Err(DecodeError::UnknownMessageType(ty.map(str::to_owned)));
    }

    let data = msg
        .pointer("/payload/transport/data")
        .filter(|v| !v.is_null())
        .ok_or_else(|| shape("payload.transport.data missing"))?
        .as_array()
        .ok_or_else(|| shape("payload.transport.data is not an array"))?;

    if data.len() < MIN_TRANSPORT_LEN {
        return Err(shape(format!(
            "payload.transport.data has {} elements, need at least {MIN_TRANSPORT_LEN}",
            data.len()
        )));
    }

    let header = data[1]
        .as_f64()
        .ok_or_else(|| shape("reading count header is not a number"))?;
    let declared = declared_count(header);
    let count = declared
        .min(data.len() - TRANSPORT_HEADER_LEN)
        .min(DEVICE_SLOTS);

    let readings = data[TRANSPORT_HEADER_LEN..TRANSPORT_HEADER_LEN + count]
        .iter()
        .enumerate()
        .map(|(slot, v)| {
            v.as_f64()
                .ok_or_else(|| shape(format!("reading {} is not a number", slot + 1)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ReadingTuple::with_declared(readings, declared))
}

/// Header value as a device count: truncated toward zero, never negative.
fn declared_count(header: f64) -> usize {
    if !header.is_finite() || header <= 0.0 {
        return 0;
    }
    header.trunc() as usize
}

fn shape(reason: impl Into<String>) -> DecodeError {
    DecodeError::UnexpectedPayloadShape(reason.into())
}
