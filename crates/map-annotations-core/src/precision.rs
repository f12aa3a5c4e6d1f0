//! Coordinate precision helpers.
//!
//! Drawing tools write coordinates with arbitrary float noise (`10.000000001`),
//! so every value read from a document is snapped to three decimals when it is
//! extracted. The serde helpers write values as they are, so projected world
//! coordinates keep their full precision. They only keep the JSON form
//! compact (whole numbers without `.0`) and refuse non-finite values.

use serde::{Deserialize, Deserializer, Serializer};

/// Number of decimals kept for every extracted coordinate.
pub const COORD_DECIMALS: i32 = 3;

/// Round to [`COORD_DECIMALS`] places, normalizing `-0.0` to `0.0`.
pub fn round3(v: f64) -> f64 {
    let scale = 10f64.powi(COORD_DECIMALS);
    let rounded = (v * scale).round() / scale;
    if rounded == 0.0 { 0.0 } else { rounded }
}

pub fn ser_f64_compact<S>(v: &f64, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if !v.is_finite() {
        return Err(serde::ser::Error::custom(format!(
            "non-finite coordinate not allowed in JSON: {v}"
        )));
    }

    // Whole pixel values are the common case; keep them as JSON integers.
    if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v <= i64::MAX as f64 {
        return s.serialize_i64(*v as i64);
    }

    s.serialize_f64(*v)
}

pub fn de_f64<'de, D>(d: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = f64::deserialize(d)?;
    if !v.is_finite() {
        return Err(serde::de::Error::custom(format!(
            "non-finite coordinate not allowed in JSON: {v}"
        )));
    }
    Ok(v)
}
