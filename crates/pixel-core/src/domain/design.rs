//! Design domain entity and write-boundary validation.
//!
//! A [`Design`] is a square grid of colored cells stored as a flat,
//! row-major sequence of color strings.  The invariant
//! `pixels.len() == grid_size * grid_size` is established exactly once, when
//! an untrusted [`DesignCandidate`] is validated into a [`DesignPayload`].
//! Nothing downstream re-checks it.
//!
//! # Validation order
//!
//! ```text
//! DesignCandidate (untyped JSON fields)
//!   1. gridSize is a JSON number        ┐
//!   2. pixels is an array of strings    ┘── else InvalidPayload
//!   3. pixels.len() == gridSize²         ─── else LengthMismatch
//!   4. gridSize is a whole number        ─── else InvalidPayload
//!   5. MIN_GRID_SIZE <= gridSize <= MAX  ─── else GridSizeOutOfRange
//!        ↓
//! DesignPayload ──into_design(updated_at)──► Design
//! ```
//!
//! The length check runs on the number exactly as sent, so a count that
//! does not match always yields the length message, even for `gridSize: 1.5`
//! (`2.25` items) or `gridSize: 257`.  Step 4 can only fail in the rare case
//! where a fractional size squares to the exact pixel count.
//!
//! Color strings are opaque: any string is accepted as a pixel value.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Side length of the design created at startup.
pub const DEFAULT_GRID_SIZE: u32 = 16;

/// Fill color of every cell in the startup design.
pub const EMPTY_COLOR: &str = "#000000";

/// Smallest accepted grid side length.
pub const MIN_GRID_SIZE: u32 = 1;

/// Largest accepted grid side length (65 536 cells).
pub const MAX_GRID_SIZE: u32 = 256;

/// Reasons an update payload is refused.
///
/// The `Display` text of each variant is exactly the `error` string returned
/// to HTTP clients, so the messages must stay stable.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DesignError {
    /// `gridSize` is missing or not a number, or `pixels` is missing or not an
    /// array of strings, or the body is not a JSON object at all.
    #[error("Invalid payload")]
    InvalidPayload,

    /// `gridSize` is a whole number outside `MIN_GRID_SIZE..=MAX_GRID_SIZE`.
    #[error("gridSize must be between {} and {}", MIN_GRID_SIZE, MAX_GRID_SIZE)]
    GridSizeOutOfRange { grid_size: i64 },

    /// `pixels` does not hold exactly `grid_size²` entries.  Both numbers
    /// are kept as sent, so they may be fractional, negative or infinite.
    #[error(
        "Pixels array must be {} items for gridSize {}",
        format_number(.expected),
        format_number(.grid_size)
    )]
    LengthMismatch { expected: f64, grid_size: f64 },
}

// ── Design ────────────────────────────────────────────────────────────────────

/// The single stored pixel-art design.
///
/// Serialized with camelCase keys:
///
/// ```json
/// {"gridSize":2,"pixels":["#fff","#000","#fff","#000"],"updatedAt":"2026-10-19T08:15:30.123Z"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    /// Side length of the square grid.
    pub grid_size: u32,
    /// Row-major cell colors; always `grid_size²` entries long.
    pub pixels: Vec<String>,
    /// Time of the last successful write, assigned by the server.
    #[serde(with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
}

impl Design {
    /// Builds a design of `grid_size × grid_size` cells all set to `color`.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::GridSizeOutOfRange`] if `grid_size` is outside
    /// `MIN_GRID_SIZE..=MAX_GRID_SIZE`.
    pub fn blank(grid_size: u32, color: &str, updated_at: DateTime<Utc>) -> Result<Self, DesignError> {
        check_grid_size(i64::from(grid_size))?;
        Ok(DesignPayload {
            grid_size,
            pixels: vec![color.to_string(); cell_count(grid_size)],
        }
        .into_design(updated_at))
    }

    /// Total number of cells in the grid.
    pub fn cell_count(&self) -> usize {
        cell_count(self.grid_size)
    }
}

impl Default for Design {
    /// The startup design: 16 × 16 cells of `#000000`, stamped now.
    fn default() -> Self {
        DesignPayload {
            grid_size: DEFAULT_GRID_SIZE,
            pixels: vec![EMPTY_COLOR.to_string(); cell_count(DEFAULT_GRID_SIZE)],
        }
        .into_design(Utc::now())
    }
}

// ── Validated payload ─────────────────────────────────────────────────────────

/// A grid that has passed validation but has not been stamped yet.
///
/// Also used by clients as the typed body of `POST /api/design`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignPayload {
    pub grid_size: u32,
    pub pixels: Vec<String>,
}

impl DesignPayload {
    /// Stamps the payload with `updated_at`, truncated to whole milliseconds
    /// so the stored value is identical to its wire form.
    pub fn into_design(self, updated_at: DateTime<Utc>) -> Design {
        Design {
            grid_size: self.grid_size,
            pixels: self.pixels,
            updated_at: updated_at.trunc_subsecs(3),
        }
    }

    /// Stamps the payload as a write that follows `previous`: the stamp is
    /// `now`, or `previous` if the clock reads earlier.
    pub fn into_design_after(self, now: DateTime<Utc>, previous: DateTime<Utc>) -> Design {
        self.into_design(now.max(previous))
    }
}

// ── Untrusted candidate ───────────────────────────────────────────────────────

/// An update request body exactly as the client sent it.
///
/// Both fields stay untyped until [`DesignCandidate::validate`] runs, so a
/// wrongly typed field produces [`DesignError::InvalidPayload`] instead of a
/// deserializer message.  Unknown fields, including a client-supplied
/// `updatedAt`, are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DesignCandidate {
    #[serde(rename = "gridSize", default)]
    pub grid_size: Option<Value>,
    #[serde(default)]
    pub pixels: Option<Value>,
}

impl DesignCandidate {
    /// Parses a raw request body.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::InvalidPayload`] if the body is not valid JSON or
    /// is not a JSON object.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, DesignError> {
        match serde_json::from_slice::<Value>(body) {
            // Only objects; serde would otherwise accept `[size, pixels]`
            // positionally.
            Ok(value @ Value::Object(_)) => {
                serde_json::from_value(value).map_err(|_| DesignError::InvalidPayload)
            }
            _ => Err(DesignError::InvalidPayload),
        }
    }

    /// Checks the candidate and converts it into a [`DesignPayload`].
    ///
    /// Checks run in order and stop at the first failure; see the module docs.
    ///
    /// # Errors
    ///
    /// - [`DesignError::InvalidPayload`] for a missing or wrongly typed field,
    ///   or a fractional grid size whose square matches the pixel count.
    /// - [`DesignError::LengthMismatch`] if `pixels` is not `gridSize²` long.
    /// - [`DesignError::GridSizeOutOfRange`] for a grid size outside the bounds.
    pub fn validate(self) -> Result<DesignPayload, DesignError> {
        let (grid_size, pixels) = match (
            self.grid_size.as_ref().and_then(Value::as_f64),
            self.pixels.and_then(string_array),
        ) {
            (Some(size), Some(pixels)) => (size, pixels),
            _ => return Err(DesignError::InvalidPayload),
        };

        let expected = grid_size * grid_size;
        if pixels.len() as f64 != expected {
            return Err(DesignError::LengthMismatch {
                expected,
                grid_size,
            });
        }

        let grid_size = whole_number(grid_size).ok_or(DesignError::InvalidPayload)?;
        let grid_size = check_grid_size(grid_size)?;

        Ok(DesignPayload { grid_size, pixels })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn cell_count(grid_size: u32) -> usize {
    let side = grid_size as usize;
    side * side
}

fn check_grid_size(grid_size: i64) -> Result<u32, DesignError> {
    u32::try_from(grid_size)
        .ok()
        .filter(|size| (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(size))
        .ok_or(DesignError::GridSizeOutOfRange { grid_size })
}

/// `2.0` counts as `2`; out-of-range magnitudes saturate.
fn whole_number(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}

/// Formats a number the way a browser would print it: `4` rather than `4.0`,
/// `Infinity`, and exponent notation outside `1e-6..1e21`.
fn format_number(value: &f64) -> String {
    let value = *value;
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else if value.abs() >= 1e21 {
        format!("{value:e}").replacen('e', "e+", 1)
    } else if value.abs() < 1e-6 {
        format!("{value:e}")
    } else {
        value.to_string()
    }
}

fn string_array(value: Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(color) => Some(color),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

/// `DateTime<Utc>` as an RFC 3339 string with millisecond precision and a
/// `Z` suffix, e.g. `2026-10-19T08:15:30.123Z`.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn candidate(body: Value) -> DesignCandidate {
        DesignCandidate::from_json_slice(body.to_string().as_bytes()).expect("object body")
    }

    fn colors(n: usize) -> Vec<String> {
        vec!["#fff".to_string(); n]
    }

    #[test]
    fn test_default_design_is_16_by_16_black() {
        // Arrange / Act
        let design = Design::default();

        // Assert
        assert_eq!(design.grid_size, 16);
        assert_eq!(design.pixels.len(), 256);
        assert!(design.pixels.iter().all(|p| p == "#000000"));
    }

    #[test]
    fn test_blank_fills_every_cell_with_color() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let design = Design::blank(3, "#abcdef", at).unwrap();
        assert_eq!(design.cell_count(), 9);
        assert_eq!(design.pixels, vec!["#abcdef".to_string(); 9]);
        assert_eq!(design.updated_at, at);
    }

    #[test]
    fn test_blank_rejects_zero_grid() {
        let result = Design::blank(0, EMPTY_COLOR, Utc::now());
        assert_eq!(result, Err(DesignError::GridSizeOutOfRange { grid_size: 0 }));
    }

    #[test]
    fn test_blank_rejects_oversized_grid() {
        let result = Design::blank(MAX_GRID_SIZE + 1, EMPTY_COLOR, Utc::now());
        assert!(matches!(result, Err(DesignError::GridSizeOutOfRange { .. })));
    }

    #[test]
    fn test_validate_accepts_matching_length() {
        // Arrange
        let body = json!({ "gridSize": 2, "pixels": ["#fff", "#000", "#fff", "#000"] });

        // Act
        let payload = candidate(body).validate().unwrap();

        // Assert
        assert_eq!(payload.grid_size, 2);
        assert_eq!(payload.pixels, vec!["#fff", "#000", "#fff", "#000"]);
    }

    #[test]
    fn test_validate_length_mismatch_names_expected_and_grid_size() {
        let body = json!({ "gridSize": 2, "pixels": ["#fff"] });
        let err = candidate(body).validate().unwrap_err();
        assert_eq!(
            err,
            DesignError::LengthMismatch {
                expected: 4.0,
                grid_size: 2.0
            }
        );
        assert_eq!(err.to_string(), "Pixels array must be 4 items for gridSize 2");
    }

    #[test]
    fn test_validate_string_grid_size_is_invalid_payload() {
        let body = json!({ "gridSize": "2", "pixels": [] });
        assert_eq!(candidate(body).validate(), Err(DesignError::InvalidPayload));
    }

    #[test]
    fn test_validate_missing_grid_size_is_invalid_payload() {
        let body = json!({ "pixels": colors(4) });
        assert_eq!(candidate(body).validate(), Err(DesignError::InvalidPayload));
    }

    #[test]
    fn test_validate_missing_pixels_is_invalid_payload() {
        let body = json!({ "gridSize": 2 });
        assert_eq!(candidate(body).validate(), Err(DesignError::InvalidPayload));
    }

    #[test]
    fn test_validate_object_pixels_is_invalid_payload() {
        let body = json!({ "gridSize": 1, "pixels": { "0": "#fff" } });
        assert_eq!(candidate(body).validate(), Err(DesignError::InvalidPayload));
    }

    #[test]
    fn test_validate_non_string_pixel_is_invalid_payload() {
        let body = json!({ "gridSize": 2, "pixels": ["#fff", 1, "#fff", "#000"] });
        assert_eq!(candidate(body).validate(), Err(DesignError::InvalidPayload));
    }

    #[test]
    fn test_validate_null_grid_size_is_invalid_payload() {
        let body = json!({ "gridSize": null, "pixels": [] });
        assert_eq!(candidate(body).validate(), Err(DesignError::InvalidPayload));
    }

    #[test]
    fn test_validate_fractional_grid_size_reports_fractional_length() {
        // Arrange
        let body = json!({ "gridSize": 1.5, "pixels": ["#fff"] });

        // Act
        let err = candidate(body).validate().unwrap_err();

        // Assert
        assert_eq!(
            err,
            DesignError::LengthMismatch {
                expected: 2.25,
                grid_size: 1.5
            }
        );
        assert_eq!(err.to_string(), "Pixels array must be 2.25 items for gridSize 1.5");
    }

    #[test]
    fn test_validate_oversized_grid_with_short_pixels_reports_length() {
        let body = json!({ "gridSize": 300, "pixels": [] });
        let err = candidate(body).validate().unwrap_err();
        assert_eq!(err.to_string(), "Pixels array must be 90000 items for gridSize 300");
    }

    #[test]
    fn test_validate_negative_grid_with_short_pixels_reports_length() {
        let body = json!({ "gridSize": -2, "pixels": [] });
        let err = candidate(body).validate().unwrap_err();
        assert_eq!(err.to_string(), "Pixels array must be 4 items for gridSize -2");
    }

    #[test]
    fn test_validate_oversized_grid_with_matching_pixels_is_out_of_range() {
        let body = json!({ "gridSize": 257, "pixels": colors(257 * 257) });
        assert_eq!(
            candidate(body).validate(),
            Err(DesignError::GridSizeOutOfRange { grid_size: 257 })
        );
    }

    #[test]
    fn test_format_number_matches_browser_output() {
        assert_eq!(format_number(&4.0), "4");
        assert_eq!(format_number(&-2.0), "-2");
        assert_eq!(format_number(&2.25), "2.25");
        assert_eq!(format_number(&-0.0), "0");
        assert_eq!(format_number(&f64::INFINITY), "Infinity");
        assert_eq!(format_number(&1e300), "1e+300");
        assert_eq!(format_number(&1e-7), "1e-7");
    }

    #[test]
    fn test_validate_whole_float_grid_size_is_accepted() {
        let body = json!({ "gridSize": 2.0, "pixels": colors(4) });
        assert_eq!(candidate(body).validate().unwrap().grid_size, 2);
    }

    #[test]
    fn test_validate_zero_grid_with_empty_pixels_is_out_of_range() {
        let body = json!({ "gridSize": 0, "pixels": [] });
        let err = candidate(body).validate().unwrap_err();
        assert_eq!(err, DesignError::GridSizeOutOfRange { grid_size: 0 });
        assert_eq!(err.to_string(), "gridSize must be between 1 and 256");
    }

    #[test]
    fn test_validate_negative_grid_is_out_of_range() {
        let body = json!({ "gridSize": -3, "pixels": colors(9) });
        assert_eq!(
            candidate(body).validate(),
            Err(DesignError::GridSizeOutOfRange { grid_size: -3 })
        );
    }

    #[test]
    fn test_validate_type_guard_runs_before_length_check() {
        // A wrongly typed gridSize wins over a wrong pixel count.
        let body = json!({ "gridSize": "3", "pixels": ["#fff"] });
        assert_eq!(candidate(body).validate(), Err(DesignError::InvalidPayload));
    }

    #[test]
    fn test_validate_accepts_any_color_string() {
        let body = json!({ "gridSize": 1, "pixels": ["not a color"] });
        assert_eq!(candidate(body).validate().unwrap().pixels, vec!["not a color"]);
    }

    #[test]
    fn test_validate_ignores_client_supplied_updated_at() {
        let body = json!({ "gridSize": 1, "pixels": ["#fff"], "updatedAt": "1999-01-01T00:00:00Z" });
        assert!(candidate(body).validate().is_ok());
    }

    #[test]
    fn test_from_json_slice_rejects_malformed_json() {
        let result = DesignCandidate::from_json_slice(b"{ gridSize: 2");
        assert_eq!(result, Err(DesignError::InvalidPayload));
    }

    #[test]
    fn test_from_json_slice_rejects_array_body() {
        let result = DesignCandidate::from_json_slice(br##"[1, ["#fff"]]"##);
        assert_eq!(result, Err(DesignError::InvalidPayload));
    }

    #[test]
    fn test_into_design_truncates_to_milliseconds() {
        let at = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let design = DesignPayload {
            grid_size: 1,
            pixels: colors(1),
        }
        .into_design(at);
        assert_eq!(design.updated_at.timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn test_design_serializes_with_camel_case_and_iso_millis() {
        // Arrange
        let at = Utc.timestamp_opt(1_700_000_000, 5_000_000).unwrap();
        let design = Design::blank(1, "#fff", at).unwrap();

        // Act
        let value = serde_json::to_value(&design).unwrap();

        // Assert
        assert_eq!(
            value,
            json!({ "gridSize": 1, "pixels": ["#fff"], "updatedAt": "2023-11-14T22:13:20.005Z" })
        );
    }

    #[test]
    fn test_design_deserializes_from_wire_form() {
        let raw = r##"{"gridSize":1,"pixels":["#123456"],"updatedAt":"2026-10-19T08:15:30.123Z"}"##;
        let design: Design = serde_json::from_str(raw).unwrap();
        assert_eq!(design.grid_size, 1);
        assert_eq!(design.updated_at.timestamp_subsec_millis(), 123);
    }
}
