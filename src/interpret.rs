//! Detection response interpretation.
//!
//! The face-detection collaborator answers with a variant-shaped payload: a
//! bare string carrying an error message, or a nested structure whose regions
//! live under `outputs[0].data.regions` or under `data.regions` depending on
//! which API path produced it. This module normalizes that payload into
//! either a pixel-space [`FaceBox`] or an explicit no-face outcome.
//!
//! Interpretation never fails: every malformed shape, missing field, or
//! unusable number maps to a [`NoFaceReason`], and nothing panics past this
//! boundary.

use serde::Deserialize;
use serde_json::Value;

/// Marker substring the upstream service embeds in error-shaped string
/// responses.
pub const UPSTREAM_ERROR_MARKER: &str = "unable to work with API";

/// Rendered pixel size of the displayed image at the moment of
/// interpretation.
///
/// Construction rejects non-positive or non-finite values, so a held value
/// is always usable for scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayDimensions {
    width: f64,
    height: f64,
}

impl DisplayDimensions {
    /// Returns `None` unless both dimensions are finite and positive.
    pub fn new(width: f64, height: f64) -> Option<Self> {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Some(Self { width, height })
        } else {
            None
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

/// The four fractional edge values carried by a region's
/// `region_info.bounding_box` record. Each is a fraction of image
/// height/width measured from the respective edge.
#[derive(Clone, Copy, Debug, Deserialize)]
struct BoundingBoxFractions {
    top_row: f64,
    left_col: f64,
    bottom_row: f64,
    right_col: f64,
}

impl BoundingBoxFractions {
    /// Scale fractions to pixel edge-inset offsets.
    ///
    /// `right_col` and `bottom_row` become insets from the far edges, so the
    /// result positions an overlay via `left/top/right/bottom` offsets rather
    /// than origin + size.
    fn scale(&self, dims: DisplayDimensions) -> Option<FaceBox> {
        let face_box = FaceBox {
            left_col: self.left_col * dims.width,
            top_row: self.top_row * dims.height,
            right_col: dims.width - self.right_col * dims.width,
            bottom_row: dims.height - self.bottom_row * dims.height,
        };
        if face_box.is_finite() {
            Some(face_box)
        } else {
            None
        }
    }
}

/// A detected face as pixel offsets from each edge of the displayed image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceBox {
    pub left_col: f64,
    pub top_row: f64,
    pub right_col: f64,
    pub bottom_row: f64,
}

impl FaceBox {
    fn is_finite(&self) -> bool {
        self.left_col.is_finite()
            && self.top_row.is_finite()
            && self.right_col.is_finite()
            && self.bottom_row.is_finite()
    }
}

/// Why no box was produced.
///
/// The overlay treats all of these the same (no box drawn); the distinction
/// exists so callers can word user messaging per kind.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoFaceReason {
    /// The response was an error-shaped string from the upstream service.
    UpstreamError,
    /// Well-shaped response with zero usable regions.
    NoRegions,
    /// The response did not match any known shape, or carried unusable
    /// numeric fields.
    MalformedResponse,
    /// The displayed image's size was unavailable, so fractions could not be
    /// scaled.
    MissingDimensions,
}

/// Outcome of interpreting one detection response.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Interpretation {
    Face(FaceBox),
    NoFace(NoFaceReason),
}

impl Interpretation {
    /// Collapse to the box-or-nothing view of the outcome.
    pub fn face_box(&self) -> Option<FaceBox> {
        match self {
            Interpretation::Face(face_box) => Some(*face_box),
            Interpretation::NoFace(_) => None,
        }
    }
}

/// Extraction strategies tried in order; the first one yielding a non-empty
/// region list wins.
const REGION_EXTRACTORS: [fn(&Value) -> Option<&Vec<Value>>; 2] =
    [outputs_regions, data_regions];

fn outputs_regions(response: &Value) -> Option<&Vec<Value>> {
    response
        .get("outputs")?
        .get(0)?
        .get("data")?
        .get("regions")?
        .as_array()
}

fn data_regions(response: &Value) -> Option<&Vec<Value>> {
    response.get("data")?.get("regions")?.as_array()
}

fn first_region(response: &Value) -> Option<&Value> {
    REGION_EXTRACTORS
        .iter()
        .filter_map(|extract| extract(response))
        .find(|regions| !regions.is_empty())
        .and_then(|regions| regions.first())
}

/// Interpret a raw detection response against the current display size.
///
/// Pure and total: identical inputs always produce identical outcomes, and
/// every failure kind is absorbed into [`Interpretation::NoFace`].
pub fn interpret(response: &Value, dims: Option<DisplayDimensions>) -> Interpretation {
    if let Value::String(text) = response {
        let reason = if text.contains(UPSTREAM_ERROR_MARKER) {
            NoFaceReason::UpstreamError
        } else {
            NoFaceReason::MalformedResponse
        };
        return Interpretation::NoFace(reason);
    }

    let Some(region) = first_region(response) else {
        // A structured response with no regions is a valid "nothing found";
        // anything else never matched a known shape at all.
        let reason = if response.is_object() || response.is_array() {
            NoFaceReason::NoRegions
        } else {
            NoFaceReason::MalformedResponse
        };
        return Interpretation::NoFace(reason);
    };

    let Some(dims) = dims else {
        return Interpretation::NoFace(NoFaceReason::MissingDimensions);
    };

    match face_box_from_region(region, dims) {
        Some(face_box) => Interpretation::Face(face_box),
        None => Interpretation::NoFace(NoFaceReason::MalformedResponse),
    }
}

fn face_box_from_region(region: &Value, dims: DisplayDimensions) -> Option<FaceBox> {
    let bounding_box = region.get("region_info")?.get("bounding_box")?;
    let fractions: BoundingBoxFractions = serde_json::from_value(bounding_box.clone()).ok()?;
    fractions.scale(dims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dims(width: f64, height: f64) -> Option<DisplayDimensions> {
        DisplayDimensions::new(width, height)
    }

    fn outputs_shaped(top: f64, left: f64, bottom: f64, right: f64) -> Value {
        json!({
            "outputs": [{
                "data": {
                    "regions": [{
                        "region_info": {
                            "bounding_box": {
                                "top_row": top,
                                "left_col": left,
                                "bottom_row": bottom,
                                "right_col": right
                            }
                        }
                    }]
                }
            }]
        })
    }

    fn data_shaped(top: f64, left: f64, bottom: f64, right: f64) -> Value {
        json!({
            "data": {
                "regions": [{
                    "region_info": {
                        "bounding_box": {
                            "top_row": top,
                            "left_col": left,
                            "bottom_row": bottom,
                            "right_col": right
                        }
                    }
                }]
            }
        })
    }

    #[test]
    fn scales_fractions_to_edge_insets() {
        let response = outputs_shaped(0.1, 0.2, 0.1, 0.1);
        let result = interpret(&response, dims(400.0, 300.0));
        assert_eq!(
            result,
            Interpretation::Face(FaceBox {
                left_col: 80.0,
                top_row: 30.0,
                right_col: 360.0,
                bottom_row: 270.0,
            })
        );
    }

    #[test]
    fn alternate_shape_produces_identical_box() {
        let a = interpret(&outputs_shaped(0.25, 0.5, 0.75, 0.125), dims(640.0, 480.0));
        let b = interpret(&data_shaped(0.25, 0.5, 0.75, 0.125), dims(640.0, 480.0));
        assert_eq!(a, b);
        assert!(a.face_box().is_some());
    }

    #[test]
    fn outputs_path_wins_over_data_path() {
        let mut response = outputs_shaped(0.1, 0.1, 0.9, 0.9);
        response["data"] = data_shaped(0.5, 0.5, 0.5, 0.5)["data"].clone();
        let result = interpret(&response, dims(100.0, 100.0));
        assert_eq!(
            result.face_box().map(|b| b.left_col),
            Some(10.0),
            "outputs[0].data.regions must be tried before data.regions"
        );
    }

    #[test]
    fn empty_regions_is_no_face() {
        let empty_outputs = json!({"outputs": [{"data": {"regions": []}}]});
        let empty_data = json!({"data": {"regions": []}});
        for response in [empty_outputs, empty_data] {
            assert_eq!(
                interpret(&response, dims(400.0, 300.0)),
                Interpretation::NoFace(NoFaceReason::NoRegions)
            );
        }
    }

    #[test]
    fn empty_outputs_regions_falls_through_to_data_regions() {
        let mut response = json!({"outputs": [{"data": {"regions": []}}]});
        response["data"] = data_shaped(0.1, 0.1, 0.1, 0.1)["data"].clone();
        let result = interpret(&response, dims(200.0, 200.0));
        assert!(result.face_box().is_some());
    }

    #[test]
    fn error_marker_string_is_upstream_error() {
        let response = Value::String("unable to work with API".to_string());
        assert_eq!(
            interpret(&response, dims(400.0, 300.0)),
            Interpretation::NoFace(NoFaceReason::UpstreamError)
        );
        // Regardless of display size.
        assert_eq!(
            interpret(&response, None),
            Interpretation::NoFace(NoFaceReason::UpstreamError)
        );
    }

    #[test]
    fn other_string_is_malformed() {
        let response = Value::String("totally unexpected".to_string());
        assert_eq!(
            interpret(&response, dims(400.0, 300.0)),
            Interpretation::NoFace(NoFaceReason::MalformedResponse)
        );
    }

    #[test]
    fn missing_dimensions_is_reported() {
        let response = outputs_shaped(0.1, 0.2, 0.1, 0.1);
        assert_eq!(
            interpret(&response, None),
            Interpretation::NoFace(NoFaceReason::MissingDimensions)
        );
    }

    #[test]
    fn non_positive_dimensions_are_rejected_at_construction() {
        assert!(DisplayDimensions::new(0.0, 300.0).is_none());
        assert!(DisplayDimensions::new(400.0, -1.0).is_none());
        assert!(DisplayDimensions::new(f64::NAN, 300.0).is_none());
    }

    #[test]
    fn missing_bounding_box_fields_are_malformed() {
        let response = json!({
            "outputs": [{
                "data": {
                    "regions": [{
                        "region_info": {
                            "bounding_box": {"top_row": 0.1, "left_col": 0.2}
                        }
                    }]
                }
            }]
        });
        assert_eq!(
            interpret(&response, dims(400.0, 300.0)),
            Interpretation::NoFace(NoFaceReason::MalformedResponse)
        );
    }

    #[test]
    fn non_numeric_fraction_is_malformed() {
        let response = json!({
            "data": {
                "regions": [{
                    "region_info": {
                        "bounding_box": {
                            "top_row": "0.1",
                            "left_col": 0.2,
                            "bottom_row": 0.1,
                            "right_col": 0.1
                        }
                    }
                }]
            }
        });
        assert_eq!(
            interpret(&response, dims(400.0, 300.0)),
            Interpretation::NoFace(NoFaceReason::MalformedResponse)
        );
    }

    #[test]
    fn null_and_scalar_responses_are_malformed() {
        for response in [Value::Null, json!(42), json!(true)] {
            assert_eq!(
                interpret(&response, dims(400.0, 300.0)),
                Interpretation::NoFace(NoFaceReason::MalformedResponse)
            );
        }
    }

    #[test]
    fn interpretation_is_idempotent() {
        let response = outputs_shaped(0.3, 0.4, 0.2, 0.1);
        let first = interpret(&response, dims(512.0, 256.0));
        let second = interpret(&response, dims(512.0, 256.0));
        assert_eq!(first, second);
    }
}
