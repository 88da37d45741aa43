/// Decoding of the raw SSD detection tensor into pixel-space detections.
///
/// The detector emits `[1, 1, N, 7]`; each candidate row is
/// `[image_id, label, confidence, x_min, y_min, x_max, y_max]` with box
/// corners normalized to the input image.
use crate::detection::domain::detection::{Detection, DetectionResult};
use crate::detection::domain::errors::DetectionError;
use crate::shared::face_box::FaceBox;

/// Number of values per candidate row.
pub const SSD_FIELDS: usize = 7;

const CONFIDENCE: usize = 2;
const X_MIN: usize = 3;
const Y_MIN: usize = 4;
const X_MAX: usize = 5;
const Y_MAX: usize = 6;

/// What to do with boxes the network places partly outside the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoxClamping {
    /// Keep coordinates exactly as denormalized, even outside the image.
    #[default]
    Permissive,
    /// Clamp each coordinate to `[0, width]` / `[0, height]`.
    ClampToImage,
}

/// Scales a normalized coordinate by `extent` and truncates toward zero.
pub fn denormalize(coord: f32, extent: u32) -> i32 {
    (coord * extent as f32) as i32
}

/// Accepts only the single-image, single-class layout `[1, 1, N, 7]`.
pub fn check_output_shape(shape: &[usize]) -> Result<(), DetectionError> {
    match shape {
        [1, 1, _, SSD_FIELDS] => Ok(()),
        _ => Err(DetectionError::UnexpectedOutput(format!(
            "expected detections shaped [1, 1, N, {SSD_FIELDS}], got {shape:?}"
        ))),
    }
}

/// Keeps candidates scoring strictly above `threshold`, preserving the
/// network's ordering, and converts their boxes to pixels.
pub fn decode_detections(
    raw: &[f32],
    width: u32,
    height: u32,
    threshold: f32,
    clamping: BoxClamping,
) -> Result<DetectionResult, DetectionError> {
    if raw.len() % SSD_FIELDS != 0 {
        return Err(DetectionError::UnexpectedOutput(format!(
            "{} values is not a whole number of {SSD_FIELDS}-field rows",
            raw.len()
        )));
    }

    let result = raw
        .chunks_exact(SSD_FIELDS)
        .filter(|row| row[CONFIDENCE] > threshold)
        .map(|row| {
            let face_box = FaceBox::new(
                denormalize(row[X_MIN], width),
                denormalize(row[Y_MIN], height),
                denormalize(row[X_MAX], width),
                denormalize(row[Y_MAX], height),
            );
            let face_box = match clamping {
                BoxClamping::Permissive => face_box,
                BoxClamping::ClampToImage => face_box.clamped(width, height),
            };
            Detection {
                confidence: row[CONFIDENCE],
                face_box,
            }
        })
        .collect();

    Ok(result)
}
