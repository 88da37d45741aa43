/// Conversion of a frame into the NCHW float tensor the detector consumes.
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgb, RgbImage};

use crate::detection::domain::errors::DetectionError;
use crate::detection::domain::preprocess_config::PreprocessConfig;
use crate::shared::frame::Frame;

/// Resize, reorder planes, subtract means and scale.
///
/// Returns a `[1, 3, input_height, input_width]` tensor. The whole frame is
/// resized without cropping, so the aspect ratio is not preserved.
pub fn blob_from_frame(
    frame: &Frame,
    config: &PreprocessConfig,
) -> Result<ndarray::Array4<f32>, DetectionError> {
    if frame.is_empty() {
        return Err(DetectionError::MalformedImage(format!(
            "frame is {}x{}",
            frame.width(),
            frame.height()
        )));
    }
    if frame.channels() != 3 {
        return Err(DetectionError::MalformedImage(format!(
            "expected 3 channels, got {}",
            frame.channels()
        )));
    }
    if config.input_width == 0 || config.input_height == 0 {
        return Err(DetectionError::MalformedImage(
            "network input size must be non-zero".into(),
        ));
    }

    let resized = resize(frame, config.input_width, config.input_height)?;

    let w = config.input_width as usize;
    let h = config.input_height as usize;
    let planes = config.channel_order.source_indices();
    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, h, w));

    for (x, y, pixel) in resized.enumerate_pixels() {
        for (c, &src) in planes.iter().enumerate() {
            let value = (pixel[src] as f32 - config.mean[c]) * config.scale_factor;
            tensor[[0, c, y as usize, x as usize]] = value;
        }
    }

    Ok(tensor)
}

fn resize(frame: &Frame, width: u32, height: u32) -> Result<RgbImage, DetectionError> {
    let malformed =
        || DetectionError::MalformedImage("pixel buffer does not match dimensions".into());

    if (frame.width(), frame.height()) == (width, height) {
        return RgbImage::from_raw(width, height, frame.data().to_vec()).ok_or_else(malformed);
    }
    let view: ImageBuffer<Rgb<u8>, &[u8]> =
        ImageBuffer::from_raw(frame.width(), frame.height(), frame.data()).ok_or_else(malformed)?;
    Ok(imageops::resize(&view, width, height, FilterType::Triangle))
}
