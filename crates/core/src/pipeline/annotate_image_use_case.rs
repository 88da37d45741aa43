use std::path::Path;
use std::time::Instant;

use crate::annotation::domain::result_painter::ResultPainter;
use crate::detection::domain::detection::DetectionResult;
use crate::detection::domain::face_detector::FaceDetector;
use crate::io::domain::image_reader::ImageReader;
use crate::io::domain::image_writer::ImageWriter;
use crate::pipeline::pipeline_logger::PipelineLogger;

/// Single-image pipeline: read → detect → draw → write.
pub struct AnnotateImageUseCase {
    reader: Box<dyn ImageReader>,
    image_writer: Box<dyn ImageWriter>,
    detector: Box<dyn FaceDetector>,
    painter: Box<dyn ResultPainter>,
    logger: Box<dyn PipelineLogger>,
}

impl AnnotateImageUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        image_writer: Box<dyn ImageWriter>,
        detector: Box<dyn FaceDetector>,
        painter: Box<dyn ResultPainter>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            reader,
            image_writer,
            detector,
            painter,
            logger,
        }
    }

    /// Detects faces in `input_path` and, when `output_path` is given,
    /// writes the annotated image there. Returns the detections.
    pub fn execute(
        &mut self,
        input_path: &Path,
        output_path: Option<&Path>,
        threshold: f32,
    ) -> Result<DetectionResult, Box<dyn std::error::Error>> {
        let mut frame = self.reader.read(input_path)?;

        let start = Instant::now();
        let result = self.detector.detect(&frame, threshold)?;
        self.logger.timing("detect", elapsed_ms(start));
        self.logger.metric("faces", result.len() as f64);

        if let Some(output_path) = output_path {
            let start = Instant::now();
            self.painter.draw_results(&mut frame, &result)?;
            self.logger.timing("draw", elapsed_ms(start));

            self.image_writer.write(output_path, &frame)?;
            self.logger
                .info(&format!("Annotated image written to {}", output_path.display()));
        }

        self.logger.summary();
        Ok(result)
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
