use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::Parser;

use facebox_core::annotation::domain::annotation_style::AnnotationStyle;
use facebox_core::annotation::infrastructure::glyph_result_painter::GlyphResultPainter;
use facebox_core::detection::domain::face_detector::FaceDetector;
use facebox_core::detection::domain::preprocess_config::PreprocessConfig;
use facebox_core::detection::domain::ssd_decoder::BoxClamping;
use facebox_core::detection::infrastructure::model_files::ModelFiles;
use facebox_core::detection::infrastructure::onnx_ssd_detector::OnnxSsdDetector;
use facebox_core::io::infrastructure::image_file_reader::ImageFileReader;
use facebox_core::io::infrastructure::image_file_writer::ImageFileWriter;
use facebox_core::pipeline::annotate_image_use_case::AnnotateImageUseCase;
use facebox_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use facebox_core::shared::constants::{DEMO_THRESHOLD, IMAGE_EXTENSIONS};

/// Detect faces in an image and draw their bounding boxes.
#[derive(Parser)]
#[command(name = "facebox")]
struct Cli {
    /// Input image file.
    input: PathBuf,

    /// Where to write the annotated image (detections are only printed if omitted).
    output: Option<PathBuf>,

    /// Minimum confidence for a detection to be kept (exclusive).
    #[arg(long, default_value_t = DEMO_THRESHOLD)]
    threshold: f32,

    /// Network topology (ONNX graph). Defaults to models/face_detector/.
    #[arg(long)]
    topology: Option<PathBuf>,

    /// External weights file referenced by the topology, if any.
    #[arg(long)]
    weights: Option<PathBuf>,

    /// Clamp boxes to the image instead of keeping out-of-bounds coordinates.
    #[arg(long)]
    clamp_boxes: bool,

    /// Print detections as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let init_start = Instant::now();
    let detector = build_detector(&cli)?;
    let painter = GlyphResultPainter::new(AnnotationStyle::default())?;
    log::info!(
        "Detector ready in {:.3}s",
        init_start.elapsed().as_secs_f64()
    );

    let mut use_case = AnnotateImageUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(ImageFileWriter::new()),
        detector,
        Box::new(painter),
        Box::new(StdoutPipelineLogger::new()),
    );
    let result = use_case.execute(&cli.input, cli.output.as_deref(), cli.threshold)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for detection in &result {
            let b = detection.face_box;
            println!(
                "face {:.4} [{}, {}, {}, {}]",
                detection.confidence, b.x_min, b.y_min, b.x_max, b.y_max
            );
        }
        log::info!("Found {} face(s)", result.len());
    }
    Ok(())
}

fn build_detector(cli: &Cli) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    let mut model = match &cli.topology {
        Some(topology) => ModelFiles::new(topology),
        None => ModelFiles::default(),
    };
    if let Some(weights) = &cli.weights {
        model = model.with_weights(weights);
    }
    let clamping = if cli.clamp_boxes {
        BoxClamping::ClampToImage
    } else {
        BoxClamping::Permissive
    };

    log::info!("Loading model: {}", model.topology.display());
    let detector = OnnxSsdDetector::new(&model, PreprocessConfig::default(), clamping)?;
    Ok(Box::new(detector))
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if !cli.threshold.is_finite() {
        return Err(format!("Threshold must be a finite number, got {}", cli.threshold).into());
    }
    if let Some(output) = &cli.output {
        if !is_image(output) {
            return Err(format!(
                "Output must have an image extension ({}), got {}",
                IMAGE_EXTENSIONS.join(", "),
                output.display()
            )
            .into());
        }
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
