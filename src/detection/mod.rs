pub mod circles;
pub mod classify;
pub mod contours;
pub mod preprocessing;
pub mod render;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::time::Instant;

use image::{DynamicImage, GrayImage, RgbImage};

use crate::codec;
use crate::error::{MeasureError, Result};
use crate::models::{Candidate, Category, Center, EnclosingCircle, MeasurementResult};
use crate::params::{MeasureParams, MeasureRequest};
use crate::pipeline::{DebugConfig, PipelineContext};
use render::{ContourPalette, IndexPalette, RandomPalette, Renderer};

/// How contour outlines are colored in the annotated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorPolicy {
    /// Derived from the contour index; identical input renders identically.
    #[default]
    ByIndex,
    /// Random colors from a fixed seed.
    Seeded(u64),
    /// Fresh random colors on every run.
    Random,
}

/// Typed outcome of a successful run, before encoding.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub diameter_mm: u32,
    pub category: Category,
    pub radius_pixels: u32,
    pub center: Center,
    pub circle: EnclosingCircle,
    pub candidates: Vec<Candidate>,
    pub annotated: RgbImage,
}

impl Measurement {
    /// Encode the annotated image and package the public result.
    pub fn into_result(self) -> Result<MeasurementResult> {
        let encoded = codec::encode_png(&self.annotated)?;
        Ok(MeasurementResult::success(
            self.diameter_mm,
            self.category,
            self.radius_pixels,
            self.center,
            encoded,
        ))
    }
}

/// Measures the largest round object in an image
#[derive(Debug, Clone, Default)]
pub struct MeasurementPipeline {
    pub params: MeasureParams,
    pub colors: ColorPolicy,
    context: PipelineContext,
}

impl MeasurementPipeline {
    pub fn new(params: MeasureParams) -> Self {
        Self {
            params,
            colors: ColorPolicy::default(),
            context: PipelineContext::default(),
        }
    }

    pub fn with_params(mut self, params: MeasureParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_colors(mut self, colors: ColorPolicy) -> Self {
        self.colors = colors;
        self
    }

    /// Dump every intermediate stage as a PNG into `debug`'s directory.
    pub fn with_debug(mut self, debug: DebugConfig) -> Self {
        self.context.debug = Some(debug);
        self
    }

    /// Run the full pipeline and fold every failure into the result.
    ///
    /// Panics inside the stages are caught and reported as internal errors.
    pub fn measure(&self, img: &DynamicImage) -> MeasurementResult {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.try_measure(img).and_then(Measurement::into_result)
        }));
        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                log::warn!("Measurement failed: {}", e);
                MeasurementResult::failure(&e)
            }
            Err(payload) => {
                let e = MeasureError::Internal(panic_message(payload.as_ref()));
                log::error!("Measurement aborted: {}", e);
                MeasurementResult::failure(&e)
            }
        }
    }

    /// Open an image file and measure it.
    pub fn measure_file(&self, path: impl AsRef<Path>) -> MeasurementResult {
        let path = path.as_ref();
        log::debug!("Loading image: {}", path.display());
        match codec::open_image(path) {
            Ok(img) => self.measure(&img),
            Err(e) => {
                log::warn!("Could not load {}: {}", path.display(), e);
                MeasurementResult::failure(&e)
            }
        }
    }

    /// Measure an inline `data:` URL image.
    pub fn measure_data_url(&self, data_url: &str) -> MeasurementResult {
        match codec::decode_data_url(data_url) {
            Ok(img) => self.measure(&img),
            Err(e) => {
                log::warn!("Could not decode inline image: {}", e);
                MeasurementResult::failure(&e)
            }
        }
    }

    /// Measure a request carrying its own loosely typed parameters.
    pub fn measure_request(&self, request: &MeasureRequest) -> MeasurementResult {
        match request.params() {
            Ok(params) => self
                .clone()
                .with_params(params)
                .measure_data_url(&request.image_data),
            Err(e) => MeasurementResult::failure(&e),
        }
    }

    /// Run the pipeline, returning typed errors.
    pub fn try_measure(&self, img: &DynamicImage) -> Result<Measurement> {
        self.params.validate()?;
        let (width, height) = (img.width(), img.height());
        if width == 0 || height == 0 {
            return Err(MeasureError::EmptyImage { width, height });
        }
        log::debug!("Measuring {}x{} image with {:?}", width, height, self.params);
        self.context.save_stage(0, "input", || img.clone());

        let started = Instant::now();
        let gray = preprocessing::to_grayscale(img);
        self.context
            .save_stage(1, "grayscale", || DynamicImage::ImageLuma8(gray.clone()));

        let blurred = preprocessing::apply_box_blur(&gray, self.params.blur as u32);
        self.context
            .save_stage(2, "blur", || DynamicImage::ImageLuma8(blurred.clone()));

        let edges = preprocessing::detect_edges(&blurred, self.params.threshold as u32);
        self.context
            .save_stage(3, "edges", || DynamicImage::ImageLuma8(edges.clone()));
        log::debug!("Preprocessing and edge detection took {:?}", started.elapsed());

        self.measure_edge_map(&edges)
    }

    /// Everything after edge detection: contours, circle fit, selection,
    /// classification and rendering.
    pub fn measure_edge_map(&self, edges: &GrayImage) -> Result<Measurement> {
        self.params.validate()?;
        let started = Instant::now();

        let found = contours::find_contours(edges);
        log::debug!("Found {} contours", found.len());

        let candidates = circles::fit_candidates(&found);
        let dominant = circles::select_dominant(&candidates)?;
        log::debug!(
            "Dominant circle: center=({:.1}, {:.1}) radius={:.2}",
            dominant.circle.center_x,
            dominant.circle.center_y,
            dominant.circle.radius
        );

        let radius_pixels = dominant.radius_pixels();
        let diameter_mm = classify::diameter_mm(radius_pixels, self.params.pixel_ratio);
        let category = classify::classify(diameter_mm);
        let label = render::label_text(category, diameter_mm);

        let annotated = match self.colors {
            ColorPolicy::ByIndex => {
                self.render(IndexPalette, edges, &candidates, dominant, &label)?
            }
            ColorPolicy::Seeded(seed) => {
                self.render(RandomPalette::seeded(seed), edges, &candidates, dominant, &label)?
            }
            ColorPolicy::Random => {
                self.render(RandomPalette::from_entropy(), edges, &candidates, dominant, &label)?
            }
        };
        self.context
            .save_stage(4, "annotated", || DynamicImage::ImageRgb8(annotated.clone()));

        log::info!(
            "{} (radius {} px, {} contours, {:?})",
            label,
            radius_pixels,
            candidates.len(),
            started.elapsed()
        );

        let circle = dominant.circle;
        Ok(Measurement {
            diameter_mm,
            category,
            radius_pixels,
            center: circle.center(),
            circle,
            candidates,
            annotated,
        })
    }

    fn render<P: ContourPalette>(
        &self,
        palette: P,
        edges: &GrayImage,
        candidates: &[Candidate],
        dominant: &Candidate,
        label: &str,
    ) -> Result<RgbImage> {
        let mut renderer = Renderer::new(palette)?;
        Ok(renderer.render(edges.dimensions(), candidates, dominant, label))
    }
}

/// Measure with the default color policy and no debug output.
pub fn measure(img: &DynamicImage, params: MeasureParams) -> MeasurementResult {
    MeasurementPipeline::new(params).measure(img)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected failure".to_string()
    }
}
