//! The export pipeline.
//!
//! Every export request goes through one decision table that picks a
//! [`Strategy`]:
//!
//! | format | frame, catalog glyph or logo | strategy |
//! |---|---|---|
//! | eps | any | `RemoteConvert` |
//! | pdf | any | `RasterCapture` |
//! | png, jpeg | yes | `RasterCapture` |
//! | svg | yes | `RasterCapture`, downgraded to png with a warning |
//! | png, jpeg, svg | no | `NativeExport` |
//!
//! Each export renders and composes its own snapshot from the request, so
//! exports never share canvas state with each other or with the live
//! session.

use core::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};

use crate::compose::{compose, Snapshot};
use crate::error::{ConfigError, ExportError};
use crate::frame::{FrameSelection, FrameWrapper};
use crate::matrix::ModuleMatrix;
use crate::native;
use crate::payload::ContentKind;
use crate::pdf;
use crate::raster;
use crate::remote::{EpsConverter, HttpEpsConverter};
use crate::render::render_scene;
use crate::scene::Scene;
use crate::settings::Settings;
use crate::style::ResolvedStyle;

/// Default directory artifacts are saved to.
pub const DEFAULT_OUTPUT_DIR: &str = "generated";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpeg,
    Svg,
    Pdf,
    Eps,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Svg => "svg",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Eps => "eps",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "jpg",
            other => other.as_str(),
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Eps => "application/postscript",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpeg" | "jpg" => Ok(ExportFormat::Jpeg),
            "svg" => Ok(ExportFormat::Svg),
            "pdf" => Ok(ExportFormat::Pdf),
            "eps" => Ok(ExportFormat::Eps),
            _ => Err(ConfigError::UnknownVariant {
                kind: "export format",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// The native engine writes the file directly. The only path that
    /// produces real SVG.
    NativeExport,
    /// The composed frame and art are rasterized and encoded.
    RasterCapture,
    /// A raster capture is handed to the EPS converter.
    RemoteConvert,
}

/// Recoverable problems reported alongside a successful export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportWarning {
    /// SVG was requested for a design only the raster path can draw.
    SvgDowngraded,
}

impl fmt::Display for ExportWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExportWarning::SvgDowngraded => f.write_str(
                "SVG export is not available with frames, custom patterns or logos; downloaded as PNG instead",
            ),
        }
    }
}

/// The output of the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub strategy: Strategy,
    /// The format actually produced.
    pub format: ExportFormat,
    pub warning: Option<ExportWarning>,
}

/// Picks the export strategy. Rules are checked in order: eps, pdf, then
/// whether anything the native engine cannot draw is present.
pub fn select_route(format: ExportFormat, frame_present: bool, custom_glyph: bool, logo_present: bool) -> Route {
    let route = |strategy, format, warning| Route {
        strategy,
        format,
        warning,
    };
    match format {
        ExportFormat::Eps => route(Strategy::RemoteConvert, ExportFormat::Eps, None),
        ExportFormat::Pdf => route(Strategy::RasterCapture, ExportFormat::Pdf, None),
        ExportFormat::Svg if frame_present || custom_glyph || logo_present => route(
            Strategy::RasterCapture,
            ExportFormat::Png,
            Some(ExportWarning::SvgDowngraded),
        ),
        _ if frame_present || custom_glyph || logo_present => route(Strategy::RasterCapture, format, None),
        _ => route(Strategy::NativeExport, format, None),
    }
}

/// One download action. Built fresh each time, never stored.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub format: ExportFormat,
    /// Side of the requested output in pixels.
    pub target_px: u32,
    pub frame: FrameSelection,
    /// Used for the default file name.
    pub kind: ContentKind,
    pub style: Arc<ResolvedStyle>,
    pub matrix: Arc<ModuleMatrix>,
}

/// How a request will be executed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportPlan {
    pub route: Route,
    /// Width of the composition before scaling, in pixels.
    pub composed_width: f64,
    /// Capture scale; `None` on the native path, which renders at the target
    /// size directly.
    pub scale: Option<f64>,
    /// Width of the raster actually produced.
    pub output_px: u32,
}

/// An exported file held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub strategy: Strategy,
    pub warning: Option<ExportWarning>,
    /// Suggested file name, `qr-<kind>[-framed].<ext>`.
    pub file_name: String,
}

impl Artifact {
    /// Writes the artifact and returns the path written.
    ///
    /// # Arguments
    ///
    /// * `directory` - Optional. Defaults to `generated`; created when missing.
    /// * `file_name` - Optional. Defaults to [`Artifact::file_name`].
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] if the file cannot be written. The data is
    /// written to a `.part` file first and renamed at the end, so a failure
    /// never leaves a partial file under the final name.
    pub fn save(&self, directory: Option<&Path>, file_name: Option<&str>) -> Result<PathBuf, ExportError> {
        let directory = directory.unwrap_or_else(|| Path::new(DEFAULT_OUTPUT_DIR));
        if !directory.exists() {
            fs::create_dir_all(directory)?;
        }
        let path = directory.join(file_name.unwrap_or(&self.file_name));
        let mut partial = path.clone().into_os_string();
        partial.push(".part");
        let partial = PathBuf::from(partial);
        let written = fs::write(&partial, &self.bytes).and_then(|()| fs::rename(&partial, &path));
        if let Err(e) = written {
            let _ = fs::remove_file(&partial);
            return Err(e.into());
        }
        log::info!("saved {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

/// Runs exports. Cheap to clone; clones share settings and converter.
#[derive(Debug, Clone)]
pub struct ExportPipeline {
    settings: Arc<Settings>,
    converter: Arc<dyn EpsConverter>,
}

impl ExportPipeline {
    /// A pipeline talking to the configured conversion endpoint.
    pub fn new(settings: Arc<Settings>) -> Self {
        let converter = HttpEpsConverter::new(settings.convert_endpoint.clone(), settings.convert_timeout());
        Self::with_converter(settings, Arc::new(converter))
    }

    pub fn with_converter(settings: Arc<Settings>, converter: Arc<dyn EpsConverter>) -> Self {
        Self { settings, converter }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Evaluates the decision table and the capture geometry for `req`.
    pub fn plan(&self, req: &ExportRequest) -> ExportPlan {
        let frame = req.frame.frame();
        let route = select_route(
            req.format,
            req.frame.is_present(),
            req.style.has_custom_glyph(),
            req.style.logo.is_some(),
        );
        let art_px = self.settings.preview_px as f64;
        let composed_width = frame.layout(art_px, &req.frame.props).width;
        let (scale, output_px) = match route.strategy {
            Strategy::NativeExport => (None, req.target_px),
            Strategy::RasterCapture => (Some(req.target_px as f64 / composed_width), req.target_px),
            Strategy::RemoteConvert => {
                let px = req.target_px.max(self.settings.eps_min_px);
                (Some(px as f64 / composed_width), px)
            }
        };
        log::debug!(
            "export {} at {}px: {:?} producing {} at {}px",
            req.format,
            req.target_px,
            route.strategy,
            route.format,
            output_px
        );
        ExportPlan {
            route,
            composed_width,
            scale,
            output_px,
        }
    }

    /// Runs `req` on the calling thread.
    ///
    /// Failures are confined to this call: nothing is written and no shared
    /// state is touched.
    pub fn export(&self, req: &ExportRequest) -> Result<Artifact, ExportError> {
        let plan = self.plan(req);
        if let Some(warning) = plan.route.warning {
            log::warn!("{}", warning);
        }
        match self.execute(req, &plan) {
            Ok(artifact) => {
                log::info!(
                    "exported {} {}x{} via {:?} ({} bytes)",
                    artifact.format,
                    artifact.width,
                    artifact.height,
                    artifact.strategy,
                    artifact.bytes.len()
                );
                Ok(artifact)
            }
            Err(e) => {
                log::error!("{} export failed: {}", req.format, e);
                Err(e)
            }
        }
    }

    /// Runs `req` on a background thread.
    pub fn spawn(&self, req: ExportRequest) -> Result<ExportJob, ExportError> {
        self.spawn_guarded(req, ())
    }

    /// Like [`spawn`](Self::spawn), holding `guard` until the export ends,
    /// whether it succeeds, fails or panics.
    pub fn spawn_guarded<G: Send + 'static>(&self, req: ExportRequest, guard: G) -> Result<ExportJob, ExportError> {
        let pipeline = self.clone();
        let handle = thread::Builder::new().name("qr-export".to_string()).spawn(move || {
            let _guard = guard;
            pipeline.export(&req)
        })?;
        Ok(ExportJob { handle })
    }

    fn execute(&self, req: &ExportRequest, plan: &ExportPlan) -> Result<Artifact, ExportError> {
        let scene = render_scene(&req.matrix, &req.style);
        let route = plan.route;
        let framed = req.frame.is_present();

        let (bytes, width, height) = match (route.strategy, plan.scale) {
            (Strategy::NativeExport, _) | (_, None) => {
                let px = plan.output_px;
                let bytes = match route.format {
                    ExportFormat::Svg => native::to_svg_string(&scene, px).into_bytes(),
                    format => {
                        let img = raster::rasterize(&scene.to_svg_document(px, false), px, px)?;
                        self.encode(&img, format)?
                    }
                };
                (bytes, px, px)
            }
            (strategy, Some(scale)) => {
                let snapshot = self.snapshot(req, &scene);
                let img = raster::capture(&snapshot, scale)?;
                let (w, h) = img.dimensions();
                let bytes = match (strategy, route.format) {
                    (Strategy::RemoteConvert, _) => self.converter.convert(&raster::encode_png(&img)?)?,
                    (_, ExportFormat::Pdf) => pdf::single_page(&img, req.target_px as f64)?,
                    (_, format) => self.encode(&img, format)?,
                };
                (bytes, w, h)
            }
        };

        let suffix = if framed && route.strategy != Strategy::NativeExport {
            "-framed"
        } else {
            ""
        };
        Ok(Artifact {
            format: route.format,
            bytes,
            width,
            height,
            strategy: route.strategy,
            warning: route.warning,
            file_name: format!("qr-{}{}.{}", req.kind, suffix, route.format.extension()),
        })
    }

    fn snapshot(&self, req: &ExportRequest, scene: &Scene) -> Snapshot {
        let frame = req.frame.frame();
        compose(
            scene,
            self.settings.preview_px as f64,
            &frame,
            &req.frame.props,
            req.style.logo.as_ref(),
            req.style.plate_color(),
        )
    }

    fn encode(&self, img: &image::RgbaImage, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        match format {
            ExportFormat::Jpeg => raster::encode_jpeg(img, self.settings.jpeg_quality),
            _ => raster::encode_png(img),
        }
    }
}

/// An export running on its own thread.
#[derive(Debug)]
pub struct ExportJob {
    handle: JoinHandle<Result<Artifact, ExportError>>,
}

impl ExportJob {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Blocks until the export ends.
    pub fn wait(self) -> Result<Artifact, ExportError> {
        self.handle.join().map_err(|_| ExportError::WorkerPanicked)?
    }
}
