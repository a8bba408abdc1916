//! Live editing state.
//!
//! A [`QrSession`] holds the current payload and style together with
//! everything derived from them. Derived values are recomputed eagerly on
//! every change; the matrix is only re-encoded when the payload or the
//! error correction level actually changed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::catalog::PatternCatalog;
use crate::error::{ExportError, MatrixError};
use crate::export::{Artifact, ExportFormat, ExportJob, ExportPipeline, ExportRequest};
use crate::frame::FrameSelection;
use crate::matrix::{EcLevel, MatrixSource, ModuleMatrix, QrEncoder};
use crate::payload::ContentKind;
use crate::render::render_scene;
use crate::scene::Scene;
use crate::style::{ResolvedStyle, StyleConfig};

/// Clears the busy flag when dropped.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct QrSession<S: MatrixSource = QrEncoder> {
    source: S,
    catalog: Arc<PatternCatalog>,
    pipeline: ExportPipeline,
    payload: String,
    kind: ContentKind,
    style: Arc<StyleConfig>,
    resolved: Arc<ResolvedStyle>,
    matrix: Arc<ModuleMatrix>,
    scene: Arc<Scene>,
    busy: Arc<AtomicBool>,
}

impl<S: MatrixSource> QrSession<S> {
    /// Encodes and renders the initial state.
    ///
    /// # Errors
    ///
    /// Returns the encoder's error when `payload` cannot be encoded.
    pub fn new(
        source: S,
        pipeline: ExportPipeline,
        catalog: PatternCatalog,
        payload: impl Into<String>,
        kind: ContentKind,
        style: StyleConfig,
    ) -> Result<Self, MatrixError> {
        let payload = payload.into();
        let catalog = Arc::new(catalog);
        let resolved = ResolvedStyle::resolve(&style, &catalog, pipeline.settings().logo_max_bytes);
        let level = level_for(&style, &resolved, kind);
        let matrix = source.encode(&payload, level)?;
        let scene = render_scene(&matrix, &resolved);
        Ok(Self {
            source,
            catalog,
            pipeline,
            payload,
            kind,
            style: Arc::new(style),
            resolved: Arc::new(resolved),
            matrix: Arc::new(matrix),
            scene: Arc::new(scene),
            busy: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Replaces the style.
    ///
    /// On error the session keeps its previous state.
    pub fn set_style(&mut self, style: StyleConfig) -> Result<(), MatrixError> {
        let payload = self.payload.clone();
        self.update(payload, self.kind, style)
    }

    /// Replaces the payload and its content kind.
    pub fn set_payload(&mut self, payload: impl Into<String>, kind: ContentKind) -> Result<(), MatrixError> {
        let style = StyleConfig::clone(&self.style);
        self.update(payload.into(), kind, style)
    }

    fn update(&mut self, payload: String, kind: ContentKind, style: StyleConfig) -> Result<(), MatrixError> {
        let resolved = ResolvedStyle::resolve(&style, &self.catalog, self.pipeline.settings().logo_max_bytes);
        let level = level_for(&style, &resolved, kind);
        let matrix = if payload != self.payload || level != self.matrix.level() {
            log::debug!("re-encoding payload at level {}", level);
            Arc::new(self.source.encode(&payload, level)?)
        } else {
            Arc::clone(&self.matrix)
        };
        self.scene = Arc::new(render_scene(&matrix, &resolved));
        self.matrix = matrix;
        self.resolved = Arc::new(resolved);
        self.style = Arc::new(style);
        self.payload = payload;
        self.kind = kind;
        Ok(())
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn style(&self) -> &Arc<StyleConfig> {
        &self.style
    }

    pub fn resolved(&self) -> &Arc<ResolvedStyle> {
        &self.resolved
    }

    pub fn matrix(&self) -> &Arc<ModuleMatrix> {
        &self.matrix
    }

    pub fn scene(&self) -> &Arc<Scene> {
        &self.scene
    }

    pub fn level(&self) -> EcLevel {
        self.matrix.level()
    }

    /// Problems recovered from while resolving the current style.
    pub fn warnings(&self) -> &[String] {
        &self.resolved.warnings
    }

    /// The art alone as an SVG document at preview size.
    pub fn preview_svg(&self) -> String {
        self.scene.to_svg_document(self.pipeline.settings().preview_px, false)
    }

    /// A fresh request over the current state.
    pub fn export_request(&self, format: ExportFormat, target_px: u32, frame: FrameSelection) -> ExportRequest {
        ExportRequest {
            format,
            target_px,
            frame,
            kind: self.kind,
            style: Arc::clone(&self.resolved),
            matrix: Arc::clone(&self.matrix),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Exports on the calling thread.
    pub fn export(&self, format: ExportFormat, target_px: u32, frame: FrameSelection) -> Result<Artifact, ExportError> {
        let _guard = self.acquire()?;
        self.pipeline.export(&self.export_request(format, target_px, frame))
    }

    /// Starts a background export.
    ///
    /// Only one export may be in flight; a second call before the first
    /// finishes fails with [`ExportError::Busy`]. Later style changes do not
    /// affect a running export.
    pub fn start_export(&self, format: ExportFormat, target_px: u32, frame: FrameSelection) -> Result<ExportJob, ExportError> {
        let guard = self.acquire()?;
        self.pipeline
            .spawn_guarded(self.export_request(format, target_px, frame), guard)
    }

    fn acquire(&self) -> Result<BusyGuard, ExportError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExportError::Busy)?;
        Ok(BusyGuard(Arc::clone(&self.busy)))
    }
}

/// A rejected logo does not count towards the level.
fn level_for(style: &StyleConfig, resolved: &ResolvedStyle, kind: ContentKind) -> EcLevel {
    if style.logo.is_some() && resolved.logo.is_none() {
        return style.clone().with_logo(None).effective_level(kind);
    }
    style.effective_level(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::EpsConverter;
    use crate::settings::Settings;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::sync::Mutex;

    /// Counts encodes and fails on demand.
    #[derive(Default)]
    struct CountingEncoder {
        calls: AtomicUsize,
    }

    impl MatrixSource for CountingEncoder {
        fn encode(&self, payload: &str, level: EcLevel) -> Result<ModuleMatrix, MatrixError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if payload.is_empty() {
                return Err(MatrixError::Encode("empty payload".to_string()));
            }
            QrEncoder.encode(payload, level)
        }
    }

    /// Blocks every conversion until the test releases it.
    #[derive(Debug)]
    struct GatedConverter {
        gate: Mutex<Receiver<()>>,
    }

    impl EpsConverter for GatedConverter {
        fn convert(&self, _png: &[u8]) -> Result<Vec<u8>, ExportError> {
            let _ = self.gate.lock().unwrap().recv();
            Ok(b"%!PS".to_vec())
        }
    }

    fn gated_pipeline() -> (ExportPipeline, Sender<()>) {
        let (tx, rx) = mpsc::channel();
        let converter = GatedConverter { gate: Mutex::new(rx) };
        (ExportPipeline::with_converter(Arc::new(Settings::default()), Arc::new(converter)), tx)
    }

    fn session() -> QrSession<CountingEncoder> {
        let (pipeline, _) = gated_pipeline();
        QrSession::new(
            CountingEncoder::default(),
            pipeline,
            PatternCatalog::builtin(),
            "https://example.com",
            ContentKind::Url,
            StyleConfig::default(),
        )
        .unwrap()
    }

    fn encodes(s: &QrSession<CountingEncoder>) -> usize {
        s.source.calls.load(Ordering::SeqCst)
    }

    #[test]
    fn test_color_change_does_not_reencode() {
        let mut s = session();
        assert_eq!(encodes(&s), 1);
        let before = Arc::clone(s.scene());
        s.set_style(StyleConfig::default().with_solid_color(crate::color::Color([0, 0, 200])))
            .unwrap();
        assert_eq!(encodes(&s), 1);
        assert_ne!(*before, **s.scene());
    }

    #[test]
    fn test_level_change_reencodes() {
        let mut s = session();
        s.set_style(StyleConfig::default().with_manual_level(Some(EcLevel::H))).unwrap();
        assert_eq!(encodes(&s), 2);
        assert_eq!(s.level(), EcLevel::H);
    }

    #[test]
    fn test_dense_kind_raises_level() {
        let mut s = session();
        s.set_payload("WIFI:T:WPA;S:Home;P:secret;;", ContentKind::Wifi).unwrap();
        assert_eq!(s.level(), EcLevel::Q);
        assert_eq!(s.kind(), ContentKind::Wifi);
    }

    #[test]
    fn test_failed_encode_keeps_previous_state() {
        let mut s = session();
        let matrix = Arc::clone(s.matrix());
        assert!(s.set_payload("", ContentKind::Text).is_err());
        assert_eq!(s.payload(), "https://example.com");
        assert_eq!(s.kind(), ContentKind::Url);
        assert!(Arc::ptr_eq(&matrix, s.matrix()));
    }

    #[test]
    fn test_rejected_logo_does_not_raise_level() {
        let mut s = session();
        let logo = crate::logo::LogoSpec {
            image: crate::logo::LogoImage::new(b"not an image".to_vec()),
            size_pct: 40.0,
            margin_px: 2.0,
            clear_background: false,
        };
        s.set_style(StyleConfig::default().with_logo(Some(logo))).unwrap();
        assert_eq!(s.level(), EcLevel::M);
        assert_eq!(s.warnings().len(), 1);
    }

    #[test]
    fn test_second_export_is_rejected_while_busy() {
        let (pipeline, release) = gated_pipeline();
        let s = QrSession::new(
            QrEncoder,
            pipeline,
            PatternCatalog::builtin(),
            "busy",
            ContentKind::Text,
            StyleConfig::default(),
        )
        .unwrap();

        let job = s.start_export(ExportFormat::Eps, 100, FrameSelection::none()).unwrap();
        assert!(s.is_busy());
        assert!(matches!(
            s.start_export(ExportFormat::Png, 100, FrameSelection::none()),
            Err(ExportError::Busy)
        ));

        release.send(()).unwrap();
        let artifact = job.wait().unwrap();
        assert_eq!(artifact.bytes, b"%!PS");
        assert!(!s.is_busy());
        assert!(s.export(ExportFormat::Png, 64, FrameSelection::none()).is_ok());
    }

    #[test]
    fn test_running_export_uses_its_own_snapshot() {
        let (pipeline, release) = gated_pipeline();
        let mut s = QrSession::new(
            QrEncoder,
            pipeline,
            PatternCatalog::builtin(),
            "snapshot",
            ContentKind::Text,
            StyleConfig::default(),
        )
        .unwrap();
        let job = s.start_export(ExportFormat::Eps, 100, FrameSelection::none()).unwrap();
        s.set_payload("changed while exporting", ContentKind::Text).unwrap();
        release.send(()).unwrap();
        assert!(job.wait().is_ok());
        assert_eq!(s.payload(), "changed while exporting");
    }
}
