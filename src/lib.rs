//! # qrstyle
//!
//! A Rust library for rendering styled QR codes and exporting them to PNG,
//! JPEG, SVG, PDF or EPS.
//!
//! `qrstyle` takes a module matrix from an encoder and turns it into vector
//! art: body modules drawn with any glyph from a pattern catalog, finder
//! patterns with independently chosen outer frames and inner dots, flat or
//! gradient fills, a centred logo and a decorative frame. Encoding itself is
//! delegated to the `qrcode` crate behind the [`matrix::MatrixSource`] trait.
//!
//! ## Features
//!
//! - Built-in and catalog glyphs for body modules and finder patterns.
//! - Solid, linear and radial fills with gradient rotation.
//! - Logo overlay with automatic error correction escalation.
//! - Frames with caption text.
//! - One export decision table: native SVG where possible, raster capture
//!   otherwise, and EPS through an external conversion service.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Example
//!
//! Render a dotted code with a gradient and save it as PNG:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use qrstyle::catalog::PatternCatalog;
//! use qrstyle::color::{Color, ColorMode};
//! use qrstyle::export::{ExportFormat, ExportPipeline};
//! use qrstyle::frame::FrameSelection;
//! use qrstyle::matrix::QrEncoder;
//! use qrstyle::payload::ContentKind;
//! use qrstyle::session::QrSession;
//! use qrstyle::settings::Settings;
//! use qrstyle::style::StyleConfig;
//!
//! let style = StyleConfig::default()
//!     .with_body_glyph("dots")
//!     .with_gradient(ColorMode::Linear, [Color([0x1e, 0x3a, 0x8a]), Color([0x9d, 0x17, 0x4d])], 45.0);
//! let pipeline = ExportPipeline::new(Arc::new(Settings::default()));
//! let session = QrSession::new(
//!     QrEncoder,
//!     pipeline,
//!     PatternCatalog::builtin(),
//!     "https://example.com",
//!     ContentKind::Url,
//!     style,
//! )?;
//! let artifact = session.export(ExportFormat::Png, 1000, FrameSelection::none())?;
//! artifact.save(None, None)?;
//! # Ok::<(), qrstyle::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`matrix`]: Module matrices and the encoder seam.
//! - [`catalog`]: Glyph definitions and catalogs.
//! - [`style`]: The immutable style value.
//! - [`body`], [`eye`], [`native`], [`render`]: Scene rendering.
//! - [`frame`], [`logo`], [`compose`]: Composition.
//! - [`export`]: The export pipeline, with [`raster`], [`pdf`] and [`remote`].
//! - [`session`]: Live state and the single in-flight export.

#![forbid(unsafe_code)]

pub mod body;
pub mod catalog;
pub mod color;
pub mod compose;
pub mod datauri;
pub mod error;
pub mod export;
pub mod eye;
pub mod frame;
pub mod logo;
pub mod matrix;
pub mod native;
pub mod payload;
pub mod pdf;
pub mod raster;
pub mod remote;
pub mod render;
pub mod scene;
pub mod session;
pub mod settings;
pub mod style;

pub use error::{ConfigError, Error, ExportError, LogoError, MatrixError};
pub use export::{Artifact, ExportFormat, ExportPipeline, ExportRequest, Strategy};
pub use matrix::{EcLevel, MatrixSource, ModuleMatrix, QrEncoder};
pub use session::QrSession;
pub use style::StyleConfig;
