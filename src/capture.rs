//! Snapshot capturer: coordinates a primary and a fallback rendering provider.
//!
//! The capturer itself does no layout or painting. It builds an equivalent
//! visual configuration for whichever provider runs, invokes the primary
//! provider first, and falls back to the secondary provider when the primary
//! fails (commonly on cross-origin resources). The fallback yields a raster
//! surface rather than encoded bytes, so its output is normalized through the
//! data-URI/base64 path before being returned.

use async_trait::async_trait;
use log::{error, info, warn};

use crate::b64;
use crate::dom::{ElementHandle, NodeFilter};
use crate::error::{Error, Result};
use crate::CaptureOptions;

/// Encoded image bytes tagged with their MIME type.
///
/// The byte layout is exactly the encoding produced by whichever provider
/// succeeded (PNG for the fallback path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Configuration handed to the primary provider.
#[derive(Debug, Clone)]
pub struct PrimaryConfig {
    /// Output compression quality in [0, 1]
    pub quality: f64,
    /// Requested canvas width (already scaled)
    pub width: u32,
    /// Requested canvas height (already scaled)
    pub height: u32,
    /// Transform applied to the target's visual root. Translation values are
    /// in the pre-scale coordinate space (scale composes before translate).
    pub transform: String,
    /// Bypass cached sub-resources
    pub cache_bust: bool,
    /// Encoded image substituted for sub-resources that fail to load
    pub image_placeholder: String,
    /// Descendant-node filter (excluded nodes are left out of the capture)
    pub filter: NodeFilter,
}

/// Configuration handed to the fallback provider.
///
/// The fallback applies its own internal scaling, so it receives the
/// unscaled natural dimensions rather than a transform.
#[derive(Debug, Clone)]
pub struct FallbackConfig {
    pub scale: f64,
    pub allow_taint: bool,
    pub use_cors: bool,
    /// Natural (unscaled) width of the target
    pub width: u32,
    /// Natural (unscaled) height of the target
    pub height: u32,
}

/// An in-memory pixel surface produced by the fallback provider.
pub trait RasterSurface: Send + Sync {
    /// Encode the surface as a PNG data URI
    fn to_data_uri(&self) -> Result<String>;
}

/// Primary rendering engine: produces encoded image bytes directly.
#[async_trait]
pub trait PrimaryProvider: Send + Sync {
    async fn render(&self, target: &ElementHandle, config: &PrimaryConfig)
        -> Result<ImageBuffer>;
}

/// Secondary rendering engine: produces a raster surface to be encoded.
#[async_trait]
pub trait FallbackProvider: Send + Sync {
    async fn render(
        &self,
        target: &ElementHandle,
        config: &FallbackConfig,
    ) -> Result<Box<dyn RasterSurface>>;
}

/// Captures a visual snapshot of an element via the provider pipeline.
///
/// One capture call makes at most two provider invocations: the primary, and
/// on primary failure the fallback. There are no internal retries beyond that
/// single hop, and no synchronization between concurrent calls.
pub struct Capturer {
    primary: Box<dyn PrimaryProvider>,
    fallback: Box<dyn FallbackProvider>,
    options: CaptureOptions,
}

impl Capturer {
    pub fn new(
        primary: Box<dyn PrimaryProvider>,
        fallback: Box<dyn FallbackProvider>,
        options: CaptureOptions,
    ) -> Self {
        Self {
            primary,
            fallback,
            options,
        }
    }

    /// The options this capturer was configured with
    pub fn options(&self) -> &CaptureOptions {
        &self.options
    }

    /// Build the primary provider's configuration for `target`.
    ///
    /// The canvas is enlarged by the scale factor and the content is scaled
    /// up via a transform rather than reflowed, so it renders at the higher
    /// resolution while keeping its natural layout.
    pub fn primary_config(&self, target: &ElementHandle) -> PrimaryConfig {
        let scale = self.options.scale_factor;
        let width = target.offset_width();
        let height = target.offset_height();
        PrimaryConfig {
            quality: self.options.quality,
            width: scaled_dimension(width, scale),
            height: scaled_dimension(height, scale),
            transform: retina_transform(width, height, scale),
            cache_bust: self.options.cache_bust,
            image_placeholder: self.options.placeholder_image.clone(),
            filter: NodeFilter::new(self.options.excluded_tags.iter().cloned()),
        }
    }

    fn fallback_config(&self, target: &ElementHandle) -> FallbackConfig {
        FallbackConfig {
            scale: self.options.scale_factor,
            // The fallback's failure mode differs from the primary's, so
            // tainted and CORS-loaded content is allowed here.
            allow_taint: true,
            use_cors: true,
            width: target.offset_width(),
            height: target.offset_height(),
        }
    }

    /// Capture `target` as an encoded image buffer.
    ///
    /// Zero-size targets are passed through unmodified; providers decide
    /// whether to reject them or return an empty image.
    pub async fn capture(&self, target: &ElementHandle) -> Result<ImageBuffer> {
        let config = self.primary_config(target);
        let primary_err = match self.primary.render(target, &config).await {
            Ok(buffer) => {
                info!("Snapshot produced by the primary provider");
                return Ok(buffer);
            }
            Err(err) => {
                warn!("Primary provider failed, trying fallback: {}", err);
                err
            }
        };

        match self.capture_via_fallback(target).await {
            Ok(buffer) => {
                info!("Snapshot produced by the fallback provider");
                Ok(buffer)
            }
            // A malformed payload after a successful fallback render is not
            // a provider failure; surface it as-is.
            Err(err @ Error::Decode(_)) => Err(err),
            Err(fallback_err) => {
                error!("Both capture providers failed");
                Err(Error::Capture(format!("{} and {}", primary_err, fallback_err)))
            }
        }
    }

    async fn capture_via_fallback(&self, target: &ElementHandle) -> Result<ImageBuffer> {
        let config = self.fallback_config(target);
        let surface = self.fallback.render(target, &config).await?;
        let data_uri = surface.to_data_uri()?;
        let (mime_type, payload) = split_data_uri(&data_uri)?;
        b64::decode(payload, mime_type)
    }
}

/// Scale a natural dimension by the configured factor
fn scaled_dimension(value: u32, scale: f64) -> u32 {
    (value as f64 * scale).round() as u32
}

/// Transform string that renders the content at `scale` times its natural
/// resolution, centered within the enlarged capture frame. The translation
/// operands are pre-scale coordinates, not output pixels.
fn retina_transform(width: u32, height: u32, scale: f64) -> String {
    let tx = width as f64 / 2.0 / scale;
    let ty = height as f64 / 2.0 / scale;
    format!("scale({}) translate({}px, {}px)", scale, tx, ty)
}

/// Split a data URI into its declared MIME type and raw base64 payload
fn split_data_uri(uri: &str) -> Result<(&str, &str)> {
    // "data:image/png;base64,iVBOR..." -> ("image/png", "iVBOR...")
    let (header, payload) = uri
        .split_once(',')
        .ok_or_else(|| Error::Decode("Data URI has no payload separator".to_string()))?;
    let (scheme_and_mime, _encoding) = header
        .split_once(';')
        .ok_or_else(|| Error::Decode("Data URI has no encoding marker".to_string()))?;
    let mime_type = scheme_and_mime
        .split_once(':')
        .map(|(_, mime)| mime)
        .ok_or_else(|| Error::Decode("Data URI has no scheme".to_string()))?;
    Ok((mime_type, payload))
}
