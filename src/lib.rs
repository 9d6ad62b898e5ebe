//! Element Snapshot Capture
//!
//! A thin coordination layer that captures a visual snapshot of an on-screen
//! element as an encoded image buffer. Rendering is delegated entirely to two
//! external capability providers: a primary engine that emits encoded bytes,
//! and a fallback engine (used when the primary fails, commonly on
//! cross-origin resources) that emits a raster surface normalized through a
//! base64 data-URI conversion.
//!
//! # Features
//!
//! - **Provider Pipeline**: one fallback hop, explicit two-stage `Result`
//!   composition, both failure messages preserved on double failure
//! - **Retina Output**: scale-and-translate transform configuration renders
//!   content at a higher resolution without reflow
//! - **Configurable Filtering**: excluded-tag set skips known-problematic
//!   embedded content such as cross-origin frames
//!
//! # Example
//!
//! ```no_run
//! use elemsnap::{new_capturer, CaptureOptions, ElementHandle};
//!
//! # async fn run(
//! #     primary: Box<dyn elemsnap::PrimaryProvider>,
//! #     fallback: Box<dyn elemsnap::FallbackProvider>,
//! # ) -> elemsnap::Result<()> {
//! let capturer = new_capturer(primary, fallback, CaptureOptions::default());
//! let target = ElementHandle::new("div", 300, 150);
//! let image = capturer.capture(&target).await?;
//! println!("{} bytes of {}", image.data.len(), image.content_type);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod b64;
pub mod capture;
pub mod dom;

pub use capture::{
    Capturer, FallbackConfig, FallbackProvider, ImageBuffer, PrimaryConfig, PrimaryProvider,
    RasterSurface,
};
pub use dom::{DomNode, ElementHandle, NodeFilter, NodeKind};

/// 1x1 transparent PNG used as the default placeholder for sub-resources
/// that fail to load during capture.
pub const TRANSPARENT_PIXEL_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+P+/HgAEhgJAi5qj5AAAAABJRU5ErkJggg==";

/// Configuration for a snapshot capture
///
/// The defaults match the common retina-capture setup: double-resolution
/// output, full quality, cache busting on, embedded frames excluded.
///
/// # Examples
///
/// ```
/// let opts = elemsnap::CaptureOptions::default();
/// assert_eq!(opts.scale_factor, 2.0);
/// assert_eq!(opts.excluded_tags, ["iframe"]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    /// Multiplier applied to the output resolution
    pub scale_factor: f64,
    /// Output compression quality in [0, 1]
    pub quality: f64,
    /// Whether to bypass cached sub-resources during capture
    pub cache_bust: bool,
    /// Encoded image substituted for sub-resources that fail to load
    pub placeholder_image: String,
    /// Element tags excluded from the capture by the node filter
    pub excluded_tags: Vec<String>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            scale_factor: 2.0,
            quality: 1.0,
            cache_bust: true,
            placeholder_image: TRANSPARENT_PIXEL_URI.to_string(),
            excluded_tags: vec!["iframe".to_string()],
        }
    }
}

/// Create a capturer wired to the given providers
pub fn new_capturer(
    primary: Box<dyn PrimaryProvider>,
    fallback: Box<dyn FallbackProvider>,
    options: CaptureOptions,
) -> Capturer {
    Capturer::new(primary, fallback, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = CaptureOptions::default();
        assert_eq!(options.scale_factor, 2.0);
        assert_eq!(options.quality, 1.0);
        assert!(options.cache_bust);
        assert_eq!(options.excluded_tags, ["iframe"]);
        assert!(options
            .placeholder_image
            .starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: CaptureOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.scale_factor, 2.0);
        assert_eq!(options.excluded_tags, ["iframe"]);
    }
}
