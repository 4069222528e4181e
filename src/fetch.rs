//! Image acquisition from a URL or a local path.
//!
//! Both loaders produce an 8-bit RGB bitmap regardless of the source format;
//! alpha channels and grayscale inputs are converted during decode.

use std::path::Path;
use std::time::Duration;

use image::RgbImage;

use crate::error::Result;

/// Timeout for the whole HTTP exchange (connect + body).
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Some image hosts reject requests without a browser-style user agent.
const USER_AGENT: &str = "Mozilla/5.0";

/// Fetch an image over HTTP(S) and decode it to RGB.
///
/// Non-2xx responses are treated as errors, so a 404 HTML page is never
/// handed to the image decoder.
///
/// # Errors
///
/// Returns [`crate::Error::Http`] on transport failures, timeouts, or error
/// status codes, and [`crate::Error::Image`] if the body is not a decodable
/// image.
pub fn load_from_url(url: &str) -> Result<RgbImage> {
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?;

    let bytes = client.get(url).send()?.error_for_status()?.bytes()?;
    Ok(image::load_from_memory(&bytes)?.to_rgb8())
}

/// Open a local image file and decode it to RGB.
///
/// # Errors
///
/// Returns [`crate::Error::Image`] if the file is missing, unreadable, or
/// not a decodable image (the `image` crate folds I/O failures into its own
/// error type here).
pub fn load_from_path(path: &Path) -> Result<RgbImage> {
    Ok(image::open(path)?.to_rgb8())
}
