//! Pure dimension math.

/// Dimensions that fit `source` within `max_width`, keeping the aspect ratio.
///
/// Returns `None` when the image is already narrow enough: images are never
/// upscaled.
///
/// ```
/// # use cardpress::media::fit_to_width;
/// assert_eq!(fit_to_width((1200, 800), 300), Some((300, 200)));
/// assert_eq!(fit_to_width((200, 100), 300), None);
/// ```
pub fn fit_to_width(source: (u32, u32), max_width: u32) -> Option<(u32, u32)> {
    let (width, height) = source;
    if width <= max_width || width == 0 {
        return None;
    }
    let scaled = (height as f64 * max_width as f64 / width as f64).round() as u32;
    Some((max_width, scaled.max(1)))
}
