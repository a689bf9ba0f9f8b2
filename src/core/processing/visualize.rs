use crate::core::processing::buffer::AnalysisBuffer;
use crate::types::AnalysisChannel;

/// Renders the feature maps as an RGBA image for inspection:
/// skin in red, detail in green, saturation in blue, each clamped to 0..=255.
pub fn render_analysis(features: &AnalysisBuffer) -> Vec<u8> {
    let to_u8 = |v: f64| v.clamp(0.0, 255.0).round() as u8;
    let mut rgba = Vec::with_capacity(features.width() * features.height() * 4);

    for y in 0..features.height() {
        for x in 0..features.width() {
            rgba.extend_from_slice(&[
                to_u8(features.get(x, y, AnalysisChannel::Skin)),
                to_u8(features.get(x, y, AnalysisChannel::Detail)),
                to_u8(features.get(x, y, AnalysisChannel::Saturation)),
                255,
            ]);
        }
    }
    rgba
}
