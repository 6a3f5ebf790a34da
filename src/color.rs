use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Heat gradient
// ---------------------------------------------------------------------------

/// Heat-layer colour stops: (weight, RGB).
pub const HEAT_STOPS: [(f64, [u8; 3]); 4] = [
    (0.2, [0xFF, 0xA5, 0x00]),
    (0.5, [0xFF, 0x45, 0x00]),
    (0.8, [0xFF, 0x00, 0x00]),
    (1.0, [0x8B, 0x00, 0x00]),
];

fn linear(rgb: [u8; 3]) -> LinSrgb {
    Srgb::<u8>::new(rgb[0], rgb[1], rgb[2])
        .into_format::<f32>()
        .into_linear()
}

fn to_color32(lin: LinSrgb, alpha: u8) -> Color32 {
    let rgb = Srgb::<u8>::from_linear(lin);
    Color32::from_rgba_unmultiplied(rgb.red, rgb.green, rgb.blue, alpha)
}

/// Colour of a heat weight in `[0, 1]`, interpolated between the stops.
///
/// Weights below the first stop fade out towards transparent orange.
pub fn heat_color(weight: f64) -> Color32 {
    let w = weight.clamp(0.0, 1.0);
    let (first_w, first_rgb) = HEAT_STOPS[0];
    if w <= first_w {
        let alpha = 80.0 + 175.0 * (w / first_w);
        return to_color32(linear(first_rgb), alpha as u8);
    }
    for pair in HEAT_STOPS.windows(2) {
        let (w0, c0) = pair[0];
        let (w1, c1) = pair[1];
        if w <= w1 {
            let t = ((w - w0) / (w1 - w0)) as f32;
            return to_color32(linear(c0).mix(linear(c1), t), 255);
        }
    }
    let (_, last) = HEAT_STOPS[HEAT_STOPS.len() - 1];
    to_color32(linear(last), 255)
}

/// Number of discrete heat bands drawn on the map.
pub const HEAT_BANDS: usize = 5;

/// Band index (`0..HEAT_BANDS`) of a heat weight.
pub fn heat_band(weight: f64) -> usize {
    let w = weight.clamp(0.0, 1.0);
    ((w * HEAT_BANDS as f64) as usize).min(HEAT_BANDS - 1)
}

/// Representative weight of a band (its midpoint).
pub fn band_weight(band: usize) -> f64 {
    (band as f64 + 0.5) / HEAT_BANDS as f64
}

// ---------------------------------------------------------------------------
// Region shading
// ---------------------------------------------------------------------------

/// Outline colour of a region holding `count` of at most `max` detections.
///
/// Regions with no detections keep a neutral outline; the rest ramp from
/// pale sand towards deep red.
pub fn region_color(count: usize, max: usize) -> Color32 {
    if count == 0 || max == 0 {
        return Color32::from_gray(90);
    }
    let t = (count as f32 / max as f32).clamp(0.0, 1.0);
    to_color32(linear([0xE6, 0xBE, 0xAD]).mix(linear([0xB2, 0x18, 0x2B]), t), 255)
}
