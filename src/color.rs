use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Hue of the last colour in the rainbow; stops short of wrapping back to red.
const MAX_HUE: f32 = 300.0;

/// Generates `n` colours running red → yellow → green → blue → magenta.
///
/// Colour `i` takes hue `i / n` of the way along the rainbow, so the first
/// curve is always red and no two curves share a colour.
pub fn rainbow_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * MAX_HUE;
            let hsl = Hsl::new(hue, 1.0, 0.5);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0).round() as u8,
                (rgb.green * 255.0).round() as u8,
                (rgb.blue * 255.0).round() as u8,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_one_colour_per_curve() {
        assert!(rainbow_palette(0).is_empty());
        assert_eq!(rainbow_palette(5).len(), 5);
    }

    #[test]
    fn palette_starts_at_red_and_colours_are_distinct() {
        let colours = rainbow_palette(4);
        assert_eq!(colours[0], Color32::from_rgb(255, 0, 0));
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
