use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Provenance;

// ---------------------------------------------------------------------------
// Chart colours, shared by the PNG emitter and the viewer
// ---------------------------------------------------------------------------

/// Hue/saturation/lightness → 8-bit sRGB.
pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Srgb<u8> {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    rgb.into_format()
}

/// Scatter colour for a point group.
pub fn group_color(provenance: Option<Provenance>) -> Srgb<u8> {
    match provenance {
        Some(Provenance::Internal) => from_hsl(28.0, 1.0, 0.53),
        Some(Provenance::Literature) | None => from_hsl(205.0, 0.71, 0.41),
        Some(Provenance::Unspecified) => from_hsl(0.0, 0.0, 0.45),
    }
}

/// Colour of the fitted line.
pub fn fit_line_color() -> Srgb<u8> {
    from_hsl(0.0, 0.69, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_get_distinct_colours() {
        let colours: Vec<Srgb<u8>> = Provenance::ALL
            .into_iter()
            .map(|p| group_color(Some(p)))
            .chain(std::iter::once(fit_line_color()))
            .collect();
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn fit_line_is_red_dominant() {
        let c = fit_line_color();
        assert!(c.red > c.green && c.red > c.blue);
    }
}
