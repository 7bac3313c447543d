//! Species colors shared by the interactive and static figures.

use crate::data::Species;
use egui::Color32;
use plotters::style::RGBColor;

const BLUE: [u8; 3] = [0, 0, 255];
const ORANGE: [u8; 3] = [255, 165, 0];
const GREEN: [u8; 3] = [0, 128, 0];

/// Species → color, in legend order.
pub const SPECIES_COLORS: [(Species, [u8; 3]); 3] = [
    (Species::Setosa, BLUE),
    (Species::Versicolor, ORANGE),
    (Species::Virginica, GREEN),
];

/// Histogram bar fill.
pub const HISTOGRAM_FILL: [u8; 3] = [31, 119, 180];

pub fn species_rgb(species: Species) -> [u8; 3] {
    SPECIES_COLORS
        .iter()
        .find(|(s, _)| *s == species)
        .map(|(_, rgb)| *rgb)
        .unwrap_or([128, 128, 128])
}

pub fn to_color32([r, g, b]: [u8; 3]) -> Color32 {
    Color32::from_rgb(r, g, b)
}

pub fn to_plotters([r, g, b]: [u8; 3]) -> RGBColor {
    RGBColor(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_species_has_distinct_color() {
        let colors: Vec<[u8; 3]> = Species::ALL.iter().map(|s| species_rgb(*s)).collect();
        assert_eq!(colors, vec![BLUE, ORANGE, GREEN]);
    }

    #[test]
    fn test_mapping_order_follows_species_order() {
        let order: Vec<Species> = SPECIES_COLORS.iter().map(|(s, _)| *s).collect();
        assert_eq!(order, Species::ALL.to_vec());
    }
}
