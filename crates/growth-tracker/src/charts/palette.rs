//! Colour palettes used by the charts.

use plotters::style::RGBColor;

/// Qualitative palette for categories in the scatter plot.
pub const SET2: [RGBColor; 8] = [
    RGBColor(0x66, 0xc2, 0xa5),
    RGBColor(0xfc, 0x8d, 0x62),
    RGBColor(0x8d, 0xa0, 0xcb),
    RGBColor(0xe7, 0x8a, 0xc3),
    RGBColor(0xa6, 0xd8, 0x54),
    RGBColor(0xff, 0xd9, 0x2f),
    RGBColor(0xe5, 0xc4, 0x94),
    RGBColor(0xb3, 0xb3, 0xb3),
];

/// Soft palette for pie slices.
pub const PASTEL: [RGBColor; 10] = [
    RGBColor(0xa1, 0xc9, 0xf4),
    RGBColor(0xff, 0xb4, 0x82),
    RGBColor(0x8d, 0xe5, 0xa1),
    RGBColor(0xff, 0x9f, 0x9b),
    RGBColor(0xd0, 0xbb, 0xff),
    RGBColor(0xde, 0xbb, 0x9b),
    RGBColor(0xfa, 0xb0, 0xe4),
    RGBColor(0xcf, 0xcf, 0xcf),
    RGBColor(0xff, 0xfe, 0xa3),
    RGBColor(0xb9, 0xf2, 0xf0),
];

/// Bars of the category chart.
pub const BAR: RGBColor = RGBColor(0x4c, 0x72, 0xb0);

/// Bars and density curve of the views histogram.
pub const SKY_BLUE: RGBColor = RGBColor(0x87, 0xce, 0xeb);

/// Net subscriber line.
pub const DARK_GREEN: RGBColor = RGBColor(0x00, 0x80, 0x00);

/// Colour for the `idx`-th entry, cycling through `palette`.
pub fn cycle(palette: &[RGBColor], idx: usize) -> RGBColor {
    palette[idx % palette.len()]
}
