//! Plotters drawing of figure panels.
//!
//! `draw_panel` is backend-agnostic: the SVG writer and the terminal widget both
//! call it, each with its own `Theme`.

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::PanelStyle;
use crate::figure::Panel;

pub mod svg;

pub use svg::{render_svg, write_svg};

/// Matplotlib's default ten-colour cycle; curves beyond ten reuse colours.
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Colour of the `i`-th curve in a panel.
pub fn curve_color(i: usize) -> RGBColor {
    PALETTE[i % PALETTE.len()]
}

/// Backend-specific sizing and colours.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub foreground: RGBColor,
    pub caption_size: u32,
    pub label_size: u32,
    pub margin: u32,
    pub x_label_area: u32,
    pub y_label_area: u32,
    pub stroke_width: u32,
    /// Draw the panel title inside the chart area.
    pub captions: bool,
    /// Draw the in-chart legend box.
    pub legend: bool,
    pub mesh: bool,
}

impl Theme {
    pub fn svg() -> Self {
        Self {
            foreground: BLACK,
            caption_size: 22,
            label_size: 15,
            margin: 15,
            x_label_area: 45,
            y_label_area: 60,
            stroke_width: 2,
            captions: true,
            legend: true,
            mesh: true,
        }
    }

    /// Terminal cells are low-res, so labels stay compact and the legend is
    /// drawn by the widget instead of Plotters.
    pub fn terminal() -> Self {
        Self {
            foreground: WHITE,
            caption_size: 10,
            label_size: 10,
            margin: 1,
            x_label_area: 3,
            y_label_area: 6,
            stroke_width: 1,
            captions: false,
            legend: false,
            mesh: false,
        }
    }
}

/// Draw one panel: a confidence band and a step line per curve.
pub fn draw_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    style: &PanelStyle,
    theme: &Theme,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (x0, x1) = style.x_range;
    let (y0, y1) = style.y_range;
    let fg = theme.foreground;

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(theme.margin)
        .x_label_area_size(theme.x_label_area)
        .y_label_area_size(theme.y_label_area);
    if theme.captions {
        if let Some(title) = &panel.title {
            builder.caption(title, ("sans-serif", theme.caption_size).into_font().color(&fg));
        }
    }
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(style.x_label.as_str())
            .y_desc(style.y_label.as_str())
            .x_labels(6)
            .y_labels(6)
            .label_style(("sans-serif", theme.label_size).into_font().color(&fg))
            .axis_desc_style(("sans-serif", theme.label_size).into_font().color(&fg))
            .axis_style(&fg);
        if theme.mesh {
            mesh.bold_line_style(&fg.mix(0.1)).light_line_style(&TRANSPARENT);
        } else {
            mesh.disable_x_mesh().disable_y_mesh();
        }
        mesh.draw()?;
    }

    let domain = style.x_range;
    for (i, curve) in panel.curves.iter().enumerate() {
        let color = curve_color(i);
        let band = curve.band(domain);
        if band.len() > 2 {
            chart.draw_series(std::iter::once(Polygon::new(band, color.mix(style.ci_alpha).filled())))?;
        }

        let line_style = color.stroke_width(theme.stroke_width);
        chart
            .draw_series(LineSeries::new(curve.steps(domain), line_style))?
            .label(curve.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
    }

    if theme.legend && !panel.curves.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerLeft)
            .label_font(("sans-serif", theme.label_size).into_font().color(&fg))
            .background_style(&WHITE.mix(0.8))
            .border_style(&fg.mix(0.3))
            .draw()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_cycles_instead_of_failing() {
        assert_eq!(curve_color(0), curve_color(10));
        assert_ne!(curve_color(0), curve_color(1));
    }
}
