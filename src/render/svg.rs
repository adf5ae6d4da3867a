//! SVG output for composed figures.

use std::path::Path;

use plotters::prelude::*;

use crate::error::AppError;
use crate::figure::Figure;

use super::{Theme, draw_panel};

/// Render `figure` to an SVG document.
///
/// Hidden panels leave their grid cell blank.
pub fn render_svg(figure: &Figure) -> Result<String, AppError> {
    let mut out = String::new();
    {
        let size = (figure.layout.width, figure.layout.height);
        let root = SVGBackend::with_string(&mut out, size).into_drawing_area();
        draw_figure(&root, figure)
            .map_err(|e| AppError::runtime(format!("Failed to render {} figure: {e}", figure.kind)))?;
    }
    Ok(out)
}

/// Render `figure` and write it to `path`.
pub fn write_svg(figure: &Figure, path: &Path) -> Result<(), AppError> {
    let svg = render_svg(figure)?;
    std::fs::write(path, svg)
        .map_err(|e| AppError::runtime(format!("Failed to write SVG '{}': {e}", path.display())))?;
    log::info!("wrote {} figure to '{}'", figure.kind, path.display());
    Ok(())
}

fn draw_figure(
    root: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    figure: &Figure,
) -> Result<(), Box<dyn std::error::Error>> {
    root.fill(&WHITE)?;
    let body = root.titled(&figure.title, ("sans-serif", 30))?;
    let cells = body.split_evenly((figure.layout.rows, figure.layout.cols));

    let theme = Theme::svg();
    for (cell, panel) in cells.iter().zip(figure.panels()) {
        if panel.visible {
            draw_panel(cell, panel, &figure.style, &theme)?;
        }
    }

    root.present()?;
    Ok(())
}
