//! Plotters-powered survival panel widget for Ratatui.
//!
//! Plotters output is drawn into the Ratatui buffer through
//! `plotters-ratatui-backend`, reusing the same `draw_panel` as the SVG writer.

use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::PanelStyle;
use crate::figure::Panel;
use crate::render::{Theme, draw_panel};

/// Render-only view of one figure panel.
pub struct PanelChart<'a> {
    pub panel: &'a Panel,
    pub style: &'a PanelStyle,
}

impl<'a> Widget for PanelChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(area.x, area.y, "too small", Style::default().fg(Color::Yellow));
            return;
        }

        let (x0, x1) = self.style.x_range;
        let (y0, y1) = self.style.y_range;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let panel = self.panel;
        let style = self.style;
        let theme = Theme::terminal();
        let widget = widget_fn(move |root| {
            // A failed draw leaves the cell blank.
            if let Err(e) = draw_panel(&root, panel, style, &theme) {
                log::debug!("panel draw failed: {e}");
            }
            Ok(())
        });

        widget.render(area, buf);
    }
}
