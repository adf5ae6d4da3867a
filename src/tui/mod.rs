//! Ratatui-based terminal viewer.
//!
//! Shows one figure at a time as a grid of panels. Tab / Shift-Tab switch
//! between figures, `q` or Esc quits.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
};

use crate::error::AppError;
use crate::figure::{Figure, Panel};
use crate::render::curve_color;

mod plotters_chart;

use plotters_chart::PanelChart;

/// Start the viewer over already-composed figures.
pub fn run(figures: Vec<Figure>) -> Result<(), AppError> {
    if figures.is_empty() {
        return Err(AppError::input("Nothing to show: no figures were built."));
    }

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut viewer = Viewer::new(figures);
    viewer.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct Viewer {
    figures: Vec<Figure>,
    selected: usize,
}

impl Viewer {
    fn new(figures: Vec<Figure>) -> Self {
        Self { figures, selected: 0 }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the viewer should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let n = self.figures.len();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::Right => self.selected = (self.selected + 1) % n,
            KeyCode::BackTab | KeyCode::Left => self.selected = (self.selected + n - 1) % n,
            _ => {}
        }
        false
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        self.draw_tabs(frame, chunks[0]);
        self.draw_grid(frame, chunks[1]);

        let help = Paragraph::new("Tab/Shift-Tab switch figure  q quit").style(Style::default().fg(Color::Gray));
        frame.render_widget(help, chunks[2]);
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles: Vec<Line> = self.figures.iter().map(|f| Line::from(f.title.clone())).collect();
        let tabs = Tabs::new(titles)
            .select(self.selected)
            .block(Block::default().borders(Borders::ALL).title("km"))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, area);
    }

    fn draw_grid(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let figure = &self.figures[self.selected];
        for (rect, panel) in grid_cells(area, figure.layout.rows, figure.layout.cols)
            .into_iter()
            .zip(figure.panels())
        {
            if panel.visible {
                draw_panel_cell(frame, rect, panel, figure);
            }
        }
    }
}

fn draw_panel_cell(frame: &mut ratatui::Frame<'_>, area: Rect, panel: &Panel, figure: &Figure) {
    let title = panel.title.clone().unwrap_or_default();
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    let legend = legend_line(panel);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let chart = PanelChart {
        panel,
        style: &figure.style,
    };
    frame.render_widget(chart, chunks[0]);
    frame.render_widget(Paragraph::new(legend), chunks[1]);
}

/// One coloured entry per curve, matching the line colours in the chart.
fn legend_line(panel: &Panel) -> Line<'static> {
    let mut spans = Vec::with_capacity(panel.curves.len() * 2);
    for (i, curve) in panel.curves.iter().enumerate() {
        let c = curve_color(i);
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!("━ {}", curve.label),
            Style::default().fg(Color::Rgb(c.0, c.1, c.2)),
        ));
    }
    Line::from(spans)
}

/// Split `area` into a row-major `rows x cols` grid.
fn grid_cells(area: Rect, rows: usize, cols: usize) -> Vec<Rect> {
    let row_constraints = vec![Constraint::Ratio(1, rows.max(1) as u32); rows];
    let col_constraints = vec![Constraint::Ratio(1, cols.max(1) as u32); cols];

    let row_rects = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(area);

    row_rects
        .iter()
        .flat_map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints(col_constraints.clone())
                .split(*row)
                .to_vec()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::{Estimator, KaplanMeier};

    #[test]
    fn grid_is_row_major() {
        let cells = grid_cells(Rect::new(0, 0, 90, 40), 2, 3);
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0].y, cells[2].y);
        assert!(cells[3].y > cells[0].y);
        assert!(cells[1].x > cells[0].x);
    }

    #[test]
    fn tab_cycles_through_figures() {
        let mut viewer = Viewer::new(vec![Figure::categorical(), Figure::continuous()]);
        assert!(!viewer.handle_key(KeyCode::Tab));
        assert_eq!(viewer.selected, 1);
        viewer.handle_key(KeyCode::Tab);
        assert_eq!(viewer.selected, 0);
        viewer.handle_key(KeyCode::BackTab);
        assert_eq!(viewer.selected, 1);
        assert!(viewer.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn legend_lists_every_curve() {
        let km = KaplanMeier::new();
        let mut fig = Figure::categorical();
        let curves = vec![
            km.fit(&[5.0, 9.0], &[true, false], "sex: 0".into()).unwrap(),
            km.fit(&[7.0], &[true], "sex: 1".into()).unwrap(),
        ];
        fig.compose(vec![("sex".into(), curves)]).unwrap();

        let line = legend_line(fig.panel(0).unwrap());
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("sex: 0"));
        assert!(text.contains("sex: 1"));
    }
}
