//! Figure model: a fixed grid of panels owned by the caller.
//!
//! A `Figure` is pure data. The pipeline fills panels with fitted curves and
//! hides unused cells; renderers (`render`, `tui`) only read it.

use crate::domain::{FigureKind, FigureLayout, PanelStyle};
use crate::error::AppError;
use crate::estimate::FittedCurve;

/// One grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// Feature shown in this panel (`None` until assigned).
    pub title: Option<String>,
    pub curves: Vec<FittedCurve>,
    pub visible: bool,
}

impl Panel {
    fn empty() -> Self {
        Self {
            title: None,
            curves: Vec::new(),
            visible: true,
        }
    }
}

/// A titled grid of panels sharing one axis style.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub kind: FigureKind,
    pub title: String,
    pub layout: FigureLayout,
    pub style: PanelStyle,
    panels: Vec<Panel>,
}

impl Figure {
    pub fn new(kind: FigureKind, title: impl Into<String>, layout: FigureLayout, style: PanelStyle) -> Self {
        Self {
            kind,
            title: title.into(),
            layout,
            style,
            panels: (0..layout.capacity()).map(|_| Panel::empty()).collect(),
        }
    }

    /// 2x3 figure for categorical covariates.
    pub fn categorical() -> Self {
        Self::new(
            FigureKind::Categorical,
            "Kaplan Meier Estimates for Categorical Variables",
            FigureLayout::CATEGORICAL,
            PanelStyle::default(),
        )
    }

    /// 3x3 figure for binned continuous covariates.
    pub fn continuous() -> Self {
        Self::new(
            FigureKind::Continuous,
            "Kaplan Meier Estimates for Continuous Variables",
            FigureLayout::CONTINUOUS,
            PanelStyle::default(),
        )
    }

    pub fn capacity(&self) -> usize {
        self.panels.len()
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, idx: usize) -> Option<&Panel> {
        self.panels.get(idx)
    }

    pub fn visible_panels(&self) -> impl Iterator<Item = &Panel> {
        self.panels.iter().filter(|p| p.visible)
    }

    pub fn hide(&mut self, idx: usize) {
        if let Some(p) = self.panels.get_mut(idx) {
            p.visible = false;
        }
    }

    /// Fail if `n` features cannot fit in the grid.
    pub fn ensure_capacity(&self, n: usize) -> Result<(), AppError> {
        if n > self.capacity() {
            return Err(AppError::input(format!(
                "{n} {} columns do not fit a {}x{} figure (max {}).",
                self.kind,
                self.layout.rows,
                self.layout.cols,
                self.capacity()
            )));
        }
        Ok(())
    }

    /// Place one feature per panel in grid order and hide every leftover panel.
    ///
    /// Any previous content is replaced.
    pub fn compose(&mut self, features: Vec<(String, Vec<FittedCurve>)>) -> Result<(), AppError> {
        self.ensure_capacity(features.len())?;

        let used = features.len();
        for panel in &mut self.panels {
            *panel = Panel::empty();
        }
        for (panel, (title, curves)) in self.panels.iter_mut().zip(features) {
            panel.title = Some(title);
            panel.curves = curves;
        }
        for idx in used..self.capacity() {
            self.hide(idx);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(n: usize) -> Vec<(String, Vec<FittedCurve>)> {
        (0..n).map(|i| (format!("f{i}"), Vec::new())).collect()
    }

    #[test]
    fn categorical_hides_last_panel_with_five_columns() {
        let mut fig = Figure::categorical();
        fig.compose(features(5)).unwrap();

        assert_eq!(fig.capacity(), 6);
        let hidden: Vec<usize> = (0..6).filter(|&i| !fig.panels()[i].visible).collect();
        assert_eq!(hidden, vec![5]);
        assert_eq!(fig.panel(0).unwrap().title.as_deref(), Some("f0"));
    }

    #[test]
    fn continuous_hides_last_two_with_seven_columns() {
        let mut fig = Figure::continuous();
        fig.compose(features(7)).unwrap();

        assert_eq!(fig.capacity(), 9);
        let hidden: Vec<usize> = (0..9).filter(|&i| !fig.panels()[i].visible).collect();
        assert_eq!(hidden, vec![7, 8]);
    }

    #[test]
    fn all_leftover_panels_are_hidden() {
        let mut fig = Figure::continuous();
        fig.compose(features(3)).unwrap();
        assert_eq!(fig.visible_panels().count(), 3);
    }

    #[test]
    fn full_grid_hides_nothing() {
        let mut fig = Figure::categorical();
        fig.compose(features(6)).unwrap();
        assert!(fig.panels().iter().all(|p| p.visible));
    }

    #[test]
    fn overflow_is_rejected() {
        let mut fig = Figure::categorical();
        let err = fig.compose(features(7)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn recompose_resets_visibility() {
        let mut fig = Figure::categorical();
        fig.compose(features(2)).unwrap();
        fig.compose(features(6)).unwrap();
        assert_eq!(fig.visible_panels().count(), 6);
    }
}
