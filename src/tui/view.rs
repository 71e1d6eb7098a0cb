//! Terminal implementation of the render boundary.
//!
//! [`TerminalView`] keeps the world layout of the visible tree plus a camera
//! (zoom and the world point shown at the viewport center). Painting happens
//! later in [`crate::tui::ui`], which projects through [`TerminalView::project`].

use crate::config::UiConfig;
use crate::mindmap::MindMap;
use crate::mindmap::command::View;
use crate::tui::map_layout::MapLayout;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub min_scale: f64,
    pub max_scale: f64,
    pub max_fit_scale: f64,
    pub max_label_width: u16,
}

impl From<&UiConfig> for ViewSettings {
    fn from(ui: &UiConfig) -> Self {
        Self {
            min_scale: ui.min_scale,
            max_scale: ui.max_scale,
            max_fit_scale: ui.max_fit_scale,
            max_label_width: ui.max_label_width,
        }
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::from(&UiConfig::default())
    }
}

#[derive(Debug, Clone)]
pub struct TerminalView {
    settings: ViewSettings,
    layout: MapLayout,
    scale: f64,
    /// World point at the middle of the viewport
    center: (f64, f64),
    viewport: (u16, u16),
    /// A fit arrived before the viewport size was known
    pending_fit: bool,
    renders: usize,
}

impl TerminalView {
    /// A view for a map area of `viewport` (width, height) cells. A zero size
    /// defers fitting until [`TerminalView::set_viewport`].
    pub fn new(settings: ViewSettings, viewport: (u16, u16)) -> Self {
        Self {
            settings,
            layout: MapLayout::default(),
            scale: 1.0,
            center: (0.0, 0.0),
            viewport,
            pending_fit: false,
            renders: 0,
        }
    }

    pub fn layout(&self) -> &MapLayout {
        &self.layout
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn viewport(&self) -> (u16, u16) {
        self.viewport
    }

    /// How many times the tree was laid out since mounting
    pub fn render_count(&self) -> usize {
        self.renders
    }

    /// Track the map area's size. Runs a deferred fit once the size is known.
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        if self.viewport == (width, height) {
            return;
        }
        self.viewport = (width, height);
        if self.pending_fit {
            self.fit();
        }
    }

    /// Move the camera by screen cells.
    pub fn pan_by(&mut self, dx: i32, dy: i32) {
        self.center.0 += dx as f64 / self.scale;
        self.center.1 += dy as f64 / self.scale;
    }

    /// Screen cell (relative to the map area) of a world position.
    pub fn project(&self, x: f64, y: f64) -> (i32, i32) {
        let (width, height) = self.viewport;
        let sx = (x - self.center.0) * self.scale + width as f64 / 2.0;
        let sy = (y - self.center.1) * self.scale + height as f64 / 2.0;
        (sx.floor() as i32, sy.floor() as i32)
    }

    /// Cells a node label of `width` occupies at the current zoom.
    ///
    /// Zooming out squeezes columns together, so labels shrink with them.
    pub fn label_cells(&self, width: u16) -> u16 {
        if self.scale >= 1.0 {
            width
        } else {
            ((width as f64 * self.scale).floor() as u16).clamp(1, width.max(1))
        }
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }
}

impl View for TerminalView {
    fn render_data(&mut self, map: &MindMap) {
        self.layout = MapLayout::compute(map, self.settings.max_label_width);
        self.renders += 1;
        trace!(
            nodes = self.layout.nodes.len(),
            width = self.layout.width,
            height = self.layout.height,
            "laid out mind map"
        );
    }

    fn rescale(&mut self, factor: f64) {
        self.scale = (self.scale * factor)
            .max(self.settings.min_scale)
            .min(self.settings.max_scale);
    }

    fn fit(&mut self) {
        let (width, height) = self.viewport;
        if width == 0 || height == 0 {
            self.pending_fit = true;
            return;
        }
        self.pending_fit = false;
        if self.layout.is_empty() {
            return;
        }

        let world_w = self.layout.width.max(1) as f64;
        let world_h = self.layout.height.max(1) as f64;
        let fitted = (width as f64 / world_w).min(height as f64 / world_h);
        self.scale = fitted
            .min(self.settings.max_fit_scale)
            .max(self.settings.min_scale);
        self.center = (world_w / 2.0, world_h / 2.0);
    }

    fn destroy(&mut self) {
        self.layout = MapLayout::default();
        self.pending_fit = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mindmap::command::{Command, dispatch};
    use crate::mindmap::tests::sample_map;

    fn mounted(viewport: (u16, u16)) -> TerminalView {
        let mut view = TerminalView::new(ViewSettings::default(), viewport);
        view.render_data(&sample_map());
        view.fit();
        view
    }

    #[test]
    fn test_small_tree_fits_at_max_fit_scale() {
        let view = mounted((120, 40));
        assert_eq!(view.scale(), 1.0);
        // sample map is 30x3
        assert_eq!(view.center(), (15.0, 1.5));
        assert_eq!(view.project(0.0, 0.0), (45, 18));
    }

    #[test]
    fn test_large_tree_shrinks_to_fit() {
        let view = mounted((15, 40));
        assert_eq!(view.scale(), 0.5);
        assert_eq!(view.project(0.0, 0.0).0, 0);
        assert_eq!(view.label_cells(6), 3);
    }

    #[test]
    fn test_fit_respects_min_scale() {
        let view = mounted((1, 1));
        assert_eq!(view.scale(), ViewSettings::default().min_scale);
    }

    #[test]
    fn test_fit_waits_for_viewport() {
        let mut view = mounted((0, 0));
        assert_eq!(view.scale(), 1.0);
        assert_eq!(view.center(), (0.0, 0.0));

        view.set_viewport(15, 40);
        assert_eq!(view.scale(), 0.5);
        assert_eq!(view.center(), (15.0, 1.5));
    }

    #[test]
    fn test_rescale_keeps_center_and_clamps() {
        let mut view = mounted((120, 40));
        view.pan_by(4, 0);
        let center = view.center();

        view.rescale(2.0);
        assert_eq!(view.scale(), 2.0);
        assert_eq!(view.center(), center);

        for _ in 0..10 {
            view.rescale(2.0);
        }
        assert_eq!(view.scale(), ViewSettings::default().max_scale);
        for _ in 0..40 {
            view.rescale(0.5);
        }
        assert_eq!(view.scale(), ViewSettings::default().min_scale);
    }

    #[test]
    fn test_pan_moves_by_screen_cells() {
        let mut view = mounted((120, 40));
        view.rescale(2.0);
        let (x, y) = view.center();
        view.pan_by(4, -2);
        assert_eq!(view.center(), (x + 2.0, y - 1.0));
    }

    #[test]
    fn test_fold_command_relayouts_and_refits() {
        let mut map = sample_map();
        let mut view = mounted((120, 40));
        view.rescale(3.0);

        assert!(dispatch(Command::FoldAll, Some(&mut map), &mut view));
        assert_eq!(view.layout().nodes.len(), 1);
        assert_eq!(view.scale(), 1.0);
        assert_eq!(view.render_count(), 2);
    }

    #[test]
    fn test_destroy_clears_layout() {
        let mut view = mounted((120, 40));
        view.destroy();
        assert!(view.layout().is_empty());
    }
}
