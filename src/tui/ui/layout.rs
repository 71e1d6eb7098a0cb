//! Dynamic layout builder for the screen
//!
//! Sections can be shown or hidden per frame (the status bar is optional).

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use std::collections::HashMap;

/// Section identifiers for layout areas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Title,
    Map,
    Status,
}

/// A dynamic layout that maps section IDs to their rendered areas
pub struct DynamicLayout {
    areas: HashMap<Section, Rect>,
}

impl DynamicLayout {
    /// Start building a vertical layout
    pub fn vertical(area: Rect) -> DynamicLayoutBuilder {
        DynamicLayoutBuilder::new(area, Direction::Vertical)
    }

    /// Get the area for a section by ID
    pub fn get(&self, id: Section) -> Option<Rect> {
        self.areas.get(&id).copied()
    }

    /// Area of a section that is always added; empty if it was not.
    pub fn require(&self, id: Section) -> Rect {
        self.get(id).unwrap_or_default()
    }
}

/// Builder for creating dynamic layouts
pub struct DynamicLayoutBuilder {
    area: Rect,
    direction: Direction,
    sections: Vec<(Section, Constraint)>,
}

impl DynamicLayoutBuilder {
    fn new(area: Rect, direction: Direction) -> Self {
        Self {
            area,
            direction,
            sections: Vec::new(),
        }
    }

    /// Add a section that is always visible
    pub fn section(self, id: Section, constraint: Constraint) -> Self {
        self.section_if(true, id, constraint)
    }

    /// Add a section that is conditionally visible
    pub fn section_if(mut self, visible: bool, id: Section, constraint: Constraint) -> Self {
        if visible {
            self.sections.push((id, constraint));
        }
        self
    }

    pub fn build(self) -> DynamicLayout {
        let chunks = Layout::default()
            .direction(self.direction)
            .constraints(self.sections.iter().map(|(_, constraint)| *constraint))
            .split(self.area);

        let areas = self
            .sections
            .iter()
            .zip(chunks.iter())
            .map(|((id, _), rect)| (*id, *rect))
            .collect();

        DynamicLayout { areas }
    }
}
