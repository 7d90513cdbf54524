//! View Renderer.
//!
//! Rendering is split in two: [`DisplayModel::build`] is a pure function from
//! a collection to display rows, and a [`Surface`] applies those rows to
//! whatever shows them. [`ListView::render`] always clears the surface and
//! appends every row again; there is no diffing.

use serde::Serialize;

use crate::models::{Ingredient, Recipe};
use crate::sync::Mirror;

/// Entities that know which of their fields are shown in a list
pub trait Displayable {
    fn display_fields(&self) -> Vec<DisplayField>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayField {
    pub label: &'static str,
    pub value: String,
}

impl DisplayField {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub fields: Vec<DisplayField>,
}

impl DisplayRow {
    /// Field values joined as `first: second: ...`
    pub fn text(&self) -> String {
        self.fields
            .iter()
            .map(|f| f.value.as_str())
            .collect::<Vec<_>>()
            .join(": ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayModel {
    pub rows: Vec<DisplayRow>,
}

impl DisplayModel {
    /// One row per entity, in collection order
    pub fn build<R: Displayable>(items: &[R]) -> Self {
        Self {
            rows: items
                .iter()
                .map(|item| DisplayRow {
                    fields: item.display_fields(),
                })
                .collect(),
        }
    }
}

impl Displayable for Recipe {
    fn display_fields(&self) -> Vec<DisplayField> {
        vec![
            DisplayField::new("name", &self.name),
            DisplayField::new("instructions", &self.instructions),
        ]
    }
}

impl Displayable for Ingredient {
    fn display_fields(&self) -> Vec<DisplayField> {
        vec![DisplayField::new("name", &self.name)]
    }
}

/// Whatever finally shows the rows
pub trait Surface {
    fn clear(&mut self);
    fn append(&mut self, row: &DisplayRow);
}

/// Surface that keeps one text line per row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextSurface {
    lines: Vec<String>,
}

impl TextSurface {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Surface for TextSurface {
    fn clear(&mut self) {
        self.lines.clear();
    }

    fn append(&mut self, row: &DisplayRow) {
        self.lines.push(row.text());
    }
}

#[derive(Debug, Default)]
pub struct ListView<S: Surface> {
    surface: S,
}

impl<S: Surface> ListView<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn render<R: Displayable>(&mut self, items: &[R]) -> DisplayModel {
        let model = DisplayModel::build(items);
        self.surface.clear();
        for row in &model.rows {
            self.surface.append(row);
        }
        model
    }

    pub fn render_mirror<R: Displayable + Clone>(&mut self, mirror: &Mirror<R>) -> DisplayModel {
        self.render(&mirror.items())
    }
}
