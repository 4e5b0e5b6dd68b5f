//! Batch widget that renders several layer stacks into one offscreen
//! canvas and draws that canvas as a single texture.
//!
//! Children are positioned in the batch's local coordinates. Moving the
//! batch only replays the cached canvas at the new position; the canvas is
//! redrawn when a child needs paint, a child is added or removed, or the
//! batch is resized.

use std::any::Any;

use crate::invalidation::{ChangeFlags, WidgetId};
use crate::layout::{Constraints, Size};
use crate::renderer::{DrawSurface, RasterSurface};
use crate::texture::Texture;

use super::texture_stack::LayerStack;
use super::widget::{Rect, Widget};

/// A layer stack that can live inside a [`StackBatch`].
pub trait BatchChild: LayerStack + Widget {
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: LayerStack + Widget + Any> BatchChild for T {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub struct StackBatch {
    widget_id: WidgetId,
    dirty_flags: ChangeFlags,
    bounds: Rect,
    children: Vec<Box<dyn BatchChild>>,
    canvas: Option<RasterSurface>,
    cached: Option<Texture>,
    canvas_stale: bool,
}

impl StackBatch {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            widget_id: WidgetId::next(),
            dirty_flags: ChangeFlags::NEEDS_LAYOUT | ChangeFlags::NEEDS_PAINT,
            bounds: Rect::new(0.0, 0.0, width, height),
            children: Vec::new(),
            canvas: None,
            cached: None,
            canvas_stale: true,
        }
    }

    pub fn pos(mut self, x: f32, y: f32) -> Self {
        self.set_origin(x, y);
        self
    }

    /// Add a child on top. Builder form of [`StackBatch::push`].
    pub fn child(mut self, child: impl BatchChild + 'static) -> Self {
        self.push(child);
        self
    }

    /// Insert a child at `index` in draw order (0 is drawn first). Indices
    /// past the end are clamped, so the child goes on top.
    pub fn add(&mut self, index: usize, child: impl BatchChild + 'static) -> WidgetId {
        let index = index.min(self.children.len());
        let id = child.id();
        self.children.insert(index, Box::new(child));
        log::debug!("Batch {:?}: added stack {:?} at {}", self.widget_id, id, index);
        self.invalidate_canvas();
        id
    }

    pub fn push(&mut self, child: impl BatchChild + 'static) -> WidgetId {
        self.add(self.children.len(), child)
    }

    /// Remove the child with `id`. Ids that are not children are ignored.
    pub fn remove(&mut self, id: WidgetId) -> Option<Box<dyn BatchChild>> {
        let index = self.children.iter().position(|child| child.id() == id)?;
        let child = self.children.remove(index);
        log::debug!("Batch {:?}: removed stack {:?}", self.widget_id, id);
        self.invalidate_canvas();
        Some(child)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Child ids in draw order.
    pub fn child_ids(&self) -> Vec<WidgetId> {
        self.children.iter().map(|child| child.id()).collect()
    }

    pub fn get(&self, id: WidgetId) -> Option<&dyn BatchChild> {
        self.children
            .iter()
            .find(|child| child.id() == id)
            .map(|child| &**child)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut (dyn BatchChild + 'static)> {
        self.children
            .iter_mut()
            .find(|child| child.id() == id)
            .map(|child| &mut **child)
    }

    /// Mutable access to a child as its concrete type.
    pub fn get_as_mut<T: Any>(&mut self, id: WidgetId) -> Option<&mut T> {
        self.get_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    /// Topmost child whose box contains the local point.
    pub fn child_at(&self, x: f32, y: f32) -> Option<WidgetId> {
        self.children
            .iter()
            .rev()
            .find(|child| child.bounds().contains(x, y))
            .map(|child| child.id())
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        if bounds == self.bounds {
            return;
        }
        if bounds.size() != self.bounds.size() {
            self.canvas_stale = true;
        }
        self.bounds = bounds;
        log::debug!("Batch {:?}: geometry changed to {:?}", self.widget_id, bounds);
        self.mark_dirty(ChangeFlags::NEEDS_PAINT);
    }

    pub fn set_size(&mut self, size: Size) {
        self.set_bounds(Rect::from_size(size).offset(self.bounds.x, self.bounds.y));
    }

    /// The composited canvas, if one has been drawn.
    pub fn texture(&self) -> Option<&Texture> {
        self.cached.as_ref()
    }

    /// Whether the canvas no longer matches the children.
    pub fn is_stale(&self) -> bool {
        self.canvas_stale || self.children.iter().any(|child| child.needs_paint())
    }

    /// Redraw the canvas if it is stale. Returns whether it was redrawn.
    pub fn refresh(&mut self) -> bool {
        if !self.is_stale() {
            return false;
        }
        self.redraw();
        true
    }

    /// Refresh and paint only if something changed since the last render.
    pub fn render_if_needed(&mut self, surface: &mut dyn DrawSurface) -> bool {
        if !self.needs_paint() {
            return false;
        }
        self.refresh();
        self.paint(surface);
        self.clear_dirty();
        true
    }

    fn invalidate_canvas(&mut self) {
        self.canvas_stale = true;
        self.mark_dirty(ChangeFlags::NEEDS_PAINT);
    }

    fn redraw(&mut self) {
        let width = self.bounds.width.max(0.0).ceil() as u32;
        let height = self.bounds.height.max(0.0).ceil() as u32;
        self.canvas_stale = false;

        if width == 0 || height == 0 {
            self.canvas = None;
            self.cached = None;
            for child in &mut self.children {
                child.clear_dirty();
            }
            return;
        }

        let mut canvas = match self.canvas.take() {
            Some(canvas) if canvas.width() == width && canvas.height() == height => canvas,
            _ => RasterSurface::new(width, height),
        };
        canvas.clear();

        let area = Rect::from_size(self.bounds.size());
        for child in &mut self.children {
            if child.needs_layout() {
                child.layout(Constraints::unbounded());
            }
            if child.bounds().intersects(&area) {
                child.paint(&mut canvas);
            }
            child.clear_dirty();
        }
        log::debug!(
            "Batch {:?}: redrew {} stacks into {}x{}",
            self.widget_id,
            self.children.len(),
            width,
            height
        );

        self.cached = Texture::from_rgba(canvas.image().clone()).ok();
        self.canvas = Some(canvas);
    }
}

// StackBatch keeps its own dirty flag methods because paint state also
// depends on its children.
impl Widget for StackBatch {
    fn layout(&mut self, constraints: Constraints) -> Size {
        let size = constraints.constrain(self.bounds.size());
        self.set_size(size);
        self.refresh();
        self.dirty_flags.remove(ChangeFlags::NEEDS_LAYOUT);
        size
    }

    /// Draws the last refreshed canvas at the batch's box. Call
    /// [`Widget::layout`] or [`StackBatch::refresh`] first to pick up child
    /// changes.
    fn paint(&self, surface: &mut dyn DrawSurface) {
        if let Some(texture) = &self.cached {
            surface.draw_stretched(texture, self.bounds);
        }
    }

    fn set_origin(&mut self, x: f32, y: f32) {
        self.set_bounds(Rect::new(x, y, self.bounds.width, self.bounds.height));
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn id(&self) -> WidgetId {
        self.widget_id
    }

    fn mark_dirty(&mut self, flags: ChangeFlags) {
        self.dirty_flags |= flags;
    }

    fn needs_layout(&self) -> bool {
        self.dirty_flags.contains(ChangeFlags::NEEDS_LAYOUT)
    }

    fn needs_paint(&self) -> bool {
        self.dirty_flags.contains(ChangeFlags::NEEDS_PAINT) || self.is_stale()
    }

    fn clear_dirty(&mut self) {
        self.dirty_flags = ChangeFlags::empty();
    }
}
