//! Several textures superimposed on one another, drawn as one sprite.
//!
//! In 2D games where characters can wear different clothes or hold
//! different equipment, their graphics are often composed of several
//! images layered on one another. [`TextureStack`] keeps such a layer list
//! in order and stretches every layer over its bounding box, first layer
//! at the bottom, last layer on top.

use crate::error::{Result, StackError};
use crate::invalidation::{ChangeFlags, WidgetId};
use crate::layout::{Constraints, Size};
use crate::renderer::{DrawCommand, DrawSurface};
use crate::texture::Texture;

use super::image::LayerSource;
use super::impl_dirty_flags;
use super::widget::{Rect, Widget};

/// Called with the new bounding box after the widget moves or resizes.
pub type GeometryCallback = Box<dyn FnMut(Rect)>;

/// Anything that can hand out an ordered list of drawable layers.
///
/// Both stack widgets implement this and share [`paint_layers`] for the
/// actual drawing.
pub trait LayerStack {
    /// Layers in draw order, bottom first.
    fn resolve_layers(&self) -> &[Texture];
    /// Per-layer offsets, same length as [`LayerStack::resolve_layers`].
    fn layer_offsets(&self) -> &[(f32, f32)];
    /// Box every layer is stretched over.
    fn layer_bounds(&self) -> Rect;
}

/// Draw commands for a stack: one stretched blit per layer, in order.
pub fn layer_commands<S: LayerStack + ?Sized>(stack: &S) -> Vec<DrawCommand> {
    let bounds = stack.layer_bounds();
    stack
        .resolve_layers()
        .iter()
        .zip(stack.layer_offsets())
        .map(|(texture, &(dx, dy))| {
            DrawCommand::stretched(texture.clone(), bounds.offset(dx, dy))
        })
        .collect()
}

/// Draw every layer of `stack` stretched over its bounds, bottom first.
pub fn paint_layers<S: LayerStack + ?Sized>(stack: &S, surface: &mut dyn DrawSurface) {
    let bounds = stack.layer_bounds();
    for (texture, &(dx, dy)) in stack.resolve_layers().iter().zip(stack.layer_offsets()) {
        surface.draw_stretched(texture, bounds.offset(dx, dy));
    }
}

/// Placement and visibility for a newly built stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackConfig {
    pub x: f32,
    pub y: f32,
    /// Fixed size. `None` sizes the widget to its layers' natural size.
    pub size: Option<Size>,
    /// Whether `paint` draws anything. Commands stay available either way.
    pub visible: bool,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            size: None,
            visible: true,
        }
    }
}

impl StackConfig {
    pub fn pos(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

pub struct TextureStack {
    widget_id: WidgetId,
    dirty_flags: ChangeFlags,
    textures: Vec<Texture>,
    offsets: Vec<(f32, f32)>,
    bounds: Rect,
    fixed_size: Option<Size>,
    /// Constraints of the last host layout, re-applied when layers change.
    constraints: Option<Constraints>,
    visible: bool,
    geometry_listeners: Vec<GeometryCallback>,
}

impl TextureStack {
    pub fn new(textures: impl IntoIterator<Item = Texture>) -> Self {
        Self::with_config(textures, StackConfig::default())
    }

    pub fn with_config(textures: impl IntoIterator<Item = Texture>, config: StackConfig) -> Self {
        let mut stack = Self {
            widget_id: WidgetId::next(),
            dirty_flags: ChangeFlags::NEEDS_LAYOUT | ChangeFlags::NEEDS_PAINT,
            textures: textures.into_iter().collect(),
            offsets: Vec::new(),
            bounds: Rect::new(config.x, config.y, 0.0, 0.0),
            fixed_size: config.size,
            constraints: None,
            visible: config.visible,
            geometry_listeners: Vec::new(),
        };
        stack.sync_offsets();
        let size = stack.preferred_size();
        stack.bounds.width = size.width;
        stack.bounds.height = size.height;
        stack
    }

    /// Build from generic layer sources. Fails if any source is not a
    /// ready texture.
    pub fn from_layers<I, S>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<LayerSource>,
    {
        Ok(Self::new(Self::textures_only(sources)?))
    }

    /// Move the widget. Builder form of [`TextureStack::set_origin`].
    pub fn pos(mut self, x: f32, y: f32) -> Self {
        self.set_bounds(Rect::new(x, y, self.bounds.width, self.bounds.height));
        self
    }

    /// Fix the widget size. Builder form of [`TextureStack::set_size`].
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.set_size(Size::new(width, height));
        self
    }

    pub fn offsets(mut self, offsets: impl IntoIterator<Item = (f32, f32)>) -> Self {
        self.set_offsets(offsets);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.set_visible(visible);
        self
    }

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn get_offsets(&self) -> &[(f32, f32)] {
        &self.offsets
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Replace every layer. On error the current layers are kept.
    pub fn set_layers<I, S>(&mut self, sources: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<LayerSource>,
    {
        let textures = Self::textures_only(sources)?;
        self.set_textures(textures);
        Ok(())
    }

    /// Replace every layer with already loaded textures.
    pub fn set_textures(&mut self, textures: impl IntoIterator<Item = Texture>) {
        self.textures = textures.into_iter().collect();
        log::debug!(
            "Stack {:?}: replaced layers, now {}",
            self.widget_id,
            self.textures.len()
        );
        self.layers_changed();
    }

    /// Insert a layer at `index`, shifting later layers up. Its offset
    /// starts at zero.
    pub fn insert(&mut self, index: usize, texture: Texture) -> Result<()> {
        if index > self.textures.len() {
            return Err(StackError::invalid(format!(
                "insert index {} out of range for {} layers",
                index,
                self.textures.len()
            )));
        }
        self.textures.insert(index, texture);
        self.offsets.insert(index, (0.0, 0.0));
        self.layers_changed();
        Ok(())
    }

    /// Add a layer on top.
    pub fn append(&mut self, texture: Texture) {
        self.textures.push(texture);
        self.layers_changed();
    }

    /// Remove the layer at `index` together with its offset.
    pub fn remove(&mut self, index: usize) -> Result<Texture> {
        self.check_index(index)?;
        let texture = self.textures.remove(index);
        self.offsets.remove(index);
        self.layers_changed();
        Ok(texture)
    }

    /// Remove and return the top layer.
    pub fn pop(&mut self) -> Option<Texture> {
        let texture = self.textures.pop()?;
        self.offsets.pop();
        self.layers_changed();
        Some(texture)
    }

    /// Swap the layer at `index` for another, keeping its offset.
    pub fn replace(&mut self, index: usize, texture: Texture) -> Result<Texture> {
        self.check_index(index)?;
        let old = std::mem::replace(&mut self.textures[index], texture);
        self.layers_changed();
        Ok(old)
    }

    /// Drop all layers and offsets.
    pub fn clear(&mut self) {
        self.textures.clear();
        self.offsets.clear();
        self.layers_changed();
    }

    /// Set per-layer offsets. Extra entries are dropped; missing ones are
    /// zero.
    pub fn set_offsets(&mut self, offsets: impl IntoIterator<Item = (f32, f32)>) {
        self.offsets = offsets.into_iter().take(self.textures.len()).collect();
        self.layers_changed();
    }

    pub fn set_offset(&mut self, index: usize, offset: (f32, f32)) -> Result<()> {
        self.check_index(index)?;
        self.offsets[index] = offset;
        self.layers_changed();
        Ok(())
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.mark_dirty(ChangeFlags::NEEDS_PAINT);
        }
    }

    /// Move and resize in one step.
    pub fn set_bounds(&mut self, bounds: Rect) {
        if bounds == self.bounds {
            return;
        }
        self.bounds = bounds;
        log::debug!("Stack {:?}: geometry changed to {:?}", self.widget_id, bounds);
        self.mark_dirty(ChangeFlags::NEEDS_PAINT);
        for listener in &mut self.geometry_listeners {
            listener(bounds);
        }
    }

    /// Fix the size. Every layer is stretched to it.
    pub fn set_size(&mut self, size: Size) {
        self.fixed_size = Some(size);
        self.mark_dirty(ChangeFlags::NEEDS_LAYOUT);
        self.set_bounds(Rect::from_size(size).offset(self.bounds.x, self.bounds.y));
    }

    /// Go back to sizing the widget from its layers.
    pub fn unset_size(&mut self) {
        self.fixed_size = None;
        self.apply_preferred_size();
    }

    /// Register a listener for moves and resizes.
    pub fn on_geometry_changed<F: FnMut(Rect) + 'static>(&mut self, callback: F) {
        self.geometry_listeners.push(Box::new(callback));
    }

    /// Smallest size containing every layer at its native size plus its
    /// offset.
    pub fn natural_size(&self) -> Size {
        self.textures
            .iter()
            .zip(&self.offsets)
            .fold(Size::zero(), |acc, (texture, &(dx, dy))| {
                Size::new(
                    acc.width.max(texture.width() as f32 + dx),
                    acc.height.max(texture.height() as f32 + dy),
                )
            })
    }

    /// Commands the next paint would issue, even when hidden.
    pub fn commands(&self) -> Vec<DrawCommand> {
        layer_commands(self)
    }

    /// Paint only if something changed since the last render. Returns
    /// whether anything was painted.
    pub fn render_if_needed(&mut self, surface: &mut dyn DrawSurface) -> bool {
        if !self.needs_paint() {
            return false;
        }
        self.paint(surface);
        self.clear_dirty();
        true
    }

    fn textures_only<I, S>(sources: I) -> Result<Vec<Texture>>
    where
        I: IntoIterator<Item = S>,
        S: Into<LayerSource>,
    {
        sources
            .into_iter()
            .enumerate()
            .map(|(i, source)| match source.into() {
                LayerSource::Texture(texture) => Ok(texture),
                other => Err(StackError::invalid(format!(
                    "layer {} is an {}, expected a texture",
                    i,
                    other.kind()
                ))),
            })
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.textures.len() {
            return Err(StackError::invalid(format!(
                "layer index {} out of range for {} layers",
                index,
                self.textures.len()
            )));
        }
        Ok(())
    }

    fn sync_offsets(&mut self) {
        self.offsets.resize(self.textures.len(), (0.0, 0.0));
    }

    fn preferred_size(&self) -> Size {
        self.fixed_size.unwrap_or_else(|| self.natural_size())
    }

    fn apply_preferred_size(&mut self) {
        let preferred = self.preferred_size();
        let size = self
            .constraints
            .map_or(preferred, |constraints| constraints.constrain(preferred));
        self.set_bounds(Rect::new(self.bounds.x, self.bounds.y, size.width, size.height));
    }

    fn layers_changed(&mut self) {
        self.sync_offsets();
        self.mark_dirty(ChangeFlags::NEEDS_LAYOUT | ChangeFlags::NEEDS_PAINT);
        if self.fixed_size.is_none() {
            self.apply_preferred_size();
        }
    }
}

impl LayerStack for TextureStack {
    fn resolve_layers(&self) -> &[Texture] {
        &self.textures
    }

    fn layer_offsets(&self) -> &[(f32, f32)] {
        &self.offsets
    }

    fn layer_bounds(&self) -> Rect {
        self.bounds
    }
}

impl Widget for TextureStack {
    fn layout(&mut self, constraints: Constraints) -> Size {
        self.constraints = Some(constraints);
        let size = constraints.constrain(self.preferred_size());
        self.set_bounds(Rect::new(self.bounds.x, self.bounds.y, size.width, size.height));
        self.dirty_flags.remove(ChangeFlags::NEEDS_LAYOUT);
        size
    }

    fn paint(&self, surface: &mut dyn DrawSurface) {
        if self.visible {
            paint_layers(self, surface);
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

    impl_dirty_flags!();
}
