//! A [`TextureStack`] built from image paths instead of textures.
//!
//! Each distinct source is loaded once, the first time it appears, and
//! kept for the widget's lifetime. A new list is fully resolved before it
//! replaces the current one, so a bad path never leaves a partial stack
//! on screen.

use std::collections::HashMap;

use crate::error::{Result, StackError};
use crate::image_loader::{FileImageLoader, ImageLoader};
use crate::invalidation::{ChangeFlags, WidgetId};
use crate::layout::{Constraints, Size};
use crate::renderer::{DrawCommand, DrawSurface};
use crate::texture::Texture;

use super::image::{ImageSource, LayerSource};
use super::texture_stack::{LayerStack, StackConfig, TextureStack};
use super::widget::{Rect, Widget};

pub struct ImageStack<L: ImageLoader = FileImageLoader> {
    stack: TextureStack,
    paths: Vec<ImageSource>,
    loader: L,
    textures: HashMap<ImageSource, Texture>,
}

impl ImageStack<FileImageLoader> {
    /// Load every path from disk and stack the results.
    pub fn new<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<ImageSource>,
    {
        Self::with_loader(FileImageLoader::default(), paths)
    }
}

impl<L: ImageLoader> ImageStack<L> {
    pub fn with_loader<I, P>(loader: L, paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<ImageSource>,
    {
        Self::with_config(loader, paths, StackConfig::default())
    }

    pub fn with_config<I, P>(loader: L, paths: I, config: StackConfig) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<ImageSource>,
    {
        let mut stack = Self {
            stack: TextureStack::with_config(Vec::new(), config),
            paths: Vec::new(),
            loader,
            textures: HashMap::new(),
        };
        stack.set_paths(paths)?;
        Ok(stack)
    }

    pub fn pos(mut self, x: f32, y: f32) -> Self {
        self.stack.set_origin(x, y);
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.stack.set_size(Size::new(width, height));
        self
    }

    pub fn offsets(mut self, offsets: impl IntoIterator<Item = (f32, f32)>) -> Self {
        self.stack.set_offsets(offsets);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.stack.set_visible(visible);
        self
    }

    pub fn paths(&self) -> &[ImageSource] {
        &self.paths
    }

    /// The underlying texture stack.
    pub fn stack(&self) -> &TextureStack {
        &self.stack
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Whether `source` has already been loaded by this widget.
    pub fn is_loaded(&self, source: &ImageSource) -> bool {
        self.textures.contains_key(source)
    }

    /// Replace every layer. Fails with [`StackError::AssetLoad`] if any
    /// path cannot be loaded, keeping the current layers.
    pub fn set_paths<I, P>(&mut self, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: Into<ImageSource>,
    {
        let paths: Vec<ImageSource> = paths.into_iter().map(Into::into).collect();
        let textures = paths
            .iter()
            .map(|path| self.resolve(path))
            .collect::<Result<Vec<_>>>()?;
        self.stack.set_textures(textures);
        self.paths = paths;
        Ok(())
    }

    /// Replace every layer from generic sources. Only image sources are
    /// accepted here.
    pub fn set_layers<I, S>(&mut self, sources: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<LayerSource>,
    {
        let paths = sources
            .into_iter()
            .enumerate()
            .map(|(i, source)| match source.into() {
                LayerSource::Image(path) => Ok(path),
                other => Err(StackError::invalid(format!(
                    "layer {} is a {}, expected an image path",
                    i,
                    other.kind()
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        self.set_paths(paths)
    }

    pub fn insert(&mut self, index: usize, path: impl Into<ImageSource>) -> Result<()> {
        if index > self.paths.len() {
            return Err(StackError::invalid(format!(
                "insert index {} out of range for {} layers",
                index,
                self.paths.len()
            )));
        }
        let path = path.into();
        let texture = self.resolve(&path)?;
        self.stack.insert(index, texture)?;
        self.paths.insert(index, path);
        Ok(())
    }

    pub fn append(&mut self, path: impl Into<ImageSource>) -> Result<()> {
        self.insert(self.paths.len(), path)
    }

    pub fn remove(&mut self, index: usize) -> Result<ImageSource> {
        self.stack.remove(index)?;
        Ok(self.paths.remove(index))
    }

    pub fn pop(&mut self) -> Option<ImageSource> {
        self.stack.pop()?;
        self.paths.pop()
    }

    pub fn replace(&mut self, index: usize, path: impl Into<ImageSource>) -> Result<ImageSource> {
        if index >= self.paths.len() {
            return Err(StackError::invalid(format!(
                "replace index {} out of range for {} layers",
                index,
                self.paths.len()
            )));
        }
        let path = path.into();
        let texture = self.resolve(&path)?;
        self.stack.replace(index, texture)?;
        Ok(std::mem::replace(&mut self.paths[index], path))
    }

    /// Drop all layers. Loaded textures stay cached.
    pub fn clear(&mut self) {
        self.paths.clear();
        self.stack.clear();
    }

    pub fn set_offsets(&mut self, offsets: impl IntoIterator<Item = (f32, f32)>) {
        self.stack.set_offsets(offsets);
    }

    pub fn set_offset(&mut self, index: usize, offset: (f32, f32)) -> Result<()> {
        self.stack.set_offset(index, offset)
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.stack.set_visible(visible);
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.stack.set_bounds(bounds);
    }

    pub fn set_size(&mut self, size: Size) {
        self.stack.set_size(size);
    }

    pub fn on_geometry_changed<F: FnMut(Rect) + 'static>(&mut self, callback: F) {
        self.stack.on_geometry_changed(callback);
    }

    pub fn natural_size(&self) -> Size {
        self.stack.natural_size()
    }

    pub fn commands(&self) -> Vec<DrawCommand> {
        self.stack.commands()
    }

    pub fn render_if_needed(&mut self, surface: &mut dyn DrawSurface) -> bool {
        self.stack.render_if_needed(surface)
    }

    fn resolve(&mut self, path: &ImageSource) -> Result<Texture> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }
        let texture = self.loader.load(path)?;
        self.textures.insert(path.clone(), texture.clone());
        Ok(texture)
    }
}

impl<L: ImageLoader> LayerStack for ImageStack<L> {
    fn resolve_layers(&self) -> &[Texture] {
        self.stack.resolve_layers()
    }

    fn layer_offsets(&self) -> &[(f32, f32)] {
        self.stack.layer_offsets()
    }

    fn layer_bounds(&self) -> Rect {
        self.stack.layer_bounds()
    }
}

impl<L: ImageLoader> Widget for ImageStack<L> {
    fn layout(&mut self, constraints: Constraints) -> Size {
        self.stack.layout(constraints)
    }

    fn paint(&self, surface: &mut dyn DrawSurface) {
        self.stack.paint(surface)
    }

    fn set_origin(&mut self, x: f32, y: f32) {
        self.stack.set_origin(x, y)
    }

    fn bounds(&self) -> Rect {
        self.stack.bounds()
    }

    fn id(&self) -> WidgetId {
        self.stack.id()
    }

    fn mark_dirty(&mut self, flags: ChangeFlags) {
        self.stack.mark_dirty(flags)
    }

    fn needs_layout(&self) -> bool {
        self.stack.needs_layout()
    }

    fn needs_paint(&self) -> bool {
        self.stack.needs_paint()
    }

    fn clear_dirty(&mut self) {
        self.stack.clear_dirty()
    }
}

/// Create an image stack from paths, loading them from disk.
///
/// # Examples
///
/// ```ignore
/// let doll = image_stack(["body.png", "shirt.png", "hat.svg"])?
///     .pos(0.0, 32.0)
///     .offsets([(0.0, 0.0), (0.0, 0.0), (0.0, 16.0)]);
/// ```
pub fn image_stack<I, P>(paths: I) -> Result<ImageStack>
where
    I: IntoIterator<Item = P>,
    P: Into<ImageSource>,
{
    ImageStack::new(paths)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use super::*;
    use crate::renderer::RecordingSurface;
    use crate::widgets::Color;

    /// Loader over a fixed table that counts loads per path.
    struct TableLoader {
        table: HashMap<ImageSource, Texture>,
        loads: Rc<RefCell<Vec<ImageSource>>>,
    }

    impl TableLoader {
        fn new(names: &[&str]) -> (Self, Rc<RefCell<Vec<ImageSource>>>) {
            let table = names
                .iter()
                .map(|name| {
                    (
                        ImageSource::from(*name),
                        Texture::solid(8, 8, Color::WHITE).unwrap(),
                    )
                })
                .collect();
            let loads = Rc::new(RefCell::new(Vec::new()));
            (
                Self {
                    table,
                    loads: Rc::clone(&loads),
                },
                loads,
            )
        }

        fn texture(&self, name: &str) -> Texture {
            self.table[&ImageSource::from(name)].clone()
        }
    }

    impl ImageLoader for TableLoader {
        fn load(&self, source: &ImageSource) -> Result<Texture> {
            self.loads.borrow_mut().push(source.clone());
            self.table
                .get(source)
                .cloned()
                .ok_or_else(|| StackError::asset_load(source, "not in table"))
        }
    }

    #[test]
    fn test_paths_render_like_their_textures() {
        let (loader, _) = TableLoader::new(&["body.png", "shirt.png"]);
        let expected = vec![loader.texture("body.png"), loader.texture("shirt.png")];
        let stack = ImageStack::with_loader(loader, ["body.png", "shirt.png"])
            .unwrap()
            .size(20.0, 20.0);

        let mut surface = RecordingSurface::new();
        stack.paint(&mut surface);
        let reference = TextureStack::new(expected).size(20.0, 20.0);
        assert_eq!(surface.take(), reference.commands());
    }

    #[test]
    fn test_each_path_loaded_once() {
        let (loader, loads) = TableLoader::new(&["body.png", "hat.png"]);
        let mut stack =
            ImageStack::with_loader(loader, ["body.png", "body.png", "hat.png"]).unwrap();
        stack.set_paths(["hat.png", "body.png"]).unwrap();
        stack.append("hat.png").unwrap();

        assert_eq!(loads.borrow().len(), 2);
        assert_eq!(stack.len(), 3);
        assert!(stack.is_loaded(&ImageSource::from("hat.png")));
    }

    #[test]
    fn test_bad_path_keeps_previous_stack() {
        let (loader, _) = TableLoader::new(&["body.png"]);
        let mut stack = ImageStack::with_loader(loader, ["body.png"]).unwrap();
        stack.clear_dirty();

        let err = stack.set_paths(["body.png", "missing.png"]).unwrap_err();
        assert!(matches!(err, StackError::AssetLoad { .. }));
        assert_eq!(stack.paths(), &[ImageSource::from("body.png")]);
        assert_eq!(stack.stack().len(), 1);
        assert!(!stack.needs_paint());
    }

    #[test]
    fn test_construction_fails_on_bad_path() {
        let (loader, _) = TableLoader::new(&["body.png"]);
        let result = ImageStack::with_loader(loader, ["nope.png"]);
        assert!(matches!(result, Err(StackError::AssetLoad { .. })));
    }

    #[test]
    fn test_set_layers_rejects_textures() {
        let (loader, _) = TableLoader::new(&["body.png"]);
        let stray = loader.texture("body.png");
        let mut stack = ImageStack::with_loader(loader, ["body.png"]).unwrap();
        let err = stack
            .set_layers(vec![LayerSource::from("body.png"), LayerSource::from(stray)])
            .unwrap_err();
        assert!(matches!(err, StackError::InvalidInput(_)));
    }

    #[test]
    fn test_path_list_editing_tracks_textures() {
        let (loader, _) = TableLoader::new(&["a.png", "b.png", "c.png"]);
        let (a, b, c) = (
            loader.texture("a.png"),
            loader.texture("b.png"),
            loader.texture("c.png"),
        );
        let mut stack = ImageStack::with_loader(loader, ["a.png"]).unwrap();
        stack.append("c.png").unwrap();
        stack.insert(1, "b.png").unwrap();
        assert_eq!(stack.resolve_layers(), &[a.clone(), b.clone(), c.clone()]);

        assert_eq!(stack.replace(0, "c.png").unwrap(), ImageSource::from("a.png"));
        assert_eq!(stack.remove(1).unwrap(), ImageSource::from("b.png"));
        assert_eq!(stack.resolve_layers(), &[c.clone(), c.clone()]);
        assert_eq!(stack.pop(), Some(ImageSource::from("c.png")));

        stack.clear();
        assert!(stack.is_empty());
        assert!(stack.resolve_layers().is_empty());
        assert!(stack.is_loaded(&ImageSource::from("a.png")));
    }

    #[test]
    fn test_failed_insert_changes_nothing() {
        let (loader, _) = TableLoader::new(&["a.png"]);
        let mut stack = ImageStack::with_loader(loader, ["a.png"]).unwrap();
        assert!(matches!(
            stack.insert(0, "ghost.png"),
            Err(StackError::AssetLoad { .. })
        ));
        assert!(matches!(
            stack.insert(3, "a.png"),
            Err(StackError::InvalidInput(_))
        ));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.stack().len(), 1);
    }

    #[test]
    fn test_replace_out_of_range_loads_nothing() {
        let (loader, loads) = TableLoader::new(&["a.png", "hat.png"]);
        let mut stack = ImageStack::with_loader(loader, ["a.png"]).unwrap();
        assert!(matches!(
            stack.replace(1, "hat.png"),
            Err(StackError::InvalidInput(_))
        ));
        assert!(!stack.is_loaded(&ImageSource::from("hat.png")));
        assert_eq!(loads.borrow().len(), 1);
        assert_eq!(stack.paths(), &[ImageSource::from("a.png")]);
    }
}
