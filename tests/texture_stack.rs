use texture_stack::prelude::*;

const RED: Color = Color::rgb(1.0, 0.0, 0.0);
const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

fn solid(color: Color) -> Texture {
    Texture::solid(4, 4, color).unwrap()
}

/// A 2x1 texture: transparent on the left, opaque green on the right.
fn half_green() -> Texture {
    Texture::from_raw(2, 1, vec![0, 0, 0, 0, 0, 255, 0, 255]).unwrap()
}

fn render(stack: &TextureStack, width: u32, height: u32) -> image::RgbaImage {
    let mut surface = RasterSurface::new(width, height);
    stack.paint(&mut surface);
    surface.into_image()
}

#[test]
fn test_top_layer_occludes_lower_layers() {
    let stack = TextureStack::new(vec![solid(RED), solid(BLUE)]).size(8.0, 8.0);
    let img = render(&stack, 8, 8);
    assert!(img.pixels().all(|p| p.0 == [0, 0, 255, 255]));
}

#[test]
fn test_transparent_regions_show_lower_layers() {
    let stack = TextureStack::new(vec![solid(RED), half_green()]).size(4.0, 2.0);
    let img = render(&stack, 4, 2);
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(3, 1).0, [0, 255, 0, 255]);
}

#[test]
fn test_every_layer_covers_the_box_exactly() {
    let stack = TextureStack::new(vec![solid(RED), solid(GREEN)])
        .pos(2.0, 3.0)
        .size(5.0, 4.0);
    let img = render(&stack, 10, 10);
    for (x, y, p) in img.enumerate_pixels() {
        let inside = (2..7).contains(&x) && (3..7).contains(&y);
        let expected = if inside { [0, 255, 0, 255] } else { [0, 0, 0, 0] };
        assert_eq!(p.0, expected, "pixel ({x}, {y})");
    }
}

#[test]
fn test_rerender_is_pixel_identical() {
    let glass = solid(Color::rgba(0.0, 0.0, 1.0, 0.5));
    let stack = TextureStack::new(vec![solid(RED), half_green(), glass])
        .pos(1.0, 1.0)
        .size(6.0, 5.0);
    let mut surface = RasterSurface::new(8, 8).clear_color(Color::WHITE);

    stack.paint(&mut surface);
    let first = surface.image().clone();
    surface.clear();
    stack.paint(&mut surface);
    assert_eq!(surface.image(), &first);
}

#[test]
fn test_resize_leaves_no_stale_geometry() {
    let mut stack = TextureStack::new(vec![solid(RED), solid(BLUE)]).size(2.0, 2.0);
    let mut surface = RecordingSurface::new();
    stack.render_if_needed(&mut surface);
    surface.clear();

    stack.set_bounds(Rect::new(10.0, 10.0, 30.0, 20.0));
    assert!(stack.render_if_needed(&mut surface));
    let commands = surface.commands();
    assert_eq!(commands.len(), 2);
    assert!(commands
        .iter()
        .all(|c| c.rect == Rect::new(10.0, 10.0, 30.0, 20.0)));
}

#[test]
fn test_replaced_layers_are_not_merged() {
    let mut stack =
        TextureStack::new(vec![solid(RED), solid(GREEN), solid(BLUE)]).size(4.0, 4.0);
    let replacement = vec![solid(BLUE), solid(RED)];
    stack.set_textures(replacement.clone());

    let mut surface = RecordingSurface::new();
    stack.paint(&mut surface);
    let drawn: Vec<Texture> = surface.take().into_iter().map(|c| c.texture).collect();
    assert_eq!(drawn, replacement);

    let img = render(&stack, 4, 4);
    assert!(img.pixels().all(|p| p.0 == [255, 0, 0, 255]));
}

#[test]
fn test_widget_trait_object() {
    let mut widget: Box<dyn Widget> = Box::new(TextureStack::new(vec![solid(RED)]));
    let size = widget.layout(Constraints::tight(Size::new(3.0, 3.0)));
    widget.set_origin(1.0, 1.0);
    assert_eq!(size, Size::new(3.0, 3.0));
    assert_eq!(widget.bounds(), Rect::new(1.0, 1.0, 3.0, 3.0));

    let mut surface = RecordingSurface::new();
    widget.paint(&mut surface);
    assert_eq!(surface.commands().len(), 1);
}

#[test]
fn test_batch_composites_stacks_at_its_position() {
    let body = TextureStack::new(vec![solid(RED)]).size(4.0, 4.0);
    let hat = TextureStack::new(vec![solid(BLUE)]).pos(2.0, 0.0).size(2.0, 2.0);
    let mut batch = StackBatch::new(4.0, 4.0).pos(3.0, 3.0).child(body).child(hat);

    let mut surface = RasterSurface::new(8, 8);
    assert!(batch.render_if_needed(&mut surface));
    let img = surface.image();
    assert_eq!(img.get_pixel(3, 3).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(5, 3).0, [0, 0, 255, 255]);
    assert_eq!(img.get_pixel(6, 6).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(2, 2).0, [0, 0, 0, 0]);
    assert_eq!(img.get_pixel(7, 3).0, [0, 0, 0, 0]);
}
