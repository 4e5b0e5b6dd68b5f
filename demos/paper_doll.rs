//! Paper doll demo: stacks the given layer images and writes the result.
//!
//! Run with: cargo run --example paper_doll -- out.png body.png shirt.png hat.svg
//!
//! The doll is drawn twice: once at its natural size, then moved to the
//! right and stretched to double height, to show all layers following the
//! widget's geometry.

use texture_stack::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(output) = args.next() else {
        eprintln!("usage: paper_doll OUTPUT.png LAYER [LAYER...]");
        std::process::exit(2);
    };
    let layers: Vec<String> = args.collect();
    if layers.is_empty() {
        eprintln!("usage: paper_doll OUTPUT.png LAYER [LAYER...]");
        std::process::exit(2);
    }

    let mut doll = image_stack(layers)?;
    let natural = doll.natural_size();
    log::info!(
        "Stacked {} layers, natural size {}x{}",
        doll.len(),
        natural.width,
        natural.height
    );

    let mut surface = RasterSurface::new(
        (natural.width * 2.0).ceil() as u32,
        (natural.height * 2.0).ceil() as u32,
    )
    .clear_color(Color::rgb(0.1, 0.1, 0.15));

    doll.on_geometry_changed(|rect| log::info!("Doll moved to {:?}", rect));
    doll.render_if_needed(&mut surface);

    doll.set_bounds(Rect::new(
        natural.width,
        0.0,
        natural.width,
        natural.height * 2.0,
    ));
    doll.render_if_needed(&mut surface);

    surface.save(&output)?;
    log::info!("Wrote {}", output);
    Ok(())
}
