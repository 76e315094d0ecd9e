use image::imageops;
use image::{Rgba, RgbaImage};

use crate::state::layer::{ImageLayer, RESIZE_HANDLE_SIZE};
use crate::state::settings::Settings;
use crate::state::stack::LayerStack;

/// Repaint the whole canvas from the current layer stack.
///
/// Clears to the background colour, then paints each layer back to front,
/// scaled to its current rect, followed by its resize grip. Anything outside
/// the canvas is clipped.
pub fn redraw(stack: &LayerStack, settings: &Settings) -> RgbaImage {
    let mut frame = RgbaImage::from_pixel(
        settings.canvas_width,
        settings.canvas_height,
        Rgba(settings.background),
    );

    for layer in stack.iter() {
        draw_layer(&mut frame, layer);
        draw_resize_handle(&mut frame, layer, Rgba(settings.handle_color));
    }

    frame
}

fn draw_layer(frame: &mut RgbaImage, layer: &ImageLayer) {
    let (width, height) = layer.display_size();
    if width == 0 || height == 0 {
        return;
    }

    imageops::overlay(
        frame,
        &*layer.pixels(),
        layer.x.round() as i64,
        layer.y.round() as i64,
    );
}

fn draw_resize_handle(frame: &mut RgbaImage, layer: &ImageLayer, color: Rgba<u8>) {
    let (cx, cy) = layer.bottom_right();
    let half = RESIZE_HANDLE_SIZE / 2.0;

    let left = (cx - half).round() as i64;
    let top = (cy - half).round() as i64;
    let size = RESIZE_HANDLE_SIZE as i64;

    fill_rect(frame, left, top, size, size, color);
}

/// Fill an axis-aligned rect, clipped to the frame
fn fill_rect(frame: &mut RgbaImage, left: i64, top: i64, width: i64, height: i64, color: Rgba<u8>) {
    let x0 = left.max(0);
    let y0 = top.max(0);
    let x1 = (left + width).min(frame.width() as i64);
    let y1 = (top + height).min(frame.height() as i64);

    for y in y0..y1 {
        for x in x0..x1 {
            frame.put_pixel(x as u32, y as u32, color);
        }
    }
}
