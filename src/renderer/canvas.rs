//! Canvas 2D backend

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::shapes::{Scene, Shape};

/// Pixel density cap; higher ratios cost fill rate for no visible gain
const MAX_PIXEL_RATIO: f64 = 2.0;

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// CSS pixel size the simulation works in
    pub size: (u32, u32),
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok(Self {
            canvas,
            ctx,
            size: (0, 0),
        })
    }

    /// Match the backing store to `width`×`height` CSS pixels at `pixel_ratio`
    pub fn resize(&mut self, width: u32, height: u32, pixel_ratio: f64) {
        let ratio = pixel_ratio.clamp(1.0, MAX_PIXEL_RATIO);
        self.canvas.set_width((width as f64 * ratio) as u32);
        self.canvas.set_height((height as f64 * ratio) as u32);
        if let Err(e) = self.ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0) {
            log::warn!("set_transform failed: {:?}", e);
        }
        self.size = (width, height);
    }

    pub fn draw(&self, scene: &Scene) {
        let ctx = &self.ctx;
        for shape in &scene.shapes {
            match shape {
                Shape::Clear { color } => {
                    ctx.set_fill_style_str(color);
                    ctx.fill_rect(0.0, 0.0, self.size.0 as f64, self.size.1 as f64);
                }
                Shape::Strokes {
                    segments,
                    width,
                    color,
                } => {
                    ctx.set_line_cap("round");
                    ctx.set_line_join("round");
                    ctx.set_line_width(*width as f64);
                    ctx.set_stroke_style_str(color);
                    ctx.begin_path();
                    for seg in segments {
                        ctx.move_to(seg.a.x as f64, seg.a.y as f64);
                        ctx.line_to(seg.b.x as f64, seg.b.y as f64);
                    }
                    ctx.stroke();
                }
                Shape::Disc {
                    center,
                    radius,
                    color,
                } => {
                    ctx.set_fill_style_str(color);
                    ctx.begin_path();
                    if ctx
                        .arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)
                        .is_ok()
                    {
                        ctx.fill();
                    }
                }
            }
        }
    }
}
