//! Canvas 2D painter (WASM only)

use std::f64::consts::TAU;

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::scene::{Color, DrawCmd};

fn css(color: &Color) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        (color[0].clamp(0.0, 1.0) * 255.0).round() as u8,
        (color[1].clamp(0.0, 1.0) * 255.0).round() as u8,
        (color[2].clamp(0.0, 1.0) * 255.0).round() as u8,
        color[3].clamp(0.0, 1.0)
    )
}

pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasPainter {
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        use wasm_bindgen::JsCast;

        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width as f64;
        self.height = height as f64;
    }

    pub fn paint(&self, cmds: &[DrawCmd]) {
        for cmd in cmds {
            self.paint_one(cmd);
        }
    }

    fn paint_one(&self, cmd: &DrawCmd) {
        let ctx = &self.ctx;
        match cmd {
            DrawCmd::Clear { color } => {
                ctx.set_fill_style_str(&css(color));
                ctx.fill_rect(0.0, 0.0, self.width, self.height);
            }
            DrawCmd::Rect { rect, color } => {
                ctx.set_fill_style_str(&css(color));
                ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
            }
            DrawCmd::Circle {
                center,
                radius,
                color,
            } => {
                ctx.set_fill_style_str(&css(color));
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)
                    .ok();
                ctx.fill();
            }
            DrawCmd::Diamond {
                center,
                size,
                color,
            } => {
                let (x, y, r) = (center.x as f64, center.y as f64, *size as f64 / 2.0);
                ctx.set_fill_style_str(&css(color));
                ctx.begin_path();
                ctx.move_to(x, y - r);
                ctx.line_to(x + r, y);
                ctx.line_to(x, y + r);
                ctx.line_to(x - r, y);
                ctx.close_path();
                ctx.fill();
            }
            DrawCmd::Arrow {
                center,
                size,
                angle,
                color,
            } => {
                let r = *size as f64 / 2.0;
                ctx.save();
                ctx.translate(center.x as f64, center.y as f64).ok();
                ctx.rotate((*angle as f64).to_radians()).ok();
                ctx.set_fill_style_str(&css(color));
                ctx.begin_path();
                ctx.move_to(r, 0.0);
                ctx.line_to(-r, -r);
                ctx.line_to(-r * 0.4, 0.0);
                ctx.line_to(-r, r);
                ctx.close_path();
                ctx.fill();
                ctx.restore();
            }
            DrawCmd::Text {
                pos,
                text,
                size,
                align,
                color,
            } => {
                ctx.set_fill_style_str(&css(color));
                ctx.set_font(&format!("bold {}px sans-serif", size));
                ctx.set_text_align(align.as_str());
                ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
            }
        }
    }
}
