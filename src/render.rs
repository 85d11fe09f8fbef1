use crate::constants::{BAR_ALPHA, BAR_LIGHTNESS_PCT, BAR_SATURATION_PCT};
use fnv::FnvHashMap;
use guardian_core::{DrawCmd, DrawList, Extent, Rgb};
use std::f64::consts::TAU;
use web_sys as web;

/// Executes a frame's [`DrawList`] on a 2D canvas context.
///
/// Fill and shadow styles are only written when they change; a burst's sparks
/// share one colour and are stored contiguously, so most sparks reuse the
/// previous style.
pub struct CanvasPainter {
    ctx: web::CanvasRenderingContext2d,
    css: FnvHashMap<Rgb, String>,
    current: Option<Rgb>,
}

impl CanvasPainter {
    pub fn new(ctx: web::CanvasRenderingContext2d) -> Self {
        Self {
            ctx,
            css: FnvHashMap::default(),
            current: None,
        }
    }

    pub fn paint(&mut self, extent: Extent, list: &DrawList) {
        let (w, h) = (extent.width as f64, extent.height as f64);
        for cmd in &list.cmds {
            match *cmd {
                DrawCmd::Fade { alpha } => {
                    self.plain();
                    self.ctx
                        .set_fill_style_str(&format!("rgba(0, 0, 0, {})", alpha));
                    self.ctx.fill_rect(0.0, 0.0, w, h);
                }
                DrawCmd::Spark {
                    pos,
                    radius,
                    color,
                    alpha,
                    glow,
                } => {
                    if self.current != Some(color) {
                        let css = self.css.entry(color).or_insert_with(|| color.css());
                        self.ctx.set_fill_style_str(css);
                        self.ctx.set_shadow_color(css);
                        self.current = Some(color);
                    }
                    self.ctx.set_shadow_blur(glow as f64);
                    self.ctx.set_global_alpha(alpha as f64);
                    self.ctx.begin_path();
                    _ = self
                        .ctx
                        .arc(pos.x as f64, pos.y as f64, radius as f64, 0.0, TAU);
                    self.ctx.fill();
                }
                DrawCmd::Bar(bar) => {
                    self.plain();
                    self.ctx.set_fill_style_str(&format!(
                        "hsla({:.0}, {}%, {}%, {})",
                        bar.hue, BAR_SATURATION_PCT, BAR_LIGHTNESS_PCT, BAR_ALPHA
                    ));
                    self.ctx.fill_rect(
                        bar.x as f64,
                        bar.top(extent) as f64,
                        bar.width as f64,
                        bar.height as f64,
                    );
                }
            }
        }
        self.plain();
    }

    /// Opaque, unshadowed drawing state.
    fn plain(&mut self) {
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_shadow_blur(0.0);
        self.current = None;
    }
}
