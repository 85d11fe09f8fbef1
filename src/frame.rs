use crate::dom;
use crate::events::Listener;
use crate::render::CanvasPainter;
use guardian_core::{DrawList, Extent, FireworksParams, FireworksScene};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

struct FrameContext {
    canvas: web::HtmlCanvasElement,
    painter: CanvasPainter,
    scene: FireworksScene,
    draw: DrawList,
    music_playing: Rc<Cell<bool>>,
}

impl FrameContext {
    fn frame(&mut self) {
        let extent = Extent::new(self.canvas.width() as f32, self.canvas.height() as f32);
        self.scene
            .tick(extent, self.music_playing.get(), &mut self.draw);
        self.painter.paint(extent, &self.draw);
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// requestAnimationFrame-driven fireworks loop bound to one canvas.
///
/// Running from [`RenderLoop::start`] until [`RenderLoop::stop`] or drop.
/// Stopping cancels the scheduled frame and detaches the resize listener; a
/// frame callback already queued by the browser sees the stopped flag and
/// does nothing.
pub struct RenderLoop {
    running: Rc<Cell<bool>>,
    raf_id: Rc<Cell<Option<i32>>>,
    tick: FrameCallback,
    resize: Option<Listener>,
}

impl RenderLoop {
    pub fn start(
        canvas: &web::HtmlCanvasElement,
        music_playing: Rc<Cell<bool>>,
        seed: u64,
    ) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!("get_context failed: {:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

        dom::sync_canvas_to_viewport(canvas);
        let canvas_resize = canvas.clone();
        let resize = Listener::on_window("resize", move |_| {
            dom::sync_canvas_to_viewport(&canvas_resize);
        });

        let frame_ctx = Rc::new(RefCell::new(FrameContext {
            canvas: canvas.clone(),
            painter: CanvasPainter::new(ctx),
            scene: FireworksScene::new(FireworksParams::default(), seed)?,
            draw: DrawList::default(),
            music_playing,
        }));

        let running = Rc::new(Cell::new(true));
        let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let tick: FrameCallback = Rc::new(RefCell::new(None));

        let tick_clone = tick.clone();
        let running_tick = running.clone();
        let raf_tick = raf_id.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            raf_tick.set(None);
            if !running_tick.get() {
                return;
            }
            frame_ctx.borrow_mut().frame();
            raf_tick.set(request_frame(&tick_clone));
        }) as Box<dyn FnMut()>));

        raf_id.set(request_frame(&tick));
        log::info!(
            "[fireworks] loop started {}x{}",
            canvas.width(),
            canvas.height()
        );
        Ok(Self {
            running,
            raf_id,
            tick,
            resize,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn stop(&mut self) {
        if !self.running.replace(false) {
            return;
        }
        if let (Some(id), Some(w)) = (self.raf_id.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
        self.resize = None;
        // breaks the closure's reference to its own slot
        self.tick.borrow_mut().take();
        log::info!("[fireworks] loop stopped");
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request_frame(tick: &FrameCallback) -> Option<i32> {
    let w = web::window()?;
    let slot = tick.borrow();
    let cb = slot.as_ref()?;
    w.request_animation_frame(cb.as_ref().unchecked_ref()).ok()
}
