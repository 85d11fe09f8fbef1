use crate::audio::{AudioOutput, FinaleMusic};
use crate::constants::SECRET_REVEAL_DELAY;
use crate::dom::{self, Timeout};
use crate::events::{pointer, Listener};
use crate::frame::RenderLoop;
use guardian_core::Cue;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

const TEMPLATE: &str = "<div class=\"finale\">\
    <canvas class=\"fireworks\"></canvas>\
    <div class=\"finale-card\">\
      <h1>HAPPY NEW YEAR!</h1>\
      <p>The timeline is restored. The universe is bright again.<br>\
         May your year be filled with magic, adventure, and endless joy.<br>\
         You are the Guardian of your own destiny.</p>\
      <p class=\"quote\">\"Time is not a line, it's a circle. And in every circle, I'll always find you.\"</p>\
    </div>\
    <div class=\"secret\">\
      <button class=\"secret-button hidden\" style=\"display:none\">A Message For You</button>\
      <p class=\"secret-message hidden\" style=\"display:none\">Make me admin of your telegram channel \u{1F97A}</p>\
    </div>\
  </div>";

/// Final screen: fireworks, the looping track and the delayed secret.
///
/// Everything it started (render loop, music, timer, listener) stops when the
/// view is dropped.
pub struct FinaleView {
    render_loop: Option<RenderLoop>,
    music: Option<FinaleMusic>,
    _reveal_timer: Option<Timeout>,
    _secret_click: Listener,
}

impl FinaleView {
    pub fn mount(
        container: &web::HtmlElement,
        audio: Rc<RefCell<AudioOutput>>,
    ) -> anyhow::Result<Self> {
        container.set_inner_html(TEMPLATE);
        let canvas: web::HtmlCanvasElement = dom::query(container, "canvas.fireworks")?;
        let button: web::HtmlElement = dom::query(container, ".secret-button")?;
        let message: web::HtmlElement = dom::query(container, ".secret-message")?;

        let music = match FinaleMusic::new() {
            Ok(m) => {
                m.play();
                Some(m)
            }
            Err(e) => {
                log::warn!("[finale] no music: {:?}", e);
                None
            }
        };
        let playing = music
            .as_ref()
            .map(FinaleMusic::playing_flag)
            .unwrap_or_default();

        let render_loop = match RenderLoop::start(&canvas, playing, dom::random_seed()) {
            Ok(l) => Some(l),
            Err(e) => {
                log::warn!("[finale] fireworks disabled: {:?}", e);
                None
            }
        };

        let reveal_button = button.clone();
        let reveal_audio = audio.clone();
        let reveal_timer = dom::after(SECRET_REVEAL_DELAY, move || {
            dom::set_hidden(&reveal_button, false);
            reveal_audio.borrow_mut().play(Cue::Success);
        });

        let hide_button = button.clone();
        let secret_click = pointer::on_click(&button, move || {
            {
                let mut out = audio.borrow_mut();
                out.play(Cue::Click);
                out.play(Cue::Win);
            }
            dom::set_hidden(&hide_button, true);
            dom::set_hidden(&message, false);
        });

        Ok(Self {
            render_loop,
            music,
            _reveal_timer: reveal_timer,
            _secret_click: secret_click,
        })
    }

    pub fn is_animating(&self) -> bool {
        self.render_loop.as_ref().is_some_and(RenderLoop::is_running)
    }
}

impl Drop for FinaleView {
    fn drop(&mut self) {
        // stop drawing before the track flag goes quiet
        self.render_loop.take();
        self.music.take();
        log::info!("[finale] unmounted");
    }
}
