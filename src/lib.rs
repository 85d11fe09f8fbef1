#![cfg(target_arch = "wasm32")]
use guardian_core::{Event, SessionParams, SessionState};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod director;
mod dom;
mod events;
mod finale;
mod frame;
mod narration;
mod puzzles;
mod render;
mod view;

use director::Director;
use events::{pointer, Listener};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("guardian-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let view = view::StageView::bind(&document)?;
    let audio_button = view.audio_button().clone();
    let audio = Rc::new(RefCell::new(audio::AudioOutput::new()));
    let narrator = Rc::new(narration::RemoteNarrator::from_page(&document));
    let director = Director::new(
        SessionState::new(SessionParams::default()),
        narrator,
        audio,
        view,
    );

    let d = director.clone();
    pointer::on_click(&audio_button, move || d.dispatch(Event::AudioToggled)).forget();

    // pagehide also fires for bfcache; the session does not resume afterwards
    let d = director.clone();
    if let Some(l) = Listener::on_window("pagehide", move |_| d.shutdown()) {
        l.forget();
    }

    director.mount();
    Ok(())
}
