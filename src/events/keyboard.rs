use super::Listener;
use guardian_core::puzzles::Direction;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Arrow-key handler for the maze. Arrow keys are swallowed so the page does
/// not scroll while steering.
pub fn on_arrow_keys(mut handler: impl FnMut(Direction) + 'static) -> Option<Listener> {
    Listener::on_window("keydown", move |ev: web::Event| {
        let Some(kev) = ev.dyn_ref::<web::KeyboardEvent>() else {
            return;
        };
        if kev.ctrl_key() || kev.meta_key() || kev.alt_key() {
            return;
        }
        if let Some(dir) = Direction::from_key(&kev.key()) {
            ev.prevent_default();
            handler(dir);
        }
    })
}
