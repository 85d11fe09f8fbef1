use super::Listener;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn on_click(target: &web::EventTarget, mut handler: impl FnMut() + 'static) -> Listener {
    Listener::new(target, "click", move |_| handler())
}

/// Delegated click: reports the `attr` value of the nearest clicked ancestor
/// carrying it, so one listener serves a whole grid of buttons.
pub fn on_click_attr(
    target: &web::EventTarget,
    attr: &'static str,
    mut handler: impl FnMut(String) + 'static,
) -> Listener {
    let selector = format!("[{}]", attr);
    Listener::new(target, "click", move |ev: web::Event| {
        let hit = ev
            .target()
            .and_then(|t| t.dyn_into::<web::Element>().ok())
            .and_then(|el| el.closest(&selector).ok().flatten())
            .and_then(|el| el.get_attribute(attr));
        if let Some(value) = hit {
            handler(value);
        }
    })
}
