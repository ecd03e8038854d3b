//! Best-effort sound effect. Autoplay rejections are swallowed.

use wasm_bindgen::prelude::*;
use web_sys::HtmlAudioElement;

pub(crate) struct Sound {
    audio: HtmlAudioElement,
    // Promise handlers live as long as the page.
    swallow: Closure<dyn FnMut(JsValue)>,
    settle: Closure<dyn FnMut(JsValue)>,
}

impl Sound {
    pub fn new(audio: HtmlAudioElement) -> Self {
        let swallow = Closure::wrap(Box::new(|err: JsValue| {
            log::debug!("sound blocked: {err:?}");
        }) as Box<dyn FnMut(JsValue)>);
        let parked = audio.clone();
        let settle = Closure::wrap(Box::new(move |_: JsValue| {
            let _ = parked.pause();
            parked.set_current_time(0.0);
        }) as Box<dyn FnMut(JsValue)>);
        Self { audio, swallow, settle }
    }

    /// Mobile browsers only allow playback after a gesture: play and
    /// immediately park the clip so later `play` calls are permitted.
    pub fn unlock(&self) {
        self.audio.set_current_time(0.0);
        match self.audio.play() {
            Ok(promise) => self.swallow_rejection(promise.then(&self.settle)),
            Err(err) => log::debug!("sound unlock failed: {err:?}"),
        }
    }

    pub fn play(&self) {
        self.audio.set_current_time(0.0);
        match self.audio.play() {
            Ok(promise) => self.swallow_rejection(promise),
            Err(err) => log::debug!("sound play failed: {err:?}"),
        }
    }

    fn swallow_rejection(&self, promise: js_sys::Promise) {
        let _ = promise.catch(&self.swallow);
    }
}
