//! Handles to the page elements the sequencer drives.

use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlAudioElement, HtmlCanvasElement, HtmlElement,
    Window,
};

use crate::config::ElementIds;
use crate::effects::Viewport;
use crate::effects::confetti::backing_scale;
use crate::error::{GreetingError, Result};
use crate::flow::{Anchor, Rect, StageFlag};
use crate::greeting::Greeting;

pub(crate) struct Page {
    pub window: Window,
    pub document: Document,
    pub start_overlay: Element,
    pub start_button: Element,
    pub stage: Element,
    pub countdown: HtmlElement,
    pub candles: Element,
    pub candle_selector: String,
    pub cake: Option<Element>,
    pub envelope: Element,
    pub card: Element,
    pub replay: Element,
    pub sound: Option<HtmlAudioElement>,
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub to: HtmlElement,
    pub from: HtmlElement,
    pub message: HtmlElement,
}

fn by_id(document: &Document, id: &str) -> Result<Element> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| GreetingError::MissingElement(id.to_string()))
}

fn by_id_as<T: JsCast>(document: &Document, id: &str) -> Result<T> {
    by_id(document, id)?
        .dyn_into::<T>()
        .map_err(|_| GreetingError::MissingElement(format!("{id} (unexpected element type)")))
}

impl Page {
    pub fn locate(ids: &ElementIds) -> Result<Self> {
        let window = web_sys::window().ok_or(GreetingError::NoWindow)?;
        let document = window.document().ok_or(GreetingError::NoDocument)?;

        let canvas: HtmlCanvasElement = by_id_as(&document, &ids.confetti_canvas)?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| GreetingError::Canvas("2d context unavailable".into()))?
            .dyn_into()
            .map_err(|_| GreetingError::Canvas("unexpected context type".into()))?;

        let cake = document.query_selector(&ids.cake_selector)?;
        if cake.is_none() {
            log::warn!("no element matches `{}`; blow-out glitter disabled", ids.cake_selector);
        }
        let sound = document
            .get_element_by_id(&ids.sound)
            .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok());
        if sound.is_none() {
            log::warn!("no <audio id=\"{}\">; envelope will open silently", ids.sound);
        }

        Ok(Self {
            start_overlay: by_id(&document, &ids.start_overlay)?,
            start_button: by_id(&document, &ids.start_button)?,
            stage: by_id(&document, &ids.stage)?,
            countdown: by_id_as(&document, &ids.countdown)?,
            candles: by_id(&document, &ids.candles)?,
            candle_selector: ids.candle_selector.clone(),
            cake,
            envelope: by_id(&document, &ids.envelope)?,
            card: by_id(&document, &ids.card)?,
            replay: by_id(&document, &ids.replay)?,
            sound,
            canvas,
            ctx,
            to: by_id_as(&document, &ids.to)?,
            from: by_id_as(&document, &ids.from)?,
            message: by_id_as(&document, &ids.message)?,
            window,
            document,
        })
    }

    /// Text only; never parsed as markup.
    pub fn bind_greeting(&self, greeting: &Greeting) {
        let to = greeting.to_line();
        let from = greeting.from_line();
        self.to.set_text_content(Some(&to));
        self.to.set_hidden(to.is_empty());
        self.from.set_text_content(Some(&from));
        self.from.set_hidden(from.is_empty());
        self.message.set_text_content(Some(&greeting.message));
    }

    pub fn set_flag(&self, flag: StageFlag, on: bool) -> Result<()> {
        let classes = self.stage.class_list();
        if on {
            classes.add_1(flag.class_name())?;
        } else {
            classes.remove_1(flag.class_name())?;
        }
        if flag == StageFlag::ShowCard {
            self.card.set_attribute("aria-hidden", if on { "false" } else { "true" })?;
        }
        Ok(())
    }

    pub fn set_countdown(&self, value: u8, visible: bool) -> Result<()> {
        self.countdown.set_text_content(Some(&value.to_string()));
        self.countdown
            .style()
            .set_property("opacity", if visible { "1" } else { "0" })?;
        Ok(())
    }

    pub fn set_candles_out(&self, out: bool) -> Result<()> {
        let candles = self.candles.query_selector_all(&self.candle_selector)?;
        for i in 0..candles.length() {
            let Some(candle) = candles.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            if out {
                candle.class_list().add_1("out")?;
            } else {
                candle.class_list().remove_1("out")?;
            }
        }
        Ok(())
    }

    pub fn set_envelope_enabled(&self, enabled: bool) -> Result<()> {
        if enabled {
            self.envelope.remove_attribute("disabled")?;
        } else {
            self.envelope.set_attribute("disabled", "")?;
        }
        Ok(())
    }

    pub fn set_start_prompt(&self, visible: bool) -> Result<()> {
        let classes = self.start_overlay.class_list();
        if visible {
            classes.remove_1("hidden")?;
        } else {
            classes.add_1("hidden")?;
        }
        Ok(())
    }

    pub fn anchor_rect(&self, anchor: Anchor) -> Option<Rect> {
        let el = match anchor {
            Anchor::Cake => self.cake.as_ref()?,
            Anchor::Envelope => &self.envelope,
        };
        let r = el.get_bounding_client_rect();
        Some(Rect { left: r.left(), top: r.top(), width: r.width(), height: r.height() })
    }

    pub fn viewport(&self) -> Viewport {
        let dim = |v: std::result::Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
            v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
        };
        Viewport {
            width: dim(self.window.inner_width()),
            height: dim(self.window.inner_height()),
        }
    }

    pub fn now(&self) -> f64 {
        self.window.performance().map(|p| p.now()).unwrap_or(0.0)
    }

    /// Match the canvas backing store to the viewport at up to 2x density.
    pub fn resize_canvas(&self) -> Result<()> {
        let viewport = self.viewport();
        let scale = backing_scale(self.window.device_pixel_ratio());
        self.canvas.set_width((viewport.width * scale).floor() as u32);
        self.canvas.set_height((viewport.height * scale).floor() as u32);
        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", viewport.width))?;
        style.set_property("height", &format!("{}px", viewport.height))?;
        self.ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0)?;
        Ok(())
    }

    pub fn clear_canvas(&self, viewport: Viewport) {
        self.ctx.clear_rect(0.0, 0.0, viewport.width, viewport.height);
    }
}
