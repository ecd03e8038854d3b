//! DOM glitter and canvas confetti drawing.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlElement};

use super::page::Page;
use crate::effects::confetti::ConfettiParticle;
use crate::effects::glitter::{BURST_LIFETIME_MS, GlitterBurst};
use crate::error::{GreetingError, Result};

/// Append one burst container to `<body>` and schedule its removal.
pub(crate) fn spawn_glitter(page: &Page, burst: &GlitterBurst) -> Result<()> {
    let doc = &page.document;
    let body = doc.body().ok_or(GreetingError::NoDocument)?;

    let container: HtmlElement = doc.create_element("div")?.unchecked_into();
    container.set_class_name("glitter-burst");
    let style = container.style();
    style.set_property("left", &format!("{:.1}px", burst.origin.0))?;
    style.set_property("top", &format!("{:.1}px", burst.origin.1))?;

    for p in &burst.particles {
        let span: HtmlElement = doc.create_element("span")?.unchecked_into();
        span.set_class_name("glitter-particle");
        let s = span.style();
        s.set_property("--dx", &format!("{:.1}px", p.dx))?;
        s.set_property("--dy", &format!("{:.1}px", p.dy))?;
        s.set_property("--rot", &format!("{:.1}deg", p.rotation_deg))?;
        s.set_property("--dur", &format!("{:.0}ms", p.duration_ms))?;
        s.set_property("width", &format!("{:.1}px", p.size_px))?;
        s.set_property("height", &format!("{:.1}px", p.size_px))?;
        span.dataset().set("metal", p.metal.as_str())?;
        container.append_child(&span)?;
    }
    body.append_child(&container)?;

    let cleanup = Closure::once_into_js(move || container.remove());
    page.window.set_timeout_with_callback_and_timeout_and_arguments_0(
        cleanup.unchecked_ref(),
        BURST_LIFETIME_MS as i32,
    )?;
    Ok(())
}

/// Filled rotated rectangles, fading with remaining life.
pub(crate) fn draw_confetti(
    ctx: &CanvasRenderingContext2d,
    particles: &[ConfettiParticle],
) -> Result<()> {
    for p in particles {
        ctx.save();
        ctx.translate(p.x, p.y)?;
        ctx.rotate(p.rotation)?;
        ctx.set_fill_style_str(p.color);
        ctx.set_global_alpha(p.alpha());
        ctx.fill_rect(-p.width / 2.0, -p.height / 2.0, p.width, p.height);
        ctx.restore();
    }
    Ok(())
}
