//! Browser host for the flow sequencer.
//!
//! `mount` looks up the page, binds the personalization text, wires the three
//! buttons and the resize handler, then parks the `App` in a thread-local.
//! Every callback (clicks, the countdown interval, reveal timeouts, animation
//! frames) re-enters through `with_app`, hands the event to the sequencer and
//! applies the returned effects.

mod audio;
mod page;
mod render;

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::EventTarget;

use crate::config::GreetingConfig;
use crate::effects::{ConfettiSim, ConfettiStatus, glitter};
use crate::error::Result;
use crate::flow::{Anchor, Effect, FlowSequencer, Phase, Reveal, StageFlags};
use crate::greeting::Greeting;

use audio::Sound;
use page::Page;

type FrameCallback = Closure<dyn FnMut(f64)>;

/// DOM listener removed again when dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listener {
    fn new<F>(target: &EventTarget, kind: &'static str, handler: F) -> Result<Self>
    where
        F: FnMut(web_sys::Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self { target: target.clone(), kind, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// The armed countdown interval and the generation it ticks for.
#[derive(Clone, Copy)]
struct Countdown {
    handle: i32,
    generation: u64,
}

struct App {
    page: Page,
    flow: FlowSequencer,
    rng: fastrand::Rng,
    sound: Option<Sound>,
    countdown: Option<Countdown>,
    confetti: Option<ConfettiSim>,
    confetti_raf: Option<i32>,
    on_tick: Closure<dyn FnMut()>,
    on_frame: FrameCallback,
    _listeners: Vec<Listener>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|cell| {
        let mut guard = cell.try_borrow_mut().ok()?;
        guard.as_mut().map(f)
    })
}

pub(crate) fn mount(config: GreetingConfig) -> Result<()> {
    if APP.with(|cell| cell.borrow().is_some()) {
        log::info!("greeting already mounted");
        return Ok(());
    }

    let page = Page::locate(&config.ids)?;
    let search = page.window.location().search().unwrap_or_default();
    let greeting = Greeting::from_query(&search, &config.default_message);
    page.bind_greeting(&greeting);
    page.resize_canvas()?;

    let listeners = vec![
        Listener::new(&page.start_button, "click", |_| {
            with_app(App::on_start_tap);
        })?,
        Listener::new(&page.envelope, "click", |_| {
            with_app(App::on_envelope_tap);
        })?,
        Listener::new(&page.replay, "click", |_| {
            with_app(App::on_replay);
        })?,
        Listener::new(&page.window, "resize", |_| {
            with_app(App::on_resize);
        })?,
    ];

    let on_tick = Closure::wrap(Box::new(|| {
        with_app(App::on_countdown_tick);
    }) as Box<dyn FnMut()>);
    let on_frame = Closure::wrap(Box::new(|ts: f64| {
        with_app(|app| app.on_confetti_frame(ts));
    }) as Box<dyn FnMut(f64)>);

    let mut app = App {
        sound: page.sound.clone().map(Sound::new),
        page,
        flow: FlowSequencer::new(config.timings),
        rng: crate::rng::seeded_from_host(),
        countdown: None,
        confetti: None,
        confetti_raf: None,
        on_tick,
        on_frame,
        _listeners: listeners,
    };
    // Land in the initial state even if the markup was saved mid-run.
    let fx = app.flow.reset();
    app.apply(fx);

    APP.with(|cell| cell.replace(Some(app)));
    log::info!("greeting mounted (to: {:?}, from: {:?})", greeting.to, greeting.from);
    Ok(())
}

pub(crate) fn replay() {
    with_app(App::on_replay);
}

/// What the mounted host is currently driving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostStatus {
    pub phase: Phase,
    pub flags: StageFlags,
    pub countdown_armed: bool,
    pub confetti_particles: usize,
    pub confetti_frame_pending: bool,
}

/// `None` when nothing is mounted.
pub fn status() -> Option<HostStatus> {
    with_app(|app| HostStatus {
        phase: app.flow.phase(),
        flags: app.flow.flags(),
        countdown_armed: app.countdown.is_some(),
        confetti_particles: app.confetti.as_ref().map_or(0, |sim| sim.particles().len()),
        confetti_frame_pending: app.confetti_raf.is_some(),
    })
}

/// Stop everything and detach from the page. `mount` may be called again.
pub(crate) fn dispose() {
    let app = APP.with(|cell| {
        let mut guard = cell.try_borrow_mut().ok()?;
        guard.take()
    });
    if let Some(mut app) = app {
        let fx = app.flow.dispose();
        app.apply(fx);
        log::info!("greeting disposed");
    }
}

impl App {
    fn on_start_tap(&mut self) {
        if let Some(sound) = &self.sound {
            sound.unlock();
        }
        let fx = self.flow.start();
        self.apply(fx);
    }

    fn on_envelope_tap(&mut self) {
        let fx = self.flow.open_envelope();
        self.apply(fx);
    }

    fn on_replay(&mut self) {
        let fx = self.flow.reset();
        self.apply(fx);
    }

    fn on_resize(&mut self) {
        if let Err(err) = self.page.resize_canvas() {
            log::warn!("canvas resize failed: {err}");
        }
    }

    fn on_countdown_tick(&mut self) {
        let Some(countdown) = self.countdown else {
            return;
        };
        let fx = self.flow.tick(countdown.generation);
        self.apply(fx);
    }

    fn on_reveal(&mut self, reveal: Reveal, generation: u64) {
        let fx = self.flow.reveal(reveal, generation);
        self.apply(fx);
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            if let Err(err) = self.apply_one(&effect) {
                log::warn!("{effect:?} failed: {err}");
            }
        }
    }

    fn apply_one(&mut self, effect: &Effect) -> Result<()> {
        match *effect {
            Effect::SetFlag(flag, on) => self.page.set_flag(flag, on),
            Effect::Countdown { value, visible } => self.page.set_countdown(value, visible),
            Effect::CandlesOut(out) => self.page.set_candles_out(out),
            Effect::EnvelopeEnabled(enabled) => self.page.set_envelope_enabled(enabled),
            Effect::StartPrompt(visible) => self.page.set_start_prompt(visible),
            Effect::StartCountdownTimer { period_ms, generation } => {
                self.start_countdown(period_ms, generation)
            }
            Effect::StopCountdownTimer => {
                self.stop_countdown();
                Ok(())
            }
            Effect::Schedule { delay_ms, reveal, generation } => {
                self.schedule_reveal(delay_ms, reveal, generation)
            }
            Effect::Glitter { anchor, count } => self.glitter(anchor, count),
            Effect::LaunchConfetti => {
                self.launch_confetti();
                Ok(())
            }
            Effect::StopConfetti => {
                self.stop_confetti();
                Ok(())
            }
            Effect::PlaySound => {
                if let Some(sound) = &self.sound {
                    sound.play();
                }
                Ok(())
            }
        }
    }

    fn start_countdown(&mut self, period_ms: u32, generation: u64) -> Result<()> {
        self.stop_countdown();
        let handle = self
            .page
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                self.on_tick.as_ref().unchecked_ref(),
                period_ms as i32,
            )?;
        self.countdown = Some(Countdown { handle, generation });
        Ok(())
    }

    fn stop_countdown(&mut self) {
        if let Some(countdown) = self.countdown.take() {
            self.page.window.clear_interval_with_handle(countdown.handle);
        }
    }

    fn schedule_reveal(&self, delay_ms: u32, reveal: Reveal, generation: u64) -> Result<()> {
        let due = Closure::once_into_js(move || {
            with_app(|app| app.on_reveal(reveal, generation));
        });
        self.page
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                due.unchecked_ref(),
                delay_ms as i32,
            )?;
        Ok(())
    }

    fn glitter(&mut self, anchor: Anchor, count: usize) -> Result<()> {
        let Some(rect) = self.page.anchor_rect(anchor) else {
            log::debug!("no {anchor:?} on the page; skipping glitter");
            return Ok(());
        };
        let burst = glitter::burst(&mut self.rng, anchor.focal_point(rect), count);
        render::spawn_glitter(&self.page, &burst)
    }

    /// Cancels a running burst first so two loops never share the canvas.
    fn launch_confetti(&mut self) {
        self.stop_confetti();
        let viewport = self.page.viewport();
        self.confetti = Some(ConfettiSim::launch(&mut self.rng, viewport, self.page.now()));
        self.request_confetti_frame();
    }

    fn stop_confetti(&mut self) {
        if let Some(id) = self.confetti_raf.take() {
            let _ = self.page.window.cancel_animation_frame(id);
        }
        self.confetti = None;
        self.page.clear_canvas(self.page.viewport());
    }

    fn request_confetti_frame(&mut self) {
        match self
            .page
            .window
            .request_animation_frame(self.on_frame.as_ref().unchecked_ref())
        {
            Ok(id) => self.confetti_raf = Some(id),
            Err(err) => log::warn!("requestAnimationFrame failed: {err:?}"),
        }
    }

    fn on_confetti_frame(&mut self, now: f64) {
        self.confetti_raf = None;
        let Some(sim) = self.confetti.as_mut() else {
            return;
        };
        let status = sim.step(now);
        let viewport = sim.viewport();
        self.page.clear_canvas(viewport);
        match status {
            ConfettiStatus::Running => {
                if let Err(err) = render::draw_confetti(&self.page.ctx, sim.particles()) {
                    log::warn!("confetti draw failed: {err}");
                }
                self.request_confetti_frame();
            }
            ConfettiStatus::Finished => {
                log::debug!("confetti finished after {} frames", sim.frames());
                self.confetti = None;
            }
        }
    }
}
