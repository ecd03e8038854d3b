//! Flow sequencer: countdown → blow-out → envelope → card.
//!
//! The sequencer is a plain state machine. Every operation returns the list of
//! `Effect`s the host must apply (toggle stage classes, schedule timers, burst
//! glitter, ...), so it never touches the DOM and can be driven from tests.
//!
//! Timers are owned by the host but tagged with the sequencer `generation`.
//! `reset` and `dispose` bump the generation, which turns any tick or reveal
//! still in flight into a no-op.

use crate::config::FlowTimings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Counting,
    Blown,
    EnvelopeReady,
    Opened,
    CardShown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    StartTap,
    CountdownElapsed,
    EnvelopeRevealDue,
    EnvelopeTap,
    CardRevealDue,
    Replay,
}

/// Legal moves. Anything not listed is ignored.
pub fn transition(phase: Phase, event: Event) -> Option<Phase> {
    use Event::*;
    use Phase::*;
    match (phase, event) {
        (_, Replay) => Some(Idle),
        (Idle, StartTap) => Some(Counting),
        (Counting, CountdownElapsed) => Some(Blown),
        (Blown, EnvelopeRevealDue) => Some(EnvelopeReady),
        (EnvelopeReady, EnvelopeTap) => Some(Opened),
        (Opened, CardRevealDue) => Some(CardShown),
        _ => None,
    }
}

/// Marker classes on the shared stage element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageFlag {
    Blown,
    ShowEnvelope,
    Opened,
    ShowCard,
}

impl StageFlag {
    pub const ALL: [StageFlag; 4] = [
        StageFlag::Blown,
        StageFlag::ShowEnvelope,
        StageFlag::Opened,
        StageFlag::ShowCard,
    ];

    pub fn class_name(self) -> &'static str {
        match self {
            StageFlag::Blown => "blown",
            StageFlag::ShowEnvelope => "show-envelope",
            StageFlag::Opened => "opened",
            StageFlag::ShowCard => "show-card",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageFlags {
    pub blown: bool,
    pub show_envelope: bool,
    pub opened: bool,
    pub show_card: bool,
}

impl StageFlags {
    /// Flags implied by a phase; `opened ⇒ show_envelope` and
    /// `show_card ⇒ opened` hold for every phase.
    pub fn for_phase(phase: Phase) -> Self {
        let rank = match phase {
            Phase::Idle | Phase::Counting => 0,
            Phase::Blown => 1,
            Phase::EnvelopeReady => 2,
            Phase::Opened => 3,
            Phase::CardShown => 4,
        };
        Self {
            blown: rank >= 1,
            show_envelope: rank >= 2,
            opened: rank >= 3,
            show_card: rank >= 4,
        }
    }

    pub fn get(&self, flag: StageFlag) -> bool {
        match flag {
            StageFlag::Blown => self.blown,
            StageFlag::ShowEnvelope => self.show_envelope,
            StageFlag::Opened => self.opened,
            StageFlag::ShowCard => self.show_card,
        }
    }
}

/// Where a glitter burst is centred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Cake,
    Envelope,
}

/// Client-space bounding box as reported by `getBoundingClientRect`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Anchor {
    /// Burst origin inside `rect`: the cake bursts from just above its middle
    /// (where the candles sit), the envelope from its centre.
    pub fn focal_point(self, rect: Rect) -> (f64, f64) {
        let x = rect.left + rect.width / 2.0;
        let y = match self {
            Anchor::Cake => rect.top + rect.height * 0.36,
            Anchor::Envelope => rect.top + rect.height / 2.0,
        };
        (x, y)
    }
}

/// One-shot delayed reveals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reveal {
    Envelope,
    Card,
}

impl Reveal {
    fn event(self) -> Event {
        match self {
            Reveal::Envelope => Event::EnvelopeRevealDue,
            Reveal::Card => Event::CardRevealDue,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    SetFlag(StageFlag, bool),
    /// Countdown text; `visible` drives its opacity.
    Countdown { value: u8, visible: bool },
    CandlesOut(bool),
    EnvelopeEnabled(bool),
    StartPrompt(bool),
    StartCountdownTimer { period_ms: u32, generation: u64 },
    StopCountdownTimer,
    Schedule { delay_ms: u32, reveal: Reveal, generation: u64 },
    Glitter { anchor: Anchor, count: usize },
    LaunchConfetti,
    StopConfetti,
    PlaySound,
}

pub struct FlowSequencer {
    timings: FlowTimings,
    phase: Phase,
    remaining: u8,
    running: bool,
    generation: u64,
    disposed: bool,
}

impl FlowSequencer {
    pub fn new(timings: FlowTimings) -> Self {
        let remaining = timings.countdown_from;
        Self {
            timings,
            phase: Phase::Idle,
            remaining,
            running: false,
            generation: 0,
            disposed: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn flags(&self) -> StageFlags {
        StageFlags::for_phase(self.phase)
    }

    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A countdown has been armed since the last reset.
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn timings(&self) -> &FlowTimings {
        &self.timings
    }

    /// Replay: back to `Idle` from anywhere, start prompt shown again.
    pub fn reset(&mut self) -> Vec<Effect> {
        if self.disposed {
            return Vec::new();
        }
        let mut fx = self.clear_stage();
        self.phase = Phase::Idle;
        fx.push(Effect::StartPrompt(true));
        log::debug!("flow reset (generation {})", self.generation);
        fx
    }

    /// Start tap. Only meaningful from `Idle`; repeated taps are ignored.
    pub fn start(&mut self) -> Vec<Effect> {
        if self.disposed || self.running {
            return Vec::new();
        }
        let Some(next) = transition(self.phase, Event::StartTap) else {
            return Vec::new();
        };
        let mut fx = vec![Effect::StartPrompt(false)];
        fx.extend(self.clear_stage());
        self.phase = next;
        self.running = true;
        fx.push(Effect::StartCountdownTimer {
            period_ms: self.timings.tick_ms,
            generation: self.generation,
        });
        log::debug!("countdown started from {}", self.remaining);
        fx
    }

    /// One countdown tick from the interval armed under `generation`.
    pub fn tick(&mut self, generation: u64) -> Vec<Effect> {
        if self.is_stale(generation) || self.phase != Phase::Counting {
            return Vec::new();
        }
        self.remaining = self.remaining.saturating_sub(1);
        let mut fx = vec![Effect::Countdown { value: self.remaining, visible: true }];
        if self.remaining == 0 {
            fx.push(Effect::StopCountdownTimer);
            fx.extend(self.fire(Event::CountdownElapsed));
        }
        fx
    }

    /// A delayed reveal scheduled under `generation` came due.
    pub fn reveal(&mut self, reveal: Reveal, generation: u64) -> Vec<Effect> {
        if self.is_stale(generation) {
            log::debug!("dropping stale {reveal:?} reveal");
            return Vec::new();
        }
        self.fire(reveal.event())
    }

    /// Envelope tap: only acts while the envelope is shown and still closed.
    pub fn open_envelope(&mut self) -> Vec<Effect> {
        if self.disposed {
            return Vec::new();
        }
        self.fire(Event::EnvelopeTap)
    }

    /// Tear down: stop timers and confetti; every later call is a no-op.
    pub fn dispose(&mut self) -> Vec<Effect> {
        if self.disposed {
            return Vec::new();
        }
        self.generation += 1;
        self.running = false;
        self.disposed = true;
        vec![Effect::StopCountdownTimer, Effect::StopConfetti]
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.disposed || generation != self.generation
    }

    /// Shared by start and replay: drop every flag, re-arm the countdown
    /// display, relight candles, lock the envelope, kill timers and confetti.
    fn clear_stage(&mut self) -> Vec<Effect> {
        self.generation += 1;
        self.running = false;
        self.remaining = self.timings.countdown_from;
        let mut fx = vec![Effect::StopCountdownTimer];
        fx.extend(StageFlag::ALL.iter().map(|&f| Effect::SetFlag(f, false)));
        fx.push(Effect::Countdown { value: self.remaining, visible: true });
        fx.push(Effect::CandlesOut(false));
        fx.push(Effect::EnvelopeEnabled(false));
        fx.push(Effect::StopConfetti);
        fx
    }

    fn fire(&mut self, event: Event) -> Vec<Effect> {
        let Some(next) = transition(self.phase, event) else {
            log::debug!("ignoring {event:?} in {:?}", self.phase);
            return Vec::new();
        };
        log::debug!("{:?} --{event:?}--> {next:?}", self.phase);
        self.phase = next;
        self.enter(next)
    }

    fn enter(&mut self, phase: Phase) -> Vec<Effect> {
        let t = &self.timings;
        match phase {
            Phase::Blown => vec![
                Effect::SetFlag(StageFlag::Blown, true),
                Effect::Countdown { value: 0, visible: false },
                Effect::CandlesOut(true),
                Effect::Glitter { anchor: Anchor::Cake, count: t.cake_glitter },
                Effect::Schedule {
                    delay_ms: t.envelope_delay_ms,
                    reveal: Reveal::Envelope,
                    generation: self.generation,
                },
            ],
            Phase::EnvelopeReady => vec![
                Effect::SetFlag(StageFlag::ShowEnvelope, true),
                Effect::EnvelopeEnabled(true),
            ],
            Phase::Opened => vec![
                Effect::SetFlag(StageFlag::Opened, true),
                Effect::PlaySound,
                Effect::LaunchConfetti,
                Effect::Glitter { anchor: Anchor::Envelope, count: t.envelope_glitter },
                Effect::Schedule {
                    delay_ms: t.card_delay_ms,
                    reveal: Reveal::Card,
                    generation: self.generation,
                },
            ],
            Phase::CardShown => vec![Effect::SetFlag(StageFlag::ShowCard, true)],
            // Idle and Counting are entered through reset/start, which emit
            // their own effects.
            Phase::Idle | Phase::Counting => Vec::new(),
        }
    }
}

impl Default for FlowSequencer {
    fn default() -> Self {
        Self::new(FlowTimings::default())
    }
}
