// Browser tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use birthday_wish::effects::confetti::MAX_PARTICLES;
use birthday_wish::flow::StageFlag;
use birthday_wish::{FlowTimings, GreetingConfig, Phase, StageFlags};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

const MARKUP: &str = r#"
  <canvas id="confetti"></canvas>
  <div id="start"><button id="startBtn">Tap to start</button></div>
  <main id="stage">
    <div id="countdown">5</div>
    <div class="cake-wrap">
      <div id="candles">
        <div class="candle"><div class="flame"></div></div>
        <div class="candle"><div class="flame"></div></div>
        <div class="candle"><div class="flame"></div></div>
        <div class="candle"><div class="flame"></div></div>
        <div class="candle"><div class="flame"></div></div>
      </div>
      <div class="cake"></div>
    </div>
    <button id="envelope" disabled aria-label="Open the envelope"></button>
    <section id="card" aria-hidden="true">
      <p id="to"></p>
      <p id="msg"></p>
      <p id="from"></p>
    </section>
  </main>
  <button id="replay">Replay</button>
  <audio id="pop" preload="none"></audio>
"#;

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn by_id(id: &str) -> HtmlElement {
    document().get_element_by_id(id).unwrap().unchecked_into()
}

fn count(selector: &str) -> u32 {
    document().query_selector_all(selector).unwrap().length()
}

/// Drops the page markup into the body; remove it with `unmount`.
fn inject_page() -> Element {
    let doc = document();
    let root = doc.create_element("div").unwrap();
    root.set_id("greeting-root");
    root.set_inner_html(MARKUP);
    doc.body().unwrap().append_child(&root).unwrap();
    root
}

fn unmount(root: Element) {
    birthday_wish::dispose_greeting();
    root.remove();
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn fast_config() -> GreetingConfig {
    GreetingConfig {
        timings: FlowTimings {
            countdown_from: 3,
            tick_ms: 20,
            envelope_delay_ms: 30,
            card_delay_ms: 30,
            cake_glitter: 12,
            envelope_glitter: 8,
        },
        ..GreetingConfig::default()
    }
}

/// Stage classes on the page agree with the sequencer's flags.
fn assert_stage_matches(flags: StageFlags) {
    let classes = by_id("stage").class_list();
    for flag in StageFlag::ALL {
        assert_eq!(classes.contains(flag.class_name()), flags.get(flag), "{flag:?}");
    }
}

#[wasm_bindgen_test]
fn start_fails_cleanly_without_markup() {
    let err = birthday_wish::start_greeting().unwrap_err();
    assert!(err.as_string().unwrap_or_default().contains("missing element"));
}

#[wasm_bindgen_test]
fn console_logger_sets_level_on_every_call() {
    birthday_wish::logging::init(log::Level::Debug);
    log::debug!("logger smoke test");
    assert_eq!(log::max_level(), log::LevelFilter::Debug);

    birthday_wish::logging::init(log::Level::Info);
    assert_eq!(log::max_level(), log::LevelFilter::Info);
}

#[wasm_bindgen_test]
async fn full_run_drives_the_page() {
    let root = inject_page();
    birthday_wish::mount(fast_config()).unwrap();

    // No query string: the optional lines stay empty and hidden.
    let to = by_id("to");
    assert!(to.hidden());
    assert_eq!(to.text_content().unwrap_or_default(), "");
    assert!(!by_id("msg").text_content().unwrap_or_default().is_empty());
    assert!(by_id("envelope").has_attribute("disabled"));
    assert_eq!(by_id("countdown").text_content().as_deref(), Some("3"));

    by_id("startBtn").click();
    assert!(by_id("start").class_list().contains("hidden"));
    let status = birthday_wish::status().unwrap();
    assert_eq!(status.phase, Phase::Counting);
    assert!(status.countdown_armed);

    sleep(250).await;
    let status = birthday_wish::status().unwrap();
    assert_eq!(status.phase, Phase::EnvelopeReady);
    assert!(!status.countdown_armed);
    assert_stage_matches(status.flags);
    assert_eq!(count(".candle.out"), count(".candle"));
    assert!(count(".candle") > 0);
    assert!(!by_id("envelope").has_attribute("disabled"));
    assert!(count(".glitter-burst") >= 1);

    by_id("envelope").click();
    let status = birthday_wish::status().unwrap();
    assert_eq!(status.phase, Phase::Opened);
    assert!(by_id("stage").class_list().contains("opened"));
    assert!(status.confetti_particles > 0);
    assert!(status.confetti_frame_pending);

    // A second tap on an open envelope changes nothing.
    by_id("envelope").click();
    assert_eq!(birthday_wish::status().unwrap().phase, Phase::Opened);

    sleep(150).await;
    let status = birthday_wish::status().unwrap();
    assert_eq!(status.phase, Phase::CardShown);
    assert_stage_matches(status.flags);
    assert_eq!(by_id("card").get_attribute("aria-hidden").as_deref(), Some("false"));

    birthday_wish::replay_greeting();
    let status = birthday_wish::status().unwrap();
    assert_eq!(status.phase, Phase::Idle);
    assert_stage_matches(StageFlags::default());
    assert_eq!(status.confetti_particles, 0);
    assert!(!status.confetti_frame_pending);
    assert_eq!(count(".candle.out"), 0);
    assert!(by_id("envelope").has_attribute("disabled"));
    assert!(!by_id("start").class_list().contains("hidden"));
    assert_eq!(by_id("countdown").text_content().as_deref(), Some("3"));

    unmount(root);
}

#[wasm_bindgen_test]
async fn replay_mid_countdown_disarms_the_timer() {
    let root = inject_page();
    birthday_wish::mount(fast_config()).unwrap();

    by_id("startBtn").click();
    sleep(25).await;
    birthday_wish::replay_greeting();
    assert!(!birthday_wish::status().unwrap().countdown_armed);

    // Ticks or reveals left over from the cancelled run must not advance it.
    sleep(250).await;
    let status = birthday_wish::status().unwrap();
    assert_eq!(status.phase, Phase::Idle);
    assert_stage_matches(status.flags);
    assert_eq!(count(".candle.out"), 0);

    unmount(root);
}

#[wasm_bindgen_test]
async fn second_run_relaunches_confetti_from_scratch() {
    let root = inject_page();
    birthday_wish::mount(fast_config()).unwrap();

    for _ in 0..2 {
        by_id("startBtn").click();
        sleep(250).await;
        by_id("envelope").click();
        let status = birthday_wish::status().unwrap();
        assert!(status.confetti_frame_pending);
        assert_eq!(status.confetti_particles, MAX_PARTICLES);
        birthday_wish::replay_greeting();
        assert!(!birthday_wish::status().unwrap().confetti_frame_pending);
    }

    unmount(root);
}

#[wasm_bindgen_test]
fn query_string_personalizes_the_card() {
    let window = web_sys::window().unwrap();
    let history = window.history().unwrap();
    let original = window.location().href().unwrap();
    let query = "?to=Mira&from=Jon&msg=Hello%20there";
    history.replace_state_with_url(&JsValue::NULL, "", Some(query)).unwrap();

    let root = inject_page();
    let mounted = birthday_wish::mount(GreetingConfig::default());
    history.replace_state_with_url(&JsValue::NULL, "", Some(&original)).unwrap();
    mounted.unwrap();

    let to = by_id("to");
    assert!(!to.hidden());
    assert_eq!(to.text_content().as_deref(), Some("To: Mira"));
    assert_eq!(by_id("from").text_content().as_deref(), Some("From: Jon"));
    assert_eq!(by_id("msg").text_content().as_deref(), Some("Hello there"));

    unmount(root);
}
