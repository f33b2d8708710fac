//! Space Math Mission entry point
//!
//! On the web this wires DOM events to game intents and redraws from game
//! events. Natively it flies an autopilot run and logs what happens.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlInputElement, KeyboardEvent, MouseEvent};

    use space_math::audio::{AudioManager, SoundEffect};
    use space_math::consts::DEFAULT_PILOT_NAME;
    use space_math::game::{Game, GameEvent, GamePhase, Intent, STAGES};
    use space_math::persistence::LocalStore;
    use space_math::view::{HudView, ProblemLayout, TrackerMark, tracker};
    use space_math::{Settings, platform};

    /// Clock resolution for deferred transitions
    const TICK_MS: i32 = 100;
    const CONFETTI: [&str; 5] = ["🌟", "✨", "⭐", "💫", "🚀"];

    /// Browser shell around the game core
    struct App {
        game: Game<LocalStore>,
        audio: AudioManager,
        settings: Settings,
        document: Document,
    }

    impl App {
        fn dispatch(&mut self, intent: Intent) {
            self.game.advance_to(platform::now_ms());
            self.game.handle(intent);
            self.flush();
        }

        fn tick(&mut self) {
            let now = platform::now_ms();
            if self.game.next_due().is_some_and(|due| due <= now) {
                self.game.advance_to(now);
                self.flush();
            }
        }

        /// React to pending events, then redraw
        fn flush(&mut self) {
            let events = self.game.drain_events();
            if events.is_empty() {
                return;
            }
            for event in &events {
                for effect in SoundEffect::for_event(event) {
                    self.audio.play(*effect);
                }
                self.apply_event(event);
            }
            self.render();
        }

        fn apply_event(&self, event: &GameEvent) {
            let doc = &self.document;
            match event {
                GameEvent::Correct { praise, .. } => {
                    show_feedback(doc, "🎉", praise, true);
                    self.launch_confetti(self.settings.confetti_bursts(false));
                }
                GameEvent::Incorrect => show_feedback(doc, "💫", "Try again!", false),
                GameEvent::NeedsMoreInput { .. } => {
                    show_feedback(doc, "🤔", "Fill all the boxes!", false)
                }
                GameEvent::FeedbackDismissed => set_hidden(doc, "feedback", true),
                GameEvent::StageFact { stage, text } => {
                    if let Some(planet) = STAGES.get(*stage) {
                        if let Some(el) = doc.get_element_by_id("planet-fact-emoji") {
                            el.set_inner_html(&format!(
                                "<img src=\"{}\" alt=\"{}\">",
                                planet.image, planet.name
                            ));
                        }
                        set_text(doc, "planet-fact-title", &format!("Welcome to {}!", planet.name));
                        set_text(doc, "planet-fact-text", text);
                        set_hidden(doc, "planet-fact", false);
                    }
                }
                GameEvent::StageFactDismissed => set_hidden(doc, "planet-fact", true),
                GameEvent::Victory { pilot_name, score } => {
                    if let Some(el) = doc.get_element_by_id("final-stats") {
                        el.set_inner_html(&format!(
                            "<p class=\"trophy\">☀️🏆</p>\
                             <p class=\"boss\">BOSS DEFEATED!</p>\
                             <p>Pilot: <strong>{}</strong></p>\
                             <p>Final Score: ⭐ {}</p>\
                             <p class=\"note\">You conquered the entire solar system!</p>",
                            escape(pilot_name),
                            score
                        ));
                    }
                    set_hidden(doc, "victory-screen", false);
                    self.launch_confetti(self.settings.confetti_bursts(true));
                }
                GameEvent::SessionReset { hard } => {
                    set_hidden(doc, "victory-screen", true);
                    set_hidden(doc, "planet-fact", true);
                    if *hard {
                        if let Some(input) = pilot_input(doc) {
                            input.set_value(DEFAULT_PILOT_NAME);
                        }
                        set_hidden(doc, "start-screen", false);
                    }
                }
                GameEvent::Launched { .. }
                | GameEvent::StageAdvanced { .. }
                | GameEvent::ProblemReady { .. }
                | GameEvent::DigitPlaced { .. }
                | GameEvent::DigitRemoved { .. }
                | GameEvent::CarryToggled { .. } => {}
            }
        }

        fn render(&self) {
            let doc = &self.document;
            let session = self.game.session();
            let hud = HudView::from_session(session);

            set_text(doc, "streak", &format!("🔥 {}", hud.streak));
            set_text(doc, "score", &format!("⭐ {}", hud.score));
            set_text(doc, "planet-progress-text", &hud.progress_text());
            if let Some(el) = doc.get_element_by_id("planet-progress-bar") {
                let _ = el.set_attribute("style", &format!("--progress: {}%", hud.progress * 100.0));
            }
            if let Some(stage) = hud.stage {
                set_text(doc, "current-planet-name", stage.name);
                if let Some(el) = doc.get_element_by_id("current-planet-emoji") {
                    el.set_inner_html(&format!("<img src=\"{}\" alt=\"{}\">", stage.image, stage.name));
                }
            }

            if let Some(el) = doc.get_element_by_id("planet-tracker") {
                let html: String = tracker(session)
                    .iter()
                    .enumerate()
                    .map(|(i, (stage, mark))| {
                        let class = match mark {
                            TrackerMark::Reached => "planet reached",
                            TrackerMark::Current => "planet current",
                            TrackerMark::Ahead => "planet",
                        };
                        format!(
                            "<span class=\"{}\" title=\"{}\" data-index=\"{}\"><img src=\"{}\" alt=\"{}\"></span>",
                            class, stage.name, i, stage.image, stage.name
                        )
                    })
                    .collect();
                el.set_inner_html(&html);
            }

            if let Some(layout) = ProblemLayout::from_session(session) {
                render_problem(doc, &layout);
            }
        }

        fn launch_confetti(&self, bursts: u32) {
            let Some(window) = web_sys::window() else { return };
            let Some(body) = self.document.body() else { return };
            for _ in 0..bursts {
                for _ in 0..20 {
                    let Ok(piece) = self.document.create_element("div") else { return };
                    let emoji = CONFETTI[(js_sys::Math::random() * CONFETTI.len() as f64) as usize % CONFETTI.len()];
                    piece.set_class_name("confetti");
                    piece.set_text_content(Some(emoji));
                    let _ = piece.set_attribute(
                        "style",
                        &format!(
                            "left: {:.1}%; font-size: {:.0}px; animation-delay: {:.2}s",
                            js_sys::Math::random() * 100.0,
                            js_sys::Math::random() * 20.0 + 15.0,
                            js_sys::Math::random() * 0.5
                        ),
                    );
                    let _ = body.append_child(&piece);
                    let cleanup = Closure::once_into_js(move || piece.remove());
                    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                        cleanup.unchecked_ref(),
                        3000,
                    );
                }
            }
        }
    }

    fn render_problem(doc: &Document, layout: &ProblemLayout) {
        let digits = |row: &[Option<char>]| -> String {
            row.iter()
                .map(|d| format!("<div class=\"digit\">{}</div>", d.map(String::from).unwrap_or_default()))
                .collect()
        };
        if let Some(el) = doc.get_element_by_id("number1-row") {
            el.set_inner_html(&digits(&layout.top));
        }
        if let Some(el) = doc.get_element_by_id("number2-row") {
            el.set_inner_html(&digits(&layout.bottom));
        }
        set_text(doc, "operator", &layout.operator.to_string());

        if let Some(el) = doc.get_element_by_id("carry-row") {
            let html: String = layout
                .carries
                .iter()
                .enumerate()
                .map(|(i, marked)| {
                    if *marked {
                        format!("<div class=\"carry-slot has-carry\" data-index=\"{}\">¹</div>", i)
                    } else {
                        format!("<div class=\"carry-slot\" data-index=\"{}\"></div>", i)
                    }
                })
                .collect();
            el.set_inner_html(&html);
        }

        if let Some(el) = doc.get_element_by_id("answer-row") {
            let html: String = layout
                .answer
                .iter()
                .enumerate()
                .map(|(i, slot)| match slot {
                    Some(d) => format!("<div class=\"answer-slot filled\" data-index=\"{}\">{}</div>", i, d),
                    None => format!("<div class=\"answer-slot\" data-index=\"{}\"></div>", i),
                })
                .collect();
            el.set_inner_html(&html);
        }
    }

    fn show_feedback(doc: &Document, emoji: &str, text: &str, success: bool) {
        set_text(doc, "feedback-emoji", emoji);
        set_text(doc, "feedback-text", text);
        if let Some(el) = doc.get_element_by_id("feedback-text") {
            let color = if success { "var(--success-green)" } else { "var(--gold)" };
            let _ = el.set_attribute("style", &format!("color: {}", color));
        }
        set_hidden(doc, "feedback", false);
    }

    fn set_text(doc: &Document, id: &str, text: &str) {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(doc: &Document, id: &str, hidden: bool) {
        if let Some(el) = doc.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    fn is_visible(doc: &Document, id: &str) -> bool {
        doc.get_element_by_id(id)
            .is_some_and(|el| !el.class_list().contains("hidden"))
    }

    fn pilot_input(doc: &Document) -> Option<HtmlInputElement> {
        doc.get_element_by_id("pilot-name")?.dyn_into().ok()
    }

    fn escape(text: &str) -> String {
        text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
    }

    /// `data-index` of the nearest ancestor matching `selector`
    fn target_index(event: &MouseEvent, selector: &str) -> Option<usize> {
        let target: Element = event.target()?.dyn_into().ok()?;
        target
            .closest(selector)
            .ok()??
            .get_attribute("data-index")?
            .parse()
            .ok()
    }

    fn on_click(doc: &Document, id: &str, mut handler: impl FnMut(MouseEvent) + 'static) {
        if let Some(el) = doc.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| handler(event));
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(doc: &Document, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            let document = doc.clone();
            on_click(doc, "start-btn", move |_| {
                let name = pilot_input(&document).map(|i| i.value()).unwrap_or_default();
                set_hidden(&document, "start-screen", true);
                app.borrow_mut().dispatch(Intent::StartWithName(name));
            });
        }
        {
            let app = app.clone();
            on_click(doc, "play-again-btn", move |_| app.borrow_mut().dispatch(Intent::Restart));
        }
        {
            let app = app.clone();
            on_click(doc, "reset-btn", move |_| app.borrow_mut().dispatch(Intent::HardReset));
        }
        {
            let app = app.clone();
            on_click(doc, "backspace-btn", move |_| {
                app.borrow_mut().dispatch(Intent::ClearLastDigit)
            });
        }
        {
            let app = app.clone();
            on_click(doc, "submit-btn", move |_| app.borrow_mut().dispatch(Intent::Submit));
        }
        {
            let app = app.clone();
            on_click(doc, "planet-fact", move |_| {
                app.borrow_mut().dispatch(Intent::DismissNotification)
            });
        }
        {
            let app = app.clone();
            on_click(doc, "answer-row", move |event| {
                if let Some(index) = target_index(&event, ".answer-slot") {
                    app.borrow_mut().dispatch(Intent::ClearSlot(index));
                }
            });
        }
        {
            let app = app.clone();
            on_click(doc, "carry-row", move |event| {
                if let Some(index) = target_index(&event, ".carry-slot") {
                    app.borrow_mut().dispatch(Intent::ToggleCarry(index));
                }
            });
        }

        // Number tiles
        if let Ok(tiles) = doc.query_selector_all(".tile[data-value]") {
            for i in 0..tiles.length() {
                let Some(tile) = tiles.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                    continue;
                };
                let Some(digit) = tile.get_attribute("data-value").and_then(|v| v.chars().next())
                else {
                    continue;
                };
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    app.borrow_mut().dispatch(Intent::EnterDigit(digit));
                });
                let _ =
                    tile.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_keyboard(doc: &Document, app: Rc<RefCell<App>>) {
        let document = doc.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if is_visible(&document, "start-screen") || is_visible(&document, "victory-screen") {
                return;
            }
            let mut app = app.borrow_mut();
            // Any key closes the arrival notification first
            if app.game.fact_showing() {
                app.dispatch(Intent::DismissNotification);
                return;
            }
            let key = event.key();
            match key.as_str() {
                "Backspace" => app.dispatch(Intent::ClearLastDigit),
                "Enter" => app.dispatch(Intent::Submit),
                k if k.len() == 1 && k.chars().all(|c| c.is_ascii_digit()) => {
                    if let Some(digit) = k.chars().next() {
                        app.dispatch(Intent::EnterDigit(digit));
                    }
                }
                _ => {}
            }
        });
        let _ = doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_clock(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut()>::new(move || app.borrow_mut().tick());
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            TICK_MS,
        );
        closure.forget();
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            return;
        }
        log::info!("Space Math Mission starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - cannot start");
            return;
        };

        let store = LocalStore::open();
        let settings = Settings::default();
        let game = Game::new(store, platform::run_seed());
        if let Some(input) = pilot_input(&document) {
            input.set_value(&game.session().pilot_name);
        }
        if game.phase() == GamePhase::Briefing && game.has_progress() {
            log::info!("Found saved journey at planet {}", game.session().current_stage + 1);
        }

        let app = Rc::new(RefCell::new(App {
            audio: AudioManager::new(&settings),
            game,
            settings,
            document: document.clone(),
        }));
        app.borrow().render();

        setup_buttons(&document, app.clone());
        setup_keyboard(&document, app.clone());
        setup_clock(app);

        log::info!("Space Math Mission ready!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Space Math Mission (native) starting...");
    log::info!("The game UI is web-only - run with `trunk serve`. Flying autopilot instead.");
    autopilot::fly(space_math::platform::run_seed());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Native demo: solve every problem (with the occasional slip) until victory
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use space_math::consts::NEXT_PROBLEM_AFTER_ADVANCE_MS;
    use space_math::game::{Game, GameEvent, GamePhase, Intent};
    use space_math::persistence::SnapshotStore;
    use space_math::platform;
    use space_math::view::HudView;

    /// Every seventh answer is fumbled on purpose to show the streak reset
    const SLIP_EVERY: u32 = 7;

    pub fn fly(seed: u64) {
        let mut game = Game::new(platform::open_store(), seed);
        game.handle(Intent::StartWithName("Autopilot".into()));

        let mut clock = 0u64;
        let mut attempts = 0u32;
        while game.phase() != GamePhase::Victorious {
            if game.phase() == GamePhase::Playing {
                attempts += 1;
                let Some(problem) = game.session().current_problem.clone() else {
                    break;
                };
                let answer = if attempts % SLIP_EVERY == 0 {
                    slip(&problem.expected_answer)
                } else {
                    problem.expected_answer.clone()
                };
                log::info!("{} = {}?", problem, answer);
                for digit in answer.chars().rev() {
                    game.handle(Intent::EnterDigit(digit));
                }
                game.handle(Intent::Submit);
            }
            clock += NEXT_PROBLEM_AFTER_ADVANCE_MS;
            game.advance_to(clock);
            let events = game.drain_events();
            report(&game, events);
        }
        log::info!("Autopilot finished after {} attempts", attempts);
    }

    fn report<S: SnapshotStore>(game: &Game<S>, events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::Correct { points, praise, .. } => log::info!("  {} +{}", praise, points),
                GameEvent::Incorrect => log::info!("  Try again!"),
                GameEvent::StageAdvanced { .. } => {
                    let hud = HudView::from_session(game.session());
                    log::info!(
                        "Arrived at {} (score {}, planet {}/{})",
                        hud.stage.map_or("?", |s| s.name),
                        hud.score,
                        hud.stage_index + 1,
                        hud.stage_count
                    );
                }
                GameEvent::StageFact { text, .. } => log::info!("  {}", text),
                GameEvent::Victory { pilot_name, score } => {
                    log::info!("🏆 {} conquered the Sun with {} points!", pilot_name, score)
                }
                other => log::debug!("  {:?}", other),
            }
        }
    }

    /// Same length, last digit changed
    fn slip(answer: &str) -> String {
        let mut digits: Vec<char> = answer.chars().collect();
        if let Some(last) = digits.last_mut() {
            *last = if *last == '9' { '0' } else { (*last as u8 + 1) as char };
        }
        digits.into_iter().collect()
    }
}
