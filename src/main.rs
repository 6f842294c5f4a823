//! Stellar Escape entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use stellar_escape::audio::AudioManager;
    use stellar_escape::platform::{FixedStep, InputState, LocalStorage};
    use stellar_escape::renderer::CanvasRenderer;
    use stellar_escape::sim::{self, LEVELS_PER_PAGE, Mode};
    use stellar_escape::{Command, Game, Settings};

    /// Browser-side app holding the game and its collaborators
    struct App {
        game: Game<LocalStorage>,
        renderer: Option<CanvasRenderer>,
        audio: AudioManager,
        settings: Settings,
        input: InputState,
        step: FixedStep,
        level_page: u32,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl App {
        fn new(seed: u64) -> Self {
            let settings = Settings::load(&LocalStorage::open());
            Self {
                game: Game::new(seed, LocalStorage::open()),
                renderer: None,
                audio: AudioManager::new(&settings),
                settings,
                input: InputState::default(),
                step: FixedStep::new(),
                level_page: 1,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run the simulation ticks due this frame
        fn update(&mut self, time: f64) {
            let steps = self.step.advance_to(time);
            let keys = self.input.snapshot();
            for _ in 0..steps {
                self.game.tick(&keys);
            }
            self.flush_audio();

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        fn flush_audio(&mut self) {
            for notification in self.game.drain_notifications() {
                self.audio.play(notification);
            }
        }

        fn command(&mut self, command: Command, from_button: bool) {
            self.audio.resume();
            let result = if from_button {
                self.game.press_button(command)
            } else {
                self.game.handle(command)
            };
            if let Err(e) = result {
                log::error!("{:?} failed: {}", command, e);
            }
            self.step.reset();
            self.flush_audio();
        }

        fn auto_pause(&mut self, reason: &str) {
            self.input.clear();
            if self.settings.auto_pause_on_blur && self.game.mode() == Mode::Playing {
                self.game.toggle_pause();
                log::info!("Auto-paused ({})", reason);
            }
        }

        fn render(&self, time: f64) {
            if let Some(renderer) = &self.renderer {
                renderer.render(self.game.state(), time);
            }
        }

        /// Update HUD elements and overlays in the DOM
        fn update_hud(&self, document: &Document) {
            let state = self.game.state();
            let session = &state.session;
            let level = sim::level_config(session.current_level).ok();

            set_text(document, "#hud-score .hud-value", &session.score.to_string());
            set_text(
                document,
                "#hud-target .hud-value",
                &level.map(|l| l.target_score.to_string()).unwrap_or_default(),
            );
            set_text(
                document,
                "#hud-level .hud-value",
                &session.current_level.to_string(),
            );
            set_text(
                document,
                "#hud-high .hud-value",
                &self.game.progress().high_score.to_string(),
            );
            set_text(document, "#hud-fps .hud-value", &self.fps.to_string());
            if let Some(bar) = document.get_element_by_id("energy-fill") {
                let _ = bar.set_attribute("style", &format!("width: {}%", session.energy_gauge()));
            }

            show(document, "hud-fps", self.settings.show_fps);
            show(document, "start-screen", session.mode == Mode::Start);
            show(document, "pause-menu", session.mode == Mode::Paused);
            show(document, "level-complete", session.mode == Mode::LevelComplete);
            show(document, "game-over", session.mode == Mode::GameOver);

            if session.mode == Mode::GameOver || session.mode == Mode::LevelComplete {
                set_text(document, ".final-score", &session.score.to_string());
            }
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Stellar Escape starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        canvas.set_width((canvas.client_width() as f64 * dpr) as u32);
        canvas.set_height((canvas.client_height() as f64 * dpr) as u32);

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed)));
        app.borrow_mut().renderer = CanvasRenderer::new(&canvas);
        if app.borrow().renderer.is_none() {
            log::error!("Canvas 2D context unavailable");
        }
        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(&window, app.clone())?;
        setup_buttons(&document, app.clone())?;
        render_level_grid(&document, app.clone())?;
        setup_auto_pause(&window, &document, app.clone())?;

        request_animation_frame(app);
        log::info!("Stellar Escape running!");
        Ok(())
    }

    fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
        target: &web_sys::EventTarget,
        event: &str,
        handler: impl FnMut(E) + 'static,
    ) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_keyboard(window: &web_sys::Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        {
            let app = app.clone();
            listen(window, "keydown", move |event: KeyboardEvent| {
                let code = event.code();
                if code == "Space" || code.starts_with("Arrow") {
                    event.prevent_default();
                }
                let mut a = app.borrow_mut();
                if let Some(command) = a.input.key_down(&code) {
                    if !event.repeat() {
                        a.command(command, false);
                    }
                }
            })?;
        }
        listen(window, "keyup", move |event: KeyboardEvent| {
            app.borrow_mut().input.key_up(&event.code());
        })
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let buttons = [
            ("play-btn", Command::SelectLevel(1)),
            ("resume-btn", Command::TogglePause),
            ("pause-btn", Command::TogglePause),
            ("restart-btn", Command::Restart),
            ("retry-btn", Command::Restart),
            ("next-level-btn", Command::NextLevel),
            ("home-btn", Command::Home),
            ("menu-btn", Command::Home),
        ];
        for (id, command) in buttons {
            if let Some(btn) = document.get_element_by_id(id) {
                let app = app.clone();
                listen(&btn, "click", move |_event: web_sys::MouseEvent| {
                    app.borrow_mut().command(command, true);
                })?;
            }
        }

        for (id, delta) in [("prev-page-btn", -1i32), ("next-page-btn", 1)] {
            if let Some(btn) = document.get_element_by_id(id) {
                let app = app.clone();
                listen(&btn, "click", move |_event: web_sys::MouseEvent| {
                    let page = {
                        let mut a = app.borrow_mut();
                        let pages = sim::levels::page_count() as i32;
                        a.level_page = (a.level_page as i32 + delta).clamp(1, pages) as u32;
                        a.level_page
                    };
                    log::debug!("Level select page {}", page);
                    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                        if let Err(e) = render_level_grid(&document, app.clone()) {
                            log::error!("Level grid: {:?}", e);
                        }
                    }
                })?;
            }
        }

        if let Some(btn) = document.get_element_by_id("mute-btn") {
            listen(&btn, "click", move |_event: web_sys::MouseEvent| {
                let mut a = app.borrow_mut();
                let muted = a.settings.toggle_mute();
                let settings = a.settings.clone();
                a.audio.apply_settings(&settings);
                if let Err(e) = settings.save(&mut LocalStorage::open()) {
                    log::warn!("{}", e);
                }
                log::info!("Muted: {}", muted);
            })?;
        }
        Ok(())
    }

    /// Rebuild the level select buttons for the current page
    fn render_level_grid(document: &Document, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let Some(grid) = document.get_element_by_id("level-grid") else {
            return Ok(());
        };
        grid.set_inner_html("");

        let page = app.borrow().level_page;
        let levels = sim::levels_on_page(page).map_err(|e| JsValue::from_str(&e.to_string()))?;
        debug_assert!(levels.clone().count() as u32 <= LEVELS_PER_PAGE);

        for level in levels {
            let config = sim::level_config(level).map_err(|e| JsValue::from_str(&e.to_string()))?;
            let unlocked = app.borrow().game.progress().is_unlocked(level);

            let btn = document.create_element("button")?;
            btn.set_text_content(Some(&level.to_string()));
            btn.set_attribute("title", config.difficulty.as_str())?;
            btn.set_attribute(
                "class",
                if unlocked { "level-btn" } else { "level-btn locked" },
            )?;
            if unlocked {
                let app = app.clone();
                listen(&btn, "click", move |_event: web_sys::MouseEvent| {
                    app.borrow_mut().command(Command::SelectLevel(level), true);
                })?;
            }
            grid.append_child(&btn)?;
        }

        set_text(
            document,
            "#level-page",
            &format!("{} / {}", page, sim::levels::page_count()),
        );
        Ok(())
    }

    fn setup_auto_pause(
        window: &web_sys::Window,
        document: &Document,
        app: Rc<RefCell<App>>,
    ) -> Result<(), JsValue> {
        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            listen(document, "visibilitychange", move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().auto_pause("tab hidden");
                }
            })?;
        }
        // Window blur (click outside)
        listen(window, "blur", move |_event: web_sys::FocusEvent| {
            app.borrow_mut().auto_pause("window blur");
        })
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let unlocked_changed = {
            let mut a = app.borrow_mut();
            let before = a.game.progress().unlocked_levels.len();
            a.update(time);
            a.render(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                a.update_hud(&document);
            }
            before != a.game.progress().unlocked_levels.len()
        };
        // A level was unlocked this frame
        if unlocked_changed {
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                if let Err(e) = render_level_grid(&document, app.clone()) {
                    log::error!("Level grid: {:?}", e);
                }
            }
        }
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Stellar Escape (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let tuning = match std::env::args().nth(2) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| stellar_escape::Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                stellar_escape::Tuning::default()
            }
        },
        None => stellar_escape::Tuning::default(),
    };
    demo::run(seed, tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use stellar_escape::persistence::MemoryStore;
    use stellar_escape::sim::{KeyState, Mode, Notification};
    use stellar_escape::{Command, Game, Tuning, normalize_degrees};

    /// Ten minutes of play at 16 ms per tick
    const MAX_TICKS: u32 = 37_500;

    /// Autopilot: steer toward the nearest crystal
    fn autopilot(game: &Game<MemoryStore>) -> KeyState {
        let state = game.state();
        let ship = &state.ship;
        let Some(target) = state
            .entities
            .crystals
            .iter()
            .min_by(|a, b| {
                a.pos
                    .distance_squared(ship.pos)
                    .total_cmp(&b.pos.distance_squared(ship.pos))
            })
        else {
            return KeyState::default();
        };

        let to = target.pos - ship.pos;
        let wanted = to.y.atan2(to.x).to_degrees();
        let diff = normalize_degrees(wanted - ship.angle_deg);
        KeyState {
            rotate_left: diff > 180.0 && diff < 355.0,
            rotate_right: diff > 5.0 && diff <= 180.0,
            forward: !(20.0..=340.0).contains(&diff),
            backward: false,
        }
    }

    pub fn run(seed: u64, tuning: Tuning) {
        let mut game = Game::with_tuning(seed, tuning, MemoryStore::default());
        if let Err(e) = game.handle(Command::Confirm) {
            log::error!("Could not start: {}", e);
            return;
        }

        let mut collected = 0;
        for tick in 0..MAX_TICKS {
            let keys = autopilot(&game);
            game.tick(&keys);
            collected += game
                .drain_notifications()
                .iter()
                .filter(|n| **n == Notification::Collect)
                .count();

            match game.mode() {
                Mode::LevelComplete => {
                    log::info!(
                        "Level {} cleared at tick {}",
                        game.state().session.current_level,
                        tick
                    );
                    if let Err(e) = game.handle(Command::NextLevel) {
                        log::error!("{}", e);
                        break;
                    }
                }
                Mode::GameOver => {
                    log::info!("Crashed at tick {}", tick);
                    break;
                }
                Mode::Start => break,
                _ => {}
            }
        }

        let progress = game.progress();
        log::info!(
            "Demo finished: level {}, score {}, {} crystals, high score {}, furthest level {}",
            game.state().session.current_level,
            game.state().session.score,
            collected,
            progress.high_score,
            progress.furthest_level()
        );
    }
}
