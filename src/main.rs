//! Lane Dash entry point
//!
//! Handles platform-specific initialization and owns the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent, MouseEvent,
        TouchEvent,
    };

    use lane_dash::audio::{AudioManager, SoundEffect};
    use lane_dash::highscores::BestScores;
    use lane_dash::renderer;
    use lane_dash::sim::{GameEvent, GamePhase, GameState, step};

    /// Delay between the crash and the game-over overlay, milliseconds
    const GAME_OVER_DELAY_MS: i32 = 220;
    /// Minimum swipe distance in CSS pixels
    const SWIPE_THRESHOLD: f32 = 40.0;

    /// Game instance holding all state plus the scheduling flag
    struct Game {
        state: GameState,
        ctx: CanvasRenderingContext2d,
        canvas: HtmlCanvasElement,
        audio: AudioManager,
        best: BestScores,
        last_time: f64,
        /// True while a requestAnimationFrame chain is live
        raf_active: bool,
        touch_start: Option<(f32, f32)>,
    }

    impl Game {
        fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
            let w = canvas.client_width() as f32;
            let h = canvas.client_height() as f32;
            let seed = js_sys::Date::now() as u64;
            log::info!("Run RNG seeded with {}", seed);
            Self {
                state: GameState::new(seed, w, h),
                ctx,
                canvas,
                audio: AudioManager::new(),
                best: BestScores::load(),
                last_time: 0.0,
                raf_active: false,
                touch_start: None,
            }
        }

        /// Begin a fresh run
        fn start(&mut self) {
            self.state.start();
            self.last_time = 0.0;
            self.audio.resume();
        }

        /// One frame: step (unless paused), render, refresh the HUD
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                1.0 / 60.0
            };
            self.last_time = time;

            if self.state.phase == GamePhase::Running {
                let events = step(&mut self.state, dt);
                self.handle_events(&events);
            }
            renderer::render(&mut self.state, &self.ctx);
            self.update_hud();
        }

        fn handle_events(&mut self, events: &[GameEvent]) {
            for event in events {
                match event {
                    GameEvent::CoinCollected => self.audio.play(SoundEffect::CoinPickup),
                    GameEvent::Crashed => self.on_crash(),
                }
            }
        }

        /// Run ended: beep, persist the score, surface the overlay
        fn on_crash(&mut self) {
            self.audio.play(SoundEffect::Crash);
            self.best.push(self.state.score);
            self.best.save();
            log::info!("Game over at {} points", self.state.score);

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            update_best_list(&document, &self.best);
            if let Some(el) = document.get_element_by_id("final-score") {
                el.set_text_content(Some(&format!("Your score: {}", self.state.score)));
            }
            show_game_over_later();
        }

        /// Update score/best readouts in the side panel
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("best") {
                let shown = self.state.score.max(self.best.best());
                el.set_text_content(Some(&shown.to_string()));
            }
        }

        /// Match the backing store to the container and re-anchor the player
        fn resize(&mut self) {
            let w = self.canvas.client_width() as u32;
            let h = self.canvas.client_height() as u32;
            self.canvas.set_width(w);
            self.canvas.set_height(h);
            self.state.resize(w as f32, h as f32);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Lane Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(canvas.client_width() as u32);
        canvas.set_height(canvas.client_height() as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let game = Rc::new(RefCell::new(Game::new(canvas.clone(), ctx)));

        {
            let g = game.borrow();
            update_best_list(&document, &g.best);
            g.update_hud();
            renderer::render_idle(&g.ctx, g.state.width as f64, g.state.height as f64);
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_resize(game);

        log::info!("Lane Dash ready - press Start");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard: arrows change lane, P toggles pause
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" => g.state.move_lane(-1),
                    "ArrowRight" => g.state.move_lane(1),
                    "KeyP" => {
                        g.state.toggle_pause();
                        sync_pause_label(&g.state);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Desktop click advances one lane
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().state.move_lane(1);
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start records the gesture origin
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut().touch_start =
                        Some((touch.client_x() as f32, touch.client_y() as f32));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end resolves the gesture: horizontal swipe = lane change,
        // upward swipe = jump, short tap = advance one lane
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                let Some((start_x, start_y)) = g.touch_start.take() else {
                    return;
                };
                let Some(touch) = event.changed_touches().get(0) else {
                    return;
                };
                let dx = touch.client_x() as f32 - start_x;
                let dy = touch.client_y() as f32 - start_y;

                if dx.abs() > SWIPE_THRESHOLD && dx.abs() > dy.abs() {
                    g.state.move_lane(if dx > 0.0 { 1 } else { -1 });
                } else if dy < -SWIPE_THRESHOLD {
                    if g.state.jump() {
                        g.audio.play(SoundEffect::Jump);
                    }
                } else {
                    g.state.move_lane(1);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Start: resume a paused run, otherwise begin a fresh one
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                {
                    let mut g = game.borrow_mut();
                    match g.state.phase {
                        GamePhase::Running => {}
                        GamePhase::Paused => g.state.toggle_pause(),
                        _ => g.start(),
                    }
                    g.audio.resume();
                    sync_pause_label(&g.state);
                }
                kick_loop(game.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pause toggle
        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.state.toggle_pause();
                sync_pause_label(&g.state);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restart: fresh run no matter the current phase
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                {
                    let mut g = game.borrow_mut();
                    g.start();
                    sync_pause_label(&g.state);
                }
                hide_game_over();
                kick_loop(game.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Try again on the game-over overlay
        if let Some(btn) = document.get_element_by_id("try-again-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                hide_game_over();
                {
                    let mut g = game.borrow_mut();
                    g.start();
                    sync_pause_label(&g.state);
                }
                kick_loop(game.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // On-screen lane buttons: touchstart (with preventDefault so the
        // synthetic click is suppressed) plus plain click for mouse
        for (id, delta) in [("left-btn", -1), ("right-btn", 1)] {
            if let Some(btn) = document.get_element_by_id(id) {
                {
                    let game = game.clone();
                    let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                        event.prevent_default();
                        game.borrow_mut().state.move_lane(delta);
                    });
                    let _ = btn.add_event_listener_with_callback(
                        "touchstart",
                        closure.as_ref().unchecked_ref(),
                    );
                    closure.forget();
                }
                {
                    let game = game.clone();
                    let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                        game.borrow_mut().state.move_lane(delta);
                    });
                    let _ = btn
                        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                    closure.forget();
                }
            }
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Start the frame chain if it is not already live
    fn kick_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.raf_active {
                return;
            }
            g.raf_active = true;
            g.last_time = 0.0;
        }
        request_animation_frame(game);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            // The chain dies with the run; Start/Restart kick a new one
            if !matches!(g.state.phase, GamePhase::Running | GamePhase::Paused) {
                g.raf_active = false;
                return;
            }
            g.frame(time);
        }
        request_animation_frame(game);
    }

    /// Rebuild the ranked list in the side panel
    fn update_best_list(document: &Document, best: &BestScores) {
        let Some(list) = document.get_element_by_id("best-list") else {
            return;
        };
        list.set_inner_html("");
        for (i, score) in best.scores.iter().enumerate() {
            if let Ok(li) = document.create_element("li") {
                li.set_text_content(Some(&format!("{}. {}", i + 1, score)));
                let _ = list.append_child(&li);
            }
        }
    }

    /// Keep the pause button label in sync with the phase
    fn sync_pause_label(state: &GameState) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let label = if state.phase == GamePhase::Paused {
                "Resume"
            } else {
                "Pause"
            };
            btn.set_text_content(Some(label));
        }
    }

    /// Reveal the game-over overlay shortly after the crash frame
    fn show_game_over_later() {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once_into_js(move || {
            if let Some(el) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("game-over"))
            {
                let _ = el.class_list().add_1("show");
            }
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.unchecked_ref(),
            GAME_OVER_DELAY_MS,
        );
    }

    fn hide_game_over() {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("game-over"))
        {
            let _ = el.class_list().remove_1("show");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lane_dash::sim::{GamePhase, GameState, step};

    env_logger::init();
    log::info!("Lane Dash (native) starting...");
    log::info!("The browser shell is the real frontend - run with `trunk serve`");

    // Headless smoke run: a minute of simulated play on a fixed seed
    let mut state = GameState::new(42, 960.0, 720.0);
    state.start();
    state.jump();
    let mut frames = 0u32;
    for _ in 0..3600 {
        let events = step(&mut state, 1.0 / 60.0);
        frames += 1;
        if !events.is_empty() {
            log::debug!("frame {frames}: {events:?}");
        }
        if state.phase == GamePhase::GameOver {
            break;
        }
    }
    println!(
        "Headless sim: {} frames, score {}, {} obstacles and {} coins live at exit",
        frames,
        state.score,
        state.obstacles.len(),
        state.coins.len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
