//! ZipZap entry point
//!
//! Browser builds run the canvas front-end; native builds run a headless
//! session driven by the autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use zipzap::audio::{AudioManager, SoundEffect};
    use zipzap::persistence::{LocalStorageStore, PersistOutcome, ScoreStore};
    use zipzap::platform;
    use zipzap::renderer::{CanvasPainter, Hud, scene};
    use zipzap::sim::{GameState, Playfield, autopilot};
    use zipzap::submit::SubmitOutcome;
    use zipzap::{FrameOutcome, Session, Settings};

    /// How long a notice stays on screen (ms)
    const NOTICE_MS: f64 = 4000.0;

    thread_local! {
        static STORE: Rc<RefCell<LocalStorageStore>> =
            Rc::new(RefCell::new(LocalStorageStore::load()));
    }

    fn store() -> Rc<RefCell<LocalStorageStore>> {
        STORE.with(|s| s.clone())
    }

    /// Called by the host page once its auth flow knows who is playing
    #[wasm_bindgen]
    pub fn sign_in(player_id: &str, display_name: &str) {
        if let Err(e) = store().borrow_mut().sign_in(player_id, display_name) {
            log::warn!("Could not save sign-in: {}", e);
        }
    }

    #[wasm_bindgen]
    pub fn sign_out() {
        if let Err(e) = store().borrow_mut().sign_out() {
            log::warn!("Could not save sign-out: {}", e);
        }
    }

    /// Leaderboard as JSON rows `{name, attempts, score}`
    #[wasm_bindgen]
    pub fn leaderboard(limit: usize) -> String {
        store()
            .borrow()
            .fetch_top(limit)
            .ok()
            .and_then(|rows| serde_json::to_string(&rows).ok())
            .unwrap_or_else(|| "[]".to_string())
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        settings: Settings,
        painter: Option<CanvasPainter>,
        audio: AudioManager,
        /// Pending `requestAnimationFrame` handle
        raf_handle: Option<i32>,
        autopilot: bool,
        notice: Option<(String, f64)>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, settings: Settings, playfield: Playfield) -> Self {
            let state = GameState::with_playfield(seed, settings.variant.tuning(), playfield);
            let session = Session::from_state(state);
            Self {
                session,
                audio: AudioManager::new(&settings),
                settings,
                painter: None,
                raf_handle: None,
                autopilot: false,
                notice: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Toggle sound, persist the choice and push it to the mixer
        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_mute();
            self.settings.save();
            self.audio.apply_settings(&self.settings);
            self.show_notice(if muted { "Sound off" } else { "Sound on" }.to_string());
        }

        fn show_notice(&mut self, text: String) {
            self.notice = Some((text, platform::now_ms() + NOTICE_MS));
        }

        /// Paint the world and the HUD
        fn render(&mut self) {
            let now = platform::now_ms();
            if self.notice.as_ref().is_some_and(|(_, until)| *until < now) {
                self.notice = None;
            }

            let Some(painter) = &self.painter else { return };
            let state = self.session.state();
            let best = store().borrow().inner().current_player().map(|p| p.high_score);
            let hud = Hud {
                best,
                fps: self.settings.show_fps.then_some(self.fps as f32),
                notice: self.notice.as_ref().map(|(text, _)| text.clone()),
                autopilot: self.autopilot,
            };
            painter.paint(&scene::build(state));
            painter.paint(&scene::overlay(state, &hud));

            // Restart button only makes sense after a game over
            if let Some(btn) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("restart-btn"))
            {
                let class = if self.session.is_over() { "" } else { "hidden" };
                let _ = btn.set_attribute("class", class);
            }
        }

        /// Returns true if a new run started
        fn restart(&mut self) -> bool {
            if !self.session.restart() {
                return false;
            }
            self.notice = None;
            self.session.drain_events();
            true
        }

        fn flip(&mut self) {
            self.audio.resume();
            if self.session.flip() {
                self.audio.play(SoundEffect::Flip);
                self.session.drain_events();
            }
        }

        /// Cancel scheduling (page teardown)
        fn teardown(&mut self) {
            self.session.stop();
            if let Some(handle) = self.raf_handle.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
            log::info!("Game loop torn down");
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("ZipZap starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let playfield = fit_canvas(&canvas);
        let settings = Settings::load();
        let seed = platform::clock_seed();
        let game = Rc::new(RefCell::new(Game::new(seed, settings, playfield)));

        match CanvasPainter::new(&canvas) {
            Some(painter) => game.borrow_mut().painter = Some(painter),
            None => log::error!("Canvas 2D context unavailable - rendering disabled"),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());
        setup_resize(&canvas, game.clone());
        setup_teardown(game.clone());

        request_animation_frame(game);

        log::info!("ZipZap running with seed: {}", seed);
    }

    /// Match the canvas backing store to its CSS size; the playfield uses
    /// the same units so hitboxes and pixels agree
    fn fit_canvas(canvas: &HtmlCanvasElement) -> Playfield {
        let w = canvas.client_width().max(0) as u32;
        let h = canvas.client_height().max(0) as u32;
        canvas.set_width(w);
        canvas.set_height(h);
        Playfield::new(w as f32, h as f32)
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer / tap flips
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                game.borrow_mut().flip();
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                let mut g = game.borrow_mut();

                if g.session.is_over() && g.settings.matches_restart(&key) {
                    event.prevent_default();
                    let restarted = g.restart();
                    drop(g);
                    if restarted {
                        request_animation_frame(game.clone());
                    }
                    return;
                }

                if g.settings.matches_flip(&key) {
                    event.prevent_default();
                    if !event.repeat() {
                        g.flip();
                    }
                    return;
                }

                if g.settings.matches_mute(&key) {
                    if !event.repeat() {
                        g.toggle_mute();
                        g.render();
                    }
                    return;
                }

                if key == "i" || key == "I" {
                    g.autopilot = !g.autopilot;
                    log::info!("Idle mode: {}", g.autopilot);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let restarted = game.borrow_mut().restart();
                if restarted {
                    request_animation_frame(game.clone());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let playfield = fit_canvas(&canvas);
            let mut g = game.borrow_mut();
            g.session.state_mut().set_playfield(playfield);
            if let Some(painter) = &mut g.painter {
                painter.resize(canvas.width(), canvas.height());
            }
            g.render();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().teardown();
        });
        let _ =
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        if game.borrow().raf_handle.is_some() {
            return;
        }

        let handle_game = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        if let Ok(handle) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            handle_game.borrow_mut().raf_handle = Some(handle);
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_running = {
            let mut g = game.borrow_mut();
            g.raf_handle = None;
            g.track_fps(time);

            if g.autopilot && autopilot::should_flip(g.session.state()) {
                g.flip();
            }

            let outcome = g.session.frame();
            let events = g.session.drain_events();
            g.audio.play_events(&events);

            if let FrameOutcome::Ended { final_score } = outcome {
                log::info!("Game over with score {}", final_score);
                submit_detached(Rc::downgrade(&game), &g.session, final_score);
            }

            g.render();
            g.session.is_running()
        };

        if keep_running {
            request_animation_frame(game);
        }
    }

    /// Fire-and-forget submission. The task owns its latch handle, so it
    /// still submits at most once if the page goes away mid-flight.
    fn submit_detached(game: Weak<RefCell<Game>>, session: &Session, final_score: u64) {
        let submission = session.submission();
        let store = store();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = submission.submit_once(final_score, &mut *store.borrow_mut());
            let Some(game) = game.upgrade() else { return };
            let mut g = game.borrow_mut();
            if let Some(notice) = outcome.notice() {
                g.show_notice(notice);
            }
            if let SubmitOutcome::Persisted(PersistOutcome::Recorded { new_best: true, .. }) =
                outcome
            {
                g.audio.play(SoundEffect::NewBest);
                g.show_notice(format!("New best: {}", final_score));
            }
            g.render();
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;
    use thiserror::Error;

    use zipzap::consts::DEFAULT_LEADERBOARD_LIMIT;
    use zipzap::persistence::{MemoryStore, ScoreStore, StoreError};
    use zipzap::sim::autopilot;
    use zipzap::{FrameOutcome, Session, Tuning, TuningError, Variant};

    #[derive(Parser, Debug)]
    #[command(about = "Run ZipZap sessions headlessly with the autopilot", version)]
    pub struct Args {
        /// Seed for the first run (defaults to the clock)
        #[arg(long)]
        seed: Option<u64>,
        /// Frame cap per run
        #[arg(long, default_value_t = 3600)]
        frames: u64,
        /// Balance preset
        #[arg(long, default_value = "classic", value_parser = parse_variant)]
        variant: Variant,
        /// JSON file overriding the preset's tuning
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Number of runs; each ends at game over or the frame cap
        #[arg(long, default_value_t = 1)]
        runs: u32,
        /// Simulated players taking turns
        #[arg(long, default_value_t = 1)]
        players: u32,
        /// Never flip (the actor rides the floor)
        #[arg(long)]
        no_autopilot: bool,
    }

    fn parse_variant(s: &str) -> Result<Variant, String> {
        Variant::from_str(s).ok_or_else(|| format!("unknown variant '{}'", s))
    }

    #[derive(Error, Debug)]
    pub enum RunError {
        #[error("could not read tuning file {path}: {source}")]
        TuningFile {
            path: PathBuf,
            source: std::io::Error,
        },
        #[error(transparent)]
        Tuning(#[from] TuningError),
        #[error(transparent)]
        Store(#[from] StoreError),
    }

    fn load_tuning(args: &Args) -> Result<Tuning, RunError> {
        match &args.tuning {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| RunError::TuningFile {
                    path: path.clone(),
                    source,
                })?;
                let tuning = Tuning::from_json(&json)?;
                log::info!("Loaded tuning from {}", path.display());
                Ok(tuning)
            }
            None => Ok(args.variant.tuning()),
        }
    }

    /// Where the session's balance came from, for the run banner
    fn tuning_source(args: &Args) -> String {
        match &args.tuning {
            Some(path) => format!("file {}", path.display()),
            None => format!("preset {}", args.variant.as_str()),
        }
    }

    pub fn run(args: Args) -> Result<(), RunError> {
        let tuning = load_tuning(&args)?;
        let seed = args.seed.unwrap_or_else(zipzap::platform::clock_seed);
        let players = args.players.max(1);
        let mut store = MemoryStore::new();
        let mut session = Session::new(seed, tuning.clone());

        log::info!(
            "Headless run: tuning={} seed={} runs={} frames={}",
            tuning_source(&args),
            seed,
            args.runs,
            args.frames
        );

        for run in 0..args.runs {
            let player = format!("player-{}", run % players + 1);
            store.sign_in(&player, &player);

            let mut ended = None;
            for _ in 0..args.frames {
                if !args.no_autopilot && autopilot::should_flip(session.state()) {
                    session.flip();
                }
                match session.frame() {
                    FrameOutcome::Continue => {}
                    FrameOutcome::Ended { final_score } => {
                        ended = Some(final_score);
                        break;
                    }
                    FrameOutcome::Idle => break,
                }
            }
            session.drain_events();

            let state = session.state();
            match ended {
                Some(score) => {
                    println!(
                        "run {:>3} {:<10} seed {:<20} score {:>5} gates {:>4} pickups {:>3} frames {}",
                        run + 1,
                        player,
                        state.seed,
                        score,
                        state.gates_passed,
                        state.pickups_collected,
                        state.frame
                    );
                    if let Some(outcome) = session.submit_final(&mut store) {
                        log::debug!("Submission: {:?}", outcome);
                    }
                    session.restart();
                }
                None => {
                    println!(
                        "run {:>3} {:<10} seed {:<20} still alive at frame {} with score {} (not recorded)",
                        run + 1,
                        player,
                        state.seed,
                        state.frame,
                        state.score
                    );
                    let next_seed = state.seed.wrapping_add(1);
                    session.stop();
                    session = Session::new(next_seed, tuning.clone());
                }
            }
        }

        println!("\nLeaderboard");
        for (rank, row) in store
            .fetch_top(DEFAULT_LEADERBOARD_LIMIT)?
            .iter()
            .enumerate()
        {
            println!(
                "{:>2}. {:<12} {:>6} ({} attempts)",
                rank + 1,
                row.name,
                row.score,
                row.attempts
            );
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_tuning_source_names_the_file() {
            let args =
                Args::try_parse_from(["zipzap", "--variant", "steady", "--tuning", "balance.json"])
                    .unwrap();
            assert_eq!(tuning_source(&args), "file balance.json");

            let args = Args::try_parse_from(["zipzap", "--variant", "steady"]).unwrap();
            assert_eq!(tuning_source(&args), "preset steady");
        }

        #[test]
        fn test_unknown_variant_is_rejected() {
            assert!(Args::try_parse_from(["zipzap", "--variant", "turbo"]).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;

    env_logger::init();
    log::info!("ZipZap (native) starting...");

    match headless::run(headless::Args::parse()) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
