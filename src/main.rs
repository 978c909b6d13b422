//! Tilt Maze entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{DeviceOrientationEvent, HtmlCanvasElement};

    use tilt_maze::Difficulty;
    use tilt_maze::Settings;
    use tilt_maze::platform::TiltChannel;
    use tilt_maze::renderer::{CanvasRenderer, Scene};
    use tilt_maze::sim::{GameEvent, GameState, TickInput, Viewport, tick};

    // iOS gates device orientation behind a permission prompt that must be
    // requested from a user gesture; other browsers deliver events freely.
    #[wasm_bindgen(inline_js = "
        export function needs_orientation_permission() {
            return typeof DeviceOrientationEvent !== 'undefined'
                && typeof DeviceOrientationEvent.requestPermission === 'function';
        }

        export async function request_orientation_permission() {
            try {
                const result = await DeviceOrientationEvent.requestPermission();
                if (typeof DeviceMotionEvent !== 'undefined'
                    && typeof DeviceMotionEvent.requestPermission === 'function') {
                    try { await DeviceMotionEvent.requestPermission(); } catch (_) {}
                }
                return result === 'granted';
            } catch (e) {
                console.warn('Orientation permission error', e);
                return false;
            }
        }
    ")]
    extern "C" {
        fn needs_orientation_permission() -> bool;
        fn request_orientation_permission() -> js_sys::Promise;
    }

    /// Game instance holding all state
    struct Game {
        /// None until the player starts from the splash screen
        state: Option<GameState>,
        renderer: CanvasRenderer,
        tilt: TiltChannel,
        settings: Settings,
        seed: u64,
        started: bool,
    }

    impl Game {
        fn new(renderer: CanvasRenderer, settings: Settings, seed: u64) -> Self {
            Self {
                state: None,
                renderer,
                tilt: TiltChannel::new(),
                settings,
                seed,
                started: false,
            }
        }

        fn viewport(&self) -> Viewport {
            Viewport::new(self.renderer.size.0, self.renderer.size.1)
        }

        /// First maze of the session
        fn build(&mut self) {
            self.state = Some(GameState::new(self.seed, self.viewport(), self.settings));
        }

        fn resize(&mut self) {
            let (width, height, ratio) = window_size();
            self.renderer.resize(width, height, ratio);
            if let Some(state) = self.state.as_mut() {
                state.resize(width, height);
            }
        }

        fn set_difficulty(&mut self, difficulty: Difficulty) {
            self.settings = self.settings.with_difficulty(difficulty);
            if let Some(state) = self.state.as_mut() {
                state.set_difficulty(difficulty);
            }
        }

        /// One simulate + render step
        fn frame(&mut self) {
            let Some(state) = self.state.as_mut() else {
                self.renderer.draw(&Scene::blank());
                return;
            };

            let input = TickInput {
                accel: self.tilt.poll(),
            };
            if let Some(GameEvent::GoalReached) = tick(state, &input) {
                show_congrats();
            }
            self.renderer.draw(&Scene::build(state));
        }
    }

    fn window_size() -> (u32, u32, f64) {
        let Some(window) = web_sys::window() else {
            return (0, 0, 1.0);
        };
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        (width as u32, height as u32, window.device_pixel_ratio())
    }

    fn set_class(id: &str, add: &[&str], remove: &[&str]) {
        let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        else {
            return;
        };
        let classes = el.class_list();
        for c in remove {
            let _ = classes.remove_1(c);
        }
        for c in add {
            let _ = classes.add_1(c);
        }
    }

    fn show_congrats() {
        set_class("congrats", &[], &["hidden", "fade-out"]);
        log::info!("Maze solved!");
    }

    fn hide_congrats() {
        set_class("congrats", &["fade-out", "hidden"], &[]);
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tilt Maze starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let mut renderer = CanvasRenderer::new(canvas).expect("no 2d context");
        let (width, height, ratio) = window_size();
        renderer.resize(width, height, ratio);

        let query = window.location().search().unwrap_or_default();
        let settings = Settings::from_query(&query);
        let seed = js_sys::Date::now() as u64;
        log::info!(
            "Seed {}, difficulty {}, level {}",
            seed,
            settings.difficulty.as_str(),
            settings.level
        );

        let game = Rc::new(RefCell::new(Game::new(renderer, settings, seed)));

        setup_resize(game.clone());
        setup_orientation(game.clone());
        setup_start(game.clone());
        setup_congrats(game.clone());
        setup_orientation_guard();

        request_animation_frame(game);

        log::info!("Tilt Maze running!");
    }

    fn listen<F>(target: &web_sys::EventTarget, event: &str, handler: F)
    where
        F: FnMut(web_sys::Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn listen_capture<F>(target: &web_sys::EventTarget, event: &str, handler: F)
    where
        F: FnMut(web_sys::Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        let _ = target.add_event_listener_with_callback_and_bool(
            event,
            closure.as_ref().unchecked_ref(),
            true,
        );
        closure.forget();
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        listen(&window, "resize", move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
    }

    fn setup_orientation(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        listen(&window, "deviceorientation", move |event: web_sys::Event| {
            if let Some(event) = event.dyn_ref::<DeviceOrientationEvent>() {
                game.borrow_mut().tilt.push(event.gamma(), event.beta());
            }
        });
    }

    /// Ask for orientation access (if needed), build the maze, fade the splash
    async fn start(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.started {
                return;
            }
            g.started = true;
        }

        let granted = if needs_orientation_permission() {
            match wasm_bindgen_futures::JsFuture::from(request_orientation_permission()).await {
                Ok(v) => v.as_bool().unwrap_or(false),
                Err(e) => {
                    log::warn!("Permission request failed: {:?}", e);
                    false
                }
            }
        } else {
            true
        };

        let mut g = game.borrow_mut();
        if granted {
            g.tilt.enable();
        } else {
            log::warn!("Orientation unavailable; ball will not respond to tilt");
        }
        g.build();
        drop(g);

        set_class("splash", &["fade-out"], &[]);
        if let Some(splash) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("splash"))
        {
            let _ = splash.set_attribute("aria-hidden", "true");
        }
    }

    fn spawn_start(game: &Rc<RefCell<Game>>) {
        if !game.borrow().started {
            wasm_bindgen_futures::spawn_local(start(game.clone()));
        }
    }

    fn setup_start(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("beginBtn") {
            for event in ["click", "touchend"] {
                let game = game.clone();
                listen(&btn, event, move |e: web_sys::Event| {
                    e.prevent_default();
                    spawn_start(&game);
                });
            }
        }

        // Taps on the splash backdrop itself, not its children
        if let Some(splash) = document.get_element_by_id("splash") {
            let backdrop: web_sys::EventTarget = splash.clone().into();
            for event in ["click", "touchstart", "pointerdown"] {
                let game = game.clone();
                let backdrop = backdrop.clone();
                listen(&splash, event, move |e: web_sys::Event| {
                    if e.target().as_ref() == Some(&backdrop) {
                        e.prevent_default();
                        spawn_start(&game);
                    }
                });
            }
        }

        // First touch anywhere also starts; iOS only honors the permission
        // prompt inside a gesture. Capture phase, default left alone.
        for event in ["touchstart", "pointerdown", "mousedown"] {
            let game = game.clone();
            listen_capture(&document, event, move |_e: web_sys::Event| {
                spawn_start(&game);
            });
        }
    }

    /// Show `#rotate` while the device is held in landscape
    fn setup_orientation_guard() {
        let Some(window) = web_sys::window() else {
            return;
        };
        let query = match window.match_media("(orientation: landscape)") {
            Ok(Some(query)) => query,
            _ => {
                log::warn!("matchMedia unavailable; landscape guard disabled");
                return;
            }
        };
        update_orientation_guard(query.matches());
        let watched = query.clone();
        listen(&query, "change", move |_e: web_sys::Event| {
            update_orientation_guard(watched.matches());
        });
    }

    fn update_orientation_guard(landscape: bool) {
        if landscape {
            set_class("rotate", &["show"], &[]);
        } else {
            set_class("rotate", &[], &["show"]);
        }
    }

    fn setup_congrats(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let buttons = [
            ("againEasy", Difficulty::Easy),
            ("againMed", Difficulty::Medium),
            ("againHard", Difficulty::Hard),
        ];
        for (id, difficulty) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            listen(&btn, "click", move |_e: web_sys::Event| {
                hide_congrats();
                game.borrow_mut().set_difficulty(difficulty);
            });
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().frame();
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Print a seeded maze and its layout summary
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, clap::Parser)]
#[command(name = "tilt-maze", version, about, long_about = None)]
struct Args {
    /// Seed for the maze generator
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Viewport width in CSS pixels
    #[arg(
        long,
        value_name = "PIXELS",
        default_value_t = 400,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    width: u32,
    /// Viewport height in CSS pixels
    #[arg(
        long,
        value_name = "PIXELS",
        default_value_t = 700,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    height: u32,
    /// easy, medium (or med) or hard
    #[arg(long, default_value = "medium", value_parser = parse_difficulty)]
    difficulty: tilt_maze::Difficulty,
    /// Level, shrinks cells as it grows
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    level: u32,
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_difficulty(s: &str) -> Result<tilt_maze::Difficulty, String> {
    tilt_maze::Difficulty::from_str(s)
        .ok_or_else(|| format!("unknown difficulty {s:?}, expected easy, medium or hard"))
}

#[cfg(not(target_arch = "wasm32"))]
impl Args {
    fn settings(&self) -> tilt_maze::Settings {
        tilt_maze::Settings {
            difficulty: self.difficulty,
            level: self.level,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;
    use tilt_maze::sim::{GameState, Viewport};

    let args = Args::parse();

    env_logger::init();
    log::info!("Tilt Maze (native) starting...");
    log::info!("Native mode has no sensor feed - run with `trunk serve` for the web version");

    let settings = args.settings();
    let state = GameState::new(args.seed, Viewport::new(args.width, args.height), settings);
    let geometry = &state.geometry;

    println!("{}", geometry.maze.to_ascii());
    let summary = serde_json::json!({
        "seed": args.seed,
        "settings": settings,
        "layout": geometry.layout,
        "start": geometry.maze.start,
        "end": geometry.maze.end,
        "passages": geometry.maze.grid.passage_count(),
        "walkable_px": geometry.mask.count(),
    });
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to encode summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
