//! Enigme Town entry point
//!
//! Handles platform-specific initialization and runs the scene loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use thiserror::Error;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use enigme_town::consts::*;
    use enigme_town::persistence::{LocalStorage, MemoryStorage, Storage};
    use enigme_town::platform::KeyboardState;
    use enigme_town::platform::assets::{AssetError, fetch_bytes, fetch_text};
    use enigme_town::platform::puzzle::PuzzleWindow;
    use enigme_town::renderer::pipeline::init_canvas;
    use enigme_town::renderer::{
        AtlasError, RenderError, RenderState, SceneImages, SpriteAtlas, decode_png,
        scene_draw_list,
    };
    use enigme_town::sim::{MapError, SceneEvent, SceneState, TileMap, tick};
    use enigme_town::{Action, KeyBindings, KeyCode, PuzzleProgress, PuzzleSession, SceneConfig};

    #[derive(Debug, Error)]
    enum StartError {
        #[error(transparent)]
        Asset(#[from] AssetError),
        #[error("map error: {0}")]
        Map(#[from] MapError),
        #[error("atlas error: {0}")]
        Atlas(#[from] AtlasError),
        #[error("image error: {0}")]
        Image(#[from] image::ImageError),
        #[error("renderer error: {0}")]
        Render(#[from] RenderError),
        #[error("page is missing {0}")]
        Dom(&'static str),
    }

    /// Game instance holding all state
    struct Game {
        state: SceneState,
        atlas: SpriteAtlas,
        render_state: RenderState,
        accumulator: f32,
        last_time: f64,
        keyboard: KeyboardState,
        bindings: KeyBindings,
        puzzle: PuzzleSession<PuzzleWindow>,
        storage: Box<dyn Storage>,
    }

    impl Game {
        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.keyboard.resolve(&self.bindings);
                let events = tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.keyboard.clear_pressed();

                for event in events {
                    self.handle_event(event);
                }
            }
        }

        fn handle_event(&mut self, event: SceneEvent) {
            match event {
                SceneEvent::PuzzleRequested => self.open_puzzle(),
                SceneEvent::PuzzleFocusRequested => self.puzzle.focus(),
                SceneEvent::ZoneEntered => log::info!("Collision with the tree detected"),
                SceneEvent::ZoneExited => log::debug!("Left the tree"),
                SceneEvent::DebugToggled(on) => log::debug!("Debug overlay {}", on),
                SceneEvent::Teleported { to } => log::debug!("Teleported to {:?}", to),
            }
        }

        /// Open the puzzle popup and pause. A blocked popup leaves the scene running.
        fn open_puzzle(&mut self) {
            let opened = self.puzzle.open(&mut self.state, self.storage.as_ref(), || {
                PuzzleWindow::open(PUZZLE_URL, PUZZLE_WINDOW_NAME, PUZZLE_WINDOW_FEATURES)
            });
            if opened {
                // Keyup events go to the popup from now on
                self.keyboard.release_all();
            }
        }

        /// Resume once the popup has closed
        fn poll_puzzle(&mut self) {
            let events = self.puzzle.poll(&mut self.state, self.storage.as_ref());
            for event in events {
                self.handle_event(event);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let list = scene_draw_list(&self.state, &self.atlas);
            match self.render_state.render(&list, &self.state.camera) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            // Status label
            if let Some(el) = document.get_element_by_id("status-text") {
                let text = self.state.status.as_str();
                if el.text_content().as_deref() != Some(text) {
                    el.set_text_content(Some(text));
                }
                let class = if self.state.status.is_visible() {
                    ""
                } else {
                    "hidden"
                };
                let _ = el.set_attribute("class", class);
            }

            // Debug badge
            if let Some(el) = document.get_element_by_id("debug-badge") {
                let class = if self.state.debug_mode { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }

            // Paused overlay while the puzzle is open
            if let Some(el) = document.get_element_by_id("puzzle-overlay") {
                let class = if self.state.is_paused() { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }

        fn resize(&mut self, client_w: f32, client_h: f32, dpr: f64) {
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            self.render_state.resize(width, height);
            self.state.set_viewport(client_w, client_h);
        }
    }

    fn open_storage() -> Box<dyn Storage> {
        match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{}; progress will not persist", e);
                Box::new(MemoryStorage::new())
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Enigme Town starting...");

        if let Err(e) = start().await {
            log::error!("Startup failed: {}", e);
            show_error(&e.to_string());
        }
    }

    async fn start() -> Result<(), StartError> {
        let window = web_sys::window().ok_or(StartError::Dom("a window"))?;
        let document = window.document().ok_or(StartError::Dom("a document"))?;

        // Persisted state
        let storage = open_storage();
        let bindings = KeyBindings::load(storage.as_ref());
        let mut progress = PuzzleProgress::load(storage.as_ref());
        progress.recover_interrupted(storage.as_ref());

        // Assets
        let map_json = fetch_text(MAP_URL).await?;
        let map = TileMap::from_json(&map_json)?;
        let atlas = SpriteAtlas::from_json(&fetch_text(ATLAS_JSON_URL).await?)?;
        let images = SceneImages {
            tiles: decode_png(&fetch_bytes(TILESET_IMAGE_URL).await?)?,
            sprites: decode_png(&fetch_bytes(ATLAS_IMAGE_URL).await?)?,
        };

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or(StartError::Dom("#canvas"))?
            .dyn_into()
            .map_err(|_| StartError::Dom("a <canvas> at #canvas"))?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let config = SceneConfig {
            viewport: glam::Vec2::new(client_w as f32, client_h as f32),
            ..SceneConfig::default()
        };
        let state = SceneState::new(map, config)?;

        let render_state = init_canvas(canvas.clone(), width, height, images).await?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let game = Rc::new(RefCell::new(Game {
            state,
            atlas,
            render_state,
            accumulator: 0.0,
            last_time: 0.0,
            keyboard: KeyboardState::new(),
            bindings,
            puzzle: PuzzleSession::new(progress),
            storage,
        }));

        setup_input_handlers(game.clone());
        setup_window_handlers(&canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Enigme Town running!");
        Ok(())
    }

    fn show_error(message: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("loading") {
            el.set_text_content(Some(message));
        }
    }

    /// Keys the page should not react to (scrolling)
    fn is_game_key(key: &KeyCode, bindings: &KeyBindings) -> bool {
        *key == KeyCode::interact() || Action::ALL.iter().any(|a| bindings.key_for(*a) == *key)
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = KeyCode::parse(&event.key()) else {
                    return;
                };
                let mut g = game.borrow_mut();
                if is_game_key(&key, &g.bindings) {
                    event.prevent_default();
                }
                g.keyboard.press(key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = KeyCode::parse(&event.key()) {
                    game.borrow_mut().keyboard.release(&key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: keyups will go elsewhere
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().keyboard.release_all();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_window_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let client_w = canvas.client_width();
            let client_h = canvas.client_height();
            canvas.set_width((client_w as f64 * dpr) as u32);
            canvas.set_height((client_h as f64 * dpr) as u32);
            game.borrow_mut()
                .resize(client_w as f32, client_h as f32, dpr);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.poll_puzzle();
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Enigme Town (native) starting...");

    let Some(path) = std::env::args().nth(1) else {
        log::info!("Usage: enigme-town <map.json>");
        log::info!("Native mode walks the player headlessly - run with `trunk serve` for the web version");
        return;
    };

    if let Err(e) = headless::walk_to_tree(&path) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted run without a window: walk to the tree, solve the puzzle, report
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;

    use enigme_town::consts::SIM_DT;
    use enigme_town::persistence::{MemoryStorage, Storage, keys};
    use enigme_town::platform::assets::read_text;
    use enigme_town::sim::{SceneEvent, SceneState, TickInput, TileMap, tick};
    use enigme_town::{PuzzleHandle, PuzzleProgress, PuzzleSession, SceneConfig};

    /// Give up after this many simulated seconds
    const MAX_SECONDS: f32 = 30.0;

    /// Puzzle page stand-in: reports success and closes on the first poll
    struct SolvingPuzzle<'a> {
        store: &'a MemoryStorage,
        closed: bool,
    }

    impl PuzzleHandle for SolvingPuzzle<'_> {
        fn poll_closed(&mut self) -> bool {
            if self.closed {
                return false;
            }
            if let Err(e) = self.store.set_item(keys::ENIGME_SOLVED, "true") {
                log::warn!("{}", e);
            }
            self.closed = true;
            true
        }

        fn focus(&self) {}
    }

    pub fn walk_to_tree(path: &str) -> Result<(), Box<dyn Error>> {
        let map = TileMap::from_json(&read_text(path)?)?;
        let mut state = SceneState::new(map, SceneConfig::default())?;
        let store = MemoryStorage::new();
        let mut session = PuzzleSession::new(PuzzleProgress::load(&store));

        let target = state.tree_zone.rect.center();
        let max_ticks = (MAX_SECONDS / SIM_DT) as u32;

        for t in 0..max_ticks {
            let pos = state.player.pos;
            let input = TickInput {
                left: target.x < pos.x - 2.0,
                right: target.x > pos.x + 2.0,
                up: target.y < pos.y - 2.0,
                down: target.y > pos.y + 2.0,
                interact: state.tree_zone.occupied,
                toggle_debug: false,
            };

            for event in tick(&mut state, &input, SIM_DT) {
                match event {
                    SceneEvent::ZoneEntered => {
                        log::info!("[{:.2}s] {}", t as f32 * SIM_DT, state.status.as_str());
                    }
                    SceneEvent::PuzzleRequested => {
                        session.open(&mut state, &store, || {
                            Some(SolvingPuzzle {
                                store: &store,
                                closed: false,
                            })
                        });
                    }
                    _ => {}
                }
            }

            if !session.poll(&mut state, &store).is_empty() {
                log::info!(
                    "Puzzle finished, player at {:?}: {}",
                    state.player.pos,
                    state.status.as_str()
                );
                return Ok(());
            }
        }

        Err(format!("tree not reached within {MAX_SECONDS}s (walls in the way?)").into())
    }
}
