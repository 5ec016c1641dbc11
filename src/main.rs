//! Gap Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use gap_runner::FrameLoop;
    use gap_runner::platform::{FrameCallback, RafScheduler};
    use gap_runner::renderer::GpuRenderer;
    use gap_runner::tuning::Tuning;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    type Game = FrameLoop<RafScheduler, GpuRenderer, Pcg32>;

    /// Tuning from an optional `<script id="tuning" type="application/json">`
    fn load_tuning(document: &web_sys::Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring invalid tuning: {}", e);
                Tuning::default()
            }
        }
    }

    fn seed() -> u64 {
        getrandom::u64().unwrap_or_else(|e| {
            log::warn!("getrandom failed ({}), seeding from the clock", e);
            js_sys::Date::now() as u64
        })
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Gap Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let tuning = load_tuning(&document);

        // Logical size is the tuning viewport; backing store follows the DPR
        let dpr = window.device_pixel_ratio();
        let width = (tuning.viewport_width as f64 * dpr) as u32;
        let height = (tuning.viewport_height as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let viewport = Vec2::new(tuning.viewport_width, tuning.viewport_height);
        let renderer = match GpuRenderer::new(surface, &adapter, width, height, viewport).await {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Failed to create renderer: {}", e);
                return;
            }
        };

        let seed = seed();
        log::info!("Gap seed: {}", seed);

        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let scheduler = RafScheduler::new(window.clone(), callback.clone());
        let game = Rc::new(RefCell::new(Game::new(
            tuning,
            scheduler,
            renderer,
            Pcg32::seed_from_u64(seed),
        )));

        {
            let game = game.clone();
            *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |time: f64| {
                game.borrow_mut().frame(time);
            }) as Box<dyn FnMut(f64)>));
        }

        setup_input_handlers(&window, &canvas, game.clone());

        game.borrow_mut().start();
        log::info!("Gap Runner running!");
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) {
        // Click to jump
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().trigger();
            });
            let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Space to jump, I for idle/demo mode
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" => g.trigger(),
                    "KeyI" => g.toggle_idle(),
                    _ => {}
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use gap_runner::FrameLoop;
    use gap_runner::platform::ManualScheduler;
    use gap_runner::renderer::QuadBatch;
    use gap_runner::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    env_logger::init();
    log::info!("Gap Runner (native) starting...");
    log::info!("Native mode runs headless with the autopilot - run with `trunk serve` to play");

    // Usage: gap-runner [tuning.json] [frames] [tick_hz]
    let mut args = std::env::args().skip(1);
    let mut tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring invalid tuning in {}: {}", path, e);
                Tuning::default()
            }),
            Err(e) => {
                log::warn!("Could not read {}: {}", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };
    let frames: u64 = args
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(60 * 60);
    // Simulate at another rate with the same trajectories
    if let Some(hz) = args.next().and_then(|n| n.parse::<f32>().ok()) {
        tuning = tuning.scaled_to_rate(hz);
        log::info!("Ticking at {} Hz", tuning.frame_rate_hz);
    }

    let seed = rand::random::<u64>();
    log::info!("Gap seed: {}", seed);

    let batch = QuadBatch::new(tuning.viewport_width, tuning.viewport_height);
    let mut game = FrameLoop::new(
        tuning,
        ManualScheduler::new(),
        batch,
        Pcg32::seed_from_u64(seed),
    );
    game.toggle_idle();
    game.start();

    // Headless display refreshes once per tick
    let refresh_ms = game.tick_dt() * 1000.0;
    while game.frames() < frames {
        if game.scheduler_mut().take_due().is_none() {
            log::error!("Frame loop stalled after {} frames", game.frames());
            break;
        }
        let time = game.frames() as f64 * refresh_ms;
        game.frame(time);
    }

    let state = game.state();
    log::info!(
        "Scheduler: {} frames requested, {} cancelled",
        game.scheduler().requested(),
        game.scheduler().cancelled()
    );
    println!(
        "{} frames ({} ticks): round {}, score {}, best {}, last frame {} quads",
        game.frames(),
        state.time_ticks,
        state.round,
        state.score,
        game.best_score(),
        game.renderer().quad_count()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
