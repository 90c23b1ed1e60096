use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use heart_core::{FrameLoop, ParticleConfig, Viewport};
use rand::rngs::ThreadRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlCanvasElement, MouseEvent, TouchEvent, Window};

mod animation;
mod canvas;
mod events;
mod music;

pub use animation::AnimationFrames;
pub use canvas::{CanvasRenderer, OffscreenShapeCanvas, OffscreenSurface};
pub use music::MusicToggle;

use events::Listener;

static LOGGING: Once = Once::new();

pub(crate) fn init_logging() {
    LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    });
}

/// Parses optional JSON settings; missing fields keep their defaults.
pub fn parse_config(settings_json: Option<&str>) -> Result<ParticleConfig, String> {
    match settings_json.map(str::trim) {
        None | Some("") => Ok(ParticleConfig::default()),
        Some(json) => serde_json::from_str(json).map_err(|err| format!("invalid settings: {}", err)),
    }
}

fn current_viewport(window: &Window, config: &ParticleConfig) -> Result<Viewport, JsValue> {
    let width = window.inner_width()?.as_f64().ok_or("innerWidth is not a number")?;
    let height = window.inner_height()?.as_f64().ok_or("innerHeight is not a number")?;
    Viewport::from_logical(
        width as f32,
        height as f32,
        window.device_pixel_ratio() as f32,
        config.max_dpr,
    )
    .map_err(|err| JsValue::from_str(&err.to_string()))
}

fn now_ms(window: &Window) -> f64 {
    window
        .performance()
        .map_or_else(js_sys::Date::now, |performance| performance.now())
}

/// The running effect: frame loop and the canvas it paints.
struct Host {
    frames: FrameLoop<ThreadRng, OffscreenSurface>,
    renderer: CanvasRenderer,
}

impl Host {
    fn frame(&mut self, timestamp: f64) {
        if let Err(err) = self.frames.tick(timestamp, &mut self.renderer) {
            log::error!("frame {} failed: {}", self.frames.frames(), err);
        }
    }

    fn pointer_moved(&mut self, event: &Event) {
        let pointer = self.frames.simulation_mut().pointer_mut();
        if let Some(touch) = event.dyn_ref::<TouchEvent>() {
            let touches = touch.touches();
            let contacts = (0..touches.length())
                .filter_map(|i| touches.item(i))
                .map(|t| (t.client_x() as f32, t.client_y() as f32));
            pointer.update_from_contacts(contacts);
        } else if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            pointer.update(mouse.client_x() as f32, mouse.client_y() as f32);
        } else {
            pointer.update_partial(None, None);
        }
    }
}

/// Particle heart bound to a full-window canvas.
#[wasm_bindgen]
pub struct ParticleHeart {
    host: Rc<RefCell<Host>>,
    listeners: Vec<Listener>,
    animation: Option<AnimationFrames>,
}

#[wasm_bindgen]
impl ParticleHeart {
    /// `settings_json` may override any field of the default tuning.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, settings_json: Option<String>) -> Result<ParticleHeart, JsValue> {
        init_logging();

        let config = parse_config(settings_json.as_deref()).map_err(|err| JsValue::from_str(&err))?;
        let window = web_sys::window().ok_or("no global window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let viewport = current_viewport(&window, &config)?;
        let mut renderer = CanvasRenderer::new(canvas)?;
        let surfaces = OffscreenSurface::new(config.font_family.clone());
        let mut frames = FrameLoop::new(viewport, config, rand::thread_rng(), surfaces);
        frames
            .rebuild_now(viewport, &mut renderer)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;

        log::info!(
            "particle heart on #{}: {}x{} @{}x, {} particles",
            canvas_id,
            viewport.width,
            viewport.height,
            viewport.dpr,
            frames.simulation().particles().len()
        );

        Ok(ParticleHeart {
            host: Rc::new(RefCell::new(Host { frames, renderer })),
            listeners: Vec::new(),
            animation: None,
        })
    }

    /// Wires window events and starts the animation; calling it again is a no-op.
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.animation.is_some() {
            return Ok(());
        }
        let window = web_sys::window().ok_or("no global window")?;

        let mut listeners = Vec::new();
        {
            let host = self.host.clone();
            let resize_window = window.clone();
            listeners.push(Listener::new(&window, "resize", move |_| {
                let mut host = host.borrow_mut();
                let config = host.frames.simulation().config().clone();
                match current_viewport(&resize_window, &config) {
                    Ok(viewport) => host.frames.notify_resize(viewport, now_ms(&resize_window)),
                    Err(err) => log::warn!("ignoring resize: {:?}", err),
                }
            })?);
        }
        for kind in ["mousemove", "touchmove"] {
            let host = self.host.clone();
            listeners.push(Listener::passive(&window, kind, move |event| {
                host.borrow_mut().pointer_moved(&event);
            })?);
        }
        {
            let host = self.host.clone();
            listeners.push(Listener::new(&window, "mouseleave", move |_| {
                host.borrow_mut().frames.simulation_mut().pointer_mut().reset();
            })?);
        }
        for kind in ["click", "touchstart"] {
            let host = self.host.clone();
            listeners.push(Listener::passive(&window, kind, move |_| {
                host.borrow_mut().frames.simulation_mut().burst();
            })?);
        }

        let host = self.host.clone();
        let animation = AnimationFrames::start(move |timestamp| host.borrow_mut().frame(timestamp))?;

        self.listeners = listeners;
        self.animation = Some(animation);
        log::info!("animation started");
        Ok(())
    }

    /// Stops the animation and detaches every event listener.
    pub fn stop(&mut self) {
        self.animation = None;
        self.listeners.clear();
    }

    pub fn burst(&self) {
        self.host.borrow_mut().frames.simulation_mut().burst();
    }

    pub fn particle_count(&self) -> usize {
        self.host.borrow().frames.simulation().particles().len()
    }

    pub fn target_count(&self) -> usize {
        self.host.borrow().frames.simulation().targets().len()
    }

    pub fn is_running(&self) -> bool {
        self.animation.as_ref().is_some_and(AnimationFrames::is_scheduled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_settings_use_defaults() {
        assert_eq!(parse_config(None).unwrap(), ParticleConfig::default());
        assert_eq!(parse_config(Some("  ")).unwrap(), ParticleConfig::default());
    }

    #[test]
    fn test_settings_override_named_fields() {
        let config = parse_config(Some(r##"{ "color": "#00ffaa", "repel_radius": 120 }"##)).unwrap();
        assert_eq!(config.color, "#00ffaa");
        assert_eq!(config.repel_radius, 120.0);
        assert_eq!(config.friction, 0.85);
    }

    #[test]
    fn test_malformed_settings_are_rejected() {
        let err = parse_config(Some("{ gap: 3 }")).unwrap_err();
        assert!(err.starts_with("invalid settings"));
    }
}
