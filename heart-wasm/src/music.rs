use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, HtmlAudioElement};

use crate::events::Listener;

const VOLUME: f64 = 0.6;

/// `aria-pressed` value and glyph for the toggle button.
pub fn button_state(playing: bool) -> (&'static str, &'static str) {
    if playing {
        ("true", "\u{23f8}")
    } else {
        ("false", "\u{25b6}")
    }
}

fn show_playing(button: &Element, playing: bool) {
    let (pressed, label) = button_state(playing);
    if let Err(err) = button.set_attribute("aria-pressed", pressed) {
        log::warn!("cannot update music button: {:?}", err);
    }
    button.set_text_content(Some(label));
}

async fn play(audio: &HtmlAudioElement) -> Result<(), JsValue> {
    JsFuture::from(audio.play()?).await?;
    Ok(())
}

/// Starts playback in the background; failures are logged, never raised.
fn spawn_play(audio: HtmlAudioElement, button: Element) {
    wasm_bindgen_futures::spawn_local(async move {
        match play(&audio).await {
            Ok(()) => show_playing(&button, true),
            Err(err) => log::warn!("Playback error: {:?}", err),
        }
    });
}

/// Play/pause button for the background track.
///
/// The first pointer or touch anywhere on the page also tries to start
/// playback, since mobile browsers only allow audio after a gesture.
#[wasm_bindgen]
pub struct MusicToggle {
    audio: HtmlAudioElement,
    button: Element,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl MusicToggle {
    #[wasm_bindgen(constructor)]
    pub fn new(audio_id: &str, button_id: &str) -> Result<MusicToggle, JsValue> {
        crate::init_logging();

        let window = web_sys::window().ok_or("no global window")?;
        let document = window.document().ok_or("no document")?;
        let audio = document
            .get_element_by_id(audio_id)
            .ok_or("audio element not found")?
            .dyn_into::<HtmlAudioElement>()?;
        let button = document
            .get_element_by_id(button_id)
            .ok_or("music button not found")?;

        audio.set_volume(VOLUME);
        show_playing(&button, !audio.paused());

        let mut listeners = Vec::new();
        {
            let audio = audio.clone();
            let toggle_button = button.clone();
            listeners.push(Listener::new(&button, "click", move |_| {
                toggle(&audio, &toggle_button);
            })?);
        }
        for kind in ["pointerdown", "touchstart"] {
            let audio = audio.clone();
            let button = button.clone();
            listeners.push(Listener::once(&window, kind, move |_| {
                if audio.paused() {
                    spawn_play(audio.clone(), button.clone());
                }
            })?);
        }

        log::info!("music toggle ready on #{}", button_id);
        Ok(MusicToggle {
            audio,
            button,
            _listeners: listeners,
        })
    }

    pub fn toggle(&self) {
        toggle(&self.audio, &self.button);
    }

    pub fn is_playing(&self) -> bool {
        !self.audio.paused()
    }
}

fn toggle(audio: &HtmlAudioElement, button: &Element) {
    if audio.paused() {
        spawn_play(audio.clone(), button.clone());
    } else {
        match audio.pause() {
            Ok(()) => show_playing(button, false),
            Err(err) => log::warn!("Playback error: {:?}", err),
        }
    }
}
