//! Browser bindings: audio elements as sound handles, id lookup through the
//! document, and DOM event wiring for the controller.

mod controller;

pub use controller::WebAudioController;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, Event, HtmlAudioElement};

use crate::controller::{MediaEvent, SoundHandle, SoundLookup, SoundRef};

/// An `<audio>` element registered with the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct WebSound(HtmlAudioElement);

impl WebSound {
    pub fn new(element: HtmlAudioElement) -> Self {
        Self(element)
    }

    pub fn element(&self) -> &HtmlAudioElement {
        &self.0
    }
}

impl From<HtmlAudioElement> for WebSound {
    fn from(element: HtmlAudioElement) -> Self {
        Self(element)
    }
}

impl<'a> From<&'a WebSound> for SoundRef<'a, WebSound> {
    fn from(sound: &'a WebSound) -> Self {
        SoundRef::Handle(sound)
    }
}

impl SoundHandle for WebSound {
    fn id(&self) -> String {
        self.0.id()
    }

    fn autoplay(&self) -> bool {
        self.0.has_attribute("autoplay")
    }

    fn play(&self) {
        web_try_play(&self.0);
    }

    fn pause(&self) {
        if let Err(e) = self.0.pause() {
            tracing::warn!(sound = %self.0.id(), "pause failed: {e:?}");
        }
    }

    fn set_current_time(&self, seconds: f64) {
        self.0.set_current_time(seconds);
    }
}

/// Resolves ids against `document.getElementById`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentLookup;

impl SoundLookup for DocumentLookup {
    type Handle = WebSound;

    fn lookup(&self, id: &str) -> Option<WebSound> {
        window()?
            .document()?
            .get_element_by_id(id)?
            .dyn_into::<HtmlAudioElement>()
            .ok()
            .map(WebSound)
    }
}

/// Returns the `<audio>` element with `id`, creating and appending it to the
/// body when missing.
pub fn get_or_create_audio_element(id: &str, src: &str, autoplay: bool) -> Option<HtmlAudioElement> {
    let document = window()?.document()?;

    if let Some(existing) = document.get_element_by_id(id) {
        return existing.dyn_into::<HtmlAudioElement>().ok();
    }

    let audio: HtmlAudioElement = document.create_element("audio").ok()?.dyn_into().ok()?;
    audio.set_id(id);
    audio.set_src(src);
    audio.set_attribute("preload", "auto").ok()?;
    if autoplay {
        audio.set_attribute("autoplay", "").ok()?;
    }
    document.body()?.append_child(&audio).ok()?;

    Some(audio)
}

// A rejected play() never fires `pause`, so raise one to keep the playing set honest.
fn web_try_play(audio: &HtmlAudioElement) {
    let promise = match audio.play() {
        Ok(promise) => promise,
        Err(e) => {
            tracing::warn!(sound = %audio.id(), "play failed: {e:?}");
            return;
        }
    };
    let audio = audio.clone();
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = JsFuture::from(promise).await {
            tracing::warn!(sound = %audio.id(), "playback rejected: {e:?}");
            let Some(follow_up) = MediaEvent::after_rejected_play(audio.paused()) else {
                return;
            };
            if let Ok(event) = Event::new(follow_up.dom_name()) {
                let _ = audio.dispatch_event(&event);
            }
        }
    });
}
