use dioxus::prelude::*;
use soundboard::SoundState;

#[cfg(target_arch = "wasm32")]
use super::sound_row::SoundRow;
#[cfg(target_arch = "wasm32")]
use soundboard::{web::WebAudioController, ControllerOptions, ControllerSnapshot};
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

/// A sound rendered as an `<audio>` element on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundDef {
    pub id: &'static str,
    pub label: &'static str,
    pub src: &'static str,
    pub autoplay: bool,
    pub looped: bool,
}

pub const SOUNDS: [SoundDef; 3] = [
    SoundDef {
        id: "ambience",
        label: "Ambience",
        src: "/assets/sounds/ambience.ogg",
        autoplay: true,
        looped: true,
    },
    SoundDef {
        id: "click",
        label: "Click",
        src: "/assets/sounds/click.ogg",
        autoplay: false,
        looped: false,
    },
    SoundDef {
        id: "fanfare",
        label: "Fanfare",
        src: "/assets/sounds/fanfare.ogg",
        autoplay: false,
        looped: false,
    },
];

#[cfg(target_arch = "wasm32")]
const POLL_INTERVAL_MS: u32 = 250;

pub fn state_label(state: Option<SoundState>) -> &'static str {
    match state {
        None => "unregistered",
        Some(SoundState::Idle) => "idle",
        Some(SoundState::Playing) => "playing",
        Some(SoundState::Paused) => "paused",
        Some(SoundState::AutoPaused) => "waiting to resume",
    }
}

/// Board of registered sounds with transport buttons and a mute toggle.
#[cfg(target_arch = "wasm32")]
#[component]
pub fn Soundboard() -> Element {
    let controller = use_hook(|| Rc::new(WebAudioController::new(ControllerOptions::default())));
    let mut snapshot = use_signal(ControllerSnapshot::default);
    use_context_provider(|| controller.clone());
    use_context_provider(|| snapshot);

    // Elements exist once the first render lands, so register from an effect.
    // Polling also picks up changes made through native media controls.
    {
        let controller = controller.clone();
        use_effect(move || {
            for sound in SOUNDS.iter() {
                controller.register(sound.id);
            }
            controller.on_event(|event| tracing::debug!(?event, "soundboard event"));

            let controller = controller.clone();
            let mut snapshot = snapshot;
            spawn(async move {
                loop {
                    let next = controller.snapshot();
                    if *snapshot.peek() != next {
                        snapshot.set(next);
                    }
                    gloo_timers::future::TimeoutFuture::new(POLL_INTERVAL_MS).await;
                }
            });
        });
    }

    let muted = snapshot().muted;
    let on_toggle_mute = {
        let controller = controller.clone();
        move |_| {
            controller.toggle_muted();
            snapshot.set(controller.snapshot());
        }
    };
    let on_pause_all = {
        let controller = controller.clone();
        move |_| {
            controller.pause_all();
            snapshot.set(controller.snapshot());
        }
    };
    let on_resume = {
        let controller = controller.clone();
        move |_| {
            controller.resume_all_paused();
            snapshot.set(controller.snapshot());
        }
    };

    rsx! {
        div { class: "soundboard max-w-xl mx-auto p-6 space-y-4",
            header { class: "flex items-center justify-between",
                h1 { class: "text-xl font-semibold", "Soundboard" }
                button {
                    id: "mute-btn",
                    r#type: "button",
                    class: if muted { "px-3 py-1 rounded bg-amber-600 text-white" } else { "px-3 py-1 rounded bg-zinc-700 text-white" },
                    onclick: on_toggle_mute,
                    if muted {
                        "Unmute"
                    } else {
                        "Mute"
                    }
                }
            }
            div { class: "flex gap-2",
                button { r#type: "button", onclick: on_pause_all, "Pause all" }
                button { r#type: "button", onclick: on_resume, "Resume" }
            }
            for sound in SOUNDS.iter() {
                SoundRow { key: "{sound.id}", sound: *sound }
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[component]
pub fn Soundboard() -> Element {
    let unregistered = state_label(None);

    rsx! {
        div { class: "soundboard max-w-xl mx-auto p-6 space-y-4",
            h1 { class: "text-xl font-semibold", "Soundboard" }
            p { class: "text-zinc-400", "Audio playback runs in the browser build only." }
            ul {
                for sound in SOUNDS.iter() {
                    li { key: "{sound.id}", "{sound.label}: {unregistered}" }
                }
            }
        }
    }
}
