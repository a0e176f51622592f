use std::rc::Rc;

use dioxus::prelude::*;
use soundboard::{web::WebAudioController, ControllerSnapshot, SoundState};

use super::board::{state_label, SoundDef};

/// One `<audio>` element plus its play / pause / stop buttons.
#[component]
pub(super) fn SoundRow(sound: SoundDef) -> Element {
    let controller = use_context::<Rc<WebAudioController>>();
    let mut snapshot = use_context::<Signal<ControllerSnapshot>>();

    let state = snapshot
        .read()
        .sounds
        .iter()
        .find(|status| status.id == sound.id)
        .map(|status| status.state);
    let label = state_label(state);
    let is_playing = state == Some(SoundState::Playing);
    let id = sound.id;

    let on_play = {
        let controller = controller.clone();
        move |_| {
            controller.play(id);
            snapshot.set(controller.snapshot());
        }
    };
    let on_pause = {
        let controller = controller.clone();
        move |_| {
            controller.pause(id);
            snapshot.set(controller.snapshot());
        }
    };
    let on_stop = {
        let controller = controller.clone();
        move |_| {
            controller.stop(id);
            snapshot.set(controller.snapshot());
        }
    };

    rsx! {
        div { class: "sound-row flex items-center gap-3 rounded bg-zinc-900 px-4 py-2",
            audio {
                id: "{sound.id}",
                src: "{sound.src}",
                preload: "auto",
                autoplay: sound.autoplay.then_some("autoplay"),
                r#loop: sound.looped,
            }
            span { class: "flex-1 text-white", "{sound.label}" }
            span { class: if is_playing { "text-emerald-400 text-sm" } else { "text-zinc-400 text-sm" },
                "{label}"
            }
            button { r#type: "button", disabled: is_playing, onclick: on_play, "Play" }
            button { r#type: "button", disabled: !is_playing, onclick: on_pause, "Pause" }
            button { r#type: "button", onclick: on_stop, "Stop" }
        }
    }
}
