use dioxus::prelude::*;

mod components;

use components::Soundboard;

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "Soundboard" }
        document::Meta { name: "theme-color", content: "#a38449" }
        document::Meta { name: "viewport", content: "width=device-width, initial-scale=1" }

        Soundboard {}
    }
}
