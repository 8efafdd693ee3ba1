use crate::theme::theme_definition;
use crate::types::ThemeMode;
use crate::views::ChatView;
use dioxus::prelude::*;

const TRUFFLE_CSS: Asset = asset!("/assets/truffle.css");

#[component]
pub fn App() -> Element {
    let theme = use_signal(|| ThemeMode::Light);

    rsx! {
        ThemeStyles { theme }
        AppHeader { theme }
        ChatView {}
    }
}

#[component]
fn ThemeStyles(theme: Signal<ThemeMode>) -> Element {
    let definition = theme_definition(theme());
    rsx! {
        document::Link { rel: "stylesheet", href: TRUFFLE_CSS }
        style { dangerous_inner_html: "{definition.css}" }
    }
}

#[component]
fn AppHeader(theme: Signal<ThemeMode>) -> Element {
    let mut theme = theme;
    let (label, next) = match theme() {
        ThemeMode::Dark => ("Light", ThemeMode::Light),
        ThemeMode::Light => ("Dark", ThemeMode::Dark),
    };
    rsx! {
        div { class: "header",
            div { class: "header-content",
                span { class: "header-wordmark", "Truffle" }
                button {
                    class: "btn theme-toggle",
                    r#type: "button",
                    onclick: move |_| theme.set(next),
                    "{label}"
                }
            }
        }
    }
}
