use crate::types::ThemeMode;

pub struct ThemeDefinition {
    pub css: &'static str,
}

pub fn theme_definition(mode: ThemeMode) -> ThemeDefinition {
    match mode {
        ThemeMode::Dark => ThemeDefinition { css: DARK_THEME },
        ThemeMode::Light => ThemeDefinition { css: LIGHT_THEME },
    }
}

const DARK_THEME: &str = r#"
:root {
    --color-bg-primary: #1e1e1e;
    --color-bg-header: #141414;
    --color-text-primary: #ffffff;
    --color-text-muted: #808080;
    --color-border: #3d3d3d;
    --color-surface-muted: #2d2d2d;
    --color-surface-hover: #3d3d3d;
    --color-input-border: #3d3d3d;
    --color-input-bg: #2d2d2d;
    --color-chat-user-bg: #4a4a4a;
    --color-chat-user-text: #ffffff;
    --color-chat-assistant-bg: #2d2d2d;
    --color-chat-assistant-text: #ffffff;
    --color-notice-text: #9b9b9b;
    --color-tile-bg: #2d2d2d;
    --color-tile-hover: #3d3d3d;
    --color-button-bg: #4a4a4a;
    --color-timestamp: #808080;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
"#;

const LIGHT_THEME: &str = r#"
:root {
    --color-bg-primary: #ffffff;
    --color-bg-header: #1e1e1e;
    --color-text-primary: #1a1a1a;
    --color-text-muted: #6b6b6b;
    --color-border: #d0d0d0;
    --color-surface-muted: #f2f2f2;
    --color-surface-hover: #e6e6e6;
    --color-input-border: #c2c2c2;
    --color-input-bg: #ffffff;
    --color-chat-user-bg: #1e1e1e;
    --color-chat-user-text: #ffffff;
    --color-chat-assistant-bg: #f2f2f2;
    --color-chat-assistant-text: #1a1a1a;
    --color-notice-text: #6b6b6b;
    --color-tile-bg: #ffffff;
    --color-tile-hover: #f2f2f2;
    --color-button-bg: #4a4a4a;
    --color-timestamp: #8a8a8a;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
"#;
