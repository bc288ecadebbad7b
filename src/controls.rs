use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Lifecycle};
use crate::config::{ConfigStore, Mode};
use crate::runtime::{is_shortcut, to_session_key, SprintEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Advance the app by one runner event.
///
/// The clock is polled on every event, not only on ticks, so a steady
/// stream of key presses never holds seconds back.
pub fn handle_event(
    app: &mut App,
    event: SprintEvent,
    now: Instant,
    store: &dyn ConfigStore,
) -> Flow {
    app.on_tick(now);

    match event {
        SprintEvent::Tick | SprintEvent::Resize => Flow::Continue,
        SprintEvent::FocusGained => {
            app.set_focus(true, now);
            Flow::Continue
        }
        SprintEvent::FocusLost => {
            app.set_focus(false, now);
            Flow::Continue
        }
        SprintEvent::Key(key) => dispatch_key(app, key, now, store),
    }
}

/// Route one terminal key press to the app.
pub fn dispatch_key(app: &mut App, key: KeyEvent, now: Instant, store: &dyn ConfigStore) -> Flow {
    let ctrl_c = key.code == KeyCode::Char('c')
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && is_shortcut(key.modifiers);
    if key.code == KeyCode::Esc || ctrl_c {
        return Flow::Quit;
    }

    if key.code == KeyCode::Tab {
        app.reset(now);
        return Flow::Continue;
    }

    if let Some(changed) = apply_config_key(app, key.code) {
        if changed {
            if let Err(err) = store.save(app.config()) {
                tracing::warn!(%err, "config not saved");
            }
        }
        return Flow::Continue;
    }

    if app.lifecycle() == Lifecycle::Finished {
        match key.code {
            KeyCode::Char('r') => app.reset(now),
            KeyCode::Char('t') => app.restart(now),
            _ => {}
        }
        return Flow::Continue;
    }

    if !app.is_focused() {
        if key.code == KeyCode::Enter {
            app.set_focus(true, now);
        }
        return Flow::Continue;
    }

    app.on_key(to_session_key(&key), now);
    Flow::Continue
}

/// `None` when the key is not a config key, otherwise whether the config changed
fn apply_config_key(app: &mut App, code: KeyCode) -> Option<bool> {
    let changed = match code {
        KeyCode::F(1) => app.set_mode(Mode::Time),
        KeyCode::F(2) => app.set_mode(Mode::Words),
        KeyCode::F(3) => app.set_mode(Mode::Zen),
        KeyCode::F(4) => app.toggle_realtime_stats(),
        KeyCode::F(5) => app.toggle_case_sensitive(),
        _ => return None,
    };
    Some(changed)
}
