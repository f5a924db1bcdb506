//! Input handling: keyboard and pointer events become engine calls.
//!
//! Typing emits bursts at a virtual caret, Backspace implodes toward it and Enter
//! sends a shockwave. The pointer repels particles, a left click fires a shockwave
//! and holding Shift opens a gravity well under the cursor. Tab cycles environments,
//! F1-F5 select one directly. Once the typist goes idle the caret returns home.
//!
//! All positions are window coordinates: origin top-left, y growing downward.

use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::{Aura, Environment, Heat, HeatMeter, SimulationConfig};

/// Particles per keystroke at zero heat.
const KEYSTROKE_BURST: f32 = 6.0;
/// Extra particles per keystroke per unit of heat.
const KEYSTROKE_BURST_GAIN: f32 = 3.0;
/// Horizontal caret advance per character.
const CHAR_ADVANCE: f32 = 14.0;
const LINE_HEIGHT: f32 = 32.0;
const MARGIN: f32 = 80.0;
/// Window width assumed before the primary window reports its size.
const FALLBACK_WIDTH: f32 = 1280.0;

/// Where the next typed character lands.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct Caret {
    pub position: Vec2,
}

impl Default for Caret {
    fn default() -> Self {
        Self {
            position: Vec2::new(MARGIN, MARGIN + LINE_HEIGHT),
        }
    }
}

impl Caret {
    /// Step right one character, wrapping at the right margin.
    pub fn advance(&mut self, width: f32) {
        self.position.x += CHAR_ADVANCE;
        if self.position.x > width - MARGIN {
            self.newline();
        }
    }

    /// Step left one character, stopping at the left margin.
    pub fn back(&mut self) {
        self.position.x = (self.position.x - CHAR_ADVANCE).max(MARGIN);
    }

    pub fn newline(&mut self) {
        self.position.x = MARGIN;
        self.position.y += LINE_HEIGHT;
    }
}

/// Environment bound to a direct-select key.
pub fn direct_environment(key: KeyCode) -> Option<Environment> {
    match key {
        KeyCode::F1 => Some(Environment::None),
        KeyCode::F2 => Some(Environment::Water),
        KeyCode::F3 => Some(Environment::Sand),
        KeyCode::F4 => Some(Environment::Fire),
        KeyCode::F5 => Some(Environment::Ice),
        _ => None,
    }
}

/// Send the caret home once heat has gone idle. Returns whether it moved.
pub fn rest_caret(caret: &mut Caret, heat: &HeatMeter, config: &SimulationConfig) -> bool {
    let home = Caret::default();
    if !heat.is_idle(config) || *caret == home {
        return false;
    }
    *caret = home;
    true
}

/// Particle count for one keystroke at the given heat.
pub fn burst_size(intensity: f32) -> usize {
    (KEYSTROKE_BURST + intensity * KEYSTROKE_BURST_GAIN).round() as usize
}

pub fn handle_typing(
    mut events: EventReader<KeyboardInput>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut aura: ResMut<Aura>,
    mut heat: ResMut<Heat>,
    mut caret: ResMut<Caret>,
) {
    let width = windows.get_single().map(|w| w.width()).unwrap_or(FALLBACK_WIDTH);

    for event in events.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }
        match &event.logical_key {
            Key::Character(text) => {
                for _ in text.chars() {
                    heat.0.on_keystroke(aura.0.config());
                    let intensity = heat.0.intensity();
                    let at = caret.position;
                    aura.0.spawn(at.x, at.y, burst_size(intensity), intensity, None);
                    caret.advance(width);
                }
            }
            Key::Space => {
                heat.0.on_keystroke(aura.0.config());
                caret.advance(width);
            }
            Key::Backspace => {
                caret.back();
                aura.0.trigger_implosion(caret.position);
            }
            Key::Enter => {
                aura.0.create_shockwave(caret.position);
                caret.newline();
            }
            _ => {}
        }
    }
}

pub fn handle_pointer(
    windows: Query<&Window, With<PrimaryWindow>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut aura: ResMut<Aura>,
) {
    let Some(cursor) = windows.get_single().ok().and_then(|w| w.cursor_position()) else {
        aura.0.clear_mouse_position();
        if aura.0.force_field().gravity_well.active {
            aura.0.set_gravity_well(false, 0.0, 0.0);
        }
        return;
    };

    aura.0.update_mouse_position(cursor.x, cursor.y);

    if mouse_buttons.just_pressed(MouseButton::Left) {
        aura.0.create_shockwave(cursor);
    }

    let shift = keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    aura.0.set_gravity_well(shift, cursor.x, cursor.y);
}

pub fn handle_environment_keys(keyboard: Res<ButtonInput<KeyCode>>, mut aura: ResMut<Aura>) {
    if keyboard.just_pressed(KeyCode::Tab) {
        let next = aura.0.force_field().environment.cycle();
        aura.0.set_environment(next);
    }

    for environment in keyboard.get_just_pressed().filter_map(|&key| direct_environment(key)) {
        aura.0.set_environment(environment);
    }
}

pub fn handle_idle(aura: Res<Aura>, heat: Res<Heat>, mut caret: ResMut<Caret>) {
    if rest_caret(&mut caret, &heat.0, aura.0.config()) {
        debug!("typist idle, caret back home");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_wraps_at_right_margin() {
        let mut caret = Caret::default();
        let start_y = caret.position.y;
        for _ in 0..100 {
            caret.advance(400.0);
        }
        assert!(caret.position.x <= 400.0 - MARGIN);
        assert!(caret.position.y > start_y);
    }

    #[test]
    fn caret_back_stops_at_margin() {
        let mut caret = Caret::default();
        caret.advance(FALLBACK_WIDTH);
        caret.back();
        caret.back();
        assert_eq!(caret.position.x, MARGIN);
    }

    #[test]
    fn function_keys_select_every_environment() {
        let keys = [KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4, KeyCode::F5];
        let selected: Vec<Environment> = keys.into_iter().filter_map(direct_environment).collect();
        assert_eq!(selected, Environment::ALL.to_vec());
        assert_eq!(direct_environment(KeyCode::Digit1), None);
    }

    #[test]
    fn idle_typist_sends_caret_home() {
        let config = SimulationConfig::default();
        let mut heat = HeatMeter::new();
        let mut caret = Caret::default();
        heat.on_keystroke(&config);
        caret.advance(FALLBACK_WIDTH);
        caret.newline();

        assert!(!rest_caret(&mut caret, &heat, &config));
        assert_ne!(caret, Caret::default());

        heat.tick(config.idle_timeout, &config);
        assert!(rest_caret(&mut caret, &heat, &config));
        assert_eq!(caret, Caret::default());
        assert!(!rest_caret(&mut caret, &heat, &config));
    }

    #[test]
    fn hotter_typing_bursts_bigger() {
        assert_eq!(burst_size(0.0), 6);
        assert!(burst_size(5.0) > burst_size(1.0));
    }
}
