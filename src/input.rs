use std::collections::HashSet;
use winit::event::{ElementState, KeyboardInput, MouseButton, VirtualKeyCode};

use crate::palette::Tool;

pub struct InputHandler {
    pressed_keys: HashSet<VirtualKeyCode>,
    mouse_position: (f64, f64),
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            mouse_position: (0.0, 0.0),
        }
    }

    pub fn handle_keyboard_input(&mut self, input: &KeyboardInput) -> InputAction {
        if let Some(key_code) = input.virtual_keycode {
            match input.state {
                ElementState::Pressed => {
                    self.pressed_keys.insert(key_code);
                    self.handle_key_press(key_code)
                }
                ElementState::Released => {
                    self.pressed_keys.remove(&key_code);
                    InputAction::None
                }
            }
        } else {
            InputAction::None
        }
    }

    pub fn handle_cursor_moved(&mut self, x: f64, y: f64) -> InputAction {
        self.mouse_position = (x, y);
        InputAction::PointerMoved(x, y)
    }

    pub fn handle_mouse_input(&mut self, state: ElementState, button: MouseButton) -> InputAction {
        if button != MouseButton::Left {
            return InputAction::None;
        }
        let (x, y) = self.mouse_position;
        match state {
            ElementState::Pressed => InputAction::PointerDown(x, y),
            ElementState::Released => InputAction::PointerUp,
        }
    }

    fn ctrl_pressed(&self) -> bool {
        self.pressed_keys.contains(&VirtualKeyCode::LControl)
            || self.pressed_keys.contains(&VirtualKeyCode::RControl)
            || self.pressed_keys.contains(&VirtualKeyCode::LWin)
            || self.pressed_keys.contains(&VirtualKeyCode::RWin)
    }

    fn handle_key_press(&mut self, key_code: VirtualKeyCode) -> InputAction {
        if self.ctrl_pressed() {
            return match key_code {
                VirtualKeyCode::S => InputAction::Save,
                VirtualKeyCode::O => InputAction::Load,
                VirtualKeyCode::B => InputAction::Export,
                _ => InputAction::None,
            };
        }

        match key_code {
            VirtualKeyCode::Up => InputAction::MoveCursor(0, -1),
            VirtualKeyCode::Down => InputAction::MoveCursor(0, 1),
            VirtualKeyCode::Left => InputAction::MoveCursor(-1, 0),
            VirtualKeyCode::Right => InputAction::MoveCursor(1, 0),
            VirtualKeyCode::Space => InputAction::ClickCursor,
            VirtualKeyCode::P => InputAction::SelectTool(Tool::Paint),
            VirtualKeyCode::E => InputAction::SelectTool(Tool::Erase),
            VirtualKeyCode::F => InputAction::SelectTool(Tool::Flip),
            key => match brush_slot(key) {
                Some(slot) => InputAction::SelectBrush(slot),
                None => InputAction::None,
            },
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn brush_slot(key_code: VirtualKeyCode) -> Option<usize> {
    let slot = match key_code {
        VirtualKeyCode::Key1 | VirtualKeyCode::Numpad1 => 0,
        VirtualKeyCode::Key2 | VirtualKeyCode::Numpad2 => 1,
        VirtualKeyCode::Key3 | VirtualKeyCode::Numpad3 => 2,
        VirtualKeyCode::Key4 | VirtualKeyCode::Numpad4 => 3,
        VirtualKeyCode::Key5 | VirtualKeyCode::Numpad5 => 4,
        VirtualKeyCode::Key6 | VirtualKeyCode::Numpad6 => 5,
        VirtualKeyCode::Key7 | VirtualKeyCode::Numpad7 => 6,
        VirtualKeyCode::Key8 | VirtualKeyCode::Numpad8 => 7,
        VirtualKeyCode::Key9 | VirtualKeyCode::Numpad9 => 8,
        _ => return None,
    };
    Some(slot)
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    None,
    PointerDown(f64, f64),
    PointerUp,
    PointerMoved(f64, f64),
    MoveCursor(i32, i32),
    ClickCursor,
    SelectTool(Tool),
    SelectBrush(usize),
    Save,
    Load,
    Export,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brush_slots() {
        assert_eq!(brush_slot(VirtualKeyCode::Key1), Some(0));
        assert_eq!(brush_slot(VirtualKeyCode::Numpad9), Some(8));
        assert_eq!(brush_slot(VirtualKeyCode::Key0), None);
    }

    #[test]
    fn test_shortcuts_need_ctrl() {
        let mut input = InputHandler::new();
        assert_eq!(input.handle_key_press(VirtualKeyCode::S), InputAction::None);
        assert_eq!(input.handle_key_press(VirtualKeyCode::E), InputAction::SelectTool(Tool::Erase));

        input.pressed_keys.insert(VirtualKeyCode::LControl);
        assert_eq!(input.handle_key_press(VirtualKeyCode::S), InputAction::Save);
        assert_eq!(input.handle_key_press(VirtualKeyCode::O), InputAction::Load);
        assert_eq!(input.handle_key_press(VirtualKeyCode::B), InputAction::Export);
        assert_eq!(input.handle_key_press(VirtualKeyCode::E), InputAction::None);
    }

    #[test]
    fn test_mouse_uses_last_position() {
        let mut input = InputHandler::new();
        input.handle_cursor_moved(12.0, 34.0);
        assert_eq!(
            input.handle_mouse_input(ElementState::Pressed, MouseButton::Left),
            InputAction::PointerDown(12.0, 34.0)
        );
        assert_eq!(input.handle_mouse_input(ElementState::Pressed, MouseButton::Right), InputAction::None);
        assert_eq!(input.handle_mouse_input(ElementState::Released, MouseButton::Left), InputAction::PointerUp);
    }
}
