/// Keyboard and scroll mapping
use nalgebra::Vector3;
use winit::event::MouseScrollDelta;
use winit::keyboard::KeyCode;

/// Camera step per key press, in world units.
pub const KEY_STEP: f32 = 0.2;

/// Pixel scroll deltas are converted to lines at this rate.
pub const PIXELS_PER_LINE: f64 = 20.0;

/// How triangles are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    #[default]
    Fill,
    Wireframe,
}

/// What an input event asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Close,
    SetFillMode(FillMode),
    Translate(Vector3<f32>),
}

/// Map a pressed (or repeating) key to an action. Releases never reach here.
pub fn action_for_key(key: KeyCode) -> Option<Action> {
    let action = match key {
        KeyCode::Escape => Action::Close,
        KeyCode::ArrowLeft => Action::SetFillMode(FillMode::Wireframe),
        KeyCode::ArrowRight => Action::SetFillMode(FillMode::Fill),
        KeyCode::KeyW => Action::Translate(Vector3::new(0.0, 0.0, -KEY_STEP)),
        KeyCode::KeyS => Action::Translate(Vector3::new(0.0, 0.0, KEY_STEP)),
        KeyCode::KeyA => Action::Translate(Vector3::new(-KEY_STEP, 0.0, 0.0)),
        KeyCode::KeyD => Action::Translate(Vector3::new(KEY_STEP, 0.0, 0.0)),
        KeyCode::Space => Action::Translate(Vector3::new(0.0, -KEY_STEP, 0.0)),
        KeyCode::ShiftLeft => Action::Translate(Vector3::new(0.0, KEY_STEP, 0.0)),
        _ => return None,
    };
    Some(action)
}

/// Scrolling moves the camera along Z by the vertical line count.
pub fn action_for_scroll(delta: MouseScrollDelta) -> Option<Action> {
    let lines = match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
    };

    if lines == 0.0 {
        return None;
    }
    Some(Action::Translate(Vector3::new(0.0, 0.0, -lines)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_movement_keys() {
        assert_eq!(
            action_for_key(KeyCode::KeyW),
            Some(Action::Translate(Vector3::new(0.0, 0.0, -0.2)))
        );
        assert_eq!(
            action_for_key(KeyCode::KeyD),
            Some(Action::Translate(Vector3::new(0.2, 0.0, 0.0)))
        );
        assert_eq!(
            action_for_key(KeyCode::Space),
            Some(Action::Translate(Vector3::new(0.0, -0.2, 0.0)))
        );
        assert_eq!(
            action_for_key(KeyCode::ShiftLeft),
            Some(Action::Translate(Vector3::new(0.0, 0.2, 0.0)))
        );
    }

    #[test]
    fn test_mode_and_close_keys() {
        assert_eq!(action_for_key(KeyCode::Escape), Some(Action::Close));
        assert_eq!(
            action_for_key(KeyCode::ArrowLeft),
            Some(Action::SetFillMode(FillMode::Wireframe))
        );
        assert_eq!(
            action_for_key(KeyCode::ArrowRight),
            Some(Action::SetFillMode(FillMode::Fill))
        );
        assert_eq!(action_for_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn test_scroll_moves_along_z() {
        assert_eq!(
            action_for_scroll(MouseScrollDelta::LineDelta(0.0, 1.0)),
            Some(Action::Translate(Vector3::new(0.0, 0.0, -1.0)))
        );
        assert_eq!(
            action_for_scroll(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -40.0))),
            Some(Action::Translate(Vector3::new(0.0, 0.0, 2.0)))
        );
        assert_eq!(action_for_scroll(MouseScrollDelta::LineDelta(3.0, 0.0)), None);
    }
}
