//! Host-independent input events and edit mode.
//!
//! Hosts translate their native pointer and key events into [`InputEvent`]s.
//! Conversions from Slint's pointer buttons and key text are provided.

use crate::viewport::Point;
use slint::platform::PointerEventButton;

/// Externally selected mode. Only `Edit` allows graph mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    View,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
    Other,
}

impl From<PointerEventButton> for PointerButton {
    fn from(button: PointerEventButton) -> Self {
        match button {
            PointerEventButton::Left => PointerButton::Left,
            PointerEventButton::Middle => PointerButton::Middle,
            PointerEventButton::Right => PointerButton::Right,
            _ => PointerButton::Other,
        }
    }
}

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, control: false, alt: false, meta: false };

    pub fn shift() -> Self {
        Self { shift: true, ..Self::NONE }
    }

    pub fn control() -> Self {
        Self { control: true, ..Self::NONE }
    }

    /// Shift or Ctrl turn any drag into a pan.
    pub fn forces_pan(&self) -> bool {
        self.shift || self.control
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Escape,
    Delete,
    Backspace,
    Other,
}

impl EditorKey {
    /// Map key text as delivered by Slint's `KeyEvent.text` (control
    /// characters) or a key name such as `"Escape"`.
    pub fn from_text(text: &str) -> Self {
        match text {
            "\u{1b}" | "Escape" => EditorKey::Escape,
            "\u{7f}" | "Delete" => EditorKey::Delete,
            "\u{8}" | "Backspace" => EditorKey::Backspace,
            _ => EditorKey::Other,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, EditorKey::Delete | EditorKey::Backspace)
    }
}

/// One input event. Pointer positions are in the same space as the canvas
/// origin configured on the editor (typically window coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { position: Point, button: PointerButton, modifiers: Modifiers },
    PointerMove { position: Point },
    PointerUp { position: Point, button: PointerButton },
    PointerLeave,
    /// Vertical wheel delta, positive scrolls down (zooms out).
    Wheel { position: Point, delta: f32 },
    KeyDown { key: EditorKey },
    /// The context menu's delete action was chosen.
    ContextMenuDelete,
    DismissContextMenu,
}

impl InputEvent {
    pub fn left_down(position: Point) -> Self {
        InputEvent::PointerDown { position, button: PointerButton::Left, modifiers: Modifiers::NONE }
    }

    pub fn right_down(position: Point) -> Self {
        InputEvent::PointerDown { position, button: PointerButton::Right, modifiers: Modifiers::NONE }
    }
}

/// How a pointer-down gesture is handled for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Pan,
    Edit,
    /// Right button: cancel chain, maybe open a context menu.
    Context,
    Ignore,
}

/// Classify a gesture at pointer-down time.
///
/// Middle drag always pans; in `View` mode any left drag pans; Shift/Ctrl
/// left drag pans in either mode.
pub fn classify_gesture(button: PointerButton, modifiers: Modifiers, mode: EditMode) -> GestureKind {
    match button {
        PointerButton::Middle => GestureKind::Pan,
        PointerButton::Right => GestureKind::Context,
        PointerButton::Left if mode == EditMode::View || modifiers.forces_pan() => GestureKind::Pan,
        PointerButton::Left => GestureKind::Edit,
        PointerButton::Other => GestureKind::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_button_pans_in_both_modes() {
        for mode in [EditMode::View, EditMode::Edit] {
            assert_eq!(classify_gesture(PointerButton::Middle, Modifiers::NONE, mode), GestureKind::Pan);
        }
    }

    #[test]
    fn test_left_drag_pans_in_view_mode() {
        assert_eq!(
            classify_gesture(PointerButton::Left, Modifiers::NONE, EditMode::View),
            GestureKind::Pan
        );
    }

    #[test]
    fn test_left_click_edits_in_edit_mode() {
        assert_eq!(
            classify_gesture(PointerButton::Left, Modifiers::NONE, EditMode::Edit),
            GestureKind::Edit
        );
    }

    #[test]
    fn test_modified_left_drag_pans_in_edit_mode() {
        assert_eq!(classify_gesture(PointerButton::Left, Modifiers::shift(), EditMode::Edit), GestureKind::Pan);
        assert_eq!(classify_gesture(PointerButton::Left, Modifiers::control(), EditMode::Edit), GestureKind::Pan);
    }

    #[test]
    fn test_right_button_is_context() {
        assert_eq!(
            classify_gesture(PointerButton::Right, Modifiers::shift(), EditMode::View),
            GestureKind::Context
        );
    }

    #[test]
    fn test_key_text_mapping() {
        assert_eq!(EditorKey::from_text("\u{1b}"), EditorKey::Escape);
        assert_eq!(EditorKey::from_text("\u{7f}"), EditorKey::Delete);
        assert_eq!(EditorKey::from_text("Backspace"), EditorKey::Backspace);
        assert_eq!(EditorKey::from_text("a"), EditorKey::Other);
        assert!(EditorKey::Backspace.is_delete());
        assert!(!EditorKey::Escape.is_delete());
    }

    #[test]
    fn test_slint_button_conversion() {
        assert_eq!(PointerButton::from(PointerEventButton::Left), PointerButton::Left);
        assert_eq!(PointerButton::from(PointerEventButton::Right), PointerButton::Right);
        assert_eq!(PointerButton::from(PointerEventButton::Other), PointerButton::Other);
    }
}
