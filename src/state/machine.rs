use super::error::StateError;
use super::{ClickCode, PointerEventKind};
use crate::geometry::ToolPoint;

/// Per-document interaction state shared by every tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    click_code: ClickCode,
    anchor: Option<ToolPoint>,
    points: Vec<ToolPoint>,
    right_click: bool,
    active_clicks: u32,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            click_code: ClickCode::NoClicks,
            anchor: None,
            points: Vec::new(),
            right_click: false,
            active_clicks: 0,
        }
    }

    pub fn click_code(&self) -> ClickCode {
        self.click_code
    }

    pub fn set_click_code(&mut self, next: ClickCode) {
        if next != self.click_code {
            tracing::trace!(from = ?self.click_code, to = ?next, "click code transition");
        }
        self.click_code = next;
    }

    pub fn anchor(&self) -> Option<ToolPoint> {
        self.anchor
    }

    pub fn set_anchor(&mut self, point: ToolPoint) {
        self.anchor = Some(point);
    }

    pub fn points(&self) -> &[ToolPoint] {
        &self.points
    }

    pub fn push_point(&mut self, point: ToolPoint) {
        self.points.push(point);
    }

    pub fn is_right_click(&self) -> bool {
        self.right_click
    }

    pub fn set_right_click(&mut self, right_click: bool) {
        self.right_click = right_click;
    }

    pub fn active_clicks(&self) -> u32 {
        self.active_clicks
    }

    /// Counts a button going down.
    pub fn press(&mut self) {
        self.active_clicks = self.active_clicks.saturating_add(1);
    }

    /// Counts a button going up.
    pub fn release(&mut self) {
        if self.active_clicks == 0 {
            tracing::warn!(code = ?self.click_code, "release without a matching press");
            return;
        }
        self.active_clicks -= 1;
    }

    /// Reopens the session once a resolved gesture has no buttons left down.
    pub fn settle(&mut self) {
        if self.click_code == ClickCode::IgnoreAll && self.active_clicks == 0 {
            debug_assert!(self.points.is_empty(), "points must be cleared before idling");
            self.set_click_code(ClickCode::NoClicks);
        }
    }

    /// Drops the gesture in progress and ignores input until buttons are up.
    pub fn abandon_gesture(&mut self) {
        self.points.clear();
        self.anchor = None;
        self.set_click_code(ClickCode::IgnoreAll);
    }

    /// Full reset used when the active tool changes.
    pub fn reset(&mut self) {
        self.points.clear();
        self.anchor = None;
        self.right_click = false;
        self.active_clicks = 0;
        self.set_click_code(ClickCode::NoClicks);
    }

    pub fn illegal(&self, tool: &'static str, event: PointerEventKind) -> StateError {
        tracing::warn!(tool, ?event, code = ?self.click_code, "illegal click code for tool");
        StateError::IllegalClickCode {
            tool,
            event,
            code: self.click_code,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ClickCode::{:?} (active clicks: {}, points: {})",
            self.click_code,
            self.active_clicks,
            self.points.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_waits_for_every_button_to_be_released() {
        let mut session = SessionState::new();
        session.press();
        session.press();
        session.abandon_gesture();

        session.release();
        session.settle();
        assert_eq!(session.click_code(), ClickCode::IgnoreAll);

        session.release();
        session.settle();
        assert_eq!(session.click_code(), ClickCode::NoClicks);
    }

    #[test]
    fn settle_leaves_live_gestures_alone() {
        let mut session = SessionState::new();
        session.set_click_code(ClickCode::ClickWaiting);
        session.settle();
        assert_eq!(session.click_code(), ClickCode::ClickWaiting);
    }

    #[test]
    fn unmatched_release_does_not_underflow() {
        let mut session = SessionState::new();
        session.release();
        assert_eq!(session.active_clicks(), 0);
    }

    #[test]
    fn abandon_gesture_clears_points_and_anchor() {
        let mut session = SessionState::new();
        session.set_anchor(ToolPoint::new(1, 2));
        session.push_point(ToolPoint::new(3, 4));
        session.set_click_code(ClickCode::DragALine);

        session.abandon_gesture();

        assert_eq!(session.click_code(), ClickCode::IgnoreAll);
        assert!(session.points().is_empty());
        assert_eq!(session.anchor(), None);
    }

    #[test]
    fn reset_returns_to_a_fresh_session() {
        let mut session = SessionState::new();
        session.press();
        session.set_right_click(true);
        session.push_point(ToolPoint::new(3, 4));
        session.set_click_code(ClickCode::DragALine);

        session.reset();

        assert_eq!(session, SessionState::new());
    }

    #[test]
    fn illegal_reports_current_click_code() {
        let mut session = SessionState::new();
        session.set_click_code(ClickCode::FinalClick);
        let err = session.illegal("line", PointerEventKind::Dragged);
        assert!(matches!(
            err,
            StateError::IllegalClickCode {
                tool: "line",
                event: PointerEventKind::Dragged,
                code: ClickCode::FinalClick
            }
        ));
    }
}
