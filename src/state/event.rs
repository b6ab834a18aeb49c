use serde::{Deserialize, Serialize};

use crate::geometry::ToolPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Pressed,
    Dragged,
    Released,
    Clicked,
    Moved,
}

/// Raw pointer input in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PointerEvent {
    Pressed {
        point: ToolPoint,
        #[serde(default)]
        right_click: bool,
    },
    Dragged {
        point: ToolPoint,
    },
    Released {
        point: ToolPoint,
    },
    Clicked {
        point: ToolPoint,
    },
    Moved {
        point: ToolPoint,
    },
}

impl PointerEvent {
    pub const fn kind(&self) -> PointerEventKind {
        match self {
            Self::Pressed { .. } => PointerEventKind::Pressed,
            Self::Dragged { .. } => PointerEventKind::Dragged,
            Self::Released { .. } => PointerEventKind::Released,
            Self::Clicked { .. } => PointerEventKind::Clicked,
            Self::Moved { .. } => PointerEventKind::Moved,
        }
    }

    pub const fn point(&self) -> ToolPoint {
        match *self {
            Self::Pressed { point, .. }
            | Self::Dragged { point }
            | Self::Released { point }
            | Self::Clicked { point }
            | Self::Moved { point } => point,
        }
    }
}
