/// Where a gesture stands, as seen by the tool that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickCode {
    /// Idle; the next press starts a fresh gesture.
    #[default]
    NoClicks,
    /// A two-point shape gesture has its anchor.
    OneClick,
    /// A gesture was committed or canceled; input is swallowed until every
    /// pressed button has been released.
    IgnoreAll,
    /// A button is held while a segment is being dragged out.
    DragALine,
    /// Polygon vertex placed, waiting for the next press.
    ClickWaiting,
    /// The opposite button was pressed; its release closes the polygon.
    FinalClick,
}

impl ClickCode {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::NoClicks)
    }
}
