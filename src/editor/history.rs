use super::*;

impl CanvasModel {
    /// Commits `drawable`: stamps its label, draws it, appends it to history
    /// and closes the gesture that produced it.
    /// Previews and `Nothing` are dropped with a warning.
    pub fn finalize(&mut self, mut drawable: Drawable) {
        if !drawable.kind().is_committable() {
            tracing::warn!(kind = ?drawable.kind(), "uncommittable drawable dropped");
            self.transient = Drawable::Nothing;
            self.session.abandon_gesture();
            return;
        }
        drawable.stamp_with(&mut self.counters);
        drawable.render(&mut self.pixels);
        tracing::debug!(
            kind = ?drawable.kind(),
            name = drawable.name().as_deref().unwrap_or("-"),
            depth = self.history.len() + 1,
            "drawable committed"
        );

        self.history.push(drawable);
        self.redo_stack.clear();
        self.transient = Drawable::Nothing;
        self.session.abandon_gesture();
        self.dirty = true;
        self.notify(ModelChange::Changed);
    }

    /// Removes the last committed drawable and rebuilds the pixels by replay.
    pub fn undo(&mut self) -> bool {
        let Some(drawable) = self.history.pop() else {
            tracing::trace!("undo stack empty");
            return false;
        };
        tracing::debug!(kind = ?drawable.kind(), remaining = self.history.len(), "undo");
        self.redo_stack.push(drawable);
        self.redraw();
        self.close_session_after_history_edit();
        self.dirty = true;
        self.notify(ModelChange::Changed);
        true
    }

    /// Re-applies the most recently undone drawable on top of the current
    /// pixels.
    pub fn redo(&mut self) -> bool {
        let Some(drawable) = self.redo_stack.pop() else {
            tracing::trace!("redo stack empty");
            return false;
        };
        tracing::debug!(kind = ?drawable.kind(), remaining = self.redo_stack.len(), "redo");
        drawable.render(&mut self.pixels);
        self.history.push(drawable);
        self.close_session_after_history_edit();
        self.dirty = true;
        self.notify(ModelChange::Changed);
        true
    }

    fn close_session_after_history_edit(&mut self) {
        self.transient = Drawable::Nothing;
        self.session.abandon_gesture();
        self.session.settle();
    }
}
