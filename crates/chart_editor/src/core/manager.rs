//! Action manager: performs, undoes and redoes actions and raises events.

use chart_event::{EventBus, Priority, SubscriberId};
use serde::{Deserialize, Serialize};

use super::{EditContext, UndoHistory};
use crate::actions::{Action, ActionError, ActionKind, ActionResult};
use crate::events::EditorEvent;

/// When subscribers see the events raised by an action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventDelivery {
    /// Before `perform`, `undo` or `redo` returns
    #[default]
    Immediate,
    /// Queued until [`ActionManager::process_events`], e.g. once per frame
    Deferred,
}

/// Owns the undo/redo history and the observer bus.
///
/// Every call runs to completion on the calling thread. If an action fails
/// the error is returned and the action is dropped from both stacks; the
/// session should be treated as corrupted.
pub struct ActionManager {
    history: UndoHistory,
    events: EventBus,
    delivery: EventDelivery,
}

impl Default for ActionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionManager {
    pub fn new() -> Self {
        Self::with_history_limit(UndoHistory::DEFAULT_MAX_SIZE)
    }

    /// `0` keeps every action.
    pub fn with_history_limit(max_history: usize) -> Self {
        Self {
            history: UndoHistory::with_capacity(max_history),
            events: EventBus::new(),
            delivery: EventDelivery::Immediate,
        }
    }

    /// Perform `action` and make it the most recent undo step.
    pub fn perform<A: Action + 'static>(&mut self, ctx: &mut EditContext<'_>, action: A) -> ActionResult {
        self.perform_boxed(ctx, Box::new(action))
    }

    pub fn perform_boxed(&mut self, ctx: &mut EditContext<'_>, mut action: Box<dyn Action>) -> ActionResult {
        if let Err(err) = action.perform(ctx) {
            return Err(self.fail(ctx, action.kind(), "perform", err));
        }
        log::debug!("Performed {}", action.description());

        self.history.push(action);
        self.dispatch(ctx);
        Ok(())
    }

    /// Undo the most recent action. Returns `false` if there was nothing
    /// to undo.
    pub fn undo(&mut self, ctx: &mut EditContext<'_>) -> Result<bool, ActionError> {
        let mut entry = match self.history.pop_undo() {
            Some(entry) => entry,
            None => return Ok(false),
        };
        if let Err(err) = entry.action.undo(ctx) {
            return Err(self.fail(ctx, entry.action.kind(), "undo", err));
        }
        log::debug!("Undid {}", entry.action.description());

        self.history.push_to_redo(entry);
        self.dispatch(ctx);
        Ok(true)
    }

    /// Perform the most recently undone action again. Returns `false` if
    /// there was nothing to redo.
    pub fn redo(&mut self, ctx: &mut EditContext<'_>) -> Result<bool, ActionError> {
        let mut entry = match self.history.pop_redo() {
            Some(entry) => entry,
            None => return Ok(false),
        };
        if let Err(err) = entry.action.perform(ctx) {
            return Err(self.fail(ctx, entry.action.kind(), "redo", err));
        }
        log::debug!("Redid {}", entry.action.description());

        self.history.push_to_undo(entry);
        self.dispatch(ctx);
        Ok(true)
    }

    fn fail(&self, ctx: &mut EditContext<'_>, kind: ActionKind, step: &str, err: ActionError) -> ActionError {
        log::error!("{} {} failed: {}", step, kind, err);
        // Events of a half-applied action describe no consistent state
        ctx.take_events();
        err
    }

    fn dispatch(&self, ctx: &mut EditContext<'_>) {
        for event in ctx.take_events() {
            self.raise(event);
        }
        self.raise_history_changed();
    }

    fn raise_history_changed(&self) {
        self.raise(EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    fn raise(&self, event: EditorEvent) {
        match self.delivery {
            EventDelivery::Immediate => self.events.emit(&event),
            EventDelivery::Deferred => self.events.publish(event),
        }
    }

    // ---- Event delivery ----

    pub fn event_delivery(&self) -> EventDelivery {
        self.delivery
    }

    /// Switch delivery mode. Events still queued are delivered first when
    /// switching back to immediate delivery.
    pub fn set_event_delivery(&mut self, delivery: EventDelivery) {
        if delivery == EventDelivery::Immediate && self.events.has_pending() {
            self.events.process();
        }
        self.delivery = delivery;
    }

    /// Deliver queued events in the order they were raised.
    pub fn process_events(&mut self) {
        self.events.process();
    }

    /// Number of events waiting for [`Self::process_events`].
    pub fn pending_events(&self) -> usize {
        self.events.pending_count()
    }

    // ---- Observers ----

    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&EditorEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(handler)
    }

    pub fn subscribe_with_priority<F>(&mut self, handler: F, priority: Priority) -> SubscriberId
    where
        F: Fn(&EditorEvent) + Send + Sync + 'static,
    {
        self.events.subscribe_with_priority(handler, priority)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.events.unsubscribe(id)
    }

    // ---- History state ----

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_kind(&self) -> Option<ActionKind> {
        self.history.peek_undo().map(|a| a.kind())
    }

    pub fn redo_kind(&self) -> Option<ActionKind> {
        self.history.peek_redo().map(|a| a.kind())
    }

    pub fn undo_count(&self) -> usize {
        self.history.undo_count()
    }

    pub fn redo_count(&self) -> usize {
        self.history.redo_count()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.history.is_dirty()
    }

    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
    }

    /// Drop both stacks, e.g. after the chart was reloaded.
    pub fn clear(&mut self) {
        self.history.clear();
        let dropped = self.events.pending_count();
        // Queued events describe the chart being replaced
        self.events.clear();
        log::info!("Cleared edit history, dropped {} queued events", dropped);
        self.raise_history_changed();
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{AddBookmark, RemoveBookmark};
    use crate::integration::{NoteDensityCache, ProxyPool, SnapCursor};
    use chart_core::{ChartDocument, GameMode};
    use std::sync::Arc;

    fn with_context<R>(chart: &mut ChartDocument, f: impl FnOnce(&mut EditContext<'_>) -> R) -> R {
        let mut pool = ProxyPool::new();
        let mut density = NoteDensityCache::new(chart.hit_objects().clone(), 1000);
        let mut cursor = SnapCursor::new(0);
        let mut ctx = EditContext::new(chart, &mut pool, &mut density, &mut cursor);
        f(&mut ctx)
    }

    #[test]
    fn test_empty_undo_redo_are_noops() {
        let mut chart = ChartDocument::new(GameMode::Keys4);
        let mut manager = ActionManager::new();
        with_context(&mut chart, |ctx| {
            assert!(!manager.undo(ctx).unwrap());
            assert!(!manager.redo(ctx).unwrap());
        });
        assert_eq!(manager.undo_count(), 0);
    }

    #[test]
    fn test_bookmark_events() {
        let mut chart = ChartDocument::new(GameMode::Keys4);
        let mut manager = ActionManager::new();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = seen.clone();
        manager.subscribe(move |event: &EditorEvent| {
            if !matches!(event, EditorEvent::HistoryChanged { .. }) {
                sink.lock().push(event.clone());
            }
        });

        with_context(&mut chart, |ctx| {
            manager.perform(ctx, AddBookmark::new(1000, None)).unwrap();
            manager.undo(ctx).unwrap();
            manager.redo(ctx).unwrap();
        });

        let seen = seen.lock();
        assert_eq!(seen.len(), 3);
        assert!(matches!(seen[0], EditorEvent::BookmarkAdded(_)));
        assert!(matches!(seen[1], EditorEvent::BookmarkRemoved(_)));
        assert!(matches!(seen[2], EditorEvent::BookmarkAdded(_)));
        assert_eq!(manager.undo_kind(), Some(ActionKind::AddBookmark));
    }

    #[test]
    fn test_delegated_undo_does_not_touch_stacks() {
        let mut chart = ChartDocument::new(GameMode::Keys4);
        let mut manager = ActionManager::new();
        with_context(&mut chart, |ctx| {
            manager.perform(ctx, AddBookmark::new(1000, None)).unwrap();
            assert!(manager.undo(ctx).unwrap());
        });
        assert_eq!(manager.undo_count(), 0);
        assert_eq!(manager.redo_count(), 1);
        assert_eq!(manager.redo_kind(), Some(ActionKind::AddBookmark));
    }

    #[test]
    fn test_failed_action_is_not_recorded() {
        let mut chart = ChartDocument::new(GameMode::Keys4);
        let ghost = chart.create_bookmark(0, None);
        let mut manager = ActionManager::new();
        let result = with_context(&mut chart, |ctx| manager.perform(ctx, RemoveBookmark::new(ghost.id)));
        assert!(result.is_err());
        assert!(!manager.can_undo());
        assert!(!manager.has_unsaved_changes());
    }

    #[test]
    fn test_unsaved_changes() {
        let mut chart = ChartDocument::new(GameMode::Keys4);
        let mut manager = ActionManager::new();
        with_context(&mut chart, |ctx| {
            manager.perform(ctx, AddBookmark::new(1000, None)).unwrap();
            assert!(manager.has_unsaved_changes());
            manager.mark_saved();
            assert!(!manager.has_unsaved_changes());
            manager.undo(ctx).unwrap();
            assert!(manager.has_unsaved_changes());
            manager.redo(ctx).unwrap();
            assert!(!manager.has_unsaved_changes());
        });

        manager.clear();
        assert!(!manager.can_redo());
        assert!(!manager.has_unsaved_changes());
    }

    #[test]
    fn test_deferred_delivery() {
        let mut chart = ChartDocument::new(GameMode::Keys4);
        let mut manager = ActionManager::new();
        manager.set_event_delivery(EventDelivery::Deferred);
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = seen.clone();
        manager.subscribe(move |event: &EditorEvent| sink.lock().push(event.clone()));

        with_context(&mut chart, |ctx| {
            manager.perform(ctx, AddBookmark::new(1000, None)).unwrap();
            manager.undo(ctx).unwrap();
        });
        assert!(seen.lock().is_empty());
        assert_eq!(manager.pending_events(), 4);

        manager.process_events();
        let seen = seen.lock();
        assert_eq!(seen.len(), 4);
        assert!(matches!(seen[0], EditorEvent::BookmarkAdded(_)));
        assert!(matches!(seen[1], EditorEvent::HistoryChanged { can_undo: true, can_redo: false }));
        assert!(matches!(seen[2], EditorEvent::BookmarkRemoved(_)));
        assert!(matches!(seen[3], EditorEvent::HistoryChanged { can_undo: false, can_redo: true }));
        assert_eq!(manager.pending_events(), 0);
    }

    #[test]
    fn test_switching_to_immediate_flushes_queue() {
        let mut chart = ChartDocument::new(GameMode::Keys4);
        let mut manager = ActionManager::new();
        manager.set_event_delivery(EventDelivery::Deferred);
        let seen = Arc::new(parking_lot::Mutex::new(0usize));
        let sink = seen.clone();
        manager.subscribe(move |_: &EditorEvent| *sink.lock() += 1);

        with_context(&mut chart, |ctx| {
            manager.perform(ctx, AddBookmark::new(0, None)).unwrap();
        });
        manager.set_event_delivery(EventDelivery::Immediate);
        assert_eq!(*seen.lock(), 2);
        assert_eq!(manager.event_delivery(), EventDelivery::Immediate);
    }

    #[test]
    fn test_clear_drops_queued_events() {
        let mut chart = ChartDocument::new(GameMode::Keys4);
        let mut manager = ActionManager::new();
        manager.set_event_delivery(EventDelivery::Deferred);
        with_context(&mut chart, |ctx| {
            manager.perform(ctx, AddBookmark::new(0, None)).unwrap();
        });
        assert_eq!(manager.pending_events(), 2);

        manager.clear();
        // Only the HistoryChanged raised by the clear itself
        assert_eq!(manager.pending_events(), 1);
    }
}
