//! An editing session: one chart plus the views kept in sync with it.

use chart_core::ChartDocument;

use super::{ActionManager, EditContext, EditorPreferences, SelectedHitsounds};
use crate::actions::{Action, ActionError, ActionResult};
use crate::integration::{
    CollaboratorError, DensitySampler, NoteDensityCache, ProxyPool, SnapCursor, VisualPool,
};

/// Owns the chart, its proxy pool, density cache, cursor and action
/// history, and builds the [`EditContext`] for each call.
pub struct ChartEditor {
    chart: ChartDocument,
    visuals: ProxyPool,
    density: NoteDensityCache,
    cursor: SnapCursor,
    selected_hitsounds: SelectedHitsounds,
    actions: ActionManager,
    preferences: EditorPreferences,
}

impl ChartEditor {
    /// Open a session on `chart`, creating proxies for the objects it
    /// already holds.
    pub fn new(chart: ChartDocument, preferences: EditorPreferences) -> Result<Self, CollaboratorError> {
        let mut visuals = ProxyPool::new();
        for object in chart.hit_objects().lock().iter() {
            visuals.add_proxy(object)?;
        }
        let density = NoteDensityCache::new(chart.hit_objects().clone(), preferences.density_bin_ms);

        log::info!(
            "Opened {} chart with {} hit objects",
            chart.mode().name(),
            visuals.active_count()
        );

        let mut actions = ActionManager::with_history_limit(preferences.max_history);
        actions.set_event_delivery(preferences.event_delivery);

        Ok(Self {
            chart,
            visuals,
            density,
            cursor: SnapCursor::default(),
            selected_hitsounds: SelectedHitsounds::default(),
            actions,
            preferences,
        })
    }

    pub fn perform<A: Action + 'static>(&mut self, action: A) -> ActionResult {
        let mut ctx = EditContext::new(&mut self.chart, &mut self.visuals, &mut self.density, &mut self.cursor)
            .with_selected_hitsounds(&mut self.selected_hitsounds);
        self.actions.perform(&mut ctx, action)
    }

    pub fn undo(&mut self) -> Result<bool, ActionError> {
        let mut ctx = EditContext::new(&mut self.chart, &mut self.visuals, &mut self.density, &mut self.cursor)
            .with_selected_hitsounds(&mut self.selected_hitsounds);
        self.actions.undo(&mut ctx)
    }

    pub fn redo(&mut self) -> Result<bool, ActionError> {
        let mut ctx = EditContext::new(&mut self.chart, &mut self.visuals, &mut self.density, &mut self.cursor)
            .with_selected_hitsounds(&mut self.selected_hitsounds);
        self.actions.redo(&mut ctx)
    }

    /// Deliver events queued under [`crate::core::EventDelivery::Deferred`].
    pub fn process_events(&mut self) {
        self.actions.process_events();
    }

    /// Start a background density sampler over this chart's hit objects.
    pub fn spawn_density_sampler(&self) -> Result<DensitySampler, CollaboratorError> {
        DensitySampler::spawn(self.chart.hit_objects().clone(), self.preferences.density_bin_ms)
    }

    pub fn chart(&self) -> &ChartDocument {
        &self.chart
    }

    pub fn visuals(&self) -> &ProxyPool {
        &self.visuals
    }

    pub fn density(&self) -> &NoteDensityCache {
        &self.density
    }

    pub fn cursor(&self) -> &SnapCursor {
        &self.cursor
    }

    /// Seek the playback position.
    pub fn seek(&mut self, time: i32) {
        self.cursor.seek(time);
    }

    pub fn selected_hitsounds(&self) -> &SelectedHitsounds {
        &self.selected_hitsounds
    }

    pub fn actions(&self) -> &ActionManager {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut ActionManager {
        &mut self.actions
    }

    pub fn preferences(&self) -> &EditorPreferences {
        &self.preferences
    }

    /// Hand the chart back to the caller, e.g. for saving to disk.
    pub fn into_chart(self) -> ChartDocument {
        self.chart
    }
}
