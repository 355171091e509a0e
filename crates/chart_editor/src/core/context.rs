//! The edit context handed to every action.

use chart_core::{ChartDocument, HitObject, HitObjectId, HitSounds};

use crate::actions::{ActionError, ActionResult};
use crate::events::EditorEvent;
use crate::integration::{DensityCache, PlaybackCursor, VisualPool};

/// Hitsounds shared by the current selection, shown in the hitsound panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectedHitsounds {
    /// Set on every selected object
    pub common: HitSounds,
    /// Set on at least one selected object
    pub any: HitSounds,
    pub count: usize,
}

impl SelectedHitsounds {
    /// Recompute from the given objects.
    pub fn refresh<'a>(&mut self, objects: impl IntoIterator<Item = &'a HitObject>) {
        let mut common = HitSounds::ALL;
        let mut any = HitSounds::NONE;
        let mut count = 0;
        for object in objects {
            common = common & object.hit_sounds;
            any |= object.hit_sounds;
            count += 1;
        }
        self.common = if count == 0 { HitSounds::NONE } else { common };
        self.any = any;
        self.count = count;
    }
}

/// Everything an action may touch, borrowed from the owning session for
/// the duration of one perform/undo/redo call.
pub struct EditContext<'a> {
    chart: &'a mut ChartDocument,
    visuals: &'a mut dyn VisualPool,
    density: &'a mut dyn DensityCache,
    cursor: &'a mut dyn PlaybackCursor,
    selected_hitsounds: Option<&'a mut SelectedHitsounds>,
    events: Vec<EditorEvent>,
}

impl<'a> EditContext<'a> {
    pub fn new(
        chart: &'a mut ChartDocument,
        visuals: &'a mut dyn VisualPool,
        density: &'a mut dyn DensityCache,
        cursor: &'a mut dyn PlaybackCursor,
    ) -> Self {
        Self {
            chart,
            visuals,
            density,
            cursor,
            selected_hitsounds: None,
            events: Vec::new(),
        }
    }

    /// Attach the hitsound panel aggregate refreshed by hitsound actions.
    pub fn with_selected_hitsounds(mut self, selected: &'a mut SelectedHitsounds) -> Self {
        self.selected_hitsounds = Some(selected);
        self
    }

    pub fn chart(&self) -> &ChartDocument {
        &*self.chart
    }

    pub fn chart_mut(&mut self) -> &mut ChartDocument {
        &mut *self.chart
    }

    // ---- Visual pool ----

    pub fn add_proxy(&mut self, hit_object: &HitObject) -> ActionResult {
        self.visuals.add_proxy(hit_object).map_err(ActionError::VisualPool)
    }

    pub fn remove_proxy(&mut self, hit_object: &HitObject) -> ActionResult {
        self.visuals.remove_proxy(hit_object).map_err(ActionError::VisualPool)
    }

    pub fn refresh_proxy(&mut self, hit_object: &HitObject) -> ActionResult {
        self.visuals.refresh_proxy(hit_object).map_err(ActionError::VisualPool)
    }

    pub fn resize_long_note_proxy(&mut self, hit_object: &HitObject) -> ActionResult {
        self.visuals
            .resize_long_note_proxy(hit_object)
            .map_err(ActionError::VisualPool)
    }

    // ---- Density cache ----

    pub fn refresh_sample(&mut self, hit_object: &HitObject) -> ActionResult {
        self.density.refresh_sample(hit_object).map_err(ActionError::DensityCache)
    }

    pub fn force_recache(&mut self) -> ActionResult {
        self.density.force_recache().map_err(ActionError::DensityCache)
    }

    // ---- Playback cursor ----

    pub fn cursor_time(&self) -> i32 {
        self.cursor.current_time()
    }

    pub fn set_cursor_index(&mut self, index: usize) -> ActionResult {
        self.cursor.set_cursor_index(index).map_err(ActionError::PlaybackCursor)
    }

    /// Recompute the cursor index from the current list and publish it.
    pub fn refresh_cursor_index(&mut self) -> ActionResult {
        let time = self.cursor.current_time();
        let index = self.chart.hit_objects().lock().index_at_time(time);
        self.set_cursor_index(index)
    }

    // ---- Hitsound panel ----

    pub fn refresh_selected_hitsounds(&mut self, targets: &[HitObjectId]) {
        if let Some(selected) = self.selected_hitsounds.as_deref_mut() {
            let objects = self.chart.hit_objects().lock();
            selected.refresh(targets.iter().filter_map(|id| objects.get(*id)));
        }
    }

    // ---- Events ----

    /// Queue an event; the action manager raises it once the call returns.
    pub fn emit(&mut self, event: EditorEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }
}
