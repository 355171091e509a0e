//! Hit object placement and deletion, singular and batched.

use std::collections::HashSet;

use chart_core::{ChartDocument, ChartError, HitObject, HitObjectId};

use super::{dedup_by_id, Action, ActionKind, ActionResult};
use crate::core::EditContext;
use crate::events::EditorEvent;

/// Place one hit object.
pub struct PlaceHitObject {
    target: HitObject,
}

impl PlaceHitObject {
    /// Validate `target` against the chart's lane count and timing rules.
    pub fn new(chart: &ChartDocument, target: HitObject) -> Result<Self, ChartError> {
        chart.validate_hit_object(&target)?;
        Ok(Self::new_unchecked(target))
    }

    /// Skip validation; the caller guarantees a well-formed object.
    pub fn new_unchecked(target: HitObject) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &HitObject {
        &self.target
    }
}

impl Action for PlaceHitObject {
    fn kind(&self) -> ActionKind {
        ActionKind::PlaceHitObject
    }

    fn perform(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        {
            let mut objects = ctx.chart().hit_objects().lock();
            if objects.contains(self.target.id) {
                return Err(ChartError::DuplicateHitObject(self.target.id).into());
            }
            objects.push(self.target.clone());
            objects.sort();
        }

        ctx.add_proxy(&self.target)?;
        ctx.refresh_sample(&self.target)?;
        ctx.force_recache()?;
        ctx.refresh_cursor_index()?;

        log::debug!("Placed {} at {}ms lane {}", self.target.id, self.target.start_time, self.target.lane);
        ctx.emit(EditorEvent::HitObjectPlaced(self.target.clone()));
        Ok(())
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        DeleteHitObject::new(self.target.clone()).perform(ctx)
    }
}

/// Delete one hit object.
pub struct DeleteHitObject {
    target: HitObject,
}

impl DeleteHitObject {
    pub fn new(target: HitObject) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &HitObject {
        &self.target
    }
}

impl Action for DeleteHitObject {
    fn kind(&self) -> ActionKind {
        ActionKind::DeleteHitObject
    }

    fn perform(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        let id = self.target.id;
        let removed = {
            let mut objects = ctx.chart().hit_objects().lock();
            let removed = objects.remove(id).ok_or(ChartError::HitObjectNotFound(id))?;
            objects.sort();
            removed
        };
        // Keep the object as it was at removal so undo restores that state
        self.target = removed;

        ctx.remove_proxy(&self.target)?;
        ctx.refresh_sample(&self.target)?;
        ctx.force_recache()?;
        ctx.refresh_cursor_index()?;

        log::debug!("Deleted {}", id);
        ctx.emit(EditorEvent::HitObjectRemoved(self.target.clone()));
        Ok(())
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        PlaceHitObject::new_unchecked(self.target.clone()).perform(ctx)
    }
}

/// Place many hit objects as one undoable unit.
///
/// The list is mutated and re-sorted under a single lock and the density
/// aggregate is rebuilt once, whatever the batch size. Objects whose id is
/// already in the chart are skipped.
pub struct BatchPlaceHitObjects {
    targets: Vec<HitObject>,
    placed: Vec<HitObject>,
}

impl BatchPlaceHitObjects {
    pub fn new(chart: &ChartDocument, targets: Vec<HitObject>) -> Result<Self, ChartError> {
        for target in &targets {
            chart.validate_hit_object(target)?;
        }
        Ok(Self::new_unchecked(targets))
    }

    pub fn new_unchecked(targets: Vec<HitObject>) -> Self {
        Self {
            targets: dedup_by_id(targets, ActionKind::PlaceHitObjectBatch),
            placed: Vec::new(),
        }
    }

    pub fn targets(&self) -> &[HitObject] {
        &self.targets
    }
}

impl Action for BatchPlaceHitObjects {
    fn kind(&self) -> ActionKind {
        ActionKind::PlaceHitObjectBatch
    }

    fn perform(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        let cursor_time = ctx.cursor_time();
        let (placed, cursor_index) = {
            let mut objects = ctx.chart().hit_objects().lock();
            let existing: HashSet<HitObjectId> = objects.iter().map(|h| h.id).collect();

            let mut placed = Vec::with_capacity(self.targets.len());
            for target in &self.targets {
                if existing.contains(&target.id) {
                    log::warn!("{} is already in the chart, skipping", target.id);
                    continue;
                }
                objects.push(target.clone());
                placed.push(target.clone());
            }
            objects.sort();
            (placed, objects.index_at_time(cursor_time))
        };

        for object in &placed {
            ctx.add_proxy(object)?;
            ctx.refresh_sample(object)?;
        }
        ctx.force_recache()?;
        ctx.set_cursor_index(cursor_index)?;

        log::debug!("Placed {} hit objects", placed.len());
        ctx.emit(EditorEvent::HitObjectsBatchPlaced(placed.clone()));
        self.placed = placed;
        Ok(())
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        BatchDeleteHitObjects::new(self.placed.clone()).perform(ctx)
    }
}

/// Delete many hit objects as one undoable unit.
///
/// Ids missing from the chart are skipped; undo restores exactly the
/// objects that were removed.
pub struct BatchDeleteHitObjects {
    targets: Vec<HitObject>,
    removed: Vec<HitObject>,
}

impl BatchDeleteHitObjects {
    pub fn new(targets: Vec<HitObject>) -> Self {
        Self {
            targets: dedup_by_id(targets, ActionKind::DeleteHitObjectBatch),
            removed: Vec::new(),
        }
    }

    /// Delete the current versions of the given ids.
    pub fn from_ids(chart: &ChartDocument, ids: &[HitObjectId]) -> Result<Self, ChartError> {
        let targets = ids
            .iter()
            .map(|id| chart.require_hit_object(*id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(targets))
    }

    pub fn targets(&self) -> &[HitObject] {
        &self.targets
    }
}

impl Action for BatchDeleteHitObjects {
    fn kind(&self) -> ActionKind {
        ActionKind::DeleteHitObjectBatch
    }

    fn perform(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        let ids: HashSet<HitObjectId> = self.targets.iter().map(|h| h.id).collect();
        let cursor_time = ctx.cursor_time();
        let (removed, cursor_index) = {
            let mut objects = ctx.chart().hit_objects().lock();
            let removed = objects.remove_all(&ids);
            objects.sort();
            (removed, objects.index_at_time(cursor_time))
        };
        if removed.len() != ids.len() {
            log::warn!("{} of {} hit objects were not in the chart", ids.len() - removed.len(), ids.len());
        }

        for object in &removed {
            ctx.remove_proxy(object)?;
            ctx.refresh_sample(object)?;
        }
        ctx.force_recache()?;
        ctx.set_cursor_index(cursor_index)?;

        log::debug!("Deleted {} hit objects", removed.len());
        ctx.emit(EditorEvent::HitObjectsBatchRemoved(removed.clone()));
        self.removed = removed;
        Ok(())
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        BatchPlaceHitObjects::new_unchecked(self.removed.clone()).perform(ctx)
    }
}
