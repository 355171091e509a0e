//! Lane and time transforms: horizontal flip, move, long note resize.

use chart_core::{validate_end_time, ChartDocument, ChartError, HitObject, HitObjectId};

use super::{dedup_ids, Action, ActionError, ActionKind, ActionResult};
use crate::core::EditContext;
use crate::events::EditorEvent;

/// Mirror hit objects across the playfield: `lane -> K + 1 - lane`.
///
/// Self-inverse, so `undo` performs the same mapping again.
pub struct FlipHitObjectsHorizontally {
    targets: Vec<HitObjectId>,
}

impl FlipHitObjectsHorizontally {
    pub fn new(targets: Vec<HitObjectId>) -> Self {
        // A duplicate would be flipped twice and end up unchanged
        Self {
            targets: dedup_ids(targets, ActionKind::FlipHitObjects),
        }
    }

    pub fn targets(&self) -> &[HitObjectId] {
        &self.targets
    }

    fn flip(&self, ctx: &mut EditContext<'_>) -> ActionResult {
        let mode = ctx.chart().mode();
        let flipped = {
            let mut objects = ctx.chart().hit_objects().lock();
            if let Some(missing) = self.targets.iter().find(|id| !objects.contains(**id)) {
                return Err(ChartError::HitObjectNotFound(*missing).into());
            }

            let mut flipped = Vec::with_capacity(self.targets.len());
            for id in &self.targets {
                if let Some(object) = objects.get_mut(*id) {
                    object.lane = mode.mirror_lane(object.lane);
                    flipped.push(object.clone());
                }
            }
            // Lane breaks start time ties
            objects.sort();
            flipped
        };

        for object in &flipped {
            ctx.refresh_proxy(object)?;
            if object.is_long_note() {
                ctx.resize_long_note_proxy(object)?;
            }
        }

        log::debug!("Flipped {} hit objects", flipped.len());
        ctx.emit(EditorEvent::HitObjectsFlipped(flipped));
        Ok(())
    }
}

impl Action for FlipHitObjectsHorizontally {
    fn kind(&self) -> ActionKind {
        ActionKind::FlipHitObjects
    }

    fn perform(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        self.flip(ctx)
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        self.flip(ctx)
    }
}

/// Shift hit objects in time and across lanes.
pub struct MoveHitObjects {
    targets: Vec<HitObjectId>,
    time_offset: i32,
    lane_offset: i32,
}

impl MoveHitObjects {
    /// Every target must exist and stay within the playfield after the move.
    pub fn new(
        chart: &ChartDocument,
        targets: Vec<HitObjectId>,
        time_offset: i32,
        lane_offset: i32,
    ) -> Result<Self, ChartError> {
        let mode = chart.mode();
        if time_offset == i32::MIN || lane_offset == i32::MIN {
            return Err(ChartError::InvalidOffset { time_offset, lane_offset });
        }
        for id in &targets {
            let object = chart.require_hit_object(*id)?;
            let lane = object.lane as i32 + lane_offset;
            if !mode.contains_lane(lane) {
                return Err(ChartError::InvalidLane {
                    lane,
                    key_count: mode.key_count(),
                });
            }
            let start_time = object.start_time + time_offset;
            if start_time < 0 {
                return Err(ChartError::NegativeTime(start_time));
            }
        }
        Ok(Self::new_unchecked(targets, time_offset, lane_offset))
    }

    pub fn new_unchecked(targets: Vec<HitObjectId>, time_offset: i32, lane_offset: i32) -> Self {
        Self {
            targets: dedup_ids(targets, ActionKind::MoveHitObjects),
            time_offset,
            lane_offset,
        }
    }

    /// Offsets that undo this move.
    fn inverse_offsets(&self) -> Result<(i32, i32), ChartError> {
        match (self.time_offset.checked_neg(), self.lane_offset.checked_neg()) {
            (Some(time_offset), Some(lane_offset)) => Ok((time_offset, lane_offset)),
            _ => Err(ChartError::InvalidOffset {
                time_offset: self.time_offset,
                lane_offset: self.lane_offset,
            }),
        }
    }

    fn shift(&self, ctx: &mut EditContext<'_>, time_offset: i32, lane_offset: i32) -> ActionResult {
        let cursor_time = ctx.cursor_time();
        let (moved, cursor_index) = {
            let mut objects = ctx.chart().hit_objects().lock();
            if let Some(missing) = self.targets.iter().find(|id| !objects.contains(**id)) {
                return Err(ChartError::HitObjectNotFound(*missing).into());
            }

            let mut moved = Vec::with_capacity(self.targets.len());
            for id in &self.targets {
                if let Some(object) = objects.get_mut(*id) {
                    object.start_time += time_offset;
                    if object.is_long_note() {
                        object.end_time += time_offset;
                    }
                    object.lane = (object.lane as i32 + lane_offset) as u8;
                    moved.push(object.clone());
                }
            }
            objects.sort();
            (moved, objects.index_at_time(cursor_time))
        };

        for object in &moved {
            ctx.refresh_proxy(object)?;
            ctx.refresh_sample(object)?;
        }
        ctx.force_recache()?;
        ctx.set_cursor_index(cursor_index)?;

        log::debug!("Moved {} hit objects by {}ms, {} lanes", moved.len(), time_offset, lane_offset);
        ctx.emit(EditorEvent::HitObjectsMoved {
            hit_objects: moved,
            time_offset,
            lane_offset,
        });
        Ok(())
    }
}

impl Action for MoveHitObjects {
    fn kind(&self) -> ActionKind {
        ActionKind::MoveHitObjects
    }

    fn perform(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        self.inverse_offsets()?;
        self.shift(ctx, self.time_offset, self.lane_offset)
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        let (time_offset, lane_offset) = self.inverse_offsets()?;
        self.shift(ctx, time_offset, lane_offset)
    }
}

/// Change the end time of a hit object. `0` turns a long note into a
/// normal note; a later end turns a normal note into a long note.
pub struct ResizeLongNote {
    target: HitObjectId,
    end_time: i32,
    previous_end_time: Option<i32>,
}

impl ResizeLongNote {
    pub fn new(chart: &ChartDocument, target: HitObjectId, end_time: i32) -> Result<Self, ChartError> {
        let object = chart.require_hit_object(target)?;
        validate_end_time(object.start_time, end_time)?;
        Ok(Self::new_unchecked(target, end_time))
    }

    pub fn new_unchecked(target: HitObjectId, end_time: i32) -> Self {
        Self {
            target,
            end_time,
            previous_end_time: None,
        }
    }

    fn set_end_time(&self, ctx: &mut EditContext<'_>, end_time: i32) -> Result<(HitObject, i32), ActionError> {
        let (resized, previous) = {
            let mut objects = ctx.chart().hit_objects().lock();
            let object = objects
                .get_mut(self.target)
                .ok_or(ChartError::HitObjectNotFound(self.target))?;
            let previous = object.end_time;
            object.end_time = end_time;
            (object.clone(), previous)
        };

        ctx.resize_long_note_proxy(&resized)?;
        ctx.refresh_sample(&resized)?;
        ctx.force_recache()?;

        ctx.emit(EditorEvent::LongNoteResized {
            hit_object: resized.clone(),
            previous_end_time: previous,
        });
        Ok((resized, previous))
    }
}

impl Action for ResizeLongNote {
    fn kind(&self) -> ActionKind {
        ActionKind::ResizeLongNote
    }

    fn perform(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        let (resized, previous) = self.set_end_time(ctx, self.end_time)?;
        log::debug!("Resized {} end {}ms -> {}ms", resized.id, previous, resized.end_time);
        self.previous_end_time = Some(previous);
        Ok(())
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        if let Some(previous) = self.previous_end_time {
            self.set_end_time(ctx, previous)?;
        }
        Ok(())
    }
}
