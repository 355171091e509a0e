//! Hitsound flag edits.
//!
//! Hitsounds affect neither timing nor layout, so these actions do no
//! sorting and never touch the visual pool or the density cache.

use chart_core::{ChartError, HitObjectId, HitSounds};

use super::{dedup_ids, Action, ActionError, ActionKind, ActionResult};
use crate::core::EditContext;
use crate::events::EditorEvent;

/// Per-object bits to set or clear.
type HitsoundEdit = (HitObjectId, HitSounds);

/// Apply `edits` and return the bits that actually changed per object.
fn apply_hitsounds(
    ctx: &mut EditContext<'_>,
    edits: &[HitsoundEdit],
    add: bool,
) -> Result<Vec<HitsoundEdit>, ActionError> {
    let changed = {
        let mut objects = ctx.chart().hit_objects().lock();
        if let Some((missing, _)) = edits.iter().find(|(id, _)| !objects.contains(*id)) {
            return Err(ChartError::HitObjectNotFound(*missing).into());
        }

        let mut changed = Vec::with_capacity(edits.len());
        for (id, sound) in edits {
            if let Some(object) = objects.get_mut(*id) {
                let delta = if add {
                    HitSounds::from_bits(sound.bits() & !object.hit_sounds.bits())
                } else {
                    object.hit_sounds & *sound
                };
                if delta.is_empty() {
                    continue;
                }
                if add {
                    object.hit_sounds.insert(delta);
                } else {
                    object.hit_sounds.remove(delta);
                }
                changed.push((*id, delta));
            }
        }
        changed
    };

    let targets: Vec<_> = edits.iter().map(|(id, _)| *id).collect();
    ctx.refresh_selected_hitsounds(&targets);
    Ok(changed)
}

fn union(edits: &[HitsoundEdit]) -> HitSounds {
    edits.iter().fold(HitSounds::NONE, |acc, (_, sound)| acc | *sound)
}

/// Set a hitsound on every target.
///
/// Undo clears only the bits this action set, so objects that already had
/// the sound keep it.
pub struct AddHitsound {
    edits: Vec<HitsoundEdit>,
    sound: HitSounds,
    changed: Vec<HitsoundEdit>,
}

impl AddHitsound {
    pub fn new(targets: Vec<HitObjectId>, sound: HitSounds) -> Self {
        let edits = dedup_ids(targets, ActionKind::AddHitsound)
            .into_iter()
            .map(|id| (id, sound))
            .collect();
        Self::from_edits(edits)
    }

    fn from_edits(edits: Vec<HitsoundEdit>) -> Self {
        Self {
            sound: union(&edits),
            edits,
            changed: Vec::new(),
        }
    }

    pub fn sound(&self) -> HitSounds {
        self.sound
    }
}

impl Action for AddHitsound {
    fn kind(&self) -> ActionKind {
        ActionKind::AddHitsound
    }

    fn perform(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        let changed = apply_hitsounds(ctx, &self.edits, true)?;
        log::debug!("Added {} to {} hit objects", self.sound, changed.len());
        ctx.emit(EditorEvent::HitsoundAdded {
            hit_objects: changed.iter().map(|(id, _)| *id).collect(),
            sound: self.sound,
        });
        self.changed = changed;
        Ok(())
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        RemoveHitsound::from_edits(self.changed.clone()).perform(ctx)
    }
}

/// Clear a hitsound on every target.
pub struct RemoveHitsound {
    edits: Vec<HitsoundEdit>,
    sound: HitSounds,
    changed: Vec<HitsoundEdit>,
}

impl RemoveHitsound {
    pub fn new(targets: Vec<HitObjectId>, sound: HitSounds) -> Self {
        let edits = dedup_ids(targets, ActionKind::RemoveHitsound)
            .into_iter()
            .map(|id| (id, sound))
            .collect();
        Self::from_edits(edits)
    }

    fn from_edits(edits: Vec<HitsoundEdit>) -> Self {
        Self {
            sound: union(&edits),
            edits,
            changed: Vec::new(),
        }
    }

    pub fn sound(&self) -> HitSounds {
        self.sound
    }
}

impl Action for RemoveHitsound {
    fn kind(&self) -> ActionKind {
        ActionKind::RemoveHitsound
    }

    fn perform(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        let changed = apply_hitsounds(ctx, &self.edits, false)?;
        log::debug!("Removed {} from {} hit objects", self.sound, changed.len());
        ctx.emit(EditorEvent::HitsoundRemoved {
            hit_objects: changed.iter().map(|(id, _)| *id).collect(),
            sound: self.sound,
        });
        self.changed = changed;
        Ok(())
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        AddHitsound::from_edits(self.changed.clone()).perform(ctx)
    }
}
