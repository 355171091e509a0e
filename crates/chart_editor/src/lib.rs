//! Chart Edit Engine
//!
//! Reversible editing of rhythm-game charts inside a map editor.
//!
//! ## Features
//!
//! - **Actions**: place, delete, batch place/delete, flip, move, resize,
//!   hitsound and bookmark edits, each with an exact inverse
//! - **Undo/Redo**: linear history with a size limit and a save point
//! - **Derived views**: note proxies, note density and the playback cursor
//!   are updated by every action that affects them
//! - **Events**: observers subscribe to structural events instead of
//!   being called by the engine
//!
//! ## Architecture
//!
//! ```text
//! ActionManager → Action → ChartDocument (+ VisualPool, DensityCache, PlaybackCursor)
//!       ↓
//!  EditorEvent → observers
//! ```
//!
//! The hit object list is shared with background readers and is only
//! mutated under its lock.

pub mod actions;
pub mod core;
pub mod events;
pub mod integration;
pub mod logging;

// Re-export commonly used types
pub use crate::core::{
    ActionManager,
    ChartEditor,
    EditContext,
    EditorPreferences,
    EventDelivery,
    PreferencesError,
    SelectedHitsounds,
    UndoHistory,
};

pub use actions::{
    Action,
    ActionError,
    ActionKind,
    ActionResult,
    AddBookmark,
    AddHitsound,
    BatchDeleteHitObjects,
    BatchPlaceHitObjects,
    DeleteHitObject,
    EditBookmark,
    FlipHitObjectsHorizontally,
    MoveHitObjects,
    PlaceHitObject,
    RemoveBookmark,
    RemoveHitsound,
    ResizeLongNote,
};

pub use events::EditorEvent;

pub use integration::{
    CollaboratorError,
    DensityBins,
    DensityCache,
    DensitySampler,
    NoteDensityCache,
    PlaybackCursor,
    ProxyPool,
    SnapCursor,
    VisualPool,
};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
