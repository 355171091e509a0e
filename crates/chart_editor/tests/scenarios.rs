//! End-to-end editing scenarios through `ChartEditor`.

use chart_core::{ChartDocument, GameMode, HitSounds};
use chart_editor::*;
use chart_event::EventChannel;

fn editor(mode: GameMode) -> ChartEditor {
    logging::init_for_tests();
    ChartEditor::new(ChartDocument::new(mode), EditorPreferences::default()).unwrap()
}

fn start_times(editor: &ChartEditor) -> Vec<i32> {
    editor.chart().hit_objects().lock().iter().map(|h| h.start_time).collect()
}

#[test]
fn test_place_then_undo() {
    let mut editor = editor(GameMode::Keys4);
    let note = editor.chart().create_hit_object(1000, 2);
    let place = PlaceHitObject::new(editor.chart(), note.clone()).unwrap();

    editor.perform(place).unwrap();
    let objects = editor.chart().hit_objects().snapshot();
    assert_eq!(objects.len(), 1);
    assert_eq!((objects[0].start_time, objects[0].lane), (1000, 2));
    assert_eq!(editor.visuals().active_count(), 1);

    assert!(editor.undo().unwrap());
    assert!(editor.chart().hit_objects().is_empty());
    assert_eq!(editor.visuals().active_count(), 0);
    assert_eq!(editor.density().sample_count(), 0);
}

#[test]
fn test_batch_place_sorts_then_undo() {
    let mut editor = editor(GameMode::Keys4);
    let notes: Vec<_> = [500, 100, 300]
        .iter()
        .map(|t| editor.chart().create_hit_object(*t, 1))
        .collect();

    editor.perform(BatchPlaceHitObjects::new(editor.chart(), notes).unwrap()).unwrap();
    assert_eq!(start_times(&editor), vec![100, 300, 500]);
    assert!(editor.chart().hit_objects().lock().iter().all(|h| h.lane == 1));

    editor.undo().unwrap();
    assert!(editor.chart().hit_objects().is_empty());
}

#[test]
fn test_flip_twice() {
    let mut editor = editor(GameMode::Keys4);
    let note = editor.chart().create_hit_object(0, 1);
    editor.perform(PlaceHitObject::new_unchecked(note.clone())).unwrap();

    editor.perform(FlipHitObjectsHorizontally::new(vec![note.id])).unwrap();
    assert_eq!(editor.chart().hit_objects().get(note.id).unwrap().lane, 4);
    assert_eq!(editor.visuals().get(note.id).unwrap().lane, 4);

    editor.perform(FlipHitObjectsHorizontally::new(vec![note.id])).unwrap();
    assert_eq!(editor.chart().hit_objects().get(note.id).unwrap().lane, 1);
}

#[test]
fn test_add_then_remove_clap() {
    let mut editor = editor(GameMode::Keys4);
    let note = editor.chart().create_hit_object(0, 1).with_hit_sounds(HitSounds::NORMAL);
    editor.perform(PlaceHitObject::new_unchecked(note.clone())).unwrap();

    editor.perform(AddHitsound::new(vec![note.id], HitSounds::CLAP)).unwrap();
    let sounds = editor.chart().hit_objects().get(note.id).unwrap().hit_sounds;
    assert_eq!(sounds, HitSounds::NORMAL | HitSounds::CLAP);
    assert_eq!(editor.selected_hitsounds().common, HitSounds::NORMAL | HitSounds::CLAP);

    editor.perform(RemoveHitsound::new(vec![note.id], HitSounds::CLAP)).unwrap();
    let sounds = editor.chart().hit_objects().get(note.id).unwrap().hit_sounds;
    assert_eq!(sounds, HitSounds::NORMAL);
    assert_eq!(editor.selected_hitsounds().common, HitSounds::NORMAL);
}

#[test]
fn test_timeline_observer_tracks_bookmarks() {
    let mut editor = editor(GameMode::Keys4);
    let channel = EventChannel::<EditorEvent>::new();
    let sender = channel.sender();
    editor.actions_mut().subscribe(move |event: &EditorEvent| match event {
        EditorEvent::BookmarkAdded(_) | EditorEvent::BookmarkRemoved(_) => {
            let _ = sender.send(event.clone());
        }
        _ => {}
    });

    editor.perform(AddBookmark::new(2000, Some("chorus".into()))).unwrap();
    let bookmark = editor.chart().bookmarks()[0].clone();
    editor.perform(RemoveBookmark::new(bookmark.id)).unwrap();
    editor.undo().unwrap();

    let events = channel.drain();
    assert_eq!(
        events,
        vec![
            EditorEvent::BookmarkAdded(bookmark.clone()),
            EditorEvent::BookmarkRemoved(bookmark.clone()),
            EditorEvent::BookmarkAdded(bookmark),
        ]
    );
}

#[test]
fn test_history_changed_events() {
    let mut editor = editor(GameMode::Keys4);
    let channel = EventChannel::<(bool, bool)>::new();
    let sender = channel.sender();
    editor.actions_mut().subscribe(move |event: &EditorEvent| {
        if let EditorEvent::HistoryChanged { can_undo, can_redo } = event {
            let _ = sender.send((*can_undo, *can_redo));
        }
    });

    editor.perform(AddBookmark::new(0, None)).unwrap();
    editor.undo().unwrap();
    editor.redo().unwrap();
    assert!(editor.undo().unwrap());

    assert_eq!(
        channel.drain(),
        vec![(true, false), (false, true), (true, false), (false, true)]
    );
}

#[test]
fn test_cursor_refreshed_after_structural_edits() {
    let mut editor = editor(GameMode::Keys4);
    editor.seek(250);
    let notes: Vec<_> = [100, 200, 300]
        .iter()
        .map(|t| editor.chart().create_hit_object(*t, 2))
        .collect();
    editor.perform(BatchPlaceHitObjects::new_unchecked(notes.clone())).unwrap();
    assert_eq!(editor.cursor().index(), 2);

    editor.perform(DeleteHitObject::new(notes[0].clone())).unwrap();
    assert_eq!(editor.cursor().index(), 1);

    editor.undo().unwrap();
    assert_eq!(editor.cursor().index(), 2);
}

#[test]
fn test_existing_chart_gets_proxies() {
    let chart = ChartDocument::new(GameMode::Keys7);
    {
        let mut objects = chart.hit_objects().lock();
        objects.push(chart.create_hit_object(100, 3));
        objects.push(chart.create_long_note(50, 400, 7));
        objects.sort();
    }
    let preferences = EditorPreferences {
        density_bin_ms: 100,
        ..EditorPreferences::default()
    };
    let editor = ChartEditor::new(chart, preferences).unwrap();

    assert_eq!(editor.visuals().active_count(), 2);
    assert_eq!(editor.density().bins(), &DensityBins::from([(0, 1), (1, 1)]));
}

#[test]
fn test_history_limit_from_preferences() {
    let preferences = EditorPreferences {
        max_history: 2,
        ..EditorPreferences::default()
    };
    let mut editor = ChartEditor::new(ChartDocument::new(GameMode::Keys4), preferences).unwrap();
    for time in [0, 100, 200] {
        editor.perform(AddBookmark::new(time, None)).unwrap();
    }
    assert_eq!(editor.actions().undo_count(), 2);

    while editor.undo().unwrap() {}
    assert_eq!(editor.chart().bookmarks().len(), 1);
}

#[test]
fn test_sampler_sees_whole_batches() {
    let mut editor = editor(GameMode::Keys4);
    let sampler = editor.spawn_density_sampler().unwrap();
    let notes: Vec<_> = (0..10).map(|i| editor.chart().create_hit_object(i * 90, 1)).collect();

    editor.perform(BatchPlaceHitObjects::new_unchecked(notes)).unwrap();
    for round in 0..20 {
        sampler.request();
        if round % 2 == 0 {
            editor.undo().unwrap();
        } else {
            editor.redo().unwrap();
        }
    }

    for _ in 0..20 {
        let bins = sampler.sample_blocking().unwrap();
        let total: u32 = bins.values().sum();
        assert!(total == 0 || total == 10, "partial batch observed: {:?}", bins);
    }
    assert_eq!(sampler.sample_blocking().unwrap(), DensityBins::from([(0, 10)]));
}

#[test]
fn test_re_adding_present_bookmark_is_rejected() {
    let mut editor = editor(GameMode::Keys4);
    editor.perform(AddBookmark::new(1000, Some("x".into()))).unwrap();
    let before = editor.chart().snapshot();
    let bookmark = before.bookmarks[0].clone();

    assert!(editor.perform(AddBookmark::restore(bookmark)).is_err());
    assert_eq!(editor.chart().snapshot(), before);
    assert_eq!(editor.actions().undo_count(), 1);

    // The only recorded step is the original add
    assert!(editor.undo().unwrap());
    assert!(editor.chart().bookmarks().is_empty());
    assert!(editor.redo().unwrap());
    assert_eq!(editor.chart().snapshot(), before);
}

#[test]
fn test_deferred_events_wait_for_frame() {
    let preferences = EditorPreferences {
        event_delivery: EventDelivery::Deferred,
        ..EditorPreferences::default()
    };
    let mut editor = ChartEditor::new(ChartDocument::new(GameMode::Keys4), preferences).unwrap();
    let channel = EventChannel::<EditorEvent>::new();
    let sender = channel.sender();
    editor.actions_mut().subscribe(move |event: &EditorEvent| {
        if !matches!(event, EditorEvent::HistoryChanged { .. }) {
            let _ = sender.send(event.clone());
        }
    });

    let notes: Vec<_> = [300, 100].iter().map(|t| editor.chart().create_hit_object(*t, 1)).collect();
    editor.perform(BatchPlaceHitObjects::new_unchecked(notes)).unwrap();
    editor.perform(AddBookmark::new(0, None)).unwrap();
    assert!(channel.is_empty());
    assert_eq!(editor.actions().pending_events(), 4);

    editor.process_events();
    let events = channel.drain();
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], EditorEvent::HitObjectsBatchPlaced(placed) if placed.len() == 2));
    assert!(matches!(events[1], EditorEvent::BookmarkAdded(_)));
}
