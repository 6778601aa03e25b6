//! Flow tests using EffectStoreTestHarness
//!
//! Each test drives the reducer the way the runtime does: dispatch a user
//! action, inspect the emitted effects, then feed back the completion
//! action an effect task would produce.

use tui_dispatch::testing::*;
use tui_dispatch::NumericComponentId;
use pokedex::{
    action::Action,
    api,
    components::{Component, DetailScreen, DetailScreenProps, ListScreen, ListScreenProps},
    effect::Effect,
    error::FetchError,
    reducer::reducer,
    sprite::Artwork,
    state::{
        AppState, BaseStat, FlavorTextEntry, ListPage, PokemonDetail, PokemonSummary,
        PokemonType, SpeciesInfo,
    },
    theme::Theme,
};

fn summary(id: u16, name: &str) -> PokemonSummary {
    PokemonSummary {
        id,
        name: name.into(),
        sprite_uri: api::artwork_uri(id),
    }
}

fn mock_detail(id: u16, name: &str) -> PokemonDetail {
    PokemonDetail {
        id,
        name: name.into(),
        types: vec![PokemonType {
            slot: 1,
            name: "electric".into(),
        }],
        stats: vec![
            BaseStat {
                name: "hp".into(),
                value: 35,
            },
            BaseStat {
                name: "attack".into(),
                value: 55,
            },
        ],
        height: 4,
        weight: 60,
        moves: vec!["thunder-shock".into()],
        cry_uri: Some(format!("https://example.test/cries/{id}.ogg")),
    }
}

fn mock_species() -> SpeciesInfo {
    SpeciesInfo {
        flavor_text_entries: vec![FlavorTextEntry {
            language: "en".into(),
            text: "Stores electricity in its cheeks.".into(),
        }],
    }
}

fn quiet_state() -> AppState {
    let mut state = AppState::default();
    state.settings.artwork_enabled = false;
    state
}

// ============================================================================
// List flows
// ============================================================================

#[test]
fn test_list_fetch_flow() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.assert_state(|s| s.list.loading);

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadListPage { offset: 0, .. }));

    harness.complete_action(Action::ListDidLoad(ListPage {
        offset: 0,
        entries: vec![summary(1, "bulbasaur"), summary(2, "ivysaur")],
        next_offset: Some(2),
    }));
    let (changed, total) = harness.process_emitted();

    assert_eq!(total, 1);
    assert_eq!(changed, 1);
    harness.assert_state(|s| !s.list.loading);
    harness.assert_state(|s| s.list.entries.len() == 2);
}

#[test]
fn test_list_error_then_retry() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.drain_effects();
    harness.complete_action(Action::ListDidError(FetchError::Status {
        status: 500,
        url: "https://example.test/pokemon".into(),
    }));
    harness.process_emitted();
    harness.assert_state(|s| s.list.error.is_some());

    harness.dispatch_collect(Action::Init);
    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| matches!(e, Effect::LoadListPage { offset: 0, .. }));
}

#[test]
fn test_scrolling_to_bottom_requests_next_page() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.complete_action(Action::ListDidLoad(ListPage {
        offset: 0,
        entries: vec![summary(1, "bulbasaur"), summary(2, "ivysaur")],
        next_offset: Some(2),
    }));
    harness.process_emitted();

    harness.dispatch_collect(Action::ListSelect(1));
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadListPage { offset: 2, .. }));
}

// ============================================================================
// Detail flows
// ============================================================================

#[test]
fn test_detail_open_flow() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::DetailOpen(25));
    harness.assert_state(|s| s.detail.detail.is_loading());
    harness.assert_state(|s| s.detail.species.is_loading());

    let effects = harness.drain_effects();
    effects.effects_count(3);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadDetail { id: 25 }));
    effects.effects_all_match(|e| {
        matches!(
            e,
            Effect::LoadDetail { .. } | Effect::LoadSpecies { .. } | Effect::LoadArtwork { .. }
        )
    });

    harness.complete_action(Action::DetailDidLoad(mock_detail(25, "pikachu")));
    harness.complete_action(Action::SpeciesDidLoad {
        id: 25,
        species: mock_species(),
    });
    let (changed, total) = harness.process_emitted();

    assert_eq!((changed, total), (2, 2));
    harness.assert_state(|s| s.detail.is_ready());
    harness.assert_state(|s| {
        s.detail.flavor_text().as_deref() == Some("Stores electricity in its cheeks.")
    });
}

#[test]
fn test_stale_detail_is_dropped() {
    let mut harness = EffectStoreTestHarness::new(quiet_state(), reducer);

    harness.dispatch_collect(Action::DetailOpen(25));
    harness.dispatch_collect(Action::DetailNext);
    harness.drain_effects();

    harness.complete_action(Action::DetailDidLoad(mock_detail(25, "pikachu")));
    let (changed, total) = harness.process_emitted();

    assert_eq!((changed, total), (0, 1));
    harness.assert_state(|s| s.detail.current_id() == 26);
    harness.assert_state(|s| s.detail.detail.is_loading());
}

#[test]
fn test_detail_error_keeps_navigation() {
    let mut harness = EffectStoreTestHarness::new(quiet_state(), reducer);

    harness.dispatch_collect(Action::DetailOpen(3));
    harness.complete_action(Action::DetailDidError {
        id: 3,
        error: FetchError::NotFound("https://example.test/pokemon/3".into()),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.detail.detail.is_failed());
    harness.assert_state(|s| s.detail.error().is_some_and(|e| e.contains("not found")));

    harness.dispatch_collect(Action::DetailNext);
    harness.assert_state(|s| s.detail.current_id() == 4);
    harness.assert_state(|s| s.detail.error().is_none());
}

#[test]
fn test_shiny_toggle_fetches_each_artwork_once() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::DetailOpen(6));
    harness.drain_effects();
    harness.complete_action(Action::ArtworkDidLoad {
        uri: api::artwork_uri(6),
        artwork: Artwork {
            payload: "AAAA".into(),
            width: 1,
            height: 1,
        },
    });
    harness.process_emitted();

    harness.dispatch_collect(Action::ShinyToggle);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(
        |e| matches!(e, Effect::LoadArtwork { uri } if *uri == api::shiny_artwork_uri(6)),
    );

    harness.dispatch_collect(Action::ShinyToggle);
    harness.drain_effects().effects_empty();
    harness.assert_state(|s| !s.detail.shiny);
}

#[test]
fn test_cry_flow() {
    let mut harness = EffectStoreTestHarness::new(quiet_state(), reducer);

    harness.dispatch_collect(Action::DetailOpen(25));
    harness.complete_action(Action::DetailDidLoad(mock_detail(25, "pikachu")));
    harness.process_emitted();
    harness.drain_effects();

    harness.dispatch_collect(Action::PlayCry);
    harness.assert_state(|s| s.detail.cry_playing);
    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| matches!(e, Effect::PlayCry { uri } if uri.ends_with("25.ogg")));

    harness.complete_action(Action::CryDidFinish);
    harness.process_emitted();
    harness.assert_state(|s| !s.detail.cry_playing);
}

#[test]
fn test_stat_bars_settle_after_ticks() {
    let mut harness = EffectStoreTestHarness::new(quiet_state(), reducer);

    harness.dispatch_collect(Action::DetailOpen(25));
    harness.complete_action(Action::DetailDidLoad(mock_detail(25, "pikachu")));
    harness.process_emitted();
    harness.assert_state(|s| s.detail.is_animating());

    for _ in 0..2_000 {
        harness.dispatch_collect(Action::Tick);
    }

    harness.assert_state(|s| !s.detail.is_animating());
    harness.assert_state(|s| {
        s.detail
            .stat_bars
            .iter()
            .map(|bar| bar.rendered())
            .collect::<Vec<_>>()
            == vec![35, 55]
    });
}

// ============================================================================
// Component + Store Integration
// ============================================================================

#[test]
fn test_enter_opens_selected_entry() {
    let mut harness = EffectStoreTestHarness::new(quiet_state(), reducer);
    harness.complete_action(Action::ListDidLoad(ListPage {
        offset: 0,
        entries: vec![summary(1, "bulbasaur"), summary(4, "charmander")],
        next_offset: None,
    }));
    harness.process_emitted();
    harness.dispatch_collect(Action::ListSelect(1));

    let mut screen = ListScreen::new();
    let theme = Theme::default();
    let actions = harness.send_keys::<NumericComponentId, _, _>("enter", |state, event| {
        let props = ListScreenProps {
            state,
            theme: &theme,
            is_focused: true,
        };
        screen
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });
    for action in actions {
        harness.dispatch_collect(action);
    }

    harness.assert_state(|s| s.is_detail());
    harness.assert_state(|s| s.detail.current_id() == 4);
}

#[test]
fn test_down_on_single_entry_page_fetches_next_page() {
    let mut harness = EffectStoreTestHarness::new(quiet_state(), reducer);
    harness.complete_action(Action::ListDidLoad(ListPage {
        offset: 0,
        entries: vec![summary(1, "bulbasaur")],
        next_offset: Some(1),
    }));
    harness.process_emitted();

    let mut screen = ListScreen::new();
    let theme = Theme::default();
    let actions = harness.send_keys::<NumericComponentId, _, _>("j", |state, event| {
        let props = ListScreenProps {
            state,
            theme: &theme,
            is_focused: true,
        };
        screen
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });
    for action in actions {
        harness.dispatch_collect(action);
    }

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadListPage { offset: 1, .. }));
    harness.assert_state(|s| s.list.loading);
}

#[test]
fn test_arrow_keys_walk_the_dex() {
    let mut harness = EffectStoreTestHarness::new(quiet_state(), reducer);
    harness.dispatch_collect(Action::DetailOpen(1));

    let mut screen = DetailScreen::new();
    let theme = Theme::default();
    let actions = harness.send_keys::<NumericComponentId, _, _>("h l l", |state, event| {
        let props = DetailScreenProps {
            state,
            theme: &theme,
            is_focused: true,
        };
        screen
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });
    for action in actions {
        harness.dispatch_collect(action);
    }

    harness.assert_state(|s| s.detail.current_id() == 3);
}

// ============================================================================
// Render with Harness
// ============================================================================

#[test]
fn test_render_loaded_detail() {
    let mut harness = EffectStoreTestHarness::new(quiet_state(), reducer);
    harness.dispatch_collect(Action::DetailOpen(25));
    harness.complete_action(Action::DetailDidLoad(mock_detail(25, "pikachu")));
    harness.process_emitted();

    let mut screen = DetailScreen::new();
    let theme = Theme::default();
    let output = harness.render_plain(80, 30, |frame, area, state| {
        let props = DetailScreenProps {
            state,
            theme: &theme,
            is_focused: true,
        };
        screen.render(frame, area, props);
    });

    assert!(output.contains("Pikachu"), "name missing:\n{output}");
    assert!(output.contains("#025"), "id missing:\n{output}");
    assert!(output.contains("ELECTRIC"), "type badge missing:\n{output}");
}
