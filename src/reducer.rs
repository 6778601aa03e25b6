use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::api;
use crate::effect::Effect;
use crate::stat_bar;
use crate::state::{AppState, Navigation, Screen, SortKey, TICK_MS};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.message = None;
            let mut effects = Vec::new();
            if let Some(effect) = load_list_page(state, 0) {
                effects.push(effect);
            }
            if state.is_detail() {
                let id = state.detail.current_id();
                effects.extend(open_detail(state, id));
            }
            DispatchResult::changed_with_many(effects)
        }

        // ===== List =====
        Action::ListDidLoad(page) => {
            state.list.loading = false;
            state.list.error = None;
            state.list.append_page(page);
            DispatchResult::changed()
        }

        Action::ListDidError(error) => {
            state.list.loading = false;
            state.list.error = Some(error.to_string());
            state.message = Some(format!("List error: {error}"));
            DispatchResult::changed()
        }

        Action::ListLoadMore => match state.list.next_offset {
            Some(offset) if state.list.can_load_more() => match load_list_page(state, offset) {
                Some(effect) => DispatchResult::changed_with(effect),
                None => DispatchResult::unchanged(),
            },
            _ => DispatchResult::unchanged(),
        },

        Action::ListSelect(index) => {
            let len = state.list.visible().len();
            if len == 0 {
                return DispatchResult::unchanged();
            }
            let index = index.min(len - 1);
            let moved = index != state.list.selected;
            state.list.selected = index;
            // Also fires when already on the last entry, which retries a failed page.
            let next_page = match state.list.next_offset {
                Some(offset) if index + 1 == len && state.list.can_load_more() => {
                    load_list_page(state, offset)
                }
                _ => None,
            };
            match next_page {
                Some(effect) => DispatchResult::changed_with(effect),
                None if moved => DispatchResult::changed(),
                None => DispatchResult::unchanged(),
            }
        }

        Action::ListOpenSelected => {
            let Some(id) = state.list.selected_entry().map(|entry| entry.id) else {
                return DispatchResult::unchanged();
            };
            enter_detail(state, id)
        }

        // ===== Search =====
        Action::SearchFocus => {
            if state.list.search_focused {
                return DispatchResult::unchanged();
            }
            state.list.search_focused = true;
            state.list.sort_menu = None;
            DispatchResult::changed()
        }

        Action::SearchBlur => {
            if !state.list.search_focused {
                return DispatchResult::unchanged();
            }
            state.list.search_focused = false;
            DispatchResult::changed()
        }

        Action::SearchChange(query) => {
            if state.list.search_query == query {
                return DispatchResult::unchanged();
            }
            state.list.search_query = query;
            state.list.selected = 0;
            DispatchResult::changed()
        }

        // ===== Sort =====
        Action::SortOpen => {
            if state.list.sort_menu.is_some() {
                return DispatchResult::unchanged();
            }
            state.list.sort_menu = Some(state.list.sort.index());
            state.list.search_focused = false;
            DispatchResult::changed()
        }

        Action::SortClose => {
            if state.list.sort_menu.take().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::SortCursor(index) => {
            let Some(cursor) = state.list.sort_menu else {
                return DispatchResult::unchanged();
            };
            let index = index.min(SortKey::ALL.len() - 1);
            if cursor == index {
                return DispatchResult::unchanged();
            }
            state.list.sort_menu = Some(index);
            DispatchResult::changed()
        }

        Action::SortSet(key) => {
            state.list.sort_menu = None;
            if state.list.sort != key {
                state.list.sort = key;
                state.list.selected = 0;
            }
            DispatchResult::changed()
        }

        // ===== Detail =====
        Action::DetailOpen(id) => enter_detail(state, id),

        Action::DetailClose => {
            if !state.is_detail() {
                return DispatchResult::unchanged();
            }
            state.screen = Screen::List;
            state.detail.detail = DataResource::Empty;
            state.detail.species = DataResource::Empty;
            state.detail.artwork.clear();
            state.detail.artwork_loading = false;
            state.detail.cry_playing = false;
            state.detail.shiny = false;
            state.message = None;
            DispatchResult::changed_with(Effect::CancelDetailTasks)
        }

        Action::DetailPrev => {
            if !state.is_detail() || !state.detail.nav.go_to_previous() {
                return DispatchResult::unchanged();
            }
            let id = state.detail.current_id();
            DispatchResult::changed_with_many(open_detail(state, id))
        }

        Action::DetailNext => {
            if !state.is_detail() || !state.detail.nav.go_to_next() {
                return DispatchResult::unchanged();
            }
            let id = state.detail.current_id();
            DispatchResult::changed_with_many(open_detail(state, id))
        }

        Action::DetailDidLoad(detail) => {
            if !is_current(state, detail.id) {
                return DispatchResult::unchanged();
            }
            let stats: Vec<(String, u8)> = detail
                .stats
                .iter()
                .map(|stat| (stat.name.clone(), stat.value))
                .collect();
            if stats.is_empty() {
                stat_bar::retarget_bars(&mut state.detail.stat_bars, &placeholder_stats());
            } else {
                stat_bar::retarget_bars(&mut state.detail.stat_bars, &stats);
            }
            state.detail.detail = DataResource::Loaded(detail);
            DispatchResult::changed()
        }

        Action::DetailDidError { id, error } => {
            if !is_current(state, id) {
                return DispatchResult::unchanged();
            }
            state.detail.detail = DataResource::Failed(error.to_string());
            DispatchResult::changed()
        }

        Action::SpeciesDidLoad { id, species } => {
            if !is_current(state, id) {
                return DispatchResult::unchanged();
            }
            state.detail.species = DataResource::Loaded(species);
            DispatchResult::changed()
        }

        Action::SpeciesDidError { id, error } => {
            if !is_current(state, id) {
                return DispatchResult::unchanged();
            }
            state.detail.species = DataResource::Failed(error.to_string());
            DispatchResult::changed()
        }

        Action::ShinyToggle => {
            let shiny = !state.detail.shiny;
            set_shiny(state, shiny)
        }

        Action::ArtworkDidLoad { uri, artwork } => {
            if !state.is_detail() {
                return DispatchResult::unchanged();
            }
            let id = state.detail.current_id();
            if !is_artwork_for(&uri, id) {
                return DispatchResult::unchanged();
            }
            if uri == state.detail.artwork_uri() {
                state.detail.artwork_loading = false;
            }
            state.detail.artwork.insert(uri, artwork);
            DispatchResult::changed()
        }

        Action::ArtworkDidError { uri, error: _ } => {
            if !state.is_detail() || uri != state.detail.artwork_uri() {
                return DispatchResult::unchanged();
            }
            state.detail.artwork_loading = false;
            DispatchResult::changed()
        }

        Action::PlayCry => {
            if !state.is_detail() || !state.settings.sound_enabled {
                return DispatchResult::unchanged();
            }
            let Some(uri) = state.detail.cry_uri().map(str::to_string) else {
                return DispatchResult::unchanged();
            };
            state.detail.cry_playing = true;
            DispatchResult::changed_with(Effect::PlayCry { uri })
        }

        Action::CryDidFinish | Action::CryDidError(_) => {
            if !state.detail.cry_playing {
                return DispatchResult::unchanged();
            }
            state.detail.cry_playing = false;
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Render => DispatchResult::changed(),

        Action::Tick => tick_animation(state),

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn load_list_page(state: &mut AppState, offset: u32) -> Option<Effect> {
    if state.list.loading {
        return None;
    }
    state.list.loading = true;
    Some(Effect::LoadListPage {
        offset,
        limit: state.settings.page_size,
    })
}

fn enter_detail(state: &mut AppState, id: u16) -> DispatchResult<Effect> {
    state.screen = Screen::Detail;
    state.list.search_focused = false;
    state.list.sort_menu = None;
    state.detail.stat_bars = stat_bar::placeholder_bars();
    DispatchResult::changed_with_many(open_detail(state, id))
}

/// Point the detail screen at `id` and request everything it shows.
/// Stat bars are kept so the next load animates from the current values.
fn open_detail(state: &mut AppState, id: u16) -> Vec<Effect> {
    let nav = Navigation::new(id);
    let id = nav.current_id();
    state.detail.nav = nav;
    state.detail.shiny = false;
    state.detail.detail = DataResource::Loading;
    state.detail.species = DataResource::Loading;
    state.detail.cry_playing = false;
    state.detail.artwork.retain(|uri, _| is_artwork_for(uri, id));
    state.message = None;

    let mut effects = vec![Effect::LoadDetail { id }, Effect::LoadSpecies { id }];
    effects.extend(artwork_effect(state));
    effects
}

/// Only the shown Pokémon's two artworks are cached.
fn is_artwork_for(uri: &str, id: u16) -> bool {
    uri == api::artwork_uri(id) || uri == api::shiny_artwork_uri(id)
}

fn artwork_effect(state: &mut AppState) -> Option<Effect> {
    if !state.settings.artwork_enabled {
        return None;
    }
    let uri = state.detail.artwork_uri();
    if state.detail.artwork.contains_key(&uri) {
        state.detail.artwork_loading = false;
        return None;
    }
    state.detail.artwork_loading = true;
    Some(Effect::LoadArtwork { uri })
}

fn set_shiny(state: &mut AppState, shiny: bool) -> DispatchResult<Effect> {
    if !state.is_detail() || state.detail.shiny == shiny {
        return DispatchResult::unchanged();
    }
    state.detail.shiny = shiny;
    match artwork_effect(state) {
        Some(effect) => DispatchResult::changed_with(effect),
        None => DispatchResult::changed(),
    }
}

fn is_current(state: &AppState, id: u16) -> bool {
    state.is_detail() && state.detail.current_id() == id
}

fn placeholder_stats() -> Vec<(String, u8)> {
    stat_bar::PLACEHOLDER_STATS
        .iter()
        .map(|name| (name.to_string(), stat_bar::PLACEHOLDER_VALUE))
        .collect()
}

fn tick_animation(state: &mut AppState) -> DispatchResult<Effect> {
    if !state.is_detail() || !state.detail.is_animating() {
        return DispatchResult::unchanged();
    }
    let dt = TICK_MS as f32 / 1000.0;
    for bar in &mut state.detail.stat_bars {
        bar.spring.step(dt);
    }
    DispatchResult::changed()
}
