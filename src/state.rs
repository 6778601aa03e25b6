//! Application state - single source of truth

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::api;
use crate::config::Config;
use crate::sprite::Artwork;
use crate::stat_bar::{self, StatBar};

pub const MIN_POKEMON_ID: u16 = 1;
pub const MAX_POKEMON_ID: u16 = 1025;

/// Animation tick for stat bars.
pub const TICK_MS: u64 = 16;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonSummary {
    pub id: u16,
    pub name: String,
    pub sprite_uri: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonType {
    pub slot: u8,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BaseStat {
    pub name: String,
    pub value: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonDetail {
    pub id: u16,
    pub name: String,
    pub types: Vec<PokemonType>,
    pub stats: Vec<BaseStat>,
    /// Decimetres.
    pub height: u16,
    /// Hectograms.
    pub weight: u16,
    pub moves: Vec<String>,
    pub cry_uri: Option<String>,
}

impl PokemonDetail {
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|ty| ty.name.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FlavorTextEntry {
    pub language: String,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeciesInfo {
    pub flavor_text_entries: Vec<FlavorTextEntry>,
}

impl SpeciesInfo {
    /// First English entry with line breaks turned into sentence breaks.
    pub fn english_flavor_text(&self) -> Option<String> {
        self.flavor_text_entries
            .iter()
            .find(|entry| entry.language == "en")
            .map(|entry| entry.text.replace('\n', ". ").replace('\u{000C}', " "))
    }
}

/// One page of the `/pokemon` listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ListPage {
    pub offset: u32,
    pub entries: Vec<PokemonSummary>,
    pub next_offset: Option<u32>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SortKey {
    #[default]
    ById,
    ByName,
}

impl SortKey {
    pub const ALL: [SortKey; 2] = [SortKey::ById, SortKey::ByName];

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::ById => "Number",
            SortKey::ByName => "Name",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            SortKey::ById => 0,
            SortKey::ByName => 1,
        }
    }
}

/// Current detail id, saturating at `[MIN_POKEMON_ID, MAX_POKEMON_ID]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Navigation {
    current_id: u16,
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new(MIN_POKEMON_ID)
    }
}

impl Navigation {
    pub fn new(id: u16) -> Self {
        Self {
            current_id: id.clamp(MIN_POKEMON_ID, MAX_POKEMON_ID),
        }
    }

    pub fn current_id(&self) -> u16 {
        self.current_id
    }

    pub fn previous_id(&self) -> u16 {
        self.current_id.saturating_sub(1).max(MIN_POKEMON_ID)
    }

    pub fn next_id(&self) -> u16 {
        self.current_id.saturating_add(1).min(MAX_POKEMON_ID)
    }

    pub fn has_previous(&self) -> bool {
        self.current_id > MIN_POKEMON_ID
    }

    pub fn has_next(&self) -> bool {
        self.current_id < MAX_POKEMON_ID
    }

    /// Step back one id. Returns false at the floor.
    pub fn go_to_previous(&mut self) -> bool {
        let previous = self.previous_id();
        let moved = previous != self.current_id;
        self.current_id = previous;
        moved
    }

    /// Step forward one id. Returns false at the ceiling.
    pub fn go_to_next(&mut self) -> bool {
        let next = self.next_id();
        let moved = next != self.current_id;
        self.current_id = next;
        moved
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Screen {
    #[default]
    List,
    Detail,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ListState {
    pub entries: Vec<PokemonSummary>,
    pub next_offset: Option<u32>,
    pub loading: bool,
    pub error: Option<String>,
    /// Index into [`ListState::visible`].
    pub selected: usize,
    pub search_query: String,
    pub search_focused: bool,
    pub sort: SortKey,
    /// Cursor of the open sort menu; `None` when closed.
    pub sort_menu: Option<usize>,
}

impl ListState {
    /// Entries matching the search query, in sort order.
    pub fn visible(&self) -> Vec<&PokemonSummary> {
        let query = self.search_query.trim().to_lowercase();
        let mut visible: Vec<&PokemonSummary> = self
            .entries
            .iter()
            .filter(|entry| matches_query(entry, &query))
            .collect();
        match self.sort {
            SortKey::ById => visible.sort_by_key(|entry| entry.id),
            SortKey::ByName => visible.sort_by(|a, b| a.name.cmp(&b.name)),
        }
        visible
    }

    pub fn selected_entry(&self) -> Option<&PokemonSummary> {
        self.visible().get(self.selected).copied()
    }

    /// Merge a page, skipping ids already present.
    pub fn append_page(&mut self, page: ListPage) {
        for entry in page.entries {
            if !self.entries.iter().any(|existing| existing.id == entry.id) {
                self.entries.push(entry);
            }
        }
        self.next_offset = page.next_offset;
    }

    pub fn can_load_more(&self) -> bool {
        !self.loading && self.next_offset.is_some()
    }
}

/// Name contains the query, or the id spelled out equals it.
pub fn matches_query(entry: &PokemonSummary, query: &str) -> bool {
    query.is_empty() || entry.name.contains(query) || entry.id.to_string() == query
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct DetailState {
    pub nav: Navigation,
    pub shiny: bool,
    pub detail: DataResource<PokemonDetail>,
    pub species: DataResource<SpeciesInfo>,
    pub stat_bars: Vec<StatBar>,
    /// Decoded artwork keyed by URI; dropped when the screen closes.
    pub artwork: HashMap<String, Artwork>,
    pub artwork_loading: bool,
    pub cry_playing: bool,
}

impl Default for DetailState {
    fn default() -> Self {
        Self {
            nav: Navigation::default(),
            shiny: false,
            detail: DataResource::Empty,
            species: DataResource::Empty,
            stat_bars: stat_bar::placeholder_bars(),
            artwork: HashMap::new(),
            artwork_loading: false,
            cry_playing: false,
        }
    }
}

impl DetailState {
    pub fn current_id(&self) -> u16 {
        self.nav.current_id()
    }

    /// Both URIs derive from the id, so toggling never refetches data.
    pub fn artwork_uri(&self) -> String {
        if self.shiny {
            api::shiny_artwork_uri(self.current_id())
        } else {
            api::artwork_uri(self.current_id())
        }
    }

    pub fn current_artwork(&self) -> Option<&Artwork> {
        self.artwork.get(&self.artwork_uri())
    }

    pub fn flavor_text(&self) -> Option<String> {
        self.species.data().and_then(SpeciesInfo::english_flavor_text)
    }

    pub fn cry_uri(&self) -> Option<&str> {
        self.detail.data().and_then(|detail| detail.cry_uri.as_deref())
    }

    pub fn is_animating(&self) -> bool {
        self.stat_bars.iter().any(StatBar::is_animating)
    }

    /// Ready to render real data (as opposed to placeholders).
    pub fn is_ready(&self) -> bool {
        self.detail.is_loaded()
    }

    /// First failure among the two resources, if any.
    pub fn error(&self) -> Option<&str> {
        failure(&self.detail).or_else(|| failure(&self.species))
    }
}

fn failure<T>(resource: &DataResource<T>) -> Option<&str> {
    match resource {
        DataResource::Failed(error) => Some(error.as_str()),
        _ => None,
    }
}

/// Runtime switches copied from [`Config`] so the reducer can see them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Settings {
    pub page_size: u32,
    pub artwork_enabled: bool,
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: crate::config::DEFAULT_PAGE_SIZE,
            artwork_enabled: true,
            sound_enabled: true,
        }
    }
}

#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    #[debug(section = "App", label = "Screen", debug_fmt)]
    pub screen: Screen,

    #[debug(section = "App", label = "Terminal", debug_fmt)]
    pub terminal_size: (u16, u16),

    #[debug(section = "App", label = "Message", debug_fmt)]
    pub message: Option<String>,

    #[debug(skip)]
    pub settings: Settings,

    #[debug(skip)]
    pub list: ListState,

    #[debug(skip)]
    pub detail: DetailState,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            screen: Screen::List,
            terminal_size: (80, 24),
            message: None,
            settings: Settings::default(),
            list: ListState::default(),
            detail: DetailState::default(),
        }
    }
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let mut state = Self {
            settings: Settings {
                page_size: config.page_size,
                artwork_enabled: config.artwork,
                sound_enabled: config.sound,
            },
            ..Self::default()
        };
        if let Some(id) = config.start_id {
            state.screen = Screen::Detail;
            state.detail.nav = Navigation::new(id);
        }
        state
    }

    pub fn is_detail(&self) -> bool {
        self.screen == Screen::Detail
    }
}
