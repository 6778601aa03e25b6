use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::sprite::Artwork;
use crate::state::{ListPage, PokemonDetail, SortKey, SpeciesInfo};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    Init,

    // ===== List screen =====
    ListDidLoad(ListPage),
    ListDidError(FetchError),
    /// Fetch the next page when one exists and none is in flight
    ListLoadMore,
    ListSelect(usize),
    /// Open the detail screen for the selected entry
    ListOpenSelected,

    // ===== Search bar =====
    SearchFocus,
    SearchBlur,
    /// Every keystroke carries the full new text
    SearchChange(String),

    // ===== Sort button =====
    SortOpen,
    SortClose,
    SortCursor(usize),
    /// Pick a key; closes the menu
    SortSet(SortKey),

    // ===== Detail screen =====
    DetailOpen(u16),
    DetailClose,
    DetailPrev,
    DetailNext,
    DetailDidLoad(PokemonDetail),
    DetailDidError { id: u16, error: FetchError },

    SpeciesDidLoad { id: u16, species: SpeciesInfo },
    SpeciesDidError { id: u16, error: FetchError },

    ShinyToggle,

    ArtworkDidLoad { uri: String, artwork: Artwork },
    ArtworkDidError { uri: String, error: String },

    PlayCry,
    CryDidFinish,
    CryDidError(String),

    UiTerminalResize(u16, u16),
    /// Redraw without touching state (cursor moves inside inputs)
    Render,
    Tick,
    Quit,
}
