//! Side effects declared by the reducer

/// Task keys; spawning under a busy key replaces the running task.
pub mod task_keys {
    pub const LIST: &str = "list";
    pub const DETAIL: &str = "detail";
    pub const SPECIES: &str = "species";
    pub const ARTWORK: &str = "artwork";
    pub const CRY: &str = "cry";

    /// Everything owned by the detail screen.
    pub const DETAIL_SCREEN: [&str; 4] = [DETAIL, SPECIES, ARTWORK, CRY];
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadListPage { offset: u32, limit: u32 },
    LoadDetail { id: u16 },
    LoadSpecies { id: u16 },
    LoadArtwork { uri: String },
    /// Fire-and-forget; failures come back as `CryDidError` and are only logged
    PlayCry { uri: String },
    /// Detail screen teardown
    CancelDetailTasks,
}
