pub mod detail_screen;
pub mod list_screen;
pub mod search_bar;
pub mod sort_button;
pub mod stat_bar;

pub use tui_dispatch::Component;

pub use detail_screen::{DetailScreen, DetailScreenProps};
pub use list_screen::{ListScreen, ListScreenProps};
pub use search_bar::{SearchBar, SearchBarProps};
pub use sort_button::{menu_rect, SortButton, SortButtonProps, SortMenu, SortMenuProps};
pub use stat_bar::{StatBarRow, StatBarRowProps};
