use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    highlight_substring, BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps,
    SelectListStyle, SelectionStyle, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps,
    StatusBarSection, StatusBarStyle,
};

use super::{
    Component, SearchBar, SearchBarProps, SortButton, SortButtonProps, SortMenu, SortMenuProps,
};
use crate::action::Action;
use crate::state::{AppState, PokemonSummary};
use crate::theme::{ColorToken, Theme};

const SORT_BUTTON_WIDTH: u16 = 16;

pub struct ListScreenProps<'a> {
    pub state: &'a AppState,
    pub theme: &'a Theme,
    pub is_focused: bool,
}

/// Title row with sort trigger, search field, the loaded entries and a
/// status line. Owns the sort menu overlay.
pub struct ListScreen {
    search: SearchBar,
    sort_button: SortButton,
    sort_menu: SortMenu,
    list: SelectList,
    status_bar: StatusBar,
    sort_trigger: Rect,
}

impl Default for ListScreen {
    fn default() -> Self {
        Self {
            search: SearchBar::new(),
            sort_button: SortButton,
            sort_menu: SortMenu::new(),
            list: SelectList::new(),
            status_bar: StatusBar::new(),
            sort_trigger: Rect::default(),
        }
    }
}

impl ListScreen {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(entries: &[&PokemonSummary], query: &str, theme: &Theme) -> Vec<Line<'static>> {
        let base = Style::default().fg(theme.color(ColorToken::GrayDark));
        let highlight = Style::default()
            .fg(theme.color(ColorToken::Tint))
            .add_modifier(Modifier::BOLD);
        let id_style = Style::default().fg(theme.color(ColorToken::GrayMedium));
        let query = query.trim().to_lowercase();
        entries
            .iter()
            .map(|entry| {
                let name = highlight_substring(&entry.name, &query, base, highlight);
                let mut spans = vec![Span::styled(format!("#{:03}  ", entry.id), id_style)];
                spans.extend(name.spans);
                Line::from(spans)
            })
            .collect()
    }

    fn list_style(theme: &Theme) -> SelectListStyle {
        SelectListStyle {
            base: BaseStyle {
                border: None,
                padding: Padding::xy(1, 0),
                bg: None,
                fg: Some(theme.color(ColorToken::GrayDark)),
            },
            selection: SelectionStyle {
                style: Some(
                    Style::default()
                        .bg(theme.color(ColorToken::GrayLight))
                        .fg(theme.color(ColorToken::GrayDark))
                        .add_modifier(Modifier::BOLD),
                ),
                marker: None,
                disabled: false,
            },
            ..SelectListStyle::default()
        }
    }

    fn render_empty(frame: &mut Frame, area: Rect, props: &ListScreenProps<'_>) {
        let list = &props.state.list;
        let text = if list.entries.is_empty() {
            match (&list.error, list.loading) {
                (Some(error), _) => format!("Failed to load: {error}"),
                (None, true) => "Loading Pokémon...".to_string(),
                (None, false) => "Nothing here yet.".to_string(),
            }
        } else {
            format!("No Pokémon match \"{}\"", list.search_query.trim())
        };
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(props.theme.color(ColorToken::GrayMedium)));
        frame.render_widget(paragraph, area);
    }

    fn render_footer(&mut self, frame: &mut Frame, area: Rect, props: &ListScreenProps<'_>) {
        let theme = props.theme;
        let list = &props.state.list;
        let hints = if list.search_focused {
            vec![
                StatusBarHint::new("Esc", "Done"),
                StatusBarHint::new("Enter", "Done"),
            ]
        } else {
            vec![
                StatusBarHint::new("j/k", "Move"),
                StatusBarHint::new("Enter", "Open"),
                StatusBarHint::new("/", "Search"),
                StatusBarHint::new("s", "Sort"),
                StatusBarHint::new("q", "Quit"),
            ]
        };

        let visible = list.visible().len();
        let mut status = format!("{visible}/{}", list.entries.len());
        if list.loading {
            status.push_str("  loading...");
        }
        if let Some(message) = props.state.message.as_deref() {
            status = format!("{message}  {status}");
        }
        let status_span = Span::styled(status, Style::default().fg(theme.color(ColorToken::Tint)));
        let status_items = [StatusBarItem::span(status_span)];

        let style = StatusBarStyle {
            base: BaseStyle {
                border: None,
                padding: Padding::xy(1, 0),
                bg: Some(theme.color(ColorToken::GrayBackground)),
                fg: Some(theme.color(ColorToken::GrayDark)),
            },
            text: Style::default().fg(theme.color(ColorToken::GrayMedium)),
            hint_key: Style::default()
                .fg(theme.color(ColorToken::Tint))
                .add_modifier(Modifier::BOLD),
            hint_label: Style::default().fg(theme.color(ColorToken::GrayMedium)),
            separator: Style::default().fg(theme.color(ColorToken::GrayMedium)),
        };
        let status_props = StatusBarProps {
            left: StatusBarSection::hints(&hints).with_separator("  "),
            center: StatusBarSection::empty(),
            right: StatusBarSection::items(&status_items),
            style,
            is_focused: false,
        };
        Component::<Action>::render(&mut self.status_bar, frame, area, status_props);
    }
}

impl Component<Action> for ListScreen {
    type Props<'a> = ListScreenProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let list = &props.state.list;

        if let Some(cursor) = list.sort_menu {
            let menu_props = SortMenuProps {
                trigger: self.sort_trigger,
                cursor,
                current: list.sort,
                is_focused: true,
                theme: props.theme,
            };
            return self.sort_menu.handle_event(event, menu_props).into_iter().collect();
        }

        if list.search_focused {
            let search_props = SearchBarProps {
                query: &list.search_query,
                is_focused: true,
                theme: props.theme,
                on_change: Action::SearchChange,
            };
            return self.search.handle_event(event, search_props).into_iter().collect();
        }

        let button_props = SortButtonProps {
            sort: list.sort,
            is_open: false,
            theme: props.theme,
        };
        let actions: Vec<_> = self
            .sort_button
            .handle_event(event, button_props)
            .into_iter()
            .collect();
        if !actions.is_empty() {
            return actions;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char('/') => vec![Action::SearchFocus],
                KeyCode::Enter => vec![Action::ListOpenSelected],
                KeyCode::Char('q') | KeyCode::Esc => vec![Action::Quit],
                // The list widget stays silent at its last row; the reducer
                // clamps this and asks for the next page.
                KeyCode::Down | KeyCode::Char('j')
                    if list.selected + 1 >= list.visible().len() =>
                {
                    vec![Action::ListSelect(list.selected + 1)]
                }
                _ => {
                    let visible = list.visible();
                    let items = Self::items(&visible, &list.search_query, props.theme);
                    let list_props = SelectListProps {
                        items: &items,
                        count: items.len(),
                        selected: list.selected.min(items.len().saturating_sub(1)),
                        is_focused: true,
                        style: Self::list_style(props.theme),
                        behavior: SelectListBehavior {
                            show_scrollbar: true,
                            wrap_navigation: false,
                        },
                        on_select: Action::ListSelect,
                        render_item: &|item| item.clone(),
                    };
                    self.list.handle_event(event, list_props).into_iter().collect()
                }
            },
            EventKind::Scroll { delta, .. } => {
                let next = list.selected as i64 + (*delta as i64) * 3;
                vec![Action::ListSelect(next.max(0) as usize)]
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let theme = props.theme;
        let list = &props.state.list;
        let background = Block::default().style(
            Style::default()
                .bg(theme.color(ColorToken::GrayWhite))
                .fg(theme.color(ColorToken::GrayDark)),
        );
        frame.render_widget(background, area);

        let [title_row, search_area, _, list_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let [title_area, sort_area] = Layout::horizontal([
            Constraint::Min(1),
            Constraint::Length(SORT_BUTTON_WIDTH),
        ])
        .areas(title_row);

        let title = Paragraph::new(" Pokédex").style(
            Style::default()
                .fg(theme.color(ColorToken::Tint))
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(title, title_area);

        self.sort_trigger = sort_area;
        self.sort_button.render(
            frame,
            sort_area,
            SortButtonProps {
                sort: list.sort,
                is_open: list.sort_menu.is_some(),
                theme,
            },
        );

        self.search.render(
            frame,
            search_area,
            SearchBarProps {
                query: &list.search_query,
                is_focused: props.is_focused && list.search_focused,
                theme,
                on_change: Action::SearchChange,
            },
        );

        let visible = list.visible();
        if visible.is_empty() {
            Self::render_empty(frame, list_area, &props);
        } else {
            let items = Self::items(&visible, &list.search_query, theme);
            let list_props = SelectListProps {
                items: &items,
                count: items.len(),
                selected: list.selected.min(items.len().saturating_sub(1)),
                is_focused: props.is_focused && !list.search_focused,
                style: Self::list_style(theme),
                behavior: SelectListBehavior {
                    show_scrollbar: true,
                    wrap_navigation: false,
                },
                on_select: Action::ListSelect,
                render_item: &|item| item.clone(),
            };
            self.list.render(frame, list_area, list_props);
        }

        self.render_footer(frame, footer_area, &props);

        if let Some(cursor) = list.sort_menu {
            self.sort_menu.render(
                frame,
                area,
                SortMenuProps {
                    trigger: sort_area,
                    cursor,
                    current: list.sort,
                    is_focused: props.is_focused,
                    theme,
                },
            );
        }
    }
}
