use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding, SelectList,
    SelectListBehavior, SelectListProps, SelectListStyle, SelectionStyle,
};

use super::Component;
use crate::action::Action;
use crate::state::SortKey;
use crate::theme::{ColorToken, Theme};

const MENU_WIDTH: u16 = 14;

pub struct SortButtonProps<'a> {
    pub sort: SortKey,
    pub is_open: bool,
    pub theme: &'a Theme,
}

/// The trigger: shows the active key and opens the menu.
#[derive(Default)]
pub struct SortButton;

impl SortButton {
    pub fn label(sort: SortKey) -> String {
        format!("Sort: {} ▾", sort.label())
    }
}

impl Component<Action> for SortButton {
    type Props<'a> = SortButtonProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if props.is_open {
            return None;
        }
        match event {
            EventKind::Key(key) if key.code == KeyCode::Char('s') => Some(Action::SortOpen),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let theme = props.theme;
        let mut style = Style::default()
            .fg(theme.color(ColorToken::Tint))
            .add_modifier(Modifier::BOLD);
        if props.is_open {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let button = Paragraph::new(Self::label(props.sort))
            .alignment(Alignment::Right)
            .style(style);
        frame.render_widget(button, area);
    }
}

/// Where the open menu goes: directly under `trigger`, right edges
/// aligned, pulled back inside `screen` when it would overflow.
pub fn menu_rect(trigger: Rect, screen: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(screen.width);
    let height = height.min(screen.height);
    let x = trigger
        .right()
        .saturating_sub(width)
        .max(screen.x)
        .min(screen.right().saturating_sub(width));
    let y = trigger
        .bottom()
        .max(screen.y)
        .min(screen.bottom().saturating_sub(height));
    Rect::new(x, y, width, height)
}

pub fn menu_height() -> u16 {
    SortKey::ALL.len() as u16 + 2
}

pub struct SortMenuProps<'a> {
    pub trigger: Rect,
    pub cursor: usize,
    pub current: SortKey,
    pub is_focused: bool,
    pub theme: &'a Theme,
}

/// Transient list of sort keys. Enter picks and closes, Esc closes.
pub struct SortMenu {
    list: SelectList,
    modal: Modal,
}

impl Default for SortMenu {
    fn default() -> Self {
        Self {
            list: SelectList::new(),
            modal: Modal::new(),
        }
    }
}

impl SortMenu {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(current: SortKey) -> Vec<Line<'static>> {
        SortKey::ALL
            .iter()
            .map(|key| {
                let marker = if *key == current { "● " } else { "  " };
                Line::from(format!("{marker}{}", key.label()))
            })
            .collect()
    }
}

impl Component<Action> for SortMenu {
    type Props<'a> = SortMenuProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        let last = SortKey::ALL.len() - 1;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::SortClose),
            KeyCode::Up | KeyCode::Char('k') => {
                Some(Action::SortCursor(props.cursor.saturating_sub(1)))
            }
            KeyCode::Down | KeyCode::Char('j') => {
                Some(Action::SortCursor((props.cursor + 1).min(last)))
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                Some(Action::SortSet(SortKey::ALL[props.cursor.min(last)]))
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let theme = props.theme;
        let menu_area = menu_rect(props.trigger, area, MENU_WIDTH, menu_height());
        if menu_area.width == 0 || menu_area.height == 0 {
            return;
        }
        let items = Self::items(props.current);
        let SortMenu { list, modal } = self;
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let list_props = SelectListProps {
                items: &items,
                count: items.len(),
                selected: props.cursor,
                is_focused: props.is_focused,
                style: SelectListStyle {
                    base: BaseStyle {
                        border: None,
                        padding: Padding::xy(1, 1),
                        bg: None,
                        fg: Some(theme.color(ColorToken::GrayDark)),
                    },
                    selection: SelectionStyle {
                        style: Some(
                            Style::default()
                                .bg(theme.color(ColorToken::Tint))
                                .fg(theme.color(ColorToken::White))
                                .add_modifier(Modifier::BOLD),
                        ),
                        marker: None,
                        disabled: false,
                    },
                    ..SelectListStyle::default()
                },
                behavior: SelectListBehavior {
                    show_scrollbar: false,
                    wrap_navigation: false,
                },
                on_select: Action::SortCursor,
                render_item: &|item| item.clone(),
            };
            list.render(frame, content_area, list_props);
        };

        modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: menu_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(theme.color(ColorToken::GrayWhite)),
                        padding: Padding::default(),
                        border: None,
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::SortClose,
                render_content: &mut render_content,
            },
        );
    }
}
