//! Screen switching and event routing.

use ratatui::{layout::Rect, Frame};
use tui_dispatch::{EventContext, EventKind, EventRoutingState, HandlerResponse, RenderContext};

use crate::action::Action;
use crate::components::{
    Component, DetailScreen, DetailScreenProps, ListScreen, ListScreenProps,
};
use crate::sprite_backend;
use crate::state::{AppState, Screen};
use crate::theme::Theme;

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PokedexComponentId {
    List,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PokedexContext {
    List,
    Search,
    SortMenu,
    Detail,
}

impl EventRoutingState<PokedexComponentId, PokedexContext> for AppState {
    fn focused(&self) -> Option<PokedexComponentId> {
        match self.screen {
            Screen::List => Some(PokedexComponentId::List),
            Screen::Detail => Some(PokedexComponentId::Detail),
        }
    }

    fn modal(&self) -> Option<PokedexComponentId> {
        None
    }

    fn binding_context(&self, id: PokedexComponentId) -> PokedexContext {
        match id {
            PokedexComponentId::List if self.list.sort_menu.is_some() => PokedexContext::SortMenu,
            PokedexComponentId::List if self.list.search_focused => PokedexContext::Search,
            PokedexComponentId::List => PokedexContext::List,
            PokedexComponentId::Detail => PokedexContext::Detail,
        }
    }

    fn default_context(&self) -> PokedexContext {
        PokedexContext::List
    }
}

pub struct PokedexUi {
    theme: Theme,
    list: ListScreen,
    detail: DetailScreen,
}

impl PokedexUi {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            list: ListScreen::new(),
            detail: DetailScreen::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokedexComponentId>,
    ) {
        match state.screen {
            Screen::List => {
                sprite_backend::clear_artwork();
                event_ctx.set_component_area(PokedexComponentId::List, area);
                event_ctx.component_areas.remove(&PokedexComponentId::Detail);
                let props = ListScreenProps {
                    state,
                    theme: &self.theme,
                    is_focused: render_ctx.is_focused(),
                };
                self.list.render(frame, area, props);
            }
            Screen::Detail => {
                event_ctx.set_component_area(PokedexComponentId::Detail, area);
                event_ctx.component_areas.remove(&PokedexComponentId::List);
                let props = DetailScreenProps {
                    state,
                    theme: &self.theme,
                    is_focused: render_ctx.is_focused(),
                };
                self.detail.render(frame, area, props);
            }
        }
    }

    pub fn handle_list_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = ListScreenProps {
            state,
            theme: &self.theme,
            is_focused: true,
        };
        let actions: Vec<_> = self.list.handle_event(event, props).into_iter().collect();
        handler_response(actions)
    }

    pub fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = DetailScreenProps {
            state,
            theme: &self.theme,
            is_focused: true,
        };
        let actions: Vec<_> = self.detail.handle_event(event, props).into_iter().collect();
        handler_response(actions)
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}
