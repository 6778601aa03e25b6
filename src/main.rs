use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::Terminal;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{DebugRunOutput, DebugSession, DebugSessionError, ReplayItem};

use pokedex::action::Action;
use pokedex::api::{self, PokeApi};
use pokedex::audio;
use pokedex::config::{Args, Config};
use pokedex::effect::{task_keys, Effect};
use pokedex::error::MediaError;
use pokedex::logging;
use pokedex::reducer::reducer;
use pokedex::sprite;
use pokedex::sprite_backend::{self, ArtworkBackend};
use pokedex::state::{AppState, TICK_MS};
use pokedex::theme::Theme;
use pokedex::ui::{PokedexComponentId, PokedexContext, PokedexUi};

#[tokio::main]
async fn main() -> io::Result<()> {
    let (config, debug_args) = Args::parse().into_parts();
    let _log_guard = logging::init_logging(config.log_file.as_deref());
    tracing::info!(api_base = %config.api_base, "starting pokedex");

    api::install(PokeApi::new(config.api_base.clone()));

    let debug = DebugSession::new(debug_args);
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let initial = AppState::new(&config);
    let state = debug
        .load_state_or_else_async(move || async move { Ok::<AppState, io::Error>(initial) })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = ArtworkBackend::new(stdout, sprite_backend::artwork_registry());
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, &config, store, replay_actions).await;

    if use_alt_screen {
        sprite_backend::clear_artwork();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    tracing::info!("bye");
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    config: &Config,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PokedexUi::new(Theme::new(config.theme))));
    let mut bus: EventBus<AppState, Action, PokedexComponentId, PokedexContext> = EventBus::new();
    let keybindings: Keybindings<PokedexContext> = Keybindings::new();

    let ui_list = Rc::clone(&ui);
    bus.register(PokedexComponentId::List, move |event, state| {
        ui_list.borrow_mut().handle_list_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(PokedexComponentId::Detail, move |event, state| {
        ui_detail.borrow_mut().handle_detail_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key)
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            HandlerResponse::action(Action::Quit)
        }
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadListPage { offset, limit } => {
            ctx.tasks().spawn(task_keys::LIST, async move {
                match api::client().fetch_list_page(offset, limit).await {
                    Ok(page) => Action::ListDidLoad(page),
                    Err(error) => {
                        tracing::warn!(offset, %error, "list page failed");
                        Action::ListDidError(error)
                    }
                }
            });
        }
        Effect::LoadDetail { id } => {
            ctx.tasks().spawn(task_keys::DETAIL, async move {
                match api::client().fetch_pokemon(id).await {
                    Ok(detail) => Action::DetailDidLoad(detail),
                    Err(error) => {
                        tracing::warn!(id, %error, "pokemon failed");
                        Action::DetailDidError { id, error }
                    }
                }
            });
        }
        Effect::LoadSpecies { id } => {
            ctx.tasks().spawn(task_keys::SPECIES, async move {
                match api::client().fetch_species(id).await {
                    Ok(species) => Action::SpeciesDidLoad { id, species },
                    Err(error) => {
                        tracing::warn!(id, %error, "species failed");
                        Action::SpeciesDidError { id, error }
                    }
                }
            });
        }
        Effect::LoadArtwork { uri } => {
            ctx.tasks().spawn(task_keys::ARTWORK, async move {
                let loaded = match api::client().get_bytes(&uri).await {
                    Ok(bytes) => sprite::decode_artwork(&bytes),
                    Err(error) => Err(MediaError::from(error)),
                };
                match loaded {
                    Ok(artwork) => Action::ArtworkDidLoad { uri, artwork },
                    Err(error) => {
                        tracing::warn!(%uri, %error, "artwork failed");
                        Action::ArtworkDidError {
                            uri,
                            error: error.to_string(),
                        }
                    }
                }
            });
        }
        Effect::PlayCry { uri } => {
            ctx.tasks().spawn(task_keys::CRY, async move {
                match play_cry(&uri).await {
                    Ok(()) => Action::CryDidFinish,
                    Err(error) => {
                        tracing::warn!(%uri, %error, "cry playback failed");
                        Action::CryDidError(error.to_string())
                    }
                }
            });
        }
        Effect::CancelDetailTasks => {
            for key in task_keys::DETAIL_SCREEN {
                ctx.tasks().cancel(&TaskKey::new(key));
            }
        }
    }
}

async fn play_cry(uri: &str) -> Result<(), MediaError> {
    let bytes = api::client().get_bytes(uri).await?;
    tokio::task::spawn_blocking(move || audio::play_ogg(bytes))
        .await
        .map_err(|err| MediaError::Task(err.to_string()))?
}
