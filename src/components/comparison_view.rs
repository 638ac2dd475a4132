use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, TouchEvent};
use yew::Reducible;
use yew::prelude::*;

use super::agent_panel::AgentPanel;
use crate::data::{data_base_url, load_replays};
use crate::model::{GameType, Strategy};
use crate::render::draw_frame;
use crate::sprites::{FreewayCache, SnakeCache, preload_freeway, preload_snake};
use crate::state::{ReplaySession, SwipeAction, SwipeState};
use crate::util::cwarn;

#[derive(Properties, PartialEq, Clone)]
pub struct ComparisonViewProps {
    pub game: GameType,
    pub cognitive_load: String,
    pub time_pressure: String,
    pub seed: String,
}

/// Monotonic redraw counter. Dispatching always sees the latest value, so
/// listeners registered once at mount stay correct.
#[derive(PartialEq)]
struct Tick(u32);

impl Reducible for Tick {
    type Action = ();

    fn reduce(self: Rc<Self>, _action: ()) -> Rc<Self> {
        Rc::new(Tick(self.0 + 1))
    }
}

fn redraw_panels(
    session: &ReplaySession,
    game: GameType,
    freeway_sprites: &FreewayCache,
    snake_sprites: &SnakeCache,
    canvases: &[(Strategy, NodeRef); 3],
) {
    for (strategy, node) in canvases {
        let Some(canvas) = node.cast::<HtmlCanvasElement>() else {
            continue;
        };
        let Some(ctx) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            continue;
        };
        let width = canvas.width() as f64;
        let height = canvas.height() as f64;
        match session.frame(*strategy) {
            Some(view) => draw_frame(
                &ctx,
                width,
                height,
                &view,
                game,
                freeway_sprites,
                snake_sprites,
            ),
            None => ctx.clear_rect(0.0, 0.0, width, height),
        }
    }
}

/// The replay viewer proper: load trigger, step navigation (buttons, arrow
/// keys, swipes), and the three agent panels drawing the current step.
#[function_component(ComparisonView)]
pub fn comparison_view(props: &ComparisonViewProps) -> Html {
    let session = use_mut_ref(ReplaySession::default);
    let freeway_sprites = use_mut_ref(FreewayCache::default);
    let snake_sprites = use_mut_ref(SnakeCache::default);
    let swipe = use_mut_ref(SwipeState::default);
    // the game the installed data belongs to; lags the selection while a
    // load is in flight
    let loaded_game = use_mut_ref(|| GameType::Freeway);
    let tick = use_reducer(|| Tick(0));
    let loading = use_state(|| false);
    let visible = use_state(|| false);
    let visible_flag = use_mut_ref(|| false);
    let reactive_ref = use_node_ref();
    let planning_ref = use_node_ref();
    let agile_ref = use_node_ref();

    // Mirror panel visibility into a flag the window listener can read.
    {
        let visible_flag = visible_flag.clone();
        let flag = *visible;
        use_effect_with(flag, move |_| {
            *visible_flag.borrow_mut() = flag;
            || ()
        });
    }

    // Redraw all three canvases whenever the step or the installed data
    // changes; the canvases exist only while the panel is shown.
    {
        let session = session.clone();
        let freeway_sprites = freeway_sprites.clone();
        let snake_sprites = snake_sprites.clone();
        let loaded_game = loaded_game.clone();
        let canvases = [
            (Strategy::Reactive, reactive_ref.clone()),
            (Strategy::Planning, planning_ref.clone()),
            (Strategy::Agile, agile_ref.clone()),
        ];
        let deps = ((*tick).0, *visible);
        use_effect_with(deps, move |_| {
            redraw_panels(
                &session.borrow(),
                *loaded_game.borrow(),
                &freeway_sprites.borrow(),
                &snake_sprites.borrow(),
                &canvases,
            );
            || ()
        });
    }

    // Arrow-key navigation while the panel is visible.
    {
        let session = session.clone();
        let visible_flag = visible_flag.clone();
        let dispatcher = tick.dispatcher();
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("window");
            let keydown_cb = Closure::wrap(Box::new(move |e: KeyboardEvent| {
                if !*visible_flag.borrow() {
                    return;
                }
                let moved = match e.key().as_str() {
                    "ArrowLeft" => session.borrow_mut().previous(),
                    "ArrowRight" => session.borrow_mut().next(),
                    _ => false,
                };
                if moved {
                    e.prevent_default();
                    dispatcher.dispatch(());
                }
            }) as Box<dyn FnMut(_)>);
            window
                .add_event_listener_with_callback("keydown", keydown_cb.as_ref().unchecked_ref())
                .ok();
            let window_clone = window.clone();
            move || {
                let _ = window_clone.remove_event_listener_with_callback(
                    "keydown",
                    keydown_cb.as_ref().unchecked_ref(),
                );
            }
        });
    }

    let on_load = {
        let session = session.clone();
        let freeway_sprites = freeway_sprites.clone();
        let snake_sprites = snake_sprites.clone();
        let loaded_game = loaded_game.clone();
        let loading = loading.clone();
        let visible = visible.clone();
        let dispatcher = tick.dispatcher();
        let game = props.game;
        let cognitive_load = props.cognitive_load.clone();
        let time_pressure = props.time_pressure.clone();
        let seed = props.seed.clone();
        Callback::from(move |_| {
            if *loading {
                return;
            }
            loading.set(true);
            let session = session.clone();
            let freeway_sprites = freeway_sprites.clone();
            let snake_sprites = snake_sprites.clone();
            let loaded_game = loaded_game.clone();
            let loading = loading.clone();
            let visible = visible.clone();
            let dispatcher = dispatcher.clone();
            let cognitive_load = cognitive_load.clone();
            let time_pressure = time_pressure.clone();
            let seed = seed.clone();
            spawn_local(async move {
                // sprites first, then data; drawing starts only after both
                // have settled
                match game {
                    GameType::Freeway => preload_freeway(freeway_sprites.clone()).await,
                    GameType::Snake => preload_snake(snake_sprites.clone()).await,
                    GameType::Overcooked => {}
                }
                let result = load_replays(
                    &data_base_url(),
                    game,
                    &cognitive_load,
                    &time_pressure,
                    &seed,
                    session.clone(),
                )
                .await;
                loading.set(false);
                match result {
                    Ok(()) => {
                        *loaded_game.borrow_mut() = game;
                        visible.set(true);
                        dispatcher.dispatch(());
                    }
                    Err(err) => {
                        cwarn(&format!("comparison load failed: {err}"));
                        if let Some(window) = web_sys::window() {
                            let _ = window.alert_with_message(
                                "Failed to load comparison data. Please try again.",
                            );
                        }
                    }
                }
            });
        })
    };

    let on_prev = {
        let session = session.clone();
        let dispatcher = tick.dispatcher();
        Callback::from(move |_| {
            if session.borrow_mut().previous() {
                dispatcher.dispatch(());
            }
        })
    };
    let on_next = {
        let session = session.clone();
        let dispatcher = tick.dispatcher();
        Callback::from(move |_| {
            if session.borrow_mut().next() {
                dispatcher.dispatch(());
            }
        })
    };

    let on_touch_start = {
        let swipe = swipe.clone();
        Callback::from(move |e: TouchEvent| {
            if let Some(touch) = e.touches().item(0) {
                swipe
                    .borrow_mut()
                    .begin(touch.client_x() as f64, touch.client_y() as f64);
            }
        })
    };
    let on_touch_move = {
        let swipe = swipe.clone();
        Callback::from(move |e: TouchEvent| {
            if let Some(touch) = e.touches().item(0) {
                swipe
                    .borrow_mut()
                    .track(touch.client_x() as f64, touch.client_y() as f64);
            }
        })
    };
    let on_touch_end = {
        let swipe = swipe.clone();
        let session = session.clone();
        let dispatcher = tick.dispatcher();
        Callback::from(move |_: TouchEvent| {
            let moved = match swipe.borrow_mut().finish() {
                SwipeAction::Next => session.borrow_mut().next(),
                SwipeAction::Previous => session.borrow_mut().previous(),
                SwipeAction::None => false,
            };
            if moved {
                dispatcher.dispatch(());
            }
        })
    };

    let (step_text, at_start, at_end, panels) = {
        let session = session.borrow();
        let step_text = format!(
            "Step {} / {}",
            session.current_step() + 1,
            session.total_steps()
        );
        let panels: Vec<(Strategy, f64, String, bool)> = Strategy::ALL
            .iter()
            .map(|strategy| match session.frame(*strategy) {
                Some(view) => (
                    *strategy,
                    view.record.score,
                    view.record.thinking.clone(),
                    view.game_over,
                ),
                None => (*strategy, 0.0, String::new(), false),
            })
            .collect();
        (step_text, session.at_start(), session.at_end(), panels)
    };
    let (canvas_w, canvas_h) = match *loaded_game.borrow() {
        GameType::Freeway => (360u32, 400u32),
        GameType::Snake => (360, 360),
        GameType::Overcooked => (360, 300),
    };
    let canvas_refs = [reactive_ref, planning_ref, agile_ref];

    html! {
        <div class="comparison">
            <button class="load-btn" onclick={on_load} disabled={*loading}>
                { if *loading { "Loading..." } else { "Load Comparison" } }
            </button>
            if *visible {
                <div class="comparison-results"
                    ontouchstart={on_touch_start}
                    ontouchmove={on_touch_move}
                    ontouchend={on_touch_end}>
                    <div class="step-controls">
                        <button onclick={on_prev} disabled={at_start}>{ "◀ Prev" }</button>
                        <span class="step-counter">{ step_text }</span>
                        <button onclick={on_next} disabled={at_end}>{ "Next ▶" }</button>
                    </div>
                    <div class="agent-grid">
                        { for panels.into_iter().zip(canvas_refs).map(|((strategy, score, thinking, game_over), canvas_ref)| html! {
                            <AgentPanel
                                {strategy}
                                {score}
                                {thinking}
                                {game_over}
                                {canvas_ref}
                                canvas_width={canvas_w}
                                canvas_height={canvas_h}
                            />
                        }) }
                    </div>
                </div>
            }
        </div>
    }
}
