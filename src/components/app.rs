use web_sys::HtmlSelectElement;
use yew::prelude::*;

use super::comparison_view::ComparisonView;
use crate::model::GameType;

const GAME_KEY: &str = "rr_sel_game";
const LOAD_KEY: &str = "rr_sel_load";
const PRESSURE_KEY: &str = "rr_sel_pressure";
const SEED_KEY: &str = "rr_sel_seed";

fn stored(key: &str) -> Option<String> {
    let store = web_sys::window()?.local_storage().ok()??;
    store.get_item(key).ok()?
}

fn persist(key: &str, value: &str) {
    if let Some(win) = web_sys::window() {
        if let Ok(Some(store)) = win.local_storage() {
            let _ = store.set_item(key, value);
        }
    }
}

/// Top-level page: scenario selection (persisted across visits) above the
/// comparison viewer.
#[function_component(App)]
pub fn app() -> Html {
    let game = use_state(|| {
        stored(GAME_KEY)
            .and_then(|v| GameType::from_key(&v))
            .unwrap_or(GameType::Freeway)
    });
    let cognitive_load = use_state(|| stored(LOAD_KEY).unwrap_or_else(|| "M".to_string()));
    let time_pressure = use_state(|| stored(PRESSURE_KEY).unwrap_or_else(|| "slow".to_string()));
    let seed = use_state(|| stored(SEED_KEY).unwrap_or_else(|| "0".to_string()));

    // Persist the selection whenever it changes.
    {
        let deps = (
            *game,
            (*cognitive_load).clone(),
            (*time_pressure).clone(),
            (*seed).clone(),
        );
        use_effect_with(deps, move |(game, load, pressure, seed)| {
            persist(GAME_KEY, game.key());
            persist(LOAD_KEY, load);
            persist(PRESSURE_KEY, pressure);
            persist(SEED_KEY, seed);
            || ()
        });
    }

    let on_game_change = {
        let game = game.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                if let Some(parsed) = GameType::from_key(&select.value()) {
                    game.set(parsed);
                }
            }
        })
    };
    let select_setter = |handle: UseStateHandle<String>| {
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                handle.set(select.value());
            }
        })
    };

    html! {
        <div id="root">
            <header id="top-bar">
                <h1>{ "Real-Time Reasoning Agents" }</h1>
                <p>{ "Step through recorded episodes and compare how each reasoning strategy plays." }</p>
            </header>
            <section class="scenario-controls">
                <label>{ "Game" }
                    <select onchange={on_game_change}>
                        <option value="freeway" selected={*game == GameType::Freeway}>{ "Freeway" }</option>
                        <option value="snake" selected={*game == GameType::Snake}>{ "Snake" }</option>
                        <option value="overcooked" selected={*game == GameType::Overcooked}>{ "Overcooked" }</option>
                    </select>
                </label>
                <label>{ "Cognitive load" }
                    <select onchange={select_setter(cognitive_load.clone())}>
                        <option value="E" selected={*cognitive_load == "E"}>{ "Easy" }</option>
                        <option value="M" selected={*cognitive_load == "M"}>{ "Medium" }</option>
                        <option value="H" selected={*cognitive_load == "H"}>{ "Hard" }</option>
                    </select>
                </label>
                <label>{ "Time pressure" }
                    <select onchange={select_setter(time_pressure.clone())}>
                        <option value="slow" selected={*time_pressure == "slow"}>{ "Slow" }</option>
                        <option value="fast" selected={*time_pressure == "fast"}>{ "Fast" }</option>
                        <option value="parallel" selected={*time_pressure == "parallel"}>{ "Parallel" }</option>
                    </select>
                </label>
                <label>{ "Seed" }
                    <select onchange={select_setter(seed.clone())}>
                        { for ["0", "1", "2", "3"].iter().map(|s| html! {
                            <option value={*s} selected={*seed == *s}>{ *s }</option>
                        }) }
                    </select>
                </label>
            </section>
            <ComparisonView
                game={*game}
                cognitive_load={(*cognitive_load).clone()}
                time_pressure={(*time_pressure).clone()}
                seed={(*seed).clone()}
            />
        </div>
    }
}
