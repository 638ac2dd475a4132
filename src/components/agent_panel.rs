use yew::prelude::*;

use crate::model::Strategy;
use crate::util::format_score;

#[derive(Properties, PartialEq, Clone)]
pub struct AgentPanelProps {
    pub strategy: Strategy,
    pub score: f64,
    pub thinking: String,
    pub game_over: bool,
    pub canvas_ref: NodeRef,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

/// One strategy's card: score readout, replay canvas, collapsible thinking
/// transcript. A terminated agent swaps the transcript for a game-over line.
#[function_component(AgentPanel)]
pub fn agent_panel(props: &AgentPanelProps) -> Html {
    let open = use_state(|| true);
    let toggle = {
        let open = open.clone();
        Callback::from(move |_| open.set(!*open))
    };

    html! {
        <div class="agent-panel">
            <div class="agent-header">
                <h3>{ props.strategy.title() }</h3>
                <span class="agent-score">{ format!("Score: {}", format_score(props.score)) }</span>
            </div>
            <canvas
                ref={props.canvas_ref.clone()}
                width={props.canvas_width.to_string()}
                height={props.canvas_height.to_string()}>
            </canvas>
            <div class="agent-thinking">
                <button class="thinking-toggle" onclick={toggle}>
                    { if *open { "Thinking ▾" } else { "Thinking ▸" } }
                </button>
                if *open {
                    if props.game_over {
                        <p class="thinking-game-over">{ "GAME OVER" }</p>
                    } else {
                        <p class="thinking-text">{ props.thinking.clone() }</p>
                    }
                }
            </div>
        </div>
    }
}
