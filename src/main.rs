mod components;
mod data;
mod model;
mod render;
mod sprites;
mod state;
mod util;

use components::app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
