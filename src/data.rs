//! Fetching and fallback for the three per-strategy replay resources.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::model::{GameType, ReplaySet, StepRecord, Strategy, resource_key};
use crate::state::ReplaySession;
use crate::util::{clog, cwarn};

/// Root of the pre-baked replay JSON, relative to the served page.
pub fn data_base_url() -> String {
    "static/data".to_string()
}

/// Fetches the three strategy runs for one scenario and installs them in
/// the session. A fetch or parse failure swaps in the synthetic placeholder
/// set instead, so the session always ends up usable; the returned error is
/// reserved for conditions the fallback cannot paper over.
pub async fn load_replays(
    base_url: &str,
    game: GameType,
    cognitive_load: &str,
    time_pressure: &str,
    seed: &str,
    session: Rc<RefCell<ReplaySession>>,
) -> Result<(), String> {
    let window = web_sys::window().ok_or("window unavailable".to_string())?;
    let key = resource_key(game, cognitive_load, time_pressure, seed);
    match fetch_replay_set(&window, base_url, &key).await {
        Ok(set) => {
            clog(&format!("loaded replay data for {key}"));
            session.borrow_mut().install(set);
        }
        Err(err) => {
            cwarn(&format!("replay fetch for {key} failed ({err}); using placeholder data"));
            session
                .borrow_mut()
                .install(ReplaySet::placeholder(&mut js_sys::Math::random));
        }
    }
    Ok(())
}

/// All three resources or nothing: the requests go out together, and any
/// non-2xx status, network error, or parse failure abandons the batch.
async fn fetch_replay_set(
    window: &web_sys::Window,
    base_url: &str,
    key: &str,
) -> Result<ReplaySet, String> {
    let pending: Vec<JsFuture> = Strategy::ALL
        .iter()
        .map(|strategy| {
            let url = format!("{base_url}/{key}_{}.json", strategy.key());
            JsFuture::from(window.fetch_with_str(&url))
        })
        .collect();

    let mut runs: [Vec<StepRecord>; 3] = Default::default();
    for (strategy, request) in Strategy::ALL.into_iter().zip(pending) {
        let response: Response = request
            .await
            .map_err(|_| format!("{}: network error", strategy.key()))?
            .dyn_into()
            .map_err(|_| format!("{}: unexpected fetch result", strategy.key()))?;
        if !response.ok() {
            return Err(format!("{}: status {}", strategy.key(), response.status()));
        }
        let body = JsFuture::from(
            response
                .text()
                .map_err(|_| format!("{}: body unavailable", strategy.key()))?,
        )
        .await
        .map_err(|_| format!("{}: body read failed", strategy.key()))?;
        let body = body
            .as_string()
            .ok_or_else(|| format!("{}: body is not text", strategy.key()))?;
        runs[strategy.index()] = serde_json::from_str(&body)
            .map_err(|err| format!("{}: parse error: {err}", strategy.key()))?;
    }
    Ok(ReplaySet { runs })
}
