//! Core data model for the strategy-comparison replay viewer.
//! One replay resource per (scenario, strategy) holds the step records the
//! canvases page through; recorded game states ride along per step.

use serde::{Deserialize, Serialize};

/// Freeway board: 9 columns by 10 rows, chicken crossing on a fixed column.
pub const FREEWAY_COLS: i32 = 9;
pub const FREEWAY_ROWS: i32 = 10;
pub const FREEWAY_PLAYER_COL: i32 = 4;

/// Snake board edge length, including the unrendered border ring.
pub const SNAKE_BOARD: i32 = 8;

/// Steps per strategy in the synthetic fallback set.
pub const PLACEHOLDER_STEPS: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    Reactive,
    Planning,
    Agile,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Reactive, Strategy::Planning, Strategy::Agile];

    pub fn key(self) -> &'static str {
        match self {
            Strategy::Reactive => "reactive",
            Strategy::Planning => "planning",
            Strategy::Agile => "agile",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Strategy::Reactive => "Reactive",
            Strategy::Planning => "Planning",
            Strategy::Agile => "Agile",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Strategy::Reactive => 0,
            Strategy::Planning => 1,
            Strategy::Agile => 2,
        }
    }

    /// Exclusive upper bound for synthetic scores.
    fn placeholder_score_cap(self) -> f64 {
        match self {
            Strategy::Reactive => 100.0,
            Strategy::Planning => 120.0,
            Strategy::Agile => 150.0,
        }
    }

    fn placeholder_thinking(self, step: usize) -> String {
        let text = match self {
            Strategy::Reactive => "Quick intuitive decision based on pattern recognition.",
            Strategy::Planning => "Analyzing environment thoroughly. Planning optimal path.",
            Strategy::Agile => "Hybrid approach combining fast intuition with deliberate reasoning.",
        };
        format!("Step {}: {}", step + 1, text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameType {
    Freeway,
    Snake,
    Overcooked,
}

impl GameType {
    pub fn key(self) -> &'static str {
        match self {
            GameType::Freeway => "freeway",
            GameType::Snake => "snake",
            GameType::Overcooked => "overcooked",
        }
    }

    pub fn from_key(key: &str) -> Option<GameType> {
        match key {
            "freeway" => Some(GameType::Freeway),
            "snake" => Some(GameType::Snake),
            "overcooked" => Some(GameType::Overcooked),
            _ => None,
        }
    }
}

/// Snake heading as recorded in the replay files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dir {
    #[serde(rename = "U")]
    Up,
    #[serde(rename = "D")]
    Down,
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
}

impl Dir {
    /// Grid offset with rows growing downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }
}

/// One lane entry as recorded: `[x, y, speed, length]`.
/// `x` and `speed` are null for lanes with no active car.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Car(pub Option<f64>, pub i32, pub Option<f64>, pub u32);

impl Car {
    pub fn x(&self) -> Option<f64> {
        self.0
    }

    pub fn row(&self) -> i32 {
        self.1
    }

    pub fn speed(&self) -> Option<f64> {
        self.2
    }

    pub fn length(&self) -> u32 {
        self.3.clamp(1, 4)
    }
}

/// One food item as recorded: `[x, y, life, value]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Food(pub i32, pub i32, pub i32, pub f64);

impl Food {
    pub fn x(&self) -> i32 {
        self.0
    }

    pub fn y(&self) -> i32 {
        self.1
    }

    pub fn life(&self) -> i32 {
        self.2
    }

    pub fn value(&self) -> f64 {
        self.3
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FreewayState {
    /// Player row; the column is fixed at `FREEWAY_PLAYER_COL`.
    pub pos: i32,
    pub cars: Vec<Car>,
    pub game_turn: i32,
    #[serde(default)]
    pub terminal: bool,
    #[serde(default)]
    pub show_hit: bool,
    /// `Some(true)` shows the thinking icon, `Some(false)` the idea icon.
    #[serde(default)]
    pub show_thinking: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnakeState {
    /// Head at index 0, tail last. Load-bearing for sprite inference.
    pub snake: Vec<(i32, i32)>,
    pub direction: Dir,
    #[serde(default)]
    pub food: Vec<Food>,
    #[serde(default, alias = "obstacle")]
    pub obstacles: Vec<(i32, i32)>,
    #[serde(alias = "turn")]
    pub game_turn: i32,
    #[serde(default)]
    pub terminal: bool,
    #[serde(default, alias = "score")]
    pub reward: f64,
    #[serde(default)]
    pub show_thinking: Option<bool>,
}

/// Discriminated by required fields: freeway records carry `pos`/`cars`,
/// snake records carry `snake`/`direction`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GameState {
    Freeway(FreewayState),
    Snake(SnakeState),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: u32,
    pub score: f64,
    #[serde(default)]
    pub thinking: String,
    /// A malformed state only costs that step its game scene, never the
    /// whole resource.
    #[serde(default, deserialize_with = "lenient_state")]
    pub state: Option<GameState>,
}

fn lenient_state<'de, D>(deserializer: D) -> Result<Option<GameState>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// The three per-strategy runs of one loaded scenario.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplaySet {
    /// Indexed by `Strategy::index`.
    pub runs: [Vec<StepRecord>; 3],
}

impl ReplaySet {
    pub fn run(&self, strategy: Strategy) -> &[StepRecord] {
        &self.runs[strategy.index()]
    }

    /// Longest of the three runs; shorter runs end in per-agent game over.
    pub fn total_steps(&self) -> usize {
        self.runs.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Synthetic stand-in used when any of the three fetches fails: fixed
    /// length, randomized scores, canned narrative, no game states.
    pub fn placeholder(rand: &mut dyn FnMut() -> f64) -> ReplaySet {
        let mut runs: [Vec<StepRecord>; 3] = Default::default();
        for strategy in Strategy::ALL {
            runs[strategy.index()] = (0..PLACEHOLDER_STEPS)
                .map(|i| StepRecord {
                    step: i as u32,
                    score: (rand() * strategy.placeholder_score_cap()).floor(),
                    thinking: strategy.placeholder_thinking(i),
                    state: None,
                })
                .collect();
        }
        ReplaySet { runs }
    }
}

/// Canonical resource key for one scenario selection.
pub fn resource_key(game: GameType, cognitive_load: &str, time_pressure: &str, seed: &str) -> String {
    format!("{}_{}_{}_{}", game.key(), cognitive_load, time_pressure, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_key_matches_file_naming() {
        assert_eq!(
            resource_key(GameType::Freeway, "M", "slow", "0"),
            "freeway_M_slow_0"
        );
        assert_eq!(
            resource_key(GameType::Snake, "H", "parallel", "3"),
            "snake_H_parallel_3"
        );
    }

    #[test]
    fn freeway_record_parses_with_nullable_car_fields() {
        let raw = r#"{
            "step": 4,
            "score": 2.0,
            "thinking": "cross now",
            "state": {
                "pos": 3,
                "cars": [[5, 2, 1, 2], [null, 3, null, 1]],
                "game_turn": 40,
                "terminal": false
            }
        }"#;
        let record: StepRecord = serde_json::from_str(raw).unwrap();
        let Some(GameState::Freeway(state)) = record.state else {
            panic!("expected a freeway state");
        };
        assert_eq!(state.pos, 3);
        assert_eq!(state.cars.len(), 2);
        assert_eq!(state.cars[0].x(), Some(5.0));
        assert_eq!(state.cars[0].length(), 2);
        assert_eq!(state.cars[1].x(), None);
        assert_eq!(state.cars[1].speed(), None);
        assert!(!state.show_hit);
        assert_eq!(state.show_thinking, None);
    }

    #[test]
    fn snake_record_parses_with_field_aliases() {
        let raw = r#"{
            "step": 0,
            "score": 1.5,
            "state": {
                "snake": [[2, 2], [2, 3], [2, 4]],
                "direction": "U",
                "food": [[5, 5, 12, 1.0]],
                "obstacle": [[4, 3]],
                "turn": 21,
                "terminal": true,
                "score": 7.0,
                "show_thinking": null
            }
        }"#;
        let record: StepRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.thinking, "");
        let Some(GameState::Snake(state)) = record.state else {
            panic!("expected a snake state");
        };
        assert_eq!(state.snake[0], (2, 2));
        assert_eq!(state.direction, Dir::Up);
        assert_eq!(state.game_turn, 21);
        assert_eq!(state.reward, 7.0);
        assert_eq!(state.obstacles, vec![(4, 3)]);
        assert_eq!(state.food[0].life(), 12);
        assert_eq!(state.show_thinking, None);
    }

    #[test]
    fn missing_state_stays_absent() {
        let record: StepRecord =
            serde_json::from_str(r#"{"step": 1, "score": 10, "thinking": "t"}"#).unwrap();
        assert_eq!(record.state, None);
    }

    #[test]
    fn malformed_state_degrades_to_absent() {
        let raw = r#"{"step": 2, "score": 0, "state": {"pos": "not a row"}}"#;
        let record: StepRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.state, None);

        let raw = r#"{"step": 3, "score": 0, "state": null}"#;
        let record: StepRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.state, None);
    }

    #[test]
    fn placeholder_set_has_fixed_shape() {
        let mut ticks = 0u32;
        let mut rand = move || {
            ticks += 1;
            (ticks % 10) as f64 / 10.0
        };
        let set = ReplaySet::placeholder(&mut rand);
        assert_eq!(set.total_steps(), PLACEHOLDER_STEPS);
        for strategy in Strategy::ALL {
            let run = set.run(strategy);
            assert_eq!(run.len(), PLACEHOLDER_STEPS);
            for (i, record) in run.iter().enumerate() {
                assert_eq!(record.step, i as u32);
                assert!(record.state.is_none());
                assert!(record.score >= 0.0);
                assert!(record.score < 150.0);
                assert!(record.thinking.starts_with(&format!("Step {}:", i + 1)));
            }
        }
    }

    #[test]
    fn car_length_is_clamped_to_sprite_classes() {
        assert_eq!(Car(Some(0.0), 1, Some(1.0), 0).length(), 1);
        assert_eq!(Car(Some(0.0), 1, Some(1.0), 9).length(), 4);
    }
}
