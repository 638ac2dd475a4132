pub mod replay;
pub mod touch;

pub use replay::{FrameView, ReplaySession};
pub use touch::{SwipeAction, SwipeState};
