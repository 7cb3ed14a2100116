pub mod game_task;
pub mod progress;
pub mod split_row;

pub use game_task::{GameRef, GameStatus, GameTask};
pub use progress::{DebugSnapshot, ProgressHandle, ProgressState};
pub use split_row::{SideSplit, SplitRow, SplitStat, SplitType};
