pub mod game_ctx;
pub mod game_flow;

pub use game_ctx::GameCtx;
pub use game_flow::{GameFlow, GameResult};
