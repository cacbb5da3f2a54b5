//! Session lifecycle: the registry of games and the controller that runs
//! at most one of them.

mod controller;
mod game_session;
mod registry;

pub use controller::SessionController;
pub use game_session::{
    FrameReport, GameSession, SessionEnd, SessionHandle, SessionId, SessionStatus, SessionSummary,
};
pub use registry::{EngineFactory, EnginePair, GameRegistry};
