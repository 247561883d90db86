//! Session layer tying the world, bridges, and synergy dispatcher together.

pub mod session;

pub use session::GameSession;
