// libs/consultation-session-cell/src/services/mod.rs

pub mod countdown;
pub mod gate;
pub mod registry;
pub mod room;

pub use gate::SessionGate;
pub use registry::ConsultationRegistry;
pub use room::RoomLink;
