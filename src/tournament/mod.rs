// src/tournament/mod.rs

pub mod hosting;
pub mod lobby;
pub mod runtime;

pub use hosting::{resolve_hosting_team, resolve_room_pass};
pub use lobby::TournamentLobby;
pub use runtime::TournamentRuntime;
