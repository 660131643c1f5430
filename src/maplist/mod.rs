//! Детерминированные списки карт для матчей.
//!
//! - `generate_map_list` – список карт по seed матча;
//! - `pick_ban` – применение и проверка пиков/банов.

pub mod errors;
pub mod generator;
pub mod pick_ban;

pub use errors::MapListError;
pub use generator::{generate_map_list, MapListRequest};
pub use pick_ban::{
    check_pick_ban, is_legal, playable_maps, resolve_map_list, turn_of, unavailable_modes,
    unavailable_stages, PickBanContext,
};
