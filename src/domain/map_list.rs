use serde::{Deserialize, Serialize};

use crate::domain::map_pool::{ModeShort, ModeWithStage};
use crate::domain::{StageId, TeamId};

/// Откуда карта попала в список.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum MapListSource {
    /// Выбрана генератором / организатором (включая тайбрейкер).
    #[serde(rename = "TO")]
    TournamentOrganizer,
    /// Выбрана командой в ходе counterpick.
    #[serde(rename = "COUNTERPICK")]
    Counterpick,
}

/// Одна карта в списке карт матча.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TournamentMapListMap {
    pub mode: ModeShort,
    pub stage_id: StageId,
    pub source: MapListSource,
    /// Заполняется, когда команда забанила эту карту.
    pub banned_by_tournament_team_id: Option<TeamId>,
}

impl TournamentMapListMap {
    pub fn new(mode: ModeShort, stage_id: StageId, source: MapListSource) -> Self {
        Self {
            mode,
            stage_id,
            source,
            banned_by_tournament_team_id: None,
        }
    }

    pub fn mode_with_stage(&self) -> ModeWithStage {
        ModeWithStage::new(self.mode, self.stage_id)
    }

    pub fn is_banned(&self) -> bool {
        self.banned_by_tournament_team_id.is_some()
    }
}

/// Способ выбора режимов для автогенерации списков.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum MapPickingStyle {
    #[serde(rename = "AUTO_ALL")]
    AutoAll,
    #[serde(rename = "AUTO_SZ")]
    AutoSz,
    #[serde(rename = "AUTO_TC")]
    AutoTc,
    #[serde(rename = "AUTO_RM")]
    AutoRm,
    #[serde(rename = "AUTO_CB")]
    AutoCb,
}

impl MapPickingStyle {
    pub fn modes_included(&self) -> Vec<ModeShort> {
        match self {
            MapPickingStyle::AutoAll => ModeShort::RANKED.to_vec(),
            MapPickingStyle::AutoSz => vec![ModeShort::SZ],
            MapPickingStyle::AutoTc => vec![ModeShort::TC],
            MapPickingStyle::AutoRm => vec![ModeShort::RM],
            MapPickingStyle::AutoCb => vec![ModeShort::CB],
        }
    }

    /// Тайбрейкер-пул используется только при смешанных режимах.
    pub fn uses_tiebreaker(&self) -> bool {
        matches!(self, MapPickingStyle::AutoAll)
    }
}

/// Формат пиков/банов.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PickBanStyle {
    /// Список на best_of + 2 карты, каждая команда банит по одной.
    #[serde(rename = "BAN_2")]
    Ban2,
    /// Первая карта – стартер, дальше проигравший выбирает следующую.
    #[serde(rename = "COUNTERPICK")]
    Counterpick,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PickBanEventKind {
    #[serde(rename = "PICK")]
    Pick,
    #[serde(rename = "BAN")]
    Ban,
}

/// Событие пика/бана внутри матча.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickBanEvent {
    pub kind: PickBanEventKind,
    pub mode: ModeShort,
    pub stage_id: StageId,
    pub by_team: TeamId,
}

impl PickBanEvent {
    pub fn ban(by_team: TeamId, mode: ModeShort, stage_id: StageId) -> Self {
        Self {
            kind: PickBanEventKind::Ban,
            mode,
            stage_id,
            by_team,
        }
    }

    pub fn pick(by_team: TeamId, mode: ModeShort, stage_id: StageId) -> Self {
        Self {
            kind: PickBanEventKind::Pick,
            mode,
            stage_id,
            by_team,
        }
    }
}

/// Результат одной сыгранной карты серии.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameResult {
    pub mode: ModeShort,
    pub stage_id: StageId,
    pub winner_team_id: TeamId,
}
