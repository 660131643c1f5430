// src/domain/matches.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::team::TeamIdentifier;
use crate::domain::MatchId;

/// Сторона сетки, к которой относится матч.
///
/// `Finals` – гранд-финал (раунд 1) и матч-ресет (раунд 2) в double elimination.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchSide {
    Winners,
    Losers,
    Finals,
}

impl fmt::Display for MatchSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchSide::Winners => "Winners",
            MatchSide::Losers => "Losers",
            MatchSide::Finals => "Finals",
        };
        f.write_str(s)
    }
}

/// Статус матча внутри сетки.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchStatus {
    /// Хотя бы один слот ещё пуст.
    Pending,
    /// Оба участника известны, результата нет.
    Ready,
    /// Победитель определён.
    Decided,
}

/// Счёт серии (по картам) – опционально приходит вместе с результатом.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreDetail {
    pub upper: u32,
    pub lower: u32,
}

/// Матч сетки.
///
/// Связи между матчами – только через `MatchId` (индекс в сетке),
/// никаких ссылок на объекты.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Match {
    /// Стабильный ID (порядок создания).
    pub id: MatchId,
    /// Номер для отображения. 0 = матч скрыт (например, решён BYE).
    pub number: u32,
    /// Порядковый номер обхода (> 0, не переиспользуется).
    pub position: u32,
    pub side: MatchSide,
    /// Номер раунда внутри своей стороны, с 1.
    pub round: u32,
    pub upper_team: Option<TeamIdentifier>,
    pub lower_team: Option<TeamIdentifier>,
    pub winner: Option<TeamIdentifier>,
    pub score: Option<ScoreDetail>,
    pub winner_destination: Option<MatchId>,
    pub loser_destination: Option<MatchId>,
}

impl Match {
    pub fn new(id: MatchId, side: MatchSide, round: u32) -> Self {
        Self {
            id,
            number: 0,
            position: 0,
            side,
            round,
            upper_team: None,
            lower_team: None,
            winner: None,
            score: None,
            winner_destination: None,
            loser_destination: None,
        }
    }

    pub fn status(&self) -> MatchStatus {
        if self.winner.is_some() {
            MatchStatus::Decided
        } else if self.upper_team.is_some() && self.lower_team.is_some() {
            MatchStatus::Ready
        } else {
            MatchStatus::Pending
        }
    }

    #[inline]
    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    /// Есть ли в матче BYE-слот.
    pub fn has_bye(&self) -> bool {
        self.upper_team.map_or(false, |t| t.is_bye())
            || self.lower_team.map_or(false, |t| t.is_bye())
    }

    /// Матч решён автоматически из-за BYE, а не репортом.
    pub fn is_bye_resolved(&self) -> bool {
        self.is_decided() && self.has_bye()
    }

    pub fn is_grand_final(&self) -> bool {
        self.side == MatchSide::Finals && self.round == 1
    }

    pub fn is_bracket_reset(&self) -> bool {
        self.side == MatchSide::Finals && self.round == 2
    }

    /// Участвует ли `team` в этом матче.
    pub fn contains(&self, team: TeamIdentifier) -> bool {
        self.upper_team == Some(team) || self.lower_team == Some(team)
    }

    /// Соперник `team` в этом матче.
    pub fn opponent_of(&self, team: TeamIdentifier) -> Option<TeamIdentifier> {
        if self.upper_team == Some(team) {
            self.lower_team
        } else if self.lower_team == Some(team) {
            self.upper_team
        } else {
            None
        }
    }

    /// Проигравший решённого матча.
    pub fn loser(&self) -> Option<TeamIdentifier> {
        self.winner.and_then(|w| self.opponent_of(w))
    }

    /// Если оба слота заполнены, один из них BYE и победителя ещё нет –
    /// кто проходит автоматически (BYE, если оба слота BYE).
    pub fn bye_winner(&self) -> Option<TeamIdentifier> {
        if self.winner.is_some() {
            return None;
        }
        match (self.upper_team, self.lower_team) {
            (Some(TeamIdentifier::Bye), Some(other)) => Some(other),
            (Some(other), Some(TeamIdentifier::Bye)) => Some(other),
            _ => None,
        }
    }

    /// Положить участника в первый свободный слот.
    /// Возвращает false, если оба слота заняты.
    pub fn place_in_first_empty(&mut self, team: TeamIdentifier) -> bool {
        if self.upper_team.is_none() {
            self.upper_team = Some(team);
            true
        } else if self.lower_team.is_none() {
            self.lower_team = Some(team);
            true
        } else {
            false
        }
    }

    /// Снять участника из слота (обратная операция к `place_in_first_empty`).
    /// Нижний слот заполняется вторым, поэтому проверяем его первым.
    pub fn remove_from_slot(&mut self, team: TeamIdentifier) -> bool {
        if self.lower_team == Some(team) {
            self.lower_team = None;
            true
        } else if self.upper_team == Some(team) {
            self.upper_team = None;
            true
        } else {
            false
        }
    }
}
