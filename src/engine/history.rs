use serde::{Deserialize, Serialize};

use crate::domain::{MatchId, TeamId, TeamIdentifier};

/// Тип события при продвижении по сетке.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProgressionEventKind {
    /// У матча появился победитель (репортом или из-за BYE).
    MatchDecided {
        match_id: MatchId,
        winner: TeamIdentifier,
        loser: TeamIdentifier,
        by_bye: bool,
    },

    /// Участник переведён в следующий матч.
    TeamAdvanced {
        from_match: MatchId,
        to_match: MatchId,
        team: TeamIdentifier,
    },

    /// Участник снят из матча при откате.
    TeamWithdrawn {
        match_id: MatchId,
        team: TeamIdentifier,
    },

    /// Результат матча откатан.
    ResultUndone { match_id: MatchId },

    /// Гранд-финал выиграла команда из нижней сетки – нужен ресет.
    BracketResetActivated { match_id: MatchId },

    /// Ресет убран (откат гранд-финала).
    BracketResetWithdrawn { match_id: MatchId },

    /// Сетка завершена.
    BracketCompleted { champion: TeamId },
}

/// Событие с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressionEvent {
    pub index: u32,
    pub kind: ProgressionEventKind,
}

/// Лог одной операции над сеткой.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressionLog {
    pub events: Vec<ProgressionEvent>,
}

impl ProgressionLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, kind: ProgressionEventKind) {
        let idx = self.events.len() as u32;
        self.events.push(ProgressionEvent { index: idx, kind });
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Решённые репортом матчи (без BYE): (match, winner, loser).
    pub fn reported_decisions(&self) -> impl Iterator<Item = (MatchId, TeamId, TeamId)> + '_ {
        self.events.iter().filter_map(|e| match e.kind {
            ProgressionEventKind::MatchDecided {
                match_id,
                winner,
                loser,
                by_bye: false,
            } => Some((match_id, winner.team_id()?, loser.team_id()?)),
            _ => None,
        })
    }

    pub fn completed_champion(&self) -> Option<TeamId> {
        self.events.iter().find_map(|e| match e.kind {
            ProgressionEventKind::BracketCompleted { champion } => Some(champion),
            _ => None,
        })
    }
}
