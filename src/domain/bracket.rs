use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::matches::{Match, MatchSide, MatchStatus};
use crate::domain::team::TeamIdentifier;
use crate::domain::{MatchId, TeamId};

/// Формат сетки.
///
/// `RoundRobin` и `Swiss` существуют как значения (приходят из конфигов),
/// но построитель сетки их не поддерживает.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BracketType {
    #[serde(rename = "SE")]
    SingleElimination,
    #[serde(rename = "DE")]
    DoubleElimination,
    #[serde(rename = "RR")]
    RoundRobin,
    #[serde(rename = "SWISS")]
    Swiss,
}

impl BracketType {
    /// Короткий код формата ("SE", "DE", ...).
    pub fn code(&self) -> &'static str {
        match self {
            BracketType::SingleElimination => "SE",
            BracketType::DoubleElimination => "DE",
            BracketType::RoundRobin => "RR",
            BracketType::Swiss => "SWISS",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "SE" => Some(BracketType::SingleElimination),
            "DE" => Some(BracketType::DoubleElimination),
            "RR" => Some(BracketType::RoundRobin),
            "SWISS" => Some(BracketType::Swiss),
            _ => None,
        }
    }

    /// Умеет ли движок строить сетку такого формата.
    pub fn is_elimination(&self) -> bool {
        matches!(
            self,
            BracketType::SingleElimination | BracketType::DoubleElimination
        )
    }
}

impl fmt::Display for BracketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Общий статус сетки.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BracketStatus {
    InProgress,
    Complete,
}

/// Турнирная сетка: набор матчей, связанных через ID.
///
/// Матчи внутри каждой коллекции отсортированы по `position`.
/// Сетка принадлежит ровно одному турниру.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bracket {
    pub bracket_type: BracketType,
    pub winners: Vec<Match>,
    pub losers: Vec<Match>,
    /// Гранд-финал и (если понадобился) матч-ресет.
    pub finals: Vec<Match>,
    /// Реальных участников.
    pub participant_count: u32,
    /// Участников после добивки BYE до степени двойки.
    pub participants_with_byes_count: u32,
}

impl Bracket {
    /// Все матчи в порядке обхода (winners → losers → finals).
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.winners
            .iter()
            .chain(self.losers.iter())
            .chain(self.finals.iter())
    }

    pub fn matches_mut(&mut self) -> impl Iterator<Item = &mut Match> {
        self.winners
            .iter_mut()
            .chain(self.losers.iter_mut())
            .chain(self.finals.iter_mut())
    }

    pub fn match_count(&self) -> usize {
        self.winners.len() + self.losers.len() + self.finals.len()
    }

    pub fn get(&self, match_id: MatchId) -> Option<&Match> {
        self.matches().find(|m| m.id == match_id)
    }

    pub fn get_mut(&mut self, match_id: MatchId) -> Option<&mut Match> {
        self.matches_mut().find(|m| m.id == match_id)
    }

    pub fn side(&self, side: MatchSide) -> &[Match] {
        match side {
            MatchSide::Winners => &self.winners,
            MatchSide::Losers => &self.losers,
            MatchSide::Finals => &self.finals,
        }
    }

    pub fn match_status(&self, match_id: MatchId) -> Option<MatchStatus> {
        self.get(match_id).map(Match::status)
    }

    /// Номера раундов стороны по возрастанию, без повторов.
    pub fn round_positions(&self, side: MatchSide) -> Vec<u32> {
        let mut rounds: Vec<u32> = self.side(side).iter().map(|m| m.round).collect();
        rounds.sort_unstable();
        rounds.dedup();
        rounds
    }

    /// Финал сетки победителей (последний матч winners).
    pub fn winners_final(&self) -> Option<&Match> {
        self.winners.iter().max_by_key(|m| (m.round, m.position))
    }

    pub fn grand_final(&self) -> Option<&Match> {
        self.finals.iter().find(|m| m.is_grand_final())
    }

    pub fn bracket_reset(&self) -> Option<&Match> {
        self.finals.iter().find(|m| m.is_bracket_reset())
    }

    /// Следующий свободный ID матча.
    pub fn next_match_id(&self) -> MatchId {
        self.matches().map(|m| m.id).max().unwrap_or(0) + 1
    }

    pub fn next_position(&self) -> u32 {
        self.matches().map(|m| m.position).max().unwrap_or(0) + 1
    }

    pub fn next_number(&self) -> u32 {
        self.matches().map(|m| m.number).max().unwrap_or(0) + 1
    }

    pub fn byes_count(&self) -> u32 {
        self.participants_with_byes_count
            .saturating_sub(self.participant_count)
    }

    /// Статус сетки:
    /// - SE: решён финал сетки победителей;
    /// - DE: решён гранд-финал и ресет не нужен, либо решён ресет.
    pub fn status(&self) -> BracketStatus {
        let complete = match self.bracket_type {
            BracketType::DoubleElimination => match self.bracket_reset() {
                Some(reset) => reset.is_decided(),
                None => self.grand_final().map_or(false, |gf| {
                    gf.is_decided() && gf.winner == self.winners_final().and_then(|wf| wf.winner)
                }),
            },
            _ => self.winners_final().map_or(false, Match::is_decided),
        };

        if complete {
            BracketStatus::Complete
        } else {
            BracketStatus::InProgress
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status() == BracketStatus::Complete
    }

    /// Победитель всей сетки, если она завершена.
    pub fn champion(&self) -> Option<TeamId> {
        if !self.is_complete() {
            return None;
        }
        let deciding = match self.bracket_type {
            BracketType::DoubleElimination => self.bracket_reset().or(self.grand_final()),
            _ => self.winners_final(),
        };
        deciding.and_then(|m| m.winner).and_then(|w| w.team_id())
    }

    /// Участники, которые реально присутствуют в сетке (без BYE).
    pub fn teams(&self) -> Vec<TeamId> {
        let mut teams: Vec<TeamId> = self
            .winners
            .iter()
            .filter(|m| m.round == 1)
            .flat_map(|m| [m.upper_team, m.lower_team])
            .flatten()
            .filter_map(|t: TeamIdentifier| t.team_id())
            .collect();
        teams.sort_unstable();
        teams
    }
}
