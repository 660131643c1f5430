// src/engine/builder.rs

use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, info};

use crate::domain::{Bracket, BracketType, Match, MatchId, MatchSide, TeamId, TeamIdentifier};
use crate::engine::errors::EngineError;
use crate::engine::history::ProgressionLog;
use crate::engine::progression::resolve_byes;
use crate::engine::seeding::{drop_ordering, participants_with_byes, seed_order};

/// Черновик сетки: матчи в порядке создания, `id = индекс + 1`.
#[derive(Default)]
struct Draft {
    matches: Vec<Match>,
}

impl Draft {
    fn create(&mut self, side: MatchSide, round: u32) -> MatchId {
        let id = self.matches.len() as MatchId + 1;
        self.matches.push(Match::new(id, side, round));
        id
    }

    fn get_mut(&mut self, id: MatchId) -> &mut Match {
        &mut self.matches[(id - 1) as usize]
    }

    fn side_of(&self, id: MatchId) -> MatchSide {
        self.matches[(id - 1) as usize].side
    }

    fn feed_winner(&mut self, source: MatchId, dest: MatchId) {
        self.get_mut(source).winner_destination = Some(dest);
    }

    fn feed_loser(&mut self, source: MatchId, dest: MatchId) {
        self.get_mut(source).loser_destination = Some(dest);
    }

    /// Источник из очереди нижней сетки: матч первого раунда winners
    /// отдаёт проигравшего, матч losers – победителя.
    fn feed_from_losers_queue(&mut self, source: MatchId, dest: MatchId) {
        if self.side_of(source) == MatchSide::Winners {
            self.feed_loser(source, dest);
        } else {
            self.feed_winner(source, dest);
        }
    }

    /// Разложить матчи по сторонам и проставить `position`
    /// (winners по раундам, затем losers, затем finals).
    fn into_bracket(
        self,
        bracket_type: BracketType,
        participant_count: u32,
        participants_with_byes_count: u32,
    ) -> Bracket {
        let mut winners = Vec::new();
        let mut losers = Vec::new();
        let mut finals = Vec::new();

        for m in self.matches {
            match m.side {
                MatchSide::Winners => winners.push(m),
                MatchSide::Losers => losers.push(m),
                MatchSide::Finals => finals.push(m),
            }
        }

        for side in [&mut winners, &mut losers, &mut finals] {
            side.sort_by_key(|m| (m.round, m.id));
        }

        let mut position = 0u32;
        for m in winners
            .iter_mut()
            .chain(losers.iter_mut())
            .chain(finals.iter_mut())
        {
            position += 1;
            m.position = position;
        }

        Bracket {
            bracket_type,
            winners,
            losers,
            finals,
            participant_count,
            participants_with_byes_count,
        }
    }
}

/// Построить сетку SE/DE.
///
/// - `seeds` – команды в порядке посева (лучшая первой), ровно `participant_count` штук;
/// - добивка BYE до степени двойки, BYE достаются топ-сидам;
/// - матчи с BYE сразу решаются и продвигаются дальше, их `number = 0`.
pub fn build_bracket(
    participant_count: u32,
    bracket_type: BracketType,
    seeds: &[TeamId],
) -> Result<Bracket, EngineError> {
    if participant_count < 2 {
        return Err(EngineError::Validation(format!(
            "для сетки нужно минимум 2 участника, получено {participant_count}"
        )));
    }

    if !bracket_type.is_elimination() {
        return Err(EngineError::UnsupportedBracketType(bracket_type));
    }

    if seeds.len() != participant_count as usize {
        return Err(EngineError::Validation(format!(
            "ожидалось {participant_count} сидов, получено {}",
            seeds.len()
        )));
    }

    let unique: BTreeSet<&TeamId> = seeds.iter().collect();
    if unique.len() != seeds.len() {
        return Err(EngineError::Validation(
            "команда встречается в посеве дважды".into(),
        ));
    }

    let size = participants_with_byes(participant_count);
    let mut draft = Draft::default();

    let slot = |seed: u32| -> TeamIdentifier {
        seeds
            .get(seed as usize - 1)
            .map(|id| TeamIdentifier::Team(*id))
            .unwrap_or(TeamIdentifier::Bye)
    };

    // Первый раунд winners по стандартному посеву.
    let mut current: Vec<MatchId> = Vec::with_capacity(size as usize / 2);
    for pair in seed_order(size).chunks(2) {
        let id = draft.create(MatchSide::Winners, 1);
        let m = draft.get_mut(id);
        m.upper_team = Some(slot(pair[0]));
        m.lower_team = Some(slot(pair[1]));
        current.push(id);
    }
    let first_round = current.clone();

    // Следующие раунды winners; проигравшие раундов 2+ падают в нижнюю сетку.
    let mut dropouts: Vec<Vec<MatchId>> = Vec::new();
    let mut round = 1;
    while current.len() > 1 {
        round += 1;
        let mut next = Vec::with_capacity(current.len() / 2);
        for pair in current.chunks(2) {
            let id = draft.create(MatchSide::Winners, round);
            draft.feed_winner(pair[0], id);
            draft.feed_winner(pair[1], id);
            next.push(id);
        }
        dropouts.push(next.clone());
        current = next;
    }
    let winners_final = current[0];

    if bracket_type == BracketType::DoubleElimination {
        let mut queue: VecDeque<MatchId> = first_round.into_iter().collect();
        let mut losers_round = 0;

        for (index, drop_round) in dropouts.into_iter().enumerate() {
            // Минорный раунд: выжившие нижней сетки играют между собой.
            losers_round += 1;
            let pairs = queue.len() / 2;
            for _ in 0..pairs {
                let (Some(a), Some(b)) = (queue.pop_front(), queue.pop_front()) else {
                    return Err(EngineError::Internal("очередь нижней сетки пуста"));
                };
                let id = draft.create(MatchSide::Losers, losers_round);
                draft.feed_from_losers_queue(a, id);
                draft.feed_from_losers_queue(b, id);
                queue.push_back(id);
            }

            // Мажорный раунд: выжившие против проигравших очередного раунда winners,
            // переставленных так, чтобы не повторять пары первого раунда.
            losers_round += 1;
            for dropped in drop_ordering(size, index).apply(&drop_round) {
                let Some(survivor) = queue.pop_front() else {
                    return Err(EngineError::Internal("очередь нижней сетки пуста"));
                };
                let id = draft.create(MatchSide::Losers, losers_round);
                draft.feed_from_losers_queue(survivor, id);
                draft.feed_loser(dropped, id);
                queue.push_back(id);
            }
        }

        let losers_final = queue
            .pop_front()
            .ok_or(EngineError::Internal("нет финала нижней сетки"))?;

        let grand_final = draft.create(MatchSide::Finals, 1);
        draft.feed_winner(winners_final, grand_final);
        draft.feed_from_losers_queue(losers_final, grand_final);
    }

    let mut bracket = draft.into_bracket(bracket_type, participant_count, size);

    let mut log = ProgressionLog::new();
    resolve_byes(&mut bracket, &mut log)?;
    debug!(events = log.events.len(), "bye matches resolved");

    // Номера для отображения: BYE-матчи скрыты.
    let mut number = 0u32;
    for m in bracket.matches_mut() {
        if m.has_bye() {
            m.number = 0;
        } else {
            number += 1;
            m.number = number;
        }
    }

    info!(
        bracket_type = %bracket_type,
        participants = participant_count,
        size,
        matches = bracket.match_count(),
        "bracket built"
    );

    Ok(bracket)
}
