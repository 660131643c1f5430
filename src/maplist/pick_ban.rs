//! Правила пиков и банов поверх сгенерированного списка карт.
//!
//! - BAN_2: каждая команда банит по одной карте из списка `best_of + 2`,
//!   первой банит вторая команда пары (нижний сид);
//! - COUNTERPICK: после каждой карты проигравший выбирает следующую.

use std::collections::BTreeSet;

use tracing::warn;

use crate::domain::{
    BestOf, GameResult, MapListSource, MapPool, ModeShort, PickBanEvent, PickBanEventKind,
    PickBanStyle, StageId, TeamId, TournamentMapListMap,
};

/// Применить события к базовому списку.
///
/// BAN помечает карту `banned_by_tournament_team_id` (карта остаётся в
/// списке для истории), PICK добавляет карту с источником COUNTERPICK.
pub fn resolve_map_list(
    base: Vec<TournamentMapListMap>,
    style: Option<PickBanStyle>,
    events: &[PickBanEvent],
) -> Vec<TournamentMapListMap> {
    let mut list = base;

    for event in events {
        match (event.kind, style) {
            (PickBanEventKind::Ban, Some(PickBanStyle::Ban2)) => {
                let target = list.iter_mut().find(|m| {
                    m.mode == event.mode && m.stage_id == event.stage_id && !m.is_banned()
                });
                match target {
                    Some(entry) => entry.banned_by_tournament_team_id = Some(event.by_team),
                    None => warn!(
                        mode = %event.mode,
                        stage_id = event.stage_id,
                        "ban does not match any map in the list"
                    ),
                }
            }
            (PickBanEventKind::Pick, Some(PickBanStyle::Counterpick)) => {
                list.push(TournamentMapListMap::new(
                    event.mode,
                    event.stage_id,
                    MapListSource::Counterpick,
                ));
            }
            (kind, style) => {
                warn!(?kind, ?style, "pick/ban event ignored for this style");
            }
        }
    }

    list
}

/// Карты, которые реально будут сыграны (без забаненных), по порядку.
pub fn playable_maps(list: &[TournamentMapListMap]) -> Vec<TournamentMapListMap> {
    list.iter().filter(|m| !m.is_banned()).copied().collect()
}

fn score_of(teams: [TeamId; 2], results: &[GameResult]) -> [u32; 2] {
    let mut score = [0u32; 2];
    for r in results {
        if r.winner_team_id == teams[0] {
            score[0] += 1;
        } else if r.winner_team_id == teams[1] {
            score[1] += 1;
        }
    }
    score
}

/// Чья очередь пикать/банить. None – сейчас никто.
pub fn turn_of(
    style: PickBanStyle,
    teams: [TeamId; 2],
    results: &[GameResult],
    map_list: &[TournamentMapListMap],
    best_of: BestOf,
) -> Option<TeamId> {
    match style {
        PickBanStyle::Ban2 => {
            let [second_picker, first_picker] = teams;
            let banned_by = |team: TeamId| {
                map_list
                    .iter()
                    .any(|m| m.banned_by_tournament_team_id == Some(team))
            };

            if !banned_by(first_picker) {
                Some(first_picker)
            } else if !banned_by(second_picker) {
                Some(second_picker)
            } else {
                None
            }
        }
        PickBanStyle::Counterpick => {
            // Стартовую карту никто не выбирает.
            let latest = results.last()?;

            // Пик уже сделан и ещё не сыгран.
            if map_list.len() > results.len() {
                return None;
            }

            if best_of.is_set_over_by_score(score_of(teams, results)) {
                return None;
            }

            teams
                .iter()
                .copied()
                .find(|team| *team != latest.winner_team_id)
        }
    }
}

/// Карты, которые нельзя выбрать/забанить прямо сейчас.
///
/// COUNTERPICK – уже сыгранные карты; BAN_2 – уже забаненные.
pub fn unavailable_stages(
    style: PickBanStyle,
    results: &[GameResult],
    map_list: &[TournamentMapListMap],
) -> BTreeSet<StageId> {
    match style {
        PickBanStyle::Counterpick => results.iter().map(|r| r.stage_id).collect(),
        PickBanStyle::Ban2 => map_list
            .iter()
            .filter(|m| m.is_banned())
            .map(|m| m.stage_id)
            .collect(),
    }
}

/// Режимы, в которых `picker` уже выигрывал (COUNTERPICK).
pub fn unavailable_modes(
    style: PickBanStyle,
    results: &[GameResult],
    picker: TeamId,
) -> BTreeSet<ModeShort> {
    match style {
        PickBanStyle::Counterpick => results
            .iter()
            .filter(|r| r.winner_team_id == picker)
            .map(|r| r.mode)
            .collect(),
        PickBanStyle::Ban2 => BTreeSet::new(),
    }
}

/// Всё, что нужно для проверки одного события.
#[derive(Clone, Copy, Debug)]
pub struct PickBanContext<'a> {
    pub style: PickBanStyle,
    pub teams: [TeamId; 2],
    pub best_of: BestOf,
    pub results: &'a [GameResult],
    pub map_list: &'a [TournamentMapListMap],
    /// Пул, из которого разрешены пики (COUNTERPICK).
    pub pool: &'a MapPool,
}

/// Проверить событие. Err – человекочитаемая причина отказа.
pub fn check_pick_ban(ctx: &PickBanContext<'_>, event: &PickBanEvent) -> Result<(), String> {
    let expected = turn_of(ctx.style, ctx.teams, ctx.results, ctx.map_list, ctx.best_of);
    if expected != Some(event.by_team) {
        return Err(format!("it is not team {}'s turn", event.by_team));
    }

    match (ctx.style, event.kind) {
        (PickBanStyle::Ban2, PickBanEventKind::Ban) => {
            let in_list = ctx.map_list.iter().any(|m| {
                m.mode == event.mode && m.stage_id == event.stage_id && !m.is_banned()
            });
            if !in_list {
                return Err("banned map is not in the map list".into());
            }
            Ok(())
        }
        (PickBanStyle::Counterpick, PickBanEventKind::Pick) => {
            if !ctx.pool.contains(event.mode, event.stage_id) {
                return Err("picked map is not in the pool".into());
            }

            if unavailable_stages(ctx.style, ctx.results, ctx.map_list).contains(&event.stage_id) {
                return Err("stage was already played".into());
            }

            // Если выигранные режимы закрывают весь пул – ограничение снимается.
            let blocked = unavailable_modes(ctx.style, ctx.results, event.by_team);
            let any_open = ctx.pool.modes().iter().any(|m| !blocked.contains(m));
            if any_open && blocked.contains(&event.mode) {
                return Err(format!("team already won a game on {}", event.mode));
            }
            Ok(())
        }
        (style, kind) => Err(format!("{kind:?} is not allowed with {style:?}")),
    }
}

pub fn is_legal(ctx: &PickBanContext<'_>, event: &PickBanEvent) -> bool {
    check_pick_ban(ctx, event).is_ok()
}
