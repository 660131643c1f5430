// src/maplist/generator.rs

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    BestOf, MapListSource, MapPool, ModeShort, ModeWithStage, PickBanEvent, PickBanStyle, StageId,
    TournamentMapListMap,
};
use crate::engine::RandomSource;
use crate::infra::rng::DeterministicRng;
use crate::infra::rng_seed::RngSeed;
use crate::maplist::errors::MapListError;
use crate::maplist::pick_ban::resolve_map_list;

/// Всё, что нужно генератору для одного матча.
///
/// Одинаковый запрос всегда даёт одинаковый список:
/// RNG создаётся из `seed` заново при каждом вызове.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MapListRequest {
    pub seed: RngSeed,
    pub best_of: BestOf,
    /// Режимы матча по порядку (дубли игнорируются).
    pub modes_included: Vec<ModeShort>,
    /// Карты по режимам.
    pub map_pool: MapPool,
    /// Пул для решающей карты. Может быть пустым.
    pub tiebreaker_maps: Vec<ModeWithStage>,
    /// Любимые режимы обеих команд, если известны.
    pub team_mode_preferences: Option<[Vec<ModeShort>; 2]>,
    pub pick_ban: Option<PickBanStyle>,
    /// Уже сделанные пики/баны.
    pub events: Vec<PickBanEvent>,
}

impl MapListRequest {
    pub fn new(
        seed: RngSeed,
        best_of: BestOf,
        modes_included: Vec<ModeShort>,
        map_pool: MapPool,
    ) -> Self {
        Self {
            seed,
            best_of,
            modes_included,
            map_pool,
            tiebreaker_maps: Vec::new(),
            team_mode_preferences: None,
            pick_ban: None,
            events: Vec::new(),
        }
    }

    pub fn with_tiebreakers(mut self, tiebreaker_maps: Vec<ModeWithStage>) -> Self {
        self.tiebreaker_maps = tiebreaker_maps;
        self
    }

    pub fn with_team_preferences(mut self, first: Vec<ModeShort>, second: Vec<ModeShort>) -> Self {
        self.team_mode_preferences = Some([first, second]);
        self
    }

    pub fn with_pick_ban(mut self, style: PickBanStyle, events: Vec<PickBanEvent>) -> Self {
        self.pick_ban = Some(style);
        self.events = events;
        self
    }

    /// Режимы без повторов, в исходном порядке.
    fn distinct_modes(&self) -> Vec<ModeShort> {
        let mut modes = Vec::with_capacity(self.modes_included.len());
        for mode in &self.modes_included {
            if !modes.contains(mode) {
                modes.push(*mode);
            }
        }
        modes
    }

    /// Режимы, которые любят обе команды.
    fn common_modes(&self) -> Vec<ModeShort> {
        match &self.team_mode_preferences {
            Some([first, second]) => first.iter().filter(|m| second.contains(*m)).copied().collect(),
            None => Vec::new(),
        }
    }
}

/// Сгенерировать список карт матча.
///
/// - без пиков/банов: `best_of` карт, последняя – из тайбрейкеров (если они есть);
/// - BAN_2: `best_of + 2` карт, тайбрейкер не используется;
/// - COUNTERPICK: только стартовая карта (из тайбрейкеров, иначе пусто),
///   дальше карты добавляют пики команд.
pub fn generate_map_list(request: &MapListRequest) -> Result<Vec<TournamentMapListMap>, MapListError> {
    let modes = request.distinct_modes();
    if modes.is_empty() {
        return Err(MapListError::NoModesAvailable);
    }

    let mut rng = request.seed.to_rng();

    let base = match request.pick_ban {
        Some(PickBanStyle::Counterpick) => counterpick_starter(&request.tiebreaker_maps, &mut rng)?,
        style => {
            let total = request.best_of.count() + if style.is_some() { 2 } else { 0 };
            let use_tiebreaker = style.is_none() && !request.tiebreaker_maps.is_empty();
            let regular_games = if use_tiebreaker { total - 1 } else { total };

            let mut mode_order = modes;
            rng.shuffle(&mut mode_order);
            let common = request.common_modes();

            let mut list: Vec<TournamentMapListMap> = Vec::with_capacity(total);
            for _ in 0..regular_games {
                let mode = select_mode(&mode_order, &list, &common)?;
                let stage_id = select_stage(mode, &request.map_pool, &list, &mut rng)?;
                list.push(TournamentMapListMap::new(
                    mode,
                    stage_id,
                    MapListSource::TournamentOrganizer,
                ));
            }

            if use_tiebreaker {
                list.push(select_tiebreaker(&request.tiebreaker_maps, &list, &mut rng)?);
            }
            list
        }
    };

    debug!(
        best_of = %request.best_of,
        maps = base.len(),
        events = request.events.len(),
        "map list generated"
    );

    Ok(resolve_map_list(base, request.pick_ban, &request.events))
}

/// Режим следующей карты: сначала несыгранные (общие для команд – первыми),
/// потом наименее сыгранные без повтора подряд; ничьи – по перемешанному порядку.
fn select_mode(
    mode_order: &[ModeShort],
    list: &[TournamentMapListMap],
    common: &[ModeShort],
) -> Result<ModeShort, MapListError> {
    let previous = list.last().map(|m| m.mode);

    mode_order
        .iter()
        .enumerate()
        .min_by_key(|(idx, mode)| {
            let played = list.iter().filter(|m| m.mode == **mode).count();
            (played, previous == Some(**mode), !common.contains(*mode), *idx)
        })
        .map(|(_, mode)| *mode)
        .ok_or(MapListError::NoModesAvailable)
}

/// Карта для режима: перемешанный отсортированный пул режима,
/// неиспользованные в матче – первыми, без повтора подряд.
fn select_stage(
    mode: ModeShort,
    pool: &MapPool,
    list: &[TournamentMapListMap],
    rng: &mut DeterministicRng,
) -> Result<StageId, MapListError> {
    let mut stages = pool.sorted_stages_for(mode);
    if stages.is_empty() {
        return Err(MapListError::NoStagesAvailable { mode });
    }
    rng.shuffle(&mut stages);

    let previous = list.last().map(|m| m.stage_id);

    stages
        .iter()
        .enumerate()
        .min_by_key(|(idx, stage)| {
            let used = list.iter().filter(|m| m.stage_id == **stage).count();
            (used, previous == Some(**stage), *idx)
        })
        .map(|(_, stage)| *stage)
        .ok_or(MapListError::NoStagesAvailable { mode })
}

fn select_tiebreaker(
    tiebreakers: &[ModeWithStage],
    list: &[TournamentMapListMap],
    rng: &mut DeterministicRng,
) -> Result<TournamentMapListMap, MapListError> {
    let mut candidates = tiebreakers.to_vec();
    candidates.sort_unstable();
    candidates.dedup();
    rng.shuffle(&mut candidates);

    // Сначала неиспользованные стейджи. Если все уже были, берём наименее
    // сыгранный, но не стейдж предыдущей карты, пока есть другой кандидат.
    let previous = list.last();
    let pick = candidates
        .iter()
        .enumerate()
        .min_by_key(|(idx, c)| {
            let used = list.iter().filter(|m| m.stage_id == c.stage_id).count();
            let same_stage = previous.is_some_and(|p| p.stage_id == c.stage_id);
            let same_mode = previous.is_some_and(|p| p.mode == c.mode);
            (same_stage, used, same_mode, *idx)
        })
        .map(|(_, c)| *c)
        .ok_or_else(|| MapListError::Validation("tiebreaker pool is empty".into()))?;

    Ok(TournamentMapListMap::new(
        pick.mode,
        pick.stage_id,
        MapListSource::TournamentOrganizer,
    ))
}

fn counterpick_starter(
    tiebreakers: &[ModeWithStage],
    rng: &mut DeterministicRng,
) -> Result<Vec<TournamentMapListMap>, MapListError> {
    if tiebreakers.is_empty() {
        debug!("no tiebreaker pool, counterpick starts without a starter map");
        return Ok(Vec::new());
    }
    Ok(vec![select_tiebreaker(tiebreakers, &[], rng)?])
}
