use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::StageId;

/// Режим игры (короткий код).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModeShort {
    TW,
    SZ,
    TC,
    RM,
    CB,
}

impl ModeShort {
    /// Режимы ранкеда – то, что идёт в AUTO_ALL.
    pub const RANKED: [ModeShort; 4] = [ModeShort::SZ, ModeShort::TC, ModeShort::RM, ModeShort::CB];

    pub fn code(&self) -> &'static str {
        match self {
            ModeShort::TW => "TW",
            ModeShort::SZ => "SZ",
            ModeShort::TC => "TC",
            ModeShort::RM => "RM",
            ModeShort::CB => "CB",
        }
    }
}

impl fmt::Display for ModeShort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Пара (режим, карта).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModeWithStage {
    pub mode: ModeShort,
    pub stage_id: StageId,
}

impl ModeWithStage {
    pub fn new(mode: ModeShort, stage_id: StageId) -> Self {
        Self { mode, stage_id }
    }
}

/// Пул карт: режим → упорядоченный список карт.
///
/// Порядок внутри режима на членство не влияет; генератор
/// сортирует карты перед перемешиванием.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MapPool {
    pub stages: BTreeMap<ModeShort, Vec<StageId>>,
}

impl MapPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = ModeWithStage>,
    {
        let mut pool = Self::new();
        for pair in pairs {
            pool.insert(pair.mode, pair.stage_id);
        }
        pool
    }

    /// Добавить карту в режим (дубли игнорируются).
    pub fn insert(&mut self, mode: ModeShort, stage_id: StageId) {
        let stages = self.stages.entry(mode).or_default();
        if !stages.contains(&stage_id) {
            stages.push(stage_id);
        }
    }

    pub fn with_mode(mut self, mode: ModeShort, stage_ids: &[StageId]) -> Self {
        for stage_id in stage_ids {
            self.insert(mode, *stage_id);
        }
        self
    }

    /// Карты режима (пусто, если режима в пуле нет).
    pub fn stages_for(&self, mode: ModeShort) -> &[StageId] {
        self.stages.get(&mode).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Отсортированные карты режима – вход для перемешивания.
    pub fn sorted_stages_for(&self, mode: ModeShort) -> Vec<StageId> {
        let mut stages = self.stages_for(mode).to_vec();
        stages.sort_unstable();
        stages.dedup();
        stages
    }

    /// Режимы, в которых есть хотя бы одна карта.
    pub fn modes(&self) -> Vec<ModeShort> {
        self.stages
            .iter()
            .filter(|(_, stages)| !stages.is_empty())
            .map(|(mode, _)| *mode)
            .collect()
    }

    pub fn contains(&self, mode: ModeShort, stage_id: StageId) -> bool {
        self.stages_for(mode).contains(&stage_id)
    }

    pub fn is_empty(&self) -> bool {
        self.stages.values().all(Vec::is_empty)
    }

    /// Все пары (режим, карта) пула.
    pub fn pairs(&self) -> Vec<ModeWithStage> {
        self.stages
            .iter()
            .flat_map(|(mode, stages)| stages.iter().map(move |s| ModeWithStage::new(*mode, *s)))
            .collect()
    }
}
