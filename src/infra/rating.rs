//! Связка с внешней рейтинговой системой.
//!
//! После каждого решённого репортом матча отдаём отчёт в `SkillRatingSink`.
//! Ошибки синка только логируются: прогресс сетки от них не зависит.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{MatchId, TeamId, UserId};
use crate::engine::ProgressionLog;

/// Что уходит в рейтинговую систему по одному матчу.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchOutcomeReport {
    pub match_id: MatchId,
    pub winner_team_id: TeamId,
    pub loser_team_id: TeamId,
    /// Игроки обеих команд: сначала победители, затем проигравшие.
    pub participant_user_ids: Vec<UserId>,
}

/// Получатель отчётов (внешний коллаборатор).
pub trait SkillRatingSink {
    fn submit(&mut self, report: MatchOutcomeReport) -> Result<(), String>;
}

/// Составы команд для отчёта.
pub trait RosterResolver {
    fn roster(&self, team_id: TeamId) -> Vec<UserId>;
}

impl<F> RosterResolver for F
where
    F: Fn(TeamId) -> Vec<UserId>,
{
    fn roster(&self, team_id: TeamId) -> Vec<UserId> {
        self(team_id)
    }
}

/// Отчёты по всем матчам лога, решённым репортом (BYE пропускаем).
pub fn reports_from_log(
    log: &ProgressionLog,
    rosters: &impl RosterResolver,
) -> Vec<MatchOutcomeReport> {
    log.reported_decisions()
        .map(|(match_id, winner, loser)| {
            let mut participant_user_ids = rosters.roster(winner);
            participant_user_ids.extend(rosters.roster(loser));
            MatchOutcomeReport {
                match_id,
                winner_team_id: winner,
                loser_team_id: loser,
                participant_user_ids,
            }
        })
        .collect()
}

/// Отправить отчёты в синк. Возвращает, сколько принято.
pub fn dispatch_rating_reports(
    log: &ProgressionLog,
    rosters: &impl RosterResolver,
    sink: &mut dyn SkillRatingSink,
) -> usize {
    let mut accepted = 0;
    for report in reports_from_log(log, rosters) {
        let match_id = report.match_id;
        match sink.submit(report) {
            Ok(()) => {
                accepted += 1;
                debug!(match_id, "rating report submitted");
            }
            Err(err) => {
                warn!(match_id, %err, "rating sink rejected report, progression continues");
            }
        }
    }
    accepted
}

/// Синк, который просто копит отчёты (тесты, локальный запуск).
#[derive(Clone, Debug, Default)]
pub struct CollectingRatingSink {
    pub reports: Vec<MatchOutcomeReport>,
}

impl SkillRatingSink for CollectingRatingSink {
    fn submit(&mut self, report: MatchOutcomeReport) -> Result<(), String> {
        self.reports.push(report);
        Ok(())
    }
}
