use std::sync::{Arc, Mutex};

use bracket_engine::domain::tournament::{
    RoundBestOf, TeamRegistration, TournamentConfig, TournamentError, TournamentStatus,
};
use bracket_engine::domain::{
    BestOf, BracketType, MapPickingStyle, MapPool, MatchId, MatchSide, MatchStatus, ModeShort,
    ModeWithStage, PickBanEvent, PickBanStyle, ScoreDetail, TeamId, TournamentId,
};
use bracket_engine::infra::{MatchOutcomeReport, SkillRatingSink};
use bracket_engine::tournament::{TournamentLobby, TournamentRuntime};

fn make_config(bracket_type: BracketType) -> TournamentConfig {
    TournamentConfig {
        name: "Test Cup".to_string(),
        description: None,
        bracket_type,
        max_teams: 8,
        min_teams_to_start: 2,
        map_picking_style: MapPickingStyle::AutoAll,
        map_pool: MapPool::new()
            .with_mode(ModeShort::SZ, &[1, 2])
            .with_mode(ModeShort::TC, &[3, 4])
            .with_mode(ModeShort::RM, &[5, 6])
            .with_mode(ModeShort::CB, &[7, 8]),
        tiebreaker_maps: vec![ModeWithStage::new(ModeShort::SZ, 1)],
        pick_ban: None,
        best_of_overrides: Vec::new(),
    }
}

/// Утилита: турнир с `n` отметившимися командами, ID команд возвращаются.
fn lobby_with_teams(config: TournamentConfig, n: u32) -> (TournamentLobby, TournamentId, Vec<TeamId>) {
    let mut lobby = TournamentLobby::new();
    let tid = lobby.create_tournament(1, config).unwrap();

    let mut teams = Vec::new();
    for i in 0..n {
        let team_id = lobby.next_team_id();
        let mut reg = TeamRegistration::new(team_id, format!("Team {i}"));
        reg.member_user_ids = vec![team_id * 100, team_id * 100 + 1];
        lobby.register_team(tid, reg).unwrap();
        lobby.check_in(tid, team_id).unwrap();
        teams.push(team_id);
    }
    (lobby, tid, teams)
}

fn ready_matches(lobby: &TournamentLobby, tid: TournamentId) -> Vec<MatchId> {
    lobby
        .tournament(tid)
        .unwrap()
        .bracket()
        .unwrap()
        .matches()
        .filter(|m| m.status() == MatchStatus::Ready)
        .map(|m| m.id)
        .collect()
}

/// Сыграть все матчи: побеждает верхний слот.
fn play_out(lobby: &mut TournamentLobby, tid: TournamentId) {
    while let Some(match_id) = ready_matches(lobby, tid).first().copied() {
        let [upper, _] = TournamentRuntime::match_teams(lobby.tournament(tid).unwrap(), match_id).unwrap();
        lobby.report_result(tid, match_id, upper, None).unwrap();
    }
}

//
// TEST 1 — создание турниров выдаёт последовательные ID
//
#[test]
fn create_tournament_assigns_ids() {
    let mut lobby = TournamentLobby::new();
    let a = lobby.create_tournament(1, make_config(BracketType::SingleElimination)).unwrap();
    let b = lobby.create_tournament(1, make_config(BracketType::DoubleElimination)).unwrap();

    assert_eq!((a, b), (1, 2));
    assert_eq!(lobby.all().count(), 2);
    assert_eq!(lobby.get(a).unwrap().status, TournamentStatus::Registering);
}

//
// TEST 2 — невалидные конфиги
//
#[test]
fn invalid_configs_are_rejected() {
    let mut lobby = TournamentLobby::new();

    let mut cfg = make_config(BracketType::SingleElimination);
    cfg.name = "  ".into();
    assert!(matches!(lobby.create_tournament(1, cfg), Err(TournamentError::InvalidConfig(_))));

    let cfg = make_config(BracketType::Swiss);
    assert!(matches!(
        lobby.create_tournament(1, cfg),
        Err(TournamentError::UnsupportedFormat { bracket_type: BracketType::Swiss })
    ));

    let mut cfg = make_config(BracketType::SingleElimination);
    cfg.map_pool = MapPool::new().with_mode(ModeShort::SZ, &[1]);
    assert!(matches!(lobby.create_tournament(1, cfg), Err(TournamentError::InvalidConfig(_))));

    let mut cfg = make_config(BracketType::SingleElimination);
    cfg.min_teams_to_start = 10;
    assert!(matches!(lobby.create_tournament(1, cfg), Err(TournamentError::InvalidConfig(_))));

    let mut cfg = make_config(BracketType::SingleElimination);
    cfg.tiebreaker_maps.push(ModeWithStage::new(ModeShort::SZ, 1));
    assert!(matches!(lobby.create_tournament(1, cfg), Err(TournamentError::InvalidConfig(_))));

    // Одиночный режим: в пуле нужны только его карты.
    let mut cfg = make_config(BracketType::SingleElimination);
    cfg.map_picking_style = MapPickingStyle::AutoSz;
    cfg.map_pool = MapPool::new().with_mode(ModeShort::SZ, &[1, 2]);
    assert!(lobby.create_tournament(1, cfg).is_ok());

    assert_eq!(lobby.all().count(), 1);
}

//
// TEST 3 — регистрация: дубли, лимит, неизвестный турнир
//
#[test]
fn registration_rules() {
    let mut cfg = make_config(BracketType::SingleElimination);
    cfg.max_teams = 2;
    let (mut lobby, tid, teams) = lobby_with_teams(cfg, 2);

    let dup = TeamRegistration::new(teams[0], "Again");
    assert!(matches!(
        lobby.register_team(tid, dup),
        Err(TournamentError::TournamentFull { .. })
    ));

    lobby.unregister_team(tid, teams[1]).unwrap();
    let dup = TeamRegistration::new(teams[0], "Again");
    assert!(matches!(
        lobby.register_team(tid, dup),
        Err(TournamentError::TeamAlreadyRegistered { .. })
    ));

    assert!(matches!(
        lobby.register_team(99, TeamRegistration::new(50, "Ghost")),
        Err(TournamentError::TournamentNotFound { tournament_id: 99 })
    ));
    assert!(matches!(
        lobby.check_in(tid, 12345),
        Err(TournamentError::TeamNotRegistered { team_id: 12345, .. })
    ));
}

//
// TEST 4 — старт требует минимум отметившихся команд
//
#[test]
fn start_requires_checked_in_teams() {
    let (mut lobby, tid, teams) = lobby_with_teams(make_config(BracketType::SingleElimination), 3);

    lobby.check_out(tid, teams[0]).unwrap();
    lobby.check_out(tid, teams[1]).unwrap();

    assert!(matches!(
        lobby.start_tournament(tid),
        Err(TournamentError::NotEnoughTeams { checked_in: 1, required: 2 })
    ));

    lobby.check_in(tid, teams[1]).unwrap();
    lobby.start_tournament(tid).unwrap();

    let t = lobby.tournament(tid).unwrap();
    assert_eq!(t.status, TournamentStatus::Running);
    // Неотметившаяся команда в сетку не попала.
    assert_eq!(t.bracket().unwrap().teams(), vec![teams[1], teams[2]]);

    assert!(matches!(
        lobby.start_tournament(tid),
        Err(TournamentError::InvalidStatus { .. })
    ));
    assert!(matches!(
        lobby.register_team(tid, TeamRegistration::new(77, "Late")),
        Err(TournamentError::InvalidStatus { .. })
    ));
}

//
// TEST 5 — посев определяет пары первого раунда
//
#[test]
fn seeding_orders_bracket() {
    let (mut lobby, tid, teams) = lobby_with_teams(make_config(BracketType::SingleElimination), 4);

    lobby.set_seeding(tid, &[teams[3], teams[0]]).unwrap();
    let t = lobby.tournament(tid).unwrap();
    assert_eq!(t.seeded_team_ids(), vec![teams[3], teams[0], teams[1], teams[2]]);

    assert!(matches!(
        lobby.set_seeding(tid, &[teams[0], teams[0]]),
        Err(TournamentError::InvalidSeeding(_))
    ));

    lobby.start_tournament(tid).unwrap();
    let bracket = lobby.tournament(tid).unwrap().bracket().unwrap().clone();
    let first = &bracket.winners[0];
    // Сид 1 против сида 4.
    assert_eq!(first.upper_team.and_then(|t| t.team_id()), Some(teams[3]));
    assert_eq!(first.lower_team.and_then(|t| t.team_id()), Some(teams[2]));
}

//
// TEST 6 — счёт должен завершать серию раунда
//
#[test]
fn score_must_finish_the_set() {
    let (mut lobby, tid, _) = lobby_with_teams(make_config(BracketType::SingleElimination), 4);
    lobby.start_tournament(tid).unwrap();

    let match_id = ready_matches(&lobby, tid)[0];
    let [upper, _] = TournamentRuntime::match_teams(lobby.tournament(tid).unwrap(), match_id).unwrap();

    for (u, l) in [(1, 0), (3, 0), (7, 2), (2, 5), (2, 2)] {
        assert!(
            matches!(
                lobby.report_result(tid, match_id, upper, Some(ScoreDetail { upper: u, lower: l })),
                Err(TournamentError::ScoreDoesNotFinishSet { best_of: BestOf::Three, .. })
            ),
            "score {u}:{l} must be rejected for Bo3"
        );
    }
    assert!(lobby.tournament(tid).unwrap().bracket().unwrap().get(match_id).unwrap().winner.is_none());

    lobby
        .report_result(tid, match_id, upper, Some(ScoreDetail { upper: 2, lower: 1 }))
        .unwrap();
}

//
// TEST 7 — ручная длина серии для раунда
//
#[test]
fn best_of_override_applies() {
    let mut cfg = make_config(BracketType::SingleElimination);
    cfg.best_of_overrides = vec![RoundBestOf {
        side: MatchSide::Winners,
        round: 1,
        best_of: BestOf::Five,
    }];
    let (mut lobby, tid, _) = lobby_with_teams(cfg, 4);
    lobby.start_tournament(tid).unwrap();

    let t = lobby.tournament(tid).unwrap();
    let match_id = ready_matches(&lobby, tid)[0];
    assert_eq!(TournamentRuntime::best_of_for_match(t, match_id).unwrap(), BestOf::Five);
    assert_eq!(lobby.map_list(tid, match_id).unwrap().len(), 5);
}

//
// TEST 8 — турнир завершается и снова открывается откатом
//
#[test]
fn tournament_finishes_and_reopens_on_undo() {
    let (mut lobby, tid, teams) = lobby_with_teams(make_config(BracketType::DoubleElimination), 4);
    lobby.start_tournament(tid).unwrap();

    play_out(&mut lobby, tid);

    let t = lobby.tournament(tid).unwrap();
    assert_eq!(t.status, TournamentStatus::Finished);
    assert_eq!(t.winner_team_id, Some(teams[0]));

    let gf = t.bracket().unwrap().grand_final().unwrap().id;
    lobby.undo_result(tid, gf).unwrap();

    let t = lobby.tournament(tid).unwrap();
    assert_eq!(t.status, TournamentStatus::Running);
    assert_eq!(t.winner_team_id, None);
}

/// Приёмник рейтинга, который можно прочитать после передачи в лобби.
#[derive(Clone, Default)]
struct SharedSink {
    reports: Arc<Mutex<Vec<MatchOutcomeReport>>>,
    fail: bool,
}

impl SkillRatingSink for SharedSink {
    fn submit(&mut self, report: MatchOutcomeReport) -> Result<(), String> {
        if self.fail {
            return Err("rating service unavailable".into());
        }
        self.reports.lock().unwrap().push(report);
        Ok(())
    }
}

//
// TEST 9 — отчёты в рейтинговую систему
//
#[test]
fn rating_reports_are_dispatched() {
    let (mut lobby, tid, _) = lobby_with_teams(make_config(BracketType::SingleElimination), 4);
    let sink = SharedSink::default();
    lobby.set_rating_sink(Box::new(sink.clone()));
    lobby.start_tournament(tid).unwrap();

    let match_id = ready_matches(&lobby, tid)[0];
    let [upper, lower] = TournamentRuntime::match_teams(lobby.tournament(tid).unwrap(), match_id).unwrap();
    lobby.report_result(tid, match_id, lower, None).unwrap();

    let reports = sink.reports.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].winner_team_id, lower);
    assert_eq!(reports[0].loser_team_id, upper);
    assert_eq!(
        reports[0].participant_user_ids,
        vec![lower * 100, lower * 100 + 1, upper * 100, upper * 100 + 1]
    );
}

//
// TEST 10 — сбой рейтинговой системы не ломает продвижение
//
#[test]
fn failing_rating_sink_does_not_block_progression() {
    let (mut lobby, tid, _) = lobby_with_teams(make_config(BracketType::SingleElimination), 2);
    lobby.set_rating_sink(Box::new(SharedSink {
        fail: true,
        ..SharedSink::default()
    }));
    lobby.start_tournament(tid).unwrap();

    play_out(&mut lobby, tid);
    assert!(lobby.tournament(tid).unwrap().is_finished());
}

//
// TEST 11 — списки карт матча стабильны
//
#[test]
fn match_map_list_is_stable() {
    let (mut lobby, tid, _) = lobby_with_teams(make_config(BracketType::SingleElimination), 4);
    lobby.start_tournament(tid).unwrap();

    let match_id = ready_matches(&lobby, tid)[0];
    let a = lobby.map_list(tid, match_id).unwrap();
    let b = lobby.map_list(tid, match_id).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.len(), 3);
    assert_eq!(a[2].mode_with_stage(), ModeWithStage::new(ModeShort::SZ, 1));

    // Соперники финала ещё не известны.
    let final_id = lobby.tournament(tid).unwrap().bracket().unwrap().winners_final().unwrap().id;
    assert!(matches!(
        lobby.map_list(tid, final_id),
        Err(TournamentError::MatchNotReady { .. })
    ));
}

//
// TEST 12 — BAN_2 через лобби
//
#[test]
fn record_bans_through_lobby() {
    let mut cfg = make_config(BracketType::SingleElimination);
    cfg.pick_ban = Some(PickBanStyle::Ban2);
    let (mut lobby, tid, _) = lobby_with_teams(cfg, 2);
    lobby.start_tournament(tid).unwrap();

    let match_id = ready_matches(&lobby, tid)[0];
    let [upper, lower] = TournamentRuntime::match_teams(lobby.tournament(tid).unwrap(), match_id).unwrap();
    let list = lobby.map_list(tid, match_id).unwrap();
    assert_eq!(list.len(), 5);

    // Верхняя команда не банит первой.
    let early = PickBanEvent::ban(upper, list[0].mode, list[0].stage_id);
    assert!(matches!(
        lobby.record_pick_ban(tid, match_id, early, &[]),
        Err(TournamentError::IllegalPickBan(_))
    ));

    let first = PickBanEvent::ban(lower, list[0].mode, list[0].stage_id);
    let list = lobby.record_pick_ban(tid, match_id, first, &[]).unwrap();
    assert_eq!(list[0].banned_by_tournament_team_id, Some(lower));

    let second = PickBanEvent::ban(upper, list[1].mode, list[1].stage_id);
    let list = lobby.record_pick_ban(tid, match_id, second, &[]).unwrap();
    assert_eq!(list.iter().filter(|m| m.is_banned()).count(), 2);
    assert_eq!(lobby.tournament(tid).unwrap().events_for_match(match_id).len(), 2);
}

//
// TEST 13 — пики/баны без формата запрещены
//
#[test]
fn pick_ban_requires_style() {
    let (mut lobby, tid, _) = lobby_with_teams(make_config(BracketType::SingleElimination), 2);
    lobby.start_tournament(tid).unwrap();

    let match_id = ready_matches(&lobby, tid)[0];
    let event = PickBanEvent::ban(1, ModeShort::SZ, 1);
    assert!(matches!(
        lobby.record_pick_ban(tid, match_id, event, &[]),
        Err(TournamentError::IllegalPickBan(_))
    ));
}
