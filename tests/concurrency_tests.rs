//! Лобби – один писатель: параллельные клиенты работают через общий lock.

use std::sync::Arc;

use tokio::sync::Mutex;

use bracket_engine::domain::tournament::{TeamRegistration, TournamentConfig, TournamentStatus};
use bracket_engine::domain::{
    BracketType, MapPickingStyle, MapPool, MatchStatus, ModeShort, TeamIdentifier,
};
use bracket_engine::tournament::TournamentLobby;

fn make_config() -> TournamentConfig {
    TournamentConfig {
        name: "Async Cup".to_string(),
        description: None,
        bracket_type: BracketType::DoubleElimination,
        max_teams: 32,
        min_teams_to_start: 2,
        map_picking_style: MapPickingStyle::AutoRm,
        map_pool: MapPool::new().with_mode(ModeShort::RM, &[1, 2, 3]),
        tiebreaker_maps: Vec::new(),
        pick_ban: None,
        best_of_overrides: Vec::new(),
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

//
// TEST 1 — параллельная регистрация не теряет команды
//
#[test]
fn concurrent_registration() {
    runtime().block_on(async {
        let lobby = Arc::new(Mutex::new(TournamentLobby::new()));
        let tid = lobby.lock().await.create_tournament(1, make_config()).unwrap();

        let mut handles = Vec::new();
        for i in 0..20u32 {
            let lobby = Arc::clone(&lobby);
            handles.push(tokio::spawn(async move {
                let mut guard = lobby.lock().await;
                let team_id = guard.next_team_id();
                guard
                    .register_team(tid, TeamRegistration::new(team_id, format!("Team {i}")))
                    .unwrap();
                guard.check_in(tid, team_id).unwrap();
                team_id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 20);

        let guard = lobby.lock().await;
        assert_eq!(guard.tournament(tid).unwrap().checked_in_count(), 20);
    });
}

//
// TEST 2 — параллельные репорты одного и того же результата
//
#[test]
fn concurrent_duplicate_reports_are_idempotent() {
    runtime().block_on(async {
        let lobby = Arc::new(Mutex::new(TournamentLobby::new()));
        let tid = {
            let mut guard = lobby.lock().await;
            let tid = guard.create_tournament(1, make_config()).unwrap();
            for i in 0..4 {
                let team_id = guard.next_team_id();
                guard
                    .register_team(tid, TeamRegistration::new(team_id, format!("Team {i}")))
                    .unwrap();
                guard.check_in(tid, team_id).unwrap();
            }
            guard.start_tournament(tid).unwrap();
            tid
        };

        let mut handles = Vec::new();
        for _ in 0..5 {
            let lobby = Arc::clone(&lobby);
            handles.push(tokio::spawn(async move {
                let mut guard = lobby.lock().await;
                guard.report_result(tid, 1, 1, None).map(|log| log.is_empty())
            }));
        }

        let mut applied = 0;
        for handle in handles {
            let was_noop = handle.await.unwrap().unwrap();
            if !was_noop {
                applied += 1;
            }
        }
        assert_eq!(applied, 1, "result must be applied exactly once");

        let guard = lobby.lock().await;
        let t = guard.tournament(tid).unwrap();
        assert_eq!(t.status, TournamentStatus::Running);
        let m = t.bracket().unwrap().get(1).unwrap();
        assert_eq!(m.status(), MatchStatus::Decided);
        assert_eq!(m.winner, Some(TeamIdentifier::Team(1)));
    });
}
