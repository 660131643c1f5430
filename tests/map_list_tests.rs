use bracket_engine::domain::{
    BestOf, MapListSource, MapPool, ModeShort, ModeWithStage, PickBanEvent, PickBanStyle,
    TournamentMapListMap,
};
use bracket_engine::infra::RngSeed;
use bracket_engine::maplist::{generate_map_list, playable_maps, MapListError, MapListRequest};

/// Утилита: пул из двух-трёх карт на каждый ранкед-режим.
fn ranked_pool() -> MapPool {
    MapPool::new()
        .with_mode(ModeShort::SZ, &[1, 2, 3])
        .with_mode(ModeShort::TC, &[4, 5])
        .with_mode(ModeShort::RM, &[6, 7, 8])
        .with_mode(ModeShort::CB, &[9, 10])
}

fn request(seed: &str, best_of: BestOf) -> MapListRequest {
    MapListRequest::new(
        RngSeed::from_text(seed),
        best_of,
        ModeShort::RANKED.to_vec(),
        ranked_pool(),
    )
}

fn assert_from_pool(list: &[TournamentMapListMap], pool: &MapPool) {
    for map in list {
        assert!(
            pool.contains(map.mode, map.stage_id),
            "{} stage {} is not in the pool",
            map.mode,
            map.stage_id
        );
    }
}

//
// TEST 1 — Bo3 с тайбрейкером: последняя карта из тайбрейкеров
//
#[test]
fn best_of_three_ends_with_tiebreaker() {
    let req = request("abc", BestOf::Three)
        .with_tiebreakers(vec![ModeWithStage::new(ModeShort::TC, 4)]);

    let list = generate_map_list(&req).unwrap();

    assert_eq!(list.len(), 3);
    assert_eq!(
        list[2],
        TournamentMapListMap::new(ModeShort::TC, 4, MapListSource::TournamentOrganizer)
    );
    assert_ne!(list[0].mode, list[1].mode);
    assert!(list.iter().all(|m| m.source == MapListSource::TournamentOrganizer));
    assert!(list.iter().all(|m| !m.is_banned()));
    assert_from_pool(&list, &ranked_pool());
}

//
// TEST 2 — одинаковый запрос – одинаковый список
//
#[test]
fn generation_is_deterministic() {
    let req = request("same seed", BestOf::Seven);

    let a = generate_map_list(&req).unwrap();
    let b = generate_map_list(&req).unwrap();

    assert_eq!(a, b);
}

//
// TEST 3 — разные seed-ы дают разные списки
//
#[test]
fn different_seeds_vary_the_list() {
    let first = generate_map_list(&request("seed-0", BestOf::Seven)).unwrap();
    let any_different = (1..20)
        .map(|i| generate_map_list(&request(&format!("seed-{i}"), BestOf::Seven)).unwrap())
        .any(|list| list != first);

    assert!(any_different);
}

//
// TEST 4 — режимы чередуются и распределены равномерно
//
#[test]
fn modes_are_balanced_without_repeats() {
    for i in 0..10 {
        let list = generate_map_list(&request(&format!("balance-{i}"), BestOf::Nine)).unwrap();
        assert_eq!(list.len(), 9);

        for pair in list.windows(2) {
            assert_ne!(pair[0].mode, pair[1].mode, "same mode twice in a row");
        }

        let counts: Vec<usize> = ModeShort::RANKED
            .iter()
            .map(|mode| list.iter().filter(|m| m.mode == *mode).count())
            .collect();
        let max = counts.iter().max().unwrap();
        let min = counts.iter().min().unwrap();
        assert!(max - min <= 1, "unbalanced modes: {counts:?}");

        // Первые четыре карты – все четыре режима.
        let mut first_four: Vec<ModeShort> = list[..4].iter().map(|m| m.mode).collect();
        first_four.sort_unstable();
        first_four.dedup();
        assert_eq!(first_four.len(), 4);
    }
}

//
// TEST 5 — карты одного режима не повторяются, пока пул не исчерпан
//
#[test]
fn stages_are_not_repeated_within_pool() {
    let pool = MapPool::new().with_mode(ModeShort::SZ, &[1, 2, 3, 4, 5]);
    let req = MapListRequest::new(RngSeed::from_u64(7), BestOf::Five, vec![ModeShort::SZ], pool);

    let list = generate_map_list(&req).unwrap();

    let mut stages: Vec<u32> = list.iter().map(|m| m.stage_id).collect();
    stages.sort_unstable();
    assert_eq!(stages, vec![1, 2, 3, 4, 5]);
}

//
// TEST 6 — общий любимый режим команд идёт первым
//
#[test]
fn common_preferred_mode_goes_first() {
    for i in 0..10 {
        let req = request(&format!("prefs-{i}"), BestOf::Three)
            .with_team_preferences(vec![ModeShort::RM], vec![ModeShort::CB, ModeShort::RM]);

        let list = generate_map_list(&req).unwrap();
        assert_eq!(list[0].mode, ModeShort::RM);
    }
}

//
// TEST 7 — BAN_2: best_of + 2 карты, без тайбрейкера
//
#[test]
fn ban_two_generates_extra_maps_without_tiebreaker() {
    let req = request("ban", BestOf::Three)
        .with_tiebreakers(vec![ModeWithStage::new(ModeShort::SZ, 99)])
        .with_pick_ban(PickBanStyle::Ban2, Vec::new());

    let list = generate_map_list(&req).unwrap();

    assert_eq!(list.len(), 5);
    assert!(list.iter().all(|m| m.stage_id != 99));
    assert_from_pool(&list, &ranked_pool());
}

//
// TEST 8 — BAN_2: бан помечает карту, но оставляет её в списке
//
#[test]
fn ban_marks_map_as_banned() {
    let base = generate_map_list(&request("ban", BestOf::Three).with_pick_ban(PickBanStyle::Ban2, Vec::new())).unwrap();
    let target = base[1];

    let req = request("ban", BestOf::Three).with_pick_ban(
        PickBanStyle::Ban2,
        vec![PickBanEvent::ban(20, target.mode, target.stage_id)],
    );
    let list = generate_map_list(&req).unwrap();

    assert_eq!(list.len(), 5);
    assert_eq!(list[1].banned_by_tournament_team_id, Some(20));
    assert_eq!(playable_maps(&list).len(), 4);
}

//
// TEST 9 — COUNTERPICK: стартовая карта из тайбрейкеров или пустой список
//
#[test]
fn counterpick_starts_from_tiebreaker() {
    let tiebreakers = vec![
        ModeWithStage::new(ModeShort::SZ, 1),
        ModeWithStage::new(ModeShort::RM, 6),
    ];
    let req = request("cp", BestOf::Five)
        .with_tiebreakers(tiebreakers.clone())
        .with_pick_ban(PickBanStyle::Counterpick, Vec::new());

    let list = generate_map_list(&req).unwrap();
    assert_eq!(list.len(), 1);
    assert!(tiebreakers.contains(&list[0].mode_with_stage()));
    assert_eq!(list[0].source, MapListSource::TournamentOrganizer);

    let empty = generate_map_list(
        &request("cp", BestOf::Five).with_pick_ban(PickBanStyle::Counterpick, Vec::new()),
    )
    .unwrap();
    assert!(empty.is_empty());
}

//
// TEST 10 — COUNTERPICK: пики добавляются в конец
//
#[test]
fn counterpick_picks_are_appended() {
    let req = request("cp", BestOf::Five)
        .with_tiebreakers(vec![ModeWithStage::new(ModeShort::SZ, 1)])
        .with_pick_ban(
            PickBanStyle::Counterpick,
            vec![PickBanEvent::pick(10, ModeShort::CB, 9)],
        );

    let list = generate_map_list(&req).unwrap();

    assert_eq!(list.len(), 2);
    assert_eq!(
        list[1],
        TournamentMapListMap::new(ModeShort::CB, 9, MapListSource::Counterpick)
    );
}

//
// TEST 11 — ошибки генератора
//
#[test]
fn generator_errors() {
    let no_modes = MapListRequest::new(RngSeed::from_u64(1), BestOf::Three, Vec::new(), ranked_pool());
    assert_eq!(generate_map_list(&no_modes).unwrap_err(), MapListError::NoModesAvailable);

    let no_stages = MapListRequest::new(
        RngSeed::from_u64(1),
        BestOf::Three,
        vec![ModeShort::TW],
        ranked_pool(),
    );
    assert_eq!(
        generate_map_list(&no_stages).unwrap_err(),
        MapListError::NoStagesAvailable { mode: ModeShort::TW }
    );
}

//
// TEST 12 — тайбрейкер не повторяет стейдж предыдущей карты
//
#[test]
fn tiebreaker_avoids_previous_stage_when_pool_is_exhausted() {
    let pool = MapPool::new()
        .with_mode(ModeShort::SZ, &[1])
        .with_mode(ModeShort::TC, &[2]);
    let tiebreakers = vec![
        ModeWithStage::new(ModeShort::SZ, 1),
        ModeWithStage::new(ModeShort::TC, 2),
    ];

    for seed in 0..32u64 {
        let req = MapListRequest::new(
            RngSeed::from_u64(seed),
            BestOf::Three,
            vec![ModeShort::SZ, ModeShort::TC],
            pool.clone(),
        )
        .with_tiebreakers(tiebreakers.clone());

        let list = generate_map_list(&req).unwrap();

        assert_eq!(list.len(), 3);
        // Оба тайбрейкера уже сыграны в обычных картах.
        assert_ne!(list[0].stage_id, list[1].stage_id);
        assert_ne!(list[2].stage_id, list[1].stage_id, "seed {seed}: {list:?}");
        assert_eq!(list[2].stage_id, list[0].stage_id);
    }
}
