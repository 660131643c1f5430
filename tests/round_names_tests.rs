use bracket_engine::domain::{BestOf, BracketType, MatchSide, TeamId};
use bracket_engine::engine::{build_bracket, default_best_of, round_name};

//
// TEST 1 — названия раундов winners
//
#[test]
fn winners_round_names() {
    let rounds = [1, 2, 3, 4];
    assert_eq!(round_name(MatchSide::Winners, 1, &rounds), "Winners Round 1");
    assert_eq!(round_name(MatchSide::Winners, 2, &rounds), "Winners Round 2");
    assert_eq!(round_name(MatchSide::Winners, 3, &rounds), "Winners Semifinals");
    assert_eq!(round_name(MatchSide::Winners, 4, &rounds), "Winners Finals");
}

//
// TEST 2 — названия раундов losers
//
#[test]
fn losers_round_names() {
    let rounds = [1, 2, 3, 4];
    assert_eq!(round_name(MatchSide::Losers, 1, &rounds), "Losers Round 1");
    assert_eq!(round_name(MatchSide::Losers, 3, &rounds), "Losers Round 3");
    assert_eq!(round_name(MatchSide::Losers, 4, &rounds), "Losers Finals");
}

//
// TEST 3 — гранд-финал и ресет
//
#[test]
fn finals_round_names() {
    assert_eq!(round_name(MatchSide::Finals, 1, &[1]), "Grand Finals");
    assert_eq!(round_name(MatchSide::Finals, 1, &[1, 2]), "Grand Finals");
    assert_eq!(round_name(MatchSide::Finals, 2, &[1, 2]), "Bracket Reset");
}

//
// TEST 4 — порядок и повторы в списке раундов не важны
//
#[test]
fn round_positions_are_normalized() {
    assert_eq!(round_name(MatchSide::Winners, 3, &[3, 1, 2, 2, 1]), "Winners Finals");
    assert_eq!(round_name(MatchSide::Winners, 1, &[1, 2]), "Winners Semifinals");
}

//
// TEST 5 — длины серий по умолчанию
//
#[test]
fn default_best_of_per_round() {
    let winners = [1, 2, 3, 4];
    assert_eq!(default_best_of(MatchSide::Winners, 1, &winners), BestOf::Three);
    assert_eq!(default_best_of(MatchSide::Winners, 2, &winners), BestOf::Three);
    assert_eq!(default_best_of(MatchSide::Winners, 3, &winners), BestOf::Five);
    assert_eq!(default_best_of(MatchSide::Winners, 4, &winners), BestOf::Five);

    let losers = [1, 2, 3];
    assert_eq!(default_best_of(MatchSide::Losers, 1, &losers), BestOf::Three);
    assert_eq!(default_best_of(MatchSide::Losers, 3, &losers), BestOf::Five);

    assert_eq!(default_best_of(MatchSide::Finals, 1, &[1]), BestOf::Seven);
    assert_eq!(default_best_of(MatchSide::Finals, 2, &[1, 2]), BestOf::Seven);
}

//
// TEST 6 — названия по реальной сетке
//
#[test]
fn names_for_built_double_elimination() {
    let seeds: Vec<TeamId> = (1..=8).collect();
    let bracket = build_bracket(8, BracketType::DoubleElimination, &seeds).unwrap();

    let winners = bracket.round_positions(MatchSide::Winners);
    let names: Vec<String> = winners
        .iter()
        .map(|r| round_name(MatchSide::Winners, *r, &winners))
        .collect();
    assert_eq!(names, vec!["Winners Round 1", "Winners Semifinals", "Winners Finals"]);

    let losers = bracket.round_positions(MatchSide::Losers);
    assert_eq!(
        round_name(MatchSide::Losers, *losers.last().unwrap(), &losers),
        "Losers Finals"
    );
}

//
// TEST 7 — BestOf: количество карт и победы
//
#[test]
fn best_of_counts_and_scores() {
    assert_eq!(BestOf::Three.count(), 3);
    assert_eq!(BestOf::Seven.wins_needed(), 4);
    assert!(BestOf::Three.is_set_over_by_score([2, 1]));
    assert!(!BestOf::Five.is_set_over_by_score([2, 2]));
    assert!(BestOf::Three.is_final_score([1, 2]));
    assert!(BestOf::Five.is_final_score([3, 0]));
    assert!(!BestOf::Three.is_final_score([3, 0]));
    assert!(!BestOf::Three.is_final_score([7, 2]));
    assert!(!BestOf::Three.is_final_score([2, 2]));
    assert_eq!(BestOf::try_from(5u8), Ok(BestOf::Five));
    assert!(BestOf::try_from(4u8).is_err());
    assert_eq!(BestOf::Nine.to_string(), "Bo9");
}
