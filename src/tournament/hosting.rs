// src/tournament/hosting.rs

use crate::domain::tournament::TeamRegistration;
use crate::domain::{MatchId, TeamId};
use crate::engine::RandomSource;
use crate::infra::rng_seed::RngSeed;

/// Соседние клавиши цифровой клавиатуры: следующая цифра пароля
/// выбирается рядом с предыдущей, чтобы пароль было удобно набирать.
fn neighbour_digits(digit: char) -> &'static [char] {
    match digit {
        '1' => &['1', '2', '4'],
        '2' => &['2', '1', '3', '5'],
        '3' => &['3', '2', '6'],
        '4' => &['4', '1', '5', '7'],
        '5' => &['5', '2', '4', '6', '8'],
        '6' => &['6', '3', '5', '9'],
        '7' => &['7', '4', '8'],
        '8' => &['8', '7', '5', '9', '0'],
        '9' => &['9', '6', '8'],
        _ => &['0', '8'],
    }
}

/// Пароль комнаты для матча: 4 цифры, детерминированно от ID матча.
pub fn resolve_room_pass(match_id: MatchId) -> String {
    let mut pass = String::from("5");

    for i in 0..3 {
        let last = pass.chars().last().unwrap_or('5');
        let mut options = neighbour_digits(last).to_vec();

        let mut rng = RngSeed::from_text(&format!("{match_id}-{i}")).to_rng();
        rng.shuffle(&mut options);

        pass.push(options[0]);
    }

    // "5555" слишком легко угадать.
    if pass == "5555" {
        return "5800".to_string();
    }

    pass
}

/// Кто создаёт комнату.
///
/// Сначала уважаем просьбу не хостить, затем хостит команда с лучшим
/// посевом; без посева у обеих – первая команда пары.
pub fn resolve_hosting_team(teams: [&TeamRegistration; 2]) -> TeamId {
    let [first, second] = teams;

    match (first.prefers_not_to_host, second.prefers_not_to_host) {
        (true, false) => return second.team_id,
        (false, true) => return first.team_id,
        _ => {}
    }

    match (first.seed, second.seed) {
        (None, None) => first.team_id,
        (None, Some(_)) => second.team_id,
        (Some(_), None) => first.team_id,
        (Some(a), Some(b)) => {
            if a < b {
                first.team_id
            } else {
                second.team_id
            }
        }
    }
}
