use crate::domain::{BestOf, MatchSide};

/// Индекс раунда среди всех раундов стороны и их количество.
fn round_index(position: u32, side_positions: &[u32]) -> (Option<usize>, usize) {
    let mut rounds = side_positions.to_vec();
    rounds.sort_unstable();
    rounds.dedup();
    let idx = rounds.iter().position(|r| *r == position);
    (idx, rounds.len())
}

/// Название раунда для UI.
///
/// `side_positions` – все раунды стороны (порядок и повторы не важны).
pub fn round_name(side: MatchSide, position: u32, side_positions: &[u32]) -> String {
    let (idx, total) = round_index(position, side_positions);

    match side {
        MatchSide::Winners => match idx {
            Some(i) if i + 1 == total => "Winners Finals".to_string(),
            Some(i) if i + 2 == total => "Winners Semifinals".to_string(),
            Some(i) => format!("Winners Round {}", i + 1),
            None => format!("Winners Round {position}"),
        },
        MatchSide::Losers => match idx {
            Some(i) if i + 1 == total => "Losers Finals".to_string(),
            Some(i) => format!("Losers Round {}", i + 1),
            None => format!("Losers Round {position}"),
        },
        MatchSide::Finals => match idx {
            Some(0) => "Grand Finals".to_string(),
            Some(1) => "Bracket Reset".to_string(),
            _ => format!("Finals Round {position}"),
        },
    }
}

/// Длина серии по умолчанию для раунда.
///
/// Финалы – Bo7; первые два раунда winners – Bo3, дальше Bo5;
/// финал нижней сетки – Bo5, остальные раунды losers – Bo3.
pub fn default_best_of(side: MatchSide, position: u32, side_positions: &[u32]) -> BestOf {
    let (idx, total) = round_index(position, side_positions);

    match side {
        MatchSide::Finals => BestOf::Seven,
        MatchSide::Winners => match idx {
            Some(i) if i < 2 => BestOf::Three,
            _ => BestOf::Five,
        },
        MatchSide::Losers => match idx {
            Some(i) if i + 1 == total => BestOf::Five,
            _ => BestOf::Three,
        },
    }
}
