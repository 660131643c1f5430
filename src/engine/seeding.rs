//! Посев: добивка до степени двойки и стандартная перестановка сидов.

/// Размер сетки с учётом BYE – ближайшая степень двойки (не меньше 2).
pub fn participants_with_byes(participant_count: u32) -> u32 {
    participant_count.max(2).next_power_of_two()
}

/// Порядок сидов в первом раунде для сетки размера `size`.
///
/// Соседние пары – матчи первого раунда: для 8 участников
/// `[1, 8, 4, 5, 2, 7, 3, 6]`, т.е. (1–8), (4–5), (2–7), (3–6).
/// Сильные сиды встречаются как можно позже; сиды больше числа
/// участников – это BYE, и они попадают на топ-сидов.
pub fn seed_order(size: u32) -> Vec<u32> {
    let mut order = vec![1u32, 2];
    while (order.len() as u32) < size {
        let next_len = order.len() as u32 * 2;
        order = order
            .iter()
            .flat_map(|&seed| [seed, next_len + 1 - seed])
            .collect();
    }
    order
}

/// Перестановка проигравших одного раунда winners перед тем, как они
/// падают в нижнюю сетку. Разводит соперников первого раунда.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOrdering {
    Natural,
    Reverse,
    HalfShift,
    ReverseHalfShift,
}

impl DropOrdering {
    pub fn apply<T: Copy>(self, items: &[T]) -> Vec<T> {
        let half = items.len() / 2;
        match self {
            DropOrdering::Natural => items.to_vec(),
            DropOrdering::Reverse => items.iter().rev().copied().collect(),
            DropOrdering::HalfShift => items[half..].iter().chain(&items[..half]).copied().collect(),
            DropOrdering::ReverseHalfShift => items[..half]
                .iter()
                .rev()
                .chain(items[half..].iter().rev())
                .copied()
                .collect(),
        }
    }
}

/// Порядок для `index`-го раунда выбывших (0 – проигравшие второго раунда winners).
///
/// Таблица по размеру сетки; для размеров вне таблицы порядок естественный.
pub fn drop_ordering(size: u32, index: usize) -> DropOrdering {
    use DropOrdering::*;

    let table: &[DropOrdering] = match size {
        8 => &[Reverse, Natural],
        16 => &[ReverseHalfShift, Reverse, Natural],
        32 => &[Reverse, HalfShift, Natural, Natural],
        64 => &[Reverse, HalfShift, Reverse, Natural, Natural],
        128 => &[Reverse, HalfShift, Reverse, HalfShift, Natural, Natural],
        _ => &[],
    };
    table.get(index).copied().unwrap_or(Natural)
}
