//! Продвижение результатов по сетке.
//!
//! Все публичные операции атомарны: работаем с копией сетки и
//! подменяем оригинал только при успехе.

use tracing::{debug, info};

use crate::domain::{Bracket, BracketType, Match, MatchId, MatchSide, MatchStatus, ScoreDetail, TeamIdentifier};
use crate::engine::errors::EngineError;
use crate::engine::history::{ProgressionEventKind, ProgressionLog};

/// Записать победителя матча.
///
/// - матч должен быть Ready (Pending → `IllegalStateTransition`);
/// - `winner` – один из двух участников и не BYE;
/// - повторный репорт того же победителя – no-op, другого – `ResultConflict`;
/// - гранд-финал, выигранный командой из нижней сетки, создаёт ресет.
pub fn report_result(
    bracket: &mut Bracket,
    match_id: MatchId,
    winner: TeamIdentifier,
    score: Option<ScoreDetail>,
) -> Result<ProgressionLog, EngineError> {
    let m = bracket
        .get(match_id)
        .ok_or(EngineError::MatchNotFound(match_id))?;

    match m.status() {
        MatchStatus::Decided => {
            if m.winner == Some(winner) {
                debug!(match_id, %winner, "same result reported again, nothing to do");
                return Ok(ProgressionLog::new());
            }
            return Err(EngineError::ResultConflict { match_id });
        }
        MatchStatus::Pending => {
            return Err(EngineError::IllegalStateTransition {
                match_id,
                reason: "участники матча ещё не определены",
            });
        }
        MatchStatus::Ready => {}
    }

    if winner.is_bye() || !m.contains(winner) {
        return Err(EngineError::Validation(format!(
            "{winner} не участвует в матче {match_id}"
        )));
    }

    if let Some(score) = score {
        validate_score(m, winner, score)?;
    }

    let is_grand_final = m.is_grand_final();

    let mut next = bracket.clone();
    let mut log = ProgressionLog::new();

    decide(&mut next, match_id, winner, score, false, &mut log)?;

    if is_grand_final && next.bracket_type == BracketType::DoubleElimination {
        activate_reset_if_needed(&mut next, match_id, winner, &mut log)?;
    }

    if let Some(champion) = next.champion() {
        info!(match_id, champion, "bracket completed");
        log.push(ProgressionEventKind::BracketCompleted { champion });
    }

    *bracket = next;
    Ok(log)
}

/// Откатить результат матча.
///
/// Порядок обратный продвижению: сначала снимаем проигравшего из
/// `loser_destination`, затем победителя из `winner_destination`.
/// BYE-решения ниже по сетке откатываются рекурсивно; матч ниже,
/// решённый репортом, блокирует откат.
pub fn undo_result(bracket: &mut Bracket, match_id: MatchId) -> Result<ProgressionLog, EngineError> {
    let m = bracket
        .get(match_id)
        .ok_or(EngineError::MatchNotFound(match_id))?;

    if !m.is_decided() {
        return Err(EngineError::IllegalStateTransition {
            match_id,
            reason: "у матча нет результата",
        });
    }

    if m.is_bye_resolved() {
        return Err(EngineError::IllegalStateTransition {
            match_id,
            reason: "матч решён автоматически (BYE)",
        });
    }

    let mut next = bracket.clone();
    let mut log = ProgressionLog::new();

    withdraw_result(&mut next, match_id, &mut log)?;

    debug!(match_id, events = log.events.len(), "result undone");
    *bracket = next;
    Ok(log)
}

/// Решить все матчи, где BYE уже стоит в слоте (используется при построении).
pub(crate) fn resolve_byes(bracket: &mut Bracket, log: &mut ProgressionLog) -> Result<(), EngineError> {
    let ids: Vec<MatchId> = bracket.matches().map(|m| m.id).collect();
    for id in ids {
        if let Some(auto_winner) = bracket.get(id).and_then(Match::bye_winner) {
            decide(bracket, id, auto_winner, None, true, log)?;
        }
    }
    Ok(())
}

fn validate_score(m: &Match, winner: TeamIdentifier, score: ScoreDetail) -> Result<(), EngineError> {
    let (winner_score, loser_score) = if m.upper_team == Some(winner) {
        (score.upper, score.lower)
    } else {
        (score.lower, score.upper)
    };

    if winner_score <= loser_score {
        return Err(EngineError::Validation(format!(
            "счёт {}:{} не совпадает с победителем матча {}",
            score.upper, score.lower, m.id
        )));
    }
    Ok(())
}

/// Проставить победителя и развести участников по матчам-назначениям.
fn decide(
    bracket: &mut Bracket,
    match_id: MatchId,
    winner: TeamIdentifier,
    score: Option<ScoreDetail>,
    by_bye: bool,
    log: &mut ProgressionLog,
) -> Result<(), EngineError> {
    let m = bracket
        .get_mut(match_id)
        .ok_or(EngineError::MatchNotFound(match_id))?;

    let loser = m
        .opponent_of(winner)
        .ok_or(EngineError::Internal("победитель не найден в слотах матча"))?;

    m.winner = Some(winner);
    m.score = score;
    let winner_destination = m.winner_destination;
    let loser_destination = m.loser_destination;

    log.push(ProgressionEventKind::MatchDecided {
        match_id,
        winner,
        loser,
        by_bye,
    });
    debug!(match_id, %winner, %loser, by_bye, "match decided");

    if let Some(dest) = winner_destination {
        place(bracket, match_id, dest, winner, log)?;
    }
    if let Some(dest) = loser_destination {
        place(bracket, match_id, dest, loser, log)?;
    }
    Ok(())
}

/// Положить участника в первый пустой слот матча `dest`.
/// Если после этого в матче стоит BYE – решаем его сразу.
fn place(
    bracket: &mut Bracket,
    from: MatchId,
    dest: MatchId,
    team: TeamIdentifier,
    log: &mut ProgressionLog,
) -> Result<(), EngineError> {
    let m = bracket
        .get_mut(dest)
        .ok_or(EngineError::MatchNotFound(dest))?;

    if !m.place_in_first_empty(team) {
        return Err(EngineError::Internal("оба слота матча-назначения уже заняты"));
    }
    let auto_winner = m.bye_winner();

    log.push(ProgressionEventKind::TeamAdvanced {
        from_match: from,
        to_match: dest,
        team,
    });

    if let Some(auto_winner) = auto_winner {
        decide(bracket, dest, auto_winner, None, true, log)?;
    }
    Ok(())
}

/// Гранд-финал выиграл не финалист верхней сетки → матч-ресет.
fn activate_reset_if_needed(
    bracket: &mut Bracket,
    grand_final_id: MatchId,
    winner: TeamIdentifier,
    log: &mut ProgressionLog,
) -> Result<(), EngineError> {
    let winners_champion = bracket.winners_final().and_then(|m| m.winner);
    if winners_champion == Some(winner) || bracket.bracket_reset().is_some() {
        return Ok(());
    }

    let reset_id = bracket.next_match_id();
    let mut reset = Match::new(reset_id, MatchSide::Finals, 2);
    reset.position = bracket.next_position();
    reset.number = bracket.next_number();
    bracket.finals.push(reset);

    let gf = bracket
        .get_mut(grand_final_id)
        .ok_or(EngineError::MatchNotFound(grand_final_id))?;
    gf.winner_destination = Some(reset_id);
    gf.loser_destination = Some(reset_id);
    let loser = gf
        .loser()
        .ok_or(EngineError::Internal("у гранд-финала нет проигравшего"))?;

    place(bracket, grand_final_id, reset_id, winner, log)?;
    place(bracket, grand_final_id, reset_id, loser, log)?;

    log.push(ProgressionEventKind::BracketResetActivated { match_id: reset_id });
    info!(match_id = reset_id, "bracket reset activated");
    Ok(())
}

/// Снять результат матча и всё, что он продвинул.
fn withdraw_result(
    bracket: &mut Bracket,
    match_id: MatchId,
    log: &mut ProgressionLog,
) -> Result<(), EngineError> {
    let m = bracket
        .get(match_id)
        .ok_or(EngineError::MatchNotFound(match_id))?;

    let winner = m
        .winner
        .ok_or(EngineError::Internal("откат матча без результата"))?;
    let loser = m
        .loser()
        .ok_or(EngineError::Internal("у матча нет проигравшего"))?;
    let winner_destination = m.winner_destination;
    let loser_destination = m.loser_destination;

    let reset = if m.is_grand_final() {
        bracket.bracket_reset().map(|r| (r.id, r.is_decided()))
    } else {
        None
    };

    match reset {
        Some((reset_id, true)) => {
            return Err(EngineError::IllegalStateTransition {
                match_id: reset_id,
                reason: "сначала нужно откатить ресет",
            });
        }
        Some((reset_id, false)) => {
            bracket.finals.retain(|f| f.id != reset_id);
            let gf = bracket
                .get_mut(match_id)
                .ok_or(EngineError::MatchNotFound(match_id))?;
            gf.winner_destination = None;
            gf.loser_destination = None;
            log.push(ProgressionEventKind::BracketResetWithdrawn { match_id: reset_id });
        }
        None => {
            if let Some(dest) = loser_destination {
                unplace(bracket, dest, loser, log)?;
            }
            if let Some(dest) = winner_destination {
                unplace(bracket, dest, winner, log)?;
            }
        }
    }

    let m = bracket
        .get_mut(match_id)
        .ok_or(EngineError::MatchNotFound(match_id))?;
    m.winner = None;
    m.score = None;
    log.push(ProgressionEventKind::ResultUndone { match_id });
    Ok(())
}

/// Обратная операция к `place`.
fn unplace(
    bracket: &mut Bracket,
    dest: MatchId,
    team: TeamIdentifier,
    log: &mut ProgressionLog,
) -> Result<(), EngineError> {
    let d = bracket
        .get(dest)
        .ok_or(EngineError::MatchNotFound(dest))?;

    if d.is_decided() {
        if !d.is_bye_resolved() {
            return Err(EngineError::IllegalStateTransition {
                match_id: dest,
                reason: "матч дальше по сетке уже сыгран",
            });
        }
        withdraw_result(bracket, dest, log)?;
    }

    let d = bracket
        .get_mut(dest)
        .ok_or(EngineError::MatchNotFound(dest))?;
    if !d.remove_from_slot(team) {
        return Err(EngineError::Internal("участник не найден в матче-назначении"));
    }

    log.push(ProgressionEventKind::TeamWithdrawn {
        match_id: dest,
        team,
    });
    Ok(())
}
