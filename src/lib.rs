//! Главный модуль приложения турнирных сеток на Linera.
//!
//! Здесь описываем ABI (Operation / Message / Query / Response) и
//! связываем contract/service с нашим BracketState.

pub mod api;
pub mod domain;
pub mod engine;
pub mod infra;
pub mod maplist;
pub mod state;
pub mod tournament;

use linera_sdk::linera_base_types::{ContractAbi, ServiceAbi};
use serde::{Deserialize, Serialize};

use crate::api::{Command, Query, QueryResponse};
use crate::state::BracketState;

/// Операции (внешние команды), которые модуль принимает.
///
/// Для простоты: одна операция = одна команда из api::Command.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum BracketOperation {
    Command(Command),
}

/// Сообщения между приложениями Linera.
/// Пока нам не нужны – оставим пустой enum.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum BracketMessage {}

/// Запросы к сервису (read-only).
pub type BracketQuery = Query;

/// Ответы на запросы.
pub type BracketResponse = QueryResponse;

/// ABI для контракта и сервиса.
#[derive(Clone, Debug)]
pub struct BracketAbi;

impl ContractAbi for BracketAbi {
    type Operation = BracketOperation;
    type Response = ();
}

impl ServiceAbi for BracketAbi {
    type Query = BracketQuery;
    type QueryResponse = BracketResponse;
}

/// Экспортируем типы состояния, чтобы contract.rs и service.rs могли их использовать.
pub type Storage = BracketState;
