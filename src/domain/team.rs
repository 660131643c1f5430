use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::TeamId;

/// Кто стоит в слоте матча: реальная команда или BYE (пустой слот,
/// появляющийся при добивке до степени двойки).
///
/// После того как значение положено в слот, оно не меняется
/// (его можно только снять при откате результата).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TeamIdentifier {
    Team(TeamId),
    Bye,
}

impl TeamIdentifier {
    #[inline]
    pub fn is_bye(&self) -> bool {
        matches!(self, TeamIdentifier::Bye)
    }

    /// ID команды, если это не BYE.
    #[inline]
    pub fn team_id(&self) -> Option<TeamId> {
        match self {
            TeamIdentifier::Team(id) => Some(*id),
            TeamIdentifier::Bye => None,
        }
    }
}

impl From<TeamId> for TeamIdentifier {
    fn from(id: TeamId) -> Self {
        TeamIdentifier::Team(id)
    }
}

impl fmt::Display for TeamIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamIdentifier::Team(id) => write!(f, "team#{id}"),
            TeamIdentifier::Bye => write!(f, "BYE"),
        }
    }
}
