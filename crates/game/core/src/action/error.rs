//! Errors the action layer can reject a request with.

use crate::board::{BoardError, BuildingTier, Hex};
use crate::cult::CultError;
use crate::error::{ErrorSeverity, InvariantViolation, MissingInformation, RulesError};
use crate::ids::PlayerId;
use crate::power::PowerError;
use crate::resources::ResourceShortfall;
use crate::state::PowerAction;
use crate::tiles::{FavorKind, TileError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("the match is over")]
    GameOver,

    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),

    #[error("{0} has already passed this round")]
    AlreadyPassed(PlayerId),

    #[error("waiting on a decision from {waiting_on}")]
    BlockedByPending { waiting_on: PlayerId },

    #[error("no player {0} in this match")]
    UnknownPlayer(PlayerId),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Power(#[from] PowerError),

    #[error(transparent)]
    Resources(#[from] ResourceShortfall),

    #[error(transparent)]
    Cult(#[from] CultError),

    #[error(transparent)]
    Tile(#[from] TileError),

    #[error("cannot upgrade {from:?} into {to:?}")]
    InvalidUpgrade {
        from: BuildingTier,
        to: BuildingTier,
    },

    #[error("hex {0} holds another player's building")]
    NotYourBuilding(Hex),

    #[error("power action {0:?} was already taken this round")]
    PowerActionTaken(PowerAction),

    #[error("the {0:?} slot needs a bridge placement")]
    BridgeEndpointsRequired(PowerAction),

    #[error("this faction cannot build bridges directly")]
    NoBridgeAbility,

    #[error("shipping is already at its maximum")]
    ShippingAtMax,

    #[error("this faction does not use shipping")]
    NoShipping,

    #[error("digging is already at its maximum")]
    DiggingAtMax,

    #[error("{0} has no pending spades")]
    NoPendingSpades(PlayerId),

    #[error("no open leech offer for {0}")]
    NoOpenLeech(PlayerId),

    #[error("offer is {offered} power, cannot accept {asked}")]
    AcceptTooMuch { offered: u8, asked: u8 },

    #[error("{0} is not owed a favor tile")]
    NoFavorOwed(PlayerId),

    #[error("{player} already holds favor tile {kind:?}")]
    FavorAlreadyHeld { player: PlayerId, kind: FavorKind },

    #[error("{0} has no town awaiting a tile")]
    NoTownPending(PlayerId),

    #[error("{0} has no delayed town to claim")]
    NoDelayedTown(PlayerId),

    #[error("{0} owes no cult track ordering")]
    NoCultTopPending(PlayerId),

    #[error("the cult advance order must list every track once")]
    BadCultTopOrder,

    #[error("all seven of {0}'s priests are already in play")]
    PriestSupplyEmpty(PlayerId),

    #[error("{0} has no unused cult special action")]
    NoCultAction(PlayerId),

    #[error("the cult special action was already used this round")]
    CultActionTaken,

    #[error(transparent)]
    Missing(#[from] MissingInformation),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl RulesError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ActionError::Missing(_) | ActionError::BlockedByPending { .. } => {
                ErrorSeverity::Recoverable
            }
            ActionError::Invariant(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }
}
