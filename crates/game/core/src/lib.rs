//! Server-authoritative rules for a hex-board settlement game.
//!
//! `riverlands-core` defines the canonical rules: the board, the power and
//! cult economies, the action pipeline, and final scoring. All state
//! mutation flows through [`engine::GameEngine`]; hosts describe matches
//! with [`state::MatchSetup`] and supply faction content through the
//! [`faction::FactionCatalog`] seam.
pub mod action;
pub mod board;
pub mod cult;
pub mod engine;
pub mod error;
pub mod faction;
pub mod ids;
pub mod leech;
pub mod pending;
pub mod power;
pub mod resources;
pub mod scoring;
pub mod state;
pub mod tiles;

pub use action::{
    Action, ActionError, ActionOutcome, ActionTransition, BuildBridge, BuildDwelling,
    ClaimDelayedTown, Conversion, Convert, DiscardPendingSpades, Pass, PriestCommitment,
    RespondToLeech, SelectFavorTile, SelectTownCultTop, SelectTownTile, SendPriest,
    TransformAndBuild, UpgradeBuilding, UpgradeDigging, UpgradeShipping, UseCultAction,
    UsePowerAction,
};
pub use board::{
    Board, BoardError, Building, BuildingTier, Connectivity, Hex, MapHex, TerrainKind,
    TownCandidate, TownThreshold,
};
pub use cult::{AdvanceContext, AdvanceOutcome, CultBoard, CultError, CultTrack};
pub use engine::{ExecuteError, GameEngine, TransitionPhase};
pub use error::{ErrorSeverity, InvariantViolation, MissingFact, MissingInformation, RulesError};
pub use faction::{FactionCatalog, FactionProfile, GameEnv, SpecialMovement};
pub use ids::{FactionId, PlayerId};
pub use leech::{LeechOffer, LeechResolution};
pub use pending::{PendingChoice, PlayerPending};
pub use power::{PowerError, PowerPool};
pub use resources::{Cost, Resource, ResourcePool, ResourceShortfall};
pub use scoring::{ScoreCard, final_scores};
pub use state::{GameState, MatchSetup, PlayerState, PowerAction, ROUNDS, TurnState};
pub use tiles::{FavorKind, FavorPool, TileError, TownTileKind, TownTilePool};
