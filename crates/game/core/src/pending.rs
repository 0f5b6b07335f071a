//! Choices a player still owes the game.
//!
//! Some actions leave decisions behind: a temple owes a favor tile pick, a
//! new town owes a tile pick, a two-spade power action owes the spades.
//! Most of these block further play until answered; towns joined over a
//! river may be claimed later at the owner's leisure.

use crate::board::TownCandidate;
use crate::ids::PlayerId;
use crate::leech::LeechOffer;

/// Unanswered obligations of one player.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerPending {
    /// Favor tiles still owed (one per temple, one per sanctuary).
    pub favor_choices: u8,
    /// Spades bought from a power action, to be used or discarded.
    pub spades: u8,
    /// Land towns formed but without a tile chosen yet. Blocking.
    pub towns: Vec<TownCandidate>,
    /// River-joined towns; claimable whenever the owner likes.
    pub delayed_towns: Vec<TownCandidate>,
    /// A claimed town tile advances all cults by this much, but the player
    /// holds fewer keys than tracks whose apex the advance could enter. The
    /// player orders the tracks; keys run out in that order. Blocking.
    pub cult_top_steps: Option<u8>,
}

impl PlayerPending {
    /// Obligations that freeze the game until this player answers.
    pub fn is_blocking(&self) -> bool {
        self.favor_choices > 0 || !self.towns.is_empty() || self.cult_top_steps.is_some()
    }

    /// Any town formation (blocking or delayed) is still unclaimed. Lets a
    /// cult advance land on the apex without spending a key.
    pub fn has_unclaimed_town(&self) -> bool {
        !self.towns.is_empty() || !self.delayed_towns.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.favor_choices == 0
            && self.spades == 0
            && self.towns.is_empty()
            && self.delayed_towns.is_empty()
            && self.cult_top_steps.is_none()
    }
}

/// The single decision the engine is waiting on, if any.
///
/// Hosts poll this to know whom to prompt; the variants mirror the gating
/// order the engine enforces.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PendingChoice {
    /// An open leech offer awaits an accept or decline.
    LeechResponse(LeechOffer),
    /// A favor tile must be chosen.
    FavorTile { player: PlayerId },
    /// A town tile must be chosen for a formed town.
    TownTile { player: PlayerId },
    /// An all-track cult advance needs its track order decided.
    CultTop { player: PlayerId },
    /// Bought spades must be used on a transform or discarded.
    Spades { player: PlayerId, count: u8 },
}

impl PendingChoice {
    /// The player who must act.
    pub fn player(&self) -> PlayerId {
        match self {
            PendingChoice::LeechResponse(offer) => offer.to,
            PendingChoice::FavorTile { player }
            | PendingChoice::TownTile { player }
            | PendingChoice::CultTop { player }
            | PendingChoice::Spades { player, .. } => *player,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Hex;

    fn candidate() -> TownCandidate {
        TownCandidate {
            members: vec![Hex::new(0, 0)],
            power: 7,
            skipped_river: None,
        }
    }

    #[test]
    fn favor_and_town_choices_block() {
        let mut pending = PlayerPending::default();
        assert!(!pending.is_blocking());

        pending.favor_choices = 1;
        assert!(pending.is_blocking());

        pending.favor_choices = 0;
        pending.towns.push(candidate());
        assert!(pending.is_blocking());
    }

    #[test]
    fn spades_and_delayed_towns_do_not_block() {
        let mut pending = PlayerPending::default();
        pending.spades = 2;
        pending.delayed_towns.push(candidate());
        assert!(!pending.is_blocking());
        assert!(pending.has_unclaimed_town());
        assert!(!pending.is_empty());
    }
}
