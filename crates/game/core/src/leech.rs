//! Power leech offers.
//!
//! Whenever a build or upgrade raises the power value of a hex, every
//! opponent with a building on an edge-adjacent hex is offered the value
//! delta as power. Accepting costs victory points equal to the power
//! actually absorbed minus one (never below zero); declining costs nothing.
//! Offers a player never answers are declined when the round ends.

use crate::board::{Board, Hex};
use crate::ids::PlayerId;
use crate::power::PowerPool;

/// An open offer to one opponent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeechOffer {
    /// The opponent who may accept.
    pub to: PlayerId,
    /// The player whose building triggered the offer.
    pub from: PlayerId,
    /// Power offered: the value delta of the changed building.
    pub amount: u8,
    /// Hex whose building changed, kept for the host's event log.
    pub source: Hex,
}

/// What accepting an offer did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeechResolution {
    /// Power actually absorbed, after bowl capacity.
    pub gained: u8,
    /// Victory points paid for it.
    pub vp_cost: u32,
}

impl LeechOffer {
    /// Accepts up to `amount` power into `pool`.
    ///
    /// The caller validates `amount <= self.amount` beforehand. Cost is
    /// paid on power actually absorbed, so a saturated pool leeches free.
    pub fn accept(&self, amount: u8, pool: &mut PowerPool) -> LeechResolution {
        let gained = pool.gain(amount);
        LeechResolution {
            gained,
            vp_cost: u32::from(gained.saturating_sub(1)),
        }
    }
}

/// Builds the offers a building change creates, in resolution order.
///
/// Neighbors are offered in seat order starting from the seat after the
/// builder. Bridges never carry leech; only shared edges do.
pub fn offers_for_change(
    board: &Board,
    seats: &[PlayerId],
    source: Hex,
    builder: PlayerId,
    delta: u8,
) -> Vec<LeechOffer> {
    if delta == 0 {
        return Vec::new();
    }
    let neighbors = board.leech_neighbors(source, builder);
    let builder_seat = seats.iter().position(|&p| p == builder).unwrap_or(0);
    let mut offers = Vec::new();
    for offset in 1..=seats.len() {
        let seat = seats[(builder_seat + offset) % seats.len()];
        if neighbors.contains(&seat) {
            offers.push(LeechOffer {
                to: seat,
                from: builder,
                amount: delta,
                source,
            });
        }
    }
    offers
}
