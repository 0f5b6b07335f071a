//! The four cult tracks.
//!
//! Each track runs 0..=10. Step 10 is the apex: it holds one player, ever,
//! and entering it costs a town key (or credits a town formed by the same
//! action). Crossing steps 3, 5, 7, and 10 pays out power, once per player
//! per track.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;
use strum::EnumIter;

use crate::ids::PlayerId;
use crate::power::PowerPool;

/// Apex step of every track.
pub const APEX: u8 = 10;

/// Power paid the first time a player crosses each milestone step.
const MILESTONES: [(u8, u8); 4] = [(3, 1), (5, 2), (7, 2), (APEX, 3)];

/// End-game award for the three highest occupied positions of a track.
const TRACK_AWARDS: [u32; 3] = [8, 4, 2];

/// Priest spaces worth two advances per track.
const TWO_STEP_SPACES: usize = 3;

/// The four cult tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CultTrack {
    Fire,
    Water,
    Earth,
    Air,
}

impl CultTrack {
    pub const COUNT: usize = 4;

    pub const fn index(self) -> usize {
        self as usize
    }
}

bitflags::bitflags! {
    /// Milestone steps a player has already been paid for on one track.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MilestoneSet: u8 {
        const STEP_3 = 1;
        const STEP_5 = 1 << 1;
        const STEP_7 = 1 << 2;
        const STEP_10 = 1 << 3;
    }
}

impl MilestoneSet {
    fn flag(step: u8) -> Self {
        match step {
            3 => Self::STEP_3,
            5 => Self::STEP_5,
            7 => Self::STEP_7,
            _ => Self::STEP_10,
        }
    }
}

/// Errors raised by cult board operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CultError {
    #[error("the {steps}-step priest spaces of {track:?} are all occupied")]
    SpaceOccupied { track: CultTrack, steps: u8 },

    #[error("priest spaces take two or three steps, not {0}")]
    InvalidSpace(u8),
}

/// Facts the advance needs from the acting player's wider state.
pub struct AdvanceContext<'a> {
    /// Unspent town keys held by the player.
    pub town_keys: u8,
    /// The same action also formed a town; entering the apex is then free.
    pub town_pending: bool,
    /// Receives milestone power.
    pub pool: &'a mut PowerPool,
}

/// What an advance did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvanceOutcome {
    pub position: u8,
    /// Power moved by milestone payouts (actual, after bowl capacity).
    pub power_gained: u8,
    /// The player took the apex with this advance.
    pub claimed_apex: bool,
    /// A town key was spent to enter the apex.
    pub spent_key: bool,
}

/// Per-track priest spaces. One space is worth three advances, three are
/// worth two; each holds a priest for the rest of the game.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct PriestSpaces {
    three_step: Option<PlayerId>,
    two_step: ArrayVec<PlayerId, TWO_STEP_SPACES>,
}

/// Shared cult board state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CultBoard {
    positions: BTreeMap<PlayerId, [u8; CultTrack::COUNT]>,
    claimed: BTreeMap<PlayerId, [MilestoneSet; CultTrack::COUNT]>,
    apex: [Option<PlayerId>; CultTrack::COUNT],
    spaces: [PriestSpaces; CultTrack::COUNT],
}

impl CultBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self, player: PlayerId, track: CultTrack) -> u8 {
        self.positions
            .get(&player)
            .map_or(0, |p| p[track.index()])
    }

    pub fn apex_holder(&self, track: CultTrack) -> Option<PlayerId> {
        self.apex[track.index()]
    }

    /// Number of priests a player has parked on priest spaces, across all
    /// tracks. These never return to the player's supply.
    pub fn priests_committed(&self, player: PlayerId) -> u8 {
        self.spaces
            .iter()
            .map(|s| {
                let three = u8::from(s.three_step == Some(player));
                let two = s.two_step.iter().filter(|&&p| p == player).count() as u8;
                three + two
            })
            .sum()
    }

    /// Checks a priest space without claiming it.
    pub fn space_available(&self, track: CultTrack, steps: u8) -> Result<(), CultError> {
        let spaces = &self.spaces[track.index()];
        match steps {
            3 if spaces.three_step.is_some() => Err(CultError::SpaceOccupied { track, steps }),
            2 if spaces.two_step.is_full() => Err(CultError::SpaceOccupied { track, steps }),
            2 | 3 => Ok(()),
            other => Err(CultError::InvalidSpace(other)),
        }
    }

    /// Claims a priest space worth `steps` (2 or 3) advances.
    ///
    /// Returns the advance size; the priest itself is consumed by the
    /// caller. Advancing is a separate [`CultBoard::advance`] call.
    pub fn take_priest_space(
        &mut self,
        player: PlayerId,
        track: CultTrack,
        steps: u8,
    ) -> Result<u8, CultError> {
        let spaces = &mut self.spaces[track.index()];
        match steps {
            3 => {
                if spaces.three_step.is_some() {
                    return Err(CultError::SpaceOccupied { track, steps });
                }
                spaces.three_step = Some(player);
                Ok(3)
            }
            2 => {
                if spaces.two_step.is_full() {
                    return Err(CultError::SpaceOccupied { track, steps });
                }
                spaces.two_step.push(player);
                Ok(2)
            }
            other => Err(CultError::InvalidSpace(other)),
        }
    }

    /// Advances a player `steps` up a track.
    ///
    /// Clamps at 9 when the apex is held by someone else, or when reaching
    /// it would need a key the player does not have. Milestone power is paid
    /// into the context pool. Never fails; an advance that cannot move
    /// simply reports the unchanged position.
    pub fn advance(
        &mut self,
        player: PlayerId,
        track: CultTrack,
        steps: u8,
        ctx: AdvanceContext<'_>,
    ) -> AdvanceOutcome {
        let index = track.index();
        let start = self.position(player, track);
        if start >= APEX {
            return AdvanceOutcome {
                position: start,
                ..AdvanceOutcome::default()
            };
        }

        let mut target = (start + steps).min(APEX);
        let mut claimed_apex = false;
        let mut spent_key = false;
        if target == APEX {
            let apex_free = self.apex[index].is_none();
            if !apex_free {
                target = APEX - 1;
            } else if ctx.town_pending {
                claimed_apex = true;
            } else if ctx.town_keys > 0 {
                claimed_apex = true;
                spent_key = true;
            } else {
                target = APEX - 1;
            }
        }

        let mut power_gained = 0;
        if target > start {
            self.positions.entry(player).or_default()[index] = target;
            if claimed_apex {
                self.apex[index] = Some(player);
            }

            let claimed = &mut self.claimed.entry(player).or_default()[index];
            for (step, power) in MILESTONES {
                let flag = MilestoneSet::flag(step);
                if start < step && step <= target && !claimed.contains(flag) {
                    claimed.insert(flag);
                    power_gained += ctx.pool.gain(power);
                }
            }
        }

        AdvanceOutcome {
            position: target,
            power_gained,
            claimed_apex: claimed_apex && target == APEX,
            spent_key: spent_key && target == APEX,
        }
    }

    /// End-game cult awards: 8/4/2 per track for the highest occupied
    /// positions. Players sharing a position split the combined award of the
    /// ranks they span, rounded down. Position 0 never scores.
    pub fn endgame_scores(&self) -> BTreeMap<PlayerId, u32> {
        let mut scores: BTreeMap<PlayerId, u32> = BTreeMap::new();
        for index in 0..CultTrack::COUNT {
            let mut standings: Vec<(u8, PlayerId)> = self
                .positions
                .iter()
                .filter(|(_, p)| p[index] > 0)
                .map(|(&player, p)| (p[index], player))
                .collect();
            standings.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

            let mut rank = 0;
            let mut cursor = 0;
            while cursor < standings.len() && rank < TRACK_AWARDS.len() {
                let position = standings[cursor].0;
                let group_end = standings[cursor..]
                    .iter()
                    .position(|&(p, _)| p != position)
                    .map_or(standings.len(), |offset| cursor + offset);
                let group = &standings[cursor..group_end];

                let budget: u32 = TRACK_AWARDS[rank..(rank + group.len()).min(TRACK_AWARDS.len())]
                    .iter()
                    .sum();
                let share = budget / group.len() as u32;
                if share > 0 {
                    for &(_, player) in group {
                        *scores.entry(player).or_default() += share;
                    }
                }

                rank += group.len();
                cursor = group_end;
            }
        }
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(pool: &mut PowerPool) -> AdvanceContext<'_> {
        AdvanceContext {
            town_keys: 0,
            town_pending: false,
            pool,
        }
    }

    #[test]
    fn milestones_pay_once_per_player_and_track() {
        let mut board = CultBoard::new();
        let mut pool = PowerPool::new(12, 0, 0);

        let outcome = board.advance(PlayerId(0), CultTrack::Fire, 5, ctx(&mut pool));
        assert_eq!(outcome.position, 5);
        // Crossed 3 (+1) and 5 (+2).
        assert_eq!(outcome.power_gained, 3);

        // Back over the same steps pays nothing new; 7 pays its 2.
        let outcome = board.advance(PlayerId(0), CultTrack::Fire, 2, ctx(&mut pool));
        assert_eq!(outcome.position, 7);
        assert_eq!(outcome.power_gained, 2);
    }

    #[test]
    fn apex_needs_a_key() {
        let mut board = CultBoard::new();
        let mut pool = PowerPool::new(12, 0, 0);

        let outcome = board.advance(PlayerId(0), CultTrack::Water, 10, ctx(&mut pool));
        assert_eq!(outcome.position, 9);
        assert!(!outcome.claimed_apex);
        assert_eq!(board.apex_holder(CultTrack::Water), None);

        let outcome = board.advance(
            PlayerId(0),
            CultTrack::Water,
            1,
            AdvanceContext {
                town_keys: 1,
                town_pending: false,
                pool: &mut pool,
            },
        );
        assert_eq!(outcome.position, 10);
        assert!(outcome.claimed_apex);
        assert!(outcome.spent_key);
        assert_eq!(board.apex_holder(CultTrack::Water), Some(PlayerId(0)));
    }

    #[test]
    fn occupied_apex_clamps_to_nine() {
        let mut board = CultBoard::new();
        let mut pool = PowerPool::new(12, 0, 0);
        board.advance(
            PlayerId(0),
            CultTrack::Earth,
            10,
            AdvanceContext {
                town_keys: 1,
                town_pending: false,
                pool: &mut pool,
            },
        );

        let outcome = board.advance(
            PlayerId(1),
            CultTrack::Earth,
            12,
            AdvanceContext {
                town_keys: 3,
                town_pending: true,
                pool: &mut pool,
            },
        );
        assert_eq!(outcome.position, 9);
        assert!(!outcome.claimed_apex);
        assert!(!outcome.spent_key);
        assert_eq!(board.apex_holder(CultTrack::Earth), Some(PlayerId(0)));
    }

    #[test]
    fn pending_town_enters_apex_without_a_key() {
        let mut board = CultBoard::new();
        let mut pool = PowerPool::new(12, 0, 0);
        let outcome = board.advance(
            PlayerId(2),
            CultTrack::Air,
            10,
            AdvanceContext {
                town_keys: 0,
                town_pending: true,
                pool: &mut pool,
            },
        );
        assert_eq!(outcome.position, 10);
        assert!(outcome.claimed_apex);
        assert!(!outcome.spent_key);
    }

    #[test]
    fn apex_holder_never_moves_again() {
        let mut board = CultBoard::new();
        let mut pool = PowerPool::new(12, 0, 0);
        board.advance(
            PlayerId(0),
            CultTrack::Fire,
            10,
            AdvanceContext {
                town_keys: 1,
                town_pending: false,
                pool: &mut pool,
            },
        );
        let outcome = board.advance(PlayerId(0), CultTrack::Fire, 3, ctx(&mut pool));
        assert_eq!(outcome.position, 10);
        assert_eq!(outcome.power_gained, 0);
    }

    #[test]
    fn priest_spaces_fill_up() {
        let mut board = CultBoard::new();
        assert_eq!(
            board.take_priest_space(PlayerId(0), CultTrack::Fire, 3),
            Ok(3)
        );
        assert_eq!(
            board.take_priest_space(PlayerId(1), CultTrack::Fire, 3),
            Err(CultError::SpaceOccupied {
                track: CultTrack::Fire,
                steps: 3
            })
        );
        for player in 1..4 {
            assert_eq!(
                board.take_priest_space(PlayerId(player), CultTrack::Fire, 2),
                Ok(2)
            );
        }
        assert!(board
            .take_priest_space(PlayerId(0), CultTrack::Fire, 2)
            .is_err());
        assert_eq!(board.priests_committed(PlayerId(0)), 1);
        assert_eq!(board.priests_committed(PlayerId(1)), 1);
    }

    #[test]
    fn endgame_awards_split_on_ties() {
        let mut board = CultBoard::new();
        let mut pool = PowerPool::new(12, 0, 0);
        // Fire: p0 at 6, p1 and p2 tied at 4, p3 at 0 (never scores).
        board.advance(PlayerId(0), CultTrack::Fire, 6, ctx(&mut pool));
        board.advance(PlayerId(1), CultTrack::Fire, 4, ctx(&mut pool));
        board.advance(PlayerId(2), CultTrack::Fire, 4, ctx(&mut pool));

        let scores = board.endgame_scores();
        assert_eq!(scores.get(&PlayerId(0)), Some(&8));
        // Second and third award (4 + 2) split two ways, truncating.
        assert_eq!(scores.get(&PlayerId(1)), Some(&3));
        assert_eq!(scores.get(&PlayerId(2)), Some(&3));
        assert_eq!(scores.get(&PlayerId(3)), None);
    }

    #[test]
    fn three_way_tie_for_first_splits_the_full_budget() {
        let mut board = CultBoard::new();
        let mut pool = PowerPool::new(12, 0, 0);
        for player in 0..3 {
            board.advance(PlayerId(player), CultTrack::Water, 5, ctx(&mut pool));
        }
        let scores = board.endgame_scores();
        // (8 + 4 + 2) / 3 = 4 each.
        for player in 0..3 {
            assert_eq!(scores.get(&PlayerId(player)), Some(&4));
        }
    }
}
