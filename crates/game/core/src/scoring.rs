//! Final scoring.
//!
//! Three end-game sources join the victory points collected during play:
//! cult standings, the largest connected building area, and leftover
//! resources converted to points. Ties in the final ranking break on raw
//! leftover resources; power is deliberately not part of the tiebreak.

use std::collections::BTreeMap;

use crate::error::{MissingFact, MissingInformation};
use crate::faction::GameEnv;
use crate::ids::PlayerId;
use crate::state::GameState;

/// Points split among the players sharing the largest connected area.
pub const AREA_AWARD: u32 = 18;

/// One player's final tally.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreCard {
    pub player: PlayerId,
    /// Victory points held when the last round ended.
    pub base: u32,
    pub cult: u32,
    pub area: u32,
    /// Points from converting leftover resources and usable power.
    pub resources: u32,
    /// Raw leftover coins, workers, and priests. Power never counts here.
    pub tiebreak: u32,
}

impl ScoreCard {
    pub fn total(&self) -> u32 {
        self.base + self.cult + self.area + self.resources
    }
}

/// Scores a finished match.
///
/// Returns cards sorted best first: by total, then by the resource
/// tiebreak. Profiles missing from the catalog are all reported together.
pub fn final_scores(
    state: &GameState,
    env: &GameEnv<'_>,
) -> Result<Vec<ScoreCard>, MissingInformation> {
    let mut missing = MissingInformation::new();
    for player in state.players.values() {
        if env.profile(player.faction).is_none() {
            missing.push(MissingFact::FactionProfile(player.faction));
        }
    }
    missing.into_result()?;

    let cult_scores = state.cults.endgame_scores();
    let area_scores = area_awards(state, env);

    let mut cards: Vec<ScoreCard> = state
        .players
        .values()
        .map(|player| {
            // Profiles were checked above.
            let coins_per_vp = env
                .profile(player.faction)
                .map_or(3, |p| p.coins_per_vp());

            // Coins plus usable power (bowl III full, bowl II half) convert
            // at the faction's coin rate; workers and priests are a point
            // each on their own.
            let coin_equivalent = u32::from(player.power.spendable())
                + u32::from(player.power.burnable_gain())
                + u32::from(player.resources.coins);

            ScoreCard {
                player: player.id,
                base: player.victory_points,
                cult: cult_scores.get(&player.id).copied().unwrap_or(0),
                area: area_scores.get(&player.id).copied().unwrap_or(0),
                resources: coin_equivalent / u32::from(coins_per_vp.max(1))
                    + u32::from(player.resources.workers)
                    + u32::from(player.resources.priests),
                tiebreak: u32::from(player.resources.coins)
                    + u32::from(player.resources.workers)
                    + u32::from(player.resources.priests),
            }
        })
        .collect();

    cards.sort_by(|a, b| {
        b.total()
            .cmp(&a.total())
            .then(b.tiebreak.cmp(&a.tiebreak))
            .then(a.player.cmp(&b.player))
    });
    Ok(cards)
}

/// Largest-area award: every player tied for the biggest connected
/// component splits [`AREA_AWARD`], rounded down.
fn area_awards(state: &GameState, env: &GameEnv<'_>) -> BTreeMap<PlayerId, u32> {
    let mut sizes: BTreeMap<PlayerId, usize> = BTreeMap::new();
    for player in state.players.values() {
        let connectivity = match env.profile(player.faction) {
            Some(profile) => profile.area_connectivity(player.shipping),
            None => continue,
        };
        sizes.insert(
            player.id,
            state.board.largest_connected_area(player.id, connectivity),
        );
    }

    let largest = sizes.values().copied().max().unwrap_or(0);
    if largest == 0 {
        return BTreeMap::new();
    }
    let winners: Vec<PlayerId> = sizes
        .iter()
        .filter(|&(_, &size)| size == largest)
        .map(|(&player, _)| player)
        .collect();
    let share = AREA_AWARD / winners.len() as u32;
    winners.into_iter().map(|player| (player, share)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Building, BuildingTier, Hex, TerrainKind};
    use crate::faction::{FactionCatalog, FactionProfile};
    use crate::ids::FactionId;
    use crate::power::PowerPool;
    use crate::resources::ResourcePool;
    use crate::state::MatchSetup;

    struct Broke;
    impl FactionProfile for Broke {
        fn name(&self) -> &str {
            "broke"
        }
        fn home_terrain(&self) -> TerrainKind {
            TerrainKind::Plains
        }
        fn starting_resources(&self) -> ResourcePool {
            ResourcePool::new(0, 0, 0)
        }
        fn starting_power(&self) -> PowerPool {
            PowerPool::new(0, 0, 0)
        }
    }

    struct Trader;
    impl FactionProfile for Trader {
        fn name(&self) -> &str {
            "trader"
        }
        fn home_terrain(&self) -> TerrainKind {
            TerrainKind::Plains
        }
        fn coins_per_vp(&self) -> u8 {
            2
        }
        fn starting_resources(&self) -> ResourcePool {
            ResourcePool::new(0, 0, 0)
        }
        fn starting_power(&self) -> PowerPool {
            PowerPool::new(0, 0, 0)
        }
    }

    struct Catalog;
    impl FactionCatalog for Catalog {
        fn profile(&self, id: FactionId) -> Option<&dyn FactionProfile> {
            match id {
                FactionId(0) | FactionId(1) => Some(&Broke),
                FactionId(2) => Some(&Trader),
                _ => None,
            }
        }
    }

    fn three_player_state(env: &GameEnv<'_>) -> GameState {
        MatchSetup::new()
            .with_layout(
                (0..6)
                    .map(|q| (Hex::new(q, 0), TerrainKind::Plains))
                    .collect(),
            )
            .with_player(PlayerId(0), FactionId(0))
            .with_player(PlayerId(1), FactionId(1))
            .with_player(PlayerId(2), FactionId(2))
            .build(env)
            .unwrap()
    }

    fn card(cards: &[ScoreCard], player: PlayerId) -> &ScoreCard {
        cards.iter().find(|c| c.player == player).unwrap()
    }

    #[test]
    fn workers_and_priests_convert_one_to_one() {
        let catalog = Catalog;
        let env = GameEnv::new(&catalog);
        let mut state = three_player_state(&env);
        // No coins and no power: five points from workers and priests alone,
        // untouched by the 3:1 coin rate.
        state.player_mut(PlayerId(0)).unwrap().resources = ResourcePool::new(0, 3, 2);

        let cards = final_scores(&state, &env).unwrap();
        assert_eq!(card(&cards, PlayerId(0)).resources, 5);
    }

    #[test]
    fn coins_and_power_convert_at_the_faction_rate() {
        let catalog = Catalog;
        let env = GameEnv::new(&catalog);
        let mut state = three_player_state(&env);
        // 7 coins + 1 spendable + 2 from burning bowl II = 10 coin
        // equivalents for both players; only the rate differs.
        for id in [PlayerId(1), PlayerId(2)] {
            let player = state.player_mut(id).unwrap();
            player.resources = ResourcePool::new(7, 0, 0);
            player.power = PowerPool::new(0, 4, 1);
        }

        let cards = final_scores(&state, &env).unwrap();
        assert_eq!(card(&cards, PlayerId(1)).resources, 3);
        assert_eq!(card(&cards, PlayerId(2)).resources, 5);
        // The tiebreak never sees power.
        assert_eq!(card(&cards, PlayerId(1)).tiebreak, 7);
    }

    #[test]
    fn three_way_area_tie_splits_the_award() {
        let catalog = Catalog;
        let env = GameEnv::new(&catalog);
        let mut state = three_player_state(&env);
        for (id, hex) in [
            (PlayerId(0), Hex::new(0, 0)),
            (PlayerId(1), Hex::new(2, 0)),
            (PlayerId(2), Hex::new(4, 0)),
        ] {
            let faction = state.player(id).unwrap().faction;
            state
                .board
                .place_building(hex, Building::new(BuildingTier::Dwelling, faction, id))
                .unwrap();
        }

        let cards = final_scores(&state, &env).unwrap();
        for id in [PlayerId(0), PlayerId(1), PlayerId(2)] {
            assert_eq!(card(&cards, id).area, AREA_AWARD / 3);
        }
    }
}
