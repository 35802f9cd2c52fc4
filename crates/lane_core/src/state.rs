//! Match state: the single root aggregate mutated by every tick.
//!
//! [`MatchState`] exclusively owns both [`FactionState`]s, which in turn
//! own their units, towers, fortress, formation and hero record.

use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

use serde::{Deserialize, Serialize};

use crate::config::MatchConfig;
use crate::factions::{Faction, Lane};
use crate::hero::Hero;
use crate::math::{fixed_serde, Fixed};
use crate::structures::{Building, Tower};
use crate::units::{Unit, UnitId, UnitType};

/// A standing production order created by a hire command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormationSlot {
    /// Unit type produced every wave.
    pub unit_type: UnitType,
    /// Lane whose wave triggers production.
    pub lane: Lane,
    /// Whether the slot produces. Slots are never deactivated mid-match.
    pub is_active: bool,
}

/// Per-faction match counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStatistics {
    /// Enemy units killed by this faction's units.
    pub units_killed: u32,
    /// Damage dealt by this faction's units, towers and fortress.
    pub damage_dealt: i64,
    /// Gold credited from income, middle control, mines and tower rewards.
    #[serde(with = "fixed_serde")]
    pub gold_earned: Fixed,
    /// Enemy towers destroyed.
    pub towers_destroyed: u32,
    /// Current hero level.
    pub hero_level: u32,
}

impl Default for MatchStatistics {
    fn default() -> Self {
        Self {
            units_killed: 0,
            damage_dealt: 0,
            gold_earned: Fixed::ZERO,
            towers_destroyed: 0,
            hero_level: 1,
        }
    }
}

/// Everything one faction owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionState {
    /// Which side this is.
    pub faction: Faction,
    /// Treasury. Never negative.
    #[serde(with = "fixed_serde")]
    pub gold: Fixed,
    /// Tech tier, 1 to 3.
    pub tech_tier: u8,
    /// Persistent hero progression.
    pub hero: Hero,
    /// The hero unit on the field, if any.
    pub active_hero: Option<Unit>,
    /// Live regular units.
    pub units: Vec<Unit>,
    /// Fortress.
    pub building: Building,
    /// Remaining towers.
    pub towers: Vec<Tower>,
    /// Standing production orders.
    pub formation: Vec<FormationSlot>,
    /// Gold mines owned.
    pub gold_mines: u32,
    /// Seconds until another mine may be bought.
    #[serde(with = "fixed_serde")]
    pub gold_mine_cooldown: Fixed,
    /// Counters.
    pub statistics: MatchStatistics,
}

impl FactionState {
    fn new(faction: Faction, config: &MatchConfig, next_id: &mut UnitId) -> Self {
        let towers = Lane::ALL
            .into_iter()
            .map(|lane| {
                let id = *next_id;
                *next_id += 1;
                Tower::new(id, faction, lane, faction.from_own_base(config.tower_offset), &config.tower)
            })
            .collect();

        Self {
            faction,
            gold: config.starting_gold,
            tech_tier: 1,
            hero: Hero::new(faction),
            active_hero: None,
            units: Vec::new(),
            building: Building::new(faction, &config.building),
            towers,
            formation: Vec::new(),
            gold_mines: 0,
            gold_mine_cooldown: Fixed::ZERO,
            statistics: MatchStatistics::default(),
        }
    }

    /// Regular units followed by the hero unit.
    pub fn combatants(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().chain(self.active_hero.iter())
    }

    /// Live combatants in one lane.
    pub fn live_in_lane(&self, lane: Lane) -> impl Iterator<Item = &Unit> {
        self.combatants().filter(move |u| u.is_alive() && u.lane == lane)
    }

    /// Credit gold and record it as earned.
    pub fn earn(&mut self, amount: Fixed) {
        self.gold += amount;
        self.statistics.gold_earned += amount;
    }
}

/// Root aggregate for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    /// Whether the match has started.
    pub is_playing: bool,
    /// Whether ticks are suspended.
    pub is_paused: bool,
    /// Seconds of simulated time.
    #[serde(with = "fixed_serde")]
    pub match_time: Fixed,
    /// Winning faction once decided.
    pub winner: Option<Faction>,
    /// Set together with `winner`.
    pub is_game_over: bool,
    /// Human then undead.
    pub factions: [FactionState; 2],
    /// Countdown to the next top-lane wave.
    #[serde(with = "fixed_serde")]
    pub north_wave_timer: Fixed,
    /// Countdown to the next bottom-lane wave.
    #[serde(with = "fixed_serde")]
    pub south_wave_timer: Fixed,
    /// Top-lane waves fired so far; its parity picks the hero lane.
    pub hero_wave_counter: u32,
    /// Faction holding the middle, if any.
    pub middle_control_faction: Option<Faction>,
    /// Tug-of-war progress in `[-100, 100]`; positive favors humans.
    #[serde(with = "fixed_serde")]
    pub middle_control_progress: Fixed,
    /// Next id to hand out to a unit or tower.
    pub next_id: UnitId,
}

/// Create a fresh, running match.
///
/// Both factions start with the configured gold at tier 1, with one
/// tower per lane and no formation.
#[must_use]
pub fn create_initial_state(config: &MatchConfig) -> MatchState {
    let mut next_id: UnitId = 1;
    let human = FactionState::new(Faction::Human, config, &mut next_id);
    let undead = FactionState::new(Faction::Undead, config, &mut next_id);

    MatchState {
        is_playing: true,
        is_paused: false,
        match_time: Fixed::ZERO,
        winner: None,
        is_game_over: false,
        factions: [human, undead],
        north_wave_timer: config.wave_interval,
        south_wave_timer: config.wave_interval + config.south_lane_delay,
        hero_wave_counter: 0,
        middle_control_faction: None,
        middle_control_progress: Fixed::ZERO,
        next_id,
    }
}

impl MatchState {
    /// State of one faction.
    #[must_use]
    pub fn faction(&self, faction: Faction) -> &FactionState {
        &self.factions[faction.index()]
    }

    /// Mutable state of one faction.
    pub fn faction_mut(&mut self, faction: Faction) -> &mut FactionState {
        &mut self.factions[faction.index()]
    }

    /// Hand out a fresh id.
    pub fn allocate_id(&mut self) -> UnitId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Whether ticks currently advance the match.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.is_playing && !self.is_paused && self.winner.is_none()
    }

    /// Countdown timer for a lane's waves.
    #[must_use]
    pub fn wave_timer(&self, lane: Lane) -> Fixed {
        match lane {
            Lane::Top => self.north_wave_timer,
            Lane::Bottom => self.south_wave_timer,
        }
    }

    /// Mutable countdown timer for a lane's waves.
    pub fn wave_timer_mut(&mut self, lane: Lane) -> &mut Fixed {
        match lane {
            Lane::Top => &mut self.north_wave_timer,
            Lane::Bottom => &mut self.south_wave_timer,
        }
    }

    /// Every combatant in processing order: human units, undead units,
    /// human hero, undead hero.
    pub fn combatants(&self) -> impl Iterator<Item = &Unit> {
        let [human, undead] = &self.factions;
        human
            .units
            .iter()
            .chain(undead.units.iter())
            .chain(human.active_hero.iter())
            .chain(undead.active_hero.iter())
    }

    /// Look up a unit or hero unit by id.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.combatants().find(|u| u.id == id)
    }

    /// Mutable lookup of a unit or hero unit by id.
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.factions.iter_mut().find_map(|side| {
            side.units
                .iter_mut()
                .chain(side.active_hero.iter_mut())
                .find(|u| u.id == id)
        })
    }

    /// Look up a tower by id.
    #[must_use]
    pub fn tower(&self, id: UnitId) -> Option<&Tower> {
        self.factions
            .iter()
            .flat_map(|side| side.towers.iter())
            .find(|t| t.id == id)
    }

    /// Mutable lookup of a tower by id.
    pub fn tower_mut(&mut self, id: UnitId) -> Option<&mut Tower> {
        self.factions
            .iter_mut()
            .flat_map(|side| side.towers.iter_mut())
            .find(|t| t.id == id)
    }

    /// Hash of the canonical binary encoding of the state.
    ///
    /// Two states hash equal exactly when their encodings match, which
    /// makes replay divergence visible without comparing whole states.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        if let Err(err) = bincode::serialize_into(HashWriter(&mut hasher), self) {
            tracing::warn!(error = %err, "Failed to encode match state for hashing");
        }
        hasher.finish()
    }
}

/// Feeds written bytes straight into a hasher.
struct HashWriter<'a, H: Hasher>(&'a mut H);

impl<H: Hasher> std::io::Write for HashWriter<'_, H> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.write(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let config = MatchConfig::default();
        let state = create_initial_state(&config);

        assert!(state.is_running());
        assert_eq!(state.north_wave_timer, Fixed::from_num(8));
        assert_eq!(state.south_wave_timer, Fixed::from_num(12));
        for side in &state.factions {
            assert_eq!(side.gold, Fixed::from_num(100));
            assert_eq!(side.tech_tier, 1);
            assert_eq!(side.towers.len(), 2);
            assert!(side.units.is_empty());
            assert!(side.active_hero.is_none());
            assert_eq!(side.building.health, 2000);
        }
        assert_eq!(state.faction(Faction::Human).towers[0].position, Fixed::from_num(20));
        assert_eq!(state.faction(Faction::Undead).towers[1].position, Fixed::from_num(80));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut state = create_initial_state(&MatchConfig::default());
        let tower_ids: Vec<_> = state
            .factions
            .iter()
            .flat_map(|s| s.towers.iter().map(|t| t.id))
            .collect();
        assert_eq!(tower_ids, vec![1, 2, 3, 4]);
        assert_eq!(state.allocate_id(), 5);
        assert_eq!(state.allocate_id(), 6);
    }

    #[test]
    fn test_lookup_covers_heroes() {
        let mut state = create_initial_state(&MatchConfig::default());
        let id = state.allocate_id();
        let hero = state.faction(Faction::Undead).hero.spawn_unit(id, Lane::Top, Fixed::from_num(90));
        state.faction_mut(Faction::Undead).active_hero = Some(hero);

        assert!(state.unit(id).is_some());
        if let Some(unit) = state.unit_mut(id) {
            unit.health = 1;
        }
        assert_eq!(state.unit(id).map(|u| u.health), Some(1));
        assert!(state.tower(3).is_some());
        assert!(state.tower(id).is_none());
    }

    #[test]
    fn test_state_hash_tracks_changes() {
        let config = MatchConfig::default();
        let a = create_initial_state(&config);
        let mut b = create_initial_state(&config);
        assert_eq!(a.state_hash(), b.state_hash());

        b.faction_mut(Faction::Human).gold += Fixed::DELTA;
        assert_ne!(a.state_hash(), b.state_hash());
    }
}
