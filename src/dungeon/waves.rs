//! Wave scaling formulas and wave composition.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use super::data::DungeonLevel;

/// Wave scaling parameters.
#[derive(Resource, Debug, Clone)]
pub struct WaveTuning {
    /// Extra enemies per wave after the first.
    pub count_step: u32,
    /// Extra health fraction per wave after the first.
    pub health_step: f32,
    /// Clear XP grows by this fraction of base XP per wave.
    pub xp_step: f32,
    pub hardest_xp_multiplier: u32,
    /// Seconds between a clear and the next wave.
    pub next_wave_delay: f32,
    /// Enemies spawn on a ring of this radius around the arena center.
    pub spawn_radius: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            count_step: 2,
            health_step: 0.15,
            xp_step: 0.5,
            hardest_xp_multiplier: 2,
            next_wave_delay: 2.0,
            spawn_radius: 12.0,
        }
    }
}

impl WaveTuning {
    pub fn enemy_count(&self, base: u32, wave: u32) -> u32 {
        base + self.count_step * wave.saturating_sub(1)
    }

    pub fn health_multiplier(&self, wave: u32) -> f32 {
        1.0 + self.health_step * wave.saturating_sub(1) as f32
    }

    pub fn clear_xp(&self, base_xp: u32, wave: u32, hardest: bool) -> u32 {
        let xp = (base_xp as f32 * (1.0 + self.xp_step * wave as f32)).round() as u32;
        if hardest {
            xp * self.hardest_xp_multiplier
        } else {
            xp
        }
    }
}

/// Extra spawns a wave number earns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    None,
    Elite,
    Boss,
    TwinBosses,
}

impl Milestone {
    /// Every 10th wave brings the twins, every 5th a boss, every 3rd an elite.
    pub fn for_wave(wave: u32) -> Self {
        if wave == 0 {
            Milestone::None
        } else if wave % 10 == 0 {
            Milestone::TwinBosses
        } else if wave % 5 == 0 {
            Milestone::Boss
        } else if wave % 3 == 0 {
            Milestone::Elite
        } else {
            Milestone::None
        }
    }
}

/// What one wave spawns.
#[derive(Debug, Clone, PartialEq)]
pub struct WavePlan {
    pub wave: u32,
    pub health_multiplier: f32,
    /// Regular enemies drawn from the level pool.
    pub regulars: Vec<String>,
    /// Elite or single boss added on milestone waves.
    pub extras: Vec<String>,
    pub twins: Option<(String, String)>,
}

impl WavePlan {
    pub fn total(&self) -> usize {
        self.regulars.len() + self.extras.len() + if self.twins.is_some() { 2 } else { 0 }
    }
}

/// Compose a wave for `level`.
pub fn plan_wave(level: &DungeonLevel, wave: u32, tuning: &WaveTuning, rng: &mut impl Rng) -> WavePlan {
    let count = tuning.enemy_count(level.base_enemy_count, wave);
    let regulars = (0..count)
        .filter_map(|_| level.enemy_pool.choose(rng).cloned())
        .collect();

    let mut extras = Vec::new();
    let mut twins = None;
    match Milestone::for_wave(wave) {
        Milestone::TwinBosses => twins = Some(level.twin_bosses.clone()),
        Milestone::Boss => extras.extend(level.bosses.choose(rng).cloned()),
        Milestone::Elite => extras.push(level.elite.clone()),
        Milestone::None => {}
    }

    WavePlan {
        wave,
        health_multiplier: tuning.health_multiplier(wave),
        regulars,
        extras,
        twins,
    }
}

/// Evenly spaced points on a ring, starting at +X.
pub fn ring_positions(center: Vec3, radius: f32, count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / count.max(1) as f32;
            center + Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn level(base: u32) -> DungeonLevel {
        DungeonLevel {
            name: "Test Depths".into(),
            base_enemy_count: base,
            base_xp: 100,
            enemy_pool: vec!["goblin".into(), "skeleton".into()],
            elite: "troll".into(),
            bosses: vec!["goblin_king".into()],
            twin_bosses: ("sun_knight".into(), "moon_knight".into()),
            reward_tier: 1,
            hardest: false,
            milestone_rewards: BTreeMap::new(),
        }
    }

    #[test]
    fn level_three_wave_four_scaling() {
        let tuning = WaveTuning::default();
        assert_eq!(tuning.enemy_count(5, 4), 5 + 2 * 3);
        assert!((tuning.health_multiplier(4) - 1.45).abs() < 1e-6);
    }

    #[test]
    fn first_wave_is_unscaled() {
        let tuning = WaveTuning::default();
        assert_eq!(tuning.enemy_count(3, 1), 3);
        assert_eq!(tuning.health_multiplier(1), 1.0);
    }

    #[test]
    fn clear_xp_grows_and_doubles_on_hardest() {
        let tuning = WaveTuning::default();
        assert_eq!(tuning.clear_xp(100, 1, false), 150);
        assert_eq!(tuning.clear_xp(100, 4, false), 300);
        assert_eq!(tuning.clear_xp(100, 4, true), 600);
    }

    #[test]
    fn milestones_by_wave() {
        assert_eq!(Milestone::for_wave(1), Milestone::None);
        assert_eq!(Milestone::for_wave(3), Milestone::Elite);
        assert_eq!(Milestone::for_wave(5), Milestone::Boss);
        assert_eq!(Milestone::for_wave(9), Milestone::Elite);
        assert_eq!(Milestone::for_wave(10), Milestone::TwinBosses);
        assert_eq!(Milestone::for_wave(15), Milestone::Boss);
        assert_eq!(Milestone::for_wave(30), Milestone::TwinBosses);
    }

    #[test]
    fn plans_add_milestone_spawns_on_top() {
        let tuning = WaveTuning::default();
        let mut rng = StdRng::seed_from_u64(1);

        let plan = plan_wave(&level(3), 3, &tuning, &mut rng);
        assert_eq!(plan.regulars.len(), 7);
        assert_eq!(plan.extras, vec!["troll".to_string()]);

        let plan = plan_wave(&level(3), 10, &tuning, &mut rng);
        assert_eq!(plan.twins, Some(("sun_knight".into(), "moon_knight".into())));
        assert_eq!(plan.total(), 3 + 18 + 2);
    }

    #[test]
    fn ring_positions_keep_their_distance() {
        let center = Vec3::new(1.0, 0.0, 1.0);
        for position in ring_positions(center, 12.0, 5) {
            assert!((position.distance(center) - 12.0).abs() < 1e-4);
        }
    }
}
