//! Hero statistics as seen by the draft core, and the provider seam in front of the
//! statistics service.
//!
//! All rates are on a 0-100 scale. Providers convert upstream fractions before handing
//! values out.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::analysis::scoring::{Effectiveness, Tier};
use crate::error::UpstreamError;

pub type HeroId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Tank,
    Fighter,
    Assassin,
    Mage,
    Marksman,
    Support,
    Unknown,
}

impl Role {
    /// The six roles a composition is tallied over.
    pub const RECOGNIZED: [Role; 6] = [
        Role::Tank,
        Role::Fighter,
        Role::Assassin,
        Role::Mage,
        Role::Marksman,
        Role::Support,
    ];

    pub fn from_label(label: &str) -> Role {
        match label.trim().to_ascii_lowercase().as_str() {
            "tank" => Role::Tank,
            "fighter" => Role::Fighter,
            "assassin" => Role::Assassin,
            "mage" => Role::Mage,
            "marksman" => Role::Marksman,
            "support" => Role::Support,
            _ => Role::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Tank => "Tank",
            Role::Fighter => "Fighter",
            Role::Assassin => "Assassin",
            Role::Mage => "Mage",
            Role::Marksman => "Marksman",
            Role::Support => "Support",
            Role::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub id: HeroId,
    pub name: String,
    pub role: Role,
    pub lane: String,
    #[serde(default)]
    pub image_url: String,
    pub win_rate: f64,
    pub pick_rate: f64,
    pub ban_rate: f64,
}

/// An entry of the meta ranking list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedHero {
    pub id: HeroId,
    pub name: String,
    pub win_rate: f64,
    pub pick_rate: f64,
    pub ban_rate: f64,
    pub rank: u32,
}

impl RankedHero {
    pub fn tier(&self) -> Tier {
        Tier::from_win_rate(self.win_rate)
    }
}

/// One directional relationship: "the owning hero's win rate moves by `win_rate_change`
/// when facing (or teaming with) `hero_id`".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterEntry {
    pub hero_id: HeroId,
    pub hero_name: String,
    pub win_rate_change: f64,
}

impl CounterEntry {
    pub fn effectiveness(&self) -> Effectiveness {
        Effectiveness::from_win_rate_change(self.win_rate_change)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeroCounters {
    pub strong_against: Vec<CounterEntry>,
    pub weak_against: Vec<CounterEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeroCompatibility {
    pub synergizes_with: Vec<CounterEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroDetails {
    pub id: HeroId,
    pub name: String,
    pub role: Role,
    pub lane: String,
    pub image_url: String,
    pub difficulty: u32,
    pub skill_count: usize,
}

/// Source of hero statistics. Implementations may be slow and may fail; callers decide how
/// to degrade.
pub trait StatsProvider: Send + Sync {
    fn hero_list(&self) -> Result<Vec<Hero>, UpstreamError>;

    fn hero_rankings(
        &self,
        window_days: u32,
        rank_bracket: &str,
        limit: usize,
    ) -> Result<Vec<RankedHero>, UpstreamError>;

    fn hero_counters(&self, hero_id: HeroId) -> Result<HeroCounters, UpstreamError>;

    fn hero_compatibility(&self, hero_id: HeroId) -> Result<HeroCompatibility, UpstreamError>;

    fn hero_details(&self, hero_id: HeroId) -> Result<Option<HeroDetails>, UpstreamError>;
}

impl<P: StatsProvider + ?Sized> StatsProvider for &P {
    fn hero_list(&self) -> Result<Vec<Hero>, UpstreamError> {
        (**self).hero_list()
    }

    fn hero_rankings(
        &self,
        window_days: u32,
        rank_bracket: &str,
        limit: usize,
    ) -> Result<Vec<RankedHero>, UpstreamError> {
        (**self).hero_rankings(window_days, rank_bracket, limit)
    }

    fn hero_counters(&self, hero_id: HeroId) -> Result<HeroCounters, UpstreamError> {
        (**self).hero_counters(hero_id)
    }

    fn hero_compatibility(&self, hero_id: HeroId) -> Result<HeroCompatibility, UpstreamError> {
        (**self).hero_compatibility(hero_id)
    }

    fn hero_details(&self, hero_id: HeroId) -> Result<Option<HeroDetails>, UpstreamError> {
        (**self).hero_details(hero_id)
    }
}

/// Filter a hero list by role label and by a case-insensitive name fragment.
/// A role of `"all"` (or none) keeps every role.
pub fn filter_heroes(heroes: Vec<Hero>, role: Option<&str>, search: Option<&str>) -> Vec<Hero> {
    let role = role
        .map(str::trim)
        .filter(|r| !r.is_empty() && !r.eq_ignore_ascii_case("all"))
        .map(str::to_lowercase);
    let search = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    heroes
        .into_iter()
        .filter(|h| match &role {
            Some(role) => h.role.label().to_lowercase() == *role,
            None => true,
        })
        .filter(|h| match &search {
            Some(search) => h.name.to_lowercase().contains(search.as_str()),
            None => true,
        })
        .collect()
}

/// Fixture-backed provider for tests and offline runs.
#[derive(Debug, Default)]
pub struct InMemoryStats {
    heroes: Vec<Hero>,
    rankings: Vec<RankedHero>,
    counters: HashMap<HeroId, HeroCounters>,
    compatibility: HashMap<HeroId, HeroCompatibility>,
    details: HashMap<HeroId, HeroDetails>,
    unavailable: bool,
    calls: AtomicUsize,
}

impl InMemoryStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_heroes(mut self, heroes: Vec<Hero>) -> Self {
        self.heroes = heroes;
        self
    }

    pub fn with_rankings(mut self, rankings: Vec<RankedHero>) -> Self {
        self.rankings = rankings;
        self
    }

    pub fn with_counters(mut self, hero_id: HeroId, counters: HeroCounters) -> Self {
        self.counters.insert(hero_id, counters);
        self
    }

    pub fn with_synergy(mut self, hero_id: HeroId, synergizes_with: Vec<CounterEntry>) -> Self {
        self.compatibility
            .insert(hero_id, HeroCompatibility { synergizes_with });
        self
    }

    pub fn with_details(mut self, details: HeroDetails) -> Self {
        self.details.insert(details.id, details);
        self
    }

    /// Every call fails as if the service were down.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Number of provider calls served so far, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn serve<T>(&self, value: impl FnOnce() -> T) -> Result<T, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            Err(UpstreamError::Unavailable("fixture marked unavailable".to_string()))
        } else {
            Ok(value())
        }
    }
}

impl StatsProvider for InMemoryStats {
    fn hero_list(&self) -> Result<Vec<Hero>, UpstreamError> {
        self.serve(|| self.heroes.clone())
    }

    fn hero_rankings(
        &self,
        _window_days: u32,
        _rank_bracket: &str,
        limit: usize,
    ) -> Result<Vec<RankedHero>, UpstreamError> {
        self.serve(|| self.rankings.iter().take(limit).cloned().collect())
    }

    fn hero_counters(&self, hero_id: HeroId) -> Result<HeroCounters, UpstreamError> {
        self.serve(|| self.counters.get(&hero_id).cloned().unwrap_or_default())
    }

    fn hero_compatibility(&self, hero_id: HeroId) -> Result<HeroCompatibility, UpstreamError> {
        self.serve(|| self.compatibility.get(&hero_id).cloned().unwrap_or_default())
    }

    fn hero_details(&self, hero_id: HeroId) -> Result<Option<HeroDetails>, UpstreamError> {
        self.serve(|| self.details.get(&hero_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero(id: HeroId, name: &str, role: Role) -> Hero {
        Hero {
            id,
            name: name.to_string(),
            role,
            lane: "Unknown".to_string(),
            image_url: String::new(),
            win_rate: 50.0,
            pick_rate: 1.0,
            ban_rate: 1.0,
        }
    }

    #[test]
    fn role_labels_parse_case_insensitively() {
        assert_eq!(Role::from_label("marksman"), Role::Marksman);
        assert_eq!(Role::from_label(" Tank "), Role::Tank);
        assert_eq!(Role::from_label("Jungler"), Role::Unknown);
    }

    #[test]
    fn filter_by_role_and_search() {
        let heroes = vec![
            hero(1, "Miya", Role::Marksman),
            hero(6, "Tigreal", Role::Tank),
            hero(18, "Layla", Role::Marksman),
        ];

        let marksmen = filter_heroes(heroes.clone(), Some("MARKSMAN"), None);
        assert_eq!(marksmen.len(), 2);

        let all = filter_heroes(heroes.clone(), Some("all"), Some("ay"));
        assert_eq!(all.iter().map(|h| h.id).collect::<Vec<_>>(), vec![18]);

        assert_eq!(filter_heroes(heroes, None, None).len(), 3);
    }

    #[test]
    fn unavailable_fixture_fails_and_counts_calls() {
        let stats = InMemoryStats::new().unavailable();
        assert!(matches!(stats.hero_list(), Err(UpstreamError::Unavailable(_))));
        assert!(stats.hero_counters(1).is_err());
        assert_eq!(stats.call_count(), 2);
    }

    #[test]
    fn missing_fixture_entries_are_empty() {
        let stats = InMemoryStats::new();
        assert_eq!(stats.hero_counters(42).unwrap(), HeroCounters::default());
        assert_eq!(stats.hero_details(42).unwrap(), None);
    }
}
