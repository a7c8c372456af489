use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::composition::{self, CompositionReport, DraftAnalysis};
use super::scoring::Tier;
use crate::draft::{ActionKind, DraftSession, Side, Turn};
use crate::error::UpstreamError;
use crate::roster::Roster;
use crate::stats::{
    HeroCompatibility, HeroCounters, HeroDetails, HeroId, RankedHero, Role, StatsProvider,
};

pub const PICK_RECOMMENDATION_LIMIT: usize = 10;
pub const BAN_RECOMMENDATION_LIMIT: usize = 8;
/// Size of the ranking list that feeds the meta component of pick scores.
pub const META_RANKING_SIZE: usize = 50;
/// Size of the ranking list ban candidates are drawn from.
pub const BAN_POOL_SIZE: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredHero {
    pub hero_id: HeroId,
    pub name: String,
    pub role: Role,
    pub win_rate: f64,
    pub pick_rate: f64,
    pub ban_rate: f64,
    pub tier: Tier,
    pub score: f64,
    /// Short explanation; synergy callouts name the ally, not this hero.
    pub reason: String,
}

/// A hero's details with its counter and synergy lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroProfile {
    pub details: HeroDetails,
    pub counters: HeroCounters,
    pub compatibility: HeroCompatibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecommendationStatus {
    Ready,
    /// The base hero or ranking list could not be fetched.
    UpstreamUnavailable,
    DraftCompleted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub status: RecommendationStatus,
    pub action: Option<ActionKind>,
    pub heroes: Vec<ScoredHero>,
}

impl Recommendations {
    fn ready(action: ActionKind, heroes: Vec<ScoredHero>) -> Self {
        Recommendations {
            status: RecommendationStatus::Ready,
            action: Some(action),
            heroes,
        }
    }

    fn unavailable(action: ActionKind) -> Self {
        Recommendations {
            status: RecommendationStatus::UpstreamUnavailable,
            action: Some(action),
            heroes: Vec::new(),
        }
    }

    fn completed() -> Self {
        Recommendations {
            status: RecommendationStatus::DraftCompleted,
            action: None,
            heroes: Vec::new(),
        }
    }
}

/// Everything that feeds one candidate's pick score besides its own id.
pub struct PickSignals<'a> {
    /// The candidate's entry in the meta ranking list, if it made the list.
    pub meta: Option<&'a RankedHero>,
    /// Synergy lists of the allies already picked, in pick order.
    pub ally_synergies: &'a [(HeroId, HeroCompatibility)],
    /// The candidate's own counter data.
    pub candidate_counters: &'a HeroCounters,
    /// Counter data of the enemies already picked, in pick order.
    pub enemy_counters: &'a [(HeroId, HeroCounters)],
}

/// Pick score on a 0-100 scale, starting from 50.
pub fn draft_score(candidate: HeroId, signals: &PickSignals) -> f64 {
    let mut score = 50.0;

    if let Some(meta) = signals.meta {
        score += (meta.win_rate - 50.0) * 0.5;
        score += (meta.pick_rate * 0.1).min(5.0);
    }

    for (_, compatibility) in signals.ally_synergies {
        for synergy in &compatibility.synergizes_with {
            if synergy.hero_id == candidate {
                score += (synergy.win_rate_change * 0.5).min(3.0);
            }
        }
    }

    for (enemy_id, _) in signals.enemy_counters {
        for counter in &signals.candidate_counters.strong_against {
            if counter.hero_id == *enemy_id {
                score += (counter.win_rate_change * 0.3).min(5.0);
            }
        }
    }

    for (_, enemy_counters) in signals.enemy_counters {
        for counter in &enemy_counters.strong_against {
            if counter.hero_id == candidate {
                score -= (counter.win_rate_change.abs() * 0.2).min(3.0);
            }
        }
    }

    score.clamp(0.0, 100.0)
}

/// Headline by score, then at most one synergy and one counter callout.
///
/// The synergy callout names the ally already on the team whose synergy list contains
/// `candidate`, so it reads "Great synergy with <ally>".
fn pick_reason(
    candidate: HeroId,
    score: f64,
    signals: &PickSignals,
    names: &dyn Fn(HeroId) -> String,
) -> String {
    let mut reasons = Vec::new();

    if score >= 80.0 {
        reasons.push("Excellent meta pick".to_string());
    } else if score >= 65.0 {
        reasons.push("Strong meta choice".to_string());
    } else if score >= 50.0 {
        reasons.push("Solid pick".to_string());
    }

    let synergy_ally = signals.ally_synergies.iter().find_map(|(ally_id, compat)| {
        compat
            .synergizes_with
            .iter()
            .any(|s| s.hero_id == candidate && s.win_rate_change > 3.0)
            .then_some(*ally_id)
    });
    if let Some(ally_id) = synergy_ally {
        reasons.push(format!("Great synergy with {}", names(ally_id)));
    }

    let countered = signals.enemy_counters.iter().find_map(|(enemy_id, _)| {
        signals
            .candidate_counters
            .strong_against
            .iter()
            .find(|c| c.hero_id == *enemy_id && c.win_rate_change > 3.0)
    });
    if let Some(counter) = countered {
        reasons.push(format!("Counters {}", counter.hero_name));
    }

    if reasons.is_empty() {
        "Standard pick".to_string()
    } else {
        reasons.join(" | ")
    }
}

fn ban_reason(hero: &RankedHero) -> String {
    let mut reasons = Vec::new();

    if hero.ban_rate > 20.0 {
        reasons.push("Commonly banned");
    }
    if hero.win_rate > 55.0 {
        reasons.push("High win rate");
    }
    if hero.pick_rate > 15.0 {
        reasons.push("Popular pick");
    }

    if reasons.is_empty() {
        "Strategic ban".to_string()
    } else {
        reasons.join(" | ")
    }
}

/// Highest score first; equal scores fall back to ascending hero id.
fn rank_and_truncate(heroes: &mut Vec<ScoredHero>, limit: usize) {
    heroes.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.hero_id.cmp(&b.hero_id))
    });
    heroes.truncate(limit);
}

/// Treat a failed secondary lookup as "no data".
fn or_degrade<T: Default>(result: Result<T, UpstreamError>, what: &str, hero_id: HeroId) -> T {
    result.unwrap_or_else(|err| {
        tracing::warn!(hero_id, error = %err, "{} unavailable, scoring without it", what);
        T::default()
    })
}

pub struct RecommendationEngine<P> {
    stats: P,
    roster: Roster,
    rank_days: u32,
    rank_bracket: String,
}

impl<P: StatsProvider> RecommendationEngine<P> {
    pub fn new(stats: P, roster: Roster) -> Self {
        RecommendationEngine {
            stats,
            roster,
            rank_days: 1,
            rank_bracket: "all".to_string(),
        }
    }

    pub fn with_ranking_window(mut self, days: u32, bracket: impl Into<String>) -> Self {
        self.rank_days = days;
        self.rank_bracket = bracket.into();
        self
    }

    pub fn stats(&self) -> &P {
        &self.stats
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    fn rankings(&self, limit: usize) -> Result<Vec<RankedHero>, UpstreamError> {
        self.stats
            .hero_rankings(self.rank_days, &self.rank_bracket, limit)
    }

    /// Best heroes to pick next for a side with `ally_picks`, facing `enemy_picks`.
    pub fn pick_recommendations(
        &self,
        ally_picks: &[HeroId],
        bans: &[HeroId],
        enemy_picks: &[HeroId],
    ) -> Recommendations {
        let heroes = match self.stats.hero_list() {
            Ok(heroes) => heroes,
            Err(err) => {
                tracing::warn!(error = %err, "hero list unavailable, no pick recommendations");
                return Recommendations::unavailable(ActionKind::Pick);
            }
        };

        let rankings = self.rankings(META_RANKING_SIZE).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "rankings unavailable, scoring without meta");
            Vec::new()
        });
        let meta: HashMap<HeroId, &RankedHero> = rankings.iter().map(|r| (r.id, r)).collect();

        let ally_synergies: Vec<(HeroId, HeroCompatibility)> = ally_picks
            .iter()
            .map(|&id| (id, or_degrade(self.stats.hero_compatibility(id), "compatibility", id)))
            .collect();
        let enemy_counters: Vec<(HeroId, HeroCounters)> = enemy_picks
            .iter()
            .map(|&id| (id, or_degrade(self.stats.hero_counters(id), "counters", id)))
            .collect();

        let names: HashMap<HeroId, String> =
            heroes.iter().map(|h| (h.id, h.name.clone())).collect();
        let name_of = |id: HeroId| {
            names
                .get(&id)
                .cloned()
                .unwrap_or_else(|| self.roster.display_name(id))
        };

        let excluded: HashSet<HeroId> = ally_picks
            .iter()
            .chain(bans)
            .chain(enemy_picks)
            .copied()
            .collect();

        let mut scored: Vec<ScoredHero> = heroes
            .iter()
            .filter(|hero| !excluded.contains(&hero.id))
            .map(|hero| {
                let candidate_counters = if enemy_picks.is_empty() {
                    HeroCounters::default()
                } else {
                    or_degrade(self.stats.hero_counters(hero.id), "counters", hero.id)
                };
                let signals = PickSignals {
                    meta: meta.get(&hero.id).copied(),
                    ally_synergies: &ally_synergies,
                    candidate_counters: &candidate_counters,
                    enemy_counters: &enemy_counters,
                };
                let score = draft_score(hero.id, &signals);
                let reason = pick_reason(hero.id, score, &signals, &name_of);

                ScoredHero {
                    hero_id: hero.id,
                    name: hero.name.clone(),
                    role: hero.role,
                    win_rate: hero.win_rate,
                    pick_rate: hero.pick_rate,
                    ban_rate: hero.ban_rate,
                    tier: Tier::from_win_rate(hero.win_rate),
                    score,
                    reason,
                }
            })
            .collect();

        rank_and_truncate(&mut scored, PICK_RECOMMENDATION_LIMIT);
        tracing::debug!(count = scored.len(), "pick recommendations computed");
        Recommendations::ready(ActionKind::Pick, scored)
    }

    /// Meta heroes worth denying, boosted by how well they pair with the enemy's picks.
    pub fn ban_recommendations(
        &self,
        enemy_picks: &[HeroId],
        existing_bans: &[HeroId],
    ) -> Recommendations {
        let rankings = match self.rankings(BAN_POOL_SIZE) {
            Ok(rankings) => rankings,
            Err(err) => {
                tracing::warn!(error = %err, "rankings unavailable, no ban recommendations");
                return Recommendations::unavailable(ActionKind::Ban);
            }
        };

        let enemy_synergies: Vec<HeroCompatibility> = enemy_picks
            .iter()
            .map(|&id| or_degrade(self.stats.hero_compatibility(id), "compatibility", id))
            .collect();
        let roles: HashMap<HeroId, Role> = self
            .stats
            .hero_list()
            .map(|heroes| heroes.into_iter().map(|h| (h.id, h.role)).collect())
            .unwrap_or_default();

        let mut scored: Vec<ScoredHero> = rankings
            .iter()
            .filter(|hero| !existing_bans.contains(&hero.id) && !enemy_picks.contains(&hero.id))
            .map(|hero| {
                let mut score = hero.pick_rate * 0.4 + hero.win_rate * 0.3 + hero.ban_rate * 0.3;
                for compatibility in &enemy_synergies {
                    for synergy in &compatibility.synergizes_with {
                        if synergy.hero_id == hero.id {
                            score += synergy.win_rate_change * 2.0;
                        }
                    }
                }

                ScoredHero {
                    hero_id: hero.id,
                    name: hero.name.clone(),
                    role: roles.get(&hero.id).copied().unwrap_or(Role::Unknown),
                    win_rate: hero.win_rate,
                    pick_rate: hero.pick_rate,
                    ban_rate: hero.ban_rate,
                    tier: hero.tier(),
                    score,
                    reason: ban_reason(hero),
                }
            })
            .collect();

        rank_and_truncate(&mut scored, BAN_RECOMMENDATION_LIMIT);
        tracing::debug!(count = scored.len(), "ban recommendations computed");
        Recommendations::ready(ActionKind::Ban, scored)
    }

    /// Recommendations for whatever the draft's current turn asks for.
    pub fn recommend_for_turn(&self, session: &DraftSession) -> Recommendations {
        let token = match session.current_turn() {
            Turn::Next(token) => token,
            Turn::Completed => return Recommendations::completed(),
        };

        let ally_picks = session.team(token.side).pick_ids();
        let enemy_picks = session.team(token.side.opponent()).pick_ids();
        let bans = session.all_bans();

        match token.kind {
            ActionKind::Pick => self.pick_recommendations(&ally_picks, &bans, &enemy_picks),
            ActionKind::Ban => self.ban_recommendations(&enemy_picks, &bans),
        }
    }

    /// Details plus relations of one hero. Only the details lookup is fatal; relation lists
    /// that cannot be fetched come back empty.
    pub fn hero_profile(&self, hero_id: HeroId) -> Result<Option<HeroProfile>, UpstreamError> {
        let details = match self.stats.hero_details(hero_id)? {
            Some(details) => details,
            None => return Ok(None),
        };
        Ok(Some(HeroProfile {
            details,
            counters: or_degrade(self.stats.hero_counters(hero_id), "counters", hero_id),
            compatibility: or_degrade(
                self.stats.hero_compatibility(hero_id),
                "compatibility",
                hero_id,
            ),
        }))
    }

    pub fn analyze_team_composition(&self, picks: &[HeroId]) -> CompositionReport {
        composition::analyze_team_composition(&self.stats, picks)
    }

    /// Both teams' compositions plus a synergy-based matchup estimate.
    pub fn analyze_draft(&self, session: &DraftSession) -> DraftAnalysis {
        let blue = self.analyze_team_composition(&session.team(Side::Blue).pick_ids());
        let red = self.analyze_team_composition(&session.team(Side::Red).pick_ids());
        let matchup = composition::predict_matchup(&blue, &red);
        DraftAnalysis { blue, red, matchup }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{CounterEntry, Hero, InMemoryStats};

    fn hero(id: HeroId, name: &str) -> Hero {
        Hero {
            id,
            name: name.to_string(),
            role: Role::Fighter,
            lane: "Exp Lane".to_string(),
            image_url: String::new(),
            win_rate: 50.0,
            pick_rate: 2.0,
            ban_rate: 1.0,
        }
    }

    fn ranked(id: HeroId, win_rate: f64, pick_rate: f64, ban_rate: f64) -> RankedHero {
        RankedHero {
            id,
            name: format!("Hero {}", id),
            win_rate,
            pick_rate,
            ban_rate,
            rank: id,
        }
    }

    fn entry(hero_id: HeroId, hero_name: &str, win_rate_change: f64) -> CounterEntry {
        CounterEntry {
            hero_id,
            hero_name: hero_name.to_string(),
            win_rate_change,
        }
    }

    fn roster_of(count: HeroId) -> Vec<Hero> {
        (1..=count).map(|id| hero(id, &format!("Hero {}", id))).collect()
    }

    fn engine(stats: InMemoryStats) -> RecommendationEngine<InMemoryStats> {
        RecommendationEngine::new(stats, Roster::standard())
    }

    fn score_of(recs: &Recommendations, hero_id: HeroId) -> f64 {
        recs.heroes
            .iter()
            .find(|h| h.hero_id == hero_id)
            .map(|h| h.score)
            .unwrap()
    }

    #[test]
    fn picks_exclude_used_heroes_and_are_capped_and_sorted() {
        let engine = engine(InMemoryStats::new().with_heroes(roster_of(20)));
        let recs = engine.pick_recommendations(&[1, 2], &[3, 4], &[5]);

        assert_eq!(recs.status, RecommendationStatus::Ready);
        assert_eq!(recs.action, Some(ActionKind::Pick));
        assert_eq!(recs.heroes.len(), PICK_RECOMMENDATION_LIMIT);
        assert!(recs.heroes.iter().all(|h| h.hero_id > 5));
        assert!(recs.heroes.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn equal_scores_tie_break_on_hero_id() {
        let mut heroes = roster_of(12);
        heroes.reverse();
        let engine = engine(InMemoryStats::new().with_heroes(heroes));
        let recs = engine.pick_recommendations(&[], &[], &[]);

        let ids: Vec<HeroId> = recs.heroes.iter().map(|h| h.hero_id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
        assert_eq!(recs.heroes[0].reason, "Solid pick");
    }

    #[test]
    fn meta_component_rewards_ranked_heroes() {
        let stats = InMemoryStats::new()
            .with_heroes(roster_of(3))
            .with_rankings(vec![ranked(2, 60.0, 100.0, 0.0), ranked(3, 44.0, 10.0, 0.0)]);
        let recs = engine(stats).pick_recommendations(&[], &[], &[]);

        // 50 + (60 - 50) * 0.5 + min(100 * 0.1, 5)
        assert_eq!(score_of(&recs, 2), 60.0);
        // 50 + (44 - 50) * 0.5 + 1
        assert_eq!(score_of(&recs, 3), 48.0);
        assert_eq!(recs.heroes[0].hero_id, 2);
    }

    #[test]
    fn ally_synergy_adds_capped_bonus_and_callout() {
        let stats = InMemoryStats::new()
            .with_heroes(vec![hero(1, "Miya"), hero(2, "Balmond"), hero(3, "Saber")])
            .with_synergy(1, vec![entry(2, "Balmond", 4.0), entry(3, "Saber", 10.0)]);
        let recs = engine(stats).pick_recommendations(&[1], &[], &[]);

        assert_eq!(score_of(&recs, 2), 52.0);
        assert_eq!(score_of(&recs, 3), 53.0);
        let saber = &recs.heroes[0];
        assert_eq!(saber.hero_id, 3);
        assert_eq!(saber.reason, "Solid pick | Great synergy with Miya");
    }

    #[test]
    fn synergy_sums_across_allies() {
        let stats = InMemoryStats::new()
            .with_heroes(roster_of(4))
            .with_synergy(1, vec![entry(4, "Hero 4", 10.0)])
            .with_synergy(2, vec![entry(4, "Hero 4", 10.0)]);
        let recs = engine(stats).pick_recommendations(&[1, 2], &[], &[]);
        assert_eq!(score_of(&recs, 4), 56.0);
    }

    #[test]
    fn counters_add_and_being_countered_subtracts() {
        let stats = InMemoryStats::new()
            .with_heroes(vec![hero(3, "Saber"), hero(4, "Alice"), hero(9, "Akai")])
            .with_counters(
                3,
                HeroCounters {
                    strong_against: vec![entry(9, "Akai", 20.0)],
                    weak_against: Vec::new(),
                },
            )
            .with_counters(
                9,
                HeroCounters {
                    strong_against: vec![entry(4, "Alice", -20.0)],
                    weak_against: Vec::new(),
                },
            );
        let recs = engine(stats).pick_recommendations(&[], &[], &[9]);

        assert_eq!(score_of(&recs, 3), 55.0);
        assert_eq!(recs.heroes[0].reason, "Solid pick | Counters Akai");
        assert_eq!(score_of(&recs, 4), 47.0);
        let alice = recs.heroes.iter().find(|h| h.hero_id == 4).unwrap();
        assert_eq!(alice.reason, "Standard pick");
    }

    #[test]
    fn draft_score_is_clamped() {
        let counters = HeroCounters::default();
        let no_allies: Vec<(HeroId, HeroCompatibility)> = Vec::new();
        let no_enemies: Vec<(HeroId, HeroCounters)> = Vec::new();

        for win_rate in [-500.0, -50.0, 0.0, 50.0, 100.0, 250.0, 900.0] {
            let meta = ranked(1, win_rate, 100.0, 0.0);
            let signals = PickSignals {
                meta: Some(&meta),
                ally_synergies: &no_allies,
                candidate_counters: &counters,
                enemy_counters: &no_enemies,
            };
            let score = draft_score(1, &signals);
            assert!((0.0..=100.0).contains(&score), "score {} out of range", score);
        }

        let meta = ranked(1, 900.0, 0.0, 0.0);
        let signals = PickSignals {
            meta: Some(&meta),
            ally_synergies: &no_allies,
            candidate_counters: &counters,
            enemy_counters: &no_enemies,
        };
        assert_eq!(draft_score(1, &signals), 100.0);
    }

    #[test]
    fn excellent_headline_for_top_scores() {
        let stats = InMemoryStats::new()
            .with_heroes(roster_of(1))
            .with_rankings(vec![ranked(1, 110.0, 50.0, 0.0)]);
        let recs = engine(stats).pick_recommendations(&[], &[], &[]);
        assert_eq!(recs.heroes[0].reason, "Excellent meta pick");
    }

    #[test]
    fn missing_hero_list_is_distinguishable_from_no_candidates() {
        let down = engine(InMemoryStats::new().unavailable()).pick_recommendations(&[], &[], &[]);
        assert_eq!(down.status, RecommendationStatus::UpstreamUnavailable);
        assert!(down.heroes.is_empty());

        let empty = engine(InMemoryStats::new()).pick_recommendations(&[], &[], &[]);
        assert_eq!(empty.status, RecommendationStatus::Ready);
        assert!(empty.heroes.is_empty());
    }

    #[test]
    fn ban_scores_blend_rates_and_enemy_synergy() {
        let stats = InMemoryStats::new()
            .with_rankings(vec![
                ranked(1, 56.0, 20.0, 30.0),
                ranked(2, 50.0, 10.0, 10.0),
                ranked(3, 50.0, 10.0, 10.0),
                ranked(4, 60.0, 60.0, 60.0),
            ])
            .with_synergy(4, vec![entry(2, "Hero 2", 10.0)]);
        let recs = engine(stats).ban_recommendations(&[4], &[3]);

        assert_eq!(recs.action, Some(ActionKind::Ban));
        let ids: Vec<HeroId> = recs.heroes.iter().map(|h| h.hero_id).collect();
        // hero 2: 4 + 15 + 3 + 20 = 42; hero 1: 8 + 16.8 + 9 = 33.8
        assert_eq!(ids, vec![2, 1]);
        assert!((recs.heroes[0].score - 42.0).abs() < 1e-9);
        assert!((recs.heroes[1].score - 33.8).abs() < 1e-9);
        assert_eq!(
            recs.heroes[1].reason,
            "Commonly banned | High win rate | Popular pick"
        );
        assert_eq!(recs.heroes[0].reason, "Strategic ban");
        assert_eq!(recs.heroes[1].tier, Tier::SPlus);
    }

    #[test]
    fn ban_list_is_capped_at_eight() {
        let rankings = (1..=30).map(|id| ranked(id, 50.0, 5.0, 5.0)).collect();
        let recs = engine(InMemoryStats::new().with_rankings(rankings)).ban_recommendations(&[], &[]);
        assert_eq!(recs.heroes.len(), BAN_RECOMMENDATION_LIMIT);
        let ids: Vec<HeroId> = recs.heroes.iter().map(|h| h.hero_id).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn ban_recommendations_report_missing_rankings() {
        let recs = engine(InMemoryStats::new().unavailable()).ban_recommendations(&[], &[]);
        assert_eq!(recs.status, RecommendationStatus::UpstreamUnavailable);
    }

    #[test]
    fn turn_drives_pick_or_ban() {
        let stats = InMemoryStats::new()
            .with_heroes(roster_of(20))
            .with_rankings((1..=20).map(|id| ranked(id, 50.0, 5.0, 5.0)).collect());
        let engine = engine(stats);
        let mut session = DraftSession::new(1, "scrim");

        let recs = engine.recommend_for_turn(&session);
        assert_eq!(recs.action, Some(ActionKind::Ban));

        for hero in 1..=4 {
            session.apply_action(ActionKind::Ban, hero, "x", None).unwrap();
        }
        let recs = engine.recommend_for_turn(&session);
        assert_eq!(recs.action, Some(ActionKind::Pick));
        assert!(recs.heroes.iter().all(|h| h.hero_id > 4));

        for i in 0..10 {
            let kind = session.current_turn().token().unwrap().kind;
            session.apply_action(kind, 5 + i, "x", None).unwrap();
        }
        let recs = engine.recommend_for_turn(&session);
        assert_eq!(recs.status, RecommendationStatus::DraftCompleted);
        assert!(recs.heroes.is_empty());
    }
    /// Serves details but fails every other lookup.
    struct DetailsOnly;

    impl StatsProvider for DetailsOnly {
        fn hero_list(&self) -> Result<Vec<Hero>, UpstreamError> {
            Err(UpstreamError::Unavailable("down".into()))
        }

        fn hero_rankings(&self, _: u32, _: &str, _: usize) -> Result<Vec<RankedHero>, UpstreamError> {
            Err(UpstreamError::Unavailable("down".into()))
        }

        fn hero_counters(&self, _: HeroId) -> Result<HeroCounters, UpstreamError> {
            Err(UpstreamError::Unavailable("down".into()))
        }

        fn hero_compatibility(&self, _: HeroId) -> Result<HeroCompatibility, UpstreamError> {
            Err(UpstreamError::Unavailable("down".into()))
        }

        fn hero_details(&self, hero_id: HeroId) -> Result<Option<HeroDetails>, UpstreamError> {
            Ok((hero_id == 6).then(|| HeroDetails {
                id: 6,
                name: "Tigreal".to_string(),
                role: Role::Tank,
                lane: "Roam".to_string(),
                image_url: String::new(),
                difficulty: 2,
                skill_count: 4,
            }))
        }
    }

    #[test]
    fn hero_profile_survives_missing_relations() {
        let engine = RecommendationEngine::new(DetailsOnly, Roster::standard());
        let profile = engine.hero_profile(6).unwrap().unwrap();
        assert_eq!(profile.details.name, "Tigreal");
        assert!(profile.counters.strong_against.is_empty());
        assert!(profile.counters.weak_against.is_empty());
        assert!(profile.compatibility.synergizes_with.is_empty());

        assert!(engine.hero_profile(7).unwrap().is_none());
    }

    #[test]
    fn hero_profile_fails_when_details_are_unavailable() {
        let engine = engine(InMemoryStats::new().unavailable());
        assert!(matches!(engine.hero_profile(6), Err(UpstreamError::Unavailable(_))));
    }

    #[test]
    fn hero_profile_carries_relations() {
        let details = HeroDetails {
            id: 6,
            name: "Tigreal".to_string(),
            role: Role::Tank,
            lane: "Roam".to_string(),
            image_url: String::new(),
            difficulty: 2,
            skill_count: 4,
        };
        let stats = InMemoryStats::new()
            .with_details(details)
            .with_synergy(6, vec![entry(1, "Miya", 4.0)]);
        let profile = engine(stats).hero_profile(6).unwrap().unwrap();
        assert_eq!(profile.compatibility.synergizes_with.len(), 1);
    }
}
