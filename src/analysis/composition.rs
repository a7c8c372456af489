use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::stats::{HeroId, Role, StatsProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompositionRating {
    Excellent,
    Good,
    Average,
    Poor,
    NeedsWork,
}

impl CompositionRating {
    pub fn label(&self) -> &'static str {
        match self {
            CompositionRating::Excellent => "Excellent",
            CompositionRating::Good => "Good",
            CompositionRating::Average => "Average",
            CompositionRating::Poor => "Poor",
            CompositionRating::NeedsWork => "Needs Work",
        }
    }
}

impl fmt::Display for CompositionRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompositionReport {
    /// Count per recognized role; empty when the team has no picks.
    pub roles: BTreeMap<Role, u32>,
    /// Summed pairwise synergy, each unordered pair counted once.
    pub synergy: f64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    /// Absent for an empty team.
    pub overall_rating: Option<CompositionRating>,
}

impl CompositionReport {
    pub fn role_count(&self, role: Role) -> u32 {
        self.roles.get(&role).copied().unwrap_or(0)
    }

    pub fn total_roles(&self) -> u32 {
        self.roles.values().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupPrediction {
    pub blue_win_probability: f64,
    pub red_win_probability: f64,
    pub confidence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftAnalysis {
    pub blue: CompositionReport,
    pub red: CompositionReport,
    pub matchup: MatchupPrediction,
}

pub fn rate_composition(total_roles: u32, synergy: f64) -> CompositionRating {
    let role_balance = 1.0 - (5.0 - total_roles as f64).abs() * 0.1;
    let synergy_factor = (synergy / 10.0).min(1.0);
    let overall = (role_balance + synergy_factor) / 2.0;

    if overall >= 0.8 {
        CompositionRating::Excellent
    } else if overall >= 0.6 {
        CompositionRating::Good
    } else if overall >= 0.4 {
        CompositionRating::Average
    } else if overall >= 0.2 {
        CompositionRating::Poor
    } else {
        CompositionRating::NeedsWork
    }
}

/// Role spread, pairwise synergy and headline strengths/weaknesses of one team's picks.
///
/// Heroes whose details cannot be fetched, or whose role is not recognized, count towards no
/// role. Missing synergy data contributes nothing.
pub fn analyze_team_composition<P: StatsProvider + ?Sized>(
    stats: &P,
    picks: &[HeroId],
) -> CompositionReport {
    if picks.is_empty() {
        return CompositionReport::default();
    }

    let mut roles: BTreeMap<Role, u32> = Role::RECOGNIZED.iter().map(|r| (*r, 0)).collect();
    for &hero_id in picks {
        let role = match stats.hero_details(hero_id) {
            Ok(Some(details)) => details.role,
            Ok(None) => Role::Unknown,
            Err(err) => {
                tracing::warn!(hero_id, error = %err, "hero details unavailable");
                Role::Unknown
            }
        };
        if let Some(count) = roles.get_mut(&role) {
            *count += 1;
        }
    }

    let mut synergy = 0.0;
    for (i, &hero_id) in picks.iter().enumerate() {
        let partners = &picks[i + 1..];
        if partners.is_empty() {
            break;
        }
        let compatibility = stats.hero_compatibility(hero_id).unwrap_or_else(|err| {
            tracing::warn!(hero_id, error = %err, "compatibility unavailable");
            Default::default()
        });
        for partner in partners {
            synergy += compatibility
                .synergizes_with
                .iter()
                .filter(|s| s.hero_id == *partner)
                .map(|s| s.win_rate_change)
                .sum::<f64>();
        }
    }

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    if roles[&Role::Tank] >= 1 {
        strengths.push("Good tankiness and initiation".to_string());
    } else {
        weaknesses.push("Lacks tankiness and initiation".to_string());
    }

    if roles[&Role::Marksman] >= 1 {
        strengths.push("Strong late-game damage".to_string());
    } else {
        weaknesses.push("May lack sustained damage".to_string());
    }

    let total_roles: u32 = roles.values().sum();
    if total_roles as usize == picks.len() {
        strengths.push("Balanced role distribution".to_string());
    }

    CompositionReport {
        overall_rating: Some(rate_composition(total_roles, synergy)),
        roles,
        synergy,
        strengths,
        weaknesses,
    }
}

/// Synergy-only matchup estimate: 50/50 shifted towards the side with more synergy, by twice
/// the gap, at most 20 points.
pub fn predict_matchup(blue: &CompositionReport, red: &CompositionReport) -> MatchupPrediction {
    let mut blue_score = 50.0;
    if blue.synergy > red.synergy {
        blue_score += ((blue.synergy - red.synergy) * 2.0).min(20.0);
    } else if red.synergy > blue.synergy {
        blue_score -= ((red.synergy - blue.synergy) * 2.0).min(20.0);
    }

    MatchupPrediction {
        blue_win_probability: blue_score,
        red_win_probability: 100.0 - blue_score,
        confidence: "Medium".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{CounterEntry, HeroDetails, InMemoryStats};

    fn details(id: HeroId, role: Role) -> HeroDetails {
        HeroDetails {
            id,
            name: format!("Hero {}", id),
            role,
            lane: "Unknown".to_string(),
            image_url: String::new(),
            difficulty: 1,
            skill_count: 4,
        }
    }

    fn synergy(hero_id: HeroId, win_rate_change: f64) -> CounterEntry {
        CounterEntry {
            hero_id,
            hero_name: format!("Hero {}", hero_id),
            win_rate_change,
        }
    }

    #[test]
    fn empty_team_has_empty_report() {
        let report = analyze_team_composition(&InMemoryStats::new(), &[]);
        assert!(report.roles.is_empty());
        assert_eq!(report.synergy, 0.0);
        assert!(report.strengths.is_empty());
        assert!(report.weaknesses.is_empty());
        assert_eq!(report.overall_rating, None);
    }

    #[test]
    fn full_team_with_tank_and_marksman() {
        let stats = InMemoryStats::new()
            .with_details(details(1, Role::Tank))
            .with_details(details(2, Role::Marksman))
            .with_details(details(3, Role::Mage))
            .with_details(details(4, Role::Assassin))
            .with_details(details(5, Role::Support))
            .with_synergy(1, vec![synergy(2, 6.0), synergy(3, 2.0)])
            .with_synergy(2, vec![synergy(1, 100.0)])
            .with_synergy(4, vec![synergy(5, 3.0)]);

        let report = analyze_team_composition(&stats, &[1, 2, 3, 4, 5]);
        assert_eq!(report.role_count(Role::Tank), 1);
        assert_eq!(report.role_count(Role::Fighter), 0);
        assert_eq!(report.total_roles(), 5);
        // 2 -> 1 is the reverse direction of an already counted pair and is ignored
        assert_eq!(report.synergy, 11.0);
        assert_eq!(
            report.strengths,
            vec![
                "Good tankiness and initiation",
                "Strong late-game damage",
                "Balanced role distribution"
            ]
        );
        assert!(report.weaknesses.is_empty());
        assert_eq!(report.overall_rating, Some(CompositionRating::Excellent));
    }

    #[test]
    fn unknown_roles_break_balance_and_flag_weaknesses() {
        let stats = InMemoryStats::new()
            .with_details(details(1, Role::Mage))
            .with_details(details(2, Role::Unknown));

        let report = analyze_team_composition(&stats, &[1, 2, 3]);
        assert_eq!(report.total_roles(), 1);
        assert_eq!(report.roles.len(), 6);
        assert_eq!(
            report.weaknesses,
            vec!["Lacks tankiness and initiation", "May lack sustained damage"]
        );
        assert!(report.strengths.is_empty());
        // role_balance 0.6, synergy_factor 0.0
        assert_eq!(report.overall_rating, Some(CompositionRating::Poor));
    }

    #[test]
    fn upstream_failure_degrades_to_no_roles() {
        let report = analyze_team_composition(&InMemoryStats::new().unavailable(), &[1, 2]);
        assert_eq!(report.total_roles(), 0);
        assert_eq!(report.synergy, 0.0);
        assert_eq!(report.weaknesses.len(), 2);
    }

    #[test]
    fn rating_thresholds() {
        assert_eq!(rate_composition(5, 10.0), CompositionRating::Excellent);
        assert_eq!(rate_composition(5, 4.0), CompositionRating::Good);
        assert_eq!(rate_composition(4, 0.0), CompositionRating::Average);
        assert_eq!(rate_composition(1, 0.0), CompositionRating::Poor);
        assert_eq!(rate_composition(0, -10.0), CompositionRating::NeedsWork);
        assert_eq!(CompositionRating::NeedsWork.to_string(), "Needs Work");
    }

    #[test]
    fn matchup_leans_towards_more_synergy() {
        let blue = CompositionReport {
            synergy: 6.0,
            ..Default::default()
        };
        let red = CompositionReport {
            synergy: 1.0,
            ..Default::default()
        };
        let prediction = predict_matchup(&blue, &red);
        assert_eq!(prediction.blue_win_probability, 60.0);
        assert_eq!(prediction.red_win_probability, 40.0);

        let lopsided = predict_matchup(&red, &CompositionReport { synergy: 40.0, ..Default::default() });
        assert_eq!(lopsided.blue_win_probability, 30.0);
        assert_eq!(predict_matchup(&blue, &blue).blue_win_probability, 50.0);
    }
}
