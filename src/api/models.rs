use serde::Deserialize;
use serde_json::Value;

use crate::stats::{CounterEntry, Hero, HeroDetails, HeroId, RankedHero, Role};

// Every endpoint wraps its payload as { "data": { "records": [ { "rank"?, "data": {...} } ] } }.
// Any level may be missing or null; that is read as "no data".
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<ApiData<T>>,
}

#[derive(Debug, Deserialize)]
pub struct ApiData<T> {
    pub records: Option<Vec<ApiRecord<T>>>,
}

#[derive(Debug, Deserialize)]
pub struct ApiRecord<T> {
    pub rank: Option<u32>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn into_records(self) -> Vec<ApiRecord<T>> {
        self.data.and_then(|d| d.records).unwrap_or_default()
    }
}

// hero-list-new/
#[derive(Debug, Deserialize)]
pub struct HeroListData {
    pub hero: Option<HeroSummaryDto>,
    pub main_hero_win_rate: Option<f64>,
    pub main_hero_appearance_rate: Option<f64>,
    pub main_hero_ban_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct HeroSummaryDto {
    pub heroid: Option<HeroId>,
    pub heroname: Option<String>,
    pub role: Option<Value>,
    pub lane: Option<Value>,
    pub heroimage: Option<String>,
}

impl HeroListData {
    /// Records without a hero block or hero id are dropped.
    pub fn into_hero(self) -> Option<Hero> {
        let hero = self.hero?;
        let id = hero.heroid?;
        Some(Hero {
            id,
            name: hero.heroname.unwrap_or_else(|| format!("Hero {}", id)),
            role: hero
                .role
                .as_ref()
                .and_then(label_of)
                .map(|r| Role::from_label(&r))
                .unwrap_or(Role::Unknown),
            lane: hero
                .lane
                .as_ref()
                .and_then(label_of)
                .unwrap_or_else(|| "Unknown".to_string()),
            image_url: hero.heroimage.unwrap_or_default(),
            win_rate: percent(self.main_hero_win_rate),
            pick_rate: percent(self.main_hero_appearance_rate),
            ban_rate: percent(self.main_hero_ban_rate),
        })
    }
}

// hero-rank/
#[derive(Debug, Deserialize)]
pub struct RankingData {
    pub main_heroid: Option<HeroId>,
    pub main_heroname: Option<String>,
    pub main_hero_win_rate: Option<f64>,
    pub main_hero_appearance_rate: Option<f64>,
    pub main_hero_ban_rate: Option<f64>,
}

impl RankingData {
    pub fn into_ranked(self, rank: Option<u32>) -> Option<RankedHero> {
        let id = self.main_heroid?;
        Some(RankedHero {
            id,
            name: self.main_heroname.unwrap_or_else(|| format!("Hero {}", id)),
            win_rate: percent(self.main_hero_win_rate),
            pick_rate: percent(self.main_hero_appearance_rate),
            ban_rate: percent(self.main_hero_ban_rate),
            rank: rank.unwrap_or(0),
        })
    }
}

// hero-counter/{id}/ and hero-compatibility/{id}/
#[derive(Debug, Default, Deserialize)]
pub struct RelationData {
    pub sub_hero: Option<Vec<SubHeroDto>>,
    pub sub_hero_last: Option<Vec<SubHeroDto>>,
}

#[derive(Debug, Deserialize)]
pub struct SubHeroDto {
    pub sub_heroid: Option<HeroId>,
    pub sub_heroname: Option<String>,
    pub increase_win_rate: Option<f64>,
}

/// Relation entries without a hero id are dropped; a missing win-rate change counts as 0.
pub fn counter_entries(list: Option<Vec<SubHeroDto>>) -> Vec<CounterEntry> {
    list.unwrap_or_default()
        .into_iter()
        .filter_map(|sub| {
            let hero_id = sub.sub_heroid?;
            Some(CounterEntry {
                hero_id,
                hero_name: sub.sub_heroname.unwrap_or_else(|| format!("Hero {}", hero_id)),
                win_rate_change: sub.increase_win_rate.unwrap_or(0.0),
            })
        })
        .collect()
}

// hero-detail/{id}/
#[derive(Debug, Deserialize)]
pub struct HeroDetailData {
    pub hero: Option<HeroDetailWrapper>,
}

#[derive(Debug, Deserialize)]
pub struct HeroDetailWrapper {
    pub data: Option<HeroDetailDto>,
}

#[derive(Debug, Deserialize)]
pub struct HeroDetailDto {
    pub heroid: Option<HeroId>,
    pub heroname: Option<String>,
    pub role: Option<Value>,
    pub lane: Option<Value>,
    pub heroimage: Option<String>,
    #[serde(default)]
    pub heroskilllist: Vec<Value>,
    pub herodifficulty: Option<Value>,
}

impl HeroDetailData {
    pub fn into_details(self, requested: HeroId) -> Option<HeroDetails> {
        let dto = self.hero?.data?;
        Some(HeroDetails {
            id: dto.heroid.unwrap_or(requested),
            name: dto
                .heroname
                .unwrap_or_else(|| format!("Hero {}", requested)),
            role: dto
                .role
                .as_ref()
                .and_then(label_of)
                .map(|r| Role::from_label(&r))
                .unwrap_or(Role::Unknown),
            lane: dto
                .lane
                .as_ref()
                .and_then(label_of)
                .unwrap_or_else(|| "Unknown".to_string()),
            image_url: dto.heroimage.unwrap_or_default(),
            difficulty: dto.herodifficulty.as_ref().and_then(number_of).unwrap_or(1),
            skill_count: dto.heroskilllist.len(),
        })
    }
}

/// Upstream rates are fractions; the core works in percent.
fn percent(rate: Option<f64>) -> f64 {
    rate.unwrap_or(0.0) * 100.0
}

/// Role and lane come either as a plain string or as a list of strings (first one wins).
fn label_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(label_of),
        _ => None,
    }
}

fn number_of(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hero_list_records_convert_rates_to_percent() {
        let body = json!({
            "data": { "records": [
                { "data": {
                    "hero": { "heroid": 1, "heroname": "Miya", "role": "Marksman", "lane": ["Gold Lane"] },
                    "main_hero_win_rate": 0.52,
                    "main_hero_appearance_rate": 0.031,
                    "main_hero_ban_rate": 0.004
                } },
                { "data": { "main_hero_win_rate": 0.5 } }
            ] }
        });
        let response: ApiResponse<HeroListData> = serde_json::from_value(body).unwrap();
        let heroes: Vec<Hero> = response
            .into_records()
            .into_iter()
            .filter_map(|r| r.data.and_then(HeroListData::into_hero))
            .collect();

        assert_eq!(heroes.len(), 1);
        let miya = &heroes[0];
        assert_eq!(miya.role, Role::Marksman);
        assert_eq!(miya.lane, "Gold Lane");
        assert!((miya.win_rate - 52.0).abs() < 1e-9);
        assert!((miya.pick_rate - 3.1).abs() < 1e-9);
    }

    #[test]
    fn missing_envelope_levels_mean_no_records() {
        let empty: ApiResponse<RankingData> = serde_json::from_value(json!({})).unwrap();
        assert!(empty.into_records().is_empty());
        let null: ApiResponse<RankingData> =
            serde_json::from_value(json!({ "data": { "records": null } })).unwrap();
        assert!(null.into_records().is_empty());
    }

    #[test]
    fn ranking_keeps_rank_ordinal() {
        let data: RankingData = serde_json::from_value(json!({
            "main_heroid": 84, "main_heroname": "Ling", "main_hero_win_rate": 0.56
        }))
        .unwrap();
        let ranked = data.into_ranked(Some(3)).unwrap();
        assert_eq!(ranked.rank, 3);
        assert!((ranked.win_rate - 56.0).abs() < 1e-9);
        assert_eq!(ranked.pick_rate, 0.0);
    }

    #[test]
    fn relation_entries_default_missing_change() {
        let data: RelationData = serde_json::from_value(json!({
            "sub_hero": [
                { "sub_heroid": 6, "sub_heroname": "Tigreal", "increase_win_rate": 4.5 },
                { "sub_heroid": 7, "sub_heroname": "Alucard" },
                { "sub_heroname": "Nobody" }
            ]
        }))
        .unwrap();
        assert!(data.sub_hero_last.is_none());
        let entries = counter_entries(data.sub_hero);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].win_rate_change, 4.5);
        assert_eq!(entries[1].win_rate_change, 0.0);
        assert!(counter_entries(data.sub_hero_last).is_empty());
    }

    #[test]
    fn detail_reads_nested_hero_block() {
        let data: HeroDetailData = serde_json::from_value(json!({
            "hero": { "data": {
                "heroid": 6, "heroname": "Tigreal", "role": ["Tank"], "lane": "Roam",
                "heroskilllist": [{}, {}, {}], "herodifficulty": "2"
            } }
        }))
        .unwrap();
        let details = data.into_details(6).unwrap();
        assert_eq!(details.role, Role::Tank);
        assert_eq!(details.difficulty, 2);
        assert_eq!(details.skill_count, 3);
    }
}
