use crate::config::Config;
use crate::error::{AppError, UpstreamError};
use crate::stats::{
    Hero, HeroCompatibility, HeroCounters, HeroDetails, HeroId, RankedHero, StatsProvider,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;

use super::endpoints;
use super::models::*;

const USER_AGENT: &str = concat!("mlbb_draft/", env!("CARGO_PKG_VERSION"));
const MAX_RETRIES: u32 = 3;

/// Blocking client for the hero statistics service.
pub struct StatsApiClient {
    base_url: String,
    agent: ureq::Agent,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl StatsApiClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let base_url = config
            .api_base_url
            .clone()
            .ok_or(UpstreamError::NotConfigured)?;

        let agent = ureq::AgentBuilder::new()
            .timeout(config.http_timeout)
            .user_agent(USER_AGENT)
            .build();
        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(per_second));

        Ok(StatsApiClient {
            base_url,
            agent,
            rate_limiter,
        })
    }

    fn execute_request<T: DeserializeOwned>(&self, path: &str) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        let mut retry_count = 0;

        loop {
            while self.rate_limiter.check().is_err() {
                thread::sleep(Duration::from_millis(50));
            }

            tracing::debug!(%url, "requesting statistics");
            match self.agent.get(&url).call() {
                Ok(resp) => {
                    return resp
                        .into_json::<T>()
                        .map_err(|e| UpstreamError::Malformed(format!("{}: {}", path, e)));
                }
                Err(ureq::Error::Status(429, _)) => {
                    if retry_count >= MAX_RETRIES {
                        return Err(UpstreamError::Unavailable(format!(
                            "rate limited by upstream on {}",
                            path
                        )));
                    }
                    let wait_ms = 2000 * (retry_count + 1) as u64;
                    tracing::warn!(path, wait_ms, "rate limited, retrying");
                    thread::sleep(Duration::from_millis(wait_ms));
                    retry_count += 1;
                }
                Err(ureq::Error::Status(code, _)) => {
                    return Err(UpstreamError::Unavailable(format!("HTTP {} on {}", code, path)));
                }
                Err(e) => {
                    return Err(UpstreamError::Unavailable(e.to_string()));
                }
            }
        }
    }

    fn records<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<ApiRecord<T>>, UpstreamError> {
        let response: ApiResponse<T> = self.execute_request(path)?;
        Ok(response.into_records())
    }

    /// The data block of the first record, if any.
    fn first_record<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, UpstreamError> {
        Ok(self
            .records::<T>(path)?
            .into_iter()
            .next()
            .and_then(|record| record.data))
    }
}

impl StatsProvider for StatsApiClient {
    fn hero_list(&self) -> Result<Vec<Hero>, UpstreamError> {
        let mut heroes: Vec<Hero> = self
            .records::<HeroListData>(endpoints::HERO_LIST_ENDPOINT)?
            .into_iter()
            .filter_map(|record| record.data.and_then(HeroListData::into_hero))
            .collect();
        heroes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(heroes)
    }

    fn hero_rankings(
        &self,
        window_days: u32,
        rank_bracket: &str,
        limit: usize,
    ) -> Result<Vec<RankedHero>, UpstreamError> {
        let path = endpoints::hero_rank(window_days, rank_bracket, limit);
        Ok(self
            .records::<RankingData>(&path)?
            .into_iter()
            .filter_map(|record| {
                let rank = record.rank;
                record.data.and_then(|data| data.into_ranked(rank))
            })
            .collect())
    }

    fn hero_counters(&self, hero_id: HeroId) -> Result<HeroCounters, UpstreamError> {
        let data: RelationData = self
            .first_record(&endpoints::hero_counter(hero_id))?
            .unwrap_or_default();
        Ok(HeroCounters {
            strong_against: counter_entries(data.sub_hero),
            weak_against: counter_entries(data.sub_hero_last),
        })
    }

    fn hero_compatibility(&self, hero_id: HeroId) -> Result<HeroCompatibility, UpstreamError> {
        let data: RelationData = self
            .first_record(&endpoints::hero_compatibility(hero_id))?
            .unwrap_or_default();
        Ok(HeroCompatibility {
            synergizes_with: counter_entries(data.sub_hero),
        })
    }

    fn hero_details(&self, hero_id: HeroId) -> Result<Option<HeroDetails>, UpstreamError> {
        Ok(self
            .first_record::<HeroDetailData>(&endpoints::hero_detail(hero_id))?
            .and_then(|data| data.into_details(hero_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_requires_a_base_url() {
        let config = Config::default();
        let err = StatsApiClient::new(&config).err().unwrap();
        assert!(matches!(err, AppError::Upstream(UpstreamError::NotConfigured)));
    }

    #[test]
    fn unreachable_service_is_reported_as_unavailable() {
        let config = Config {
            api_base_url: Some("http://127.0.0.1:9/".to_string()),
            http_timeout: Duration::from_millis(200),
            ..Config::default()
        };
        let client = StatsApiClient::new(&config).unwrap();
        assert!(matches!(client.hero_list(), Err(UpstreamError::Unavailable(_))));
    }
}
