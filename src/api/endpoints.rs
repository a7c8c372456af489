// Paths relative to the configured statistics base URL.

use crate::stats::HeroId;

pub const HERO_LIST_ENDPOINT: &str = "hero-list-new/";

pub fn hero_rank(days: u32, rank: &str, size: usize) -> String {
    format!(
        "hero-rank/?days={}&rank={}&size={}&sort_field=win_rate&sort_order=desc",
        days, rank, size
    )
}

pub fn hero_counter(hero_id: HeroId) -> String {
    format!("hero-counter/{}/", hero_id)
}

pub fn hero_compatibility(hero_id: HeroId) -> String {
    format!("hero-compatibility/{}/", hero_id)
}

pub fn hero_detail(hero_id: HeroId) -> String {
    format!("hero-detail/{}/", hero_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_query_sorts_by_win_rate() {
        assert_eq!(
            hero_rank(1, "all", 50),
            "hero-rank/?days=1&rank=all&size=50&sort_field=win_rate&sort_order=desc"
        );
        assert_eq!(hero_counter(12), "hero-counter/12/");
    }
}
