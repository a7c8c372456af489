use colored::*;
use mlbb_draft::analysis::composition::{CompositionReport, DraftAnalysis};
use mlbb_draft::analysis::recommender::{HeroProfile, RecommendationStatus, Recommendations};
use mlbb_draft::draft::{
    ActionKind, AdvanceInfo, DraftSession, DraftSnapshot, DraftTemplate, Side, Team, Turn,
};
use mlbb_draft::stats::{CounterEntry, Hero, RankedHero, Role};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct PickRow {
    #[tabled(rename = "#")]
    order: String,
    hero: String,
    position: String,
}

#[derive(Tabled)]
struct BanRow {
    #[tabled(rename = "#")]
    order: String,
    hero: String,
}

#[derive(Tabled)]
struct RecommendationRow {
    rank: String,
    hero: String,
    role: String,
    tier: String,
    win_rate: String,
    score: String,
    reason: String,
}

#[derive(Tabled)]
struct DraftRow {
    id: String,
    name: String,
    phase: String,
    progress: String,
    updated: String,
}

#[derive(Tabled)]
struct TemplateRow {
    id: String,
    name: String,
    description: String,
    blue: String,
    red: String,
}

#[derive(Tabled)]
struct HeroRow {
    id: String,
    hero: String,
    role: String,
    lane: String,
    win_rate: String,
    pick_rate: String,
    ban_rate: String,
}

#[derive(Tabled)]
struct RankingRow {
    rank: String,
    hero: String,
    tier: String,
    win_rate: String,
    pick_rate: String,
    ban_rate: String,
}

#[derive(Tabled)]
struct RelationRow {
    hero: String,
    change: String,
    effectiveness: String,
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

fn side_title(side: Side) -> ColoredString {
    match side {
        Side::Blue => "BLUE SIDE".bold().blue(),
        Side::Red => "RED SIDE".bold().red(),
    }
}

fn turn_label(turn: Turn) -> ColoredString {
    match turn {
        Turn::Next(token) => {
            let label = format!("{} {}", token.side, token.kind).to_uppercase();
            match token.side {
                Side::Blue => label.blue().bold(),
                Side::Red => label.red().bold(),
            }
        }
        Turn::Completed => "COMPLETED".green().bold(),
    }
}

fn print_team(team: &Team) {
    println!("\n{} ({})", side_title(team.side()), team.name());

    if team.bans().is_empty() {
        println!("  Bans: {}", "none".dimmed());
    } else {
        let rows: Vec<BanRow> = team
            .bans()
            .iter()
            .map(|b| BanRow {
                order: b.ban_order.to_string(),
                hero: b.hero_name.clone(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("  Bans\n{}", table);
    }

    if team.picks().is_empty() {
        println!("  Picks: {}", "none".dimmed());
    } else {
        let rows: Vec<PickRow> = team
            .picks()
            .iter()
            .map(|p| PickRow {
                order: p.pick_order.to_string(),
                hero: p.hero_name.clone(),
                position: p
                    .position
                    .map(|pos| pos.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("  Picks\n{}", table);
    }
}

pub fn display_snapshot(snapshot: &DraftSnapshot) {
    println!(
        "\n{}",
        format!("🎮 Draft #{}: {}", snapshot.id, snapshot.name)
            .bold()
            .cyan()
    );
    println!("{}", "=".repeat(60).cyan());
    println!(
        "{} {}   {} {}/{}   {} {}",
        "Phase:".bold(),
        snapshot.phase,
        "Turn:".bold(),
        snapshot.current_turn_index,
        snapshot.total_turns,
        "Next:".bold(),
        turn_label(snapshot.current_turn)
    );

    print_team(&snapshot.blue);
    print_team(&snapshot.red);
    println!();
}

pub fn display_advance(kind: ActionKind, hero_name: &str, info: &AdvanceInfo) {
    display_success(&format!(
        "{} {} ({}/{} turns)",
        match kind {
            ActionKind::Ban => "Banned",
            ActionKind::Pick => "Picked",
        },
        hero_name.bold(),
        info.current_turn_index,
        info.total_turns
    ));
    if info.is_completed {
        println!("{}", "🏁 Draft completed".green().bold());
    } else {
        println!("   Next: {}", turn_label(info.next_turn));
    }
}

pub fn display_recommendations(recommendations: &Recommendations, turn: Turn) {
    let title = match recommendations.action {
        Some(ActionKind::Pick) => "🎯 Pick Recommendations",
        Some(ActionKind::Ban) => "🚫 Ban Recommendations",
        None => "Recommendations",
    };
    println!("\n{} for {}", title.bold().cyan(), turn_label(turn));
    println!("{}\n", "=".repeat(60).cyan());

    match recommendations.status {
        RecommendationStatus::DraftCompleted => {
            println!("{}", "Draft is completed, nothing left to recommend".yellow());
            return;
        }
        RecommendationStatus::UpstreamUnavailable => {
            println!(
                "{}",
                "Statistics service is unavailable, no recommendations right now".yellow()
            );
            return;
        }
        RecommendationStatus::Ready => {}
    }

    if recommendations.heroes.is_empty() {
        println!("{}", "No heroes qualify for this turn".yellow());
        return;
    }

    let rows: Vec<RecommendationRow> = recommendations
        .heroes
        .iter()
        .enumerate()
        .map(|(idx, hero)| RecommendationRow {
            rank: format!("#{}", idx + 1),
            hero: hero.name.clone(),
            role: hero.role.to_string(),
            tier: hero.tier.to_string(),
            win_rate: format!("{:.1}%", hero.win_rate),
            score: format!("{:.1}", hero.score),
            reason: hero.reason.clone(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    if let Some(top) = recommendations.heroes.first() {
        println!(
            "\n{} {} ({})\n",
            "Top choice:".bold().yellow(),
            top.name.bold(),
            top.reason
        );
    }
}

fn print_composition(side: Side, report: &CompositionReport) {
    println!("\n{}", side_title(side));

    if report.roles.is_empty() {
        println!("  {}", "No picks yet".dimmed());
        return;
    }

    let roles: Vec<String> = Role::RECOGNIZED
        .iter()
        .map(|role| format!("{} {}", role, report.role_count(*role)))
        .collect();
    println!("  Roles:   {}", roles.join(" · "));
    println!("  Synergy: {:.1}", report.synergy);
    if let Some(rating) = report.overall_rating {
        println!("  Rating:  {}", rating.to_string().bold());
    }
    for strength in &report.strengths {
        println!("  {} {}", "+".green(), strength);
    }
    for weakness in &report.weaknesses {
        println!("  {} {}", "-".red(), weakness);
    }
}

pub fn display_analysis(analysis: &DraftAnalysis) {
    println!("\n{}", "📊 TEAM COMPOSITION ANALYSIS".bold().cyan());
    println!("{}", "=".repeat(60).cyan());

    print_composition(Side::Blue, &analysis.blue);
    print_composition(Side::Red, &analysis.red);

    let matchup = &analysis.matchup;
    println!("\n{}", "Matchup Prediction".bold().yellow());
    println!(
        "  {} {:.0}%  vs  {} {:.0}%  (confidence: {})\n",
        "Blue".blue().bold(),
        matchup.blue_win_probability,
        "Red".red().bold(),
        matchup.red_win_probability,
        matchup.confidence
    );
}

pub fn display_drafts(drafts: &[DraftSession]) {
    println!("\n{}", "🗂  DRAFTS".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    if drafts.is_empty() {
        println!("{}", "No drafts yet. Start one with `mlbb-draft new`".yellow());
        return;
    }

    let rows: Vec<DraftRow> = drafts
        .iter()
        .map(|d| DraftRow {
            id: d.id().to_string(),
            name: d.name().to_string(),
            phase: d.phase().to_string(),
            progress: format!("{}/{}", d.current_turn_index(), d.total_turns()),
            updated: d.updated_at().format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_templates(templates: &[DraftTemplate]) {
    println!("\n{}", "📚 PUBLIC TEMPLATES".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    if templates.is_empty() {
        println!("{}", "No public templates".yellow());
        return;
    }

    let names = |picks: &[mlbb_draft::draft::TemplatePick]| {
        picks
            .iter()
            .map(|p| p.hero_name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let rows: Vec<TemplateRow> = templates
        .iter()
        .map(|t| TemplateRow {
            id: t.id.to_string(),
            name: t.name.clone(),
            description: t.description.clone(),
            blue: names(&t.blue_picks),
            red: names(&t.red_picks),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_heroes(heroes: &[Hero]) {
    println!("\n{}", format!("🦸 HEROES ({})", heroes.len()).bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    if heroes.is_empty() {
        println!("{}", "No heroes match".yellow());
        return;
    }

    let rows: Vec<HeroRow> = heroes
        .iter()
        .map(|h| HeroRow {
            id: h.id.to_string(),
            hero: h.name.clone(),
            role: h.role.to_string(),
            lane: h.lane.clone(),
            win_rate: format!("{:.1}%", h.win_rate),
            pick_rate: format!("{:.1}%", h.pick_rate),
            ban_rate: format!("{:.1}%", h.ban_rate),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

fn ranking_row(hero: &RankedHero) -> RankingRow {
    RankingRow {
        rank: format!("#{}", hero.rank),
        hero: hero.name.clone(),
        tier: hero.tier().to_string(),
        win_rate: format!("{:.2}%", hero.win_rate),
        pick_rate: format!("{:.2}%", hero.pick_rate),
        ban_rate: format!("{:.2}%", hero.ban_rate),
    }
}

pub fn display_rankings(rankings: &[RankedHero], days: u32, bracket: &str) {
    println!(
        "\n{}",
        format!("🏆 META RANKINGS (last {} day(s), {})", days, bracket)
            .bold()
            .cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());

    if rankings.is_empty() {
        println!("{}", "No ranking data".yellow());
        return;
    }

    let rows: Vec<RankingRow> = rankings.iter().map(ranking_row).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

fn print_relations(title: &str, entries: &[CounterEntry]) {
    println!("\n{}", title.bold().yellow());
    if entries.is_empty() {
        println!("  {}", "no data".dimmed());
        return;
    }

    let rows: Vec<RelationRow> = entries
        .iter()
        .map(|e| RelationRow {
            hero: e.hero_name.clone(),
            change: format!("{:+.2}", e.win_rate_change),
            effectiveness: e.effectiveness().to_string(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

pub fn display_hero_profile(profile: &HeroProfile) {
    let details = &profile.details;
    println!(
        "\n{}",
        format!("🦸 {} (#{})", details.name, details.id).bold().cyan()
    );
    println!("{}", "=".repeat(60).cyan());
    println!(
        "  Role: {}   Lane: {}   Difficulty: {}   Skills: {}",
        details.role, details.lane, details.difficulty, details.skill_count
    );

    print_relations("Strong against", &profile.counters.strong_against);
    print_relations("Weak against", &profile.counters.weak_against);
    print_relations("Synergizes with", &profile.compatibility.synergizes_with);
    println!();
}
