mod display;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use display::output::{
    display_advance, display_analysis, display_drafts, display_error, display_hero_profile,
    display_heroes, display_info, display_rankings, display_recommendations, display_snapshot,
    display_success, display_templates,
};
use indicatif::{ProgressBar, ProgressStyle};
use mlbb_draft::analysis::recommender::RecommendationEngine;
use mlbb_draft::api::client::StatsApiClient;
use mlbb_draft::cache::CachedStats;
use mlbb_draft::config::Config;
use mlbb_draft::draft::{ActionKind, DraftId, DraftRegistry, DraftTemplate, Position};
use mlbb_draft::error::AppError;
use mlbb_draft::roster::Roster;
use mlbb_draft::stats::{filter_heroes, HeroId, StatsProvider};
use mlbb_draft::storage::DraftStore;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

type Engine = RecommendationEngine<CachedStats<StatsApiClient>>;

#[derive(Parser, Debug)]
#[command(name = "mlbb-draft")]
#[command(about = "Run 5v5 ranked drafts and get pick/ban recommendations", long_about = None)]
struct Args {
    /// Where drafts, templates and the stats cache live (default: ~/.mlbb_draft)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a new draft
    New {
        #[arg(default_value = "New Draft")]
        name: String,
    },
    /// Show teams, bans and whose turn it is
    Status { draft_id: DraftId },
    /// Ban a hero for the side whose turn it is
    Ban {
        draft_id: DraftId,
        hero_id: HeroId,
        /// Display name (defaults to the roster name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Pick a hero for the side whose turn it is
    Pick {
        draft_id: DraftId,
        hero_id: HeroId,
        #[arg(long)]
        name: Option<String>,
        /// 1 EXP lane, 2 jungler, 3 mid lane, 4 gold lane, 5 roamer
        #[arg(short, long)]
        position: Option<u8>,
    },
    /// Recommendations for the current turn
    Recommend { draft_id: DraftId },
    /// Team composition report and matchup estimate
    Analyze { draft_id: DraftId },
    /// Attach a note to a draft
    Note { draft_id: DraftId, text: String },
    /// Save a draft's picks and bans as a template
    Template {
        draft_id: DraftId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        public: bool,
    },
    /// List saved drafts
    List,
    /// List public templates
    Templates,
    /// Meta tier list ordered by win rate
    Rankings {
        /// Ranking window in days (default: MLBB_RANK_DAYS)
        #[arg(long)]
        days: Option<u32>,
        /// Rank bracket (default: MLBB_RANK_BRACKET)
        #[arg(long)]
        bracket: Option<String>,
        #[arg(long, default_value = "20")]
        size: usize,
    },
    /// Browse the hero list
    Heroes {
        #[arg(short, long)]
        role: Option<String>,
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Details, counters and synergies of one hero
    Hero { hero_id: HeroId },
}

fn main() {
    setup_logging();
    let args = Args::parse();

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }

    let store = DraftStore::new(&config.data_dir);
    let roster = Roster::standard();

    match args.command {
        Command::New { name } => {
            let session = store.create_draft(|id| DraftRegistry::starting_at(id).create(name))?;
            display_success(&format!("Created draft #{}", session.id()));
            display_snapshot(&session.snapshot());
        }
        Command::Status { draft_id } => {
            let session = store.load_draft(draft_id)?;
            display_snapshot(&session.snapshot());
        }
        Command::Ban {
            draft_id,
            hero_id,
            name,
        } => {
            let hero_name = name.unwrap_or_else(|| roster.display_name(hero_id));
            act(&store, draft_id, ActionKind::Ban, hero_id, hero_name, None)?;
        }
        Command::Pick {
            draft_id,
            hero_id,
            name,
            position,
        } => {
            let position = position
                .map(Position::try_from)
                .transpose()
                .map_err(AppError::InvalidInput)?;
            let hero_name = name.unwrap_or_else(|| roster.display_name(hero_id));
            act(&store, draft_id, ActionKind::Pick, hero_id, hero_name, position)?;
        }
        Command::Recommend { draft_id } => {
            let session = store.load_draft(draft_id)?;
            let engine = stats_engine(&config, roster)?;
            let recommendations = with_spinner("Scoring heroes...", || {
                engine.recommend_for_turn(&session)
            });
            display_recommendations(&recommendations, session.current_turn());
            save_stats_cache(&engine, &config);
        }
        Command::Analyze { draft_id } => {
            let session = store.load_draft(draft_id)?;
            let engine = stats_engine(&config, roster)?;
            let analysis = with_spinner("Analyzing compositions...", || {
                engine.analyze_draft(&session)
            });
            display_analysis(&analysis);
            save_stats_cache(&engine, &config);
        }
        Command::Note { draft_id, text } => {
            let registry = DraftRegistry::new();
            let total = store.update_draft(draft_id, |session| {
                registry.insert(session.clone())?;
                *session = registry.add_note(draft_id, text)?;
                Ok(session.notes().len())
            })?;
            display_success(&format!("Note added to draft #{} ({} total)", draft_id, total));
        }
        Command::Template {
            draft_id,
            name,
            description,
            public,
        } => {
            let session = store.load_draft(draft_id)?;
            let template = store.create_template(|id| {
                DraftTemplate::from_session(id, &session, name, description, public)
            })?;
            display_success(&format!("Saved template #{}: {}", template.id, template.name));
        }
        Command::List => {
            display_drafts(&store.list_drafts()?);
        }
        Command::Templates => {
            display_templates(&store.list_public_templates()?);
        }
        Command::Rankings {
            days,
            bracket,
            size,
        } => {
            let days = days.unwrap_or(config.rank_days);
            let bracket = bracket.unwrap_or_else(|| config.rank_bracket.clone());
            let engine = stats_engine(&config, roster)?;
            let rankings = with_spinner("Fetching rankings...", || {
                engine.stats().hero_rankings(days, &bracket, size)
            })?;
            display_rankings(&rankings, days, &bracket);
            save_stats_cache(&engine, &config);
        }
        Command::Heroes { role, search } => {
            let engine = stats_engine(&config, roster)?;
            let heroes = with_spinner("Fetching hero list...", || engine.stats().hero_list())?;
            display_heroes(&filter_heroes(heroes, role.as_deref(), search.as_deref()));
            save_stats_cache(&engine, &config);
        }
        Command::Hero { hero_id } => {
            let engine = stats_engine(&config, roster)?;
            let profile = with_spinner("Fetching hero data...", || engine.hero_profile(hero_id))?
                .ok_or_else(|| AppError::NotFound(format!("hero {}", hero_id)))?;
            display_hero_profile(&profile);
            save_stats_cache(&engine, &config);
        }
    }

    Ok(())
}

/// Apply one action to the stored draft while holding its lock, then persist the result.
fn act(
    store: &DraftStore,
    draft_id: DraftId,
    kind: ActionKind,
    hero_id: HeroId,
    hero_name: String,
    position: Option<Position>,
) -> Result<()> {
    let registry = DraftRegistry::new();
    let info = store
        .update_draft(draft_id, |session| {
            registry.insert(session.clone())?;
            let (info, updated) =
                registry.apply_action(draft_id, kind, hero_id, hero_name.clone(), position)?;
            *session = updated;
            Ok(info)
        })
        .with_context(|| format!("Cannot {} hero {} in draft #{}", kind, hero_id, draft_id))?;
    display_advance(kind, &hero_name, &info);
    Ok(())
}

fn stats_engine(config: &Config, roster: Roster) -> Result<Engine> {
    let client = StatsApiClient::new(config)?;
    let cached = CachedStats::new(client, config.cache_ttl);

    let path = config.stats_cache_path();
    match cached.load_snapshot(&path) {
        Ok(0) => {}
        Ok(count) => display_info(&format!("Loaded {} cached stat entries", count)),
        Err(e) => tracing::warn!(error = %e, "ignoring unreadable stats cache"),
    }

    Ok(RecommendationEngine::new(cached, roster)
        .with_ranking_window(config.rank_days, config.rank_bracket.clone()))
}

fn save_stats_cache(engine: &Engine, config: &Config) {
    if let Err(e) = engine.stats().save_snapshot(&config.stats_cache_path()) {
        tracing::warn!(error = %e, "failed to save stats cache");
    }
}

fn with_spinner<T>(message: &'static str, work: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = work();
    spinner.finish_and_clear();
    result
}
