use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::BufRead;
use std::sync::Arc;

use culturequest::config::Config;
use culturequest::countries::CountryCatalog;
use culturequest::geo::{
    pano_url, GeocodingClient, ImageryClient, LatLng, ResolveOptions, SpotResolver, SpotSource,
};
use culturequest::leaderboard::LeaderboardClient;
use culturequest::quiz::{build_rounds, Quiz};
use culturequest::score::ScoreStore;
use culturequest::server;

/// CultureQuest — street-imagery geography quiz
///
/// Resolves panoramic viewpoints inside countries and runs a
/// multiple-choice quiz over them.
///
/// Examples:
///   culturequest Kenya
///   culturequest "New Zealand" --seed 7
///   culturequest --play --rounds 5
///   culturequest --play --player nina
///   culturequest --top 10
///   culturequest --serve --port 8080
#[derive(Parser)]
#[command(name = "culturequest", version, about, long_about = None)]
struct Cli {
    /// Country name to resolve (positional). Example: culturequest Kenya
    #[arg(index = 1)]
    country: Option<String>,

    /// Play a quiz in the terminal.
    #[arg(long)]
    play: bool,

    /// Number of quiz rounds.
    #[arg(long, default_value_t = 5)]
    rounds: usize,

    /// Player name for leaderboard submission after a quiz.
    #[arg(long)]
    player: Option<String>,

    /// Show the top N leaderboard entries.
    #[arg(long)]
    top: Option<usize>,

    /// Start the HTTP API server.
    #[arg(long)]
    serve: bool,

    /// Server bind host.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server bind port.
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Fix the random source for reproducible sampling and quizzes.
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum candidate attempts per resolution.
    #[arg(long)]
    attempts: Option<u32>,

    /// Imagery search radius in meters.
    #[arg(long)]
    radius_m: Option<u32>,

    /// API key for the geocoding and imagery services
    /// (overrides CULTUREQUEST_API_KEY).
    #[arg(long)]
    api_key: Option<String>,

    /// Leaderboard endpoint (overrides CULTUREQUEST_LEADERBOARD_URL).
    #[arg(long)]
    leaderboard_url: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(ref key) = cli.api_key {
        config.api_key = key.clone();
    }
    if let Some(ref url) = cli.leaderboard_url {
        config.leaderboard_url = Some(url.clone());
    }

    let defaults = ResolveOptions::default();
    let opts = ResolveOptions {
        attempts: cli.attempts.unwrap_or(defaults.attempts),
        radius_m: cli.radius_m.unwrap_or(defaults.radius_m),
    };

    let catalog = CountryCatalog::builtin();
    let resolver = SpotResolver::with_options(
        GeocodingClient::new(config.api_key.clone()),
        ImageryClient::new(config.api_key.clone()),
        opts,
    );

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // ── Mode dispatch: --serve > --top > --play > positional ────

    if cli.serve {
        warn_if_keyless(&config);
        let state = Arc::new(server::AppState { resolver, catalog });
        let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("Error: Cannot start async runtime: {}", e);
            std::process::exit(1);
        });
        runtime.block_on(server::start(&cli.host, cli.port, state));
        return;
    }

    if let Some(limit) = cli.top {
        show_leaderboard(&config, limit);
        return;
    }

    if cli.play {
        warn_if_keyless(&config);
        run_quiz(&cli, &config, &catalog, &resolver, &mut rng);
        return;
    }

    if let Some(ref country) = cli.country {
        warn_if_keyless(&config);
        resolve_one(country, &catalog, &resolver, &mut rng);
        return;
    }

    eprintln!("Error: No mode selected.");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  culturequest Kenya");
    eprintln!("  culturequest --play --rounds 5");
    eprintln!("  culturequest --top 10");
    eprintln!("  culturequest --serve --port 8080");
    std::process::exit(1);
}

fn warn_if_keyless(config: &Config) {
    if config.api_key.is_empty() {
        eprintln!("Warning: No API key set (CULTUREQUEST_API_KEY); geo lookups will fail.");
    }
}

// ─── Single resolution ──────────────────────────────────────────

fn resolve_one(
    country: &str,
    catalog: &CountryCatalog,
    resolver: &SpotResolver<GeocodingClient, ImageryClient>,
    rng: &mut StdRng,
) {
    // Prefer the catalog's canonical spelling when the query matches.
    let name = catalog
        .find(country)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| country.to_string());

    let spot = resolver.resolve_with_rng(&name, rng).unwrap_or_else(|| {
        eprintln!("Error: No usable geometry for '{}'", name);
        std::process::exit(1);
    });

    eprintln!("  {} ({} after {} attempts)", spot.point, spot.source, spot.attempts);
    if spot.source == SpotSource::Centroid {
        eprintln!("  Note: fallback viewpoint, imagery not guaranteed.");
    }
    eprintln!("  {}", pano_url(spot.point));

    // JSON to stdout, human lines to stderr.
    match serde_json::to_string_pretty(&spot) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

// ─── Leaderboard ────────────────────────────────────────────────

fn show_leaderboard(config: &Config, limit: usize) {
    let url = config.leaderboard_url.as_deref().unwrap_or_else(|| {
        eprintln!("Error: No leaderboard endpoint set (CULTUREQUEST_LEADERBOARD_URL).");
        std::process::exit(1);
    });

    let entries = LeaderboardClient::new(url).top(limit).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if entries.is_empty() {
        eprintln!("Leaderboard is empty.");
        return;
    }

    for (i, entry) in entries.iter().enumerate() {
        println!("{:>3}. {:<20} {:>6}", i + 1, entry.player, entry.score);
    }
}

// ─── Terminal quiz ──────────────────────────────────────────────

fn run_quiz(
    cli: &Cli,
    config: &Config,
    catalog: &CountryCatalog,
    resolver: &SpotResolver<GeocodingClient, ImageryClient>,
    rng: &mut StdRng,
) {
    let rounds = build_rounds(catalog, cli.rounds.max(1), 4, rng);
    if rounds.is_empty() {
        eprintln!("Error: Country catalog is empty.");
        std::process::exit(1);
    }

    let mut quiz = Quiz::new(rounds);
    let stdin = std::io::stdin();

    while let Some(round) = quiz.current().cloned() {
        let (answered, total) = quiz.progress();
        eprintln!();
        eprintln!("── Round {}/{} ──", answered + 1, total);

        // Absent resolution degrades to the deterministic fallback
        // viewpoint instead of failing the round.
        let viewpoint = match resolver.resolve_with_rng(&round.country, rng) {
            Some(spot) => {
                if spot.source == SpotSource::Centroid {
                    eprintln!("  (fallback viewpoint, imagery not guaranteed)");
                }
                spot.point
            }
            None => LatLng::new(0.0, 0.0),
        };
        eprintln!("  Where is this? {}", pano_url(viewpoint));

        for (i, choice) in round.choices.iter().enumerate() {
            eprintln!("  {}. {}", i + 1, choice);
        }

        let pick = match read_choice(&stdin, round.choices.len()) {
            Some(i) => i,
            None => {
                eprintln!("Quiz aborted.");
                return;
            }
        };

        let outcome = quiz.answer(&round.choices[pick]);
        if outcome.correct {
            eprintln!("  Correct! Score: {}", outcome.score);
        } else {
            eprintln!("  Wrong, it was {}. Score: {}", outcome.correct_answer, outcome.score);
        }
    }

    let score = quiz.score();
    eprintln!();
    eprintln!("Final score: {}", score);

    let mut store = ScoreStore::load();
    if store.record_game(score) {
        eprintln!("New personal best!");
    } else {
        eprintln!("Personal best: {}", store.stats().best_score);
    }
    eprintln!("Games played: {}", store.stats().games_played);

    if let (Some(player), Some(url)) = (&cli.player, &config.leaderboard_url) {
        match LeaderboardClient::new(url).submit(player, score) {
            Ok(()) => eprintln!("Score submitted for {}.", player),
            Err(e) => eprintln!("Warning: Leaderboard submission failed: {}", e),
        }
    }
}

/// Read a 1-based menu choice from stdin. None on EOF or quit.
fn read_choice(stdin: &std::io::Stdin, max: usize) -> Option<usize> {
    loop {
        eprint!("> ");
        let mut line = String::new();
        if stdin.lock().read_line(&mut line).ok()? == 0 {
            return None;
        }
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
            return None;
        }
        match trimmed.parse::<usize>() {
            Ok(n) if (1..=max).contains(&n) => return Some(n - 1),
            _ => eprintln!("  Enter a number 1-{} (or q to quit).", max),
        }
    }
}
