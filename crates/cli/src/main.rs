use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rating_store::{RatingScale, RatingStore, UserId};
use reranker::{Candidate, DisplayMode, RankedCandidate, Reranker, Session};
use similarity::{CosineSimilarity, Form, Metric};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// ShelfRecs - Book search reranking with collaborative filtering
#[derive(Parser)]
#[command(name = "shelf-recs")]
#[command(about = "Rerank full-text search hits with collaborative filtering", long_about = None)]
struct Cli {
    /// Path to the ratings JSON file
    #[arg(short, long, default_value = "ratings.json")]
    ratings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rerank a candidates file for a user
    Rerank {
        /// User the results are personalized for
        #[arg(long)]
        user_id: UserId,

        /// Path to the candidates JSON file produced by the search engine
        #[arg(long, default_value = "candidates.json")]
        candidates: PathBuf,

        /// Keep items the user has already rated
        #[arg(long)]
        show_rated: bool,

        /// Element metric for the similarity score
        #[arg(long, value_enum, default_value_t = MetricArg::Euclidean)]
        metric: MetricArg,

        /// Use the asymmetric similarity form
        #[arg(long)]
        asymmetric: bool,

        /// Neighborhood boost factor
        #[arg(long, default_value_t = reranker::DEFAULT_BOOST_FACTOR)]
        boost_factor: f64,

        /// Number of results to display
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show a user's rating profile
    User {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,
    },

    /// Similarity between two users
    Sim {
        #[arg(long)]
        user_a: UserId,

        #[arg(long)]
        user_b: UserId,

        /// Element metric for the similarity score
        #[arg(long, value_enum, default_value_t = MetricArg::Euclidean)]
        metric: MetricArg,

        /// Use the asymmetric similarity form
        #[arg(long)]
        asymmetric: bool,
    },

    /// Time repeated rerank queries over random users
    Benchmark {
        /// Path to the candidates JSON file
        #[arg(long, default_value = "candidates.json")]
        candidates: PathBuf,

        /// Number of queries to run
        #[arg(long, default_value = "100")]
        queries: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MetricArg {
    Euclidean,
    Manhattan,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Euclidean => Metric::Euclidean,
            MetricArg::Manhattan => Metric::Manhattan,
        }
    }
}

fn form(asymmetric: bool) -> Form {
    if asymmetric {
        Form::Asymmetric
    } else {
        Form::Symmetric
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading ratings from {}...", cli.ratings.display());
    let start = Instant::now();
    let store = RatingStore::load_from_file(&cli.ratings, RatingScale::default())
        .context("Failed to load ratings file")?;
    let (users, items, ratings) = store.counts();
    println!(
        "{} Loaded {} ratings ({} users, {} items) in {:?}",
        "✓".green(),
        ratings,
        users,
        items,
        start.elapsed()
    );

    match cli.command {
        Commands::Rerank {
            user_id,
            candidates,
            show_rated,
            metric,
            asymmetric,
            boost_factor,
            limit,
        } => handle_rerank(
            store,
            user_id,
            &candidates,
            show_rated,
            metric.into(),
            form(asymmetric),
            boost_factor,
            limit,
        )?,
        Commands::User { user_id } => handle_user(&store, user_id)?,
        Commands::Sim {
            user_a,
            user_b,
            metric,
            asymmetric,
        } => handle_sim(&store, user_a, user_b, metric.into(), form(asymmetric)),
        Commands::Benchmark {
            candidates,
            queries,
        } => handle_benchmark(store, &candidates, queries)?,
    }

    Ok(())
}

/// Handle the 'rerank' command
#[allow(clippy::too_many_arguments)]
fn handle_rerank(
    store: RatingStore,
    user_id: UserId,
    candidates_path: &Path,
    show_rated: bool,
    metric: Metric,
    form: Form,
    boost_factor: f64,
    limit: usize,
) -> Result<()> {
    let candidates = load_candidates(candidates_path)?;

    let session = Session::new(store)
        .with_metric(metric)
        .with_form(form)
        .with_reranker(Reranker::new().with_boost_factor(boost_factor));

    let mode = if show_rated {
        DisplayMode::ShowRated
    } else {
        DisplayMode::HideRated
    };

    let start = Instant::now();
    let ranked = session.rerank(&candidates, user_id, mode)?;
    let elapsed = start.elapsed();

    println!(
        "{}",
        format!(
            "Reranked {} candidate(s) for user {} in {:?}:",
            ranked.len(),
            user_id,
            elapsed
        )
        .bold()
        .blue()
    );
    print_ranked(&ranked, limit);
    Ok(())
}

/// Handle the 'user' command
fn handle_user(store: &RatingStore, user_id: UserId) -> Result<()> {
    if !store.has_ratings(user_id) {
        return Err(anyhow!("User {} has no ratings", user_id));
    }

    let count = store.rating_count_for_user(user_id);
    let mean: f64 = store.ratings_for_user(user_id).map(|(_, r)| r).sum::<f64>() / count as f64;

    print!("{}", format!("User ID: {}\n", user_id).bold().blue());
    println!("{}Ratings: {}", "• ".green(), count);
    println!("{}Mean centered rating: {:.2}", "• ".green(), mean);

    println!("Rated items:");
    for (item, rating) in store.ratings_for_user(user_id) {
        println!("  - item {} (centered rating: {:+.1})", item, rating);
    }
    Ok(())
}

/// Handle the 'sim' command
fn handle_sim(store: &RatingStore, user_a: UserId, user_b: UserId, metric: Metric, form: Form) {
    let cosine = CosineSimilarity::new(store, metric, form);

    println!(
        "{}",
        format!("Similarity between users {} and {}:", user_a, user_b)
            .bold()
            .blue()
    );
    println!("{}dot product: {}", "• ".cyan(), cosine.dot(user_a, user_b));
    println!(
        "{}lengths: {} / {}",
        "• ".cyan(),
        cosine.length(user_a),
        cosine.length(user_b)
    );
    println!("{}score: {}", "• ".green(), cosine.score(user_a, user_b));
}

/// Handle the 'benchmark' command
fn handle_benchmark(store: RatingStore, candidates_path: &Path, queries: usize) -> Result<()> {
    let candidates = load_candidates(candidates_path)?;
    let users: Vec<UserId> = store.all_user_ids().collect();
    if users.is_empty() {
        return Err(anyhow!("Ratings file contains no users"));
    }
    if queries == 0 {
        return Err(anyhow!("Benchmark needs at least one query"));
    }

    let session = Session::new(store);

    let mut timings = Vec::with_capacity(queries);
    for _ in 0..queries {
        let user = users[rand::random::<u32>() as usize % users.len()];
        let start = Instant::now();
        session.rerank(&candidates, user, DisplayMode::HideRated)?;
        timings.push(start.elapsed());
    }

    let total_time: std::time::Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let p50 = timings[timings.len() / 2];
    let p95 = timings[(timings.len() as f32 * 0.95) as usize];
    let p99 = timings[(timings.len() as f32 * 0.99) as usize];
    let throughput = queries as f32 / total_time.as_secs_f32();

    println!("Benchmark results:");
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", p50);
    println!("P95 latency: {:?}", p95);
    println!("P99 latency: {:?}", p99);
    println!("Throughput: {:.2} queries/second", throughput);

    Ok(())
}

/// Load the candidates file the external search engine produced
fn load_candidates(path: &Path) -> Result<Vec<Candidate>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open candidates file {}", path.display()))?;
    let candidates: Vec<Candidate> = serde_json::from_reader(BufReader::new(file))
        .context("Failed to parse candidates file")?;
    Ok(candidates)
}

/// Helper function to format and print ranked results
fn print_ranked(ranked: &[RankedCandidate], limit: usize) {
    for (i, result) in ranked.iter().take(limit).enumerate() {
        println!(
            "{}. item {} - boosted: {:.2} (relevance: {:.2})",
            (i + 1).to_string().green(),
            result.item_id,
            result.boosted,
            result.relevance
        );
    }
    if ranked.len() > limit {
        println!("... and {} more", ranked.len() - limit);
    }
}
