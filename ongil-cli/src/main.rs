//! Ongil CLI: numeric helpers, one-shot analysis, and community store administration.
//!
//! Commands:
//! - `snap` / `parse` / `format`: the field formatter and snapper, for scripting
//! - `analyze`: submit an analysis request from a JSON file and print the report
//! - `posts ...`: list, show, add, comment on, search, delete posts; delete comments; list tags
//! - `history list|clear`: the search history
//! - `seed`: fill an empty store with sample posts
//! - `config`: print the effective configuration

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use ongil_core::analysis::{AnalysisRequest, AnalysisResponse, TipLevel};
use ongil_core::numeric;
use ongil_core::range::Domain;
use ongil_services::community::{
    relative_time, shorten, Board, BoardTab, CommentId, CommunityStore, Post, PostId,
    SearchField, PREVIEW_CHARS,
};
use ongil_services::{seed, AnalysisService, ApiClient, AppConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ongil", about = "Ongil CLI: store location fit analysis and community board")]
struct Cli {
    /// Config file. Defaults to <config dir>/ongil/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Community store file. Defaults to <data dir>/community.json.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Round a value onto the step grid of [min, max].
    Snap {
        #[arg(allow_negative_numbers = true)]
        value: f64,
        #[arg(long, default_value_t = 0.0)]
        min: f64,
        #[arg(long)]
        max: f64,
        #[arg(long, default_value_t = 1.0)]
        step: f64,
    },
    /// Parse field text the way a range sheet does. Prints `null` when unset.
    Parse {
        #[arg(allow_hyphen_values = true)]
        text: String,
        #[arg(long, default_value_t = 0.0)]
        min: f64,
        #[arg(long)]
        max: f64,
        #[arg(long, default_value_t = 1.0)]
        step: f64,
    },
    /// Strip non-digits and insert thousands separators.
    Format { text: String },
    /// Submit an analysis request (JSON file) to the configured server.
    Analyze {
        /// Path to a JSON-encoded analysis request.
        #[arg(long)]
        request: PathBuf,

        /// Print the raw JSON response instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Community posts.
    Posts {
        #[command(subcommand)]
        action: PostsAction,
    },
    /// Search history.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Add the sample posts to an empty store.
    Seed {
        /// Add them even if the store already has posts.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Subcommand, Debug)]
enum PostsAction {
    /// List posts, newest first.
    List {
        #[arg(long, value_enum, default_value_t = TabArg::All)]
        board: TabArg,

        /// Only posts carrying this tag.
        #[arg(long)]
        tag: Option<String>,
    },
    /// Show one post with its comments.
    Show { id: PostId },
    /// Publish a post.
    Add {
        #[arg(long, value_enum, default_value_t = BoardArg::Free)]
        board: BoardArg,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        nick: Option<String>,
        /// Repeatable.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Comment on a post.
    Comment {
        id: PostId,
        text: String,
        #[arg(long)]
        nick: Option<String>,
    },
    /// Search posts and record the query in the history.
    Search {
        query: String,
        #[arg(long, value_enum, default_value_t = FieldArg::All)]
        field: FieldArg,
    },
    /// Delete a post and its comments.
    Delete { id: PostId },
    /// Delete one comment, by the id `posts show` prints.
    DeleteComment { id: CommentId },
    /// Distinct tags with post counts.
    Tags,
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    List,
    Clear,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum TabArg {
    All,
    Free,
    Partner,
}

impl From<TabArg> for BoardTab {
    fn from(arg: TabArg) -> Self {
        match arg {
            TabArg::All => BoardTab::All,
            TabArg::Free => BoardTab::Free,
            TabArg::Partner => BoardTab::Partner,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum BoardArg {
    Free,
    Partner,
}

impl From<BoardArg> for Board {
    fn from(arg: BoardArg) -> Self {
        match arg {
            BoardArg::Free => Board::Free,
            BoardArg::Partner => Board::Partner,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FieldArg {
    All,
    Title,
    Nick,
    Content,
}

impl From<FieldArg> for SearchField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::All => SearchField::All,
            FieldArg::Title => SearchField::Title,
            FieldArg::Nick => SearchField::Nick,
            FieldArg::Content => SearchField::Content,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();
    run(cli)
}

/// Logs go to stderr so stdout stays scriptable. `RUST_LOG` overrides `warn`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Snap {
            value,
            min,
            max,
            step,
        } => {
            let domain = Domain::new(min, max, step)?;
            println!("{}", numeric::format_value(domain.snap(value)));
            Ok(())
        }
        Commands::Parse {
            text,
            min,
            max,
            step,
        } => {
            let domain = Domain::new(min, max, step)?;
            match domain.parse(&text) {
                Some(v) => println!("{}", numeric::format_value(v)),
                None => println!("null"),
            }
            Ok(())
        }
        Commands::Format { text } => {
            println!(
                "{}",
                numeric::format_with_thousands_separator(&numeric::parse_digits(&text))
            );
            Ok(())
        }
        Commands::Analyze { request, json } => {
            let config = load_config(cli.config.as_deref())?;
            run_analyze(&config, &request, json)
        }
        Commands::Config => {
            let config = load_config(cli.config.as_deref())?;
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        Commands::Posts { action } => {
            let mut store = open_store(cli.config.as_deref(), cli.store)?;
            run_posts(&mut store, action)
        }
        Commands::History { action } => {
            let mut store = open_store(cli.config.as_deref(), cli.store)?;
            match action {
                HistoryAction::List => {
                    if store.search_history().is_empty() {
                        println!("No searches yet.");
                    }
                    for (i, query) in store.search_history().iter().enumerate() {
                        println!("{:>2}. {query}", i + 1);
                    }
                }
                HistoryAction::Clear => {
                    store.clear_search_history();
                    store.save()?;
                    println!("Search history cleared.");
                }
            }
            Ok(())
        }
        Commands::Seed { force } => {
            let mut store = open_store(cli.config.as_deref(), cli.store)?;
            let added = if force {
                seed::sample_posts(&mut store, Utc::now())?
            } else {
                seed::seed_if_empty(&mut store, Utc::now())?
            };
            if added == 0 {
                println!("Store already has posts; pass --force to add the samples anyway.");
                return Ok(());
            }
            store.save()?;
            println!("Added {added} sample post(s).");
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    AppConfig::load(path).context("loading configuration")
}

fn open_store(config: Option<&Path>, store: Option<PathBuf>) -> Result<CommunityStore> {
    let path = match store {
        Some(path) => path,
        None => load_config(config)?.community_path(),
    };
    info!(path = %path.display(), "opening community store");
    Ok(CommunityStore::open(path))
}

fn run_analyze(config: &AppConfig, path: &Path, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading request {}", path.display()))?;
    let request: AnalysisRequest = serde_json::from_str(&text)
        .with_context(|| format!("parsing request {}", path.display()))?;

    let client = ApiClient::new(&config.api)?;
    let started = std::time::Instant::now();
    let report = client.analyze(&request)?;
    info!(elapsed_ms = started.elapsed().as_millis(), "analysis finished");

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&request, &report);
    }
    Ok(())
}

fn print_report(request: &AnalysisRequest, report: &AnalysisResponse) {
    println!();
    println!("=== Location Fit ===");
    println!("Place:          {}", request.addr);
    println!("Category:       {}", request.category);
    match report.overall_score() {
        Some(score) => println!("Overall:        {score:.0} / 100"),
        None => println!("Overall:        (no scores)"),
    }

    if !report.scores.is_empty() {
        println!();
        println!("--- Factors ---");
        for item in report.ranked_scores() {
            println!("{:<24} {:>5.0}", item.name, item.score);
            if let Some(reason) = &item.reason {
                println!("    {reason}");
            }
        }
    }

    if let Some(reviews) = &report.review_analysis {
        println!();
        println!("--- Reviews ---");
        println!("{}", reviews.summary);
        if !reviews.positive_keywords.is_empty() {
            println!("+ {}", reviews.positive_keywords.join(", "));
        }
        if !reviews.negative_keywords.is_empty() {
            println!("- {}", reviews.negative_keywords.join(", "));
        }
        let price = &reviews.average_menu_price;
        println!(
            "Menu price:     {} (min {}, max {})",
            numeric::format_amount(price.average.round()),
            numeric::format_amount(price.min.round()),
            numeric::format_amount(price.max.round())
        );
    }

    if !report.tips.is_empty() {
        println!();
        println!("--- Tips ---");
        for tip in &report.tips {
            let icon = match tip.level() {
                TipLevel::Success => "OK  ",
                TipLevel::Warning => "WARN",
                TipLevel::Info => "INFO",
                TipLevel::Other => "    ",
            };
            println!("[{icon}] {}", tip.message);
        }
    }

    if let Some(detail) = &report.detail_analysis {
        for (label, text) in [
            ("Summary", &detail.summary),
            ("Strengths", &detail.strengths),
            ("Weaknesses", &detail.weaknesses),
        ] {
            if let Some(text) = text {
                println!();
                println!("--- {label} ---");
                println!("{text}");
            }
        }
    }
    println!();
}

fn run_posts(store: &mut CommunityStore, action: PostsAction) -> Result<()> {
    let now = Utc::now();
    match action {
        PostsAction::List { board, tag } => {
            let posts = match &tag {
                Some(tag) => store
                    .posts_with_tag(tag)
                    .into_iter()
                    .filter(|p| BoardTab::from(board).matches(p.board))
                    .collect(),
                None => store.list_posts(board.into()),
            };
            if posts.is_empty() {
                println!("No posts.");
            }
            for post in posts {
                print_post_row(store, post, now);
            }
        }
        PostsAction::Show { id } => {
            let Some(post) = store.post(id) else {
                bail!("no post with id {id}");
            };
            println!("#{} [{}] {}", post.id, post.board.label(), post.title);
            println!(
                "by {} · {} · {} view(s)",
                post.nick,
                relative_time(post.created_at, now),
                post.views
            );
            if !post.tags.is_empty() {
                println!("tags: {}", post.tags.join(", "));
            }
            println!();
            println!("{}", post.content);
            let comments = store.comments(id);
            println!();
            println!("--- {} comment(s) ---", comments.len());
            for c in comments {
                println!(
                    "#{} {} ({}): {}",
                    c.id,
                    c.nick,
                    relative_time(c.created_at, now),
                    c.content
                );
            }
        }
        PostsAction::Add {
            board,
            title,
            content,
            nick,
            tags,
        } => {
            let mut new = ongil_services::community::NewPost::new(board.into(), title, content)
                .tags(tags);
            if let Some(nick) = nick {
                new = new.nick(nick);
            }
            let id = store.create_post(new)?.id;
            store.save()?;
            println!("Published post #{id}.");
        }
        PostsAction::Comment { id, text, nick } => {
            let comment_id = store.add_comment(id, nick.as_deref(), &text)?.id;
            store.save()?;
            println!("Added comment #{comment_id} to post #{id}.");
        }
        PostsAction::Search { query, field } => {
            let ids: Vec<PostId> = store.search(&query, field.into()).iter().map(|p| p.id).collect();
            store.record_search(&query);
            store.save()?;
            println!("{} result(s) for \"{query}\"", ids.len());
            for id in ids {
                if let Some(post) = store.post(id) {
                    print_post_row(store, post, now);
                }
            }
        }
        PostsAction::Delete { id } => {
            let post = store.delete_post(id)?;
            store.save()?;
            println!("Deleted post #{} \"{}\".", post.id, shorten(&post.title, 40));
        }
        PostsAction::DeleteComment { id } => {
            let comment = store.delete_comment(id)?;
            store.save()?;
            println!(
                "Deleted comment #{} from post #{}: \"{}\".",
                comment.id,
                comment.post_id,
                shorten(&comment.content, 40)
            );
        }
        PostsAction::Tags => {
            let tags = store.tags();
            if tags.is_empty() {
                println!("No tags.");
            }
            for (tag, count) in tags {
                println!("{tag:<24} {count:>4}");
            }
        }
    }
    Ok(())
}

fn print_post_row(store: &CommunityStore, post: &Post, now: chrono::DateTime<Utc>) {
    println!(
        "#{:<4} {:<8} {:<40} {:<12} {:>10} {:>3} comment(s)",
        post.id,
        match post.board {
            Board::Free => "free",
            Board::Partner => "partner",
        },
        shorten(&post.title, 40),
        shorten(&post.nick, 12),
        relative_time(post.created_at, now),
        store.comment_count(post.id)
    );
    println!("      {}", shorten(&post.content, PREVIEW_CHARS));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ongil").chain(args.iter().copied())).unwrap()
    }

    fn run_with_store(store: &Path, args: &[&str]) -> Result<()> {
        let mut full = vec!["--store", store.to_str().unwrap()];
        full.extend_from_slice(args);
        run(parse(&full))
    }

    #[test]
    fn snap_accepts_negative_values() {
        let cli = parse(&["snap", "-5", "--max", "100", "--step", "10"]);
        match cli.command {
            Commands::Snap { value, min, max, step } => {
                assert_eq!((value, min, max, step), (-5.0, 0.0, 100.0, 10.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn max_is_required_for_snap() {
        assert!(Cli::try_parse_from(["ongil", "snap", "5"]).is_err());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        assert!(run(parse(&["snap", "5", "--min", "10", "--max", "1"])).is_err());
        assert!(run(parse(&["parse", "5", "--min", "10", "--max", "1"])).is_err());
    }

    #[test]
    fn non_positive_step_is_rejected() {
        for step in ["--step=0", "--step=-5"] {
            let err = run(parse(&["snap", "5", "--max", "100", step])).unwrap_err();
            assert!(err.to_string().contains("step"), "{err}");
            assert!(run(parse(&["parse", "5", "--max", "100", step])).is_err());
        }
        assert!(run(parse(&["snap", "5", "--max", "100", "--step", "10"])).is_ok());
    }

    #[test]
    fn posts_add_parses_repeated_tags() {
        let cli = parse(&[
            "posts", "add", "--board", "partner", "--title", "t", "--content", "c", "--tag", "한식",
            "--tag", "카페/디저트",
        ]);
        match cli.command {
            Commands::Posts {
                action: PostsAction::Add { board, tags, nick, .. },
            } => {
                assert_eq!(board, BoardArg::Partner);
                assert_eq!(tags, vec!["한식", "카페/디저트"]);
                assert_eq!(nick, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_board_is_a_parse_error() {
        assert!(Cli::try_parse_from(["ongil", "posts", "list", "--board", "secret"]).is_err());
    }

    #[test]
    fn global_store_flag_after_subcommand() {
        let cli = parse(&["history", "list", "--store", "/tmp/x.json"]);
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/x.json")));
    }

    #[test]
    fn add_comment_search_delete_against_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("community.json");

        run_with_store(
            &path,
            &["posts", "add", "--title", "Rent in Mapo", "--content", "How much?", "--tag", "한식"],
        )
        .unwrap();
        let store = CommunityStore::open(&path);
        let post = store.list_posts(BoardTab::All)[0].clone();
        assert_eq!(post.nick, "anonymous");
        assert_eq!(post.tags, vec!["한식"]);

        let id = post.id.to_string();
        run_with_store(&path, &["posts", "comment", &id, "About 900k", "--nick", "kim"]).unwrap();
        run_with_store(&path, &["posts", "search", "Mapo", "--field", "title"]).unwrap();
        let store = CommunityStore::open(&path);
        assert_eq!(store.comment_count(post.id), 1);
        assert_eq!(store.search_history(), ["Mapo"]);

        let comment_id = store.comments(post.id)[0].id.to_string();
        run_with_store(&path, &["posts", "delete-comment", &comment_id]).unwrap();
        assert_eq!(CommunityStore::open(&path).comment_count(post.id), 0);
        assert!(run_with_store(&path, &["posts", "delete-comment", &comment_id]).is_err());

        run_with_store(&path, &["history", "clear"]).unwrap();
        run_with_store(&path, &["posts", "delete", &id]).unwrap();
        let store = CommunityStore::open(&path);
        assert!(store.is_empty());
        assert!(store.search_history().is_empty());

        assert!(run_with_store(&path, &["posts", "show", &id]).is_err());
    }

    #[test]
    fn seed_only_fills_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("community.json");

        run_with_store(&path, &["seed"]).unwrap();
        let seeded = CommunityStore::open(&path).list_posts(BoardTab::All).len();
        assert!(seeded > 0);

        run_with_store(&path, &["seed"]).unwrap();
        assert_eq!(CommunityStore::open(&path).list_posts(BoardTab::All).len(), seeded);

        run_with_store(&path, &["seed", "--force"]).unwrap();
        assert_eq!(CommunityStore::open(&path).list_posts(BoardTab::All).len(), seeded * 2);
    }

    #[test]
    fn analyze_reports_a_missing_request_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = run_analyze(&AppConfig::default(), &missing, false).unwrap_err();
        assert!(err.to_string().contains("reading request"));
    }
}
