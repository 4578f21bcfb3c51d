//! Torrent Dataset Scanner
//!
//! Parses every title in a pipe-delimited torrent dataset, cross-references
//! the extracted identity against the series and episode reference
//! catalogs, and appends fully resolved records to an append-only
//! JSON-lines store. In training mode it also tallies the structural
//! signature of every attempted title and prints a ranked report of title
//! shapes, so a maintainer can see which naming conventions the template
//! library does not cover yet.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use titlemask::conformance::{self, FixtureSet};
use titlemask::{
    pseudo_id, EpisodeCatalog, MaskParser, MatchedEpisode, RecordStore, SeriesCatalog,
    TrainingRecorder,
};
use tracing::{debug, info};

/// CLI arguments
#[derive(Parser)]
#[command(name = "torrent-scan")]
#[command(about = "Parse torrent titles and cross-reference episode catalogs")]
#[command(version)]
struct Cli {
    /// Directory containing tv_series.csv, tv_episodes.csv and torrents.csv
    #[arg(short, long, env = "TORRENT_SCAN_DATA_DIR", default_value = "datasets")]
    data_dir: PathBuf,

    /// Directory containing the clean.json and mask.json fixture sets
    #[arg(short = 'F', long, env = "TORRENT_SCAN_FIXTURES_DIR", default_value = "fixtures")]
    fixtures_dir: PathBuf,

    /// Output path for matched records (JSON lines, appended)
    #[arg(short, long, default_value = "matched.jsonl")]
    output: PathBuf,

    /// Tally title shapes and print a ranked signature report
    #[arg(short, long)]
    train: bool,

    /// Skip titles longer than this many characters
    #[arg(long, default_value_t = 128)]
    max_title_len: usize,

    /// Log progress every this many dataset lines
    #[arg(long, default_value_t = 5000)]
    progress_every: u64,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Read-only pieces the scan loop works against.
struct ScanContext<'a> {
    parser: &'a MaskParser,
    series: &'a SeriesCatalog,
    episodes: &'a EpisodeCatalog,
    max_title_len: usize,
    progress_every: u64,
}

/// Counters accumulated over one scan.
#[derive(Debug, Default)]
struct ScanOutcome {
    lines: u64,
    attempted: u64,
    skipped: u64,
    no_match: u64,
    matched: u64,
    unknown_series: HashMap<String, u64>,
    unknown_episodes: HashMap<String, u64>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();
}

fn load_fixtures(path: &Path) -> Result<FixtureSet> {
    let file = File::open(path)
        .with_context(|| format!("failed to open fixture set {}", path.display()))?;
    let fixtures = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse fixture set {}", path.display()))?;
    Ok(fixtures)
}

fn split_torrent_line(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.splitn(2, '|');
    let id = parts.next()?.trim();
    let title = parts.next()?.trim();
    if id.is_empty() || title.is_empty() {
        return None;
    }
    Some((id, title))
}

fn scan(
    ctx: &ScanContext<'_>,
    torrents_path: &Path,
    store: &mut RecordStore,
    mut recorder: Option<&mut TrainingRecorder>,
) -> Result<ScanOutcome> {
    let file = File::open(torrents_path)
        .with_context(|| format!("failed to open torrent dataset {}", torrents_path.display()))?;
    let reader = BufReader::new(file);

    let started = Instant::now();
    let mut outcome = ScanOutcome::default();
    let mut matched_ids: HashSet<String> = HashSet::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line
            .with_context(|| format!("failed to read {}", torrents_path.display()))?;
        if line_no == 0 {
            // Header row.
            continue;
        }

        outcome.lines += 1;
        if outcome.lines % ctx.progress_every == 0 {
            let rate = outcome.lines as f64 / started.elapsed().as_secs_f64().max(f64::EPSILON);
            debug!(
                lines = outcome.lines,
                rate = rate as u64,
                matched = outcome.matched,
                unknown_series = outcome.unknown_series.len(),
                unknown_episodes = outcome.unknown_episodes.len(),
                "scan progress"
            );
        }

        let Some((torrent_id, title)) = split_torrent_line(&line) else {
            outcome.skipped += 1;
            continue;
        };
        let torrent_id = torrent_id.to_uppercase();

        // A torrent already resolved from an earlier title stays resolved.
        if matched_ids.contains(&torrent_id) {
            outcome.skipped += 1;
            continue;
        }
        if title.len() > ctx.max_title_len {
            outcome.skipped += 1;
            continue;
        }

        outcome.attempted += 1;
        let cleaned = ctx.parser.clean_title(title);
        if let Some(recorder) = &mut recorder {
            recorder.observe(&cleaned);
        }

        let Some(record) = ctx.parser.parse_cleaned(&cleaned) else {
            outcome.no_match += 1;
            continue;
        };

        let Some(series_id) = ctx.series.lookup(&record.series_name) else {
            *outcome
                .unknown_series
                .entry(record.series_name.clone())
                .or_insert(0) += 1;
            continue;
        };

        let key = pseudo_id(series_id, record.season_no, record.episode_no);
        let Some(episode_id) = ctx.episodes.lookup_key(&key) else {
            *outcome.unknown_episodes.entry(key).or_insert(0) += 1;
            continue;
        };

        store.append(&MatchedEpisode {
            torrent_id: torrent_id.clone(),
            series_id: series_id.to_string(),
            episode_id: episode_id.to_string(),
            season_no: record.season_no,
            episode_no: record.episode_no,
            year: record.year,
            episode_name: record.episode_name,
        })?;
        matched_ids.insert(torrent_id);
        outcome.matched += 1;
    }

    store.flush()?;
    Ok(outcome)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let parser = MaskParser::with_defaults().context("failed to build parser")?;

    // The parser must reproduce every fixture before any dataset is read.
    let clean_fixtures = load_fixtures(&cli.fixtures_dir.join("clean.json"))?;
    let mask_fixtures = load_fixtures(&cli.fixtures_dir.join("mask.json"))?;
    conformance::verify_all(&parser, &clean_fixtures, &mask_fixtures)
        .context("conformance gate failed, refusing to process datasets")?;
    debug!(
        clean = clean_fixtures.len(),
        mask = mask_fixtures.len(),
        "conformance gate passed"
    );

    let series = SeriesCatalog::load(cli.data_dir.join("tv_series.csv"), parser.normalizer())
        .context("failed to load series catalog")?;
    info!(series = series.len(), "series catalog ready");

    let episodes = EpisodeCatalog::load(cli.data_dir.join("tv_episodes.csv"))
        .context("failed to load episode catalog")?;
    info!(episodes = episodes.len(), "episode catalog ready");

    let mut store = RecordStore::open(&cli.output).context("failed to open record store")?;
    let mut recorder = if cli.train {
        info!("training mode enabled");
        Some(TrainingRecorder::new().context("failed to build training recorder")?)
    } else {
        None
    };

    let started = Instant::now();
    let ctx = ScanContext {
        parser: &parser,
        series: &series,
        episodes: &episodes,
        max_title_len: cli.max_title_len,
        progress_every: cli.progress_every,
    };
    let outcome = scan(
        &ctx,
        &cli.data_dir.join("torrents.csv"),
        &mut store,
        recorder.as_mut(),
    )?;

    info!(
        lines = outcome.lines,
        attempted = outcome.attempted,
        matched = outcome.matched,
        no_match = outcome.no_match,
        unknown_series = outcome.unknown_series.len(),
        unknown_episodes = outcome.unknown_episodes.len(),
        skipped = outcome.skipped,
        elapsed_s = started.elapsed().as_secs_f64(),
        "scan complete"
    );

    if let Some(recorder) = recorder {
        let report = recorder.update_stats();
        info!(shapes = report.entries.len(), "ranked signature report follows");
        print!("{report}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn torrent_lines_split_on_the_first_pipe() {
        assert_eq!(
            split_torrent_line("abc123|Show Name S01E01"),
            Some(("abc123", "Show Name S01E01"))
        );
        assert_eq!(
            split_torrent_line("abc123|Weird | Title"),
            Some(("abc123", "Weird | Title"))
        );
        assert_eq!(split_torrent_line("no-pipe-here"), None);
        assert_eq!(split_torrent_line("|title-only"), None);
        assert_eq!(split_torrent_line("id-only|"), None);
    }

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn scan_resolves_matches_and_counts_misses() {
        let dir = tempfile::tempdir().unwrap();
        let parser = MaskParser::with_defaults().unwrap();

        let series_path = write_file(
            dir.path(),
            "tv_series.csv",
            "id|title\ntt0001|Show Name\n",
        );
        let episodes_path = write_file(
            dir.path(),
            "tv_episodes.csv",
            "episode_id|series_id|season_no|episode_no|title\nep100|tt0001|2|5|Some Title\n",
        );
        let torrents_path = write_file(
            dir.path(),
            "torrents.csv",
            concat!(
                "id|title\n",
                "t1|Show.Name.2021.S02E05.Some.Title\n",
                "t2|Unknown.Show.S01E01\n",
                "t3|no structure here at all\n",
                "t1|Show.Name.S02E05\n",
                "t4|Show.Name.S09E09\n",
                "broken line without pipe\n",
            ),
        );

        let series = SeriesCatalog::load(&series_path, parser.normalizer()).unwrap();
        let episodes = EpisodeCatalog::load(&episodes_path).unwrap();
        let store_path = dir.path().join("matched.jsonl");
        let mut store = RecordStore::open(&store_path).unwrap();
        let mut recorder = TrainingRecorder::new().unwrap();

        let ctx = ScanContext {
            parser: &parser,
            series: &series,
            episodes: &episodes,
            max_title_len: 128,
            progress_every: 5000,
        };
        let outcome = scan(&ctx, &torrents_path, &mut store, Some(&mut recorder)).unwrap();

        assert_eq!(outcome.lines, 6);
        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.no_match, 1);
        assert_eq!(outcome.unknown_series.get("unknown show"), Some(&1));
        assert_eq!(outcome.unknown_episodes.get("tt0001-09-09"), Some(&1));
        // Second t1 line and the broken line are both skipped.
        assert_eq!(outcome.skipped, 2);

        let contents = std::fs::read_to_string(&store_path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        let record: MatchedEpisode = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(record.torrent_id, "T1");
        assert_eq!(record.series_id, "tt0001");
        assert_eq!(record.episode_id, "ep100");
        assert_eq!(record.season_no, 2);
        assert_eq!(record.episode_no, 5);

        // Every attempted title left exactly one signature observation.
        assert_eq!(recorder.counter().total(), outcome.attempted);
    }

    #[test]
    fn overlong_titles_are_skipped_before_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let parser = MaskParser::with_defaults().unwrap();

        let series_path = write_file(dir.path(), "tv_series.csv", "id|title\n");
        let episodes_path = write_file(
            dir.path(),
            "tv_episodes.csv",
            "episode_id|series_id|season_no|episode_no|title\n",
        );
        let long_title = format!("t1|{} S01E01\n", "x".repeat(300));
        let torrents_path = write_file(
            dir.path(),
            "torrents.csv",
            &format!("id|title\n{long_title}"),
        );

        let series = SeriesCatalog::load(&series_path, parser.normalizer()).unwrap();
        let episodes = EpisodeCatalog::load(&episodes_path).unwrap();
        let mut store = RecordStore::open(dir.path().join("matched.jsonl")).unwrap();

        let ctx = ScanContext {
            parser: &parser,
            series: &series,
            episodes: &episodes,
            max_title_len: 128,
            progress_every: 5000,
        };
        let outcome = scan(&ctx, &torrents_path, &mut store, None).unwrap();
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.attempted, 0);
    }

    #[test]
    fn fixture_files_in_repo_pass_the_gate() {
        let parser = MaskParser::with_defaults().unwrap();
        let fixtures_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("fixtures");

        let clean = load_fixtures(&fixtures_dir.join("clean.json")).unwrap();
        let mask = load_fixtures(&fixtures_dir.join("mask.json")).unwrap();
        assert!(!clean.is_empty());
        assert!(!mask.is_empty());
        conformance::verify_all(&parser, &clean, &mask).unwrap();
    }
}
