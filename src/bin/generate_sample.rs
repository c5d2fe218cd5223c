use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use clap::Parser;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const GENRES: [&str; 8] = [
    "Action",
    "Adventure",
    "Comedy",
    "Drama",
    "Family",
    "History",
    "Horror",
    "Science Fiction",
];

/// Typical runtime (minutes) per genre, same order as `GENRES`.
const GENRE_RUNTIME: [f64; 8] = [115.0, 118.0, 98.0, 112.0, 92.0, 135.0, 94.0, 110.0];

/// Write a synthetic TMDB-style dataset.
#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
struct Args {
    /// Directory the files are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Number of movies
    #[arg(long, default_value_t = 2000)]
    movies: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Debug, Serialize)]
struct MovieRow {
    id: i64,
    title: String,
    release_date: Option<NaiveDate>,
    vote_count: u64,
    vote_average: f64,
    revenue: f64,
    budget: f64,
    runtime: Option<f64>,
    genre_id: Option<i64>,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn generate_movie(id: i64, rng: &mut SimpleRng) -> MovieRow {
    let year = 1960 + rng.below(57) as i32;
    let release_date = if rng.below(50) == 0 {
        None
    } else {
        NaiveDate::from_ymd_opt(year, 1 + rng.below(12) as u32, 1 + rng.below(28) as u32)
    };

    // one genre slot in nine maps to an id the genres table lacks
    let genre = rng.below(GENRES.len() as u64 + 1) as usize;
    let genre_id = if rng.below(30) == 0 {
        None
    } else {
        Some(if genre == GENRES.len() { 99 } else { genre as i64 })
    };
    let typical_runtime = GENRE_RUNTIME.get(genre).copied().unwrap_or(100.0);

    // heavy-tailed popularity
    let vote_count = (rng.next_f64().powi(4) * 9000.0) as u64 + 10;
    let vote_average = (rng.gauss(6.0, 0.9) + (vote_count as f64).ln() * 0.08).clamp(1.0, 9.5);
    let inflation = 1.0 + (year - 1960) as f64 * 0.04;
    let budget = (rng.gauss(25.0, 15.0).max(0.5) * 1e6 * inflation).round();
    let revenue = (budget * rng.gauss(2.5, 1.5).max(0.0)).round();
    let runtime = (rng.below(40) != 0).then(|| rng.gauss(typical_runtime, 12.0).max(60.0).round());

    MovieRow {
        id,
        title: format!("Movie #{id}"),
        release_date,
        vote_count,
        vote_average: (vote_average * 10.0).round() / 10.0,
        revenue,
        budget,
        runtime,
        genre_id,
    }
}

fn write_movies_csv(path: &Path, rows: &[MovieRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating movies CSV")?;
    for row in rows {
        writer.serialize(row).context("writing movie row")?;
    }
    writer.flush().context("flushing movies CSV")?;
    Ok(())
}

/// Genres are written the way `DataFrame.to_csv()` writes an index: the
/// identifier column has an empty header.
fn write_genres_csv(path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating genres CSV")?;
    writer.write_record(["", "genres"])?;
    for (id, name) in GENRES.iter().enumerate() {
        writer.write_record([id.to_string().as_str(), *name])?;
    }
    writer.flush().context("flushing genres CSV")?;
    Ok(())
}

fn write_movies_parquet(path: &Path, rows: &[MovieRow]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("epoch")?;

    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("title", DataType::Utf8, false),
        Field::new("release_date", DataType::Date32, true),
        Field::new("vote_count", DataType::UInt64, false),
        Field::new("vote_average", DataType::Float64, false),
        Field::new("revenue", DataType::Float64, false),
        Field::new("budget", DataType::Float64, false),
        Field::new("runtime", DataType::Float64, true),
        Field::new("genre_id", DataType::Int64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.id))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.title.as_str()))),
            Arc::new(Date32Array::from_iter(rows.iter().map(|r| {
                r.release_date
                    .map(|d| d.num_days_from_ce() - epoch.num_days_from_ce())
            }))),
            Arc::new(UInt64Array::from_iter_values(rows.iter().map(|r| r.vote_count))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.vote_average))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.revenue))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.budget))),
            Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.runtime))),
            Arc::new(Int64Array::from_iter(rows.iter().map(|r| r.genre_id))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let rows: Vec<MovieRow> = (0..args.movies)
        .map(|i| generate_movie(i as i64 + 1, &mut rng))
        .collect();

    std::fs::create_dir_all(&args.out_dir).context("creating output directory")?;
    let movies_csv = args.out_dir.join("tmdb_movies.csv");
    let genres_csv = args.out_dir.join("tmdb_genres.csv");
    let movies_parquet = args.out_dir.join("tmdb_movies.parquet");

    write_movies_csv(&movies_csv, &rows)?;
    write_genres_csv(&genres_csv)?;
    write_movies_parquet(&movies_parquet, &rows)?;

    println!(
        "Wrote {} movies to {} and {}, {} genres to {}",
        rows.len(),
        movies_csv.display(),
        movies_parquet.display(),
        GENRES.len(),
        genres_csv.display()
    );
    Ok(())
}
