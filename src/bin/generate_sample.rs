use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

/// Write a synthetic games table for trying out the dashboard.
#[derive(Parser, Debug)]
#[command(about)]
struct Args {
    /// Output file; `.parquet` writes Parquet, anything else CSV
    #[arg(default_value = "data/games.csv")]
    output: PathBuf,

    /// Number of rows
    #[arg(long, default_value_t = 2000)]
    rows: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const HEADER: [&str; 11] = [
    "Name",
    "Platform",
    "Year_of_Release",
    "Genre",
    "Publisher",
    "Global_Sales",
    "Critic_Score",
    "User_Score",
    "User_Count",
    "Developer",
    "Rating",
];

const GENRES: [&str; 8] = [
    "Action",
    "Sports",
    "Shooter",
    "Role-Playing",
    "Racing",
    "Platform",
    "Puzzle",
    "Strategy",
];
const PLATFORMS: [&str; 7] = ["PS2", "X360", "PS3", "Wii", "DS", "PC", "PS4"];
const RATINGS: [&str; 4] = ["E", "E10+", "T", "M"];
const PUBLISHERS: [&str; 5] = ["Nintendo", "Electronic Arts", "Activision", "Ubisoft", "Sega"];

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

/// One generated row as text cells; empty means missing.
fn generate_row(i: usize, rng: &mut SimpleRng) -> Vec<String> {
    let genre = rng.pick(&GENRES);
    let platform = rng.pick(&PLATFORMS);
    let year = 1994 + rng.below(23);
    let critic = 40.0 + rng.next_f64() * 58.0;
    // Users track critics loosely, on a 0-10 scale.
    let user = ((critic / 10.0) + (rng.next_f64() - 0.5) * 3.0).clamp(0.5, 9.7);

    let mut user_score = format!("{user:.1}");
    if rng.next_f64() < 0.08 {
        user_score = "tbd".to_string();
    }
    let mut rating = rng.pick(&RATINGS).to_string();
    if rng.next_f64() < 0.05 {
        rating.clear();
    }

    vec![
        format!("Game {i:04}"),
        platform.to_string(),
        format!("{year}.0"),
        genre.to_string(),
        rng.pick(&PUBLISHERS).to_string(),
        format!("{:.2}", rng.next_f64() * 5.0),
        format!("{critic:.0}.0"),
        user_score,
        format!("{}", 5 + rng.below(2000)),
        format!("Studio {}", rng.below(40)),
        rating,
    ]
}

fn write_csv(path: &PathBuf, rows: &[Vec<String>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    // Leading unnamed index column, as `DataFrame.to_csv` writes it.
    writer.write_record(std::iter::once("").chain(HEADER))?;
    for (i, row) in rows.iter().enumerate() {
        let index = i.to_string();
        writer.write_record(std::iter::once(index.as_str()).chain(row.iter().map(String::as_str)))?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &PathBuf, rows: &[Vec<String>]) -> Result<()> {
    let numeric = ["Year_of_Release", "Global_Sales", "Critic_Score", "User_Count"];

    let mut fields = Vec::with_capacity(HEADER.len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(HEADER.len());
    for (c, name) in HEADER.iter().enumerate() {
        let cells = rows.iter().map(|row| row[c].as_str());
        if numeric.contains(name) {
            let values: Vec<Option<f64>> = cells.map(|s| s.parse::<f64>().ok()).collect();
            fields.push(Field::new(*name, DataType::Float64, true));
            columns.push(Arc::new(Float64Array::from(values)));
        } else {
            let values: Vec<Option<&str>> = cells.map(|s| (!s.is_empty()).then_some(s)).collect();
            fields.push(Field::new(*name, DataType::Utf8, true));
            columns.push(Arc::new(StringArray::from(values)));
        }
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);
    let rows: Vec<Vec<String>> = (0..args.rows).map(|i| generate_row(i, &mut rng)).collect();

    if let Some(dir) = args.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let is_parquet = args
        .output
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));
    if is_parquet {
        write_parquet(&args.output, &rows)?;
    } else {
        write_csv(&args.output, &rows)?;
    }

    println!("Wrote {} games to {}", rows.len(), args.output.display());
    Ok(())
}
