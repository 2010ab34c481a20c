use clap::Parser;

use crate::data::filter::YearRange;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Games table (.csv, .json or .parquet); overrides the config file
    #[arg(value_name = "DATA_PATH")]
    pub data: Option<String>,

    /// Path to config TOML
    #[arg(long, default_value = "dashboard.toml")]
    pub config: String,

    /// Earliest release year kept when loading (overrides config)
    #[arg(long)]
    pub min_year: Option<i32>,

    /// Write the filtered outputs as JSON to this file ("-" for stdout)
    /// instead of opening the window
    #[arg(long, value_name = "FILE")]
    pub export: Option<String>,

    /// Genre to select in export mode (repeatable)
    #[arg(long = "genre", value_name = "GENRE")]
    pub genres: Vec<String>,

    /// Age rating to select in export mode (repeatable)
    #[arg(long = "rating", value_name = "RATING")]
    pub ratings: Vec<String>,

    /// Release-year range in export mode, e.g. 2005..2010
    #[arg(long, value_parser = parse_year_range)]
    pub years: Option<YearRange>,

    /// Debug-level logging unless RUST_LOG says otherwise
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Parse `MIN..MAX`, `MIN..=MAX` or `MIN-MAX`. A single year selects just
/// that year.
pub fn parse_year_range(s: &str) -> Result<YearRange, String> {
    let s = s.trim();
    let (a, b) = if let Some((a, b)) = s.split_once("..=") {
        (a, b)
    } else if let Some((a, b)) = s.split_once("..") {
        (a, b)
    } else if let Some((a, b)) = s.split_once('-') {
        (a, b)
    } else {
        (s, s)
    };
    let parse = |t: &str| {
        t.trim()
            .parse::<i32>()
            .map_err(|e| format!("invalid year '{}': {e}", t.trim()))
    };
    Ok(YearRange::new(parse(a)?, parse(b)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_year_ranges() {
        assert_eq!(parse_year_range("2005..2010"), Ok(YearRange::new(2005, 2010)));
        assert_eq!(parse_year_range("2005..=2010"), Ok(YearRange::new(2005, 2010)));
        assert_eq!(parse_year_range("2010-2005"), Ok(YearRange::new(2005, 2010)));
        assert_eq!(parse_year_range("2008"), Ok(YearRange::new(2008, 2008)));
        assert!(parse_year_range("soon..2010").is_err());
    }

    #[test]
    fn parses_export_flags() {
        let args = Args::try_parse_from([
            "games-dash",
            "games.csv",
            "--export",
            "-",
            "--genre",
            "RPG",
            "--genre",
            "Action",
            "--rating",
            "E",
            "--years",
            "2000..2020",
        ])
        .unwrap();
        assert_eq!(args.data.as_deref(), Some("games.csv"));
        assert_eq!(args.export.as_deref(), Some("-"));
        assert_eq!(args.genres, ["RPG", "Action"]);
        assert_eq!(args.ratings, ["E"]);
        assert_eq!(args.years, Some(YearRange::new(2000, 2020)));
        assert_eq!(args.config, "dashboard.toml");
        assert!(!args.verbose);
    }
}
