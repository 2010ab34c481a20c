use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset, GameRecord};
use crate::error::DataLoadError;

pub type Result<T> = std::result::Result<T, DataLoadError>;

pub const GENRE: &str = "Genre";
pub const PLATFORM: &str = "Platform";
pub const RATING: &str = "Rating";
pub const YEAR_OF_RELEASE: &str = "Year_of_Release";
pub const USER_SCORE: &str = "User_Score";
pub const CRITIC_SCORE: &str = "Critic_Score";

/// Cell spellings read as missing in CSV sources.
const NA_TOKENS: [&str; 7] = ["NA", "N/A", "#N/A", "NaN", "nan", "NULL", "null"];

static MISSING: CellValue = CellValue::Null;

/// Cleaning rules applied while loading.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Records released before this year are dropped.
    pub min_year: i32,
    /// User_Score placeholder for games without enough user reviews.
    pub undetermined_token: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            min_year: 2000,
            undetermined_token: "tbd".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the games table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one game per line (recommended)
/// * `.json`    – `[{ "Genre": "...", "Platform": "...", ... }, ...]`
/// * `.parquet` – flat columns, strings and numbers
pub fn load_file(path: &Path, config: &LoaderConfig) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path, config),
        "json" => load_json(path, config),
        "parquet" | "pq" => load_parquet(path, config),
        other => Err(DataLoadError::UnsupportedFormat(other.to_string())),
    }
}

/// Load CSV text from any reader, e.g. an in-memory buffer.
pub fn load_csv_reader<R: Read>(reader: R, config: &LoaderConfig) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(reader);
    read_csv(&mut reader, config)
}

/// Load a records-oriented JSON document (`df.to_json(orient='records')`).
pub fn load_json_str(text: &str, config: &LoaderConfig) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root
        .as_array()
        .ok_or_else(|| DataLoadError::Malformed("expected top-level JSON array".to_string()))?;

    let mut rows = Vec::with_capacity(records.len());
    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataLoadError::Malformed(format!("row {} is not a JSON object", i + 1)))?;
        // Keys arrive in file order (serde_json `preserve_order`).
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        rows.push(obj);
    }

    let mut table = TableBuilder::new(&headers, config)?;
    for (i, obj) in rows.into_iter().enumerate() {
        let cells = headers
            .iter()
            .map(|h| obj.get(h).map(json_to_cell).unwrap_or(CellValue::Null))
            .collect();
        table.push_row(i + 1, cells)?;
    }
    Ok(table.finish())
}

// ---------------------------------------------------------------------------
// Row cleaning shared by every format
// ---------------------------------------------------------------------------

/// Counters reported once the table is built.
#[derive(Debug, Default, Clone, PartialEq)]
struct LoadReport {
    rows_read: usize,
    incomplete: usize,
    undetermined: usize,
    before_min_year: usize,
}

/// Positions of the filtered columns in the source header.
struct ColumnIndex {
    genre: usize,
    platform: usize,
    rating: usize,
    year: usize,
    user_score: usize,
    critic_score: usize,
}

impl ColumnIndex {
    fn all(&self) -> [usize; 6] {
        [
            self.genre,
            self.platform,
            self.rating,
            self.year,
            self.user_score,
            self.critic_score,
        ]
    }
}

/// Accumulates cleaned records from raw rows.
struct TableBuilder<'a> {
    config: &'a LoaderConfig,
    columns: ColumnIndex,
    /// Passthrough columns: (position, name).
    extra: Vec<(usize, String)>,
    records: Vec<GameRecord>,
    report: LoadReport,
}

/// Unnamed or pandas-generated index columns carry no data.
fn is_index_column(name: &str) -> bool {
    name.is_empty() || name.starts_with("Unnamed: ") || name.starts_with("__index_level_")
}

impl<'a> TableBuilder<'a> {
    fn new(headers: &[String], config: &'a LoaderConfig) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DataLoadError::MissingColumn(name.to_string()))
        };
        let columns = ColumnIndex {
            genre: find(GENRE)?,
            platform: find(PLATFORM)?,
            rating: find(RATING)?,
            year: find(YEAR_OF_RELEASE)?,
            user_score: find(USER_SCORE)?,
            critic_score: find(CRITIC_SCORE)?,
        };
        let required = columns.all();
        let extra = headers
            .iter()
            .enumerate()
            .filter(|(i, h)| !required.contains(i) && !is_index_column(h))
            .map(|(i, h)| (i, h.clone()))
            .collect();

        Ok(TableBuilder {
            config,
            columns,
            extra,
            records: Vec::new(),
            report: LoadReport::default(),
        })
    }

    /// Genre, Platform and Rating hold labels, so their text is kept as is.
    fn is_label_column(&self, idx: usize) -> bool {
        idx == self.columns.genre || idx == self.columns.platform || idx == self.columns.rating
    }

    /// Clean one source row. `row` is 1-based and only used in errors.
    fn push_row(&mut self, row: usize, cells: Vec<CellValue>) -> Result<()> {
        let cell = |idx: usize| cells.get(idx).unwrap_or(&MISSING);
        self.report.rows_read += 1;

        let has_missing = self
            .columns
            .all()
            .into_iter()
            .chain(self.extra.iter().map(|(i, _)| *i))
            .any(|i| cell(i).is_null());
        if has_missing {
            self.report.incomplete += 1;
            return Ok(());
        }

        let user = cell(self.columns.user_score);
        if matches!(user, CellValue::Text(s) if *s == self.config.undetermined_token) {
            self.report.undetermined += 1;
            return Ok(());
        }

        let user_score = numeric(row, USER_SCORE, user)?;
        let critic_score = numeric(row, CRITIC_SCORE, cell(self.columns.critic_score))?;
        let year_cell = cell(self.columns.year);
        let year_of_release = year_cell
            .as_i64()
            .and_then(|y| i32::try_from(y).ok())
            .ok_or_else(|| invalid(row, YEAR_OF_RELEASE, year_cell))?;

        if year_of_release < self.config.min_year {
            self.report.before_min_year += 1;
            return Ok(());
        }

        let extra = self
            .extra
            .iter()
            .map(|(i, name)| (name.clone(), cell(*i).clone()))
            .collect::<BTreeMap<_, _>>();

        self.records.push(GameRecord {
            genre: label(cell(self.columns.genre)),
            platform: label(cell(self.columns.platform)),
            rating: label(cell(self.columns.rating)),
            year_of_release,
            user_score,
            critic_score,
            extra,
        });
        Ok(())
    }

    fn finish(self) -> Dataset {
        let r = &self.report;
        log::info!(
            "Loaded {} of {} rows (dropped: {} incomplete, {} undetermined score, {} before {})",
            self.records.len(),
            r.rows_read,
            r.incomplete,
            r.undetermined,
            r.before_min_year,
            self.config.min_year
        );
        let extra_columns = self.extra.into_iter().map(|(_, name)| name).collect();
        Dataset::new(self.records, extra_columns)
    }
}

fn label(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) => s.clone(),
        other => other.to_string(),
    }
}

fn invalid(row: usize, column: &str, value: &CellValue) -> DataLoadError {
    DataLoadError::InvalidValue {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn numeric(row: usize, column: &str, value: &CellValue) -> Result<f64> {
    value
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(row, column, value))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path, config: &LoaderConfig) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path)?;
    read_csv(&mut reader, config)
}

fn read_csv<R: Read>(reader: &mut csv::Reader<R>, config: &LoaderConfig) -> Result<Dataset> {
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let mut table = TableBuilder::new(&headers, config)?;

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let cells = record
            .iter()
            .enumerate()
            .map(|(i, s)| csv_cell(s, table.is_label_column(i)))
            .collect();
        table.push_row(row_no + 1, cells)?;
    }

    Ok(table.finish())
}

fn csv_cell(s: &str, is_label: bool) -> CellValue {
    let s = s.trim();
    if s.is_empty() || NA_TOKENS.contains(&s) {
        CellValue::Null
    } else if is_label {
        CellValue::Text(s.to_string())
    } else {
        CellValue::guess(s)
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path, config: &LoaderConfig) -> Result<Dataset> {
    let text = std::fs::read_to_string(path)?;
    load_json_str(&text, config)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both Pandas (`df.to_parquet()`) and Polars.
fn load_parquet(path: &Path, config: &LoaderConfig) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut table = TableBuilder::new(&headers, config)?;
    let mut row_no = 0;
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            row_no += 1;
            let cells = batch
                .columns()
                .iter()
                .map(|col| arrow_cell(col, row))
                .collect::<Result<Vec<_>>>()?;
            table.push_row(row_no, cells)?;
        }
    }

    Ok(table.finish())
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        _ => CellValue::guess(&array_value_to_string(col.as_ref(), row)?),
    };
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::filter::{filter_records, FilterSelection, YearRange};

    const HEADER: &str = ",Name,Platform,Year_of_Release,Genre,Critic_Score,User_Score,Rating\n";

    fn load(body: &str) -> Result<Dataset> {
        let text = format!("{HEADER}{body}");
        load_csv_reader(text.as_bytes(), &LoaderConfig::default())
    }

    #[test]
    fn keeps_complete_rows_and_skips_index_column() {
        let ds = load("0,Halo,XB,2001.0,Shooter,97.0,8.5,M\n").unwrap();
        assert_eq!(ds.len(), 1);
        let r = &ds.records()[0];
        assert_eq!(r.genre, "Shooter");
        assert_eq!(r.platform, "XB");
        assert_eq!(r.rating, "M");
        assert_eq!(r.year_of_release, 2001);
        assert_eq!(r.user_score, 8.5);
        assert_eq!(r.critic_score, 97.0);
        assert_eq!(ds.extra_columns(), ["Name".to_string()]);
        assert_eq!(r.extra.get("Name"), Some(&CellValue::Text("Halo".into())));
    }

    #[test]
    fn drops_rows_with_any_missing_cell() {
        let ds = load(
            "0,Halo,XB,2001,Shooter,97,8.5,M\n\
             1,,PS2,2003,Action,80,7.0,T\n\
             2,Sims,PC,2004,Simulation,,8.0,T\n\
             3,Fable,XB,NaN,Role-Playing,85,8.0,M\n",
        )
        .unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].extra["Name"].to_string(), "Halo");
    }

    #[test]
    fn drops_undetermined_user_scores() {
        let ds = load(
            "0,A,PC,2010,RPG,80,tbd,E\n\
             1,B,PC,2010,RPG,80,TBD,E\n",
        );
        // Sentinel match is case-sensitive, so "TBD" must fail coercion.
        assert!(matches!(
            ds,
            Err(DataLoadError::InvalidValue { row: 2, ref column, .. }) if column == USER_SCORE
        ));

        let ds = load("0,A,PC,2010,RPG,80,tbd,E\n1,B,PC,2011,RPG,70,6.1,E\n").unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].user_score, 6.1);
    }

    #[test]
    fn drops_releases_before_min_year() {
        let ds = load(
            "0,Old,PS,1999,Action,80,8.0,T\n\
             1,New,PS2,2000,Action,80,8.0,T\n",
        )
        .unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].year_of_release, 2000);

        let config = LoaderConfig {
            min_year: 1990,
            ..LoaderConfig::default()
        };
        let text = format!("{HEADER}0,Old,PS,1999,Action,80,8.0,T\n");
        assert_eq!(load_csv_reader(text.as_bytes(), &config).unwrap().len(), 1);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let text = "Name,Platform,Year_of_Release,Genre,Critic_Score,User_Score\nA,PC,2010,RPG,80,8\n";
        let err = load_csv_reader(text.as_bytes(), &LoaderConfig::default()).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn(ref c) if c == RATING));
    }

    #[test]
    fn non_numeric_critic_score_is_an_error() {
        let err = load("0,A,PC,2010,RPG,great,8.0,E\n").unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidValue { ref column, .. } if column == CRITIC_SCORE));
    }

    #[test]
    fn numeric_platform_names_stay_text() {
        let ds = load("0,Pitfall,2600,2000,Platform,60,7.0,E\n").unwrap();
        assert_eq!(ds.records()[0].platform, "2600");
    }

    #[test]
    fn label_columns_keep_their_source_text() {
        let text = "Genre,Platform,Rating,Year_of_Release,User_Score,Critic_Score\n\
                    1.10,007,E,2010,8.0,80\n";
        let ds = load_csv_reader(text.as_bytes(), &LoaderConfig::default()).unwrap();
        let r = &ds.records()[0];
        assert_eq!(r.genre, "1.10");
        assert_eq!(r.platform, "007");

        let sel = FilterSelection::new(["1.10"], ["E"], YearRange::new(2000, 2020));
        assert_eq!(filter_records(&ds, &sel).records().map(<[_]>::len), Some(1));
    }

    #[test]
    fn ragged_rows_are_malformed() {
        assert!(matches!(load("0,A,PC,2010\n"), Err(DataLoadError::Csv(_))));
    }

    #[test]
    fn loads_json_records() {
        let text = r#"[
            {"Genre": "RPG", "Platform": "PC", "Rating": "E", "Year_of_Release": 2010, "User_Score": "8.0", "Critic_Score": 81},
            {"Genre": "RPG", "Platform": "PC", "Rating": "E", "Year_of_Release": 2010, "User_Score": "tbd", "Critic_Score": 70},
            {"Genre": "Action", "Platform": "PS4", "Rating": null, "Year_of_Release": 2015, "User_Score": 9.0, "Critic_Score": 90}
        ]"#;
        let ds = load_json_str(text, &LoaderConfig::default()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].user_score, 8.0);
        assert_eq!(ds.records()[0].critic_score, 81.0);
    }

    #[test]
    fn json_passthrough_columns_keep_file_order() {
        let text = r#"[
            {"Name": "Halo", "Genre": "Shooter", "Platform": "XB", "Rating": "M", "Developer": "Bungie",
             "Year_of_Release": 2001, "User_Score": 8.5, "Critic_Score": 97}
        ]"#;
        let ds = load_json_str(text, &LoaderConfig::default()).unwrap();
        assert_eq!(ds.extra_columns(), ["Name".to_string(), "Developer".to_string()]);
    }

    #[test]
    fn json_must_be_an_array() {
        let err = load_json_str("{}", &LoaderConfig::default()).unwrap_err();
        assert!(matches!(err, DataLoadError::Malformed(_)));
    }

    #[test]
    fn unsupported_extension() {
        let err = load_file(Path::new("games.xlsx"), &LoaderConfig::default()).unwrap_err();
        assert!(matches!(err, DataLoadError::UnsupportedFormat(ref e) if e == "xlsx"));
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let err = load_file(Path::new("/nonexistent/games.csv"), &LoaderConfig::default());
        assert!(err.is_err());
    }

    #[test]
    fn loads_parquet_columns() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Genre", DataType::Utf8, true),
            Field::new("Platform", DataType::Utf8, true),
            Field::new("Rating", DataType::Utf8, true),
            Field::new("Year_of_Release", DataType::Float64, true),
            Field::new("User_Score", DataType::Utf8, true),
            Field::new("Critic_Score", DataType::Float64, true),
            Field::new("JP_Sales", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("RPG"), Some("RPG"), Some("Action")])),
                Arc::new(StringArray::from(vec![Some("PC"), Some("PC"), None])),
                Arc::new(StringArray::from(vec!["E", "E", "M"])),
                Arc::new(Float64Array::from(vec![2010.0, 1998.0, 2015.0])),
                Arc::new(StringArray::from(vec!["8.0", "6.0", "9.0"])),
                Arc::new(Float64Array::from(vec![80.0, 60.0, 90.0])),
                Arc::new(Int64Array::from(vec![1, 2, 3])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path(), &LoaderConfig::default()).unwrap();
        assert_eq!(ds.len(), 1);
        let r = &ds.records()[0];
        assert_eq!(r.year_of_release, 2010);
        assert_eq!(r.user_score, 8.0);
        assert_eq!(r.extra.get("JP_Sales"), Some(&CellValue::Integer(1)));
    }
}
