use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a passthrough column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, as read from the source before the
/// filtered columns are coerced. Passthrough columns (name, publisher,
/// sales figures, ...) keep it as is.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret a raw text cell the way a CSV column would be typed.
    /// The empty string is the missing value.
    pub fn guess(s: &str) -> CellValue {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::Text(s.to_string())
    }

    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Integer view; integral floats such as `2006.0` are accepted since
    /// pandas writes integer columns containing gaps as floats.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            CellValue::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            CellValue::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| CellValue::Float(s.parse::<f64>().ok()?).as_i64())
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// GameRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single game entry. Scores are always numeric once a record exists.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub genre: String,
    pub platform: String,
    pub rating: String,
    pub year_of_release: i32,
    pub user_score: f64,
    pub critic_score: f64,
    /// Columns not used by filtering: column_name → value.
    pub extra: BTreeMap<String, CellValue>,
}

impl GameRecord {
    /// Record with only the filtered columns set; mostly useful in tests.
    pub fn new(
        genre: &str,
        platform: &str,
        rating: &str,
        year_of_release: i32,
        user_score: f64,
        critic_score: f64,
    ) -> Self {
        GameRecord {
            genre: genre.to_string(),
            platform: platform.to_string(),
            rating: rating.to_string(),
            year_of_release,
            user_score,
            critic_score,
            extra: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The cleaned, immutable table. Cloning shares the underlying rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[GameRecord]>,
    /// Passthrough column names in source order.
    extra_columns: Arc<[String]>,
}

impl Dataset {
    pub fn new(records: Vec<GameRecord>, extra_columns: Vec<String>) -> Self {
        Dataset {
            records: records.into(),
            extra_columns: extra_columns.into(),
        }
    }

    pub fn from_records(records: Vec<GameRecord>) -> Self {
        Self::new(records, Vec::new())
    }

    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guess_types_cells() {
        assert_eq!(CellValue::guess(""), CellValue::Null);
        assert_eq!(CellValue::guess("42"), CellValue::Integer(42));
        assert_eq!(CellValue::guess("8.5"), CellValue::Float(8.5));
        assert_eq!(CellValue::guess("tbd"), CellValue::Text("tbd".into()));
    }

    #[test]
    fn integral_floats_read_as_years() {
        assert_eq!(CellValue::Float(2006.0).as_i64(), Some(2006));
        assert_eq!(CellValue::Text("2006.0".into()).as_i64(), Some(2006));
        assert_eq!(CellValue::Float(2006.5).as_i64(), None);
    }

    #[test]
    fn nan_counts_as_missing() {
        assert!(CellValue::Float(f64::NAN).is_null());
        assert!(!CellValue::Float(0.0).is_null());
    }

    #[test]
    fn clones_share_rows() {
        let ds = Dataset::from_records(vec![GameRecord::new("RPG", "PC", "E", 2010, 8.0, 80.0)]);
        let copy = ds.clone();
        assert!(std::ptr::eq(ds.records().as_ptr(), copy.records().as_ptr()));
    }
}
