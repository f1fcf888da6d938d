use crate::error::{DashboardError, Result};
use crate::schema::{Field, Value};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One Billboard chart entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartEntry {
    pub year: i32,
    pub genre_full: String,
    pub weeks_on_chart: u32,
    pub mood_happy: String,
    pub gender: String,
    pub peak_position: u32,
    /// Audio features may be blank in the merged file
    pub bpm: Option<f64>,
    pub loudness: Option<f64>,
    pub song: String,
    pub artist: String,
}

impl ChartEntry {
    /// Cell value for a chart-entry column; `None` for derived columns
    pub fn value(&self, field: Field) -> Option<Value> {
        let value = match field {
            Field::Year => Value::Int(self.year as i64),
            Field::GenreFull => Value::Text(self.genre_full.clone()),
            Field::WeeksOnChart => Value::Int(self.weeks_on_chart as i64),
            Field::MoodHappy => Value::Text(self.mood_happy.clone()),
            Field::Gender => Value::Text(self.gender.clone()),
            Field::PeakPosition => Value::Int(self.peak_position as i64),
            Field::Bpm => self.bpm.map_or(Value::Null, Value::Float),
            Field::Loudness => self.loudness.map_or(Value::Null, Value::Float),
            Field::Song => Value::Text(self.song.clone()),
            Field::Artist => Value::Text(self.artist.clone()),
            Field::Count | Field::Total | Field::Proportion | Field::ProportionHappy => return None,
        };
        Some(value)
    }
}

/// The full, read-only set of chart entries in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    entries: Vec<ChartEntry>,
}

impl Dataset {
    pub fn new(entries: Vec<ChartEntry>) -> Self {
        Self { entries }
    }

    /// Read and parse a CSV file with a header row
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| DashboardError::data_unavailable(path, e))?;
        Self::from_reader(file, path)
    }

    /// Parse CSV from any reader; `origin` names the source in errors
    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        // 1. Validate headers
        let headers = rdr
            .headers()
            .map_err(|e| DashboardError::data_unavailable(origin, e))?
            .clone();
        for field in Field::ROW_FIELDS {
            if !headers.iter().any(|h| h == field.name()) {
                return Err(DashboardError::data_unavailable(
                    origin,
                    format!("missing required column '{}'", field),
                ));
            }
        }

        // 2. Parse rows
        let mut entries = Vec::new();
        for record in rdr.deserialize::<ChartEntry>() {
            let entry = record.map_err(|e| DashboardError::data_unavailable(origin, e))?;
            entries.push(entry);
        }

        debug!(origin = %origin.display(), rows = entries.len(), "parsed chart entries");
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ChartEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct genres in order of first appearance
    pub fn genres(&self) -> Vec<String> {
        let mut genres: Vec<String> = Vec::new();
        for entry in &self.entries {
            if !genres.contains(&entry.genre_full) {
                genres.push(entry.genre_full.clone());
            }
        }
        genres
    }

    pub fn max_weeks_on_chart(&self) -> u32 {
        self.entries.iter().map(|e| e.weeks_on_chart).max().unwrap_or(0)
    }
}

/// Load-once handle on the chart-entry file.
///
/// The first successful [`DataSource::load`] parses the file; later calls
/// return the same dataset without touching the disk. Failures are not
/// cached.
#[derive(Debug)]
pub struct DataSource {
    path: PathBuf,
    dataset: OnceCell<Dataset>,
}

impl DataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dataset: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.get().is_some()
    }

    pub fn load(&self) -> Result<&Dataset> {
        self.dataset.get_or_try_init(|| {
            let dataset = Dataset::from_path(&self.path)?;
            info!(path = %self.path.display(), rows = dataset.len(), "loaded dataset");
            Ok(dataset)
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    pub(crate) fn entry(
        year: i32,
        genre: &str,
        weeks: u32,
        mood: &str,
        gender: &str,
    ) -> ChartEntry {
        ChartEntry {
            year,
            genre_full: genre.to_string(),
            weeks_on_chart: weeks,
            mood_happy: mood.to_string(),
            gender: gender.to_string(),
            peak_position: 1,
            bpm: Some(120.0),
            loudness: Some(-6.0),
            song: format!("{} song", genre),
            artist: format!("{} artist", gender),
        }
    }

    /// The four-row dataset used throughout the filter and aggregation tests
    pub(crate) fn four_rows() -> Dataset {
        Dataset::new(vec![
            entry(1969, "Rock", 10, "happy", "male"),
            entry(1969, "Pop", 5, "sad", "female"),
            entry(2019, "Rock", 20, "happy", "female"),
            entry(2019, "Pop", 15, "sad", "male"),
        ])
    }

    const HEADER: &str =
        "year,genre_full,weeks_on_chart,mood_happy,gender,peak_position,bpm,loudness,song,artist\n";

    const CSV: &str = "\
year,genre_full,weeks_on_chart,mood_happy,gender,peak_position,bpm,loudness,song,artist
1969,Rock,10,happy,male,3,128.5,-7.2,Song A,Artist A
2019,Pop,15,not happy,female,1,96.0,-5.1,Song B,Artist B
";

    #[test]
    fn test_from_reader() {
        let data = Dataset::from_reader(CSV.as_bytes(), Path::new("inline")).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.entries()[0].genre_full, "Rock");
        assert_eq!(data.entries()[1].weeks_on_chart, 15);
        assert_eq!(data.entries()[1].loudness, Some(-5.1));
    }

    #[test]
    fn test_from_reader_ignores_extra_columns() {
        let csv = "\
artist,song,year,genre_full,weeks_on_chart,mood_happy,gender,peak_position,bpm,loudness,lyrics
X,Y,1969,Soul,4,happy,male,9,100,-8,la la
";
        let data = Dataset::from_reader(csv.as_bytes(), Path::new("inline")).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data.entries()[0].artist, "X");
    }

    #[test]
    fn test_from_reader_header_only() {
        let data = Dataset::from_reader(HEADER.as_bytes(), Path::new("inline")).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_from_reader_missing_column() {
        let csv = "year,genre_full,weeks_on_chart\n1969,Rock,10\n";
        let err = Dataset::from_reader(csv.as_bytes(), Path::new("inline")).unwrap_err();
        assert!(err.to_string().contains("missing required column 'mood_happy'"));
    }

    #[test]
    fn test_from_reader_wrong_column_count() {
        let csv = format!("{}1969,Rock\n", CSV);
        let err = Dataset::from_reader(csv.as_bytes(), Path::new("inline")).unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }

    #[test]
    fn test_from_reader_blank_audio_features() {
        let csv = format!("{}1990,Soul,4,happy,male,2,,,Song C,Artist C\n", CSV);
        let data = Dataset::from_reader(csv.as_bytes(), Path::new("inline")).unwrap();
        assert_eq!(data.len(), 3);

        let blank = &data.entries()[2];
        assert_eq!(blank.genre_full, "Soul");
        assert_eq!(blank.bpm, None);
        assert_eq!(blank.loudness, None);
        assert_eq!(blank.value(Field::Bpm), Some(Value::Null));
        assert_eq!(data.entries()[0].value(Field::Bpm), Some(Value::Float(128.5)));
    }

    #[test]
    fn test_from_reader_keeps_cell_whitespace() {
        let csv = format!("{}1969, Rock,3,happy,male,5,100,-8,Song D,Artist D\n", CSV);
        let data = Dataset::from_reader(csv.as_bytes(), Path::new("inline")).unwrap();
        assert_eq!(data.entries()[2].genre_full, " Rock");
        assert_eq!(data.genres(), vec!["Rock", "Pop", " Rock"]);
    }

    #[test]
    fn test_from_reader_trims_headers() {
        let csv = CSV.replacen("year,genre_full", " year , genre_full ", 1);
        let data = Dataset::from_reader(csv.as_bytes(), Path::new("inline")).unwrap();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_from_reader_bad_number() {
        let csv = CSV.replace("128.5", "fast");
        let err = Dataset::from_reader(csv.as_bytes(), Path::new("inline")).unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }

    #[test]
    fn test_genres_in_order_of_appearance() {
        let data = Dataset::new(vec![
            entry(1969, "Soul", 1, "happy", "male"),
            entry(1969, "Rock", 1, "happy", "male"),
            entry(2019, "Soul", 1, "happy", "male"),
        ]);
        assert_eq!(data.genres(), vec!["Soul".to_string(), "Rock".to_string()]);
    }

    #[test]
    fn test_max_weeks_on_chart() {
        assert_eq!(four_rows().max_weeks_on_chart(), 20);
        assert_eq!(Dataset::default().max_weeks_on_chart(), 0);
    }

    #[test]
    fn test_entry_value() {
        let e = entry(1969, "Rock", 10, "happy", "male");
        assert_eq!(e.value(Field::Year), Some(Value::Int(1969)));
        assert_eq!(e.value(Field::GenreFull), Some(Value::from("Rock")));
        assert_eq!(e.value(Field::Proportion), None);
    }

    #[test]
    fn test_data_source_loads_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        file.flush().unwrap();

        let source = DataSource::new(file.path());
        assert!(!source.is_loaded());
        let first = source.load().unwrap() as *const Dataset;

        // Removing the file proves the second load never re-reads it
        let path = file.path().to_path_buf();
        file.close().unwrap();
        assert!(!path.exists());

        let second = source.load().unwrap() as *const Dataset;
        assert!(source.is_loaded());
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_data_source_missing_file() {
        let source = DataSource::new("definitely/not/here.csv");
        let err = source.load().unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
        assert!(!source.is_loaded());
    }
}
