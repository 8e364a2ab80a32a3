use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::error::{EstimatorError, Result};
use crate::recommend::price_per_area;

/// Columns a dataset file must carry. Other columns (e.g. `society`) are not
/// read, but a blank cell in any column still drops the row.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "site_location",
    "area_type",
    "availability",
    "size",
    "bath",
    "balcony",
    "total_sqft",
    "price",
];

/// One cleaned row of the reference dataset.
///
/// `total_area` is always finite and positive, so `price_per_area` is
/// computed once here and never rewritten afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Listing {
    pub location: String,
    pub area_type: String,
    pub availability: String,
    pub room_count: u32,
    pub bathroom_count: u32,
    pub balcony_count: u32,
    pub total_area: f64,
    /// Price in lakhs.
    pub price: f64,
    price_per_area: f64,
}

impl Listing {
    /// Returns `None` when the area is not a positive number or the price is not finite.
    pub fn new(location: impl Into<String>, total_area: f64, price: f64) -> Option<Self> {
        if !total_area.is_finite() || total_area <= 0.0 || !price.is_finite() {
            return None;
        }

        Some(Self {
            location: location.into().trim().to_string(),
            area_type: String::new(),
            availability: String::new(),
            room_count: 0,
            bathroom_count: 0,
            balcony_count: 0,
            total_area,
            price,
            price_per_area: price_per_area(price, total_area),
        })
    }

    pub fn rooms(mut self, room_count: u32, bathroom_count: u32, balcony_count: u32) -> Self {
        self.room_count = room_count;
        self.bathroom_count = bathroom_count;
        self.balcony_count = balcony_count;
        self
    }

    pub fn terms(mut self, area_type: impl Into<String>, availability: impl Into<String>) -> Self {
        self.area_type = area_type.into();
        self.availability = availability.into();
        self
    }

    /// Price in base currency units per unit of area.
    pub fn price_per_area(&self) -> f64 {
        self.price_per_area
    }
}

/// Why a dataset row was dropped during loading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    Malformed,
    MissingField,
    RoomCount,
    Count,
    Area,
    Price,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub malformed: usize,
    pub missing_field: usize,
    pub invalid_room_count: usize,
    pub invalid_count: usize,
    pub invalid_area: usize,
    pub invalid_price: usize,
}

impl LoadStats {
    fn record_drop(&mut self, reason: DropReason) {
        let counter = match reason {
            DropReason::Malformed => &mut self.malformed,
            DropReason::MissingField => &mut self.missing_field,
            DropReason::RoomCount => &mut self.invalid_room_count,
            DropReason::Count => &mut self.invalid_count,
            DropReason::Area => &mut self.invalid_area,
            DropReason::Price => &mut self.invalid_price,
        };
        *counter += 1;
    }

    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.rows_kept
    }
}

/// The loaded reference dataset. Immutable once built.
#[derive(Clone, Debug, Default)]
pub struct ListingTable {
    listings: Vec<Listing>,
    stats: LoadStats,
    locations: Vec<String>,
    area_types: Vec<String>,
    availabilities: Vec<String>,
}

impl ListingTable {
    pub fn new(listings: Vec<Listing>) -> Self {
        let stats = LoadStats {
            rows_read: listings.len(),
            rows_kept: listings.len(),
            ..LoadStats::default()
        };
        let locations = distinct_sorted(listings.iter().map(|l| l.location.as_str()));
        let area_types = distinct_sorted(listings.iter().map(|l| l.area_type.as_str()));
        let availabilities = distinct_sorted(listings.iter().map(|l| l.availability.as_str()));

        Self {
            listings,
            stats,
            locations,
            area_types,
            availabilities,
        }
    }

    /// Parses CSV content, dropping rows that are incomplete or fail coercion.
    ///
    /// Choice lists are collected from every complete row, including rows
    /// later dropped for an unparseable number.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| EstimatorError::startup("dataset", Path::new("<csv>"), e.to_string()))?
            .clone();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(EstimatorError::startup(
                "dataset",
                Path::new("<csv>"),
                format!("missing required columns: {}", missing.join(", ")),
            ));
        }

        let mut listings = Vec::new();
        let mut stats = LoadStats::default();
        let mut locations = BTreeSet::new();
        let mut area_types = BTreeSet::new();
        let mut availabilities = BTreeSet::new();

        for (idx, result) in reader.records().enumerate() {
            stats.rows_read += 1;

            let parsed = result.map_err(|_| DropReason::Malformed).and_then(|record| {
                if record.len() < headers.len() || record.iter().any(str::is_empty) {
                    return Err(DropReason::MissingField);
                }

                let raw: RawListing = record
                    .deserialize(Some(&headers))
                    .map_err(|_| DropReason::Malformed)?;

                locations.insert(raw.site_location.trim().to_string());
                area_types.insert(raw.area_type.clone());
                availabilities.insert(raw.availability.clone());

                raw.into_listing()
            });

            match parsed {
                Ok(listing) => {
                    stats.rows_kept += 1;
                    listings.push(listing);
                }
                Err(reason) => {
                    // header is line 1
                    tracing::trace!(line = idx + 2, ?reason, "dropping dataset row");
                    stats.record_drop(reason);
                }
            }
        }

        Ok(Self {
            listings,
            stats,
            locations: distinct_sorted(locations.iter().map(String::as_str)),
            area_types: distinct_sorted(area_types.iter().map(String::as_str)),
            availabilities: distinct_sorted(availabilities.iter().map(String::as_str)),
        })
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }

    pub fn n_samples(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Distinct locations, sorted.
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn area_types(&self) -> &[String] {
        &self.area_types
    }

    pub fn availabilities(&self) -> &[String] {
        &self.availabilities
    }
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Reads and cleans the dataset at `path`.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<ListingTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| EstimatorError::startup("dataset", path, e.to_string()))?;

    let table = ListingTable::from_reader(file).map_err(|err| match err {
        EstimatorError::Startup { message, .. } => EstimatorError::startup("dataset", path, message),
        other => other,
    })?;

    let stats = table.stats();
    tracing::info!(
        path = %path.display(),
        rows_read = stats.rows_read,
        rows_kept = stats.rows_kept,
        rows_dropped = stats.rows_dropped(),
        "loaded dataset"
    );
    tracing::debug!(?stats, "dataset drop breakdown");

    Ok(table)
}

/// Loads the dataset on first use and shares it afterwards.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    table: OnceCell<Arc<ListingTable>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Result<Arc<ListingTable>> {
        self.table
            .get_or_try_init(|| load_dataset(&self.path).map(Arc::new))
            .cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }
}

/// Parses a room-count descriptor such as `"3 BHK"`, `"4 Bedroom"` or a bare `"2"`.
pub fn parse_room_count(size: &str) -> Option<u32> {
    size.split_whitespace().next()?.parse().ok()
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Counts are stored as floats in the source data (`"2.0"`).
fn parse_count(value: &str) -> Option<u32> {
    let number = parse_number(value)?;
    if number < 0.0 || number.fract() != 0.0 || number > u32::MAX as f64 {
        return None;
    }
    Some(number as u32)
}

/// A complete row. Only the location is trimmed; the other categorical
/// values must match the model's indicator columns byte for byte.
#[derive(Debug, Deserialize)]
struct RawListing {
    site_location: String,
    area_type: String,
    availability: String,
    size: String,
    bath: String,
    balcony: String,
    total_sqft: String,
    price: String,
}

impl RawListing {
    fn into_listing(self) -> std::result::Result<Listing, DropReason> {
        let room_count = parse_room_count(&self.size).ok_or(DropReason::RoomCount)?;
        let bathroom_count = parse_count(&self.bath).ok_or(DropReason::Count)?;
        let balcony_count = parse_count(&self.balcony).ok_or(DropReason::Count)?;
        let total_area = parse_number(&self.total_sqft)
            .filter(|area| *area > 0.0)
            .ok_or(DropReason::Area)?;
        let price = parse_number(&self.price).ok_or(DropReason::Price)?;

        let listing = Listing::new(self.site_location, total_area, price)
            .ok_or(DropReason::Area)?
            .rooms(room_count, bathroom_count, balcony_count)
            .terms(self.area_type, self.availability);

        Ok(listing)
    }
}
