//! Shapefile reading and `GeoJSON` writing over the external geospatial crates.
//!
//! This module is the only place that touches the `shapefile`, `geo-types`,
//! and `geojson` crates directly. Everything else in the pipeline works with
//! [`VectorDataset`], so swapping the underlying vector I/O library means
//! editing this module alone.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use geo::BoundingRect;
use geojson::{Feature, FeatureCollection, JsonObject, JsonValue};
use log::debug;
use shapefile::Shape;
use shapefile::dbase::FieldValue;

use crate::error::{FormatError, IoErrorExt, Result};
use crate::formats::VectorFormat;
use crate::types::Bounds;

/// An in-memory vector dataset: decoded features plus source-level metadata.
#[derive(Debug, Clone)]
pub struct VectorDataset {
    collection: FeatureCollection,
    crs: Option<String>,
    columns: Vec<String>,
    bounds: Option<Bounds>,
}

impl VectorDataset {
    /// Assembles a dataset from already-decoded parts.
    #[must_use]
    pub fn new(
        collection: FeatureCollection,
        crs: Option<String>,
        columns: Vec<String>,
        bounds: Option<Bounds>,
    ) -> Self {
        Self {
            collection,
            crs,
            columns,
            bounds,
        }
    }

    /// The decoded feature collection.
    #[must_use]
    pub fn collection(&self) -> &FeatureCollection {
        &self.collection
    }

    /// Number of features in the dataset.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.collection.features.len()
    }

    /// CRS description from the source, when it declares one.
    #[must_use]
    pub fn crs(&self) -> Option<&str> {
        self.crs.as_deref()
    }

    /// Attribute column names, in schema order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Combined extent of all feature geometries, when any geometry is present.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }
}

/// Reads a shapefile dataset into memory.
///
/// The `.dbf` sidecar provides the attribute table and is required; a `.prj`
/// sidecar provides the CRS and is optional. Geometries are converted to
/// their `GeoJSON` equivalents, and null shapes become features without a
/// geometry.
///
/// # Errors
///
/// Returns an error if the shapefile or its attribute table cannot be opened
/// or decoded, or if a geometry cannot be represented in `GeoJSON`.
pub fn read_vector_file(path: &Path) -> Result<VectorDataset> {
    let columns = read_attribute_columns(path)?;
    let crs = read_crs_sidecar(path);

    let mut reader = shapefile::Reader::from_path(path).map_err(|e| FormatError::Parse {
        format: VectorFormat::Shapefile.short_name().to_string(),
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut features = Vec::new();
    let mut bounds = None;
    for (index, pair) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = pair.map_err(|e| FormatError::Parse {
            format: VectorFormat::Shapefile.short_name().to_string(),
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let geometry = match shape {
            Shape::NullShape => None,
            shape => {
                let geometry =
                    geo_types::Geometry::<f64>::try_from(shape).map_err(|e| FormatError::Geometry {
                        path: path.to_path_buf(),
                        feature_index: index,
                        message: e.to_string(),
                    })?;
                bounds = expand_bounds(bounds, geometry.bounding_rect());
                Some(geojson::Geometry::new(geojson::Value::from(&geometry)))
            },
        };

        features.push(Feature {
            bbox: None,
            geometry,
            id: None,
            properties: Some(record_properties(record, &columns)),
            foreign_members: None,
        });
    }

    debug!(
        "Read {} feature(s) and {} column(s) from {}",
        features.len(),
        columns.len(),
        path.display()
    );

    Ok(VectorDataset {
        collection: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
        crs,
        columns,
        bounds,
    })
}

/// Writes a dataset to a `GeoJSON` file, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or serialization fails.
pub fn write_vector_file(dataset: &VectorDataset, path: &Path) -> Result<()> {
    let format = VectorFormat::GeoJson.short_name();
    let file = File::create(path).with_write_context(format, path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, dataset.collection())
        .with_write_context(format, path)?;
    writer.flush().with_write_context(format, path)?;
    Ok(())
}

/// Reads the attribute column names from the dataset's `.dbf` sidecar, in
/// schema order.
fn read_attribute_columns(path: &Path) -> Result<Vec<String>> {
    let dbf_path = path.with_extension("dbf");
    let reader = shapefile::dbase::Reader::from_path(&dbf_path).map_err(|e| FormatError::Parse {
        format: "DBF".to_string(),
        path: dbf_path.clone(),
        message: e.to_string(),
    })?;
    Ok(reader
        .fields()
        .iter()
        .map(|field| field.name().to_string())
        // dbase exposes the record deletion marker as a pseudo-field
        .filter(|name| name != "DeletionFlag")
        .collect())
}

/// Reads the CRS description from the dataset's `.prj` sidecar.
///
/// A missing or unreadable sidecar is not an error; the dataset simply has
/// no declared CRS.
fn read_crs_sidecar(path: &Path) -> Option<String> {
    let prj_path = path.with_extension("prj");
    match fs::read_to_string(&prj_path) {
        Ok(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        },
        Err(error) => {
            debug!("No usable .prj sidecar for {}: {error}", path.display());
            None
        },
    }
}

/// Grows `current` to cover `rect`.
fn expand_bounds(current: Option<Bounds>, rect: Option<geo_types::Rect<f64>>) -> Option<Bounds> {
    match (current, rect) {
        (current, None) => current,
        (None, Some(rect)) => Some((rect.min().x, rect.min().y, rect.max().x, rect.max().y)),
        (Some((min_x, min_y, max_x, max_y)), Some(rect)) => Some((
            min_x.min(rect.min().x),
            min_y.min(rect.min().y),
            max_x.max(rect.max().x),
            max_y.max(rect.max().y),
        )),
    }
}

/// Converts a dbase record into a `GeoJSON` properties object, keyed in
/// column order. Columns missing from the record are recorded as null.
fn record_properties(record: shapefile::dbase::Record, columns: &[String]) -> JsonObject {
    let mut values: HashMap<String, FieldValue> = record.into_iter().collect();
    let mut properties = JsonObject::new();
    for column in columns {
        let value = values
            .remove(column)
            .map_or(JsonValue::Null, field_value_to_json);
        properties.insert(column.clone(), value);
    }
    properties
}

/// Maps a dbase field value to its JSON representation.
///
/// Empty dbase values become JSON nulls, dates are formatted as ISO 8601,
/// and non-finite numbers (which JSON cannot represent) become nulls.
fn field_value_to_json(value: FieldValue) -> JsonValue {
    match value {
        FieldValue::Character(text) => text.map_or(JsonValue::Null, JsonValue::String),
        FieldValue::Memo(text) => JsonValue::String(text),
        FieldValue::Integer(value) => JsonValue::from(value),
        FieldValue::Numeric(value) => value.map_or(JsonValue::Null, json_number),
        FieldValue::Float(value) => {
            value.map_or(JsonValue::Null, |v| json_number(f64::from(v)))
        },
        FieldValue::Double(value) => json_number(value),
        FieldValue::Currency(value) => json_number(value),
        FieldValue::Logical(value) => value.map_or(JsonValue::Null, JsonValue::Bool),
        FieldValue::Date(value) => value.map_or(JsonValue::Null, |date| {
            JsonValue::String(format!(
                "{:04}-{:02}-{:02}",
                date.year(),
                date.month(),
                date.day()
            ))
        }),
        FieldValue::DateTime(value) => {
            let (date, time) = (value.date(), value.time());
            JsonValue::String(format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
                date.year(),
                date.month(),
                date.day(),
                time.hours(),
                time.minutes(),
                time.seconds()
            ))
        },
    }
}

fn json_number(value: f64) -> JsonValue {
    serde_json::Number::from_f64(value).map_or(JsonValue::Null, JsonValue::Number)
}
