//! Registry of vector data formats known to the conversion pipeline.
//!
//! This module enumerates the formats the pipeline understands, their file
//! extensions, sidecar files, and which operations (info, read, write) each
//! format supports. The registry is modeled after GDAL's driver system, scaled
//! down to the shapefile-in / `GeoJSON`-out pipeline this crate implements.
//!
//! # Examples
//!
//! ```
//! use std::path::Path;
//! use geobatch_core::formats::VectorFormat;
//!
//! // Map a file path to its format
//! let format = VectorFormat::from_path(Path::new("regions.shp")).expect("known extension");
//! assert_eq!(format, VectorFormat::Shapefile);
//!
//! // List all formats and their capabilities
//! for format in VectorFormat::ALL {
//!     println!("{}: {}", format.short_name(), format.long_name());
//! }
//! ```

use std::path::Path;

/// A vector data format known to the pipeline.
///
/// Shapefiles are the only readable format; `GeoJSON` is the only writable
/// one. The `info` capability covers summarizing an already-written file
/// without fully decoding it, which is how the metadata aggregator treats
/// `GeoJSON` outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorFormat {
    /// ESRI Shapefile (`.shp` plus `.dbf`/`.shx`/`.prj` sidecars).
    Shapefile,
    /// GeoJSON (RFC 7946).
    GeoJson,
}

impl VectorFormat {
    /// Every format in the registry.
    pub const ALL: [VectorFormat; 2] = [VectorFormat::Shapefile, VectorFormat::GeoJson];

    /// Short identifier used in log output and error messages.
    ///
    /// # Examples
    ///
    /// ```
    /// use geobatch_core::formats::VectorFormat;
    ///
    /// assert_eq!(VectorFormat::Shapefile.short_name(), "Shapefile");
    /// assert_eq!(VectorFormat::GeoJson.short_name(), "GeoJSON");
    /// ```
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            VectorFormat::Shapefile => "Shapefile",
            VectorFormat::GeoJson => "GeoJSON",
        }
    }

    /// Full descriptive name for display purposes.
    #[must_use]
    pub const fn long_name(self) -> &'static str {
        match self {
            VectorFormat::Shapefile => "ESRI Shapefile / DBF",
            VectorFormat::GeoJson => "GeoJSON (RFC 7946)",
        }
    }

    /// Primary file extension, without the leading dot.
    ///
    /// # Examples
    ///
    /// ```
    /// use geobatch_core::formats::VectorFormat;
    ///
    /// assert_eq!(VectorFormat::Shapefile.extension(), "shp");
    /// assert_eq!(VectorFormat::GeoJson.extension(), "geojson");
    /// ```
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            VectorFormat::Shapefile => "shp",
            VectorFormat::GeoJson => "geojson",
        }
    }

    /// Sidecar file extensions that accompany the primary file.
    ///
    /// The `.dbf` sidecar is required for reading a shapefile's attribute
    /// table; `.shx` and `.prj` are optional.
    #[must_use]
    pub const fn sidecar_extensions(self) -> &'static [&'static str] {
        match self {
            VectorFormat::Shapefile => &["dbf", "shx", "prj"],
            VectorFormat::GeoJson => &[],
        }
    }

    /// Returns `true` if the pipeline can summarize files of this format.
    #[must_use]
    pub const fn supports_info(self) -> bool {
        match self {
            VectorFormat::Shapefile | VectorFormat::GeoJson => true,
        }
    }

    /// Returns `true` if the pipeline can read features from this format.
    #[must_use]
    pub const fn supports_read(self) -> bool {
        match self {
            VectorFormat::Shapefile => true,
            VectorFormat::GeoJson => false,
        }
    }

    /// Returns `true` if the pipeline can write features to this format.
    #[must_use]
    pub const fn supports_write(self) -> bool {
        match self {
            VectorFormat::Shapefile => false,
            VectorFormat::GeoJson => true,
        }
    }

    /// Identifies the format of a path by its extension (case-insensitive).
    ///
    /// Returns `None` for paths without an extension or with an extension no
    /// format in the registry claims.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use geobatch_core::formats::VectorFormat;
    ///
    /// assert_eq!(
    ///     VectorFormat::from_path(Path::new("parcels.SHP")),
    ///     Some(VectorFormat::Shapefile)
    /// );
    /// assert_eq!(
    ///     VectorFormat::from_path(Path::new("parcels.geojson")),
    ///     Some(VectorFormat::GeoJson)
    /// );
    /// assert_eq!(VectorFormat::from_path(Path::new("readme.txt")), None);
    /// ```
    #[must_use]
    pub fn from_path(path: &Path) -> Option<VectorFormat> {
        let extension = path.extension()?.to_str()?;
        VectorFormat::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
    }
}
