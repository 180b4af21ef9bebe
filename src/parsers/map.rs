// Map loader for the game's JSON map files

use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::error::FieldError;
use crate::engine::models::{GridPos, WindField};

/// `<name>.json`: wind grids, row 0 at the top of the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapData {
    pub wind_dir: Vec<Vec<f64>>,
    pub wind_speed: Vec<Vec<f64>>,
}

/// `<name>_meta.json`: endpoints and declared dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMeta {
    pub start_pos: GridPos,
    pub finish_pos: GridPos,
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug, Error)]
pub enum MapLoadError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("meta declares {meta_rows}x{meta_cols} but wind grids are {rows}x{cols}")]
    DimensionMismatch {
        meta_rows: usize,
        meta_cols: usize,
        rows: usize,
        cols: usize,
    },
    #[error("{which} position {pos} is outside the field")]
    EndpointOutOfRange { which: &'static str, pos: GridPos },
}

/// A parsed map ready for routing.
#[derive(Debug, Clone, PartialEq)]
pub struct GameMap {
    pub field: WindField,
    pub start: GridPos,
    pub finish: GridPos,
}

impl GameMap {
    /// Combines already-parsed data and meta, checking they agree.
    pub fn from_parts(data: MapData, meta: MapMeta) -> Result<Self, MapLoadError> {
        let field = WindField::from_grids(data.wind_dir, data.wind_speed)?;
        if field.rows() != meta.rows || field.cols() != meta.cols {
            return Err(MapLoadError::DimensionMismatch {
                meta_rows: meta.rows,
                meta_cols: meta.cols,
                rows: field.rows(),
                cols: field.cols(),
            });
        }
        for (which, pos) in [("start", meta.start_pos), ("finish", meta.finish_pos)] {
            if !field.contains(pos) {
                return Err(MapLoadError::EndpointOutOfRange { which, pos });
            }
        }
        Ok(Self {
            field,
            start: meta.start_pos,
            finish: meta.finish_pos,
        })
    }

    pub fn from_json_strs(data: &str, meta: &str) -> Result<Self, MapLoadError> {
        let data: MapData = serde_json::from_str(data).map_err(|source| MapLoadError::Json {
            path: PathBuf::from("<map data>"),
            source,
        })?;
        let meta: MapMeta = serde_json::from_str(meta).map_err(|source| MapLoadError::Json {
            path: PathBuf::from("<map meta>"),
            source,
        })?;
        Self::from_parts(data, meta)
    }

    /// Loads `<base>.json` and `<base>_meta.json`.
    pub fn load<P: AsRef<Path>>(base: P) -> Result<Self, MapLoadError> {
        let base = base.as_ref();
        let data_path = with_suffix(base, ".json");
        let meta_path = with_suffix(base, "_meta.json");
        info!("Loading map data from {:?} and {:?}", data_path, meta_path);

        let data: MapData = read_json(&data_path)?;
        let meta: MapMeta = read_json(&meta_path)?;
        let map = Self::from_parts(data, meta)?;

        info!(
            "Map loaded: {}x{}, start {}, finish {}",
            map.field.rows(),
            map.field.cols(),
            map.start,
            map.finish
        );
        Ok(map)
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, MapLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| MapLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| MapLoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}
