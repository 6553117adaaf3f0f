use serde::de::DeserializeOwned;
use std::{
    fs::File,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;
use zip::ZipArchive;

mod config;
pub mod models;
pub use config::*;
use models::*;

use crate::{
    plan::{RoutePlan, Sample},
    predictor::Prediction,
    shared::geo::Location,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Could not find file with name: {0}")]
    FileNotFound(String),
    #[error("No storage configured, use from_zip or from_directory")]
    NoStorage,
    #[error("Zip archives are read only")]
    ReadOnlyStorage,
}

#[derive(Default)]
pub enum StorageType {
    #[default]
    None,
    Zip(PathBuf),
    Directory(PathBuf),
}

/// A route shape, a schedule and a trip stored as CSV files with
/// `longitude,latitude[,timestamp]` columns.
#[derive(Default)]
pub struct Dataset {
    config: Config,
    storage: StorageType,
}

impl Dataset {
    pub fn new(config: self::Config) -> Self {
        Self {
            config,
            storage: Default::default(),
        }
    }

    pub fn from_zip(mut self, path: PathBuf) -> Self {
        self.storage = StorageType::Zip(path);
        self
    }

    pub fn from_directory(mut self, path: PathBuf) -> Self {
        self.storage = StorageType::Directory(path);
        self
    }

    pub fn stream_shape<F>(&self, mut f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, Location)),
    {
        self.stream::<ShapeRow, _>(&self.config.shape_file_name, |(i, row)| {
            f((i, row.into()))
        })
    }

    pub fn stream_schedule<F>(&self, mut f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, Sample)),
    {
        self.stream::<SampleRow, _>(&self.config.schedule_file_name, |(i, row)| {
            f((i, row.into()))
        })
    }

    pub fn stream_trip<F>(&self, mut f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, Sample)),
    {
        self.stream::<SampleRow, _>(&self.config.trip_file_name, |(i, row)| {
            f((i, row.into()))
        })
    }

    pub fn load_shape(&self) -> Result<Vec<Location>, self::Error> {
        let mut shape = Vec::new();
        self.stream_shape(|(_, location)| shape.push(location))?;
        debug!("Loaded {} shape points", shape.len());
        Ok(shape)
    }

    pub fn load_schedule(&self) -> Result<Vec<Sample>, self::Error> {
        let mut schedule = Vec::new();
        self.stream_schedule(|(_, sample)| schedule.push(sample))?;
        debug!("Loaded {} schedule samples", schedule.len());
        Ok(schedule)
    }

    pub fn load_trip(&self) -> Result<Vec<Sample>, self::Error> {
        let mut trip = Vec::new();
        self.stream_trip(|(_, sample)| trip.push(sample))?;
        debug!("Loaded {} trip samples", trip.len());
        Ok(trip)
    }

    /// Writes the predictions next to the input files and returns the path
    /// written. Only directory storage can be written to.
    pub fn save_predictions(
        &self,
        plan: &RoutePlan,
        predictions: &[Prediction],
    ) -> Result<PathBuf, self::Error> {
        match &self.storage {
            StorageType::Directory(dir) => {
                let path = dir.join(&self.config.predictions_file_name);
                write_predictions(File::create(&path)?, plan, predictions)?;
                debug!("Saved {} predictions to {:?}", predictions.len(), path);
                Ok(path)
            }
            StorageType::Zip(_) => Err(self::Error::ReadOnlyStorage),
            StorageType::None => Err(self::Error::NoStorage),
        }
    }

    fn stream<T, F>(&self, file_name: &str, f: F) -> Result<(), self::Error>
    where
        T: DeserializeOwned,
        F: FnMut((usize, T)),
    {
        match &self.storage {
            StorageType::None => Err(self::Error::NoStorage),
            StorageType::Zip(path) => stream_from_zip::<T, F>(path, file_name, f),
            StorageType::Directory(path) => stream_from_directory::<T, F>(path, file_name, f),
        }
    }
}

/// Deserializes every row of a CSV source with headers.
pub fn stream_from_reader<T, R, F>(reader: R, mut f: F) -> Result<(), self::Error>
where
    T: DeserializeOwned,
    R: Read,
    F: FnMut((usize, T)),
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    for (i, row) in reader.deserialize().enumerate() {
        f((i, row?));
    }
    Ok(())
}

/// One CSV row per prediction, see [`PredictionRow`].
pub fn write_predictions<W: Write>(
    writer: W,
    plan: &RoutePlan,
    predictions: &[Prediction],
) -> Result<(), self::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for prediction in predictions {
        writer.serialize(PredictionRow::new(plan, prediction))?;
    }
    writer.flush()?;
    Ok(())
}

fn stream_from_zip<T, F>(zip_path: &Path, file_name: &str, f: F) -> Result<(), self::Error>
where
    T: DeserializeOwned,
    F: FnMut((usize, T)),
{
    let zip_file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(zip_file)?;
    let index = archive
        .index_for_name(file_name)
        .ok_or(self::Error::FileNotFound(file_name.to_string()))?;
    let file = archive.by_index(index)?;
    stream_from_reader(file, f)
}

fn stream_from_directory<T, F>(dir: &Path, file_name: &str, f: F) -> Result<(), self::Error>
where
    T: DeserializeOwned,
    F: FnMut((usize, T)),
{
    let file = match File::open(dir.join(file_name)) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(self::Error::FileNotFound(file_name.to_string()));
        }
        Err(err) => return Err(err.into()),
    };
    stream_from_reader(file, f)
}
