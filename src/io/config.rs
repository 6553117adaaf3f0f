use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub shape_file_name: String,
    pub schedule_file_name: String,
    pub trip_file_name: String,
    pub predictions_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shape_file_name: "shape.csv".into(),
            schedule_file_name: "schedule.csv".into(),
            trip_file_name: "trip.csv".into(),
            predictions_file_name: "prediction_results.csv".into(),
        }
    }
}
