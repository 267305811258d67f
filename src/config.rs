/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub dataset_path: String,
    pub pipeline_path: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            dataset_path: std::env::var("DATASET_PATH")
                .unwrap_or_else(|_| "Structured_data_set/Processed_dataset.csv".to_string()),
            pipeline_path: std::env::var("PIPELINE_PATH")
                .unwrap_or_else(|_| "pipeline_model.json".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
        }
    }
}
