mod settings;

pub use settings::{parse_duration, LogFormat, Settings, DEFAULT_JOB};
