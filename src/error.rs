use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("no data source specified in config")]
    NoDataSource,

    #[error("data integrity: {context} at {unit} {index}")]
    DataIntegrity {
        context: String,
        /// `"row"` or `"column"`.
        unit: &'static str,
        index: usize,
    },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("unknown target id: {0}")]
    UnknownTarget(String),

    #[error("chart handle has been destroyed")]
    Destroyed,
}
