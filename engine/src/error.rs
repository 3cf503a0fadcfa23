use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Table element not found")]
    TableMissing,

    #[error("Table '{0}' has no sortable headers")]
    NoSortableHeaders(String),

    #[error("Column '{column}' is not sortable in table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("Engine attached to table '{attached}' was handed table '{received}'")]
    ForeignTable { attached: String, received: String },

    #[error("Invalid sort options: {source}")]
    InvalidOptions {
        #[from]
        source: serde_json::Error,
    },

    #[error("CSV export error: {source}")]
    Export {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Exported data is not valid UTF-8: {source}")]
    Encoding {
        #[from]
        source: std::string::FromUtf8Error,
    },
}
