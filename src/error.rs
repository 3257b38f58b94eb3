use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid date \"{input}\" (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("--since ({since}) must not be after --until ({until})")]
    InvalidRange { since: String, until: String },

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("No cached copy of {url} and --offline was given")]
    OfflineNoCache { url: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Column \"{column}\" not found in {path}")]
    MissingColumn { column: String, path: String },

    #[error("No usable rows after parsing {path}")]
    EmptyData { path: String },

    #[error("Series too short for ARIMA({p},{d},{q}): need at least {needed} observations, have {have}")]
    InsufficientData {
        p: usize,
        d: usize,
        q: usize,
        needed: usize,
        have: usize,
    },

    #[error("Normal equations are singular; the series may be constant")]
    Singular,

    #[error("Invalid ARIMA order \"{input}\" (expected p,d,q)")]
    InvalidOrder { input: String },

    #[error("Forecast window is empty ({from} to {to})")]
    EmptyWindow { from: String, to: String },

    #[error("Holdout of {holdout} days leaves too little training data ({remaining} days)")]
    HoldoutTooLarge { holdout: usize, remaining: usize },
}
