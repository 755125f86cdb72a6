use thiserror::Error;

#[derive(Debug, Error)]
pub enum NullError {
    #[error("cannot decode {target}: {reason}")]
    Decode { target: &'static str, reason: String },

    #[error("cannot scan {shape} into {target}: {value}")]
    Scan {
        shape: &'static str,
        target: &'static str,
        value: String,
    },

    #[error("destination is missing, not a valid reference to an object")]
    NilDestination,

    #[error("cannot encode {target}: {reason}")]
    Encode { target: &'static str, reason: String },
}

impl NullError {
    pub(crate) fn decode(target: &'static str, reason: impl ToString) -> Self {
        Self::Decode {
            target,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn encode(target: &'static str, reason: impl ToString) -> Self {
        Self::Encode {
            target,
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NullError>;
