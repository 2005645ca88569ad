use serde::{Deserialize, Serialize};
use std::{error, fmt};

/// Failure outcome of a contract invocation.
///
/// The message carried by each variant is what the invoking client sees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message")]
pub enum ContractError {
    AlreadyExists(String),
    NotFound(String),
    Store(String),
    Decode(String),
    Encode(String),
    Scan(String),
    InvalidArgument(String),
    UnknownFunction(String),
    /// The transaction read state that changed before it could commit.
    Conflict(String),
}

impl ContractError {
    pub fn already_exists(id: &str) -> Self {
        ContractError::AlreadyExists(format!("the asset {} already exists", id))
    }

    pub fn not_found(id: &str) -> Self {
        ContractError::NotFound(format!("the asset {} does not exist", id))
    }

    pub fn message(&self) -> &str {
        match self {
            ContractError::AlreadyExists(m)
            | ContractError::NotFound(m)
            | ContractError::Store(m)
            | ContractError::Decode(m)
            | ContractError::Encode(m)
            | ContractError::Scan(m)
            | ContractError::InvalidArgument(m)
            | ContractError::UnknownFunction(m)
            | ContractError::Conflict(m) => m,
        }
    }
}

impl fmt::Display for ContractError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl error::Error for ContractError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format() {
        let e = ContractError::not_found("asset9");
        let json = serde_json::to_string(&e).unwrap();
        assert_eq!(json, r#"{"kind":"NotFound","message":"the asset asset9 does not exist"}"#);
        assert_eq!(serde_json::from_str::<ContractError>(&json).unwrap(), e);
        assert_eq!(e.to_string(), "the asset asset9 does not exist");
    }
}
