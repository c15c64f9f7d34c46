use thiserror::Error;

pub type Result<T> = std::result::Result<T, CarrierError>;

#[derive(Error, Debug)]
pub enum CarrierError {
    #[error("malformed YAML{}: {message}", location_suffix(.line, .column))]
    Yaml {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    #[error("{0}")]
    Other(String),
}

impl CarrierError {
    /// Build a `Yaml` variant from a serde_yaml error, keeping the
    /// underlying line/column when the parser reports one.
    pub fn from_yaml(err: &serde_yaml::Error) -> Self {
        let location = err.location();
        CarrierError::Yaml {
            message: err.to_string(),
            line: location.as_ref().map(|loc| loc.line()),
            column: location.as_ref().map(|loc| loc.column()),
        }
    }
}

fn location_suffix(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" at line {line} column {column}"),
        (Some(line), None) => format!(" at line {line}"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_error_carries_location() {
        let err = serde_yaml::from_str::<serde_yaml::Value>("key: [unclosed").unwrap_err();
        let carrier_err = CarrierError::from_yaml(&err);
        let rendered = carrier_err.to_string();
        assert!(rendered.starts_with("malformed YAML"));
        assert!(rendered.contains("line"));
    }
}
