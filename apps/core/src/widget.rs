use serde::{Deserialize, Serialize};

/// The parts a rover widget needs mounted. Other keys a host sends are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoverParts {
    pub input: bool,
    pub list: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredPart {
    Input,
    List,
}

impl RequiredPart {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::List => "list",
        }
    }
}

/// Reports the required parts that are missing, logging a warning for each.
/// A missing part never stops the widget; the engine keeps working headless.
pub fn check_parts(parts: &RoverParts) -> Vec<RequiredPart> {
    let mut missing = Vec::new();
    if !parts.input {
        missing.push(RequiredPart::Input);
    }
    if !parts.list {
        missing.push(RequiredPart::List);
    }

    for part in &missing {
        tracing::warn!(part = part.as_str(), "rover widget is missing a required part");
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::{check_parts, RequiredPart, RoverParts};

    #[test]
    fn complete_widget_has_no_missing_parts() {
        let parts = RoverParts {
            input: true,
            list: true,
        };
        assert!(check_parts(&parts).is_empty());
    }

    #[test]
    fn reports_missing_input_and_list() {
        assert_eq!(
            check_parts(&RoverParts::default()),
            vec![RequiredPart::Input, RequiredPart::List]
        );
    }

    #[test]
    fn extra_part_keys_are_ignored() {
        let parts: RoverParts =
            serde_json::from_str(r#"{"root":true,"list":true,"options":4}"#).expect("parts should parse");
        assert_eq!(
            parts,
            RoverParts {
                input: false,
                list: true,
            }
        );
        assert_eq!(check_parts(&parts), vec![RequiredPart::Input]);
    }
}
