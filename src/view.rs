use std::str::FromStr;

use serde::{Deserialize, Serialize};

// Which panel of the page is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Gallery,
    #[default]
    Map,
}

impl ViewMode {
    pub fn name(&self) -> &'static str {
        match self {
            ViewMode::Gallery => "gallery",
            ViewMode::Map => "map",
        }
    }
}

impl FromStr for ViewMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gallery" => Ok(ViewMode::Gallery),
            "map" => Ok(ViewMode::Map),
            other => anyhow::bail!("Unknown view: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_button_values() {
        assert_eq!("gallery".parse::<ViewMode>().unwrap(), ViewMode::Gallery);
        assert_eq!("map".parse::<ViewMode>().unwrap(), ViewMode::Map);
        assert!("list".parse::<ViewMode>().is_err());
        assert_eq!(ViewMode::default().name(), "map");
    }
}
