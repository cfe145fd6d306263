use crate::{IngestError, Result};
use serde_json::{json, Value};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

const GENERATED_REVIEWS: u32 = 35;

/// Substitute data used when the primary document cannot be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Fallback {
    #[default]
    Builtin,
    Disabled,
    File(PathBuf),
}

impl Fallback {
    pub async fn payload(&self) -> Result<Value> {
        match self {
            Self::Builtin => Ok(builtin_reviews()),
            Self::Disabled => Err(IngestError::FallbackUnavailable(
                "fallback disabled".to_string(),
            )),
            Self::File(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    IngestError::FallbackUnavailable(format!("{}: {e}", path.display()))
                })?;
                serde_json::from_slice(&bytes).map_err(|e| {
                    IngestError::FallbackUnavailable(format!("{}: {e}", path.display()))
                })
            }
        }
    }
}

impl FromStr for Fallback {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim() {
            "builtin" | "" => Self::Builtin,
            "none" | "off" => Self::Disabled,
            path => Self::File(PathBuf::from(path)),
        })
    }
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => f.write_str("builtin"),
            Self::Disabled => f.write_str("none"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Two curated Cochrane reviews followed by generated entries spread over
/// five topics. Keys are capitalized, as in the upstream export.
#[must_use]
pub fn builtin_reviews() -> Value {
    let mut reviews = vec![
        json!({
            "URL": "http://onlinelibrary.wiley.com/doi/10.1002/14651858.CD002204.pub4/full",
            "Topic": "Allergy & intolerance",
            "Title": "Antifungal therapies for allergic bronchopulmonary aspergillosis in people with cystic fibrosis",
            "Author": "Heather E Elphick, Kevin W Southern",
            "Date": "2016-11-08"
        }),
        json!({
            "URL": "http://onlinelibrary.wiley.com/doi/10.1002/14651858.CD010112.pub2/full",
            "Topic": "Allergy & intolerance",
            "Title": "Polyunsaturated fatty acid supplementation in infancy for the prevention of allergy",
            "Author": "Tim Schindler, John KH Sinn, David A Osborn",
            "Date": "2016-10-28"
        }),
    ];

    for i in 1..=GENERATED_REVIEWS {
        let (topic, title, authors) = generated_profile(i);
        reviews.push(json!({
            "URL": format!("http://onlinelibrary.wiley.com/doi/10.1002/14651858.CD0{}/full", 10_000 + i),
            "Topic": topic,
            "Title": title,
            "Author": authors,
            "Date": format!("{}-{:02}-{:02}", 2020 + i % 5, i % 12 + 1, i % 28 + 1),
        }));
    }

    Value::Array(reviews)
}

fn generated_profile(i: u32) -> (&'static str, &'static str, &'static str) {
    if i % 5 == 0 {
        (
            "Neurology",
            "Neural pathways in degenerative diseases",
            "James B Wilson, Sophia Chen, Robert Miller",
        )
    } else if i % 4 == 0 {
        (
            "Cardiovascular",
            "Cardioprotective effects of natural compounds",
            "Maria Garcia, John Smith, Emily Taylor",
        )
    } else if i % 3 == 0 {
        (
            "Respiratory medicine",
            "Interventions for chronic respiratory conditions",
            "David Johnson, Lisa Brown, Michael Davis",
        )
    } else if i % 2 == 0 {
        (
            "Infectious disease",
            "Antimicrobial resistance patterns",
            "Sarah Martinez, Christopher Lee, Jennifer White",
        )
    } else {
        (
            "Oncology",
            "Cancer therapy outcomes",
            "Thomas Anderson, Elizabeth Wright, Daniel Thompson",
        )
    }
}
