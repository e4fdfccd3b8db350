use serde::{Deserialize, Serialize};
use std::fmt;

/// Data source chosen by the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Vectorstore,
    Websearch,
    DirectAnswer,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Vectorstore => "vectorstore",
            Route::Websearch => "websearch",
            Route::DirectAnswer => "direct_answer",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict of a binary grader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryScore {
    Yes,
    No,
}

impl BinaryScore {
    pub fn is_yes(&self) -> bool {
        matches!(self, BinaryScore::Yes)
    }
}

impl From<bool> for BinaryScore {
    fn from(value: bool) -> Self {
        if value {
            BinaryScore::Yes
        } else {
            BinaryScore::No
        }
    }
}

impl fmt::Display for BinaryScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryScore::Yes => f.write_str("yes"),
            BinaryScore::No => f.write_str("no"),
        }
    }
}
