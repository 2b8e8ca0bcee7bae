//! Course topics and their keyword lists.
//!
//! Topics are a closed set. Each variant maps through a static table to its
//! id, the display name used in question sheets, and the built-in keywords
//! used to score textual answers. [`KeywordCatalog`] overlays keyword lists
//! from configuration on top of the built-ins.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A topic of the course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    NQueens,
    KnightsTour,
    GraphColoring,
    GeneralisedHanoi,
    Minimax,
    NashEquilibrium,
    Csp,
}

struct TopicInfo {
    topic: Topic,
    id: &'static str,
    display_name: &'static str,
    keywords: &'static [&'static str],
}

const TOPICS: &[TopicInfo] = &[
    TopicInfo {
        topic: Topic::NQueens,
        id: "n-queens",
        display_name: "N-Queens Problem (Backtracking)",
        keywords: &[
            "backtracking",
            "n-queens",
            "csp",
            "constraint",
            "forward checking",
            "fc",
            "mrv",
            "minimum remaining values",
            "ac-3",
            "arc consistency",
        ],
    },
    TopicInfo {
        topic: Topic::KnightsTour,
        id: "knights-tour",
        display_name: "Knight's Tour Problem",
        keywords: &[
            "backtracking",
            "warnsdorff",
            "heuristic",
            "euristica",
            "hamiltonian path",
            "drum hamiltonian",
        ],
    },
    TopicInfo {
        topic: Topic::GraphColoring,
        id: "graph-coloring",
        display_name: "Graph Coloring (CSP)",
        keywords: &[
            "chromatic number",
            "numarul cromatic",
            "colors",
            "culori",
            "csp",
            "backtracking",
            "forward checking",
            "mrv",
            "degree heuristic",
        ],
    },
    TopicInfo {
        topic: Topic::GeneralisedHanoi,
        id: "generalised-hanoi",
        display_name: "Generalized Hanoi Towers",
        keywords: &[
            "recursion",
            "recursiv",
            "moves",
            "mutari",
            "pegs",
            "tije",
            "frame-stewart",
            "bfs",
            "a*",
        ],
    },
    TopicInfo {
        topic: Topic::Minimax,
        id: "minimax",
        display_name: "Minimax with Alpha-Beta Pruning",
        keywords: &[
            "minimax",
            "alfa-beta",
            "pruning",
            "taiere",
            "leaf nodes",
            "noduri frunze",
            "root value",
            "valoarea radacinii",
        ],
    },
    TopicInfo {
        topic: Topic::NashEquilibrium,
        id: "nash-equilibrium",
        display_name: "Nash Equilibrium (Game Theory)",
        keywords: &[
            "nash",
            "equilibrium",
            "echilibru",
            "pure strategy",
            "strategie pura",
            "best response",
            "dominant strategy",
        ],
    },
    TopicInfo {
        topic: Topic::Csp,
        id: "csp",
        display_name: "Constraint Satisfaction Problems",
        keywords: &[
            "csp",
            "backtracking",
            "forward checking",
            "fc",
            "mrv",
            "ac-3",
            "constraint",
            "variables",
            "domains",
        ],
    },
];

impl Topic {
    /// All topics, in catalog order.
    pub fn all() -> impl Iterator<Item = Topic> + Clone {
        TOPICS.iter().map(|info| info.topic)
    }

    fn info(self) -> &'static TopicInfo {
        // Rows are in declaration order.
        &TOPICS[self as usize]
    }

    /// The canonical id, e.g. `n-queens`.
    pub fn id(self) -> &'static str {
        self.info().id
    }

    /// The name printed in question sheets.
    pub fn display_name(self) -> &'static str {
        self.info().display_name
    }

    /// Keywords that ship with the engine.
    pub fn builtin_keywords(self) -> &'static [&'static str] {
        self.info().keywords
    }

    /// Map a sheet "Topic:" line back to its topic.
    pub fn from_display_name(name: &str) -> Option<Topic> {
        let name = name.trim();
        TOPICS
            .iter()
            .find(|info| info.display_name.eq_ignore_ascii_case(name))
            .map(|info| info.topic)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Lowercase, trimmed, with `_` and spaces turned into `-`.
fn topic_key(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect()
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = topic_key(s);
        if key == "generalized-hanoi" {
            return Ok(Topic::GeneralisedHanoi);
        }
        TOPICS
            .iter()
            .find(|info| info.id == key)
            .map(|info| info.topic)
            .ok_or_else(|| format!("unknown topic: {s}"))
    }
}

/// Keyword lists per topic: built-ins, replaced per topic by configuration.
#[derive(Debug, Clone)]
pub struct KeywordCatalog {
    lists: BTreeMap<Topic, Vec<String>>,
}

impl Default for KeywordCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KeywordCatalog {
    /// The catalog shipped with the engine.
    pub fn builtin() -> Self {
        let lists = TOPICS
            .iter()
            .map(|info| {
                (
                    info.topic,
                    info.keywords.iter().map(|k| k.to_string()).collect(),
                )
            })
            .collect();
        Self { lists }
    }

    /// Built-ins with the given lists replacing those of their topics.
    ///
    /// Entries whose key is not a known topic are skipped with a warning.
    pub fn with_overrides(overrides: &BTreeMap<String, Vec<String>>) -> Self {
        let mut catalog = Self::builtin();
        for (key, keywords) in overrides {
            match key.parse::<Topic>() {
                Ok(topic) => {
                    tracing::debug!(%topic, count = keywords.len(), "keyword list overridden");
                    catalog.lists.insert(topic, keywords.clone());
                }
                Err(_) => tracing::warn!("ignoring keywords for unknown topic '{key}'"),
            }
        }
        catalog
    }

    /// Keywords of a topic.
    pub fn keywords(&self, topic: Topic) -> &[String] {
        self.lists.get(&topic).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Keywords by topic id, case-insensitive with `-`/`_` interchangeable.
    pub fn lookup(&self, id: &str) -> Option<&[String]> {
        let topic = id.parse::<Topic>().ok()?;
        Some(self.keywords(topic))
    }

    /// Iterate topics with their keyword lists in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (Topic, &[String])> {
        Topic::all().map(move |topic| (topic, self.keywords(topic)))
    }
}
