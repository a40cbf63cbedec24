//! Diagram kind detection
//!
//! A keyword sniff over the raw source, not a parse. The first matching
//! rule wins, so a class diagram that mentions `actor` reports as a
//! sequence diagram.

use std::fmt;

/// Kind of PlantUML diagram a source most likely describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramKind {
    Sequence,
    UseCase,
    Class,
    Activity,
    Component,
    Unknown,
}

/// Detection rules, checked top to bottom
const DETECTION_RULES: &[(&[&str], DiagramKind)] = &[
    (&["sequence", "actor", "participant"], DiagramKind::Sequence),
    (&["usecase"], DiagramKind::UseCase),
    (&["class"], DiagramKind::Class),
    (&["activity"], DiagramKind::Activity),
    (&["component"], DiagramKind::Component),
];

impl DiagramKind {
    /// Detect the diagram kind from source text
    #[must_use]
    pub fn detect(source: &str) -> Self {
        DETECTION_RULES
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| source.contains(n)))
            .map_or(DiagramKind::Unknown, |(_, kind)| *kind)
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagramKind::Sequence => "sequence",
            DiagramKind::UseCase => "usecase",
            DiagramKind::Class => "class",
            DiagramKind::Activity => "activity",
            DiagramKind::Component => "component",
            DiagramKind::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}
