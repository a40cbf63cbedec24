//! Block keyword rules for PlantUML sources
//!
//! Classification is by leading (or trailing) text only. The rules are not
//! symmetric: `split` and `partition` open blocks that are closed by the
//! generic `end`/`}`/`]` prefixes, and no attempt is made to pair them up.

/// Effect a keyword rule has on the indent level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Decrement before printing the line
    Close,
    /// Increment after printing the line
    Open,
    /// Second increment after printing (else branches)
    Reopen,
}

/// Prefix rules, checked in order; every matching rule applies its effect
pub const PREFIX_RULES: &[(&str, Effect)] = &[
    ("endif", Effect::Close),
    ("end", Effect::Close),
    ("}", Effect::Close),
    ("]", Effect::Close),
    ("else", Effect::Close),
    ("elseif", Effect::Close),
    ("fork again", Effect::Close),
    ("end fork", Effect::Close),
    ("end while", Effect::Close),
    ("end loop", Effect::Close),
    ("repeat while", Effect::Close),
    ("if", Effect::Open),
    ("fork", Effect::Open),
    ("loop", Effect::Open),
    ("while", Effect::Open),
    ("split", Effect::Open),
    ("partition", Effect::Open),
    ("repeat", Effect::Open),
    ("else", Effect::Reopen),
    ("elseif", Effect::Reopen),
];

/// Trailing text that opens a bracketed block
pub const OPENER_SUFFIXES: &[&str] = &["{", "["];

/// Longer spellings that cancel a shorter prefix rule: `repeat` opens a
/// loop, `repeat while` closes it
const PREFIX_EXCEPTIONS: &[(&str, &str)] = &[("repeat", "repeat while")];

/// Classification of one trimmed source line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineClass {
    pub closes: bool,
    pub opens: bool,
    pub reopens: bool,
}

impl LineClass {
    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Close => self.closes = true,
            Effect::Open => self.opens = true,
            Effect::Reopen => self.reopens = true,
        }
    }
}

fn is_excepted(prefix: &str, text: &str) -> bool {
    PREFIX_EXCEPTIONS
        .iter()
        .any(|(short, long)| *short == prefix && text.starts_with(long))
}

/// Classify a trimmed line against the keyword rules
#[must_use]
pub fn classify(text: &str) -> LineClass {
    let mut class = LineClass::default();

    for (prefix, effect) in PREFIX_RULES {
        if text.starts_with(prefix) && !is_excepted(prefix, text) {
            class.apply(*effect);
        }
    }

    if OPENER_SUFFIXES.iter().any(|s| text.ends_with(s)) {
        class.apply(Effect::Open);
    }

    class
}
