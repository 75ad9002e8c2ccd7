//! Birth/survival rules in compact notation

use crate::error::{GridError, GridResult};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Largest neighbor count under the Moore neighborhood
pub const MAX_NEIGHBOR_COUNT: u8 = 8;

/// Named rules, written as `survival/birth` digits
pub const RULE_PRESETS: &[(&str, &str)] = &[
    ("Game of Life", "23/3"),
    ("HighLife", "23/36"),
    ("Day & Night", "34678/3678"),
    ("Seeds", "/2"),
    ("Maze", "12345/3"),
    ("Mazectric", "1234/3"),
    ("Coral", "45678/3"),
    ("Walled Cities", "2345/45678"),
    ("Life without Death", "012345678/3"),
    ("Replicator", "1357/1357"),
    ("Diamoeba", "5678/35678"),
    ("2x2", "125/36"),
    ("Move", "245/368"),
    ("Assimilation", "4567/345"),
    ("Amoeba", "1358/357"),
    ("Serviettes", "/234"),
    ("Gnarl", "1/1"),
    ("Long Life", "5/345"),
    ("Stains", "235678/3678"),
    ("Coagulations", "235678/378"),
    ("Vote", "45678/5678"),
    ("Vote 4/5", "35678/4678"),
];

/// Look up a preset's rule string by name, ignoring case
pub fn preset(name: &str) -> Option<&'static str> {
    let name = name.trim();
    RULE_PRESETS
        .iter()
        .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
        .map(|&(_, rule)| rule)
}

/// How neighbor slots falling outside the grid are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Off-grid slots count as walls
    #[default]
    Wall,
    /// Off-grid slots are not counted
    Absent,
}

/// Parsed birth/survival rule. `Wall` is the live state: a wall survives on
/// a survival count and a floor cell turns to wall on a birth count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AutomatonRule {
    survival: BTreeSet<u8>,
    birth: BTreeSet<u8>,
}

impl AutomatonRule {
    pub fn new<S, B>(survival: S, birth: B) -> GridResult<Self>
    where
        S: IntoIterator<Item = u8>,
        B: IntoIterator<Item = u8>,
    {
        let survival: BTreeSet<u8> = survival.into_iter().collect();
        let birth: BTreeSet<u8> = birth.into_iter().collect();
        if let Some(count) = survival.iter().chain(&birth).find(|&&count| count > MAX_NEIGHBOR_COUNT) {
            return Err(GridError::invalid_rule(
                &format!("{}/{}", survival.iter().join(""), birth.iter().join("")),
                format!("neighbor count {} exceeds {}", count, MAX_NEIGHBOR_COUNT),
            ));
        }
        Ok(Self { survival, birth })
    }

    /// Parse rule notation, or a preset name
    pub fn parse(input: &str) -> GridResult<Self> {
        if let Some(rule) = preset(input) {
            return parse_notation(rule);
        }
        parse_notation(input)
    }

    pub fn survival(&self) -> &BTreeSet<u8> {
        &self.survival
    }

    pub fn birth(&self) -> &BTreeSet<u8> {
        &self.birth
    }

    pub fn survives(&self, wall_neighbors: u8) -> bool {
        self.survival.contains(&wall_neighbors)
    }

    pub fn births(&self, wall_neighbors: u8) -> bool {
        self.birth.contains(&wall_neighbors)
    }

    /// Canonical `survival/birth` digit notation
    pub fn notation(&self) -> String {
        format!("{}/{}", self.survival.iter().join(""), self.birth.iter().join(""))
    }

    /// Name of the preset this rule matches, if any
    pub fn preset_name(&self) -> Option<&'static str> {
        RULE_PRESETS
            .iter()
            .find(|(_, rule)| parse_notation(rule).as_ref() == Ok(self))
            .map(|&(name, _)| name)
    }
}

fn parse_digits(rule: &str, digits: &str) -> GridResult<BTreeSet<u8>> {
    digits
        .chars()
        .map(|ch| match ch.to_digit(10) {
            Some(digit) if digit <= MAX_NEIGHBOR_COUNT as u32 => Ok(digit as u8),
            Some(digit) => Err(GridError::invalid_rule(
                rule,
                format!("neighbor count {} exceeds {}", digit, MAX_NEIGHBOR_COUNT),
            )),
            None => Err(GridError::invalid_rule(rule, format!("unexpected character '{}'", ch))),
        })
        .collect()
}

fn parse_notation(input: &str) -> GridResult<AutomatonRule> {
    let rule = input.trim();
    if rule.is_empty() {
        return Err(GridError::invalid_rule(input, "empty rule"));
    }

    if rule.chars().any(|ch| matches!(ch, 'S' | 's' | 'B' | 'b')) {
        return parse_marked(rule);
    }

    let (survival, birth) = rule
        .split_once('/')
        .ok_or_else(|| GridError::invalid_rule(rule, "expected '<survival>/<birth>'"))?;
    if birth.contains('/') {
        return Err(GridError::invalid_rule(rule, "more than one '/'"));
    }
    Ok(AutomatonRule {
        survival: parse_digits(rule, survival)?,
        birth: parse_digits(rule, birth)?,
    })
}

/// `S<digits>/B<digits>` or `B<digits>/S<digits>`, the slash optional.
/// Without any digits the slash is required, so bare markers like `"bs"`
/// are rejected.
fn parse_marked(rule: &str) -> GridResult<AutomatonRule> {
    let mut survival: Option<BTreeSet<u8>> = None;
    let mut birth: Option<BTreeSet<u8>> = None;
    let mut slashed = false;
    let mut rest = rule;

    while !rest.is_empty() {
        let mut chars = rest.chars();
        let marker = chars.next().map(|ch| ch.to_ascii_uppercase());
        let body = chars.as_str();
        let end = body.find(|ch: char| !ch.is_ascii_digit()).unwrap_or(body.len());
        let digits = parse_digits(rule, &body[..end])?;

        let slot = match marker {
            Some('S') => &mut survival,
            Some('B') => &mut birth,
            _ => {
                return Err(GridError::invalid_rule(
                    rule,
                    "every section must start with 'S' or 'B'",
                ))
            }
        };
        if slot.is_some() {
            return Err(GridError::invalid_rule(rule, "section given twice"));
        }
        *slot = Some(digits);

        rest = &body[end..];
        if let Some(stripped) = rest.strip_prefix('/') {
            if stripped.is_empty() {
                return Err(GridError::invalid_rule(rule, "trailing '/'"));
            }
            rest = stripped;
            slashed = true;
        }
    }

    let rule_sets = AutomatonRule {
        survival: survival.unwrap_or_default(),
        birth: birth.unwrap_or_default(),
    };
    if !slashed && rule_sets.survival.is_empty() && rule_sets.birth.is_empty() {
        return Err(GridError::invalid_rule(rule, "markers without digits need a '/'"));
    }
    Ok(rule_sets)
}

impl FromStr for AutomatonRule {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AutomatonRule {
    type Error = GridError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AutomatonRule> for String {
    fn from(rule: AutomatonRule) -> Self {
        rule.notation()
    }
}

impl fmt::Display for AutomatonRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(digits: &[u8]) -> BTreeSet<u8> {
        digits.iter().copied().collect()
    }

    #[test]
    fn test_plain_notation() {
        let rule = AutomatonRule::parse("23/2").unwrap();
        assert_eq!(rule.survival(), &set(&[2, 3]));
        assert_eq!(rule.birth(), &set(&[2]));
        assert!(rule.survives(3));
        assert!(!rule.births(3));
    }

    #[test]
    fn test_marker_order_does_not_matter() {
        let plain = AutomatonRule::parse("23/2").unwrap();
        assert_eq!(AutomatonRule::parse("S23/B2").unwrap(), plain);
        assert_eq!(AutomatonRule::parse("B2/S23").unwrap(), plain);
        assert_eq!(AutomatonRule::parse("b2s23").unwrap(), plain);
        assert_eq!(AutomatonRule::parse("S23B2").unwrap(), plain);
    }

    #[test]
    fn test_empty_halves_and_duplicates() {
        let seeds = AutomatonRule::parse("/2").unwrap();
        assert!(seeds.survival().is_empty());
        assert_eq!(seeds.birth(), &set(&[2]));

        let never = AutomatonRule::parse("/").unwrap();
        assert!(never.survival().is_empty() && never.birth().is_empty());

        assert_eq!(AutomatonRule::parse("3323/3").unwrap().survival(), &set(&[2, 3]));
        assert!(AutomatonRule::parse("B3").unwrap().survival().is_empty());
        assert!(AutomatonRule::parse("B/S").unwrap().birth().is_empty());
    }

    #[test]
    fn test_bare_markers_are_rejected() {
        for input in ["bs", "S", "B", "sB"] {
            assert!(
                matches!(AutomatonRule::parse(input), Err(GridError::InvalidRule { .. })),
                "{:?} should be rejected",
                input
            );
        }
        assert_eq!(AutomatonRule::parse("S/B").unwrap(), AutomatonRule::parse("/").unwrap());
    }

    #[test]
    fn test_invalid_rules() {
        for input in ["9/2", "2-3/2", "", "23", "23/3/1", "S23/S2", "23/B3", "X1/B2", "S23/", "S2 3/B3"] {
            assert!(
                matches!(AutomatonRule::parse(input), Err(GridError::InvalidRule { .. })),
                "{:?} should be rejected",
                input
            );
        }
        assert!(AutomatonRule::new([2, 3], [9]).is_err());
    }

    #[test]
    fn test_presets() {
        let life = AutomatonRule::parse("game of life").unwrap();
        assert_eq!(life.notation(), "23/3");
        assert_eq!(life.preset_name(), Some("Game of Life"));
        assert_eq!(preset("SEEDS"), Some("/2"));
        assert!(preset("Nope").is_none());
        for (name, rule) in RULE_PRESETS {
            assert!(AutomatonRule::parse(rule).is_ok(), "preset {} is malformed", name);
        }
    }

    #[test]
    fn test_serde_as_notation() {
        let rule = AutomatonRule::parse("B3/S23").unwrap();
        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(json, "\"23/3\"");
        let back: AutomatonRule = serde_json::from_str("\"Maze\"").unwrap();
        assert_eq!(back.notation(), "12345/3");
        assert!(serde_json::from_str::<AutomatonRule>("\"9/9\"").is_err());
    }
}
