//! Puzzle identity and its resolution from explicit arguments or the working directory
//!
//! Resolution runs a priority-ordered chain of [`ResolutionStrategy`]s. Each
//! strategy proposes a year and/or a day and never fails; per field, the first
//! strategy with an answer wins. Validation only happens once the chain is
//! exhausted.

use crate::error::{IdentityError, Missing};
use regex::Regex;
use std::fmt;
use std::path::{Component, Path};
use std::str::FromStr;
use std::sync::LazyLock;

/// First year of the event
pub const FIRST_YEAR: u16 = 2015;

/// Highest day number of any event
pub const MAX_DAY: u8 = 25;

static YEAR_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i:y|year|aoc)?[-_]?(\d{4})$").unwrap());

static DAY_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i:d|day)?[-_]?(\d{1,2})$").unwrap());

/// A `(year, day)` pair naming a single puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PuzzleIdentity {
    year: u16,
    day: u8,
}

impl PuzzleIdentity {
    /// Create an identity, checking `year >= 2015` and `day` in 1..=25
    pub fn new(year: u16, day: u8) -> Result<Self, IdentityError> {
        if year < FIRST_YEAR {
            return Err(IdentityError::YearOutOfRange(year));
        }
        if !(1..=MAX_DAY).contains(&day) {
            return Err(IdentityError::DayOutOfRange(day));
        }
        Ok(Self { year, day })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn day(&self) -> u8 {
        self.day
    }
}

impl fmt::Display for PuzzleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02}", self.year, self.day)
    }
}

/// A requested day: a concrete number or the most recently released one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySpec {
    Number(u8),
    Latest,
}

impl FromStr for DaySpec {
    type Err = IdentityError;

    /// Parse `latest` (any case) or a negative number as [`DaySpec::Latest`],
    /// anything else as a day number. Range checks happen at resolution.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("latest") {
            return Ok(DaySpec::Latest);
        }
        match s.parse::<i64>() {
            Ok(n) if n < 0 => Ok(DaySpec::Latest),
            Ok(n) => u8::try_from(n)
                .map(DaySpec::Number)
                .map_err(|_| IdentityError::InvalidDay(s.to_string())),
            Err(_) => Err(IdentityError::InvalidDay(s.to_string())),
        }
    }
}

impl From<u8> for DaySpec {
    fn from(day: u8) -> Self {
        DaySpec::Number(day)
    }
}

/// Outcome of identity resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A concrete puzzle
    Exact(PuzzleIdentity),
    /// The most recently released day; `year: None` means the current event
    Latest { year: Option<u16> },
}

/// Partial answer proposed by a strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Candidate {
    pub year: Option<u16>,
    pub day: Option<DaySpec>,
}

/// One link of the resolution chain
pub trait ResolutionStrategy {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Propose whatever this strategy knows about the puzzle; never fails
    fn candidate(&self, cwd: &Path) -> Candidate;
}

/// Values given on the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitArgs {
    pub year: Option<u16>,
    pub day: Option<DaySpec>,
}

impl ResolutionStrategy for ExplicitArgs {
    fn name(&self) -> &'static str {
        "explicit"
    }

    fn candidate(&self, _cwd: &Path) -> Candidate {
        Candidate {
            year: self.year,
            day: self.day,
        }
    }
}

/// Infers year and day from directory names such as `2024/d06`
///
/// Segments are scanned from the innermost directory outwards and the nearest
/// match wins. Once a year directory is found, only directories nested inside
/// it can name the day.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathSegments;

impl PathSegments {
    fn year_of(segment: &str) -> Option<u16> {
        let captures = YEAR_SEGMENT.captures(segment)?;
        let year = captures.get(1)?.as_str().parse::<u16>().ok()?;
        (year >= FIRST_YEAR).then_some(year)
    }

    fn day_of(segment: &str) -> Option<u8> {
        let captures = DAY_SEGMENT.captures(segment)?;
        let day = captures.get(1)?.as_str().parse::<u8>().ok()?;
        (1..=MAX_DAY).contains(&day).then_some(day)
    }
}

impl ResolutionStrategy for PathSegments {
    fn name(&self) -> &'static str {
        "path"
    }

    fn candidate(&self, cwd: &Path) -> Candidate {
        let segments: Vec<&str> = cwd
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect();

        let year = segments
            .iter()
            .enumerate()
            .rev()
            .find_map(|(idx, s)| Self::year_of(s).map(|year| (idx, year)));

        let day_scope = match year {
            Some((idx, _)) => &segments[idx + 1..],
            None => &segments[..],
        };
        let day = day_scope.iter().rev().find_map(|s| Self::day_of(s));

        Candidate {
            year: year.map(|(_, year)| year),
            day: day.map(DaySpec::Number),
        }
    }
}

/// Priority-ordered chain of resolution strategies
pub struct IdentityResolver {
    strategies: Vec<Box<dyn ResolutionStrategy>>,
}

impl IdentityResolver {
    /// Create a resolver with an empty chain
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// The default chain: explicit arguments, then the directory layout
    pub fn standard(year: Option<u16>, day: Option<DaySpec>) -> Self {
        Self::new()
            .with_strategy(ExplicitArgs { year, day })
            .with_strategy(PathSegments)
    }

    /// Append a strategy with lower priority than the ones already present
    pub fn with_strategy(mut self, strategy: impl ResolutionStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Run the chain against `cwd`
    pub fn resolve(&self, cwd: &Path) -> Result<Resolution, IdentityError> {
        let mut found = Candidate::default();
        for strategy in &self.strategies {
            if found.year.is_some() && found.day.is_some() {
                break;
            }
            let candidate = strategy.candidate(cwd);
            tracing::trace!(strategy = strategy.name(), ?candidate, "resolution candidate");
            found.year = found.year.or(candidate.year);
            found.day = found.day.or(candidate.day);
        }

        match (found.year, found.day) {
            (year, Some(DaySpec::Latest)) => {
                if let Some(year) = year
                    && year < FIRST_YEAR
                {
                    return Err(IdentityError::YearOutOfRange(year));
                }
                Ok(Resolution::Latest { year })
            }
            (Some(year), Some(DaySpec::Number(day))) => {
                PuzzleIdentity::new(year, day).map(Resolution::Exact)
            }
            (None, Some(_)) => Err(IdentityError::Unresolved {
                missing: Missing::Year,
            }),
            (Some(_), None) => Err(IdentityError::Unresolved {
                missing: Missing::Day,
            }),
            (None, None) => Err(IdentityError::Unresolved {
                missing: Missing::YearAndDay,
            }),
        }
    }
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a puzzle from optional explicit values and the working directory
pub fn resolve(
    explicit_year: Option<u16>,
    explicit_day: Option<DaySpec>,
    cwd: &Path,
) -> Result<Resolution, IdentityError> {
    IdentityResolver::standard(explicit_year, explicit_day).resolve(cwd)
}
