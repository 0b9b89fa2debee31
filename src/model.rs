use std::collections::BTreeMap;
use std::fmt;

use crate::error::{EngineError, ParseError};

pub type ColorId = usize;

pub const COLOR_NAMES: [&str; 20] = [
    "red", "blue", "green", "yellow", "purple", "orange",
    "pink", "cyan", "lime", "brown", "gray", "navy",
    "maroon", "olive", "teal", "silver", "gold", "indigo",
    "coral", "salmon",
];

/// A single unit of colored liquid. Owned by exactly one container at a time.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct LiquidUnit {
    color_id: ColorId,
}
impl LiquidUnit {
    pub fn new(color_id: ColorId) -> Self {
        LiquidUnit { color_id }
    }

    /// Parse a letter label. `None` for anything that isn't a pure A-Z sequence.
    pub fn from_repr(repr: &str) -> Option<Self> {
        Self::letters_to_color_id(repr.trim()).map(Self::new)
    }

    /// Value of one letter in a label, 0 for `A`.
    fn letter_value(ch: char) -> Option<usize> {
        ch.is_ascii_alphabetic()
            .then(|| (ch.to_ascii_uppercase() as u8 - b'A') as usize)
    }

    /// Labels count like spreadsheet columns: `Z` is followed by `AA`.
    fn letters_to_color_id(s: &str) -> Option<ColorId> {
        if s.is_empty() {
            return None;
        }
        s.chars()
            .try_fold(0usize, |acc, ch| {
                acc.checked_mul(26)?.checked_add(Self::letter_value(ch)? + 1)
            })?
            .checked_sub(1)
    }

    pub fn color(&self) -> ColorId {
        self.color_id
    }

    pub fn get_letter_representation(&self) -> String {
        let mut chars = Vec::new();
        let mut id = self.color_id + 1;
        while id > 0 {
            let rem = (id - 1) % 26;
            chars.push((b'A' + rem as u8) as char);
            id = (id - 1) / 26;
        }
        chars.iter().rev().collect()
    }

    pub fn get_color_name(&self) -> &'static str {
        COLOR_NAMES[self.color_id % COLOR_NAMES.len()]
    }
}
impl fmt::Display for LiquidUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.get_color_name())
    }
}

/// A fixed-capacity stack of liquid, bottom first.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Container {
    units: Vec<LiquidUnit>,
    capacity: usize,
}
impl Container {
    /// An empty container. `capacity` is expected to be positive: a zero
    /// capacity container is permanently full and never takes part in a pour.
    /// Use [`Container::with_units`] to have it rejected instead.
    pub fn new(capacity: usize) -> Self {
        Self {
            units: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn with_units(capacity: usize, units: Vec<LiquidUnit>) -> Result<Self, EngineError> {
        if capacity == 0 {
            return Err(EngineError::InvalidArgument(
                "container capacity must be positive".into(),
            ));
        }
        if units.len() > capacity {
            return Err(EngineError::InvalidArgument(format!(
                "{} units do not fit in a container of capacity {}",
                units.len(),
                capacity
            )));
        }
        Ok(Self { units, capacity })
    }

    /// Build from colors listed bottom to top.
    pub fn from_colors(capacity: usize, colors: &[ColorId]) -> Result<Self, EngineError> {
        Self::with_units(capacity, colors.iter().map(|&c| LiquidUnit::new(c)).collect())
    }

    /// Parse slots bottom to top. Slots are comma separated when any label is
    /// longer than one letter; `.` marks an empty slot.
    pub fn new_from_repr(repr: &str, index: usize) -> Result<Self, ParseError> {
        let repr = repr.trim();
        let tokens: Vec<String> = if repr.contains(',') {
            repr.split(',').map(|t| t.trim().to_string()).collect()
        } else {
            repr.chars().map(|ch| ch.to_string()).collect()
        };
        if tokens.is_empty() {
            return Err(ParseError::NoSlots { container: index });
        }

        let mut units = Vec::new();
        let mut seen_empty = false;
        for token in &tokens {
            if token.is_empty() || token == "." {
                seen_empty = true;
                continue;
            }
            let unit = LiquidUnit::from_repr(token).ok_or_else(|| ParseError::UnknownToken {
                container: index,
                token: token.clone(),
            })?;
            if seen_empty {
                return Err(ParseError::Gap { container: index });
            }
            units.push(unit);
        }
        Ok(Self {
            units,
            capacity: tokens.len(),
        })
    }

    pub fn add_liquid(&mut self, unit: LiquidUnit) -> bool {
        if self.is_full() {
            return false;
        }
        self.units.push(unit);
        true
    }

    pub fn remove_liquid(&mut self) -> Option<LiquidUnit> {
        self.units.pop()
    }

    /// Pops `count` units off the top, returned in their original bottom-to-top
    /// order. Removes nothing if `count` exceeds the fill level.
    pub fn remove_consecutive_top(&mut self, count: usize) -> Vec<LiquidUnit> {
        if count > self.units.len() {
            return Vec::new();
        }
        let at = self.units.len() - count;
        self.units.split_off(at)
    }

    /// The maximal same-color run at the top of the stack, bottom to top.
    pub fn top_run(&self) -> &[LiquidUnit] {
        let depth = Self::run_length(&self.units);
        &self.units[self.units.len() - depth..]
    }

    /// Color and run length of whatever is exposed once `count` units are
    /// taken off the top. `None` if that leaves the container empty.
    pub fn exposed_run_after(&self, count: usize) -> Option<(ColorId, usize)> {
        let remaining = self.units.len().checked_sub(count)?;
        let rest = &self.units[..remaining];
        let top = rest.last()?;
        Some((top.color(), Self::run_length(rest)))
    }

    fn run_length(units: &[LiquidUnit]) -> usize {
        let Some(top) = units.last() else {
            return 0;
        };
        units
            .iter()
            .rev()
            .take_while(|u| u.color() == top.color())
            .count()
    }

    pub fn can_pour_into(&self, target: &Container) -> bool {
        if self.is_empty() || target.is_full() {
            return false;
        }
        match (self.get_top_unit(), target.get_top_unit()) {
            (_, None) => true,
            (Some(from), Some(to)) => from.color() == to.color(),
            (None, Some(_)) => false,
        }
    }

    pub fn is_single_color_full(&self) -> bool {
        self.is_full() && self.is_sorted()
    }

    /// Empty, or holding a single color.
    pub fn is_sorted(&self) -> bool {
        match self.units.first() {
            None => true,
            Some(first) => self.units.iter().all(|u| u.color() == first.color()),
        }
    }

    pub fn available_space(&self) -> usize {
        self.capacity - self.units.len()
    }

    pub fn is_full(&self) -> bool {
        self.units.len() >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn get_capacity(&self) -> usize {
        self.capacity
    }

    pub fn get_top_unit(&self) -> Option<&LiquidUnit> {
        self.units.last()
    }

    pub fn get_units(&self) -> &[LiquidUnit] {
        &self.units
    }

    pub fn get_text_representation(&self) -> String {
        let mut repr: Vec<String> = self
            .units
            .iter()
            .map(LiquidUnit::get_letter_representation)
            .collect();
        repr.extend(std::iter::repeat_n(".".to_string(), self.available_space()));
        let has_multi_char = repr.iter().any(|s| s.len() > 1);
        let separator = if has_multi_char { "," } else { "" };
        repr.join(separator)
    }
}
impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get_text_representation())
    }
}

/// One candidate pour. Indices refer to the container slice it was computed from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: usize,
    pub to: usize,
    pub quantity: usize,
    pub color: ColorId,
}
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({} x {})",
            self.from,
            self.to,
            self.quantity,
            LiquidUnit::new(self.color).get_letter_representation()
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    Playing,
    Won,
    Stuck,
}
impl GameOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::Playing)
    }
}
impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameOutcome::Playing => "playing",
            GameOutcome::Won => "won",
            GameOutcome::Stuck => "stuck",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct GameState {
    pub containers: Vec<Container>,
}
impl GameState {
    pub fn new(containers: Vec<Container>) -> Self {
        Self { containers }
    }

    /// One container per line; blank lines are skipped.
    pub fn new_from_repr(repr: &str) -> Result<Self, ParseError> {
        let containers = repr
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(index, line)| Container::new_from_repr(line, index))
            .collect::<Result<Vec<_>, _>>()?;
        if containers.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(Self { containers })
    }

    pub fn get_text_representation(&self) -> String {
        self.containers
            .iter()
            .map(Container::get_text_representation)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// How many units of each color are on the board.
    pub fn color_counts(&self) -> BTreeMap<ColorId, usize> {
        let mut counts = BTreeMap::new();
        for unit in self.containers.iter().flat_map(|c| c.get_units()) {
            *counts.entry(unit.color()).or_insert(0) += 1;
        }
        counts
    }
}
impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get_text_representation())
    }
}
