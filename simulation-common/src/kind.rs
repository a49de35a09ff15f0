use serde::{Deserialize, Serialize};
use std::fmt;

/// The three token categories. Discriminant order is also the order of the
/// angular sectors used for initial placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Rock,
    Scissors,
    Paper,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Rock, Kind::Scissors, Kind::Paper];

    pub fn index(self) -> usize {
        match self {
            Kind::Rock => 0,
            Kind::Scissors => 1,
            Kind::Paper => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Kind> {
        Kind::ALL.get(index).copied()
    }

    /// The kind this one loses to on collision.
    ///
    /// Rock loses to Paper, Scissors to Rock and Paper to Scissors.
    pub fn weakness(self) -> Kind {
        match self {
            Kind::Rock => Kind::Paper,
            Kind::Scissors => Kind::Rock,
            Kind::Paper => Kind::Scissors,
        }
    }

    /// True if `other` is converted to `self` when the two collide.
    pub fn defeats(self, other: Kind) -> bool {
        other.weakness() == self
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Rock => "rock",
            Kind::Scissors => "scissors",
            Kind::Paper => "paper",
        }
    }

    /// Fill color (RGBA) used when drawing a token of this kind.
    pub fn color(self) -> [u8; 4] {
        match self {
            Kind::Rock => [0, 0, 0, 255],
            Kind::Scissors => [255, 0, 0, 255],
            Kind::Paper => [255, 255, 255, 255],
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of tokens of each kind at some point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    pub rock: u32,
    pub scissors: u32,
    pub paper: u32,
}

impl KindCounts {
    pub fn get(&self, kind: Kind) -> u32 {
        match kind {
            Kind::Rock => self.rock,
            Kind::Scissors => self.scissors,
            Kind::Paper => self.paper,
        }
    }

    pub fn increment(&mut self, kind: Kind) {
        match kind {
            Kind::Rock => self.rock += 1,
            Kind::Scissors => self.scissors += 1,
            Kind::Paper => self.paper += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.rock + self.scissors + self.paper
    }

    /// The only kind still present, if every token shares one kind.
    pub fn sole_survivor(&self) -> Option<Kind> {
        let mut present = Kind::ALL.into_iter().filter(|&kind| self.get(kind) > 0);
        match (present.next(), present.next()) {
            (Some(kind), None) => Some(kind),
            _ => None,
        }
    }
}

impl FromIterator<Kind> for KindCounts {
    fn from_iter<I: IntoIterator<Item = Kind>>(iter: I) -> Self {
        let mut counts = KindCounts::default();
        for kind in iter {
            counts.increment(kind);
        }
        counts
    }
}

impl fmt::Display for KindCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rock={} scissors={} paper={}", self.rock, self.scissors, self.paper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weakness_forms_a_three_cycle() {
        for kind in Kind::ALL {
            assert_ne!(kind.weakness(), kind);
            assert_eq!(kind.weakness().weakness().weakness(), kind);
        }
    }

    #[test]
    fn weakness_is_a_permutation() {
        let mut seen: Vec<Kind> = Kind::ALL.iter().map(|k| k.weakness()).collect();
        seen.sort_by_key(|k| k.index());
        assert_eq!(seen, Kind::ALL.to_vec());
    }

    #[test]
    fn dominance_matches_the_game() {
        assert!(Kind::Rock.defeats(Kind::Scissors));
        assert!(Kind::Scissors.defeats(Kind::Paper));
        assert!(Kind::Paper.defeats(Kind::Rock));
        assert!(!Kind::Rock.defeats(Kind::Paper));
        assert!(!Kind::Rock.defeats(Kind::Rock));
    }

    #[test]
    fn index_round_trips() {
        for kind in Kind::ALL {
            assert_eq!(Kind::from_index(kind.index()), Some(kind));
        }
        assert_eq!(Kind::from_index(3), None);
    }

    #[test]
    fn counts_report_sole_survivor() {
        let counts: KindCounts = [Kind::Paper, Kind::Paper].into_iter().collect();
        assert_eq!(counts.total(), 2);
        assert_eq!(counts.sole_survivor(), Some(Kind::Paper));

        let mixed: KindCounts = [Kind::Paper, Kind::Rock].into_iter().collect();
        assert_eq!(mixed.sole_survivor(), None);
        assert_eq!(KindCounts::default().sole_survivor(), None);
    }
}
