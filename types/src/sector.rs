//! Wheel sectors and the immutable table they live in.
//!
//! Angles follow one convention everywhere: the wheel rotates by `angle`
//! radians, kept in `[0, TAU)`, and the pointer sits at the top. The sector
//! under the pointer is `floor(n - angle / TAU * n) mod n`, which puts the
//! center of sector `i` at `TAU * (1 - (i + 0.5) / n)`.

use std::f64::consts::TAU;

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::outcome::{OutcomeTag, SpinValue};

/// Point values before specials are inserted, as `(points, count)`.
const BASE_VALUES: [(u32, usize); 8] = [
    (100, 4),
    (200, 3),
    (300, 3),
    (400, 2),
    (500, 2),
    (600, 2),
    (700, 1),
    (800, 1),
];

/// Specials for multiplayer games, in descending insertion position.
const MULTIPLAYER_SPECIALS: [(usize, OutcomeTag); 6] = [
    (17, OutcomeTag::Pass),
    (14, OutcomeTag::Bankrupt),
    (10, OutcomeTag::Pass),
    (7, OutcomeTag::Bankrupt),
    (3, OutcomeTag::Pass),
    (0, OutcomeTag::Bankrupt),
];

/// Specials for a single player. Pass makes no sense without opponents.
const SOLO_SPECIALS: [(usize, OutcomeTag); 2] =
    [(15, OutcomeTag::Bankrupt), (7, OutcomeTag::Bankrupt)];

/// 24-bit sector color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

const BANKRUPT_COLOR: Rgb = Rgb::from_hex(0x00_0000);
const PASS_COLOR: Rgb = Rgb::from_hex(0x19_76d2);

const POINT_PALETTE: [Rgb; 20] = [
    Rgb::from_hex(0xE5_243B),
    Rgb::from_hex(0xDD_A63A),
    Rgb::from_hex(0xC5_192D),
    Rgb::from_hex(0xFF_3A21),
    Rgb::from_hex(0xFC_C30B),
    Rgb::from_hex(0xFD_6925),
    Rgb::from_hex(0xDD_1367),
    Rgb::from_hex(0xFD_9D24),
    Rgb::from_hex(0xBF_8B2E),
    Rgb::from_hex(0x3F_7E44),
    Rgb::from_hex(0x0A_97D9),
    Rgb::from_hex(0x56_C02B),
    Rgb::from_hex(0x00_689D),
    Rgb::from_hex(0x19_486A),
    Rgb::from_hex(0x8E_24AA),
    Rgb::from_hex(0x2E_7D32),
    Rgb::from_hex(0xF5_7C00),
    Rgb::from_hex(0x5D_4037),
    Rgb::from_hex(0x37_474F),
    Rgb::from_hex(0x6A_1B9A),
];

/// One wedge of the wheel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sector {
    index: usize,
    outcome: OutcomeTag,
    label: String,
    color: Rgb,
}

impl Sector {
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn outcome(&self) -> OutcomeTag {
        self.outcome
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn color(&self) -> Rgb {
        self.color
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SectorTableError {
    #[error("a wheel needs at least one sector")]
    Empty,
}

/// Result of mapping a server outcome onto the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorMatch {
    pub index: usize,
    /// `false` when no sector carried the outcome and a random one was chosen.
    pub exact: bool,
}

/// Ordered, immutable sequence of sectors. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorTable {
    sectors: Vec<Sector>,
}

impl SectorTable {
    /// Build the table for a game with `player_count` players.
    ///
    /// Point sectors are shuffled with `rng`; special sectors are inserted at
    /// fixed positions so they stay spread around the rim.
    pub fn build<R: Rng + ?Sized>(player_count: usize, rng: &mut R) -> Self {
        let mut outcomes: Vec<OutcomeTag> = BASE_VALUES
            .iter()
            .flat_map(|&(points, count)| std::iter::repeat_n(OutcomeTag::Numeric(points), count))
            .collect();
        outcomes.shuffle(rng);

        let specials: &[(usize, OutcomeTag)] = if player_count > 1 {
            &MULTIPLAYER_SPECIALS
        } else {
            &SOLO_SPECIALS
        };
        for &(position, tag) in specials {
            let position = position.min(outcomes.len());
            outcomes.insert(position, tag);
        }

        Self::assemble(outcomes)
    }

    /// Build a table from an explicit ordering.
    pub fn from_outcomes(
        outcomes: impl IntoIterator<Item = OutcomeTag>,
    ) -> Result<Self, SectorTableError> {
        let outcomes: Vec<OutcomeTag> = outcomes.into_iter().collect();
        if outcomes.is_empty() {
            return Err(SectorTableError::Empty);
        }
        Ok(Self::assemble(outcomes))
    }

    fn assemble(outcomes: Vec<OutcomeTag>) -> Self {
        let sectors = outcomes
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| Sector {
                index,
                outcome,
                label: outcome.label(),
                color: match outcome {
                    OutcomeTag::Bankrupt => BANKRUPT_COLOR,
                    OutcomeTag::Pass => PASS_COLOR,
                    OutcomeTag::Numeric(_) => POINT_PALETTE[index % POINT_PALETTE.len()],
                },
            })
            .collect();
        Self { sectors }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Sector> {
        self.sectors.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sector> {
        self.sectors.iter()
    }

    /// Angular width of one wedge.
    #[must_use]
    pub fn wedge(&self) -> f64 {
        TAU / self.len() as f64
    }

    /// Index of the sector under the pointer at `angle`.
    #[must_use]
    pub fn index_at(&self, angle: f64) -> usize {
        let n = self.len();
        let turns = normalize_angle(angle) / TAU;
        let raw = (n as f64 - turns * n as f64).floor();
        (raw.max(0.0) as usize) % n
    }

    #[must_use]
    pub fn sector_at(&self, angle: f64) -> &Sector {
        &self.sectors[self.index_at(angle)]
    }

    /// Rotation angle that puts the center of sector `index` under the pointer.
    #[must_use]
    pub fn center_angle(&self, index: usize) -> f64 {
        let n = self.len() as f64;
        normalize_angle(TAU * (1.0 - (index as f64 + 0.5) / n))
    }

    /// Half-open range of rotation angles `(start, end]` for which `index`
    /// sits under the pointer. `end` may equal `TAU` for sector 0.
    #[must_use]
    pub fn wedge_bounds(&self, index: usize) -> (f64, f64) {
        let n = self.len() as f64;
        let start = TAU * (1.0 - (index as f64 + 1.0) / n);
        let end = TAU * (1.0 - index as f64 / n);
        (start, end)
    }

    /// First sector carrying exactly `outcome`.
    #[must_use]
    pub fn position_of(&self, outcome: OutcomeTag) -> Option<usize> {
        self.sectors.iter().position(|s| s.outcome == outcome)
    }

    /// Map a server value to the sector the wheel must land on.
    ///
    /// Unmatched or unrecognized values fall back to a uniformly random
    /// sector and report `exact: false`.
    pub fn resolve<R: Rng + ?Sized>(&self, value: &SpinValue, rng: &mut R) -> SectorMatch {
        if let Some(index) = value.tag().and_then(|tag| self.position_of(tag)) {
            return SectorMatch { index, exact: true };
        }
        SectorMatch {
            index: rng.random_range(0..self.len()),
            exact: false,
        }
    }
}

/// Wrap `angle` into `[0, TAU)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU { 0.0 } else { wrapped }
}
