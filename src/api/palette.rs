use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::render::Color;

/// Chooses series colours from the configured palette.
///
/// Random picks repeat freely. Sequential picks cycle through the palette in
/// order across batches.
#[derive(Debug)]
pub struct PalettePicker {
    colors: Vec<Color>,
    mode: PickMode,
}

#[derive(Debug)]
enum PickMode {
    Random(StdRng),
    Sequential { next: usize },
}

impl PalettePicker {
    #[must_use]
    pub fn random(colors: Vec<Color>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            colors,
            mode: PickMode::Random(rng),
        }
    }

    #[must_use]
    pub fn sequential(colors: Vec<Color>) -> Self {
        Self {
            colors,
            mode: PickMode::Sequential { next: 0 },
        }
    }

    /// Returns `None` only for an empty palette.
    pub fn next_color(&mut self) -> Option<Color> {
        if self.colors.is_empty() {
            return None;
        }
        let index = match &mut self.mode {
            PickMode::Random(rng) => rng.gen_range(0..self.colors.len()),
            PickMode::Sequential { next } => {
                let index = *next % self.colors.len();
                *next = next.wrapping_add(1);
                index
            }
        };
        self.colors.get(index).copied()
    }

    /// Restarts sequential picking at the first palette entry.
    pub fn reset(&mut self) {
        if let PickMode::Sequential { next } = &mut self.mode {
            *next = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PalettePicker;
    use crate::render::Color;

    fn palette() -> Vec<Color> {
        vec![
            Color::rgb(1.0, 0.0, 0.0),
            Color::rgb(0.0, 1.0, 0.0),
            Color::rgb(0.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn sequential_picks_wrap_around() {
        let mut picker = PalettePicker::sequential(palette());
        let picks: Vec<_> = (0..4).filter_map(|_| picker.next_color()).collect();
        assert_eq!(picks[0], picks[3]);
        assert_ne!(picks[0], picks[1]);
        picker.reset();
        assert_eq!(picker.next_color(), Some(palette()[0]));
    }

    #[test]
    fn seeded_random_picks_are_reproducible() {
        let mut a = PalettePicker::random(palette(), Some(7));
        let mut b = PalettePicker::random(palette(), Some(7));
        for _ in 0..10 {
            let color = a.next_color();
            assert!(color.is_some_and(|c| palette().contains(&c)));
            assert_eq!(color, b.next_color());
        }
    }

    #[test]
    fn empty_palette_yields_nothing() {
        let mut picker = PalettePicker::sequential(Vec::new());
        assert_eq!(picker.next_color(), None);
    }
}
