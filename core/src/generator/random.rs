use ndarray::Array2;

use super::*;

/// Uniform placement by rejection sampling: draw any cell, redraw when it already holds a mine.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineLayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        use rand::prelude::*;

        let config = config.validate()?;
        let grid = config.grid();
        let total_cells = grid.total_cells();

        let mut mine_mask: Array2<bool> = Array2::default(grid.shape());
        let mut mines_placed: CellCount = 0;
        let mut draws: u64 = 0;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        while mines_placed < config.mines {
            let index: CellIndex = rng.random_range(0..total_cells);
            draws += 1;

            let cell = &mut mine_mask[grid.coords_of(index).to_nd_index()];
            if *cell {
                continue;
            }
            *cell = true;
            mines_placed += 1;
        }

        log::debug!(
            "Placed {} mines on a {}x{} board with {} draws (seed {})",
            mines_placed,
            config.dimension,
            config.dimension,
            draws,
            self.seed
        );

        Ok(MineLayout::from_validated_mask(grid, mine_mask, mines_placed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_exactly_the_requested_number_of_distinct_mines() {
        for (dimension, mines) in [(1, 0), (2, 3), (3, 1), (9, 10), (9, 80), (16, 40)] {
            let layout = RandomLayoutGenerator::new(7)
                .generate(GameConfig::new(dimension, mines))
                .unwrap();

            assert_eq!(layout.mine_count(), mines);
            assert_eq!(layout.iter_mines().count(), usize::from(mines));
        }
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let config = GameConfig::new(9, 10);

        let first = RandomLayoutGenerator::new(42).generate(config).unwrap();
        let second = RandomLayoutGenerator::new(42).generate(config).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn rejects_full_boards() {
        let result = RandomLayoutGenerator::new(1).generate(GameConfig::new(3, 9));

        assert_eq!(
            result,
            Err(GameError::InvalidConfiguration {
                dimension: 3,
                mines: 9
            })
        );
    }

    #[test]
    fn every_cell_can_receive_a_mine() {
        let config = GameConfig::new(3, 1);
        let mut seen = [false; 9];

        for seed in 0..500 {
            let layout = RandomLayoutGenerator::new(seed).generate(config).unwrap();
            for index in layout.iter_mines() {
                seen[usize::from(index)] = true;
            }
        }

        assert!(seen.iter().all(|&hit| hit));
    }
}
