use crate::*;
pub use random::*;

mod random;

pub trait MineLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout>;
}
