use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of gains in a control policy.
pub const GENE_COUNT: usize = 4;

/// Genome representation for the cart-pole controller
///
/// A genome is a linear control policy made of four integer gains, applied
/// to the cart-pole state at every simulation step:
/// - `genes[0]`: cart position gain
/// - `genes[1]`: cart velocity gain
/// - `genes[2]`: pole angle gain
/// - `genes[3]`: pole angular velocity gain
///
/// The controller only looks at the sign of the weighted sum, so the absolute
/// scale of a genome does not matter, only the ratios between its gains.
///
/// # Crossover blocks
///
/// Reproduction never splits a genome gene by gene. The cart block
/// (`genes[0..2]`) always travels together, and so does the pole block
/// (`genes[2..4]`). See [`Genome::crossover`].
///
/// # Example
///
/// ```
/// use polebalance::engines::generation::Genome;
///
/// let genome = Genome::new([120, 80, 900, 150]);
/// assert_eq!(genome.angle_gain(), 900);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Genome([i32; GENE_COUNT]);

impl Genome {
    pub const fn new(genes: [i32; GENE_COUNT]) -> Self {
        Self(genes)
    }

    pub fn genes(&self) -> &[i32; GENE_COUNT] {
        &self.0
    }

    pub fn genes_mut(&mut self) -> &mut [i32; GENE_COUNT] {
        &mut self.0
    }

    pub fn position_gain(&self) -> i32 {
        self.0[0]
    }

    pub fn velocity_gain(&self) -> i32 {
        self.0[1]
    }

    pub fn angle_gain(&self) -> i32 {
        self.0[2]
    }

    pub fn angular_velocity_gain(&self) -> i32 {
        self.0[3]
    }

    /// Two-block crossover: cart gains from `cart_parent`, pole gains from `pole_parent`.
    pub fn crossover(cart_parent: &Genome, pole_parent: &Genome) -> Genome {
        Genome([
            cart_parent.0[0],
            cart_parent.0[1],
            pole_parent.0[2],
            pole_parent.0[3],
        ])
    }
}

impl From<[i32; GENE_COUNT]> for Genome {
    fn from(genes: [i32; GENE_COUNT]) -> Self {
        Self(genes)
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}
