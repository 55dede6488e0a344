#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single-locus Mendelian inheritance for offspring genotypes.

use mosquito_sim_core::Genotype;
use rand::Rng;

/// Draws an offspring genotype from two parental genotypes.
///
/// The cross is symmetric in its arguments. Crosses with a deterministic
/// outcome consume no randomness; half/half crosses consume one boolean draw
/// and `Ff × Ff` consumes one uniform draw split 0.25 / 0.50 / 0.25.
pub fn inherit<R: Rng + ?Sized>(rng: &mut R, first: Genotype, second: Genotype) -> Genotype {
    use Genotype::{Heterozygous, HomozygousDominant, HomozygousRecessive};

    match (first, second) {
        (HomozygousRecessive, HomozygousRecessive) => HomozygousRecessive,
        (HomozygousDominant, HomozygousDominant) => HomozygousDominant,
        (HomozygousDominant, HomozygousRecessive) | (HomozygousRecessive, HomozygousDominant) => {
            Heterozygous
        }
        (Heterozygous, HomozygousRecessive) | (HomozygousRecessive, Heterozygous) => {
            if rng.gen_bool(0.5) {
                HomozygousRecessive
            } else {
                Heterozygous
            }
        }
        (Heterozygous, HomozygousDominant) | (HomozygousDominant, Heterozygous) => {
            if rng.gen_bool(0.5) {
                HomozygousDominant
            } else {
                Heterozygous
            }
        }
        (Heterozygous, Heterozygous) => {
            let draw = rng.gen::<f64>();
            if draw < 0.25 {
                HomozygousDominant
            } else if draw < 0.75 {
                Heterozygous
            } else {
                HomozygousRecessive
            }
        }
    }
}
