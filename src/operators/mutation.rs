use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::genome::{Gene, Genome};

/// Mutation strategy tag used by the mutation engine's dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationType {
    BitFlip,
    Swap,
    Inversion,
    Scramble,
    Gaussian,
    Uniform,
    Polynomial,
    Creep,
    Adaptive,
}

/// Zero-mean Gaussian sample via the Box-Muller transform.
pub(crate) fn gaussian_sample<R: Rng>(rng: &mut R) -> f64 {
    let u1 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
    let u2 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// Bit-flip mutation: per gene, with probability `rate`, flip 0 <-> 1.
pub fn bit_flip<R: Rng>(genome: &mut Genome<f64>, rate: f64, rng: &mut R) {
    let mut changed = false;
    for gene in genome.genes_mut() {
        if rng.gen::<f64>() < rate {
            *gene = if *gene == 0.0 { 1.0 } else { 0.0 };
            changed = true;
        }
    }
    if changed {
        genome.clear_fitness();
    }
}

/// Swap mutation: with overall probability `rate`, exchange two distinct
/// randomly chosen gene positions.
pub fn swap<T: Gene, R: Rng>(genome: &mut Genome<T>, rate: f64, rng: &mut R) {
    if genome.len() < 2 {
        return;
    }
    if rng.gen::<f64>() < rate {
        let len = genome.len();
        let i = rng.gen_range(0..len);
        let mut j = rng.gen_range(0..len - 1);
        if j >= i {
            j += 1;
        }
        genome.genes_mut().swap(i, j);
        genome.clear_fitness();
    }
}

/// Inversion mutation: with overall probability `rate`, reverse the
/// inclusive sub-sequence between two random ordered indices.
pub fn inversion<T: Gene, R: Rng>(genome: &mut Genome<T>, rate: f64, rng: &mut R) {
    if genome.len() < 2 {
        return;
    }
    if rng.gen::<f64>() < rate {
        let len = genome.len();
        let mut a = rng.gen_range(0..len);
        let mut b = rng.gen_range(0..len);
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        genome.genes_mut()[a..=b].reverse();
        genome.clear_fitness();
    }
}

/// Scramble mutation: with overall probability `rate`, Fisher-Yates
/// shuffle a random sub-sequence in place.
pub fn scramble<T: Gene, R: Rng>(genome: &mut Genome<T>, rate: f64, rng: &mut R) {
    if genome.len() < 2 {
        return;
    }
    if rng.gen::<f64>() < rate {
        let len = genome.len();
        let mut a = rng.gen_range(0..len);
        let mut b = rng.gen_range(0..len);
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        let genes = genome.genes_mut();
        for k in ((a + 1)..=b).rev() {
            let l = rng.gen_range(a..=k);
            genes.swap(k, l);
        }
        genome.clear_fitness();
    }
}

/// Gaussian mutation: per gene, with probability `rate`, add a sample
/// from N(0, sigma).
pub fn gaussian<R: Rng>(genome: &mut Genome<f64>, rate: f64, sigma: f64, rng: &mut R) {
    let mut changed = false;
    for gene in genome.genes_mut() {
        if rng.gen::<f64>() < rate {
            *gene += gaussian_sample(rng) * sigma;
            changed = true;
        }
    }
    if changed {
        genome.clear_fitness();
    }
}

/// Uniform mutation: per gene, with probability `rate`, replace the value
/// with a fresh uniform draw in `[low, high)`.
pub fn uniform<R: Rng>(genome: &mut Genome<f64>, rate: f64, low: f64, high: f64, rng: &mut R) {
    let mut changed = false;
    for gene in genome.genes_mut() {
        if rng.gen::<f64>() < rate {
            *gene = rng.gen_range(low..high);
            changed = true;
        }
    }
    if changed {
        genome.clear_fitness();
    }
}

/// Polynomial mutation: per gene, with probability `rate`, apply the
/// standard distribution-index perturbation and clamp to `[low, high]`.
pub fn polynomial<R: Rng>(
    genome: &mut Genome<f64>,
    rate: f64,
    eta: f64,
    low: f64,
    high: f64,
    rng: &mut R,
) {
    let span = high - low;
    let mut changed = false;

    for gene in genome.genes_mut() {
        if rng.gen::<f64>() < rate {
            let delta1 = (*gene - low) / span;
            let delta2 = (high - *gene) / span;
            let u = rng.gen::<f64>();
            let mut_pow = 1.0 / (eta + 1.0);

            let deltaq = if u <= 0.5 {
                let xy = 1.0 - delta1;
                let val = 2.0 * u + (1.0 - 2.0 * u) * xy.powf(eta + 1.0);
                val.powf(mut_pow) - 1.0
            } else {
                let xy = 1.0 - delta2;
                let val = 2.0 * (1.0 - u) + 2.0 * (u - 0.5) * xy.powf(eta + 1.0);
                1.0 - val.powf(mut_pow)
            };

            *gene = (*gene + deltaq * span).clamp(low, high);
            changed = true;
        }
    }
    if changed {
        genome.clear_fitness();
    }
}

/// Creep mutation: per gene, with probability `rate`, add a uniform
/// perturbation in `[-step, step]`, clamped to `[low, high]`.
pub fn creep<R: Rng>(
    genome: &mut Genome<f64>,
    rate: f64,
    step: f64,
    low: f64,
    high: f64,
    rng: &mut R,
) {
    let mut changed = false;
    for gene in genome.genes_mut() {
        if rng.gen::<f64>() < rate {
            *gene = (*gene + rng.gen_range(-step..=step)).clamp(low, high);
            changed = true;
        }
    }
    if changed {
        genome.clear_fitness();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rate_zero_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(1);
        let original = Genome::new(vec![0.0, 1.0, 0.0, 1.0, 1.0]);

        let mut genome = original.clone();
        genome.set_fitness(1.0);
        bit_flip(&mut genome, 0.0, &mut rng);
        swap(&mut genome, 0.0, &mut rng);
        inversion(&mut genome, 0.0, &mut rng);
        scramble(&mut genome, 0.0, &mut rng);
        gaussian(&mut genome, 0.0, 1.0, &mut rng);
        uniform(&mut genome, 0.0, -1.0, 1.0, &mut rng);
        polynomial(&mut genome, 0.0, 20.0, -1.0, 2.0, &mut rng);
        creep(&mut genome, 0.0, 0.5, -10.0, 10.0, &mut rng);

        assert_eq!(genome.genes(), original.genes());
        assert_eq!(genome.fitness(), Some(1.0));
    }

    #[test]
    fn bit_flip_statistical_rate() {
        let mut rng = StdRng::seed_from_u64(123);
        let mut genome = Genome::new(vec![0.0; 10_000]);

        bit_flip(&mut genome, 0.3, &mut rng);

        let flipped = genome.genes().iter().filter(|&&g| g == 1.0).count() as f64;
        let sigma = (10_000.0_f64 * 0.3 * 0.7).sqrt();
        assert!(
            (flipped - 3_000.0).abs() < 3.0 * sigma,
            "flipped {flipped} genes"
        );
        assert_eq!(genome.fitness(), None);
    }

    #[test]
    fn inversion_preserves_gene_multiset() {
        let mut rng = StdRng::seed_from_u64(77);
        let mut genome = Genome::new((0..20).map(f64::from).collect::<Vec<_>>());

        inversion(&mut genome, 1.0, &mut rng);

        let mut sorted = genome.genes().to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(sorted, (0..20).map(f64::from).collect::<Vec<_>>());
    }

    #[test]
    fn scramble_preserves_gene_multiset() {
        let mut rng = StdRng::seed_from_u64(78);
        let mut genome = Genome::new((0..20).map(f64::from).collect::<Vec<_>>());

        scramble(&mut genome, 1.0, &mut rng);

        let mut sorted = genome.genes().to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(sorted, (0..20).map(f64::from).collect::<Vec<_>>());
    }

    #[test]
    fn swap_exchanges_two_distinct_positions() {
        let mut rng = StdRng::seed_from_u64(79);
        let original: Vec<f64> = (0..10).map(f64::from).collect();
        let mut genome = Genome::new(original.clone());

        swap(&mut genome, 1.0, &mut rng);

        let differing = genome
            .genes()
            .iter()
            .zip(&original)
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(differing, 2);
    }

    #[test]
    fn polynomial_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(80);
        let mut genome = Genome::new(vec![0.9, -0.9, 0.0, 0.5]);

        for _ in 0..100 {
            polynomial(&mut genome, 1.0, 5.0, -1.0, 1.0, &mut rng);
            for &g in genome.genes() {
                assert!((-1.0..=1.0).contains(&g));
            }
        }
    }

    #[test]
    fn uniform_draws_within_range() {
        let mut rng = StdRng::seed_from_u64(81);
        let mut genome = Genome::new(vec![100.0; 50]);

        uniform(&mut genome, 1.0, -2.0, 3.0, &mut rng);

        for &g in genome.genes() {
            assert!((-2.0..3.0).contains(&g));
        }
    }
}
