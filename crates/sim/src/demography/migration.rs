//! Migration rate matrices.
//!
//! Migration itself is carried out by operators supplied by the caller; the
//! helpers here only build the backward rate matrices such operators
//! consume. Row `i` holds the probabilities that an individual of
//! subpopulation `i` stays (diagonal) or moves to each other subpopulation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A rate matrix together with the subpopulations it applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationSpec {
    pub rates: Vec<Vec<f64>>,
    /// Subpopulations the rows refer to, all of them when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_pops: Option<Vec<usize>>,
}

impl MigrationSpec {
    pub fn new(rates: Vec<Vec<f64>>) -> Self {
        Self {
            rates,
            sub_pops: None,
        }
    }

    /// Restrict the matrix to the given subpopulations.
    pub fn with_sub_pops(mut self, sub_pops: Vec<usize>) -> Self {
        self.sub_pops = Some(sub_pops);
        self
    }

    pub fn num_sub_pops(&self) -> usize {
        self.rates.len()
    }
}

/// Island model: every subpopulation sends `r` of its individuals evenly to
/// all the others.
pub fn island_rates(r: f64, n: usize) -> Vec<Vec<f64>> {
    if n < 2 {
        return vec![vec![1.0]];
    }
    (0..n)
        .map(|i| {
            (0..n)
                .map(|j| if i == j { 1.0 - r } else { r / (n - 1) as f64 })
                .collect()
        })
        .collect()
}

/// One-dimensional stepping stone model. Without `circular`, the patches at
/// both ends send all `r` migrants to their single neighbour.
pub fn stepping_stone_rates(r: f64, n: usize, circular: bool) -> Vec<Vec<f64>> {
    stepping_stone_2d_rates(r, 1, n, false, circular)
}

/// Two-dimensional stepping stone model on an `m x n` grid, numbered row by
/// row, with 4 neighbours per patch (8 with `diagonal`). With `circular`
/// the grid wraps around; otherwise boundary patches share `r` among fewer
/// neighbours.
pub fn stepping_stone_2d_rates(
    r: f64,
    m: usize,
    n: usize,
    diagonal: bool,
    circular: bool,
) -> Vec<Vec<f64>> {
    if m * n < 2 {
        return vec![vec![1.0]];
    }
    let offsets: &[(isize, isize)] = if diagonal {
        &[(-1, 0), (1, 0), (0, -1), (0, 1), (-1, -1), (-1, 1), (1, -1), (1, 1)]
    } else {
        &[(-1, 0), (1, 0), (0, -1), (0, 1)]
    };
    let (rows, cols) = (m as isize, n as isize);

    let mut rates = Vec::with_capacity(m * n);
    for row in 0..rows {
        for col in 0..cols {
            let neighbours: BTreeSet<(isize, isize)> = offsets
                .iter()
                .map(|(dr, dc)| (row + dr, col + dc))
                .filter_map(|(nr, nc)| {
                    if circular {
                        Some((nr.rem_euclid(rows), nc.rem_euclid(cols)))
                    } else if (0..rows).contains(&nr) && (0..cols).contains(&nc) {
                        Some((nr, nc))
                    } else {
                        None
                    }
                })
                .filter(|&cell| cell != (row, col))
                .collect();

            let mut line = vec![0.0; m * n];
            line[(row * cols + col) as usize] = 1.0 - r;
            for (nr, nc) in &neighbours {
                line[(nr * cols + nc) as usize] = r / neighbours.len() as f64;
            }
            rates.push(line);
        }
    }
    rates
}
