//! Outer local search over traversal orders.
//!
//! Purpose
//! - Start from the plain order, repeatedly mutate the current order at a
//!   scheduled point, and keep candidates according to an acceptance rule.
//!   Only the traversal order varies between iterations; every evaluation is a
//!   fresh run of the finder pipeline.
//!
//! Model
//! - Mutation schedule: the first `plateau_frac` of the iterations mutate from
//!   the root (`mutate_point = 0`), i.e. draw a fresh tree. Afterwards the
//!   mutation point grows exponentially towards `n - 1`, so later iterations
//!   keep ever longer prefixes of the current tree.
//! - Acceptance: `Greedy` keeps a candidate only if it removes strictly fewer
//!   edges. `Metropolis` also accepts worse candidates with probability
//!   `exp(-delta / T)` under a linearly cooling temperature.
//! - Reruns repeat the schedule starting from the best order found so far.
//!
//! Determinism
//! - All randomness comes from one `StdRng` seeded with `SearchCfg::seed`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{MpsError, Result};
use crate::finder::{compute_and_canonicalize, evaluate, generate_order};
use crate::graph::Graph;

/// Rule deciding whether a candidate order replaces the current one.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Acceptance {
    /// Accept only strict improvements; otherwise revert to the best order.
    #[default]
    Greedy,
    /// Simulated annealing with linear cooling from `start_temp` to zero.
    Metropolis { start_temp: f64 },
}

/// Search parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchCfg {
    /// Iterations per rerun.
    pub iterations: usize,
    /// Fraction of each rerun spent at `mutate_point = 0`. In [0, 1].
    pub plateau_frac: f64,
    /// How many times the schedule is repeated.
    pub reruns: usize,
    pub acceptance: Acceptance,
    pub seed: u64,
}

impl Default for SearchCfg {
    fn default() -> Self {
        Self {
            iterations: 100,
            plateau_frac: 0.5,
            reruns: 1,
            acceptance: Acceptance::Greedy,
            seed: 0,
        }
    }
}

impl SearchCfg {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.plateau_frac) {
            return Err(MpsError::config(format!(
                "plateau_frac must lie in [0, 1], got {}",
                self.plateau_frac
            )));
        }
        if let Acceptance::Metropolis { start_temp } = self.acceptance {
            if !start_temp.is_finite() || start_temp < 0.0 {
                return Err(MpsError::config(format!(
                    "start_temp must be finite and non-negative, got {start_temp}"
                )));
            }
        }
        Ok(())
    }

    fn total_iterations(&self) -> usize {
        self.iterations.saturating_mul(self.reruns)
    }
}

/// Mutation point per iteration: a plateau of zeros, then
/// `floor(exp(g * (k - P - 1)))` with `g = ln(n - 1) / (I - P - 1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MutationSchedule {
    iterations: usize,
    plateau: usize,
    growth: f64,
}

impl MutationSchedule {
    pub fn new(iterations: usize, plateau_frac: f64, vertex_count: usize) -> Self {
        let plateau = (plateau_frac * iterations as f64).floor() as usize;
        let steps = iterations.saturating_sub(plateau + 1);
        let growth = if vertex_count > 2 && steps > 0 {
            ((vertex_count - 1) as f64).ln() / steps as f64
        } else {
            0.0
        };
        Self {
            iterations,
            plateau,
            growth,
        }
    }

    pub fn plateau(&self) -> usize {
        self.plateau
    }

    /// Mutation point of global iteration `k`; repeats every `iterations`.
    pub fn point(&self, k: usize) -> usize {
        if self.iterations == 0 {
            return 0;
        }
        let k = k % self.iterations;
        if k <= self.plateau {
            0
        } else {
            (self.growth * (k - self.plateau - 1) as f64).exp().floor() as usize
        }
    }
}

/// One search iteration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchStep {
    pub iteration: usize,
    pub mutate_point: usize,
    /// Removed edges of the candidate order.
    pub candidate: usize,
    pub accepted: bool,
    /// Removed edges of the current order after the decision.
    pub current: usize,
    pub best: usize,
    /// Annealing temperature; zero under greedy acceptance.
    pub temperature: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    /// Best order found, in canonical replay form.
    pub order: Vec<usize>,
    pub removed: usize,
    /// Removed edges of the plain starting order.
    pub initial_removed: usize,
    pub history: Vec<SearchStep>,
}

/// Run the local search on `graph`.
pub fn search(graph: &Graph, cfg: &SearchCfg) -> Result<SearchOutcome> {
    cfg.validate()?;
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let schedule = MutationSchedule::new(cfg.iterations, cfg.plateau_frac, graph.vertex_count());
    let total = cfg.total_iterations();

    let initial = generate_order(graph);
    let initial_removed = evaluate(graph, &initial)?;
    tracing::debug!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        initial_removed,
        "search start"
    );

    // Under greedy acceptance `current` never leaves `best`.
    let mut best = initial.clone();
    let mut best_removed = initial_removed;
    let mut current = initial;
    let mut current_removed = initial_removed;
    let mut history = Vec::with_capacity(total);

    for k in 0..total {
        let mutate_point = schedule.point(k);
        let (candidate, removed) = compute_and_canonicalize(graph, mutate_point, &current, &mut rng)?;
        let temperature = match cfg.acceptance {
            Acceptance::Greedy => 0.0,
            Acceptance::Metropolis { start_temp } => start_temp * (1.0 - k as f64 / total as f64),
        };
        let accepted = match cfg.acceptance {
            Acceptance::Greedy => removed < best_removed,
            Acceptance::Metropolis { .. } => {
                removed < current_removed || {
                    let delta = (removed - current_removed) as f64;
                    temperature > 0.0 && rng.gen::<f64>() < (-delta / temperature).exp()
                }
            }
        };

        if accepted {
            current = candidate;
            current_removed = removed;
            if current_removed < best_removed {
                best = current.clone();
                best_removed = current_removed;
                tracing::debug!(iteration = k, mutate_point, removed = best_removed, "improved");
            }
        }

        history.push(SearchStep {
            iteration: k,
            mutate_point,
            candidate: removed,
            accepted,
            current: current_removed,
            best: best_removed,
            temperature,
        });
    }

    tracing::info!(
        iterations = total,
        initial_removed,
        removed = best_removed,
        "search finished"
    );
    Ok(SearchOutcome {
        order: best,
        removed: best_removed,
        initial_removed,
        history,
    })
}
