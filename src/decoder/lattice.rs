use crate::{errors::Result, table::Float};

/// Cost of taking an event with probability `p`: `|log10 p|`.
#[inline]
pub(crate) fn cost(p: Float) -> Float {
    p.log10().abs()
}

/// How far a lattice has progressed. It only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Level {
    None,
    Filling(usize),
    Terminated,
    Backtracked,
}

/// Shortest-path trellis over `T` items and `L` labels.
///
/// Costs are non-negative sums of `|log10 p|` terms, so the best path is
/// the cheapest one.
#[derive(Debug)]
pub(crate) struct Lattice {
    num_labels: usize,
    num_items: usize,

    /// [T][L] matrix whose element [t][l] is the cheapest cost of a path
    /// from BOS arriving at (t, l).
    cost: Vec<Float>,

    /// [T][L] matrix whose element [t][j] is the label #i at t-1 with the
    /// cheapest transition into (t, j). `None` when no predecessor was
    /// reachable.
    backward_edge: Vec<Option<usize>>,

    /// Label at T-1 that reaches EOS cheapest.
    last: Option<(usize, Float)>,

    level: Level,
}

impl Lattice {
    pub fn new(num_labels: usize, num_items: usize) -> Self {
        log::trace!("lattice (L: {num_labels}, T: {num_items})");
        Self {
            num_labels,
            num_items,
            cost: vec![0.0; num_labels * num_items],
            backward_edge: vec![None; num_labels * num_items],
            last: None,
            level: Level::None,
        }
    }

    #[inline]
    pub fn cost(&self, t: usize, l: usize) -> Float {
        self.cost[self.num_labels * t + l]
    }

    #[inline]
    fn backward_edge(&self, t: usize, l: usize) -> Option<usize> {
        self.backward_edge[self.num_labels * t + l]
    }

    #[cfg(test)]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Sets the costs at (0, *).
    pub fn initialize<F>(&mut self, mut initial: F) -> Result<()>
    where
        F: FnMut(usize) -> Result<Float>,
    {
        debug_assert_eq!(self.level, Level::None);
        for j in 0..self.num_labels {
            self.cost[j] = initial(j)?;
        }
        self.level = Level::Filling(0);
        Ok(())
    }

    /// Fills (t, *) from (t-1, *).
    ///
    /// `transition(i, j)` is the cost of moving from label #i to #j and
    /// `emission(j)` the cost of emitting item #t from label #j. The
    /// backward edge follows the cheapest transition alone, while the cell
    /// keeps the cheapest transition-plus-emission total. The first
    /// strictly smaller candidate wins, and predecessors whose cost is
    /// exactly zero were never reached and are skipped.
    pub fn step<E, R>(&mut self, t: usize, mut emission: E, mut transition: R) -> Result<()>
    where
        E: FnMut(usize) -> Result<Float>,
        R: FnMut(usize, usize) -> Result<Float>,
    {
        debug_assert_eq!(self.level, Level::Filling(t - 1));
        let l = self.num_labels;
        for j in 0..l {
            let emit = emission(j)?;
            let mut min_score = Float::MAX;
            let mut min_transition = Float::MAX;
            let mut argmin = None;
            for i in 0..l {
                let prev = self.cost[l * (t - 1) + i];
                if prev == 0.0 {
                    continue;
                }
                let score = prev + transition(i, j)?;
                if score < min_transition {
                    min_transition = score;
                    argmin = Some(i);
                }
                let score = score + emit;
                if score < min_score {
                    min_score = score;
                }
            }
            self.backward_edge[l * t + j] = argmin;
            self.cost[l * t + j] = min_score;
        }
        self.level = Level::Filling(t);
        Ok(())
    }

    /// Picks the cheapest label at T-1; the earliest label wins ties.
    pub fn terminate(&mut self) -> Option<Float> {
        debug_assert_eq!(self.level, Level::Filling(self.num_items - 1));
        let t = self.num_items - 1;
        let mut min_score = Float::MAX;
        self.last = None;
        for j in 0..self.num_labels {
            let score = self.cost(t, j);
            if score < min_score {
                min_score = score;
                self.last = Some((j, score));
            }
        }
        self.level = Level::Terminated;
        self.last.map(|(_, score)| score)
    }

    /// Follows the backward edges from the terminal label. Items left
    /// unreached by the chain stay `None`.
    pub fn backtrack(&mut self) -> Vec<Option<usize>> {
        debug_assert_eq!(self.level, Level::Terminated);
        let mut labels = vec![None; self.num_items];
        let mut current = self.last.map(|(j, _)| j);
        for t in (0..self.num_items).rev() {
            let Some(j) = current else {
                break;
            };
            labels[t] = Some(j);
            current = if t > 0 { self.backward_edge(t, j) } else { None };
        }
        self.level = Level::Backtracked;
        labels
    }
}
