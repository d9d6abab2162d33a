//! CART regression tree shared by the forest and boosting models
//!
//! Splits minimise the within-node sum of squared errors. On 0/1 targets this
//! orders candidate splits exactly as Gini impurity does, so the same tree
//! serves classification forests (leaf value = class-1 fraction) and the
//! residual trees of gradient boosting.

use rand::rngs::StdRng;
use rand::seq::index::sample;

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    /// None grows until leaves are pure or too small to split
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Candidate features drawn per split; None uses every feature
    pub max_features: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// Fitted regression tree stored as a flat node arena
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    n_features: usize,
}

/// Borrowed training data for one fit
struct FitData<'a> {
    x: &'a [Vec<f64>],
    y: &'a [f64],
    params: TreeParams,
}

impl RegressionTree {
    /// Grow a tree on the rows listed in `samples` (duplicates allowed for bootstrap)
    ///
    /// Weighted impurity decrease of every split is added to `importances`,
    /// indexed by feature.
    pub fn fit(
        x: &[Vec<f64>],
        y: &[f64],
        samples: Vec<usize>,
        params: TreeParams,
        rng: &mut StdRng,
        importances: &mut [f64],
    ) -> Self {
        let n_features = x.first().map(|row| row.len()).unwrap_or(0);
        let mut tree = Self { nodes: Vec::new(), n_features };
        let data = FitData { x, y, params };
        tree.grow(&data, samples, 0, rng, importances);
        tree
    }

    fn grow(
        &mut self,
        data: &FitData<'_>,
        samples: Vec<usize>,
        depth: usize,
        rng: &mut StdRng,
        importances: &mut [f64],
    ) -> usize {
        let (sum, sum_sq) = samples.iter().fold((0.0, 0.0), |(s, sq), &i| {
            (s + data.y[i], sq + data.y[i] * data.y[i])
        });
        let n = samples.len() as f64;
        let value = if samples.is_empty() { 0.0 } else { sum / n };
        let node_sse = (sum_sq - sum * sum / n.max(1.0)).max(0.0);

        let depth_exhausted = data.params.max_depth.map_or(false, |d| depth >= d);
        let too_small = samples.len() < data.params.min_samples_split.max(2);
        if depth_exhausted || too_small || node_sse <= 1e-12 {
            return self.push(Node::Leaf { value });
        }

        let Some(best) = self.best_split(data, &samples, node_sse, rng) else {
            return self.push(Node::Leaf { value });
        };

        if let Some(slot) = importances.get_mut(best.feature) {
            *slot += best.gain;
        }

        let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&i| data.x[i][best.feature] <= best.threshold);

        // Reserve this node's slot before the children are appended
        let index = self.push(Node::Leaf { value });
        let left = self.grow(data, left_samples, depth + 1, rng, importances);
        let right = self.grow(data, right_samples, depth + 1, rng, importances);
        self.nodes[index] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        index
    }

    fn best_split(
        &self,
        data: &FitData<'_>,
        samples: &[usize],
        node_sse: f64,
        rng: &mut StdRng,
    ) -> Option<BestSplit> {
        let candidates: Vec<usize> = match data.params.max_features {
            Some(k) if k < self.n_features => sample(rng, self.n_features, k.max(1)).into_vec(),
            _ => (0..self.n_features).collect(),
        };
        let min_leaf = data.params.min_samples_leaf.max(1);

        let mut best: Option<BestSplit> = None;
        let mut order: Vec<usize> = samples.to_vec();

        for feature in candidates {
            order.sort_by(|&a, &b| data.x[a][feature].total_cmp(&data.x[b][feature]));

            let total: f64 = order.iter().map(|&i| data.y[i]).sum();
            let total_sq: f64 = order.iter().map(|&i| data.y[i] * data.y[i]).sum();
            let n = order.len();

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for pos in 0..n - 1 {
                let yi = data.y[order[pos]];
                left_sum += yi;
                left_sq += yi * yi;

                let here = data.x[order[pos]][feature];
                let next = data.x[order[pos + 1]][feature];
                if next <= here {
                    continue;
                }
                let n_left = pos + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let right_sum = total - left_sum;
                let right_sq = total_sq - left_sq;
                let left_sse = left_sq - left_sum * left_sum / n_left as f64;
                let right_sse = right_sq - right_sum * right_sum / n_right as f64;
                let gain = node_sse - left_sse - right_sse;

                if gain > 1e-12 && best.map_or(true, |b| gain > b.gain) {
                    best = Some(BestSplit {
                        feature,
                        threshold: here + (next - here) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }

    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Index of the leaf reached by `row`
    pub fn leaf_index(&self, row: &[f64]) -> usize {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { .. } => return index,
                Node::Split { feature, threshold, left, right } => {
                    let value = row.get(*feature).copied().unwrap_or(0.0);
                    index = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        match &self.nodes[self.leaf_index(row)] {
            Node::Leaf { value } => *value,
            Node::Split { .. } => 0.0,
        }
    }

    /// Overwrite a leaf's output, used by boosting's Newton step
    pub fn set_leaf_value(&mut self, index: usize, new_value: f64) {
        if let Some(Node::Leaf { value }) = self.nodes.get_mut(index) {
            *value = new_value;
        }
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, Node::Leaf { .. })).count()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match &nodes[index] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }
}
