//! Search configuration parameters.

/// Configuration for the Monte Carlo tree search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of playouts per `genmove`.
    pub playout_count: u32,

    /// Exploration coefficient of the UCB term. Higher values explore more,
    /// lower values exploit the current best children.
    pub explore_rate: f32,

    /// A node must collect this many updates beyond its prior before it is
    /// expanded. Zero expands on the first real visit.
    pub mature_update_threshold: f32,

    /// Virtual sample count folded into every fresh statistic.
    pub prior_count: f32,

    /// Mean of the virtual prior samples, from the perspective of the side
    /// to move at the node.
    pub prior_mean: f32,

    /// Resign when the best child's subjective mean falls below this.
    pub resign_mean: f32,

    /// Blend RAVE statistics into the selection value.
    pub rave_use: bool,

    /// Feed playout moves back into sibling RAVE statistics.
    pub rave_update: bool,

    /// Fraction of the move history scanned by the RAVE update.
    pub rave_update_fraction: f32,

    /// Mixing weight of the regular statistic in the selection value.
    pub stat_bias: f32,

    /// Mixing weight of the RAVE statistic in the selection value.
    pub rave_bias: f32,

    /// Coefficient of the `bias / visits` progressive-bias term.
    pub progressive_bias: f32,

    /// In-tree move budget per playout. Zero makes every playout
    /// rollout-only from the active root.
    pub tree_max_moves: u32,

    /// Hard bound on the node arena. Expansion degrades to a no-op when the
    /// arena is full.
    pub max_nodes: usize,

    /// Default visit threshold of the tree dump.
    pub print_min_visits: f32,

    /// Default child budget per level of the tree dump.
    pub print_max_children: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            playout_count: 10_000,
            explore_rate: 1.0,
            mature_update_threshold: 100.0,
            prior_count: 1.0,
            prior_mean: 0.0,
            resign_mean: -0.95,
            rave_use: true,
            rave_update: true,
            rave_update_fraction: 0.5,
            stat_bias: 1.0,
            rave_bias: 1.0,
            progressive_bias: 1.0,
            tree_max_moves: 400,
            max_nodes: 1_000_000,
            print_min_visits: 100.0,
            print_max_children: 4,
        }
    }
}

impl SearchConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            playout_count: 200,
            mature_update_threshold: 2.0,
            max_nodes: 20_000,
            ..Self::default()
        }
    }

    /// Builder pattern: set the playout count.
    pub fn with_playouts(mut self, n: u32) -> Self {
        self.playout_count = n;
        self
    }

    /// Builder pattern: set the exploration coefficient.
    pub fn with_explore_rate(mut self, rate: f32) -> Self {
        self.explore_rate = rate;
        self
    }

    /// Builder pattern: set the expansion maturity threshold.
    pub fn with_mature_threshold(mut self, threshold: f32) -> Self {
        self.mature_update_threshold = threshold;
        self
    }

    /// Builder pattern: set the statistic prior.
    pub fn with_prior(mut self, count: f32, mean: f32) -> Self {
        self.prior_count = count;
        self.prior_mean = mean;
        self
    }

    /// Builder pattern: set the resignation threshold.
    pub fn with_resign_mean(mut self, mean: f32) -> Self {
        self.resign_mean = mean;
        self
    }

    /// Builder pattern: enable or disable RAVE entirely.
    pub fn with_rave(mut self, enabled: bool) -> Self {
        self.rave_use = enabled;
        self.rave_update = enabled;
        self
    }

    /// Builder pattern: set the arena bound.
    pub fn with_max_nodes(mut self, n: usize) -> Self {
        self.max_nodes = n;
        self
    }

    /// Builder pattern: set the in-tree move budget.
    pub fn with_tree_max_moves(mut self, n: u32) -> Self {
        self.tree_max_moves = n;
        self
    }
}
