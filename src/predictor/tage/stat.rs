
/// Container for [TAGEPredictor](super::TAGEPredictor) runtime stats.
#[derive(Clone, Debug, Default)]
pub struct TAGEStats {
    /// Allocations into an entry whose 'useful' bit was clear
    pub alcs: usize,

    /// Allocations that had to evict a 'useful' entry
    pub forced_alcs: usize,

    /// Correct predictions from the base component
    pub base_hits: usize,

    /// Misses in the base component
    pub base_miss: usize,

    /// Correct predictions from the tagged components
    pub comp_hits: Vec<usize>,

    /// Misses in the tagged components
    pub comp_miss: Vec<usize>,

    /// Number of 'useful' bit resets
    pub resets: usize,

    /// Number of updates
    pub clk: usize,
}
impl TAGEStats {
    pub fn new(num_comp: usize) -> Self {
        Self {
            comp_hits: vec![0; num_comp],
            comp_miss: vec![0; num_comp],
            ..Default::default()
        }
    }
}

/// Container for [TAGEEntry](super::TAGEEntry) runtime stats.
#[derive(Clone, Debug, Default)]
pub struct TAGEEntryStats {
    /// Number of updates while providing a prediction
    pub updates: usize,

    /// Number of times this entry was (re)allocated
    pub allocations: usize,
}
impl TAGEEntryStats {
    pub fn was_unused(&self) -> bool {
        self.allocations == 0
    }
}
