//! Driving a predictor over a trace.

use crate::branch::*;
use crate::predictor::BranchPredictor;
use crate::stats::BranchStats;

/// Predict and then train every branch in `records`, in order.
pub fn simulate(bp: &mut impl BranchPredictor, records: &[BranchRecord])
    -> BranchStats
{
    let mut stats = BranchStats::new();
    for record in records {
        let prediction = bp.predict(record.pc);
        stats.update(record, prediction);
        bp.train(record.pc, record.outcome);
    }
    stats
}
