//! Registers tracking committed branch outcomes.

use bitvec::prelude::*;
use crate::Outcome;
use crate::predictor::PredictorTable;

/// Return a mask covering the low `bits` bits of a [usize].
pub fn low_mask(bits: usize) -> usize {
    if bits >= usize::BITS as usize {
        usize::MAX
    } else {
        (1 << bits) - 1
    }
}

/// A global history register.
///
/// Bit 0 is the most-recent outcome. The register can be much wider than any
/// table index, in which case consumers either read the low bits with
/// [HistoryRegister::value] or compress a longer window with
/// [HistoryRegister::fold].
#[derive(Clone, Debug)]
pub struct HistoryRegister {
    data: BitVec<usize, Lsb0>,
    len: usize,
}

// NOTE: This *reverses* the all of the bits and presents them in a format
// where the leftmost bit is the most-significant (index n) and the rightmost
// bit is the least-significant (index 0).
impl std::fmt::Display for HistoryRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let x: String = self.data.as_bitslice().iter().by_vals()
            .map(|b| if b { '1' } else { '0' })
            .rev()
            .collect();
        write!(f, "{}", x)
    }
}

impl HistoryRegister {
    /// Create a register with the specified length in bits.
    /// All bits in the register are initialized to zero.
    pub fn new(len: usize) -> Self {
        Self {
            data: bitvec![usize, Lsb0; 0; len],
            len,
        }
    }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }
    pub fn data(&self) -> &BitSlice<usize, Lsb0> { self.data.as_bitslice() }
}

impl HistoryRegister {
    /// Shift the register by 'n' bits.
    /// The bottom 'n' bits become zero, and the top 'n' bits are discarded.
    pub fn shift_by(&mut self, n: usize) {
        if self.len == 0 {
            return;
        }
        self.data.shift_right(n);
    }

    /// Shift a resolved outcome into the bottom of the register.
    pub fn advance(&mut self, outcome: Outcome) {
        if self.len == 0 {
            return;
        }
        self.shift_by(1);
        self.data.set(0, outcome.into());
    }

    /// Return the low bits of the register (as many as fit in a [usize]).
    pub fn value(&self) -> usize {
        let n = self.len.min(usize::BITS as usize);
        if n == 0 {
            return 0;
        }
        self.data[..n].load_le::<usize>()
    }

    /// Fold [with XOR] the most-recent `len` bits into `output_bits` bits.
    ///
    /// The window is cut into `output_bits`-sized chunks starting from the
    /// most-recent outcome, and the chunks are XOR'ed together. A window
    /// longer than the register is clipped to the register, and the output
    /// is never wider than a [usize].
    pub fn fold(&self, len: usize, output_bits: usize) -> usize {
        if output_bits == 0 {
            return 0;
        }
        let output_bits = output_bits.min(usize::BITS as usize);
        let len = len.min(self.len);
        let output_mask = low_mask(output_bits);
        let slice = &self.data[..len];
        let res = slice.chunks(output_bits).fold(0, |res, x| {
            res ^ x.load_le::<usize>()
        });
        res & output_mask
    }
}


/// A table of per-branch local history registers, indexed by low PC bits.
#[derive(Clone, Debug)]
pub struct LocalHistoryTable {
    /// Local history patterns
    data: Vec<usize>,

    /// Number of bits in each pattern
    hist_bits: usize,
}
impl LocalHistoryTable {
    /// Create a table with `1 << pc_bits` registers of `hist_bits` bits.
    pub fn new(pc_bits: usize, hist_bits: usize) -> Self {
        Self {
            data: vec![0; 1 << pc_bits],
            hist_bits,
        }
    }

    /// Return the history pattern associated with this program counter.
    pub fn pattern(&self, pc: usize) -> usize {
        *self.get_entry(self.get_index(pc))
    }

    /// Shift a resolved outcome into the register for this program counter.
    pub fn advance(&mut self, pc: usize, outcome: Outcome) {
        let mask = low_mask(self.hist_bits);
        let idx = self.get_index(pc);
        let reg = self.get_entry_mut(idx);
        *reg = ((*reg << 1) | outcome as usize) & mask;
    }
}

impl PredictorTable for LocalHistoryTable {
    type Input<'a> = usize;
    type Entry = usize;

    fn size(&self) -> usize { self.data.len() }

    fn get_index(&self, pc: usize) -> usize {
        pc & self.index_mask()
    }

    fn get_entry(&self, idx: usize) -> &usize {
        &self.data[idx & self.index_mask()]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut usize {
        let index = idx & self.index_mask();
        &mut self.data[index]
    }
}
