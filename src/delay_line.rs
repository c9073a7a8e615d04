/// Fixed-capacity circular history of the most recent `N` samples.
///
/// New samples overwrite the oldest entry; the write position is internal
/// and never exposed. The line starts zero-filled, so reads before `N`
/// pushes see implicit leading silence. `N` must be at least 1.
#[derive(Debug, Clone)]
pub struct DelayLine<const N: usize> {
    slots: [f32; N],
    pos: usize,
}

impl<const N: usize> DelayLine<N> {
    pub fn new() -> Self {
        Self {
            slots: [0.0; N],
            pos: 0,
        }
    }

    /// Store a new sample, overwriting the oldest one
    pub fn push(&mut self, sample: f32) {
        self.slots[self.pos] = sample;
        self.pos += 1;
        if self.pos == N {
            self.pos = 0;
        }
    }

    /// Iterate the stored samples from newest to oldest.
    ///
    /// Walks the ring as two contiguous reverse ranges to avoid modulo
    /// arithmetic in per-sample inner loops.
    pub fn newest_first(&self) -> impl Iterator<Item = f32> + '_ {
        let newest = if self.pos == 0 { N - 1 } else { self.pos - 1 };
        self.slots[..=newest]
            .iter()
            .rev()
            .chain(self.slots[newest + 1..].iter().rev())
            .copied()
    }

    /// Zero the history without changing capacity
    pub fn clear(&mut self) {
        self.slots = [0.0; N];
        self.pos = 0;
    }

    /// Capacity of the line (the filter length it serves)
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for DelayLine<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_zero_filled() {
        let line = DelayLine::<4>::new();
        let values: Vec<f32> = line.newest_first().collect();
        assert_eq!(values, vec![0.0; 4]);
    }

    #[test]
    fn test_newest_first_order_before_wrap() {
        let mut line = DelayLine::<4>::new();
        line.push(1.0);
        line.push(2.0);
        line.push(3.0);
        let values: Vec<f32> = line.newest_first().collect();
        assert_eq!(values, vec![3.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_push_overwrites_oldest_after_wrap() {
        let mut line = DelayLine::<3>::new();
        for s in [1.0, 2.0, 3.0, 4.0, 5.0] {
            line.push(s);
        }
        let values: Vec<f32> = line.newest_first().collect();
        assert_eq!(values, vec![5.0, 4.0, 3.0]);
    }

    #[test]
    fn test_clear_restores_silence() {
        let mut line = DelayLine::<3>::new();
        line.push(7.0);
        line.push(8.0);
        line.clear();
        let values: Vec<f32> = line.newest_first().collect();
        assert_eq!(values, vec![0.0; 3]);
    }

    #[test]
    fn test_single_slot_line() {
        let mut line = DelayLine::<1>::new();
        line.push(1.0);
        line.push(2.0);
        let values: Vec<f32> = line.newest_first().collect();
        assert_eq!(values, vec![2.0]);
    }
}
