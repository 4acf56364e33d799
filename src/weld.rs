use crate::types::{Offcut, StockBar, WeldMethod, WeldPiece};

/// Tolerance band for matching a weld assembly against a target length.
/// Longer targets get a wider band; relative dimensional error matters
/// less at scale.
pub fn adaptive_tolerance(target_length: u32) -> u32 {
    if target_length <= 1000 {
        50
    } else if target_length <= 3000 {
        100
    } else if target_length <= 6000 {
        150
    } else {
        200
    }
}

#[derive(Debug, Clone)]
pub struct WeldCandidate {
    pub indices: Vec<usize>,
    pub actual_length: u32,
    pub tolerance_delta: i32,
    pub method: WeldMethod,
}

#[derive(Debug, Clone, Default)]
pub struct OffcutPool {
    offcuts: Vec<Offcut>,
}

impl OffcutPool {
    /// One offcut per bar whose leftover clears the minimum; names are
    /// positional ("F3" comes from the third bar), so the numbering can
    /// have gaps.
    pub fn collect(bars: &[StockBar], min_fire_length: u32) -> Self {
        let mut offcuts = Vec::new();
        for (index, bar) in bars.iter().enumerate() {
            if bar.remaining_length >= min_fire_length {
                offcuts.push(Offcut {
                    name: format!("F{}", index + 1),
                    length: bar.remaining_length,
                    source_bar_index: index,
                    consumed: false,
                });
            }
        }
        Self { offcuts }
    }

    pub fn offcuts(&self) -> &[Offcut] {
        &self.offcuts
    }

    pub fn into_offcuts(self) -> Vec<Offcut> {
        self.offcuts
    }

    /// First pair, then (above 6000mm targets) first triple of unconsumed
    /// offcuts whose joined length lands within tolerance of the target.
    /// First match wins — iteration order is fixed, so results are
    /// reproducible even though the residual is not guaranteed minimal.
    pub fn find_assembly(&self, target_length: u32, weld_loss: u32) -> Option<WeldCandidate> {
        if let Some(candidate) = self.find_double(target_length, weld_loss) {
            return Some(candidate);
        }
        if target_length > 6000 {
            return self.find_triple(target_length, weld_loss);
        }
        None
    }

    fn find_double(&self, target_length: u32, weld_loss: u32) -> Option<WeldCandidate> {
        let tolerance = adaptive_tolerance(target_length) as i64;
        for i in 0..self.offcuts.len() {
            if self.offcuts[i].consumed {
                continue;
            }
            for j in (i + 1)..self.offcuts.len() {
                if self.offcuts[j].consumed {
                    continue;
                }
                let candidate = self.offcuts[i].length as i64 + self.offcuts[j].length as i64
                    - weld_loss as i64;
                let delta = candidate - target_length as i64;
                if candidate > 0 && delta.abs() <= tolerance {
                    return Some(WeldCandidate {
                        indices: vec![i, j],
                        actual_length: candidate as u32,
                        tolerance_delta: delta as i32,
                        method: WeldMethod::Double,
                    });
                }
            }
        }
        None
    }

    fn find_triple(&self, target_length: u32, weld_loss: u32) -> Option<WeldCandidate> {
        let tolerance = adaptive_tolerance(target_length) as i64;
        for i in 0..self.offcuts.len() {
            if self.offcuts[i].consumed {
                continue;
            }
            for j in (i + 1)..self.offcuts.len() {
                if self.offcuts[j].consumed {
                    continue;
                }
                for k in (j + 1)..self.offcuts.len() {
                    if self.offcuts[k].consumed {
                        continue;
                    }
                    // Two seams for three pieces.
                    let candidate = self.offcuts[i].length as i64
                        + self.offcuts[j].length as i64
                        + self.offcuts[k].length as i64
                        - 2 * weld_loss as i64;
                    let delta = candidate - target_length as i64;
                    if candidate > 0 && delta.abs() <= tolerance {
                        return Some(WeldCandidate {
                            indices: vec![i, j, k],
                            actual_length: candidate as u32,
                            tolerance_delta: delta as i32,
                            method: WeldMethod::Triple,
                        });
                    }
                }
            }
        }
        None
    }

    /// Marks the candidate's offcuts consumed and returns them as weld
    /// pieces, in enumeration order.
    pub fn consume(&mut self, candidate: &WeldCandidate) -> Vec<WeldPiece> {
        candidate
            .indices
            .iter()
            .map(|&i| {
                let offcut = &mut self.offcuts[i];
                offcut.consumed = true;
                WeldPiece {
                    name: offcut.name.clone(),
                    length: offcut.length,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(id: u32, remaining_length: u32) -> StockBar {
        StockBar {
            id,
            cuts: vec![],
            remaining_length,
            efficiency_percent: 0,
        }
    }

    #[test]
    fn test_tolerance_bands() {
        assert_eq!(adaptive_tolerance(500), 50);
        assert_eq!(adaptive_tolerance(1000), 50);
        assert_eq!(adaptive_tolerance(1001), 100);
        assert_eq!(adaptive_tolerance(3000), 100);
        assert_eq!(adaptive_tolerance(3001), 150);
        assert_eq!(adaptive_tolerance(6000), 150);
        assert_eq!(adaptive_tolerance(6001), 200);
        assert_eq!(adaptive_tolerance(12000), 200);
    }

    #[test]
    fn test_collect_filters_below_minimum() {
        let bars = vec![bar(1, 4500), bar(2, 80), bar(3, 100), bar(4, 0)];
        let pool = OffcutPool::collect(&bars, 100);
        let names: Vec<&str> = pool.offcuts().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["F1", "F3"]);
        assert_eq!(pool.offcuts()[0].source_bar_index, 0);
        assert_eq!(pool.offcuts()[1].source_bar_index, 2);
        assert!(pool.offcuts().iter().all(|o| o.length >= 100));
    }

    #[test]
    fn test_double_exact_match() {
        // Two 6000mm leftovers joined with a 10mm seam hit 11990 exactly.
        let pool = OffcutPool::collect(&[bar(1, 6000), bar(2, 6000)], 100);
        let candidate = pool.find_assembly(11990, 10).expect("double weld");
        assert_eq!(candidate.method, WeldMethod::Double);
        assert_eq!(candidate.actual_length, 11990);
        assert_eq!(candidate.tolerance_delta, 0);
        assert_eq!(candidate.indices, vec![0, 1]);
    }

    #[test]
    fn test_double_within_tolerance() {
        // 3100 + 3000 - 10 = 6090, target 6000, band 150.
        let pool = OffcutPool::collect(&[bar(1, 3100), bar(2, 3000)], 100);
        let candidate = pool.find_assembly(6000, 10).expect("double weld");
        assert_eq!(candidate.actual_length, 6090);
        assert_eq!(candidate.tolerance_delta, 90);
    }

    #[test]
    fn test_double_outside_tolerance() {
        // 4500 + 4500 - 10 = 8990, target 7500, band 200: no match, and
        // triples need a third offcut.
        let pool = OffcutPool::collect(&[bar(1, 4500), bar(2, 4500)], 100);
        assert!(pool.find_assembly(7500, 10).is_none());
    }

    #[test]
    fn test_first_match_not_best_match() {
        // Both (F1,F2) and (F1,F3) are in tolerance; pool order decides,
        // even though (F1,F3) would have the smaller residual.
        let pool = OffcutPool::collect(&[bar(1, 3000), bar(2, 3060), bar(3, 3010)], 100);
        let candidate = pool.find_assembly(6000, 10).expect("double weld");
        assert_eq!(candidate.indices, vec![0, 1]);
        assert_eq!(candidate.tolerance_delta, 50);
    }

    #[test]
    fn test_no_triple_at_or_below_6000() {
        // 2000 + 2000 + 2020 - 20 = 6000 would match, but triples are only
        // tried above 6000mm.
        let pool = OffcutPool::collect(&[bar(1, 2000), bar(2, 2000), bar(3, 2020)], 100);
        assert!(pool.find_assembly(6000, 10).is_none());
    }

    #[test]
    fn test_triple_above_6000() {
        // No pair reaches 12000 within 200, but all three do:
        // 4000 + 4000 + 4010 - 20 = 11990.
        let pool = OffcutPool::collect(&[bar(1, 4000), bar(2, 4000), bar(3, 4010)], 100);
        let candidate = pool.find_assembly(12000, 10).expect("triple weld");
        assert_eq!(candidate.method, WeldMethod::Triple);
        assert_eq!(candidate.actual_length, 11990);
        assert_eq!(candidate.tolerance_delta, -10);
        assert_eq!(candidate.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_consumed_offcuts_are_excluded() {
        let mut pool = OffcutPool::collect(&[bar(1, 6000), bar(2, 6000), bar(3, 5000)], 100);
        let first = pool.find_assembly(11990, 10).expect("first weld");
        let pieces = pool.consume(&first);
        assert_eq!(pieces.len(), 2);
        assert!(pool.offcuts()[0].consumed);
        assert!(pool.offcuts()[1].consumed);
        // Only F3 is left; no pair can form.
        assert!(pool.find_assembly(11990, 10).is_none());
    }

    #[test]
    fn test_consume_returns_pieces_in_order() {
        let mut pool = OffcutPool::collect(&[bar(1, 5000), bar(2, 5000)], 100);
        let candidate = pool.find_assembly(9990, 10).expect("double weld");
        let pieces = pool.consume(&candidate);
        assert_eq!(pieces[0].name, "F1");
        assert_eq!(pieces[1].name, "F2");
        assert_eq!(pieces.iter().map(|p| p.length).sum::<u32>(), 10000);
    }

    #[test]
    fn test_empty_pool() {
        let pool = OffcutPool::collect(&[], 100);
        assert!(pool.offcuts().is_empty());
        assert!(pool.find_assembly(5000, 10).is_none());
    }
}
