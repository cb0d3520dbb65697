//! Sample series over a segment, optionally led by a carried-over sample.
//!
//! A continuation is processed as if the previous segment's final sample
//! were prepended: same bin, zero weight, and a population row that is zero
//! everywhere except the carried bin. The leading sample is synthesised on
//! access rather than copied into new arrays.

use wt_common::{BinIndex, Segment};

use super::state::Cursor;

pub(crate) struct SampleSeries<'a> {
    carried: Option<Cursor>,
    segment: &'a Segment,
    start: u64,
}

impl<'a> SampleSeries<'a> {
    /// A fresh trajectory: timepoints start at 0.
    pub(crate) fn fresh(segment: &'a Segment) -> Self {
        SampleSeries {
            carried: None,
            segment,
            start: 0,
        }
    }

    /// A continuation: index 0 is the carried sample at `cursor.timepoint`.
    pub(crate) fn continued(cursor: Cursor, segment: &'a Segment) -> Self {
        SampleSeries {
            carried: Some(cursor),
            segment,
            start: cursor.timepoint,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.segment.len() + usize::from(self.carried.is_some())
    }

    pub(crate) fn timepoint(&self, index: usize) -> u64 {
        self.start + index as u64
    }

    pub(crate) fn bin(&self, index: usize) -> BinIndex {
        match (self.carried, index) {
            (Some(c), 0) => c.bin,
            (Some(_), i) => self.segment.assignments[i - 1],
            (None, i) => self.segment.assignments[i],
        }
    }

    pub(crate) fn weight(&self, index: usize) -> f64 {
        match (self.carried, index) {
            (Some(_), 0) => 0.0,
            (Some(_), i) => self.segment.weights[i - 1],
            (None, i) => self.segment.weights[i],
        }
    }

    /// Total weight in `bin` at sample `index`.
    pub(crate) fn population(&self, index: usize, bin: BinIndex) -> f64 {
        match (self.carried, index) {
            (Some(c), 0) if c.bin == bin => c.bin_population,
            (Some(_), 0) => 0.0,
            (Some(_), i) => self.segment.bin_populations[i - 1][bin as usize],
            (None, i) => self.segment.bin_populations[i][bin as usize],
        }
    }

    /// Cursor describing the last sample, if any.
    pub(crate) fn final_cursor(&self) -> Option<Cursor> {
        let last = self.len().checked_sub(1)?;
        let bin = self.bin(last);
        Some(Cursor {
            timepoint: self.timepoint(last),
            bin,
            bin_population: self.population(last, bin),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment() -> Segment {
        Segment::new(
            1,
            vec![2, 0],
            vec![0.3, 0.4],
            vec![vec![0.1, 0.0, 0.9], vec![0.6, 0.0, 0.4]],
        )
    }

    #[test]
    fn test_fresh_series_indexes_segment() {
        let seg = segment();
        let series = SampleSeries::fresh(&seg);
        assert_eq!(series.len(), 2);
        assert_eq!(series.timepoint(1), 1);
        assert_eq!(series.bin(0), 2);
        assert_eq!(series.weight(1), 0.4);
        assert_eq!(series.population(0, 2), 0.9);
    }

    #[test]
    fn test_continued_series_prepends_carried_sample() {
        let seg = segment();
        let cursor = Cursor {
            timepoint: 10,
            bin: 1,
            bin_population: 0.7,
        };
        let series = SampleSeries::continued(cursor, &seg);
        assert_eq!(series.len(), 3);
        assert_eq!(series.timepoint(0), 10);
        assert_eq!(series.timepoint(2), 12);
        assert_eq!(series.bin(0), 1);
        assert_eq!(series.weight(0), 0.0);
        assert_eq!(series.population(0, 1), 0.7);
        assert_eq!(series.population(0, 0), 0.0);
        assert_eq!(series.bin(1), 2);
        assert_eq!(series.weight(2), 0.4);
    }

    #[test]
    fn test_final_cursor() {
        let seg = segment();
        let series = SampleSeries::fresh(&seg);
        assert_eq!(
            series.final_cursor(),
            Some(Cursor {
                timepoint: 1,
                bin: 0,
                bin_population: 0.6
            })
        );

        let empty = Segment::new(0, vec![], vec![], vec![]);
        assert_eq!(SampleSeries::fresh(&empty).final_cursor(), None);
    }
}
