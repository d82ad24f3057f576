//! Per-example truth/prediction comparison

use super::metrics::check_paired;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Ground truth, prediction and whether they agree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRow {
    pub truth: usize,
    pub predicted: usize,
    pub correct: bool,
}

/// Lazy view pairing truth with predictions. Each [`iter`](Comparison::iter) call
/// starts a fresh pass in the original example order.
#[derive(Debug, Clone, Copy)]
pub struct Comparison<'a> {
    y_true: &'a [usize],
    y_pred: &'a [usize],
}

/// Pair each example's truth with its prediction
pub fn compare<'a>(y_true: &'a [usize], y_pred: &'a [usize]) -> Result<Comparison<'a>> {
    check_paired(y_true, y_pred)?;
    Ok(Comparison { y_true, y_pred })
}

impl<'a> Comparison<'a> {
    pub fn iter(&self) -> ComparisonIter<'a> {
        ComparisonIter {
            y_true: self.y_true,
            y_pred: self.y_pred,
            pos: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.y_true.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y_true.is_empty()
    }

    /// Positions and rows of the wrong predictions
    pub fn errors(&self) -> impl Iterator<Item = (usize, PredictionRow)> + 'a {
        self.iter().enumerate().filter(|(_, row)| !row.correct)
    }
}

impl<'a> IntoIterator for Comparison<'a> {
    type Item = PredictionRow;
    type IntoIter = ComparisonIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &Comparison<'a> {
    type Item = PredictionRow;
    type IntoIter = ComparisonIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over [`PredictionRow`]s
#[derive(Debug, Clone)]
pub struct ComparisonIter<'a> {
    y_true: &'a [usize],
    y_pred: &'a [usize],
    pos: usize,
}

impl Iterator for ComparisonIter<'_> {
    type Item = PredictionRow;

    fn next(&mut self) -> Option<PredictionRow> {
        let truth = *self.y_true.get(self.pos)?;
        let predicted = self.y_pred[self.pos];
        self.pos += 1;
        Some(PredictionRow {
            truth,
            predicted,
            correct: truth == predicted,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.y_true.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ComparisonIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_row_per_example_in_order() {
        let truth = [2, 0, 1];
        let pred = [2, 1, 1];
        let rows: Vec<PredictionRow> = compare(&truth, &pred).unwrap().iter().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], PredictionRow { truth: 2, predicted: 2, correct: true });
        assert_eq!(rows[1], PredictionRow { truth: 0, predicted: 1, correct: false });
        assert_eq!(rows[2].truth, 1);
    }

    #[test]
    fn test_restartable() {
        let truth = [0, 1, 1, 0];
        let pred = [0, 0, 1, 0];
        let cmp = compare(&truth, &pred).unwrap();
        let first: Vec<_> = cmp.iter().collect();
        let second: Vec<_> = (&cmp).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(cmp.iter().len(), 4);
    }

    #[test]
    fn test_errors() {
        let truth = [0, 1, 2, 2];
        let pred = [0, 2, 2, 1];
        let cmp = compare(&truth, &pred).unwrap();
        let positions: Vec<usize> = cmp.errors().map(|(i, _)| i).collect();
        assert_eq!(positions, vec![1, 3]);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(compare(&[0, 1], &[0]).is_err());
    }
}
