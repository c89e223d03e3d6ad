//! Binary classification metrics: confusion matrix and per-class report

use serde::Serialize;

/// Precision, recall and F1 for one class (or an average over classes)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Evaluation of predicted labels against the held-out labels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// `confusion[actual][predicted]`
    pub confusion: [[usize; 2]; 2],
    /// Indexed by label (0 = stays, 1 = churns)
    pub classes: [ClassMetrics; 2],
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

/// Compare true and predicted 0/1 labels. Labels above 1 are ignored.
pub fn evaluate(y_true: &[usize], y_pred: &[usize]) -> EvaluationReport {
    let mut confusion = [[0usize; 2]; 2];
    for (&actual, &predicted) in y_true.iter().zip(y_pred) {
        if actual < 2 && predicted < 2 {
            confusion[actual][predicted] += 1;
        }
    }

    let total: usize = confusion.iter().flatten().sum();
    let correct = confusion[0][0] + confusion[1][1];

    let classes = [class_metrics(&confusion, 0), class_metrics(&confusion, 1)];

    let macro_avg = ClassMetrics {
        precision: (classes[0].precision + classes[1].precision) / 2.0,
        recall: (classes[0].recall + classes[1].recall) / 2.0,
        f1: (classes[0].f1 + classes[1].f1) / 2.0,
        support: total,
    };

    let weighted = |f: fn(&ClassMetrics) -> f64| {
        ratio(
            classes.iter().map(|c| f(c) * c.support as f64).sum::<f64>(),
            total as f64,
        )
    };
    let weighted_avg = ClassMetrics {
        precision: weighted(|c| c.precision),
        recall: weighted(|c| c.recall),
        f1: weighted(|c| c.f1),
        support: total,
    };

    EvaluationReport {
        confusion,
        classes,
        accuracy: ratio(correct as f64, total as f64),
        macro_avg,
        weighted_avg,
    }
}

fn class_metrics(confusion: &[[usize; 2]; 2], class: usize) -> ClassMetrics {
    let other = 1 - class;
    let tp = confusion[class][class] as f64;
    let fp = confusion[other][class] as f64;
    let fn_ = confusion[class][other] as f64;

    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let f1 = ratio(2.0 * precision * recall, precision + recall);

    ClassMetrics {
        precision,
        recall,
        f1,
        support: confusion[class][0] + confusion[class][1],
    }
}

/// Division that yields 0.0 instead of NaN
fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}
