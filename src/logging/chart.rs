//! Text bar charts
use std::fmt;
use yansi::Paint;

/// Horizontal bar chart of values in `[0, max_value]`, one labelled bar per line.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    title: String,
    labels: Vec<String>,
    values: Vec<f64>,
    max_value: f64,
    width: usize,
}

impl BarChart {
    /// Chart of action selection probabilities with bars labelled `1 ..= N`.
    pub fn action_probabilities(probabilities: &[f64]) -> Self {
        Self {
            title: "Probability action".into(),
            labels: (1..=probabilities.len()).map(|i| i.to_string()).collect(),
            values: probabilities.to_vec(),
            max_value: 1.0,
            width: 50,
        }
    }

    /// Set the width in characters of a bar at `max_value`.
    #[must_use]
    pub const fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Number of whole cells filled by a value. Values outside `[0, max_value]` are clamped.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn bar_len(&self, value: f64) -> usize {
        if !value.is_finite() || self.max_value <= 0.0 {
            return 0;
        }
        let fraction = (value / self.max_value).clamp(0.0, 1.0);
        (fraction * self.width as f64).round() as usize
    }
}

impl fmt::Display for BarChart {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label_width = self.labels.iter().map(String::len).max().unwrap_or(0);
        writeln!(f, "{}", Paint::fixed(35, &self.title))?;
        for (label, &value) in self.labels.iter().zip(&self.values) {
            let filled = self.bar_len(value);
            writeln!(
                f,
                "{:>lw$} |{}{} {:.3}",
                label,
                Paint::fixed(111, "█".repeat(filled)),
                " ".repeat(self.width - filled),
                value,
                lw = label_width,
            )?;
        }
        Ok(())
    }
}
