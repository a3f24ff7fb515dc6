//! Periodic training status
use std::fmt;

/// Status of a single training iteration, displayed as a fixed five-line block.
///
/// ```text
///
/// ======episode 100 ======
/// probability 0.25
/// action 3
/// reward 1.2
/// loss 1.66
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusReport {
    pub iteration: u64,
    /// Probability the policy assigned to the selected action.
    pub probability: f64,
    pub action: usize,
    pub reward: f64,
    pub loss: f64,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "======episode {} ======", self.iteration)?;
        writeln!(f, "probability {}", self.probability)?;
        writeln!(f, "action {}", self.action)?;
        writeln!(f, "reward {}", self.reward)?;
        write!(f, "loss {}", self.loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let report = StatusReport {
            iteration: 100,
            probability: 0.25,
            action: 3,
            reward: 1.5,
            loss: -0.5,
        };
        assert_eq!(
            report.to_string(),
            "\n======episode 100 ======\nprobability 0.25\naction 3\nreward 1.5\nloss -0.5"
        );
    }

    #[test]
    fn display_five_lines_after_blank() {
        let report = StatusReport {
            iteration: 0,
            probability: 1.0,
            action: 0,
            reward: 0.0,
            loss: 0.0,
        };
        let text = report.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].is_empty());
        assert_eq!(lines[1], "======episode 0 ======");
    }
}
