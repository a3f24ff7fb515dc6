//! Command-line logger
use super::{Event, LogError, Loggable, Logger};
use crate::utils::stats::OnlineMeanVariance;
use enum_map::{enum_map, EnumMap};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;
use yansi::Paint;

/// Logger that writes windowed summaries to standard output.
///
/// Values are aggregated per event and name.
/// A summary of everything logged since the previous summary is displayed each time a
/// [`Event::Report`] completes, and once more when the logger is dropped.
pub struct CLILogger {
    events: EnumMap<Event, EventLog>,
    last_display_time: Instant,
}

impl Default for CLILogger {
    fn default() -> Self {
        Self::new()
    }
}

impl CLILogger {
    pub fn new() -> Self {
        Self {
            events: enum_map! { _ => EventLog::new() },
            last_display_time: Instant::now(),
        }
    }

    /// Write the summary and clear all aggregated data.
    pub fn write_summary<W: fmt::Write>(&mut self, out: &mut W) -> fmt::Result {
        let elapsed = self.last_display_time.elapsed();
        for (event, event_log) in &mut self.events {
            let summary_size = event_log.index - event_log.summary_start_index;
            if summary_size == 0 {
                continue;
            }

            writeln!(
                out,
                "==== {:?}s {} - {} ({:?} / event) ====",
                event,
                event_log.summary_start_index,
                event_log.index - 1,
                elapsed / u32::try_from(summary_size).unwrap_or(u32::MAX),
            )?;

            for (name, aggregator) in &mut event_log.aggregators {
                writeln!(out, "{:<16} {}", Paint::fixed(35, name), aggregator)?;
                aggregator.clear();
            }
            event_log.summary_start_index = event_log.index;
        }
        self.last_display_time = Instant::now();
        Ok(())
    }

    /// Display the summary and clear all aggregated data.
    pub fn display(&mut self) {
        let mut summary = String::new();
        // Writing to a String cannot fail
        let _ = self.write_summary(&mut summary);
        if !summary.is_empty() {
            println!();
            print!("{}", summary);
        }
    }
}

impl Logger for CLILogger {
    fn log(&mut self, event: Event, name: &str, value: Loggable) -> Result<(), LogError> {
        let aggregators = &mut self.events[event].aggregators;
        if let Some(aggregator) = aggregators.get_mut(name) {
            if let Err((value, expected)) = aggregator.update(value) {
                return Err(LogError::new(name, value, expected));
            }
        } else {
            aggregators.insert(name.into(), Aggregator::new(value));
        }
        Ok(())
    }

    fn done(&mut self, event: Event) {
        self.events[event].index += 1;
        if event == Event::Report {
            self.display();
        }
    }
}

impl Drop for CLILogger {
    fn drop(&mut self) {
        // Ensure everything is flushed.
        self.display();
    }
}

struct EventLog {
    /// Global index for this event
    index: u64,
    /// Value of `index` at the start of this summary period
    summary_start_index: u64,
    /// An aggregator for each log entry.
    aggregators: BTreeMap<String, Aggregator>,
}

impl EventLog {
    #[allow(clippy::missing_const_for_fn)] // BTreeMap const new not stabilized
    fn new() -> Self {
        Self {
            index: 0,
            summary_start_index: 0,
            aggregators: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Aggregator {
    /// Aggregates nothing
    Nothing,
    /// Mean and standard deviation of scalars
    ScalarMean(OnlineMeanVariance<f64>),
    /// Counts of sampled indices
    IndexDistribution(Vec<u64>),
}

impl Aggregator {
    /// Create a new aggregator from a logged value.
    fn new(value: Loggable) -> Self {
        let mut aggregator = match value {
            Loggable::Nothing => Self::Nothing,
            Loggable::Scalar(_) => Self::ScalarMean(OnlineMeanVariance::new()),
            Loggable::IndexSample { size, .. } => Self::IndexDistribution(vec![0; size]),
        };
        aggregator
            .update(value)
            .expect("aggregator is created to match the value");
        aggregator
    }

    /// Update an aggregator with a logged value.
    ///
    /// Returns Err((value, expected)) if the value is incompatible with this aggregator.
    fn update(&mut self, value: Loggable) -> Result<(), (Loggable, String)> {
        match (self, value) {
            (Self::Nothing, Loggable::Nothing) => {}
            (Self::ScalarMean(stats), Loggable::Scalar(x)) => stats.push(x),
            (Self::IndexDistribution(counts), Loggable::IndexSample { value, size })
                if size == counts.len() && value < size =>
            {
                counts[value] += 1
            }
            (aggregator, value) => return Err((value, aggregator.expected())),
        }
        Ok(())
    }

    /// Description of the values this aggregator accepts.
    fn expected(&self) -> String {
        match self {
            Self::Nothing => "Nothing".into(),
            Self::ScalarMean(_) => "Scalar".into(),
            Self::IndexDistribution(counts) => {
                format!("IndexSample {{ value: 0..{0}, size: {0} }}", counts.len())
            }
        }
    }

    /// Clear the aggregated values
    fn clear(&mut self) {
        match self {
            Self::Nothing => {}
            Self::ScalarMean(stats) => *stats = OnlineMeanVariance::new(),
            Self::IndexDistribution(counts) => counts.iter_mut().for_each(|c| *c = 0),
        }
    }
}

impl fmt::Display for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Nothing => Ok(()),
            Self::ScalarMean(stats) => {
                if stats.count() > 0 {
                    write!(f, "{:.3}", stats.mean())?;
                    if stats.count() > 1 {
                        write!(
                            f,
                            " {}",
                            Paint::fixed(8, format!("(σ {:.3})", stats.stddev()))
                        )?;
                    }
                }
                Ok(())
            }
            Self::IndexDistribution(counts) => {
                let n: u64 = counts.iter().sum();
                write!(f, "(n {})  [", n)?;
                for (i, c) in counts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    if n > 0 {
                        write!(f, "{:.2}", *c as f64 / n as f64)?;
                    } else {
                        write!(f, "-")?;
                    }
                }
                write!(f, "]")
            }
        }
    }
}
