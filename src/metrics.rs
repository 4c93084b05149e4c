//! Samples produced by a collection cycle and their Prometheus rendering.
//!
//! A cycle yields an ordered list of [`Sample`]s: gauges interleaved with
//! invalid-metric markers. [`encode`] turns that list into the text
//! exposition format through a registry that lives for one cycle only.

use crate::collector;
use crate::error::{Result, SansayError};
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Name under which scrape-time failures are reported.
pub const ERROR_METRIC: &str = "sansay_error";

/// One gauge value.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeSample {
    pub name: String,
    pub help: String,
    pub labels: Vec<(&'static str, String)>,
    pub value: f64,
}

/// One entry emitted by a collection cycle.
#[derive(Debug)]
pub enum Sample {
    Gauge(GaugeSample),
    /// Invalid-metric marker carrying the error that replaced a value
    Invalid(SansayError),
}

impl Sample {
    pub fn gauge(name: impl Into<String>, help: impl Into<String>, value: f64) -> Self {
        Sample::Gauge(GaugeSample {
            name: name.into(),
            help: help.into(),
            labels: Vec::new(),
            value,
        })
    }

    pub fn labelled_gauge(
        name: impl Into<String>,
        help: impl Into<String>,
        labels: Vec<(&'static str, String)>,
        value: f64,
    ) -> Self {
        Sample::Gauge(GaugeSample {
            name: name.into(),
            help: help.into(),
            labels,
            value,
        })
    }

    pub fn invalid(error: impl Into<SansayError>) -> Self {
        Sample::Invalid(error.into())
    }

    /// Metric name; markers all share [`ERROR_METRIC`].
    pub fn name(&self) -> &str {
        match self {
            Sample::Gauge(gauge) => &gauge.name,
            Sample::Invalid(_) => ERROR_METRIC,
        }
    }

    pub fn as_gauge(&self) -> Option<&GaugeSample> {
        match self {
            Sample::Gauge(gauge) => Some(gauge),
            Sample::Invalid(_) => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Sample::Invalid(_))
    }
}

/// The error that ended a cycle before projection, if any.
pub fn cycle_error(samples: &[Sample]) -> Option<&SansayError> {
    samples.iter().find_map(|sample| match sample {
        Sample::Invalid(e @ (SansayError::Fetch(_) | SansayError::Parse(_))) => Some(e),
        _ => None,
    })
}

/// The gauges of one finished cycle, exposed to a registry as a single
/// collector described by [`collector::describe`].
struct CycleSnapshot {
    desc: Desc,
    families: Vec<(GaugeVec, Vec<&'static str>)>,
}

impl CycleSnapshot {
    fn build(samples: &[Sample], desc: Desc) -> Self {
        let mut snapshot = CycleSnapshot {
            desc,
            families: Vec::new(),
        };
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut seen: HashSet<(&str, Vec<&str>)> = HashSet::new();

        // Markers are counted into a gauge that no document field can shadow.
        let errors = GaugeVec::new(
            Opts::new(
                ERROR_METRIC,
                "Number of values that could not be scraped in this cycle",
            ),
            &[],
        );
        match errors {
            Ok(errors) => {
                errors
                    .with_label_values::<&str>(&[])
                    .set(samples.iter().filter(|s| s.is_invalid()).count() as f64);
                snapshot.families.push((errors, Vec::new()));
                index.insert(ERROR_METRIC, 0);
                seen.insert((ERROR_METRIC, Vec::new()));
            }
            Err(e) => warn!("Dropping gauge {}: {}", ERROR_METRIC, e),
        }

        for sample in samples {
            let gauge = match sample {
                Sample::Gauge(gauge) => gauge,
                Sample::Invalid(err) => {
                    warn!(metric = ERROR_METRIC, "Invalid metric: {}", err);
                    continue;
                }
            };

            let label_names: Vec<&'static str> = gauge.labels.iter().map(|(n, _)| *n).collect();
            let label_values: Vec<&str> = gauge.labels.iter().map(|(_, v)| v.as_str()).collect();

            let slot = match index.get(gauge.name.as_str()) {
                Some(&slot) => slot,
                None => match GaugeVec::new(Opts::new(&gauge.name, &gauge.help), &label_names) {
                    Ok(vec) => {
                        snapshot.families.push((vec, label_names.clone()));
                        index.insert(&gauge.name, snapshot.families.len() - 1);
                        snapshot.families.len() - 1
                    }
                    Err(e) => {
                        warn!("Dropping gauge {}: {}", gauge.name, e);
                        continue;
                    }
                },
            };

            let (vec, known_labels) = &snapshot.families[slot];
            if *known_labels != label_names {
                warn!(
                    "Dropping gauge {}: labels {:?} conflict with {:?}",
                    gauge.name, label_names, known_labels
                );
                continue;
            }
            if !seen.insert((gauge.name.as_str(), label_values.clone())) {
                debug!("Duplicate gauge {} {:?} ignored", gauge.name, label_values);
                continue;
            }

            match vec.get_metric_with_label_values(&label_values) {
                Ok(metric) => metric.set(gauge.value),
                Err(e) => warn!("Dropping gauge {}: {}", gauge.name, e),
            }
        }

        snapshot
    }
}

impl Collector for CycleSnapshot {
    fn desc(&self) -> Vec<&Desc> {
        vec![&self.desc]
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.families
            .iter()
            .flat_map(|(vec, _)| vec.collect())
            .collect()
    }
}

/// Encode one cycle's samples in Prometheus text format.
///
/// Gauges are rendered and invalid-metric markers are logged and counted
/// into `sansay_error`, so the scraper still receives every value that could
/// be read.
pub fn encode(samples: &[Sample]) -> Result<String> {
    let snapshot = CycleSnapshot::build(samples, collector::describe()?);

    let registry = Registry::new();
    registry.register(Box::new(snapshot))?;

    let mut buffer = Vec::with_capacity(4096);
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;

    String::from_utf8(buffer)
        .map_err(|e| SansayError::Metrics(prometheus::Error::Msg(e.to_string())))
}
