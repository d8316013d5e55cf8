//! Random processes driving vehicle arrivals and service times.
//!
//! All draws come from a single seeded RNG owned by the run, so identical
//! (seed, configuration) pairs reproduce identical event sequences. Invalid
//! distribution parameters are rejected at configuration-validation time and
//! never mid-run.

use super::error::SimulationError;
use super::types::FuelTypeId;
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Exp, Triangular, Uniform};
use serde::{Deserialize, Serialize};

/// A probability distribution over non-negative durations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DurationDistribution {
    /// Exponential with the given rate (events per unit time); mean = 1/rate
    Exponential { rate: f64 },
    /// Uniform over the closed interval [low, high]
    Uniform { low: f64, high: f64 },
    /// Triangular with the given minimum, most-likely, and maximum values
    Triangular { min: f64, mode: f64, max: f64 },
    /// Always the same value
    Constant { value: f64 },
    /// Uniform resample from a set of observed durations
    Empirical { samples: Vec<f64> },
    /// Deterministic cycle through the given values, for trace-driven runs
    Sequence { values: Vec<f64> },
}

impl DurationDistribution {
    /// Validate parameters, naming the offending field in the error.
    ///
    /// `context` identifies where the distribution sits in the configuration
    /// (e.g. "fuel type 'Diesel' interarrival").
    pub fn validate(&self, context: &str) -> Result<(), SimulationError> {
        let fail = |msg: String| Err(SimulationError::Configuration(msg));
        match self {
            DurationDistribution::Exponential { rate } => {
                if !rate.is_finite() || *rate <= 0.0 {
                    return fail(format!("{}: exponential rate must be positive, got {}", context, rate));
                }
            }
            DurationDistribution::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() || *low < 0.0 || high < low {
                    return fail(format!(
                        "{}: uniform bounds must satisfy 0 <= low <= high, got [{}, {}]",
                        context, low, high
                    ));
                }
            }
            DurationDistribution::Triangular { min, mode, max } => {
                let ordered = *min >= 0.0 && min <= mode && mode <= max && min < max;
                if !min.is_finite() || !mode.is_finite() || !max.is_finite() || !ordered {
                    return fail(format!(
                        "{}: triangular parameters must satisfy 0 <= min <= mode <= max and min < max, got ({}, {}, {})",
                        context, min, mode, max
                    ));
                }
            }
            DurationDistribution::Constant { value } => {
                if !value.is_finite() || *value < 0.0 {
                    return fail(format!("{}: constant duration must be non-negative, got {}", context, value));
                }
            }
            DurationDistribution::Empirical { samples } => {
                if samples.is_empty() {
                    return fail(format!("{}: empirical distribution needs at least one sample", context));
                }
                if samples.iter().any(|s| !s.is_finite() || *s < 0.0) {
                    return fail(format!("{}: empirical samples must be non-negative", context));
                }
            }
            DurationDistribution::Sequence { values } => {
                if values.is_empty() {
                    return fail(format!("{}: sequence needs at least one value", context));
                }
                if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                    return fail(format!("{}: sequence values must be non-negative", context));
                }
            }
        }
        Ok(())
    }

    /// True when every draw from this distribution is exactly zero.
    ///
    /// An interarrival distribution with no mass above zero would make the
    /// arrival chain reschedule itself at the current instant forever, so
    /// configuration validation rejects it. Zero values inside a mixed
    /// `Sequence` or `Empirical` set stay legal.
    pub fn is_always_zero(&self) -> bool {
        match self {
            DurationDistribution::Exponential { .. } => false,
            DurationDistribution::Uniform { low, high } => *low == 0.0 && *high == 0.0,
            // a valid triangular has min < max
            DurationDistribution::Triangular { .. } => false,
            DurationDistribution::Constant { value } => *value == 0.0,
            DurationDistribution::Empirical { samples } => samples.iter().all(|s| *s == 0.0),
            DurationDistribution::Sequence { values } => values.iter().all(|v| *v == 0.0),
        }
    }

    /// Build the stateful sampler for this distribution
    pub(crate) fn sampler(&self, context: &str) -> Result<DurationSampler, SimulationError> {
        self.validate(context)?;
        let kind = match self {
            DurationDistribution::Exponential { rate } => {
                let dist = Exp::new(*rate).map_err(|e| {
                    SimulationError::Configuration(format!("{}: {:?}", context, e))
                })?;
                SamplerKind::Exponential(dist)
            }
            DurationDistribution::Uniform { low, high } => {
                SamplerKind::Uniform(Uniform::new_inclusive(*low, *high))
            }
            DurationDistribution::Triangular { min, mode, max } => {
                let dist = Triangular::new(*min, *max, *mode).map_err(|e| {
                    SimulationError::Configuration(format!("{}: {:?}", context, e))
                })?;
                SamplerKind::Triangular(dist)
            }
            DurationDistribution::Constant { value } => SamplerKind::Constant(*value),
            DurationDistribution::Empirical { samples } => SamplerKind::Empirical(samples.clone()),
            DurationDistribution::Sequence { values } => SamplerKind::Sequence {
                values: values.clone(),
                cursor: 0,
            },
        };
        Ok(DurationSampler { kind })
    }
}

enum SamplerKind {
    Exponential(Exp<f64>),
    Uniform(Uniform<f64>),
    Triangular(Triangular<f64>),
    Constant(f64),
    Empirical(Vec<f64>),
    Sequence { values: Vec<f64>, cursor: usize },
}

/// Stateful sampler for one configured distribution.
pub(crate) struct DurationSampler {
    kind: SamplerKind,
}

impl DurationSampler {
    pub(crate) fn sample(&mut self, rng: &mut StdRng) -> f64 {
        match &mut self.kind {
            SamplerKind::Exponential(dist) => rng.sample(*dist),
            SamplerKind::Uniform(dist) => rng.sample(*dist),
            SamplerKind::Triangular(dist) => rng.sample(*dist),
            SamplerKind::Constant(value) => *value,
            SamplerKind::Empirical(samples) => {
                let index = rng.gen_range(0..samples.len());
                samples[index]
            }
            SamplerKind::Sequence { values, cursor } => {
                let value = values[*cursor % values.len()];
                *cursor += 1;
                value
            }
        }
    }
}

/// How service time is produced for a fuel type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServiceTimeSpec {
    /// Draw the whole service duration from one distribution
    Duration(DurationDistribution),
    /// Physical refueling model: liters drawn from a distribution and
    /// dispensed at a fixed flow rate, plus a payment-time draw
    Refueling {
        liters: DurationDistribution,
        flow_rate: f64,
        payment: DurationDistribution,
    },
}

impl ServiceTimeSpec {
    pub fn validate(&self, context: &str) -> Result<(), SimulationError> {
        match self {
            ServiceTimeSpec::Duration(dist) => dist.validate(context),
            ServiceTimeSpec::Refueling {
                liters,
                flow_rate,
                payment,
            } => {
                liters.validate(&format!("{} liters", context))?;
                payment.validate(&format!("{} payment", context))?;
                if !flow_rate.is_finite() || *flow_rate <= 0.0 {
                    return Err(SimulationError::Configuration(format!(
                        "{}: flow rate must be positive, got {}",
                        context, flow_rate
                    )));
                }
                Ok(())
            }
        }
    }

    fn sampler(&self, context: &str) -> Result<ServiceSampler, SimulationError> {
        match self {
            ServiceTimeSpec::Duration(dist) => Ok(ServiceSampler::Plain(dist.sampler(context)?)),
            ServiceTimeSpec::Refueling {
                liters,
                flow_rate,
                payment,
            } => {
                self.validate(context)?;
                Ok(ServiceSampler::Refueling {
                    liters: liters.sampler(&format!("{} liters", context))?,
                    flow_rate: *flow_rate,
                    payment: payment.sampler(&format!("{} payment", context))?,
                })
            }
        }
    }
}

enum ServiceSampler {
    Plain(DurationSampler),
    Refueling {
        liters: DurationSampler,
        flow_rate: f64,
        payment: DurationSampler,
    },
}

impl ServiceSampler {
    fn sample(&mut self, rng: &mut StdRng) -> f64 {
        match self {
            ServiceSampler::Plain(sampler) => sampler.sample(rng),
            ServiceSampler::Refueling {
                liters,
                flow_rate,
                payment,
            } => liters.sample(rng) / *flow_rate + payment.sample(rng),
        }
    }
}

/// Per-fuel-type random process generators backed by one seeded RNG.
pub(crate) struct RandomProcesses {
    rng: StdRng,
    arrivals: Vec<DurationSampler>,
    services: Vec<ServiceSampler>,
}

impl RandomProcesses {
    pub(crate) fn new(
        seed: u64,
        fuel_types: &[(String, DurationDistribution, ServiceTimeSpec)],
    ) -> Result<Self, SimulationError> {
        use rand::SeedableRng;

        let mut arrivals = Vec::with_capacity(fuel_types.len());
        let mut services = Vec::with_capacity(fuel_types.len());
        for (name, interarrival, service_time) in fuel_types {
            arrivals.push(interarrival.sampler(&format!("fuel type '{}' interarrival", name))?);
            services.push(service_time.sampler(&format!("fuel type '{}' service time", name))?);
        }

        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            arrivals,
            services,
        })
    }

    /// Draw the time until the next arrival of the given fuel type
    pub(crate) fn next_interarrival(&mut self, fuel: FuelTypeId) -> f64 {
        self.arrivals[fuel.index()].sample(&mut self.rng)
    }

    /// Draw a service duration for the given fuel type
    pub(crate) fn next_service_time(&mut self, fuel: FuelTypeId) -> f64 {
        self.services[fuel.index()].sample(&mut self.rng)
    }
}
