//! Behavioral properties of the engine, exercised through the public API
//! only: `RunConfiguration` in, `RunStatistics` out.

use fuelsim::{
    run, DurationDistribution, FuelTypeConfig, RunConfiguration, ServiceTimeSpec,
    SimulationError,
};

fn exponential_service(rate: f64) -> ServiceTimeSpec {
    ServiceTimeSpec::Duration(DurationDistribution::Exponential { rate })
}

fn busy_station(seed: u64) -> RunConfiguration {
    RunConfiguration::new(480.0, seed)
        .with_fuel_type(FuelTypeConfig::poisson(
            "Octane92",
            2,
            8.0 / 60.0,
            exponential_service(0.1),
        ))
        .with_fuel_type(FuelTypeConfig::poisson(
            "Octane95",
            2,
            8.0 / 60.0,
            exponential_service(0.1),
        ))
        .with_fuel_type(FuelTypeConfig::poisson(
            "Diesel",
            4,
            4.0 / 60.0,
            exponential_service(0.05),
        ))
}

#[test]
fn test_identical_seeds_reproduce_identical_statistics() {
    let config = busy_station(42);
    let first = run(&config).unwrap();
    let second = run(&config).unwrap();

    assert_eq!(first, second);
    assert_eq!(format!("{:?}", first), format!("{:?}", second));
}

#[test]
fn test_different_seeds_diverge() {
    let first = run(&busy_station(42)).unwrap();
    let second = run(&busy_station(43)).unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_no_vehicle_is_lost_or_duplicated() {
    for seed in [1, 2, 3, 4, 5] {
        let stats = run(&busy_station(seed)).unwrap();
        assert_eq!(
            stats.overall.served + stats.overall.unfinished,
            stats.overall.arrived
        );
        for fuel in &stats.fuel_types {
            assert_eq!(fuel.served + fuel.unfinished, fuel.arrived);
        }
        assert_eq!(stats.completed.len() as u64, stats.overall.served);

        // No duplicated vehicle among the completed records
        let mut ids: Vec<u64> = stats.completed.iter().map(|r| r.vehicle.value()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len() as u64, stats.overall.served);
    }
}

#[test]
fn test_completed_timestamps_are_ordered() {
    let stats = run(&busy_station(7)).unwrap();
    assert!(stats.overall.served > 0);
    for record in &stats.completed {
        assert!(record.arrival_time <= record.service_start);
        assert!(record.service_start <= record.departure);
    }
}

#[test]
fn test_utilization_stays_within_bounds() {
    for seed in [11, 12, 13] {
        let config = busy_station(seed).with_attendants(3);
        let stats = run(&config).unwrap();
        for fuel in &stats.fuel_types {
            assert!(
                (0.0..=1.0).contains(&fuel.utilization),
                "{} utilization {} out of bounds",
                fuel.name,
                fuel.utilization
            );
        }
        let attendant = stats.attendant_utilization.unwrap();
        assert!((0.0..=1.0).contains(&attendant));
    }
}

#[test]
fn test_ample_capacity_yields_zero_wait() {
    // Arrivals strictly slower than service on a many-pump island: nobody
    // ever queues.
    let config = RunConfiguration::new(480.0, 21)
        .with_fuel_type(FuelTypeConfig {
            name: "Octane92".to_string(),
            pump_count: 50,
            interarrival: DurationDistribution::Constant { value: 2.0 },
            service_time: ServiceTimeSpec::Duration(DurationDistribution::Uniform {
                low: 0.5,
                high: 1.5,
            }),
        })
        .with_drain_on_horizon(true);
    let stats = run(&config).unwrap();

    assert!(stats.overall.served > 0);
    for record in &stats.completed {
        assert_eq!(record.arrival_time, record.service_start);
    }
    let fuel = &stats.fuel_types[0];
    assert_eq!(fuel.mean_wait, 0.0);
    assert_eq!(fuel.max_wait, 0.0);
    assert_eq!(fuel.mean_queue_length, 0.0);
}

#[test]
fn test_simultaneous_arrivals_on_one_pump_wait_exactly_one_service() {
    // Two vehicles at t = 0 on a single pump: FCFS, the second one's wait
    // equals the first one's service duration exactly.
    let config = RunConfiguration::new(60.0, 5)
        .with_fuel_type(FuelTypeConfig {
            name: "Diesel".to_string(),
            pump_count: 1,
            interarrival: DurationDistribution::Sequence {
                values: vec![0.0, 0.0, 1.0e9],
            },
            service_time: ServiceTimeSpec::Duration(DurationDistribution::Constant {
                value: 12.5,
            }),
        })
        .with_drain_on_horizon(true);
    let stats = run(&config).unwrap();

    assert_eq!(stats.overall.arrived, 2);
    assert_eq!(stats.overall.served, 2);

    let mut records = stats.completed.clone();
    records.sort_by(|a, b| a.vehicle.cmp(&b.vehicle));
    let first_service = records[0].departure - records[0].service_start;
    let second_wait = records[1].service_start - records[1].arrival_time;
    assert_eq!(records[0].service_start, 0.0);
    assert_eq!(second_wait, first_service);
    assert_eq!(second_wait, 12.5);
}

#[test]
fn test_zero_interarrival_is_rejected_instead_of_spinning() {
    // An arrival chain whose gaps are all zero would reschedule itself at
    // the same instant forever; run() must refuse such a configuration
    // up front rather than never terminating.
    let zero_gap = [
        DurationDistribution::Constant { value: 0.0 },
        DurationDistribution::Uniform { low: 0.0, high: 0.0 },
        DurationDistribution::Sequence {
            values: vec![0.0, 0.0],
        },
        DurationDistribution::Empirical {
            samples: vec![0.0],
        },
    ];
    for interarrival in zero_gap {
        let config = RunConfiguration::new(60.0, 1).with_fuel_type(FuelTypeConfig {
            name: "Octane92".to_string(),
            pump_count: 1,
            interarrival,
            service_time: exponential_service(0.2),
        });
        assert!(matches!(
            run(&config),
            Err(SimulationError::Configuration(_))
        ));
    }
}

#[test]
fn test_zero_horizon_finalizes_cleanly() {
    let config = RunConfiguration::new(0.0, 42).with_fuel_type(FuelTypeConfig::poisson(
        "Octane92",
        2,
        0.5,
        exponential_service(0.2),
    ));
    let stats = run(&config).unwrap();

    assert_eq!(stats.total_simulated_time, 0.0);
    assert_eq!(stats.overall.arrived, 0);
    assert_eq!(stats.overall.served, 0);
    assert_eq!(stats.overall.unfinished, 0);
    assert!(stats.completed.is_empty());
    let fuel = &stats.fuel_types[0];
    assert_eq!(fuel.mean_wait, 0.0);
    assert_eq!(fuel.mean_queue_length, 0.0);
    assert_eq!(fuel.utilization, 0.0);
}

#[test]
fn test_statistics_expose_chart_ready_series() {
    let stats = run(&busy_station(42)).unwrap();
    let header = format!(
        "{} served across {} fuel types",
        stats.overall.served,
        stats.fuel_types.len()
    );
    assert!(header.contains("3 fuel types"));

    // RunStatistics is plain data: a reporting shell can walk the series
    // without touching the engine.
    for fuel in &stats.fuel_types {
        assert!(!fuel.queue_series.is_empty());
    }
}
