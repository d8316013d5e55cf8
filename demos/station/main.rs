//! Eight-hour day at a three-fuel filling station: 2 shared pumps per
//! octane grade, a 4-pipe diesel island, Poisson arrivals. Prints the
//! per-fuel summary and the chart-ready queue-depth series.

use fuelsim::{
    run, DurationDistribution, FuelTypeConfig, RunConfiguration, ServiceTimeSpec,
};

fn refueling(liters: (f64, f64, f64)) -> ServiceTimeSpec {
    ServiceTimeSpec::Refueling {
        liters: DurationDistribution::Triangular {
            min: liters.0,
            mode: liters.1,
            max: liters.2,
        },
        // liters per minute at the nozzle
        flow_rate: 3.0,
        payment: DurationDistribution::Triangular {
            min: 0.5,
            mode: 1.0,
            max: 2.0,
        },
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // 20 vehicles/hour total, split 40/40/20 across the fuel types;
    // times are in minutes, horizon is one 8-hour shift.
    let config = RunConfiguration::new(8.0 * 60.0, 42)
        .with_fuel_type(FuelTypeConfig::poisson(
            "Octane92",
            2,
            8.0 / 60.0,
            refueling((10.0, 25.0, 40.0)),
        ))
        .with_fuel_type(FuelTypeConfig::poisson(
            "Octane95",
            2,
            8.0 / 60.0,
            refueling((10.0, 25.0, 40.0)),
        ))
        .with_fuel_type(FuelTypeConfig::poisson(
            "Diesel",
            4,
            4.0 / 60.0,
            refueling((20.0, 50.0, 100.0)),
        ))
        .with_drain_on_horizon(true);

    let stats = run(&config)?;

    println!(
        "Simulated {:.0} minutes: {} arrived, {} served, {} unfinished",
        stats.total_simulated_time,
        stats.overall.arrived,
        stats.overall.served,
        stats.overall.unfinished
    );
    println!();
    for fuel in &stats.fuel_types {
        println!(
            "{:<9} avg wait {:>6.2} min (p90 {:>6.2}, max {:>6.2}) | avg total {:>6.2} min | avg queue {:>5.2} | utilization {:>5.1}%",
            fuel.name,
            fuel.mean_wait,
            fuel.p90_wait,
            fuel.max_wait,
            fuel.mean_total,
            fuel.mean_queue_length,
            fuel.utilization * 100.0
        );
    }

    println!();
    println!("queue depth over time (fuel,minute,depth):");
    for fuel in &stats.fuel_types {
        for (time, depth) in &fuel.queue_series {
            println!("{},{:.2},{}", fuel.name, time, depth);
        }
    }

    Ok(())
}
