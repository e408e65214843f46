use crate::cli::Desk;
use crate::error::Result;

pub fn execute(desk: &Desk, json: bool) -> Result<()> {
    let mut stations = desk.repo.stations()?;
    let bikes = desk.repo.bikes()?;

    stations.sort_by(|a, b| {
        let a = a.distance.unwrap_or(f64::MAX);
        let b = b.distance.unwrap_or(f64::MAX);
        a.total_cmp(&b)
    });

    if json {
        println!("{}", serde_json::to_string_pretty(&stations)?);
        return Ok(());
    }

    println!("Battery stations:\n");
    for station in &stations {
        let distance = station
            .distance
            .map(|d| format!("{:.1} km", d))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} ({})  bikes {}  {}",
            station.name,
            distance,
            station.availability_display(),
            station.address
        );

        for bike in bikes.iter().filter(|b| b.station_id == station.id && b.is_available) {
            match bike.battery_level {
                Some(level) => println!("      {} - battery {}%", bike.model, level),
                None => println!("      {}", bike.model),
            }
        }
    }

    Ok(())
}
