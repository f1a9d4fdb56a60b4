use hcsr04_ranging::cdev::DEFAULT_CHIP_PATH;
use hcsr04_ranging::{CdevRangeSensor, Error, SensorConfig};
use std::{thread::sleep, time::Duration};
const ECHO_PIN: u32 = 20; // GPIO20
const TRIG_PIN: u32 = 21; // GPIO21

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = SensorConfig::default().with_air_temp_celsius(22.0);
    let mut hcsr04 = CdevRangeSensor::open(DEFAULT_CHIP_PATH, TRIG_PIN, ECHO_PIN, config)?;

    loop {
        match hcsr04.distance_cm() {
            Ok(distance) => println!("Distance: {:05.2}cm", distance),
            Err(Error::Timeout(_)) => println!("Out of range"),
            Err(e) => return Err(e.into()),
        }
        sleep(Duration::from_secs_f32(0.2));
    }
}
