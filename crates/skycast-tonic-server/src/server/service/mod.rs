pub mod greeter;
pub mod weather;

pub use greeter::GreeterService;
pub use weather::WeatherService;
