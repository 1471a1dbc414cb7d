// Infrastructure layer - external dependencies and adapters
pub mod codec;
pub mod config;
pub mod google_weather;
pub mod sensor;
pub mod store;
pub mod system_time;
