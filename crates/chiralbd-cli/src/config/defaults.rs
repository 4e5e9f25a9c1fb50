pub struct DefaultsConfig {
    pub units: &'static str,
    pub timestep: f64,
    pub output_every: u64,
    pub rank: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            units: "lj",
            timestep: 0.005,
            output_every: 100,
            rank: 0,
        }
    }
}
