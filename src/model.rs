#[derive(Debug, Clone)]
pub struct Device {
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct ConnectedDevice {
    pub api_url: String,
    pub client: reqwest::Client,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Datapoint {
    pub name: String,
    pub value: f64,
    /// Unix time in seconds, the resolution the carbon line protocol expects.
    pub timestamp: u64,
}
