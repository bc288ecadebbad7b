/// WPM snapshot taken once per elapsed second
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WpmSample {
    pub t: u64,
    pub raw_wpm: f64,
    pub wpm: f64,
}

impl WpmSample {
    pub fn new(t: u64, raw_wpm: f64, wpm: f64) -> Self {
        Self { t, raw_wpm, wpm }
    }

    pub fn raw_point(&self) -> (f64, f64) {
        (self.t as f64, self.raw_wpm)
    }

    pub fn net_point(&self) -> (f64, f64) {
        (self.t as f64, self.wpm)
    }
}
