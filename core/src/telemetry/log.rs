use log::{debug, info};

/// Tags every line with the component that emitted it.
pub struct LogManager {
    component: &'static str,
}

impl LogManager {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn record(&self, message: &str) {
        info!("{}: {}", self.component, message);
    }

    pub fn verbose(&self, message: &str) {
        debug!("{}: {}", self.component, message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("gazecore")
    }
}
