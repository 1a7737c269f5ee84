//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;

    /// `Ok(None)` when the key is absent, `Err` with the raw text when it is
    /// present but not a non-negative integer.
    fn get_optional_u64(&self, section: &str, key: &str) -> Result<Option<u64>, String> {
        match self.get_string(section, key) {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => raw.trim().parse::<u64>().map(Some).map_err(|_| raw),
        }
    }
}
