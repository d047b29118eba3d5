//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// `Ok(None)` when the key is absent, `Err` when present but not a number.
    fn get_double(&self, section: &str, key: &str) -> Result<Option<f64>, String>;
}
