//! Caller-supplied model orders

use serde::{Deserialize, Serialize};
use std::fmt;

/// ARIMA order: autoregressive `p`, differencing `d`, moving-average `q`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// GARCH order: ARCH lags `p`, GARCH lags `q`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GarchOrder {
    pub p: usize,
    pub q: usize,
}

impl GarchOrder {
    pub fn new(p: usize, q: usize) -> Self {
        Self { p, q }
    }
}

impl fmt::Display for GarchOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GARCH({},{})", self.p, self.q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ArimaOrder::new(1, 0, 2).to_string(), "ARIMA(1,0,2)");
        assert_eq!(GarchOrder::new(1, 1).to_string(), "GARCH(1,1)");
    }

    #[test]
    fn test_deserialize_ignores_extra_fields() {
        let order: ArimaOrder = serde_json::from_str(r#"{"p":2,"d":1,"q":0,"note":"x"}"#).unwrap();
        assert_eq!(order, ArimaOrder::new(2, 1, 0));
    }

    #[test]
    fn test_deserialize_rejects_negative_and_missing() {
        assert!(serde_json::from_str::<GarchOrder>(r#"{"p":-1,"q":1}"#).is_err());
        assert!(serde_json::from_str::<GarchOrder>(r#"{"p":1}"#).is_err());
    }
}
