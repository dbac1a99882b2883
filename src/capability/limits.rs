use serde::Deserialize;

use crate::error::{Result, SpcError};

/// Lower and upper specification limits.
///
/// Either side may be absent. Two-sided indices (Cp, Pp) need both; the
/// centering indices (Cpk, Ppk) fall back to one-sided mode when only one is
/// given. Having neither is representable so that the index functions, not
/// the constructor, report which limits were missing.
///
/// # Examples
///
/// ```
/// use u_spc::capability::SpecificationLimits;
///
/// let both = SpecificationLimits::two_sided(42.0, 80.0).unwrap();
/// assert!(both.is_two_sided());
///
/// let lower = SpecificationLimits::lower_only(42.0).unwrap();
/// assert_eq!(lower.upper(), None);
///
/// assert!(SpecificationLimits::new(Some(f64::NAN), None).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(try_from = "RawLimits")]
pub struct SpecificationLimits {
    lower: Option<f64>,
    upper: Option<f64>,
}

/// Unchecked form read by serde; converted through [`SpecificationLimits::new`].
#[derive(Deserialize)]
struct RawLimits {
    #[serde(default)]
    lower: Option<f64>,
    #[serde(default)]
    upper: Option<f64>,
}

impl TryFrom<RawLimits> for SpecificationLimits {
    type Error = SpcError;

    fn try_from(raw: RawLimits) -> Result<Self> {
        Self::new(raw.lower, raw.upper)
    }
}

impl SpecificationLimits {
    /// # Errors
    ///
    /// `InvalidArgument` if a supplied limit is NaN or infinite.
    pub fn new(lower: Option<f64>, upper: Option<f64>) -> Result<Self> {
        if let Some(l) = lower {
            if !l.is_finite() {
                return Err(SpcError::invalid("lower", format!("limit must be finite, got {l}")));
            }
        }
        if let Some(u) = upper {
            if !u.is_finite() {
                return Err(SpcError::invalid("upper", format!("limit must be finite, got {u}")));
            }
        }
        Ok(Self { lower, upper })
    }

    pub fn two_sided(lower: f64, upper: f64) -> Result<Self> {
        Self::new(Some(lower), Some(upper))
    }

    pub fn lower_only(lower: f64) -> Result<Self> {
        Self::new(Some(lower), None)
    }

    pub fn upper_only(upper: f64) -> Result<Self> {
        Self::new(None, Some(upper))
    }

    pub fn lower(&self) -> Option<f64> {
        self.lower
    }

    pub fn upper(&self) -> Option<f64> {
        self.upper
    }

    pub fn is_two_sided(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }

    /// `|upper - lower|` when both limits are present.
    pub fn width(&self) -> Option<f64> {
        Some((self.upper? - self.lower?).abs())
    }
}
