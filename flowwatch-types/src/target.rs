//! Health targets supplied per evaluation.

/// Optional per-metric targets, as percentages.
///
/// An absent field means "no target-based comparison" for that metric, not
/// zero. For the deliverability rates (unsubscribe, bounce, complaint) a
/// present value replaces the default red threshold.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HealthTarget {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub open_rate: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub click_rate: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub unsubscribe_rate: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub bounce_rate: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub complaint_rate: Option<f64>,
}

impl HealthTarget {
    /// A target with no thresholds set.
    pub fn none() -> Self {
        Self::default()
    }

    /// A target with only an open rate.
    pub fn open_rate(rate: f64) -> Self {
        Self {
            open_rate: Some(rate),
            ..Self::default()
        }
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.open_rate.is_none()
            && self.click_rate.is_none()
            && self.unsubscribe_rate.is_none()
            && self.bounce_rate.is_none()
            && self.complaint_rate.is_none()
    }

    /// Fill fields absent on `self` from `fallback`.
    pub fn or(self, fallback: HealthTarget) -> Self {
        Self {
            open_rate: self.open_rate.or(fallback.open_rate),
            click_rate: self.click_rate.or(fallback.click_rate),
            unsubscribe_rate: self.unsubscribe_rate.or(fallback.unsubscribe_rate),
            bounce_rate: self.bounce_rate.or(fallback.bounce_rate),
            complaint_rate: self.complaint_rate.or(fallback.complaint_rate),
        }
    }
}
