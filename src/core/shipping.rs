use crate::domain::model::{ShippingRateBand, ShippingService};

impl ShippingService {
    /// Price of the smallest band covering `total_weight`.
    ///
    /// Returns `None` when the weight is outside the service limits or no
    /// band reaches it. Band bounds are inclusive.
    pub fn resolve_rate(&self, total_weight: f64) -> Option<f64> {
        if !self.weight_limits().contains(total_weight) {
            return None;
        }

        let mut bands: Vec<&ShippingRateBand> = self.rates().iter().collect();
        bands.sort_by(|a, b| a.weight_up_to.total_cmp(&b.weight_up_to));

        bands
            .into_iter()
            .find(|band| total_weight <= band.weight_up_to)
            .map(|band| band.price)
    }
}
