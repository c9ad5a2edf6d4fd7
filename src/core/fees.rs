use crate::domain::model::{FeeApplication, FeeCharge, FeeRule};

impl FeeRule {
    /// Fee owed on a sale of `quantity` items at `base_amount` each.
    ///
    /// Per-item fees scale with quantity; per-order fees are charged once.
    pub fn calculate(&self, base_amount: f64, quantity: u32) -> f64 {
        let fee = match self.charge() {
            FeeCharge::Percentage { percentage } => base_amount * percentage / 100.0,
            FeeCharge::Flat { flat_fee } => flat_fee,
            FeeCharge::Compound {
                percentage,
                flat_fee,
            } => base_amount * percentage / 100.0 + flat_fee,
        };

        match self.application() {
            FeeApplication::PerItem => fee * f64::from(quantity),
            FeeApplication::PerOrder => fee,
        }
    }
}
