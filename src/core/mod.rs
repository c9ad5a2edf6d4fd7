pub mod calculator;
pub mod fees;
pub mod report;
pub mod shipping;
