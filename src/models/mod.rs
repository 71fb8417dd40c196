mod company;

pub use company::{format_valuation, rounded_display_value, Company};
