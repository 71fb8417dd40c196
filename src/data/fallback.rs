use chrono::{DateTime, TimeZone, Utc};

use crate::models::Company;

/// Demo dataset used whenever the hosted backend is unreachable, errors out,
/// or returns too few rows. Valuations are illustrative, not live figures.
pub fn fallback_companies() -> Vec<Company> {
    let stamp = seed_timestamp();
    let rows: [(&str, &str, &str, f64, Option<&str>); 10] = [
        (
            "fallback-spacex",
            "SpaceX",
            "Rockets, reusable boosters and the Starlink constellation",
            350_000_000_000.0,
            Some("https://logo.clearbit.com/spacex.com"),
        ),
        (
            "fallback-bytedance",
            "ByteDance",
            "TikTok's parent and one of the largest private app companies",
            300_000_000_000.0,
            Some("https://logo.clearbit.com/bytedance.com"),
        ),
        (
            "fallback-openai",
            "OpenAI",
            "Research lab behind ChatGPT and the GPT model family",
            157_000_000_000.0,
            Some("https://logo.clearbit.com/openai.com"),
        ),
        (
            "fallback-stripe",
            "Stripe",
            "Payments infrastructure for internet businesses",
            70_000_000_000.0,
            Some("https://logo.clearbit.com/stripe.com"),
        ),
        (
            "fallback-databricks",
            "Databricks",
            "Data lakehouse and analytics platform",
            62_000_000_000.0,
            Some("https://logo.clearbit.com/databricks.com"),
        ),
        (
            "fallback-shein",
            "Shein",
            "Fast-fashion marketplace shipping worldwide",
            66_000_000_000.0,
            Some("https://logo.clearbit.com/shein.com"),
        ),
        (
            "fallback-canva",
            "Canva",
            "Browser-based graphic design for non-designers",
            32_000_000_000.0,
            Some("https://logo.clearbit.com/canva.com"),
        ),
        (
            "fallback-epicgames",
            "Epic Games",
            "Fortnite and the Unreal Engine",
            22_500_000_000.0,
            Some("https://logo.clearbit.com/epicgames.com"),
        ),
        (
            "fallback-discord",
            "Discord",
            "Voice and text chat for communities",
            15_000_000_000.0,
            Some("https://logo.clearbit.com/discord.com"),
        ),
        (
            "fallback-anduril",
            "Anduril",
            "Autonomous defense systems startup",
            14_000_000_000.0,
            None,
        ),
    ];

    rows.iter()
        .map(|(id, name, description, valuation, image)| Company {
            id: (*id).to_string(),
            name: (*name).to_string(),
            description: (*description).to_string(),
            valuation: *valuation,
            image_path: image.map(str::to_string),
            created_at: stamp,
            updated_at: stamp,
        })
        .collect()
}

fn seed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn exactly_ten_records_with_unique_ids() {
        let companies = fallback_companies();
        assert_eq!(companies.len(), 10);

        let ids: HashSet<&str> = companies.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn valuations_are_positive() {
        assert!(fallback_companies().iter().all(|c| c.valuation > 0.0));
    }
}
