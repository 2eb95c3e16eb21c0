//! Human-readable summary of a plan.

use crate::types::{ActivityTier, FoodTier, LodgingTier, Tier, Tiers};

/// Inputs the summary is rendered from
#[derive(Debug, Clone, Copy)]
pub struct NarrativeContext<'a> {
    pub destination: &'a str,
    pub total_budget: f64,
    pub day_count: u32,
    pub budget_per_day: f64,
    pub tiers: Tiers,
    pub is_premium: bool,
    pub premium_day_cap: u32,
}

fn lodging_suggestions(tier: LodgingTier) -> [&'static str; 2] {
    match tier {
        LodgingTier::Economy => ["Youth hostels", "Shared rentals"],
        LodgingTier::Standard => ["3-star hotels", "Entire-apartment rentals"],
        LodgingTier::Luxury => ["4-5 star hotels", "Luxury apartments"],
    }
}

fn food_suggestions(tier: FoodTier) -> [&'static str; 2] {
    match tier {
        FoodTier::Basic => ["Local markets and self-catering", "Street food"],
        FoodTier::Varied => ["Local restaurants", "A mix of local and international cuisine"],
        FoodTier::Gourmet => ["Starred restaurants", "Signature culinary experiences"],
    }
}

fn activity_suggestions(tier: ActivityTier) -> [&'static str; 2] {
    match tier {
        ActivityTier::Discovery => ["Free walking tours", "Main landmarks"],
        ActivityTier::Cultural => ["Private guided tours", "Museums and exhibitions"],
        ActivityTier::Adventure => ["Outdoor sports", "Guided excursions"],
    }
}

fn push_section(out: &mut String, title: &str, label: &str, items: [&str; 2]) {
    out.push_str(&format!("\n{} ({}):\n", title, label));
    for item in items {
        out.push_str(&format!("- {}\n", item));
    }
}

/// Render the plan summary
pub fn compose_narrative(ctx: &NarrativeContext<'_>) -> String {
    let tiers = &ctx.tiers;
    let mut out = String::new();

    out.push_str(&format!(
        "Your trip to {} with a budget of {:.2}:\n\n",
        ctx.destination, ctx.total_budget
    ));
    out.push_str(&format!(
        "We recommend a stay of {} day(s) ({:.2}/day):\n",
        ctx.day_count, ctx.budget_per_day
    ));
    out.push_str(&format!(
        "- {} lodging: ~{:.2}/night\n",
        tiers.lodging,
        tiers.lodging.daily_base_cost()
    ));
    out.push_str(&format!(
        "- {} meals: ~{:.2}/day\n",
        tiers.food,
        tiers.food.daily_base_cost()
    ));
    out.push_str(&format!(
        "- {} activities: ~{:.2}/day\n",
        tiers.activity,
        tiers.activity.daily_base_cost()
    ));

    push_section(
        &mut out,
        "Lodging",
        tiers.lodging.as_str(),
        lodging_suggestions(tiers.lodging),
    );
    push_section(&mut out, "Dining", tiers.food.as_str(), food_suggestions(tiers.food));
    push_section(
        &mut out,
        "Activities",
        tiers.activity.as_str(),
        activity_suggestions(tiers.activity),
    );

    out.push_str("\nTips:\n");
    out.push_str("- Book your accommodation in advance\n");
    out.push_str("- Prefer public transport\n");
    out.push_str("- Keep about 10% of the budget for the unexpected\n");

    if !ctx.is_premium {
        out.push_str("\nUpgrade to premium for:\n");
        out.push_str("- Unlimited simulations\n");
        out.push_str(&format!("- Trips of up to {} days\n", ctx.premium_day_cap));
        out.push_str("- More detailed place suggestions\n");
    }

    out
}
